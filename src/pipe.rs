//! Reads delimited records from a stream through a growable buffer.

use std::{
    future::poll_fn,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::ready;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

use fifo_rs::fifo::GrowableFifoBuffer;

/// Counters reported after the input is exhausted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub records: usize,
    pub bytes: usize,
    pub capacity: usize,
}

/// Reads once from `reader` into the tail of `buf`, after making room for
/// at least `n` bytes.
///
/// Returns the number of bytes read, 0 at end of stream.
fn poll_fill<R>(
    reader: &mut R,
    buf: &mut GrowableFifoBuffer<u8>,
    n: usize,
    cx: &mut Context<'_>,
) -> Poll<io::Result<usize>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut read_buf = ReadBuf::new(buf.write_n(n)?);

    ready!(Pin::new(&mut *reader).poll_read(cx, &mut read_buf))?;

    let nread = read_buf.filled().len();
    buf.append(nread);

    Ok(nread).into()
}

async fn fill<R>(reader: &mut R, buf: &mut GrowableFifoBuffer<u8>, n: usize) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    poll_fn(|cx| poll_fill(reader, buf, n, cx)).await
}

async fn write_record<W>(writer: &mut W, record: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer
        .write_all(format!("{}\t", record.len()).as_bytes())
        .await?;
    writer.write_all(record).await?;
    writer.write_all(b"\n").await
}

/// Writes every complete record in `buf` to `writer` and consumes it.
///
/// Returns the number of records written.
async fn drain_records<W>(
    buf: &mut GrowableFifoBuffer<u8>,
    delimiter: u8,
    writer: &mut W,
) -> io::Result<usize>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut records = 0;

    while let Some(pos) = buf.read().iter().position(|&b| b == delimiter) {
        write_record(writer, &buf.read()[..pos]).await?;
        buf.consume(pos + 1);
        records += 1;
    }

    Ok(records)
}

/// Copies `reader` to `writer` one record per line, each prefixed by its
/// length and a tab.
///
/// A trailing record without a delimiter is written at end of stream.
pub async fn run<R, W>(
    reader: &mut R,
    writer: &mut W,
    capacity: usize,
    chunk: usize,
    delimiter: u8,
) -> io::Result<Stats>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = GrowableFifoBuffer::new(capacity)?;
    let mut stats = Stats::default();

    loop {
        let nread = fill(reader, &mut buf, chunk).await?;
        if nread == 0 {
            break;
        }

        log::trace!("Read {} bytes, {} buffered", nread, buf.available());

        stats.bytes += nread;
        stats.records += drain_records(&mut buf, delimiter, writer).await?;
    }

    if !buf.is_empty() {
        log::debug!("Flush {} bytes without a delimiter", buf.available());

        write_record(writer, buf.read()).await?;
        buf.consume(buf.available());
        stats.records += 1;
    }

    writer.flush().await?;

    stats.capacity = buf.capacity();
    Ok(stats)
}
