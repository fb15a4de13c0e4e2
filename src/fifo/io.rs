//! `std::io` adapters for byte buffers.

use std::{
    cmp,
    io::{self, BufRead, Read, Write},
    ops::DerefMut,
};

use crate::fifo::{foreign::FifoBuffer, growable::GrowableFifoBuffer};

impl<S: DerefMut<Target = [u8]>> Read for FifoBuffer<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = cmp::min(buf.len(), self.available());
        buf[..n].copy_from_slice(&FifoBuffer::read(self)[..n]);
        self.consume(n);

        Ok(n)
    }
}

impl<S: DerefMut<Target = [u8]>> BufRead for FifoBuffer<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(FifoBuffer::read(self))
    }

    fn consume(&mut self, amt: usize) {
        FifoBuffer::consume(self, amt);
    }
}

/// Writes as much as fits, shifting the buffer if needed.
///
/// Returns `Ok(0)` when the buffer is full.
impl<S: DerefMut<Target = [u8]>> Write for FifoBuffer<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.want_write(buf.len()) {
            // Take whatever is left after shifting.
            self.want_write(self.capacity() - self.available());
        }

        let space = FifoBuffer::write(self);
        let n = cmp::min(buf.len(), space.len());
        space[..n].copy_from_slice(&buf[..n]);
        self.append(n);

        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for GrowableFifoBuffer<u8> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = cmp::min(buf.len(), self.available());
        buf[..n].copy_from_slice(&GrowableFifoBuffer::read(self)[..n]);
        self.consume(n);

        Ok(n)
    }
}

impl BufRead for GrowableFifoBuffer<u8> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(GrowableFifoBuffer::read(self))
    }

    fn consume(&mut self, amt: usize) {
        GrowableFifoBuffer::consume(self, amt);
    }
}

/// Always takes the whole input, growing the buffer.
impl Write for GrowableFifoBuffer<u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_slice(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
