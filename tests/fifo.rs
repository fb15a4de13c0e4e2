use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, DuplexStream},
    sync::oneshot::{self, Receiver, Sender},
};

use fifo_rs::fifo::{ForeignFifoBuffer, GrowableFifoBuffer};

const FRAMES: usize = 200;

#[test]
fn test_shift_instead_of_grow() {
    let mut buf = GrowableFifoBuffer::new(4).unwrap();

    buf.append_slice(&['a', 'b', 'c']).unwrap();
    buf.consume(2);
    assert_eq!(buf.read(), &['c']);

    buf.append_slice(&['d', 'e']).unwrap();
    assert_eq!(buf.read(), &['c', 'd', 'e']);
    assert_eq!(buf.capacity(), 4);
}

#[test]
fn test_grow_when_full() {
    let mut buf = GrowableFifoBuffer::new(4).unwrap();

    buf.append_slice(&['a', 'b', 'c', 'd']).unwrap();
    assert!(buf.is_full());

    buf.write_n(1).unwrap()[0] = 'e';
    buf.append(1);

    assert_eq!(buf.capacity(), 8);
    assert_eq!(buf.read(), &['a', 'b', 'c', 'd', 'e']);
}

#[test]
fn test_empty() {
    let buf = GrowableFifoBuffer::<char>::new(4).unwrap();

    assert!(buf.is_empty());
    assert!(!buf.is_full());
    assert_eq!(buf.read().len(), 0);

    let mut storage = [0u8; 4];
    let buf = ForeignFifoBuffer::new(&mut storage[..]);
    assert!(buf.is_empty());
    assert!(!buf.is_full());
    assert_eq!(buf.read().len(), 0);
}

#[tokio::test]
async fn test_read_parse_loop() {
    let (tx, rx) = oneshot::channel::<()>();
    let (client, server) = tokio::io::duplex(13);

    let producer = tokio::spawn(produce(client, tx));
    let frames = parse(server, rx).await;
    producer.await.unwrap();

    assert_eq!(frames.len(), FRAMES);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame, &payload(i));
    }
}

fn payload(i: usize) -> Vec<u8> {
    (0..i % 97).map(|x| (x + i) as u8).collect()
}

/// Sends length-prefixed frames.
async fn produce(mut stream: DuplexStream, tx: Sender<()>) {
    tx.send(()).unwrap();

    for i in 0..FRAMES {
        let payload = payload(i);
        stream.write_u16(payload.len() as u16).await.unwrap();
        stream.write_all(&payload).await.unwrap();
    }
}

/// Receives length-prefixed frames until the stream ends.
async fn parse(mut stream: DuplexStream, rx: Receiver<()>) -> Vec<Vec<u8>> {
    rx.await.unwrap();

    let mut buf = GrowableFifoBuffer::new(8).unwrap();
    let mut frames = Vec::new();

    loop {
        let nread = stream.read(buf.write_n(16).unwrap()).await.unwrap();
        if nread == 0 {
            break;
        }
        buf.append(nread);

        loop {
            let data = buf.read();
            if data.len() < 2 {
                break;
            }

            let len = u16::from_be_bytes([data[0], data[1]]) as usize;
            if data.len() < 2 + len {
                break;
            }

            frames.push(data[2..2 + len].to_vec());
            buf.consume(2 + len);
        }
    }

    assert!(buf.is_empty());
    frames
}
