//! A framed byte stream to the broker.

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::MAX_MESSAGE_SIZE;
use crate::error::{ProtocolError, ProtocolResult};
use crate::framing::encode_message;

/// A single-owner framed stream.
///
/// `Connection` performs no internal locking: concurrent `send`/`receive`
/// from multiple tasks requires external synchronization, and the intended
/// use is exclusive ownership by one task. Closing the connection is the only
/// cancellation primitive.
pub struct Connection {
    stream: Option<TcpStream>,
}

impl Connection {
    /// Opens a TCP connection to the broker at `host:port`.
    pub async fn open(host: &str, port: u16) -> ProtocolResult<Connection> {
        let stream = TcpStream::connect((host, port)).await?;
        debug!(host, port, "connected to broker");
        Ok(Connection {
            stream: Some(stream),
        })
    }

    /// Wraps an already-established stream, e.g. one accepted by a listening
    /// service.
    pub fn from_stream(stream: TcpStream) -> Connection {
        Connection {
            stream: Some(stream),
        }
    }

    /// Sends a single framed message.
    ///
    /// May block while the stream applies backpressure.
    pub async fn send<T: Serialize>(&mut self, message: &T) -> ProtocolResult<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or(ProtocolError::ConnectionClosed)?;
        let frame = encode_message(message)?;
        stream.write_all(&frame).await?;
        stream.flush().await?;
        trace!(len = frame.len(), "frame sent");
        Ok(())
    }

    /// Receives a single framed message, blocking until a full frame is
    /// available.
    ///
    /// Returns `Ok(None)` when the remote side closed the stream at a frame
    /// boundary. EOF in the middle of a frame is an error.
    pub async fn receive<T: DeserializeOwned>(&mut self) -> ProtocolResult<Option<T>> {
        let stream = self
            .stream
            .as_mut()
            .ok_or(ProtocolError::ConnectionClosed)?;

        let mut len_buf = [0u8; 4];
        match stream.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_MESSAGE_SIZE as usize {
            return Err(ProtocolError::MessageTooLarge {
                size: len as u32,
                max: MAX_MESSAGE_SIZE,
            });
        }
        if len == 0 {
            return Err(ProtocolError::EmptyMessage);
        }

        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).await?;
        trace!(len, "frame received");

        Ok(Some(serde_json::from_slice(&payload)?))
    }

    /// Closes the connection. Safe to call more than once; the stream is
    /// released exactly once.
    pub async fn close(&mut self) -> ProtocolResult<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
            debug!("connection closed");
        }
        Ok(())
    }

    /// Whether [`Connection::close`] has already run.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hello::{Hello, Role};
    use monto_core::{ProtocolVersion, SoftwareVersion};
    use std::collections::BTreeSet;
    use tokio::net::TcpListener;

    fn sample_hello() -> Hello {
        Hello {
            monto: ProtocolVersion::CURRENT,
            version: SoftwareVersion::new("com.example.tool".parse().unwrap()),
            role: Role::Client,
            extensions: BTreeSet::new(),
        }
    }

    async fn pair() -> (Connection, Connection) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connect = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
        let (accepted, _) = listener.accept().await.unwrap();
        let connected = connect.await.unwrap();
        (
            Connection::from_stream(connected),
            Connection::from_stream(accepted),
        )
    }

    #[tokio::test]
    async fn send_receive_roundtrip() {
        let (mut a, mut b) = pair().await;
        let hello = sample_hello();

        a.send(&hello).await.unwrap();
        let received: Hello = b.receive().await.unwrap().unwrap();
        assert_eq!(received, hello);
    }

    #[tokio::test]
    async fn multiple_frames_arrive_in_order() {
        let (mut a, mut b) = pair().await;
        for i in 0..3u64 {
            let mut hello = sample_hello();
            hello.version.major = i;
            a.send(&hello).await.unwrap();
        }
        for i in 0..3u64 {
            let received: Hello = b.receive().await.unwrap().unwrap();
            assert_eq!(received.version.major, i);
        }
    }

    #[tokio::test]
    async fn clean_remote_close_yields_none() {
        let (mut a, mut b) = pair().await;
        a.close().await.unwrap();

        let received: Option<Hello> = b.receive().await.unwrap();
        assert!(received.is_none());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (mut a, _b) = pair().await;
        a.close().await.unwrap();
        a.close().await.unwrap();
        assert!(a.is_closed());
    }

    #[tokio::test]
    async fn send_after_close_fails() {
        let (mut a, _b) = pair().await;
        a.close().await.unwrap();
        let result = a.send(&sample_hello()).await;
        assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn truncated_frame_is_an_error() {
        let (a, mut b) = pair().await;

        // Claim an 8-byte payload but close after sending 2 bytes.
        let mut stream = a.stream.unwrap();
        stream.write_all(&8u32.to_be_bytes()).await.unwrap();
        stream.write_all(b"{}").await.unwrap();
        stream.shutdown().await.unwrap();

        let result: ProtocolResult<Option<Hello>> = b.receive().await;
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let (a, mut b) = pair().await;

        let mut stream = a.stream.unwrap();
        stream
            .write_all(&(MAX_MESSAGE_SIZE + 1).to_be_bytes())
            .await
            .unwrap();

        let result: ProtocolResult<Option<Hello>> = b.receive().await;
        assert!(matches!(result, Err(ProtocolError::MessageTooLarge { .. })));
    }
}
