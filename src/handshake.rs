use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::codec::{self, Greeting, Request, DEST_LEN, REQUEST_LEN};
use crate::{Error, Result};

/// The SOCKS exchange on an inbound stream: greeting, method selection,
/// request, response. Any short read or decode failure aborts the session
/// with nothing further written.
pub struct Handshake<S> {
    stream: S,
}

impl<S> Handshake<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Handshake<S> {
        Handshake { stream }
    }

    /// Run to completion, yielding the stream back together with the raw
    /// destination descriptor from the request.
    pub async fn run(mut self) -> Result<(S, [u8; DEST_LEN])> {
        let greeting = self.read_greeting().await?;
        debug!(methods = ?greeting.methods, "greeting received");

        self.stream
            .write_all(&codec::encode_method_selection())
            .await?;

        let request = self.read_request().await?;
        debug!(dest = ?request.dest, "request received");

        self.stream
            .write_all(&codec::encode_response(&request.dest))
            .await?;
        debug!("response sent");

        Ok((self.stream, request.dest))
    }

    async fn read_greeting(&mut self) -> Result<Greeting> {
        let mut buf = vec![0u8; 2];
        self.read_frame(&mut buf).await?;

        let nmethods = buf[1] as usize;
        buf.resize(2 + nmethods, 0);
        self.read_frame(&mut buf[2..]).await?;

        codec::decode_greeting(&buf)
    }

    async fn read_request(&mut self) -> Result<Request> {
        let mut buf = [0u8; REQUEST_LEN];
        self.read_frame(&mut buf).await?;
        codec::decode_request(&buf)
    }

    async fn read_frame(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.stream.read_exact(buf).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(Error::PrematureClose),
            Err(err) => Err(err.into()),
        }
    }
}
