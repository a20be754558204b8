use std::future::Future;

use tokio::io::{self, AsyncRead, AsyncReadExt};

use crate::crypto::{Iv, Key};
use crate::msg::Message;

/// A pluggable encoding applied to relayed bytes.
///
/// `seal` turns a plaintext chunk into its wire form; `open` reads one wire
/// unit from the coded side and returns the carried bytes. An empty `open`
/// result means the peer closed the stream.
pub trait Transport {
    fn seal(&self, chunk: &[u8]) -> io::Result<Vec<u8>>;

    fn open<R>(&self, src: &mut R) -> impl Future<Output = io::Result<Vec<u8>>>
    where
        R: AsyncRead + Unpin;
}

/// Pass-through transport: bytes cross the relay untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transport for Identity {
    fn seal(&self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        Ok(chunk.to_vec())
    }

    async fn open<R>(&self, src: &mut R) -> io::Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; 4096];
        let len = src.read(&mut buf).await?;
        Ok(buf[..len].to_vec())
    }
}

/// AES-128-CBC message transport: each sealed chunk travels as one framed
/// [`Message`] block with disguised lengths and random noise padding.
#[derive(Clone)]
pub struct Crypt {
    key: Key,
    iv: Iv,
}

impl Crypt {
    pub fn new(key: Key, iv: Iv) -> Crypt {
        Crypt { key, iv }
    }
}

impl Transport for Crypt {
    fn seal(&self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        let mut msg = Message::new(&self.key, &self.iv);
        msg.write_bytes(chunk);
        msg.pack()
    }

    async fn open<R>(&self, src: &mut R) -> io::Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let mut msg = Message::new(&self.key, &self.iv);
        msg.unpack(src).await?;
        Ok(msg.into_vec())
    }
}
