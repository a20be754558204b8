use bytebuffer::ByteBuffer;
use rand::{self, Rng};
use tokio::io::{self, AsyncReadExt};

use crate::crypto::{Aes, Iv, Key};

/// One framed unit on the coded wire: two mask-disguised big-endian length
/// words, random noise padding, then the AES-CBC ciphertext of the body.
pub struct Message {
    buf: ByteBuffer,
    cipher: Aes,
}

impl Message {
    const MASK: u64 = 0x20250215;

    /// Upper bound on one block. A longer declared length means a corrupt
    /// or foreign frame, not a bigger allocation.
    const MAX_BLOCK: u64 = 64 * 1024;

    pub fn new(key: &Key, iv: &Iv) -> Message {
        Message {
            buf: ByteBuffer::new(),
            cipher: Aes::new(*key, *iv),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.write_bytes(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.into_vec()
    }

    /// Assemble the wire block for the buffered body. The 16 bytes of
    /// length words are counted in the total, so a reader consumes exactly
    /// `total_len` bytes per block.
    pub fn pack(&mut self) -> io::Result<Vec<u8>> {
        let body = self.cipher.encrypt(self.buf.as_bytes())?;

        let noise = get_noise();
        let total_len = (noise.len() + body.len() + 16) as u64;

        let mut block = ByteBuffer::new();
        block.write_u64(total_len ^ Self::MASK);
        block.write_u64(noise.len() as u64 ^ Self::MASK);
        block.write_bytes(&noise);
        block.write_bytes(&body);
        Ok(block.into_vec())
    }

    /// Read one wire block from `reader` and append the recovered body to
    /// this message's buffer.
    pub async fn unpack<T>(&mut self, reader: &mut T) -> io::Result<()>
    where
        T: AsyncReadExt + std::marker::Unpin,
    {
        let total_len = reader.read_u64().await? ^ Self::MASK;
        let noise_len = reader.read_u64().await? ^ Self::MASK;

        if total_len > Self::MAX_BLOCK || noise_len.saturating_add(16) > total_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "bad block length",
            ));
        }
        let (total_len, noise_len) = (total_len as usize, noise_len as usize);

        let mut block = vec![0; total_len - 16];
        reader.read_exact(&mut block).await?;

        let body = self.cipher.decrypt(&block[noise_len..])?;
        self.buf.write_bytes(&body);
        Ok(())
    }
}

fn get_noise() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let l = rng.gen_range(100..1000);
    let mut noise = vec![0; l];
    rng.fill(&mut noise[..]);
    noise
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: Key = *b"0123456789abcdef";
    const IV: Iv = *b"fedcba9876543210";

    #[tokio::test]
    async fn pack_unpack_round_trip() {
        let mut msg = Message::new(&KEY, &IV);
        msg.write_bytes(b"hello world");
        let block = msg.pack().unwrap();

        let mut out = Message::new(&KEY, &IV);
        let mut reader = &block[..];
        out.unpack(&mut reader).await.unwrap();
        assert_eq!(out.as_bytes(), b"hello world");
        assert!(reader.is_empty());
    }

    #[tokio::test]
    async fn oversized_declared_length_is_rejected() {
        let mut block = ByteBuffer::new();
        block.write_u64((Message::MAX_BLOCK + 17) ^ Message::MASK);
        block.write_u64(0 ^ Message::MASK);
        let block = block.into_vec();

        let mut msg = Message::new(&KEY, &IV);
        let err = msg.unpack(&mut &block[..]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn noise_longer_than_block_is_rejected() {
        let mut block = ByteBuffer::new();
        block.write_u64(32 ^ Message::MASK);
        block.write_u64(32 ^ Message::MASK);
        block.write_bytes(&[0; 16]);
        let block = block.into_vec();

        let mut msg = Message::new(&KEY, &IV);
        let err = msg.unpack(&mut &block[..]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
