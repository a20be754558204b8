use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::transport::Transport;
use crate::Result;

const BUF_SIZE: usize = 4096;

/// Bidirectional pump between a plaintext stream and its transport-coded
/// peer. Chunks moving local -> remote are sealed, blocks moving
/// remote -> local are opened. Owns both streams from construction on.
pub struct Relay<L, R, T> {
    local: L,
    remote: R,
    transport: T,
}

impl<L, R, T> Relay<L, R, T>
where
    L: AsyncRead + AsyncWrite + Unpin,
    R: AsyncRead + AsyncWrite + Unpin,
    T: Transport,
{
    pub fn new(local: L, remote: R, transport: T) -> Relay<L, R, T> {
        Relay {
            local,
            remote,
            transport,
        }
    }

    /// Run until either side closes. Each direction shuts down its write
    /// half once the opposite read half drains.
    pub async fn run(self) -> Result<()> {
        let Relay {
            local,
            remote,
            transport,
        } = self;
        let (mut local_read, mut local_write) = io::split(local);
        let (mut remote_read, mut remote_write) = io::split(remote);

        let upstream = async {
            let mut buf = [0; BUF_SIZE];
            loop {
                match local_read.read(&mut buf).await {
                    Ok(len) if len > 0 => {
                        remote_write.write_all(&transport.seal(&buf[0..len])?).await?
                    }
                    _ => {
                        remote_write.shutdown().await?;
                        break Ok::<(), io::Error>(());
                    }
                }
            }
        };

        let downstream = async {
            loop {
                match transport.open(&mut remote_read).await {
                    Ok(chunk) if !chunk.is_empty() => local_write.write_all(&chunk).await?,
                    _ => {
                        local_write.shutdown().await?;
                        break Ok::<(), io::Error>(());
                    }
                }
            }
        };

        tokio::try_join!(upstream, downstream)?;
        Ok(())
    }
}
