use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::codec;
use crate::handshake::Handshake;
use crate::relay::Relay;
use crate::transport::Transport;
use crate::{Error, Result};

/// One proxied session: the SOCKS exchange on the inbound stream, then a
/// relay between the application and the requested destination.
pub struct Socks5<T> {
    down_stream: TcpStream,
    transport: T,
}

impl<T: Transport> Socks5<T> {
    pub fn new(socket: TcpStream, transport: T) -> Socks5<T> {
        Socks5 {
            down_stream: socket,
            transport,
        }
    }

    /// Process the session end to end. The inbound stream is closed on
    /// every path that does not hand it to the relay; once the relay owns
    /// both streams this session performs no further I/O on either.
    pub async fn process(self) -> Result<()> {
        let (down_stream, dest) = Handshake::new(self.down_stream).run().await?;

        let target = codec::decode_destination(&dest)?;
        debug!(%target, "request resolved");

        let up_stream = TcpStream::connect(target)
            .await
            .map_err(Error::UpstreamConnect)?;
        info!(%target, "connected upstream");

        Relay::new(down_stream, up_stream, self.transport).run().await
    }
}
