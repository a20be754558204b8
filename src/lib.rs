pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

pub mod codec;
pub mod crypto;
pub mod error;
pub mod handshake;
pub mod msg;
pub mod relay;
pub mod socks5;
pub mod transport;
