use std::env;
use std::str::FromStr;

use clap::Parser;
use strum_macros::EnumString;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ptgate::crypto::{Iv, Key};
use ptgate::socks5::Socks5;
use ptgate::transport::{Crypt, Identity};
use ptgate::Result;

/// Transport applied to relayed bytes.
#[derive(EnumString, Clone, Copy, Debug)]
enum Mode {
    /// forward bytes untouched
    PLAIN,
    /// seal upstream traffic with the AES message transport
    CRYPT,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value_t = 8082)]
    port: u16,

    #[arg(default_value = "PLAIN")]
    mode: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mode = Mode::from_str(&args.mode).expect("mode should be PLAIN or CRYPT");

    let secret = match mode {
        Mode::PLAIN => None,
        Mode::CRYPT => Some((get_secret("PTGATE_KEY"), get_secret("PTGATE_IV"))),
    };

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = TcpListener::bind(&addr).await.unwrap();

    info!("socks5 listen on {addr} ({mode:?})");

    loop {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::spawn(async move {
            if let Err(err) = process(socket, secret).await {
                warn!("session ended: {err}");
            }
        });
    }
}

async fn process(socket: TcpStream, secret: Option<(Key, Iv)>) -> Result<()> {
    match secret {
        Some((key, iv)) => Socks5::new(socket, Crypt::new(key, iv)).process().await,
        None => Socks5::new(socket, Identity).process().await,
    }
}

fn get_secret(name: &str) -> [u8; 16] {
    env::var(name)
        .expect(&format!("socks5 need {name}"))
        .as_bytes()
        .try_into()
        .expect(&format!("{name} should be 16 bytes"))
}
