use std::env;
use std::str::FromStr;

use clap::Parser;
use strum_macros::EnumString;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ptgate::relay::Relay;
use ptgate::transport::{Crypt, Identity};

/// Orientation of the forwarding endpoint.
#[derive(EnumString, Clone, Copy, Debug)]
enum Mode {
    /// forward bytes untouched
    FORWARD,
    /// seal inbound plaintext toward the target
    SEAL,
    /// open sealed inbound blocks toward the target
    OPEN,
}

#[derive(Parser, Debug)]
struct Args {
    source_host: String,
    source_port: u16,
    target_host: String,
    target_port: u16,
    mode: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mode = Mode::from_str(&args.mode).expect("mode should be FORWARD, SEAL or OPEN");
    let source_addr = format!("{}:{}", args.source_host, args.source_port);
    let target_addr = format!("{}:{}", args.target_host, args.target_port);

    let listener = TcpListener::bind(&source_addr).await.unwrap();

    info!("tunnel listen on {source_addr} -> {target_addr} ({mode:?})");

    loop {
        let (socket, _) = listener.accept().await.unwrap();
        let target_addr = target_addr.clone();
        tokio::spawn(async move {
            if let Err(err) = process(socket, &target_addr, mode).await {
                warn!("tunnel session ended: {err}");
            }
        });
    }
}

async fn process(inbound: TcpStream, target_addr: &str, mode: Mode) -> ptgate::Result<()> {
    let outbound = TcpStream::connect(target_addr).await?;

    match mode {
        Mode::FORWARD => Relay::new(inbound, outbound, Identity).run().await,
        Mode::SEAL => {
            let crypt = Crypt::new(get_secret("PTGATE_KEY"), get_secret("PTGATE_IV"));
            Relay::new(inbound, outbound, crypt).run().await
        }
        Mode::OPEN => {
            // the inbound side carries sealed blocks; swap ends so they are
            // opened toward the target
            let crypt = Crypt::new(get_secret("PTGATE_KEY"), get_secret("PTGATE_IV"));
            Relay::new(outbound, inbound, crypt).run().await
        }
    }
}

fn get_secret(name: &str) -> [u8; 16] {
    env::var(name)
        .expect(&format!("tunnel need {name}"))
        .as_bytes()
        .try_into()
        .expect(&format!("{name} should be 16 bytes"))
}
