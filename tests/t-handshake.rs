use ptgate::handshake::Handshake;
use ptgate::Error;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn full_exchange() {
    let (mut client, server) = duplex(256);

    client.write_all(&[0x05, 0x01, 0x00]).await.unwrap();
    client
        .write_all(&[0x05, 0x01, 0x00, 0x01, 0x7f, 0x00, 0x00, 0x01, 0x1f, 0x90])
        .await
        .unwrap();

    let (_stream, dest) = Handshake::new(server).run().await.unwrap();
    assert_eq!(dest, [0x7f, 0x00, 0x00, 0x01, 0x1f, 0x90]);

    let mut reply = [0u8; 2];
    client.read_exact(&mut reply).await.unwrap();
    assert_eq!(reply, [0x05, 0x00]);

    let mut response = [0u8; 10];
    client.read_exact(&mut response).await.unwrap();
    assert_eq!(
        response,
        [0x05, 0x00, 0x00, 0x01, 0x7f, 0x00, 0x00, 0x01, 0x1f, 0x90]
    );
}

#[tokio::test]
async fn greeting_with_no_methods() {
    let (mut client, server) = duplex(256);

    client.write_all(&[0x05, 0x00]).await.unwrap();
    client
        .write_all(&[0x05, 0x01, 0x00, 0x01, 10, 0, 0, 7, 0x00, 0x50])
        .await
        .unwrap();

    let (_stream, dest) = Handshake::new(server).run().await.unwrap();
    assert_eq!(dest, [10, 0, 0, 7, 0x00, 0x50]);
}

#[tokio::test]
async fn truncated_greeting_is_fatal() {
    let (mut client, server) = duplex(256);

    // declares 2 methods, sends 1, then closes
    client.write_all(&[0x05, 0x02, 0x00]).await.unwrap();
    client.shutdown().await.unwrap();

    let err = Handshake::new(server).run().await.unwrap_err();
    assert!(matches!(err, Error::PrematureClose));

    // no reply was written before the session died
    let n = client.read(&mut [0u8; 16]).await.unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn wrong_version_is_fatal() {
    let (mut client, server) = duplex(256);

    client.write_all(&[0x04, 0x01, 0x00]).await.unwrap();

    let err = Handshake::new(server).run().await.unwrap_err();
    assert!(matches!(err, Error::MalformedFrame(_)));

    let n = client.read(&mut [0u8; 16]).await.unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn unsupported_address_type_is_fatal() {
    let (mut client, server) = duplex(256);

    client.write_all(&[0x05, 0x01, 0x00]).await.unwrap();
    client
        .write_all(&[0x05, 0x01, 0x00, 0x03, 0x05, b'l', b'o', b'c', b'a', b'l'])
        .await
        .unwrap();

    let err = Handshake::new(server).run().await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedAddressType(0x03)));

    // the method selection went out before the bad request arrived,
    // but no response follows it
    let mut reply = [0u8; 2];
    client.read_exact(&mut reply).await.unwrap();
    assert_eq!(reply, [0x05, 0x00]);
    let n = client.read(&mut [0u8; 16]).await.unwrap();
    assert_eq!(n, 0);
}
