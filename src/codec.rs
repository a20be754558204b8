use std::net::{Ipv4Addr, SocketAddrV4};

use crate::{Error, Result};

pub const VERSION: u8 = 5;
pub const METHOD_NO_AUTH: u8 = 0;
pub const ATYP_IPV4: u8 = 1;

/// Length of the fixed destination descriptor: 4-byte IPv4 address plus
/// 2-byte big-endian port.
pub const DEST_LEN: usize = 6;

/// Length of the request frame: version, command, reserved, address type,
/// destination descriptor.
pub const REQUEST_LEN: usize = 4 + DEST_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub version: u8,
    pub methods: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub version: u8,
    pub command: u8,
    pub addr_type: u8,
    pub dest: [u8; DEST_LEN],
}

/// Decode a greeting from the first `2 + nmethods` bytes of `buf`.
/// Trailing bytes are ignored.
pub fn decode_greeting(buf: &[u8]) -> Result<Greeting> {
    if buf.len() < 2 {
        return Err(Error::MalformedFrame("greeting header"));
    }
    let version = buf[0];
    if version != VERSION {
        return Err(Error::MalformedFrame("greeting version"));
    }
    let nmethods = buf[1] as usize;
    if buf.len() < 2 + nmethods {
        return Err(Error::MalformedFrame("greeting methods"));
    }
    Ok(Greeting {
        version,
        methods: buf[2..2 + nmethods].to_vec(),
    })
}

/// The fixed method-selection reply: no authentication required.
pub fn encode_method_selection() -> [u8; 2] {
    [VERSION, METHOD_NO_AUTH]
}

/// Decode a connection request. The destination is always read as a 6-byte
/// IPv4 descriptor; other address types are rejected rather than misparsed.
/// The command byte is not validated, CONNECT is the only supported use.
pub fn decode_request(buf: &[u8]) -> Result<Request> {
    if buf.len() < REQUEST_LEN {
        return Err(Error::MalformedFrame("request"));
    }
    let version = buf[0];
    if version != VERSION {
        return Err(Error::MalformedFrame("request version"));
    }
    let addr_type = buf[3];
    if addr_type != ATYP_IPV4 {
        return Err(Error::UnsupportedAddressType(addr_type));
    }
    let mut dest = [0u8; DEST_LEN];
    dest.copy_from_slice(&buf[4..REQUEST_LEN]);
    Ok(Request {
        version,
        command: buf[1],
        addr_type,
        dest,
    })
}

/// The success reply, echoing the destination descriptor back verbatim.
pub fn encode_response(dest: &[u8; DEST_LEN]) -> [u8; REQUEST_LEN] {
    let mut buf = [0u8; REQUEST_LEN];
    buf[0] = VERSION;
    buf[3] = ATYP_IPV4;
    buf[4..].copy_from_slice(dest);
    buf
}

/// Resolve a destination descriptor to a socket address.
pub fn decode_destination(dest: &[u8]) -> Result<SocketAddrV4> {
    if dest.len() != DEST_LEN {
        return Err(Error::MalformedFrame("destination descriptor"));
    }
    let ip = Ipv4Addr::new(dest[0], dest[1], dest[2], dest[3]);
    let port = u16::from_be_bytes([dest[4], dest[5]]);
    Ok(SocketAddrV4::new(ip, port))
}
