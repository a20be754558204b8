use std::io::{self, Error, ErrorKind};

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

pub type Key = [u8; 16];
pub type Iv = [u8; 16];

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// AES-128-CBC with PKCS7 padding over byte slices.
pub struct Aes {
    key: Key,
    iv: Iv,
}

impl Aes {
    pub fn new(key: Key, iv: Iv) -> Self {
        Self { key, iv }
    }

    pub fn encrypt(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let key = &self.key;
        let iv = &self.iv;
        let enc = Aes128CbcEnc::new(key.into(), iv.into());

        let mut buf = vec![0; data.len() + 16];
        let len = enc
            .encrypt_padded_b2b_mut::<Pkcs7>(data, &mut buf)
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "cipher buffer too small"))?
            .len();
        buf.truncate(len);
        Ok(buf)
    }

    pub fn decrypt(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let key = &self.key;
        let iv = &self.iv;
        let dec = Aes128CbcDec::new(key.into(), iv.into());

        let mut buf = vec![0; data.len()];
        let len = dec
            .decrypt_padded_b2b_mut::<Pkcs7>(data, &mut buf)
            .map_err(|_| Error::new(ErrorKind::InvalidData, "bad cipher block"))?
            .len();
        buf.truncate(len);
        Ok(buf)
    }
}
