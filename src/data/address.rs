use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};

/// Length of the public-key part of an address.
const KEY_LEN: usize = 32;
/// Length of the checksum appended before base32 encoding.
const CHECKSUM_LEN: usize = 4;
/// Length of the text form: 36 bytes base32-encoded without padding.
const ENCODED_LEN: usize = 58;

/// A 32-byte Algorand account address.
///
/// The text form is the RFC 4648 base32 encoding (uppercase, no padding)
/// of the key bytes followed by a 4-byte checksum. The checksum is the
/// last 4 bytes of the SHA-512/256 digest of the key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; KEY_LEN]);

impl Address {
    /// Derive the account address owned by an application.
    ///
    /// address = SHA-512/256("appID" || big-endian application id),
    /// per the ledger's application-account convention. This is where a
    /// listing's escrowed asset units and sale proceeds live.
    pub fn for_application(app_id: u64) -> Address {
        let mut hasher = Sha512_256::new();
        hasher.update(b"appID");
        hasher.update(app_id.to_be_bytes());
        Address(hasher.finalize().into())
    }

    fn checksum(key: &[u8; KEY_LEN]) -> [u8; CHECKSUM_LEN] {
        let digest = Sha512_256::digest(key);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&digest[KEY_LEN - CHECKSUM_LEN..]);
        checksum
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = [0u8; KEY_LEN + CHECKSUM_LEN];
        raw[..KEY_LEN].copy_from_slice(&self.0);
        raw[KEY_LEN..].copy_from_slice(&Self::checksum(&self.0));
        f.write_str(&BASE32_NOPAD.encode(&raw))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// Why an address string failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressParseError {
    Length(usize),
    Encoding,
    Checksum,
}

impl fmt::Display for AddressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressParseError::Length(len) => {
                write!(f, "expected {ENCODED_LEN} characters, got {len}")
            }
            AddressParseError::Encoding => write!(f, "not valid base32"),
            AddressParseError::Checksum => write!(f, "checksum mismatch"),
        }
    }
}

impl std::error::Error for AddressParseError {}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ENCODED_LEN {
            return Err(AddressParseError::Length(s.len()));
        }
        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|_| AddressParseError::Encoding)?;
        if raw.len() != KEY_LEN + CHECKSUM_LEN {
            return Err(AddressParseError::Encoding);
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&raw[..KEY_LEN]);
        if raw[KEY_LEN..] != Self::checksum(&key) {
            return Err(AddressParseError::Checksum);
        }
        Ok(Address(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_length() {
        let addr = Address([0x07; 32]);
        assert_eq!(addr.to_string().len(), ENCODED_LEN);
    }

    #[test]
    fn test_round_trip() {
        let addr = Address([0xab; 32]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let mut s = Address([0x11; 32]).to_string();
        // Change one character in the key region so the checksum no longer matches
        let replacement = if s.as_bytes()[10] == b'A' { 'B' } else { 'A' };
        s.replace_range(10..11, &replacement.to_string());
        assert_eq!(s.parse::<Address>(), Err(AddressParseError::Checksum));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!("".parse::<Address>(), Err(AddressParseError::Length(0)));
        assert_eq!(
            "ABCDEF".parse::<Address>(),
            Err(AddressParseError::Length(6))
        );
    }

    #[test]
    fn test_invalid_alphabet_rejected() {
        // '1' and '0' are not in the RFC 4648 base32 alphabet
        let s = "1".repeat(ENCODED_LEN);
        assert_eq!(s.parse::<Address>(), Err(AddressParseError::Encoding));
    }

    #[test]
    fn test_lowercase_rejected() {
        let s = Address([0x22; 32]).to_string().to_lowercase();
        assert_eq!(s.parse::<Address>(), Err(AddressParseError::Encoding));
    }

    #[test]
    fn test_application_address_deterministic() {
        assert_eq!(Address::for_application(1), Address::for_application(1));
        assert_ne!(Address::for_application(1), Address::for_application(2));
    }

    #[test]
    fn test_application_address_round_trip() {
        let addr = Address::for_application(1002);
        assert_eq!(addr.to_string().len(), ENCODED_LEN);
        assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
    }
}
