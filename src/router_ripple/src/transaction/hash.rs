use sha2::{Digest, Sha512};

/// Prefix of the data that gets signed: `STX\0`.
pub const SIGNING_PREFIX: [u8; 4] = [0x53, 0x54, 0x58, 0x00];
/// Prefix of the data hashed into the transaction ID: `TXN\0`.
pub const TRANSACTION_ID_PREFIX: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// First 32 bytes of SHA-512 over the concatenated parts.
pub fn sha512_half(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(&SIGNING_PREFIX, b"STX\0");
        assert_eq!(&TRANSACTION_ID_PREFIX, b"TXN\0");
    }

    #[test]
    fn test_sha512_half_of_empty_input() {
        assert_eq!(
            hex::encode(sha512_half(&[])),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce"
        );
    }

    #[test]
    fn test_parts_are_concatenated() {
        assert_eq!(sha512_half(&[b"ab", b"c"]), sha512_half(&[b"abc"]));
    }
}
