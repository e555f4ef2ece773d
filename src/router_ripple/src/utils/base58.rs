use bs58;
use bs58::Alphabet;

/// Encode bytes as base58 string to match Ripple's alphabet
pub fn encode_wallet_address(bytes: &[u8]) -> String {
    bs58::encode(bytes).with_alphabet(Alphabet::RIPPLE).into_string()
}

/// Decode a base58 string written in Ripple's alphabet
pub fn decode_wallet_address(address: &str) -> Result<Vec<u8>, bs58::decode::Error> {
    bs58::decode(address).with_alphabet(Alphabet::RIPPLE).into_vec()
}
