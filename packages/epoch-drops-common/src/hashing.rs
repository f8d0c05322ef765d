use sha2::{Digest, Sha256};

/// Leading zero bits of every nibble value, indexed by the nibble.
const NIBBLE_LZ_BITS: [u16; 16] = [4, 3, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0];

/// Lowercase hex rendering of `data`.
pub fn hex_to_str(data: &[u8]) -> String {
    hex::encode(data)
}

/// Parse a 64-char hex string into a 32-byte digest.
pub fn str_to_hash(value: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(value).ok()?;
    bytes.try_into().ok()
}

/// Number of leading `'0'` characters of a hex string (4-bit granularity).
pub fn clz_hex(hex_string: &str) -> u16 {
    hex_string.chars().take_while(|c| *c == '0').count() as u16
}

/// Number of leading zero bits of a digest (1-bit granularity).
///
/// Returns 256 for the all-zero digest.
pub fn clz_binary(digest: &[u8; 32]) -> u16 {
    let mut bits = 0u16;
    for byte in digest {
        if *byte == 0 {
            bits += 8;
            continue;
        }
        let high = (byte >> 4) as usize;
        let low = (byte & 0x0F) as usize;
        bits += if high != 0 {
            NIBBLE_LZ_BITS[high]
        } else {
            4 + NIBBLE_LZ_BITS[low]
        };
        return bits;
    }
    bits
}

/// `sha256(preimage)`, the value an oracle commits to before revealing.
pub fn commitment(preimage: &str) -> [u8; 32] {
    Sha256::digest(preimage.as_bytes()).into()
}

/// Combine an epoch seed with arbitrary data.
///
/// `hash = sha256( hex(seed) || data )`
pub fn hash(seed: &[u8; 32], data: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(hex_to_str(seed).as_bytes());
    hasher.update(data.as_bytes());
    hasher.finalize().into()
}

/// Digest of a single work item under an epoch seed. The id is rendered in decimal.
pub fn hash_item(seed: &[u8; 32], item_id: u64) -> [u8; 32] {
    hash(seed, &item_id.to_string())
}

/// Digest of a whole batch: the decimal ids are concatenated in batch order.
pub fn hash_items(seed: &[u8; 32], item_ids: &[u64]) -> [u8; 32] {
    let data: String = item_ids.iter().map(|id| id.to_string()).collect();
    hash(seed, &data)
}
