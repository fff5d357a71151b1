//! Sibling order keys.
//!
//! Keys are two characters for the first 900 siblings: a block letter `a`..`y`
//! followed by one of 36 digits `0-9A-Z` (`a0`, `a1`, ... `aZ`, `b0`, ...).
//! Past that the key widens to `z` + the key of the remaining offset, which
//! keeps byte-wise ordering strictly increasing without renumbering.

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BLOCK_LETTERS: &[u8; 25] = b"abcdefghijklmnopqrstuvwxy";
const BLOCK_SIZE: usize = DIGITS.len();
const TWO_CHAR_CAPACITY: usize = BLOCK_LETTERS.len() * BLOCK_SIZE;
const WIDEN_PREFIX: char = 'z';

/// Order key for the sibling at `index` (zero-based).
pub fn key_for(index: usize) -> String {
    let mut key = String::new();
    let mut remaining = index;
    while remaining >= TWO_CHAR_CAPACITY {
        key.push(WIDEN_PREFIX);
        remaining -= TWO_CHAR_CAPACITY;
    }
    key.push(BLOCK_LETTERS[remaining / BLOCK_SIZE] as char);
    key.push(DIGITS[remaining % BLOCK_SIZE] as char);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keys_follow_platform_sequence() {
        assert_eq!(key_for(0), "a0");
        assert_eq!(key_for(1), "a1");
        assert_eq!(key_for(9), "a9");
        assert_eq!(key_for(10), "aA");
        assert_eq!(key_for(35), "aZ");
        assert_eq!(key_for(36), "b0");
        assert_eq!(key_for(108), "d0");
    }

    #[test]
    fn keys_sort_like_indices() {
        let keys: Vec<String> = (0..2_000).map(key_for).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(sorted, keys);
    }

    #[test]
    fn widens_after_two_character_space() {
        assert_eq!(key_for(TWO_CHAR_CAPACITY - 1), "yZ");
        assert_eq!(key_for(TWO_CHAR_CAPACITY), "za0");
        assert_eq!(key_for(2 * TWO_CHAR_CAPACITY), "zza0");
    }
}
