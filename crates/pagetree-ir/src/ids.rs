//! Node identifier generation.

use nanoid::nanoid;

const ALPHABET: [char; 62] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4',
    '5', '6', '7', '8', '9',
];

const TOKEN_LEN: usize = 10;
const LINK_TOKEN_LEN: usize = 5;

/// Source of node identifiers for one parse.
pub trait IdGenerator {
    /// A fresh identifier in the platform's `6Z-<token>-0` shape.
    fn next_id(&mut self) -> String;

    /// A fresh `link-<token>` id for inline anchors.
    fn next_link_id(&mut self) -> String;
}

/// Random identifiers; the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        format!("6Z-{}-0", nanoid!(TOKEN_LEN, &ALPHABET))
    }

    fn next_link_id(&mut self) -> String {
        format!("link-{}", nanoid!(LINK_TOKEN_LEN, &ALPHABET))
    }
}

/// Counter-based identifiers for reproducible output.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    node_counter: u64,
    link_counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            node_counter: 1,
            link_counter: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("6Z-{}-0", encode_base36(self.node_counter, TOKEN_LEN));
        self.node_counter += 1;
        id
    }

    fn next_link_id(&mut self) -> String {
        let id = format!("link-{}", encode_base36(self.link_counter, LINK_TOKEN_LEN));
        self.link_counter += 1;
        id
    }
}

fn encode_base36(mut value: u64, width: usize) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut buf = vec![b'0'; width];
    for ch in buf.iter_mut().rev() {
        *ch = DIGITS[(value % 36) as usize];
        value /= 36;
    }
    buf.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_ids_do_not_repeat() {
        let mut ids = RandomIds;
        let generated: HashSet<String> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 10_000);
    }

    #[test]
    fn random_ids_use_platform_shape() {
        let id = RandomIds.next_id();
        assert!(id.starts_with("6Z-"));
        assert!(id.ends_with("-0"));
        assert_eq!(id.len(), 3 + TOKEN_LEN + 2);
        assert!(id[3..3 + TOKEN_LEN].chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(RandomIds.next_link_id().starts_with("link-"));
    }

    #[test]
    fn sequential_ids_are_stable() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "6Z-0000000001-0");
        assert_eq!(ids.next_id(), "6Z-0000000002-0");
        assert_eq!(ids.next_link_id(), "link-00001");
        let mut again = SequentialIds::new();
        assert_eq!(again.next_id(), "6Z-0000000001-0");
    }
}
