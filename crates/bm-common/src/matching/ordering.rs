use std::cmp::Ordering;

use sha2::{Digest, Sha256};

/// Fields the comparator needs from a ranked entry.
pub trait Rankable {
    fn score(&self) -> f64;
    fn tie_break(&self) -> u32;
    fn counterparty_id(&self) -> &str;
}

/// Stable secondary key for a pair: the first four bytes of
/// `sha256("{assignment_id}:{candidate_id}")`, big-endian.
pub fn tie_breaker(assignment_id: &str, candidate_id: &str) -> u32 {
    let digest = Sha256::digest(format!("{assignment_id}:{candidate_id}").as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Score descending, then tie-break ascending, then counterparty id ascending.
pub fn compare_matches<T: Rankable>(a: &T, b: &T) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.tie_break().cmp(&b.tie_break()))
        .then_with(|| a.counterparty_id().cmp(b.counterparty_id()))
}
