use siphasher::sip::SipHasher13;
use std::hash::Hasher;

use super::Fingerprint;

/// Seed shared by every filter. Filters only interoperate through
/// encode/decode if they agree on it, so it is never configurable.
pub const HASH_SEED: u64 = 1337;

/// Fingerprints live in `[1, 2^16 - 1]`; zero is the empty slot.
const FINGERPRINT_MODULUS: u64 = (1 << Fingerprint::BITS) - 1;

#[inline]
pub fn hash(data: &[u8]) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(HASH_SEED, HASH_SEED);
    hasher.write(data);
    hasher.finish()
}

/// Derive a fingerprint from the low bits of `hash`. The `+ 1` fold keeps
/// zero out of the range and must stay as is, encoded filters depend on it.
#[inline]
pub fn fingerprint(hash: u64) -> Fingerprint {
    (hash % FINGERPRINT_MODULUS + 1) as Fingerprint
}

#[inline]
fn reduce(value: u64, num_buckets: usize) -> usize {
    debug_assert!(num_buckets > 0);
    if num_buckets.is_power_of_two() {
        (value & (num_buckets as u64 - 1)) as usize
    } else {
        (value % num_buckets as u64) as usize
    }
}

/// Primary bucket index and fingerprint of `data`, both taken from one hash:
/// the fingerprint from the low bits, the index from the high 32 bits.
#[inline]
pub fn index_and_fingerprint(data: &[u8], num_buckets: usize) -> (usize, Fingerprint) {
    let hash = hash(data);
    (reduce(hash >> 32, num_buckets), fingerprint(hash))
}

pub fn primary_index(data: &[u8], num_buckets: usize) -> usize {
    index_and_fingerprint(data, num_buckets).0
}

/// The other bucket `fingerprint` may live in. Self-inverse for power of two
/// bucket counts: `alternate_index(fp, alternate_index(fp, i, n), n) == i`.
#[inline]
pub fn alternate_index(fingerprint: Fingerprint, index: usize, num_buckets: usize) -> usize {
    reduce(index as u64 ^ hash(&fingerprint.to_le_bytes()), num_buckets)
}

/// Rounds up to the next power of two, 0 maps to 1.
pub fn next_pow2(n: usize) -> usize {
    n.next_power_of_two()
}
