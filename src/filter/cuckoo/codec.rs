//! Binary form of a filter: every slot as a little-endian `u16`, bucket by
//! bucket. No header, the length alone determines the bucket count.

use rand::{Rng, SeedableRng};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::debug;

use super::bucket::{Bucket, BUCKET_BYTES};
use super::{CuckooFilter, DefaultRng};
use crate::{FilterError, Result};

impl<R> CuckooFilter<R> {
    /// Returns a byte vector of `num_buckets * BUCKET_SIZE * 2` bytes
    /// representing the filter. Empty slots encode as zero.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.num_buckets() * BUCKET_BYTES);
        for bucket in self.buckets() {
            bucket.write_le_bytes(&mut bytes);
        }
        bytes
    }
}

impl CuckooFilter {
    /// Rebuilds a filter from `encode` output. The count is recomputed from
    /// the slots, nothing in the input is trusted for it.
    ///
    /// # Errors
    ///
    /// `FilterError::InvalidLength` if `bytes` is not a whole number of
    /// buckets. `FilterError::InvalidBucketCount` if the bucket count is zero or
    /// not a power of two, e.g. for 24 bytes, since `encode` never produces those.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with_rng(bytes, DefaultRng::seed_from_u64(rand::random()))
    }
}

impl<R: Rng> CuckooFilter<R> {
    /// `decode` with an explicit eviction RNG. Fails the same way.
    pub fn decode_with_rng(bytes: &[u8], rng: R) -> Result<Self> {
        let buckets = decode_buckets(bytes)?;
        let filter = Self::from_buckets(buckets, rng);
        debug!(
            num_buckets = filter.num_buckets(),
            count = filter.count(),
            "decoded cuckoo filter"
        );
        Ok(filter)
    }
}

fn decode_buckets(bytes: &[u8]) -> Result<Vec<Bucket>> {
    if bytes.len() % BUCKET_BYTES != 0 {
        return Err(FilterError::InvalidLength {
            len: bytes.len(),
            bucket_bytes: BUCKET_BYTES,
        });
    }
    // alternate indices only round-trip on power of two bucket counts
    let num_buckets = bytes.len() / BUCKET_BYTES;
    if !num_buckets.is_power_of_two() {
        return Err(FilterError::InvalidBucketCount(num_buckets));
    }
    Ok(bytes
        .chunks_exact(BUCKET_BYTES)
        .map(Bucket::from_le_bytes)
        .collect())
}

/// Serialized as one byte string holding the `encode` output.
impl<R> Serialize for CuckooFilter<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.encode())
    }
}

impl<'de> Deserialize<'de> for CuckooFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_bytes(EncodedFilterVisitor)
    }
}

struct EncodedFilterVisitor;

impl<'de> Visitor<'de> for EncodedFilterVisitor {
    type Value = CuckooFilter;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an encoded cuckoo filter")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Self::Value, E> {
        CuckooFilter::decode(v).map_err(E::custom)
    }

    // self-describing formats without a bytes type hand us a sequence
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        CuckooFilter::decode(&bytes).map_err(de::Error::custom)
    }
}
