pub(crate) mod bucket;
pub mod codec;
pub mod config;
pub mod hash;

use crate::filter::Filter;
use crate::{FilterError, Result};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use bucket::Bucket;
use config::{FilterConfig, MAX_CAPACITY};
use hash::{alternate_index, index_and_fingerprint, next_pow2};

/// 16 bit fingerprint, `EMPTY` marks a free slot.
pub type Fingerprint = u16;

pub const EMPTY: Fingerprint = 0;

/// Each bucket holds 4 fingerprints
pub const BUCKET_SIZE: usize = 4;

/// Relocation steps an insert takes before declaring the filter full.
pub const MAX_KICKS: usize = 500;

/// Above this utilization of the rounded bucket array we double it once more.
const MAX_LOAD_FACTOR: f64 = 0.96;

/// Fast, non-cryptographic RNG used for eviction choices.
pub type DefaultRng = Xoshiro256PlusPlus;

// lingo:
// - bucket: as in the cuckoo paper, a group of BUCKET_SIZE slots. A fingerprint can live in one
//   of two buckets, its primary and alternate bucket.
// - slot: a single place in a bucket, holding one fingerprint or EMPTY.
// - kick: evicting a fingerprint to its alternate bucket to make room.
#[derive(Debug, Clone)]
pub struct CuckooFilter<R = DefaultRng> {
    buckets: Vec<Bucket>,
    count: usize, // number of occupied slots across all buckets
    max_kicks: usize,
    rng: R,
}

/// Number of buckets needed for `capacity` items: a power of two, doubled
/// once more when the items would fill it beyond `MAX_LOAD_FACTOR`.
fn bucket_count(capacity: usize) -> usize {
    let mut num_buckets = next_pow2(capacity / BUCKET_SIZE);
    if capacity as f64 / (num_buckets * BUCKET_SIZE) as f64 > MAX_LOAD_FACTOR {
        num_buckets <<= 1;
    }
    num_buckets
}

impl CuckooFilter {
    /// Creates a filter sized for `capacity` items. A capacity of 1_000_000 is a
    /// normal default and takes about 8 MiB. Inserting more items than the
    /// capacity makes inserts slow and eventually fail.
    pub fn new(capacity: usize) -> Self {
        let rng = DefaultRng::seed_from_u64(rand::random());
        Self::with_rng(capacity, rng)
    }

    pub fn with_config(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => DefaultRng::seed_from_u64(seed),
            None => DefaultRng::seed_from_u64(rand::random()),
        };
        let mut filter = Self::try_with_rng(config.capacity, rng)?;
        filter.max_kicks = config.max_kicks;
        Ok(filter)
    }
}

impl<R: Rng> CuckooFilter<R> {
    /// Creates a filter sized for `capacity` items which draws eviction choices
    /// from `rng`. Capacities above `MAX_CAPACITY` are clamped.
    ///
    /// Like any `Vec`, this aborts if the bucket array cannot be allocated.
    /// Use `try_with_rng` or `CuckooFilter::with_config` to get an error instead.
    pub fn with_rng(capacity: usize, rng: R) -> Self {
        let num_buckets = bucket_count(capacity.min(MAX_CAPACITY));
        debug!(capacity, num_buckets, "creating cuckoo filter");
        Self::from_buckets(vec![Bucket::default(); num_buckets], rng)
    }

    /// Like `with_rng`, but reports `FilterError::AllocationFailed` when the
    /// bucket array does not fit into memory.
    pub fn try_with_rng(capacity: usize, rng: R) -> Result<Self> {
        let num_buckets = bucket_count(capacity.min(MAX_CAPACITY));
        debug!(capacity, num_buckets, "creating cuckoo filter");
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(num_buckets)
            .map_err(|_| FilterError::AllocationFailed { num_buckets })?;
        buckets.resize(num_buckets, Bucket::default());
        Ok(Self::from_buckets(buckets, rng))
    }

    /// Wraps an existing bucket array, recounting the occupied slots.
    pub(crate) fn from_buckets(buckets: Vec<Bucket>, rng: R) -> Self {
        let count = buckets.iter().map(Bucket::len).sum();
        CuckooFilter {
            buckets,
            count,
            max_kicks: MAX_KICKS,
            rng,
        }
    }

    /// Returns true if `data` may be in the filter. False positives are
    /// possible, false negatives are not for items that were inserted
    /// successfully and not deleted since.
    pub fn lookup(&self, data: &[u8]) -> bool {
        let (i1, fingerprint) = index_and_fingerprint(data, self.num_buckets());
        let i2 = alternate_index(fingerprint, i1, self.num_buckets());
        self.buckets[i1].contains(fingerprint) || self.buckets[i2].contains(fingerprint)
    }

    /// Inserts `data`, returning false when the filter is too full to place it.
    /// Re-inserting an item stores its fingerprint again.
    ///
    /// A failed insert still leaves the filter consistent, but the fingerprint
    /// that was in flight when the walk gave up is dropped. That may be one of
    /// the previously inserted items.
    pub fn insert(&mut self, data: &[u8]) -> bool {
        let (i1, fingerprint) = index_and_fingerprint(data, self.num_buckets());
        if self.insert_at(fingerprint, i1) {
            return true;
        }
        let i2 = alternate_index(fingerprint, i1, self.num_buckets());
        if self.insert_at(fingerprint, i2) {
            return true;
        }
        let start = if self.rng.gen::<bool>() { i1 } else { i2 };
        self.relocate(fingerprint, start)
    }

    fn insert_at(&mut self, fingerprint: Fingerprint, bucket: usize) -> bool {
        if self.buckets[bucket].insert(fingerprint) {
            self.count += 1;
            true
        } else {
            false
        }
    }

    /// Random walk: swap the homeless fingerprint into a random slot and try to
    /// seat the evicted one in its alternate bucket, up to `max_kicks` times.
    fn relocate(&mut self, mut fingerprint: Fingerprint, mut bucket: usize) -> bool {
        for _ in 0..self.max_kicks {
            let slot = self.rng.gen_range(0..BUCKET_SIZE);
            fingerprint = self.buckets[bucket].swap(slot, fingerprint);
            bucket = alternate_index(fingerprint, bucket, self.num_buckets());
            if self.insert_at(fingerprint, bucket) {
                return true;
            }
        }
        debug!(
            max_kicks = self.max_kicks,
            count = self.count,
            "relocation exhausted, dropping in-flight fingerprint"
        );
        false
    }

    /// Deletes one occurrence of `data`. An item that was never inserted may
    /// collide with, and remove, an unrelated one.
    pub fn delete(&mut self, data: &[u8]) -> bool {
        let (i1, fingerprint) = index_and_fingerprint(data, self.num_buckets());
        let i2 = alternate_index(fingerprint, i1, self.num_buckets());
        self.delete_at(fingerprint, i1) || self.delete_at(fingerprint, i2)
    }

    fn delete_at(&mut self, fingerprint: Fingerprint, bucket: usize) -> bool {
        if self.buckets[bucket].delete(fingerprint) {
            self.count -= 1;
            true
        } else {
            false
        }
    }
}

impl<R> CuckooFilter<R> {
    /// Removes all items from the filter, setting count to 0.
    pub fn reset(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.reset();
        }
        self.count = 0;
        debug!(num_buckets = self.buckets.len(), "filter reset");
    }

    /// Number of stored fingerprints.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Fraction of slots in use, in `[0, 1]`. Inserts start failing as this
    /// approaches 0.95.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    pub(crate) fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }
}

/// Filters compare by content; the RNG state is not part of a filter's value.
impl<R, S> PartialEq<CuckooFilter<S>> for CuckooFilter<R> {
    fn eq(&self, other: &CuckooFilter<S>) -> bool {
        self.count == other.count && self.buckets == other.buckets
    }
}

impl<R: Rng> Filter for CuckooFilter<R> {
    fn insert(&mut self, data: &[u8]) -> bool {
        CuckooFilter::insert(self, data)
    }

    fn lookup(&self, data: &[u8]) -> bool {
        CuckooFilter::lookup(self, data)
    }

    fn delete(&mut self, data: &[u8]) -> bool {
        CuckooFilter::delete(self, data)
    }
}


#[cfg(test)]
mod occupancy_tests {
    use super::{CuckooFilter, DefaultRng, BUCKET_SIZE};
    use rand::SeedableRng;

    /// insert values into a cuckoo filter until it fails
    fn data_density(buckets: usize) -> (usize, f64) {
        let mut cf = CuckooFilter::with_rng(buckets * BUCKET_SIZE / 2, DefaultRng::seed_from_u64(7));
        assert_eq!(cf.num_buckets(), buckets);
        let mut inserted = 0;
        for i in 0..(buckets * BUCKET_SIZE) as u64 {
            if !cf.insert(&i.to_le_bytes()) {
                break;
            }
            inserted += 1;
        }
        (inserted, inserted as f64 / (buckets * BUCKET_SIZE) as f64)
    }

    #[test]
    /// the paper reports 95% occupancy for 4 entries per bucket
    fn four_entries() {
        // this has space for 4096 fingerprints
        let (inserted, occupancy) = data_density(1 << 10);
        eprintln!("tp;inserted: {}, occupancy {}", inserted, occupancy);
        assert!(occupancy > 0.90, "occupancy == {}, !> 0.90", occupancy);
    }

    #[test]
    fn bigger_table() {
        let (inserted, occupancy) = data_density(1 << 14);
        eprintln!("tp;inserted: {}, occupancy {}", inserted, occupancy);
        assert!(occupancy > 0.90, "occupancy == {}, !> 0.90", occupancy);
    }
}
