//! # Cuckoo Filter
//!
//! A probabilistic set-membership filter answering "have I seen this before?"
//! in constant time with a bounded false positive rate. Unlike a Bloom filter,
//! items can be deleted again.
//!
//! Each item is reduced to a 16 bit fingerprint that may live in one of two
//! buckets of 4 slots. When both are full, an insert evicts a random resident
//! to its other bucket, and so on, for at most 500 steps. The filter
//! serializes to a flat little-endian byte buffer and back.
//!
//! ```
//! use cuckoo_filter::CuckooFilter;
//!
//! let mut cf = CuckooFilter::new(1000);
//! cf.insert(b"pizza");
//! cf.insert(b"tacos");
//! cf.insert(b"tacos"); // re-insertion is possible
//!
//! assert!(cf.lookup(b"pizza"));
//! assert!(!cf.lookup(b"missing"));
//!
//! let copy = CuckooFilter::decode(&cf.encode()).unwrap();
//! assert_eq!(copy.count(), 3);
//!
//! cf.reset();
//! assert!(!cf.lookup(b"pizza"));
//! ```
//!
//! The filter does no locking of its own. Share it between threads behind a
//! `Mutex` or `RwLock`.

mod error;
pub mod filter;

pub use error::{FilterError, Result};
pub use filter::cuckoo::config::{
    FilterConfig, FilterConfigBuilder, FilterConfigBuilderError, MAX_CAPACITY,
};
pub use filter::cuckoo::hash::{
    alternate_index, fingerprint, index_and_fingerprint, next_pow2, primary_index, HASH_SEED,
};
pub use filter::cuckoo::{CuckooFilter, DefaultRng, Fingerprint, BUCKET_SIZE, MAX_KICKS};
pub use filter::Filter;
