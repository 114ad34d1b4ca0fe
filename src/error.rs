use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("expected bytes to be a multiple of {bucket_bytes}, got {len}")]
    InvalidLength { len: usize, bucket_bytes: usize },

    #[error("bucket count must be a non-zero power of two, got {0}")]
    InvalidBucketCount(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot allocate {num_buckets} buckets")]
    AllocationFailed { num_buckets: usize },
}
