use super::{Fingerprint, BUCKET_SIZE, EMPTY};

/// Number of bytes one bucket occupies in the encoded form.
pub const BUCKET_BYTES: usize = BUCKET_SIZE * std::mem::size_of::<Fingerprint>();

/// A fixed group of fingerprint slots. `EMPTY` marks a free slot; occupied
/// slots are unordered and may hold duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket([Fingerprint; BUCKET_SIZE]);

impl Bucket {
    /// Writes `fingerprint` into the first free slot. A full bucket is not an
    /// error, the caller just has to look elsewhere.
    pub fn insert(&mut self, fingerprint: Fingerprint) -> bool {
        for slot in self.0.iter_mut() {
            if *slot == EMPTY {
                *slot = fingerprint;
                return true;
            }
        }
        false
    }

    /// Clears the first slot holding `fingerprint`. Duplicates survive.
    pub fn delete(&mut self, fingerprint: Fingerprint) -> bool {
        match self.fingerprint_index(fingerprint) {
            Some(slot) => {
                self.0[slot] = EMPTY;
                true
            }
            None => false,
        }
    }

    pub fn fingerprint_index(&self, fingerprint: Fingerprint) -> Option<usize> {
        self.0
            .iter()
            .position(|slot| *slot != EMPTY && *slot == fingerprint)
    }

    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.fingerprint_index(fingerprint).is_some()
    }

    /// Puts `fingerprint` into `slot`, handing back whatever was there.
    pub fn swap(&mut self, slot: usize, fingerprint: Fingerprint) -> Fingerprint {
        std::mem::replace(&mut self.0[slot], fingerprint)
    }

    pub fn reset(&mut self) {
        self.0 = [EMPTY; BUCKET_SIZE];
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|slot| **slot != EMPTY).count()
    }

    #[cfg(test)]
    pub fn slots(&self) -> &[Fingerprint; BUCKET_SIZE] {
        &self.0
    }

    pub fn write_le_bytes(&self, out: &mut Vec<u8>) {
        for fingerprint in &self.0 {
            out.extend_from_slice(&fingerprint.to_le_bytes());
        }
    }

    /// Reads a bucket from exactly `BUCKET_BYTES` little-endian bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), BUCKET_BYTES);
        let mut bucket = Bucket::default();
        for (slot, raw) in bucket.0.iter_mut().zip(bytes.chunks_exact(2)) {
            *slot = Fingerprint::from_le_bytes([raw[0], raw[1]]);
        }
        bucket
    }
}

#[cfg(test)]
impl From<[Fingerprint; BUCKET_SIZE]> for Bucket {
    fn from(slots: [Fingerprint; BUCKET_SIZE]) -> Self {
        Bucket(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::Bucket;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_fills_first_free_slot() {
        let mut bucket = Bucket::from([7, 0, 9, 0]);
        assert!(bucket.insert(3));
        assert_eq!(bucket, Bucket::from([7, 3, 9, 0]));
        assert!(bucket.insert(4));
        assert!(!bucket.insert(5), "a full bucket must reject");
        assert_eq!(bucket.len(), 4);
    }

    #[test]
    fn delete_removes_a_single_duplicate() {
        let mut bucket = Bucket::from([42, 42, 0, 1]);
        assert!(bucket.delete(42));
        assert_eq!(bucket, Bucket::from([0, 42, 0, 1]));
        assert!(bucket.delete(42));
        assert!(!bucket.delete(42));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn fingerprint_index_ignores_empty_slots() {
        let bucket = Bucket::from([0, 5, 0, 6]);
        assert_eq!(bucket.fingerprint_index(6), Some(3));
        assert_eq!(bucket.fingerprint_index(0), None);
        assert_eq!(bucket.fingerprint_index(7), None);
    }

    #[test]
    fn reset() {
        let mut bucket = Bucket::from([0, 1, 2, 3]);
        bucket.reset();
        assert_eq!(bucket, Bucket::default());
        assert_eq!(bucket.len(), 0);
    }

    #[test]
    fn swap_returns_evicted_fingerprint() {
        let mut bucket = Bucket::from([10, 11, 12, 13]);
        assert_eq!(bucket.swap(2, 99), 12);
        assert_eq!(bucket.slots(), &[10, 11, 99, 13]);
    }

    #[test]
    fn le_bytes_layout() {
        let bucket = Bucket::from([0x0102, 0, 0xffff, 1]);
        let mut bytes = vec![];
        bucket.write_le_bytes(&mut bytes);
        assert_eq!(bytes, vec![0x02, 0x01, 0, 0, 0xff, 0xff, 0x01, 0x00]);
        assert_eq!(Bucket::from_le_bytes(&bytes), bucket);
    }
}
