pub mod cuckoo;

/// Approximate set membership over byte strings, with deletion.
pub trait Filter {
    /// Returns false when the item could not be stored.
    fn insert(&mut self, data: &[u8]) -> bool;

    fn lookup(&self, data: &[u8]) -> bool;

    /// Returns false when no matching entry was found.
    fn delete(&mut self, data: &[u8]) -> bool;
}
