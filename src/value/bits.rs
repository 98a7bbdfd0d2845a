//! Fixed-width per-field bitsets

/// One bit per field number, sized at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBits {
    words: Vec<u64>,
    len: usize,
}

impl FieldBits {
    /// Creates an all-clear bitset for `len` fields.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of fields covered
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit for `field`; out-of-range fields read as clear.
    pub fn get(&self, field: usize) -> bool {
        field < self.len && self.words[field / 64] & (1 << (field % 64)) != 0
    }

    /// Sets the bit for `field`. Out-of-range fields are ignored.
    pub fn set(&mut self, field: usize) {
        if field < self.len {
            self.words[field / 64] |= 1 << (field % 64);
        }
    }

    /// Clears the bit for `field`. Out-of-range fields are ignored.
    pub fn clear(&mut self, field: usize) {
        if field < self.len {
            self.words[field / 64] &= !(1 << (field % 64));
        }
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Set field numbers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |f| self.get(*f))
    }
}
