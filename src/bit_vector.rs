//! Dense, fixed-size bit set over `[0, size)`.
//!
//! Storage searches and overlay mappings hand results around as
//! [`BitVector`]s: one bit per candidate position, visited in index order.
//! The size is fixed at construction; use [`BitVectorBuilder`] to grow one
//! bit at a time.

use arrow::buffer::BooleanBuffer;

const WORD_BITS: u32 = u64::BITS;

#[inline]
fn word_count(size: u32) -> usize {
    size.div_ceil(WORD_BITS) as usize
}

#[inline]
fn split(index: u32) -> (usize, u32) {
    ((index / WORD_BITS) as usize, index % WORD_BITS)
}

/// Offset of the `n`-th set bit of `word`.
fn select_in_word(mut word: u64, n: u32) -> u32 {
    for _ in 0..n {
        word &= word - 1;
    }
    word.trailing_zeros()
}

/// Fixed-size ordered sequence of booleans backed by 64-bit words.
///
/// Bits past `size` in the last word are always zero.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct BitVector {
    words: Vec<u64>,
    size: u32,
}

impl BitVector {
    /// Creates a bit vector of `size` bits, all set to `value`.
    #[must_use]
    pub fn new(size: u32, value: bool) -> Self {
        let fill = if value { u64::MAX } else { 0 };
        let mut bv = Self {
            words: vec![fill; word_count(size)],
            size,
        };
        bv.clear_tail();
        bv
    }

    /// Creates a bit vector of `size` bits with exactly the given positions set.
    ///
    /// # Panics
    ///
    /// Panics if any position is `>= size`.
    #[must_use]
    pub fn from_set_positions<I>(size: u32, positions: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut bv = Self::new(size, false);
        for position in positions {
            bv.set(position);
        }
        bv
    }

    /// Number of bits, set or unset.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether the vector holds zero bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether bit `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[must_use]
    pub fn is_set(&self, index: u32) -> bool {
        assert!(index < self.size, "bit {index} out of bounds ({})", self.size);
        let (word, bit) = split(index);
        self.words[word] & (1u64 << bit) != 0
    }

    /// Sets bit `index`.
    pub fn set(&mut self, index: u32) {
        assert!(index < self.size, "bit {index} out of bounds ({})", self.size);
        let (word, bit) = split(index);
        self.words[word] |= 1u64 << bit;
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_set_bits(&self) -> u32 {
        self.words.iter().map(|word| word.count_ones()).sum()
    }

    /// Number of set bits in `[0, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `end > size`.
    #[must_use]
    pub fn count_set_bits_until(&self, end: u32) -> u32 {
        assert!(end <= self.size, "rank end {end} out of bounds ({})", self.size);
        let (word, bit) = split(end);
        let full: u32 = self.words[..word].iter().map(|w| w.count_ones()).sum();
        if bit == 0 {
            full
        } else {
            full + (self.words[word] & ((1u64 << bit) - 1)).count_ones()
        }
    }

    /// Position of the `n`-th set bit (zero-based).
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n + 1` bits are set.
    #[must_use]
    pub fn index_of_nth_set(&self, n: u32) -> u32 {
        let mut remaining = n;
        for (word_idx, word) in self.words.iter().enumerate() {
            let ones = word.count_ones();
            if remaining < ones {
                return word_idx as u32 * WORD_BITS + select_in_word(*word, remaining);
            }
            remaining -= ones;
        }
        panic!("bit vector has fewer than {} set bits", n + 1);
    }

    /// Positions of the set bits ranked `ranks`, in input order.
    ///
    /// Builds per-word cumulative counts once, so each lookup is a binary
    /// search instead of a scan from the first word.
    ///
    /// # Panics
    ///
    /// Panics if any rank is not below the number of set bits.
    #[must_use]
    pub fn indices_of_nth_set(&self, ranks: &[u32]) -> Vec<u32> {
        let mut total = 0u32;
        let starts: Vec<u32> = self
            .words
            .iter()
            .map(|word| {
                let start = total;
                total += word.count_ones();
                start
            })
            .collect();
        ranks
            .iter()
            .map(|&n| {
                assert!(n < total, "bit vector has fewer than {} set bits", n + 1);
                let word_idx = starts.partition_point(|&start| start <= n) - 1;
                word_idx as u32 * WORD_BITS
                    + select_in_word(self.words[word_idx], n - starts[word_idx])
            })
            .collect()
    }

    /// Visits every position in ascending order as `(index, is_set)`.
    pub fn iterate_all_bits(&self) -> AllBitsIter<'_> {
        AllBitsIter {
            bv: self,
            next: 0,
        }
    }

    /// Visits the set positions in ascending order.
    pub fn iterate_set_bits(&self) -> SetBitsIter<'_> {
        SetBitsIter {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Visits the unset positions in ascending order.
    pub fn iterate_unset_bits(&self) -> impl Iterator<Item = u32> + '_ {
        self.iterate_all_bits()
            .filter_map(|(index, set)| (!set).then_some(index))
    }

    /// Copy of this vector shifted right by `offset` positions: bit `i`
    /// becomes bit `i + offset` and the first `offset` bits are unset.
    #[must_use]
    pub fn with_offset(&self, offset: u32) -> BitVector {
        if offset == 0 {
            return self.clone();
        }
        BitVector::from_set_positions(
            offset + self.size,
            self.iterate_set_bits().map(|index| index + offset),
        )
    }

    fn clear_tail(&mut self) {
        let tail = self.size % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("size", &self.size)
            .field("set", &self.iterate_set_bits().collect::<Vec<_>>())
            .finish()
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut builder = BitVectorBuilder::default();
        for bit in iter {
            builder.append(bit);
        }
        builder.build()
    }
}

impl From<&BooleanBuffer> for BitVector {
    fn from(buffer: &BooleanBuffer) -> Self {
        buffer.iter().collect()
    }
}

/// Append-only builder producing a [`BitVector`].
#[derive(Debug, Default)]
pub struct BitVectorBuilder {
    words: Vec<u64>,
    size: u32,
}

impl BitVectorBuilder {
    /// Builder with room for `capacity` bits.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            words: Vec::with_capacity(word_count(capacity)),
            size: 0,
        }
    }

    /// Appends one bit.
    pub fn append(&mut self, value: bool) {
        let (word, bit) = split(self.size);
        if word == self.words.len() {
            self.words.push(0);
        }
        if value {
            self.words[word] |= 1u64 << bit;
        }
        self.size += 1;
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> BitVector {
        BitVector {
            words: self.words,
            size: self.size,
        }
    }
}

/// Iterator over `(index, is_set)` pairs; see [`BitVector::iterate_all_bits`].
#[derive(Clone, Debug)]
pub struct AllBitsIter<'a> {
    bv: &'a BitVector,
    next: u32,
}

impl Iterator for AllBitsIter<'_> {
    type Item = (u32, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.bv.size {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((index, self.bv.is_set(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bv.size - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AllBitsIter<'_> {}

/// Iterator over set positions; see [`BitVector::iterate_set_bits`].
#[derive(Clone, Debug)]
pub struct SetBitsIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for SetBitsIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros();
                self.current &= self.current - 1;
                return Some(self.word_idx as u32 * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}
