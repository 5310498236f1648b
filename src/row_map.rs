//! The working set of table row indices a query narrows constraint by constraint.

use std::ops::Range;

use crate::bit_vector::{BitVector, SetBitsIter};

/// Ascending, duplicate-free set of row indices.
///
/// The representation is picked by whoever produces the map; every public
/// operation behaves identically for all three.
#[derive(Clone, Debug)]
pub enum RowMap {
    /// Every index in `[start, end)`.
    Range(Range<u32>),
    /// Every set position of the bit vector.
    Bits(BitVector),
    /// Explicit ascending indices.
    Indices(Vec<u32>),
}

impl RowMap {
    /// Map selecting all of `[0, row_count)`.
    #[must_use]
    pub fn full(row_count: u32) -> Self {
        RowMap::Range(0..row_count)
    }

    /// Map selecting `[range.start, range.end)`.
    #[must_use]
    pub fn from_range(range: Range<u32>) -> Self {
        if range.start >= range.end {
            return RowMap::Range(0..0);
        }
        RowMap::Range(range)
    }

    /// Map selecting the set positions of `bv`.
    #[must_use]
    pub fn from_bit_vector(bv: BitVector) -> Self {
        RowMap::Bits(bv)
    }

    /// Map selecting the given indices.
    ///
    /// # Panics
    ///
    /// Panics if `indices` is not strictly ascending.
    #[must_use]
    pub fn from_indices(indices: Vec<u32>) -> Self {
        assert!(
            indices.windows(2).all(|pair| pair[0] < pair[1]),
            "row map indices must be strictly ascending"
        );
        RowMap::Indices(indices)
    }

    /// Number of selected rows.
    #[must_use]
    pub fn size(&self) -> u32 {
        match self {
            RowMap::Range(range) => range.end - range.start,
            RowMap::Bits(bv) => bv.count_set_bits(),
            RowMap::Indices(indices) => indices.len() as u32,
        }
    }

    /// Whether no row is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            RowMap::Range(range) => range.start >= range.end,
            RowMap::Bits(bv) => bv.iterate_set_bits().next().is_none(),
            RowMap::Indices(indices) => indices.is_empty(),
        }
    }

    /// The `n`-th selected row (zero-based).
    ///
    /// # Panics
    ///
    /// Panics if `n >= size()`.
    #[must_use]
    pub fn get(&self, n: u32) -> u32 {
        match self {
            RowMap::Range(range) => {
                assert!(n < range.end - range.start, "row {n} out of bounds");
                range.start + n
            }
            RowMap::Bits(bv) => bv.index_of_nth_set(n),
            RowMap::Indices(indices) => indices[n as usize],
        }
    }

    /// Smallest selected row.
    #[must_use]
    pub fn first(&self) -> Option<u32> {
        match self {
            RowMap::Range(range) => (range.start < range.end).then_some(range.start),
            RowMap::Bits(bv) => bv.iterate_set_bits().next(),
            RowMap::Indices(indices) => indices.first().copied(),
        }
    }

    /// Largest selected row.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        match self {
            RowMap::Range(range) => (range.start < range.end).then(|| range.end - 1),
            RowMap::Bits(bv) => match bv.count_set_bits() {
                0 => None,
                count => Some(bv.index_of_nth_set(count - 1)),
            },
            RowMap::Indices(indices) => indices.last().copied(),
        }
    }

    /// `[first, last + 1)`, the tightest contiguous span covering the map.
    #[must_use]
    pub fn extent(&self) -> Option<Range<u32>> {
        Some(self.first()?..self.last()? + 1)
    }

    /// Whether `row` is selected.
    #[must_use]
    pub fn contains(&self, row: u32) -> bool {
        match self {
            RowMap::Range(range) => range.contains(&row),
            RowMap::Bits(bv) => row < bv.size() && bv.is_set(row),
            RowMap::Indices(indices) => indices.binary_search(&row).is_ok(),
        }
    }

    /// Selected rows in ascending order.
    pub fn iter(&self) -> RowMapIter<'_> {
        match self {
            RowMap::Range(range) => RowMapIter::Range(range.clone()),
            RowMap::Bits(bv) => RowMapIter::Bits(bv.iterate_set_bits()),
            RowMap::Indices(indices) => RowMapIter::Indices(indices.iter()),
        }
    }

    /// Selected rows collected into an ascending vector.
    #[must_use]
    pub fn to_index_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Keeps only the rows also selected by `other`.
    ///
    /// Two ranges stay a range; an index vector on either side yields an
    /// index vector; every other pairing yields a bit vector.
    pub fn intersect(&mut self, other: &RowMap) {
        let narrowed = match (&*self, other) {
            (RowMap::Range(lhs), RowMap::Range(rhs)) => {
                RowMap::from_range(lhs.start.max(rhs.start)..lhs.end.min(rhs.end))
            }
            (RowMap::Indices(lhs), _) => {
                RowMap::Indices(lhs.iter().copied().filter(|&row| other.contains(row)).collect())
            }
            (_, RowMap::Indices(rhs)) => {
                RowMap::Indices(rhs.iter().copied().filter(|&row| self.contains(row)).collect())
            }
            (RowMap::Range(range), RowMap::Bits(bv)) | (RowMap::Bits(bv), RowMap::Range(range)) => {
                let size = bv.size().min(range.end);
                RowMap::Bits(BitVector::from_set_positions(
                    size,
                    bv.iterate_set_bits()
                        .filter(|row| range.contains(row) && *row < size),
                ))
            }
            (RowMap::Bits(lhs), RowMap::Bits(rhs)) => {
                let size = lhs.size().min(rhs.size());
                RowMap::Bits(BitVector::from_set_positions(
                    size,
                    lhs.iterate_set_bits()
                        .take_while(|&row| row < size)
                        .filter(|&row| rhs.is_set(row)),
                ))
            }
        };
        *self = narrowed;
    }
}

impl PartialEq for RowMap {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().eq(other.iter())
    }
}

impl Eq for RowMap {}

impl<'a> IntoIterator for &'a RowMap {
    type Item = u32;
    type IntoIter = RowMapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over a [`RowMap`].
#[derive(Clone, Debug)]
pub enum RowMapIter<'a> {
    /// Iterating a range map.
    Range(Range<u32>),
    /// Iterating a bit-vector map.
    Bits(SetBitsIter<'a>),
    /// Iterating an index-vector map.
    Indices(std::slice::Iter<'a, u32>),
}

impl Iterator for RowMapIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            RowMapIter::Range(range) => range.next(),
            RowMapIter::Bits(bits) => bits.next(),
            RowMapIter::Indices(indices) => indices.next().copied(),
        }
    }
}
