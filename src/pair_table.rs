use std::ops::{Index, IndexMut};

/// A symmetric table holding one value per unordered pair of sequences.
///
/// Only the strict upper triangle is stored, so a table over `width`
/// sequences holds `width * (width - 1) / 2` values. `(i, j)` and `(j, i)`
/// address the same cell; the diagonal does not exist and indexing it panics.
#[derive(Debug, Clone, PartialEq)]
pub struct PairResultTable<T> {
    width: usize,
    values: Vec<T>,
}

impl<T: Clone> PairResultTable<T> {
    pub fn new(width: usize, value: T) -> Self {
        Self {
            width,
            values: vec![value; pair_count(width)],
        }
    }
}

impl<T> PairResultTable<T> {
    /// Creates a table whose cells are initialized by calling `f` once per cell.
    pub fn from_fn<F>(width: usize, mut f: F) -> Self
    where
        F: FnMut() -> T,
    {
        Self {
            width,
            values: (0..pair_count(width)).map(|_| f()).collect(),
        }
    }

    /// Number of sequences the table spans.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells, i.e. distinct unordered pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.values[self.find_index(i, j)]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        let index = self.find_index(i, j);
        &mut self.values[index]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        *self.get_mut(i, j) = value;
    }

    /// Iterates over `((i, j), value)` with `i < j`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        pairs(self.width).zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut T)> + '_ {
        pairs(self.width).zip(self.values.iter_mut())
    }

    /// Builds a table of the same width by applying `f` to every cell.
    pub fn map<U, F>(&self, mut f: F) -> PairResultTable<U>
    where
        F: FnMut((usize, usize), &T) -> U,
    {
        PairResultTable {
            width: self.width,
            values: self.iter().map(|(pair, value)| f(pair, value)).collect(),
        }
    }

    fn find_index(&self, i: usize, j: usize) -> usize {
        assert!(i != j, "No cell for the pair ({i}, {j}) on the diagonal");
        assert!(
            i < self.width && j < self.width,
            "Pair ({i}, {j}) out of range for a table of width {}",
            self.width
        );
        let row = i.min(j);
        let col = i.max(j);
        row * (2 * self.width - row - 1) / 2 + col - row - 1
    }
}

impl<T> Index<(usize, usize)> for PairResultTable<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        self.get(i, j)
    }
}

impl<T> IndexMut<(usize, usize)> for PairResultTable<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        self.get_mut(i, j)
    }
}

fn pair_count(width: usize) -> usize {
    width * width.saturating_sub(1) / 2
}

fn pairs(width: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..width).flat_map(move |i| (i + 1..width).map(move |j| (i, j)))
}
