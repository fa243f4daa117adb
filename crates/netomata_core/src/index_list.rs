/// Starting capacity of every [`IndexList`].
pub const INITIAL_CAPACITY: usize = 10;

/// Append-only list of cell indices with amortized O(1) push.
///
/// Capacity starts at [`INITIAL_CAPACITY`] and doubles whenever a push would
/// overflow it. Growth always carries the stored indices over to the new
/// allocation. Storage is released when the list is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexList {
    items: Vec<usize>,
}

impl Default for IndexList {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn push(&mut self, value: usize) {
        if self.items.len() == self.items.capacity() {
            let grow_by = self.items.capacity().max(1);
            // reserve_exact on a Vec moves existing elements into the new buffer
            self.items.reserve_exact(grow_by);
        }
        self.items.push(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<usize> {
        self.items.get(i).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.items
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, usize>> {
        self.items.iter().copied()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.items
    }
}

impl<'a> IntoIterator for &'a IndexList {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<usize> for IndexList {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
