use std::sync::Arc;

/// Ordered, append-only list of capability items.
///
/// Lookups scan front to back and the first match wins; items are never
/// re-sorted or indexed by key, so a later item sharing a key is unreachable.
pub struct Chain<T: ?Sized> {
    items: Vec<Arc<T>>,
}

impl<T: ?Sized> Chain<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: Arc<T>) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().map(|item| item.as_ref())
    }

    /// Returns the first capability `select` extracts, in registration order.
    pub fn find_map<'a, C: ?Sized>(
        &'a self,
        mut select: impl FnMut(&'a T) -> Option<&'a C>,
    ) -> Option<&'a C> {
        self.items.iter().find_map(|item| select(item.as_ref()))
    }
}

impl<T: ?Sized> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> FromIterator<Arc<T>> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = Arc<T>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
