//! Cursor-based pagination over metadata items
//!
//! A cursor is the name of the last item of the previous page. It is not a
//! continuation: every call rescans from the start of the chain.

use crate::errors::McpError;

/// Finite, non-restartable page of at most `page_size` items.
///
/// With a cursor, items up to and including the one matching the cursor are
/// skipped. If the scan exhausts the source without a match the page yields a
/// single [`McpError::InvalidCursor`] and ends.
pub struct Page<I, K> {
    items: I,
    cursor: Option<String>,
    remaining: usize,
    is_cursor: K,
    finished: bool,
}

impl<I, K> Page<I, K> {
    pub fn new<T>(items: I, page_size: usize, cursor: Option<&str>, is_cursor: K) -> Self
    where
        I: Iterator<Item = T>,
        K: Fn(&T, &str) -> bool,
    {
        Self {
            items,
            cursor: cursor.map(str::to_string),
            remaining: page_size,
            is_cursor,
            finished: false,
        }
    }
}

impl<I, K, T> Iterator for Page<I, K>
where
    I: Iterator<Item = T>,
    K: Fn(&T, &str) -> bool,
{
    type Item = Result<T, McpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(cursor) = self.cursor.take() {
            let found = self.items.by_ref().any(|item| (self.is_cursor)(&item, &cursor));
            if !found {
                self.finished = true;
                return Some(Err(McpError::InvalidCursor(cursor)));
            }
        }

        if self.remaining == 0 {
            self.finished = true;
            return None;
        }

        match self.items.next() {
            Some(item) => {
                self.remaining -= 1;
                Some(Ok(item))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}
