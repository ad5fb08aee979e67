use serde::Serialize;

/// One window of a listing, plus the size of the full result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    /// Cuts `[offset, offset + limit)` out of `all`, clipped to its length.
    pub fn slice(all: Vec<T>, offset: usize, limit: usize) -> Self {
        let total = all.len();
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_clips_to_length() {
        let page = Page::slice((0..5).collect(), 3, 10);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = Page::slice((0..5).collect::<Vec<_>>(), 5, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn zero_limit_keeps_total() {
        let page = Page::slice(vec!["a", "b"], 0, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }
}
