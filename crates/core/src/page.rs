//! Keyset pagination over the asset namespace.
//!
//! Asset names sort lexicographically in capture order, so a page is a
//! contiguous run of the ascending name list, handed back newest first. The
//! cursor is the oldest name the caller has already seen; the next page holds
//! the names strictly older than it. No offsets are involved, so uploads that
//! land between two requests never shift or repeat entries.

use crate::asset::{AssetName, prefix};
use crate::error::ValidationError;

/// Number of names returned per listing page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Computes bounded, newest-first windows over a set of asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page_size: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageCursor {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Return the page that precedes `cursor`, or the newest page when no
    /// cursor is given.
    ///
    /// `names` may arrive in any order. The cursor must be an exact stored
    /// name (`YYYYMMDDHHMMSSmmm` plus an allowed extension); it is excluded
    /// from the result together with every name sharing its prefix. A short
    /// or empty final page is not an error.
    pub fn page(
        &self,
        mut names: Vec<String>,
        cursor: Option<&str>,
    ) -> Result<Vec<String>, ValidationError> {
        let cursor = cursor.map(AssetName::parse_exact).transpose()?;

        names.sort_unstable_by(|a, b| prefix(a).cmp(prefix(b)).then_with(|| a.cmp(b)));

        let end = match &cursor {
            Some(cursor) => names.partition_point(|name| prefix(name) < cursor.prefix()),
            None => names.len(),
        };
        let start = end.saturating_sub(self.page_size);

        names.truncate(end);
        let mut window = names.split_off(start);
        window.reverse();
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `count` names one minute apart starting 2024-01-01 00:00, shuffled by
    /// a fixed stride so the input is never pre-sorted.
    fn names(count: usize) -> Vec<String> {
        let mut out: Vec<String> = (0..count)
            .map(|i| format!("20240101{:02}{:02}00000.jpg", i / 60, i % 60))
            .collect();
        let len = out.len();
        if len > 1 {
            for i in 0..len {
                out.swap(i, (i * 7 + 3) % len);
            }
        }
        out
    }

    fn is_descending(list: &[String]) -> bool {
        list.windows(2).all(|w| w[0] > w[1])
    }

    #[test]
    fn first_page_is_newest_names() {
        let cursor = PageCursor::new(50);
        let page = cursor.page(names(120), None).unwrap();
        assert_eq!(page.len(), 50);
        assert!(is_descending(&page));
        assert_eq!(page[0], "20240101015900000.jpg");
        assert_eq!(page[49], "20240101011000000.jpg");
    }

    #[test]
    fn fewer_names_than_page_size_returns_all() {
        let page = PageCursor::new(50).page(names(7), None).unwrap();
        assert_eq!(page.len(), 7);
        assert!(is_descending(&page));
    }

    #[test]
    fn cursor_page_is_strictly_older() {
        let cursor = PageCursor::new(50);
        let first = cursor.page(names(120), None).unwrap();
        let last_seen = first.last().unwrap().clone();

        let second = cursor.page(names(120), Some(&last_seen)).unwrap();
        assert_eq!(second.len(), 50);
        assert!(is_descending(&second));
        assert!(second.iter().all(|n| n < &last_seen));
        assert!(!second.contains(&last_seen));

        let third = cursor
            .page(names(120), Some(second.last().unwrap()))
            .unwrap();
        assert_eq!(third.len(), 20);
        assert_eq!(third.last().unwrap(), "20240101000000000.jpg");

        let fourth = cursor
            .page(names(120), Some(third.last().unwrap()))
            .unwrap();
        assert!(fourth.is_empty());
    }

    #[test]
    fn cursor_not_in_set_still_bounds_window() {
        let page = PageCursor::new(3)
            .page(names(10), Some("20240101000530000.jpg"))
            .unwrap();
        assert_eq!(
            page,
            vec![
                "20240101000500000.jpg".to_owned(),
                "20240101000400000.jpg".to_owned(),
                "20240101000300000.jpg".to_owned(),
            ]
        );
    }

    #[test]
    fn cursor_excludes_same_prefix_other_extension() {
        let list = vec![
            "20240101000000000.jpg".to_owned(),
            "20240101000100000.jpeg".to_owned(),
            "20240101000100000.jpg".to_owned(),
        ];
        let page = PageCursor::new(10)
            .page(list, Some("20240101000100000.jpg"))
            .unwrap();
        assert_eq!(page, vec!["20240101000000000.jpg".to_owned()]);
    }

    #[test]
    fn malformed_cursor_is_rejected() {
        let cursor = PageCursor::default();
        assert!(matches!(
            cursor.page(names(3), Some("2024.jpg")),
            Err(ValidationError::NameTooShort(_))
        ));
        assert!(matches!(
            cursor.page(names(3), Some("2024010100000000099.jpg")),
            Err(ValidationError::MalformedName(_))
        ));
        assert!(matches!(
            cursor.page(names(3), Some("20240101000000000.txt")),
            Err(ValidationError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn empty_input_yields_empty_page() {
        assert!(PageCursor::default().page(Vec::new(), None).unwrap().is_empty());
    }
}
