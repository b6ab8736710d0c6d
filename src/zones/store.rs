//! In-memory zone store
//!
//! Maps page index to the zones drawn on that page. Pages iterate in
//! ascending index order; zones keep insertion order within a page.

use std::collections::BTreeMap;

use super::rect::ZoneRect;

#[derive(Debug, Clone, Default)]
pub struct ZoneStore {
    pages: BTreeMap<usize, Vec<ZoneRect>>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a zone to a page
    pub fn add(&mut self, page: usize, rect: ZoneRect) {
        self.pages.entry(page).or_default().push(rect);
    }

    /// Remove the zone at `position` on `page`
    ///
    /// Out-of-range positions are ignored and return `None`.
    pub fn remove(&mut self, page: usize, position: usize) -> Option<ZoneRect> {
        let zones = self.pages.get_mut(&page)?;
        if position >= zones.len() {
            return None;
        }
        Some(zones.remove(position))
    }

    /// Remove every zone of one page, returning how many were removed
    pub fn clear(&mut self, page: usize) -> usize {
        self.pages.remove(&page).map_or(0, |zones| zones.len())
    }

    pub fn clear_all(&mut self) {
        self.pages.clear();
    }

    /// Total zones across every page
    pub fn count_all(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Zones of one page in insertion order
    pub fn zones(&self, page: usize) -> &[ZoneRect] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pages with their zones, ascending by page index
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[ZoneRect])> {
        self.pages
            .iter()
            .map(|(page, zones)| (*page, zones.as_slice()))
    }

    /// Zone counts per page, skipping pages with none
    pub fn counts(&self) -> BTreeMap<usize, usize> {
        self.pages
            .iter()
            .filter(|(_, zones)| !zones.is_empty())
            .map(|(page, zones)| (*page, zones.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> ZoneRect {
        ZoneRect::new(x1, y1, x2, y2).unwrap()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = ZoneStore::new();
        store.add(0, rect(0, 0, 10, 10));
        store.add(0, rect(20, 20, 30, 30));
        store.add(0, rect(5, 5, 6, 6));

        assert_eq!(
            store.zones(0),
            &[rect(0, 0, 10, 10), rect(20, 20, 30, 30), rect(5, 5, 6, 6)]
        );
    }

    #[test]
    fn test_count_all_sums_pages() {
        let mut store = ZoneStore::new();
        assert_eq!(store.count_all(), 0);

        store.add(2, rect(0, 0, 10, 10));
        store.add(0, rect(0, 0, 10, 10));
        store.add(2, rect(0, 0, 5, 5));

        assert_eq!(store.count_all(), 3);
        assert_eq!(store.zones(2).len() + store.zones(0).len(), 3);
    }

    #[test]
    fn test_remove_shifts_later_zones() {
        let mut store = ZoneStore::new();
        store.add(1, rect(0, 0, 1, 1));
        store.add(1, rect(0, 0, 2, 2));
        store.add(1, rect(0, 0, 3, 3));

        assert_eq!(store.remove(1, 1), Some(rect(0, 0, 2, 2)));
        assert_eq!(store.zones(1), &[rect(0, 0, 1, 1), rect(0, 0, 3, 3)]);
    }

    #[test]
    fn test_remove_out_of_range_is_silent() {
        let mut store = ZoneStore::new();
        store.add(0, rect(0, 0, 1, 1));

        assert_eq!(store.remove(0, 5), None);
        assert_eq!(store.remove(7, 0), None);
        assert_eq!(store.count_all(), 1);
    }

    #[test]
    fn test_clear_page_and_all() {
        let mut store = ZoneStore::new();
        store.add(0, rect(0, 0, 1, 1));
        store.add(0, rect(0, 0, 2, 2));
        store.add(1, rect(0, 0, 1, 1));

        assert_eq!(store.clear(0), 2);
        assert!(store.zones(0).is_empty());
        assert_eq!(store.count_all(), 1);
        assert_eq!(store.clear(5), 0);

        store.clear_all();
        assert_eq!(store.count_all(), 0);
    }

    #[test]
    fn test_iter_is_page_ordered() {
        let mut store = ZoneStore::new();
        store.add(3, rect(0, 0, 1, 1));
        store.add(0, rect(0, 0, 1, 1));
        store.add(1, rect(0, 0, 1, 1));

        let pages: Vec<usize> = store.iter().map(|(page, _)| page).collect();
        assert_eq!(pages, vec![0, 1, 3]);
    }
}
