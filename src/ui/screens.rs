use crate::catalog::Catalog;
use crate::models::{DateOrder, Song};
use crate::query::query;

/// Search text, date ordering and the filtered view of the catalog, plus the
/// highlighted row. Every change re-runs the query straight away.
pub(crate) struct SongListScreen {
    pub(crate) query: String,
    pub(crate) date_order: DateOrder,
    pub(crate) filtered_songs: Vec<Song>,
    pub(crate) selected: usize,
}

impl SongListScreen {
    pub(crate) fn new(catalog: &Catalog) -> Self {
        let mut screen = Self {
            query: String::new(),
            date_order: DateOrder::default(),
            filtered_songs: Vec::new(),
            selected: 0,
        };
        screen.apply_filter(catalog);
        screen
    }

    pub(crate) fn apply_filter(&mut self, catalog: &Catalog) {
        self.filtered_songs = query(catalog.songs(), &self.query, self.date_order)
            .into_iter()
            .cloned()
            .collect();
        self.ensure_in_bounds();
    }

    pub(crate) fn push_char(&mut self, catalog: &Catalog, ch: char) {
        self.query.push(ch);
        self.apply_filter(catalog);
    }

    pub(crate) fn pop_char(&mut self, catalog: &Catalog) {
        if self.query.pop().is_some() {
            self.apply_filter(catalog);
        }
    }

    /// Returns false when there was nothing to clear.
    pub(crate) fn clear_query(&mut self, catalog: &Catalog) -> bool {
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.apply_filter(catalog);
        true
    }

    pub(crate) fn cycle_date_order(&mut self, catalog: &Catalog) -> DateOrder {
        self.date_order = self.date_order.cycle();
        self.apply_filter(catalog);
        self.date_order
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.filtered_songs.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered_songs.is_empty() {
            return;
        }
        let len = self.filtered_songs.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered_songs.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered_songs.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered_songs.len() {
            self.selected = self.filtered_songs.len() - 1;
        }
    }
}

/// State of the video player overlay. The external link only exists while a
/// video is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlayerOverlay {
    #[default]
    Closed,
    Open {
        video_id: String,
        /// Original song link, offered as "open externally".
        external_url: String,
    },
}

impl PlayerOverlay {
    pub fn is_open(&self) -> bool {
        matches!(self, PlayerOverlay::Open { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Song::new("1", "Charlie", "https://c", "C").with_tags(["louvor"]),
            Song::new("2", "Alpha", "https://a", "A").with_last_played("2025-01-10"),
            Song::new("3", "Bravo", "https://b", "B").with_last_played("2025-03-01"),
        ])
        .unwrap()
    }

    fn titles(screen: &SongListScreen) -> Vec<&str> {
        screen
            .filtered_songs
            .iter()
            .map(|s| s.title.as_str())
            .collect()
    }

    #[test]
    fn starts_with_full_catalog_in_title_order() {
        let catalog = catalog();
        let screen = SongListScreen::new(&catalog);
        assert_eq!(titles(&screen), ["Alpha", "Bravo", "Charlie"]);
        assert_eq!(screen.current_song().map(|s| s.id.as_str()), Some("2"));
    }

    #[test]
    fn typing_refilters_and_clamps_selection() {
        let catalog = catalog();
        let mut screen = SongListScreen::new(&catalog);
        screen.select_last();
        assert_eq!(screen.selected, 2);

        for ch in "louv".chars() {
            screen.push_char(&catalog, ch);
        }
        assert_eq!(titles(&screen), ["Charlie"]);
        assert_eq!(screen.selected, 0);

        screen.push_char(&catalog, 'x');
        assert!(screen.filtered_songs.is_empty());
        assert!(screen.current_song().is_none());

        screen.pop_char(&catalog);
        assert_eq!(titles(&screen), ["Charlie"]);
        assert!(screen.clear_query(&catalog));
        assert!(!screen.clear_query(&catalog));
        assert_eq!(screen.filtered_songs.len(), 3);
    }

    #[test]
    fn cycling_date_order_resorts() {
        let catalog = catalog();
        let mut screen = SongListScreen::new(&catalog);
        assert_eq!(screen.cycle_date_order(&catalog), DateOrder::Recent);
        assert_eq!(titles(&screen), ["Bravo", "Alpha", "Charlie"]);
        assert_eq!(screen.cycle_date_order(&catalog), DateOrder::Oldest);
        assert_eq!(titles(&screen), ["Alpha", "Bravo", "Charlie"]);
        assert_eq!(screen.cycle_date_order(&catalog), DateOrder::None);
    }

    #[test]
    fn selection_is_bounded() {
        let catalog = catalog();
        let mut screen = SongListScreen::new(&catalog);
        screen.move_selection(-5);
        assert_eq!(screen.selected, 0);
        screen.move_selection(5);
        assert_eq!(screen.selected, 2);
        screen.select_first();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn player_overlay_reports_state() {
        assert!(!PlayerOverlay::default().is_open());
        let open = PlayerOverlay::Open {
            video_id: "abc123".into(),
            external_url: "https://youtu.be/abc123".into(),
        };
        assert!(open.is_open());
    }
}
