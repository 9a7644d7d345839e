//! Domain models shared by the catalog, the query engine, the CSV exporter and
//! the TUI. These stay plain data holders; the behaviour lives in the modules
//! that consume them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A song in the team's repertoire. Records are created once when the catalog
/// is built and are never edited afterwards.
pub struct Song {
    /// Identifier that stays stable across sessions. Unique within a catalog.
    pub id: String,
    /// Title displayed in lists and matched by the search box.
    pub title: String,
    /// URL to the external media (usually a video page).
    pub link: String,
    /// Musical key as written by the maintainers, for example `G#m` or `?`.
    pub key: String,
    /// Free-form categories such as `adoração` or `louvor`. Order is kept.
    pub tags: Vec<String>,
    /// Short excerpt of the chorus to help identify the song.
    pub chorus: Option<String>,
    /// Last time the song was played, as typed by the maintainers
    /// (`YYYY-MM-DD`, `DD/MM/YYYY` or any other date text). Empty text is
    /// treated the same as a missing value.
    pub last_played: Option<String>,
}

impl Song {
    /// Build a record with the required fields. Optional fields start empty and
    /// are filled through the `with_*` helpers.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
            key: key.into(),
            tags: Vec::new(),
            chorus: None,
            last_played: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_chorus(mut self, chorus: impl Into<String>) -> Self {
        self.chorus = Some(chorus.into());
        self
    }

    pub fn with_last_played(mut self, date: impl Into<String>) -> Self {
        self.last_played = Some(date.into());
        self
    }

    /// Last-played text when it carries something worth showing.
    pub fn last_played_text(&self) -> Option<&str> {
        self.last_played
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Chorus excerpt when it carries something worth showing.
    pub fn chorus_text(&self) -> Option<&str> {
        self.chorus
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Ordering applied to the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// Alphabetical by title.
    #[default]
    None,
    /// Most recently played first.
    Recent,
    /// Least recently played first.
    Oldest,
}

impl DateOrder {
    /// Next mode in the `none → recent → oldest` rotation.
    pub fn cycle(self) -> Self {
        match self {
            DateOrder::None => DateOrder::Recent,
            DateOrder::Recent => DateOrder::Oldest,
            DateOrder::Oldest => DateOrder::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateOrder::None => "No date order",
            DateOrder::Recent => "Recently played",
            DateOrder::Oldest => "Oldest first",
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
