//! The repertoire itself. Maintainers edit [`Catalog::builtin`] directly; the
//! binary builds the catalog once at startup and hands it to the TUI, which
//! only ever reads from it.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::Song;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("song id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("song '{0}' has no title")]
    MissingTitle(String),
    #[error("song '{0}' has no link")]
    MissingLink(String),
}

/// Immutable, ordered list of songs with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Validate the records and freeze them into a catalog. Order is kept as
    /// given.
    pub fn new(songs: Vec<Song>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(songs.len());
        for song in &songs {
            if !seen.insert(song.id.as_str()) {
                return Err(CatalogError::DuplicateId(song.id.clone()));
            }
            if song.title.trim().is_empty() {
                return Err(CatalogError::MissingTitle(song.id.clone()));
            }
            if song.link.trim().is_empty() {
                return Err(CatalogError::MissingLink(song.id.clone()));
            }
        }
        Ok(Self { songs })
    }

    /// The team's repertoire. Edit this list to add or change songs.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(vec![
            Song::new(
                "1",
                "O Que Sua Glória Fez Comigo",
                "https://www.youtube.com/watch?v=9fZph9kZkgM&list=RD9fZph9kZkgM&start_radio=1",
                "C",
            )
            .with_tags(["adoração"])
            .with_chorus("Quem ja pisou no Santo dos Santos...")
            .with_last_played(""),
            Song::new(
                "2",
                "Digino de tudo",
                "https://www.youtube.com/watch?v=cQlEODXxnu0&list=RDcQlEODXxnu0&start_radio=1",
                "F",
            )
            .with_tags(["louvor"])
            .with_chorus("Os santos e os Anjos")
            .with_last_played(""),
            Song::new(
                "3",
                "Quem é esse",
                "https://www.youtube.com/watch?v=0ZF5em0MTwY&list=RD0ZF5em0MTwY&start_radio=1",
                "B",
            )
            .with_tags(["adoração"])
            .with_chorus("Quem é esse, que era sem pecado e não me condenou...")
            .with_last_played(""),
            Song::new(
                "4",
                "Maravilhosa Graça",
                "https://www.youtube.com/watch?v=nv-T2_JPKZA&list=RDnv-T2_JPKZA&start_radio=1",
                "D",
            )
            .with_tags(["louvor"])
            .with_chorus("Maravilhosa graça, seu ininito amor")
            .with_last_played(""),
            Song::new("5", "Há Poder", "https://www.youtube.com/watch?v=4WmlJFsxDv4", "?")
                .with_tags(["adoração"])
                .with_chorus("Há Poder no teu nome, Jesus, rei sobre o trono")
                .with_last_played(""),
            Song::new(
                "6",
                "Tu és Deus (A Ele)",
                "https://www.youtube.com/watch?v=6YQNTOj-OLM",
                "?",
            )
            .with_tags(["adoração"])
            .with_chorus("Tu és Deus (A Ele)")
            .with_last_played(""),
        ])
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }
}
