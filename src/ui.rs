//! Ratatui front-end: the song list, the search box, the player and help
//! overlays, and the terminal event loop.

mod app;
mod helpers;
mod opener;
mod screens;
mod terminal;

pub use app::App;
pub use opener::{Opener, SystemOpener};
pub use screens::PlayerOverlay;
pub use terminal::run_app;
