use std::cmp::min;
use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::export::{save_csv, to_csv, ExportScope};
use crate::media::{embed_url, extract_video_id, is_recognized_media_url};
use crate::models::Song;

use super::helpers::{centered_rect, checkbox, chip, surface_error};
use super::opener::{Opener, SystemOpener};
use super::screens::{PlayerOverlay, SongListScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space for the title, search box and counters.
const HEADER_HEIGHT: u16 = 5;
/// Height allocation per song card.
const SONG_CARD_HEIGHT: u16 = 5;
/// Rows moved by PageUp / PageDown.
const PAGE_STEP: isize = 5;
const SEARCH_PLACEHOLDER: &str = "e.g. adoração, Luz do Mundo";

/// Whether keystrokes edit the search text or drive the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Searching,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// View state for the repertoire browser. The catalog is only read.
pub struct App {
    catalog: Catalog,
    list: SongListScreen,
    mode: Mode,
    player: PlayerOverlay,
    help_visible: bool,
    autoplay: bool,
    status: Option<StatusMessage>,
    export_dir: PathBuf,
    opener: Box<dyn Opener>,
}

impl App {
    pub fn new(catalog: Catalog, export_dir: PathBuf) -> Self {
        Self::with_opener(catalog, export_dir, Box::new(SystemOpener))
    }

    pub fn with_opener(catalog: Catalog, export_dir: PathBuf, opener: Box<dyn Opener>) -> Self {
        let list = SongListScreen::new(&catalog);
        Self {
            catalog,
            list,
            mode: Mode::Normal,
            player: PlayerOverlay::Closed,
            help_visible: false,
            autoplay: true,
            status: None,
            export_dir,
            opener,
        }
    }

    pub fn player(&self) -> &PlayerOverlay {
        &self.player
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Songs currently listed, in display order.
    pub fn visible_songs(&self) -> &[Song] {
        &self.list.filtered_songs
    }

    /// Dispatch one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.player.is_open() {
            self.handle_player_key(code);
            return false;
        }
        if self.help_visible {
            self.handle_help_key(code);
            return false;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(code),
            Mode::Searching => {
                self.handle_search_key(code);
                false
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.list.clear_query(&self.catalog) {
                    self.set_status("Search cleared.", StatusKind::Info);
                }
            }
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                self.mode = Mode::Searching;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                let order = self.list.cycle_date_order(&self.catalog);
                debug!(?order, "date order changed");
                self.set_status(format!("Sorting: {order}."), StatusKind::Info);
            }
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                if let Some(song) = self.list.current_song().cloned() {
                    self.play(&song);
                } else {
                    self.set_status("No song selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.export(ExportScope::All),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export(ExportScope::Filtered),
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => {
                self.help_visible = true;
            }
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.list.clear_query(&self.catalog);
                self.mode = Mode::Normal;
            }
            KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Backspace => self.list.pop_char(&self.catalog),
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::Char(ch) if !ch.is_control() => self.list.push_char(&self.catalog, ch),
            _ => {}
        }
    }

    fn handle_player_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('C') => self.close_player(),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.autoplay = !self.autoplay;
                debug!(autoplay = self.autoplay, "autoplay toggled");
            }
            KeyCode::Enter => {
                if let PlayerOverlay::Open { video_id, .. } = &self.player {
                    let url = embed_url(video_id, self.autoplay);
                    self.open_external(&url, "the player");
                }
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if let PlayerOverlay::Open { external_url, .. } = &self.player {
                    let url = external_url.clone();
                    self.open_external(&url, "the original link");
                }
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, code: KeyCode) {
        if matches!(
            code,
            KeyCode::Esc
                | KeyCode::Enter
                | KeyCode::Char('?')
                | KeyCode::Char('h')
                | KeyCode::Char('H')
        ) {
            self.help_visible = false;
        }
    }

    /// Video links open the player overlay; anything else goes straight to the
    /// system browser.
    fn play(&mut self, song: &Song) {
        if is_recognized_media_url(&song.link) {
            let video_id = extract_video_id(&song.link);
            if !video_id.is_empty() {
                info!(song = %song.id, %video_id, "opening player");
                self.clear_status();
                self.player = PlayerOverlay::Open {
                    video_id,
                    external_url: song.link.clone(),
                };
                return;
            }
        }
        self.open_external(&song.link, &song.title);
    }

    fn close_player(&mut self) {
        debug!("closing player");
        self.player = PlayerOverlay::Closed;
    }

    fn open_external(&mut self, url: &str, label: &str) {
        match self.opener.open(url) {
            Ok(()) => {
                info!(%url, "opened externally");
                self.set_status(format!("Opened {label}."), StatusKind::Info);
            }
            Err(err) => {
                warn!(%url, error = %err, "external open failed");
                self.set_status(
                    format!("Failed to open link: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn export(&mut self, scope: ExportScope) {
        let (content, rows) = match scope {
            ExportScope::All => (to_csv(self.catalog.songs()), self.catalog.len()),
            ExportScope::Filtered => (
                to_csv(&self.list.filtered_songs),
                self.list.filtered_songs.len(),
            ),
        };

        match save_csv(&self.export_dir, scope.filename(), &content) {
            Ok(path) => {
                info!(path = %path.display(), rows, "exported csv");
                self.set_status(
                    format!("Exported {rows} songs to {}.", path.display()),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                warn!(error = %err, "csv export failed");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
            .split(content_area);

        self.draw_header(frame, chunks[0]);
        self.draw_song_list(frame, chunks[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if self.help_visible {
            self.draw_help(frame, area);
        }
        if let PlayerOverlay::Open {
            video_id,
            external_url,
        } = &self.player
        {
            self.draw_player(frame, area, video_id, external_url);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let searching = self.mode == Mode::Searching;
        let search_value = if self.list.query.is_empty() && !searching {
            Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.list.query.clone())
        };
        let label_style = if searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    "Atrium Praise · Repertoire",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled("  read-only", Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![Span::styled("Search: ", label_style), search_value]),
            Line::from(vec![
                Span::raw(format!("Date order: {}", self.list.date_order)),
                Span::styled(
                    format!(
                        "   Showing {} / {} songs",
                        self.list.filtered_songs.len(),
                        self.catalog.len()
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]),
        ];

        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);

        if searching && inner.height > 1 {
            let typed = u16::try_from(self.list.query.chars().count()).unwrap_or(u16::MAX);
            let prefix = u16::try_from("Search: ".len()).unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(prefix).saturating_add(typed);
            frame.set_cursor_position((cursor_x.min(inner.right()), inner.y + 1));
        }
    }

    fn draw_song_list(&self, frame: &mut Frame, area: Rect) {
        if self.list.filtered_songs.is_empty() {
            let message = Paragraph::new("No songs found.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        }

        self.render_song_cards(frame, area, &self.list.filtered_songs, self.list.selected);
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, songs: &[Song], selected: usize) {
        if songs.is_empty() || area.height == 0 {
            return;
        }

        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = songs.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            let song_index = start + idx;
            if chunk.height == 0 || song_index >= len {
                continue;
            }

            let song = &songs[song_index];
            let is_selected = song_index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }

            let paragraph = Paragraph::new(song_card_lines(song, is_selected))
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = if self.player.is_open() {
            &[
                ("[Enter]", " Launch Player   "),
                ("[o]", " Open Original   "),
                ("[t]", " Toggle Autoplay   "),
                ("[Esc]", " Close"),
            ]
        } else if self.help_visible {
            &[("[Esc]", " Close Help")]
        } else if self.mode == Mode::Searching {
            &[
                ("[type]", " Filter   "),
                ("[↑↓]", " Select   "),
                ("[Enter]", " Done   "),
                ("[Esc]", " Clear"),
            ]
        } else {
            &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Play   "),
                ("[f]", " Search   "),
                ("[d]", " Date Order   "),
                ("[a]", " Export All   "),
                ("[x]", " Export Filtered   "),
                ("[?]", " Help   "),
                ("[q]", " Quit"),
            ]
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_player(&self, frame: &mut Frame, area: Rect, video_id: &str, external_url: &str) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Now Playing").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let muted = Style::default().fg(Color::Gray);
        let lines = vec![
            Line::from(vec![
                Span::styled("Video: ", muted),
                Span::styled(
                    video_id.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(checkbox(self.autoplay, "Autoplay")),
            Line::from(""),
            Line::from(Span::styled("Player:", muted)),
            Line::from(Span::styled(
                embed_url(video_id, self.autoplay),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled("Original:", muted)),
            Line::from(Span::styled(
                external_url.to_string(),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter launches the player • o opens the original • t toggles autoplay • Esc closes",
                muted,
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Instructions").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(
                "Songs are defined in the built-in catalog. Each entry has an id, title, link and key, \
                 plus optional tags, chorus excerpt and last-played date.",
            ),
            Line::from(""),
            Line::from("Search filters by title and tags. Press d to order by last-played date."),
            Line::from(
                "Press Enter (or p) to play: video links open the player, other links open in the browser.",
            ),
            Line::from("Press a to export every song to CSV, or x to export only the songs listed."),
            Line::from(format!("Exports are saved in {}.", self.export_dir.display())),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Title with key and tag chips, the chorus excerpt, and the last-played date.
fn song_card_lines(song: &Song, selected: bool) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", song.title)
    } else {
        song.title.clone()
    };
    let mut header = vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if !song.key.trim().is_empty() {
        header.push(Span::raw(" "));
        header.push(chip(&format!("Key: {}", song.key.trim()), Color::Magenta));
    }
    for tag in &song.tags {
        header.push(Span::raw(" "));
        header.push(chip(tag, Color::Gray));
    }

    let mut lines = vec![Line::from(header)];
    if let Some(chorus) = song.chorus_text() {
        lines.push(Line::from(Span::styled(
            chorus.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    if let Some(date) = song.last_played_text() {
        lines.push(Line::from(vec![
            Span::styled("Last played: ", Style::default().fg(Color::DarkGray)),
            Span::raw(date.to_string()),
        ]));
    }
    lines
}
