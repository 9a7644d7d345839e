//! Search and ordering over the catalog. The TUI calls [`query`] on every
//! keystroke; with a repertoire of a few dozen songs the straightforward
//! filter-then-sort is all that is needed.

use std::cmp::Ordering;

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime};
use icu_collator::{Collator, CollatorOptions, Strength};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{DateOrder, Song};

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());
static BR_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap());

/// Root-locale collator at primary strength: ignores case and accents.
static TITLE_COLLATOR: Lazy<Collator> = Lazy::new(|| {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Primary);
    Collator::try_new(&Default::default(), options).unwrap()
});

/// Date-time layouts tried for free-form text, in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts tried for free-form text, in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

/// Calendar date for `year`, `month`, `day` where out-of-range months and
/// days carry over into the next period (`31/02` is 3 March, `00/03` is the
/// last day of February).
fn rolled_date(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let months = month - 1;
    let shifted = if months >= 0 {
        base.checked_add_months(Months::new(u32::try_from(months).ok()?))
    } else {
        base.checked_sub_months(Months::new(u32::try_from(months.unsigned_abs()).ok()?))
    }?;
    let days = day - 1;
    if days >= 0 {
        shifted.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        shifted.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn capture_number<T: std::str::FromStr>(caps: &regex::Captures<'_>, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

/// Interpret a last-played value. `YYYY-MM-DD` and `DD/MM/YYYY` are matched
/// strictly; any other text goes through a lenient parse. Blank or
/// unparseable text means "no date".
///
/// `YYYY-MM-DD` needs a month in 1..=12 and a day in 1..=31, and a day past
/// the end of the month carries over (`2025-02-30` is 2 March).
/// `DD/MM/YYYY` carries over any month or day value.
pub fn parse_last_played(text: &str) -> Option<NaiveDateTime> {
    if text.trim().is_empty() {
        return None;
    }
    if let Some(caps) = ISO_DATE.captures(text) {
        let year = capture_number::<i32>(&caps, 1)?;
        let month = capture_number::<i64>(&caps, 2)?;
        let day = capture_number::<i64>(&caps, 3)?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        return rolled_date(year, month, day).and_then(midnight);
    }
    if let Some(caps) = BR_DATE.captures(text) {
        let day = capture_number::<i64>(&caps, 1)?;
        let month = capture_number::<i64>(&caps, 2)?;
        let year = capture_number::<i32>(&caps, 3)?;
        return rolled_date(year, month, day).and_then(midnight);
    }
    parse_free_form(text.trim())
}

fn parse_free_form(text: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(midnight)
        })
}

/// Locale-aware title comparison that ignores case and accents, so `água`,
/// `Água` and `agua` compare equal.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.compare(a, b)
}

/// True when the song's title or one of its tags contains `needle`, which must
/// already be trimmed and lowercased. An empty needle matches everything.
fn matches(song: &Song, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    song.title.to_lowercase().contains(needle)
        || song
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

struct Ranked<'a> {
    song: &'a Song,
    played: Option<NaiveDateTime>,
}

/// Filter `songs` by `text` and order the survivors according to `order`.
///
/// Titles are compared with [`compare_titles`]. In the date modes, songs without
/// a usable last-played date always come after the dated ones and keep title
/// order among themselves. The sort is stable, so ties keep catalog order.
pub fn query<'a>(songs: &'a [Song], text: &str, order: DateOrder) -> Vec<&'a Song> {
    let needle = text.trim().to_lowercase();

    let mut ranked: Vec<Ranked<'a>> = songs
        .iter()
        .filter(|song| matches(song, &needle))
        .map(|song| Ranked {
            song,
            played: match order {
                DateOrder::None => None,
                _ => song.last_played.as_deref().and_then(parse_last_played),
            },
        })
        .collect();

    ranked.sort_by(|a, b| compare(a, b, order));
    ranked.into_iter().map(|entry| entry.song).collect()
}

fn compare(a: &Ranked<'_>, b: &Ranked<'_>, order: DateOrder) -> Ordering {
    let by_title = || compare_titles(&a.song.title, &b.song.title);
    match order {
        DateOrder::None => by_title(),
        DateOrder::Recent | DateOrder::Oldest => match (a.played, b.played) {
            (None, None) => by_title(),
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(da), Some(db)) if order == DateOrder::Recent => db.cmp(&da),
            (Some(da), Some(db)) => da.cmp(&db),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, title: &str, tags: &[&str], played: &str) -> Song {
        Song::new(id, title, format!("https://example.com/{id}"), "C")
            .with_tags(tags.iter().copied())
            .with_last_played(played)
    }

    fn ids(songs: &[&Song]) -> Vec<String> {
        songs.iter().map(|s| s.id.clone()).collect()
    }

    fn sample() -> Vec<Song> {
        vec![
            song("1", "O Que Sua Glória Fez Comigo", &["adoração"], ""),
            song("2", "Digno de tudo", &["louvor"], "2025-09-15"),
            song("3", "Quem é esse", &["adoração"], "01/08/2025"),
            song("4", "Maravilhosa Graça", &["louvor"], "ontem"),
            song("5", "Há Poder", &["louvor", "hino"], "2024-12-25"),
            song("6", "Tu és Deus", &["celebração"], ""),
        ]
    }

    #[test]
    fn tag_query_returns_matches_sorted_by_title() {
        let songs = sample();
        let result = query(&songs, "adoração", DateOrder::None);
        assert_eq!(ids(&result), ["1", "3"]);
    }

    #[test]
    fn query_is_trimmed_and_case_insensitive() {
        let songs = sample();
        let result = query(&songs, "  GRAÇA ", DateOrder::None);
        assert_eq!(ids(&result), ["4"]);

        let result = query(&songs, "LOUV", DateOrder::None);
        assert_eq!(ids(&result), ["2", "5", "4"]);
    }

    #[test]
    fn every_included_song_matches_and_every_excluded_does_not() {
        let songs = sample();
        for needle in ["a", "de", "ção", "xyz", "hino", "es"] {
            let result = query(&songs, needle, DateOrder::Recent);
            for candidate in &songs {
                let hit = candidate.title.to_lowercase().contains(needle)
                    || candidate.tags.iter().any(|t| t.to_lowercase().contains(needle));
                let included = result.iter().any(|s| s.id == candidate.id);
                assert_eq!(hit, included, "needle {needle:?}, song {}", candidate.id);
            }
        }
    }

    #[test]
    fn blank_query_returns_everything_alphabetically() {
        let songs = sample();
        let result = query(&songs, "   ", DateOrder::None);
        assert_eq!(ids(&result), ["2", "5", "4", "1", "3", "6"]);
    }

    #[test]
    fn title_order_ignores_case_and_accents() {
        let songs = vec![
            song("1", "beta", &[], ""),
            song("2", "Água viva", &[], ""),
            song("3", "Alfa", &[], ""),
            song("4", "agua viva", &[], ""),
        ];
        let result = query(&songs, "", DateOrder::None);
        // "Água viva" and "agua viva" collate equal and keep catalog order.
        assert_eq!(ids(&result), ["2", "4", "3", "1"]);
    }

    #[test]
    fn duplicate_titles_keep_catalog_order() {
        let songs = vec![
            song("b", "Same", &[], ""),
            song("a", "Same", &[], ""),
            song("c", "same", &[], ""),
        ];
        let result = query(&songs, "", DateOrder::None);
        assert_eq!(ids(&result), ["b", "a", "c"]);
    }

    #[test]
    fn recent_puts_latest_first_and_undated_last() {
        let songs = sample();
        let result = query(&songs, "", DateOrder::Recent);
        // Dated: 2 (2025-09-15), 3 (2025-08-01), 5 (2024-12-25).
        // Undated by title: 4 (Maravilhosa), 1 (O Que), 6 (Tu és).
        assert_eq!(ids(&result), ["2", "3", "5", "4", "1", "6"]);
    }

    #[test]
    fn oldest_puts_earliest_first_and_undated_last() {
        let songs = sample();
        let result = query(&songs, "", DateOrder::Oldest);
        assert_eq!(ids(&result), ["5", "3", "2", "4", "1", "6"]);
    }

    #[test]
    fn missing_date_field_sorts_like_empty_text() {
        let songs = vec![
            Song::new("1", "Zulu", "https://z", "C"),
            song("2", "Alpha", &[], "2025-01-01"),
            song("3", "Bravo", &[], ""),
        ];
        let result = query(&songs, "", DateOrder::Oldest);
        assert_eq!(ids(&result), ["2", "3", "1"]);
    }

    #[test]
    fn equal_dates_keep_catalog_order() {
        let songs = vec![
            song("1", "Zulu", &[], "2025-01-01"),
            song("2", "Alpha", &[], "01/01/2025"),
        ];
        assert_eq!(ids(&query(&songs, "", DateOrder::Recent)), ["1", "2"]);
        assert_eq!(ids(&query(&songs, "", DateOrder::Oldest)), ["1", "2"]);
    }

    #[test]
    fn parses_strict_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        assert_eq!(parse_last_played("2025-09-15"), expected);
        assert_eq!(parse_last_played("15/09/2025"), expected);
    }

    fn on(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    #[test]
    fn strict_layouts_roll_over_past_month_end() {
        assert_eq!(parse_last_played("2025-02-30"), on(2025, 3, 2));
        assert_eq!(parse_last_played("31/02/2025"), on(2025, 3, 3));
        assert_eq!(parse_last_played("00/03/2024"), on(2024, 2, 29));
        assert_eq!(parse_last_played("01/13/2025"), on(2026, 1, 1));
    }

    #[test]
    fn iso_layout_rejects_out_of_range_fields() {
        assert_eq!(parse_last_played("2025-13-01"), None);
        assert_eq!(parse_last_played("2025-00-10"), None);
        assert_eq!(parse_last_played("2025-02-32"), None);
        assert_eq!(parse_last_played("2025-02-00"), None);
    }

    #[test]
    fn rolled_over_date_counts_as_dated() {
        let songs = vec![
            song("1", "Alpha", &[], "2025-01-01"),
            song("2", "Bravo", &[], "31/02/2025"),
        ];
        assert_eq!(ids(&query(&songs, "", DateOrder::Recent)), ["2", "1"]);
    }

    #[test]
    fn parses_free_form_dates() {
        let sept = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        assert_eq!(
            parse_last_played("2025-09-15T10:30:00Z").map(|d| d.date()),
            Some(sept)
        );
        assert_eq!(parse_last_played("September 15, 2025").map(|d| d.date()), Some(sept));
        assert_eq!(parse_last_played("2025/09/15").map(|d| d.date()), Some(sept));
        assert_eq!(parse_last_played(" 2025-09-15 ").map(|d| d.date()), Some(sept));
    }

    #[test]
    fn garbage_and_blank_dates_are_absent() {
        assert_eq!(parse_last_played(""), None);
        assert_eq!(parse_last_played("   "), None);
        assert_eq!(parse_last_played("ontem"), None);
        assert_eq!(parse_last_played("15-09"), None);
    }

    #[test]
    fn title_comparison_ignores_case_and_accents() {
        assert_eq!(compare_titles("Há Poder", "ha poder"), Ordering::Equal);
        assert_eq!(compare_titles("ÁGUA", "agua"), Ordering::Equal);
        assert_eq!(compare_titles("alfa", "Beta"), Ordering::Less);
    }

    #[test]
    fn punctuated_and_non_latin_titles_follow_collation_order() {
        let songs = vec![
            song("1", "Zulu", &[], ""),
            song("2", "Ørn", &[], ""),
            song("3", "~Tilde", &[], ""),
            song("4", "Beta", &[], ""),
        ];
        let result = query(&songs, "", DateOrder::None);
        let titles: Vec<&str> = result.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["~Tilde", "Beta", "Ørn", "Zulu"]);
    }
}
