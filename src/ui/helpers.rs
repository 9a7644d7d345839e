use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the overlays.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// A small bracketed label such as `[Key: C]` or `[louvor]`.
pub(crate) fn chip(text: &str, color: Color) -> Span<'static> {
    Span::styled(format!("[{text}]"), Style::default().fg(color))
}

/// `[x] label` / `[ ] label` for boolean toggles.
pub(crate) fn checkbox(checked: bool, label: &str) -> String {
    let mark = if checked { "x" } else { " " };
    format!("[{mark}] {label}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn surface_error_reports_innermost_cause() {
        let err = Err::<(), _>(anyhow!("permission denied"))
            .context("failed to write export")
            .unwrap_err();
        assert_eq!(surface_error(&err), "permission denied");
    }

    #[test]
    fn checkbox_marks_state() {
        assert_eq!(checkbox(true, "Autoplay"), "[x] Autoplay");
        assert_eq!(checkbox(false, "Autoplay"), "[ ] Autoplay");
    }
}
