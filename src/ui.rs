pub mod certificate;
pub mod home;
pub mod lesson;
pub mod screen;
pub mod settings;

use chrono::{DateTime, Utc};
use hajj_course::language::Language;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

pub fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub fn accent() -> Style {
    bold().fg(Color::Green)
}

/// Arabic text reads right to left; everything else stays left aligned
pub fn text_alignment(lang: Language) -> Alignment {
    if lang.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

/// Splits the frame into body and a one-line key hint footer
pub fn frame_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", dim()));
        }
        spans.push(Span::styled(*key, bold().fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {action}"), dim()));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

/// Short relative description of when a module was last opened
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // clock skew can put `then` ahead of `now`; read that as just now
    let elapsed = now.signed_duration_since(then).to_std().unwrap_or_default();
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn time_ago_reads_in_the_past() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let text = time_ago(now - Duration::days(3), now);
        assert!(text.contains("3 days"), "{text}");
        assert!(text.ends_with("ago"), "{text}");
    }

    #[test]
    fn future_timestamps_read_as_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now + Duration::hours(2), now), time_ago(now, now));
    }

    #[test]
    fn arabic_is_right_aligned() {
        assert_eq!(text_alignment(Language::Ar), Alignment::Right);
        assert_eq!(text_alignment(Language::Bn), Alignment::Left);
    }
}
