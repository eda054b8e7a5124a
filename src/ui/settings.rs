use hajj_course::language::Language;
use itertools::Itertools;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::{
    ui::{accent, bold, dim, frame_layout, render_hints},
    App,
};

pub fn render(app: &App, f: &mut Frame) {
    let (body, footer) = frame_layout(f.area());
    let current = app.language();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(1)])
        .split(body);

    let languages = Language::ALL
        .iter()
        .map(|&lang| {
            if lang == current {
                format!("[{}]", lang.native_name())
            } else {
                lang.native_name().to_string()
            }
        })
        .join("  ");

    let lines = vec![
        Line::from(vec![Span::styled("Language  ", bold()), Span::raw(languages)]),
        Line::from(vec![
            Span::styled("Storage   ", bold()),
            Span::styled(app.storage_label.clone(), dim()),
        ]),
        Line::from(vec![
            Span::styled("Progress  ", bold()),
            Span::raw(format!(
                "{}% · {} {}",
                app.course.progress.total_progress(),
                app.course.progress.completed_count(),
                app.t("completed").to_lowercase()
            )),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(format!(" {} ", app.t("settings")))),
        chunks[0],
    );

    if app.confirm_reset {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Reset all progress? This cannot be undone. (y/n)",
                bold().fg(Color::Red),
            )),
            chunks[1],
        );
        render_hints(f, footer, &[("y", "reset"), ("n", "cancel")]);
    } else {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Language changes apply immediately and are saved.",
                accent(),
            )),
            chunks[1],
        );
        render_hints(
            f,
            footer,
            &[("l", "language"), ("r", "reset progress"), ("esc", "back")],
        );
    }
}
