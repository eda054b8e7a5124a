use hajj_course::{catalog, certificate::CertificateGate, progress::ModuleProgress};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{
    ui::{accent, bold, dim, frame_layout, render_hints, text_alignment},
    App,
};

fn status_span(app: &App, module: &ModuleProgress) -> Span<'static> {
    if module.completed {
        let label = match module.quiz_score {
            Some(score) => format!("✓ {} ({score}%)", app.t("completed")),
            None => format!("✓ {}", app.t("completed")),
        };
        Span::styled(label, accent())
    } else if module.progress > 0 {
        Span::styled(
            format!("{}% · {}", module.progress, app.t("continue")),
            bold().fg(Color::Yellow),
        )
    } else {
        Span::styled(app.t("start").to_string(), dim())
    }
}

pub fn render(app: &App, f: &mut Frame) {
    let lang = app.language();
    let progress = &app.course.progress;
    let (body, footer) = frame_layout(f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(body);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(app.t("app_title"), bold().fg(Color::Green))),
        Line::from(Span::styled(app.t("app_subtitle"), dim())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let total = progress.total_progress();
    let gauge = Gauge::default()
        .block(Block::bordered().title(format!(" {} ", app.t("progress"))))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(total.clamp(0, 100) as u16)
        .label(format!(
            "{total}% · {}/{}",
            progress.completed_count(),
            progress.modules().len()
        ));
    f.render_widget(gauge, chunks[1]);

    let catalog = catalog::catalog();
    let items: Vec<ListItem> = catalog
        .modules()
        .iter()
        .map(|info| {
            let title = catalog.module_title(&info.id, lang);
            let mut first = vec![
                Span::raw(format!("{} ", info.icon)),
                Span::styled(title, bold()),
                Span::raw("  "),
            ];
            if let Some(module) = progress.module_progress(&info.id) {
                first.push(status_span(app, module));
            }
            let second = Line::from(Span::styled(
                format!(
                    "   {} · {} min",
                    app.t(&info.description_key()),
                    info.duration_mins
                ),
                dim(),
            ));
            ListItem::new(vec![Line::from(first), second])
        })
        .collect();

    let list = List::new(items)
        .block(Block::bordered().title(format!(" {} ", app.t("modules"))))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, chunks[2], &mut state);

    let cert = if CertificateGate::is_eligible(progress) {
        Span::styled(format!("🏆 {} ✓", app.t("certificate")), accent())
    } else {
        Span::styled(
            format!(
                "🔒 {} · {}% remaining",
                app.t("certificate"),
                CertificateGate::remaining(progress)
            ),
            dim(),
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            cert,
            Span::styled(format!("   {}", lang.native_name()), dim()),
        ]))
        .alignment(text_alignment(lang)),
        chunks[3],
    );

    render_hints(
        f,
        footer,
        &[
            ("↑/↓", "select"),
            ("enter", "open"),
            ("c", "certificate"),
            ("s", "settings"),
            ("q", "quit"),
        ],
    );
}
