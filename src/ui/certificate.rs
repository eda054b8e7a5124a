use hajj_course::certificate::{Certificate, CertificateGate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    ui::{accent, bold, dim, frame_layout, render_hints},
    App,
};

pub fn render(app: &App, f: &mut Frame) {
    let (body, footer) = frame_layout(f.area());

    if let Some(cert) = &app.certificate.issued {
        render_issued(app, f, body, cert);
        render_hints(f, footer, &[("esc", "back")]);
    } else if CertificateGate::is_eligible(&app.course.progress) {
        render_name_entry(app, f, body);
        render_hints(f, footer, &[("enter", "issue"), ("esc", "back")]);
    } else {
        render_locked(app, f, body);
        render_hints(f, footer, &[("esc", "back")]);
    }
}

fn render_locked(app: &App, f: &mut Frame, area: Rect) {
    let progress = &app.course.progress;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("🔒 Certificate Locked", bold())),
            Line::from(Span::styled(
                format!(
                    "Complete all modules to unlock · {}% remaining",
                    CertificateGate::remaining(progress)
                ),
                dim(),
            )),
        ])
        .alignment(Alignment::Center),
        chunks[0],
    );

    let total = progress.total_progress();
    f.render_widget(
        Gauge::default()
            .block(Block::bordered())
            .gauge_style(Style::default().fg(Color::Yellow))
            .percent(total.clamp(0, 100) as u16)
            .label(format!("{total}%")),
        chunks[1],
    );

    if let Some(err) = &app.certificate.error {
        f.render_widget(
            Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            chunks[2],
        );
    }
}

fn render_name_entry(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(format!("🏆 {}", app.t("certificate")), accent())),
            Line::from(Span::styled("Enter your name as it should appear", dim())),
        ])
        .alignment(Alignment::Center),
        chunks[0],
    );

    let name = app.certificate.name.as_str();
    f.render_widget(
        Paragraph::new(name).block(Block::bordered().title(" Name ")),
        chunks[1],
    );
    let cursor_x = chunks[1].x + 1 + name.width() as u16;
    if cursor_x < chunks[1].right().saturating_sub(1) {
        f.set_cursor_position(Position::new(cursor_x, chunks[1].y + 1));
    }

    if let Some(err) = &app.certificate.error {
        f.render_widget(
            Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red)))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }
}

fn render_issued(app: &App, f: &mut Frame, area: Rect, cert: &Certificate) {
    let score = cert
        .average_quiz_score
        .map(|s| format!("Average quiz score: {s}%"))
        .unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Certificate of Completion", bold())),
        Line::from(""),
        Line::from(Span::styled("This certifies that", dim())),
        Line::from(Span::styled(cert.holder.clone(), accent())),
        Line::from(Span::styled(
            format!("has completed the {}", app.t("app_title")),
            dim(),
        )),
        Line::from(""),
        Line::from(format!("{} modules completed", cert.modules_completed)),
        Line::from(score),
        Line::from(Span::styled(
            cert.issued_on.format("%-d %B %Y").to_string(),
            dim(),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().border_style(Style::default().fg(Color::Yellow)))
            .alignment(Alignment::Center),
        area,
    );
}
