use hajj_course::{
    catalog,
    language::Language,
    quiz::QuizSession,
    scene,
    sequencer::{LessonSequencer, Stage},
};
use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::{
    ui::{accent, bold, dim, frame_layout, render_hints, text_alignment},
    App, LessonView,
};

const STAGES: [Stage; 3] = [Stage::Video, Stage::Task, Stage::Quiz];

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Video => "Video",
        Stage::Task => "Task",
        Stage::Quiz => "Quiz",
    }
}

/// `Video › [Task] › Quiz` with the active stage bracketed
pub fn breadcrumb(seq: &LessonSequencer) -> String {
    STAGES
        .iter()
        .map(|&stage| {
            if stage == seq.stage() && !seq.is_finished() {
                format!("[{}]", stage_label(stage))
            } else {
                stage_label(stage).to_string()
            }
        })
        .join(" › ")
}

pub fn render(app: &App, view: &LessonView, f: &mut Frame) {
    let lang = app.language();
    let seq = &view.sequencer;
    let (body, footer) = frame_layout(f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .split(body);

    let catalog = catalog::catalog();
    let (icon, title) = match seq.module_id() {
        Some(id) => (
            catalog.module(id).map(|m| m.icon.clone()).unwrap_or_default(),
            catalog.module_title(id, lang),
        ),
        None => (String::new(), "Lesson".to_string()),
    };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::raw(format!("{icon} ")),
                Span::styled(title, bold().fg(Color::Green)),
            ]),
            Line::from(Span::styled(breadcrumb(seq), dim())),
        ])
        .alignment(text_alignment(lang)),
        chunks[0],
    );

    let module_progress = seq
        .module_id()
        .and_then(|id| app.course.progress.module_progress(id))
        .map_or(0, |m| m.progress);
    f.render_widget(
        Gauge::default()
            .block(Block::bordered().title(format!(" {} ", app.t("progress"))))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(module_progress.clamp(0, 100) as u16)
            .label(format!("{module_progress}%")),
        chunks[1],
    );

    if let Some(score) = seq.quiz_score() {
        render_finished(f, chunks[2], score);
        render_hints(f, footer, &[("enter", "back to modules")]);
        return;
    }

    match seq.stage() {
        Stage::Video => {
            render_video(f, chunks[2], seq, lang);
            render_hints(
                f,
                footer,
                &[
                    ("space", "play/pause"),
                    ("r", "restart"),
                    ("←/→", "seek"),
                    ("esc", "back"),
                ],
            );
        }
        Stage::Task => {
            render_task(f, chunks[2], view, lang);
            render_hints(
                f,
                footer,
                &[
                    ("↑/↓", "select"),
                    ("space", "toggle"),
                    ("enter", "continue"),
                    ("esc", "back"),
                ],
            );
        }
        Stage::Quiz => {
            if let Some(quiz) = seq.quiz() {
                render_quiz(f, chunks[2], quiz, view.cursor, lang);
            }
            let hints: &[(&str, &str)] = match seq.quiz() {
                Some(quiz) if quiz.is_answered() => &[("enter", "next"), ("esc", "back")],
                _ => &[("↑/↓ 1-4", "choose"), ("enter", "answer"), ("esc", "back")],
            };
            render_hints(f, footer, hints);
        }
    }
}

fn render_video(f: &mut Frame, area: Rect, seq: &LessonSequencer, lang: Language) {
    let video = seq.video();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let module_id = seq.module_id().unwrap_or(catalog::FALLBACK_SCENE_MODULE);
    let mut lines = Vec::new();
    if let Some(frame) = scene::frame(module_id, video.position() as i32) {
        lines.push(Line::from(vec![
            Span::raw(format!("{}  ", frame.scene.icon)),
            Span::styled(frame.title(lang).to_string(), bold()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(frame.description(lang).to_string()));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Scene {}/{}", frame.index + 1, frame.count),
            dim(),
        )));
    }
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title(" Video "))
            .alignment(text_alignment(lang))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let state = if video.is_finished() {
        "✓"
    } else if video.is_playing() {
        "▶"
    } else {
        "⏸"
    };
    f.render_widget(
        Gauge::default()
            .block(Block::bordered())
            .gauge_style(Style::default().fg(Color::Cyan))
            .percent(video.position() as u16)
            .label(format!("{state} {}%", video.position())),
        chunks[1],
    );
}

fn render_task(f: &mut Frame, area: Rect, view: &LessonView, lang: Language) {
    let task = view.sequencer.task();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem> = task
        .steps()
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let (mark, style) = if step.done {
                ("[x]", accent())
            } else {
                ("[ ]", Style::default())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{mark} {}. ", i + 1), style),
                Span::styled(step.label.get(lang).clone(), style),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title(" Task "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(view.cursor));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let summary = if task.all_done() {
        Span::styled("All steps done · press enter for the quiz", accent())
    } else {
        Span::styled(
            format!("{}/{} steps done", task.done_count(), task.steps().len()),
            dim(),
        )
    };
    f.render_widget(
        Paragraph::new(summary).alignment(Alignment::Center),
        chunks[1],
    );
}

fn render_quiz(f: &mut Frame, area: Rect, quiz: &QuizSession, cursor: usize, lang: Language) {
    let question = quiz.question();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!(
                    "Question {}/{}",
                    quiz.current_index() + 1,
                    quiz.question_count()
                ),
                dim(),
            )),
            Line::from(Span::styled(question.prompt(lang).to_string(), bold())),
        ])
        .alignment(text_alignment(lang))
        .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let selected = quiz.selected();
    let items: Vec<ListItem> = question
        .options(lang)
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = match selected {
                Some(_) if i == question.correct_answer => accent(),
                Some(choice) if choice == i => bold().fg(Color::Red),
                _ => Style::default(),
            };
            ListItem::new(Span::styled(format!("{}. {option}", i + 1), style))
        })
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title(" Quiz "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if selected.is_none() {
        state.select(Some(cursor));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);

    if quiz.show_explanation() {
        let verdict = match quiz.selection_correct() {
            Some(true) => Span::styled("✓ Correct", accent()),
            _ => Span::styled("✗ Incorrect", bold().fg(Color::Red)),
        };
        f.render_widget(
            Paragraph::new(vec![
                Line::from(verdict),
                Line::from(question.explanation(lang).to_string()),
            ])
            .alignment(text_alignment(lang))
            .wrap(Wrap { trim: true }),
            chunks[2],
        );
    }
}

fn render_finished(f: &mut Frame, area: Rect, score: u32) {
    let style = if score >= 50 {
        accent()
    } else {
        bold().fg(Color::Yellow)
    };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("🎉 Lesson complete", bold())),
            Line::from(""),
            Line::from(Span::styled(format!("Quiz score: {score}%"), style)),
        ])
        .block(Block::bordered())
        .alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_marks_active_stage() {
        let seq = LessonSequencer::new(Some("sai"));
        assert_eq!(breadcrumb(&seq), "[Video] › Task › Quiz");
    }
}
