use ratatui::Frame;

use crate::{
    ui::{certificate, home, lesson, settings},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Module list with overall progress
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        home::render(app, f);
    }
}

pub struct LessonScreen;

impl Screen for LessonScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        match &app.lesson {
            Some(view) => lesson::render(app, view, f),
            None => home::render(app, f),
        }
    }
}

pub struct CertificateScreen;

impl Screen for CertificateScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        certificate::render(app, f);
    }
}

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        settings::render(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Home => Box::new(HomeScreen),
        AppState::Lesson => Box::new(LessonScreen),
        AppState::Certificate => Box::new(CertificateScreen),
        AppState::Settings => Box::new(SettingsScreen),
    }
}
