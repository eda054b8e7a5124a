mod ui;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hajj_course::{
    app_dirs::AppDirs,
    catalog,
    certificate::{Certificate, CertificateGate},
    config::{Config, ConfigStore, FileConfigStore, StorageKind},
    course::{self, Course, SharedBackend},
    export,
    language::Language,
    logging,
    quiz::{Advance, Selection},
    runtime::{CourseEvent, CourseEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    sequencer::{LessonSequencer, Stage},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::File,
    io::{self, stdin, Write},
    path::PathBuf,
};
use tracing::info;

/// interactive terminal course on the Hajj rituals
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Walk through each stage of the Hajj: watch a guided simulation, complete the hands-on checklist, answer the quiz, and earn a certificate once every module is done."
)]
pub struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    /// where progress is stored (overrides the config file)
    #[clap(long, value_enum)]
    storage: Option<StorageArg>,

    /// directory for progress data and logs
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// keep progress in memory only for this run
    #[clap(long)]
    ephemeral: bool,

    /// interface language for this run (also saved as the preference)
    #[clap(short = 'l', long, value_enum)]
    lang: Option<LangArg>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// print module progress and certificate status
    Status,
    /// clear all saved progress
    Reset,
    /// write progress as CSV
    Export {
        /// output file (stdout when omitted)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// save the interface language preference
    Lang {
        #[clap(value_enum)]
        language: LangArg,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum)]
pub enum StorageArg {
    File,
    Sqlite,
}

impl From<StorageArg> for StorageKind {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::File => StorageKind::File,
            StorageArg::Sqlite => StorageKind::Sqlite,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum)]
pub enum LangArg {
    En,
    Bn,
    Ar,
}

impl LangArg {
    fn as_language(&self) -> Language {
        match self {
            LangArg::En => Language::En,
            LangArg::Bn => Language::Bn,
            LangArg::Ar => Language::Ar,
        }
    }
}

impl Cli {
    /// Apply command line overrides on top of the loaded config
    fn effective_config(&self, mut config: Config) -> Config {
        if let Some(storage) = self.storage {
            config.storage = storage.into();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Home,
    Lesson,
    Certificate,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Continue,
    Quit,
}

/// An open lesson plus the row highlighted in its task or quiz list
#[derive(Debug)]
pub struct LessonView {
    pub sequencer: LessonSequencer,
    pub cursor: usize,
}

#[derive(Debug, Default)]
pub struct CertificateView {
    pub name: String,
    pub issued: Option<Certificate>,
    pub error: Option<String>,
}

pub struct App {
    pub course: Course,
    pub state: AppState,
    pub selected: usize,
    pub lesson: Option<LessonView>,
    pub certificate: CertificateView,
    pub confirm_reset: bool,
    pub storage_label: String,
}

impl App {
    pub fn new(course: Course, storage_label: String) -> Self {
        Self {
            course,
            state: AppState::Home,
            selected: 0,
            lesson: None,
            certificate: CertificateView::default(),
            confirm_reset: false,
            storage_label,
        }
    }

    pub fn language(&self) -> Language {
        self.course.language.language()
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.course.language.t(key)
    }

    fn module_count(&self) -> usize {
        self.course.progress.modules().len()
    }

    pub fn selected_module_id(&self) -> Option<&'static str> {
        catalog::catalog()
            .modules()
            .get(self.selected)
            .map(|m| m.id.as_str())
    }

    /// Opening a lesson always starts a fresh session at the video stage
    pub fn open_lesson(&mut self) {
        if let Some(id) = self.selected_module_id() {
            let sequencer = self.course.start_lesson(id);
            info!(module = id, "lesson opened");
            self.lesson = Some(LessonView {
                sequencer,
                cursor: 0,
            });
            self.state = AppState::Lesson;
        }
    }

    pub fn go_home(&mut self) {
        self.lesson = None;
        self.confirm_reset = false;
        self.state = AppState::Home;
    }

    pub fn on_tick(&mut self) -> bool {
        match self.lesson.as_mut() {
            Some(view) => view.sequencer.on_tick(&mut self.course.progress),
            None => false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        match self.state {
            AppState::Home => self.on_home_key(key),
            AppState::Lesson => {
                self.on_lesson_key(key);
                Control::Continue
            }
            AppState::Certificate => {
                self.on_certificate_key(key);
                Control::Continue
            }
            AppState::Settings => {
                self.on_settings_key(key);
                Control::Continue
            }
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.module_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.open_lesson(),
            KeyCode::Char('c') => {
                self.certificate = CertificateView::default();
                self.state = AppState::Certificate;
            }
            KeyCode::Char('s') => self.state = AppState::Settings,
            _ => {}
        }
        Control::Continue
    }

    fn on_lesson_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('b')) {
            self.go_home();
            return;
        }
        let Some(view) = self.lesson.as_mut() else {
            self.go_home();
            return;
        };
        let progress = &mut self.course.progress;
        let seq = &mut view.sequencer;

        if seq.is_finished() {
            if key.code == KeyCode::Enter {
                self.go_home();
            }
            return;
        }

        match seq.stage() {
            Stage::Video => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => seq.toggle_playback(),
                KeyCode::Char('r') => seq.restart_video(),
                KeyCode::Right => {
                    let to = seq.video().position() as i32 + 10;
                    seq.seek(to, progress);
                }
                KeyCode::Left => {
                    let to = seq.video().position() as i32 - 10;
                    seq.seek(to, progress);
                }
                _ => {}
            },
            Stage::Task => {
                let steps = seq.task().steps().len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        view.cursor = view.cursor.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        if view.cursor + 1 < steps {
                            view.cursor += 1;
                        }
                    }
                    KeyCode::Char(' ') => {
                        seq.toggle_step(view.cursor);
                    }
                    KeyCode::Enter => {
                        if seq.task().all_done() {
                            seq.finish_task(progress);
                            view.cursor = 0;
                        } else {
                            seq.toggle_step(view.cursor);
                        }
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        if let Some(idx) = (c as usize).checked_sub('1' as usize) {
                            seq.toggle_step(idx);
                        }
                    }
                    _ => {}
                }
            }
            Stage::Quiz => {
                let Some(quiz) = seq.quiz() else {
                    return;
                };
                let options = quiz.question().options(self.course.language.language()).len();
                let answered = quiz.is_answered();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') if !answered => {
                        view.cursor = view.cursor.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') if !answered => {
                        if view.cursor + 1 < options {
                            view.cursor += 1;
                        }
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() && !answered => {
                        if let Some(idx) = (c as usize).checked_sub('1' as usize) {
                            if let Some(Selection::Recorded { .. }) = seq.select_answer(idx) {
                                view.cursor = idx;
                            }
                        }
                    }
                    KeyCode::Enter if !answered => {
                        seq.select_answer(view.cursor);
                    }
                    KeyCode::Enter | KeyCode::Char('n') => {
                        if let Some(Advance::Next(_)) = seq.advance_quiz(progress) {
                            view.cursor = 0;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn on_certificate_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_home(),
            KeyCode::Backspace => {
                self.certificate.name.pop();
            }
            KeyCode::Enter => {
                let today = Local::now().date_naive();
                match CertificateGate::issue(&self.course.progress, &self.certificate.name, today)
                {
                    Ok(cert) => {
                        info!(holder = %cert.holder, "certificate issued");
                        self.certificate.issued = Some(cert);
                        self.certificate.error = None;
                    }
                    Err(err) => self.certificate.error = Some(err.to_string()),
                }
            }
            KeyCode::Char(c) if self.certificate.issued.is_none() => {
                self.certificate.name.push(c);
                self.certificate.error = None;
            }
            _ => {}
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        if self.confirm_reset {
            if key.code == KeyCode::Char('y') {
                self.course.progress.reset_progress();
            }
            self.confirm_reset = false;
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => self.go_home(),
            KeyCode::Char('l') => {
                let next = self.language().next();
                self.course.language.set_language(next);
            }
            KeyCode::Char('r') => self.confirm_reset = true,
            _ => {}
        }
    }
}

fn open_course(cli: &Cli, config: &Config) -> anyhow::Result<(Course, String)> {
    if cli.ephemeral {
        return Ok((Course::open(course::ephemeral_backend()), "memory".to_string()));
    }
    let data_dir = AppDirs::resolve_data_dir(config.data_dir.as_deref());
    let backend: SharedBackend = course::open_backend(config.storage, &data_dir)
        .with_context(|| format!("opening {} storage in {}", config.storage, data_dir.display()))?;
    let label = format!(
        "{} ({})",
        config.storage,
        AppDirs::storage_location(config.storage, &data_dir).display()
    );
    Ok((Course::open(backend), label))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.effective_config(FileConfigStore::new().load());
    let data_dir = AppDirs::resolve_data_dir(config.data_dir.as_deref());
    logging::init(&AppDirs::log_path(&data_dir));

    let (mut course, storage_label) = open_course(&cli, &config)?;
    if let Some(lang) = cli.lang {
        course.language.set_language(lang.as_language());
    }

    match &cli.command {
        Some(command) => run_command(command, &mut course, &mut io::stdout()),
        None => {
            if !stdin().is_tty() {
                anyhow::bail!("stdin must be a tty; use a subcommand such as `status` instead");
            }
            run_tui(App::new(course, storage_label), &config)
        }
    }
}

fn run_command<W: Write>(command: &Command, course: &mut Course, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Status => write_status(course, out)?,
        Command::Reset => {
            course.progress.reset_progress();
            writeln!(out, "Progress has been reset")?;
        }
        Command::Export { output } => match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                export::write_csv(course.progress.modules(), file)?;
            }
            None => export::write_csv(course.progress.modules(), &mut *out)?,
        },
        Command::Lang { language } => {
            course.language.set_language(language.as_language());
            writeln!(out, "Language set to {}", language.as_language().native_name())?;
        }
    }
    Ok(())
}

fn write_status<W: Write>(course: &Course, out: &mut W) -> io::Result<()> {
    let lang = course.language.language();
    let now = Utc::now();
    let catalog = catalog::catalog();

    writeln!(out, "{}", course.language.t("progress"))?;
    for module in course.progress.modules() {
        let state = if module.completed {
            match module.quiz_score {
                Some(score) => format!("{} ({score}%)", course.language.t("completed")),
                None => course.language.t("completed").to_string(),
            }
        } else {
            String::new()
        };
        let seen = module
            .last_accessed
            .map(|t| ui::time_ago(t, now))
            .unwrap_or_default();
        writeln!(
            out,
            "  {:<28} {:>4}%  {:<16} {}",
            catalog.module_title(&module.id, lang),
            module.progress,
            state,
            seen
        )?;
    }
    writeln!(out, "Total: {}%", course.progress.total_progress())?;
    let cert = if CertificateGate::is_eligible(&course.progress) {
        "unlocked".to_string()
    } else {
        format!("locked ({}% remaining)", CertificateGate::remaining(&course.progress))
    };
    writeln!(out, "{}: {cert}", course.language.t("certificate"))
}

fn run_tui(mut app: App, config: &Config) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(config.video_tick_ms),
    );
    let result = event_loop(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend, E: CourseEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> anyhow::Result<()> {
    terminal.draw(|f| ui::draw(app, f))?;
    loop {
        let redraw = match runner.step() {
            CourseEvent::Tick => app.on_tick(),
            CourseEvent::Resize => true,
            CourseEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
                true
            }
        };
        if redraw {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }
    Ok(())
}
