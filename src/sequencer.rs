use tracing::{debug, info, warn};

use crate::catalog;
use crate::language::Localized;
use crate::progress::ProgressSink;
use crate::quiz::{Advance, QuizQuestion, QuizSession, Selection};

/// Progress recorded once the video has been watched
pub const VIDEO_DONE_PROGRESS: i32 = 33;
/// Progress recorded once the interactive task is done
pub const TASK_DONE_PROGRESS: i32 = 66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Video,
    Task,
    Quiz,
}

/// Simulated playback advancing one percent per tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoPlayback {
    position: u8,
    playing: bool,
}

impl VideoPlayback {
    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.position >= 100
    }

    pub fn toggle(&mut self) {
        if self.is_finished() {
            self.playing = false;
        } else {
            self.playing = !self.playing;
        }
    }

    /// Rewinds to the start, paused
    pub fn restart(&mut self) {
        self.position = 0;
        self.playing = false;
    }

    /// Returns the new position when playback moved
    pub fn tick(&mut self) -> Option<u8> {
        if !self.playing {
            return None;
        }
        self.position = (self.position + 1).min(100);
        if self.is_finished() {
            self.playing = false;
        }
        Some(self.position)
    }

    pub fn seek(&mut self, percentage: i32) -> u8 {
        self.position = percentage.clamp(0, 100) as u8;
        if self.is_finished() {
            self.playing = false;
        }
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStep {
    pub label: Localized<String>,
    pub done: bool,
}

/// The hands-on checklist shown between the video and the quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChecklist {
    steps: Vec<TaskStep>,
}

impl TaskChecklist {
    pub fn new(labels: impl IntoIterator<Item = Localized<String>>) -> Self {
        Self {
            steps: labels
                .into_iter()
                .map(|label| TaskStep { label, done: false })
                .collect(),
        }
    }

    pub fn for_module(module_id: &str) -> Self {
        Self::new(catalog::catalog().task_steps(module_id).iter().cloned())
    }

    pub fn steps(&self) -> &[TaskStep] {
        &self.steps
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.done = !step.done;
                true
            }
            None => false,
        }
    }

    pub fn done_count(&self) -> usize {
        self.steps.iter().filter(|s| s.done).count()
    }

    pub fn all_done(&self) -> bool {
        self.steps.iter().all(|s| s.done)
    }
}

/// Drives one module lesson through video, task and quiz.
///
/// Stages only move forward. Progress writes go to the supplied
/// [`ProgressSink`]; when the module id is absent the stages still advance
/// but nothing is recorded.
#[derive(Debug, Clone)]
pub struct LessonSequencer {
    module_id: Option<String>,
    stage: Stage,
    video: VideoPlayback,
    task: TaskChecklist,
    questions: Vec<QuizQuestion>,
    quiz: Option<QuizSession>,
    quiz_score: Option<u32>,
}

impl LessonSequencer {
    /// Starts a lesson for a catalog module at the video stage
    pub fn new(module_id: Option<&str>) -> Self {
        let key = module_id.unwrap_or_default();
        Self::with_content(
            module_id,
            TaskChecklist::for_module(key),
            catalog::catalog().questions(key).to_vec(),
        )
    }

    pub fn with_content(
        module_id: Option<&str>,
        task: TaskChecklist,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        Self {
            module_id: module_id.map(str::to_string),
            stage: Stage::Video,
            video: VideoPlayback::default(),
            task,
            questions,
            quiz: None,
            quiz_score: None,
        }
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module_id.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn video(&self) -> &VideoPlayback {
        &self.video
    }

    pub fn task(&self) -> &TaskChecklist {
        &self.task
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    /// Score of the finished quiz; `None` until the lesson is done
    pub fn quiz_score(&self) -> Option<u32> {
        self.quiz_score
    }

    pub fn is_finished(&self) -> bool {
        self.quiz_score.is_some()
    }

    pub fn toggle_playback(&mut self) {
        if self.stage == Stage::Video {
            self.video.toggle();
        }
    }

    pub fn restart_video(&mut self) {
        if self.stage == Stage::Video {
            self.video.restart();
        }
    }

    /// Advances playback by one step
    pub fn on_tick<P: ProgressSink>(&mut self, sink: &mut P) -> bool {
        if self.stage != Stage::Video {
            return false;
        }
        match self.video.tick() {
            Some(position) => {
                self.on_video_progress(position as i32, sink);
                true
            }
            None => false,
        }
    }

    pub fn seek<P: ProgressSink>(&mut self, percentage: i32, sink: &mut P) {
        if self.stage != Stage::Video {
            return;
        }
        let position = self.video.seek(percentage);
        self.on_video_progress(position as i32, sink);
    }

    /// Playback report from the video stage; 100 moves the lesson to the task
    pub fn on_video_progress<P: ProgressSink>(&mut self, percentage: i32, sink: &mut P) -> bool {
        if self.stage != Stage::Video || percentage < 100 {
            return false;
        }
        self.stage = Stage::Task;
        self.record(VIDEO_DONE_PROGRESS, sink);
        debug!(module = ?self.module_id, "video watched");
        true
    }

    pub fn toggle_step(&mut self, index: usize) -> bool {
        self.stage == Stage::Task && self.task.toggle(index)
    }

    /// Moves on to the quiz once every task step is done
    pub fn finish_task<P: ProgressSink>(&mut self, sink: &mut P) -> bool {
        if self.stage != Stage::Task || !self.task.all_done() {
            return false;
        }
        self.stage = Stage::Quiz;
        self.record(TASK_DONE_PROGRESS, sink);

        match QuizSession::new(self.questions.clone()) {
            Ok(session) => self.quiz = Some(session),
            Err(err) => {
                // nothing to ask; the lesson counts as passed
                warn!(module = ?self.module_id, error = %err, "lesson has no usable quiz");
                self.finish(100, sink);
            }
        }
        true
    }

    pub fn select_answer(&mut self, index: usize) -> Option<Selection> {
        if self.stage != Stage::Quiz {
            return None;
        }
        self.quiz.as_mut().map(|quiz| quiz.select_answer(index))
    }

    /// Advances the quiz; the final question completes the module
    pub fn advance_quiz<P: ProgressSink>(&mut self, sink: &mut P) -> Option<Advance> {
        if self.stage != Stage::Quiz {
            return None;
        }
        let quiz = self.quiz.as_mut()?;
        let mut finished_with = None;
        let outcome = quiz.advance(|score| finished_with = Some(score));
        if let Some(score) = finished_with {
            self.finish(score, sink);
        }
        Some(outcome)
    }

    fn finish<P: ProgressSink>(&mut self, score: u32, sink: &mut P) {
        self.quiz_score = Some(score);
        if let Some(id) = self.module_id.as_deref() {
            sink.complete_module(id, Some(score));
        }
        info!(module = ?self.module_id, score, "lesson finished");
    }

    /// Stage writes never lower what is already stored, so replaying a
    /// finished module leaves it at 100.
    fn record<P: ProgressSink>(&self, target: i32, sink: &mut P) {
        let Some(id) = self.module_id.as_deref() else {
            return;
        };
        let current = sink.progress_of(id).unwrap_or(0);
        sink.update_module_progress(id, current.max(target));
    }
}
