use serde::Deserialize;
use tracing::debug;

use crate::language::{Language, Localized};

/// A multiple-choice question from the static catalog
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub question: Localized<String>,
    pub options: Localized<Vec<String>>,
    pub correct_answer: usize,
    pub explanation: Localized<String>,
}

impl QuizQuestion {
    pub fn prompt(&self, lang: Language) -> &str {
        self.question.get(lang)
    }

    pub fn options(&self, lang: Language) -> &[String] {
        self.options.get(lang)
    }

    pub fn explanation(&self, lang: Language) -> &str {
        self.explanation.get(lang)
    }

    fn option_count(&self) -> usize {
        Language::ALL
            .iter()
            .map(|lang| self.options.get(*lang).len())
            .min()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    NoQuestions,

    #[error("question {id} has no options or an out-of-range answer")]
    InvalidQuestion { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Recorded { correct: bool },
    /// The current question already has an answer; nothing changed
    AlreadyAnswered,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index
    Next(usize),
    /// The last question was passed; carries the final percentage
    Finished(u32),
    /// The current question must be answered first
    Unanswered,
    AlreadyFinished,
}

/// `round(100 * correct / total)` with halves rounded up
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}

/// One attempt at a module quiz. Dropped when the attempt completes or the
/// learner navigates away; never persisted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    correct_count: usize,
    answered: Vec<bool>,
    selected: Option<usize>,
    show_explanation: bool,
    final_score: Option<u32>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if let Some(bad) = questions
            .iter()
            .find(|q| q.option_count() == 0 || q.correct_answer >= q.option_count())
        {
            return Err(QuizError::InvalidQuestion { id: bad.id.clone() });
        }

        let answered = vec![false; questions.len()];
        Ok(Self {
            questions,
            current: 0,
            correct_count: 0,
            answered,
            selected: None,
            show_explanation: false,
            final_score: None,
        })
    }

    pub fn question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn show_explanation(&self) -> bool {
        self.show_explanation
    }

    pub fn is_answered(&self) -> bool {
        self.answered[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Whether the current selection is the correct option
    pub fn selection_correct(&self) -> Option<bool> {
        self.selected.map(|s| s == self.question().correct_answer)
    }

    pub fn select_answer(&mut self, index: usize) -> Selection {
        if self.answered[self.current] {
            return Selection::AlreadyAnswered;
        }
        if index >= self.question().option_count() {
            return Selection::OutOfRange;
        }

        let correct = index == self.question().correct_answer;
        self.selected = Some(index);
        self.show_explanation = true;
        self.answered[self.current] = true;
        if correct {
            self.correct_count += 1;
        }
        debug!(question = %self.question().id, index, correct, "answer recorded");
        Selection::Recorded { correct }
    }

    /// Moves to the next question, or on the last one reports the final
    /// percentage through `on_complete`. The callback runs at most once per
    /// session.
    pub fn advance<F: FnOnce(u32)>(&mut self, on_complete: F) -> Advance {
        if self.final_score.is_some() {
            return Advance::AlreadyFinished;
        }
        if !self.answered[self.current] {
            return Advance::Unanswered;
        }

        if self.is_last() {
            let score = percentage(self.correct_count, self.questions.len());
            self.final_score = Some(score);
            on_complete(score);
            Advance::Finished(score)
        } else {
            self.current += 1;
            self.selected = None;
            self.show_explanation = false;
            Advance::Next(self.current)
        }
    }
}
