use chrono::NaiveDate;

use crate::persistence::PersistenceAdapter;
use crate::progress::ProgressStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CertificateError {
    #[error("course is {total}% complete; finish every module first")]
    NotEligible { total: i32 },

    #[error("please enter your name")]
    MissingName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub holder: String,
    pub issued_on: NaiveDate,
    pub modules_completed: usize,
    /// Mean quiz score over modules that recorded one
    pub average_quiz_score: Option<u32>,
}

/// All-or-nothing unlock of the completion certificate
pub struct CertificateGate;

impl CertificateGate {
    /// Eligible only when the course total is exactly 100, i.e. every module
    /// is at 100. A rounded total of 100 with one module short stays locked.
    pub fn is_eligible<S: PersistenceAdapter>(store: &ProgressStore<S>) -> bool {
        store.total_progress() == 100 && store.all_modules_complete()
    }

    pub fn remaining<S: PersistenceAdapter>(store: &ProgressStore<S>) -> i32 {
        if Self::is_eligible(store) {
            0
        } else {
            (100 - store.total_progress()).max(1)
        }
    }

    pub fn issue<S: PersistenceAdapter>(
        store: &ProgressStore<S>,
        name: &str,
        issued_on: NaiveDate,
    ) -> Result<Certificate, CertificateError> {
        if !Self::is_eligible(store) {
            return Err(CertificateError::NotEligible {
                total: store.total_progress(),
            });
        }
        let holder = name.trim();
        if holder.is_empty() {
            return Err(CertificateError::MissingName);
        }

        let scores: Vec<u64> = store
            .modules()
            .iter()
            .filter_map(|m| m.quiz_score.map(u64::from))
            .collect();
        let average_quiz_score = if scores.is_empty() {
            None
        } else {
            let sum: u64 = scores.iter().sum();
            let n = scores.len() as u64;
            let mean = (2 * sum + n) / (2 * n);
            Some(u32::try_from(mean).unwrap_or(u32::MAX))
        };

        Ok(Certificate {
            holder: holder.to_string(),
            issued_on,
            modules_completed: store.completed_count(),
            average_quiz_score,
        })
    }
}
