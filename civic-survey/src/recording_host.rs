//! Host for exercising survey sessions without a real backend.
//!
//! `RecordingHost` keeps every payload handed to it so tests can assert on
//! what the engine would have persisted. It can also be told to fail, to
//! exercise the retry path.
//!
//! # Example
//!
//! ```rust
//! use civic_survey::{QuestionType, RecordingHost, Survey, SurveyQuestion, SurveySession};
//!
//! let survey = Survey::new(
//!     "check-in",
//!     "Weekly check-in",
//!     vec![SurveyQuestion::new("mood", QuestionType::RatingStars, "How was civics class?")],
//! );
//!
//! let mut host = RecordingHost::new();
//! let mut session = SurveySession::new(survey);
//! session.update_answer("mood", 4).unwrap();
//! session.submit(&mut host).unwrap();
//!
//! assert_eq!(host.completions().len(), 1);
//! assert_eq!(host.completions()[0][0].answer.as_number(), Some(4.0));
//! ```

use crate::{SurveyHost, SurveyResponse};

/// A host that records completions and partial saves in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    completions: Vec<Vec<SurveyResponse>>,
    saves: Vec<Vec<SurveyResponse>>,
    failures_left: usize,
}

/// Error type for RecordingHost.
#[derive(Debug, thiserror::Error)]
pub enum RecordingHostError {
    #[error("Host unavailable (simulated failure, {0} left)")]
    Unavailable(usize),
}

impl RecordingHost {
    /// Create a new host that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` calls, then accept.
    pub fn failing(mut self, count: usize) -> Self {
        self.failures_left = count;
        self
    }

    /// Payloads received by `on_complete`, oldest first.
    pub fn completions(&self) -> &[Vec<SurveyResponse>] {
        &self.completions
    }

    /// Payloads received by `on_save_progress`, oldest first.
    pub fn saves(&self) -> &[Vec<SurveyResponse>] {
        &self.saves
    }

    fn check_failure(&mut self) -> Result<(), RecordingHostError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(RecordingHostError::Unavailable(self.failures_left));
        }
        Ok(())
    }
}

impl SurveyHost for RecordingHost {
    fn on_complete(&mut self, responses: &[SurveyResponse]) -> anyhow::Result<()> {
        self.check_failure()?;
        self.completions.push(responses.to_vec());
        Ok(())
    }

    fn on_save_progress(&mut self, responses: &[SurveyResponse]) -> anyhow::Result<()> {
        self.check_failure()?;
        self.saves.push(responses.to_vec());
        Ok(())
    }
}
