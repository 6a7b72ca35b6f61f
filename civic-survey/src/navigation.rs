//! Navigation controller: position within the visible sequence.

use crate::validation::is_answered;
use crate::{ResponseStore, SessionError, SurveyQuestion};

/// Outcome of a navigation request that was not refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The position changed.
    Moved { from: usize, to: usize },
    /// Already at the boundary (or nothing to show); position unchanged.
    Stayed,
}

impl Step {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Tracks the displayed position in the visible sequence.
///
/// The controller holds no questions itself; callers pass the current
/// visible sequence on every call, as base-order indices into the survey.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    position: usize,
}

impl Navigator {
    pub fn new() -> Self {
        Self { position: 0 }
    }

    /// Current index into the visible sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Base index of the displayed question, if anything is visible.
    pub fn current(&self, visible: &[usize]) -> Option<usize> {
        visible.get(self.position).copied()
    }

    /// Whether the displayed question is the last visible one.
    ///
    /// This is where a front end offers "submit" instead of "next".
    pub fn is_last(&self, visible: &[usize]) -> bool {
        !visible.is_empty() && self.position + 1 >= visible.len()
    }

    /// Advance one question.
    ///
    /// Refused with `RequiredUnanswered` when the displayed question needs
    /// an answer and has none. At the last question this is a no-op.
    pub fn next(
        &mut self,
        questions: &[SurveyQuestion],
        visible: &[usize],
        responses: &ResponseStore,
    ) -> Result<Step, SessionError> {
        let Some(current) = self.current(visible) else {
            return Ok(Step::Stayed);
        };
        let question = &questions[current];
        if question.requires_answer() && !is_answered(responses, &question.id) {
            return Err(SessionError::RequiredUnanswered(question.id.clone()));
        }
        if self.is_last(visible) {
            return Ok(Step::Stayed);
        }
        let from = self.position;
        self.position += 1;
        Ok(Step::Moved {
            from,
            to: self.position,
        })
    }

    /// Go back one question. Never gated.
    pub fn previous(&mut self) -> Step {
        if self.position == 0 {
            return Step::Stayed;
        }
        let from = self.position;
        self.position -= 1;
        Step::Moved {
            from,
            to: self.position,
        }
    }

    /// Re-derive the position after the visible sequence changed.
    ///
    /// `displayed` is the base index that was on screen before the change.
    /// If it is still visible the position follows it. Otherwise the
    /// position moves to the next visible question after it in base order,
    /// or to the last visible question when none follows.
    pub fn reposition(&mut self, displayed: Option<usize>, visible: &[usize]) {
        if visible.is_empty() {
            self.position = 0;
            return;
        }
        let last = visible.len() - 1;
        self.position = match displayed {
            Some(base) => match visible.iter().position(|&v| v == base) {
                Some(index) => index,
                None => visible.iter().position(|&v| v > base).unwrap_or(last),
            },
            None => self.position.min(last),
        };
    }
}
