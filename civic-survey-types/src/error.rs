use crate::QuestionId;

/// Error type for survey session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `next` was refused because the current question still needs an answer.
    #[error("Question '{0}' is required")]
    RequiredUnanswered(QuestionId),

    /// Submission was refused; carries the unanswered required question ids.
    #[error("Please answer {} required question(s)", .unanswered.len())]
    Incomplete { unanswered: Vec<QuestionId> },

    /// The survey does not allow saving partial responses.
    #[error("This survey does not allow saving partial responses")]
    PartialSaveDisabled,

    /// The answer was refused by the question's input constraints.
    #[error("Answer for '{question}' rejected: {reason}")]
    Rejected {
        question: QuestionId,
        reason: AnswerRejected,
    },

    /// The question id is not part of this survey.
    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    /// The host's completion or save callback failed. Responses are kept.
    #[error("Failed to persist responses: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl SessionError {
    /// Wrap a host failure.
    pub fn persistence(err: impl Into<anyhow::Error>) -> Self {
        Self::Persistence(err.into())
    }

    /// Check if this error is a validation failure the user can fix in the form.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RequiredUnanswered(_) | Self::Incomplete { .. } | Self::Rejected { .. }
        )
    }
}

/// Why a renderer refused an answer for a question.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerRejected {
    #[error("expected a {expected} answer, got {actual}")]
    WrongShape {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("you can select at most {max} option(s), got {selected}")]
    TooManySelections { max: usize, selected: usize },

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("{value} is out of range")]
    OutOfRange {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("'{value}' is not a valid {kind}")]
    InvalidFormat { kind: &'static str, value: String },

    #[error("this question does not take an answer")]
    NotAnswerable,

    #[error("this question type is not supported yet")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_message_counts_questions() {
        let err = SessionError::Incomplete {
            unanswered: vec!["q1".into(), "q3".into()],
        };
        assert_eq!(err.to_string(), "Please answer 2 required question(s)");
        assert!(err.is_validation());
    }

    #[test]
    fn persistence_is_not_validation() {
        let err = SessionError::persistence(anyhow::anyhow!("network down"));
        assert!(!err.is_validation());
        assert!(err.to_string().contains("network down"));
    }
}
