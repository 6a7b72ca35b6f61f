//! # civic-survey
//!
//! Survey response engine. Presentation-agnostic.
//!
//! A `SurveySession` takes a `Survey` definition, keeps the user's answers
//! in a `ResponseStore`, and decides which questions are shown, whether the
//! user may move on, and whether the survey may be submitted.
//!
//! ## Usage
//!
//! ```rust
//! use civic_survey::{QuestionType, RecordingHost, Survey, SurveyQuestion, SurveySession};
//!
//! let survey = Survey::new(
//!     "voter-basics",
//!     "Voter basics",
//!     vec![
//!         SurveyQuestion::new("registered", QuestionType::YesNo, "Are you registered to vote?")
//!             .required(),
//!         SurveyQuestion::new("where", QuestionType::Text, "Where do you vote?")
//!             .show_if("registered", ["Yes"]),
//!     ],
//! );
//!
//! let mut session = SurveySession::new(survey);
//! assert_eq!(session.visible_questions().len(), 1);
//!
//! session.update_answer("registered", "Yes").unwrap();
//! assert_eq!(session.visible_questions().len(), 2);
//!
//! session.next().unwrap();
//! assert!(session.is_last());
//!
//! let mut host = RecordingHost::new();
//! session.submit(&mut host).unwrap();
//! ```
//!
//! ## Pieces
//!
//! - `visibility` - the visibility filter (`visible_questions`, `VisibilityMode`)
//! - `navigation` - the navigation controller (`Navigator`, `Step`)
//! - `validation` - the submission validator (`check_submission`)
//! - `SurveySession` - ties them to one response store
//!
//! Front ends are separate crates that drive a session:
//! - `civic-survey-dialoguer` - step-by-step terminal prompts via dialoguer

// Re-export all types from civic-survey-types
pub use civic_survey_types::*;

pub mod navigation;
pub mod validation;
pub mod visibility;

mod session;
pub use session::{Progress, SurveySession};

pub use navigation::Step;
pub use visibility::VisibilityMode;

// Host for testing sessions without a real backend
mod recording_host;
pub use recording_host::{RecordingHost, RecordingHostError};
