//! Core types for the civic-survey engine.
//!
//! This crate provides the foundational types for running surveys:
//! - `Survey` - The survey definition delivered by the host application
//! - `SurveyQuestion`, `QuestionType` and `ConditionalLogic` - Individual questions
//! - `Answer`, `SurveyResponse` and `ResponseStore` - Collected answers
//! - `SurveyHost` and `Narrator` traits - Capabilities injected by the host

mod question_id;
pub use question_id::QuestionId;

mod answer;
pub use answer::Answer;

mod responses;
pub use responses::{ResponseStore, SurveyResponse};

mod question;
pub use question::{
    CONTACT_FIELDS, ConditionalLogic, LIKERT_LEVELS, MAX_SCALE_POINTS, QuestionType, ShowWhen,
    SurveyQuestion, YES_NO,
};

mod survey;
pub use survey::{DefinitionIssue, Survey};

mod error;
pub use error::{AnswerRejected, SessionError};

mod traits;
pub use traits::{Narrator, SurveyHost};
