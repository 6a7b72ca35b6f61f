//! # civic-survey-dialoguer
//!
//! Dialoguer front end for civic-survey.
//!
//! Questions are presented one at a time in a classic CLI wizard style.
//! Each answer goes through `SurveySession::record_answer`, so a refused
//! answer is reported and asked again, and conditional questions appear
//! or disappear as soon as the answers they depend on change.
//!
//! ## Example
//!
//! ```rust,no_run
//! use civic_survey::{RecordingHost, SurveySession};
//! use civic_survey_dialoguer::{DialoguerRenderer, Outcome};
//!
//! fn main() -> anyhow::Result<()> {
//!     let survey = example_surveys::civic_onboarding();
//!     let mut session = SurveySession::new(survey);
//!     let mut host = RecordingHost::new();
//!
//!     if DialoguerRenderer::new().run(&mut session, &mut host)? == Outcome::Submitted {
//!         println!("{} answers stored", host.completions()[0].len());
//!     }
//!     Ok(())
//! }
//! ```

mod host;
mod narrator;
mod renderer;

pub use host::{JsonFileHost, SavedResponses, load_responses, load_survey};
pub use narrator::TerminalNarrator;
pub use renderer::{DialoguerError, DialoguerRenderer, Outcome};
