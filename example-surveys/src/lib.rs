//! Canned survey definitions shared by tests and the terminal runner.

pub mod classroom_feedback;
pub mod onboarding;
pub mod skill_preferences;

pub use classroom_feedback::classroom_feedback;
pub use onboarding::civic_onboarding;
pub use skill_preferences::skill_preferences;

use civic_survey_types::Survey;

/// The civic onboarding survey in the JSON form a host application sends.
pub const CIVIC_ONBOARDING_JSON: &str = include_str!("../surveys/civic_onboarding.json");

/// Parse a survey definition from JSON.
pub fn from_json(json: &str) -> anyhow::Result<Survey> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_json_matches_builder() {
        let parsed = from_json(CIVIC_ONBOARDING_JSON).unwrap();
        assert_eq!(parsed, civic_onboarding());
    }

    #[test]
    fn bundled_surveys_lint_clean() {
        for survey in [civic_onboarding(), skill_preferences(), classroom_feedback()] {
            assert!(survey.lint().is_empty(), "{}: {:?}", survey.id, survey.lint());
        }
    }
}
