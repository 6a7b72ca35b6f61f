use civic_survey_types::{QuestionType as T, Survey, SurveyQuestion};

/// Maximum number of civic topics a new learner can follow at first.
pub const MAX_TOPICS: usize = 3;

/// First-run onboarding: who the learner is and what they care about.
///
/// Teachers get asked for a classroom code, students for their grade.
pub fn civic_onboarding() -> Survey {
    Survey::new(
        "civic-onboarding",
        "Welcome to CivicSense",
        vec![
            SurveyQuestion::new("welcome", T::Statement, "Let's set up your learning path."),
            SurveyQuestion::new("role", T::MultipleChoice, "How will you use CivicSense?")
                .with_options(["Student", "Teacher", "Just curious"])
                .required(),
            SurveyQuestion::new("classroom_code", T::Text, "Enter your Google Classroom code")
                .show_if("role", ["Teacher"])
                .with_placeholder("abc1234")
                .required(),
            SurveyQuestion::new("grade", T::Dropdown, "Which grade are you in?")
                .with_options(["6", "7", "8", "9", "10", "11", "12"])
                .show_if("role", ["Student"]),
            SurveyQuestion::new("topics", T::MultipleSelect, "Which topics interest you?")
                .with_options([
                    "Elections",
                    "Courts",
                    "Local government",
                    "Budgets",
                    "Civil rights",
                ])
                .with_max_selections(MAX_TOPICS)
                .required(),
            SurveyQuestion::new(
                "election_followup",
                T::YesNo,
                "Would you like reminders before local elections?",
            )
            .show_if("topics", ["Elections", "Local government"]),
            SurveyQuestion::new(
                "confidence",
                T::Scale,
                "How confident are you explaining how a bill becomes law?",
            )
            .with_scale(1.0, 5.0),
        ],
    )
    .with_description("A few quick questions so we can suggest the right quizzes.")
    .allow_partial_responses()
    .with_estimated_time(2)
}
