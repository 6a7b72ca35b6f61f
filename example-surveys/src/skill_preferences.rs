use civic_survey_types::{QuestionType as T, Survey, SurveyQuestion};

/// Skill and category selection for the learning-pod matcher.
pub fn skill_preferences() -> Survey {
    Survey::new(
        "skill-preferences",
        "Pick your civic skills",
        vec![
            SurveyQuestion::new("priorities", T::Ranking, "Rank these skills by importance to you")
                .with_options([
                    "Reading legislation",
                    "Spotting misinformation",
                    "Contacting officials",
                    "Understanding budgets",
                ])
                .required(),
            SurveyQuestion::new(
                "news_trust",
                T::Likert,
                "I can usually tell when a news story is misleading.",
            ),
            SurveyQuestion::new("familiarity", T::Matrix, "How familiar are you with each branch?")
                .with_rows(["Legislative", "Executive", "Judicial"])
                .with_options(["Not at all", "Somewhat", "Very"]),
            SurveyQuestion::new("weekly_minutes", T::Slider, "Minutes per week for practice")
                .with_scale(0.0, 120.0),
            SurveyQuestion::new("pod_style", T::ImageChoice, "Pick a pod style")
                .with_options(["Debate club", "Study hall", "Field trip"]),
            SurveyQuestion::new("debate_partner", T::YesNo, "Want to be matched with a debate partner?")
                .show_if("pod_style", ["Debate club"]),
        ],
    )
    .allow_anonymous()
}
