use civic_survey_types::{QuestionType as T, Survey, SurveyQuestion};

/// End-of-unit feedback a teacher sends to their learning pod.
///
/// Exercises the input types the other surveys leave out.
pub fn classroom_feedback() -> Survey {
    Survey::new(
        "classroom-feedback",
        "Unit feedback: Branches of government",
        vec![
            SurveyQuestion::new("stars", T::RatingStars, "How would you rate this unit?").required(),
            SurveyQuestion::new("favorite_day", T::Date, "Which lesson did you like best? (date)"),
            SurveyQuestion::new("quiz_score", T::Number, "Your final quiz score")
                .with_scale(0.0, 100.0),
            SurveyQuestion::new("improve", T::Textarea, "What should we change?")
                .show_if("stars", ["1", "2"]),
            SurveyQuestion::new("worksheet", T::FileUpload, "Upload your worksheet"),
            SurveyQuestion::new("follow_up", T::YesNo, "Can your teacher follow up with you?"),
            SurveyQuestion::new("contact", T::ContactInfo, "How can we reach you?")
                .show_if("follow_up", ["Yes"])
                .required(),
            SurveyQuestion::new("parent_email", T::Email, "Parent or guardian email"),
            SurveyQuestion::new("phone", T::Phone, "Phone number for text reminders"),
            SurveyQuestion::new("thanks", T::Statement, "Thanks for helping us improve!"),
        ],
    )
    .allow_partial_responses()
    .with_estimated_time(5)
}
