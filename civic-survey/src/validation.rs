//! Submission validator.

use crate::{QuestionId, ResponseStore, SessionError, SurveyQuestion};

/// Whether a question counts as answered.
///
/// Any stored entry counts, including an empty one. Front ends clear the
/// entry when the user leaves an input blank.
pub fn is_answered(responses: &ResponseStore, id: &QuestionId) -> bool {
    responses.contains(id)
}

/// Ids of visible required questions that have no answer, in display order.
pub fn unanswered_required<'a, I>(visible: I, responses: &ResponseStore) -> Vec<QuestionId>
where
    I: IntoIterator<Item = &'a SurveyQuestion>,
{
    visible
        .into_iter()
        .filter(|q| q.requires_answer() && !is_answered(responses, &q.id))
        .map(|q| q.id.clone())
        .collect()
}

/// Check that the visible sequence may be submitted.
pub fn check_submission<'a, I>(visible: I, responses: &ResponseStore) -> Result<(), SessionError>
where
    I: IntoIterator<Item = &'a SurveyQuestion>,
{
    let unanswered = unanswered_required(visible, responses);
    if unanswered.is_empty() {
        Ok(())
    } else {
        Err(SessionError::Incomplete { unanswered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionType as T;

    #[test]
    fn reports_each_missing_required_question() {
        let questions = [
            SurveyQuestion::new("q1", T::Text, "One").required(),
            SurveyQuestion::new("q2", T::Text, "Two"),
            SurveyQuestion::new("q3", T::Email, "Three").required(),
            SurveyQuestion::new("intro", T::Statement, "Hello").required(),
        ];
        let mut store = ResponseStore::new();

        let missing = unanswered_required(&questions, &store);
        assert_eq!(missing, vec![QuestionId::from("q1"), QuestionId::from("q3")]);

        let err = check_submission(&questions, &store).unwrap_err();
        assert_eq!(err.to_string(), "Please answer 2 required question(s)");

        store.upsert("q1", "civics");
        store.upsert("q3", "a@b.org");
        assert!(check_submission(&questions, &store).is_ok());
    }

    #[test]
    fn empty_entry_counts_as_answered() {
        let questions = [SurveyQuestion::new("q1", T::Text, "One").required()];
        let mut store = ResponseStore::new();
        store.upsert("q1", "");
        assert!(is_answered(&store, &"q1".into()));
        assert!(check_submission(&questions, &store).is_ok());

        store.remove(&"q1".into());
        assert!(check_submission(&questions, &store).is_err());
    }
}
