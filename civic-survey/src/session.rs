use std::fmt;

use tracing::{debug, info, warn};

use crate::navigation::{Navigator, Step};
use crate::validation::{check_submission, is_answered};
use crate::visibility::{VisibilityMode, visible_indices};
use crate::{
    Answer, Narrator, QuestionId, QuestionType, ResponseStore, SessionError, Survey, SurveyHost,
    SurveyQuestion, SurveyResponse,
};

/// How far the user is through the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based index of the displayed question.
    pub position: usize,
    /// Number of currently visible questions.
    pub visible: usize,
    /// Visible questions that collect an answer and have one.
    pub answered: usize,
}

/// One user's pass through a survey.
///
/// Owns the response store, the memoized visible sequence and the
/// navigation position. Every mutation goes through `&mut self`, so a
/// session has exactly one writer.
pub struct SurveySession {
    survey: Survey,
    responses: ResponseStore,
    mode: VisibilityMode,

    /// Base-order indices of the visible questions.
    visible: Vec<usize>,
    /// Store fingerprint `visible` was computed from.
    computed_for: Option<u64>,

    navigator: Navigator,
    narrator: Option<Box<dyn Narrator>>,
    completed: bool,
}

impl SurveySession {
    /// Start a fresh session with an empty response store.
    pub fn new(survey: Survey) -> Self {
        Self::resume(survey, Vec::new())
    }

    /// Start a session seeded with previously saved responses.
    pub fn resume(survey: Survey, existing: impl IntoIterator<Item = SurveyResponse>) -> Self {
        for issue in survey.lint() {
            warn!(survey = %survey.id, "{issue}");
        }

        let responses = ResponseStore::seeded(existing);
        debug!(
            survey = %survey.id,
            questions = survey.len(),
            resumed = responses.len(),
            "survey session started"
        );

        let mut session = Self {
            survey,
            responses,
            mode: VisibilityMode::default(),
            visible: Vec::new(),
            computed_for: None,
            navigator: Navigator::new(),
            narrator: None,
            completed: false,
        };
        session.refresh();
        session
    }

    /// Choose how conditional rules combine along dependency chains.
    pub fn with_visibility_mode(mut self, mode: VisibilityMode) -> Self {
        self.mode = mode;
        self.computed_for = None;
        self.refresh();
        self
    }

    /// Attach a narrator. It reads the displayed prompt now and on every change.
    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self.narrate();
        self
    }

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.responses
    }

    pub fn visibility_mode(&self) -> VisibilityMode {
        self.mode
    }

    /// Whether `submit` has succeeded at least once.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The questions currently shown, in base order.
    pub fn visible_questions(&self) -> Vec<&SurveyQuestion> {
        self.visible
            .iter()
            .map(|&i| &self.survey.questions[i])
            .collect()
    }

    /// The displayed question, or `None` when nothing is visible.
    pub fn current_question(&self) -> Option<&SurveyQuestion> {
        self.navigator
            .current(&self.visible)
            .map(|i| &self.survey.questions[i])
    }

    /// Zero-based position in the visible sequence.
    pub fn position(&self) -> usize {
        self.navigator.position()
    }

    /// Whether the displayed question is the last visible one.
    pub fn is_last(&self) -> bool {
        self.navigator.is_last(&self.visible)
    }

    pub fn progress(&self) -> Progress {
        let answered = self
            .visible_questions()
            .into_iter()
            .filter(|q| q.kind.collects_answer() && is_answered(&self.responses, &q.id))
            .count();
        Progress {
            position: self.navigator.position(),
            visible: self.visible.len(),
            answered,
        }
    }

    /// Record or overwrite an answer, stamped now.
    ///
    /// The answer shape is not checked here; see `record_answer`.
    pub fn update_answer(
        &mut self,
        question_id: impl Into<QuestionId>,
        answer: impl Into<Answer>,
    ) -> Result<(), SessionError> {
        let question_id = question_id.into();
        if self.survey.question(&question_id).is_none() {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        let answer = answer.into();
        debug!(question = %question_id, kind = answer.type_name(), "answer updated");
        self.responses.upsert(question_id, answer);
        self.refresh();
        Ok(())
    }

    /// Record an answer after checking it against the question's input constraints.
    ///
    /// A rejected answer leaves the store untouched.
    pub fn record_answer(
        &mut self,
        question_id: impl Into<QuestionId>,
        answer: impl Into<Answer>,
    ) -> Result<(), SessionError> {
        let question_id = question_id.into();
        let answer = answer.into();
        let question = self
            .survey
            .question(&question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.clone()))?;
        question
            .admit(&answer)
            .map_err(|reason| SessionError::Rejected {
                question: question_id.clone(),
                reason,
            })?;
        self.update_answer(question_id, answer)
    }

    /// Select or deselect one option of a multi-select question.
    ///
    /// Selecting past `max_selections` is rejected and the store keeps
    /// the previous selection. Deselecting the last option removes the entry.
    pub fn toggle_option(
        &mut self,
        question_id: impl Into<QuestionId>,
        option: &str,
    ) -> Result<(), SessionError> {
        let question_id = question_id.into();
        let mut selected: Vec<String> = self
            .responses
            .answer(&question_id)
            .and_then(Answer::as_choices)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        if let Some(at) = selected.iter().position(|s| s == option) {
            selected.remove(at);
        } else {
            selected.push(option.to_string());
        }

        if selected.is_empty() {
            self.clear_answer(&question_id);
            return Ok(());
        }

        if let Err(err) = self.record_answer(question_id, Answer::Choices(selected)) {
            warn!("{err}");
            return Err(err);
        }
        Ok(())
    }

    /// Remove the answer for a question.
    pub fn clear_answer(&mut self, question_id: &QuestionId) -> Option<SurveyResponse> {
        let removed = self.responses.remove(question_id);
        if removed.is_some() {
            debug!(question = %question_id, "answer cleared");
            self.refresh();
        }
        removed
    }

    /// Advance to the next visible question.
    ///
    /// Refused with `RequiredUnanswered` while the displayed question is
    /// required and unanswered; the caller shows the warning.
    pub fn next(&mut self) -> Result<Step, SessionError> {
        let step = self
            .navigator
            .next(&self.survey.questions, &self.visible, &self.responses)
            .inspect_err(|err| warn!("navigation blocked: {err}"))?;
        if step.moved() {
            debug!(position = self.navigator.position(), "moved to next question");
            self.narrate();
        }
        Ok(step)
    }

    /// Go back to the previous visible question.
    pub fn previous(&mut self) -> Step {
        let step = self.navigator.previous();
        if step.moved() {
            debug!(position = self.navigator.position(), "moved to previous question");
            self.narrate();
        }
        step
    }

    /// Check that every visible required question is answered.
    pub fn validate(&self) -> Result<(), SessionError> {
        check_submission(self.visible_questions(), &self.responses)
    }

    /// The store flattened in survey order.
    pub fn response_list(&self) -> Vec<SurveyResponse> {
        self.responses
            .to_ordered_vec(self.survey.questions.iter().map(|q| &q.id))
    }

    /// Validate and hand the responses to the host's completion callback.
    ///
    /// On failure, validation or persistence, the store is kept and the
    /// user may try again.
    pub fn submit<H: SurveyHost + ?Sized>(&mut self, host: &mut H) -> Result<(), SessionError> {
        if let Err(err) = self.validate() {
            warn!(survey = %self.survey.id, "submit refused: {err}");
            return Err(err);
        }

        let responses = self.response_list();
        host.on_complete(&responses)
            .map_err(SessionError::persistence)
            .inspect_err(|err| warn!(survey = %self.survey.id, "{err}"))?;

        info!(survey = %self.survey.id, responses = responses.len(), "survey submitted");
        self.completed = true;
        Ok(())
    }

    /// Hand the current, possibly incomplete, responses to the host's save callback.
    pub fn save_progress<H: SurveyHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<(), SessionError> {
        if !self.survey.allow_partial_responses {
            return Err(SessionError::PartialSaveDisabled);
        }

        let responses = self.response_list();
        host.on_save_progress(&responses)
            .map_err(SessionError::persistence)
            .inspect_err(|err| warn!(survey = %self.survey.id, "{err}"))?;

        info!(survey = %self.survey.id, responses = responses.len(), "progress saved");
        Ok(())
    }

    /// Consume the session, keeping only its answers.
    pub fn into_responses(self) -> ResponseStore {
        self.responses
    }

    /// Recompute the visible sequence if the answers changed since last time.
    fn refresh(&mut self) {
        let fingerprint = self.responses.fingerprint();
        if self.computed_for == Some(fingerprint) {
            return;
        }

        let displayed = self.navigator.current(&self.visible);
        self.visible = visible_indices(&self.survey.questions, &self.responses, self.mode);
        self.computed_for = Some(fingerprint);
        self.navigator.reposition(displayed, &self.visible);

        let now = self.navigator.current(&self.visible);
        debug!(visible = self.visible.len(), "visible sequence recomputed");
        if displayed.is_some() && now != displayed {
            self.narrate();
        }
    }

    fn narrate(&mut self) {
        let Some(index) = self.navigator.current(&self.visible) else {
            return;
        };
        let question = &self.survey.questions[index];
        if question.kind == QuestionType::Unknown {
            return;
        }
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.speak(&question.question);
        }
    }
}

impl fmt::Debug for SurveySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveySession")
            .field("survey", &self.survey.id)
            .field("responses", &self.responses.len())
            .field("mode", &self.mode)
            .field("visible", &self.visible)
            .field("position", &self.navigator.position())
            .field("narrator", &self.narrator.is_some())
            .field("completed", &self.completed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{QuestionType as T, RecordingHost};

    fn survey() -> Survey {
        Survey::new(
            "pods",
            "Join a learning pod",
            vec![
                SurveyQuestion::new("role", T::MultipleChoice, "Are you a student or teacher?")
                    .with_options(["Student", "Teacher"])
                    .required(),
                SurveyQuestion::new("classroom", T::Text, "Google Classroom code")
                    .show_if("role", ["Teacher"])
                    .required(),
                SurveyQuestion::new("grade", T::Number, "Which grade are you in?")
                    .show_if("role", ["Student"]),
                SurveyQuestion::new("goals", T::Textarea, "What do you hope to learn?"),
            ],
        )
        .allow_partial_responses()
    }

    #[derive(Clone, Default)]
    struct Transcript(Rc<RefCell<Vec<String>>>);

    impl Narrator for Transcript {
        fn speak(&mut self, text: &str) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    #[test]
    fn answering_reveals_branch() {
        let mut session = SurveySession::new(survey());
        assert_eq!(session.visible_questions().len(), 2);

        session.update_answer("role", "Teacher").unwrap();
        let ids: Vec<_> = session
            .visible_questions()
            .iter()
            .map(|q| q.id.to_string())
            .collect();
        assert_eq!(ids, ["role", "classroom", "goals"]);
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut session = SurveySession::new(survey());
        let err = session.update_answer("nope", "x").unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion(_)));
        assert!(session.responses().is_empty());
    }

    #[test]
    fn changing_an_earlier_answer_keeps_position_on_same_question() {
        let mut session = SurveySession::new(survey());
        session.update_answer("role", "Teacher").unwrap();
        session.next().unwrap();
        session.update_answer("classroom", "abc123").unwrap();
        session.next().unwrap();
        assert_eq!(session.current_question().unwrap().id, "goals");
        assert_eq!(session.position(), 2);

        session.update_answer("role", "Parent").unwrap();
        assert_eq!(session.current_question().unwrap().id, "goals");
        assert_eq!(session.position(), 1);
        assert!(session.is_last());
    }

    #[test]
    fn narrator_hears_each_displayed_question() {
        let transcript = Transcript::default();
        let mut session = SurveySession::new(survey()).with_narrator(transcript.clone());
        session.update_answer("role", "Student").unwrap();
        session.next().unwrap();
        session.previous();

        assert_eq!(
            *transcript.0.borrow(),
            [
                "Are you a student or teacher?",
                "Which grade are you in?",
                "Are you a student or teacher?",
            ]
        );
    }

    #[test]
    fn partial_save_requires_permission() {
        let mut host = RecordingHost::new();
        let mut session = SurveySession::new(survey());
        session.update_answer("goals", "Learn about city council").unwrap();
        session.save_progress(&mut host).unwrap();
        assert_eq!(host.saves().len(), 1);

        let mut strict = survey();
        strict.allow_partial_responses = false;
        let mut session = SurveySession::new(strict);
        assert!(matches!(
            session.save_progress(&mut host),
            Err(SessionError::PartialSaveDisabled)
        ));
        assert_eq!(host.saves().len(), 1);
    }

    #[test]
    fn progress_counts_visible_answers() {
        let mut session = SurveySession::new(survey());
        session.update_answer("role", "Student").unwrap();
        session.update_answer("classroom", "stale").unwrap();
        let progress = session.progress();
        assert_eq!(progress.visible, 3);
        assert_eq!(progress.answered, 1);
    }
}
