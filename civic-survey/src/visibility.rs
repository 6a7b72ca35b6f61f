//! Visibility filter: which questions are shown for the current answers.

use std::collections::HashMap;

use crate::{QuestionId, ResponseStore, SurveyQuestion};

/// How conditional rules combine along dependency chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    /// Each rule is checked against the raw stored answer of its target,
    /// whether or not the target is currently shown.
    #[default]
    Independent,

    /// A rule only holds when its target is itself visible, so hiding a
    /// question also hides everything that depends on it.
    Cascading,
}

/// Whether a single question is visible, ignoring the rest of the survey.
///
/// Unconditional questions are always visible. A conditional question is
/// visible only when its `show_if` target has a stored answer matching
/// `show_when`.
pub fn is_visible(question: &SurveyQuestion, responses: &ResponseStore) -> bool {
    match &question.conditional_logic {
        None => true,
        Some(logic) => responses
            .answer(&logic.show_if)
            .is_some_and(|answer| answer.matches_any(logic.show_when.values())),
    }
}

/// Indices into `questions` of the visible questions, in base order.
pub fn visible_indices(
    questions: &[SurveyQuestion],
    responses: &ResponseStore,
    mode: VisibilityMode,
) -> Vec<usize> {
    match mode {
        VisibilityMode::Independent => questions
            .iter()
            .enumerate()
            .filter(|(_, q)| is_visible(q, responses))
            .map(|(i, _)| i)
            .collect(),
        VisibilityMode::Cascading => {
            let mut resolver = CascadeResolver::new(questions, responses);
            (0..questions.len())
                .filter(|&i| resolver.resolve(i))
                .collect()
        }
    }
}

/// The visible subsequence of `questions`, preserving order.
pub fn visible_questions<'a>(
    questions: &'a [SurveyQuestion],
    responses: &ResponseStore,
    mode: VisibilityMode,
) -> Vec<&'a SurveyQuestion> {
    visible_indices(questions, responses, mode)
        .into_iter()
        .map(|i| &questions[i])
        .collect()
}

#[derive(Clone, Copy)]
enum Resolution {
    InProgress,
    Done(bool),
}

struct CascadeResolver<'a> {
    questions: &'a [SurveyQuestion],
    responses: &'a ResponseStore,
    by_id: HashMap<&'a QuestionId, usize>,
    state: Vec<Option<Resolution>>,
}

impl<'a> CascadeResolver<'a> {
    fn new(questions: &'a [SurveyQuestion], responses: &'a ResponseStore) -> Self {
        let mut by_id = HashMap::with_capacity(questions.len());
        for (i, q) in questions.iter().enumerate() {
            by_id.entry(&q.id).or_insert(i);
        }
        Self {
            questions,
            responses,
            by_id,
            state: vec![None; questions.len()],
        }
    }

    fn resolve(&mut self, index: usize) -> bool {
        match self.state[index] {
            Some(Resolution::Done(visible)) => return visible,
            // dependency cycle
            Some(Resolution::InProgress) => return false,
            None => {}
        }
        self.state[index] = Some(Resolution::InProgress);

        let question = &self.questions[index];
        let visible = match &question.conditional_logic {
            None => true,
            Some(logic) => {
                let target_visible = match self.by_id.get(&logic.show_if) {
                    Some(&target) => self.resolve(target),
                    None => false,
                };
                target_visible && is_visible(question, self.responses)
            }
        };

        self.state[index] = Some(Resolution::Done(visible));
        visible
    }
}
