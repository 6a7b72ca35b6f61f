use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{QuestionId, QuestionType, SurveyQuestion};

/// A survey definition as delivered by the host application.
///
/// Presentation-agnostic: it can be walked as a step-by-step wizard or
/// rendered all at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Questions in their base order.
    pub questions: Vec<SurveyQuestion>,

    #[serde(default)]
    pub allow_anonymous: bool,

    /// Whether incomplete responses may be saved for later.
    #[serde(default)]
    pub allow_partial_responses: bool,

    /// Estimated time to complete, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
}

impl Survey {
    /// Create a new survey with the given questions.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<SurveyQuestion>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            questions,
            allow_anonymous: false,
            allow_partial_responses: false,
            estimated_time: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn allow_partial_responses(mut self) -> Self {
        self.allow_partial_responses = true;
        self
    }

    pub fn allow_anonymous(mut self) -> Self {
        self.allow_anonymous = true;
        self
    }

    pub fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = Some(minutes);
        self
    }

    /// Get the questions.
    pub fn questions(&self) -> &[SurveyQuestion] {
        &self.questions
    }

    /// Find a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&SurveyQuestion> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Static checks on the definition.
    ///
    /// The engine still runs definitions with issues; hosts decide whether
    /// to refuse them.
    pub fn lint(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();
        let mut positions: HashMap<&QuestionId, usize> = HashMap::new();

        for (index, question) in self.questions.iter().enumerate() {
            if positions.insert(&question.id, index).is_some() {
                issues.push(DefinitionIssue::DuplicateId(question.id.clone()));
            }
        }

        for (index, question) in self.questions.iter().enumerate() {
            if let Some(logic) = &question.conditional_logic {
                let target = &logic.show_if;
                match positions.get(target) {
                    _ if target == &question.id => {
                        issues.push(DefinitionIssue::SelfReference(question.id.clone()));
                    }
                    None => issues.push(DefinitionIssue::UnknownDependency {
                        question: question.id.clone(),
                        show_if: target.clone(),
                    }),
                    Some(&at) if at > index => issues.push(DefinitionIssue::ForwardDependency {
                        question: question.id.clone(),
                        show_if: target.clone(),
                    }),
                    Some(_) => {}
                }
            }

            let missing_rows = question.kind == QuestionType::Matrix && question.rows.is_empty();
            if question.kind.is_choice() && (question.choices().is_empty() || missing_rows) {
                issues.push(DefinitionIssue::MissingOptions(question.id.clone()));
            }

            if question.max_selections == Some(0) {
                issues.push(DefinitionIssue::ZeroMaxSelections(question.id.clone()));
            }
        }

        issues
    }
}

/// A problem found by `Survey::lint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionIssue {
    DuplicateId(QuestionId),
    SelfReference(QuestionId),
    UnknownDependency {
        question: QuestionId,
        show_if: QuestionId,
    },
    /// `show_if` names a question that comes later in the base order.
    ForwardDependency {
        question: QuestionId,
        show_if: QuestionId,
    },
    MissingOptions(QuestionId),
    ZeroMaxSelections(QuestionId),
}

impl fmt::Display for DefinitionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate question id '{id}'"),
            Self::SelfReference(id) => write!(f, "question '{id}' depends on itself"),
            Self::UnknownDependency { question, show_if } => {
                write!(f, "question '{question}' depends on unknown question '{show_if}'")
            }
            Self::ForwardDependency { question, show_if } => write!(
                f,
                "question '{question}' depends on later question '{show_if}'"
            ),
            Self::MissingOptions(id) => write!(f, "question '{id}' has no options"),
            Self::ZeroMaxSelections(id) => {
                write!(f, "question '{id}' allows zero selections")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionType as T;

    #[test]
    fn clean_definition_has_no_issues() {
        let survey = Survey::new(
            "s1",
            "Civic check-in",
            vec![
                SurveyQuestion::new("q1", T::YesNo, "Did you vote?"),
                SurveyQuestion::new("q2", T::Text, "Why?").show_if("q1", ["Yes"]),
            ],
        );
        assert!(survey.lint().is_empty());
    }

    #[test]
    fn finds_dependency_problems() {
        let survey = Survey::new(
            "s1",
            "Broken",
            vec![
                SurveyQuestion::new("q1", T::Text, "A").show_if("q2", ["x"]),
                SurveyQuestion::new("q2", T::Text, "B").show_if("q2", ["x"]),
                SurveyQuestion::new("q3", T::Text, "C").show_if("nope", ["x"]),
                SurveyQuestion::new("q3", T::Dropdown, "D"),
            ],
        );
        let issues = survey.lint();
        assert!(issues.contains(&DefinitionIssue::DuplicateId("q3".into())));
        assert!(issues.contains(&DefinitionIssue::ForwardDependency {
            question: "q1".into(),
            show_if: "q2".into(),
        }));
        assert!(issues.contains(&DefinitionIssue::SelfReference("q2".into())));
        assert!(issues.contains(&DefinitionIssue::UnknownDependency {
            question: "q3".into(),
            show_if: "nope".into(),
        }));
        assert!(issues.contains(&DefinitionIssue::MissingOptions("q3".into())));
    }

    #[test]
    fn deserializes_host_payload() {
        let json = r#"{
            "id": "onboarding",
            "title": "Welcome",
            "allow_partial_responses": true,
            "estimated_time": 3,
            "questions": [
                {"id": "q1", "question": "Registered to vote?", "type": "yes_no", "required": true},
                {"id": "q2", "question": "Which issues?", "type": "multiple_select",
                 "options": ["Housing", "Transit"], "max_selections": 1,
                 "conditional_logic": {"show_if": "q1", "show_when": "Yes"}}
            ]
        }"#;
        let survey: Survey = serde_json::from_str(json).unwrap();
        assert_eq!(survey.len(), 2);
        assert!(survey.allow_partial_responses);
        assert!(!survey.allow_anonymous);
        let logic = survey.questions[1].conditional_logic.as_ref().unwrap();
        assert_eq!(logic.show_if, "q1");
        assert_eq!(logic.show_when.values(), ["Yes"]);
    }
}
