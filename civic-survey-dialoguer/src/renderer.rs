//! Dialoguer front end driving a `SurveySession`.

use std::collections::BTreeMap;

use civic_survey::{
    Answer, CONTACT_FIELDS, QuestionId, QuestionType, SessionError, SurveyHost, SurveyQuestion,
    SurveySession,
};
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Editor, FuzzySelect, Input, MultiSelect, Select};
use thiserror::Error;
use tracing::debug;

/// Option lists longer than this get a fuzzy-search picker.
const FUZZY_THRESHOLD: usize = 8;

const SKIP: &str = "(skip)";

/// Error type for the Dialoguer renderer.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the survey (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The session refused an operation the renderer cannot recover from.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_err(err: dialoguer::Error) -> DialoguerError {
    if is_cancelled(&err) {
        DialoguerError::Cancelled
    } else {
        DialoguerError::Dialoguer(err)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Responses were validated and handed to `on_complete`.
    Submitted,
    /// Partial responses were handed to `on_save_progress`.
    Saved,
    /// The user left without submitting or saving.
    Abandoned,
}

/// What the user picked at the end of the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinalAction {
    Submit,
    SaveProgress,
    Back,
    Quit,
}

impl FinalAction {
    fn label(&self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::SaveProgress => "Save progress and finish later",
            Self::Back => "Go back",
            Self::Quit => "Quit without saving",
        }
    }
}

/// Step-by-step terminal renderer.
///
/// Presents one visible question at a time, records answers through the
/// session (so input constraints apply), and shows the session's warnings
/// when it refuses to move on.
#[derive(Debug, Default, Clone)]
pub struct DialoguerRenderer {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerRenderer {
    /// Create a new renderer with the colorful theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a renderer with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Walk the session until the user submits, saves, or quits.
    pub fn run<H: SurveyHost + ?Sized>(
        &self,
        session: &mut SurveySession,
        host: &mut H,
    ) -> Result<Outcome, DialoguerError> {
        let survey = session.survey();
        println!("{}", survey.title);
        if let Some(description) = &survey.description {
            println!("{description}");
        }
        if let Some(minutes) = survey.estimated_time {
            println!("(about {minutes} min)");
        }
        println!();

        loop {
            let at_end = match session.current_question().cloned() {
                Some(question) => {
                    let progress = session.progress();
                    println!("[{}/{}]", progress.position + 1, progress.visible);
                    self.ask(&question, session)?;

                    if session.is_last() {
                        true
                    } else if let Err(err) = session.next() {
                        println!("Warning: {err}");
                        // nothing to re-ask, so let the user go back, save or quit
                        needs_placeholder(&question)
                    } else {
                        false
                    }
                }
                None => true,
            };

            if !at_end {
                continue;
            }

            match self.final_action(session)? {
                FinalAction::Submit => match session.submit(host) {
                    Ok(()) => return Ok(Outcome::Submitted),
                    Err(err) => println!("Error: {err}"),
                },
                FinalAction::SaveProgress => match session.save_progress(host) {
                    Ok(()) => return Ok(Outcome::Saved),
                    Err(err) => println!("Error: {err}"),
                },
                FinalAction::Back => {
                    session.previous();
                }
                FinalAction::Quit => return Ok(Outcome::Abandoned),
            }
        }
    }

    fn final_action(&self, session: &SurveySession) -> Result<FinalAction, DialoguerError> {
        let mut actions = vec![FinalAction::Submit];
        if session.survey().allow_partial_responses {
            actions.push(FinalAction::SaveProgress);
        }
        if session.position() > 0 {
            actions.push(FinalAction::Back);
        }
        actions.push(FinalAction::Quit);

        let labels: Vec<&str> = actions.iter().map(FinalAction::label).collect();
        let theme = self.theme();
        let picked = Select::with_theme(theme.as_ref())
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_err)?;
        Ok(actions[picked])
    }

    /// Ask a single question and record the response in the session.
    fn ask(
        &self,
        question: &SurveyQuestion,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        let prompt = prompt_text(question);
        if let Some(description) = &question.description {
            println!("  {description}");
        }
        debug!(question = %question.id, kind = %question.kind, "rendering question");

        if needs_placeholder(question) {
            println!("{prompt}");
            println!("  (This question type is not yet implemented here; skipping.)");
            return Ok(());
        }

        match question.kind {
            QuestionType::Statement => {
                println!("{prompt}");
                Ok(())
            }

            QuestionType::FileUpload | QuestionType::Unknown => Ok(()),

            QuestionType::MultipleChoice
            | QuestionType::Dropdown
            | QuestionType::ImageChoice
            | QuestionType::Likert
            | QuestionType::YesNo => self.ask_choice(question, &prompt, session, false),

            // too many points to list
            QuestionType::Scale | QuestionType::RatingStars if question.choices().is_empty() => {
                self.ask_number(question, &prompt, session)
            }

            QuestionType::Scale | QuestionType::RatingStars => {
                self.ask_choice(question, &prompt, session, true)
            }

            QuestionType::MultipleSelect => self.ask_multi_select(question, &prompt, session),

            QuestionType::Text | QuestionType::Email | QuestionType::Phone | QuestionType::Date => {
                self.ask_text(question, &prompt, session)
            }

            QuestionType::Textarea => self.ask_textarea(question, &prompt, session),

            QuestionType::Number | QuestionType::Slider => {
                self.ask_number(question, &prompt, session)
            }

            QuestionType::Ranking => self.ask_ranking(question, &prompt, session),

            QuestionType::Matrix => self.ask_matrix(question, &prompt, session),

            QuestionType::ContactInfo => self.ask_contact(question, &prompt, session),
        }
    }

    /// Record an answer; `Ok(false)` means the question refused it and must be asked again.
    fn commit(
        &self,
        session: &mut SurveySession,
        id: &QuestionId,
        answer: Answer,
    ) -> Result<bool, DialoguerError> {
        match session.record_answer(id, answer) {
            Ok(()) => Ok(true),
            Err(SessionError::Rejected { reason, .. }) => {
                println!("Error: {reason}");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn ask_choice(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
        numeric: bool,
    ) -> Result<(), DialoguerError> {
        let mut items = question.choices();
        let current = session
            .responses()
            .answer(&question.id)
            .and_then(Answer::scalar_string);
        let default = current
            .and_then(|c| items.iter().position(|item| item == &c))
            .unwrap_or(0);
        if !question.required {
            items.push(SKIP.to_string());
        }

        loop {
            let theme = self.theme();
            let picked = if items.len() > FUZZY_THRESHOLD {
                FuzzySelect::with_theme(theme.as_ref())
                    .with_prompt(prompt)
                    .items(&items)
                    .default(default)
                    .interact()
            } else {
                Select::with_theme(theme.as_ref())
                    .with_prompt(prompt)
                    .items(&items)
                    .default(default)
                    .interact()
            }
            .map_err(prompt_err)?;

            let value = &items[picked];
            if value == SKIP {
                session.clear_answer(&question.id);
                return Ok(());
            }

            let answer = match value.parse::<f64>() {
                Ok(n) if numeric => Answer::Number(n),
                _ => Answer::Text(value.clone()),
            };
            if self.commit(session, &question.id, answer)? {
                return Ok(());
            }
        }
    }

    fn ask_multi_select(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        let items = question.choices();
        let prompt = match question.max_selections {
            Some(max) => format!("{prompt} (pick up to {max})"),
            None => prompt.to_string(),
        };

        loop {
            let selected = session
                .responses()
                .answer(&question.id)
                .and_then(Answer::as_choices)
                .unwrap_or_default();
            let defaults: Vec<bool> = items.iter().map(|i| selected.contains(i)).collect();

            let theme = self.theme();
            let picked = MultiSelect::with_theme(theme.as_ref())
                .with_prompt(&prompt)
                .items(&items)
                .defaults(&defaults)
                .interact()
                .map_err(prompt_err)?;

            if picked.is_empty() {
                if question.required {
                    println!("Error: pick at least one option");
                    continue;
                }
                session.clear_answer(&question.id);
                return Ok(());
            }

            let answer = Answer::choices(picked.into_iter().map(|i| items[i].clone()));
            if self.commit(session, &question.id, answer)? {
                return Ok(());
            }
        }
    }

    fn ask_text(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        loop {
            let value = self.input_line(question, prompt, session)?;
            if value.trim().is_empty() {
                session.clear_answer(&question.id);
                return Ok(());
            }
            if self.commit(session, &question.id, Answer::Text(value))? {
                return Ok(());
            }
        }
    }

    fn ask_number(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        let prompt = match question.bounds() {
            (Some(min), Some(max)) => format!("{prompt} ({min}-{max})"),
            _ => prompt.to_string(),
        };

        loop {
            let value = self.input_line(question, &prompt, session)?;
            if value.trim().is_empty() {
                session.clear_answer(&question.id);
                return Ok(());
            }
            let Ok(number) = value.trim().parse::<f64>() else {
                println!("Error: '{value}' is not a number");
                continue;
            };
            if self.commit(session, &question.id, Answer::Number(number))? {
                return Ok(());
            }
        }
    }

    fn input_line(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &SurveySession,
    ) -> Result<String, DialoguerError> {
        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .allow_empty(!question.required);

        if let Some(current) = session
            .responses()
            .answer(&question.id)
            .and_then(Answer::scalar_string)
        {
            builder = builder.with_initial_text(current);
        } else if let Some(placeholder) = &question.placeholder {
            println!("  e.g. {placeholder}");
        }

        builder.interact_text().map_err(prompt_err)
    }

    fn ask_textarea(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        loop {
            println!("{prompt}");
            let current = session
                .responses()
                .answer(&question.id)
                .and_then(Answer::as_text)
                .unwrap_or("")
                .to_string();

            let value = match Editor::new().edit(&current) {
                Ok(Some(text)) => text,
                // Editor was aborted, keep what we had
                Ok(None) => current,
                Err(e) => return Err(prompt_err(e)),
            };

            if value.trim().is_empty() {
                if question.required {
                    println!("Error: an answer is required");
                    continue;
                }
                session.clear_answer(&question.id);
                return Ok(());
            }
            if self.commit(session, &question.id, Answer::Text(value))? {
                return Ok(());
            }
        }
    }

    fn ask_ranking(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        loop {
            println!("{prompt}");
            let mut remaining = question.choices();
            let mut ranks = BTreeMap::new();

            while !remaining.is_empty() {
                let rank = ranks.len() + 1;
                let picked = if remaining.len() == 1 {
                    0
                } else {
                    let theme = self.theme();
                    Select::with_theme(theme.as_ref())
                        .with_prompt(format!("  #{rank}"))
                        .items(&remaining)
                        .default(0)
                        .interact()
                        .map_err(prompt_err)?
                };
                let item = remaining.remove(picked);
                ranks.insert(item, rank.to_string());
            }

            if self.commit(session, &question.id, Answer::Record(ranks))? {
                return Ok(());
            }
        }
    }

    fn ask_matrix(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        let columns = question.choices();
        loop {
            println!("{prompt}");
            let previous = session
                .responses()
                .answer(&question.id)
                .and_then(Answer::as_record)
                .cloned()
                .unwrap_or_default();
            let mut cells = BTreeMap::new();

            for row in &question.rows {
                let default = previous
                    .get(row)
                    .and_then(|v| columns.iter().position(|c| c == v))
                    .unwrap_or(0);
                let theme = self.theme();
                let picked = Select::with_theme(theme.as_ref())
                    .with_prompt(format!("  {row}"))
                    .items(&columns)
                    .default(default)
                    .interact()
                    .map_err(prompt_err)?;
                cells.insert(row.clone(), columns[picked].clone());
            }

            if self.commit(session, &question.id, Answer::Record(cells))? {
                return Ok(());
            }
        }
    }

    fn ask_contact(
        &self,
        question: &SurveyQuestion,
        prompt: &str,
        session: &mut SurveySession,
    ) -> Result<(), DialoguerError> {
        println!("{prompt}");
        loop {
            let previous = session
                .responses()
                .answer(&question.id)
                .and_then(Answer::as_record)
                .cloned()
                .unwrap_or_default();
            let mut fields = BTreeMap::new();

            for field in CONTACT_FIELDS {
                let theme = self.theme();
                let mut builder = Input::<String>::with_theme(theme.as_ref())
                    .with_prompt(format!("  {field}"))
                    .allow_empty(true);
                if let Some(value) = previous.get(field) {
                    builder = builder.with_initial_text(value.clone());
                }
                let value = builder.interact_text().map_err(prompt_err)?;
                if !value.trim().is_empty() {
                    fields.insert(field.to_string(), value);
                }
            }

            if fields.is_empty() {
                session.clear_answer(&question.id);
                return Ok(());
            }
            if self.commit(session, &question.id, Answer::Record(fields))? {
                return Ok(());
            }
        }
    }
}

/// Whether the question cannot be prompted and only gets a placeholder.
///
/// Covers unsupported types and choice questions whose definition leaves
/// nothing to pick from; dialoguer refuses an empty item list.
fn needs_placeholder(question: &SurveyQuestion) -> bool {
    match question.kind {
        QuestionType::FileUpload | QuestionType::Unknown => true,
        QuestionType::Matrix => question.rows.is_empty() || question.choices().is_empty(),
        QuestionType::MultipleChoice
        | QuestionType::MultipleSelect
        | QuestionType::Dropdown
        | QuestionType::ImageChoice
        | QuestionType::Ranking => question.choices().is_empty(),
        _ => false,
    }
}

/// The question's prompt, or a title-cased version of its id when empty.
fn prompt_text(question: &SurveyQuestion) -> String {
    let prompt = if question.question.is_empty() {
        question
            .id
            .as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        question.question.clone()
    };

    if question.required {
        format!("{prompt} *")
    } else {
        prompt
    }
}

#[cfg(test)]
mod tests {
    use civic_survey::QuestionType as T;

    use super::*;

    #[test]
    fn prompt_falls_back_to_id() {
        let q = SurveyQuestion::new("favorite_branch", T::Text, "");
        assert_eq!(prompt_text(&q), "Favorite Branch");
    }

    #[test]
    fn required_prompt_is_marked() {
        let q = SurveyQuestion::new("q", T::Text, "Your name").required();
        assert_eq!(prompt_text(&q), "Your name *");
    }

    #[test]
    fn choice_questions_without_options_get_a_placeholder() {
        let bare = SurveyQuestion::new("q", T::MultipleChoice, "?").required();
        assert!(needs_placeholder(&bare));
        assert!(needs_placeholder(&SurveyQuestion::new("r", T::Ranking, "?")));
        assert!(needs_placeholder(&SurveyQuestion::new("u", T::FileUpload, "?")));

        let no_rows = SurveyQuestion::new("m", T::Matrix, "?").with_options(["Low", "High"]);
        assert!(needs_placeholder(&no_rows));
        assert!(!needs_placeholder(&no_rows.with_rows(["Local"])));

        // defaults fill these in
        assert!(!needs_placeholder(&SurveyQuestion::new("y", T::YesNo, "?")));
        assert!(!needs_placeholder(&SurveyQuestion::new("l", T::Likert, "?")));
        assert!(!needs_placeholder(&SurveyQuestion::new("t", T::Text, "?")));
    }

    #[test]
    fn huge_scale_is_not_a_placeholder() {
        let q = SurveyQuestion::new("s", T::Scale, "Guess").with_scale(1.0, 1e12);
        assert!(q.choices().is_empty());
        assert!(!needs_placeholder(&q));
    }

    #[test]
    fn final_action_labels_are_distinct() {
        let labels = [
            FinalAction::Submit,
            FinalAction::SaveProgress,
            FinalAction::Back,
            FinalAction::Quit,
        ]
        .map(|a| a.label());
        for (i, a) in labels.iter().enumerate() {
            assert!(labels[i + 1..].iter().all(|b| b != a));
        }
    }
}
