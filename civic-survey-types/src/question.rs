use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::{Answer, AnswerRejected, QuestionId};

/// Default labels for a likert question without explicit options.
pub const LIKERT_LEVELS: [&str; 5] = [
    "Strongly disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly agree",
];

/// Default options for a yes/no question without explicit options.
pub const YES_NO: [&str; 2] = ["Yes", "No"];

/// Contact-info fields collected into a record answer.
pub const CONTACT_FIELDS: [&str; 3] = ["name", "email", "phone"];

/// Largest scale offered as a list of points.
pub const MAX_SCALE_POINTS: usize = 20;

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    /// Unique id, the key of this question's response.
    pub id: QuestionId,

    /// The prompt text shown to the user.
    pub question: String,

    /// Optional help text shown below the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The kind of question (determines input widget and answer shape).
    #[serde(rename = "type")]
    pub kind: QuestionType,

    #[serde(default)]
    pub required: bool,

    /// Ordered options. Choices for choice types, columns for matrix,
    /// items to order for ranking.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Rule hiding this question until an earlier answer matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,

    /// Upper bound on selections for multi-select questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max: Option<f64>,

    /// Matrix rows. Each row is answered with one of `options`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl SurveyQuestion {
    /// Create a new optional question without options or conditions.
    pub fn new(id: impl Into<QuestionId>, kind: QuestionType, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            description: None,
            kind,
            required: false,
            options: Vec::new(),
            conditional_logic: None,
            max_selections: None,
            scale_min: None,
            scale_max: None,
            rows: Vec::new(),
            placeholder: None,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the ordered options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Show this question only when `target`'s answer matches one of `values`.
    pub fn show_if<I, S>(mut self, target: impl Into<QuestionId>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditional_logic = Some(ConditionalLogic::new(target, values));
        self
    }

    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = Some(max);
        self
    }

    pub fn with_scale(mut self, min: f64, max: f64) -> Self {
        self.scale_min = Some(min);
        self.scale_max = Some(max);
        self
    }

    pub fn with_rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Whether the question has no conditional rule.
    pub fn is_unconditional(&self) -> bool {
        self.conditional_logic.is_none()
    }

    /// Whether an unanswered state blocks navigation and submission.
    ///
    /// Statements collect nothing, so they never block even when flagged.
    pub fn requires_answer(&self) -> bool {
        self.required && self.kind.collects_answer()
    }

    /// Effective numeric bounds for scale-like questions.
    ///
    /// Scale and star ratings default to 1..=5, sliders to 0..=100.
    /// Number questions are unbounded unless configured.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        let (min, max) = match self.kind {
            QuestionType::Scale | QuestionType::RatingStars => (Some(1.0), Some(5.0)),
            QuestionType::Slider => (Some(0.0), Some(100.0)),
            _ => (None, None),
        };
        (self.scale_min.or(min), self.scale_max.or(max))
    }

    /// The options a renderer should offer for this question.
    ///
    /// Falls back to sensible defaults when a choice type has no explicit options.
    /// A scale with more than `MAX_SCALE_POINTS` points gets none and is
    /// answered as a number instead.
    pub fn choices(&self) -> Vec<String> {
        if !self.options.is_empty() {
            return self.options.clone();
        }
        match self.kind {
            QuestionType::YesNo => YES_NO.iter().map(|s| s.to_string()).collect(),
            QuestionType::Likert => LIKERT_LEVELS.iter().map(|s| s.to_string()).collect(),
            QuestionType::Scale | QuestionType::RatingStars => {
                let (min, max) = self.bounds();
                let min = min.unwrap_or(1.0).ceil();
                let max = max.unwrap_or(5.0).floor();
                if max - min >= MAX_SCALE_POINTS as f64 {
                    return Vec::new();
                }
                let (min, max) = (min as i64, max as i64);
                (min..=max).map(|n| n.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Check whether `answer` is acceptable input for this question.
    ///
    /// This is the renderer-side constraint. The response store itself
    /// accepts any answer shape.
    pub fn admit(&self, answer: &Answer) -> Result<(), AnswerRejected> {
        use QuestionType as T;

        match self.kind {
            T::Statement => Err(AnswerRejected::NotAnswerable),
            T::Unknown => Err(AnswerRejected::Unsupported),

            T::MultipleSelect => {
                let items = expect_shape(answer, "Choices", Answer::as_choices)?;
                if let Some(max) = self.max_selections
                    && items.len() > max
                {
                    return Err(AnswerRejected::TooManySelections {
                        max,
                        selected: items.len(),
                    });
                }
                let options = self.choices();
                items
                    .iter()
                    .try_for_each(|item| self.check_option(&options, item))
            }

            T::MultipleChoice | T::Dropdown | T::ImageChoice | T::Likert | T::YesNo => {
                let value = expect_shape(answer, "Text", Answer::as_text)?;
                self.check_option(&self.choices(), value)
            }

            // explicit options are the scale points, whether numbers or labels
            T::Scale | T::RatingStars if !self.options.is_empty() => {
                let value = answer.scalar_string().ok_or(AnswerRejected::WrongShape {
                    expected: "Text",
                    actual: answer.type_name(),
                })?;
                self.check_option(&self.options, &value)
            }

            T::Scale | T::RatingStars | T::Slider | T::Number => {
                let value = match answer {
                    Answer::Number(n) => *n,
                    Answer::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                        AnswerRejected::InvalidFormat {
                            kind: "number",
                            value: s.clone(),
                        }
                    })?,
                    other => {
                        return Err(AnswerRejected::WrongShape {
                            expected: "Number",
                            actual: other.type_name(),
                        });
                    }
                };
                self.check_bounds(value)
            }

            T::Text | T::Textarea | T::FileUpload => {
                expect_shape(answer, "Text", Answer::as_text).map(|_| ())
            }

            T::Email => {
                let value = expect_shape(answer, "Text", Answer::as_text)?;
                if looks_like_email(value) {
                    Ok(())
                } else {
                    Err(invalid("email", value))
                }
            }

            T::Phone => {
                let value = expect_shape(answer, "Text", Answer::as_text)?;
                if looks_like_phone(value) {
                    Ok(())
                } else {
                    Err(invalid("phone", value))
                }
            }

            T::Date => {
                let value = expect_shape(answer, "Text", Answer::as_text)?;
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                    .map(|_| ())
                    .map_err(|_| invalid("date", value))
            }

            T::Ranking => {
                let record = expect_shape(answer, "Record", Answer::as_record)?;
                let options = self.choices();
                for (item, rank) in record {
                    self.check_option(&options, item)?;
                    let position = rank
                        .parse::<usize>()
                        .map_err(|_| invalid("rank", rank))?;
                    if position == 0 || position > options.len().max(record.len()) {
                        return Err(invalid("rank", rank));
                    }
                }
                Ok(())
            }

            T::Matrix => {
                let record = expect_shape(answer, "Record", Answer::as_record)?;
                let columns = self.choices();
                for (row, column) in record {
                    if !self.rows.is_empty() && !self.rows.contains(row) {
                        return Err(AnswerRejected::UnknownOption(row.clone()));
                    }
                    self.check_option(&columns, column)?;
                }
                Ok(())
            }

            T::ContactInfo => {
                let record = expect_shape(answer, "Record", Answer::as_record)?;
                if let Some(email) = record.get("email")
                    && !email.trim().is_empty()
                    && !looks_like_email(email)
                {
                    return Err(invalid("email", email));
                }
                if let Some(phone) = record.get("phone")
                    && !phone.trim().is_empty()
                    && !looks_like_phone(phone)
                {
                    return Err(invalid("phone", phone));
                }
                Ok(())
            }
        }
    }

    fn check_option(&self, options: &[String], value: &str) -> Result<(), AnswerRejected> {
        if options.is_empty() || options.iter().any(|o| o == value) {
            Ok(())
        } else {
            Err(AnswerRejected::UnknownOption(value.to_string()))
        }
    }

    fn check_bounds(&self, value: f64) -> Result<(), AnswerRejected> {
        let (min, max) = self.bounds();
        let below = min.is_some_and(|min| value < min);
        let above = max.is_some_and(|max| value > max);
        if value.is_nan() || below || above {
            Err(AnswerRejected::OutOfRange { value, min, max })
        } else {
            Ok(())
        }
    }
}

fn expect_shape<'a, T: ?Sized>(
    answer: &'a Answer,
    expected: &'static str,
    get: impl Fn(&'a Answer) -> Option<&'a T>,
) -> Result<&'a T, AnswerRejected> {
    get(answer).ok_or(AnswerRejected::WrongShape {
        expected,
        actual: answer.type_name(),
    })
}

fn invalid(kind: &'static str, value: &str) -> AnswerRejected {
    AnswerRejected::InvalidFormat {
        kind,
        value: value.to_string(),
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn looks_like_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
}

/// The kind of question, determining input widget and answer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    MultipleSelect,
    Scale,
    Text,
    Textarea,
    Ranking,
    Likert,
    Matrix,
    Slider,
    Date,
    Email,
    Phone,
    Number,
    Dropdown,
    ImageChoice,
    FileUpload,
    RatingStars,
    YesNo,
    Statement,
    ContactInfo,

    /// Any type string this engine does not know. Rendered as a placeholder.
    #[serde(other)]
    Unknown,
}

impl QuestionType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::MultipleSelect => "multiple_select",
            Self::Scale => "scale",
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Ranking => "ranking",
            Self::Likert => "likert",
            Self::Matrix => "matrix",
            Self::Slider => "slider",
            Self::Date => "date",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Dropdown => "dropdown",
            Self::ImageChoice => "image_choice",
            Self::FileUpload => "file_upload",
            Self::RatingStars => "rating_stars",
            Self::YesNo => "yes_no",
            Self::Statement => "statement",
            Self::ContactInfo => "contact_info",
            Self::Unknown => "unknown",
        }
    }

    /// Whether questions of this type record an answer at all.
    pub fn collects_answer(&self) -> bool {
        !matches!(self, Self::Statement)
    }

    /// Whether the user picks from the question's options.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice
                | Self::MultipleSelect
                | Self::Dropdown
                | Self::ImageChoice
                | Self::Ranking
                | Self::Matrix
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility rule: show the question when `show_if`'s answer matches `show_when`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalLogic {
    pub show_if: QuestionId,
    pub show_when: ShowWhen,
}

impl ConditionalLogic {
    pub fn new<I, S>(show_if: impl Into<QuestionId>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            show_if: show_if.into(),
            show_when: ShowWhen::new(values),
        }
    }
}

/// Trigger values of a conditional rule, held in their string form.
///
/// Accepts a single JSON value or an array. Numbers and booleans are
/// coerced to strings on load.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawShowWhen")]
pub struct ShowWhen(Vec<String>);

impl ShowWhen {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl Serialize for ShowWhen {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => serializer.serialize_str(single),
            many => many.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TriggerValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl From<TriggerValue> for String {
    fn from(value: TriggerValue) -> Self {
        match value {
            TriggerValue::Text(s) => s,
            TriggerValue::Number(n) => n.to_string(),
            TriggerValue::Flag(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawShowWhen {
    One(TriggerValue),
    Many(Vec<TriggerValue>),
}

impl From<RawShowWhen> for ShowWhen {
    fn from(raw: RawShowWhen) -> Self {
        match raw {
            RawShowWhen::One(value) => Self(vec![value.into()]),
            RawShowWhen::Many(values) => Self(values.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_deserializes() {
        let q: SurveyQuestion =
            serde_json::from_str(r#"{"id":"q1","question":"?","type":"hologram"}"#).unwrap();
        assert_eq!(q.kind, QuestionType::Unknown);
        assert!(!q.required);
    }

    #[test]
    fn show_when_accepts_scalar_and_list() {
        let one: ShowWhen = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(one.values(), ["yes"]);

        let many: ShowWhen = serde_json::from_str("[\"a\", 3, true]").unwrap();
        assert_eq!(many.values(), ["a", "3", "true"]);
    }

    #[test]
    fn multi_select_respects_max_selections() {
        let q = SurveyQuestion::new("topics", QuestionType::MultipleSelect, "Pick topics")
            .with_options(["voting", "courts", "budget"])
            .with_max_selections(2);

        assert!(q.admit(&Answer::choices(["voting", "courts"])).is_ok());
        assert!(matches!(
            q.admit(&Answer::choices(["voting", "courts", "budget"])),
            Err(AnswerRejected::TooManySelections { max: 2, selected: 3 })
        ));
        assert!(matches!(
            q.admit(&Answer::choices(["mayors"])),
            Err(AnswerRejected::UnknownOption(_))
        ));
    }

    #[test]
    fn scale_defaults_and_bounds() {
        let q = SurveyQuestion::new("trust", QuestionType::Scale, "Trust level");
        assert_eq!(q.choices(), ["1", "2", "3", "4", "5"]);
        assert!(q.admit(&Answer::from(3)).is_ok());
        assert!(q.admit(&Answer::from("4")).is_ok());
        assert!(matches!(
            q.admit(&Answer::from(6)),
            Err(AnswerRejected::OutOfRange { .. })
        ));
    }

    #[test]
    fn labelled_scale_accepts_its_labels() {
        let q = SurveyQuestion::new("s", QuestionType::Scale, "How much do you follow the news?")
            .with_options(["Not at all", "A little", "A lot"])
            .required();
        assert_eq!(q.choices(), ["Not at all", "A little", "A lot"]);
        for label in q.choices() {
            assert!(q.admit(&Answer::from(label.as_str())).is_ok(), "{label}");
        }
        assert!(matches!(
            q.admit(&Answer::from("Sometimes")),
            Err(AnswerRejected::UnknownOption(_))
        ));
    }

    #[test]
    fn numeric_options_override_default_bounds() {
        let q = SurveyQuestion::new("s10", QuestionType::Scale, "Rate 1 to 10")
            .with_options((1..=10).map(|n| n.to_string()));
        assert!(q.admit(&Answer::from(7)).is_ok());
        assert!(q.admit(&Answer::from("10")).is_ok());
        assert!(q.admit(&Answer::from(11)).is_err());
        assert!(matches!(
            q.admit(&Answer::choices(["7"])),
            Err(AnswerRejected::WrongShape { .. })
        ));
    }

    #[test]
    fn huge_scale_offers_no_point_list() {
        let q = SurveyQuestion::new("s", QuestionType::Scale, "Guess").with_scale(1.0, 1e12);
        assert!(q.choices().is_empty());
        assert!(q.admit(&Answer::from(123_456.0)).is_ok());

        let small =
            SurveyQuestion::new("s", QuestionType::RatingStars, "Stars").with_scale(0.0, 10.0);
        assert_eq!(small.choices().len(), 11);
    }

    #[test]
    fn text_formats() {
        let email = SurveyQuestion::new("e", QuestionType::Email, "Email");
        assert!(email.admit(&Answer::from("ada@example.org")).is_ok());
        assert!(email.admit(&Answer::from("ada@example")).is_err());

        let date = SurveyQuestion::new("d", QuestionType::Date, "Date");
        assert!(date.admit(&Answer::from("2024-11-05")).is_ok());
        assert!(date.admit(&Answer::from("11/05/2024")).is_err());

        let phone = SurveyQuestion::new("p", QuestionType::Phone, "Phone");
        assert!(phone.admit(&Answer::from("+1 (555) 010-2000")).is_ok());
        assert!(phone.admit(&Answer::from("call me")).is_err());
    }

    #[test]
    fn statements_collect_nothing() {
        let q = SurveyQuestion::new("intro", QuestionType::Statement, "Welcome").required();
        assert!(!q.requires_answer());
        assert!(matches!(
            q.admit(&Answer::from("x")),
            Err(AnswerRejected::NotAnswerable)
        ));
    }

    #[test]
    fn matrix_checks_rows_and_columns() {
        let q = SurveyQuestion::new("m", QuestionType::Matrix, "Rate")
            .with_rows(["Local", "State"])
            .with_options(["Low", "High"]);
        assert!(q.admit(&Answer::record([("Local", "High")])).is_ok());
        assert!(q.admit(&Answer::record([("Federal", "High")])).is_err());
        assert!(q.admit(&Answer::record([("Local", "Medium")])).is_err());
    }
}
