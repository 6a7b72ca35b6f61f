use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The value recorded for one answered question.
///
/// The shape depends on the question type:
/// - `Text` for single-choice, scale-like and free-text questions
/// - `Choices` for multi-select (set semantics, order is display order)
/// - `Number` for number and slider questions
/// - `Record` for matrix, ranking and contact-info questions
///
/// Serialized untagged, so JSON answers read as `"yes"`, `["a", "b"]`,
/// `4` or `{"row": "column"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Choices(Vec<String>),
    Number(f64),
    Record(BTreeMap<String, String>),
}

impl Answer {
    /// Build a `Choices` answer, dropping duplicate entries.
    pub fn choices<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.into();
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Self::Choices(out)
    }

    /// Build a `Record` answer from key/value pairs.
    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Try to get this answer as a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this answer as a list of selected options.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this answer as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this answer as a record.
    pub fn as_record(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Record(map) => Some(map),
            _ => None,
        }
    }

    /// The string form of a single-valued answer, as used by conditional rules.
    ///
    /// Numbers use their shortest form (`5`, `2.5`). Sets and records have none.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Choices(_) | Self::Record(_) => None,
        }
    }

    /// Whether this answer matches any of the trigger values.
    ///
    /// Single values match by membership, sets match on a non-empty
    /// intersection. Records never match.
    pub fn matches_any(&self, triggers: &[String]) -> bool {
        match self {
            Self::Choices(items) => items.iter().any(|item| triggers.contains(item)),
            Self::Record(_) => false,
            scalar => scalar
                .scalar_string()
                .is_some_and(|value| triggers.contains(&value)),
        }
    }

    /// Whether the answer carries no content (empty text, no selection, empty record).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Choices(items) => items.is_empty(),
            Self::Number(n) => n.is_nan(),
            Self::Record(map) => map.values().all(|v| v.trim().is_empty()),
        }
    }

    /// Feed the answer content into a hasher. Floats hash by bit pattern.
    pub fn hash_content<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Choices(items) => {
                1u8.hash(state);
                items.hash(state);
            }
            Self::Number(n) => {
                2u8.hash(state);
                n.to_bits().hash(state);
            }
            Self::Record(map) => {
                3u8.hash(state);
                map.hash(state);
            }
        }
    }

    /// Get the type name of this answer for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choices(_) => "Choices",
            Self::Number(_) => "Number",
            Self::Record(_) => "Record",
        }
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Answer {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Answer {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<String>> for Answer {
    fn from(items: Vec<String>) -> Self {
        Self::choices(items)
    }
}

impl From<Vec<&str>> for Answer {
    fn from(items: Vec<&str>) -> Self {
        Self::choices(items)
    }
}

impl From<BTreeMap<String, String>> for Answer {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Record(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn text_matches_by_membership() {
        let answer = Answer::from("yes");
        assert!(answer.matches_any(&triggers(&["yes", "maybe"])));
        assert!(!answer.matches_any(&triggers(&["no"])));
    }

    #[test]
    fn number_is_coerced_to_string() {
        assert!(Answer::from(5).matches_any(&triggers(&["5"])));
        assert!(Answer::from(2.5).matches_any(&triggers(&["2.5"])));
        assert!(!Answer::from(5).matches_any(&triggers(&["5.0"])));
    }

    #[test]
    fn choices_match_on_intersection() {
        let answer = Answer::choices(["voting", "volunteering"]);
        assert!(answer.matches_any(&triggers(&["volunteering"])));
        assert!(!answer.matches_any(&triggers(&["protesting"])));
        assert!(!Answer::choices(Vec::<String>::new()).matches_any(&triggers(&["x"])));
    }

    #[test]
    fn records_never_match() {
        let answer = Answer::record([("name", "yes")]);
        assert!(!answer.matches_any(&triggers(&["yes"])));
    }

    #[test]
    fn choices_deduplicate() {
        let answer = Answer::choices(["a", "b", "a"]);
        assert_eq!(answer.as_choices().unwrap(), ["a", "b"]);
    }

    #[test]
    fn untagged_json_shapes() {
        let text: Answer = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(text, Answer::from("yes"));

        let set: Answer = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(set.as_choices().unwrap().len(), 2);

        let number: Answer = serde_json::from_str("4").unwrap();
        assert_eq!(number.as_number(), Some(4.0));

        let record: Answer = serde_json::from_str("{\"row1\":\"Agree\"}").unwrap();
        assert_eq!(record.as_record().unwrap()["row1"], "Agree");
    }

    #[test]
    fn emptiness() {
        assert!(Answer::from("  ").is_empty());
        assert!(Answer::choices(Vec::<String>::new()).is_empty());
        assert!(!Answer::from(0).is_empty());
        assert!(Answer::record([("email", "")]).is_empty());
    }
}
