use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a question within a survey, e.g. `"civic_interest"`.
///
/// Used as the key of the `ResponseStore` and as the target of a
/// question's `show_if` rule.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Create a new question id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for QuestionId {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl From<&QuestionId> for QuestionId {
    fn from(id: &QuestionId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for QuestionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for QuestionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QuestionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let id = QuestionId::new("civic_interest");
        assert_eq!(format!("{id}"), "civic_interest");
    }

    #[test]
    fn from_str() {
        let id: QuestionId = "q1".into();
        assert_eq!(id.as_str(), "q1");
        assert_eq!(id, "q1");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = QuestionId::new("q7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"q7\"");
        let back: QuestionId = serde_json::from_str("\"q7\"").unwrap();
        assert_eq!(back, id);
    }
}
