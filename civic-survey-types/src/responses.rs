use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Answer, QuestionId};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub question_id: QuestionId,
    pub answer: Answer,
    pub answered_at: DateTime<Utc>,
}

impl SurveyResponse {
    /// Create a response stamped with the current time.
    pub fn new(question_id: impl Into<QuestionId>, answer: impl Into<Answer>) -> Self {
        Self::at(question_id, answer, Utc::now())
    }

    /// Create a response with an explicit timestamp.
    pub fn at(
        question_id: impl Into<QuestionId>,
        answer: impl Into<Answer>,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            answer: answer.into(),
            answered_at,
        }
    }
}

/// In-memory answers of one survey session, keyed by question id.
///
/// Keys are unique and insertion order is irrelevant. The store never
/// persists itself; hosts receive a flattened copy.
#[derive(Debug, Clone, Default)]
pub struct ResponseStore {
    values: HashMap<QuestionId, SurveyResponse>,
}

impl ResponseStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Seed a store from previously saved responses.
    ///
    /// When an id appears more than once the latest `answered_at` wins.
    pub fn seeded(existing: impl IntoIterator<Item = SurveyResponse>) -> Self {
        let mut store = Self::new();
        for response in existing {
            match store.values.get(&response.question_id) {
                Some(current) if current.answered_at > response.answered_at => {}
                _ => {
                    store.values.insert(response.question_id.clone(), response);
                }
            }
        }
        store
    }

    /// Insert or overwrite the answer for `question_id`, stamped now.
    ///
    /// Returns the previous response, if any.
    pub fn upsert(
        &mut self,
        question_id: impl Into<QuestionId>,
        answer: impl Into<Answer>,
    ) -> Option<SurveyResponse> {
        let response = SurveyResponse::new(question_id, answer);
        self.values.insert(response.question_id.clone(), response)
    }

    /// Get the response for a question.
    pub fn get(&self, question_id: &QuestionId) -> Option<&SurveyResponse> {
        self.values.get(question_id)
    }

    /// Get only the answer for a question.
    pub fn answer(&self, question_id: &QuestionId) -> Option<&Answer> {
        self.values.get(question_id).map(|r| &r.answer)
    }

    /// Check if a response exists for the question.
    pub fn contains(&self, question_id: &QuestionId) -> bool {
        self.values.contains_key(question_id)
    }

    /// Remove the response for a question.
    pub fn remove(&mut self, question_id: &QuestionId) -> Option<SurveyResponse> {
        self.values.remove(question_id)
    }

    /// Iterate over all responses, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SurveyResponse> {
        self.values.values()
    }

    /// Get the number of responses.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no responses.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flatten into a list ordered by `order`, then any remaining ids sorted.
    pub fn to_ordered_vec<'a>(
        &self,
        order: impl IntoIterator<Item = &'a QuestionId>,
    ) -> Vec<SurveyResponse> {
        let mut out = Vec::with_capacity(self.values.len());
        for id in order {
            if let Some(response) = self.values.get(id) {
                out.push(response.clone());
            }
        }
        let mut rest: Vec<_> = self
            .values
            .values()
            .filter(|r| !out.iter().any(|o| o.question_id == r.question_id))
            .cloned()
            .collect();
        rest.sort_by(|a, b| a.question_id.cmp(&b.question_id));
        out.extend(rest);
        out
    }

    /// Hash of the answer content, ignoring timestamps and key order.
    ///
    /// Two stores with the same answers have the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut entries: Vec<_> = self.values.values().collect();
        entries.sort_by(|a, b| a.question_id.cmp(&b.question_id));

        let mut hasher = DefaultHasher::new();
        for response in entries {
            response.question_id.hash(&mut hasher);
            response.answer.hash_content(&mut hasher);
        }
        hasher.finish()
    }
}

impl FromIterator<SurveyResponse> for ResponseStore {
    fn from_iter<T: IntoIterator<Item = SurveyResponse>>(iter: T) -> Self {
        Self::seeded(iter)
    }
}

impl IntoIterator for ResponseStore {
    type Item = SurveyResponse;
    type IntoIter = std::collections::hash_map::IntoValues<QuestionId, SurveyResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_values()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn upsert_and_get() {
        let mut store = ResponseStore::new();
        assert!(store.upsert("q1", "yes").is_none());
        let previous = store.upsert("q1", "no").unwrap();

        assert_eq!(previous.answer, Answer::from("yes"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.answer(&"q1".into()), Some(&Answer::from("no")));
    }

    #[test]
    fn fingerprint_ignores_timestamps() {
        let mut a = ResponseStore::new();
        a.upsert("q1", "yes");
        a.upsert("q2", 3);

        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = ResponseStore::seeded([
            SurveyResponse::at("q2", 3, early),
            SurveyResponse::at("q1", "yes", early),
        ]);

        assert_eq!(a.fingerprint(), b.fingerprint());

        a.upsert("q2", 4);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn seeding_keeps_latest_duplicate() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let store = ResponseStore::seeded([
            SurveyResponse::at("q1", "late", late),
            SurveyResponse::at("q1", "early", early),
        ]);
        assert_eq!(store.answer(&"q1".into()), Some(&Answer::from("late")));
    }

    #[test]
    fn ordered_flattening() {
        let mut store = ResponseStore::new();
        store.upsert("zeta", "z");
        store.upsert("b", "2");
        store.upsert("a", "1");
        store.upsert("orphan", "o");

        let order: Vec<QuestionId> = vec!["a".into(), "b".into(), "zeta".into()];
        let ids: Vec<String> = store
            .to_ordered_vec(&order)
            .into_iter()
            .map(|r| r.question_id.to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "zeta", "orphan"]);
    }

    #[test]
    fn response_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 11, 5, 12, 0, 0).unwrap();
        let response = SurveyResponse::at("topics", vec!["voting", "courts"], at);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["question_id"], "topics");
        assert_eq!(json["answer"][1], "courts");

        let back: SurveyResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
