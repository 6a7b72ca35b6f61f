//! File-backed survey host used by the `survey-runner` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use civic_survey::{Survey, SurveyHost, SurveyResponse};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

/// On-disk shape of a response file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResponses {
    pub survey_id: String,
    /// `false` for progress saved through "finish later".
    pub complete: bool,
    pub responses: Vec<SurveyResponse>,
}

/// Writes responses as pretty-printed JSON to a single file.
#[derive(Debug, Clone)]
pub struct JsonFileHost {
    survey_id: String,
    path: PathBuf,
}

impl JsonFileHost {
    pub fn new(survey_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            survey_id: survey_id.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, responses: &[SurveyResponse], complete: bool) -> Result<()> {
        let saved = SavedResponses {
            survey_id: self.survey_id.clone(),
            complete,
            responses: responses.to_vec(),
        };
        let json = serde_json::to_string_pretty(&saved)?;
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("failed to write responses to {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            count = responses.len(),
            complete,
            "responses written"
        );
        Ok(())
    }
}

impl SurveyHost for JsonFileHost {
    fn on_complete(&mut self, responses: &[SurveyResponse]) -> Result<()> {
        self.write(responses, true)
    }

    fn on_save_progress(&mut self, responses: &[SurveyResponse]) -> Result<()> {
        self.write(responses, false)
    }
}

/// Replace `path` with `bytes` so a crash leaves either the old or the new file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Read a survey definition from a JSON file.
pub fn load_survey(path: impl AsRef<Path>) -> Result<Survey> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read survey {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid survey in {}", path.display()))
}

/// Read previously written responses, if the file exists.
///
/// Responses saved for a different survey are an error.
pub fn load_responses(path: impl AsRef<Path>, survey_id: &str) -> Result<Option<SavedResponses>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read responses {}", path.display()))?;
    let saved: SavedResponses = serde_json::from_str(&text)
        .with_context(|| format!("invalid responses in {}", path.display()))?;
    anyhow::ensure!(
        saved.survey_id == survey_id,
        "{} holds responses for survey '{}', not '{}'",
        path.display(),
        saved.survey_id,
        survey_id
    );
    Ok(Some(saved))
}

#[cfg(test)]
mod tests {
    use civic_survey::{RecordingHost, SurveySession};
    use example_surveys::{CIVIC_ONBOARDING_JSON, civic_onboarding};

    use super::*;

    #[test]
    fn saves_and_reloads_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        let mut host = JsonFileHost::new("civic-onboarding", &path);

        let mut session = SurveySession::new(civic_onboarding());
        session.update_answer("role", "Student").unwrap();
        session.save_progress(&mut host).unwrap();

        let saved = load_responses(&path, "civic-onboarding").unwrap().unwrap();
        assert!(!saved.complete);
        assert_eq!(saved.responses.len(), 1);

        let resumed = SurveySession::resume(civic_onboarding(), saved.responses);
        assert!(resumed.visible_questions().iter().any(|q| q.id == "grade"));
    }

    #[test]
    fn rewrite_replaces_earlier_save_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        let mut host = JsonFileHost::new("civic-onboarding", &path);

        let mut session = SurveySession::new(civic_onboarding());
        session.update_answer("role", "Student").unwrap();
        session.save_progress(&mut host).unwrap();
        session.update_answer("topics", vec!["Courts"]).unwrap();
        session.save_progress(&mut host).unwrap();

        let saved = load_responses(&path, "civic-onboarding").unwrap().unwrap();
        assert_eq!(saved.responses.len(), 2);
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn failed_write_keeps_earlier_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        let mut host = JsonFileHost::new("civic-onboarding", &path);
        let mut session = SurveySession::new(civic_onboarding());
        session.update_answer("role", "Student").unwrap();
        session.save_progress(&mut host).unwrap();

        let mut broken = JsonFileHost::new("civic-onboarding", dir.path().join("missing/out.json"));
        assert!(session.save_progress(&mut broken).is_err());
        assert!(load_responses(&path, "civic-onboarding").unwrap().is_some());
    }

    #[test]
    fn missing_response_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_responses(dir.path().join("none.json"), "x").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn rejects_responses_for_other_survey() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        let mut host = JsonFileHost::new("other", &path);
        host.on_complete(&[]).unwrap();

        let err = load_responses(&path, "civic-onboarding").unwrap_err();
        assert!(err.to_string().contains("other"));
    }

    #[test]
    fn loads_survey_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");
        fs::write(&path, CIVIC_ONBOARDING_JSON).unwrap();

        let survey = load_survey(&path).unwrap();
        assert_eq!(survey, civic_onboarding());
        assert!(load_survey(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn submitted_file_is_marked_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut host = JsonFileHost::new("civic-onboarding", &path);
        let mut recorder = RecordingHost::new();

        let mut session = SurveySession::new(civic_onboarding());
        session.update_answer("role", "Student").unwrap();
        session.update_answer("topics", vec!["Courts"]).unwrap();
        session.submit(&mut host).unwrap();
        session.submit(&mut recorder).unwrap();

        let saved = load_responses(&path, "civic-onboarding").unwrap().unwrap();
        assert!(saved.complete);
        assert_eq!(saved.responses, recorder.completions()[0]);
    }
}
