use crate::SurveyResponse;

/// The host application's persistence side of a survey session.
///
/// The engine never stores anything itself. It hands a flattened copy of
/// the response store to these callbacks and keeps its own copy, so a
/// failed call can simply be retried.
pub trait SurveyHost {
    /// Called once the survey passed validation and the user submitted it.
    fn on_complete(&mut self, responses: &[SurveyResponse]) -> anyhow::Result<()>;

    /// Called on an explicit partial save.
    ///
    /// Only invoked for surveys that allow partial responses.
    fn on_save_progress(&mut self, responses: &[SurveyResponse]) -> anyhow::Result<()>;
}

/// Reads question prompts aloud when the displayed question changes.
///
/// Injected into a session so tests can stub it out.
pub trait Narrator {
    fn speak(&mut self, text: &str);
}
