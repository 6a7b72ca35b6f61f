//! Every question type in one survey, rendered without colors and narrated.

use civic_survey::{RecordingHost, SurveySession};
use civic_survey_dialoguer::{DialoguerRenderer, TerminalNarrator};
use example_surveys::classroom_feedback;

fn main() -> anyhow::Result<()> {
    let mut session = SurveySession::new(classroom_feedback()).with_narrator(TerminalNarrator);
    let mut host = RecordingHost::new();

    DialoguerRenderer::plain().run(&mut session, &mut host)?;

    if let Some(responses) = host.completions().first() {
        println!("{}", serde_json::to_string_pretty(responses)?);
    }
    Ok(())
}
