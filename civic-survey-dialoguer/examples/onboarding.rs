use civic_survey::{RecordingHost, SurveySession};
use civic_survey_dialoguer::{DialoguerRenderer, Outcome};
use example_surveys::civic_onboarding;

fn main() -> anyhow::Result<()> {
    let mut session = SurveySession::new(civic_onboarding());
    let mut host = RecordingHost::new();

    let outcome = DialoguerRenderer::new().run(&mut session, &mut host)?;
    println!("{outcome:?}");

    for response in host.completions().iter().chain(host.saves()).flatten() {
        println!("{}: {:?}", response.question_id, response.answer);
    }
    Ok(())
}
