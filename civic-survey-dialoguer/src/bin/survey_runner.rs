//! Run a survey definition file in the terminal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use civic_survey::{SurveySession, VisibilityMode};
use civic_survey_dialoguer::{
    DialoguerError, DialoguerRenderer, JsonFileHost, Outcome, TerminalNarrator, load_responses,
    load_survey,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "survey-runner", version, about = "Answer a survey in the terminal")]
struct Cli {
    /// Survey definition (JSON)
    survey: PathBuf,

    /// Where responses are written
    #[arg(short, long, default_value = "responses.json")]
    output: PathBuf,

    /// Continue from progress saved in the output file
    #[arg(long)]
    resume: bool,

    /// Hide questions whose own controlling question is hidden
    #[arg(long)]
    cascading: bool,

    /// Disable colors
    #[arg(long)]
    plain: bool,

    /// Echo each question as narrator text on stderr
    #[arg(long)]
    narrate: bool,

    /// Log engine decisions (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,civic_survey=debug,civic_survey_dialoguer=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Prompts own stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // definition issues are logged by the session
    let survey = load_survey(&cli.survey)?;

    let existing = if cli.resume {
        load_responses(&cli.output, &survey.id)?
            .map(|saved| saved.responses)
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    info!(survey = %survey.id, resumed = existing.len(), "starting survey");

    let mode = if cli.cascading {
        VisibilityMode::Cascading
    } else {
        VisibilityMode::Independent
    };
    let mut host = JsonFileHost::new(survey.id.clone(), &cli.output);
    let mut session = SurveySession::resume(survey, existing).with_visibility_mode(mode);
    if cli.narrate {
        session = session.with_narrator(TerminalNarrator);
    }

    let renderer = if cli.plain {
        DialoguerRenderer::plain()
    } else {
        DialoguerRenderer::new()
    };

    match renderer.run(&mut session, &mut host) {
        Ok(Outcome::Submitted) => println!("Thank you! Responses saved to {}", host.path().display()),
        Ok(Outcome::Saved) => println!(
            "Progress saved to {}. Run again with --resume to continue.",
            host.path().display()
        ),
        Ok(Outcome::Abandoned) | Err(DialoguerError::Cancelled) => {
            println!("Survey closed without saving.")
        }
        Err(err) => return Err(err).context("survey failed"),
    }
    Ok(())
}
