use std::io::Write;

use civic_survey::Narrator;

/// Prints what would be spoken, for terminals without a speech engine.
///
/// Writes to stderr so it never mixes with prompt output that is piped.
#[derive(Debug, Default)]
pub struct TerminalNarrator;

impl Narrator for TerminalNarrator {
    fn speak(&mut self, text: &str) {
        let mut err = std::io::stderr().lock();
        // nothing useful to do if stderr is gone
        let _ = writeln!(err, "(narrator) {text}");
    }
}
