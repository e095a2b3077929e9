//! First-run "initialize timer?" confirmation

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, warn};

/// Asks the user whether a project without timer data should get one.
pub trait InitPrompt: Send + Sync {
    /// Return true to create the data file at `data_file`
    fn confirm_initialization(&self, data_file: &Path) -> bool;
}

/// Always answers the same way. Backs `--init yes` / `--init no`.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl InitPrompt for FixedAnswer {
    fn confirm_initialization(&self, data_file: &Path) -> bool {
        debug!(
            "Answering initialization prompt for {} with {}",
            data_file.display(),
            if self.0 { "yes" } else { "no" }
        );
        self.0
    }
}

/// Interactive yes/no question on the terminal. EOF or a read error counts
/// as "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl InitPrompt for StdinPrompt {
    fn confirm_initialization(&self, data_file: &Path) -> bool {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        ask(&mut stdin.lock(), &mut stdout, data_file)
    }
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, data_file: &Path) -> bool {
    let question = format!(
        "No timer data found for this project ({}).\nDo you want to create a timer? [y/N] ",
        data_file.display()
    );
    if let Err(e) = output.write_all(question.as_bytes()).and_then(|_| output.flush()) {
        warn!("Failed to write initialization prompt: {}", e);
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) => false,
        Ok(_) => is_yes(&answer),
        Err(e) => {
            warn!("Failed to read initialization answer: {}", e);
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
