// UI layer: the top-level example picker and the pieces both example
// flows share. Each flow is a loop over one menu round at a time, so a
// long session never grows the call stack.

mod bundle;
mod person;

pub use bundle::{BundleExample, BundleSession};
pub use person::PersonExample;

use crate::api::BlueinkApi;
use crate::error::PromptError;
use crate::prompt::{Choices, Console};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use std::io::{BufRead, Write};
use std::time::Duration;

pub(crate) const FIRST_NAMES: [&str; 9] = [
    "HOMER", "MARGE", "LISA", "BART", "MOE", "FRED", "GORDON", "BARNEY", "ELI",
];
pub(crate) const LAST_NAMES: [&str; 5] = ["SIMPSON", "FLANDERS", "FREEMAN", "CALHOUN", "VANCE"];

/// What a flow does after one menu round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished,
}

/// Printed when an action gives up on its prompts and the flow goes back
/// to its main menu.
pub const RETURNING_NOTICE: &str = "** Too many invalid answers, returning to main menu **";

/// An interactive example: a banner, then menu rounds until one of them
/// reports `Step::Finished`.
pub trait Example {
    /// Print the banner.
    fn start(&mut self) -> Result<()>;

    /// Show the main menu once and run the selected action.
    fn main_router(&mut self) -> Result<Step>;

    /// Print one line to the example's console.
    fn notice(&mut self, line: &str) -> Result<()>;

    /// Run menu rounds until an action finishes the example. An action that
    /// runs out of valid answers is abandoned and the main menu comes back;
    /// a closed input or any other error ends the run.
    fn run(&mut self) -> Result<()> {
        self.start()?;
        loop {
            match self.main_router() {
                Ok(Step::Continue) => {}
                Ok(Step::Finished) => return Ok(()),
                Err(e) if is_recoverable(&e) => self.notice(RETURNING_NOTICE)?,
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExampleKind {
    Bundle,
    Person,
}

/// Ask which example to run and run it to completion.
pub fn main_menu<A, R, W>(api: &A, console: &mut Console<R, W>) -> Result<()>
where
    A: BlueinkApi + ?Sized,
    R: BufRead,
    W: Write,
{
    let choices = Choices::new()
        .with("bdl", "Bundle Example", ExampleKind::Bundle)
        .with("prs", "Person Example", ExampleKind::Person);
    // Giving up on the picker ends the program without an error.
    let kind = match console.choose("BlueInk Client Examples", "Your Selection", &choices, 1) {
        Ok(choice) => choice.value,
        Err(PromptError::RetriesExhausted { .. }) => {
            console.say("** Too many invalid answers, exiting **")?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match kind {
        ExampleKind::Bundle => BundleExample::new(api, console).run(),
        ExampleKind::Person => PersonExample::new(api, console).run(),
    }
}

/// True when the error chain ends in a closed stdin.
pub fn is_input_closed(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PromptError>(),
        Some(PromptError::InputClosed)
    )
}

/// True for prompt failures a flow recovers from by going back to its
/// main menu: too many invalid answers, or an empty menu.
pub fn is_recoverable(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PromptError>(),
        Some(PromptError::RetriesExhausted { .. } | PromptError::NoChoices(_))
    )
}

/// Run a blocking call with a spinner on stderr. The spinner stays hidden
/// when stderr is not a terminal.
pub(crate) fn with_spinner<T>(message: &str, call: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = call();
    spinner.finish_and_clear();
    out
}

pub(crate) fn random_first_name() -> &'static str {
    FIRST_NAMES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

pub(crate) fn random_last_name() -> &'static str {
    LAST_NAMES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

/// Pretty JSON for display, falling back to the compact form.
pub(crate) fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
