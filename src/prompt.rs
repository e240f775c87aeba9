// Line-oriented prompt primitives used by the example flows: free text with
// a default, whole numbers, yes/no, numbered menus, and repeated entry of
// lists and maps. Reading from any `BufRead` and writing to any `Write`
// keeps the flows scriptable in tests.

use crate::error::PromptError;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Attempts a single prompt gets before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// One entry of a numbered menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub key: String,
    pub label: String,
    pub value: T,
}

/// An ordered menu. Entries are shown as 1-based positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Choices<T> {
    items: Vec<Choice<T>>,
}

impl<T> Default for Choices<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Choices<T> {
    /// An empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Choices::push`].
    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>, value: T) -> Self {
        self.push(key, label, value);
        self
    }

    /// Append an entry. `key` identifies it for [`Choices::remove`]; `label`
    /// is what the menu shows.
    pub fn push(&mut self, key: impl Into<String>, label: impl Into<String>, value: T) {
        self.items.push(Choice {
            key: key.into(),
            label: label.into(),
            value,
        });
    }

    /// Drop the entry with `key`, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<Choice<T>> {
        let pos = self.items.iter().position(|c| c.key == key)?;
        Some(self.items.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice<T>> {
        self.items.iter()
    }

    /// Entry at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&Choice<T>> {
        position.checked_sub(1).and_then(|i| self.items.get(i))
    }
}

impl Choices<String> {
    /// A menu whose returned value is the label itself.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().fold(Self::new(), |acc, label| {
            let label = label.into();
            acc.with(label.clone(), label.clone(), label)
        })
    }
}

/// Terminal session: an input stream, an output stream and a retry budget.
pub struct Console<R, W> {
    input: R,
    output: W,
    max_attempts: usize,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// A console with the default retry budget.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the number of tries per prompt. At least one is kept.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The underlying writer, for output that is not line based.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> Result<(), PromptError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        match default {
            Some(d) => write!(self.output, "{} [{}]: ", prompt, d)?,
            None => write!(self.output, "{}: ", prompt)?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::InputClosed);
        }
        let answer = line.trim();
        Ok(match (answer.is_empty(), default) {
            (true, Some(d)) => d.to_string(),
            _ => answer.to_string(),
        })
    }

    fn exhausted(&self, prompt: &str) -> PromptError {
        PromptError::RetriesExhausted {
            prompt: prompt.to_string(),
            attempts: self.max_attempts,
        }
    }

    /// Ask for a line of text. An empty answer takes `default`; when blank
    /// answers are not allowed the question is repeated.
    pub fn text(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        allow_blank: bool,
    ) -> Result<String, PromptError> {
        for _ in 0..self.max_attempts {
            let value = self.ask(prompt, default)?;
            if allow_blank || !value.is_empty() {
                return Ok(value);
            }
            self.say("** Blank value is NOT allowed **")?;
        }
        Err(self.exhausted(prompt))
    }

    /// Ask for a whole number, repeating the question until one is given.
    pub fn integer(&mut self, prompt: &str, default: i64) -> Result<i64, PromptError> {
        let default = default.to_string();
        for _ in 0..self.max_attempts {
            let value = self.text(prompt, Some(&default), false)?;
            match value.parse() {
                Ok(n) => return Ok(n),
                Err(_) => self.say("** Must be a whole number **")?,
            }
        }
        Err(self.exhausted(prompt))
    }

    /// Only `y` (any case) is a yes. Anything else is a no.
    pub fn yes_no(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let default = if default { "y" } else { "n" };
        let value = self.ask(prompt, Some(default))?;
        Ok(value.eq_ignore_ascii_case("y"))
    }

    /// Show a numbered menu and return the selected entry. Invalid
    /// selections redisplay the whole menu.
    pub fn choose<'c, T>(
        &mut self,
        header: &str,
        end_prompt: &str,
        choices: &'c Choices<T>,
        default: usize,
    ) -> Result<&'c Choice<T>, PromptError> {
        if choices.is_empty() {
            return Err(PromptError::NoChoices(header.trim().to_string()));
        }
        let default = default.to_string();

        for _ in 0..self.max_attempts {
            self.say(header)?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(self.output, "{}) {}", i + 1, choice.label)?;
            }
            self.say(format!(
                "To pick, enter a number of a selection above, from 1 to {}",
                choices.len()
            ))?;

            let answer = self.text(end_prompt, Some(&default), false)?;
            let Ok(position) = answer.parse::<usize>() else {
                self.say("** Invalid Selection, must be a number. Try again **")?;
                continue;
            };
            match choices.get(position) {
                Some(choice) => return Ok(choice),
                None => self.say("** Invalid Selection. Try again **")?,
            }
        }
        Err(self.exhausted(end_prompt))
    }

    /// Collect one or more non-blank items.
    pub fn list_entry(
        &mut self,
        init_message: &str,
        additional_message: &str,
        default: Option<&str>,
    ) -> Result<Vec<String>, PromptError> {
        let mut items = vec![self.text(init_message, default, false)?];
        while self.yes_no(additional_message, false)? {
            items.push(self.text(init_message, default, false)?);
        }
        Ok(items)
    }

    /// Collect one or more key/value pairs. A repeated key replaces the
    /// earlier value.
    pub fn map_entry(
        &mut self,
        init_message: &str,
        additional_message: &str,
        default: Option<&str>,
    ) -> Result<BTreeMap<String, String>, PromptError> {
        let mut map = BTreeMap::new();
        let first_key = self.text(init_message, default, false)?;
        let first_value = self.text(&format!("'{}' value", first_key), None, false)?;
        map.insert(first_key, first_value);

        while self.yes_no(additional_message, false)? {
            let key = self.text(init_message, default, false)?;
            let value = self.text("Value", None, false)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}
