// Person example: build a PersonHelper and send it, or list, update and
// delete persons already on the server.

use super::{pretty, random_first_name, random_last_name, with_spinner, Example, Step};
use crate::api::BlueinkApi;
use crate::error::PromptError;
use crate::helpers::PersonHelper;
use crate::models::Person;
use crate::prompt::{Choices, Console};
use anyhow::Result;
use serde_json::{Map, Number, Value};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    List,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PersonAction {
    Print,
    Send,
    Exit,
}

/// Convert user input to the JSON type of `original`. Only strings,
/// integers and floats are editable.
fn coerce(original: &Value, input: &str) -> Option<Value> {
    match original {
        Value::String(_) => Some(Value::String(input.to_string())),
        Value::Number(n) if n.is_f64() => input
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        Value::Number(_) => input.parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        _ => "other",
    }
}

fn is_editable(key: &str, value: &Value) -> bool {
    key != "id" && matches!(value, Value::String(_) | Value::Number(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct PersonExample<'a, A: ?Sized, R, W> {
    api: &'a A,
    console: &'a mut Console<R, W>,
}

impl<'a, A, R, W> PersonExample<'a, A, R, W>
where
    A: BlueinkApi + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(api: &'a A, console: &'a mut Console<R, W>) -> Self {
        Self { api, console }
    }

    fn create_person(&mut self) -> Result<Step> {
        let fname = self
            .console
            .text("First Name", Some(random_first_name()), false)?;
        let lname = self
            .console
            .text("Last Name", Some(random_last_name()), false)?;
        let name = format!("{} {}", fname, lname);

        let phones = self.console.list_entry(
            "Add Phone Number (format xxx xxx xxxx)",
            "Add another phone number?",
            Some("505 555 5555"),
        )?;

        let emails = if self.console.yes_no("Add emails", false)? {
            self.console.list_entry(
                "Add email address",
                "Add another email address?",
                Some("jeff.gordon@nascar.com"),
            )?
        } else {
            Vec::new()
        };

        // Phones become `mp` channels and emails `em` channels.
        let mut person = PersonHelper::new(&name)
            .with_phones(phones)
            .with_emails(emails);
        if self.console.yes_no("Add metadata?", false)? {
            let metadata =
                self.console
                    .map_entry("Metadata Key", "Add more Metadata?", Some("key"))?;
            person = person.with_metadata(metadata);
        }

        self.person_menu(&person)
    }

    /// Print or send the person just built, or drop it.
    fn person_menu(&mut self, person: &PersonHelper) -> Result<Step> {
        let choices = Choices::new()
            .with("prt", "Print Person Data", PersonAction::Print)
            .with("snd", "Send Person to Server", PersonAction::Send)
            .with("ext", "Exit to Main Menu", PersonAction::Exit);
        loop {
            let choice = self
                .console
                .choose("\nPerson Menu", "Your Selection", &choices, 1)?;
            self.console.say(format!("Your choice: `{}`", choice.label))?;

            match choice.value {
                PersonAction::Print => self.console.say(pretty(&person.as_dict()))?,
                PersonAction::Send => return self.send_person(person),
                PersonAction::Exit => return Ok(Step::Continue),
            }
        }
    }

    fn send_person(&mut self, person: &PersonHelper) -> Result<Step> {
        let api = self.api;
        match with_spinner("Creating person...", || api.create_person(person)) {
            Ok(resp) => {
                if self
                    .console
                    .yes_no("Would you like to see the returned data?", false)?
                {
                    self.console.say(pretty(&resp.data))?;
                }
                self.console.say(
                    "Example Concluded. To create a new Person, start the example script again.",
                )?;
                Ok(Step::Finished)
            }
            Err(e) => {
                self.console
                    .say(format!("Failed to create person, {}", e))?;
                self.console.say("Returning to main menu")?;
                Ok(Step::Continue)
            }
        }
    }

    /// Fetch all persons, printing the status line. `None` after a failure.
    fn fetch_persons(&mut self, status_label: &str) -> Result<Option<Vec<Person>>> {
        let api = self.api;
        match with_spinner("Fetching persons...", || api.list_persons()) {
            Ok(resp) => {
                self.console
                    .say(format!("{}: {}", status_label, resp.status))?;
                self.console
                    .say(format!("Total Persons: {}", resp.data.len()))?;
                Ok(Some(resp.data))
            }
            Err(e) => {
                match e.status() {
                    Some(status) => {
                        self.console.say(format!("{}: {}", status_label, status))?;
                        self.console
                            .say(format!("Response error: HTTP {}", status))?;
                    }
                    None => self.console.say(format!("Response error: {}", e))?,
                }
                Ok(None)
            }
        }
    }

    fn list_persons(&mut self) -> Result<Step> {
        let show_metadata = self.console.yes_no("Show Metadata?", false)?;
        let Some(persons) = self.fetch_persons("Response Code")? else {
            return Ok(Step::Continue);
        };

        for person in &persons {
            self.console
                .say(format!("  - Person {}: {}", person.id, person.name))?;
            if show_metadata {
                self.console.say("     meta:")?;
                self.console.say(pretty(&person.metadata))?;
            }
        }
        Ok(Step::Continue)
    }

    fn delete_person(&mut self) -> Result<Step> {
        let Some(persons) = self.fetch_persons("Fetch List Response Code")? else {
            return Ok(Step::Continue);
        };

        let mut choices = Choices::new();
        for person in persons {
            let label = format!("{} ({})", person.name, person.id);
            choices.push(person.id.clone(), label, (person.id, person.name));
        }
        if choices.is_empty() {
            self.console.say("** No persons to delete **")?;
            return Ok(Step::Continue);
        }

        // Deleted persons drop out of the menu.
        let api = self.api;
        loop {
            let (id, name) = self
                .console
                .choose("Delete Person", "Which Person", &choices, 1)?
                .value
                .clone();
            self.console
                .say(format!("Attempting to delete '{}' by ID '{}'", name, id))?;

            match with_spinner("Deleting person...", || api.delete_person(&id)) {
                Ok(resp) => {
                    let detail = match resp.data {
                        Value::Null => String::new(),
                        data => format!(": {}", data),
                    };
                    self.console
                        .say(format!("Successfully deleted person '{}'{}", name, detail))?;
                    choices.remove(&id);
                }
                Err(e) => self.console.say(format!(
                    "Failed to delete person with ID {} ({}), {}",
                    id, name, e
                ))?,
            }

            if choices.is_empty() || !self.console.yes_no("Delete more Persons", false)? {
                break;
            }
        }
        Ok(Step::Continue)
    }

    /// Ask for a replacement value until it parses as the original's type.
    fn ask_new_value(&mut self, original: &Value) -> Result<Value> {
        let prompt = format!("New value ({})", type_name(original));
        let default = scalar_text(original);
        for _ in 0..self.console.max_attempts() {
            let input = self.console.text(&prompt, Some(&default), false)?;
            match coerce(original, &input) {
                Some(value) => return Ok(value),
                None => self.console.say(format!(
                    "Incorrect type. Must be {}",
                    type_name(original)
                ))?,
            }
        }
        Err(PromptError::RetriesExhausted {
            prompt,
            attempts: self.console.max_attempts(),
        }
        .into())
    }

    fn update_person(&mut self) -> Result<Step> {
        let Some(persons) = self.fetch_persons("Fetch List Response Code")? else {
            return Ok(Step::Continue);
        };

        let mut choices = Choices::new();
        for person in persons {
            let label = format!("{} ({})", person.name, person.id);
            choices.push(person.id.clone(), label, person);
        }
        if choices.is_empty() {
            self.console.say("** No persons to update **")?;
            return Ok(Step::Continue);
        }

        let person = self
            .console
            .choose("Update Person", "Which Person", &choices, 1)?
            .value
            .clone();
        self.console
            .say(format!("Updating {} ({})", person.id, person.name))?;

        // Fields come in key order. Declining a change can end the walk early.
        let mut changes = Map::new();
        for (key, value) in person.as_fields() {
            if !is_editable(&key, &value) {
                continue;
            }
            self.console.say(format!(
                "Original value for key '{}': {}",
                key,
                scalar_text(&value)
            ))?;
            if self
                .console
                .yes_no(&format!("Change value of '{}'", key), false)?
            {
                let new_value = self.ask_new_value(&value)?;
                changes.insert(key, new_value);
            } else if !self.console.yes_no("Any further changes?", true)? {
                break;
            }
        }

        // Only the changed keys go out, as a partial update.
        if changes.is_empty() {
            self.console.say("No changes to send.")?;
            return Ok(Step::Continue);
        }

        let api = self.api;
        let id = person.id.as_str();
        match with_spinner("Updating person...", || api.update_person(id, &changes, true)) {
            Ok(resp) => {
                self.console
                    .say(format!("Successfully updated person with id {}", id))?;
                if self
                    .console
                    .yes_no("Would you like to see the returned data?", false)?
                {
                    self.console.say(pretty(&resp.data))?;
                }
            }
            Err(e) => self.console.say(format!(
                "Failed to update person with ID {}, {}",
                id, e
            ))?,
        }
        Ok(Step::Continue)
    }
}

impl<A, R, W> Example for PersonExample<'_, A, R, W>
where
    A: BlueinkApi + ?Sized,
    R: BufRead,
    W: Write,
{
    fn start(&mut self) -> Result<()> {
        self.console.say("BlueInk API Client Example: Person Helper")?;
        self.console.say("")?;
        Ok(())
    }

    fn notice(&mut self, line: &str) -> Result<()> {
        self.console.say(line)?;
        Ok(())
    }

    fn main_router(&mut self) -> Result<Step> {
        let choices = Choices::new()
            .with("crt", "Create a Person", Action::Create)
            .with("lst", "List Persons", Action::List)
            .with("upd", "Update a person", Action::Update)
            .with("dlt", "Delete a Person", Action::Delete);
        let choice = self
            .console
            .choose("\nMain Menu", "Your Selection", &choices, 1)?;
        self.console.say(format!("Your choice: `{}`", choice.label))?;

        match choice.value {
            Action::Create => self.create_person(),
            Action::List => self.list_persons(),
            Action::Update => self.update_person(),
            Action::Delete => self.delete_person(),
        }
    }
}
