// Bundle example: set up a BundleHelper, add documents, signers and
// fields to it, then print or send it. Also lists existing bundles.

use super::{pretty, random_first_name, random_last_name, with_spinner, Example, Step};
use crate::api::{paged_bundles, BlueinkApi};
use crate::helpers::{BundleHelper, Placement};
use crate::models::Bundle;
use crate::prompt::{Choices, Console};
use anyhow::Result;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

const PER_PAGE: u32 = 5;
const DEFAULT_DOCUMENT_URL: &str = "https://www.irs.gov/pub/irs-pdf/fw4.pdf";
const FIELD_KINDS: [&str; 5] = ["inp", "ini", "txt", "cbx", "sdt"];
const BUNDLE_STATUSES: [(&str, &str); 9] = [
    ("ne", "New"),
    ("dr", "Draft"),
    ("pe", "Pending"),
    ("se", "Sent"),
    ("st", "Started"),
    ("co", "Complete"),
    ("ca", "Cancelled"),
    ("ex", "Expired"),
    ("fa", "Failed"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Setup,
    AddDocument,
    AddSigner,
    AddField,
    Summary,
    PrintJson,
    Send,
    ListAll,
    ListFiltered,
}

fn main_choices() -> Choices<Action> {
    Choices::new()
        .with("bdl", "Setup a Bundle", Action::Setup)
        .with("doc", "Add a Document", Action::AddDocument)
        .with("sig", "Add a Signer", Action::AddSigner)
        .with("fld", "Add a Field", Action::AddField)
        .with("sum", "Rolling Summary", Action::Summary)
        .with("prn", "Print Bundle JSON", Action::PrintJson)
        .with("sen", "Send Bundle", Action::Send)
        .with("lba", "List all Bundles", Action::ListAll)
        .with("lbf", "List Bundles, filtered", Action::ListFiltered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentSource {
    File,
    Url,
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMode {
    Regular,
    Paginated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Email,
    Phone,
}

impl Delivery {
    fn as_str(self) -> &'static str {
        match self {
            Delivery::Email => "email",
            Delivery::Phone => "phone",
        }
    }
}

/// What has been built so far in this run.
#[derive(Debug, Default)]
pub struct BundleSession {
    pub helper: Option<BundleHelper>,
    pub doc_keys: BTreeSet<String>,
    pub signer_keys: BTreeSet<String>,
    pub field_keys: BTreeSet<String>,
}

impl BundleSession {
    /// 1-based main menu entry for the next step that still needs doing.
    pub fn suggested_main_option(&self) -> usize {
        if self.helper.is_none() {
            1
        } else if self.doc_keys.is_empty() {
            2
        } else if self.signer_keys.is_empty() {
            3
        } else if self.field_keys.is_empty() {
            4
        } else {
            6
        }
    }
}

pub struct BundleExample<'a, A: ?Sized, R, W> {
    api: &'a A,
    console: &'a mut Console<R, W>,
    session: BundleSession,
}

impl<'a, A, R, W> BundleExample<'a, A, R, W>
where
    A: BlueinkApi + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(api: &'a A, console: &'a mut Console<R, W>) -> Self {
        Self {
            api,
            console,
            session: BundleSession::default(),
        }
    }

    pub fn session(&self) -> &BundleSession {
        &self.session
    }

    fn not_configured(&mut self) -> Result<Step> {
        self.console
            .say("** Bundle not yet configured. Please pick option 1**")?;
        Ok(Step::Continue)
    }

    fn print_bundles(&mut self, bundles: &[Bundle]) -> Result<()> {
        for bundle in bundles {
            self.console.say(format!(
                "  - Bundle {}: {}; status: {}",
                bundle.id,
                bundle.label_or_blank(),
                bundle.status
            ))?;
        }
        Ok(())
    }

    fn list_all_bundles(&mut self) -> Result<Step> {
        let choices = Choices::new()
            .with("reg", "Regularly", ListMode::Regular)
            .with("pag", "Paginated", ListMode::Paginated);
        let mode = self
            .console
            .choose("~~List all Bundles~~", "Your Selection", &choices, 1)?
            .value;
        match mode {
            ListMode::Regular => self.call_list_bundles()?,
            ListMode::Paginated => self.call_list_bundles_paginated()?,
        }
        Ok(Step::Continue)
    }

    fn call_list_bundles(&mut self) -> Result<()> {
        let api = self.api;
        match with_spinner("Fetching bundles...", || api.list_bundles(None)) {
            Ok(resp) => {
                if resp.status == 200 {
                    self.console
                        .say(format!("Total Bundles: {}", resp.data.len()))?;
                } else {
                    self.console.say(format!("Response Code: {}", resp.status))?;
                }
                self.print_bundles(&resp.data)
            }
            Err(e) => {
                self.console.say(format!("Response Code: {}", e))?;
                Ok(())
            }
        }
    }

    fn call_list_bundles_paginated(&mut self) -> Result<()> {
        self.console.say(format!(
            "A paginated call to '/bundles/', {} per page...",
            PER_PAGE
        ))?;
        let api = self.api;
        let mut pages = paged_bundles(api, PER_PAGE);

        while let Some(result) = with_spinner("Fetching page...", || pages.next()) {
            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    self.console.say(format!("Response Code: {}", e))?;
                    break;
                }
            };
            self.console.say(format!(
                "Page {} of {}:",
                page.pagination.page_number, page.pagination.total_pages
            ))?;
            self.print_bundles(&page.data)?;

            if page.pagination.is_last() || !self.console.yes_no("Next Page", true)? {
                break;
            }
        }
        Ok(())
    }

    fn list_filtered_bundles(&mut self) -> Result<Step> {
        self.console.say("~~List Bundles, filtered by status~~")?;
        let choices = BUNDLE_STATUSES
            .iter()
            .fold(Choices::new(), |acc, (code, name)| {
                acc.with(*code, format!("{} ({})", name, code), *code)
            });
        let status = self
            .console
            .choose("Status Codes", "Your Selection", &choices, 1)?
            .value;

        let api = self.api;
        match with_spinner("Fetching bundles...", || api.list_bundles(Some(status))) {
            Ok(resp) => {
                self.console.say(format!("Response Code: {}", resp.status))?;
                if resp.status == 200 {
                    self.console.say(format!(
                        "Total Bundles with status '{}': {}",
                        status,
                        resp.data.len()
                    ))?;
                }
                self.print_bundles(&resp.data)?;
            }
            Err(e) => self.console.say(format!("Response Code: {}", e))?,
        }
        Ok(Step::Continue)
    }

    fn summary(&mut self) -> Result<Step> {
        let sections = [
            ("Documents Added:", &self.session.doc_keys),
            ("Signers Added:", &self.session.signer_keys),
            ("Fields Added to all Docs:", &self.session.field_keys),
        ];
        for (title, keys) in sections {
            self.console.say(title)?;
            for key in keys {
                self.console.say(key)?;
            }
        }
        Ok(Step::Continue)
    }

    fn setup_bundle_helper(&mut self) -> Result<Step> {
        if self.session.helper.is_some() {
            self.console
                .say("** Bundle already setup. Please pick another option **")?;
            return Ok(Step::Continue);
        }

        self.console.say("~~Bundle Initial Setup~~")?;
        let label = self.console.text("Bundle Label", Some("Test_Bundle"), false)?;
        let email_subject = self.console.text("Email Subject", None, true)?;
        let email_message = self.console.text("Email Message", None, true)?;

        self.session.helper = Some(BundleHelper::new(
            &label,
            &email_subject,
            &email_message,
            true,
        ));
        self.console.say("Bundle Configured!")?;
        Ok(Step::Continue)
    }

    fn add_document_interactive(&mut self) -> Result<Step> {
        let Some(helper) = self.session.helper.as_mut() else {
            return self.not_configured();
        };

        let choices = Choices::new()
            .with("file", "Add Document by File Path", DocumentSource::File)
            .with("url", "Add Document by URL", DocumentSource::Url)
            .with("temp", "Add Document by Template UUID", DocumentSource::Template);
        let source = self
            .console
            .choose(
                "~~Add a Document~~",
                "How would you like to add a document?",
                &choices,
                2,
            )?
            .value;

        // Local files are queued and uploaded with the bundle.
        let added = match source {
            DocumentSource::Url => {
                let url = self
                    .console
                    .text("URL to PDF", Some(DEFAULT_DOCUMENT_URL), false)?;
                Ok(helper.add_document_by_url(&url))
            }
            DocumentSource::File => {
                let path = self.console.text("Path to PDF", None, false)?;
                helper.add_document_by_path(Path::new(&path))
            }
            DocumentSource::Template => {
                let template_id = self.console.text("Template UUID", None, false)?;
                Ok(helper.add_document_template(&template_id))
            }
        };

        match added {
            Ok(doc_key) => {
                debug!(%doc_key, "document added");
                self.session.doc_keys.insert(doc_key);
                self.console.say("Document Added!")?;
            }
            Err(e) => self.console.say(format!("** Document not added: {} **", e))?,
        }
        Ok(Step::Continue)
    }

    fn add_signer_interactive(&mut self) -> Result<Step> {
        let Some(helper) = self.session.helper.as_mut() else {
            return self.not_configured();
        };

        self.console.say("~~Add a Signer~~")?;
        let suggested_key = format!("signer-{}", self.session.signer_keys.len() + 1);
        let key = self
            .console
            .text("Signer Key", Some(&suggested_key), false)?;
        let fname = self
            .console
            .text("First Name", Some(random_first_name()), false)?;
        let lname = self
            .console
            .text("Last Name", Some(random_last_name()), false)?;
        let name = format!("{} {}", fname, lname);

        let choices = Choices::new()
            .with("em", Delivery::Email.as_str(), Delivery::Email)
            .with("ph", Delivery::Phone.as_str(), Delivery::Phone);
        let deliver_via = self
            .console
            .choose("Select Delivery Method", "Your Selection", &choices, 1)?
            .value;

        // Only the contact matching the delivery method is mandatory.
        let default_email = format!("{}.{}@example.com", fname, lname);
        let email = self.console.text(
            "Email Address",
            Some(&default_email),
            deliver_via != Delivery::Email,
        )?;
        let phone = self.console.text(
            "Phone Number (format as: xxx xxx xxxx)",
            Some("505 555 5555"),
            deliver_via != Delivery::Phone,
        )?;

        match helper.add_signer(&key, &name, &email, &phone, deliver_via.as_str()) {
            Ok(packet_key) => {
                self.session.signer_keys.insert(packet_key);
                self.console.say("Signer Added!")?;
            }
            Err(e) => self.console.say(format!("** Signer not added: {} **", e))?,
        }
        Ok(Step::Continue)
    }

    fn add_field_interactive(&mut self) -> Result<Step> {
        if self.session.helper.is_none() {
            return self.not_configured();
        }
        if self.session.doc_keys.is_empty() {
            self.console
                .say("** Documents not yet added. Please add one or more documents **")?;
            return Ok(Step::Continue);
        }
        if self.session.signer_keys.is_empty() {
            self.console
                .say("** Signers not yet added. Please add one or more Signers **")?;
            return Ok(Step::Continue);
        }

        self.console.say("~~Add a Field~~")?;
        let doc_choices = Choices::from_labels(self.session.doc_keys.iter().cloned());
        let doc_key = self
            .console
            .choose(
                "Which Document should this field go onto?",
                "Your Selection",
                &doc_choices,
                1,
            )?
            .value
            .clone();
        let kind_choices = Choices::from_labels(FIELD_KINDS);
        let kind = self
            .console
            .choose(
                "Field Type\n(Inexhaustive, see documentation for more kinds)",
                "Your Selection",
                &kind_choices,
                1,
            )?
            .value
            .clone();
        let label = self.console.text("Label", Some("An Input Field"), true)?;

        // Coordinates default to a random spot on the page.
        let mut rng = rand::thread_rng();
        let placement = Placement {
            x: self.console.integer("x loc", rng.gen_range(0..=100))?,
            y: self.console.integer("y loc", rng.gen_range(0..=100))?,
            w: self.console.integer("width", rng.gen_range(0..=100))?,
            h: self.console.integer("height", rng.gen_range(0..=100))?,
            page: self.console.integer("page", 1)?,
        };

        // A signer can be assigned once; picked keys leave the menu.
        let mut editor_choices = Choices::from_labels(self.session.signer_keys.iter().cloned());
        let mut editors = Vec::new();
        loop {
            let editor = self
                .console
                .choose(
                    "Assign a Signer to Field",
                    "Signer choice",
                    &editor_choices,
                    1,
                )?
                .value
                .clone();
            editor_choices.remove(&editor);
            editors.push(editor);
            if editor_choices.is_empty() || !self.console.yes_no("Add more signers", false)? {
                break;
            }
        }

        let Some(helper) = self.session.helper.as_mut() else {
            return self.not_configured();
        };
        match helper.add_field(&doc_key, &kind, &label, placement, &editors) {
            Ok(key) => {
                self.session.field_keys.insert(key);
                self.console.say("Field Added!")?;
            }
            Err(e) => self.console.say(format!("** Field not added: {} **", e))?,
        }
        Ok(Step::Continue)
    }

    fn print_bundle_json(&mut self) -> Result<Step> {
        let Some(helper) = self.session.helper.as_ref() else {
            return self.not_configured();
        };
        self.console.say(pretty(&helper.as_json()))?;
        Ok(Step::Continue)
    }

    fn send_bundle(&mut self) -> Result<Step> {
        let Some(helper) = self.session.helper.as_ref() else {
            return self.not_configured();
        };

        let api = self.api;
        match with_spinner("Sending bundle...", || api.create_bundle(helper)) {
            Ok(resp) => {
                let label = resp
                    .data
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or(&helper.label);
                self.console
                    .say(format!("Successfully sent bundle '{}'", label))?;
                self.console.say(pretty(&resp.data))?;
                self.console.say(
                    "Example Concluded. To create a new bundle, start the example script again.",
                )?;
                Ok(Step::Finished)
            }
            Err(e) => {
                self.console.say(format!("Response Status: {}", e))?;
                Ok(Step::Continue)
            }
        }
    }
}

impl<A, R, W> Example for BundleExample<'_, A, R, W>
where
    A: BlueinkApi + ?Sized,
    R: BufRead,
    W: Write,
{
    fn start(&mut self) -> Result<()> {
        self.console.say("BlueInk API Client Example: Bundle Helper")?;
        self.console.say("")?;
        Ok(())
    }

    fn notice(&mut self, line: &str) -> Result<()> {
        self.console.say(line)?;
        Ok(())
    }

    fn main_router(&mut self) -> Result<Step> {
        let choices = main_choices();
        let choice = self.console.choose(
            "\nMain Menu",
            "Your Selection",
            &choices,
            self.session.suggested_main_option(),
        )?;
        self.console.say(format!("Your choice: `{}`", choice.label))?;

        match choice.value {
            Action::Setup => self.setup_bundle_helper(),
            Action::AddDocument => self.add_document_interactive(),
            Action::AddSigner => self.add_signer_interactive(),
            Action::AddField => self.add_field_interactive(),
            Action::Summary => self.summary(),
            Action::PrintJson => self.print_bundle_json(),
            Action::Send => self.send_bundle(),
            Action::ListAll => self.list_all_bundles(),
            Action::ListFiltered => self.list_filtered_bundles(),
        }
    }
}
