// Payload builders. Each helper accumulates what the user enters and is
// turned into a request body in one go when the example sends it.

use crate::error::HelperError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Document {
    fn new(key: String) -> Self {
        Self {
            key,
            file_url: None,
            file_index: None,
            template_id: None,
            fields: Vec::new(),
        }
    }
}

/// Where a field sits on its document page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub page: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Field {
    pub key: String,
    pub kind: String,
    pub label: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub editors: Vec<String>,
}

/// A signer entry ("packet" on the server).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Packet {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub deliver_via: String,
}

/// Builder for a bundle request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BundleHelper {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_message: Option<String>,
    pub is_test: bool,
    pub documents: Vec<Document>,
    pub packets: Vec<Packet>,
    #[serde(skip)]
    files: Vec<PathBuf>,
    #[serde(skip)]
    field_count: usize,
}

impl BundleHelper {
    /// Blank subject or message means "let the server use its default".
    pub fn new(label: &str, email_subject: &str, email_message: &str, is_test: bool) -> Self {
        Self {
            label: label.to_string(),
            email_subject: optional(email_subject),
            email_message: optional(email_message),
            is_test,
            documents: Vec::new(),
            packets: Vec::new(),
            files: Vec::new(),
            field_count: 0,
        }
    }

    fn next_document(&mut self) -> &mut Document {
        let key = format!("DOC-{}", self.documents.len() + 1);
        self.documents.push(Document::new(key));
        let last = self.documents.len() - 1;
        &mut self.documents[last]
    }

    pub fn add_document_by_url(&mut self, url: &str) -> String {
        let doc = self.next_document();
        doc.file_url = Some(url.to_string());
        doc.key.clone()
    }

    /// Queue a local file for upload. The document refers to it by index.
    pub fn add_document_by_path(&mut self, path: &Path) -> Result<String, HelperError> {
        if !path.is_file() {
            return Err(HelperError::MissingFile(path.to_path_buf()));
        }
        let index = self.files.len();
        self.files.push(path.to_path_buf());
        let doc = self.next_document();
        doc.file_index = Some(index);
        Ok(doc.key.clone())
    }

    pub fn add_document_template(&mut self, template_id: &str) -> String {
        let doc = self.next_document();
        doc.template_id = Some(template_id.to_string());
        doc.key.clone()
    }

    pub fn add_signer(
        &mut self,
        key: &str,
        name: &str,
        email: &str,
        phone: &str,
        deliver_via: &str,
    ) -> Result<String, HelperError> {
        if self.packets.iter().any(|p| p.key == key) {
            return Err(HelperError::DuplicateSigner(key.to_string()));
        }
        self.packets.push(Packet {
            key: key.to_string(),
            name: name.to_string(),
            email: optional(email),
            phone: optional(phone),
            deliver_via: deliver_via.to_string(),
        });
        Ok(key.to_string())
    }

    /// Place a field on a document and assign it to one or more signers.
    pub fn add_field(
        &mut self,
        doc_key: &str,
        kind: &str,
        label: &str,
        placement: Placement,
        editors: &[String],
    ) -> Result<String, HelperError> {
        if let Some(unknown) = editors
            .iter()
            .find(|e| !self.packets.iter().any(|p| &p.key == *e))
        {
            return Err(HelperError::UnknownSigner(unknown.clone()));
        }
        let key = format!("FLD-{}", self.field_count + 1);
        let doc = self
            .documents
            .iter_mut()
            .find(|d| d.key == doc_key)
            .ok_or_else(|| HelperError::UnknownDocument(doc_key.to_string()))?;
        doc.fields.push(Field {
            key: key.clone(),
            kind: kind.to_string(),
            label: label.to_string(),
            placement,
            editors: editors.to_vec(),
        });
        self.field_count += 1;
        Ok(key)
    }

    /// Local files to upload alongside the request, in `file_index` order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Builder for a person record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonHelper {
    pub name: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub metadata: Option<BTreeMap<String, String>>,
}

impl PersonHelper {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_phones(mut self, phones: Vec<String>) -> Self {
        self.phones = phones;
        self
    }

    pub fn with_emails(mut self, emails: Vec<String>) -> Self {
        self.emails = emails;
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Request body: name, optional metadata, and one channel per phone
    /// (`mp`) then per email (`em`).
    pub fn as_dict(&self) -> Value {
        let mut channels: Vec<Value> = self
            .phones
            .iter()
            .map(|p| json!({"kind": "mp", "phone": p}))
            .collect();
        channels.extend(
            self.emails
                .iter()
                .map(|e| json!({"kind": "em", "email": e})),
        );

        let mut body = Map::new();
        body.insert("name".into(), json!(self.name));
        if let Some(md) = &self.metadata {
            body.insert("metadata".into(), json!(md));
        }
        body.insert("channels".into(), Value::Array(channels));
        Value::Object(body)
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
