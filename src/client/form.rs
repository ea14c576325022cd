use std::collections::BTreeMap;

use serde_json::Value;

use crate::client::api::ApiClient;
use crate::client::transport::{FormPart, PartValue, Transport};
use crate::client::ClientError;
use crate::models::registry::RecordType;
use crate::models::validate;

/// The one selected attachment of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Schema-driven submission form: one instance serves every record type.
///
/// Invalid input never reaches the transport; a successful submission
/// resets the form to its initial empty state; a failed one leaves every
/// entered value intact for correction.
#[derive(Debug, Clone)]
pub struct SubmissionForm {
    record_type: RecordType,
    values: BTreeMap<String, String>,
    file: Option<FileAttachment>,
    errors: BTreeMap<String, String>,
}

impl SubmissionForm {
    pub fn new(record_type: RecordType) -> Self {
        SubmissionForm {
            record_type,
            values: BTreeMap::new(),
            file: None,
            errors: BTreeMap::new(),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn set_field(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn field(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn attach(&mut self, file: FileAttachment) {
        self.file = Some(file);
    }

    pub fn file(&self) -> Option<&FileAttachment> {
        self.file.as_ref()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// True when the form holds no values, no file, and no errors — the
    /// state a fresh form starts in and a successful submission returns to.
    pub fn is_pristine(&self) -> bool {
        self.values.is_empty() && self.file.is_none() && self.errors.is_empty()
    }

    /// Run the schema checks, filling the inline error map.
    /// Returns true when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = validate::validate_fields(self.record_type, &self.values);
        if let Some(msg) = validate::validate_file(self.file.as_ref().map(|f| f.mime.as_str())) {
            errors.insert("file".to_string(), msg);
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Clear all fields, the file selection, and inline errors.
    pub fn reset(&mut self) {
        self.values.clear();
        self.file = None;
        self.errors.clear();
    }

    /// Validate and submit. Validation failures short-circuit with no
    /// network traffic.
    pub fn submit<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<Value, ClientError> {
        if !self.validate() {
            return Err(ClientError::Validation(self.errors.clone()));
        }

        let mut parts: Vec<FormPart> = self
            .record_type
            .fields()
            .iter()
            .filter_map(|f| {
                let value = self.values.get(f.key)?.trim();
                if value.is_empty() {
                    return None;
                }
                Some(FormPart {
                    name: f.key.to_string(),
                    value: PartValue::Text(value.to_string()),
                })
            })
            .collect();
        let file = self.file.clone().expect("validated form has a file");
        parts.push(FormPart {
            name: "file".to_string(),
            value: PartValue::File {
                filename: file.filename,
                mime: file.mime,
                bytes: file.bytes,
            },
        });

        let path = format!("/{}", self.record_type.slug());
        let response = client.post_multipart(&path, parts)?;
        let created = response.json().unwrap_or(Value::Null);
        self.reset();
        Ok(created)
    }
}
