use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::catalog::OptionCatalog;
use crate::spec::interest::Interest;

/// Answers collected over one quiz session.
///
/// Fields form a dependency chain: replacing the interest drops the experience and
/// details, replacing the experience drops the details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerRecord {
    interest: Option<Interest>,
    experience: Option<String>,
    details: Vec<String>,
    phone: Option<String>,
}

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interest(&self) -> Option<&Interest> {
        self.interest.as_ref()
    }

    pub fn experience(&self) -> Option<&str> {
        self.experience.as_deref()
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn set_interest(&mut self, interest: Interest) {
        self.interest = Some(interest);
        self.experience = None;
        self.details.clear();
    }

    pub fn set_experience(&mut self, experience: impl Into<String>) {
        self.experience = Some(experience.into());
        self.details.clear();
    }

    /// Adds the detail when absent, removes it when present. Returns whether it is now selected.
    pub fn toggle_detail(&mut self, detail: &str) -> bool {
        if let Some(position) = self.details.iter().position(|item| item == detail) {
            self.details.remove(position);
            false
        } else {
            self.details.push(detail.to_string());
            true
        }
    }

    pub fn has_detail(&self, detail: &str) -> bool {
        self.details.iter().any(|item| item == detail)
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = Some(phone.into());
    }

    /// Flattens the record into the labelled document used for validation and export.
    pub fn to_document(&self, catalog: &OptionCatalog) -> AnswersDocument {
        AnswersDocument {
            interest: self
                .interest
                .as_ref()
                .map(|interest| catalog.interest_label(interest).to_string()),
            experience: self.experience.clone(),
            details: self.details.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Rebuilds a record from a document, honoring the dependency chain: an experience
    /// without an interest, or details without an experience, are dropped.
    pub fn from_document(catalog: &OptionCatalog, document: &AnswersDocument) -> Self {
        let mut record = Self::new();
        if let Some(interest) = document
            .interest
            .as_deref()
            .and_then(|label| catalog.interest(label))
        {
            record.set_interest(interest);
            if let Some(experience) = &document.experience {
                record.set_experience(experience.clone());
                for detail in &document.details {
                    if !record.has_detail(detail) {
                        record.details.push(detail.clone());
                    }
                }
            }
        }
        record.phone = document.phone.clone();
        record
    }
}

/// Flat, label-based view of an [`AnswerRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AnswersDocument {
    /// Step 1: a service category or the course label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    /// Step 2: experience level or prior-procedure answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    /// Step 3: selected details, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    /// Step 4: contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Validation error metadata reported for a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Result returned from [`crate::validate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
}
