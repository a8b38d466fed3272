use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::interest::{Interest, ServiceHistory};

const STUDIO_CATALOG: &str = include_str!("../../fixtures/studio_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog course_label cannot be blank")]
    BlankCourseLabel,
}

/// Options offered on the course branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct CourseOptions {
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Category-specific additions to the generic service reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Extras {
    #[serde(default)]
    pub yes: Vec<String>,
    #[serde(default)]
    pub no: Vec<String>,
}

/// Options offered on the service branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ServiceOptions {
    #[serde(default)]
    pub returning_reasons: Vec<String>,
    #[serde(default)]
    pub new_client_reasons: Vec<String>,
    #[serde(default)]
    pub unsure_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, Extras>,
}

/// Read-only lookup tables that drive the step-2 and step-3 option sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptionCatalog {
    pub course_label: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub courses: CourseOptions,
    #[serde(default)]
    pub services: ServiceOptions,
}

impl OptionCatalog {
    /// The catalog bundled with the crate.
    pub fn studio() -> Result<Self, CatalogError> {
        Self::from_json(STUDIO_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: OptionCatalog = serde_json::from_str(raw)?;
        if catalog.course_label.trim().is_empty() {
            return Err(CatalogError::BlankCourseLabel);
        }
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Maps a step-1 label onto its branch; blank labels select nothing.
    pub fn interest(&self, label: &str) -> Option<Interest> {
        let label = label.trim();
        if label.is_empty() {
            None
        } else if label == self.course_label {
            Some(Interest::Course)
        } else {
            Some(Interest::Service(label.to_string()))
        }
    }

    /// Inverse of [`OptionCatalog::interest`].
    pub fn interest_label<'a>(&'a self, interest: &'a Interest) -> &'a str {
        match interest {
            Interest::Course => &self.course_label,
            Interest::Service(category) => category,
        }
    }

    pub fn experience_options(&self, interest: &Interest) -> Vec<String> {
        match interest {
            Interest::Course => self.courses.levels.clone(),
            Interest::Service(_) => ServiceHistory::labels(),
        }
    }

    pub fn detail_options(&self, interest: &Interest, experience: &str) -> Vec<String> {
        match interest {
            Interest::Course => self.courses.goals.clone(),
            Interest::Service(category) => {
                let extras = self.extras(category);
                match ServiceHistory::from_label(experience) {
                    Some(ServiceHistory::Returning) => {
                        concat(&self.services.returning_reasons, &extras.yes)
                    }
                    Some(ServiceHistory::FirstTime) => {
                        concat(&self.services.new_client_reasons, &extras.no)
                    }
                    Some(ServiceHistory::Unsure) | None => self.services.unsure_areas.clone(),
                }
            }
        }
    }

    /// Extras for a category; unknown categories have none.
    pub fn extras(&self, category: &str) -> Extras {
        self.services
            .extras
            .get(category)
            .cloned()
            .unwrap_or_default()
    }
}

fn concat(generic: &[String], extra: &[String]) -> Vec<String> {
    generic.iter().chain(extra.iter()).cloned().collect()
}
