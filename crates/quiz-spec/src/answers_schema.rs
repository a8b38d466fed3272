use serde_json::Value;

use crate::answers::AnswersDocument;

/// JSON schema describing the flat answers document.
pub fn generate() -> Value {
    schemars::schema_for!(AnswersDocument).to_value()
}
