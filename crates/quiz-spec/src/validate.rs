use std::collections::BTreeSet;

use crate::answers::{AnswersDocument, ValidationError, ValidationResult};
use crate::phone::is_valid_phone;
use crate::spec::catalog::OptionCatalog;

/// Checks a full answers document against the options the catalog offers along the
/// branch selected by its upstream answers.
pub fn validate(catalog: &OptionCatalog, answers: &AnswersDocument) -> ValidationResult {
    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    let interest = match answers.interest.as_deref() {
        None => {
            missing_required.push("interest".to_string());
            None
        }
        Some(label) => match catalog.interest(label) {
            None => {
                missing_required.push("interest".to_string());
                None
            }
            Some(interest) => {
                let label = label.trim();
                if !catalog.interests.is_empty() && !catalog.interests.iter().any(|i| i == label) {
                    errors.push(base_error(
                        "interest",
                        "/interest",
                        "interest is not one of the offered categories",
                        "enum_mismatch",
                    ));
                }
                Some(interest)
            }
        },
    };

    match (&interest, answers.experience.as_deref()) {
        (None, Some(_)) => errors.push(base_error(
            "experience",
            "/experience",
            "experience requires an interest",
            "dependency",
        )),
        (Some(_), None) => missing_required.push("experience".to_string()),
        (Some(interest), Some(experience)) => {
            if !catalog
                .experience_options(interest)
                .iter()
                .any(|option| option == experience)
            {
                errors.push(base_error(
                    "experience",
                    "/experience",
                    "invalid experience option",
                    "enum_mismatch",
                ));
            }
        }
        (None, None) => {}
    }

    let detail_options = match (&interest, answers.experience.as_deref()) {
        (Some(interest), Some(experience)) => Some(catalog.detail_options(interest, experience)),
        _ => None,
    };

    if answers.details.is_empty() {
        missing_required.push("details".to_string());
    } else {
        match &detail_options {
            None => errors.push(base_error(
                "details",
                "/details",
                "details require an experience answer",
                "dependency",
            )),
            Some(options) => {
                let mut seen = BTreeSet::new();
                for (index, detail) in answers.details.iter().enumerate() {
                    let path = format!("/details/{}", index);
                    if !seen.insert(detail.as_str()) {
                        errors.push(base_error(
                            "details",
                            &path,
                            "detail selected more than once",
                            "duplicate",
                        ));
                    } else if !options.iter().any(|option| option == detail) {
                        errors.push(base_error(
                            "details",
                            &path,
                            "invalid detail option",
                            "enum_mismatch",
                        ));
                    }
                }
            }
        }
    }

    match answers.phone.as_deref() {
        None => missing_required.push("phone".to_string()),
        Some(phone) if !is_valid_phone(phone) => errors.push(base_error(
            "phone",
            "/phone",
            "value does not look like a phone number",
            "pattern_mismatch",
        )),
        Some(_) => {}
    }

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty(),
        errors,
        missing_required,
    }
}

fn base_error(question_id: &str, path: &str, message: &str, code: &str) -> ValidationError {
    ValidationError {
        question_id: Some(question_id.into()),
        path: Some(path.into()),
        message: message.into(),
        code: Some(code.into()),
    }
}
