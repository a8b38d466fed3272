use serde_json::json;

use quiz_spec::{AnswerRecord, AnswersDocument, OptionCatalog, answers_schema, validate};

fn catalog() -> OptionCatalog {
    OptionCatalog::studio().expect("studio catalog")
}

fn document(value: serde_json::Value) -> AnswersDocument {
    serde_json::from_value(value).expect("deserialize answers")
}

#[test]
fn complete_course_answers_are_valid() {
    let answers = document(json!({
        "interest": "Courses",
        "experience": "Beginner (no procedures yet)",
        "details": ["Start taking paying clients", "Master lip blush technique"],
        "phone": "7574079859"
    }));
    let result = validate(&catalog(), &answers);
    assert!(result.valid, "{:?}", result);
}

#[test]
fn validation_reports_missing() {
    let result = validate(&catalog(), &document(json!({})));
    assert!(!result.valid);
    assert_eq!(
        result.missing_required,
        vec!["interest", "details", "phone"]
    );

    let result = validate(&catalog(), &document(json!({ "interest": "Brows" })));
    assert_eq!(
        result.missing_required,
        vec!["experience", "details", "phone"]
    );
}

#[test]
fn options_are_checked_against_the_selected_branch() {
    let answers = document(json!({
        "interest": "Lips",
        "experience": "No",
        "details": ["Soft baby tint", "Cover microblading"],
        "phone": "+1 757 407 9859"
    }));
    let result = validate(&catalog(), &answers);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path.as_deref(), Some("/details/1"));
    assert_eq!(result.errors[0].code.as_deref(), Some("enum_mismatch"));
}

#[test]
fn duplicate_details_and_bad_phone_are_reported() {
    let answers = document(json!({
        "interest": "Brows",
        "experience": "Yes",
        "details": ["Old microblading", "Old microblading"],
        "phone": "123"
    }));
    let result = validate(&catalog(), &answers);
    let codes: Vec<_> = result
        .errors
        .iter()
        .filter_map(|error| error.code.as_deref())
        .collect();
    assert_eq!(codes, vec!["duplicate", "pattern_mismatch"]);
}

#[test]
fn experience_without_interest_is_a_dependency_error() {
    let answers = document(json!({ "experience": "Yes", "phone": "7574079859" }));
    let result = validate(&catalog(), &answers);
    assert!(
        result
            .errors
            .iter()
            .any(|error| error.code.as_deref() == Some("dependency"))
    );
}

#[test]
fn unlisted_interest_is_flagged() {
    let answers = document(json!({
        "interest": "Tattoo",
        "experience": "Yes",
        "details": ["Old microblading"],
        "phone": "7574079859"
    }));
    let result = validate(&catalog(), &answers);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].question_id.as_deref(), Some("interest"));
}

#[test]
fn padded_interest_label_matches_catalog() {
    let answers = document(json!({
        "interest": " Lips ",
        "experience": "No",
        "details": ["Soft baby tint"],
        "phone": "7574079859"
    }));
    let result = validate(&catalog(), &answers);
    assert!(result.valid, "{:?}", result);
}

#[test]
fn record_round_trips_through_document_respecting_dependencies() {
    let catalog = catalog();
    let answers = document(json!({
        "details": ["Old microblading"],
        "phone": "7574079859"
    }));
    let record = AnswerRecord::from_document(&catalog, &answers);
    assert!(record.details().is_empty());
    assert_eq!(record.phone(), Some("7574079859"));

    let answers = document(json!({
        "interest": "Courses",
        "experience": "Working artist (10+ clients)",
        "details": ["Communications & marketing"]
    }));
    let record = AnswerRecord::from_document(&catalog, &answers);
    assert_eq!(record.to_document(&catalog), answers);
}

#[test]
fn schema_lists_answer_fields() {
    let schema = answers_schema();
    let props = schema
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("properties");
    for field in ["interest", "experience", "details", "phone"] {
        assert!(props.contains_key(field), "missing {}", field);
    }
}
