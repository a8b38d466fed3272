use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Stand-in for an empty answer inside the composed message.
pub const EMPTY_PLACEHOLDER: &str = "—";

const MESSAGE_TEMPLATE: &str = "New lead from Quiz\n\n\
Interest: {{interest}}\n\
Experience: {{experience}}\n\
Details: {{details}}\n\
Phone: {{phone}}\n\
Page: {{page}}";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to render lead message: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Snapshot of the answers handed to the relay for one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    pub interest: String,
    pub experience: Option<String>,
    pub details: Vec<String>,
    pub phone: String,
    pub page: String,
    pub botcheck: String,
}

impl SubmissionRequest {
    /// Details joined with `", "`, or the placeholder when none were picked.
    pub fn details_text(&self) -> String {
        if self.details.is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            self.details.join(", ")
        }
    }

    /// Raw experience value for the dedicated form field.
    pub fn experience_field(&self) -> &str {
        self.experience.as_deref().unwrap_or_default()
    }

    /// Free-text body listing every answer plus the originating page.
    pub fn message(&self) -> Result<String, TemplateError> {
        let mut engine = Handlebars::new();
        engine.register_escape_fn(handlebars::no_escape);
        let data = json!({
            "interest": self.interest,
            "experience": self.experience.as_deref().unwrap_or(EMPTY_PLACEHOLDER),
            "details": self.details_text(),
            "phone": self.phone,
            "page": self.page,
        });
        Ok(engine.render_template(MESSAGE_TEMPLATE, &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(details: Vec<&str>) -> SubmissionRequest {
        SubmissionRequest {
            interest: "Lips".into(),
            experience: Some("No".into()),
            details: details.into_iter().map(String::from).collect(),
            phone: "+1 757 407 9859".into(),
            page: "https://studio.example/#quiz".into(),
            botcheck: String::new(),
        }
    }

    #[test]
    fn message_lists_every_answer() {
        let message = request(vec!["Soft baby tint", "Even out contour"])
            .message()
            .expect("render");
        assert_eq!(
            message,
            "New lead from Quiz\n\n\
             Interest: Lips\n\
             Experience: No\n\
             Details: Soft baby tint, Even out contour\n\
             Phone: +1 757 407 9859\n\
             Page: https://studio.example/#quiz"
        );
    }

    #[test]
    fn empty_answers_use_placeholder() {
        let mut request = request(vec![]);
        request.experience = None;
        assert_eq!(request.details_text(), EMPTY_PLACEHOLDER);
        assert_eq!(request.experience_field(), "");
        let message = request.message().expect("render");
        assert!(message.contains("Experience: —"));
        assert!(message.contains("Details: —"));
    }

    #[test]
    fn message_does_not_html_escape() {
        let mut request = request(vec!["Improve retention & healing"]);
        request.interest = "Courses".into();
        let message = request.message().expect("render");
        assert!(message.contains("Improve retention & healing"));
    }
}
