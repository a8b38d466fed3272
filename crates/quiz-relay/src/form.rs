use quiz_spec::{SubmissionRequest, TemplateError};
use reqwest::multipart::Form;

use crate::config::RelayConfig;

pub const REDACTED: &str = "<redacted>";

/// Ordered text fields posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadForm {
    fields: Vec<(&'static str, String)>,
}

impl LeadForm {
    pub fn build(request: &SubmissionRequest, config: &RelayConfig) -> Result<Self, TemplateError> {
        let fields = vec![
            ("access_key", config.access_key.clone()),
            ("subject", config.subject.clone()),
            ("from_name", config.from_name.clone()),
            ("message", request.message()?),
            ("interest", request.interest.clone()),
            ("experience", request.experience_field().to_string()),
            ("details", request.details_text()),
            ("phone", request.phone.clone()),
            ("page", request.page.clone()),
            ("botcheck", request.botcheck.clone()),
        ];
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Fields safe to log: the access key and phone are masked, including inside the message.
    pub fn redacted_fields(&self) -> Vec<(&'static str, String)> {
        let phone = self.get("phone").filter(|phone| !phone.is_empty());
        self.fields
            .iter()
            .map(|(name, value)| {
                let value = match *name {
                    "access_key" | "phone" => REDACTED.to_string(),
                    _ => match phone {
                        Some(phone) => value.replace(phone, REDACTED),
                        None => value.clone(),
                    },
                };
                (*name, value)
            })
            .collect()
    }

    pub fn to_multipart(&self) -> Form {
        self.fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(*name, value.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_form() -> LeadForm {
        let request = SubmissionRequest {
            interest: "Brows".into(),
            experience: Some("Yes".into()),
            details: vec!["Old microblading".into()],
            phone: "+1 757 407 9859".into(),
            page: "https://studio.example/".into(),
            botcheck: String::new(),
        };
        let config = RelayConfig::new("secret-key").expect("config");
        LeadForm::build(&request, &config).expect("form")
    }

    #[test]
    fn redacted_fields_hide_key_and_phone() {
        let form = lead_form();
        let redacted = form.redacted_fields();

        assert_eq!(redacted.len(), form.fields().len());
        for (name, value) in &redacted {
            assert!(!value.contains("secret-key"), "{name} leaks the key");
            assert!(!value.contains("757 407 9859"), "{name} leaks the phone");
        }
        let get = |field: &str| {
            redacted
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(get("phone").as_deref(), Some(REDACTED));
        assert!(get("message").expect("message").contains("Phone: <redacted>"));
        assert_eq!(get("details").as_deref(), Some("Old microblading"));
        assert_eq!(form.get("phone"), Some("+1 757 407 9859"));
    }
}
