#![allow(missing_docs)]

pub mod answers;
pub mod answers_schema;
pub mod machine;
pub mod phone;
pub mod render;
pub mod spec;
pub mod submission;
pub mod validate;

pub use answers::{AnswerRecord, AnswersDocument, ValidationError, ValidationResult};
pub use answers_schema::generate as answers_schema;
pub use machine::{
    ContactForm, Delivery, QuizError, QuizEvent, QuizMachine, Step, SubmissionPhase,
    SubmitContext, SubmitLabel, Transition,
};
pub use phone::is_valid_phone;
pub use render::{QuizView, build_view, render_json_ui, render_text};
pub use spec::{CatalogError, Interest, OptionCatalog, ServiceHistory};
pub use submission::{SubmissionRequest, TemplateError};
pub use validate::validate;
