use quiz_spec::render::StepPanel;
use quiz_spec::{AnswersDocument, QuizView, render_json_ui, render_text};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: step prompts only.
    Clean,
    /// Verbose output: navigation state and answer JSON on completion.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Output flavour for each step.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Frontend {
    Text,
    Json,
}

/// Prints the quiz view and feedback between inputs.
pub struct WizardPresenter {
    verbosity: Verbosity,
    frontend: Frontend,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, frontend: Frontend) -> Self {
        Self {
            verbosity,
            frontend,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self) {
        if self.header_printed {
            return;
        }
        println!("Lead quiz");
        println!("Pick options by number or label; type next, back, edit or exit.");
        self.header_printed = true;
    }

    pub fn show_view(&self, view: &QuizView) {
        match self.frontend {
            Frontend::Text => println!("{}", render_text(view)),
            Frontend::Json => println!("{}", render_json_ui(view)),
        }
        if self.verbosity.is_verbose() {
            println!(
                "Nav: prev_disabled={} next_hidden={} next_disabled={}",
                view.nav.prev_disabled, view.nav.next_hidden, view.nav.next_disabled
            );
        }
    }

    pub fn show_rejection(&self, message: &str) {
        eprintln!("Not accepted: {}", message);
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_completion(&self, answers: &AnswersDocument) {
        println!("Done ✅");
        if self.verbosity.is_verbose() {
            match serde_json::to_string_pretty(answers) {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => eprintln!("Failed to serialize answers to JSON: {}", err),
            }
        }
    }
}

/// Error produced when parsing a choice from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Resolves a 1-based index or a case-insensitive label against the panel's chips.
pub fn parse_choice(panel: &StepPanel, raw: &str) -> Result<String, AnswerParseError> {
    let labels = panel
        .chips
        .iter()
        .map(|chip| chip.label.as_str())
        .collect::<Vec<_>>();
    if labels.is_empty() {
        return Err(AnswerParseError::new(
            "no options are available for this step",
            None,
        ));
    }

    if let Ok(index) = raw.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|position| labels.get(position))
            .map(|label| label.to_string())
            .ok_or_else(|| {
                AnswerParseError::new(
                    format!("choose a number between 1 and {}", labels.len()),
                    None,
                )
            });
    }

    labels
        .iter()
        .find(|label| label.eq_ignore_ascii_case(raw))
        .map(|label| label.to_string())
        .ok_or_else(|| {
            AnswerParseError::new(
                format!("'{}' is not one of the options", raw),
                Some(labels.join(", ")),
            )
        })
}
