use std::fmt;

use thiserror::Error;

use crate::answers::AnswerRecord;
use crate::phone::is_valid_phone;
use crate::spec::catalog::OptionCatalog;
use crate::submission::SubmissionRequest;

pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const SPAM_MESSAGE: &str = "Spam detected.";
pub const SEND_FAILED_MESSAGE: &str = "Could not send. Try again or DM us on Instagram.";

/// The four quiz steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Interest,
    Experience,
    Details,
    Contact,
}

impl Step {
    pub const TOTAL: u8 = 4;
    pub const ALL: [Step; 4] = [Step::Interest, Step::Experience, Step::Details, Step::Contact];

    /// 1-based position shown to the user.
    pub fn ordinal(&self) -> u8 {
        match self {
            Step::Interest => 1,
            Step::Experience => 2,
            Step::Details => 3,
            Step::Contact => 4,
        }
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Interest => Some(Step::Experience),
            Step::Experience => Some(Step::Details),
            Step::Details => Some(Step::Contact),
            Step::Contact => None,
        }
    }

    pub fn prev(&self) -> Option<Step> {
        match self {
            Step::Interest => None,
            Step::Experience => Some(Step::Interest),
            Step::Details => Some(Step::Experience),
            Step::Contact => Some(Step::Details),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

/// Where the single submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    InFlight,
    Sent,
}

/// Caption of the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitLabel {
    #[default]
    Send,
    Sending,
    Sent,
    Update,
}

impl SubmitLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitLabel::Send => "Send",
            SubmitLabel::Sending => "Sending…",
            SubmitLabel::Sent => "Sent ✓",
            SubmitLabel::Update => "Update",
        }
    }
}

/// User-initiated events accepted by [`QuizMachine::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    SelectInterest(String),
    SelectExperience(String),
    ToggleDetail(String),
    Advance,
    Retreat,
    EditAfterSubmit,
}

impl QuizEvent {
    fn name(&self) -> &'static str {
        match self {
            QuizEvent::SelectInterest(_) => "select-interest",
            QuizEvent::SelectExperience(_) => "select-experience",
            QuizEvent::ToggleDetail(_) => "toggle-detail",
            QuizEvent::Advance => "advance",
            QuizEvent::Retreat => "retreat",
            QuizEvent::EditAfterSubmit => "edit",
        }
    }

    fn changes_answers(&self) -> bool {
        matches!(
            self,
            QuizEvent::SelectInterest(_) | QuizEvent::SelectExperience(_) | QuizEvent::ToggleDetail(_)
        )
    }
}

/// What an accepted event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// An answer changed; downstream option sets were rebuilt.
    Answered { step: Step },
    /// A detail was toggled on or off.
    Toggled { detail: String, selected: bool },
    Moved { from: Step, to: Step },
    /// The submitted quiz was reopened for editing at the contact step.
    Reopened,
}

/// Outcome reported back once the relay call resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed,
}

/// Page-side context gathered at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitContext {
    /// Address of the page hosting the quiz.
    pub page: String,
    /// Hidden anti-spam field; humans leave it empty.
    pub honeypot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("{event} is not available at step {step}")]
    WrongStep { event: &'static str, step: Step },
    #[error("step {0} is not complete")]
    StepIncomplete(Step),
    #[error("already at the first step")]
    AtFirstStep,
    #[error("already at the last step")]
    AtLastStep,
    #[error("interest cannot be blank")]
    BlankInterest,
    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),
    #[error("a submission is already in flight")]
    Busy,
    #[error("answers are locked after submission; edit to reopen")]
    Locked,
    #[error("no submission is in flight")]
    NotInFlight,
    #[error("nothing has been submitted yet")]
    NotSubmitted,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("honeypot field was filled in")]
    Honeypot,
}

/// Contact-step form state surfaced to renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub phone_input: String,
    pub phone_invalid: bool,
    pub error: Option<String>,
    pub submit_label: SubmitLabel,
}

/// Branching four-step lead quiz.
///
/// Holds the answer record, the current step and the submission phase; every
/// mutation goes through [`QuizMachine::apply`], [`QuizMachine::begin_submit`] or
/// [`QuizMachine::finish_submit`]. Rejected events leave the machine untouched.
#[derive(Debug, Clone)]
pub struct QuizMachine {
    catalog: OptionCatalog,
    record: AnswerRecord,
    step: Step,
    phase: SubmissionPhase,
    experience_options: Vec<String>,
    detail_options: Vec<String>,
    form: ContactForm,
}

impl QuizMachine {
    pub fn new(catalog: OptionCatalog) -> Self {
        Self {
            catalog,
            record: AnswerRecord::new(),
            step: Step::Interest,
            phase: SubmissionPhase::Idle,
            experience_options: Vec::new(),
            detail_options: Vec::new(),
            form: ContactForm::default(),
        }
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == SubmissionPhase::InFlight
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn interest_options(&self) -> &[String] {
        &self.catalog.interests
    }

    pub fn experience_options(&self) -> &[String] {
        &self.experience_options
    }

    pub fn detail_options(&self) -> &[String] {
        &self.detail_options
    }

    pub fn step_number(&self) -> u8 {
        self.step.ordinal()
    }

    /// Fraction of the quiz reached, `step / 4`.
    pub fn progress(&self) -> f64 {
        f64::from(self.step.ordinal()) / f64::from(Step::TOTAL)
    }

    pub fn is_step_complete(&self, step: Step) -> bool {
        match step {
            Step::Interest => self.record.interest().is_some(),
            Step::Experience => self.record.experience().is_some(),
            Step::Details => !self.record.details().is_empty(),
            Step::Contact => true,
        }
    }

    pub fn can_advance(&self) -> bool {
        !self.is_busy() && !self.step.is_terminal() && self.is_step_complete(self.step)
    }

    pub fn can_retreat(&self) -> bool {
        !self.is_busy() && self.step.prev().is_some()
    }

    pub fn apply(&mut self, event: QuizEvent) -> Result<Transition, QuizError> {
        if self.is_busy() {
            return Err(QuizError::Busy);
        }
        if self.phase == SubmissionPhase::Sent && event.changes_answers() {
            return Err(QuizError::Locked);
        }

        match (self.step, event) {
            (Step::Interest, QuizEvent::SelectInterest(label)) => {
                let interest = self
                    .catalog
                    .interest(&label)
                    .ok_or(QuizError::BlankInterest)?;
                self.record.set_interest(interest);
                self.rebuild_experience_options();
                self.rebuild_detail_options();
                Ok(Transition::Answered {
                    step: Step::Interest,
                })
            }
            (Step::Experience, QuizEvent::SelectExperience(label)) => {
                if !self.experience_options.contains(&label) {
                    return Err(QuizError::UnknownOption(label));
                }
                self.record.set_experience(label);
                self.rebuild_detail_options();
                Ok(Transition::Answered {
                    step: Step::Experience,
                })
            }
            (Step::Details, QuizEvent::ToggleDetail(label)) => {
                if !self.detail_options.contains(&label) {
                    return Err(QuizError::UnknownOption(label));
                }
                let selected = self.record.toggle_detail(&label);
                Ok(Transition::Toggled {
                    detail: label,
                    selected,
                })
            }
            (step, QuizEvent::Advance) => {
                let to = step.next().ok_or(QuizError::AtLastStep)?;
                if !self.is_step_complete(step) {
                    return Err(QuizError::StepIncomplete(step));
                }
                self.step = to;
                Ok(Transition::Moved { from: step, to })
            }
            (step, QuizEvent::Retreat) => {
                let to = step.prev().ok_or(QuizError::AtFirstStep)?;
                self.step = to;
                Ok(Transition::Moved { from: step, to })
            }
            (_, QuizEvent::EditAfterSubmit) => {
                if self.phase != SubmissionPhase::Sent {
                    return Err(QuizError::NotSubmitted);
                }
                self.phase = SubmissionPhase::Idle;
                self.step = Step::Contact;
                self.form.error = None;
                self.form.submit_label = SubmitLabel::Update;
                Ok(Transition::Reopened)
            }
            (step, event) => Err(QuizError::WrongStep {
                event: event.name(),
                step,
            }),
        }
    }

    /// Validates the contact step and, when it passes, marks the submission in flight and
    /// returns the snapshot to deliver. Failures leave an inline message on the form.
    pub fn begin_submit(
        &mut self,
        phone: &str,
        context: &SubmitContext,
    ) -> Result<SubmissionRequest, QuizError> {
        match self.phase {
            SubmissionPhase::InFlight => return Err(QuizError::Busy),
            SubmissionPhase::Sent => return Err(QuizError::Locked),
            SubmissionPhase::Idle => {}
        }
        if self.step != Step::Contact {
            return Err(QuizError::WrongStep {
                event: "submit",
                step: self.step,
            });
        }

        let phone = phone.trim();
        self.form.phone_input = phone.to_string();
        if !is_valid_phone(phone) {
            self.form.phone_invalid = true;
            self.form.error = Some(INVALID_PHONE_MESSAGE.to_string());
            return Err(QuizError::InvalidPhone);
        }
        self.form.phone_invalid = false;
        self.form.error = None;
        self.record.set_phone(phone);

        if !context.honeypot.is_empty() {
            self.form.error = Some(SPAM_MESSAGE.to_string());
            return Err(QuizError::Honeypot);
        }

        let request = SubmissionRequest {
            interest: self
                .record
                .interest()
                .map(|interest| self.catalog.interest_label(interest).to_string())
                .unwrap_or_default(),
            experience: self.record.experience().map(str::to_string),
            details: self.record.details().to_vec(),
            phone: phone.to_string(),
            page: context.page.clone(),
            botcheck: context.honeypot.clone(),
        };
        self.phase = SubmissionPhase::InFlight;
        self.form.submit_label = SubmitLabel::Sending;
        Ok(request)
    }

    /// Resolves the in-flight submission.
    pub fn finish_submit(&mut self, delivery: Delivery) -> Result<SubmissionPhase, QuizError> {
        if self.phase != SubmissionPhase::InFlight {
            return Err(QuizError::NotInFlight);
        }
        match delivery {
            Delivery::Delivered => {
                self.phase = SubmissionPhase::Sent;
                self.form.submit_label = SubmitLabel::Sent;
                self.form.error = None;
            }
            Delivery::Failed => {
                self.phase = SubmissionPhase::Idle;
                self.form.submit_label = SubmitLabel::Send;
                self.form.error = Some(SEND_FAILED_MESSAGE.to_string());
            }
        }
        Ok(self.phase)
    }

    /// Drops an in-flight submission whose outcome will never arrive, leaving the form
    /// resubmittable with the send-failed message. Returns whether anything was in flight.
    pub fn abort_submit(&mut self) -> bool {
        self.finish_submit(Delivery::Failed).is_ok()
    }

    fn rebuild_experience_options(&mut self) {
        self.experience_options = match self.record.interest() {
            Some(interest) => self.catalog.experience_options(interest),
            None => Vec::new(),
        };
    }

    fn rebuild_detail_options(&mut self) {
        self.detail_options = match (self.record.interest(), self.record.experience()) {
            (Some(interest), Some(experience)) => {
                self.catalog.detail_options(interest, experience)
            }
            _ => Vec::new(),
        };
    }
}
