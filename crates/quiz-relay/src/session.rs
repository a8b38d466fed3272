use quiz_spec::{
    Delivery, QuizError, QuizEvent, QuizMachine, QuizView, SubmitContext, TemplateError,
    Transition, build_view,
};
use quiz_spec::machine::SEND_FAILED_MESSAGE;
use thiserror::Error;

use crate::config::RelayConfig;
use crate::form::LeadForm;
use crate::transport::LeadRelay;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// How a submit attempt ended, with the inline message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// Transport failure; the submit control is usable again.
    Failed(String),
    /// Blocked before any request went out (bad phone, honeypot).
    Rejected(String),
}

/// One user's quiz run, wired to a relay.
pub struct QuizSession<R> {
    machine: QuizMachine,
    relay: R,
    config: RelayConfig,
    page: String,
}

impl<R: LeadRelay> QuizSession<R> {
    pub fn new(machine: QuizMachine, relay: R, config: RelayConfig, page: impl Into<String>) -> Self {
        Self {
            machine,
            relay,
            config,
            page: page.into(),
        }
    }

    pub fn machine(&self) -> &QuizMachine {
        &self.machine
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn view(&self) -> QuizView {
        build_view(&self.machine)
    }

    pub fn apply(&mut self, event: QuizEvent) -> Result<Transition, QuizError> {
        self.machine.apply(event)
    }

    /// Validates, sends and resolves one submission. Holding `&mut self` across the
    /// relay call keeps a second submit from starting while one is pending.
    pub async fn submit(
        &mut self,
        phone: &str,
        honeypot: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        let context = SubmitContext {
            page: self.page.clone(),
            honeypot: honeypot.to_string(),
        };

        let request = match self.machine.begin_submit(phone, &context) {
            Ok(request) => request,
            Err(err @ (QuizError::InvalidPhone | QuizError::Honeypot)) => {
                tracing::debug!("submission rejected: {}", err);
                return Ok(SubmitOutcome::Rejected(self.inline_error(&err.to_string())));
            }
            Err(err) => return Err(err.into()),
        };

        let mut pending = PendingSubmit {
            machine: &mut self.machine,
        };
        let form = match LeadForm::build(&request, &self.config) {
            Ok(form) => form,
            Err(err) => {
                pending.machine.finish_submit(Delivery::Failed)?;
                return Err(err.into());
            }
        };

        let delivered = self.relay.deliver(&form).await;
        let outcome = match delivered {
            Ok(()) => {
                pending.machine.finish_submit(Delivery::Delivered)?;
                None
            }
            Err(err) => {
                tracing::warn!("lead submission failed: {}", err);
                pending.machine.finish_submit(Delivery::Failed)?;
                Some(SEND_FAILED_MESSAGE)
            }
        };
        drop(pending);

        Ok(match outcome {
            None => SubmitOutcome::Sent,
            Some(fallback) => SubmitOutcome::Failed(self.inline_error(fallback)),
        })
    }

    fn inline_error(&self, fallback: &str) -> String {
        self.machine
            .form()
            .error
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Held across the relay call; if the submit future is dropped first, the machine
/// leaves `InFlight` as a failed delivery.
struct PendingSubmit<'a> {
    machine: &'a mut QuizMachine,
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if self.machine.abort_submit() {
            tracing::warn!("lead submission abandoned before the relay answered");
        }
    }
}
