pub mod config;
pub mod form;
pub mod session;
pub mod transport;

pub use config::{ConfigError, RelayConfig};
pub use form::LeadForm;
pub use session::{QuizSession, SessionError, SubmitOutcome};
pub use transport::{DryRunRelay, HttpRelay, LeadRelay, TransportError};
