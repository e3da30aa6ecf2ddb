//! Services layer - application stores and outbound integrations
//!
//! Stores hold observable state and expose async operations that follow
//! the busy/error lifecycle of [`store::Store`]. The remaining services talk
//! to the outside world: report submission, news search and email.

pub mod auth;
pub mod email;
pub mod emergency;
pub mod guidelines;
pub mod news;
pub mod password;
pub mod profile;
pub mod store;
pub mod submitter;

pub use auth::{AuthError, AuthState, AuthStore, AuthVariant, AUTH_STORAGE_KEY};
pub use email::{render_report_email, Mailer, OutgoingEmail, ReportMailer, SmtpMailer};
pub use emergency::{EmergencyLatency, EmergencyState, EmergencyStore, ReportError};
pub use guidelines::{search_guidelines, GuidelinesLatency, GuidelinesState, GuidelinesStore};
pub use news::{NewsFeed, NewsState};
pub use password::{hash_password, verify_password};
pub use profile::{validate_password_change, ProfileError, ProfileState, ProfileStore};
pub use store::{Latency, OperationStatus, Store};
pub use submitter::{create_submitter, HttpReportSubmitter, LocalSubmitter, ReportSubmitter, SubmitError};
