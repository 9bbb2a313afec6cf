mod cascade;
mod form;
mod record;

pub use cascade::{FetchTicket, LevelStatus};
pub use form::{FormState, SubmissionStatus};
pub use record::AttendanceRecord;
