pub mod failure;
pub mod record;

pub use failure::{CommandFailure, FailureKind, failure_kind};
pub use record::Record;
