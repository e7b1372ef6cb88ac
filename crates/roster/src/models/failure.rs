use std::fmt::{Display, Formatter};

/// Fatal failure categories. Per-line parse failures are not part of this set;
/// they are collected by the ingest loop instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    Connection,
    Io,
    Storage,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Connection => "connection",
            Self::Io => "io",
            Self::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandFailure {
    kind: FailureKind,
    message: String,
}

impl CommandFailure {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Configuration, message)
    }

    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Connection, message)
    }

    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Io, message)
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Storage, message)
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

impl Display for CommandFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failure: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for CommandFailure {}

/// Finds the fatal failure kind anywhere in an error chain.
#[must_use]
pub fn failure_kind(error: &anyhow::Error) -> Option<FailureKind> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CommandFailure>())
        .map(CommandFailure::kind)
}
