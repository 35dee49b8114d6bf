//! Error types for `quanda-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("group {0:?} not found")]
  GroupNotFound(String),

  #[error("question [{id}] not found in group {groupid:?}")]
  QuestionNotFound { groupid: String, id: i64 },

  #[error("question text must not be empty")]
  EmptyText,

  #[error("store unavailable: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure that the caller cannot act on.
  pub fn upstream(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Upstream(Box::new(e))
  }

  /// True for either flavour of missing record.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::GroupNotFound(_) | Self::QuestionNotFound { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
