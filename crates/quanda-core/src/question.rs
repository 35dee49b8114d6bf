//! Question and group records.
//!
//! A question belongs to exactly one group and one authoring user. Its id is
//! an integer allocated from the owning group's counter; ids are strictly
//! increasing within a group and never reused, even after deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Group ───────────────────────────────────────────────────────────────────

/// A chat group's stored metadata. Groups own questions and the counter the
/// next question id is allocated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub groupid: String,
  /// The next id to hand out; starts at 0, incremented exactly once per
  /// successful question creation.
  pub id_next: i64,
}

// ─── Question ────────────────────────────────────────────────────────────────

/// A persisted question. `id` is half of the document key (the other half is
/// the owning group); `text`, `userid`, and `created_time` never change after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id:           i64,
  pub text:         String,
  pub solved:       bool,
  pub userid:       String,
  pub groupid:      String,
  pub created_time: DateTime<Utc>,
  /// Set exactly once, on the unsolved→solved transition.
  pub solved_time:  Option<DateTime<Utc>>,
}

impl Question {
  /// Mark this question solved, stamping `solved_time` with `at`.
  ///
  /// Idempotent: a question that is already solved keeps its original
  /// `solved_time`.
  pub fn mark_solved(&mut self, at: DateTime<Utc>) {
    if self.solved {
      return;
    }
    self.solved = true;
    self.solved_time = Some(at);
  }
}

// ─── NewQuestion ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::QuestionStore::save`] — a question that has not
/// been persisted yet, so it carries no id.
#[derive(Debug, Clone)]
pub struct NewQuestion {
  pub text:         String,
  pub userid:       String,
  pub groupid:      String,
  /// Stamped with the store's current UTC time when `None`.
  pub created_time: Option<DateTime<Utc>>,
}

impl NewQuestion {
  pub fn new(
    text: impl Into<String>,
    userid: impl Into<String>,
    groupid: impl Into<String>,
  ) -> Self {
    Self {
      text:         text.into(),
      userid:       userid.into(),
      groupid:      groupid.into(),
      created_time: None,
    }
  }
}
