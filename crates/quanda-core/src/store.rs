//! The `QuestionStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `quanda-store-sqlite`).
//! Higher layers (`quanda-bot`, `quanda-line`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Errors use the tagged [`crate::Error`] taxonomy directly so callers can
//! pattern-match on `GroupNotFound` / `QuestionNotFound`; backends fold their
//! internal failures into [`crate::Error::Upstream`].

use std::future::Future;

use crate::{
  Result,
  question::{Group, NewQuestion, Question},
};

/// Abstraction over a quanda question store backend.
///
/// All durable state lives behind this trait: group rows with their id
/// counters, and question rows keyed by `(groupid, id)`. Reads never create
/// state; only [`QuestionStore::save`] provisions a group lazily.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait QuestionStore: Send + Sync {
  // ── Groups and id allocation ──────────────────────────────────────────

  /// Fetch the group row, creating it with `id_next = 0` if absent.
  /// Idempotent: an existing group is returned unchanged.
  fn ensure_group<'a>(
    &'a self,
    groupid: &'a str,
  ) -> impl Future<Output = Result<Group>> + Send + 'a;

  /// Fetch the group row; fails with [`crate::Error::GroupNotFound`] if it
  /// does not exist. Read and delete paths use this form so typos or stale
  /// references never silently fabricate a group.
  fn get_group<'a>(
    &'a self,
    groupid: &'a str,
  ) -> impl Future<Output = Result<Group>> + Send + 'a;

  /// Return the group's current counter value and increment the stored
  /// counter by one, atomically with respect to concurrent callers.
  /// Successive calls yield 0, 1, 2, … with no duplicates and no reuse.
  fn next_id<'a>(
    &'a self,
    groupid: &'a str,
  ) -> impl Future<Output = Result<i64>> + Send + 'a;

  // ── Questions ─────────────────────────────────────────────────────────

  /// Persist a new question: provision the group if needed, allocate the
  /// next id, and insert — all atomically. Returns the persisted record
  /// with its assigned id and creation timestamp.
  fn save(
    &self,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Question>> + Send + '_;

  /// Fetch one question. Fails with a not-found error if either the group
  /// or the question row is absent.
  fn load<'a>(
    &'a self,
    groupid: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Question>> + Send + 'a;

  /// Fetch every question in the group, in ascending id order, optionally
  /// restricted to unsolved ones. Strictly non-mutating: a missing group is
  /// [`crate::Error::GroupNotFound`], never created.
  fn load_all<'a>(
    &'a self,
    groupid: &'a str,
    unsolved_only: bool,
  ) -> impl Future<Output = Result<Vec<Question>>> + Send + 'a;

  /// Overwrite all stored fields of an existing question. Fails with
  /// [`crate::Error::QuestionNotFound`] if the row is absent.
  fn update<'a>(
    &'a self,
    question: &'a Question,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Remove one question. Returns `true` iff a row existed and was removed;
  /// a missing question is `false`, not an error.
  fn delete_by_id<'a>(
    &'a self,
    groupid: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<bool>> + Send + 'a;

  /// Mark the question solved (stamping `solved_time` with the store's
  /// current time on the unsolved→solved transition only) and persist via
  /// [`QuestionStore::update`]. The caller's record is mutated in place.
  fn set_solved<'a>(
    &'a self,
    question: &'a mut Question,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  // ── Bulk operations ───────────────────────────────────────────────────

  /// Remove every question in the group in one atomic step. Returns the
  /// number of rows removed.
  fn delete_all<'a>(
    &'a self,
    groupid: &'a str,
  ) -> impl Future<Output = Result<u64>> + Send + 'a;

  /// Mark every currently-unsolved question solved in one atomic step, all
  /// stamped with the same timestamp. Returns the number of rows changed.
  fn solve_all<'a>(
    &'a self,
    groupid: &'a str,
  ) -> impl Future<Output = Result<u64>> + Send + 'a;
}
