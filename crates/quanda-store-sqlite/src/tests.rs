//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use quanda_core::{
  Error,
  question::NewQuestion,
  store::QuestionStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ask(groupid: &str, text: &str) -> NewQuestion {
  NewQuestion::new(text, "U-author", groupid)
}

// ─── Groups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_group_starts_counter_at_zero() {
  let s = store().await;
  let group = s.ensure_group("G1").await.unwrap();
  assert_eq!(group.groupid, "G1");
  assert_eq!(group.id_next, 0);
}

#[tokio::test]
async fn ensure_group_is_idempotent() {
  let s = store().await;
  s.ensure_group("G1").await.unwrap();
  s.next_id("G1").await.unwrap();

  // A second ensure must not reset the counter.
  let group = s.ensure_group("G1").await.unwrap();
  assert_eq!(group.id_next, 1);
}

#[tokio::test]
async fn get_group_missing_errors() {
  let s = store().await;
  let err = s.get_group("nope").await.unwrap_err();
  assert!(matches!(err, Error::GroupNotFound(ref g) if g == "nope"));
}

// ─── Id allocation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn next_id_is_strictly_increasing_from_zero() {
  let s = store().await;
  s.ensure_group("G1").await.unwrap();

  for expected in 0..5 {
    assert_eq!(s.next_id("G1").await.unwrap(), expected);
  }
}

#[tokio::test]
async fn next_id_on_missing_group_errors() {
  let s = store().await;
  let err = s.next_id("nope").await.unwrap_err();
  assert!(matches!(err, Error::GroupNotFound(_)));
}

#[tokio::test]
async fn next_id_unique_under_concurrent_callers() {
  let s = store().await;
  s.ensure_group("G1").await.unwrap();

  let mut tasks = tokio::task::JoinSet::new();
  for _ in 0..32 {
    let s = s.clone();
    tasks.spawn(async move { s.next_id("G1").await.unwrap() });
  }

  let mut seen = HashSet::new();
  while let Some(id) = tasks.join_next().await {
    assert!(seen.insert(id.unwrap()), "duplicate id allocated");
  }
  assert_eq!(seen.len(), 32);
  assert_eq!(s.get_group("G1").await.unwrap().id_next, 32);
}

#[tokio::test]
async fn ids_are_not_reused_after_deletion() {
  let s = store().await;
  let q = s.save(ask("G1", "first")).await.unwrap();
  assert_eq!(q.id, 0);
  assert!(s.delete_by_id("G1", 0).await.unwrap());

  let q = s.save(ask("G1", "second")).await.unwrap();
  assert_eq!(q.id, 1);
}

// ─── Save / load ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_lazily_creates_the_group() {
  let s = store().await;
  let q = s.save(ask("fresh", "hello")).await.unwrap();
  assert_eq!(q.id, 0);
  assert_eq!(s.get_group("fresh").await.unwrap().id_next, 1);
}

#[tokio::test]
async fn save_assigns_sequential_ids() {
  let s = store().await;
  assert_eq!(s.save(ask("G1", "a")).await.unwrap().id, 0);
  assert_eq!(s.save(ask("G1", "b")).await.unwrap().id, 1);
  // Independent group, independent counter.
  assert_eq!(s.save(ask("G2", "c")).await.unwrap().id, 0);
}

#[tokio::test]
async fn save_rejects_empty_text() {
  let s = store().await;
  let err = s.save(ask("G1", "")).await.unwrap_err();
  assert!(matches!(err, Error::EmptyText));
  // The rejected save must not have provisioned the group.
  assert!(matches!(
    s.get_group("G1").await.unwrap_err(),
    Error::GroupNotFound(_)
  ));
}

#[tokio::test]
async fn save_then_load_round_trips_all_fields() {
  let s = store().await;
  let saved = s.save(ask("G1", "what is wasm")).await.unwrap();

  let loaded = s.load("G1", saved.id).await.unwrap();
  assert_eq!(loaded, saved);
  assert!(!loaded.solved);
  assert!(loaded.solved_time.is_none());
  assert_eq!(loaded.userid, "U-author");
  assert_eq!(loaded.groupid, "G1");
}

#[tokio::test]
async fn load_missing_question_errors() {
  let s = store().await;
  s.save(ask("G1", "only one")).await.unwrap();

  let err = s.load("G1", 7).await.unwrap_err();
  assert!(matches!(err, Error::QuestionNotFound { id: 7, .. }));
}

#[tokio::test]
async fn load_on_missing_group_errors() {
  let s = store().await;
  let err = s.load("nope", 0).await.unwrap_err();
  assert!(matches!(err, Error::GroupNotFound(_)));
}

// ─── load_all ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_all_returns_ascending_ids() {
  let s = store().await;
  for text in ["a", "b", "c"] {
    s.save(ask("G1", text)).await.unwrap();
  }

  let all = s.load_all("G1", false).await.unwrap();
  let ids: Vec<i64> = all.iter().map(|q| q.id).collect();
  assert_eq!(ids, [0, 1, 2]);
}

#[tokio::test]
async fn load_all_unsolved_filters_solved_rows() {
  let s = store().await;
  s.save(ask("G1", "a")).await.unwrap();
  let mut b = s.save(ask("G1", "b")).await.unwrap();
  s.save(ask("G1", "c")).await.unwrap();
  s.set_solved(&mut b).await.unwrap();

  let unsolved = s.load_all("G1", true).await.unwrap();
  assert_eq!(unsolved.len(), 2);
  assert!(unsolved.iter().all(|q| !q.solved));

  // The default view still returns everything.
  assert_eq!(s.load_all("G1", false).await.unwrap().len(), 3);
}

#[tokio::test]
async fn load_all_never_creates_the_group() {
  let s = store().await;
  let err = s.load_all("nope", false).await.unwrap_err();
  assert!(matches!(err, Error::GroupNotFound(_)));
  // The read must have left no trace.
  assert!(s.get_group("nope").await.is_err());
}

// ─── update / set_solved ─────────────────────────────────────────────────────

#[tokio::test]
async fn update_missing_question_errors() {
  let s = store().await;
  let mut q = s.save(ask("G1", "ephemeral")).await.unwrap();
  s.delete_by_id("G1", q.id).await.unwrap();

  q.solved = true;
  let err = s.update(&q).await.unwrap_err();
  assert!(matches!(err, Error::QuestionNotFound { .. }));
}

#[tokio::test]
async fn set_solved_stamps_and_persists() {
  let s = store().await;
  let mut q = s.save(ask("G1", "answer me")).await.unwrap();
  s.set_solved(&mut q).await.unwrap();

  assert!(q.solved);
  assert!(q.solved_time.is_some());

  let loaded = s.load("G1", q.id).await.unwrap();
  assert!(loaded.solved);
  assert_eq!(loaded.solved_time, q.solved_time);
}

#[tokio::test]
async fn set_solved_never_restamps() {
  let s = store().await;
  let mut q = s.save(ask("G1", "answer me")).await.unwrap();
  s.set_solved(&mut q).await.unwrap();
  let first = q.solved_time;

  s.set_solved(&mut q).await.unwrap();
  assert_eq!(q.solved_time, first);
  assert_eq!(s.load("G1", q.id).await.unwrap().solved_time, first);
}

// ─── delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_id_reports_presence() {
  let s = store().await;
  let q = s.save(ask("G1", "to delete")).await.unwrap();

  assert!(s.delete_by_id("G1", q.id).await.unwrap());
  // A repeat delete is a miss, not an error.
  assert!(!s.delete_by_id("G1", q.id).await.unwrap());
  assert!(s.load("G1", q.id).await.is_err());
}

#[tokio::test]
async fn delete_by_id_on_missing_group_errors() {
  let s = store().await;
  let err = s.delete_by_id("nope", 0).await.unwrap_err();
  assert!(matches!(err, Error::GroupNotFound(_)));
}

// ─── Bulk operations ─────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_all_removes_everything_and_counts() {
  let s = store().await;
  for text in ["a", "b", "c"] {
    s.save(ask("G1", text)).await.unwrap();
  }

  assert_eq!(s.delete_all("G1").await.unwrap(), 3);
  assert!(s.load_all("G1", false).await.unwrap().is_empty());
  // Counter is untouched; the next question continues the sequence.
  assert_eq!(s.save(ask("G1", "d")).await.unwrap().id, 3);
}

#[tokio::test]
async fn solve_all_skips_already_solved_rows() {
  let s = store().await;
  s.save(ask("G1", "a")).await.unwrap();
  let mut b = s.save(ask("G1", "b")).await.unwrap();
  s.save(ask("G1", "c")).await.unwrap();

  s.set_solved(&mut b).await.unwrap();
  let stamped = b.solved_time;

  assert_eq!(s.solve_all("G1").await.unwrap(), 2);
  assert!(s.load_all("G1", true).await.unwrap().is_empty());

  // The earlier solve keeps its original stamp.
  assert_eq!(s.load("G1", b.id).await.unwrap().solved_time, stamped);
}
