//! [`SqliteStore`] — the SQLite implementation of [`QuestionStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use quanda_core::{
  Error, Result,
  question::{Group, NewQuestion, Question},
  store::QuestionStore,
};

use crate::schema::SCHEMA;

// ─── Encoding ────────────────────────────────────────────────────────────────

fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(Error::upstream)
}

/// Raw strings read directly from a `questions` row. The group id is not a
/// row field — it is supplied by the caller that scoped the query.
struct RawQuestion {
  id:           i64,
  text:         String,
  solved:       bool,
  userid:       String,
  created_time: String,
  solved_time:  Option<String>,
}

impl RawQuestion {
  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      text:         row.get(1)?,
      solved:       row.get(2)?,
      userid:       row.get(3)?,
      created_time: row.get(4)?,
      solved_time:  row.get(5)?,
    })
  }

  fn into_question(self, groupid: &str) -> Result<Question> {
    Ok(Question {
      id:           self.id,
      text:         self.text,
      solved:       self.solved,
      userid:       self.userid,
      groupid:      groupid.to_owned(),
      created_time: decode_dt(&self.created_time)?,
      solved_time:  self.solved_time.as_deref().map(decode_dt).transpose()?,
    })
  }
}

const QUESTION_COLUMNS: &str =
  "id, text, solved, userid, created_time, solved_time";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A quanda question store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::upstream)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::upstream)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::upstream)
  }
}

// ─── QuestionStore impl ──────────────────────────────────────────────────────

impl QuestionStore for SqliteStore {
  // ── Groups and id allocation ──────────────────────────────────────────────

  async fn ensure_group(&self, groupid: &str) -> Result<Group> {
    let gid = groupid.to_owned();

    let (row, created): ((String, i64), bool) = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO groups (groupid, id_next) VALUES (?1, 0)
           ON CONFLICT(groupid) DO NOTHING",
          rusqlite::params![gid],
        )?;
        let row = conn.query_row(
          "SELECT groupid, id_next FROM groups WHERE groupid = ?1",
          rusqlite::params![gid],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((row, inserted > 0))
      })
      .await
      .map_err(Error::upstream)?;

    if created {
      tracing::info!(groupid, "group created");
    }

    Ok(Group { groupid: row.0, id_next: row.1 })
  }

  async fn get_group(&self, groupid: &str) -> Result<Group> {
    let gid = groupid.to_owned();

    let row: Option<(String, i64)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT groupid, id_next FROM groups WHERE groupid = ?1",
              rusqlite::params![gid],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::upstream)?;

    row
      .map(|(groupid, id_next)| Group { groupid, id_next })
      .ok_or_else(|| Error::GroupNotFound(groupid.to_owned()))
  }

  async fn next_id(&self, groupid: &str) -> Result<i64> {
    let gid = groupid.to_owned();

    // Read-modify-write inside one transaction: concurrent callers can
    // never observe the same counter value.
    let allocated: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<i64> = tx
          .query_row(
            "SELECT id_next FROM groups WHERE groupid = ?1",
            rusqlite::params![gid],
            |row| row.get(0),
          )
          .optional()?;

        let Some(current) = current else {
          return Ok(None);
        };

        tx.execute(
          "UPDATE groups SET id_next = id_next + 1 WHERE groupid = ?1",
          rusqlite::params![gid],
        )?;
        tx.commit()?;
        Ok(Some(current))
      })
      .await
      .map_err(Error::upstream)?;

    allocated.ok_or_else(|| Error::GroupNotFound(groupid.to_owned()))
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn save(&self, input: NewQuestion) -> Result<Question> {
    if input.text.is_empty() {
      return Err(Error::EmptyText);
    }

    let created_time = input.created_time.unwrap_or_else(Utc::now);
    let NewQuestion { text, userid, groupid, .. } = input;

    let gid         = groupid.clone();
    let text_col    = text.clone();
    let userid_col  = userid.clone();
    let created_col = encode_dt(created_time);

    // Group provisioning, id allocation, and row insertion commit together.
    let (id, group_created): (i64, bool) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT INTO groups (groupid, id_next) VALUES (?1, 0)
           ON CONFLICT(groupid) DO NOTHING",
          rusqlite::params![gid],
        )?;
        let id: i64 = tx.query_row(
          "SELECT id_next FROM groups WHERE groupid = ?1",
          rusqlite::params![gid],
          |row| row.get(0),
        )?;
        tx.execute(
          "UPDATE groups SET id_next = id_next + 1 WHERE groupid = ?1",
          rusqlite::params![gid],
        )?;
        tx.execute(
          "INSERT INTO questions
             (groupid, id, text, solved, userid, created_time, solved_time)
           VALUES (?1, ?2, ?3, 0, ?4, ?5, NULL)",
          rusqlite::params![gid, id, text_col, userid_col, created_col],
        )?;
        tx.commit()?;
        Ok((id, inserted > 0))
      })
      .await
      .map_err(Error::upstream)?;

    if group_created {
      tracing::info!(groupid = %groupid, "group created");
    }

    Ok(Question {
      id,
      text,
      solved: false,
      userid,
      groupid,
      created_time,
      solved_time: None,
    })
  }

  async fn load(&self, groupid: &str, id: i64) -> Result<Question> {
    self.get_group(groupid).await?;

    let gid = groupid.to_owned();
    let raw: Option<RawQuestion> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {QUESTION_COLUMNS} FROM questions
                 WHERE groupid = ?1 AND id = ?2"
              ),
              rusqlite::params![gid, id],
              RawQuestion::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::upstream)?;

    match raw {
      Some(raw) => raw.into_question(groupid),
      None => {
        Err(Error::QuestionNotFound { groupid: groupid.to_owned(), id })
      }
    }
  }

  async fn load_all(
    &self,
    groupid: &str,
    unsolved_only: bool,
  ) -> Result<Vec<Question>> {
    self.get_group(groupid).await?;

    let gid = groupid.to_owned();
    let raws: Vec<RawQuestion> = self
      .conn
      .call(move |conn| {
        let sql = if unsolved_only {
          format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             WHERE groupid = ?1 AND solved = 0 ORDER BY id"
          )
        } else {
          format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             WHERE groupid = ?1 ORDER BY id"
          )
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![gid], RawQuestion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::upstream)?;

    raws.into_iter().map(|raw| raw.into_question(groupid)).collect()
  }

  async fn update(&self, question: &Question) -> Result<()> {
    let gid         = question.groupid.clone();
    let id          = question.id;
    let text        = question.text.clone();
    let solved      = question.solved;
    let userid      = question.userid.clone();
    let created_col = encode_dt(question.created_time);
    let solved_col  = question.solved_time.map(encode_dt);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE questions
           SET text = ?3, solved = ?4, userid = ?5,
               created_time = ?6, solved_time = ?7
           WHERE groupid = ?1 AND id = ?2",
          rusqlite::params![gid, id, text, solved, userid, created_col, solved_col],
        )?)
      })
      .await
      .map_err(Error::upstream)?;

    if changed == 0 {
      return Err(Error::QuestionNotFound {
        groupid: question.groupid.clone(),
        id,
      });
    }
    Ok(())
  }

  async fn delete_by_id(&self, groupid: &str, id: i64) -> Result<bool> {
    self.get_group(groupid).await?;

    let gid = groupid.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM questions WHERE groupid = ?1 AND id = ?2",
          rusqlite::params![gid, id],
        )?)
      })
      .await
      .map_err(Error::upstream)?;

    Ok(removed > 0)
  }

  async fn set_solved(&self, question: &mut Question) -> Result<()> {
    question.mark_solved(Utc::now());
    self.update(question).await
  }

  // ── Bulk operations ───────────────────────────────────────────────────────

  async fn delete_all(&self, groupid: &str) -> Result<u64> {
    self.get_group(groupid).await?;

    let gid = groupid.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM questions WHERE groupid = ?1",
          rusqlite::params![gid],
        )?)
      })
      .await
      .map_err(Error::upstream)?;

    Ok(removed as u64)
  }

  async fn solve_all(&self, groupid: &str) -> Result<u64> {
    self.get_group(groupid).await?;

    let gid        = groupid.to_owned();
    let solved_col = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE questions SET solved = 1, solved_time = ?2
           WHERE groupid = ?1 AND solved = 0",
          rusqlite::params![gid, solved_col],
        )?)
      })
      .await
      .map_err(Error::upstream)?;

    Ok(changed as u64)
  }
}
