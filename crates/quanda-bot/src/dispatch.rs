//! The command dispatcher — maps inbound chat text to store operations and
//! reply text.

use std::sync::Arc;

use quanda_core::{
  Error, Result,
  profile::ProfileResolver,
  question::{NewQuestion, Question},
  store::QuestionStore,
};

use crate::command::{self, Command, Parsed, Target};

// ─── Inbound messages ────────────────────────────────────────────────────────

/// Where a message came from. Commands are only honoured in group chats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
  Group { groupid: String, userid: String },
  Other,
}

/// A text message handed over by the transport layer, already past signature
/// verification.
#[derive(Debug, Clone)]
pub struct Inbound {
  pub text:   String,
  pub source: Source,
}

// ─── Reply wrappers ──────────────────────────────────────────────────────────

fn confirm(text: impl AsRef<str>) -> String { format!(">{}<", text.as_ref()) }

fn reject(text: impl AsRef<str>) -> String {
  format!("[error] {}", text.as_ref())
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// Stateless command dispatcher over an injected store and profile resolver.
pub struct Dispatcher<S, P> {
  store:    Arc<S>,
  profiles: Arc<P>,
}

impl<S, P> Dispatcher<S, P>
where
  S: QuestionStore,
  P: ProfileResolver,
{
  pub fn new(store: Arc<S>, profiles: Arc<P>) -> Self {
    Self { store, profiles }
  }

  /// Handle one inbound message, producing at most one reply.
  ///
  /// Everything a chat user can get wrong becomes a reply (or silence);
  /// only store failures propagate as errors.
  pub async fn handle(&self, inbound: &Inbound) -> Result<Option<String>> {
    let Source::Group { groupid, userid } = &inbound.source else {
      return Ok(None);
    };

    match command::parse(&inbound.text) {
      Parsed::Ignore => Ok(None),
      Parsed::Invalid(message) => Ok(Some(reject(message))),
      Parsed::Command(cmd) => self.run(cmd, groupid, userid).await,
    }
  }

  async fn run(
    &self,
    cmd: Command,
    groupid: &str,
    userid: &str,
  ) -> Result<Option<String>> {
    match cmd {
      Command::Ask(text) => {
        let question = self
          .store
          .save(NewQuestion::new(text, userid, groupid))
          .await?;
        tracing::info!(groupid, id = question.id, "question saved");
        Ok(Some(confirm(format!("question [{}] is saved", question.id))))
      }

      Command::ListAll => self.list(groupid, false).await,
      Command::ListUnsolved => self.list(groupid, true).await,

      Command::Delete(Target::Id(id)) => {
        match self.store.delete_by_id(groupid, id).await {
          Ok(true) => {
            Ok(Some(confirm(format!("question [{id}] is deleted"))))
          }
          // A delete miss gives no feedback.
          Ok(false) => Ok(None),
          Err(Error::GroupNotFound(_)) => Ok(None),
          Err(e) => Err(e),
        }
      }

      Command::Delete(Target::All) => {
        match self.store.delete_all(groupid).await {
          Ok(removed) => {
            tracing::info!(groupid, removed, "bulk delete");
            Ok(Some(confirm("all questions are deleted")))
          }
          // Vacuously done on a never-used group.
          Err(Error::GroupNotFound(_)) => {
            Ok(Some(confirm("all questions are deleted")))
          }
          Err(e) => Err(e),
        }
      }

      Command::Solve(Target::Id(id)) => {
        match self.store.load(groupid, id).await {
          Ok(mut question) => {
            self.store.set_solved(&mut question).await?;
            Ok(Some(confirm(format!("question [{id}] is solved"))))
          }
          Err(e) if e.is_not_found() => {
            Ok(Some(reject(format!("question [{id}] is not found"))))
          }
          Err(e) => Err(e),
        }
      }

      Command::Solve(Target::All) => {
        match self.store.solve_all(groupid).await {
          Ok(solved) => {
            tracing::info!(groupid, solved, "bulk solve");
            Ok(Some(confirm("all questions are solved")))
          }
          Err(Error::GroupNotFound(_)) => {
            Ok(Some(confirm("all questions are solved")))
          }
          Err(e) => Err(e),
        }
      }
    }
  }

  async fn list(
    &self,
    groupid: &str,
    unsolved_only: bool,
  ) -> Result<Option<String>> {
    let questions = match self.store.load_all(groupid, unsolved_only).await {
      Ok(questions) => questions,
      // A group nobody has asked in yet looks empty, not broken.
      Err(Error::GroupNotFound(_)) => Vec::new(),
      Err(e) => return Err(e),
    };

    if questions.is_empty() {
      return Ok(Some(confirm("(empty)")));
    }

    let mut body = String::new();
    for question in &questions {
      body.push('\n');
      body.push_str(&self.render(question).await);
    }
    body.push('\n');
    Ok(Some(confirm(body)))
  }

  /// One display line per question; the author suffix is best-effort.
  async fn render(&self, question: &Question) -> String {
    match self.author_name(&question.groupid, &question.userid).await {
      Some(name) => {
        format!("{}. \"{}\"--from[{}]", question.id, question.text, name)
      }
      None => format!("{}. \"{}\"", question.id, question.text),
    }
  }

  /// Group-member profile first, then the global profile, then nothing.
  async fn author_name(&self, groupid: &str, userid: &str) -> Option<String> {
    if let Some(name) =
      self.profiles.member_display_name(groupid, userid).await
    {
      return Some(name);
    }
    self.profiles.display_name(userid).await
  }
}
