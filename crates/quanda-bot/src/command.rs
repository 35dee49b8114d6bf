//! Chat-text command parsing.
//!
//! Two markers are recognised: `?` (or its full-width form `？`) records a
//! new question, `/` introduces a management command. Everything else is
//! ignored without a reply.

// ─── Parsed commands ─────────────────────────────────────────────────────────

/// The object of a `del` or `s` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  Id(i64),
  All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Record the given text as a new question.
  Ask(String),
  /// List every question in the group.
  ListAll,
  /// List the unsolved questions in the group.
  ListUnsolved,
  Delete(Target),
  Solve(Target),
}

/// Outcome of parsing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
  Command(Command),
  /// Recognised command with unusable arguments; the payload is the
  /// user-facing complaint (unprefixed).
  Invalid(String),
  /// Not addressed to the bot; stay silent.
  Ignore,
}

// ─── Parser ──────────────────────────────────────────────────────────────────

pub fn parse(text: &str) -> Parsed {
  let text = text.trim();

  if let Some(rest) = text.strip_prefix(['?', '？']) {
    let content = rest.trim_start();
    if content.is_empty() {
      return Parsed::Ignore;
    }
    return Parsed::Command(Command::Ask(content.to_owned()));
  }

  let Some(rest) = text.strip_prefix('/') else {
    return Parsed::Ignore;
  };

  let mut tokens = rest.split_whitespace();
  let Some(word) = tokens.next() else {
    return Parsed::Ignore;
  };

  match word.to_ascii_lowercase().as_str() {
    "all" => Parsed::Command(Command::ListAll),
    "uns" => Parsed::Command(Command::ListUnsolved),
    "del" => target(Command::Delete, "/del", tokens.next()),
    "s" => target(Command::Solve, "/s", tokens.next()),
    _ => Parsed::Ignore,
  }
}

/// Parse the `<id>` / `all` argument of `del` and `s`. Argument problems are
/// replies, never errors to the caller.
fn target(
  build: fn(Target) -> Command,
  name: &str,
  arg: Option<&str>,
) -> Parsed {
  let Some(arg) = arg else {
    return Parsed::Invalid(format!("'{name}' missing required argument 'id'"));
  };

  if arg.eq_ignore_ascii_case("all") {
    return Parsed::Command(build(Target::All));
  }

  match arg.parse::<i64>() {
    Ok(id) => Parsed::Command(build(Target::Id(id))),
    Err(_) => Parsed::Invalid(format!(
      "the first argument of '{name}' must be an integer or 0"
    )),
  }
}
