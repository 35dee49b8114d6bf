//! Messaging API client: reply delivery and profile lookups.

use std::future::Future;

use quanda_core::profile::ProfileResolver;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;

// ─── Reply transport ─────────────────────────────────────────────────────────

/// Sends reply messages back through the platform.
///
/// Split out as a trait so the router can be exercised in tests with a
/// recording double instead of a network client.
pub trait ReplyTransport: Send + Sync {
  fn reply<'a>(
    &'a self,
    reply_token: &'a str,
    text: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

// ─── LINE client ─────────────────────────────────────────────────────────────

/// Client for the LINE Messaging API, authenticated with the channel access
/// token. The API origin is configurable so tests can point it at a stub.
pub struct LineClient {
  http:         reqwest::Client,
  api_base:     String,
  access_token: String,
}

#[derive(Debug, Deserialize)]
struct Profile {
  #[serde(rename = "displayName")]
  display_name: String,
}

impl LineClient {
  pub fn new(
    api_base: impl Into<String>,
    access_token: impl Into<String>,
  ) -> Self {
    Self {
      http:         reqwest::Client::new(),
      api_base:     api_base.into().trim_end_matches('/').to_owned(),
      access_token: access_token.into(),
    }
  }

  /// Best-effort profile fetch: any transport or decode failure is logged
  /// and reported as unresolvable.
  async fn fetch_display_name(&self, url: String) -> Option<String> {
    let result = async {
      let profile: Profile = self
        .http
        .get(&url)
        .bearer_auth(&self.access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
      Ok::<_, reqwest::Error>(profile.display_name)
    }
    .await;

    match result {
      Ok(name) => Some(name),
      Err(e) => {
        tracing::debug!(url, error = %e, "profile lookup failed");
        None
      }
    }
  }
}

impl ReplyTransport for LineClient {
  async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
    self
      .http
      .post(format!("{}/v2/bot/message/reply", self.api_base))
      .bearer_auth(&self.access_token)
      .json(&json!({
        "replyToken": reply_token,
        "messages": [{ "type": "text", "text": text }],
      }))
      .send()
      .await?
      .error_for_status()?;
    Ok(())
  }
}

impl ProfileResolver for LineClient {
  async fn member_display_name(
    &self,
    groupid: &str,
    userid: &str,
  ) -> Option<String> {
    self
      .fetch_display_name(format!(
        "{}/v2/bot/group/{groupid}/member/{userid}",
        self.api_base
      ))
      .await
  }

  async fn display_name(&self, userid: &str) -> Option<String> {
    self
      .fetch_display_name(format!("{}/v2/bot/profile/{userid}", self.api_base))
      .await
  }
}
