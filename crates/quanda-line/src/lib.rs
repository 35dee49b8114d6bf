//! LINE webhook protocol layer for quanda.
//!
//! Exposes an axum [`Router`] that verifies `X-Line-Signature` on inbound
//! webhook deliveries, feeds text-message events through the
//! [`quanda_bot::Dispatcher`], and sends the reply (if any) back through the
//! Messaging API.

pub mod client;
pub mod error;
pub mod event;
pub mod signature;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, extract::State, http::HeaderMap, routing::get};
use bytes::Bytes;
use quanda_bot::Dispatcher;
use quanda_core::{profile::ProfileResolver, store::QuestionStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use client::ReplyTransport;
use event::WebhookEnvelope;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Messaging API origin; tests point this at a stub.
  #[serde(default = "default_api_base")]
  pub api_base:             String,
  pub channel_secret:       String,
  pub channel_access_token: String,
}

fn default_api_base() -> String { "https://api.line.me".to_owned() }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the axum handlers. `C` is the messaging
/// client, serving both as reply transport and profile resolver.
pub struct AppState<S, C> {
  pub dispatcher: Arc<Dispatcher<S, C>>,
  pub client:     Arc<C>,
  pub config:     Arc<ServerConfig>,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      dispatcher: self.dispatcher.clone(),
      client:     self.client.clone(),
      config:     self.config.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`]: webhook POST and health GET, both at `/`.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: QuestionStore + 'static,
  C: ReplyTransport + ProfileResolver + 'static,
{
  Router::new()
    .route("/", get(health).post(webhook::<S, C>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// Process-liveness probe.
async fn health() -> &'static str { "OK" }

/// The webhook endpoint.
///
/// The body is taken raw: the signature covers the exact bytes on the wire,
/// so verification happens before any JSON parsing. Events are processed
/// sequentially; a store failure fails the whole request with no chat reply.
async fn webhook<S, C>(
  State(state): State<AppState<S, C>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<&'static str, Error>
where
  S: QuestionStore + 'static,
  C: ReplyTransport + ProfileResolver + 'static,
{
  let header = headers
    .get("x-line-signature")
    .and_then(|value| value.to_str().ok());
  signature::verify(&state.config.channel_secret, header, &body)?;

  let envelope: WebhookEnvelope = serde_json::from_slice(&body)
    .map_err(|e| Error::BadRequest(e.to_string()))?;

  for event in envelope.events {
    let Some((inbound, reply_token)) = event.into_inbound() else {
      continue;
    };
    if let Some(reply) = state.dispatcher.handle(&inbound).await? {
      state.client.reply(&reply_token, &reply).await?;
    }
  }

  Ok("OK")
}

// ─── Integration tests ────────────────────────────────────────────────────────
