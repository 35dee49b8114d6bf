//! Webhook event payloads.
//!
//! Only text messages from group chats drive the bot, but a delivery batch
//! can interleave them with follows, joins, stickers, and event kinds that
//! do not exist yet — all of those must deserialise cleanly and reduce to
//! "nothing to do" rather than reject the whole batch.

use quanda_bot::{Inbound, Source};
use serde::Deserialize;

/// The envelope POSTed by the platform: a batch of events for one bot.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
  #[serde(default)]
  pub destination: String,
  #[serde(default)]
  pub events:      Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEvent {
  #[serde(rename = "message", rename_all = "camelCase")]
  Message {
    reply_token: String,
    source:      EventSource,
    message:     MessageContent,
  },
  /// Follows, joins, leaves, and whatever the platform adds later.
  #[serde(other)]
  Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContent {
  #[serde(rename = "text")]
  Text { text: String },
  /// Stickers, images, and other non-text content.
  #[serde(other)]
  Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum EventSource {
  #[serde(rename = "user", rename_all = "camelCase")]
  User { user_id: String },
  #[serde(rename = "group", rename_all = "camelCase")]
  Group {
    group_id: String,
    #[serde(default)]
    user_id:  Option<String>,
  },
  #[serde(rename = "room", rename_all = "camelCase")]
  Room {
    room_id: String,
    #[serde(default)]
    user_id: Option<String>,
  },
  #[serde(other)]
  Other,
}

impl WebhookEvent {
  /// Reduce to the dispatcher's inbound form, if this event carries one.
  ///
  /// Group messages without a sender id (the member has not consented to
  /// profile sharing) are treated as non-group traffic: a question needs an
  /// author.
  pub fn into_inbound(self) -> Option<(Inbound, String)> {
    let WebhookEvent::Message { reply_token, source, message } = self else {
      return None;
    };
    let MessageContent::Text { text } = message else {
      return None;
    };

    let source = match source {
      EventSource::Group { group_id, user_id: Some(user_id) } => {
        Source::Group { groupid: group_id, userid: user_id }
      }
      _ => Source::Other,
    };

    Some((Inbound { text, source }, reply_token))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn envelope(json: &str) -> WebhookEnvelope {
    serde_json::from_str(json).expect("envelope should deserialise")
  }

  #[test]
  fn group_text_message_becomes_inbound() {
    let mut env = envelope(
      r#"{
        "destination": "Uxxx",
        "events": [{
          "type": "message",
          "replyToken": "rt-1",
          "source": { "type": "group", "groupId": "G1", "userId": "U1" },
          "message": { "type": "text", "id": "42", "text": "?hello" }
        }]
      }"#,
    );

    let (inbound, reply_token) =
      env.events.remove(0).into_inbound().expect("a text message");
    assert_eq!(reply_token, "rt-1");
    assert_eq!(inbound.text, "?hello");
    assert_eq!(
      inbound.source,
      Source::Group { groupid: "G1".into(), userid: "U1".into() }
    );
  }

  #[test]
  fn one_on_one_message_is_non_group() {
    let mut env = envelope(
      r#"{
        "events": [{
          "type": "message",
          "replyToken": "rt-2",
          "source": { "type": "user", "userId": "U1" },
          "message": { "type": "text", "id": "43", "text": "?hi" }
        }]
      }"#,
    );

    let (inbound, _) = env.events.remove(0).into_inbound().unwrap();
    assert_eq!(inbound.source, Source::Other);
  }

  #[test]
  fn group_message_without_sender_is_non_group() {
    let mut env = envelope(
      r#"{
        "events": [{
          "type": "message",
          "replyToken": "rt-3",
          "source": { "type": "group", "groupId": "G1" },
          "message": { "type": "text", "id": "44", "text": "?hi" }
        }]
      }"#,
    );

    let (inbound, _) = env.events.remove(0).into_inbound().unwrap();
    assert_eq!(inbound.source, Source::Other);
  }

  #[test]
  fn sticker_messages_carry_no_inbound() {
    let mut env = envelope(
      r#"{
        "events": [{
          "type": "message",
          "replyToken": "rt-4",
          "source": { "type": "group", "groupId": "G1", "userId": "U1" },
          "message": { "type": "sticker", "stickerId": "1" }
        }]
      }"#,
    );

    assert!(env.events.remove(0).into_inbound().is_none());
  }

  #[test]
  fn unknown_event_kinds_deserialise_and_are_ignored() {
    let env = envelope(
      r#"{
        "events": [
          { "type": "follow", "replyToken": "rt-5" },
          { "type": "somethingNewer" }
        ]
      }"#,
    );

    assert_eq!(env.events.len(), 2);
    for event in env.events {
      assert!(event.into_inbound().is_none());
    }
  }
}
