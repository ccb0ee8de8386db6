//! Wire format of the sentiment socket.
//!
//! A request is a multi-frame message whose second frame is a JSON object
//! `{"userContinuation": "...", "anaContinuation": "..."}`. Every reply is two frames:
//! [`REPLY_TOPIC`] and either a [`SentimentResponse`] or an [`ErrorResponse`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// First frame of every reply.
pub const REPLY_TOPIC: &[u8] = b"GPT3 REP from demo_turn_server";

/// Index of the JSON payload within a request.
pub const PAYLOAD_FRAME: usize = 1;

/// The two texts to classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRequest {
    /// Text written by the user.
    pub user_continuation: String,
    /// Text written by the system.
    pub ana_continuation: String,
}

/// Labels for both texts, keyed by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    /// Label of `userContinuation`.
    pub user_sentiment: String,
    /// Label of `anaContinuation`.
    pub ana_sentiment: String,
}

/// Reply body for a request that could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable reason.
    pub error: String,
}

/// Decodes the payload frame of a request.
pub fn decode_request<F: AsRef<[u8]>>(frames: &[F]) -> Result<SentimentRequest> {
    let payload = frames.get(PAYLOAD_FRAME).ok_or_else(|| {
        PipelineError::InvalidRequest(format!(
            "expected at least {} frames, got {}",
            PAYLOAD_FRAME + 1,
            frames.len()
        ))
    })?;

    serde_json::from_slice(payload.as_ref())
        .map_err(|e| PipelineError::InvalidRequest(format!("bad payload: {e}")))
}

/// Encodes a reply body behind [`REPLY_TOPIC`].
pub fn encode_reply<T: Serialize>(body: &T) -> Result<Vec<Bytes>> {
    let content = serde_json::to_vec(body)?;
    Ok(vec![Bytes::from_static(REPLY_TOPIC), Bytes::from(content)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(payload: &str) -> Vec<Bytes> {
        vec![
            Bytes::from_static(b"GPT3 REQ"),
            Bytes::from(payload.to_string()),
        ]
    }

    #[test]
    fn decodes_both_continuations() {
        let request = decode_request(&frames(
            r#"{"userContinuation": "I love this!", "anaContinuation": "I hate this."}"#,
        ))
        .unwrap();

        assert_eq!(request.user_continuation, "I love this!");
        assert_eq!(request.ana_continuation, "I hate this.");
    }

    #[test]
    fn ignores_extra_keys() {
        let request = decode_request(&frames(
            r#"{"userContinuation": "a", "anaContinuation": "b", "turn": 3}"#,
        ))
        .unwrap();
        assert_eq!(request.ana_continuation, "b");
    }

    #[test]
    fn missing_key_is_invalid_request() {
        let err = decode_request(&frames(r#"{"userContinuation": "a"}"#)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRequest(_)));
        assert!(err.to_string().contains("anaContinuation"));
    }

    #[test]
    fn non_json_payload_is_invalid_request() {
        let err = decode_request(&frames("not json")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRequest(_)));
    }

    #[test]
    fn invalid_utf8_payload_is_invalid_request() {
        let frames = [
            Bytes::from_static(b"GPT3 REQ"),
            Bytes::from_static(b"{\"userContinuation\": \"\xff\", \"anaContinuation\": \"b\"}"),
        ];
        let err = decode_request(&frames).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRequest(_)));
        assert!(err.to_string().starts_with("Invalid request: bad payload"));
    }

    #[test]
    fn single_frame_is_invalid_request() {
        let err = decode_request(&[Bytes::from_static(b"{}")]).unwrap_err();
        assert!(err.to_string().contains("got 1"));
    }

    #[test]
    fn reply_has_topic_and_normalized_keys() {
        let reply = encode_reply(&SentimentResponse {
            user_sentiment: "positive".into(),
            ana_sentiment: "negative".into(),
        })
        .unwrap();

        assert_eq!(reply.len(), 2);
        assert_eq!(&reply[0][..], REPLY_TOPIC);

        let body: serde_json::Value = serde_json::from_slice(&reply[1]).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"userSentiment": "positive", "anaSentiment": "negative"})
        );
    }

    #[test]
    fn error_reply_carries_message() {
        let reply = encode_reply(&ErrorResponse {
            error: "bad payload".into(),
        })
        .unwrap();
        assert_eq!(&reply[1][..], br#"{"error":"bad payload"}"#);
    }
}
