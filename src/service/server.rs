use bytes::Bytes;

use super::protocol::{decode_request, encode_reply, ErrorResponse, SentimentResponse};
use crate::error::Result;
use crate::sentiment::SentimentAnalyzer;

/// A synchronous request/reply channel: every received request must be answered
/// before the next one can be received.
#[allow(async_fn_in_trait)]
pub trait ReplyChannel {
    /// Waits for the next request.
    async fn recv_request(&mut self) -> Result<Vec<Bytes>>;

    /// Answers the request received last.
    async fn send_reply(&mut self, frames: Vec<Bytes>) -> Result<()>;
}

/// Serves sentiment requests one at a time over a [`ReplyChannel`].
///
/// The analyzer is injected once and shared by every request. Requests that cannot be
/// decoded or classified are answered with an [`ErrorResponse`] and the loop goes on;
/// channel failures end the loop.
pub struct SentimentServer<A, C> {
    analyzer: A,
    channel: C,
    served: u64,
}

impl<A: SentimentAnalyzer, C: ReplyChannel> SentimentServer<A, C> {
    /// Creates a server over an already bound channel.
    pub fn new(analyzer: A, channel: C) -> Self {
        Self {
            analyzer,
            channel,
            served: 0,
        }
    }

    /// Runs until the channel fails.
    pub async fn serve(&mut self) -> Result<()> {
        tracing::info!("Starting sentiment analysis loop");
        loop {
            self.serve_one().await?;
        }
    }

    /// Receives one request and sends its reply.
    pub async fn serve_one(&mut self) -> Result<()> {
        let request = self.channel.recv_request().await?;
        tracing::info!(?request, "Received request");

        let reply = self.respond(&request)?;

        self.channel.send_reply(reply.clone()).await?;
        self.served += 1;
        tracing::info!(response = ?reply, "Done");

        Ok(())
    }

    /// Builds the reply frames for one request. Per-request failures become error replies.
    pub fn respond(&self, frames: &[Bytes]) -> Result<Vec<Bytes>> {
        match self.classify(frames) {
            Ok(response) => encode_reply(&response),
            Err(e) => {
                tracing::warn!(error = %e, "request failed, replying with error");
                encode_reply(&ErrorResponse {
                    error: e.to_string(),
                })
            }
        }
    }

    fn classify(&self, frames: &[Bytes]) -> Result<SentimentResponse> {
        let request = decode_request(frames)?;

        let user = self.analyzer.analyze(&request.user_continuation)?;
        let ana = self.analyzer.analyze(&request.ana_continuation)?;

        Ok(SentimentResponse {
            user_sentiment: user.label,
            ana_sentiment: ana.label,
        })
    }

    /// Number of requests answered so far, error replies included.
    pub fn served(&self) -> u64 {
        self.served
    }

    /// The underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::sentiment::Prediction;
    use crate::service::protocol::REPLY_TOPIC;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct KeywordAnalyzer {
        calls: RefCell<Vec<String>>,
    }

    impl SentimentAnalyzer for KeywordAnalyzer {
        fn analyze(&self, text: &str) -> Result<Prediction> {
            self.calls.borrow_mut().push(text.to_string());
            if text.contains("boom") {
                return Err(PipelineError::Unexpected("inference exploded".into()));
            }
            let label = if text.contains("love") {
                "positive"
            } else if text.contains("hate") {
                "negative"
            } else {
                "neutral"
            };
            Ok(Prediction {
                label: label.into(),
                score: 0.9,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Received,
        Replied,
    }

    #[derive(Default)]
    struct ScriptedChannel {
        requests: VecDeque<Vec<Bytes>>,
        replies: Vec<Vec<Bytes>>,
        events: Vec<Event>,
    }

    impl ScriptedChannel {
        fn with_payloads(payloads: &[&str]) -> Self {
            Self {
                requests: payloads
                    .iter()
                    .map(|p| vec![Bytes::from_static(b"REQ"), Bytes::from(p.to_string())])
                    .collect(),
                ..Default::default()
            }
        }

        fn reply_body(&self, i: usize) -> serde_json::Value {
            serde_json::from_slice(&self.replies[i][1]).unwrap()
        }
    }

    impl ReplyChannel for ScriptedChannel {
        async fn recv_request(&mut self) -> Result<Vec<Bytes>> {
            self.events.push(Event::Received);
            self.requests
                .pop_front()
                .ok_or_else(|| PipelineError::Transport("channel closed".into()))
        }

        async fn send_reply(&mut self, frames: Vec<Bytes>) -> Result<()> {
            self.events.push(Event::Replied);
            self.replies.push(frames);
            Ok(())
        }
    }

    #[tokio::test]
    async fn classifies_both_continuations() {
        let channel = ScriptedChannel::with_payloads(&[
            r#"{"userContinuation": "I love this!", "anaContinuation": "I hate this."}"#,
        ]);
        let mut server = SentimentServer::new(KeywordAnalyzer::default(), channel);

        server.serve_one().await.unwrap();

        assert_eq!(
            server.channel().reply_body(0),
            serde_json::json!({"userSentiment": "positive", "anaSentiment": "negative"})
        );
        assert_eq!(&server.channel().replies[0][0][..], REPLY_TOPIC);
    }

    #[tokio::test]
    async fn user_text_is_classified_first() {
        let analyzer = KeywordAnalyzer::default();
        let channel = ScriptedChannel::with_payloads(&[
            r#"{"anaContinuation": "second", "userContinuation": "first"}"#,
        ]);
        let mut server = SentimentServer::new(&analyzer, channel);

        server.serve_one().await.unwrap();

        assert_eq!(*analyzer.calls.borrow(), ["first", "second"]);
    }

    #[tokio::test]
    async fn receive_and_reply_strictly_alternate() {
        let channel = ScriptedChannel::with_payloads(&[
            r#"{"userContinuation": "I love it", "anaContinuation": "ok"}"#,
            "garbage",
            r#"{"userContinuation": "I hate it", "anaContinuation": "ok"}"#,
        ]);
        let mut server = SentimentServer::new(KeywordAnalyzer::default(), channel);

        let err = server.serve().await.unwrap_err();
        assert!(matches!(err, PipelineError::Transport(_)));
        assert_eq!(server.served(), 3);

        use Event::{Received, Replied};
        assert_eq!(
            server.channel().events,
            [Received, Replied, Received, Replied, Received, Replied, Received]
        );
    }

    #[tokio::test]
    async fn malformed_request_gets_error_reply_and_loop_continues() {
        let channel = ScriptedChannel::with_payloads(&[
            r#"{"userContinuation": "only one key"}"#,
            r#"{"userContinuation": "I love it", "anaContinuation": "I hate it"}"#,
        ]);
        let mut server = SentimentServer::new(KeywordAnalyzer::default(), channel);

        server.serve_one().await.unwrap();
        server.serve_one().await.unwrap();

        let error = server.channel().reply_body(0);
        assert!(error["error"]
            .as_str()
            .unwrap()
            .contains("anaContinuation"));
        assert_eq!(server.channel().reply_body(1)["userSentiment"], "positive");
    }

    #[tokio::test]
    async fn inference_failure_gets_error_reply() {
        let channel = ScriptedChannel::with_payloads(&[
            r#"{"userContinuation": "boom", "anaContinuation": "fine"}"#,
        ]);
        let mut server = SentimentServer::new(KeywordAnalyzer::default(), channel);

        server.serve_one().await.unwrap();

        assert_eq!(
            server.channel().reply_body(0),
            serde_json::json!({"error": "inference exploded"})
        );
    }

    #[tokio::test]
    async fn invalid_utf8_payload_gets_error_reply_and_loop_continues() {
        let mut channel = ScriptedChannel::default();
        channel.requests.push_back(vec![
            Bytes::from_static(b"REQ"),
            Bytes::from_static(b"{\"userContinuation\": \"\xff\", \"anaContinuation\": \"ok\"}"),
        ]);
        channel.requests.push_back(vec![
            Bytes::from_static(b"REQ"),
            Bytes::from_static(br#"{"userContinuation": "I love it", "anaContinuation": "ok"}"#),
        ]);
        let mut server = SentimentServer::new(KeywordAnalyzer::default(), channel);

        server.serve_one().await.unwrap();
        server.serve_one().await.unwrap();

        assert!(server.channel().reply_body(0)["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request"));
        assert_eq!(server.channel().reply_body(1)["userSentiment"], "positive");
        assert_eq!(server.served(), 2);
    }

    #[tokio::test]
    async fn missing_payload_frame_gets_error_reply() {
        let mut channel = ScriptedChannel::default();
        channel.requests.push_back(vec![Bytes::from_static(b"REQ")]);
        let mut server = SentimentServer::new(KeywordAnalyzer::default(), channel);

        server.serve_one().await.unwrap();

        assert!(server.channel().reply_body(0)["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request"));
    }
}
