//! Serves a stub analyzer over a real loopback REP socket.

use anyhow::bail;
use bytes::Bytes;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use sentiment_service::error::{PipelineError, Result};
use sentiment_service::sentiment::{Prediction, SentimentAnalyzer};
use sentiment_service::service::{SentimentServer, ZmqReplyChannel, REPLY_TOPIC};

struct Stub;

impl SentimentAnalyzer for Stub {
    fn analyze(&self, text: &str) -> Result<Prediction> {
        if text.is_empty() {
            return Err(PipelineError::Tokenization("empty input".into()));
        }
        let label = if text.contains("love") { "positive" } else { "negative" };
        Ok(Prediction {
            label: label.into(),
            score: 1.0,
        })
    }
}

async fn round_trip(socket: &mut ReqSocket, payload: &str) -> anyhow::Result<Vec<Bytes>> {
    let mut request = ZmqMessage::from("GPT3 REQ from test");
    request.push_back(Bytes::from(payload.to_string()));
    socket.send(request).await?;
    Ok(socket.recv().await?.into_vec())
}

#[tokio::test]
async fn serves_requests_over_zmq() -> anyhow::Result<()> {
    let channel = ZmqReplyChannel::bind("tcp://127.0.0.1:0").await?;
    let endpoint = channel.endpoint().to_string();
    let mut server = SentimentServer::new(Stub, channel);

    let client = async {
        let mut socket = ReqSocket::new();
        socket.connect(&endpoint).await?;

        let ok = round_trip(
            &mut socket,
            r#"{"userContinuation": "I love this!", "anaContinuation": "I hate this."}"#,
        )
        .await?;
        let failed = round_trip(
            &mut socket,
            r#"{"userContinuation": "", "anaContinuation": "fine"}"#,
        )
        .await?;
        let again = round_trip(
            &mut socket,
            r#"{"userContinuation": "meh", "anaContinuation": "I love it"}"#,
        )
        .await?;
        anyhow::Ok((ok, failed, again))
    };

    let (ok, failed, again) = tokio::select! {
        result = server.serve() => bail!("server stopped: {result:?}"),
        replies = client => replies?,
    };

    assert_eq!(ok.len(), 2);
    assert_eq!(&ok[0][..], REPLY_TOPIC);
    let body: serde_json::Value = serde_json::from_slice(&ok[1])?;
    assert_eq!(
        body,
        serde_json::json!({"userSentiment": "positive", "anaSentiment": "negative"})
    );

    let body: serde_json::Value = serde_json::from_slice(&failed[1])?;
    assert_eq!(body, serde_json::json!({"error": "empty input"}));

    let body: serde_json::Value = serde_json::from_slice(&again[1])?;
    assert_eq!(body["anaSentiment"], "positive");

    assert_eq!(server.served(), 3);
    Ok(())
}
