//! Sends one request to a running `sentiment-service serve` and prints the reply.
//!
//! Run with: cargo run --example client -- "I love this!" "I hate this."

use bytes::Bytes;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let user = args.next().unwrap_or_else(|| "I love this!".to_string());
    let ana = args.next().unwrap_or_else(|| "I hate this.".to_string());
    let endpoint =
        std::env::var("SENTIMENT_ENDPOINT").unwrap_or_else(|_| "tcp://127.0.0.1:8107".into());

    let mut socket = ReqSocket::new();
    socket.connect(&endpoint).await?;

    let payload = serde_json::json!({
        "userContinuation": user,
        "anaContinuation": ana,
    });
    let mut request = ZmqMessage::from("GPT3 REQ from demo client");
    request.push_back(Bytes::from(serde_json::to_vec(&payload)?));

    socket.send(request).await?;
    let reply = socket.recv().await?.into_vec();

    for (i, frame) in reply.iter().enumerate() {
        println!("frame {i}: {}", String::from_utf8_lossy(frame));
    }

    Ok(())
}
