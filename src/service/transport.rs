use bytes::Bytes;
use zeromq::{RepSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use super::server::ReplyChannel;
use crate::error::{PipelineError, Result};

/// A bound ZeroMQ REP socket.
///
/// REP enforces the receive/reply alternation the server relies on.
pub struct ZmqReplyChannel {
    socket: RepSocket,
    endpoint: String,
}

impl ZmqReplyChannel {
    /// Binds a REP socket, e.g. to `tcp://0.0.0.0:8107`. Port `0` picks a free port.
    pub async fn bind(endpoint: &str) -> Result<Self> {
        let mut socket = RepSocket::new();
        let bound = socket.bind(endpoint).await.map_err(|e| {
            PipelineError::Transport(format!("Failed to bind '{endpoint}': {e}"))
        })?;

        tracing::info!(endpoint = %bound, "listening for sentiment requests");

        Ok(Self {
            socket,
            endpoint: bound.to_string(),
        })
    }

    /// The resolved endpoint the socket is bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ReplyChannel for ZmqReplyChannel {
    async fn recv_request(&mut self) -> Result<Vec<Bytes>> {
        let message = self.socket.recv().await?;
        Ok(message.into_vec())
    }

    async fn send_reply(&mut self, frames: Vec<Bytes>) -> Result<()> {
        let message = ZmqMessage::try_from(frames)
            .map_err(|e| PipelineError::Transport(format!("Cannot send reply: {e}")))?;
        self.socket.send(message).await?;
        Ok(())
    }
}
