//! Mock Transport
//!
//! For tests and offline demos. Replays a fixed reply or a script of
//! replies, and remembers every request it saw.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BalanceRequest, BalanceTransport, RawResponse};
use crate::error::TransportError;

type Reply = Result<RawResponse, TransportError>;

enum Mode {
    Always(Reply),
    Script(VecDeque<Reply>),
}

/// Scripted balance transport
pub struct MockTransport {
    mode: Mutex<Mode>,
    requests: Mutex<Vec<BalanceRequest>>,
}

impl MockTransport {
    /// Answer every request with `status` and `body`
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self::always(Ok(RawResponse::new(status, body)))
    }

    /// Fail every request at the transport level
    pub fn failing(error: TransportError) -> Self {
        Self::always(Err(error))
    }

    /// Replay `replies` in order; once exhausted, every request fails
    pub fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self::with_mode(Mode::Script(replies.into_iter().collect()))
    }

    fn always(reply: Reply) -> Self {
        Self::with_mode(Mode::Always(reply))
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode: Mutex::new(mode),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<BalanceRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl BalanceTransport for MockTransport {
    async fn get_balances(&self, request: &BalanceRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().await.push(request.clone());

        let mut mode = self.mode.lock().await;
        match &mut *mode {
            Mode::Always(reply) => reply.clone(),
            Mode::Script(queue) => queue
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("mock script exhausted".into()))),
        }
    }

    fn name(&self) -> &str {
        "MockTransport"
    }
}
