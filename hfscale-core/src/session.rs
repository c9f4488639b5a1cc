//! Session state machine
//!
//! A session covers one command on one connection:
//!
//! ```text
//! Connecting ──► AwaitingPrimaryResponse ──► Closed
//!                        │                     ▲
//!                        │ tare succeeded      │
//!                        ▼                     │
//!                AwaitingChainedResponse ──────┘
//! ```
//!
//! Every state can also end in an error outcome. The state machine does no
//! I/O; the caller feeds it received bytes and performs the writes it asks
//! for. A successful execute-tare is always followed by exactly one
//! clear-preset-tare on the same connection.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use hfscale_types::Outcome;

use crate::command::Command;
use crate::response::decode_response;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection not yet established
    Connecting,

    /// Command written, waiting for its reply
    AwaitingPrimaryResponse,

    /// Tare succeeded and clear-preset-tare was written
    AwaitingChainedResponse,

    /// A terminal outcome has been produced
    Closed,
}

/// What the caller must do next
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep reading
    Pending,

    /// Write this frame on the same connection, then keep reading
    Send(Bytes),

    /// Close the connection and return this outcome
    Complete(Outcome),
}

/// One command exchange
#[derive(Debug)]
pub struct Session {
    /// Frame the caller asked to send
    command: Bytes,

    /// Frame whose reply is currently expected
    expected: Bytes,

    state: SessionState,

    /// Bytes received for the current reply
    buffer: BytesMut,

    /// Tare outcome held while the chained reply is outstanding
    primary: Option<Outcome>,
}

impl Session {
    /// Create a session for a pre-built command frame
    pub fn new(command: impl Into<Bytes>) -> Self {
        let command = command.into();

        Self {
            expected: command.clone(),
            command,
            state: SessionState::Connecting,
            buffer: BytesMut::with_capacity(64),
            primary: None,
        }
    }

    /// Frame the session was created for
    pub fn command(&self) -> &Bytes {
        &self.command
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Bytes accumulated for the reply currently awaited
    pub fn received(&self) -> &[u8] {
        &self.buffer
    }

    /// Connection is up; returns the frame to write
    pub fn connected(&mut self) -> Bytes {
        if self.state == SessionState::Connecting {
            self.state = SessionState::AwaitingPrimaryResponse;
        }

        self.command.clone()
    }

    /// Feed bytes received from the connection
    ///
    /// The whole accumulated buffer is decoded after every chunk, so a reply
    /// split across reads is recognized once its last piece arrives.
    pub fn on_data(&mut self, chunk: &[u8]) -> Step {
        if !matches!(
            self.state,
            SessionState::AwaitingPrimaryResponse | SessionState::AwaitingChainedResponse
        ) {
            trace!(state = ?self.state, len = chunk.len(), "Ignoring bytes outside a reply window");
            return Step::Pending;
        }

        self.buffer.extend_from_slice(chunk);
        trace!("RX {} bytes, {} buffered: {}", chunk.len(), self.buffer.len(), hex::encode(chunk));

        let outcome = decode_response(&self.buffer, &self.expected);
        if outcome.is_error() {
            return Step::Pending;
        }

        match self.state {
            SessionState::AwaitingPrimaryResponse if self.should_chain(&outcome) => {
                debug!("Tare succeeded, sending clear preset tare");

                let follow_up = Command::ClearPresetTare.encode();
                self.expected = follow_up.clone();
                self.primary = Some(outcome);
                self.buffer.clear();
                self.state = SessionState::AwaitingChainedResponse;

                Step::Send(follow_up)
            }
            _ => self.complete(outcome),
        }
    }

    /// Deadline elapsed
    pub fn on_timeout(&mut self) -> Outcome {
        if let Some(primary) = self.primary.take() {
            warn!("No reply to clear preset tare before the deadline, returning tare result");
            self.state = SessionState::Closed;
            return primary;
        }

        self.state = SessionState::Closed;
        Outcome::error(format!("No response from scale, raw: {}", self.raw_hex()))
    }

    /// Peer closed the connection before a reply was recognized
    pub fn on_closed(&mut self) -> Outcome {
        if let Some(primary) = self.primary.take() {
            warn!("Connection closed before clear preset tare reply, returning tare result");
            self.state = SessionState::Closed;
            return primary;
        }

        self.state = SessionState::Closed;
        Outcome::error(format!("No response parsed, raw: {}", self.raw_hex()))
    }

    /// Transport failed
    pub fn on_error(&mut self, message: impl Into<String>) -> Outcome {
        self.state = SessionState::Closed;
        self.primary = None;
        Outcome::error(message)
    }

    fn should_chain(&self, outcome: &Outcome) -> bool {
        matches!(outcome, Outcome::Tare(result) if result.success)
            && Command::ExecuteTare.matches(&self.command)
    }

    fn complete(&mut self, outcome: Outcome) -> Step {
        debug!(kind = outcome.kind(), "Reply decoded");
        self.state = SessionState::Closed;
        self.primary = None;
        Step::Complete(outcome)
    }

    fn raw_hex(&self) -> String {
        if self.buffer.is_empty() {
            "none".to_string()
        } else {
            hex::encode(&self.buffer)
        }
    }
}
