//! High-level scale interface

use std::time::Duration;

use bytes::Bytes;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use hfscale_core::constants::DEFAULT_TIMEOUT_MS;
use hfscale_core::{Command, Session, Step};
use hfscale_transport::{Error as TransportError, TcpTransport, Transport};
use hfscale_types::{Outcome, ScaleAddress};

use crate::error::Error;

/// Default response deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Networked scale
///
/// Every operation opens its own TCP connection, sends one command, waits
/// for the reply and closes. Nothing is kept between calls, so a `Scale` can
/// be shared freely and operations may run concurrently.
///
/// # Examples
///
/// ```no_run
/// use hfscale::Scale;
///
/// #[tokio::main]
/// async fn main() {
///     let scale = Scale::new("192.168.1.50", 4001);
///
///     let outcome = scale.read_weight().await;
///     println!("{}", outcome);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Scale {
    address: ScaleAddress,
    timeout: Duration,
}

impl Scale {
    /// Create a handle for the scale at `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::from_address(ScaleAddress::new(host, port))
    }

    pub fn from_address(address: ScaleAddress) -> Self {
        Self {
            address,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the response deadline (measured from the connection attempt)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &ScaleAddress {
        &self.address
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read gross, tare and net weight
    pub async fn read_weight(&self) -> Outcome {
        self.execute(Command::ReadWeight).await
    }

    /// Execute a tare; on success the preset tare is cleared as well
    pub async fn execute_tare(&self) -> Outcome {
        self.execute(Command::ExecuteTare).await
    }

    /// Read the scale's status code
    pub async fn read_status(&self) -> Outcome {
        self.execute(Command::ReadStatus).await
    }

    pub async fn clear_preset_tare(&self) -> Outcome {
        self.execute(Command::ClearPresetTare).await
    }

    /// Store a preset tare, in kilograms
    ///
    /// Values outside 0.0..=30.0 kg are rejected without contacting the scale.
    pub async fn set_preset_tare(&self, value_kg: f64) -> Outcome {
        match Command::preset_tare(value_kg) {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                warn!(value_kg, "Rejected preset tare: {}", e);
                Error::from(e).to_outcome()
            }
        }
    }

    /// Send a command
    pub async fn execute(&self, command: Command) -> Outcome {
        info!("{} -> {}", command, self.address);
        self.send_command(&command.encode()).await
    }

    /// Send a pre-built frame
    pub async fn send_command(&self, frame: &[u8]) -> Outcome {
        send_command_with_timeout(&self.address, frame, self.timeout).await
    }
}

/// Send one frame to the scale at `address` with the default deadline
pub async fn send_command(address: &ScaleAddress, frame: &[u8]) -> Outcome {
    send_command_with_timeout(address, frame, DEFAULT_TIMEOUT).await
}

/// Send one frame to the scale at `address`
pub async fn send_command_with_timeout(
    address: &ScaleAddress,
    frame: &[u8],
    limit: Duration,
) -> Outcome {
    let mut transport =
        TcpTransport::new(address.host.clone(), address.port).with_connect_timeout(limit);

    run_session(&mut transport, frame, limit).await
}

/// Drive one command exchange over `transport`
///
/// The deadline starts before the connection attempt and covers the
/// chained clear-preset exchange too. The transport is always disconnected
/// before returning, and an outcome is always produced.
pub async fn run_session<T>(transport: &mut T, frame: &[u8], limit: Duration) -> Outcome
where
    T: Transport + ?Sized,
{
    let deadline = Instant::now() + limit;
    debug!(
        command = ?Command::identify(frame),
        remote = %transport.remote_addr(),
        "Starting session"
    );

    let mut session = Session::new(Bytes::copy_from_slice(frame));

    let outcome = exchange(transport, &mut session, deadline).await;

    if transport.is_connected() {
        if let Err(e) = transport.disconnect().await {
            warn!("Failed to close connection to {}: {}", transport.remote_addr(), e);
        }
    }

    debug!(kind = outcome.kind(), "Session finished");
    outcome
}

async fn exchange<T>(transport: &mut T, session: &mut Session, deadline: Instant) -> Outcome
where
    T: Transport + ?Sized,
{
    match timeout_at(deadline, transport.connect()).await {
        Err(_) => return session.on_timeout(),
        Ok(Err(e)) if e.is_timeout() => return session.on_timeout(),
        Ok(Err(e)) => return failed(session, transport, e),
        Ok(Ok(())) => {}
    }

    let mut outgoing = Some(session.connected());

    loop {
        if let Some(frame) = outgoing.take() {
            match timeout_at(deadline, transport.send(&frame)).await {
                Err(_) => return session.on_timeout(),
                Ok(Err(e)) => return failed(session, transport, e),
                Ok(Ok(())) => {}
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        let chunk = match timeout_at(deadline, transport.receive(remaining)).await {
            Err(_) => return session.on_timeout(),
            Ok(Err(e)) if e.is_timeout() => return session.on_timeout(),
            Ok(Err(TransportError::ConnectionClosed)) => return session.on_closed(),
            Ok(Err(e)) => return failed(session, transport, e),
            Ok(Ok(chunk)) => chunk,
        };

        match session.on_data(&chunk) {
            Step::Pending => {}
            Step::Send(frame) => outgoing = Some(frame),
            Step::Complete(outcome) => return outcome,
        }
    }
}

fn failed<T>(session: &mut Session, transport: &T, err: TransportError) -> Outcome
where
    T: Transport + ?Sized,
{
    warn!("Transport error with {}: {}", transport.remote_addr(), err);
    session.on_error(err.to_string())
}
