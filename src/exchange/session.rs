//! Streaming session: one push-stream subscription, decoded onto the bus.
//!
//! A [`StreamingSession`] owns exactly one (symbol, topic) subscription. Raw
//! frames come in through the narrow [`FrameStream`] transport boundary, get
//! decoded into [`StreamEvent`]s, and are published through the owning
//! adapter's [`EventBus`]. The loop runs on its own tokio task until the
//! [`SessionHandle`] stop signal fires; an unattended client that silently
//! dies after one disconnect is not acceptable, so disconnects reconnect
//! with exponential backoff and re-issue the same subscription.
//!
//! A stopped session is finished: subscribing again creates a fresh session
//! instead of reviving this one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::events::{EventBus, StreamEvent, Topic};
use crate::error::Result;

/// One message off a venue's push connection, prior to decoding.
#[derive(Debug, Clone)]
pub enum StreamFrame {
    /// A payload frame.
    Text(String),
    /// The connection dropped; the session will reconnect.
    Disconnected { reason: String },
}

/// Narrow transport boundary for push streams.
///
/// Implementations own the socket; they do not decode payloads and they do
/// not reconnect. Both are this module's job.
#[async_trait]
pub trait FrameStream: Send {
    /// Establish the underlying connection.
    async fn connect(&mut self) -> Result<()>;

    /// Subscribe the connection to `symbol`'s feed.
    async fn subscribe(&mut self, symbol: &str) -> Result<()>;

    /// Next frame, or `None` when the stream is closed.
    async fn next_frame(&mut self) -> Option<StreamFrame>;

    /// Venue name for logging.
    fn venue(&self) -> &'static str;
}

/// Exponential backoff parameters for reconnection.
#[derive(Debug, Clone, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first reconnection attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Ceiling on the delay between attempts (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each failed attempt.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Backoff state machine. Delays grow geometrically up to the cap and reset
/// after a healthy event; ±20% jitter keeps reconnect herds apart.
struct Backoff {
    config: BackoffConfig,
    current_ms: u64,
}

impl Backoff {
    fn new(config: BackoffConfig) -> Self {
        let initial = config.initial_delay_ms;
        Self {
            config,
            current_ms: initial,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        let delay = Duration::from_millis((self.current_ms as f64 * jitter) as u64);

        let grown = (self.current_ms as f64 * self.config.multiplier) as u64;
        self.current_ms = grown.min(self.config.max_delay_ms);

        delay
    }

    fn reset(&mut self) {
        self.current_ms = self.config.initial_delay_ms;
    }
}

/// Decoder from a raw payload to a canonical event.
///
/// `Ok(None)` means the frame is valid but carries nothing to publish
/// (subscription acks, heartbeats). `Err` drops the single frame with a
/// logged diagnostic and never terminates the session.
pub type FrameDecoder = Box<dyn Fn(&str) -> Result<Option<StreamEvent>> + Send>;

/// Handle to a running session. Dropping the handle does NOT stop the
/// session; cancellation is explicit.
#[derive(Debug)]
pub struct SessionHandle {
    stop_tx: watch::Sender<bool>,
    active: Arc<AtomicBool>,
    symbol: String,
    topic: Topic,
}

impl SessionHandle {
    /// Signal the session to tear down its connection and exit.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Whether the session loop is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.topic
    }
}

/// The owner of one (symbol, topic) push subscription.
pub struct StreamingSession<S: FrameStream> {
    stream: S,
    symbol: String,
    topic: Topic,
    decoder: FrameDecoder,
    bus: Arc<EventBus>,
    backoff: Backoff,
}

impl<S: FrameStream + 'static> StreamingSession<S> {
    /// Start the session on its own task and return its stop handle.
    pub fn spawn(
        stream: S,
        symbol: impl Into<String>,
        topic: Topic,
        decoder: FrameDecoder,
        bus: Arc<EventBus>,
        backoff: BackoffConfig,
    ) -> SessionHandle {
        let symbol = symbol.into();
        let (stop_tx, stop_rx) = watch::channel(false);
        let active = Arc::new(AtomicBool::new(true));

        let session = Self {
            stream,
            symbol: symbol.clone(),
            topic,
            decoder,
            bus,
            backoff: Backoff::new(backoff),
        };

        let task_active = Arc::clone(&active);
        tokio::spawn(async move {
            session.run(stop_rx).await;
            task_active.store(false, Ordering::SeqCst);
        });

        SessionHandle {
            stop_tx,
            active,
            symbol,
            topic,
        }
    }

    async fn run(mut self, mut stop_rx: watch::Receiver<bool>) {
        info!(
            venue = self.stream.venue(),
            symbol = %self.symbol,
            topic = ?self.topic,
            "starting streaming session"
        );

        'session: loop {
            // Establish (or re-establish) the subscription, backing off on
            // failure until connected or told to stop.
            loop {
                if *stop_rx.borrow() {
                    break 'session;
                }
                match self.connect_and_subscribe().await {
                    Ok(()) => break,
                    Err(e) => {
                        let delay = self.backoff.next_delay();
                        warn!(
                            venue = self.stream.venue(),
                            symbol = %self.symbol,
                            error = %e,
                            delay_ms = delay.as_millis(),
                            "connect failed, backing off"
                        );
                        if wait_or_stopped(&mut stop_rx, delay).await {
                            break 'session;
                        }
                    }
                }
            }

            // Frame loop: decode and publish until stop or disconnect.
            loop {
                tokio::select! {
                    () = stop_signalled(&mut stop_rx) => break 'session,
                    frame = self.stream.next_frame() => {
                        let reason = match frame {
                            Some(StreamFrame::Text(text)) => {
                                self.handle_frame(&text);
                                continue;
                            }
                            Some(StreamFrame::Disconnected { reason }) => reason,
                            None => "stream ended".to_string(),
                        };

                        let delay = self.backoff.next_delay();
                        warn!(
                            venue = self.stream.venue(),
                            symbol = %self.symbol,
                            reason = %reason,
                            delay_ms = delay.as_millis(),
                            "connection lost, reconnecting"
                        );
                        if wait_or_stopped(&mut stop_rx, delay).await {
                            break 'session;
                        }
                        continue 'session;
                    }
                }
            }
        }

        info!(
            venue = self.stream.venue(),
            symbol = %self.symbol,
            topic = ?self.topic,
            "streaming session stopped"
        );
    }

    async fn connect_and_subscribe(&mut self) -> Result<()> {
        self.stream.connect().await?;
        self.stream.subscribe(&self.symbol).await?;
        debug!(
            venue = self.stream.venue(),
            symbol = %self.symbol,
            "subscribed"
        );
        Ok(())
    }

    fn handle_frame(&mut self, text: &str) {
        match (self.decoder)(text) {
            Ok(Some(event)) => {
                self.backoff.reset();
                self.bus.publish(self.topic, &event);
            }
            Ok(None) => {}
            Err(e) => {
                // A single bad frame never terminates the session.
                warn!(error = %e, raw = %text, "dropping undecodable frame");
            }
        }
    }
}

/// Resolve only when a stop was explicitly signalled.
///
/// A dropped [`SessionHandle`] closes the channel without signalling; that
/// must NOT stop the session (cancellation is explicit, never implied by
/// caller-side cleanup), so channel closure parks this future forever.
async fn stop_signalled(stop_rx: &mut watch::Receiver<bool>) {
    loop {
        if *stop_rx.borrow() {
            return;
        }
        if stop_rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleep for `delay`, returning `true` if the stop signal fired first.
async fn wait_or_stopped(stop_rx: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        () = stop_signalled(stop_rx) => true,
        () = sleep(delay) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_to_cap_and_resets() {
        let mut backoff = Backoff::new(BackoffConfig {
            initial_delay_ms: 100,
            max_delay_ms: 350,
            multiplier: 2.0,
        });

        // Jitter is ±20%, so compare against generous bounds.
        let first = backoff.next_delay().as_millis() as u64;
        assert!((80..=120).contains(&first), "first delay {first}");

        let second = backoff.next_delay().as_millis() as u64;
        assert!((160..=240).contains(&second), "second delay {second}");

        // Growth is capped.
        let third = backoff.next_delay().as_millis() as u64;
        assert!(third <= 420, "capped delay {third}");

        backoff.reset();
        let after_reset = backoff.next_delay().as_millis() as u64;
        assert!((80..=120).contains(&after_reset), "reset delay {after_reset}");
    }
}
