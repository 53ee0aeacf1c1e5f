//! Scripted [`FrameStream`] for exercising sessions without a socket.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::exchange::{FrameStream, StreamFrame};

/// A mock stream with scripted connect/subscribe results and a fixed frame
/// queue.
///
/// `connect()`/`subscribe()` pop the next scripted result (defaulting to
/// `Ok(())` when exhausted). When the frame queue runs dry the stream either
/// reports end-of-stream (`None`, the default, simulating a dropped
/// connection) or blocks forever (`pend_when_empty`, simulating a healthy
/// but quiet connection, useful for stop-signal tests).
pub struct ScriptedFrames {
    connect_results: Mutex<VecDeque<Result<()>>>,
    subscribe_results: Mutex<VecDeque<Result<()>>>,
    frames: Mutex<VecDeque<StreamFrame>>,
    pend_when_empty: bool,
    connect_count: Arc<AtomicU32>,
    subscribe_count: Arc<AtomicU32>,
    subscribed_symbols: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFrames {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect_results: Mutex::new(VecDeque::new()),
            subscribe_results: Mutex::new(VecDeque::new()),
            frames: Mutex::new(VecDeque::new()),
            pend_when_empty: false,
            connect_count: Arc::new(AtomicU32::new(0)),
            subscribe_count: Arc::new(AtomicU32::new(0)),
            subscribed_symbols: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_connect_results(self, results: Vec<Result<()>>) -> Self {
        *self.connect_results.lock() = results.into();
        self
    }

    #[must_use]
    pub fn with_subscribe_results(self, results: Vec<Result<()>>) -> Self {
        *self.subscribe_results.lock() = results.into();
        self
    }

    #[must_use]
    pub fn with_frames(self, frames: Vec<StreamFrame>) -> Self {
        *self.frames.lock() = frames.into();
        self
    }

    /// Block forever once frames are exhausted instead of ending the stream.
    #[must_use]
    pub fn pending_when_empty(mut self) -> Self {
        self.pend_when_empty = true;
        self
    }

    /// Shared counters for asserting connect/subscribe call counts after the
    /// stream has been moved into a session.
    #[must_use]
    pub fn counters(&self) -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        (
            Arc::clone(&self.connect_count),
            Arc::clone(&self.subscribe_count),
        )
    }

    /// Shared record of every symbol subscribed, in order.
    #[must_use]
    pub fn subscriptions(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.subscribed_symbols)
    }
}

impl Default for ScriptedFrames {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameStream for ScriptedFrames {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connect_results.lock().pop_front().unwrap_or(Ok(()))
    }

    async fn subscribe(&mut self, symbol: &str) -> Result<()> {
        self.subscribe_count.fetch_add(1, Ordering::SeqCst);
        self.subscribed_symbols.lock().push(symbol.to_string());
        self.subscribe_results.lock().pop_front().unwrap_or(Ok(()))
    }

    async fn next_frame(&mut self) -> Option<StreamFrame> {
        let frame = self.frames.lock().pop_front();
        if frame.is_none() && self.pend_when_empty {
            return std::future::pending().await;
        }
        frame
    }

    fn venue(&self) -> &'static str {
        "mock"
    }
}
