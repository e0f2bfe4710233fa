//! Serialized frame delivery
//!
//! Capture streams push frames into a bounded channel; one task drains it
//! and hands each frame to the consumer, so frame handling never runs
//! concurrently and always sees frames in arrival order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::types::{Handle, VideoFrame};

/// Receives every frame delivered by the active session
pub trait FrameConsumer: Send + Sync + 'static {
    /// Handle one frame
    fn on_frame(&self, frame: VideoFrame);

    /// Accept frames from `session` only; `None` rejects everything
    fn set_active_session(&self, session: Option<Handle>);

    /// Frames accepted from `session` while it was active
    fn frames_from(&self, session: Handle) -> u64;
}

/// Producer half of the delivery queue, handed to capture streams
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: mpsc::Sender<VideoFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameSender {
    /// Create a bounded queue without a draining task
    pub fn channel(depth: usize) -> (Self, mpsc::Receiver<VideoFrame>) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Queue a frame without waiting.
    ///
    /// Returns false when the queue is full (the frame is dropped) or closed.
    pub fn try_deliver(&self, frame: VideoFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(frame)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                trace!(
                    "Delivery queue full, dropped frame {} of {} ({} total)",
                    frame.sequence,
                    frame.session,
                    dropped
                );
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Whether the draining side has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Frames dropped because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Bounded queue drained by a single task
pub struct FrameQueue {
    sender: FrameSender,
    delivered: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl FrameQueue {
    /// Spawn the draining task on the current tokio runtime
    pub fn spawn(consumer: Arc<dyn FrameConsumer>, depth: usize) -> Self {
        let (sender, mut rx) = FrameSender::channel(depth);
        let delivered = Arc::new(AtomicU64::new(0));
        let counter = delivered.clone();

        let task = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                consumer.on_frame(frame);
                counter.fetch_add(1, Ordering::Relaxed);
            }
            debug!("Frame delivery queue closed");
        });

        Self {
            sender,
            delivered,
            task,
        }
    }

    /// Sender to register with capture streams
    pub fn sender(&self) -> FrameSender {
        self.sender.clone()
    }

    /// Frames handed to the consumer so far
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Frames dropped because the queue was full
    pub fn dropped(&self) -> u64 {
        self.sender.dropped()
    }

    /// Stop draining. Frames still queued are discarded.
    pub fn close(self) {
        self.task.abort();
    }
}
