//! Local video capture feeding the streaming session.
//!
//! Capture is a blocking, frame-paced activity, so it runs on a dedicated OS
//! thread and hands frames to the async session over a bounded channel.  The
//! [`FrameSource`] trait is the seam: production wires in a camera-backed
//! source, tests and camera-less machines use [`TestPatternSource`].

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use ttycam_core::CharFrame;

/// Pause between captured frames, roughly 15 fps.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(66);

/// Capacity of the capture-to-session channel.  Small on purpose: when the
/// session falls behind, stale frames are worthless and capture should stall
/// rather than queue them up.
const CAPTURE_CHANNEL_CAPACITY: usize = 4;

/// Produces one character frame per call, blocking as needed.
pub trait FrameSource: Send {
    /// Returns the next frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Option<CharFrame>;
}

/// Deterministic animated pattern used when no camera is available.
///
/// Draws a `%` diagonal sweeping across a field of `.` cells, advancing one
/// column per frame.
pub struct TestPatternSource {
    width: usize,
    height: usize,
    tick: usize,
}

impl TestPatternSource {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl FrameSource for TestPatternSource {
    fn next_frame(&mut self) -> Option<CharFrame> {
        let rows = (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        if (row + col) % self.width == self.tick % self.width {
                            '%'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect();
        self.tick = self.tick.wrapping_add(1);
        Some(CharFrame::new(rows))
    }
}

/// Spawns the capture thread and returns the receiving end of its channel.
///
/// The thread paces itself with [`FRAME_INTERVAL`] and exits when `running`
/// clears, the source runs dry, or the session drops the receiver.
pub fn spawn_capture(
    mut source: Box<dyn FrameSource>,
    running: Arc<AtomicBool>,
) -> mpsc::Receiver<CharFrame> {
    let (tx, rx) = mpsc::channel(CAPTURE_CHANNEL_CAPACITY);

    std::thread::spawn(move || {
        info!("capture thread started");
        while running.load(Ordering::Relaxed) {
            let Some(frame) = source.next_frame() else {
                debug!("frame source exhausted");
                break;
            };
            if tx.blocking_send(frame).is_err() {
                break;
            }
            std::thread::sleep(FRAME_INTERVAL);
        }
        info!("capture thread stopped");
    });

    rx
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_pattern_has_requested_dimensions() {
        let mut source = TestPatternSource::new(10, 4);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.num_cols(), 10);
        assert_eq!(frame.num_rows(), 4);
    }

    #[test]
    fn test_test_pattern_animates_between_frames() {
        let mut source = TestPatternSource::new(8, 3);
        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_test_pattern_repeats_with_the_width_period() {
        let mut source = TestPatternSource::new(5, 2);
        let first = source.next_frame().unwrap();
        for _ in 0..4 {
            source.next_frame();
        }
        assert_eq!(source.next_frame().unwrap(), first);
    }

    #[tokio::test]
    async fn test_spawn_capture_delivers_frames_until_stopped() {
        let running = Arc::new(AtomicBool::new(true));
        let mut rx = spawn_capture(
            Box::new(TestPatternSource::new(4, 2)),
            Arc::clone(&running),
        );

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.num_cols(), 4);

        running.store(false, Ordering::Relaxed);
        // Drain whatever was already queued; the channel must then close.
        while rx.recv().await.is_some() {}
    }

    struct OneShotSource(Option<CharFrame>);

    impl FrameSource for OneShotSource {
        fn next_frame(&mut self) -> Option<CharFrame> {
            self.0.take()
        }
    }

    #[tokio::test]
    async fn test_exhausted_source_closes_the_channel() {
        let running = Arc::new(AtomicBool::new(true));
        let frame = CharFrame::new(vec![vec!['#']]);
        let mut rx = spawn_capture(Box::new(OneShotSource(Some(frame.clone()))), running);

        assert_eq!(rx.recv().await, Some(frame));
        assert_eq!(rx.recv().await, None);
    }
}
