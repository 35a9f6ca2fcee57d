//! Audio capture model.
//!
//! The recording device is a scoped resource owned by the caller, not an
//! ambient global: a [`AudioSource`] handle is passed in, drained until
//! either the manual [`StopHandle`] fires or the hard duration ceiling
//! expires, and released when the call returns — on error paths too,
//! since the source is only borrowed. Whichever of the two stop signals
//! fires first wins; the other becomes a no-op.
//!
//! Completion is synchronous: `record` returns the accumulated bytes
//! exactly once. No data-available callbacks, no re-entrancy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Result, SealError};

/// Default hard ceiling on recording length.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(10);

/// A pull-based source of encoded audio data.
///
/// Implementations wrap whatever the platform's recorder produces
/// (device capture, a test fixture, a file). `read_chunk` blocks until
/// data is available and returns `None` when the source is exhausted.
pub trait AudioSource {
    /// The container/codec the recorder chose (e.g. `"audio/webm"`).
    /// Transmitted verbatim; the receiver must not assume a default.
    fn mime_type(&self) -> &str;

    /// Next chunk of encoded audio, or `None` at end of stream.
    fn read_chunk(&mut self) -> std::io::Result<Option<Vec<u8>>>;
}

/// Clonable manual-stop signal for an in-progress recording.
///
/// Stopping twice, or stopping after the ceiling already fired, is a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the recording to stop after the chunk currently being
    /// read.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why a recording ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source ran out of data.
    SourceExhausted,
    /// The caller's [`StopHandle`] fired.
    ManualStop,
    /// The hard duration ceiling expired.
    CeilingReached,
}

/// A finished recording.
#[derive(Debug, Clone)]
pub struct Recording {
    pub mime_type: String,
    pub data: Vec<u8>,
    pub duration: Duration,
    pub stop_reason: StopReason,
}

/// Record from `source` until it is exhausted, `stop` fires, or
/// `max_duration` elapses — whichever comes first.
pub fn record<S: AudioSource>(
    source: &mut S,
    max_duration: Duration,
    stop: &StopHandle,
) -> Result<Recording> {
    let started = Instant::now();
    let deadline = started + max_duration;
    let mut data = Vec::new();

    let stop_reason = loop {
        if stop.is_stopped() {
            break StopReason::ManualStop;
        }
        if Instant::now() >= deadline {
            tracing::debug!(
                ceiling_secs = max_duration.as_secs_f64(),
                "recording force-stopped at duration ceiling"
            );
            break StopReason::CeilingReached;
        }
        match source.read_chunk() {
            Ok(Some(chunk)) => data.extend_from_slice(&chunk),
            Ok(None) => break StopReason::SourceExhausted,
            Err(source) => return Err(SealError::Capture { source }),
        }
    };

    let duration = started.elapsed();
    tracing::debug!(
        mime_type = source.mime_type(),
        bytes = data.len(),
        duration_ms = duration.as_millis() as u64,
        ?stop_reason,
        "recording finished"
    );

    Ok(Recording {
        mime_type: source.mime_type().to_string(),
        data,
        duration,
        stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed chunks, optionally stalling to exercise the ceiling.
    struct FakeSource {
        mime: String,
        chunks: Vec<Vec<u8>>,
        stall_per_chunk: Duration,
    }

    impl AudioSource for FakeSource {
        fn mime_type(&self) -> &str {
            &self.mime
        }

        fn read_chunk(&mut self) -> std::io::Result<Option<Vec<u8>>> {
            if self.chunks.is_empty() {
                return Ok(None);
            }
            std::thread::sleep(self.stall_per_chunk);
            Ok(Some(self.chunks.remove(0)))
        }
    }

    #[test]
    fn test_source_exhaustion_accumulates_all_chunks() {
        let mut source = FakeSource {
            mime: "audio/webm".into(),
            chunks: vec![vec![1, 2], vec![3], vec![4, 5, 6]],
            stall_per_chunk: Duration::ZERO,
        };
        let rec = record(&mut source, DEFAULT_MAX_DURATION, &StopHandle::new()).unwrap();
        assert_eq!(rec.data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(rec.mime_type, "audio/webm");
        assert_eq!(rec.stop_reason, StopReason::SourceExhausted);
    }

    #[test]
    fn test_ceiling_force_stops() {
        let mut source = FakeSource {
            mime: "audio/webm".into(),
            chunks: vec![vec![0u8; 16]; 1000],
            stall_per_chunk: Duration::from_millis(5),
        };
        let rec = record(&mut source, Duration::from_millis(30), &StopHandle::new()).unwrap();
        assert_eq!(rec.stop_reason, StopReason::CeilingReached);
        assert!(rec.data.len() < 16 * 1000);
    }

    #[test]
    fn test_manual_stop_wins_when_first() {
        let stop = StopHandle::new();
        stop.stop();
        let mut source = FakeSource {
            mime: "audio/mp4".into(),
            chunks: vec![vec![9u8; 8]; 100],
            stall_per_chunk: Duration::ZERO,
        };
        let rec = record(&mut source, DEFAULT_MAX_DURATION, &stop).unwrap();
        assert_eq!(rec.stop_reason, StopReason::ManualStop);
        assert!(rec.data.is_empty());
    }

    #[test]
    fn test_stop_after_finish_is_noop() {
        let stop = StopHandle::new();
        let mut source = FakeSource {
            mime: "audio/webm".into(),
            chunks: vec![vec![1]],
            stall_per_chunk: Duration::ZERO,
        };
        let rec = record(&mut source, DEFAULT_MAX_DURATION, &stop).unwrap();
        assert_eq!(rec.stop_reason, StopReason::SourceExhausted);
        // Loser's action after the fact changes nothing.
        stop.stop();
        assert_eq!(rec.data, vec![1]);
    }

    #[test]
    fn test_source_error_propagates() {
        struct FailingSource;
        impl AudioSource for FailingSource {
            fn mime_type(&self) -> &str {
                "audio/webm"
            }
            fn read_chunk(&mut self) -> std::io::Result<Option<Vec<u8>>> {
                Err(std::io::Error::other("device unplugged"))
            }
        }
        let err = record(&mut FailingSource, DEFAULT_MAX_DURATION, &StopHandle::new());
        assert!(matches!(err, Err(SealError::Capture { .. })));
    }
}
