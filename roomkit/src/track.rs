//! Track identifiers and the local track implementations.

use crate::frame::{VideoFrame, VideoSource};
use crate::processor::TrackProcessor;
use crate::error::{Result, RoomError};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// Capture pacing
const TARGET_FPS: f64 = 30.0;
const FRAME_DURATION: Duration = Duration::from_millis((1000.0 / TARGET_FPS) as u64);

/// Server-assigned identifier of a published track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackSid(String);

impl TrackSid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TrackSid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TrackSid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Media kind of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }
}

/// Where a track comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSource {
    Camera,
    Microphone,
    ScreenShare,
    Unknown,
}

/// The local camera track.
///
/// Owns a capture thread that pulls frames from its [`VideoSource`] at
/// ~30 fps, runs the installed [`TrackProcessor`] over each frame, and
/// fans the result out to frame subscribers (the UI preview, an encoder
/// in a real engine).
pub struct LocalVideoTrack {
    shared: Arc<VideoTrackShared>,
}

struct VideoTrackShared {
    width: u32,
    height: u32,
    enabled: AtomicBool,
    running: AtomicBool,
    generation: AtomicU64,
    processor_errors: AtomicU64,
    processor: Mutex<Option<Box<dyn TrackProcessor>>>,
    sinks: Mutex<Vec<Sender<VideoFrame>>>,
}

impl LocalVideoTrack {
    /// Starts the capture loop on a dedicated thread.
    pub(crate) fn start(source: Box<dyn VideoSource>) -> Self {
        let shared = Arc::new(VideoTrackShared {
            width: source.width(),
            height: source.height(),
            enabled: AtomicBool::new(true),
            running: AtomicBool::new(true),
            generation: AtomicU64::new(0),
            processor_errors: AtomicU64::new(0),
            processor: Mutex::new(None),
            sinks: Mutex::new(Vec::new()),
        });
        let capture_shared = Arc::clone(&shared);
        thread::spawn(move || run_capture_loop(capture_shared, source));
        Self { shared }
    }

    pub fn width(&self) -> u32 {
        self.shared.width
    }

    pub fn height(&self) -> u32 {
        self.shared.height
    }

    /// Installs a processor, replacing any active one.
    pub fn set_processor(&self, processor: Box<dyn TrackProcessor>) -> Result<()> {
        let mut guard = self
            .shared
            .processor
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        *guard = Some(processor);
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Removes the active processor. Removing when none is installed is a
    /// no-op and does not advance the generation counter.
    pub fn stop_processor(&self) -> Result<()> {
        let mut guard = self
            .shared
            .processor
            .lock()
            .map_err(|_| RoomError::LockPoisoned)?;
        if guard.take().is_some() {
            self.shared.generation.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Name of the active processor, if any.
    pub fn processor_name(&self) -> Option<&'static str> {
        self.shared
            .processor
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|p| p.name()))
    }

    /// Counts processor installs and removals. Useful for asserting that a
    /// repeated selection did not reinstall anything.
    pub fn processor_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Frames forwarded unprocessed because the processor failed.
    pub fn processor_errors(&self) -> u64 {
        self.shared.processor_errors.load(Ordering::Relaxed)
    }

    /// Pauses or resumes capture. While disabled no frames are produced.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }

    /// Registers a frame sink. The receiver gets every processed frame
    /// until the track stops or the receiver is dropped.
    pub fn subscribe_frames(&self) -> Receiver<VideoFrame> {
        let (tx, rx) = channel();
        if let Ok(mut sinks) = self.shared.sinks.lock() {
            sinks.push(tx);
        }
        rx
    }

    /// Stops the capture thread. Idempotent.
    pub(crate) fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
    }
}

fn run_capture_loop(shared: Arc<VideoTrackShared>, mut source: Box<dyn VideoSource>) {
    while shared.running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        if !shared.enabled.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(100));
            continue;
        }

        match source.next_frame() {
            Ok(mut frame) => {
                {
                    let Ok(mut processor) = shared.processor.lock() else {
                        break;
                    };
                    if let Some(active) = processor.as_mut()
                        && active.process(&mut frame).is_err()
                    {
                        shared.processor_errors.fetch_add(1, Ordering::Relaxed);
                    }
                }

                {
                    let Ok(mut sinks) = shared.sinks.lock() else {
                        break;
                    };
                    sinks.retain(|sink| sink.send(frame.clone()).is_ok());
                }

                let elapsed = frame_start.elapsed();
                if elapsed < FRAME_DURATION {
                    thread::sleep(FRAME_DURATION - elapsed);
                }
            }
            Err(_) => {
                thread::sleep(Duration::from_millis(500));
            }
        }
    }
}

/// The local microphone track. No audio flows through the bundled backend,
/// so this is the mute switch and the publication bookkeeping around it.
pub struct LocalAudioTrack {
    muted: AtomicBool,
}

impl LocalAudioTrack {
    pub(crate) fn new() -> Self {
        Self {
            muted: AtomicBool::new(false),
        }
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }
}
