//! Threaded playback controller.
//!
//! Owns a decoded song and the row clock: `play()` spawns one playback
//! thread that builds the cpal sink and engine, then ticks the engine
//! every 20 ms. The next row is only scheduled after the current one
//! completes, so ticks never overlap. `stop()` signals the thread and
//! joins it; by the time it returns every channel is silent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use log::error;
use pt_audio::CpalSink;
use pt_engine::{PlaybackEngine, ROW_INTERVAL};
use pt_ir::Song;

pub use pt_formats::DecodeError;

/// Player facade over the decoder, engine and audio backend.
pub struct Player {
    song: Option<Song>,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Player {
    pub fn new() -> Self {
        Self { song: None, playback: None }
    }

    /// The currently loaded song, if any.
    pub fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    /// Decode and load a module.
    ///
    /// Decodes before touching playback: a failed decode leaves the
    /// current song and any running session untouched. On success the
    /// running session (if any) is stopped and the song replaced.
    pub fn load(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let song = pt_formats::decode_module(data)?;
        self.stop();
        self.song = Some(song);
        Ok(())
    }

    /// Start playback from the top. No-op without a loaded song or while
    /// already playing.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        let Some(song) = self.song.clone() else {
            return;
        };

        let stop_signal = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_signal);
        let done = Arc::clone(&finished);

        let thread = std::thread::spawn(move || playback_thread(song, stop, done));

        self.playback = Some(PlaybackHandle {
            stop_signal,
            finished,
            thread: Some(thread),
        });
    }

    /// Stop playback and wait for the playback thread to wind down.
    pub fn stop(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = playback.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

fn playback_thread(song: Song, stop_signal: Arc<AtomicBool>, finished: Arc<AtomicBool>) {
    let sink = match CpalSink::new() {
        Ok(sink) => sink,
        Err(e) => {
            error!("failed to open audio output: {e}");
            finished.store(true, Ordering::Relaxed);
            return;
        }
    };

    let mut engine = PlaybackEngine::new(Box::new(sink));
    if let Err(e) = engine.load(song) {
        error!("failed to load song: {e}");
        finished.store(true, Ordering::Relaxed);
        return;
    }
    engine.play();

    while !stop_signal.load(Ordering::Relaxed) {
        let started = Instant::now();
        engine.tick();
        let elapsed = started.elapsed();
        if elapsed < ROW_INTERVAL {
            std::thread::sleep(ROW_INTERVAL - elapsed);
        }
    }

    engine.stop();
    finished.store(true, Ordering::Relaxed);
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}
