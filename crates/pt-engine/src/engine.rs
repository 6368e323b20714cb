//! The playback engine.

use std::sync::Arc;

use log::{debug, warn};
use pt_ir::{gain_for_volume, playback_rate, Song, CHANNELS};
use thiserror::Error;

use crate::channel::ChannelSlot;
use crate::sink::AudioSink;
use crate::transport::Transport;

/// Engine state errors. Playback-time anomalies (missing sample data,
/// period 0) are never errors; they are skipped defensively.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// `load()` was called while playback is running. Stop first.
    #[error("cannot replace the loaded song while playing")]
    ReplaceWhilePlaying,
}

/// Drives a decoded [`Song`] through an injected [`AudioSink`].
///
/// Two states: Stopped (no transport, no active voices) and Playing. The
/// row clock calls [`tick`](Self::tick) once per 20 ms row while Playing;
/// a tick after [`stop`](Self::stop) is a no-op.
pub struct PlaybackEngine {
    sink: Box<dyn AudioSink>,
    song: Option<Song>,
    channels: [ChannelSlot; CHANNELS as usize],
    transport: Transport,
    playing: bool,
}

impl PlaybackEngine {
    /// Create an engine on top of an audio sink. No song is loaded yet.
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            song: None,
            channels: Default::default(),
            transport: Transport::default(),
            playing: false,
        }
    }

    /// The currently loaded song.
    pub fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    /// The current playback position.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Is playback running?
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Replace the held song. Only valid while stopped; the previous song
    /// stays loaded when this fails.
    pub fn load(&mut self, song: Song) -> Result<(), EngineError> {
        if self.playing {
            return Err(EngineError::ReplaceWhilePlaying);
        }
        self.song = Some(song);
        Ok(())
    }

    /// Enter the Playing state at pattern 0, row 0.
    ///
    /// No-op without a loaded song, or when already playing. The caller's
    /// row clock is expected to tick immediately so row 0 sounds right
    /// away.
    pub fn play(&mut self) {
        if self.playing || self.song.is_none() {
            return;
        }
        self.transport.reset();
        self.playing = true;
    }

    /// Stop playback: silence all four channels and reset the transport.
    pub fn stop(&mut self) {
        self.playing = false;
        for channel in &mut self.channels {
            channel.silence();
        }
        self.transport.reset();
    }

    /// Process one row: trigger voices for the current row's note cells,
    /// then advance the transport (wrapping by raw pattern count).
    ///
    /// A cell triggers only when it carries both a sample number and a
    /// period and the referenced slot has PCM data; anything else is
    /// skipped, never an error.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }

        // Gather this row's triggers first; the sink borrow below must not
        // overlap the song borrow.
        let mut triggers: [Option<(Arc<[f32]>, u16, u8)>; CHANNELS as usize] = Default::default();
        let pattern_count = {
            let Some(song) = self.song.as_ref() else {
                return;
            };
            if song.patterns.is_empty() {
                return;
            }
            let pattern = &song.patterns[self.transport.pattern_index];
            for channel in 0..CHANNELS {
                let cell = *pattern.cell(self.transport.row, channel);
                if !cell.is_note_trigger() {
                    continue;
                }
                let Some(slot) = song.sample_for_number(cell.sample_number) else {
                    warn!(
                        "row {}: channel {} references sample {} out of range",
                        self.transport.row, channel, cell.sample_number
                    );
                    continue;
                };
                let Some(pcm) = slot.pcm.as_ref() else {
                    warn!(
                        "row {}: channel {} references sample {} with no data",
                        self.transport.row, channel, cell.sample_number
                    );
                    continue;
                };
                triggers[channel as usize] = Some((Arc::clone(pcm), cell.period, slot.volume));
            }
            song.patterns.len()
        };

        for (channel, trigger) in triggers.iter_mut().enumerate() {
            if let Some((pcm, period, volume)) = trigger.take() {
                let rate = playback_rate(period, self.sink.sample_rate());
                let gain = gain_for_volume(volume);
                debug!(
                    "trigger: channel {channel} period {period} rate {rate:.5} gain {gain:.3}"
                );
                let handle = self.sink.start_voice(pcm, rate, gain);
                self.channels[channel].hold(handle);
            }
        }

        if self.transport.advance_row(pattern_count) {
            debug!("entering pattern {}", self.transport.pattern_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::VoiceHandle;
    use arrayvec::ArrayString;
    use pt_ir::{Pattern, SampleSlot, AMIGA_PAL_CLOCK, ROWS};
    use std::cell::RefCell;
    use std::rc::Rc;

    const RATE: u32 = 44100;

    #[derive(Clone, Debug, PartialEq)]
    enum SinkEvent {
        Start { voice: usize, rate: f64, gain: f32, pcm_len: usize },
        Stop { voice: usize },
    }

    #[derive(Default)]
    struct MockSink {
        events: Rc<RefCell<Vec<SinkEvent>>>,
        next_voice: usize,
    }

    struct MockVoice {
        voice: usize,
        events: Rc<RefCell<Vec<SinkEvent>>>,
    }

    impl AudioSink for MockSink {
        fn sample_rate(&self) -> u32 {
            RATE
        }

        fn start_voice(&mut self, pcm: Arc<[f32]>, rate: f64, gain: f32) -> Box<dyn VoiceHandle> {
            let voice = self.next_voice;
            self.next_voice += 1;
            self.events.borrow_mut().push(SinkEvent::Start {
                voice,
                rate,
                gain,
                pcm_len: pcm.len(),
            });
            Box::new(MockVoice { voice, events: self.events.clone() })
        }
    }

    impl VoiceHandle for MockVoice {
        fn stop(&mut self) {
            self.events.borrow_mut().push(SinkEvent::Stop { voice: self.voice });
        }
    }

    fn sample(volume: u8) -> SampleSlot {
        SampleSlot {
            length_words: 2,
            volume,
            pcm: Some(Arc::from(vec![0.0f32, 0.5, -0.5, 0.25])),
            ..Default::default()
        }
    }

    fn song(patterns: Vec<Pattern>) -> Song {
        let mut samples = vec![SampleSlot::default(); 31];
        samples[0] = sample(64);
        samples[1] = sample(32);
        Song {
            title: ArrayString::new(),
            samples,
            patterns,
            order: vec![0],
        }
    }

    fn engine_with(patterns: Vec<Pattern>) -> (PlaybackEngine, Rc<RefCell<Vec<SinkEvent>>>) {
        let sink = MockSink::default();
        let events = sink.events.clone();
        let mut engine = PlaybackEngine::new(Box::new(sink));
        engine.load(song(patterns)).unwrap();
        (engine, events)
    }

    fn note(period: u16, sample_number: u8) -> pt_ir::NoteCell {
        pt_ir::NoteCell { period, sample_number, ..Default::default() }
    }

    #[test]
    fn play_without_song_is_a_noop() {
        let mut engine = PlaybackEngine::new(Box::<MockSink>::default());
        engine.play();
        assert!(!engine.is_playing());
    }

    #[test]
    fn load_while_playing_is_rejected() {
        let (mut engine, _) = engine_with(vec![Pattern::new()]);
        engine.play();
        assert_eq!(
            engine.load(song(vec![Pattern::new()])),
            Err(EngineError::ReplaceWhilePlaying)
        );
        // The old song stays loaded and playback keeps running
        assert!(engine.is_playing());
        assert!(engine.song().is_some());
    }

    #[test]
    fn tick_while_stopped_is_a_noop() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 0) = note(428, 1);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.tick();
        assert!(events.borrow().is_empty());
        assert_eq!(engine.transport(), Transport::default());
    }

    #[test]
    fn row_trigger_uses_period_and_volume() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 1) = note(428, 2);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();

        let expected_rate = (AMIGA_PAL_CLOCK / 856.0) / RATE as f64;
        let recorded = events.borrow();
        assert_eq!(recorded.len(), 1);
        let SinkEvent::Start { rate, gain, pcm_len, .. } = recorded[0].clone() else {
            panic!("expected a start event");
        };
        assert!((rate - expected_rate).abs() < 1e-9);
        assert_eq!(gain, 0.5);
        assert_eq!(pcm_len, 4);
    }

    #[test]
    fn period_zero_never_triggers() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 0) = note(0, 1);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn sample_without_pcm_is_skipped() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 0) = note(428, 5); // slot 5 is empty
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();
        assert!(events.borrow().is_empty());
        // The tick still advanced the row
        assert_eq!(engine.transport().row, 1);
    }

    #[test]
    fn retrigger_stops_old_voice_before_starting_new() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 2) = note(428, 1);
        *pattern.cell_mut(1, 2) = note(214, 1);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();
        engine.tick();

        let recorded = events.borrow();
        assert_eq!(
            recorded
                .iter()
                .map(|e| match e {
                    SinkEvent::Start { voice, .. } => format!("start {voice}"),
                    SinkEvent::Stop { voice } => format!("stop {voice}"),
                })
                .collect::<Vec<_>>(),
            vec!["start 0", "stop 0", "start 1"]
        );
    }

    #[test]
    fn independent_channels_do_not_stop_each_other() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 0) = note(428, 1);
        *pattern.cell_mut(1, 1) = note(428, 1);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();
        engine.tick();

        let recorded = events.borrow();
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|e| matches!(e, SinkEvent::Start { .. })));
    }

    #[test]
    fn pattern_wraps_by_raw_pattern_count() {
        let (mut engine, _) = engine_with(vec![Pattern::new(), Pattern::new()]);
        engine.play();

        for _ in 0..ROWS {
            engine.tick();
        }
        assert_eq!(engine.transport().pattern_index, 1);
        assert_eq!(engine.transport().row, 0);

        for _ in 0..ROWS {
            engine.tick();
        }
        // Past the last pattern: wrap to pattern 0, keep playing
        assert_eq!(engine.transport().pattern_index, 0);
        assert_eq!(engine.transport().row, 0);
        assert!(engine.is_playing());
    }

    #[test]
    fn stop_silences_every_active_channel_and_resets_transport() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 0) = note(428, 1);
        *pattern.cell_mut(0, 1) = note(428, 1);
        *pattern.cell_mut(0, 3) = note(428, 1);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();
        engine.stop();

        let stops: Vec<_> = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Stop { .. }))
            .cloned()
            .collect();
        assert_eq!(stops.len(), 3);
        assert!(!engine.is_playing());
        assert_eq!(engine.transport(), Transport::default());

        // And the pending tick that raced the stop does nothing
        let before = events.borrow().len();
        engine.tick();
        assert_eq!(events.borrow().len(), before);
    }

    #[test]
    fn play_after_stop_restarts_from_the_top() {
        let mut pattern = Pattern::new();
        *pattern.cell_mut(0, 0) = note(428, 1);
        let (mut engine, events) = engine_with(vec![pattern]);

        engine.play();
        engine.tick();
        engine.tick();
        engine.stop();
        engine.play();
        engine.tick();

        let starts = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Start { .. }))
            .count();
        // Row 0 triggered on both runs
        assert_eq!(starts, 2);
        assert_eq!(engine.transport().row, 1);
    }
}
