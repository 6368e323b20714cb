//! cpal-backed [`AudioSink`].
//!
//! Started voices land in a shared table that the cpal stream callback
//! mixes on the fly: each voice steps through its mono PCM buffer at its
//! playback rate with linear interpolation, scaled by its gain, and every
//! output channel gets the same mono mix. Stopping a voice flips its
//! shared alive flag; the callback drops dead and finished voices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;
use pt_engine::{AudioSink, VoiceHandle};

use crate::AudioError;

/// One sounding entry in the mix table.
struct MixVoice {
    pcm: Arc<[f32]>,
    /// Fractional read position in samples.
    position: f64,
    /// Position increment per output frame.
    rate: f64,
    gain: f32,
    alive: Arc<AtomicBool>,
}

impl MixVoice {
    /// Next interpolated output sample; 0.0 once stopped or past the end.
    fn next_sample(&mut self) -> f32 {
        if !self.alive.load(Ordering::Relaxed) {
            return 0.0;
        }
        let index = self.position as usize;
        if index >= self.pcm.len() {
            self.alive.store(false, Ordering::Relaxed);
            return 0.0;
        }
        let frac = (self.position - index as f64) as f32;
        let a = self.pcm[index];
        // The final sample interpolates toward itself so it still sounds
        let b = *self.pcm.get(index + 1).unwrap_or(&a);
        self.position += self.rate;
        (a + (b - a) * frac) * self.gain
    }

    fn is_audible(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }
}

/// Mix all live voices into an interleaved output buffer.
fn mix_into(buffer: &mut [f32], channels: usize, voices: &mut Vec<MixVoice>) {
    for frame in buffer.chunks_mut(channels) {
        let mut acc = 0.0f32;
        for voice in voices.iter_mut() {
            acc += voice.next_sample();
        }
        let acc = acc.clamp(-1.0, 1.0);
        for sample in frame.iter_mut() {
            *sample = acc;
        }
    }
    voices.retain(MixVoice::is_audible);
}

/// Audio sink playing through the default cpal output device.
pub struct CpalSink {
    sample_rate: u32,
    voices: Arc<Mutex<Vec<MixVoice>>>,
    _stream: Stream,
}

impl CpalSink {
    /// Open the default output device and start its stream.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let config: StreamConfig = config.into();

        let voices: Arc<Mutex<Vec<MixVoice>>> = Arc::new(Mutex::new(Vec::new()));
        let mix_voices = Arc::clone(&voices);
        let channels = config.channels as usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mix_into(data, channels, &mut mix_voices.lock());
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;

        Ok(Self {
            sample_rate: config.sample_rate.0,
            voices,
            _stream: stream,
        })
    }
}

impl AudioSink for CpalSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start_voice(&mut self, pcm: Arc<[f32]>, rate: f64, gain: f32) -> Box<dyn VoiceHandle> {
        let alive = Arc::new(AtomicBool::new(true));
        self.voices.lock().push(MixVoice {
            pcm,
            position: 0.0,
            rate,
            gain,
            alive: Arc::clone(&alive),
        });
        Box::new(CpalVoice { alive })
    }
}

/// Stop handle for a voice in the mix table.
struct CpalVoice {
    alive: Arc<AtomicBool>,
}

impl VoiceHandle for CpalVoice {
    fn stop(&mut self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}
