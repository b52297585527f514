/// Sound cues: short procedural effects played through rodio.
///
/// Every cue is synthesized into an in-memory WAV buffer once, at init.
/// Playback is fire-and-forget via a detached Sink.
///
/// Without the "sound" feature the stub engine accepts the same calls and
/// does nothing. Synthesis itself is always compiled so it can be tested.

use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 22050;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Star,
    LevelClear,
    GameOver,
}

impl Cue {
    #[cfg_attr(not(feature = "sound"), allow(dead_code))]
    pub const ALL: [Cue; 4] = [Cue::Jump, Cue::Star, Cue::LevelClear, Cue::GameOver];

    #[cfg_attr(not(feature = "sound"), allow(dead_code))]
    pub fn samples(self) -> Vec<f32> {
        match self {
            Cue::Jump => sweep(320.0, 760.0, 0.11, 0.22),
            Cue::Star => notes(&[(1319.0, 0.04), (1976.0, 0.07)], 0.22, true),
            Cue::LevelClear => {
                let mut s = notes(&[(523.0, 0.09), (659.0, 0.09), (784.0, 0.09)], 0.28, true);
                s.extend(notes(&[(1047.0, 0.3)], 0.28, true));
                s
            }
            Cue::GameOver => {
                let mut s = notes(&[(392.0, 0.14), (330.0, 0.14), (262.0, 0.14), (196.0, 0.3)], 0.3, false);
                fade_tail(&mut s, 0.25);
                s
            }
        }
    }
}

// ── Synthesis ──

fn sample_count(duration: f32) -> usize {
    (SAMPLE_RATE as f32 * duration) as usize
}

/// Sine glide from `from` to `to` Hz with a linear fade.
fn sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
    let n = sample_count(duration);
    let mut phase = 0.0f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = from + (to - from) * t;
            phase += freq / SAMPLE_RATE as f32;
            (phase * TAU).sin() * (1.0 - t) * volume
        })
        .collect()
}

/// A run of (frequency, seconds) notes. `bright` adds an octave overtone.
fn notes(seq: &[(f32, f32)], volume: f32, bright: bool) -> Vec<f32> {
    let mut out = Vec::new();
    for &(freq, dur) in seq {
        let n = sample_count(dur);
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * 0.4;
            let mut wave = (t * freq * TAU).sin();
            if bright {
                wave = wave * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
            }
            out.push(wave * env * volume);
        }
    }
    out
}

/// Linear fade-out over the last `share` of the buffer.
fn fade_tail(samples: &mut [f32], share: f32) {
    let total = samples.len();
    let len = ((total as f32) * share) as usize;
    if len == 0 {
        return;
    }
    for (k, s) in samples[total - len..].iter_mut().enumerate() {
        *s *= 1.0 - k as f32 / len as f32;
    }
}

/// Wrap mono f32 samples into a 16-bit PCM WAV file.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
pub fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }
    buf
}

#[cfg(feature = "sound")]
mod engine {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{make_wav, Cue};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: Vec<(Cue, Arc<Vec<u8>>)>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };
            let buffers = Cue::ALL
                .iter()
                .map(|&cue| (cue, Arc::new(make_wav(&cue.samples()))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, cue: Cue) {
            let Some((_, buf)) = self.buffers.iter().find(|(c, _)| *c == cue) else {
                return;
            };
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("sink for {:?} failed: {e}", cue);
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(src) => {
                    sink.append(src);
                    sink.detach();
                }
                Err(e) => log::warn!("cue {:?} did not decode: {e}", cue),
            }
        }
    }
}

#[cfg(feature = "sound")]
pub use engine::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}
