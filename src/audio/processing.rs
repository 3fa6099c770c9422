use ringbuf::traits::{Consumer, Split};
use ringbuf::HeapRb;
use std::collections::VecDeque;
use std::io::Cursor;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use webrtc_vad::{SampleRate, Vad, VadMode};

use super::capture::AudioCapture;
use crate::error::{Error, Result};

pub const FRAME_MS: usize = 30;
/// 90ms of voice opens an utterance.
pub const MIN_SPEECH_FRAMES: usize = 3;
/// 600ms of silence closes it.
pub const MIN_SILENCE_FRAMES: usize = 20;

pub const LISTEN_WINDOW: Duration = Duration::from_secs(10);
pub const MAX_UTTERANCE: Duration = Duration::from_secs(15);

const RING_CAPACITY: usize = 48000 * 2;

// webrtc_vad::SampleRate derives neither Clone nor Copy.
fn copy_vad_rate(rate: &SampleRate) -> SampleRate {
    match rate {
        SampleRate::Rate8kHz => SampleRate::Rate8kHz,
        SampleRate::Rate16kHz => SampleRate::Rate16kHz,
        SampleRate::Rate32kHz => SampleRate::Rate32kHz,
        SampleRate::Rate48kHz => SampleRate::Rate48kHz,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Waiting,
    Speaking,
    Finished,
}

/// Debounces per-frame voice decisions into a single utterance.
#[derive(Debug, Clone)]
pub struct UtteranceDetector {
    state: Endpoint,
    consecutive_speech: usize,
    consecutive_silence: usize,
    frames_spoken: usize,
    max_frames: usize,
}

impl UtteranceDetector {
    pub fn new(max_frames: usize) -> Self {
        Self {
            state: Endpoint::Waiting,
            consecutive_speech: 0,
            consecutive_silence: 0,
            frames_spoken: 0,
            max_frames,
        }
    }

    pub fn state(&self) -> Endpoint {
        self.state
    }

    pub fn push(&mut self, is_speech: bool) -> Endpoint {
        if self.state == Endpoint::Finished {
            return Endpoint::Finished;
        }

        if is_speech {
            self.consecutive_silence = 0;
            self.consecutive_speech += 1;
        } else {
            self.consecutive_speech = 0;
            self.consecutive_silence += 1;
        }

        match self.state {
            Endpoint::Waiting if self.consecutive_speech >= MIN_SPEECH_FRAMES => {
                self.state = Endpoint::Speaking;
                self.frames_spoken = 1;
                debug!("Speech START detected");
            }
            Endpoint::Speaking => {
                self.frames_spoken += 1;
                if self.consecutive_silence >= MIN_SILENCE_FRAMES || self.frames_spoken >= self.max_frames {
                    self.state = Endpoint::Finished;
                    debug!("Speech END detected after {} frames", self.frames_spoken);
                }
            }
            _ => {}
        }

        self.state
    }
}

/// One recorded command, mono 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl Utterance {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate.max(1) as f64)
    }

    pub fn to_wav(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_err)?;
            for &sample in &self.samples {
                writer.write_sample(sample).map_err(wav_err)?;
            }
            writer.finalize().map_err(wav_err)?;
        }
        Ok(cursor.into_inner())
    }
}

fn wav_err(e: hound::Error) -> Error {
    Error::Audio(format!("wav encoding failed: {}", e))
}

pub fn frame_size(sample_rate: u32) -> usize {
    (sample_rate as usize * FRAME_MS) / 1000
}

/// Pulls frames from the capture ring buffer until one utterance has been
/// spoken, or the listen window passes without any speech.
pub struct UtteranceRecorder {
    sample_rate: u32,
    vad_rate: SampleRate,
    listen_window: Duration,
    max_frames: usize,
}

impl UtteranceRecorder {
    pub fn new(sample_rate: u32, listen_window: Duration, max_utterance: Duration) -> Result<Self> {
        let vad_rate = match sample_rate {
            8000 => SampleRate::Rate8kHz,
            16000 => SampleRate::Rate16kHz,
            32000 => SampleRate::Rate32kHz,
            48000 => SampleRate::Rate48kHz,
            other => return Err(Error::Audio(format!("Unsupported VAD rate {}", other))),
        };

        Ok(Self {
            sample_rate,
            vad_rate,
            listen_window,
            max_frames: (max_utterance.as_millis() as usize / FRAME_MS).max(1),
        })
    }

    pub fn record<C>(&self, consumer: &mut C) -> Option<Utterance>
    where
        C: Consumer<Item = f32>,
    {
        // Vad is not Send, so it lives only for this call.
        let mut vad = Vad::new_with_rate_and_mode(copy_vad_rate(&self.vad_rate), VadMode::Aggressive);
        let mut detector = UtteranceDetector::new(self.max_frames);

        let size = frame_size(self.sample_rate);
        let mut frame_f32: Vec<f32> = vec![0.0; size];
        let mut frame_i16: Vec<i16> = vec![0; size];
        let mut pre_roll: VecDeque<Vec<i16>> = VecDeque::with_capacity(MIN_SPEECH_FRAMES);
        let mut samples = Vec::new();
        let started = Instant::now();

        loop {
            if detector.state() == Endpoint::Waiting && started.elapsed() >= self.listen_window {
                debug!("No speech within {:?}", self.listen_window);
                return None;
            }

            if consumer.occupied_len() < size {
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }

            consumer.pop_slice(&mut frame_f32);
            for (out, &sample) in frame_i16.iter_mut().zip(frame_f32.iter()) {
                *out = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            }

            let is_speech = vad.is_voice_segment(&frame_i16).unwrap_or_else(|_| {
                debug!("VAD rejected frame of {} samples", size);
                false
            });

            match detector.push(is_speech) {
                Endpoint::Waiting => {
                    if pre_roll.len() == MIN_SPEECH_FRAMES {
                        pre_roll.pop_front();
                    }
                    pre_roll.push_back(frame_i16.clone());
                }
                Endpoint::Speaking => {
                    for frame in pre_roll.drain(..) {
                        samples.extend(frame);
                    }
                    samples.extend_from_slice(&frame_i16);
                }
                Endpoint::Finished => {
                    samples.extend_from_slice(&frame_i16);
                    let utterance = Utterance {
                        samples,
                        sample_rate: self.sample_rate,
                    };
                    info!("Recorded utterance of {:.1}s", utterance.duration().as_secs_f32());
                    return Some(utterance);
                }
            }
        }
    }
}

/// Opens the default microphone and records a single utterance. Blocking.
pub fn record_from_default_device(listen_window: Duration, max_utterance: Duration) -> Result<Option<Utterance>> {
    let rb = HeapRb::<f32>::new(RING_CAPACITY);
    let (producer, mut consumer) = rb.split();

    let capture = AudioCapture::new(producer)?;
    let recorder = UtteranceRecorder::new(capture.sample_rate, listen_window, max_utterance)?;
    let utterance = recorder.record(&mut consumer);
    drop(capture);

    Ok(utterance)
}
