use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SupportedStreamConfig, SupportedStreamConfigRange};
use ringbuf::traits::Producer;
use tracing::{error, info};

use crate::error::{Error, Result};

/// Rates the voice activity detector accepts, most efficient first.
pub const VAD_RATES: [u32; 4] = [16000, 32000, 48000, 8000];

/// Keeps the default input device streaming mono f32 samples into a ring
/// buffer for as long as it lives.
pub struct AudioCapture {
    _stream: cpal::Stream,
    pub sample_rate: u32,
}

/// Picks the first range that supports a VAD rate (in [`VAD_RATES`] order)
/// with a sample format the capture callbacks can convert.
pub fn select_input_config(ranges: &[SupportedStreamConfigRange]) -> Option<SupportedStreamConfig> {
    VAD_RATES.iter().find_map(|&rate| {
        ranges
            .iter()
            .filter(|range| matches!(range.sample_format(), SampleFormat::F32 | SampleFormat::I16))
            .find(|range| range.min_sample_rate().0 <= rate && range.max_sample_rate().0 >= rate)
            .map(|range| range.clone().with_sample_rate(cpal::SampleRate(rate)))
    })
}

/// Fails early when there is no microphone at all.
pub fn ensure_input_device() -> Result<String> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or_else(|| Error::Audio("No input device available".to_string()))?;
    Ok(device.name().unwrap_or_default())
}

impl AudioCapture {
    pub fn new<P>(mut producer: P) -> Result<Self>
    where
        P: Producer<Item = f32> + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("No input device available".to_string()))?;

        info!("Audio Input Device: {}", device.name().unwrap_or_default());

        let ranges: Vec<_> = device.supported_input_configs().map_err(audio_err)?.collect();
        let config = match select_input_config(&ranges) {
            Some(config) => config,
            None => {
                let fallback = device.default_input_config().map_err(audio_err)?;
                if !VAD_RATES.contains(&fallback.sample_rate().0) {
                    return Err(Error::Audio(format!(
                        "Unsupported sample rate: {}. VAD requires 8k, 16k, 32k, or 48k.",
                        fallback.sample_rate().0
                    )));
                }
                fallback
            }
        };

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!("Audio Config Selected: Rate={}Hz, Channels={}", sample_rate, channels);

        let err_fn = |err| error!("an error occurred on stream: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _: &_| write_input_data(data, channels, &mut producer),
                err_fn,
                None,
            ),
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _: &_| write_input_data_i16(data, channels, &mut producer),
                err_fn,
                None,
            ),
            other => return Err(Error::Audio(format!("Unsupported sample format {:?}", other))),
        }
        .map_err(audio_err)?;

        stream.play().map_err(audio_err)?;

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }
}

fn audio_err(e: impl std::fmt::Display) -> Error {
    Error::Audio(e.to_string())
}

// Only the first channel of each interleaved frame is kept. A full buffer
// drops input.
fn write_input_data<P>(input: &[f32], channels: usize, producer: &mut P)
where
    P: Producer<Item = f32>,
{
    for frame in input.chunks(channels.max(1)) {
        let _ = producer.try_push(frame[0]);
    }
}

fn write_input_data_i16<P>(input: &[i16], channels: usize, producer: &mut P)
where
    P: Producer<Item = f32>,
{
    for frame in input.chunks(channels.max(1)) {
        let _ = producer.try_push(frame[0] as f32 / i16::MAX as f32);
    }
}
