use cpal::{SampleFormat, SampleRate, SupportedBufferSize, SupportedStreamConfigRange};
use ds_assistant::audio::capture::select_input_config;

fn range(min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
    SupportedStreamConfigRange::new(2, SampleRate(min), SampleRate(max), SupportedBufferSize::Unknown, format)
}

#[test]
fn test_skips_formats_the_callbacks_cannot_convert() {
    let ranges = vec![
        range(8000, 48000, SampleFormat::U8),
        range(8000, 48000, SampleFormat::I32),
        range(8000, 48000, SampleFormat::I16),
    ];

    let config = select_input_config(&ranges).expect("an I16 range is available");
    assert_eq!(config.sample_format(), SampleFormat::I16);
    assert_eq!(config.sample_rate(), SampleRate(16000));
}

#[test]
fn test_prefers_sixteen_kilohertz() {
    let ranges = vec![
        range(44100, 48000, SampleFormat::F32),
        range(16000, 16000, SampleFormat::F32),
    ];

    let config = select_input_config(&ranges).unwrap();
    assert_eq!(config.sample_rate(), SampleRate(16000));
}

#[test]
fn test_falls_back_to_other_vad_rates() {
    let ranges = vec![range(44100, 48000, SampleFormat::F32)];

    let config = select_input_config(&ranges).unwrap();
    assert_eq!(config.sample_rate(), SampleRate(48000));
    assert_eq!(config.channels(), 2);
}

#[test]
fn test_no_usable_range() {
    let ranges = vec![
        range(44100, 44100, SampleFormat::F32),
        range(8000, 48000, SampleFormat::U8),
    ];

    assert!(select_input_config(&ranges).is_none());
}
