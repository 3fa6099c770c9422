use ds_assistant::audio::processing::{frame_size, MIN_SILENCE_FRAMES, MIN_SPEECH_FRAMES};
use ds_assistant::audio::{Endpoint, Utterance, UtteranceDetector, UtteranceRecorder};
use ds_assistant::error::Error;
use ringbuf::traits::Split;
use ringbuf::HeapRb;
use std::time::Duration;

#[test]
fn test_frame_size() {
    assert_eq!(frame_size(16000), 480);
    assert_eq!(frame_size(48000), 1440);
    assert_eq!(frame_size(8000), 240);
}

#[test]
fn test_short_blips_do_not_open_an_utterance() {
    let mut detector = UtteranceDetector::new(500);

    for _ in 0..MIN_SPEECH_FRAMES - 1 {
        assert_eq!(detector.push(true), Endpoint::Waiting);
    }
    assert_eq!(detector.push(false), Endpoint::Waiting);
    assert_eq!(detector.push(true), Endpoint::Waiting);
}

#[test]
fn test_speech_then_silence_finishes() {
    let mut detector = UtteranceDetector::new(500);

    for _ in 0..MIN_SPEECH_FRAMES {
        detector.push(true);
    }
    assert_eq!(detector.state(), Endpoint::Speaking);

    // A short pause keeps the utterance open.
    for _ in 0..5 {
        assert_eq!(detector.push(false), Endpoint::Speaking);
    }
    assert_eq!(detector.push(true), Endpoint::Speaking);

    for _ in 0..MIN_SILENCE_FRAMES - 1 {
        assert_eq!(detector.push(false), Endpoint::Speaking);
    }
    assert_eq!(detector.push(false), Endpoint::Finished);

    // Finished is terminal.
    assert_eq!(detector.push(true), Endpoint::Finished);
}

#[test]
fn test_max_length_cuts_off_continuous_speech() {
    let mut detector = UtteranceDetector::new(10);

    let mut pushed = 0;
    while detector.push(true) != Endpoint::Finished {
        pushed += 1;
        assert!(pushed < 100, "detector never finished");
    }
    assert_eq!(pushed, MIN_SPEECH_FRAMES - 1 + 9);
}

#[test]
fn test_wav_encoding() {
    let utterance = Utterance {
        samples: vec![0, 1000, -1000, i16::MAX],
        sample_rate: 16000,
    };

    let wav = utterance.to_wav().unwrap();
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(wav.len(), 44 + 2 * 4);

    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![0, 1000, -1000, i16::MAX]);
}

#[test]
fn test_utterance_duration() {
    let utterance = Utterance {
        samples: vec![0; 8000],
        sample_rate: 16000,
    };
    assert_eq!(utterance.duration(), Duration::from_millis(500));
}

#[test]
fn test_recorder_rejects_unsupported_rate() {
    let result = UtteranceRecorder::new(44100, Duration::from_secs(1), Duration::from_secs(1));
    assert!(matches!(result, Err(Error::Audio(_))));
}

#[test]
fn test_recorder_gives_up_without_input() {
    let rb = HeapRb::<f32>::new(4096);
    let (_producer, mut consumer) = rb.split();

    let recorder = UtteranceRecorder::new(16000, Duration::from_millis(50), Duration::from_secs(1)).unwrap();
    assert_eq!(recorder.record(&mut consumer), None);
}
