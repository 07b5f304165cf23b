use ataxia_screen::decode::{AudioDecoder, WavDecoder};
use ataxia_screen::error::ScreenError;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

fn wav_bytes<F>(spec: WavSpec, write: F) -> Vec<u8>
where
    F: FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>),
{
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        write(&mut writer);
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn test_decode_pcm16_mono() {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let bytes = wav_bytes(spec, |w| {
        for v in [0i16, 16384, -16384, i16::MIN] {
            w.write_sample(v).unwrap();
        }
    });

    let audio = WavDecoder.decode(&bytes).unwrap();
    assert_eq!(audio.sample_rate, 8000);
    assert_eq!(audio.samples, vec![0.0, 0.5, -0.5, -1.0]);
    assert!((audio.duration_secs() - 4.0 / 8000.0).abs() < 1e-12);
}

#[test]
fn test_decode_stereo_keeps_first_channel() {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let bytes = wav_bytes(spec, |w| {
        for (l, r) in [(8192i16, -1i16), (-8192, 1), (0, 32767)] {
            w.write_sample(l).unwrap();
            w.write_sample(r).unwrap();
        }
    });

    let audio = WavDecoder.decode(&bytes).unwrap();
    assert_eq!(audio.samples, vec![0.25, -0.25, 0.0]);
}

#[test]
fn test_decode_float_is_clamped() {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let bytes = wav_bytes(spec, |w| {
        for v in [0.25f32, -1.5, 2.0] {
            w.write_sample(v).unwrap();
        }
    });

    let audio = WavDecoder.decode(&bytes).unwrap();
    assert_eq!(audio.samples, vec![0.25, -1.0, 1.0]);
}

#[test]
fn test_decode_rejects_garbage() {
    let err = WavDecoder.decode(b"definitely not a wav file").unwrap_err();
    assert!(matches!(err, ScreenError::Wav(_)));
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = WavDecoder.open(dir.path().join("missing.wav")).unwrap_err();
    assert!(matches!(err, ScreenError::Validation(_)));
}

#[test]
fn test_open_roundtrip_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for _ in 0..1600 {
        writer.write_sample(1000i16).unwrap();
    }
    writer.finalize().unwrap();

    let audio = WavDecoder.open(&path).unwrap();
    assert_eq!(audio.samples.len(), 1600);
    assert!((audio.duration_secs() - 0.1).abs() < 1e-12);
}
