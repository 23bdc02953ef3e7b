//! End-to-end runs of the `fawutil` binary on temporary files.

use std::path::Path;
use std::process::Command;

/// Valid silent stereo AAC-LC frames with a rolling payload byte so frames differ.
fn elementary_stream(frames: usize, seed: u8) -> Vec<u8> {
    (0..frames)
        .flat_map(|i| {
            let mut frame = vec![
                0xFF, 0xF9, 0x4C, 0x80, 0x02, 0x1F, 0xFC, 0x21, 0x00, 0x49, 0x90, 0x02, 0x19,
                0x00, 0x23, 0x80,
            ];
            frame[8] = (i as u8).wrapping_add(seed);
            frame
        })
        .collect()
}

fn fawutil(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fawutil"))
        .args(["--loglevel", "warn"])
        .args(args)
        .output()
        .expect("failed to run fawutil")
}

fn path(p: &Path) -> &str {
    p.to_str().expect("temp path is not UTF-8")
}

#[test]
fn encode_then_decode() {
    let dir = tempfile::tempdir().unwrap();
    let es_path = dir.path().join("in.aac");
    let wav_path = dir.path().join("wrapped.wav");
    let out_path = dir.path().join("out.aac");
    let es = elementary_stream(200, 0);
    std::fs::write(&es_path, &es).unwrap();

    let encoded = fawutil(&["encode", path(&es_path), "-o", path(&wav_path), "--mode", "half"]);
    assert!(encoded.status.success(), "{encoded:?}");

    let wav = std::fs::read(&wav_path).unwrap();
    assert_eq!(&wav[0..4], b"RIFF");
    let data_size = u32::from_le_bytes(wav[40..44].try_into().unwrap()) as usize;
    assert_eq!(data_size, wav.len() - 44);

    let decoded = fawutil(&["decode", path(&wav_path), "-o", path(&out_path)]);
    assert!(decoded.status.success(), "{decoded:?}");
    assert_eq!(std::fs::read(&out_path).unwrap(), es);
    assert!(!dir.path().join("out.track2.aac").exists());
}

#[test]
fn mix_then_decode_two_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("a.aac");
    let b_path = dir.path().join("b.aac");
    let wav_path = dir.path().join("mix.wav");
    let out_path = dir.path().join("out.aac");
    let es_a = elementary_stream(50, 0);
    let es_b = elementary_stream(50, 0x80);
    std::fs::write(&a_path, &es_a).unwrap();
    std::fs::write(&b_path, &es_b).unwrap();

    let mixed = fawutil(&["mix", path(&a_path), path(&b_path), "-o", path(&wav_path)]);
    assert!(mixed.status.success(), "{mixed:?}");

    let decoded = fawutil(&["decode", path(&wav_path), "-o", path(&out_path)]);
    assert!(decoded.status.success(), "{decoded:?}");
    assert_eq!(std::fs::read(&out_path).unwrap(), es_b);
    assert_eq!(
        std::fs::read(dir.path().join("out.track2.aac")).unwrap(),
        es_a
    );
}

#[test]
fn info_reports_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let es_path = dir.path().join("in.aac");
    let wav_path = dir.path().join("wrapped.wav");
    std::fs::write(&es_path, elementary_stream(10, 0)).unwrap();

    let encoded = fawutil(&["encode", path(&es_path), "-o", path(&wav_path)]);
    assert!(encoded.status.success(), "{encoded:?}");

    let info = fawutil(&["info", path(&wav_path), "--format", "yaml"]);
    assert!(info.status.success(), "{info:?}");
    let report = String::from_utf8(info.stdout).unwrap();
    assert!(report.contains("mode: full"), "{report}");
    assert!(report.contains("frames: 10"), "{report}");
}

#[test]
fn decode_rejects_non_wav() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.wav");
    std::fs::write(&bogus, b"not a riff file at all").unwrap();

    let decoded = fawutil(&["decode", path(&bogus)]);
    assert!(!decoded.status.success());
}
