use std::fs::File;

use anyhow::Result;
use indicatif::MultiProgress;

use super::command::{Cli, MixArgs};
use super::decode::CHUNK_SIZE;
use super::progress::create_progress_bar;
use crate::input::InputReader;
use crate::wav::WavWriter;
use faw::process::mix::MixEncoder;

pub fn cmd_mix(args: &MixArgs, _cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let header = args.container.header();
    log::info!(
        "Mixing {} (high byte, delay {} ms) and {} (low byte, delay {} ms) into {} ({header})",
        args.input_a.display(),
        args.delay_a,
        args.input_b.display(),
        args.delay_b,
        args.output.display()
    );

    let mut encoder = MixEncoder::new(header, [args.delay_a, args.delay_b])?;
    let mut input_a = InputReader::new(&args.input_a)?;
    let mut input_b = InputReader::new(&args.input_b)?;
    let mut writer = WavWriter::new(File::create(&args.output)?, header)?;

    let total = input_a.size().zip(input_b.size()).map(|(a, b)| a + b);
    let pb = multi
        .map(|multi| create_progress_bar(multi, total))
        .transpose()?;

    // Both inputs advance one chunk per step so neither queue runs ahead
    let mut chunk_a = vec![0u8; CHUNK_SIZE];
    let mut chunk_b = vec![0u8; CHUNK_SIZE];
    loop {
        let n_a = input_a.fill_chunk(&mut chunk_a)?;
        let n_b = input_b.fill_chunk(&mut chunk_b)?;
        if n_a == 0 && n_b == 0 {
            break;
        }

        writer.write_samples(&encoder.push(&chunk_a[..n_a], &chunk_b[..n_b]))?;
        if let Some(pb) = &pb {
            pb.inc((n_a + n_b) as u64);
        }
    }
    writer.write_samples(&encoder.finish())?;
    writer.finish()?;

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let [frames_a, frames_b] = encoder.frames_written();
    log::info!(
        "Mixing completed successfully: {frames_a} + {frames_b} frames, {} bytes of sample data",
        encoder.bytes_written()
    );
    Ok(())
}
