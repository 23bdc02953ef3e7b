use anyhow::{Result, bail};
use indicatif::MultiProgress;

use super::command::{Cli, DecodeArgs};
use super::output::{TrackWriter, create_track_paths};
use super::progress::{create_progress_bar, speed_message};
use crate::input::InputReader;
use faw::process::decode::Decoder;
use faw::process::detect::FawMode;
use faw::structs::adts::AAC_BLOCK_SAMPLES;
use faw::utils::errors::WavError;

pub const CHUNK_SIZE: usize = 64 * 1024;

/// Reads the container header from the front of `input`.
///
/// Returns the decoder and whatever sample data was read past the header.
pub fn read_container(input: &mut InputReader) -> Result<(Decoder, Vec<u8>)> {
    let mut prefix = Vec::new();
    let mut chunk = vec![0u8; 4096];

    loop {
        match Decoder::init(&prefix) {
            Ok((decoder, offset)) => return Ok((decoder, prefix.split_off(offset))),
            Err(e) if matches!(e.downcast_ref::<WavError>(), Some(WavError::Truncated { .. })) => {
                let n = input.read_chunk(&mut chunk)?;
                if n == 0 {
                    return Err(e.context("Input ended inside the container header"));
                }
                prefix.extend_from_slice(&chunk[..n]);
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn cmd_decode(args: &DecodeArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!(
        "Decoding FAW stream: {} (strict mode: {})",
        args.input.display(),
        cli.strict
    );

    let mut input = InputReader::new(&args.input)?;
    let base_path = match &args.output {
        Some(path) => path.clone(),
        None if input.is_pipe() => bail!("--output is required when reading from stdin"),
        None => args.input.clone(),
    };
    let (first_path, second_path) = create_track_paths(&base_path);
    let mut writers = [TrackWriter::new(first_path), TrackWriter::new(second_path)];

    let (mut decoder, pending) = read_container(&mut input)?;
    decoder.set_fail_level(cli.fail_level());
    decoder.set_probe_limit(args.probe_limit);
    log::info!("Container: {}", decoder.header());

    let pb = multi
        .map(|multi| create_progress_bar(multi, input.size()))
        .transpose()?;
    let start_time = std::time::Instant::now();
    let sample_rate = decoder.header().sample_rate;
    let bytes_per_sample = decoder.header().bytes_per_sample() as u64;
    let mut bytes_read = 0u64;

    let mut feed = |decoder: &mut Decoder, chunk: &[u8]| -> Result<()> {
        let output = decoder.decode(chunk)?;
        for (writer, data) in writers.iter_mut().zip(&output) {
            writer.write(data)?;
        }

        bytes_read += chunk.len() as u64;
        if let Some(pb) = &pb {
            pb.set_position(bytes_read);
            pb.set_message(speed_message(
                bytes_read / bytes_per_sample,
                sample_rate,
                start_time.elapsed(),
            ));
        }
        Ok(())
    };

    feed(&mut decoder, &pending)?;
    input.process_chunks(CHUNK_SIZE, |chunk| {
        feed(&mut decoder, chunk)?;
        Ok(true)
    })?;

    let output = decoder.finish()?;
    for (writer, data) in writers.iter_mut().zip(&output) {
        writer.write(data)?;
        writer.finish()?;
    }

    if let Some(pb) = &pb {
        pb.finish_with_message(speed_message(
            bytes_read / bytes_per_sample,
            sample_rate,
            start_time.elapsed(),
        ));
    }

    let mode = decoder.mode();
    let tracks = if mode == FawMode::Mix { 2 } else { 1 };
    for (index, (writer, stats)) in writers.iter().zip(decoder.stats()).take(tracks).enumerate() {
        let duration = (stats.frames + stats.silence) * AAC_BLOCK_SAMPLES;
        log::info!(
            "Track {}: {} frames, {} silence, {} corrupt, {} stale, {} -> {} ({} bytes)",
            index + 1,
            stats.frames,
            stats.silence,
            stats.corrupt,
            stats.stale,
            crate::timestamp::time_str(duration as f64 / sample_rate as f64),
            writer.path().display(),
            writer.bytes_written()
        );
    }
    log::info!("Decoding completed successfully ({mode} packing)");

    Ok(())
}
