use std::fs::File;

use anyhow::Result;
use indicatif::MultiProgress;

use super::command::{Cli, EncodeArgs};
use super::decode::CHUNK_SIZE;
use super::progress::create_progress_bar;
use crate::input::InputReader;
use crate::wav::WavWriter;
use faw::process::wrap::{Encoder, Packing};

pub fn cmd_encode(args: &EncodeArgs, _cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let header = args.container.header();
    let packing = Packing::from(args.mode);
    log::info!(
        "Wrapping {} into {} ({header}, {packing:?} packing, delay {} ms)",
        args.input.display(),
        args.output.display(),
        args.delay
    );

    let mut encoder = Encoder::new(header, packing, args.delay)?;
    let mut input = InputReader::new(&args.input)?;
    let mut writer = WavWriter::new(File::create(&args.output)?, header)?;

    let pb = multi
        .map(|multi| create_progress_bar(multi, input.size()))
        .transpose()?;

    input.process_chunks(CHUNK_SIZE, |chunk| {
        writer.write_samples(&encoder.encode(chunk))?;
        if let Some(pb) = &pb {
            pb.inc(chunk.len() as u64);
            pb.set_message(format!("{} frames", encoder.frames_written()));
        }
        Ok(true)
    })?;
    writer.write_samples(&encoder.finish())?;
    writer.finish()?;

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("{} frames", encoder.frames_written()));
    }

    log::info!(
        "Encoding completed successfully: {} frames {:?}-packed, {} bytes of sample data",
        encoder.frames_written(),
        encoder.packing(),
        writer.data_written()
    );
    Ok(())
}
