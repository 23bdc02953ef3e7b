use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;

use super::command::{Cli, InfoArgs, ReportFormat};
use super::decode::{CHUNK_SIZE, read_container};
use crate::input::InputReader;
use crate::timestamp::time_str;
use faw::process::decode::Decoder;
use faw::process::detect::FawMode;
use faw::process::extract::ExtractStats;
use faw::structs::adts::{AAC_BLOCK_SAMPLES, AdtsHeader};
use faw::structs::wav::WavHeader;
use faw::utils::errors::DecodeError;

#[derive(Debug, Serialize)]
struct StreamReport {
    input: String,
    container: ContainerReport,
    mode: String,
    sample_bytes: u64,
    duration: String,
    tracks: Vec<TrackReport>,
}

#[derive(Debug, Serialize)]
struct ContainerReport {
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    data_size: u32,
}

#[derive(Debug, Serialize)]
struct TrackReport {
    index: usize,
    adts: Option<AdtsReport>,
    frames: u64,
    silence_inserted: u64,
    corrupt_dropped: u64,
    stale_dropped: u64,
    payload_bytes: u64,
    duration: String,
}

#[derive(Debug, Serialize)]
struct AdtsReport {
    profile: u8,
    sample_rate: u32,
    channels: u8,
    mpeg_id: u8,
    protection_absent: bool,
    first_frame_length: usize,
    buffer_fullness: u16,
}

impl From<&WavHeader> for ContainerReport {
    fn from(header: &WavHeader) -> Self {
        Self {
            sample_rate: header.sample_rate,
            channels: header.channels,
            bits_per_sample: header.bits_per_sample,
            data_size: header.data_size,
        }
    }
}

impl From<&AdtsHeader> for AdtsReport {
    fn from(header: &AdtsHeader) -> Self {
        Self {
            profile: header.profile,
            sample_rate: header.sample_rate,
            channels: header.channel_count,
            mpeg_id: if header.id { 2 } else { 4 },
            protection_absent: header.protection_absent,
            first_frame_length: header.frame_length,
            buffer_fullness: header.buffer_fullness,
        }
    }
}

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Analyzing FAW stream: {}", args.input.display());

    let mut input = InputReader::new(&args.input)?;
    let (mut decoder, pending) = read_container(&mut input)?;
    decoder.set_fail_level(cli.fail_level());

    let pb = if let Some(multi) = multi {
        let pb = multi.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Analyzing frames...");
        Some(pb)
    } else {
        None
    };

    let mut sample_bytes = pending.len() as u64;
    let mut payload = [0u64; 2];
    let mut count = |output: [Vec<u8>; 2]| {
        for (total, track) in payload.iter_mut().zip(&output) {
            *total += track.len() as u64;
        }
    };

    count(decoder.decode(&pending)?);
    input.process_chunks(CHUNK_SIZE, |chunk| {
        sample_bytes += chunk.len() as u64;
        count(decoder.decode(chunk)?);
        if let Some(pb) = &pb {
            pb.set_message(format!("Analyzing frames...       {} bytes", sample_bytes));
        }
        Ok(true)
    })?;

    let finished = decoder.finish();
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    match finished {
        Ok(output) => count(output),
        Err(DecodeError::Detect(e)) => {
            log::debug!("{e}");
            println!("No FAW start marker found in the sample data.");
            println!("This doesn't appear to carry a FAW stream.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let report = build_report(args, &decoder, sample_bytes, payload);
    match args.format {
        ReportFormat::Text => display_report(&report),
        ReportFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&report)?),
    }

    Ok(())
}

fn build_report(
    args: &InfoArgs,
    decoder: &Decoder,
    sample_bytes: u64,
    payload: [u64; 2],
) -> StreamReport {
    let header = decoder.header();
    let rate = header.sample_rate as f64;
    let track_count = if decoder.mode() == FawMode::Mix { 2 } else { 1 };

    let tracks = decoder
        .stats()
        .iter()
        .zip(decoder.first_headers())
        .zip(payload)
        .take(track_count)
        .enumerate()
        .map(|(index, ((stats, first), payload_bytes))| {
            track_report(index, stats, first.as_ref(), payload_bytes, rate)
        })
        .collect();

    let samples = sample_bytes / header.bytes_per_sample() as u64;
    StreamReport {
        input: args.input.display().to_string(),
        container: header.into(),
        mode: decoder.mode().to_string(),
        sample_bytes,
        duration: time_str(samples as f64 / rate),
        tracks,
    }
}

fn track_report(
    index: usize,
    stats: &ExtractStats,
    first: Option<&AdtsHeader>,
    payload_bytes: u64,
    rate: f64,
) -> TrackReport {
    let samples = (stats.frames + stats.silence) * AAC_BLOCK_SAMPLES;
    TrackReport {
        index: index + 1,
        adts: first.map(AdtsReport::from),
        frames: stats.frames,
        silence_inserted: stats.silence,
        corrupt_dropped: stats.corrupt,
        stale_dropped: stats.stale,
        payload_bytes,
        duration: time_str(samples as f64 / rate),
    }
}

fn display_report(report: &StreamReport) {
    println!();
    println!("FAW Stream Information");
    println!("======================");
    println!();

    println!("Container");
    println!("  Sampling rate             {} Hz", report.container.sample_rate);
    println!("  Channels                  {}", report.container.channels);
    println!("  Bits per sample           {}", report.container.bits_per_sample);
    println!("  Sample data               {} bytes", report.sample_bytes);
    println!("  Duration                  {}", report.duration);
    println!();

    println!("Packing                     {}", report.mode);
    println!();

    for track in &report.tracks {
        println!("Track {}", track.index);
        if let Some(adts) = &track.adts {
            println!("    ADTS profile            {}", adts.profile);
            println!("    MPEG version            {}", adts.mpeg_id);
            println!("    Sampling rate           {} Hz", adts.sample_rate);
            println!("    Channels                {}", adts.channels);
        }
        println!("    Frames                  {}", track.frames);
        println!("    Silence inserted        {}", track.silence_inserted);
        println!("    Corrupt frames dropped  {}", track.corrupt_dropped);
        println!("    Stale frames dropped    {}", track.stale_dropped);
        println!("    Payload                 {} bytes", track.payload_bytes);
        println!("    Duration                {}", track.duration);
        println!();
    }
}
