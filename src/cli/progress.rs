use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Byte-based bar when the input size is known, spinner otherwise.
pub fn create_progress_bar(multi: &MultiProgress, total_bytes: Option<u64>) -> Result<ProgressBar> {
    let pb = if let Some(total) = total_bytes {
        let pb = multi.add(ProgressBar::new(total));
        pb.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%)\n{msg} | elapsed: {elapsed_precise} | ETA: {eta_precise}",
        )?);
        pb
    } else {
        let pb = multi.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyle::with_template(
            "{spinner:.green} {bytes}\n{msg} | elapsed: {elapsed_precise}",
        )?);
        pb
    };
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

/// Speed and position message for `samples` processed at `sample_rate`.
pub fn speed_message(samples: u64, sample_rate: u32, elapsed: std::time::Duration) -> String {
    let duration_secs = samples as f64 / sample_rate.max(1) as f64;
    let multiplier = duration_secs / elapsed.as_secs_f64().max(f64::EPSILON);
    format!(
        "speed: {multiplier:.1}x | timestamp: {}",
        crate::timestamp::time_str(duration_secs)
    )
}
