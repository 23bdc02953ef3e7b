use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

pub fn create_path_with_suffix(base_path: &Path, suffix: &str) -> PathBuf {
    let mut path = base_path.to_path_buf();
    let new_name = format!(
        "{}.{}",
        base_path.file_name().unwrap_or_default().to_string_lossy(),
        suffix
    );
    path.set_file_name(new_name);
    path
}

pub fn create_path_with_extension(base_path: &Path, expected_ext: &str) -> PathBuf {
    match base_path.extension() {
        Some(ext) if ext == expected_ext => base_path.to_path_buf(),
        Some(_) => create_path_with_suffix(base_path, expected_ext),
        None => base_path.with_extension(expected_ext),
    }
}

/// Output paths of the first and second decoded track.
pub fn create_track_paths(base_path: &Path) -> (PathBuf, PathBuf) {
    let first = create_path_with_extension(base_path, "aac");
    let second = create_path_with_suffix(&first.with_extension(""), "track2.aac");
    (first, second)
}

/// Elementary-stream output that is only created once it receives data.
pub struct TrackWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    bytes_written: u64,
}

impl TrackWriter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            writer: None,
            bytes_written: 0,
        }
    }

    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        if self.writer.is_none() {
            log::info!("Creating output file: {}", self.path.display());
            self.writer = Some(BufWriter::new(File::create(&self.path)?));
        }
        if let Some(writer) = &mut self.writer {
            writer.write_all(data)?;
            self.bytes_written += data.len() as u64;
        }
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_paths() {
        let (a, b) = create_track_paths(Path::new("out/capture.wav"));
        assert_eq!(a, Path::new("out/capture.wav.aac"));
        assert_eq!(b, Path::new("out/capture.wav.track2.aac"));

        let (a, b) = create_track_paths(Path::new("movie.aac"));
        assert_eq!(a, Path::new("movie.aac"));
        assert_eq!(b, Path::new("movie.track2.aac"));

        let (a, _) = create_track_paths(Path::new("movie"));
        assert_eq!(a, Path::new("movie.aac"));
    }
}
