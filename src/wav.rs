use std::io::{self, BufWriter, Seek, SeekFrom, Write};

use faw::structs::wav::WavHeader;

/// RIFF/WAVE writer that back-patches the size fields on [`finish`](Self::finish).
pub struct WavWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    header: WavHeader,
    header_position: u64,
    data_written: u64,
}

impl<W: Write + Seek> WavWriter<W> {
    /// Writes a provisional header for `header`'s format.
    pub fn new(writer: W, header: WavHeader) -> io::Result<Self> {
        let mut writer = BufWriter::new(writer);
        let header_position = writer.stream_position()?;

        let mut header = header;
        header.set_data_size(0);
        writer.write_all(&header.to_bytes())?;

        Ok(Self {
            writer,
            header,
            header_position,
            data_written: 0,
        })
    }

    pub fn write_samples(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.data_written += data.len() as u64;
        Ok(())
    }

    /// Rewrites the header with the final sizes, saturating at the 32-bit limit.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.data_written > u32::MAX as u64 {
            log::warn!(
                "{} bytes of sample data exceed the RIFF size limit, header sizes saturated",
                self.data_written
            );
        }
        self.header.set_data_size(self.data_written);

        self.writer.flush()?;
        let current_pos = self.writer.stream_position()?;

        self.writer.seek(SeekFrom::Start(self.header_position))?;
        self.writer.write_all(&self.header.to_bytes())?;

        self.writer.seek(SeekFrom::Start(current_pos))?;
        self.writer.flush()?;

        Ok(())
    }

    pub fn data_written(&self) -> u64 {
        self.data_written
    }

    #[cfg(test)]
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_is_back_patched() -> anyhow::Result<()> {
        let mut writer = WavWriter::new(Cursor::new(Vec::new()), WavHeader::new(48000, 2, 16))?;
        writer.write_samples(&[1, 2, 3, 4])?;
        writer.write_samples(&[5, 6, 7, 8])?;
        writer.finish()?;
        assert_eq!(writer.data_written(), 8);

        let buffer = writer.into_inner()?.into_inner();
        assert_eq!(buffer.len(), 44 + 8);
        assert_eq!(&buffer[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(buffer[4..8].try_into()?), 36 + 8);
        assert_eq!(u32::from_le_bytes(buffer[40..44].try_into()?), 8);

        let (header, offset) = WavHeader::parse(&buffer)?;
        assert_eq!(offset, 44);
        assert_eq!(header.data_size, 8);
        assert_eq!(header.channels, 2);
        assert_eq!(&buffer[offset..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        Ok(())
    }
}
