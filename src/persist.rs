//! CSV round-trip for the sample buffer.
//!
//! The on-disk shape is a free-form header line carrying the capture time,
//! then one `x,y` line per sample in buffer order. Loading skips the header,
//! silently drops lines that do not split into exactly two fields, and
//! rejects fields that fail numeric parsing. Every data line is parsed,
//! including the last one.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};

use crate::buffer::{BufferError, Sample, SampleBuffer};

/// Errors reported by save and load.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The source or destination could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A data line carried a field that is not a finite number.
    #[error("invalid data on line {line}: {field:?} is not a finite number")]
    InvalidData {
        /// 1-based line number in the file.
        line: usize,
        /// The offending field text.
        field: String,
    },
    /// The parsed sequence was rejected by the buffer.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Write the buffer to `path`, replacing any existing file.
pub fn save(buffer: &SampleBuffer, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_csv(buffer, &mut out)?;
    out.flush()?;
    info!("saved {} samples to {}", buffer.len(), path.display());
    Ok(())
}

/// Write the header line and one `x,y` line per sample.
///
/// An empty buffer writes the header only.
pub fn write_csv(buffer: &SampleBuffer, out: &mut impl Write) -> Result<(), PersistError> {
    let captured = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    writeln!(out, "capture {captured}")?;
    for sample in buffer.snapshot().samples() {
        writeln!(out, "{},{}", sample.x, sample.y)?;
    }
    Ok(())
}

/// Read samples from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Sample>, PersistError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let samples = read_csv(BufReader::new(file))?;
    info!("loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Read samples from `path` and replace the buffer wholesale.
///
/// The buffer is left unmodified on any failure. Returns the new length.
pub fn load_into(buffer: &mut SampleBuffer, path: impl AsRef<Path>) -> Result<usize, PersistError> {
    let samples = load(path)?;
    Ok(buffer.replace_all(samples)?)
}

/// Parse the line-oriented representation.
///
/// Line 1 is the header and is never interpreted. Lines that do not split
/// into exactly two comma-separated fields are skipped. A field that does
/// not parse as a finite number is an error carrying the line number.
pub fn read_csv(input: impl BufRead) -> Result<Vec<Sample>, PersistError> {
    let mut samples = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if index == 0 {
            continue;
        }
        let line = line.trim_end_matches('\r');

        let mut fields = line.split(',');
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            debug!("skipping line {}: expected 2 fields", index + 1);
            continue;
        };

        samples.push(Sample::new(
            parse_field(x, index + 1)?,
            parse_field(y, index + 1)?,
        ));
    }
    Ok(samples)
}

fn parse_field(field: &str, line: usize) -> Result<f64, PersistError> {
    let invalid = || PersistError::InvalidData {
        line,
        field: field.to_string(),
    };
    let value: f64 = field.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_buffer() -> SampleBuffer {
        let mut buffer = SampleBuffer::new();
        buffer.append_batch([
            Sample::new(0.0, 5.0),
            Sample::new(1.0, 7.0),
            Sample::new(2.0, 3.0),
        ]);
        buffer
    }

    #[test]
    fn round_trip_reproduces_samples_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");

        let buffer = sample_buffer();
        save(&buffer, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, buffer.snapshot().samples());
    }

    #[test]
    fn round_trip_keeps_last_line() {
        // The final data row is parsed like every other; nothing is
        // windowed off the end of the file.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");

        save(&sample_buffer(), &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.last(), Some(&Sample::new(2.0, 3.0)));
    }

    #[test]
    fn header_is_ignored_on_load() {
        let input = "anything at all, even commas\n1,2\n";
        let samples = read_csv(input.as_bytes()).unwrap();
        assert_eq!(samples, vec![Sample::new(1.0, 2.0)]);
    }

    #[test]
    fn wrong_field_count_is_skipped() {
        let input = "header\n1,2\nlonely\n3,4,5\n6,7\n";
        let samples = read_csv(input.as_bytes()).unwrap();
        assert_eq!(samples, vec![Sample::new(1.0, 2.0), Sample::new(6.0, 7.0)]);
    }

    #[test]
    fn unparseable_field_is_an_error() {
        let input = "header\n1,2\n3,potato\n";
        let err = read_csv(input.as_bytes()).unwrap_err();
        match err {
            PersistError::InvalidData { line, field } => {
                assert_eq!(line, 3);
                assert_eq!(field, "potato");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_finite_field_is_an_error() {
        let input = "header\nNaN,2\n";
        assert!(matches!(
            read_csv(input.as_bytes()),
            Err(PersistError::InvalidData { line: 2, .. })
        ));
    }

    #[test]
    fn crlf_lines_are_tolerated() {
        let input = "header\r\n1,2\r\n3,4\r\n";
        let samples = read_csv(input.as_bytes()).unwrap();
        assert_eq!(samples, vec![Sample::new(1.0, 2.0), Sample::new(3.0, 4.0)]);
    }

    #[test]
    fn empty_buffer_saves_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        save(&SampleBuffer::new(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("absent.csv"));
        assert!(matches!(result, Err(PersistError::Io(_))));
    }

    #[test]
    fn load_into_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        save(&sample_buffer(), &path).unwrap();

        let mut buffer = SampleBuffer::new();
        buffer.append(99.0, 99.0);
        assert_eq!(load_into(&mut buffer, &path).unwrap(), 3);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.snapshot().get(0), Some(Sample::new(0.0, 5.0)));
    }

    #[test]
    fn load_into_leaves_buffer_untouched_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "header\n1,nope\n").unwrap();

        let mut buffer = SampleBuffer::new();
        buffer.append(99.0, 99.0);
        assert!(load_into(&mut buffer, &path).is_err());
        assert_eq!(buffer.len(), 1);
    }
}
