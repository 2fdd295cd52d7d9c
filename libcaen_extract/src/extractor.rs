use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::config::Config;
use super::dat_file::read_records;
use super::dataset::Dataset;
use super::error::ExtractorError;
use super::event::{reconstruct, Event};
use super::layout::resolve_layout;

/// Where the per-channel text files go.
///
/// Files are named `<base>_channel_<NN>.<ext>`. With no output given they land in the
/// working directory using the input file stem as base. An existing directory as output
/// keeps the input stem; anything else is taken as `<directory>/<base>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    directory: PathBuf,
    base: String,
    extension: String,
}

impl OutputTarget {
    pub fn new(input: &Path, output: Option<&Path>, extension: &str) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (directory, base) = match output {
            None => (PathBuf::new(), stem),
            Some(out) if out.is_dir() => (out.to_path_buf(), stem),
            Some(out) => (
                out.parent().map(Path::to_path_buf).unwrap_or_default(),
                out.file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or(stem),
            ),
        };
        Self {
            directory,
            base,
            extension: extension.to_string(),
        }
    }

    /// Path of the file for a given channel
    pub fn channel_path(&self, channel: u32) -> PathBuf {
        self.directory.join(format!(
            "{}_channel_{:02}.{}",
            self.base, channel, self.extension
        ))
    }
}

/// What was written for one requested channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub channel: u32,
    pub path: PathBuf,
    pub n_events: usize,
}

/// Format an event as `a\tb\tx`.
///
/// Amplitudes are rounded half-to-even into 6 wide integers, x gets 13 decimals in a 16
/// wide field. Non-finite x is written as NaN/inf.
pub fn format_event_line(event: &Event) -> String {
    let a = event.amplitude_a.round_ties_even() as i64;
    let b = event.amplitude_b.round_ties_even() as i64;
    format!("{a:6}\t{b:6}\t{:16.13}\n", event.x)
}

/// Write every event of the dataset to a text file, returning the number of lines
pub fn write_channel(dataset: &Dataset, path: &Path) -> Result<usize, ExtractorError> {
    let to_write_error = |e: std::io::Error| ExtractorError::WriteError(path.to_path_buf(), e);
    let mut writer = BufWriter::new(File::create(path).map_err(to_write_error)?);
    let mut n_lines = 0;
    for event in dataset.iter() {
        writer
            .write_all(format_event_line(&event).as_bytes())
            .map_err(to_write_error)?;
        n_lines += 1;
    }
    writer.flush().map_err(to_write_error)?;
    Ok(n_lines)
}

/// Resolve the layout, read the records and reconstruct every event in a file
pub fn decode_file(input: &Path, config: &Config) -> Result<Dataset, ExtractorError> {
    let layout = resolve_layout(input, config.get_pivot()?);
    let records = read_records(input, layout, config.trailing_bytes)?;
    let dataset = reconstruct(&records, config.clock_hz, None);
    log::info!(
        "Reconstructed {} events from {}",
        dataset.len(),
        input.to_string_lossy()
    );
    Ok(dataset)
}

/// Filter one channel out of the decoded dataset, order it and write it
pub fn extract_channel(
    dataset: &Dataset,
    channel: u32,
    sort: bool,
    path: &Path,
) -> Result<ChannelSummary, ExtractorError> {
    let selected = dataset.filter_channel(Some(channel)).sort_by_time(sort);
    let n_events = write_channel(&selected, path)?;
    log::info!(
        "Wrote {n_events} events of channel {channel} to {}",
        path.to_string_lossy()
    );
    Ok(ChannelSummary {
        channel,
        path: path.to_path_buf(),
        n_events,
    })
}

/// Extract every requested channel of a file, one after another.
///
/// The file is decoded once and each channel is filtered from the same events, which
/// writes the same files as decoding it again per channel.
pub fn extract(input: &Path, config: &Config) -> Result<Vec<ChannelSummary>, ExtractorError> {
    config.validate()?;
    let target = OutputTarget::new(input, config.output.as_deref(), &config.extension);
    let dataset = decode_file(input, config)?;
    config
        .channels
        .channels()
        .iter()
        .map(|&channel| {
            extract_channel(&dataset, channel, config.sort, &target.channel_path(channel))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn event(a: f64, b: f64) -> Event {
        Event {
            time: 0.0,
            channel: 0,
            amplitude_a: a,
            amplitude_b: b,
            ab: a + b,
            rx: a - b,
            x: (a - b) / (a + b),
            counts: 1.0,
        }
    }

    #[test]
    fn test_format_event_line() {
        assert_eq!(
            format_event_line(&event(10.0, 20.0)),
            "    10\t    20\t-0.3333333333333\n"
        );
        assert_eq!(
            format_event_line(&event(30.0, 10.0)),
            "    30\t    10\t 0.5000000000000\n"
        );
        assert_eq!(
            format_event_line(&event(65535.0, 0.0)),
            " 65535\t     0\t 1.0000000000000\n"
        );
    }

    #[test]
    fn test_format_rounds_half_to_even() {
        let mut e = event(2.5, 3.5);
        e.x = 0.0;
        assert_eq!(format_event_line(&e), "     2\t     4\t 0.0000000000000\n");
    }

    #[test]
    fn test_format_non_finite() {
        let line = format_event_line(&event(0.0, 0.0));
        assert_eq!(line, "     0\t     0\t             NaN\n");

        let mut e = event(1.0, 0.0);
        e.x = f64::INFINITY;
        assert!(format_event_line(&e).ends_with("inf\n"));
    }

    #[test]
    fn test_output_naming() -> Result<(), Box<dyn std::error::Error>> {
        let input = Path::new("/data/caen/run_042.dat");

        let target = OutputTarget::new(input, None, "txt");
        assert_eq!(target.channel_path(3), PathBuf::from("run_042_channel_03.txt"));

        let dir = tempfile::tempdir()?;
        let target = OutputTarget::new(input, Some(dir.path()), "txt");
        assert_eq!(
            target.channel_path(12),
            dir.path().join("run_042_channel_12.txt")
        );

        let prefix = dir.path().join("tubes");
        let target = OutputTarget::new(input, Some(prefix.as_path()), "dat");
        assert_eq!(target.channel_path(0), dir.path().join("tubes_channel_00.dat"));
        assert_eq!(
            target.channel_path(123),
            dir.path().join("tubes_channel_123.dat")
        );
        Ok(())
    }

    #[test]
    fn test_extract_channel_writes_sorted_lines() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let dataset = Dataset::from_columns(
            array![2.0, 5.0, 1.0],
            array![3, 4, 3],
            array![30.0, 99.0, 10.0],
            array![10.0, 1.0, 20.0],
        );
        let path = dir.path().join("out.txt");
        let summary = extract_channel(&dataset, 3, true, &path)?;
        assert_eq!(summary.n_events, 2);
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "    10\t    20\t-0.3333333333333\n    30\t    10\t 0.5000000000000\n"
        );

        let summary = extract_channel(&dataset, 7, true, &path)?;
        assert_eq!(summary.n_events, 0);
        assert_eq!(std::fs::read_to_string(&path)?, "");
        Ok(())
    }
}
