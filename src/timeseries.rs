//! Reading load records from delimited files and splitting them into segments.
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Reads the zero-based `column` of a delimited file, skipping `header` leading lines.
///
/// Blank lines are ignored. Any cell that does not parse as a float is an
/// error naming its line.
pub fn read_signal<P: AsRef<Path>>(path: P, column: usize, header: usize, delimiter: u8) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("failed to open load record {}", path.display()))?;

    let mut signal = Vec::new();
    for (line, record) in reader.records().enumerate().skip(header) {
        let record = record.with_context(|| format!("{}: malformed line {}", path.display(), line + 1))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let cell = record.get(column).ok_or_else(|| {
            anyhow!("{}: line {} has no column {}", path.display(), line + 1, column)
        })?;
        let value = cell
            .parse::<f64>()
            .with_context(|| format!("{}: line {}: {:?} is not a number", path.display(), line + 1, cell))?;
        signal.push(value);
    }
    Ok(signal)
}

/// Splits `signal` into `count` contiguous windows of near-equal length.
///
/// The first `len % count` windows hold one extra sample. Windows are empty
/// when `count` exceeds the signal length, and `count == 0` yields none.
pub fn split_segments(signal: &[f64], count: usize) -> Vec<&[f64]> {
    if count == 0 {
        return Vec::new();
    }
    let base = signal.len() / count;
    let extra = signal.len() % count;

    let mut segments = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let len = base + usize::from(i < extra);
        segments.push(&signal[start..start + len]);
        start += len;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_even() {
        let signal: Vec<f64> = (0..6).map(f64::from).collect();
        let segments = split_segments(&signal, 3);
        assert_eq!(segments, vec![&[0.0, 1.0][..], &[2.0, 3.0][..], &[4.0, 5.0][..]]);
    }

    #[test]
    fn test_split_uneven_and_degenerate() {
        let signal: Vec<f64> = (0..7).map(f64::from).collect();
        let lens: Vec<usize> = split_segments(&signal, 3).iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![3, 2, 2]);

        let lens: Vec<usize> = split_segments(&signal[..2], 4).iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![1, 1, 0, 0]);

        assert!(split_segments(&signal, 0).is_empty());
        assert_eq!(split_segments(&signal, 1), vec![&signal[..]]);
    }

    #[test]
    fn test_read_signal() {
        let signal = read_signal("tests/data/calm.csv", 1, 1, b',').expect("Failed to read record");
        assert_eq!(signal.len(), 960);
        assert_eq!(signal[0], 6.0);
    }

    #[test]
    fn test_read_signal_selects_column() {
        let first = read_signal("tests/data/two_columns.csv", 0, 0, b',').expect("Failed to read record");
        let second = read_signal("tests/data/two_columns.csv", 1, 0, b',').expect("Failed to read record");
        assert_eq!(first, vec![5.0, 6.0, 5.0]);
        assert_eq!(second, vec![0.0, 3.0, 0.0]);
        assert!(read_signal("tests/data/two_columns.csv", 2, 0, b',').is_err());
    }

    #[test]
    fn test_read_signal_reports_bad_cells() {
        let err = read_signal("tests/data/bad.csv", 0, 1, b',').unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"), "{:#}", err);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_signal("tests/data/does_not_exist.csv", 0, 0, b',').is_err());
    }
}
