use crate::bins::Bins;
use crate::timer::RunResult;
use histo_common::{Fp, HistoError, Result};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: [&str; 7] = ["Size", "Name", "Threads", "Mean", "Stddev", "Min", "Max"];

pub fn write_csv<W: Write>(
    out: &mut W,
    results: &[RunResult],
    delimiter: char,
    precision: usize,
) -> Result<()> {
    write_csv_header(out, delimiter)?;
    write_csv_rows(out, results, delimiter, precision)
}

pub fn write_csv_header<W: Write>(out: &mut W, delimiter: char) -> Result<()> {
    let sep = delimiter.to_string();
    writeln!(out, "{}", CSV_HEADER.join(sep.as_str()))?;
    Ok(())
}

pub fn write_csv_rows<W: Write>(
    out: &mut W,
    results: &[RunResult],
    delimiter: char,
    precision: usize,
) -> Result<()> {
    let d = delimiter;
    for r in results {
        let s = &r.stats;
        writeln!(
            out,
            "{}{d}{}{d}{}{d}{:.p$}{d}{:.p$}{d}{:.p$}{d}{:.p$}",
            r.config.size,
            r.name,
            r.config.threads,
            s.mean_ms,
            s.std_dev_ms,
            s.min_ms,
            s.max_ms,
            p = precision,
        )?;
    }
    Ok(())
}

pub fn export_csv(output_path: &Path, results: &[RunResult], delimiter: char, precision: usize) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(output_path)?);
    write_csv(&mut file, results, delimiter, precision)?;
    file.flush()?;
    Ok(())
}

pub fn export_json(output_path: &Path, results: &[RunResult]) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, results).map_err(|e| HistoError::Other(e.to_string()))?;
    Ok(())
}

/// Aligned table of one accumulator: upper bound, count and max per bucket.
pub fn format_bins(limits: &[Fp], bins: &Bins) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{:>6} {:>14} {:>12} {:>14}", "bucket", "upper_bound", "count", "max");
    for (i, limit) in limits.iter().enumerate() {
        let max = match bins.max_of(i) {
            Some(m) => format!("{m:.6}"),
            None => "-".to_owned(),
        };
        let _ = writeln!(s, "{:>6} {:>14.6} {:>12} {:>14}", i, limit, bins.counts[i], max);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimingStats;
    use histo_common::RunConfig;

    fn result(name: &str, threads: usize) -> RunResult {
        RunResult {
            name: name.into(),
            config: RunConfig::new(threads, 5, 0.0, 5.0, 1000).unwrap(),
            stats: TimingStats { mean_ms: 1.5, std_dev_ms: 0.5, min_ms: 1.0, max_ms: 2.0 },
            bins: None,
        }
    }

    #[test]
    fn csv_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[result("SerialSum", 1), result("GlobalSum", 4)], ',', 2).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Size,Name,Threads,Mean,Stddev,Min,Max");
        assert_eq!(lines[1], "1000,SerialSum,1,1.50,0.50,1.00,2.00");
        assert_eq!(lines[2], "1000,GlobalSum,4,1.50,0.50,1.00,2.00");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn custom_delimiter() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[result("TreeStructuredSum", 8)], ';', 1).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Size;Name;Threads"));
        assert!(text.contains("1000;TreeStructuredSum;8;1.5;0.5;1.0;2.0"));
    }

    #[test]
    fn bins_table_marks_empty_buckets() {
        let mut b = Bins::new(2);
        b.record(0, 0.25);
        let table = format_bins(&[0.5, 1.0], &b);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("0.250000"));
        assert!(lines[2].trim_end().ends_with('-'));
    }
}
