// src/report.rs
// =============================================================================
// Writes the run records as JSON or CSV.
//
// JSON: one object per website, keyed by label:
//   {
//     "Exemple": { "url": "...", "error": "", "AccessChecker": "non conforme", ... }
//   }
//
// CSV (';' separated, for spreadsheets):
//   # 19/10/26 14:03:12
//   label;url;error;AccessChecker;...
//   Exemple;https://...;;non conforme;...
//
// Every value is a string or the failure marker, except HeadLvlChecker's
// depths which are a list of integers in JSON and "[1, 2]" in CSV.
// =============================================================================

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::analysis::RunRecord;
use crate::checker::CheckerResult;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Writes `records` to `out`. `keys` gives the checker columns and their order.
pub fn write_report<W: Write>(out: &mut W, records: &[RunRecord], keys: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, records, keys),
        OutputFormat::Csv => {
            let timestamp = chrono::Local::now().format("%d/%m/%y %H:%M:%S").to_string();
            write_csv(out, records, keys, &timestamp)
        }
    }
}

fn write_json<W: Write>(out: &mut W, records: &[RunRecord], keys: &[String]) -> Result<()> {
    let mut report = Map::new();
    for record in records {
        let mut entry = Map::new();
        entry.insert("url".to_string(), Value::String(record.url.clone()));
        entry.insert("error".to_string(), Value::String(record.error.clone()));
        for key in keys {
            let result = record.get(key).unwrap_or(&CheckerResult::Failure);
            entry.insert(key.clone(), serde_json::to_value(result)?);
        }

        // Two websites may share a label: the URL tells them apart
        let label = if report.contains_key(&record.label) {
            format!("{} ({})", record.label, record.url)
        } else {
            record.label.clone()
        };
        report.insert(label, Value::Object(entry));
    }

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, records: &[RunRecord], keys: &[String], timestamp: &str) -> Result<()> {
    writeln!(out, "# {timestamp}")?;

    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(&mut *out);

    let header = ["label", "url", "error"]
        .into_iter()
        .map(str::to_string)
        .chain(keys.iter().cloned());
    writer.write_record(header)?;

    for record in records {
        let values = keys
            .iter()
            .map(|key| record.get(key).unwrap_or(&CheckerResult::Failure).to_string());
        let row = [record.label.clone(), record.url.clone(), record.error.clone()]
            .into_iter()
            .chain(values);
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Website;
    use crate::error::FetchError;

    fn records() -> (Vec<RunRecord>, Vec<String>) {
        let keys = vec!["LangChecker".to_string(), "HeadLvlChecker".to_string()];

        let ok_site = Website {
            label: "Exemple".to_string(),
            url: "https://example.com".to_string(),
        };
        let mut ok = RunRecord::new(&ok_site);
        ok.merge(vec![
            ("LangChecker".to_string(), CheckerResult::success("fr")),
            ("HeadLvlChecker".to_string(), CheckerResult::Levels(vec![1, 2])),
        ]);

        let down_site = Website {
            label: "Hors ligne".to_string(),
            url: "https://down.example.com".to_string(),
        };
        let down = RunRecord::failed(&down_site, &FetchError::Timeout, &keys);

        (vec![ok, down], keys)
    }

    #[test]
    fn test_json_report() {
        let (records, keys) = records();
        let mut out = Vec::new();
        write_report(&mut out, &records, &keys, OutputFormat::Json).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["Exemple"]["LangChecker"], "fr");
        assert_eq!(parsed["Exemple"]["HeadLvlChecker"], serde_json::json!([1, 2]));
        assert_eq!(parsed["Exemple"]["error"], "");
        assert_eq!(parsed["Hors ligne"]["error"], "request timed out");
        assert_eq!(parsed["Hors ligne"]["LangChecker"], "échec");
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let (records, keys) = records();
        let mut out = Vec::new();
        write_report(&mut out, &records, &keys, OutputFormat::Json).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("échec"));
    }

    #[test]
    fn test_json_duplicate_labels() {
        let site = Website {
            label: "Mairie".to_string(),
            url: "https://a.example.com".to_string(),
        };
        let other = Website {
            url: "https://b.example.com".to_string(),
            ..site.clone()
        };
        let records = vec![RunRecord::new(&site), RunRecord::new(&other)];
        let mut out = Vec::new();
        write_report(&mut out, &records, &[], OutputFormat::Json).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 2);
        assert_eq!(parsed["Mairie (https://b.example.com)"]["url"], "https://b.example.com");
    }

    #[test]
    fn test_csv_report() {
        let (records, keys) = records();
        let mut out = Vec::new();
        write_csv(&mut out, &records, &keys, "19/10/26 12:00:00").unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# 19/10/26 12:00:00",
                "label;url;error;LangChecker;HeadLvlChecker",
                "Exemple;https://example.com;;fr;[1, 2]",
                "Hors ligne;https://down.example.com;request timed out;échec;échec",
            ]
        );
    }
}
