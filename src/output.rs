use std::io::{self, Write};

use serde::Serialize;

use crate::app::{IngestSummary, ProgressEvent, ProgressSink, ReportSummary, RunSummary, ShowResult};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    command: &'a str,
    generated_at: String,
    result: &'a T,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_ingest(result: &IngestSummary) -> io::Result<()> {
        Self::print_json("ingest", result)
    }

    pub fn print_report(result: &ReportSummary) -> io::Result<()> {
        Self::print_json("report", result)
    }

    pub fn print_run(result: &RunSummary) -> io::Result<()> {
        Self::print_json("run", result)
    }

    pub fn print_show(result: &ShowResult) -> io::Result<()> {
        Self::print_json("show", result)
    }

    fn print_json<T: Serialize>(command: &str, value: &T) -> io::Result<()> {
        let envelope = Envelope {
            command,
            generated_at: chrono::Utc::now().to_rfc3339(),
            result: value,
        };
        let json = serde_json::to_string_pretty(&envelope).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn event(&self, event: ProgressEvent) {
        let study = event
            .study
            .map(|study| format!("[{study}] "))
            .unwrap_or_default();
        match event.elapsed {
            Some(elapsed) => eprintln!(
                "{study}{} ({:.1}s)",
                event.message,
                elapsed.as_secs_f64()
            ),
            None => eprintln!("{study}{}", event.message),
        }
    }
}

pub fn print_ingest_summary(summary: &IngestSummary) {
    println!("Ingestion ({} ontology entries)", summary.ontology_entries);
    for report in &summary.reports {
        println!(
            "  {:<9} {:<10} sheets={} rows={} records={} annotated={} collapsed={}",
            report.study.to_string(),
            report.stage.to_string(),
            report.sheets,
            report.source_rows,
            report.records,
            report.annotated,
            report.duplicates_collapsed
        );
    }
    for failure in &summary.failures {
        println!("  {:<9} FAILED     {}", failure.study.to_string(), failure.error);
    }
}

pub fn print_report_summary(summary: &ReportSummary) {
    for profile in &summary.profiles {
        println!(
            "{}: {} rows, {} unique, {} common",
            profile.study, profile.rows, profile.unique, profile.common
        );
        for part in &profile.brain_parts {
            println!(
                "  {:<15} proteins={:<6} unique={:<6} common={}",
                part.brain_part.to_string(),
                part.proteins,
                part.unique,
                part.common
            );
        }
    }
    if let Some(overlap) = &summary.overlap {
        println!("Overlap with {}:", overlap.reference);
        for entry in &overlap.overlaps {
            println!("  {:<9} {}", entry.study.to_string(), entry.shared);
        }
    }
    for study in &summary.missing {
        println!("{study}: not ingested");
    }
    for chart in &summary.charts {
        println!("chart: {chart}");
    }
}

pub fn print_show(result: &ShowResult) {
    println!("{} in {}:", result.identifier, result.study);
    if result.occurrences.is_empty() {
        println!("  not found");
    }
    for hit in &result.occurrences {
        let coverage = hit
            .coverage
            .map(|value| format!("{value:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<15} {:>7}  {}",
            hit.brain_part,
            coverage,
            hit.description.as_deref().unwrap_or("")
        );
    }
}
