pub mod hrms;
pub mod jung;
pub mod sharma;
pub mod taraslia;

use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::app::{ProgressEvent, ProgressSink};
use crate::domain::{BrainPart, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::ontology::{JoinSpec, OntologyTable};
use crate::reader::TabularReader;
use crate::schema::normalize_columns;
use crate::store::Store;
use crate::table::{Cell, Table};
use crate::vocabulary::Vocabulary;

pub use hrms::{HrmsIngester, HrmsSettings};
pub use jung::{JungIngester, JungSettings};
pub use sharma::{SharmaIngester, SharmaSettings};
pub use taraslia::{TarasliaIngester, TarasliaSettings};

#[derive(Debug, Clone)]
pub struct RawSheet {
    pub label: String,
    pub source: String,
    pub table: Table,
}

pub trait Ingester {
    fn study(&self) -> Study;

    fn vocabulary(&self) -> &Vocabulary;

    fn read_raw(&self, reader: &dyn TabularReader) -> Result<Vec<RawSheet>, ProteomeError>;

    fn reshape(&self, sheets: Vec<RawSheet>) -> Result<Vec<ProteinRecord>, ProteomeError>;

    fn join_spec(&self) -> JoinSpec;

    fn annotate(&self, records: &mut [ProteinRecord], ontology: &OntologyTable) -> usize {
        ontology.annotate(records, self.join_spec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    NotIngested,
    Reading,
    Normalizing,
    Exploding,
    Annotating,
    Persisted,
    Skipped,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IngestStage::NotIngested => "NotIngested",
            IngestStage::Reading => "Reading",
            IngestStage::Normalizing => "Normalizing",
            IngestStage::Exploding => "Exploding",
            IngestStage::Annotating => "Annotating",
            IngestStage::Persisted => "Persisted",
            IngestStage::Skipped => "Skipped",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub study: Study,
    pub stage: IngestStage,
    pub sheets: usize,
    pub source_rows: usize,
    pub records: usize,
    pub annotated: usize,
    pub duplicates_collapsed: usize,
}

impl IngestReport {
    fn skipped(study: Study) -> Self {
        Self {
            study,
            stage: IngestStage::Skipped,
            sheets: 0,
            source_rows: 0,
            records: 0,
            annotated: 0,
            duplicates_collapsed: 0,
        }
    }
}

pub fn ingest_study(
    ingester: &dyn Ingester,
    reader: &dyn TabularReader,
    ontology: &OntologyTable,
    store: &mut Store,
    sink: &dyn ProgressSink,
) -> Result<IngestReport, ProteomeError> {
    let study = ingester.study();
    let start = Instant::now();
    let advance = |stage: IngestStage, message: String| {
        debug!(%study, %stage, "{message}");
        sink.event(ProgressEvent {
            study: Some(study),
            stage: Some(stage),
            message: format!("phase={stage}; {message}"),
            elapsed: Some(start.elapsed()),
        });
    };

    if store.table_exists(study)? {
        info!(%study, "table already exists, skipping ingestion");
        advance(IngestStage::Skipped, format!("table {} exists", study.table_name()));
        return Ok(IngestReport::skipped(study));
    }
    advance(IngestStage::NotIngested, format!("table {} missing", study.table_name()));

    advance(IngestStage::Reading, "reading study input".to_string());
    let mut sheets = ingester.read_raw(reader)?;
    let source_rows = sheets.iter().map(|sheet| sheet.table.len()).sum();
    let sheet_count = sheets.len();

    advance(
        IngestStage::Normalizing,
        format!("{sheet_count} sheets, {source_rows} rows"),
    );
    for sheet in sheets.iter_mut() {
        normalize_columns(&mut sheet.table);
    }

    advance(IngestStage::Exploding, "reshaping rows".to_string());
    let mut records = ingester.reshape(sheets)?;

    advance(IngestStage::Annotating, format!("{} records", records.len()));
    let annotated = ingester.annotate(&mut records, ontology);
    let duplicates_collapsed = collapse_duplicates(&mut records);
    if duplicates_collapsed > 0 {
        debug!(%study, duplicates_collapsed, "collapsed duplicate protein/brain part rows");
    }

    let written = store.create_and_insert(study, &records)?;
    advance(IngestStage::Persisted, format!("{written} rows written"));
    info!(%study, written, annotated, "study ingested");

    Ok(IngestReport {
        study,
        stage: IngestStage::Persisted,
        sheets: sheet_count,
        source_rows,
        records: written,
        annotated,
        duplicates_collapsed,
    })
}

/// Keeps the first record for every `(protein_identifier, brain_part)`.
pub fn collapse_duplicates(records: &mut Vec<ProteinRecord>) -> usize {
    let before = records.len();
    let mut seen: HashSet<(String, BrainPart)> = HashSet::new();
    records.retain(|record| match record.identifier() {
        Some(id) => seen.insert((id.to_string(), record.brain_part)),
        None => true,
    });
    before - records.len()
}

pub(crate) fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProteinDraft;

    fn record(id: Option<&str>, part: BrainPart, coverage: f64) -> ProteinRecord {
        ProteinDraft {
            protein_identifier: id.map(str::to_string),
            coverage: Some(coverage),
            ..ProteinDraft::default()
        }
        .place(part)
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let mut records = vec![
            record(Some("P1"), BrainPart::Pons, 1.0),
            record(Some("P1"), BrainPart::Pons, 2.0),
            record(Some("P1"), BrainPart::Cortex, 3.0),
            record(None, BrainPart::Pons, 4.0),
            record(None, BrainPart::Pons, 5.0),
        ];
        assert_eq!(collapse_duplicates(&mut records), 1);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].coverage, Some(1.0));
    }

    #[test]
    fn stage_labels() {
        assert_eq!(IngestStage::NotIngested.to_string(), "NotIngested");
        assert_eq!(IngestStage::Persisted.to_string(), "Persisted");
    }
}
