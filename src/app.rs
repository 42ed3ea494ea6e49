use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::analytics::{self, OverlapProfile, StudyProfile};
use crate::config::ResolvedConfig;
use crate::domain::Study;
use crate::error::ProteomeError;
use crate::ingest::{
    HrmsIngester, IngestReport, IngestStage, Ingester, JungIngester, SharmaIngester,
    TarasliaIngester, ingest_study,
};
use crate::ontology::OntologyTable;
use crate::reader::TabularReader;
use crate::report::{ChartRenderer, Reporter};
use crate::store::{Occurrence, Store};

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub study: Option<Study>,
    pub stage: Option<IngestStage>,
    pub message: String,
    pub elapsed: Option<Duration>,
}

impl ProgressEvent {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            study: None,
            stage: None,
            message: message.into(),
            elapsed: None,
        }
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyFailure {
    pub study: Study,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct IngestSummary {
    pub reports: Vec<IngestReport>,
    pub failures: Vec<StudyFailure>,
    pub ontology_entries: usize,
    #[serde(skip)]
    first_error: Option<ProteomeError>,
}

impl IngestSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first per-study failure, once. Later calls return `None`.
    pub fn take_error(&mut self) -> Option<ProteomeError> {
        self.first_error.take()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub profiles: Vec<StudyProfile>,
    pub overlap: Option<OverlapProfile>,
    pub missing: Vec<Study>,
    pub charts: Vec<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub ingest: IngestSummary,
    pub report: Option<ReportSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowResult {
    pub study: Study,
    pub identifier: String,
    pub occurrences: Vec<Occurrence>,
}

pub struct App<R: TabularReader, C: ChartRenderer> {
    store: Store,
    reader: R,
    renderer: C,
    config: ResolvedConfig,
}

impl<R: TabularReader, C: ChartRenderer> App<R, C> {
    pub fn new(store: Store, reader: R, renderer: C, config: ResolvedConfig) -> Self {
        Self {
            store,
            reader,
            renderer,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn ingester(&self, study: Study) -> Box<dyn Ingester> {
        match study {
            Study::Hrms => Box::new(HrmsIngester::new(self.config.hrms.clone())),
            Study::Taraslia => Box::new(TarasliaIngester::new(self.config.taraslia.clone())),
            Study::Jung => Box::new(JungIngester::new(self.config.jung.clone())),
            Study::Sharma => Box::new(SharmaIngester::new(self.config.sharma.clone())),
        }
    }

    pub fn load_ontology(&self) -> Result<OntologyTable, ProteomeError> {
        let table = self.reader.read_sheet(&self.config.gene_ontology, None, 0)?;
        let ontology = OntologyTable::from_table(&table)?;
        info!(
            path = %self.config.gene_ontology,
            entries = ontology.len(),
            "gene ontology loaded"
        );
        Ok(ontology)
    }

    /// Ingests `studies` in order. A failing study does not stop the others; every failure is
    /// recorded and the first one is kept for the caller.
    pub fn ingest(
        &mut self,
        studies: &[Study],
        sink: &dyn ProgressSink,
    ) -> Result<IngestSummary, ProteomeError> {
        let mut pending = false;
        for study in studies {
            pending |= !self.store.table_exists(*study)?;
        }
        let ontology = if pending {
            sink.event(ProgressEvent::message(format!(
                "phase=Annotating; loading {}",
                self.config.gene_ontology
            )));
            self.load_ontology()?
        } else {
            OntologyTable::default()
        };

        let mut summary = IngestSummary {
            reports: Vec::new(),
            failures: Vec::new(),
            ontology_entries: ontology.len(),
            first_error: None,
        };
        for &study in studies {
            let ingester = self.ingester(study);
            match ingest_study(ingester.as_ref(), &self.reader, &ontology, &mut self.store, sink) {
                Ok(report) => summary.reports.push(report),
                Err(err) => {
                    error!(%study, error = %err, "study ingestion failed");
                    summary.failures.push(StudyFailure {
                        study,
                        error: err.to_string(),
                    });
                    summary.first_error.get_or_insert(err);
                }
            }
        }
        Ok(summary)
    }

    pub fn report(&self, sink: &dyn ProgressSink) -> Result<ReportSummary, ProteomeError> {
        let reporter = Reporter::new(&self.renderer);
        let mut summary = ReportSummary {
            profiles: Vec::new(),
            overlap: None,
            missing: Vec::new(),
            charts: Vec::new(),
        };

        let mut present = Vec::new();
        for study in Study::ALL {
            if self.store.table_exists(study)? {
                present.push(study);
            } else {
                warn!(%study, "no table, study left out of the report");
                summary.missing.push(study);
            }
        }

        for &study in &present {
            sink.event(ProgressEvent {
                study: Some(study),
                stage: None,
                message: format!("phase=Report; profiling {study}"),
                elapsed: None,
            });
            let profile = analytics::brain_part_profile(&self.store, study)?;
            if let Some(chart) = reporter.study_chart(&profile)? {
                summary.charts.push(chart);
            }
            summary.profiles.push(profile);
        }

        let reference = self.config.reference_study;
        if present.contains(&reference) {
            sink.event(ProgressEvent::message(format!(
                "phase=Report; overlap with {reference}"
            )));
            let overlap = analytics::overlap_profile(&self.store, reference, &present)?;
            if let Some(chart) = reporter.overlap_chart(&overlap)? {
                summary.charts.push(chart);
            }
            summary.overlap = Some(overlap);
        }

        Ok(summary)
    }

    pub fn run(&mut self, sink: &dyn ProgressSink) -> Result<RunSummary, ProteomeError> {
        let ingest = self.ingest(&Study::ALL, sink)?;
        let report = if ingest.is_success() {
            Some(self.report(sink)?)
        } else {
            None
        };
        Ok(RunSummary { ingest, report })
    }

    pub fn show(&self, study: Study, identifier: &str) -> Result<ShowResult, ProteomeError> {
        if !self.store.table_exists(study)? {
            return Err(ProteomeError::Store(format!(
                "table {} does not exist; run ingest first",
                study.table_name()
            )));
        }
        Ok(ShowResult {
            study,
            identifier: identifier.to_string(),
            occurrences: analytics::protein_occurrences(&self.store, study, identifier)?,
        })
    }

    pub fn close(self) -> Result<(), ProteomeError> {
        self.store.close()
    }
}
