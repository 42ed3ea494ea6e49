use camino::Utf8PathBuf;
use tracing::debug;

use crate::domain::{ProteinDraft, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::ingest::{Ingester, RawSheet, is_blank_row};
use crate::ontology::{JoinSpec, OntologyKey, RecordKey};
use crate::reader::TabularReader;
use crate::text::{extract_species_tagged_token, truncate_before};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct HrmsSettings {
    pub directory: Utf8PathBuf,
    pub prefix: String,
    pub suffix: String,
    pub species_tag: String,
    pub description_marker: String,
    pub vocabulary: Vocabulary,
}

impl Default for HrmsSettings {
    fn default() -> Self {
        Self {
            directory: Utf8PathBuf::from("MOUSE BRAIN PROTEOME HRMS"),
            prefix: "mouse_brain_-_".to_string(),
            suffix: "_7_weeks".to_string(),
            species_tag: "_MOUSE".to_string(),
            description_marker: "OS=".to_string(),
            vocabulary: Vocabulary::hrms(),
        }
    }
}

pub struct HrmsIngester {
    settings: HrmsSettings,
}

impl HrmsIngester {
    pub fn new(settings: HrmsSettings) -> Self {
        Self { settings }
    }

    pub fn region_label(&self, file_stem: &str) -> String {
        let lower = file_stem.to_lowercase();
        let prefix = self.settings.prefix.to_lowercase();
        let suffix = self.settings.suffix.to_lowercase();
        let rest = lower.strip_prefix(prefix.as_str()).unwrap_or(&lower);
        truncate_before(rest, &suffix).to_string()
    }
}

impl Ingester for HrmsIngester {
    fn study(&self) -> Study {
        Study::Hrms
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.settings.vocabulary
    }

    fn read_raw(&self, reader: &dyn TabularReader) -> Result<Vec<RawSheet>, ProteomeError> {
        let paths = reader.list_workbooks(&self.settings.directory)?;
        if paths.is_empty() {
            return Err(ProteomeError::MissingInput(self.settings.directory.clone()));
        }
        paths
            .into_iter()
            .map(|path| {
                let label = self.region_label(path.file_stem().unwrap_or_default());
                let table = reader.read_sheet(&path, None, 0)?;
                Ok(RawSheet {
                    label,
                    source: path.to_string(),
                    table,
                })
            })
            .collect()
    }

    fn reshape(&self, sheets: Vec<RawSheet>) -> Result<Vec<ProteinRecord>, ProteomeError> {
        let mut records = Vec::new();
        for sheet in sheets {
            let part = self.vocabulary().map(&sheet.label)?;
            let table = &sheet.table;
            table.require_column("description", &sheet.source)?;

            for row in table.rows.iter().filter(|row| !is_blank_row(row)) {
                let raw_description = table.text(row, "description").unwrap_or_default();
                let accession = table.text(row, "accession");
                // No species token means no identifier; the row stays unannotated.
                let protein_identifier =
                    extract_species_tagged_token(&raw_description, &self.settings.species_tag)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string);
                let description =
                    truncate_before(&raw_description, &self.settings.description_marker);

                let draft = ProteinDraft {
                    protein_identifier,
                    accession,
                    description: (!description.is_empty()).then(|| description.to_string()),
                    coverage: table.number(row, "coverage"),
                    mw_kda: table.number(row, "mw_kda"),
                    calc_pi: table.number(row, "calc_pi"),
                };
                records.push(draft.place(part));
            }
            debug!(source = %sheet.source, brain_part = %part, "hrms sheet reshaped");
        }
        Ok(records)
    }

    fn join_spec(&self) -> JoinSpec {
        JoinSpec {
            record_key: RecordKey::ProteinIdentifier,
            ontology_key: OntologyKey::Entry,
            backfill_identifier: false,
        }
    }
}
