use std::collections::BTreeMap;

use camino::Utf8PathBuf;

use crate::domain::{ProteinDraft, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::ingest::{Ingester, RawSheet, is_blank_row};
use crate::ontology::{JoinSpec, OntologyKey, RecordKey};
use crate::reader::TabularReader;
use crate::schema::rename_columns;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct TarasliaSettings {
    pub path: Utf8PathBuf,
    pub skip_rows: usize,
    pub renames: BTreeMap<String, String>,
    pub vocabulary: Vocabulary,
}

impl Default for TarasliaSettings {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("taraslia.xlsx"),
            skip_rows: 1,
            renames: default_renames(),
            vocabulary: Vocabulary::taraslia(),
        }
    }
}

pub fn default_renames() -> BTreeMap<String, String> {
    [
        ("brain_region", "brain_part"),
        ("brain_regions", "brain_part"),
        ("protein_name", "description"),
        ("protein_names", "description"),
        ("uniprot_accession", "accession"),
        ("accession_number", "accession"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

pub struct TarasliaIngester {
    settings: TarasliaSettings,
}

impl TarasliaIngester {
    pub fn new(settings: TarasliaSettings) -> Self {
        Self { settings }
    }
}

impl Ingester for TarasliaIngester {
    fn study(&self) -> Study {
        Study::Taraslia
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.settings.vocabulary
    }

    fn read_raw(&self, reader: &dyn TabularReader) -> Result<Vec<RawSheet>, ProteomeError> {
        let table = reader.read_sheet(&self.settings.path, None, self.settings.skip_rows)?;
        Ok(vec![RawSheet {
            label: String::new(),
            source: self.settings.path.to_string(),
            table,
        }])
    }

    fn reshape(&self, sheets: Vec<RawSheet>) -> Result<Vec<ProteinRecord>, ProteomeError> {
        let mut records = Vec::new();
        for mut sheet in sheets {
            rename_columns(&mut sheet.table, &self.settings.renames);
            let table = &sheet.table;
            table.require_column("brain_part", &sheet.source)?;
            table.require_column("accession", &sheet.source)?;

            for row in table.rows.iter().filter(|row| !is_blank_row(row)) {
                let accession = table.text(row, "accession");
                let draft = ProteinDraft {
                    protein_identifier: accession.clone(),
                    accession,
                    description: table.text(row, "description"),
                    coverage: table.number(row, "coverage"),
                    mw_kda: table.number(row, "mw_kda"),
                    calc_pi: table.number(row, "calc_pi"),
                };
                let labels = table.text(row, "brain_part").unwrap_or_default();
                records.extend(self.vocabulary().explode(&draft, &labels.to_uppercase())?);
            }
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
