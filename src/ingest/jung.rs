use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::domain::{ProteinDraft, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::ingest::{Ingester, RawSheet, collapse_duplicates, is_blank_row};
use crate::ontology::{JoinSpec, OntologyKey, RecordKey};
use crate::reader::TabularReader;
use crate::schema::rename_columns;
use crate::vocabulary::Vocabulary;

const GENE_ID: &str = "gene_id";

#[derive(Debug, Clone)]
pub struct JungSettings {
    pub path: Utf8PathBuf,
    pub skip_rows: usize,
    pub ignore_sheets: Vec<String>,
    pub renames: BTreeMap<String, String>,
    pub vocabulary: Vocabulary,
}

impl Default for JungSettings {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("jung.xlsx"),
            skip_rows: 0,
            ignore_sheets: Vec::new(),
            renames: default_renames(),
            vocabulary: Vocabulary::jung(),
        }
    }
}

pub fn default_renames() -> BTreeMap<String, String> {
    [
        ("gene", GENE_ID),
        ("gene_name", GENE_ID),
        ("gene_names", GENE_ID),
        ("gene_symbol", GENE_ID),
        ("protein_name", "description"),
        ("protein_names", "description"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

pub struct JungIngester {
    settings: JungSettings,
}

impl JungIngester {
    pub fn new(settings: JungSettings) -> Self {
        Self { settings }
    }
}

impl Ingester for JungIngester {
    fn study(&self) -> Study {
        Study::Jung
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.settings.vocabulary
    }

    fn read_raw(&self, reader: &dyn TabularReader) -> Result<Vec<RawSheet>, ProteomeError> {
        let path = &self.settings.path;
        reader
            .sheet_names(path)?
            .into_iter()
            .filter(|name| !self.settings.ignore_sheets.contains(name))
            .map(|name| {
                let table = reader.read_sheet(path, Some(&name), self.settings.skip_rows)?;
                Ok(RawSheet {
                    source: format!("{path} [{name}]"),
                    label: name,
                    table,
                })
            })
            .collect()
    }

    fn reshape(&self, sheets: Vec<RawSheet>) -> Result<Vec<ProteinRecord>, ProteomeError> {
        let mut records = Vec::new();
        for mut sheet in sheets {
            let part = self.vocabulary().map(&sheet.label)?;
            rename_columns(&mut sheet.table, &self.settings.renames);
            let gene_idx = sheet.table.require_column(GENE_ID, &sheet.source)?;

            let before = sheet.table.len();
            sheet.table.dedup_by(|row| row[gene_idx].as_text());
            debug!(
                source = %sheet.source,
                dropped = before - sheet.table.len(),
                "jung sheet deduplicated by gene id"
            );

            let table = &sheet.table;
            for row in table.rows.iter().filter(|row| !is_blank_row(row)) {
                let draft = ProteinDraft {
                    protein_identifier: row[gene_idx].as_text(),
                    accession: None,
                    description: table.text(row, "description"),
                    coverage: table.number(row, "coverage"),
                    mw_kda: table.number(row, "mw_kda"),
                    calc_pi: table.number(row, "calc_pi"),
                };
                records.push(draft.place(part));
            }
        }
        // Two sheets may name the same region.
        collapse_duplicates(&mut records);
        Ok(records)
    }

    fn join_spec(&self) -> JoinSpec {
        JoinSpec {
            record_key: RecordKey::ProteinIdentifier,
            ontology_key: OntologyKey::GeneNames,
            backfill_identifier: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BrainPart;
    use crate::ontology::{GeneOntologyEntry, OntologyTable};
    use crate::schema::normalize_columns;
    use crate::table::{Cell, Table};

    fn sheet(name: &str, genes: &[&str]) -> RawSheet {
        let mut table = Table::new(vec!["Gene Symbol".to_string(), "Intensity".to_string()]);
        for (idx, gene) in genes.iter().enumerate() {
            table.push_row(vec![Cell::from(*gene), Cell::from(idx as f64)]);
        }
        normalize_columns(&mut table);
        RawSheet {
            label: name.to_string(),
            source: format!("jung.xlsx [{name}]"),
            table,
        }
    }

    #[test]
    fn duplicates_collapse_within_and_across_sheets() {
        let ingester = JungIngester::new(JungSettings::default());
        let records = ingester
            .reshape(vec![
                sheet("Cortex", &["Actb", "Gfap", "Actb"]),
                sheet("CORTEX", &["Gfap", "Snap25"]),
                sheet("Pons", &["Actb"]),
            ])
            .unwrap();
        let keys: Vec<_> = records
            .iter()
            .map(|record| (record.identifier().unwrap_or_default(), record.brain_part))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Actb", BrainPart::Cortex),
                ("Gfap", BrainPart::Cortex),
                ("Snap25", BrainPart::Cortex),
                ("Actb", BrainPart::Pons),
            ]
        );
    }

    #[test]
    fn gene_symbols_are_backfilled_with_entry_names() {
        let ingester = JungIngester::new(JungSettings::default());
        let mut records = ingester.reshape(vec![sheet("Striatum", &["Actb", "Nope"])]).unwrap();
        let ontology = OntologyTable::new(vec![GeneOntologyEntry {
            entry: "P60710".to_string(),
            entry_name: "ACTB_MOUSE".to_string(),
            gene_names: Some("Actb Actx".to_string()),
            ..GeneOntologyEntry::default()
        }]);

        assert_eq!(ingester.annotate(&mut records, &ontology), 1);
        assert_eq!(records[0].protein_identifier.as_deref(), Some("ACTB_MOUSE"));
        assert_eq!(records[0].annotation.gene_names.as_deref(), Some("Actb Actx"));
        assert_eq!(records[1].protein_identifier.as_deref(), Some("Nope"));
    }

    #[test]
    fn unknown_sheet_is_unmapped() {
        let ingester = JungIngester::new(JungSettings::default());
        let err = ingester.reshape(vec![sheet("Spinal cord", &["Actb"])]).unwrap_err();
        assert!(matches!(err, ProteomeError::UnmappedLabel { study: Study::Jung, .. }));
    }
}
