use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use tracing::warn;

use crate::domain::{BrainPart, ProteinDraft, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::ingest::{Ingester, RawSheet, is_blank_row};
use crate::ontology::{JoinSpec, OntologyKey, OntologyTable, RecordKey};
use crate::reader::TabularReader;
use crate::schema::rename_columns;
use crate::table::{Cell, Table};
use crate::text::{split_list, strip_isoform_suffix};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct SharmaSettings {
    pub path: Utf8PathBuf,
    pub sheet: Option<String>,
    pub skip_rows: usize,
    pub id_column: String,
    pub renames: BTreeMap<String, String>,
    pub flags: Vocabulary,
}

impl Default for SharmaSettings {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("sharma.xlsx"),
            sheet: None,
            skip_rows: 0,
            id_column: "majority_protein_ids".to_string(),
            renames: default_renames(),
            flags: Vocabulary::sharma_flags(),
        }
    }
}

pub fn default_renames() -> BTreeMap<String, String> {
    [
        ("protein_names", "description"),
        ("protein_name", "description"),
        ("sequence_coverage_%", "coverage"),
        ("sequence_coverage", "coverage"),
        ("mol_weight_kda", "mw_kda"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

/// A region counts as detected for `+`, `x`, `yes`, `true`, any non-zero number or boolean true.
pub fn is_flagged(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::Bool(value) => *value,
        Cell::Number(value) => *value != 0.0,
        Cell::Text(value) => {
            let value = value.trim().to_lowercase();
            matches!(value.as_str(), "+" | "x" | "yes" | "true")
                || value.parse::<f64>().is_ok_and(|number| number != 0.0)
        }
    }
}

pub struct SharmaIngester {
    settings: SharmaSettings,
    regions: Vocabulary,
}

impl SharmaIngester {
    pub fn new(settings: SharmaSettings) -> Self {
        Self {
            settings,
            regions: Vocabulary::canonical(Study::Sharma),
        }
    }

    pub fn determine_brain_part(&self, table: &Table, row: &[Cell]) -> String {
        let mut parts: Vec<BrainPart> = Vec::new();
        for (column, cell) in table.columns.iter().zip(row) {
            let Some(part) = self.settings.flags.get(column) else {
                continue;
            };
            if is_flagged(cell) && !parts.contains(&part) {
                parts.push(part);
            }
        }
        parts
            .iter()
            .map(BrainPart::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Ingester for SharmaIngester {
    fn study(&self) -> Study {
        Study::Sharma
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.regions
    }

    fn read_raw(&self, reader: &dyn TabularReader) -> Result<Vec<RawSheet>, ProteomeError> {
        let sheet = self.settings.sheet.as_deref();
        let table = reader.read_sheet(&self.settings.path, sheet, self.settings.skip_rows)?;
        Ok(vec![RawSheet {
            label: sheet.unwrap_or_default().to_string(),
            source: self.settings.path.to_string(),
            table,
        }])
    }

    fn reshape(&self, sheets: Vec<RawSheet>) -> Result<Vec<ProteinRecord>, ProteomeError> {
        let mut records = Vec::new();
        for mut sheet in sheets {
            rename_columns(&mut sheet.table, &self.settings.renames);
            let table = &sheet.table;
            let id_idx = table.require_column(&self.settings.id_column, &sheet.source)?;

            let mut unflagged = 0usize;
            for row in table.rows.iter().filter(|row| !is_blank_row(row)) {
                let labels = self.determine_brain_part(table, row);
                if labels.is_empty() {
                    unflagged += 1;
                    continue;
                }
                // Raw candidates ride in `accession` until annotation resolves them.
                let draft = ProteinDraft {
                    protein_identifier: None,
                    accession: row[id_idx].as_text(),
                    description: table.text(row, "description"),
                    coverage: table.number(row, "coverage"),
                    mw_kda: table.number(row, "mw_kda"),
                    calc_pi: table.number(row, "calc_pi"),
                };
                records.extend(self.regions.explode(&draft, &labels)?);
            }
            if unflagged > 0 {
                warn!(source = %sheet.source, unflagged, "sharma rows without region flags skipped");
            }
        }
        Ok(records)
    }

    fn join_spec(&self) -> JoinSpec {
        JoinSpec {
            record_key: RecordKey::Accession,
            ontology_key: OntologyKey::Entry,
            backfill_identifier: false,
        }
    }

    fn annotate(&self, records: &mut [ProteinRecord], ontology: &OntologyTable) -> usize {
        let join = self.join_spec();
        let index = ontology.index(join.ontology_key);
        let mut matched = 0;
        for record in records.iter_mut() {
            let raw = join.record_key.value(record).unwrap_or_default().to_string();
            let candidates: Vec<&str> = split_list(&raw, ';')
                .into_iter()
                .map(strip_isoform_suffix)
                .filter(|candidate| !candidate.is_empty())
                .collect();

            let hit = candidates
                .iter()
                .find_map(|candidate| index.get(candidate).map(|entry| (*candidate, *entry)));
            match hit {
                Some((candidate, entry)) => {
                    record.protein_identifier = Some(candidate.to_string());
                    record.accession = Some(candidate.to_string());
                    record.annotation = entry.annotation();
                    matched += 1;
                }
                None => {
                    record.protein_identifier = None;
                    record.accession = candidates.first().map(|candidate| candidate.to_string());
                }
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::ontology::GeneOntologyEntry;
    use crate::schema::normalize_columns;

    fn sheet(rows: Vec<Vec<Cell>>) -> RawSheet {
        let mut table = Table::new(
            [
                "Majority protein IDs",
                "Protein names",
                "Sequence coverage [%]",
                "Mol. weight [kDa]",
                "Motor cortex",
                "Somatosensory cortex",
                "Cerebellum",
                "Brainstem",
            ]
            .iter()
            .map(|label| label.to_string())
            .collect(),
        );
        for row in rows {
            table.push_row(row);
        }
        normalize_columns(&mut table);
        RawSheet {
            label: String::new(),
            source: "sharma.xlsx".to_string(),
            table,
        }
    }

    fn row(ids: &str, flags: [Cell; 4]) -> Vec<Cell> {
        let mut row = vec![
            Cell::from(ids),
            Cell::from("Actin"),
            Cell::from(33.5),
            Cell::from(41.7),
        ];
        row.extend(flags);
        row
    }

    fn ontology() -> OntologyTable {
        OntologyTable::new(vec![GeneOntologyEntry {
            entry: "P60710".to_string(),
            entry_name: "ACTB_MOUSE".to_string(),
            gene_names: Some("Actb".to_string()),
            ..GeneOntologyEntry::default()
        }])
    }

    #[test]
    fn flags() {
        assert!(is_flagged(&Cell::from("+")));
        assert!(is_flagged(&Cell::from(" YES ")));
        assert!(is_flagged(&Cell::from(2.0)));
        assert!(is_flagged(&Cell::Bool(true)));
        assert!(!is_flagged(&Cell::from("0")));
        assert!(!is_flagged(&Cell::from("-")));
        assert!(!is_flagged(&Cell::Empty));
    }

    #[test]
    fn cortex_subregions_fold_into_one_part() {
        let ingester = SharmaIngester::new(SharmaSettings::default());
        let mut raw = sheet(vec![row(
            "P60710",
            [Cell::from("+"), Cell::from("+"), Cell::from("+"), Cell::Empty],
        )]);
        rename_columns(&mut raw.table, &default_renames());
        let labels = ingester.determine_brain_part(&raw.table, &raw.table.rows[0]);
        assert_eq!(labels, "cortex, cerebellum");
    }

    #[test]
    fn flagged_rows_are_exploded_and_unflagged_rows_skipped() {
        let ingester = SharmaIngester::new(SharmaSettings::default());
        let records = ingester
            .reshape(vec![sheet(vec![
                row(
                    "P60710",
                    [Cell::from("+"), Cell::Empty, Cell::from("+"), Cell::Empty],
                ),
                row("Q00000", [Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty]),
                row(
                    "P11111",
                    [Cell::Empty, Cell::Empty, Cell::Empty, Cell::from("x")],
                ),
            ])])
            .unwrap();
        let parts: Vec<_> = records.iter().map(|record| record.brain_part).collect();
        assert_eq!(
            parts,
            vec![BrainPart::Cortex, BrainPart::Cerebellum, BrainPart::Medulla]
        );
        assert_eq!(records[0].coverage, Some(33.5));
        assert_eq!(records[0].mw_kda, Some(41.7));
        assert_eq!(records[0].description.as_deref(), Some("Actin"));
    }

    #[test]
    fn first_known_candidate_becomes_identifier() {
        let ingester = SharmaIngester::new(SharmaSettings::default());
        let mut records = ingester
            .reshape(vec![sheet(vec![
                row(
                    "Q99999-2;P60710-1;P60711",
                    [Cell::Empty, Cell::Empty, Cell::from(1.0), Cell::Empty],
                ),
                row(
                    "A00001-3;A00002",
                    [Cell::Empty, Cell::Empty, Cell::from(1.0), Cell::Empty],
                ),
            ])])
            .unwrap();
        assert_eq!(
            ingester.join_spec().record_key.value(&records[0]),
            Some("Q99999-2;P60710-1;P60711")
        );

        assert_eq!(ingester.annotate(&mut records, &ontology()), 1);
        assert_eq!(records[0].protein_identifier.as_deref(), Some("P60710"));
        assert_eq!(records[0].annotation.gene_names.as_deref(), Some("Actb"));
        assert_eq!(records[1].protein_identifier, None);
        assert_eq!(records[1].accession.as_deref(), Some("A00001"));
    }

    #[test]
    fn missing_id_column_is_reported() {
        let mut raw = sheet(vec![]);
        raw.table.columns[0] = "protein_ids".to_string();
        let ingester = SharmaIngester::new(SharmaSettings::default());
        assert_matches!(
            ingester.reshape(vec![raw]),
            Err(ProteomeError::MissingColumn { ref column, .. }) if column == "majority_protein_ids"
        );
    }
}
