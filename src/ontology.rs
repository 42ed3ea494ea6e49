use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{OntologyAnnotation, ProteinRecord};
use crate::error::ProteomeError;
use crate::schema::normalize_label;
use crate::table::{Cell, Table};

const ENTRY: &str = "Entry";
const ENTRY_NAME: &str = "Entry Name";
const GENE_NAMES: &str = "Gene Names";
const BIOLOGICAL_PROCESS: &str = "Gene Ontology (biological process)";
const GENE_ONTOLOGY: &str = "Gene Ontology (GO)";
const MOLECULAR_FUNCTION: &str = "Gene Ontology (molecular function)";
const CELLULAR_COMPONENT: &str = "Gene Ontology (cellular component)";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneOntologyEntry {
    pub entry: String,
    pub entry_name: String,
    pub gene_names: Option<String>,
    pub biological_process: Option<String>,
    pub gene_ontology: Option<String>,
    pub molecular_function: Option<String>,
    pub cellular_component: Option<String>,
}

impl GeneOntologyEntry {
    pub fn annotation(&self) -> OntologyAnnotation {
        OntologyAnnotation {
            gene_names: self.gene_names.clone(),
            biological_process: self.biological_process.clone(),
            gene_ontology: self.gene_ontology.clone(),
            molecular_function: self.molecular_function.clone(),
            cellular_component: self.cellular_component.clone(),
        }
    }

    fn field(&self, key: OntologyKey) -> Option<&str> {
        match key {
            OntologyKey::Entry => Some(self.entry.as_str()),
            OntologyKey::EntryName => Some(self.entry_name.as_str()),
            OntologyKey::GeneNames => self.gene_names.as_deref(),
        }
    }

    pub fn join_value(&self, key: OntologyKey) -> Option<&str> {
        self.field(key)
            .and_then(|value| value.split_whitespace().next())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OntologyKey {
    Entry,
    EntryName,
    GeneNames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKey {
    ProteinIdentifier,
    Accession,
}

impl RecordKey {
    pub fn value<'a>(&self, record: &'a ProteinRecord) -> Option<&'a str> {
        match self {
            RecordKey::ProteinIdentifier => record.protein_identifier.as_deref(),
            RecordKey::Accession => record.accession.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSpec {
    pub record_key: RecordKey,
    pub ontology_key: OntologyKey,
    pub backfill_identifier: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OntologyTable {
    entries: Vec<GeneOntologyEntry>,
}

impl OntologyTable {
    pub fn new(entries: Vec<GeneOntologyEntry>) -> Self {
        Self { entries }
    }

    pub fn from_table(table: &Table) -> Result<Self, ProteomeError> {
        let position = |label: &str| {
            let wanted = normalize_label(label);
            table
                .columns
                .iter()
                .position(|column| normalize_label(column) == wanted)
        };
        let required = |label: &str| {
            position(label).ok_or_else(|| ProteomeError::MissingColumn {
                context: "gene ontology table".to_string(),
                column: label.to_string(),
            })
        };

        let entry_idx = required(ENTRY)?;
        let entry_name_idx = required(ENTRY_NAME)?;
        let gene_names_idx = position(GENE_NAMES);
        let process_idx = position(BIOLOGICAL_PROCESS);
        let go_idx = position(GENE_ONTOLOGY);
        let function_idx = position(MOLECULAR_FUNCTION);
        let component_idx = position(CELLULAR_COMPONENT);

        let optional = |row: &[Cell], idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx)).and_then(|cell| cell.as_text())
        };

        let entries = table
            .rows
            .iter()
            .filter_map(|row| {
                let row = row.as_slice();
                let entry = row.get(entry_idx).and_then(|cell| cell.as_text())?;
                Some(GeneOntologyEntry {
                    entry,
                    entry_name: optional(row, Some(entry_name_idx)).unwrap_or_default(),
                    gene_names: optional(row, gene_names_idx),
                    biological_process: optional(row, process_idx),
                    gene_ontology: optional(row, go_idx),
                    molecular_function: optional(row, function_idx),
                    cellular_component: optional(row, component_idx),
                })
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[GeneOntologyEntry] {
        &self.entries
    }

    /// Join value to entry. Built in reference order so later entries replace earlier ones.
    pub fn index(&self, key: OntologyKey) -> HashMap<&str, &GeneOntologyEntry> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            if let Some(value) = entry.join_value(key) {
                index.insert(value, entry);
            }
        }
        index
    }

    pub fn lookup(&self, key: OntologyKey, value: &str) -> Option<&GeneOntologyEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.join_value(key) == Some(value))
    }

    pub fn annotate(&self, records: &mut [ProteinRecord], join: JoinSpec) -> usize {
        let index = self.index(join.ontology_key);
        let mut matched = 0;
        for record in records.iter_mut() {
            let Some(entry) = join.record_key.value(record).and_then(|value| index.get(value))
            else {
                continue;
            };
            record.annotation = entry.annotation();
            if join.backfill_identifier {
                record.protein_identifier = Some(entry.entry_name.clone());
            }
            matched += 1;
        }
        matched
    }
}
