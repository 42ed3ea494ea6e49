use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::Serialize;
use tracing::debug;

use crate::domain::{BrainPart, OntologyAnnotation, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::query::ProteinQuery;

const CREATE_COLUMNS: &str = "
    protein_identifier  TEXT,
    accession           TEXT,
    description         TEXT,
    brain_part          TEXT NOT NULL,
    coverage            REAL,
    mw_kda              REAL,
    calc_pi             REAL,
    gene_names          TEXT,
    biological_process  TEXT,
    gene_ontology       TEXT,
    molecular_function  TEXT,
    cellular_component  TEXT";

const COLUMN_LIST: &str = "protein_identifier, accession, description, brain_part, coverage, mw_kda, calc_pi, \
     gene_names, biological_process, gene_ontology, molecular_function, cellular_component";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub description: Option<String>,
    pub brain_part: String,
    pub coverage: Option<f64>,
}

pub struct Store {
    conn: Connection,
    path: Option<Utf8PathBuf>,
}

impl Store {
    pub fn open(path: &Utf8Path) -> Result<Self, ProteomeError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            std::fs::create_dir_all(parent.as_std_path())
                .map_err(|err| ProteomeError::Filesystem(err.to_string()))?;
        }
        let conn = Connection::open(path.as_std_path())?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, ProteomeError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn table_exists(&self, study: Study) -> Result<bool, ProteomeError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [study.table_name()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Creates the study table and inserts every record in one transaction.
    pub fn create_and_insert(
        &mut self,
        study: Study,
        records: &[ProteinRecord],
    ) -> Result<usize, ProteomeError> {
        let table = study.table_name();
        let tx = self.conn.transaction()?;
        tx.execute(&format!("CREATE TABLE {table} ({CREATE_COLUMNS})"), ())?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} ({COLUMN_LIST}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ))?;
            for record in records {
                let annotation = &record.annotation;
                stmt.execute(params![
                    record.protein_identifier,
                    record.accession,
                    record.description,
                    record.brain_part.as_str(),
                    record.coverage,
                    record.mw_kda,
                    record.calc_pi,
                    annotation.gene_names,
                    annotation.biological_process,
                    annotation.gene_ontology,
                    annotation.molecular_function,
                    annotation.cellular_component,
                ])?;
            }
        }
        tx.commit()?;
        debug!(table, rows = records.len(), "study table written");
        Ok(records.len())
    }

    pub fn count(&self, study: Study) -> Result<usize, ProteomeError> {
        let count = self.scalar(&ProteinQuery::Count { study })?;
        Ok(count as usize)
    }

    pub fn scalar(&self, query: &ProteinQuery) -> Result<i64, ProteomeError> {
        let built = query.build();
        let value = self
            .conn
            .query_row(&built.sql, params_from_iter(built.params.iter()), |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    pub fn strings(&self, query: &ProteinQuery) -> Result<Vec<String>, ProteomeError> {
        let built = query.build();
        let mut stmt = self.conn.prepare(&built.sql)?;
        let rows = stmt.query_map(params_from_iter(built.params.iter()), |row| {
            row.get::<_, String>(0)
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn occurrences(
        &self,
        study: Study,
        identifier: &str,
    ) -> Result<Vec<Occurrence>, ProteomeError> {
        let built = ProteinQuery::Occurrences {
            study,
            identifier: identifier.to_string(),
        }
        .build();
        let mut stmt = self.conn.prepare(&built.sql)?;
        let rows = stmt.query_map(params_from_iter(built.params.iter()), |row| {
            Ok(Occurrence {
                description: row.get(0)?,
                brain_part: row.get(1)?,
                coverage: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn records(&self, study: Study) -> Result<Vec<ProteinRecord>, ProteomeError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMN_LIST} FROM {} ORDER BY rowid",
            study.table_name()
        ))?;
        let rows = stmt.query_map((), |row| {
            let brain_part: String = row.get(3)?;
            let record = ProteinRecord {
                protein_identifier: row.get(0)?,
                accession: row.get(1)?,
                description: row.get(2)?,
                brain_part: BrainPart::Cortex,
                coverage: row.get(4)?,
                mw_kda: row.get(5)?,
                calc_pi: row.get(6)?,
                annotation: OntologyAnnotation {
                    gene_names: row.get(7)?,
                    biological_process: row.get(8)?,
                    gene_ontology: row.get(9)?,
                    molecular_function: row.get(10)?,
                    cellular_component: row.get(11)?,
                },
            };
            Ok((brain_part, record))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (brain_part, mut record) = row?;
            record.brain_part = brain_part.parse()?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn close(self) -> Result<(), ProteomeError> {
        self.conn
            .close()
            .map_err(|(_, err)| ProteomeError::Store(err.to_string()))
    }
}
