use std::fs;

use calamine::{Data, Reader, open_workbook_auto};
use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ProteomeError;
use crate::table::{Cell, Table};

pub trait TabularReader {
    fn read_sheet(
        &self,
        path: &Utf8Path,
        sheet: Option<&str>,
        skip_rows: usize,
    ) -> Result<Table, ProteomeError>;

    fn sheet_names(&self, path: &Utf8Path) -> Result<Vec<String>, ProteomeError>;

    fn list_workbooks(&self, dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ProteomeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookReader;

impl WorkbookReader {
    pub fn new() -> Self {
        Self
    }

    fn read_delimited(
        &self,
        path: &Utf8Path,
        delimiter: u8,
        skip_rows: usize,
    ) -> Result<Table, ProteomeError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path.as_std_path())
            .map_err(|err| ProteomeError::Workbook(format!("{path}: {err}")))?;

        let mut records = reader.records().skip(skip_rows);
        let header = match records.next() {
            Some(record) => {
                record.map_err(|err| ProteomeError::Workbook(format!("{path}: {err}")))?
            }
            None => return Ok(Table::default()),
        };
        let mut table = Table::new(header.iter().map(str::to_string).collect());
        for record in records {
            let record = record.map_err(|err| ProteomeError::Workbook(format!("{path}: {err}")))?;
            table.push_row(record.iter().map(Cell::from).collect());
        }
        Ok(table)
    }
}

impl TabularReader for WorkbookReader {
    fn read_sheet(
        &self,
        path: &Utf8Path,
        sheet: Option<&str>,
        skip_rows: usize,
    ) -> Result<Table, ProteomeError> {
        if !path.as_std_path().is_file() {
            return Err(ProteomeError::MissingInput(path.to_path_buf()));
        }
        match path.extension().map(str::to_lowercase).as_deref() {
            Some("tsv") | Some("tab") => return self.read_delimited(path, b'\t', skip_rows),
            Some("csv") => return self.read_delimited(path, b',', skip_rows),
            _ => {}
        }

        let mut workbook = open_workbook_auto(path.as_std_path())
            .map_err(|err| ProteomeError::Workbook(format!("{path}: {err}")))?;
        let range = match sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|candidate| candidate == name) {
                    return Err(ProteomeError::MissingSheet {
                        path: path.to_path_buf(),
                        sheet: name.to_string(),
                    });
                }
                workbook
                    .worksheet_range(name)
                    .map_err(|err| ProteomeError::Workbook(format!("{path} [{name}]: {err}")))?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| ProteomeError::MissingSheet {
                    path: path.to_path_buf(),
                    sheet: "#0".to_string(),
                })?
                .map_err(|err| ProteomeError::Workbook(format!("{path}: {err}")))?,
        };

        let mut rows = range.rows().skip(skip_rows);
        let Some(header) = rows.next() else {
            return Ok(Table::default());
        };
        let mut table = Table::new(
            header
                .iter()
                .map(|cell| convert_cell(cell).as_text().unwrap_or_default())
                .collect(),
        );
        for row in rows {
            table.push_row(row.iter().map(convert_cell).collect());
        }
        Ok(table)
    }

    fn sheet_names(&self, path: &Utf8Path) -> Result<Vec<String>, ProteomeError> {
        if !path.as_std_path().is_file() {
            return Err(ProteomeError::MissingInput(path.to_path_buf()));
        }
        let workbook = open_workbook_auto(path.as_std_path())
            .map_err(|err| ProteomeError::Workbook(format!("{path}: {err}")))?;
        Ok(workbook.sheet_names())
    }

    fn list_workbooks(&self, dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ProteomeError> {
        if !dir.as_std_path().is_dir() {
            return Err(ProteomeError::MissingInput(dir.to_path_buf()));
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir.as_std_path())
            .map_err(|err| ProteomeError::Filesystem(err.to_string()))?
        {
            let entry = entry.map_err(|err| ProteomeError::Filesystem(err.to_string()))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_study_workbook(&name) {
                paths.push(dir.join(name));
            }
        }
        paths.sort();
        Ok(paths)
    }
}

pub fn is_study_workbook(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    !(lower.starts_with("supplementary") || lower.starts_with('.') || !lower.ends_with("xlsx"))
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_filter() {
        assert!(is_study_workbook("mouse_brain_-_cortex_7_weeks.xlsx"));
        assert!(is_study_workbook("Mouse_Brain_-_Pons_7_weeks.XLSX"));
        assert!(!is_study_workbook("Supplementary Table 1.xlsx"));
        assert!(!is_study_workbook(".~lock.cortex.xlsx"));
        assert!(!is_study_workbook("notes.csv"));
    }

    #[test]
    fn tsv_reference_file_is_read_with_header_skip() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("go.tsv")).unwrap();
        std::fs::write(
            path.as_std_path(),
            "exported from uniprot\nEntry\tEntry Name\tGene Names\nP60710\tACTB_MOUSE\tActb\nQ1\tQ1_MOUSE\n",
        )
        .unwrap();

        let table = WorkbookReader::new().read_sheet(&path, None, 1).unwrap();
        assert_eq!(table.columns, vec!["Entry", "Entry Name", "Gene Names"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.text(&table.rows[0], "Gene Names").as_deref(), Some("Actb"));
        assert_eq!(table.cell(&table.rows[1], "Gene Names"), &Cell::Empty);
    }

    #[test]
    fn missing_file_is_missing_input() {
        let err = WorkbookReader::new()
            .read_sheet(Utf8Path::new("/nonexistent/study.xlsx"), None, 0)
            .unwrap_err();
        assert!(matches!(err, ProteomeError::MissingInput(_)));
    }

    #[test]
    fn listing_skips_supplementary_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for name in [
            "mouse_brain_-_pons_7_weeks.xlsx",
            "mouse_brain_-_cortex_7_weeks.xlsx",
            "supplementary_methods.xlsx",
            "readme.txt",
        ] {
            std::fs::write(root.join(name).as_std_path(), b"").unwrap();
        }
        let found = WorkbookReader::new().list_workbooks(&root).unwrap();
        let names: Vec<_> = found.iter().filter_map(|path| path.file_name()).collect();
        assert_eq!(
            names,
            vec!["mouse_brain_-_cortex_7_weeks.xlsx", "mouse_brain_-_pons_7_weeks.xlsx"]
        );
    }
}
