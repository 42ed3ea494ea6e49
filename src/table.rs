use std::collections::HashSet;

use crate::error::ProteomeError;

static EMPTY: Cell = Cell::Empty;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(value) => Some(format_number(*value)),
            Cell::Bool(value) => Some(value.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn require_column(&self, name: &str, context: &str) -> Result<usize, ProteomeError> {
        self.column_index(name)
            .ok_or_else(|| ProteomeError::MissingColumn {
                context: context.to_string(),
                column: name.to_string(),
            })
    }

    pub fn cell<'a>(&'a self, row: &'a [Cell], name: &str) -> &'a Cell {
        self.column_index(name)
            .and_then(|idx| row.get(idx))
            .unwrap_or(&EMPTY)
    }

    pub fn text(&self, row: &[Cell], name: &str) -> Option<String> {
        self.cell(row, name).as_text()
    }

    pub fn number(&self, row: &[Cell], name: &str) -> Option<f64> {
        self.cell(row, name).as_number()
    }

    pub fn dedup_by<K, F>(&mut self, mut key: F)
    where
        K: Eq + std::hash::Hash,
        F: FnMut(&[Cell]) -> Option<K>,
    {
        let mut seen = HashSet::new();
        self.rows.retain(|row| match key(row) {
            Some(value) => seen.insert(value),
            None => true,
        });
    }
}
