use std::collections::BTreeMap;

use crate::table::Table;

/// Canonical snake_case form of a spreadsheet column label.
pub fn normalize_label(label: &str) -> String {
    let stripped: String = label
        .chars()
        .filter(|ch| !matches!(ch, '#' | '[' | ']' | '.'))
        .collect();
    stripped.trim().replace(' ', "_").to_lowercase()
}

pub fn normalize_columns(table: &mut Table) {
    for column in table.columns.iter_mut() {
        *column = normalize_label(column);
    }
}

pub fn rename_columns(table: &mut Table, renames: &BTreeMap<String, String>) {
    for column in table.columns.iter_mut() {
        if let Some(target) = renames.get(column.as_str()) {
            *column = target.clone();
        }
    }
}
