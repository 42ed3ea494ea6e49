use crate::domain::{BrainPart, Study};

const HAS_IDENTIFIER: &str = "protein_identifier IS NOT NULL AND protein_identifier != ''";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProteinQuery {
    Count {
        study: Study,
    },
    InBrainPart {
        study: Study,
        brain_part: BrainPart,
    },
    Unique {
        study: Study,
        brain_part: Option<BrainPart>,
    },
    Common {
        study: Study,
        brain_part: Option<BrainPart>,
    },
    Overlap {
        reference: Study,
        other: Study,
    },
    DistinctBrainParts {
        study: Study,
    },
    Occurrences {
        study: Study,
        identifier: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl ProteinQuery {
    pub fn build(&self) -> BuiltQuery {
        match self {
            ProteinQuery::Count { study } => BuiltQuery {
                sql: format!("SELECT COUNT(*) FROM {}", study.table_name()),
                params: Vec::new(),
            },
            ProteinQuery::InBrainPart { study, brain_part } => BuiltQuery {
                sql: format!(
                    "SELECT DISTINCT protein_identifier FROM {} WHERE brain_part = ?1 AND {HAS_IDENTIFIER} ORDER BY protein_identifier",
                    study.table_name()
                ),
                params: vec![brain_part.to_string()],
            },
            ProteinQuery::Unique { study, brain_part } => {
                grouped(*study, *brain_part, "COUNT(*) = 1")
            }
            ProteinQuery::Common { study, brain_part } => {
                grouped(*study, *brain_part, "COUNT(*) > 1")
            }
            ProteinQuery::Overlap { reference, other } => BuiltQuery {
                sql: format!(
                    "SELECT COUNT(DISTINCT protein_identifier) FROM {} WHERE {HAS_IDENTIFIER} AND protein_identifier IN (SELECT protein_identifier FROM {})",
                    reference.table_name(),
                    other.table_name()
                ),
                params: Vec::new(),
            },
            ProteinQuery::DistinctBrainParts { study } => BuiltQuery {
                sql: format!(
                    "SELECT DISTINCT brain_part FROM {} WHERE brain_part IS NOT NULL AND brain_part != '' ORDER BY brain_part",
                    study.table_name()
                ),
                params: Vec::new(),
            },
            ProteinQuery::Occurrences { study, identifier } => BuiltQuery {
                sql: format!(
                    "SELECT description, brain_part, coverage FROM {} WHERE protein_identifier = ?1 ORDER BY brain_part",
                    study.table_name()
                ),
                params: vec![identifier.clone()],
            },
        }
    }
}

fn grouped(study: Study, brain_part: Option<BrainPart>, having: &str) -> BuiltQuery {
    let table = study.table_name();
    match brain_part {
        Some(part) => BuiltQuery {
            sql: format!(
                "SELECT protein_identifier FROM {table} WHERE brain_part = ?1 AND {HAS_IDENTIFIER} GROUP BY protein_identifier HAVING {having} ORDER BY protein_identifier"
            ),
            params: vec![part.to_string()],
        },
        None => BuiltQuery {
            sql: format!(
                "SELECT protein_identifier FROM {table} WHERE {HAS_IDENTIFIER} GROUP BY protein_identifier HAVING {having} ORDER BY protein_identifier"
            ),
            params: Vec::new(),
        },
    }
}
