use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ProteomeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Study {
    Hrms,
    Taraslia,
    Jung,
    Sharma,
}

impl Study {
    pub const ALL: [Study; 4] = [Study::Hrms, Study::Taraslia, Study::Jung, Study::Sharma];

    pub fn table_name(&self) -> &'static str {
        match self {
            Study::Hrms => "hrms",
            Study::Taraslia => "taraslia",
            Study::Jung => "jung",
            Study::Sharma => "sharma",
        }
    }
}

impl fmt::Display for Study {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for Study {
    type Err = ProteomeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Study::ALL
            .into_iter()
            .find(|study| study.table_name() == normalized)
            .ok_or_else(|| ProteomeError::InvalidStudy(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrainPart {
    OlfactoryBalb,
    Hipothalamus,
    Medulla,
    MidBrain,
    Hipocampus,
    Cerebellum,
    Cortex,
    Striatum,
    Thalamus,
    Pons,
}

impl BrainPart {
    pub const ALL: [BrainPart; 10] = [
        BrainPart::OlfactoryBalb,
        BrainPart::Hipothalamus,
        BrainPart::Medulla,
        BrainPart::MidBrain,
        BrainPart::Hipocampus,
        BrainPart::Cerebellum,
        BrainPart::Cortex,
        BrainPart::Striatum,
        BrainPart::Thalamus,
        BrainPart::Pons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrainPart::OlfactoryBalb => "olfactory_balb",
            BrainPart::Hipothalamus => "hipothalamus",
            BrainPart::Medulla => "medulla",
            BrainPart::MidBrain => "mid_brain",
            BrainPart::Hipocampus => "hipocampus",
            BrainPart::Cerebellum => "cerebellum",
            BrainPart::Cortex => "cortex",
            BrainPart::Striatum => "striatum",
            BrainPart::Thalamus => "thalamus",
            BrainPart::Pons => "pons",
        }
    }
}

impl fmt::Display for BrainPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BrainPart {
    type Err = ProteomeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        BrainPart::ALL
            .into_iter()
            .find(|part| part.as_str() == trimmed)
            .ok_or_else(|| ProteomeError::InvalidBrainPart(value.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyAnnotation {
    pub gene_names: Option<String>,
    pub biological_process: Option<String>,
    pub gene_ontology: Option<String>,
    pub molecular_function: Option<String>,
    pub cellular_component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinRecord {
    pub protein_identifier: Option<String>,
    pub accession: Option<String>,
    pub description: Option<String>,
    pub brain_part: BrainPart,
    pub coverage: Option<f64>,
    pub mw_kda: Option<f64>,
    pub calc_pi: Option<f64>,
    pub annotation: OntologyAnnotation,
}

impl ProteinRecord {
    pub fn identifier(&self) -> Option<&str> {
        self.protein_identifier
            .as_deref()
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProteinDraft {
    pub protein_identifier: Option<String>,
    pub accession: Option<String>,
    pub description: Option<String>,
    pub coverage: Option<f64>,
    pub mw_kda: Option<f64>,
    pub calc_pi: Option<f64>,
}

impl ProteinDraft {
    pub fn place(&self, brain_part: BrainPart) -> ProteinRecord {
        ProteinRecord {
            protein_identifier: self.protein_identifier.clone(),
            accession: self.accession.clone(),
            description: self.description.clone(),
            brain_part,
            coverage: self.coverage,
            mw_kda: self.mw_kda,
            calc_pi: self.calc_pi,
            annotation: OntologyAnnotation::default(),
        }
    }
}
