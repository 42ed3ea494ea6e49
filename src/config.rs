use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::domain::{BrainPart, Study};
use crate::error::ProteomeError;
use crate::ingest::{HrmsSettings, JungSettings, SharmaSettings, TarasliaSettings};

pub const DEFAULT_CONFIG_FILE: &str = "brain-proteome.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub gene_ontology: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub reference_study: Option<Study>,
    #[serde(default)]
    pub hrms: StudyEntry,
    #[serde(default)]
    pub taraslia: StudyEntry,
    #[serde(default)]
    pub jung: StudyEntry,
    #[serde(default)]
    pub sharma: StudyEntry,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StudyEntry {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub skip_rows: Option<usize>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub id_column: Option<String>,
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, BrainPart>,
    #[serde(default)]
    pub ignore_sheets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub database: Utf8PathBuf,
    pub gene_ontology: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub reference_study: Study,
    pub hrms: HrmsSettings,
    pub taraslia: TarasliaSettings,
    pub jung: JungSettings,
    pub sharma: SharmaSettings,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            database: Utf8PathBuf::from("biotechnology.db"),
            gene_ontology: Utf8PathBuf::from("gene_ontology.tsv"),
            output_dir: Utf8PathBuf::from("reports"),
            reference_study: Study::Hrms,
            hrms: HrmsSettings::default(),
            taraslia: TarasliaSettings::default(),
            jung: JungSettings::default(),
            sharma: SharmaSettings::default(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `brain-proteome.json` from the working directory when present.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, ProteomeError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Self::resolve_config(Config::default(), Utf8Path::new(""));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ProteomeError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| ProteomeError::ConfigParse(err.to_string()))?;

        let base = config_path.parent().unwrap_or(Utf8Path::new(""));
        Self::resolve_config(config, base)
    }

    pub fn resolve_config(config: Config, base: &Utf8Path) -> Result<ResolvedConfig, ProteomeError> {
        let defaults = ResolvedConfig::default();
        let schema_version = config.schema_version.unwrap_or(defaults.schema_version);
        if schema_version != 1 {
            return Err(ProteomeError::ConfigParse(format!(
                "unsupported schema_version {schema_version}"
            )));
        }

        let locate = |value: Option<String>, default: Utf8PathBuf| -> Result<_, ProteomeError> {
            let path = match value {
                Some(value) if value.trim().is_empty() => {
                    return Err(ProteomeError::ConfigParse("empty path".to_string()));
                }
                Some(value) => Utf8PathBuf::from(value),
                None => default,
            };
            Ok(if path.is_absolute() {
                path
            } else {
                base.join(path)
            })
        };

        let Config {
            database,
            gene_ontology,
            output_dir,
            reference_study,
            hrms: hrms_entry,
            taraslia: taraslia_entry,
            jung: jung_entry,
            sharma: sharma_entry,
            ..
        } = config;

        let mut hrms = defaults.hrms;
        hrms.directory = locate(hrms_entry.path, hrms.directory)?;
        if let Some(prefix) = hrms_entry.prefix {
            hrms.prefix = prefix;
        }
        if let Some(suffix) = hrms_entry.suffix {
            hrms.suffix = suffix;
        }
        hrms.vocabulary.extend(&hrms_entry.aliases);

        let mut taraslia = defaults.taraslia;
        taraslia.path = locate(taraslia_entry.path, taraslia.path)?;
        taraslia.skip_rows = taraslia_entry.skip_rows.unwrap_or(taraslia.skip_rows);
        taraslia.renames.extend(taraslia_entry.renames);
        taraslia.vocabulary.extend(&taraslia_entry.aliases);

        let mut jung = defaults.jung;
        jung.path = locate(jung_entry.path, jung.path)?;
        jung.skip_rows = jung_entry.skip_rows.unwrap_or(jung.skip_rows);
        jung.renames.extend(jung_entry.renames);
        jung.ignore_sheets = jung_entry.ignore_sheets;
        jung.vocabulary.extend(&jung_entry.aliases);

        let mut sharma = defaults.sharma;
        sharma.path = locate(sharma_entry.path, sharma.path)?;
        sharma.sheet = sharma_entry.sheet;
        sharma.skip_rows = sharma_entry.skip_rows.unwrap_or(sharma.skip_rows);
        if let Some(id_column) = sharma_entry.id_column {
            sharma.id_column = id_column;
        }
        sharma.renames.extend(sharma_entry.renames);
        sharma.flags.extend(&sharma_entry.aliases);

        Ok(ResolvedConfig {
            schema_version,
            database: locate(database, defaults.database)?,
            gene_ontology: locate(gene_ontology, defaults.gene_ontology)?,
            output_dir: locate(output_dir, defaults.output_dir)?,
            reference_study: reference_study.unwrap_or(defaults.reference_study),
            hrms,
            taraslia,
            jung,
            sharma,
        })
    }
}
