use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use brain_proteome::config::ConfigLoader;
use brain_proteome::domain::{BrainPart, Study};
use brain_proteome::error::ProteomeError;

#[test]
fn relative_paths_follow_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let path = root.join("brain-proteome.json");
    fs::write(
        path.as_std_path(),
        r#"{
            "schema_version": 1,
            "gene_ontology": "reference/uniprot_mouse.tsv",
            "hrms": { "path": "hrms", "suffix": "_8_weeks" },
            "taraslia": { "aliases": { "SN": "mid_brain" } }
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(Some(path.as_str())).unwrap();
    assert_eq!(resolved.gene_ontology, root.join("reference/uniprot_mouse.tsv"));
    assert_eq!(resolved.hrms.directory, root.join("hrms"));
    assert_eq!(resolved.hrms.suffix, "_8_weeks");
    assert_eq!(resolved.hrms.prefix, "mouse_brain_-_");
    assert_eq!(resolved.database, root.join("biotechnology.db"));
    assert_eq!(resolved.output_dir, root.join("reports"));
    assert_eq!(resolved.reference_study, Study::Hrms);
    assert_eq!(resolved.taraslia.vocabulary.get("sn"), Some(BrainPart::MidBrain));
    assert_eq!(resolved.taraslia.vocabulary.get("OB"), Some(BrainPart::OlfactoryBalb));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, ProteomeError::ConfigRead(_));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brain-proteome.json");
    fs::write(&path, "{ \"jung\": { \"skip_rows\": \"two\" } }").unwrap();
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, ProteomeError::ConfigParse(_));
}
