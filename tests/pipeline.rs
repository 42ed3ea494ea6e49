use std::fs;

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};

use brain_proteome::app::App;
use brain_proteome::config::{ConfigLoader, ResolvedConfig};
use brain_proteome::domain::{BrainPart, Study};
use brain_proteome::error::ProteomeError;
use brain_proteome::ingest::IngestStage;
use brain_proteome::output::JsonOutput;
use brain_proteome::reader::{TabularReader, WorkbookReader};
use brain_proteome::report::SvgChartRenderer;
use brain_proteome::store::Store;

const CONFIG: &str = r#"{
    "database": "out/brain.db",
    "gene_ontology": "go.tsv",
    "output_dir": "charts",
    "reference_study": "taraslia",
    "taraslia": { "path": "taraslia.csv" },
    "sharma": { "path": "sharma.csv" }
}"#;

fn write_inputs(root: &Utf8Path) {
    let files = [
        ("brain-proteome.json", CONFIG),
        (
            "go.tsv",
            "Entry\tEntry Name\tGene Names\tGene Ontology (GO)\n\
             P60710\tACTB_MOUSE\tActb Actx\tcytoskeleton\n\
             Q9CQV8\t1433B_MOUSE\tYwhab\t\n",
        ),
        (
            "taraslia.csv",
            "Supplementary table 1,,\n\
             Uniprot Accession,Protein Name,Brain Region\n\
             P60710,Actin,\"OB, CB\"\n\
             Q9CQV8,14-3-3 beta,STR\n",
        ),
        (
            "sharma.csv",
            "Majority protein IDs,Protein names,Sequence coverage [%],Cerebellum,Thalamus\n\
             P60710-2;P60711,Actin,33.5,+,\n\
             Q00000,Unknown,10,,+\n",
        ),
    ];
    for (name, content) in files {
        fs::write(root.join(name).as_std_path(), content).unwrap();
    }
}

fn open(config: ResolvedConfig) -> App<WorkbookReader, SvgChartRenderer> {
    let store = Store::open(&config.database).unwrap();
    let renderer = SvgChartRenderer::new(config.output_dir.clone());
    App::new(store, WorkbookReader::new(), renderer, config)
}

#[test]
fn delimited_inputs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    write_inputs(&root);
    let config_path = root.join("brain-proteome.json");

    let config = ConfigLoader::resolve(Some(config_path.as_str())).unwrap();
    let mut app = open(config);
    let mut summary = app
        .ingest(&[Study::Taraslia, Study::Sharma], &JsonOutput)
        .unwrap();
    assert!(summary.take_error().is_none());
    assert_eq!(summary.ontology_entries, 2);

    let taraslia = app.store().records(Study::Taraslia).unwrap();
    let parts: Vec<_> = taraslia.iter().map(|record| record.brain_part).collect();
    assert_eq!(
        parts,
        vec![BrainPart::OlfactoryBalb, BrainPart::Cerebellum, BrainPart::Striatum]
    );
    assert_eq!(
        taraslia[0].annotation.gene_ontology.as_deref(),
        Some("cytoskeleton")
    );

    let sharma = app.store().records(Study::Sharma).unwrap();
    assert_eq!(sharma.len(), 2);
    assert_eq!(sharma[0].protein_identifier.as_deref(), Some("P60710"));
    assert_eq!(sharma[0].coverage, Some(33.5));
    assert_eq!(sharma[1].brain_part, BrainPart::Thalamus);
    assert_eq!(sharma[1].protein_identifier, None);
    assert_eq!(sharma[1].accession.as_deref(), Some("Q00000"));

    let report = app.report(&JsonOutput).unwrap();
    let overlap = report.overlap.as_ref().unwrap();
    assert_eq!(overlap.reference, Study::Taraslia);
    assert_eq!(overlap.overlaps.len(), 1);
    assert_eq!(overlap.overlaps[0].shared, 1);
    for name in ["taraslia.svg", "sharma.svg", "taraslia_overlap.svg"] {
        assert!(root.join("charts").join(name).as_std_path().is_file(), "{name}");
    }
    app.close().unwrap();

    // Existing tables are never re-read, even with the reference file gone.
    fs::remove_file(root.join("go.tsv").as_std_path()).unwrap();
    let config = ConfigLoader::resolve(Some(config_path.as_str())).unwrap();
    let mut app = open(config);
    let summary = app
        .ingest(&[Study::Taraslia, Study::Sharma], &JsonOutput)
        .unwrap();
    assert!(summary
        .reports
        .iter()
        .all(|report| report.stage == IngestStage::Skipped));
    assert_eq!(app.store().count(Study::Taraslia).unwrap(), 3);
}

fn sharma_workbook() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sharma.xlsx")
}

#[test]
fn named_sheet_is_read_from_workbook() {
    let reader = WorkbookReader::new();
    let path = sharma_workbook();
    assert_eq!(reader.sheet_names(&path).unwrap(), vec!["Proteins".to_string()]);

    let table = reader.read_sheet(&path, Some("Proteins"), 0).unwrap();
    assert_eq!(table.columns[0], "Majority protein IDs");
    assert_eq!(table.rows.len(), 2);
}

#[test]
fn absent_sheet_halts_only_that_study() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    write_inputs(&root);
    fs::copy(sharma_workbook().as_std_path(), root.join("sharma.xlsx").as_std_path()).unwrap();
    fs::write(
        root.join("brain-proteome.json").as_std_path(),
        r#"{
            "database": "brain.db",
            "gene_ontology": "go.tsv",
            "taraslia": { "path": "taraslia.csv" },
            "sharma": { "path": "sharma.xlsx", "sheet": "Missing" }
        }"#,
    )
    .unwrap();

    let err = WorkbookReader::new()
        .read_sheet(&root.join("sharma.xlsx"), Some("Missing"), 0)
        .unwrap_err();
    assert_matches!(err, ProteomeError::MissingSheet { ref sheet, .. } if sheet == "Missing");

    let config_path = root.join("brain-proteome.json");
    let config = ConfigLoader::resolve(Some(config_path.as_str())).unwrap();
    let mut app = open(config);
    let mut summary = app
        .ingest(&[Study::Sharma, Study::Taraslia], &JsonOutput)
        .unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].study, Study::Sharma);
    assert_matches!(
        summary.take_error(),
        Some(ProteomeError::MissingSheet { ref sheet, .. }) if sheet == "Missing"
    );
    assert!(!app.store().table_exists(Study::Sharma).unwrap());
    assert_eq!(app.store().count(Study::Taraslia).unwrap(), 3);
}
