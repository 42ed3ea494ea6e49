use assert_matches::assert_matches;

use brain_proteome::domain::{BrainPart, ProteinDraft, Study};
use brain_proteome::error::ProteomeError;

#[test]
fn parse_study_valid() {
    let study: Study = "HRMS".parse().unwrap();
    assert_eq!(study, Study::Hrms);
    assert_eq!(study.table_name(), "hrms");
}

#[test]
fn parse_study_invalid() {
    let err = "hrms; DROP TABLE jung".parse::<Study>().unwrap_err();
    assert_matches!(err, ProteomeError::InvalidStudy(_));
}

#[test]
fn table_names_are_distinct() {
    let mut names: Vec<_> = Study::ALL.iter().map(|study| study.table_name()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), Study::ALL.len());
}

#[test]
fn parse_brain_part_valid() {
    let part: BrainPart = " olfactory_balb ".parse().unwrap();
    assert_eq!(part, BrainPart::OlfactoryBalb);
    assert_eq!(BrainPart::MidBrain.to_string(), "mid_brain");
}

#[test]
fn parse_brain_part_invalid() {
    let err = "olfactory_bulb".parse::<BrainPart>().unwrap_err();
    assert_matches!(err, ProteomeError::InvalidBrainPart(_));
}

#[test]
fn brain_part_serializes_as_label() {
    let json = serde_json::to_string(&BrainPart::Hipothalamus).unwrap();
    assert_eq!(json, "\"hipothalamus\"");
    let study = serde_json::to_string(&Study::Taraslia).unwrap();
    assert_eq!(study, "\"taraslia\"");
}

#[test]
fn placed_draft_has_no_annotation() {
    let draft = ProteinDraft {
        protein_identifier: Some("P60710".to_string()),
        coverage: Some(61.6),
        ..ProteinDraft::default()
    };
    let record = draft.place(BrainPart::Thalamus);
    assert_eq!(record.identifier(), Some("P60710"));
    assert_eq!(record.brain_part, BrainPart::Thalamus);
    assert_eq!(record.coverage, Some(61.6));
    assert_eq!(record.annotation.gene_names, None);
}
