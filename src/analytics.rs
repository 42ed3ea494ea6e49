use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{BrainPart, Study};
use crate::error::ProteomeError;
use crate::query::ProteinQuery;
use crate::store::{Occurrence, Store};

pub fn count(store: &Store, study: Study) -> Result<usize, ProteomeError> {
    store.count(study)
}

pub fn unique_proteins(
    store: &Store,
    study: Study,
    brain_part: Option<BrainPart>,
) -> Result<Vec<String>, ProteomeError> {
    store.strings(&ProteinQuery::Unique { study, brain_part })
}

pub fn common_proteins(
    store: &Store,
    study: Study,
    brain_part: Option<BrainPart>,
) -> Result<Vec<String>, ProteomeError> {
    store.strings(&ProteinQuery::Common { study, brain_part })
}

pub fn inter_study_overlap(
    store: &Store,
    reference: Study,
    other: Study,
) -> Result<usize, ProteomeError> {
    let shared = store.scalar(&ProteinQuery::Overlap { reference, other })?;
    Ok(shared as usize)
}

pub fn distinct_brain_parts(store: &Store, study: Study) -> Result<Vec<BrainPart>, ProteomeError> {
    store
        .strings(&ProteinQuery::DistinctBrainParts { study })?
        .iter()
        .map(|label| label.parse())
        .collect()
}

pub fn proteins_in(
    store: &Store,
    study: Study,
    brain_part: BrainPart,
) -> Result<Vec<String>, ProteomeError> {
    store.strings(&ProteinQuery::InBrainPart { study, brain_part })
}

pub fn protein_occurrences(
    store: &Store,
    study: Study,
    identifier: &str,
) -> Result<Vec<Occurrence>, ProteomeError> {
    store.occurrences(study, identifier)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrainPartProfile {
    pub brain_part: BrainPart,
    pub proteins: usize,
    pub unique: usize,
    pub common: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyProfile {
    pub study: Study,
    pub rows: usize,
    pub unique: usize,
    pub common: usize,
    pub brain_parts: Vec<BrainPartProfile>,
}

pub fn brain_part_profile(store: &Store, study: Study) -> Result<StudyProfile, ProteomeError> {
    let unique: HashSet<String> = unique_proteins(store, study, None)?.into_iter().collect();
    let common: HashSet<String> = common_proteins(store, study, None)?.into_iter().collect();

    let brain_parts = distinct_brain_parts(store, study)?
        .into_iter()
        .map(|brain_part| {
            let proteins = proteins_in(store, study, brain_part)?;
            Ok(BrainPartProfile {
                brain_part,
                proteins: proteins.len(),
                unique: proteins.iter().filter(|id| unique.contains(*id)).count(),
                common: proteins.iter().filter(|id| common.contains(*id)).count(),
            })
        })
        .collect::<Result<Vec<_>, ProteomeError>>()?;

    Ok(StudyProfile {
        study,
        rows: count(store, study)?,
        unique: unique.len(),
        common: common.len(),
        brain_parts,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyOverlap {
    pub study: Study,
    pub shared: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapProfile {
    pub reference: Study,
    pub overlaps: Vec<StudyOverlap>,
}

pub fn overlap_profile(
    store: &Store,
    reference: Study,
    others: &[Study],
) -> Result<OverlapProfile, ProteomeError> {
    let overlaps = others
        .iter()
        .filter(|study| **study != reference)
        .map(|&study| {
            Ok(StudyOverlap {
                study,
                shared: inter_study_overlap(store, reference, study)?,
            })
        })
        .collect::<Result<Vec<_>, ProteomeError>>()?;
    Ok(OverlapProfile {
        reference,
        overlaps,
    })
}
