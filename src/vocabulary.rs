use std::collections::BTreeMap;

use crate::domain::{BrainPart, ProteinDraft, ProteinRecord, Study};
use crate::error::ProteomeError;
use crate::text::split_list;

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    study: Study,
    uppercase: bool,
    entries: BTreeMap<String, BrainPart>,
}

impl Vocabulary {
    pub fn new(study: Study, uppercase: bool) -> Self {
        Self {
            study,
            uppercase,
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, label: &str, part: BrainPart) -> Self {
        self.insert(label, part);
        self
    }

    pub fn insert(&mut self, label: &str, part: BrainPart) {
        let key = self.key(label);
        self.entries.insert(key, part);
    }

    pub fn extend<'a, I>(&mut self, aliases: I)
    where
        I: IntoIterator<Item = (&'a String, &'a BrainPart)>,
    {
        for (label, part) in aliases {
            self.insert(label, *part);
        }
    }

    pub fn get(&self, label: &str) -> Option<BrainPart> {
        self.entries.get(&self.key(label)).copied()
    }

    pub fn map(&self, label: &str) -> Result<BrainPart, ProteomeError> {
        self.get(label)
            .ok_or_else(|| ProteomeError::UnmappedLabel {
                study: self.study,
                label: label.trim().to_string(),
            })
    }

    pub fn map_list(&self, labels: &str) -> Result<Vec<BrainPart>, ProteomeError> {
        let key = if self.uppercase {
            labels.to_uppercase()
        } else {
            labels.to_string()
        };
        let parts = split_list(&key, ',')
            .into_iter()
            .map(|label| self.map(label))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.is_empty() {
            return Err(ProteomeError::UnmappedLabel {
                study: self.study,
                label: labels.trim().to_string(),
            });
        }
        Ok(parts)
    }

    pub fn explode(
        &self,
        draft: &ProteinDraft,
        labels: &str,
    ) -> Result<Vec<ProteinRecord>, ProteomeError> {
        Ok(self
            .map_list(labels)?
            .into_iter()
            .map(|part| draft.place(part))
            .collect())
    }

    fn key(&self, label: &str) -> String {
        let trimmed = label.trim();
        if self.uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    pub fn canonical(study: Study) -> Self {
        BrainPart::ALL
            .into_iter()
            .fold(Self::new(study, false), |vocab, part| {
                vocab.with(part.as_str(), part)
            })
    }

    pub fn hrms() -> Self {
        Self::canonical(Study::Hrms)
            .with("olfactory_bulb", BrainPart::OlfactoryBalb)
            .with("hypothalamus", BrainPart::Hipothalamus)
            .with("medulla_oblongata", BrainPart::Medulla)
            .with("midbrain", BrainPart::MidBrain)
            .with("hippocampus", BrainPart::Hipocampus)
    }

    /// Taraslia abbreviations. `ΟΒ` and `ΗΥ` are typed with Greek capitals in the source sheet.
    pub fn taraslia() -> Self {
        Self::new(Study::Taraslia, true)
            .with("OB", BrainPart::OlfactoryBalb)
            .with("ΟΒ", BrainPart::OlfactoryBalb)
            .with("HY", BrainPart::Hipothalamus)
            .with("ΗΥ", BrainPart::Hipothalamus)
            .with("MED", BrainPart::Medulla)
            .with("MB", BrainPart::MidBrain)
            .with("ΜΒ", BrainPart::MidBrain)
            .with("HIP", BrainPart::Hipocampus)
            .with("CB", BrainPart::Cerebellum)
            .with("CX", BrainPart::Cortex)
            .with("CTX", BrainPart::Cortex)
            .with("STR", BrainPart::Striatum)
            .with("TH", BrainPart::Thalamus)
            .with("ΤΗ", BrainPart::Thalamus)
            .with("P", BrainPart::Pons)
            .with("PONS", BrainPart::Pons)
    }

    pub fn jung() -> Self {
        Self::new(Study::Jung, true)
            .with("OLFACTORY BULB", BrainPart::OlfactoryBalb)
            .with("OB", BrainPart::OlfactoryBalb)
            .with("HYPOTHALAMUS", BrainPart::Hipothalamus)
            .with("MEDULLA", BrainPart::Medulla)
            .with("MIDBRAIN", BrainPart::MidBrain)
            .with("HIPPOCAMPUS", BrainPart::Hipocampus)
            .with("CEREBELLUM", BrainPart::Cerebellum)
            .with("CORTEX", BrainPart::Cortex)
            .with("STRIATUM", BrainPart::Striatum)
            .with("THALAMUS", BrainPart::Thalamus)
            .with("PONS", BrainPart::Pons)
    }

    pub fn sharma_flags() -> Self {
        Self::new(Study::Sharma, false)
            .with("olfactory_bulb", BrainPart::OlfactoryBalb)
            .with("hypothalamus", BrainPart::Hipothalamus)
            .with("medulla", BrainPart::Medulla)
            .with("brainstem", BrainPart::Medulla)
            .with("midbrain", BrainPart::MidBrain)
            .with("hippocampus", BrainPart::Hipocampus)
            .with("cerebellum", BrainPart::Cerebellum)
            .with("motor_cortex", BrainPart::Cortex)
            .with("somatosensory_cortex", BrainPart::Cortex)
            .with("striatum", BrainPart::Striatum)
            .with("thalamus", BrainPart::Thalamus)
            .with("pons", BrainPart::Pons)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn taraslia_list_is_exploded_in_order() {
        let draft = ProteinDraft {
            protein_identifier: Some("P60710".to_string()),
            ..ProteinDraft::default()
        };
        let records = Vocabulary::taraslia().explode(&draft, "OB, CB").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].brain_part, BrainPart::OlfactoryBalb);
        assert_eq!(records[1].brain_part, BrainPart::Cerebellum);
        assert!(records
            .iter()
            .all(|record| record.protein_identifier.as_deref() == Some("P60710")));
    }

    #[test]
    fn greek_look_alikes_are_mapped() {
        let vocab = Vocabulary::taraslia();
        assert_eq!(vocab.map("ΟΒ").unwrap(), BrainPart::OlfactoryBalb);
        assert_eq!(vocab.map(" οβ ").unwrap(), BrainPart::OlfactoryBalb);
        assert_eq!(vocab.map("ob").unwrap(), BrainPart::OlfactoryBalb);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = Vocabulary::taraslia().map_list("OB, XX").unwrap_err();
        assert_matches!(
            err,
            ProteomeError::UnmappedLabel { study: Study::Taraslia, ref label } if label == "XX"
        );
    }

    #[test]
    fn empty_list_is_an_error() {
        let err = Vocabulary::taraslia().map_list(" , ").unwrap_err();
        assert_matches!(err, ProteomeError::UnmappedLabel { .. });
    }

    #[test]
    fn case_sensitive_vocabulary_does_not_uppercase() {
        let vocab = Vocabulary::hrms();
        assert_eq!(vocab.map("cerebellum").unwrap(), BrainPart::Cerebellum);
        assert!(vocab.map("CEREBELLUM").is_err());
    }

    #[test]
    fn explosion_count_matches_label_count() {
        let draft = ProteinDraft::default();
        let vocab = Vocabulary::taraslia();
        let labels = "OB, HY, MED, MB, HIP, CB, CX, STR, TH, P";
        let records = vocab.explode(&draft, labels).unwrap();
        assert_eq!(records.len(), 10);
        let mut parts: Vec<_> = records.iter().map(|record| record.brain_part).collect();
        parts.sort();
        assert_eq!(parts, BrainPart::ALL.to_vec());
    }

    #[test]
    fn aliases_extend_builtin_table() {
        let mut vocab = Vocabulary::jung();
        let aliases = BTreeMap::from([("Olfactory Bulbs".to_string(), BrainPart::OlfactoryBalb)]);
        vocab.extend(&aliases);
        assert_eq!(vocab.map("olfactory bulbs").unwrap(), BrainPart::OlfactoryBalb);
    }
}
