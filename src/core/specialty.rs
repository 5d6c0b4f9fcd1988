use std::collections::HashMap;

use crate::models::ConditionReport;

/// The generic fallback specialty, always present and always ranked last
pub const GENERAL_PHYSICIAN: &str = "General Physician";

/// Read-only condition → specialties table
///
/// Maps free-text diagnosed-condition names (as produced by the diagnosis
/// oracle) to the provider categories worth searching for. Lookup is exact
/// first, then bidirectional substring: a condition phrase like
/// "chronic migraine" still lands on the "migraine" entry, and a bare
/// "infection" picks up every infection-flavored key. The substring pass is
/// a known-imprecise heuristic; coincidental overlaps can pull in unrelated
/// specialties.
///
/// Constructed once and injected into the resolver call sites, so the table
/// can be swapped per deployment without touching the matching logic.
#[derive(Debug, Clone)]
pub struct SpecialtyIndex {
    entries: Vec<(String, Vec<String>)>,
    exact: HashMap<String, usize>,
}

impl SpecialtyIndex {
    /// Build an index from explicit (condition, specialties) entries
    ///
    /// Condition keys are lowercased; entry order is preserved and decides
    /// the relative order of substring matches in resolver output.
    pub fn from_entries<I, K, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<S>)>,
        K: Into<String>,
        S: Into<String>,
    {
        let entries: Vec<(String, Vec<String>)> = entries
            .into_iter()
            .map(|(key, specs)| {
                (
                    key.into().to_lowercase(),
                    specs.into_iter().map(Into::into).collect(),
                )
            })
            .collect();

        let exact = entries
            .iter()
            .enumerate()
            .map(|(idx, (key, _))| (key.clone(), idx))
            .collect();

        Self { entries, exact }
    }

    /// The built-in condition table, grouped by medical domain
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_CONDITIONS
                .iter()
                .map(|&(key, specs)| (key, specs.to_vec())),
        )
    }

    /// Resolve diagnosed conditions to an ordered list of specialties
    ///
    /// Each condition name is lowercased and trimmed. An exact table hit
    /// contributes its specialties and moves on; otherwise every entry whose
    /// key contains the name, or whose name contains the key, contributes.
    /// `General Physician` is always appended and always sorts last; the
    /// rest keep insertion order so output is stable.
    pub fn resolve(&self, conditions: &[ConditionReport]) -> Vec<String> {
        let mut specialties: Vec<String> = Vec::new();

        for condition in conditions {
            let name = condition.name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }

            if let Some(&idx) = self.exact.get(name.as_str()) {
                for spec in &self.entries[idx].1 {
                    push_unique(&mut specialties, spec);
                }
                continue;
            }

            for (key, specs) in &self.entries {
                if name.contains(key.as_str()) || key.contains(name.as_str()) {
                    for spec in specs {
                        push_unique(&mut specialties, spec);
                    }
                }
            }
        }

        // The generic fallback is always present, and always last
        specialties.retain(|s| s != GENERAL_PHYSICIAN);
        specialties.push(GENERAL_PHYSICIAN.to_string());

        specialties
    }

    /// Number of condition entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SpecialtyIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

fn push_unique(out: &mut Vec<String>, spec: &str) {
    if !out.iter().any(|s| s == spec) {
        out.push(spec.to_string());
    }
}

const BUILTIN_CONDITIONS: &[(&str, &[&str])] = &[
    // Gastroenterology
    ("ulcer", &["Gastroenterologist", "General Physician"]),
    ("gastritis", &["Gastroenterologist", "General Physician"]),
    ("acid reflux", &["Gastroenterologist", "General Physician"]),
    ("heartburn", &["Gastroenterologist", "General Physician"]),
    ("stomach pain", &["Gastroenterologist", "General Physician"]),
    ("abdominal pain", &["Gastroenterologist", "General Physician"]),
    ("constipation", &["Gastroenterologist", "General Physician"]),
    ("diarrhea", &["Gastroenterologist", "General Physician"]),
    ("ibs", &["Gastroenterologist", "General Physician"]),
    ("crohns disease", &["Gastroenterologist", "General Physician"]),
    ("inflammatory bowel disease", &["Gastroenterologist", "General Physician"]),
    // Neurology
    ("migraine", &["Neurologist", "General Physician"]),
    ("headache", &["Neurologist", "General Physician"]),
    ("seizure", &["Neurologist", "Emergency Medicine"]),
    ("epilepsy", &["Neurologist", "General Physician"]),
    ("stroke", &["Neurologist", "Emergency Medicine"]),
    ("parkinsons", &["Neurologist", "General Physician"]),
    ("alzheimers", &["Neurologist", "Geriatrician"]),
    ("memory loss", &["Neurologist", "Geriatrician"]),
    ("dizziness", &["Neurologist", "ENT Specialist"]),
    ("vertigo", &["Neurologist", "ENT Specialist"]),
    ("neuropathy", &["Neurologist", "General Physician"]),
    // Cardiology
    ("hypertension", &["Cardiologist", "General Physician"]),
    ("high blood pressure", &["Cardiologist", "General Physician"]),
    ("chest pain", &["Cardiologist", "Emergency Medicine"]),
    ("heart attack", &["Cardiologist", "Emergency Medicine"]),
    ("heart disease", &["Cardiologist", "General Physician"]),
    ("arrhythmia", &["Cardiologist", "General Physician"]),
    ("palpitations", &["Cardiologist", "General Physician"]),
    ("heart murmur", &["Cardiologist", "General Physician"]),
    ("angina", &["Cardiologist", "General Physician"]),
    ("atherosclerosis", &["Cardiologist", "General Physician"]),
    // Pulmonology
    ("asthma", &["Pulmonologist", "General Physician"]),
    ("copd", &["Pulmonologist", "General Physician"]),
    ("pneumonia", &["Pulmonologist", "General Physician"]),
    ("bronchitis", &["Pulmonologist", "General Physician"]),
    ("shortness of breath", &["Pulmonologist", "General Physician"]),
    ("cough", &["Pulmonologist", "General Physician"]),
    ("lung infection", &["Pulmonologist", "General Physician"]),
    ("tuberculosis", &["Pulmonologist", "Infectious Disease"]),
    ("sleep apnea", &["Pulmonologist", "ENT Specialist"]),
    // Endocrinology
    ("diabetes", &["Endocrinologist", "General Physician"]),
    ("thyroid", &["Endocrinologist", "General Physician"]),
    ("hyperthyroidism", &["Endocrinologist", "General Physician"]),
    ("hypothyroidism", &["Endocrinologist", "General Physician"]),
    ("hormone imbalance", &["Endocrinologist", "General Physician"]),
    ("insulin resistance", &["Endocrinologist", "General Physician"]),
    ("metabolic syndrome", &["Endocrinologist", "General Physician"]),
    ("obesity", &["Endocrinologist", "General Physician"]),
    // Mental health
    ("depression", &["Psychiatrist", "Psychologist", "General Physician"]),
    ("anxiety", &["Psychiatrist", "Psychologist", "General Physician"]),
    ("panic disorder", &["Psychiatrist", "Psychologist"]),
    ("bipolar disorder", &["Psychiatrist", "General Physician"]),
    ("schizophrenia", &["Psychiatrist", "General Physician"]),
    ("ptsd", &["Psychiatrist", "Psychologist"]),
    ("ocd", &["Psychiatrist", "Psychologist"]),
    ("adhd", &["Psychiatrist", "Neurologist"]),
    ("eating disorder", &["Psychiatrist", "Psychologist"]),
    ("substance abuse", &["Psychiatrist", "Addiction Medicine"]),
    // Orthopedics / musculoskeletal
    ("fracture", &["Orthopedic Surgeon", "Emergency Medicine"]),
    ("arthritis", &["Rheumatologist", "Orthopedic Surgeon"]),
    ("joint pain", &["Rheumatologist", "Orthopedic Surgeon"]),
    ("back pain", &["Orthopedic Surgeon", "Neurologist"]),
    ("neck pain", &["Orthopedic Surgeon", "Neurologist"]),
    ("muscle pain", &["Orthopedic Surgeon", "General Physician"]),
    ("sports injury", &["Sports Medicine", "Orthopedic Surgeon"]),
    ("osteoporosis", &["Rheumatologist", "Endocrinologist"]),
    ("fibromyalgia", &["Rheumatologist", "General Physician"]),
    ("tendonitis", &["Orthopedic Surgeon", "Sports Medicine"]),
    // Dermatology
    ("skin rash", &["Dermatologist", "General Physician"]),
    ("acne", &["Dermatologist", "General Physician"]),
    ("eczema", &["Dermatologist", "Allergist"]),
    ("psoriasis", &["Dermatologist", "Rheumatologist"]),
    ("skin cancer", &["Dermatologist", "Oncologist"]),
    ("mole", &["Dermatologist", "General Physician"]),
    ("warts", &["Dermatologist", "General Physician"]),
    ("skin infection", &["Dermatologist", "General Physician"]),
    // Allergy / immunology
    ("allergy", &["Allergist", "General Physician"]),
    ("allergic reaction", &["Allergist", "Emergency Medicine"]),
    ("food allergy", &["Allergist", "General Physician"]),
    ("hay fever", &["Allergist", "ENT Specialist"]),
    ("hives", &["Allergist", "Dermatologist"]),
    ("anaphylaxis", &["Allergist", "Emergency Medicine"]),
    // ENT
    ("sore throat", &["ENT Specialist", "General Physician"]),
    ("ear infection", &["ENT Specialist", "General Physician"]),
    ("hearing loss", &["ENT Specialist", "Audiologist"]),
    ("tinnitus", &["ENT Specialist", "Neurologist"]),
    ("sinusitis", &["ENT Specialist", "General Physician"]),
    ("nasal congestion", &["ENT Specialist", "General Physician"]),
    ("tonsillitis", &["ENT Specialist", "General Physician"]),
    // Urology / nephrology
    ("kidney stones", &["Urologist", "General Physician"]),
    ("uti", &["Urologist", "General Physician"]),
    ("urinary tract infection", &["Urologist", "General Physician"]),
    ("bladder infection", &["Urologist", "General Physician"]),
    ("prostate", &["Urologist", "General Physician"]),
    ("kidney disease", &["Nephrologist", "General Physician"]),
    // Gynecology / obstetrics
    ("menstrual problems", &["Gynecologist", "General Physician"]),
    ("pcos", &["Gynecologist", "Endocrinologist"]),
    ("endometriosis", &["Gynecologist", "General Physician"]),
    ("pregnancy", &["Obstetrician", "General Physician"]),
    ("menopause", &["Gynecologist", "Endocrinologist"]),
    // Infectious disease
    ("flu", &["General Physician", "Infectious Disease"]),
    ("cold", &["General Physician", "ENT Specialist"]),
    ("fever", &["General Physician", "Infectious Disease"]),
    ("infection", &["Infectious Disease", "General Physician"]),
    ("viral infection", &["Infectious Disease", "General Physician"]),
    ("bacterial infection", &["Infectious Disease", "General Physician"]),
    ("covid", &["Infectious Disease", "Pulmonologist"]),
    // Ophthalmology
    ("eye pain", &["Ophthalmologist", "General Physician"]),
    ("vision problems", &["Ophthalmologist", "Optometrist"]),
    ("glaucoma", &["Ophthalmologist", "General Physician"]),
    ("cataracts", &["Ophthalmologist", "General Physician"]),
    ("dry eyes", &["Ophthalmologist", "General Physician"]),
    ("pink eye", &["Ophthalmologist", "General Physician"]),
    // Hematology / oncology
    ("anemia", &["Hematologist", "General Physician"]),
    ("cancer", &["Oncologist", "General Physician"]),
    ("leukemia", &["Hematologist", "Oncologist"]),
    ("lymphoma", &["Hematologist", "Oncologist"]),
    ("blood clot", &["Hematologist", "Vascular Surgery"]),
    // Emergency / general
    ("emergency", &["Emergency Medicine", "General Physician"]),
    ("trauma", &["Emergency Medicine", "Trauma Surgery"]),
    ("poisoning", &["Emergency Medicine", "Toxicologist"]),
    ("burns", &["Emergency Medicine", "Plastic Surgery"]),
    ("wound", &["General Physician", "Surgery"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    fn condition(name: &str) -> ConditionReport {
        ConditionReport {
            name: name.to_string(),
            confidence: Confidence::High,
        }
    }

    #[test]
    fn test_exact_match_diabetes() {
        let index = SpecialtyIndex::builtin();
        let specialties = index.resolve(&[condition("diabetes")]);

        assert!(specialties.contains(&"Endocrinologist".to_string()));
        assert_eq!(specialties.last().map(String::as_str), Some(GENERAL_PHYSICIAN));
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let index = SpecialtyIndex::builtin();
        let specialties = index.resolve(&[condition("  Diabetes ")]);

        assert!(specialties.contains(&"Endocrinologist".to_string()));
    }

    #[test]
    fn test_substring_match_on_longer_phrase() {
        let index = SpecialtyIndex::builtin();
        let specialties = index.resolve(&[condition("chronic migraine attacks")]);

        assert!(specialties.contains(&"Neurologist".to_string()));
    }

    #[test]
    fn test_empty_input_yields_fallback_only() {
        let index = SpecialtyIndex::builtin();
        let specialties = index.resolve(&[]);

        assert_eq!(specialties, vec![GENERAL_PHYSICIAN.to_string()]);
    }

    #[test]
    fn test_fallback_always_last() {
        let index = SpecialtyIndex::builtin();

        // "flu" maps to General Physician first in its own entry; the
        // resolver still pushes the fallback to the end
        let specialties = index.resolve(&[condition("flu"), condition("anemia")]);

        assert_eq!(specialties.last().map(String::as_str), Some(GENERAL_PHYSICIAN));
        assert_eq!(
            specialties.iter().filter(|s| *s == GENERAL_PHYSICIAN).count(),
            1
        );
    }

    #[test]
    fn test_unknown_condition_yields_fallback_only() {
        let index = SpecialtyIndex::builtin();
        let specialties = index.resolve(&[condition("spontaneous combustion")]);

        assert_eq!(specialties, vec![GENERAL_PHYSICIAN.to_string()]);
    }

    #[test]
    fn test_multiple_conditions_union_without_duplicates() {
        let index = SpecialtyIndex::builtin();
        let specialties = index.resolve(&[condition("hypertension"), condition("arrhythmia")]);

        assert_eq!(
            specialties.iter().filter(|s| *s == "Cardiologist").count(),
            1
        );
    }

    #[test]
    fn test_output_order_is_stable() {
        let index = SpecialtyIndex::builtin();

        let first = index.resolve(&[condition("depression")]);
        let second = index.resolve(&[condition("depression")]);

        assert_eq!(first, second);
        assert_eq!(first[0], "Psychiatrist");
        assert_eq!(first[1], "Psychologist");
    }
}
