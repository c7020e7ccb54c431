//! Feature encoding: applicant input → model-ready row.
//!
//! Encoding happens in two steps:
//!
//! 1. **Expand** the applicant into named columns. Numeric fields pass
//!    through (plus the derived `loan_percent_income`); every categorical field
//!    becomes one indicator column per category in its vocabulary table,
//!    named `<field>_<training token>`.
//! 2. **Align** to the classifier's schema. Each schema column is filled
//!    from its [`FeatureKind`]: numeric columns read the applicant field,
//!    indicator columns compare their token with the applicant's category,
//!    and columns the vocabulary cannot produce are filled with zero.
//!    Expanded columns the schema does not know are dropped, and the output
//!    follows schema order exactly.
//!
//! Alignment never fails. A vocabulary drift between the tables and
//! the artifact therefore zeroes the affected categorical signal instead of
//! raising an error; [`EncodingReport`] records what happened.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::applicant::ApplicantInput;
use crate::schema::{FeatureKind, FeatureSchema, NumericFeature};
use crate::vocabulary::{CategoryTable, Vocabulary};

/// Ordered feature row aligned to a classifier schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Creates a vector from parallel name and value lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists differ in length.
    pub fn new(names: Vec<String>, values: Vec<f64>) -> std::result::Result<Self, String> {
        if names.len() != values.len() {
            return Err(format!(
                "{} feature names but {} values",
                names.len(),
                values.len()
            ));
        }
        Ok(Self { names, values })
    }

    /// Column names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Diagnostics from one encoding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncodingReport {
    /// Schema columns that were not produced and were filled with zero
    pub zero_filled: Vec<String>,
    /// Produced columns that the schema does not know, dropped
    pub dropped: Vec<String>,
    /// Dropped columns that carried the applicant's own category
    pub lost_signal: Vec<String>,
}

impl EncodingReport {
    /// True when every produced column landed in the schema and every
    /// schema column was produced.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.zero_filled.is_empty() && self.dropped.is_empty()
    }
}

/// Maps applicant input onto a classifier schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureEncoder {
    vocabulary: Vocabulary,
}

impl FeatureEncoder {
    /// Creates an encoder using the trained vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom vocabulary.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// The vocabulary used for categorical fields.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Encodes the applicant into a vector aligned with `schema`.
    #[must_use]
    pub fn encode(&self, input: &ApplicantInput, schema: &FeatureSchema) -> FeatureVector {
        self.encode_with_report(input, schema).0
    }

    /// Encodes the applicant and reports zero-filled and dropped columns.
    #[must_use]
    pub fn encode_with_report(
        &self,
        input: &ApplicantInput,
        schema: &FeatureSchema,
    ) -> (FeatureVector, EncodingReport) {
        let (vector, report) = self.align(input, schema);

        for column in &report.lost_signal {
            warn!(
                column = %column,
                "applicant category has no column in the model schema; its signal is zeroed"
            );
        }
        debug!(
            columns = vector.len(),
            zero_filled = report.zero_filled.len(),
            dropped = report.dropped.len(),
            "encoded applicant"
        );

        (vector, report)
    }

    /// Expands the applicant into every numeric and indicator column,
    /// before alignment to any schema.
    ///
    /// Returns `(name, value, active)` where `active` marks indicator columns
    /// that are set for this applicant (numeric columns are always active).
    #[must_use]
    pub fn expand(&self, input: &ApplicantInput) -> Vec<(String, f64, bool)> {
        let mut columns: Vec<(String, f64, bool)> = NumericFeature::ALL
            .into_iter()
            .map(|f| (f.column_name().to_string(), f.value(input), true))
            .collect();

        for (table, active) in self.active_tokens(input) {
            for (_, token) in table.entries {
                let is_active = active == Some(*token);
                columns.push((table.column_name(token), indicator(is_active), is_active));
            }
        }

        columns
    }

    /// Each categorical table paired with the applicant's training token,
    /// `None` when the label is missing from the table.
    fn active_tokens(
        &self,
        input: &ApplicantInput,
    ) -> [(&CategoryTable, Option<&'static str>); 5] {
        let vocab = &self.vocabulary;
        [
            (&vocab.gender, vocab.gender.canonicalize(input.gender.label())),
            (
                &vocab.education,
                vocab.education.canonicalize(input.education.label()),
            ),
            (
                &vocab.home_ownership,
                vocab.home_ownership.canonicalize(input.home_ownership.label()),
            ),
            (
                &vocab.loan_intent,
                vocab.loan_intent.canonicalize(input.loan_intent.label()),
            ),
            (
                &vocab.previous_defaults,
                vocab
                    .previous_defaults
                    .canonicalize(input.previous_defaults_label()),
            ),
        ]
    }

    fn align(
        &self,
        input: &ApplicantInput,
        schema: &FeatureSchema,
    ) -> (FeatureVector, EncodingReport) {
        let active = self.active_tokens(input);
        let mut report = EncodingReport::default();
        let mut names = Vec::with_capacity(schema.len());
        let mut values = Vec::with_capacity(schema.len());

        for column in schema.columns() {
            let value = match &column.kind {
                FeatureKind::Numeric(feature) => Some(feature.value(input)),
                FeatureKind::Indicator { field, token } => active
                    .iter()
                    .find(|(table, _)| table.field == *field)
                    .filter(|(table, _)| table.display_for(token).is_some())
                    .map(|(_, own)| indicator(*own == Some(token.as_str()))),
                FeatureKind::Unknown => None,
            };
            let value = match value {
                Some(value) => value,
                None => {
                    report.zero_filled.push(column.name.clone());
                    0.0
                }
            };
            names.push(column.name.clone());
            values.push(value);
        }

        for (name, _, active) in self.expand(input) {
            if !schema.contains(&name) {
                if active && NumericFeature::from_column(&name).is_none() {
                    report.lost_signal.push(name.clone());
                }
                report.dropped.push(name);
            }
        }

        (FeatureVector { names, values }, report)
    }
}

/// Encodes with the trained vocabulary.
#[must_use]
pub fn encode(input: &ApplicantInput, schema: &FeatureSchema) -> FeatureVector {
    FeatureEncoder::new().encode(input, schema)
}

fn indicator(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::{Education, Gender, HomeOwnership, LoanIntent};
    use crate::vocabulary::{CategoryTable, GENDER};

    fn scenario_a() -> ApplicantInput {
        ApplicantInput {
            age: 30,
            income: 60_000.0,
            employment_experience: 8,
            loan_amount: 15_000.0,
            ..ApplicantInput::default()
        }
    }

    #[test]
    fn test_encode_trained_schema_is_exact() {
        let schema = FeatureSchema::trained();
        let (vector, report) = FeatureEncoder::new().encode_with_report(&scenario_a(), &schema);

        assert!(report.is_exact());
        assert_eq!(vector.len(), schema.len());
        let names: Vec<&str> = vector.names().iter().map(String::as_str).collect();
        let expected: Vec<&str> = schema.names().collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_numeric_pass_through() {
        let vector = encode(&scenario_a(), &FeatureSchema::trained());
        assert_eq!(vector.get("person_age"), Some(30.0));
        assert_eq!(vector.get("person_income"), Some(60_000.0));
        assert_eq!(vector.get("person_emp_exp"), Some(8.0));
        assert_eq!(vector.get("loan_amnt"), Some(15_000.0));
        assert_eq!(vector.get("loan_int_rate"), Some(12.5));
        assert_eq!(vector.get("loan_percent_income"), Some(0.25));
        assert_eq!(vector.get("cb_person_cred_hist_length"), Some(6.0));
        assert_eq!(vector.get("credit_score"), Some(680.0));
    }

    #[test]
    fn test_one_hot_indicators() {
        let input = ApplicantInput {
            gender: Gender::Male,
            education: Education::HighSchool,
            home_ownership: HomeOwnership::Mortgage,
            loan_intent: LoanIntent::HomeImprovement,
            previous_defaults: true,
            ..scenario_a()
        };
        let vector = encode(&input, &FeatureSchema::trained());

        assert_eq!(vector.get("person_gender_male"), Some(1.0));
        assert_eq!(vector.get("person_gender_female"), Some(0.0));
        assert_eq!(vector.get("person_education_High School"), Some(1.0));
        assert_eq!(vector.get("person_education_Bachelor"), Some(0.0));
        assert_eq!(vector.get("person_home_ownership_MORTGAGE"), Some(1.0));
        assert_eq!(vector.get("person_home_ownership_RENT"), Some(0.0));
        assert_eq!(vector.get("loan_intent_HOMEIMPROVEMENT"), Some(1.0));
        assert_eq!(vector.get("loan_intent_DEBTCONSOLIDATION"), Some(0.0));
        assert_eq!(vector.get("previous_loan_defaults_on_file_Yes"), Some(1.0));
        assert_eq!(vector.get("previous_loan_defaults_on_file_No"), Some(0.0));

        let ones = vector
            .iter()
            .filter(|(name, _)| NumericFeature::from_column(name).is_none())
            .filter(|(_, value)| *value == 1.0)
            .count();
        assert_eq!(ones, 5);
    }

    #[test]
    fn test_every_column_follows_its_kind() {
        let input = ApplicantInput {
            home_ownership: HomeOwnership::Own,
            loan_intent: LoanIntent::Venture,
            ..scenario_a()
        };
        let schema = FeatureSchema::trained();
        let vector = encode(&input, &schema);

        for (column, value) in schema.columns().iter().zip(vector.values()) {
            let expected = match &column.kind {
                FeatureKind::Numeric(feature) => feature.value(&input),
                FeatureKind::Indicator { field, token } => {
                    let own = match *field {
                        "person_home_ownership" => "OWN",
                        "loan_intent" => "VENTURE",
                        "person_gender" => "female",
                        "person_education" => "Bachelor",
                        _ => "No",
                    };
                    indicator(token == own)
                }
                FeatureKind::Unknown => unreachable!("trained schema has no unknown columns"),
            };
            assert_eq!(*value, expected, "column {}", column.name);
        }
    }

    #[test]
    fn test_unknown_columns_are_zero_filled() {
        let schema = FeatureSchema::from_names(
            ["person_age", "bureau_score", "loan_intent_VENTURE"],
            &Vocabulary::TRAINED,
        )
        .expect("valid");
        let input = ApplicantInput {
            loan_intent: LoanIntent::Venture,
            ..scenario_a()
        };
        let (vector, report) = FeatureEncoder::new().encode_with_report(&input, &schema);

        assert_eq!(vector.values(), &[30.0, 0.0, 1.0]);
        assert_eq!(report.zero_filled, vec!["bureau_score".to_string()]);
    }

    #[test]
    fn test_zero_income_gives_zero_ratio() {
        let input = ApplicantInput {
            income: 0.0,
            loan_amount: 5_000.0,
            ..ApplicantInput::default()
        };
        let vector = encode(&input, &FeatureSchema::trained());
        assert_eq!(vector.get("loan_percent_income"), Some(0.0));
    }

    #[test]
    fn test_align_fills_missing_and_drops_extra() {
        let schema = FeatureSchema::from_names(
            ["credit_score", "unused_flag", "person_gender_female", "person_age"],
            &Vocabulary::TRAINED,
        )
        .expect("valid");
        let (vector, report) = FeatureEncoder::new().encode_with_report(&scenario_a(), &schema);

        let names: Vec<&str> = vector.names().iter().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["credit_score", "unused_flag", "person_gender_female", "person_age"]
        );
        assert_eq!(vector.values(), &[680.0, 0.0, 1.0, 30.0]);
        assert_eq!(report.zero_filled, vec!["unused_flag".to_string()]);
        assert!(report.dropped.contains(&"loan_amnt".to_string()));
        assert!(report.dropped.contains(&"person_gender_male".to_string()));
        // the applicant's intent column was dropped, so its signal is lost
        assert!(report
            .lost_signal
            .contains(&"loan_intent_DEBTCONSOLIDATION".to_string()));
        assert!(!report.lost_signal.contains(&"person_gender_male".to_string()));
    }

    #[test]
    fn test_vocabulary_drift_silently_zeroes_signal() {
        // artifact trained on upper-case gender tokens
        let schema = FeatureSchema::from_names(
            ["person_age", "person_gender_FEMALE", "person_gender_MALE"],
            &Vocabulary::TRAINED,
        )
        .expect("valid");
        let (vector, report) = FeatureEncoder::new().encode_with_report(&scenario_a(), &schema);

        assert_eq!(vector.values(), &[30.0, 0.0, 0.0]);
        assert!(report
            .lost_signal
            .contains(&"person_gender_female".to_string()));
        assert_eq!(report.zero_filled.len(), 2);
    }

    #[test]
    fn test_custom_vocabulary_table_drives_columns() {
        const SHOUTING_GENDER: CategoryTable = CategoryTable {
            field: GENDER.field,
            entries: &[("Female", "FEMALE"), ("Male", "MALE")],
        };
        let vocabulary = Vocabulary {
            gender: SHOUTING_GENDER,
            ..Vocabulary::TRAINED
        };
        let schema = FeatureSchema::from_names(
            ["person_gender_FEMALE", "person_gender_MALE"],
            &vocabulary,
        )
        .expect("valid");
        let vector = FeatureEncoder::new()
            .with_vocabulary(vocabulary)
            .encode(&scenario_a(), &schema);
        assert_eq!(vector.values(), &[1.0, 0.0]);
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let schema = FeatureSchema::trained();
        let first = encode(&scenario_a(), &schema);
        let second = encode(&scenario_a(), &schema);
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_covers_every_category() {
        let expanded = FeatureEncoder::new().expand(&scenario_a());
        assert_eq!(expanded.len(), FeatureSchema::trained().len());
    }

    #[test]
    fn test_feature_vector_serializes_in_order() {
        let vector = FeatureVector::new(
            vec!["b".to_string(), "a".to_string()],
            vec![2.0, 1.0],
        )
        .expect("same length");
        let json = serde_json::to_string(&vector).expect("serialize");
        assert_eq!(json, r#"{"b":2.0,"a":1.0}"#);
    }

    #[test]
    fn test_feature_vector_length_mismatch() {
        assert!(FeatureVector::new(vec!["a".to_string()], vec![]).is_err());
    }
}
