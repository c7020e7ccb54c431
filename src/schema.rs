//! Feature schema of a trained classifier.
//!
//! The schema is the ordered list of columns the classifier was trained on,
//! each tagged with what the encoder must put there. It is built once from
//! the artifact's feature names when the artifact is loaded.

use std::collections::HashSet;

use serde::Serialize;

use crate::applicant::ApplicantInput;
use crate::vocabulary::Vocabulary;

/// Numeric model inputs, passed through from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericFeature {
    /// `person_age`
    Age,
    /// `person_income`
    Income,
    /// `person_emp_exp`
    EmploymentExperience,
    /// `loan_amnt`
    LoanAmount,
    /// `loan_int_rate`
    InterestRate,
    /// `loan_percent_income`, derived
    LoanPercentIncome,
    /// `cb_person_cred_hist_length`
    CreditHistoryLength,
    /// `credit_score`
    CreditScore,
}

impl NumericFeature {
    /// All numeric features in training column order.
    pub const ALL: [Self; 8] = [
        Self::Age,
        Self::Income,
        Self::EmploymentExperience,
        Self::LoanAmount,
        Self::InterestRate,
        Self::LoanPercentIncome,
        Self::CreditHistoryLength,
        Self::CreditScore,
    ];

    /// Training column name.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Age => "person_age",
            Self::Income => "person_income",
            Self::EmploymentExperience => "person_emp_exp",
            Self::LoanAmount => "loan_amnt",
            Self::InterestRate => "loan_int_rate",
            Self::LoanPercentIncome => "loan_percent_income",
            Self::CreditHistoryLength => "cb_person_cred_hist_length",
            Self::CreditScore => "credit_score",
        }
    }

    /// Looks up a numeric feature by column name.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// Reads this feature from the applicant.
    #[must_use]
    pub fn value(self, input: &ApplicantInput) -> f64 {
        match self {
            Self::Age => f64::from(input.age),
            Self::Income => input.income,
            Self::EmploymentExperience => f64::from(input.employment_experience),
            Self::LoanAmount => input.loan_amount,
            Self::InterestRate => input.interest_rate,
            Self::LoanPercentIncome => input.loan_percent_income(),
            Self::CreditHistoryLength => f64::from(input.credit_history_length),
            Self::CreditScore => f64::from(input.credit_score),
        }
    }
}

/// What a schema column holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    /// A numeric pass-through value
    Numeric(NumericFeature),
    /// One-hot indicator of `field == token`
    Indicator {
        /// Categorical field prefix
        field: &'static str,
        /// Training-time category token
        token: String,
    },
    /// A column the encoder never produces; always zero
    Unknown,
}

/// One named column of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureColumn {
    /// Column name as trained
    pub name: String,
    /// Column kind
    pub kind: FeatureKind,
}

/// Ordered column schema of a trained classifier.
///
/// # Example
///
/// ```
/// use lendwise::schema::{FeatureKind, FeatureSchema};
/// use lendwise::vocabulary::Vocabulary;
///
/// let schema = FeatureSchema::from_names(
///     ["person_age", "loan_intent_VENTURE", "mystery"],
///     &Vocabulary::TRAINED,
/// )
/// .expect("unique names");
/// assert_eq!(schema.len(), 3);
/// assert!(matches!(schema.columns()[2].kind, FeatureKind::Unknown));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// Builds a schema from trained column names, classifying each column.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or a name repeats.
    pub fn from_names<I, S>(names: I, vocabulary: &Vocabulary) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();

        for name in names {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                return Err(format!("duplicate feature column '{name}'"));
            }
            columns.push(FeatureColumn {
                name: name.to_string(),
                kind: classify(name, vocabulary),
            });
        }

        if columns.is_empty() {
            return Err("feature column list is empty".into());
        }

        Ok(Self { columns })
    }

    /// The full column set produced by one-hot encoding with the trained
    /// vocabulary: numeric columns first, then indicators field by field.
    #[must_use]
    pub fn trained() -> Self {
        let vocabulary = Vocabulary::TRAINED;
        let mut columns: Vec<FeatureColumn> = NumericFeature::ALL
            .into_iter()
            .map(|f| FeatureColumn {
                name: f.column_name().to_string(),
                kind: FeatureKind::Numeric(f),
            })
            .collect();

        for table in vocabulary.tables() {
            for (_, token) in table.entries {
                columns.push(FeatureColumn {
                    name: table.column_name(token),
                    kind: FeatureKind::Indicator {
                        field: table.field,
                        token: (*token).to_string(),
                    },
                });
            }
        }

        Self { columns }
    }

    /// Columns in order.
    #[must_use]
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// True when the schema has a column with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Columns the encoder can never fill.
    pub fn unknown_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns
            .iter()
            .filter(|c| c.kind == FeatureKind::Unknown)
            .map(|c| c.name.as_str())
    }
}

fn classify(name: &str, vocabulary: &Vocabulary) -> FeatureKind {
    if let Some(feature) = NumericFeature::from_column(name) {
        return FeatureKind::Numeric(feature);
    }
    match vocabulary.split_column(name) {
        Some((table, token)) => FeatureKind::Indicator {
            field: table.field,
            token: token.to_string(),
        },
        None => FeatureKind::Unknown,
    }
}
