//! Applicant form input.
//!
//! [`ApplicantInput`] is the raw form state. Its [`Default`] is the form's
//! documented initial state, which is what a session reset restores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vocabulary::{CategoryTable, EDUCATION, GENDER, HOME_OWNERSHIP, LOAN_INTENT};

/// Implements label/parse/serde plumbing for a categorical enum backed by a
/// vocabulary table.
macro_rules! categorical {
    ($ty:ident, $table:expr, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Every category in domain order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Label shown on the form.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Vocabulary table for this field.
            #[must_use]
            pub const fn table() -> &'static CategoryTable {
                &$table
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let label = Self::table().resolve(s).ok_or_else(|| {
                    let options: Vec<&str> = Self::ALL.iter().map(|v| v.label()).collect();
                    format!(
                        "unknown {} '{s}', expected one of: {}",
                        Self::table().field,
                        options.join(", ")
                    )
                })?;
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == label)
                    .ok_or_else(|| format!("unknown {} '{s}'", Self::table().field))
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.label().to_string()
            }
        }
    };
}

/// Applicant gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Gender {
    /// Female
    #[default]
    Female,
    /// Male
    Male,
}

categorical!(Gender, GENDER, { Female => "Female", Male => "Male" });

/// Highest education level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Education {
    /// High school diploma
    HighSchool,
    /// Bachelor's degree
    #[default]
    Bachelor,
    /// Master's degree
    Master,
    /// Associate degree
    Associate,
    /// Doctorate
    Doctorate,
}

categorical!(Education, EDUCATION, {
    HighSchool => "High School",
    Bachelor => "Bachelor",
    Master => "Master",
    Associate => "Associate",
    Doctorate => "Doctorate",
});

/// Home ownership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HomeOwnership {
    /// Renting
    #[default]
    Rent,
    /// Owns outright
    Own,
    /// Owns with a mortgage
    Mortgage,
    /// Anything else
    Other,
}

categorical!(HomeOwnership, HOME_OWNERSHIP, {
    Rent => "Rent",
    Own => "Own",
    Mortgage => "Mortgage",
    Other => "Other",
});

/// Declared purpose of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LoanIntent {
    /// Personal spending
    Personal,
    /// Tuition and schooling
    Education,
    /// Medical bills
    Medical,
    /// Business venture
    Venture,
    /// Home improvement
    HomeImprovement,
    /// Consolidating existing debt
    #[default]
    DebtConsolidation,
}

categorical!(LoanIntent, LOAN_INTENT, {
    Personal => "Personal",
    Education => "Education",
    Medical => "Medical",
    Venture => "Venture",
    HomeImprovement => "Home Improvement",
    DebtConsolidation => "Debt Consolidation",
});

/// Raw applicant attributes as entered on the form.
///
/// Missing fields in serialized input take the documented defaults.
///
/// # Example
///
/// ```
/// use lendwise::ApplicantInput;
///
/// let applicant = ApplicantInput {
///     income: 60_000.0,
///     loan_amount: 15_000.0,
///     ..ApplicantInput::default()
/// };
/// assert!((applicant.loan_percent_income() - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantInput {
    /// Age in years
    pub age: u32,
    /// Gender
    pub gender: Gender,
    /// Highest education level
    pub education: Education,
    /// Annual income in currency units
    pub income: f64,
    /// Years of professional experience
    pub employment_experience: u32,
    /// Home ownership status
    pub home_ownership: HomeOwnership,
    /// Requested loan amount in currency units
    pub loan_amount: f64,
    /// Purpose of the loan
    pub loan_intent: LoanIntent,
    /// Proposed interest rate in percent
    pub interest_rate: f64,
    /// Length of credit history in years
    pub credit_history_length: u32,
    /// Credit score (FICO scale)
    pub credit_score: u32,
    /// Whether previous loan defaults are on file
    pub previous_defaults: bool,
}

impl ApplicantInput {
    /// Default age
    pub const DEFAULT_AGE: u32 = 30;
    /// Default annual income (the form's minimum income)
    pub const DEFAULT_INCOME: f64 = 1000.0;
    /// Default employment experience
    pub const DEFAULT_EMPLOYMENT_EXPERIENCE: u32 = 8;
    /// Default loan amount (the form's minimum loan)
    pub const DEFAULT_LOAN_AMOUNT: f64 = 500.0;
    /// Default interest rate
    pub const DEFAULT_INTEREST_RATE: f64 = 12.5;
    /// Default credit history length
    pub const DEFAULT_CREDIT_HISTORY_LENGTH: u32 = 6;
    /// Default credit score
    pub const DEFAULT_CREDIT_SCORE: u32 = 680;

    /// Loan amount as a fraction of annual income.
    ///
    /// Always derived, never stored. Returns 0 when income is not a positive
    /// finite number.
    #[must_use]
    pub fn loan_percent_income(&self) -> f64 {
        if self.income.is_finite() && self.income > 0.0 {
            self.loan_amount / self.income
        } else {
            0.0
        }
    }

    /// Display label of the previous-defaults answer.
    #[must_use]
    pub fn previous_defaults_label(&self) -> &'static str {
        if self.previous_defaults {
            "Yes"
        } else {
            "No"
        }
    }
}

impl Default for ApplicantInput {
    fn default() -> Self {
        Self {
            age: Self::DEFAULT_AGE,
            gender: Gender::default(),
            education: Education::default(),
            income: Self::DEFAULT_INCOME,
            employment_experience: Self::DEFAULT_EMPLOYMENT_EXPERIENCE,
            home_ownership: HomeOwnership::default(),
            loan_amount: Self::DEFAULT_LOAN_AMOUNT,
            loan_intent: LoanIntent::default(),
            interest_rate: Self::DEFAULT_INTEREST_RATE,
            credit_history_length: Self::DEFAULT_CREDIT_HISTORY_LENGTH,
            credit_score: Self::DEFAULT_CREDIT_SCORE,
            previous_defaults: false,
        }
    }
}
