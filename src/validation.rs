//! Field validation for applicant input.
//!
//! Every rule runs on every submission so the user sees all problems at once.
//! A non-empty [`ValidationReport`] blocks encoding and scoring.
//!
//! # Example
//!
//! ```
//! use lendwise::validation::{validate, ValidationPolicy, Violation};
//! use lendwise::ApplicantInput;
//!
//! let applicant = ApplicantInput {
//!     age: 20,
//!     employment_experience: 10,
//!     credit_history_length: 2,
//!     income: 40_000.0,
//!     loan_amount: 5_000.0,
//!     ..ApplicantInput::default()
//! };
//! let report = validate(&applicant, &ValidationPolicy::default()).unwrap_err();
//! assert_eq!(report.len(), 1);
//! assert!(matches!(
//!     report.violations()[0],
//!     Violation::ExperienceExceedsWorkingYears { experience: 10, working_years: 4, .. }
//! ));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::applicant::ApplicantInput;

/// Tunable validation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Age at which a person may start working or holding credit
    pub min_working_age: u32,
    /// Smallest loan the form accepts
    pub min_loan_amount: f64,
    /// Reject loans larger than `max_loan_to_income` × income
    pub strict_loan_ratio: bool,
    /// Loan/income multiple used by the strict rule
    pub max_loan_to_income: f64,
    /// Enforce the form's widget ranges
    pub enforce_ranges: bool,
}

impl ValidationPolicy {
    /// The policy without the loan/income multiple rule.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict_loan_ratio: false,
            ..Self::default()
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_working_age: 16,
            min_loan_amount: 500.0,
            strict_loan_ratio: true,
            max_loan_to_income: 2.0,
            enforce_ranges: true,
        }
    }
}

/// Bounded form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangedField {
    /// Age slider
    Age,
    /// Employment experience slider
    EmploymentExperience,
    /// Interest rate slider
    InterestRate,
    /// Credit score slider
    CreditScore,
    /// Credit history slider
    CreditHistoryLength,
}

impl RangedField {
    /// Inclusive `(min, max)` bounds of the widget.
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Age => (18.0, 80.0),
            Self::EmploymentExperience => (0.0, 50.0),
            Self::InterestRate => (5.0, 25.0),
            Self::CreditScore => (300.0, 850.0),
            Self::CreditHistoryLength => (0.0, 40.0),
        }
    }

    /// Field label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::EmploymentExperience => "Employment experience",
            Self::InterestRate => "Loan interest rate",
            Self::CreditScore => "Credit score",
            Self::CreditHistoryLength => "Credit history length",
        }
    }
}

/// Numeric field that must be finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericField {
    /// Annual income
    Income,
    /// Loan amount
    LoanAmount,
    /// Interest rate
    InterestRate,
}

impl NumericField {
    /// Field label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "Annual income",
            Self::LoanAmount => "Loan amount",
            Self::InterestRate => "Loan interest rate",
        }
    }
}

/// One broken field constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// Income or loan amount is missing (zero or negative).
    MissingRequired,
    /// Loan amount is present but under the minimum.
    LoanBelowMinimum {
        /// Requested amount
        amount: f64,
        /// Policy minimum
        minimum: f64,
    },
    /// More years of work than the applicant's age allows.
    ExperienceExceedsWorkingYears {
        /// Entered experience
        experience: u32,
        /// `age - min_working_age`
        working_years: i64,
        /// Policy working age
        min_working_age: u32,
    },
    /// Longer credit history than the applicant's age allows.
    CreditHistoryExceedsCreditYears {
        /// Entered history length
        history: u32,
        /// `age - min_working_age`
        credit_years: i64,
        /// Policy working age
        min_working_age: u32,
    },
    /// Loan too large relative to income (strict policy only).
    LoanExceedsIncomeMultiple {
        /// Requested amount
        amount: f64,
        /// Annual income
        income: f64,
        /// Allowed multiple
        multiple: f64,
    },
    /// Value outside the form widget's bounds.
    OutOfRange {
        /// Offending field
        field: RangedField,
        /// Entered value
        value: f64,
    },
    /// NaN or infinite number.
    NonFinite {
        /// Offending field
        field: NumericField,
    },
}

impl Violation {
    /// Plain-language message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingRequired => {
                "Annual income and loan amount are required fields.".to_string()
            }
            Self::LoanBelowMinimum { minimum, .. } => {
                format!("Loan amount must be at least {minimum}.")
            }
            Self::ExperienceExceedsWorkingYears {
                min_working_age, ..
            } => format!(
                "Employment experience cannot be greater than potential working years (age - {min_working_age})."
            ),
            Self::CreditHistoryExceedsCreditYears {
                min_working_age, ..
            } => format!(
                "Credit history length cannot exceed potential credit-holding years (age - {min_working_age})."
            ),
            Self::LoanExceedsIncomeMultiple { .. } => {
                "Loan amount seems excessively high compared to annual income.".to_string()
            }
            Self::OutOfRange { field, .. } => {
                let (min, max) = field.bounds();
                format!("{} must be between {min} and {max}.", field.label())
            }
            Self::NonFinite { field } => format!("{} must be a finite number.", field.label()),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Every violation found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Header line of the combined error block.
    pub const HEADER: &'static str = "Please correct the following input errors:";

    /// Violations in rule order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when the input passed every rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Messages in rule order, verbatim.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::message).collect()
    }
}

impl From<Vec<Violation>> for ValidationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::HEADER)?;
        for violation in &self.violations {
            write!(f, "\n• {violation}")?;
        }
        Ok(())
    }
}

/// Checks raw input against the field constraints.
///
/// # Errors
///
/// Returns the full [`ValidationReport`] when any rule fails.
pub fn validate(
    input: &ApplicantInput,
    policy: &ValidationPolicy,
) -> std::result::Result<(), ValidationReport> {
    let report = check(input, policy);
    if report.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}

/// Runs every rule and returns the (possibly empty) report.
#[must_use]
pub fn check(input: &ApplicantInput, policy: &ValidationPolicy) -> ValidationReport {
    let mut violations = Vec::new();

    let income_finite = input.income.is_finite();
    let loan_finite = input.loan_amount.is_finite();
    if !income_finite {
        violations.push(Violation::NonFinite {
            field: NumericField::Income,
        });
    }
    if !loan_finite {
        violations.push(Violation::NonFinite {
            field: NumericField::LoanAmount,
        });
    }

    let income_present = income_finite && input.income > 0.0;
    let loan_present = loan_finite && input.loan_amount > 0.0;
    if (income_finite && !income_present) || (loan_finite && !loan_present) {
        violations.push(Violation::MissingRequired);
    }
    if loan_present && input.loan_amount < policy.min_loan_amount {
        violations.push(Violation::LoanBelowMinimum {
            amount: input.loan_amount,
            minimum: policy.min_loan_amount,
        });
    }

    let working_years = i64::from(input.age) - i64::from(policy.min_working_age);
    if i64::from(input.employment_experience) > working_years {
        violations.push(Violation::ExperienceExceedsWorkingYears {
            experience: input.employment_experience,
            working_years,
            min_working_age: policy.min_working_age,
        });
    }
    if i64::from(input.credit_history_length) > working_years {
        violations.push(Violation::CreditHistoryExceedsCreditYears {
            history: input.credit_history_length,
            credit_years: working_years,
            min_working_age: policy.min_working_age,
        });
    }

    if policy.strict_loan_ratio
        && income_present
        && loan_present
        && input.loan_amount > input.income * policy.max_loan_to_income
    {
        violations.push(Violation::LoanExceedsIncomeMultiple {
            amount: input.loan_amount,
            income: input.income,
            multiple: policy.max_loan_to_income,
        });
    }

    if !input.interest_rate.is_finite() {
        violations.push(Violation::NonFinite {
            field: NumericField::InterestRate,
        });
    }
    if policy.enforce_ranges {
        check_ranges(input, &mut violations);
    }

    ValidationReport::from(violations)
}

fn check_ranges(input: &ApplicantInput, violations: &mut Vec<Violation>) {
    let ranged = [
        (RangedField::Age, f64::from(input.age)),
        (
            RangedField::EmploymentExperience,
            f64::from(input.employment_experience),
        ),
        (RangedField::InterestRate, input.interest_rate),
        (RangedField::CreditScore, f64::from(input.credit_score)),
        (
            RangedField::CreditHistoryLength,
            f64::from(input.credit_history_length),
        ),
    ];

    for (field, value) in ranged {
        let (min, max) = field.bounds();
        // NaN is reported as non-finite above
        if value.is_finite() && (value < min || value > max) {
            violations.push(Violation::OutOfRange { field, value });
        }
    }
}
