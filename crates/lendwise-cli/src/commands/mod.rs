//! Subcommand implementations and the applicant flags they share.

pub(crate) mod inspect;
pub(crate) mod predict;
pub(crate) mod validate;

use std::fs;
use std::path::PathBuf;

use clap::Args;
use lendwise::applicant::{Education, Gender, HomeOwnership, LoanIntent};
use lendwise::ApplicantInput;

use crate::error::{CliError, Result};

/// Applicant fields. Flags override values read from `--input`, which in
/// turn override the form defaults.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ApplicantArgs {
    /// JSON file with applicant fields
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Gender (Female, Male)
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Education (High School, Bachelor, Master, Associate, Doctorate)
    #[arg(long)]
    pub education: Option<Education>,

    /// Annual income
    #[arg(long)]
    pub income: Option<f64>,

    /// Years of employment experience
    #[arg(long, visible_alias = "emp-exp")]
    pub employment_experience: Option<u32>,

    /// Home ownership (Rent, Own, Mortgage, Other)
    #[arg(long)]
    pub home_ownership: Option<HomeOwnership>,

    /// Requested loan amount
    #[arg(long)]
    pub loan_amount: Option<f64>,

    /// Loan purpose (Personal, Education, Medical, Venture, Home Improvement,
    /// Debt Consolidation)
    #[arg(long)]
    pub loan_intent: Option<LoanIntent>,

    /// Interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<f64>,

    /// Credit history length in years
    #[arg(long)]
    pub credit_history_length: Option<u32>,

    /// Credit score
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Previous loan defaults on file (yes/no)
    #[arg(long, value_name = "YES|NO", value_parser = parse_yes_no)]
    pub previous_defaults: Option<bool>,
}

impl ApplicantArgs {
    /// Builds the applicant from defaults, the input file and flags.
    pub(crate) fn resolve(&self) -> Result<ApplicantInput> {
        let mut input = match &self.input {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text).map_err(|e| CliError::InputFile {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            None => ApplicantInput::default(),
        };

        if let Some(v) = self.age {
            input.age = v;
        }
        if let Some(v) = self.gender {
            input.gender = v;
        }
        if let Some(v) = self.education {
            input.education = v;
        }
        if let Some(v) = self.income {
            input.income = v;
        }
        if let Some(v) = self.employment_experience {
            input.employment_experience = v;
        }
        if let Some(v) = self.home_ownership {
            input.home_ownership = v;
        }
        if let Some(v) = self.loan_amount {
            input.loan_amount = v;
        }
        if let Some(v) = self.loan_intent {
            input.loan_intent = v;
        }
        if let Some(v) = self.interest_rate {
            input.interest_rate = v;
        }
        if let Some(v) = self.credit_history_length {
            input.credit_history_length = v;
        }
        if let Some(v) = self.credit_score {
            input.credit_score = v;
        }
        if let Some(v) = self.previous_defaults {
            input.previous_defaults = v;
        }
        Ok(input)
    }
}

fn parse_yes_no(s: &str) -> std::result::Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(format!("expected yes or no, got '{other}'")),
    }
}
