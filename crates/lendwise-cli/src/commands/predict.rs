//! Predict command: validate, score and report one application.

use colored::Colorize;
use lendwise::classifier::shared_adapter;
use lendwise::{ApplicantInput, LendConfig, LendError, PredictionResult, PredictionSession, Verdict};
use serde::Serialize;
use tracing::info;

use super::ApplicantArgs;
use crate::error::Result;
use crate::output;

#[derive(Serialize)]
struct PredictOutput<'a> {
    status: &'static str,
    input: &'a ApplicantInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a PredictionResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<String>,
}

/// Run the predict command
pub(crate) fn run(config: &LendConfig, args: &ApplicantArgs, json: bool) -> Result<()> {
    let input = args.resolve()?;
    let adapter = shared_adapter(config)?;

    let mut session = PredictionSession::new(adapter).with_policy(config.validation.clone());
    session.set_input(input);

    match session.submit() {
        Ok(result) => {
            info!(label = ?result.label, "application scored");
            if json {
                output::json(&PredictOutput {
                    status: "scored",
                    input: session.input(),
                    result: Some(&result),
                    violations: Vec::new(),
                })?;
            } else {
                print_result(&result);
            }
            Ok(())
        }
        Err(LendError::Validation(report)) => {
            if json {
                output::json(&PredictOutput {
                    status: "invalid",
                    input: session.input(),
                    result: None,
                    violations: report.messages(),
                })?;
            } else {
                output::violations(&report);
            }
            Err(LendError::Validation(report).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_result(result: &PredictionResult) {
    output::section("Loan Decision");
    let banner = match result.label {
        Verdict::Approved => format!("✅ {}", result.label).green().bold(),
        Verdict::Rejected => format!("❌ {}", result.label).red().bold(),
    };
    println!("  {banner}");
    output::kv("Approval confidence", result.approval_percent());
    output::kv("Rejection confidence", result.rejection_percent());
}
