//! Validate command: field checks only, no model required.

use lendwise::validation::check;
use lendwise::LendConfig;
use serde::Serialize;

use super::ApplicantArgs;
use crate::error::{CliError, Result};
use crate::output;

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
    violations: Vec<String>,
}

/// Run the validate command
pub(crate) fn run(config: &LendConfig, args: &ApplicantArgs, json: bool) -> Result<()> {
    let input = args.resolve()?;
    let report = check(&input, &config.validation);

    if json {
        output::json(&ValidateOutput {
            valid: report.is_empty(),
            violations: report.messages(),
        })?;
    } else if report.is_empty() {
        output::success("All fields are valid");
    } else {
        output::violations(&report);
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(CliError::Invalid(report))
    }
}
