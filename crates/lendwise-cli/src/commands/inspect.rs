//! Inspect command: summarize the configured model artifact.

use lendwise::classifier::ClassifierAdapter;
use lendwise::traits::Classifier;
use lendwise::LendConfig;

use crate::error::Result;
use crate::output;

/// Run the inspect command
pub(crate) fn run(config: &LendConfig, json: bool, verbose: bool) -> Result<()> {
    let adapter = ClassifierAdapter::load(&config.artifact_path, config.approved_class)?;
    let summary = adapter.artifact_summary();

    if json {
        output::json(&summary)?;
        return Ok(());
    }

    output::section("Model Artifact");
    output::kv("Path", summary.path.display());
    output::kv("Format", summary.format);
    output::kv("Classes", format!("{:?}", summary.classes));
    output::kv(
        "Approved class",
        format!("{} (index {})", summary.approved_class, summary.approved_index),
    );
    output::kv("Trees", summary.n_estimators);
    output::kv("Max depth", summary.max_depth);
    output::kv("Learning rate", summary.learning_rate);
    output::kv("Features", summary.n_features);

    if verbose {
        output::section("Feature Columns");
        for (idx, name) in adapter.schema().names().enumerate() {
            println!("  {idx:>3}  {name}");
        }
    }

    for column in &summary.unknown_columns {
        output::warning(&format!("column '{column}' is never produced by the encoder"));
    }
    if summary.unknown_columns.is_empty() {
        output::success("Every column maps to an applicant field");
    } else {
        output::fail("Some columns will always be zero");
    }
    Ok(())
}
