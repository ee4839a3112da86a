//! The `briefwatch validate` command: author-time validation of one brief file.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context as _;

#[derive(Debug)]
enum Outcome {
    Valid(String),
    Invalid(String),
}

/// # Errors
///
/// Returns an error when the file cannot be read at all; a file that reads
/// but fails validation is reported on stdout with exit code 2.
pub fn run(file: &Path) -> anyhow::Result<ExitCode> {
    match validate_file(file)? {
        Outcome::Valid(message) => {
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Invalid(message) => {
            println!("{message}");
            Ok(ExitCode::from(2))
        }
    }
}

fn validate_file(file: &Path) -> anyhow::Result<Outcome> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("brief file needs a UTF-8 file name")?;

    Ok(match briefwatch_core::parse_brief(&content, stem, 1) {
        Ok(brief) => Outcome::Valid(format!(
            "ok: campaign '{}' requires {} products x {} aspect ratios x {} regions = {} variants (threshold {})",
            brief.campaign_id,
            brief.products.len(),
            brief.required_aspect_ratios.len(),
            brief.target_regions.len(),
            brief.expected_count(),
            brief.min_variants_threshold
        )),
        Err(e) => Outcome::Invalid(format!("invalid: {e}")),
    })
}
