//! Reading proposed steps from disk or stdin

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use stepdag_core::{Error, ProposedStep, Result, ResultExt};

/// Accepted document shapes: a bare array, or an object with a `steps` array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepDocument {
    List(Vec<ProposedStep>),
    Wrapped { steps: Vec<ProposedStep> },
}

/// Read proposed steps from `path`, or from stdin when `path` is `-`
pub fn read_proposed_steps(path: &Path) -> Result<Vec<ProposedStep>> {
    let steps = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| Error::file_system("<stdin>", "read", e))?;
        parse_proposed_steps(&buffer).context("could not parse steps from stdin")?
    } else {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;
        parse_proposed_steps(&content)
            .with_context(|| format!("could not parse steps from '{}'", path.display()))?
    };
    tracing::debug!(input = %path.display(), steps = steps.len(), "proposed steps loaded");
    Ok(steps)
}

/// Parse proposed steps from JSON text
pub fn parse_proposed_steps(content: &str) -> Result<Vec<ProposedStep>> {
    let document: StepDocument = serde_json::from_str(content)?;
    Ok(match document {
        StepDocument::List(steps) | StepDocument::Wrapped { steps } => steps,
    })
}
