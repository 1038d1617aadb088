use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use crate::error::{Result, RulesError};

/// Name of the Graphviz layout binary.
pub const DOT_EXECUTABLE: &str = "dot";

/// Runs Graphviz `dot` on `dot_path`, writing an image of type `format` (`png`, `svg`, `pdf`, ...)
/// to `output_path`.
///
/// The renderer is an external program: if it is missing or exits with an
/// error the failure is returned as `RulesError::Render`.
pub fn render_dot(dot_path: &Path, output_path: &Path, format: &str) -> Result<()> {
    info!(input = ?dot_path, output = ?output_path, format, "Rendering graph");

    let output = Command::new(DOT_EXECUTABLE)
        .arg(format!("-T{}", format))
        .arg(dot_path)
        .arg("-o")
        .arg(output_path)
        .output()
        .map_err(|e| {
            warn!("Failed to execute '{}': {}", DOT_EXECUTABLE, e);
            RulesError::Render(format!(
                "could not run '{}' ({}); is Graphviz installed and on PATH?",
                DOT_EXECUTABLE, e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(status = %output.status, "Graphviz rendering failed");
        return Err(RulesError::Render(format!(
            "'{}' exited with {}: {}",
            DOT_EXECUTABLE,
            output.status,
            stderr.trim()
        )));
    }

    info!(output = ?output_path, "Graph rendered");
    Ok(())
}
