//! Terminal output for plans, results and form errors.

use anyhow::Result;

use ssb_core::models::{FormError, Severity};
use ssb_core::orchestrator::{PipelineError, RunPlan, RunResult};

pub fn form_error(error: &FormError) {
    eprintln!("{}", form_error_line(error));
}

fn form_error_line(error: &FormError) -> String {
    let tag = match error.severity() {
        Severity::Warning => "Warning",
        Severity::Error => "Error",
    };
    format!("{} ({}): {}", tag, error.title(), error)
}

/// Print a run failure that never reached the log callback.
///
/// The runner already reports its own errors as `Error: ...` lines; only a
/// panicked worker dies without a word.
pub fn unlogged_failure(error: &PipelineError) {
    if let Some(line) = unlogged_failure_line(error) {
        eprintln!("{}", line);
    }
}

fn unlogged_failure_line(error: &PipelineError) -> Option<String> {
    match error {
        PipelineError::WorkerPanicked { .. } => Some(format!("Error: {}", error)),
        _ => None,
    }
}

pub fn print_plan(plan: &RunPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
    } else {
        for line in plan_lines(plan) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn print_result(result: &RunResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        for line in summary_lines(result) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn plan_lines(plan: &RunPlan) -> Vec<String> {
    let mut lines = vec![format!(
        "{} segments in {}",
        plan.segments.len(),
        plan.input_dir.display()
    )];
    for segment in &plan.segments {
        lines.push(format!(
            "  {:>6}  {}",
            segment.key.as_str(),
            plan.assignment.effect_for(&segment.key).label()
        ));
    }
    if !plan.unmatched_images.is_empty() {
        lines.push(format!(
            "Images without audio: {}",
            plan.unmatched_images.join(", ")
        ));
    }
    if !plan.unmatched_audio.is_empty() {
        lines.push(format!(
            "Audio without images: {}",
            plan.unmatched_audio.join(", ")
        ));
    }
    lines
}

fn summary_lines(result: &RunResult) -> Vec<String> {
    let rendered = result.rendered_keys();
    let failed = result.failed_keys();

    let mut lines = vec![
        format!("Output: {}", result.output_path.display()),
        format!("Rendered: {} of {}", rendered.len(), result.segments.len()),
    ];
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|k| k.as_str()).collect();
        lines.push(format!("Failed segments: {}", names.join(", ")));
    }
    lines.push(format!("Log: {}", result.log_path.display()));
    lines
}
