//! Assign step - randomly partitions segment keys into effect groups.

use std::collections::BTreeSet;

use crate::effects::{assign_effects, run_rng, EffectAssignment};
use crate::models::{Effect, SegmentKey};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};

/// Shuffles the discovered keys and slices them into zoom, pan and shake.
pub struct AssignEffectsStep;

impl AssignEffectsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssignEffectsStep {
    fn default() -> Self {
        Self::new()
    }
}

fn group_line(effect: Effect, keys: &BTreeSet<SegmentKey>) -> String {
    let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    format!("{} segments: [{}]", effect.label(), names.join(", "))
}

impl PipelineStep for AssignEffectsStep {
    fn name(&self) -> &str {
        "AssignEffects"
    }

    fn description(&self) -> &str {
        "Assigning effects"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        if state.discovery.is_none() {
            return Err(StepError::precondition_failed(
                "Segments must be discovered before effects are assigned",
            ));
        }

        let counts = ctx.request.counts;
        if counts.total() == 0 {
            state.assignment = Some(EffectAssignment {
                requested: counts,
                ..Default::default()
            });
            return Ok(StepOutcome::Skipped("no effects requested".to_string()));
        }

        let keys = state.keys();
        let mut rng = run_rng(ctx.request.seed);
        let assignment = assign_effects(&keys, counts, &mut rng);

        if let Some(seed) = ctx.request.seed {
            ctx.logger.debug(&format!("Effect shuffle seed: {}", seed));
        }
        if assignment.was_capped() {
            let got = assignment.assigned();
            ctx.logger.debug(&format!(
                "Requested {}/{}/{} effects for {} segments, assigned {}/{}/{}",
                counts.zoom,
                counts.pan,
                counts.shake,
                keys.len(),
                got.zoom,
                got.pan,
                got.shake
            ));
        }
        for (effect, keys) in [
            (Effect::Zoom, &assignment.zoom),
            (Effect::Pan, &assignment.pan),
            (Effect::Shake, &assignment.shake),
        ] {
            ctx.logger.info(&group_line(effect, keys));
        }

        state.assignment = Some(assignment);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let assignment = state
            .assignment
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("No effect assignment recorded"))?;

        let overlaps = assignment.zoom.intersection(&assignment.pan).count()
            + assignment.zoom.intersection(&assignment.shake).count()
            + assignment.pan.intersection(&assignment.shake).count();
        if overlaps > 0 {
            return Err(StepError::invalid_output(
                "A segment was assigned more than one effect",
            ));
        }
        Ok(())
    }
}
