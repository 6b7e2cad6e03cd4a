//! The planning pipeline
//!
//! proposed steps -> identifiers and resolved dependencies -> [`StepGraph`]
//! -> [`ValidatedGraph`] -> total order -> levels -> [`ExecutionPlan`]
//!
//! Every call builds fresh state; nothing is shared between calls.

use crate::critical_path::critical_path;
use crate::extract::{extract_references, resolve_references, ReferenceIndex};
use crate::graph::StepGraph;
use crate::identifier::IdentifierGenerator;
use crate::levels::{partition_levels, sequential_levels};
use crate::sort::topological_order;
use crate::validate::{GraphValidator, ValidatedGraph};
use indexmap::IndexSet;
use stepdag_config::{PlannerConfig, SortFallbackPolicy};
use stepdag_core::{Error, ExecutionPlan, PlanWarning, ProposedStep, Result, Step};

/// Steps with identifiers assigned and dependencies resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifiedSteps {
    pub steps: Vec<Step>,
    pub warnings: Vec<PlanWarning>,
}

/// Turns proposed steps into an execution plan
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan the raw output of the step parser
    ///
    /// An empty list means nothing was extracted from the model response and
    /// fails with [`Error::EmptyPlan`].
    pub fn plan(&self, proposed: &[ProposedStep]) -> Result<ExecutionPlan> {
        if proposed.is_empty() {
            tracing::warn!("no steps were extracted; refusing to plan");
            return Err(Error::EmptyPlan);
        }

        let IdentifiedSteps { steps, warnings } = self.identify(proposed);
        self.plan_with_warnings(steps, warnings)
    }

    /// Assign identifiers and resolve dependency annotations
    pub fn identify(&self, proposed: &[ProposedStep]) -> IdentifiedSteps {
        let mut generator = IdentifierGenerator::from_config(&self.config);
        let mut warnings = Vec::new();

        let ids: Vec<String> = proposed
            .iter()
            .map(|step| {
                let issued =
                    generator.generate(step.action, &step.description, step.sequence_number);
                if let Some(warning) = issued.warning() {
                    tracing::warn!(%warning, "identifier collision");
                    warnings.push(warning);
                }
                issued.id
            })
            .collect();

        let index = ReferenceIndex::new(
            ids.iter()
                .map(String::as_str)
                .zip(proposed.iter().map(|step| step.sequence_number)),
        );

        let steps = proposed
            .iter()
            .zip(ids)
            .map(|(proposed, id)| {
                let depends_on = proposed
                    .dependency_text
                    .as_deref()
                    .map(|text| resolve_references(&extract_references(text), &index))
                    .unwrap_or_else(IndexSet::new);
                Step {
                    id,
                    sequence_number: proposed.sequence_number,
                    action: proposed.action,
                    description: proposed.description.clone(),
                    path: proposed.path.clone(),
                    command: proposed.command.clone(),
                    depends_on,
                }
            })
            .collect();

        IdentifiedSteps { steps, warnings }
    }

    /// Plan steps whose identifiers and dependencies are already resolved
    ///
    /// An empty list yields an empty plan.
    pub fn plan_steps(&self, steps: Vec<Step>) -> Result<ExecutionPlan> {
        self.plan_with_warnings(steps, Vec::new())
    }

    /// Rebuild a plan from its own steps
    pub fn replan(&self, plan: &ExecutionPlan) -> Result<ExecutionPlan> {
        self.plan_steps(plan.order.clone())
    }

    /// Validate without ordering
    pub fn validate(&self, steps: Vec<Step>) -> Result<ValidatedGraph> {
        GraphValidator::from_config(&self.config).validate(StepGraph::build(steps))
    }

    fn plan_with_warnings(
        &self,
        steps: Vec<Step>,
        warnings: Vec<PlanWarning>,
    ) -> Result<ExecutionPlan> {
        let span = stepdag_utils::tracing::plan_span(steps.len());
        let _guard = span.enter();

        let graph = self.validate(steps)?;
        self.plan_graph(graph, warnings)
    }

    fn plan_graph(
        &self,
        graph: ValidatedGraph,
        mut warnings: Vec<PlanWarning>,
    ) -> Result<ExecutionPlan> {
        warnings.extend(graph.warnings());

        let outcome = topological_order(&graph);
        let levels = match (&outcome.fallback, partition_levels(&graph)) {
            (None, Some(levels)) => levels,
            (fault, _) => {
                let reason = fault
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "execution levels could not be computed".to_string());
                if self.config.sort_fallback == SortFallbackPolicy::Error {
                    return Err(Error::sort_failure(reason));
                }
                tracing::warn!(%reason, "planning with declaration order and sequential levels");
                warnings.push(PlanWarning::SortFallback { reason });
                sequential_levels(&outcome.order)
            }
        };

        let order: Vec<Step> = outcome
            .order
            .iter()
            .filter_map(|id| graph.step(id).cloned())
            .collect();

        let plan = ExecutionPlan {
            order,
            levels,
            critical_path: critical_path(&graph),
            warnings,
        };
        tracing::info!(
            steps = plan.len(),
            levels = plan.levels.len(),
            max_parallelism = plan.max_parallelism(),
            fallback = plan.used_sort_fallback(),
            "execution plan ready"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepdag_core::{Action, ErrorKind};

    fn proposed(seq: u32, action: Action, description: &str, deps: &str) -> ProposedStep {
        ProposedStep::new(seq, action, description).with_dependency_text(deps)
    }

    #[test]
    fn test_identify_resolves_annotations() {
        let planner = Planner::default();
        let identified = planner.identify(&[
            proposed(1, Action::Read, "config", ""),
            proposed(2, Action::Write, "config", "Depends on: STEP_READ_CONFIG"),
            proposed(3, Action::Run, "tests", "Dependencies: 1, step_write_config"),
        ]);

        let ids: Vec<&str> = identified.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["step_read_config", "step_write_config", "step_run_tests"]);
        assert!(identified.steps[0].depends_on.is_empty());
        assert_eq!(
            identified.steps[2].depends_on.iter().collect::<Vec<_>>(),
            vec!["step_read_config", "step_write_config"]
        );
        assert!(identified.warnings.is_empty());
    }

    #[test]
    fn test_identify_reports_disambiguation() {
        let identified = Planner::default().identify(&[
            proposed(1, Action::Run, "tests", ""),
            proposed(2, Action::Run, "tests", "Depends on: step_run_tests"),
        ]);
        assert_eq!(identified.steps[1].id, "step_run_tests_2");
        assert_eq!(identified.warnings.len(), 1);
    }

    #[test]
    fn test_plan_rejects_empty_input() {
        let err = Planner::default().plan(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyPlan);
    }

    #[test]
    fn test_plan_steps_accepts_empty_input() {
        let plan = Planner::default().plan_steps(Vec::new()).unwrap();
        assert!(plan.order.is_empty());
        assert!(plan.levels.is_empty());
        assert!(plan.critical_path.is_empty());
    }

    #[test]
    fn test_fallback_produces_sequential_levels() {
        let graph = ValidatedGraph::from_steps_unchecked(vec![
            Step::new("a", 1, Action::Run, "a").depending_on(["b"]),
            Step::new("b", 2, Action::Run, "b").depending_on(["a"]),
        ]);
        let plan = Planner::default().plan_graph(graph, Vec::new()).unwrap();

        assert_eq!(plan.step_ids(), vec!["a", "b"]);
        assert_eq!(plan.levels.len(), 2);
        assert!(plan.used_sort_fallback());
        assert!(plan.critical_path.is_empty());
    }

    #[test]
    fn test_strict_policy_turns_fallback_into_error() {
        let graph = ValidatedGraph::from_steps_unchecked(vec![
            Step::new("a", 1, Action::Run, "a").depending_on(["b"]),
            Step::new("b", 2, Action::Run, "b").depending_on(["a"]),
        ]);
        let planner = Planner::new(PlannerConfig {
            sort_fallback: SortFallbackPolicy::Error,
            ..PlannerConfig::default()
        });
        let err = planner.plan_graph(graph, Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SortFailure);
        assert!(err.to_string().contains("sort stalled after emitting 0 of 2 steps"));
    }
}
