//! Ordered step plans.

use crate::domain::profile::SetupProfile;
use crate::domain::step::Step;

/// A titled group of steps, e.g. "docker install".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub title: String,
    pub steps: Vec<Step>,
    /// Undo steps for this phase. Reserved: the runner reports them but
    /// never executes them.
    pub revert: Vec<Step>,
}

impl Phase {
    #[must_use]
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            title: title.into(),
            steps,
            revert: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_revert(mut self, revert: Vec<Step>) -> Self {
        self.revert = revert;
        self
    }
}

/// Everything a profile will do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub profile: SetupProfile,
    pub phases: Vec<Phase>,
    /// Client config paths produced by the plan.
    pub artifacts: Vec<String>,
    /// Files copied next to the artifacts by tolerant steps. They may be
    /// missing after a successful run.
    pub companions: Vec<String>,
}

impl Plan {
    /// Steps across all phases, in execution order.
    pub fn steps(&self) -> impl Iterator<Item = (&Phase, &Step)> {
        self.phases
            .iter()
            .flat_map(|phase| phase.steps.iter().map(move |step| (phase, step)))
    }

    /// Total number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.iter().map(|p| p.steps.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Titles of all phases, in order.
    #[must_use]
    pub fn phase_titles(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.title.as_str()).collect()
    }
}
