//! Workflow steps and the host interfaces the view switcher drives.

mod switcher;

pub use switcher::ViewSwitcher;

use thiserror::Error;

/// Example requirements offered on the Requirements step
pub const EXAMPLE_REQUIREMENTS: &str = include_str!("../../templates/example_requirements.md");

/// One named stage of the demo flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowStep {
    #[default]
    Requirements,
    Build,
    Generate,
    Results,
}

impl WorkflowStep {
    /// All steps in flow order
    pub fn all() -> &'static [WorkflowStep] {
        &[
            WorkflowStep::Requirements,
            WorkflowStep::Build,
            WorkflowStep::Generate,
            WorkflowStep::Results,
        ]
    }

    /// Stable identifier used by hosts and navigation
    pub fn id(&self) -> &'static str {
        match self {
            WorkflowStep::Requirements => "requirements",
            WorkflowStep::Build => "build",
            WorkflowStep::Generate => "generate",
            WorkflowStep::Results => "results",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|step| step.id() == id)
    }

    /// Label shown in the workflow sidebar
    pub fn nav_label(&self) -> &'static str {
        match self {
            WorkflowStep::Requirements => "Define Requirements",
            WorkflowStep::Build => "Build Solution",
            WorkflowStep::Generate => "Generate Assessment",
            WorkflowStep::Results => "View Results",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStep::Requirements => "Step 1: Define Your Requirements",
            WorkflowStep::Build => "Step 2: Build the Agentic Solution",
            WorkflowStep::Generate => "Step 3: Generate Credit Assessment",
            WorkflowStep::Results => "Credit Assessment Report",
        }
    }

    /// Following step, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|s| s == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }

    /// Preceding step, wrapping around
    pub fn previous(&self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|s| s == self).unwrap_or(0);
        all[(i + all.len() - 1) % all.len()]
    }
}

/// A navigation control bound to a workflow step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub id: String,
    pub step: WorkflowStep,
}

impl NavLink {
    /// The conventional link for a step, `nav-<step id>`
    pub fn for_step(step: WorkflowStep) -> Self {
        Self {
            id: format!("nav-{}", step.id()),
            step,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("section '{0}' not found")]
    SectionNotFound(String),

    #[error("navigation link '{0}' not found")]
    LinkNotFound(String),
}

/// Named content containers that can be shown or hidden
pub trait SectionHost {
    /// Ids of every mounted section, in display order
    fn section_ids(&self) -> Vec<String>;

    fn contains(&self, id: &str) -> bool {
        self.section_ids().iter().any(|s| s == id)
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), ViewError>;
}

/// Navigation entries with an "active" highlight
pub trait NavHost {
    fn nav_links(&self) -> Vec<NavLink>;

    fn set_active(&mut self, link_id: &str, active: bool) -> Result<(), ViewError>;
}

/// Everything the view switcher needs from the presentation layer
pub trait ViewAccessor: SectionHost + NavHost {}

impl<T: SectionHost + NavHost> ViewAccessor for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_id() {
        for step in WorkflowStep::all() {
            assert_eq!(WorkflowStep::from_id(step.id()), Some(*step));
        }
        assert_eq!(WorkflowStep::from_id("step9"), None);
    }

    #[test]
    fn test_default_step_is_requirements() {
        assert_eq!(WorkflowStep::default(), WorkflowStep::Requirements);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(WorkflowStep::Results.next(), WorkflowStep::Requirements);
        assert_eq!(WorkflowStep::Requirements.previous(), WorkflowStep::Results);
        assert_eq!(WorkflowStep::Build.next(), WorkflowStep::Generate);
    }

    #[test]
    fn test_nav_link_for_step() {
        let link = NavLink::for_step(WorkflowStep::Build);
        assert_eq!(link.id, "nav-build");
        assert_eq!(link.step, WorkflowStep::Build);
    }

    #[test]
    fn test_example_requirements_loaded() {
        assert!(EXAMPLE_REQUIREMENTS.contains("REQUIREMENTS:"));
    }
}
