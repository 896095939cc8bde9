use super::{ViewAccessor, WorkflowStep};

/// Shows exactly one workflow step and keeps the navigation highlight in sync.
///
/// After [`ViewSwitcher::show_step`] returns, exactly one section is visible and
/// the only active nav links are those bound to it. Missing sections or links
/// are logged and skipped; the switcher never fails the caller.
#[derive(Debug, Clone)]
pub struct ViewSwitcher {
    current: Option<WorkflowStep>,
    default: WorkflowStep,
}

impl ViewSwitcher {
    pub fn new(default: WorkflowStep) -> Self {
        Self {
            current: None,
            default,
        }
    }

    /// Step shown by the last successful switch
    pub fn current(&self) -> Option<WorkflowStep> {
        self.current
    }

    pub fn default_step(&self) -> WorkflowStep {
        self.default
    }

    /// Show the default step
    pub fn initialize(&mut self, host: &mut dyn ViewAccessor) -> WorkflowStep {
        self.show(host, self.default)
    }

    /// Show the step named by `id`, falling back to the default step when the
    /// id is unknown or its section isn't mounted.
    pub fn show_step(&mut self, host: &mut dyn ViewAccessor, id: &str) -> WorkflowStep {
        let target = match WorkflowStep::from_id(id) {
            Some(step) if host.contains(step.id()) => step,
            Some(_) => {
                tracing::warn!(step = id, "Step not mounted, falling back to default");
                self.default
            }
            None => {
                tracing::warn!(step = id, "Unknown step, falling back to default");
                self.default
            }
        };
        self.show(host, target)
    }

    /// Show `step` directly
    pub fn show(&mut self, host: &mut dyn ViewAccessor, step: WorkflowStep) -> WorkflowStep {
        tracing::info!(step = step.id(), "Showing workflow step");

        for id in host.section_ids() {
            if let Err(e) = host.set_visible(&id, false) {
                tracing::error!(section = %id, error = %e, "Failed to hide section");
            }
        }
        if let Err(e) = host.set_visible(step.id(), true) {
            tracing::error!(step = step.id(), error = %e, "Target section missing");
        }

        for link in host.nav_links() {
            let active = link.step == step;
            if let Err(e) = host.set_active(&link.id, active) {
                tracing::error!(link = %link.id, error = %e, "Failed to update nav link");
            }
        }

        self.current = Some(step);
        step
    }
}

impl Default for ViewSwitcher {
    fn default() -> Self {
        Self::new(WorkflowStep::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{NavHost, NavLink, SectionHost, ViewError};
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct FakeHost {
        sections: BTreeMap<String, bool>,
        links: Vec<(NavLink, bool)>,
    }

    impl FakeHost {
        fn with_steps(steps: &[WorkflowStep]) -> Self {
            let mut host = FakeHost::default();
            for step in steps {
                host.sections.insert(step.id().to_string(), false);
                host.links.push((NavLink::for_step(*step), false));
            }
            host
        }

        fn visible(&self) -> Vec<String> {
            self.sections
                .iter()
                .filter(|(_, v)| **v)
                .map(|(k, _)| k.clone())
                .collect()
        }

        fn active(&self) -> Vec<String> {
            self.links
                .iter()
                .filter(|(_, a)| *a)
                .map(|(l, _)| l.id.clone())
                .collect()
        }
    }

    impl SectionHost for FakeHost {
        fn section_ids(&self) -> Vec<String> {
            self.sections.keys().cloned().collect()
        }

        fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), ViewError> {
            match self.sections.get_mut(id) {
                Some(v) => {
                    *v = visible;
                    Ok(())
                }
                None => Err(ViewError::SectionNotFound(id.to_string())),
            }
        }
    }

    impl NavHost for FakeHost {
        fn nav_links(&self) -> Vec<NavLink> {
            self.links.iter().map(|(l, _)| l.clone()).collect()
        }

        fn set_active(&mut self, link_id: &str, active: bool) -> Result<(), ViewError> {
            match self.links.iter_mut().find(|(l, _)| l.id == link_id) {
                Some((_, a)) => {
                    *a = active;
                    Ok(())
                }
                None => Err(ViewError::LinkNotFound(link_id.to_string())),
            }
        }
    }

    #[test]
    fn test_show_step_makes_one_section_visible() {
        let mut host = FakeHost::with_steps(WorkflowStep::all());
        let mut switcher = ViewSwitcher::default();

        let shown = switcher.show_step(&mut host, "generate");

        assert_eq!(shown, WorkflowStep::Generate);
        assert_eq!(host.visible(), vec!["generate"]);
        assert_eq!(host.active(), vec!["nav-generate"]);
        assert_eq!(switcher.current(), Some(WorkflowStep::Generate));
    }

    #[test]
    fn test_unknown_step_falls_back_to_default() {
        let mut host = FakeHost::with_steps(WorkflowStep::all());
        let mut switcher = ViewSwitcher::default();
        switcher.show_step(&mut host, "build");

        let shown = switcher.show_step(&mut host, "step9");

        assert_eq!(shown, WorkflowStep::Requirements);
        assert_eq!(host.visible(), vec!["requirements"]);
        assert_eq!(host.active(), vec!["nav-requirements"]);
    }

    #[test]
    fn test_unmounted_step_falls_back_to_default() {
        let mut host =
            FakeHost::with_steps(&[WorkflowStep::Requirements, WorkflowStep::Build]);
        let mut switcher = ViewSwitcher::default();

        assert_eq!(
            switcher.show_step(&mut host, "results"),
            WorkflowStep::Requirements
        );
    }

    #[test]
    fn test_repeated_switches_keep_single_visible_section() {
        let mut host = FakeHost::with_steps(WorkflowStep::all());
        let mut switcher = ViewSwitcher::default();

        for id in ["build", "results", "requirements", "generate", "build"] {
            switcher.show_step(&mut host, id);
            assert_eq!(host.visible(), vec![id]);
            assert_eq!(host.active(), vec![format!("nav-{id}")]);
        }
    }

    #[test]
    fn test_missing_nav_link_is_skipped() {
        let mut host = FakeHost::with_steps(WorkflowStep::all());
        host.links.retain(|(l, _)| l.step != WorkflowStep::Build);
        let mut switcher = ViewSwitcher::default();

        switcher.show_step(&mut host, "build");

        assert_eq!(host.visible(), vec!["build"]);
        assert!(host.active().is_empty());
    }

    #[test]
    fn test_initialize_shows_default() {
        let mut host = FakeHost::with_steps(WorkflowStep::all());
        let mut switcher = ViewSwitcher::new(WorkflowStep::Build);

        assert_eq!(switcher.initialize(&mut host), WorkflowStep::Build);
        assert_eq!(host.visible(), vec!["build"]);
    }
}
