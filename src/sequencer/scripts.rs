//! Canned step scripts played by the demo.

use super::Step;

/// Status lines shown while the agent "builds" the analysis system
pub fn build_steps() -> Vec<Step> {
    vec![
        Step::new("Initializing agentic credit analysis system...", 500),
        Step::new(
            "Loading financial data models and credit assessment frameworks...",
            1200,
        ),
        Step::new("Setting up industry benchmarking capabilities...", 1500),
        Step::new("Integrating financial ratio analysis modules...", 1800),
        Step::new("Configuring debt structure evaluation components...", 1600),
        Step::new("Building credit rating determination algorithm...", 2000),
        Step::new(
            "Setting up scenario analysis and stress testing framework...",
            1900,
        ),
        Step::new("Finalizing report generation capabilities...", 1700),
        Step::new(
            "Build complete! The agentic credit analysis system is ready.",
            1000,
        )
        .complete(),
    ]
}

/// Status lines shown while the assessment for `company` is "generated"
pub fn assessment_steps(company: &str) -> Vec<Step> {
    vec![
        Step::new(
            format!("Initializing credit assessment model for {company}..."),
            1200,
        ),
        Step::new("Loading financial data and market benchmarks...", 1500),
        Step::new("Analyzing revenue streams and growth trajectory...", 1800),
        Step::new("Evaluating debt structure and covenant compliance...", 1600),
        Step::new("Calculating key credit metrics and ratios...", 1700),
        Step::new("Performing industry peer comparison...", 1900),
        Step::new("Analyzing liquidity position and refinancing risk...", 2000),
        Step::new("Generating executive summary and credit conclusion...", 2200),
        Step::new(
            format!("Assessment complete! Rendering comprehensive credit report for {company}..."),
            2500,
        ),
    ]
}

/// Closing lines played after the assessment script, before the report mounts
pub fn rendering_steps(render_pause_ms: u64) -> Vec<Step> {
    vec![
        Step::new("Formatting and rendering report...", render_pause_ms),
        Step::new("Report completed! Displaying results...", 1500).complete(),
    ]
}

/// Description shown on the Generate step once the build has finished
pub const BUILD_COMPLETE_DESCRIPTION: &str = "Build completed successfully! I have built the \
application as specified in your requirements. Please enter a company name below to generate \
a comprehensive credit assessment report.";

/// Description shown on the Generate step before any build
pub const GENERATE_DESCRIPTION: &str =
    "Enter a company name to generate a comprehensive credit assessment report.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::StepKind;

    #[test]
    fn test_build_script_ends_with_complete_line() {
        let steps = build_steps();
        assert_eq!(steps.len(), 9);
        assert_eq!(steps.last().unwrap().kind, StepKind::Complete);
        assert!(steps[..8].iter().all(|s| s.kind == StepKind::Progress));
    }

    #[test]
    fn test_assessment_script_names_company() {
        let steps = assessment_steps("Acme Corp");
        assert_eq!(steps.len(), 9);
        assert!(steps[0].message.contains("Acme Corp"));
        assert!(steps[8].message.ends_with("report for Acme Corp..."));
    }

    #[test]
    fn test_rendering_steps_use_configured_pause() {
        let steps = rendering_steps(750);
        assert_eq!(steps[0].delay_ms, 750);
        assert_eq!(steps[1].kind, StepKind::Complete);
    }
}
