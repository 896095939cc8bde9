//! Step switching and report scrollspy behavior through the public API.

use agentic_credit::scrollspy::{active_index, Scrollspy};
use agentic_credit::workflow::{SectionHost, ViewSwitcher, WorkflowStep};
use agentic_credit::ui::WorkflowScreen;

fn assert_single_visible(screen: &WorkflowScreen, step: WorkflowStep) {
    assert_eq!(screen.visible_count(), 1);
    assert_eq!(screen.visible_step(), Some(step));

    let active = screen.active_links();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].step, step);
}

#[test]
fn test_every_step_can_be_shown() {
    let mut screen = WorkflowScreen::new();
    let mut switcher = ViewSwitcher::default();

    for step in WorkflowStep::all() {
        let shown = switcher.show_step(&mut screen, step.id());
        assert_eq!(shown, *step);
        assert_single_visible(&screen, *step);
    }
}

#[test]
fn test_showing_twice_equals_showing_once() {
    let mut once = WorkflowScreen::new();
    let mut twice = WorkflowScreen::new();
    let mut switcher = ViewSwitcher::default();

    switcher.show_step(&mut once, "results");
    switcher.show_step(&mut twice, "results");
    switcher.show_step(&mut twice, "results");

    assert_eq!(once.visible_step(), twice.visible_step());
    assert_eq!(
        once.active_links().iter().map(|l| l.id.clone()).collect::<Vec<_>>(),
        twice.active_links().iter().map(|l| l.id.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn test_unknown_id_shows_default_step() {
    let mut screen = WorkflowScreen::new();
    let mut switcher = ViewSwitcher::default();
    switcher.show_step(&mut screen, "build");

    let shown = switcher.show_step(&mut screen, "does-not-exist");

    assert_eq!(shown, WorkflowStep::Requirements);
    assert_single_visible(&screen, WorkflowStep::Requirements);
}

#[test]
fn test_partially_mounted_screen_falls_back() {
    let mut screen = WorkflowScreen::with_steps(&[WorkflowStep::Requirements, WorkflowStep::Build]);
    let mut switcher = ViewSwitcher::default();

    assert!(!screen.contains("results"));
    let shown = switcher.show_step(&mut screen, "results");

    assert_eq!(shown, WorkflowStep::Requirements);
    assert_single_visible(&screen, WorkflowStep::Requirements);
}

#[test]
fn test_scrollspy_pixel_layout() {
    let tops = [Some(0), Some(100), Some(250)];

    assert_eq!(active_index(&tops, 90, 60), Some(1));
    assert_eq!(active_index(&tops, 1000, 60), Some(2));
    assert_eq!(active_index(&[], 90, 60), None);
}

#[test]
fn test_scrollspy_tracks_scrolling() {
    let mut spy = Scrollspy::new(60, 0);
    spy.set_layout([
        ("executive-summary", Some(0)),
        ("business-profile", Some(100)),
        ("financial-analysis", Some(250)),
    ]);

    spy.on_scroll(0);
    assert_eq!(spy.active_id(), Some("executive-summary"));
    spy.on_scroll(190);
    assert_eq!(spy.active_id(), Some("financial-analysis"));

    assert_eq!(spy.activate_id("business-profile"), Some(100));
    assert_eq!(spy.active_id(), Some("business-profile"));
    assert_eq!(spy.activate_id("missing"), None);
    assert_eq!(spy.active_id(), Some("business-profile"));
}
