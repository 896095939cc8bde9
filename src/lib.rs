//! Agentic Credit - a terminal demo of an AI agent that builds a credit
//! analysis system and then runs an assessment for a named company.
//!
//! The binary drives everything through [`app::App`]; the library exposes the
//! sequencer, view switching, scrollspy and report rendering for headless use
//! and tests.

pub mod app;
pub mod config;
pub mod logging;
pub mod report;
pub mod scrollspy;
pub mod sequencer;
pub mod session;
pub mod ui;
pub mod workflow;
