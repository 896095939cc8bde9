use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use agentic_credit::app::App;
use agentic_credit::config::Config;
use agentic_credit::logging;
use agentic_credit::report::{renderer_for, ChartRegistry};
use agentic_credit::sequencer::scripts::{assessment_steps, build_steps};
use agentic_credit::sequencer::{StdoutSink, StepSequencer};
use agentic_credit::ui::terminal_guard::install_panic_hook;

#[derive(Parser)]
#[command(name = "agentic-credit")]
#[command(about = "Terminal demo of an agent-built credit assessment")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Prefill the company name on the Generate step
    #[arg(long)]
    company: Option<String>,

    /// Render the report from this markdown analysis instead of the built-in template
    #[arg(long)]
    analysis: Option<PathBuf>,

    /// Skip the title slide
    #[arg(long)]
    no_title: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a step script to stdout without the TUI
    Play {
        script: Script,

        /// Company to assess
        #[arg(long, default_value = "Acme Corp")]
        company: String,

        /// No jitter and no typing effect
        #[arg(long)]
        fast: bool,
    },

    /// Print the credit report as plain text
    Report {
        #[arg(long)]
        company: String,

        /// Markdown analysis file to render
        #[arg(long)]
        analysis: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write it to .agentic-credit/config.toml
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Script {
    Build,
    Assess,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.analysis {
        config.report.analysis_path = Some(path.clone());
    }
    if cli.no_title {
        config.ui.show_title_slide = false;
    }

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Play {
            script,
            company,
            fast,
        }) => {
            cmd_play(&config, script, &company, fast).await?;
        }
        Some(Commands::Report { company, analysis }) => {
            cmd_report(config, &company, analysis).await?;
        }
        Some(Commands::Config { init }) => {
            cmd_config(&config, init)?;
        }
        None => {
            run_tui(config, cli.company.as_deref(), &logging_handle).await?;
        }
    }

    Ok(())
}

async fn run_tui(
    config: Config,
    company: Option<&str>,
    logging_handle: &logging::LoggingHandle,
) -> Result<()> {
    install_panic_hook();

    let mut app = App::new(config);
    if let Some(company) = company {
        app.prefill_company(company);
    }
    let result = app.run().await;

    if let Some(log_path) = logging_handle.non_empty_log_file() {
        eprintln!("Session log: {}", log_path.display());
    }

    result
}

async fn cmd_play(config: &Config, script: Script, company: &str, fast: bool) -> Result<()> {
    let seq_config = if fast {
        config.sequencer.fast()
    } else {
        config.sequencer.clone()
    };

    let (steps, typing_ms) = match script {
        Script::Build => (build_steps(), seq_config.build_typing_ms),
        Script::Assess => {
            if company.trim().is_empty() {
                bail!("Please enter a company name");
            }
            (assessment_steps(company.trim()), seq_config.assessment_typing_ms)
        }
    };

    let sequencer = StepSequencer::from_config(&seq_config, typing_ms);
    let sink = StdoutSink::new();
    let report = sequencer.run(&steps, Some(&sink), |_| {}).await;
    sink.finish()?;

    println!();
    println!(
        "{} steps in {:.1}s",
        report.steps_run,
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

async fn cmd_report(mut config: Config, company: &str, analysis: Option<PathBuf>) -> Result<()> {
    if let Some(path) = analysis {
        config.report.analysis_path = Some(path);
    }

    let renderer = renderer_for(&config);
    let mut doc = renderer
        .render(company)
        .await
        .with_context(|| format!("Failed to render report for {}", company))?;
    ChartRegistry::default().initialize(&mut doc);

    print!("{}", doc.to_plain_text());
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> Result<()> {
    if init {
        let path = config.save()?;
        println!("Wrote {}", path.display());
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
