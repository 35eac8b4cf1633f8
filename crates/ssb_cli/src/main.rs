//! Slideshow Builder - command-line entry point
//!
//! Collects the run form from arguments, loads configuration, and drives a
//! run on the background worker while showing progress on stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use ssb_core::config::{ConfigManager, ConfigSection, Settings};
use ssb_core::encoder::ToolPaths;
use ssb_core::logging::{init_tracing_with_file, GuiLogCallback, LogLevel};
use ssb_core::models::{RunForm, RunRequest};
use ssb_core::orchestrator::{spawn_run, ProgressCallback, SlideshowRunner};

mod report;

/// Build a slideshow video from numbered image/audio pairs.
///
/// The folder must contain `<n>.jpg` and `<n>.mp3` files. Each segment gets
/// a random zoom, pan or shake effect (or none), and the clips are joined
/// into `output_video.mp4` inside the folder.
#[derive(Parser, Debug)]
#[command(name = "slideshow-builder", version, about)]
struct Cli {
    /// Input folder (defaults to the last folder used)
    folder: Option<String>,

    /// Number of segments that get the zoom effect
    #[arg(long)]
    zoom: Option<String>,

    /// Number of segments that get the pan effect
    #[arg(long)]
    pan: Option<String>,

    /// Number of segments that get the shake effect
    #[arg(long)]
    shake: Option<String>,

    /// Seed for a reproducible effect assignment
    #[arg(long)]
    seed: Option<u64>,

    /// Config file path
    #[arg(long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Only discover segments and assign effects; render nothing
    #[arg(long)]
    plan_only: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Show debug output and encoder logs
    #[arg(short, long)]
    verbose: bool,
}

/// Default config path: .config/slideshow.toml (relative to current working directory)
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("slideshow.toml")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ConfigManager::new(&cli.config);
    if let Err(e) = config.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let _log_guard = init_tracing_with_file(level, &config.logs_folder());
    tracing::info!("Slideshow Builder starting");
    tracing::info!("Config: {}", cli.config.display());
    tracing::info!("Core version: {}", ssb_core::version());

    let form = build_form(&cli, config.settings());
    let request = match form.into_request() {
        Ok(request) => request,
        Err(e) => {
            report::form_error(&e);
            return Ok(ExitCode::from(2));
        }
    };

    let mut settings = config.settings().clone();
    if cli.verbose {
        settings.logging.level = LogLevel::Debug;
        settings.logging.compact = false;
    }

    let succeeded = if cli.plan_only {
        plan(settings, request.clone(), cli.json)?
    } else {
        render(settings, request.clone(), cli.json)?
    };

    if !succeeded {
        return Ok(ExitCode::from(1));
    }
    if remembers_folder(&cli) {
        remember_folder(&mut config, &request);
    }
    Ok(ExitCode::SUCCESS)
}

/// Only a rendered run updates the last input folder.
fn remembers_folder(cli: &Cli) -> bool {
    !cli.plan_only
}

/// Raw form fields from arguments, falling back to configured defaults.
fn build_form(cli: &Cli, settings: &Settings) -> RunForm {
    let effects = &settings.effects;
    RunForm {
        folder: cli
            .folder
            .clone()
            .unwrap_or_else(|| settings.paths.last_input_folder.clone()),
        zoom: cli
            .zoom
            .clone()
            .unwrap_or_else(|| effects.zoom_count.to_string()),
        pan: cli
            .pan
            .clone()
            .unwrap_or_else(|| effects.pan_count.to_string()),
        shake: cli
            .shake
            .clone()
            .unwrap_or_else(|| effects.shake_count.to_string()),
        seed: cli.seed,
    }
}

/// Returns false if the run failed; the error has already been reported.
fn plan(settings: Settings, request: RunRequest, json: bool) -> Result<bool> {
    // Planning never invokes the encoder, so the tools are not resolved.
    let tools = ToolPaths {
        ffmpeg: PathBuf::from("ffmpeg"),
        ffprobe: PathBuf::from("ffprobe"),
    };
    let runner = SlideshowRunner::from_tools(settings, &tools);

    match runner.plan(request, Some(log_callback(None, json))) {
        Ok(plan) => {
            report::print_plan(&plan, json)?;
            Ok(true)
        }
        Err(e) => {
            report::unlogged_failure(&e);
            Ok(false)
        }
    }
}

fn render(settings: Settings, request: RunRequest, json: bool) -> Result<bool> {
    let tools = ToolPaths::resolve(&settings.tools).context("checking external tools")?;
    tracing::info!(
        "Using ffmpeg at {}, ffprobe at {}",
        tools.ffmpeg.display(),
        tools.ffprobe.display()
    );

    let bar = progress_bar();
    let runner = Arc::new(SlideshowRunner::from_tools(settings, &tools));

    let progress_bar = bar.clone();
    let progress: ProgressCallback = Box::new(move |percent| {
        progress_bar.set_position(percent.round() as u64);
    });

    let handle = spawn_run(
        runner,
        request,
        Some(log_callback(Some(bar.clone()), json)),
        Some(progress),
    )?;
    tracing::info!("Run '{}' started", handle.run_name());
    let outcome = handle.wait();
    bar.finish_and_clear();

    match outcome {
        Ok(result) => {
            report::print_result(&result, json)?;
            Ok(true)
        }
        Err(e) => {
            report::unlogged_failure(&e);
            Ok(false)
        }
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let template = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}%";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// Log lines go to stdout, or stderr when stdout carries JSON. Printing
/// suspends the progress bar so lines are not drawn over it.
fn log_callback(bar: Option<ProgressBar>, json: bool) -> GuiLogCallback {
    Box::new(move |line: &str| {
        let print = || {
            if json {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        };
        match bar {
            Some(ref bar) => bar.suspend(print),
            None => print(),
        }
    })
}

fn remember_folder(config: &mut ConfigManager, request: &RunRequest) {
    let folder = fs::canonicalize(&request.input_dir)
        .unwrap_or_else(|_| request.input_dir.clone())
        .to_string_lossy()
        .to_string();
    if config.settings().paths.last_input_folder == folder {
        return;
    }
    config.settings_mut().paths.last_input_folder = folder;
    if let Err(e) = config.update_section(ConfigSection::Paths) {
        tracing::warn!("Failed to save last input folder: {}", e);
    }
}
