//! Persona - Personality Questionnaire CLI
//!
//! Loads the trained model and its preprocessing metadata once, then asks
//! the questionnaire (flags or interactive prompts) and prints the result.

mod api;
mod constants;
mod logic;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use api::prompt::{GivenAnswers, MissingAnswers};
use api::{commands, prompt, render};
use logic::config::AppConfig;
use logic::error::{PipelineError, PipelineResult};
use logic::pipeline::{InferencePipeline, UnknownClassPolicy};

#[derive(Parser)]
#[command(name = "persona")]
#[command(version)]
#[command(about = "Introvert/Extrovert personality test", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model artifact (.json forest or .onnx)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Preprocessing metadata (.json)
    #[arg(long, global = true)]
    metadata: Option<PathBuf>,

    /// What to report when the model returns a class with no label
    #[arg(long, global = true)]
    unknown_class: Option<UnknownClassPolicy>,

    /// Verbose output
    ///
    /// When specified, sets the log level to `debug` and ignores the `RUST_LOG`
    /// environment variable.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer the questionnaire and get a prediction
    Predict(PredictArgs),
    /// Show model, data and feature-importance details
    Info {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the questionnaire (controls, bounds, options) as JSON
    Questions,
}

#[derive(Args)]
struct PredictArgs {
    /// Me-time per week (hours)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=168))]
    time_alone: Option<u32>,

    /// Hangouts per month
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=30))]
    social_events: Option<u32>,

    /// Days going out per week
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=7))]
    going_outside: Option<u32>,

    /// Number of close friends
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    friends: Option<u32>,

    /// Social media posts per week
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    posts: Option<u32>,

    /// Nervous when speaking in public? (an option from the metadata, e.g. Yes/No)
    #[arg(long)]
    stage_fear: Option<String>,

    /// Drained after socializing? (an option from the metadata, e.g. Yes/No)
    #[arg(long)]
    drained: Option<String>,

    /// Use defaults for missing answers instead of prompting (each default is logged)
    #[arg(long, default_value_t = false)]
    no_prompt: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn build_config(cli: &Cli) -> PipelineResult<AppConfig> {
    let mut config = AppConfig::from_env();
    if let Some(path) = &cli.config {
        config = config.merge_file(path)?;
    }
    if let Some(path) = &cli.model {
        config.model_path = Some(path.clone());
    }
    if let Some(path) = &cli.metadata {
        config.metadata_path = Some(path.clone());
    }
    if let Some(policy) = cli.unknown_class {
        config.unknown_class_policy = policy;
    }
    config.validate()?;
    Ok(config)
}

impl PredictArgs {
    fn given(&self) -> GivenAnswers {
        GivenAnswers {
            time_alone: self.time_alone,
            social_events: self.social_events,
            going_outside: self.going_outside,
            friends: self.friends,
            posts: self.posts,
            stage_fear: self.stage_fear.clone(),
            drained: self.drained.clone(),
        }
    }

    fn missing(&self) -> MissingAnswers {
        if self.no_prompt {
            MissingAnswers::UseDefaults
        } else {
            MissingAnswers::Prompt
        }
    }
}

/// Broken setup exits 2, a failed request exits 1
fn exit_code(err: &PipelineError) -> ExitCode {
    if err.is_fatal() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    };

    if config.uses_default_reference() {
        log::warn!("Using built-in reference averages; they are not validated against population data");
    }

    let model_path = config.resolved_model_path();
    let metadata_path = config.resolved_metadata_path();

    let pipeline = match InferencePipeline::load(&model_path, &metadata_path, config.pipeline_options()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!(
                "Error: {}\nMake sure '{}' and '{}' exist (or set PERSONA_MODEL_PATH / PERSONA_METADATA_PATH).",
                e,
                model_path.display(),
                metadata_path.display()
            );
            return exit_code(&e);
        }
    };

    match &cli.command {
        Command::Info { json } => {
            let info = commands::get_model_info(&pipeline, &config);
            if *json {
                return print_json(&info);
            }
            print!("{}", render::render_model_info(&info));
            ExitCode::SUCCESS
        }
        Command::Questions => print_json(&commands::get_questionnaire(&pipeline)),
        Command::Predict(args) => {
            // Prompts go to stderr so `--json` output stays clean
            let answers = match prompt::collect_answers(
                &args.given(),
                pipeline.tables(),
                args.missing(),
                &mut io::stdin().lock(),
                &mut io::stderr(),
            ) {
                Ok(answers) => answers,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return exit_code(&e);
                }
            };

            match commands::run_prediction(&pipeline, &config, answers) {
                Ok(response) if args.json => print_json(&response),
                Ok(response) => {
                    print!("{}", render::render_prediction(&response));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
