use clap::{Parser, Subcommand};
use experiment_admission::admission::{self, AdmissionReview};
use experiment_admission::spec::Experiment;
use experiment_admission::{AdmissionConfig, ExperimentValidator, Result, TemplateGenerator};

use anyhow::Context;
use log::debug;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "experiment-admission")]
#[command(about = "Admission checks for hyperparameter-tuning Experiments", long_about = None)]
struct Cli {
    /// Admission configuration (YAML, or JSON by extension). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an Experiment file, optionally as an update of a prior version.
    Validate {
        #[arg(long)]
        experiment: String,

        #[arg(long)]
        prior: Option<String>,
    },

    /// Answer an AdmissionReview read from a file or stdin.
    Review {
        #[arg(long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 1) Configuration + generator.
    let config = match &cli.config {
        Some(path) => AdmissionConfig::load(path)?,
        None => AdmissionConfig::default(),
    };
    debug!(
        "{} suggestion algorithms, {} trial templates configured",
        config.suggestions.len(),
        config.trial_templates.len()
    );
    let generator = TemplateGenerator::new(&config)?;
    let validator = ExperimentValidator::new(Arc::new(generator), config.validator_config());

    match cli.cmd {
        Commands::Validate { experiment, prior } => {
            // 2) Load experiment(s).
            let proposed = read_experiment(&experiment)?;
            let prior = prior.as_deref().map(read_experiment).transpose()?;

            // 3) Decide.
            let decision = admission::decide(&validator, &proposed, prior.as_ref());
            if !decision.allowed {
                println!("denied: {}", decision.message);
                std::process::exit(1);
            }
            println!("allowed");
        }
        Commands::Review { input } => {
            let text = match &input {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("read admission review {}", path))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("read admission review from stdin")?;
                    buf
                }
            };
            let request: AdmissionReview =
                serde_json::from_str(&text).context("parse admission review")?;
            let response = admission::review(&validator, request);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Read an Experiment from a `.json` file, or YAML for any other extension.
fn read_experiment(path: &str) -> Result<Experiment> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read experiment {}", path))?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let exp = if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse experiment {}", path))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parse experiment {}", path))?
    };
    Ok(exp)
}
