//! Genmodel - sample noise inputs for generative models.

mod cli;

use std::path::Path;
use std::process;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use genmodel::adapters::{passthrough, ModuleWrapper};
use genmodel::config::{self, Config};
use genmodel::error::GenError;
use genmodel::output::{resolve_output_path, save_preview, save_record, RecordFormat, SampleRecord};
use genmodel::{collect_samples, logging, registered_noise_sources, GenerativeModel};

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GenError> {
    if cli.list {
        for name in registered_noise_sources() {
            println!("{name}");
        }
        return Ok(());
    }

    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GenError::Config)?;
    debug!(path = %config_path.display(), "loaded config");

    // Describe the model
    let z_type = cli.z_type.clone().unwrap_or_else(|| config.model.z_type.clone());
    let z_size = cli.z_size.unwrap_or(config.model.z_size);
    let num_classes = cli.num_classes.unwrap_or(config.model.num_classes);
    let model = ModuleWrapper::new(passthrough, z_size, z_type, num_classes)?;

    let count = cli.count.unwrap_or(config.defaults.count);
    let batch_size = cli.batch_size.unwrap_or(config.defaults.batch_size);

    // Resolve the output location before drawing anything
    let format = resolve_format(cli.format.as_deref(), cli.output.as_deref(), &config)?;
    let output_path = resolve_output_path(cli.output.as_deref(), model.z_type(), z_size, format);

    let seed = match cli.seed {
        Some(seed) => Some(seed),
        None => config.seed().map_err(GenError::Config)?,
    };
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    if cli.verbose {
        eprintln!("Model: z_type={}, z_size={z_size}, num_classes={num_classes}", model.z_type());
        match seed {
            Some(seed) => eprintln!("Seed: {seed}"),
            None => eprintln!("Seed: none (non-reproducible)"),
        }
    }

    // Sample
    let batch = collect_samples(&model, count, batch_size, &mut rng)?;
    info!(count, batch_size, "sampled noise");

    let record = SampleRecord::from_batch(
        format!("{}-{z_size}", model.z_type()),
        model.z_type(),
        num_classes,
        seed,
        &batch,
    );
    save_record(&record, &output_path, format)?;
    eprintln!("Saved: {}", output_path.display());

    if let Some(ref preview) = cli.preview {
        let preview_path = Path::new(preview);
        save_preview(&batch.z, preview_path)?;
        eprintln!("Preview: {}", preview_path.display());
    }

    Ok(())
}

/// Pick the record format from `--format`, the output extension, or config.
///
/// An explicit `--format` must agree with a recognised output extension.
fn resolve_format(
    flag: Option<&str>,
    output: Option<&str>,
    config: &Config,
) -> Result<RecordFormat, GenError> {
    let from_output = output.and_then(|p| RecordFormat::from_extension(Path::new(p)));
    match (flag, from_output) {
        (Some(name), implied) => {
            let format = RecordFormat::parse(name).map_err(GenError::InvalidArgument)?;
            match implied {
                Some(implied) if implied != format => Err(GenError::InvalidArgument(format!(
                    "--format {name} conflicts with output path '{}'",
                    output.unwrap_or_default()
                ))),
                _ => Ok(format),
            }
        }
        (None, Some(implied)) => Ok(implied),
        (None, None) => match output {
            Some(_) => Ok(RecordFormat::Yaml),
            None => {
                RecordFormat::parse(&config.defaults.format).map_err(GenError::InvalidArgument)
            }
        },
    }
}

