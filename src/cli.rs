//! CLI argument parsing with clap.

use clap::Parser;

/// Sample noise inputs for a generative model.
#[derive(Parser, Debug)]
#[command(name = "genmodel", version, about)]
pub struct Cli {
    /// Noise type registry key (e.g., normal, unit, `uniform_0_1`).
    #[arg(short = 't', long)]
    pub z_type: Option<String>,

    /// Noise vector size per sample.
    #[arg(short = 'z', long)]
    pub z_size: Option<usize>,

    /// Number of label classes (0 for unconditional models).
    #[arg(short = 'c', long)]
    pub num_classes: Option<usize>,

    /// Number of samples to draw.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Samples drawn per batch.
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Seed for reproducible sampling (entropy-seeded if omitted).
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output file path; `.json` writes JSON, anything else YAML
    /// (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format when no output path is given: yaml, json.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also write a grayscale PNG preview of the noise to this path.
    #[arg(long)]
    pub preview: Option<String>,

    /// List registered noise types and exit.
    #[arg(short, long)]
    pub list: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
