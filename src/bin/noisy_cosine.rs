use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use quietline::pcm::PcmWriter;
use quietline::simulation::{generate_noisy_cosine, ToneConfig};

#[derive(Parser, Debug)]
#[command(name = "noisy_cosine")]
#[command(about = "Generate a cosine tone with additive Gaussian noise as 16-bit PCM")]
struct Args {
    /// TOML tone configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Amplitude between 0 and 1 inclusive
    #[arg(short, long)]
    amplitude: Option<f32>,

    /// Tone frequency in Hz
    #[arg(short, long)]
    frequency: Option<f32>,

    /// Sample rate in samples/second
    #[arg(short = 'r', long)]
    sample_rate: Option<f32>,

    /// Duration in seconds
    #[arg(short = 't', long)]
    duration: Option<f32>,

    /// Variance of the noise source
    #[arg(short = 'v', long)]
    noise_variance: Option<f32>,

    /// Noise seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> Result<ToneConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ToneConfig::default(),
    };

    if let Some(amplitude) = args.amplitude {
        config.amplitude = amplitude.abs();
    }
    if let Some(frequency) = args.frequency {
        config.frequency_hz = frequency;
    }
    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }
    if let Some(variance) = args.noise_variance {
        config.noise_variance = variance;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    log::info!(
        "Generating {:.2}s of {} Hz tone at {} S/s, amplitude {}, noise variance {}",
        config.duration_secs,
        config.frequency_hz,
        config.sample_rate,
        config.amplitude,
        config.noise_variance
    );

    let signal = generate_noisy_cosine(&config);

    let samples: Vec<i16> = signal
        .noisy
        .iter()
        .map(|&sample| (sample * config.amplitude * 32767.0) as i16)
        .collect();

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut writer = PcmWriter::new(output);
    writer.write_block(&samples).context("writing PCM samples")?;
    writer.flush().context("flushing output")?;

    Ok(())
}
