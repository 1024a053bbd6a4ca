use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use quietline::config::CancellerConfig;
use quietline::pcm::FloatWriter;
use quietline::signal_processing::{MovingAverage, NlmsCanceller};
use quietline::simulation::{
    generate_noisy_cosine, run_filter, snr_improvement_db, CancellationReport, TestSignal,
    ToneConfig,
};
use quietline::wav::save_wav;

#[derive(Parser, Debug)]
#[command(name = "cancellation_analysis")]
#[command(about = "Run the NLMS canceller against a synthetic noisy cosine and dump the streams")]
struct Args {
    /// Number of adaptive filter taps
    #[arg(short = 'f', long, default_value_t = 5)]
    filter_length: usize,

    /// Reference delay in samples
    #[arg(short = 'd', long, default_value_t = 5)]
    delay: usize,

    /// NLMS step size (beta)
    #[arg(short = 'b', long, default_value_t = 0.1)]
    beta: f32,

    /// Tone frequency in Hz
    #[arg(long, default_value_t = 200.0)]
    frequency: f32,

    /// Sample rate in samples/second
    #[arg(long, default_value_t = 24000.0)]
    sample_rate: f32,

    /// Signal duration in seconds
    #[arg(long, default_value_t = 1.0)]
    duration: f32,

    /// Variance of the noise source
    #[arg(long, default_value_t = 0.1)]
    noise_variance: f32,

    /// Noise seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for the dumped streams
    #[arg(short, long, default_value = "data/cancellation")]
    output_dir: PathBuf,

    /// Also write 16-bit mono WAV listening copies
    #[arg(long)]
    wav: bool,

    /// Write manifest.json describing the run
    #[arg(long)]
    manifest: bool,

    /// Sweep beta and print a CSV of SNR improvement instead of dumping
    #[arg(long)]
    sweep_beta: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct Manifest {
    generated_at: String,
    filter_length: usize,
    reference_delay: usize,
    step_size: f32,
    frequency_hz: f32,
    sample_rate: f32,
    duration_secs: f32,
    noise_variance: f32,
    seed: Option<u64>,
    files: Vec<String>,
}

fn tone_config(args: &Args) -> ToneConfig {
    ToneConfig {
        frequency_hz: args.frequency,
        sample_rate: args.sample_rate,
        duration_secs: args.duration,
        noise_variance: args.noise_variance,
        seed: args.seed,
        ..Default::default()
    }
}

fn run_canceller(args: &Args, signal: &TestSignal, beta: f32) -> Result<Vec<f32>> {
    let config = CancellerConfig {
        filter_length: args.filter_length,
        reference_delay: args.delay,
        step_size: beta,
    };
    let mut canceller = NlmsCanceller::from_config(&config)?;
    Ok(run_filter(&mut canceller, &signal.noisy))
}

fn report(args: &Args, signal: &TestSignal, processed: &[f32]) -> CancellationReport {
    // Judge the steady state: skip the first quarter of the stream.
    let settle = signal.clean.len() / 4;
    snr_improvement_db(&signal.clean, &signal.noisy, processed, args.delay, settle)
}

/// First sample index after which the smoothed squared prediction error
/// stays below one tenth of the clean signal power.
fn convergence_index(clean: &[f32], processed: &[f32], delay: usize) -> Option<usize> {
    let power = quietline::simulation::signal_power(clean);
    let threshold = 0.1 * power;

    let mut smoother = MovingAverage::new(128);
    let smoothed: Vec<f32> = (delay..processed.len())
        .map(|i| {
            let error = processed[i] - clean[i - delay];
            smoother.add(error * error)
        })
        .collect();

    let last_bad = smoothed.iter().rposition(|&e| e > threshold);
    match last_bad {
        Some(i) if i + 1 >= smoothed.len() => None,
        Some(i) => Some(delay + i + 1),
        None => Some(delay),
    }
}

fn dump_stream(dir: &Path, name: &str, samples: &[f32]) -> Result<()> {
    let path = dir.join(name);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = FloatWriter::new(BufWriter::new(file));
    writer.write_samples(samples)?;
    writer.flush()?;
    Ok(())
}

fn dump_wav(dir: &Path, name: &str, samples: &[f32], sample_rate: u32) -> Result<()> {
    let path = dir.join(name);
    let scaled: Vec<i16> = samples
        .iter()
        .map(|&s| (s * 0.5 * 32767.0) as i16)
        .collect();
    save_wav(&path, &scaled, sample_rate).with_context(|| format!("writing {}", path.display()))
}

fn run_sweep(args: &Args, signal: &TestSignal) -> Result<()> {
    println!("beta,input_snr_db,output_snr_db,improvement_db");
    for step in 1..=40 {
        let beta = step as f32 * 0.05;
        let processed = run_canceller(args, signal, beta)?;
        let r = report(args, signal, &processed);
        println!(
            "{:.2},{:.2},{:.2},{:.2}",
            beta, r.input_snr_db, r.output_snr_db, r.improvement_db
        );
    }
    Ok(())
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

    let signal = generate_noisy_cosine(&tone_config(&args));

    if args.sweep_beta {
        return run_sweep(&args, &signal);
    }

    let processed = run_canceller(&args, &signal, args.beta)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let dir = &args.output_dir;
    dump_stream(dir, "clean.dat", &signal.clean)?;
    dump_stream(dir, "noise.dat", &signal.noise)?;
    dump_stream(dir, "noisy.dat", &signal.noisy)?;
    dump_stream(dir, "processed.dat", &processed)?;

    let mut files = vec![
        "clean.dat".to_string(),
        "noise.dat".to_string(),
        "noisy.dat".to_string(),
        "processed.dat".to_string(),
    ];

    if args.wav {
        let sample_rate = args.sample_rate as u32;
        dump_wav(dir, "noisy.wav", &signal.noisy, sample_rate)?;
        dump_wav(dir, "processed.wav", &processed, sample_rate)?;
        files.push("noisy.wav".to_string());
        files.push("processed.wav".to_string());
    }

    if args.manifest {
        let manifest = Manifest {
            generated_at: chrono::Utc::now().to_rfc3339(),
            filter_length: args.filter_length,
            reference_delay: args.delay,
            step_size: args.beta,
            frequency_hz: args.frequency,
            sample_rate: args.sample_rate,
            duration_secs: args.duration,
            noise_variance: args.noise_variance,
            seed: args.seed,
            files: files.clone(),
        };
        let path = dir.join("manifest.json");
        fs::write(&path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let r = report(&args, &signal, &processed);
    println!("Input SNR:   {:>7.2} dB", r.input_snr_db);
    println!("Output SNR:  {:>7.2} dB", r.output_snr_db);
    println!("Improvement: {:>7.2} dB", r.improvement_db);
    match convergence_index(&signal.clean, &processed, args.delay) {
        Some(index) => println!(
            "Converged after ~{} samples ({:.1} ms)",
            index,
            index as f32 / args.sample_rate * 1000.0
        ),
        None => println!("Did not converge within the run"),
    }

    log::info!("Streams written to {}", dir.display());

    Ok(())
}
