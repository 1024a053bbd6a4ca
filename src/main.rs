use anyhow::{Context, Result};
use clap::Parser;
use rolling_stats::Stats;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use quietline::config::{CancellerConfig, StreamConfig};
use quietline::pcm::{PcmReader, PcmWriter};
use quietline::signal_processing::{DcRemover, Filter, NlmsCanceller};
use quietline::wav::save_wav;

#[derive(Parser, Debug)]
#[command(name = "quietline")]
#[command(about = "Adaptive NLMS noise canceller for raw 16-bit PCM streams", long_about = None)]
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

    /// Samples per input block
    #[arg(long, default_value_t = 4000)]
    block_size: usize,

    /// Input file (raw 16-bit little-endian PCM; stdin if omitted)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file (same format; stdout if omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Remove DC offset from the input before cancelling
    #[arg(long)]
    remove_dc: bool,

    /// Additionally save the processed stream as a mono 16-bit WAV file
    #[arg(long)]
    wav_out: Option<PathBuf>,

    /// Sample rate stamped into the WAV header (raw PCM carries none)
    #[arg(long, default_value_t = 24000)]
    sample_rate: u32,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
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

    let canceller_config = CancellerConfig {
        filter_length: args.filter_length,
        reference_delay: args.delay,
        step_size: args.beta,
    };
    let stream_config = StreamConfig {
        block_size: args.block_size,
    };
    stream_config.validate()?;

    let mut canceller = NlmsCanceller::from_config(&canceller_config)?;
    let mut dc_remover = args.remove_dc.then(|| DcRemover::new(0.0001));

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(std::io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut reader = PcmReader::with_block_size(input, stream_config.block_size);
    let mut writer = PcmWriter::new(output);

    let mut input_stats: Stats<f32> = Stats::new();
    let mut output_stats: Stats<f32> = Stats::new();
    let mut wav_samples: Vec<i16> = Vec::new();

    while let Some(mut block) = reader.next_block().context("reading input stream")? {
        for &sample in &block {
            input_stats.update(sample as f32);
        }

        match dc_remover.as_mut() {
            Some(dc) => {
                // The DC estimate lives in the float domain, so run the
                // whole block there and cast back once.
                let mut samples: Vec<f32> = block.iter().map(|&s| s as f32).collect();
                dc.process_buffer(&mut samples);
                canceller.process_buffer(&mut samples);
                for (out, &value) in block.iter_mut().zip(samples.iter()) {
                    *out = value as i16;
                }
            }
            None => canceller.process_buffer_i16(&mut block),
        }

        for &sample in &block {
            output_stats.update(sample as f32);
        }
        if args.wav_out.is_some() {
            wav_samples.extend_from_slice(&block);
        }

        writer.write_block(&block).context("writing output stream")?;
    }
    writer.flush().context("flushing output stream")?;

    if let Some(path) = &args.wav_out {
        save_wav(path, &wav_samples, args.sample_rate)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved processed stream to {}", path.display());
    }

    log::info!(
        "Processed {} samples: input mean {:.1} std {:.1}, output mean {:.1} std {:.1}",
        input_stats.count,
        input_stats.mean,
        input_stats.std_dev,
        output_stats.mean,
        output_stats.std_dev
    );

    Ok(())
}
