use hound::{WavSpec, WavWriter};
use std::path::Path;

/// Save mono 16-bit samples as a WAV file (listening copy of a PCM stream).
pub fn save_wav<P: AsRef<Path>>(
    filename: P,
    samples: &[i16],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(filename, spec)?;

    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}
