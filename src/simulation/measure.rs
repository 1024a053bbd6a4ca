use crate::signal_processing::Filter;

/// Mean squared sample value.
pub fn signal_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32
}

/// SNR of `degraded` against `clean`, in dB, over their common length.
pub fn snr_db(clean: &[f32], degraded: &[f32]) -> f32 {
    let n = clean.len().min(degraded.len());
    let residual: Vec<f32> = clean[..n]
        .iter()
        .zip(degraded[..n].iter())
        .map(|(&c, &d)| d - c)
        .collect();

    let signal = signal_power(&clean[..n]);
    let noise = signal_power(&residual);
    10.0 * (signal / noise.max(f32::MIN_POSITIVE)).log10()
}

/// SNR accounting for one canceller run.
#[derive(Debug, Clone, Copy)]
pub struct CancellationReport {
    pub input_snr_db: f32,
    pub output_snr_db: f32,
    pub improvement_db: f32,
}

/// Measure how much a canceller run improved the signal.
///
/// The canceller estimates the reference d(n) = x(n - D), so its output is
/// compared against the clean signal shifted by `delay`; the first `settle`
/// samples are excluded so the adaptation transient does not dominate.
pub fn snr_improvement_db(
    clean: &[f32],
    noisy: &[f32],
    processed: &[f32],
    delay: usize,
    settle: usize,
) -> CancellationReport {
    let start = settle.max(delay);

    let input_snr_db = snr_db(&clean[start..], &noisy[start..]);

    let aligned_clean = &clean[start - delay..clean.len() - delay];
    let output_snr_db = snr_db(aligned_clean, &processed[start..]);

    CancellationReport {
        input_snr_db,
        output_snr_db,
        improvement_db: output_snr_db - input_snr_db,
    }
}

/// Run a per-sample filter across a slice, collecting the outputs.
pub fn run_filter<F: Filter>(filter: &mut F, input: &[f32]) -> Vec<f32> {
    input.iter().map(|&x| filter.process(x)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_power() {
        assert_eq!(signal_power(&[]), 0.0);
        assert_eq!(signal_power(&[2.0, -2.0]), 4.0);
    }

    #[test]
    fn test_snr_db_scales_with_noise() {
        let clean: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.05).sin()).collect();

        let light: Vec<f32> = clean.iter().map(|&c| c + 0.01).collect();
        let heavy: Vec<f32> = clean.iter().map(|&c| c + 0.1).collect();

        let light_snr = snr_db(&clean, &light);
        let heavy_snr = snr_db(&clean, &heavy);
        assert!(
            light_snr > heavy_snr + 15.0,
            "10x less noise should gain ~20 dB: {} vs {}",
            light_snr,
            heavy_snr
        );
    }

    #[test]
    fn test_identical_signal_has_huge_snr() {
        let clean: Vec<f32> = (0..100).map(|i| (i as f32 * 0.1).cos()).collect();
        assert!(snr_db(&clean, &clean) > 100.0);
    }

    #[test]
    fn test_improvement_report_alignment() {
        // A processed stream that exactly equals the delayed clean signal
        // must score a (much) higher output SNR than the noisy input.
        let delay = 5;
        let clean: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.06).sin()).collect();
        let noisy: Vec<f32> = clean.iter().map(|&c| c + 0.2).collect();
        let processed: Vec<f32> = (0..clean.len())
            .map(|i| if i >= delay { clean[i - delay] } else { 0.0 })
            .collect();

        let report = snr_improvement_db(&clean, &noisy, &processed, delay, 100);
        assert!(report.improvement_db > 20.0, "{:?}", report);
    }
}
