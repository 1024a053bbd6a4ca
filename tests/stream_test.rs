//! End-to-end test of the PCM block path: bytes in, canceller, bytes out.

use std::io::Cursor;

use quietline::pcm::{PcmReader, PcmWriter};
use quietline::signal_processing::{Filter, NlmsCanceller};

fn make_pcm_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::new();
    PcmWriter::new(&mut bytes).write_block(samples).unwrap();
    bytes
}

fn test_samples(count: usize) -> Vec<i16> {
    (0..count)
        .map(|i| ((i as f32 * 0.09).sin() * 8000.0) as i16)
        .collect()
}

#[test]
fn test_stream_pipeline_matches_per_sample_reference() {
    let input = test_samples(10_123);
    let bytes = make_pcm_bytes(&input);

    // Block path, the way the CLI drives it.
    let mut reader = PcmReader::with_block_size(Cursor::new(bytes), 4000);
    let mut out_bytes = Vec::new();
    {
        let mut writer = PcmWriter::new(&mut out_bytes);
        let mut canceller = NlmsCanceller::new(5, 5, 0.1).unwrap();
        while let Some(mut block) = reader.next_block().unwrap() {
            canceller.process_buffer_i16(&mut block);
            writer.write_block(&block).unwrap();
        }
        writer.flush().unwrap();
    }

    let mut out_reader = PcmReader::with_block_size(Cursor::new(out_bytes), 1024);
    let mut output = Vec::new();
    while let Some(block) = out_reader.next_block().unwrap() {
        output.extend(block);
    }

    // Per-sample reference.
    let mut reference = NlmsCanceller::new(5, 5, 0.1).unwrap();
    let expected: Vec<i16> = input
        .iter()
        .map(|&x| reference.process(x as f32) as i16)
        .collect();

    assert_eq!(output.len(), input.len());
    assert_eq!(output, expected);
}

#[test]
fn test_block_size_does_not_change_results() {
    let input = test_samples(6_000);
    let mut outputs = Vec::new();

    for block_size in [1usize, 7, 400, 4000, 10_000] {
        let mut reader =
            PcmReader::with_block_size(Cursor::new(make_pcm_bytes(&input)), block_size);
        let mut canceller = NlmsCanceller::new(8, 3, 0.5).unwrap();
        let mut output = Vec::new();
        while let Some(mut block) = reader.next_block().unwrap() {
            canceller.process_buffer_i16(&mut block);
            output.extend(block);
        }
        outputs.push(output);
    }

    for output in &outputs[1..] {
        assert_eq!(output, &outputs[0]);
    }
}

#[test]
fn test_saturating_output_cast() {
    // Large coefficients can overshoot the i16 range; the boundary cast
    // must clamp rather than wrap.
    let mut canceller = NlmsCanceller::new(1, 1, 2.0).unwrap();

    let mut block: Vec<i16> = vec![i16::MAX; 64];
    canceller.process_buffer_i16(&mut block);

    for &sample in &block {
        assert!((i16::MIN..=i16::MAX).contains(&sample));
    }

    // The float path on the same input stays near full scale; the int
    // path must have produced the clamped equivalent.
    let mut float_canceller = NlmsCanceller::new(1, 1, 2.0).unwrap();
    for (i, &int_out) in block.iter().enumerate() {
        let float_out = float_canceller.process(i16::MAX as f32);
        assert_eq!(
            int_out, float_out as i16,
            "sample {}: int path diverged from saturating cast of float path",
            i
        );
    }
}
