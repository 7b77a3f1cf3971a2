//! Backend Story Integration Tests
//!
//! Every fill path (sequential row-major, CPU wavefront, GPU wavefront) must
//! produce the same table, bit for bit, and the same subsequence. A backend
//! that disagrees with the sequential reference is a correctness bug, not a
//! performance trade-off.

use trueno_lcs::algorithms::{fill_row_major, fill_wavefront, CancelToken, ParallelWavefront};
use trueno_lcs::{
    compute_lcs, BackendKind, BackendPreference, ComputeBackend, DpTable, EncodedPair, LcsConfig,
    SequencePair,
};

// ============================================================================
// HELPER: Inputs and reference fill
// ============================================================================

/// Deterministic pseudo-random sequence over `alphabet`
fn generate_sequence(len: usize, alphabet: &[u8], seed: u64) -> Vec<u8> {
    let mut rng_state = seed;
    (0..len)
        .map(|_| {
            rng_state = rng_state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            alphabet[((rng_state >> 16) % alphabet.len() as u64) as usize]
        })
        .collect()
}

fn reference_table(pair: &EncodedPair) -> DpTable {
    let mut table = DpTable::initialize(pair.m(), pair.n()).unwrap();
    fill_row_major(pair, &mut table, &CancelToken::new()).unwrap();
    table
}

fn cases() -> Vec<SequencePair<u8>> {
    vec![
        SequencePair::from_bytes(b"ABCBDAB", b"BDCABA"),
        SequencePair::from_bytes(b"XMJYAUZ", b"MZJAWXU"),
        SequencePair::from_bytes(b"AAAA", b"AA"),
        SequencePair::from_bytes(b"", b"XYZ"),
        SequencePair::from_bytes(b"Q", b""),
        SequencePair::from_bytes(b"A", b"A"),
        SequencePair::new(
            generate_sequence(257, b"ACGT", 7),
            generate_sequence(190, b"ACGT", 11),
        ),
        SequencePair::new(
            generate_sequence(64, b"AB", 3),
            generate_sequence(300, b"AB", 5),
        ),
    ]
}

// ============================================================================
// CPU WAVEFRONT
// ============================================================================

/// Parallel wavefront matches row-major on every case, at several widths
#[test]
fn test_parallel_wavefront_matches_sequential() {
    for pair in cases() {
        let encoded = pair.encode();
        let expected = reference_table(&encoded);

        for min_width in [1, 8, 64, usize::MAX] {
            let mut executor = ParallelWavefront::new(min_width);
            let mut table = DpTable::initialize(encoded.m(), encoded.n()).unwrap();
            fill_wavefront(&mut executor, &encoded, &mut table, &CancelToken::new()).unwrap();

            assert_eq!(
                table.first_difference(&expected),
                None,
                "{}x{} at min width {min_width}",
                pair.m(),
                pair.n()
            );
        }
    }
}

/// Dedicated pool with a fixed thread count gives the same table
#[test]
fn test_dedicated_pool_matches_sequential() {
    let pair = SequencePair::new(
        generate_sequence(400, b"ACGT", 21),
        generate_sequence(350, b"ACGT", 22),
    );
    let encoded = pair.encode();
    let expected = reference_table(&encoded);

    for threads in [1, 2, 4] {
        let mut executor = ParallelWavefront::with_threads(threads, 1).unwrap();
        assert_eq!(executor.threads(), threads);

        let mut table = DpTable::initialize(encoded.m(), encoded.n()).unwrap();
        fill_wavefront(&mut executor, &encoded, &mut table, &CancelToken::new()).unwrap();
        assert_eq!(table, expected, "{threads} threads");
    }
}

// ============================================================================
// PIPELINE: every backend, same outcome
// ============================================================================

/// `compute_lcs` returns identical tables and subsequences on every CPU backend
#[test]
#[serial_test::serial]
fn test_pipeline_outcome_is_backend_independent() {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

    for pair in cases() {
        let mut sequential = ComputeBackend::Sequential;
        let expected = compute_lcs(&mut sequential, &pair).unwrap();

        for preference in [BackendPreference::Parallel, BackendPreference::Auto] {
            let config = LcsConfig::default()
                .with_backend(preference)
                .with_min_parallel_width(1);
            let mut backend = rt.block_on(ComputeBackend::acquire(&config)).unwrap();
            let outcome = compute_lcs(&mut backend, &pair).unwrap();

            assert_eq!(outcome.table, expected.table, "{preference}");
            assert_eq!(outcome.subsequence, expected.subsequence, "{preference}");
            backend.release();
        }
    }
}

/// Stage counts follow the fill strategy
#[test]
fn test_report_stage_counts() {
    let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");

    let mut sequential = ComputeBackend::Sequential;
    let report = compute_lcs(&mut sequential, &pair).unwrap().report;
    assert_eq!(report.backend, BackendKind::Sequential);
    assert_eq!(report.stages, 7);
    assert_eq!(report.cells, 42);

    let mut parallel = ComputeBackend::Parallel(ParallelWavefront::new(1));
    let report = compute_lcs(&mut parallel, &pair).unwrap().report;
    assert_eq!(report.backend, BackendKind::Parallel);
    assert_eq!(report.stages, 7 + 6 - 1);
    assert_eq!(report.cells, 42);
}

/// Two fills on fresh tables are identical
#[test]
fn test_idempotent_fill() {
    let pair = SequencePair::new(
        generate_sequence(120, b"ACGT", 99),
        generate_sequence(140, b"ACGT", 98),
    );
    let mut backend = ComputeBackend::Parallel(ParallelWavefront::new(4));

    let first = compute_lcs(&mut backend, &pair).unwrap();
    let second = compute_lcs(&mut backend, &pair).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// GPU WAVEFRONT (feature `gpu`)
// ============================================================================

#[cfg(feature = "gpu")]
mod gpu {
    use super::*;
    use trueno_lcs::{GpuDevice, GpuWavefront};

    /// GPU wavefront matches row-major on every case
    #[tokio::test]
    #[serial_test::serial]
    async fn test_gpu_wavefront_matches_sequential() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_wavefront_matches_sequential: GPU not available");
            return;
        }

        let mut gpu = GpuWavefront::acquire().await.unwrap();
        for pair in cases() {
            let encoded = pair.encode();
            let expected = reference_table(&encoded);

            let mut table = DpTable::initialize(encoded.m(), encoded.n()).unwrap();
            fill_wavefront(&mut gpu, &encoded, &mut table, &CancelToken::new()).unwrap();
            assert_eq!(table, expected, "{}x{}", pair.m(), pair.n());
        }
    }

    /// Explicit GPU preference drives the GPU backend end to end
    #[tokio::test]
    #[serial_test::serial]
    async fn test_gpu_pipeline_outcome() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_pipeline_outcome: GPU not available");
            return;
        }

        let config = LcsConfig::default().with_backend(BackendPreference::Gpu);
        let mut backend = ComputeBackend::acquire(&config).await.unwrap();
        assert_eq!(backend.kind(), BackendKind::Gpu);

        let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");
        let outcome = compute_lcs(&mut backend, &pair).unwrap();
        assert_eq!(outcome.as_string(), "BCBA");
        assert_eq!(outcome.report.backend, BackendKind::Gpu);
        assert_eq!(outcome.report.stages, 12);
    }
}
