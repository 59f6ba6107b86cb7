/// Unwraps a completed round outcome, failing the test on a timeout.
#[macro_export]
macro_rules! expect_completed {
    ($outcome:expr) => {
        match $outcome {
            evoplat_core::RoundOutcome::Completed(result) => result,
            other => panic!("Expected a completed round, got {:?}", other),
        }
    };
}

/// Asserts a score to within floating-point noise.
#[macro_export]
macro_rules! assert_score {
    ($actual:expr, $expected:expr) => {
        let (actual, expected): (f64, f64) = ($actual, $expected);
        assert!(
            (actual - expected).abs() < 1e-9,
            "Score {} does not match expected {}",
            actual,
            expected
        );
    };
}

/// Asserts how many agents of a round summary ended in each status.
#[macro_export]
macro_rules! assert_statuses {
    ($summary:expr, won: $won:expr, lost: $lost:expr, invalid: $invalid:expr) => {
        assert_eq!(
            ($summary.won, $summary.lost, $summary.invalid),
            ($won, $lost, $invalid),
            "Status counts (won, lost, invalid) mismatch"
        );
    };
}
