/// Asserts that row `t` of a history equals the given activities.
#[macro_export]
macro_rules! assert_row {
    ($history:expr, $t:expr, $expected:expr) => {
        assert_eq!(
            $history.row($t),
            &$expected[..],
            "Row {} mismatch",
            $t
        );
    };
}

/// Asserts that two histories are identical, comparing fingerprints first.
#[macro_export]
macro_rules! assert_same_history {
    ($a:expr, $b:expr) => {
        assert_eq!(
            $a.fingerprint(),
            $b.fingerprint(),
            "History fingerprints differ"
        );
        assert_eq!($a, $b);
    };
}

/// Asserts that an evolution result failed with the given error pattern.
#[macro_export]
macro_rules! assert_evolve_err {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err(err) => assert!(
                matches!(err, $pattern),
                "Unexpected error: {err:?}"
            ),
            Ok(history) => panic!(
                "Expected an error, got {} timesteps",
                history.timesteps()
            ),
        }
    };
}
