//! Property-based tests for the analyzer invariants.
//!
//! These verify contracts that must hold for all valid inputs, using
//! randomly generated series.

use proptest::prelude::*;
use tsanalyzer::prelude::*;

/// Strategy for bounded, finite sample vectors.
fn values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len)
        .prop_flat_map(|len| prop::collection::vec(-1000.0..1000.0_f64, len))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn spectral_peak_lands_within_one_bin(freq_bin in 2usize..60) {
        // A pure sinusoid on an exact bin frequency, sampled well above
        // Nyquist: the magnitude argmax must fall within one bin width.
        let n = 256;
        let rate = 256.0;
        let samples: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq_bin as f64 * i as f64 / n as f64).sin())
            .collect();

        let mut analyzer = SpectralAnalyzer::new(samples, rate);
        analyzer.compute().unwrap();
        let spectrum = analyzer.result().unwrap();

        let bin_width = rate / n as f64;
        prop_assert!((spectrum.peak_frequency - freq_bin as f64).abs() <= bin_width);
    }

    #[test]
    fn spectrum_shape_invariants(values in values_strategy(2, 200), rate in 0.1..1000.0_f64) {
        let n = values.len();
        let mut analyzer = SpectralAnalyzer::new(values, rate);
        analyzer.compute().unwrap();
        let spectrum = analyzer.result().unwrap();

        prop_assert_eq!(spectrum.len(), n / 2 + 1);
        for (f, m) in spectrum.bins() {
            prop_assert!(f >= 0.0);
            prop_assert!(m >= 0.0);
        }
        for pair in spectrum.frequencies.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn decomposition_reconstructs_input(
        values in values_strategy(40, 120),
        period in 2usize..10
    ) {
        prop_assume!(values.len() >= 2 * period);

        let mut decomposer = StlDecomposer::new(values.clone(), period);
        decomposer.compute().unwrap();
        let result = decomposer.result().unwrap();

        prop_assert_eq!(result.trend.len(), values.len());
        prop_assert_eq!(result.seasonal.len(), values.len());
        prop_assert_eq!(result.residual.len(), values.len());
        for i in 0..values.len() {
            let reconstructed = result.trend[i] + result.seasonal[i] + result.residual[i];
            prop_assert!((values[i] - reconstructed).abs() <= 1e-6);
        }
    }

    #[test]
    fn seasonal_component_always_tiles(
        values in values_strategy(40, 120),
        period in 2usize..10
    ) {
        prop_assume!(values.len() >= 2 * period);

        let mut decomposer = StlDecomposer::new(values.clone(), period);
        decomposer.compute().unwrap();
        let seasonal = &decomposer.result().unwrap().seasonal;

        for i in 0..seasonal.len() - period {
            prop_assert!((seasonal[i] - seasonal[i + period]).abs() < 1e-9);
        }
    }

    #[test]
    fn acf_lag_zero_is_one_and_values_bounded(
        values in values_strategy(10, 200),
        lag_frac in 0.1..0.9_f64
    ) {
        let max_lag = ((values.len() - 1) as f64 * lag_frac).max(1.0) as usize;
        let mut analyzer = AutocorrelationAnalyzer::new(values, max_lag);
        analyzer.compute().unwrap();
        let result = analyzer.result().unwrap();

        prop_assert_eq!(result.correlations[0], 1.0);
        prop_assert_eq!(result.correlations.len(), max_lag + 1);
        for (_, r) in result.values() {
            prop_assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn recompute_is_idempotent(values in values_strategy(16, 100)) {
        let mut analyzer = SpectralAnalyzer::new(values, 10.0);
        analyzer.compute().unwrap();
        let first = analyzer.result().unwrap().magnitudes.clone();
        analyzer.compute().unwrap();
        prop_assert_eq!(&first, &analyzer.result().unwrap().magnitudes);
    }

    #[test]
    fn invalid_max_lag_is_rejected(values in values_strategy(2, 50), extra in 0usize..10) {
        let max_lag = values.len() + extra;
        let mut analyzer = AutocorrelationAnalyzer::new(values, max_lag);
        prop_assert!(matches!(
            analyzer.compute(),
            Err(AnalyzerError::InvalidInput(_))
        ));
    }

    #[test]
    fn invalid_sampling_rate_is_rejected(
        values in values_strategy(2, 50),
        rate in -100.0..0.0_f64
    ) {
        let mut analyzer = SpectralAnalyzer::new(values, rate);
        prop_assert!(matches!(
            analyzer.compute(),
            Err(AnalyzerError::InvalidInput(_))
        ));
    }
}
