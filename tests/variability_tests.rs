use ataxia_screen::speech::variability::composite;
use ataxia_screen::speech::{coeff_var, ThresholdTable, VariabilityScorer};
use rstest::rstest;

#[rstest]
#[case(&[1.0, 3.0], Some(0.5))]
#[case(&[2.0, 2.0, 2.0], Some(0.0))]
#[case(&[1.0, 3.0, 0.0, -4.0, f64::NAN, f64::INFINITY], Some(0.5))] // Invalid values dropped
#[case(&[], None)]
#[case(&[0.0, 0.0], None)]
#[case(&[-1.0, f64::NAN], None)]
fn test_coeff_var(#[case] series: &[f64], #[case] expected: Option<f64>) {
    match (coeff_var(series), expected) {
        (Some(got), Some(want)) => assert!((got - want).abs() < 1e-12, "got {}", got),
        (got, want) => assert_eq!(got, want),
    }
}

#[rstest]
#[case(Some(0.0), 0)]
#[case(Some(0.20), 0)] // Boundary is "not exceeded"
#[case(Some(0.25), 1)]
#[case(Some(0.55), 3)]
#[case(Some(0.99), 5)]
#[case(Some(1.00), 5)]
#[case(Some(1.5), 6)]
#[case(None, 6)]
#[case(Some(f64::NAN), 6)]
fn test_rms_buckets(#[case] cv: Option<f64>, #[case] expected: u8) {
    assert_eq!(ThresholdTable::default_rms().bucket(cv), expected);
}

#[rstest]
#[case(Some(0.05), 0)]
#[case(Some(0.10), 1)]
#[case(Some(0.30), 4)]
#[case(Some(0.51), 6)]
fn test_f0_buckets(#[case] cv: Option<f64>, #[case] expected: u8) {
    assert_eq!(ThresholdTable::default_f0().bucket(cv), expected);
}

#[rstest]
#[case(0, 0, 0)]
#[case(0, 1, 1)] // Half rounds up
#[case(2, 5, 4)]
#[case(6, 6, 6)]
fn test_composite(#[case] a: u8, #[case] b: u8, #[case] expected: u8) {
    assert_eq!(composite(a, b), expected);
}

#[rstest]
#[case(vec![])]
#[case(vec![0.3, 0.2, 0.4, 0.5, 0.6, 0.7])]
#[case(vec![0.1, 0.1, 0.2, 0.3, 0.4, 0.5])]
#[case(vec![0.1, 0.2, f64::NAN, 0.4, 0.5, 0.6])]
fn test_invalid_tables_rejected(#[case] bounds: Vec<f64>) {
    assert!(ThresholdTable::new(bounds).is_err());
}

#[test]
fn test_undefined_series_scores_worst() {
    let scorer = VariabilityScorer::default();
    let score = scorer.score(&[0.0, 0.0, 0.0], &[]);
    assert_eq!(score.rms_cv, None);
    assert_eq!(score.f0_cv, None);
    assert_eq!((score.rms_bucket, score.f0_bucket, score.score06), (6, 6, 6));
}

#[test]
fn test_steady_series_scores_best() {
    let scorer = VariabilityScorer::default();
    let score = scorer.score(&[0.1; 20], &[150.0; 20]);
    assert_eq!(score.score06, 0);
}
