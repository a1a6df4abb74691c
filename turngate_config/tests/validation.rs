use rstest::rstest;

fn base_toml() -> String {
    r#"
[pins]
fine = 17
coarse = 27
trigger = 22
servo_pwm = 0
"#
    .to_string()
}

#[test]
fn minimal_config_parses_with_defaults() {
    let cfg = turngate_config::load_toml(&base_toml()).expect("parse");
    cfg.validate().expect("validate");
    assert_eq!(cfg.stability.relative_threshold, 0.08);
    assert_eq!(cfg.stability.suppress_rounds, 2);
    assert_eq!(cfg.release.ball_fall_time_us, 418_344);
    assert_eq!(cfg.release.max_turn_time_us, 8_000_000);
    assert_eq!(cfg.sequence.close_settle_us, 400_000);
    assert_eq!(cfg.runner.tick_rate_hz, 2000);
    assert!(cfg.model.is_none());
}

#[rstest]
#[case("[stability]\nrelative_threshold = 0.0\n", "relative_threshold")]
#[case("[stability]\nrelative_threshold = 1.0\n", "relative_threshold")]
#[case("[stability]\nsuppress_rounds = 0\n", "suppress_rounds")]
#[case("[release]\nball_fall_time_us = 0\n", "ball_fall_time_us")]
#[case("[release]\nmax_turn_time_us = 0\n", "max_turn_time_us")]
#[case("[release]\nmax_projections = 0\n", "max_projections")]
#[case("[sequence]\nprepare_us = 0\n", "prepare_us")]
#[case("[runner]\ntick_rate_hz = 0\n", "tick_rate_hz")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation")]
fn out_of_range_values_fail_validation(#[case] extra: &str, #[case] needle: &str) {
    let toml = format!("{}{}", base_toml(), extra);
    let cfg = turngate_config::load_toml(&toml).expect("parse");
    let err = cfg.validate().expect_err("must fail");
    assert!(
        err.to_string().contains(needle),
        "error {err} does not mention {needle}"
    );
}

#[test]
fn duplicate_pins_fail_validation() {
    let toml = r#"
[pins]
fine = 17
coarse = 17
trigger = 22
"#;
    let cfg = turngate_config::load_toml(toml).expect("parse");
    assert!(cfg.validate().is_err());
}

#[test]
fn servo_channel_above_one_fails() {
    let toml = r#"
[pins]
fine = 17
coarse = 27
trigger = 22
servo_pwm = 3
"#;
    let cfg = turngate_config::load_toml(toml).expect("parse");
    assert!(cfg.validate().is_err());
}

#[test]
fn inline_model_is_validated() {
    let toml = format!(
        "{}{}",
        base_toml(),
        r#"
[[model.segments]]
upper_us = 500000
coeffs = [268.2445651096, 0.998685885, 7.73699143114947e-9]

[[model.segments]]
coeffs = [2585.5449062138, 0.9910487474, 1.28978803947511e-8]
"#
    );
    let cfg = turngate_config::load_toml(&toml).expect("parse");
    cfg.validate().expect("two segments, last unbounded");
}

#[rstest]
// last segment bounded
#[case(
    "
[[model.segments]]
upper_us = 500000
coeffs = [1.0]
"
)]
// unbounded segment not last
#[case(
    "
[[model.segments]]
coeffs = [1.0]

[[model.segments]]
upper_us = 500000
coeffs = [1.0]

[[model.segments]]
coeffs = [1.0]
"
)]
// bounds not ascending
#[case(
    "
[[model.segments]]
upper_us = 500000
coeffs = [1.0]

[[model.segments]]
upper_us = 400000
coeffs = [1.0]

[[model.segments]]
coeffs = [1.0]
"
)]
// too many coefficients
#[case(
    "
[[model.segments]]
coeffs = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
"
)]
// empty coefficients
#[case(
    "
[[model.segments]]
coeffs = []
"
)]
fn malformed_models_fail_validation(#[case] model: &str) {
    let toml = format!("{}{}", base_toml(), model);
    let cfg = turngate_config::load_toml(&toml).expect("parse");
    assert!(cfg.validate().is_err(), "model should be rejected: {model}");
}

#[test]
fn unknown_log_levels_are_not_validated_here() {
    // The level string is interpreted by the tracing EnvFilter in the CLI;
    // the config only constrains the rotation policy.
    let toml = format!("{}[logging]\nlevel = \"chatty\"\n", base_toml());
    let cfg = turngate_config::load_toml(&toml).expect("parse");
    cfg.validate().expect("level is free-form");
}
