//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use turngate_core::error::{BuildError, CoreError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingFinePin => {
                "What happened: No fine (optical) sensor pin was provided to the rig.\nLikely causes: The sensor failed to initialize or was not wired into the builder.\nHow to fix: Check [pins].fine in the config and pass the input via with_fine_pin(...).".to_string()
            }
            BuildError::MissingCoarsePin => {
                "What happened: No coarse (hall) sensor pin was provided to the rig.\nLikely causes: The sensor failed to initialize or was not wired into the builder.\nHow to fix: Check [pins].coarse in the config and pass the input via with_coarse_pin(...).".to_string()
            }
            BuildError::MissingTriggerPin => {
                "What happened: No trigger input was provided to the rig.\nLikely causes: The release button pin is missing from the config.\nHow to fix: Set [pins].trigger and pass the input via with_trigger_pin(...).".to_string()
            }
            BuildError::MissingActuator => {
                "What happened: No gate actuator was provided to the rig.\nLikely causes: The servo failed to initialize or was not wired into the builder.\nHow to fix: Check [pins].servo_pwm and pass the actuator via with_actuator(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(pe) = err.downcast_ref::<turngate_core::error::PredictError>() {
        use turngate_core::error::PredictError;
        return match pe {
            PredictError::TurnTooSlow { .. } => format!(
                "What happened: {pe}.\nLikely causes: The platform is stopped or spinning too slowly for a meaningful prediction.\nHow to fix: Spin the platform up, or raise release.max_turn_time_us if your rig really turns this slowly."
            ),
            PredictError::NoConvergence { .. } => format!(
                "What happened: {pe}.\nLikely causes: The regression model is out of calibration and projects turns that never accumulate to the fall time.\nHow to fix: Re-fit the model segments or raise release.max_projections."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return format!(
            "What happened: {ce}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("gpio") || lower.contains("pwm") {
        return "What happened: Failed to initialize hardware pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO/PWM permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process may access GPIO and the PWM channel is enabled.".to_string();
    }

    // Model CSV header special-case
    if lower.contains("model csv must have headers") {
        return "Invalid headers in model CSV. Expected 'upper_us,a0,a1,a2,a3,a4'.".to_string();
    }

    if lower.contains("model segment") || lower.contains("model.segments") {
        return format!(
            "What happened: The regression model is malformed.\nLikely causes: {msg}.\nHow to fix: Segments must ascend by upper_us with exactly one unbounded final segment and 1..=5 finite coefficients each."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.chain().nth(1) {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: config/build problems return 2, everything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use turngate_core::error::{BuildError, CoreError};
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    if let Some(CoreError::Config(_)) = err.downcast_ref::<CoreError>() {
        return 2;
    }
    1
}

/// Render an error as a single JSON object on stdout (for --json mode).
pub fn print_json_error(err: &eyre::Report) {
    let obj = serde_json::json!({
        "ok": false,
        "error": err.to_string(),
        "detail": humanize(err),
    });
    println!("{obj}");
}
