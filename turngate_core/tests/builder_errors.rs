use turngate_core::config::{ReleaseCfg, StabilityCfg};
use turngate_core::error::{BuildError, Report};
use turngate_core::mocks::{ConstPin, NoopGate};
use turngate_core::rig::GateRig;

fn build_error(err: &Report) -> &BuildError {
    err.downcast_ref::<BuildError>().expect("typed BuildError")
}

#[test]
fn missing_fine_pin_is_reported() {
    let err = GateRig::builder().try_build().unwrap_err();
    assert!(matches!(build_error(&err), BuildError::MissingFinePin));
}

#[test]
fn missing_coarse_pin_is_reported() {
    let err = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .try_build()
        .unwrap_err();
    assert!(matches!(build_error(&err), BuildError::MissingCoarsePin));
}

#[test]
fn missing_trigger_pin_is_reported() {
    let err = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .with_coarse_pin(ConstPin(false))
        .with_actuator(NoopGate)
        .try_build()
        .unwrap_err();
    assert!(matches!(build_error(&err), BuildError::MissingTriggerPin));
}

#[test]
fn missing_actuator_is_reported() {
    let err = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .with_coarse_pin(ConstPin(false))
        .with_trigger_pin(ConstPin(false))
        .try_build()
        .unwrap_err();
    assert!(matches!(build_error(&err), BuildError::MissingActuator));
}

#[test]
fn threshold_out_of_range_is_rejected() {
    let err = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .with_coarse_pin(ConstPin(false))
        .with_trigger_pin(ConstPin(false))
        .with_actuator(NoopGate)
        .with_stability(StabilityCfg {
            relative_threshold: 1.5,
            suppress_rounds: 2,
        })
        .build()
        .unwrap_err();
    assert!(matches!(build_error(&err), BuildError::InvalidConfig(_)));
}

#[test]
fn zero_suppress_rounds_is_rejected() {
    let err = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .with_coarse_pin(ConstPin(false))
        .with_trigger_pin(ConstPin(false))
        .with_actuator(NoopGate)
        .with_stability(StabilityCfg {
            relative_threshold: 0.08,
            suppress_rounds: 0,
        })
        .build()
        .unwrap_err();
    assert!(matches!(build_error(&err), BuildError::InvalidConfig(_)));
}

#[test]
fn zero_projection_cap_is_rejected() {
    let err = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .with_coarse_pin(ConstPin(false))
        .with_trigger_pin(ConstPin(false))
        .with_actuator(NoopGate)
        .with_release(ReleaseCfg {
            max_projections: 0,
            ..ReleaseCfg::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(build_error(&err), BuildError::InvalidConfig(_)));
}

#[test]
fn defaults_build_cleanly() {
    let rig = GateRig::builder()
        .with_fine_pin(ConstPin(false))
        .with_coarse_pin(ConstPin(false))
        .with_trigger_pin(ConstPin(false))
        .with_actuator(NoopGate)
        .build();
    assert!(rig.is_ok());
}
