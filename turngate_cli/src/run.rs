//! Rig assembly and the drive loop for `turngate run`.

use crossbeam_channel as xch;
use eyre::WrapErr;
use turngate_core::error::Result as CoreResult;
use turngate_core::model::PredictionModel;
use turngate_core::rig::GateRig;
use turngate_core::runner::{self, RunStats};

use crate::rt::setup_rt_once;

/// Assemble a rig from the config and drive it.
///
/// With `ticks` the loop is bounded (useful for tests and smoke runs);
/// otherwise it runs until ctrl-c.
pub fn run_rig(
    cfg: &turngate_config::Config,
    model: PredictionModel,
    ticks: Option<u64>,
    sim_period_us: u64,
    rt: bool,
    rt_prio: Option<i32>,
) -> CoreResult<RunStats> {
    setup_rt_once(rt, rt_prio);

    let mut rig = build_rig(cfg, model, sim_period_us)?;
    let tick_rate_hz = cfg.runner.tick_rate_hz;

    if let Some(n) = ticks {
        return runner::run_ticks(&mut rig, tick_rate_hz, n);
    }

    // Ctrl-c flows through a bounded channel into the loop's shutdown check.
    let (tx, rx) = xch::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })
    .wrap_err("install ctrl-c handler")?;

    runner::run(&mut rig, tick_rate_hz, move || rx.try_recv().is_ok())
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn build_rig(
    cfg: &turngate_config::Config,
    model: PredictionModel,
    _sim_period_us: u64,
) -> CoreResult<GateRig> {
    use turngate_hardware::gpio::GpioInput;
    use turngate_hardware::servo::ServoGate;

    let servo_channel = cfg.pins.servo_pwm.ok_or_else(|| {
        eyre::eyre!("pins.servo_pwm is required for hardware builds")
    })?;
    let fine = GpioInput::new(cfg.pins.fine, false).wrap_err("open fine sensor pin")?;
    let coarse = GpioInput::new(cfg.pins.coarse, false).wrap_err("open coarse sensor pin")?;
    // The trigger button shorts to ground when pressed.
    let trigger = GpioInput::new(cfg.pins.trigger, true).wrap_err("open trigger pin")?;
    let gate = ServoGate::new(servo_channel).wrap_err("open gate servo")?;

    tracing::info!(
        fine = cfg.pins.fine,
        coarse = cfg.pins.coarse,
        trigger = cfg.pins.trigger,
        servo_pwm = servo_channel,
        "hardware rig"
    );

    GateRig::builder()
        .with_fine_pin(fine)
        .with_coarse_pin(coarse)
        .with_trigger_pin(trigger)
        .with_actuator(gate)
        .with_stability((&cfg.stability).into())
        .with_release((&cfg.release).into())
        .with_sequence((&cfg.sequence).into())
        .with_model(model)
        .build()
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn build_rig(
    cfg: &turngate_config::Config,
    model: PredictionModel,
    sim_period_us: u64,
) -> CoreResult<GateRig> {
    use turngate_hardware::{SimulatedGate, SimulatedTrigger, SimulatedTurntable};

    let table = SimulatedTurntable::new(sim_period_us);
    // Keep the trigger held so the sim releases whenever prediction allows.
    let trigger = SimulatedTrigger::new(true);

    tracing::info!(sim_period_us, "simulated rig");

    GateRig::builder()
        .with_fine_pin(table.fine_pin())
        .with_coarse_pin(table.coarse_pin())
        .with_trigger_pin(trigger)
        .with_actuator(SimulatedGate::new())
        .with_stability((&cfg.stability).into())
        .with_release((&cfg.release).into())
        .with_sequence((&cfg.sequence).into())
        .with_model(model)
        .build()
}
