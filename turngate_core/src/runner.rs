//! External drive loop for the rig.
//!
//! The core never sleeps inside a tick; pacing lives here. The loop degrades
//! rather than halts: sensor stalls are logged and the rig keeps retrying on
//! the next tick.

use std::time::Duration;

use turngate_traits::clock::Clock;

use crate::error::Result;
use crate::rig::GateRig;
use crate::statemachine::ReleaseState;
use crate::util::period_us;

/// Counters from one drive-loop run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub ticks: u64,
    pub releases: u64,
}

/// Drive the rig at `tick_rate_hz` until `shutdown` reads true.
pub fn run(
    rig: &mut GateRig,
    tick_rate_hz: u32,
    mut shutdown: impl FnMut() -> bool,
) -> Result<RunStats> {
    let period = Duration::from_micros(period_us(tick_rate_hz));
    let clock = rig.clock();
    let mut stats = RunStats::default();
    let mut last_state = rig.state();
    let mut stall_logged = false;

    tracing::info!(tick_rate_hz, "rig loop start");
    while !shutdown() {
        let state = rig.tick()?;
        stats.ticks += 1;

        if state != last_state {
            if state == ReleaseState::Release {
                stats.releases += 1;
                tracing::info!(releases = stats.releases, "ball released");
            }
            last_state = state;
        }

        // Stall diagnostic: warn once per stall episode, keep running.
        if rig.fine_sensor_stalled() {
            if !stall_logged {
                tracing::warn!(
                    last_turn_us = rig.last_turn_time_us(),
                    "fine sensor silent longer than the maximum turn time"
                );
                stall_logged = true;
            }
        } else {
            stall_logged = false;
        }

        clock.sleep(period);
    }
    tracing::info!(
        ticks = stats.ticks,
        releases = stats.releases,
        "rig loop stop"
    );
    Ok(stats)
}

/// Drive the rig for exactly `ticks` iterations (tests, bounded CLI runs).
pub fn run_ticks(rig: &mut GateRig, tick_rate_hz: u32, ticks: u64) -> Result<RunStats> {
    let mut remaining = ticks;
    run(rig, tick_rate_hz, move || {
        if remaining == 0 {
            return true;
        }
        remaining -= 1;
        false
    })
}
