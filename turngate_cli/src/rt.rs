//! Real-time scheduling helpers (Linux SCHED_FIFO + mlockall).
//!
//! Best effort: failures downgrade to warnings so the rig still runs with
//! normal scheduling.

#[cfg(target_os = "linux")]
pub fn setup_rt_once(rt: bool, prio: Option<i32>) {
    use libc::{
        MCL_CURRENT, MCL_FUTURE, SCHED_FIFO, mlockall, sched_get_priority_min, sched_param,
        sched_setscheduler,
    };
    use std::sync::OnceLock;
    static RT_ONCE: OnceLock<()> = OnceLock::new();

    if !rt {
        return;
    }

    RT_ONCE.get_or_init(|| {
        // Lock current and future pages so the control loop never page-faults.
        let rc = unsafe { mlockall(MCL_CURRENT | MCL_FUTURE) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            tracing::warn!(error = %err, "mlockall failed; continuing without memory locking");
        }

        let min = unsafe { sched_get_priority_min(SCHED_FIFO) };
        let requested = prio.unwrap_or(min.saturating_add(10));
        let param = sched_param {
            sched_priority: requested,
        };
        let rc = unsafe { sched_setscheduler(0, SCHED_FIFO, &param) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            tracing::warn!(
                error = %err,
                requested,
                "SCHED_FIFO not available (need CAP_SYS_NICE); using normal scheduling"
            );
        } else {
            tracing::info!(priority = requested, "SCHED_FIFO enabled");
        }
    });
}

#[cfg(not(target_os = "linux"))]
pub fn setup_rt_once(rt: bool, _prio: Option<i32>) {
    if rt {
        tracing::warn!("--rt is only supported on Linux; ignoring");
    }
}
