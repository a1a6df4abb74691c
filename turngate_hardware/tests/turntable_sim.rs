use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rstest::rstest;
use turngate_hardware::SimulatedTurntable;
use turngate_traits::DigitalInput;

// Deterministic test clock we can manually advance in microseconds.
#[derive(Clone)]
struct TestClock {
    origin: Instant,
    us: Arc<AtomicU64>,
}
impl TestClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            us: Arc::new(AtomicU64::new(0)),
        }
    }
    fn set_us(&self, us: u64) {
        self.us.store(us, Ordering::Relaxed);
    }
}
impl turngate_traits::clock::Clock for TestClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_micros(self.us.load(Ordering::Relaxed))
    }
    fn sleep(&self, d: Duration) {
        self.us
            .fetch_add(d.as_micros() as u64, Ordering::Relaxed);
    }
}

#[rstest]
#[case(100_000, true)] // first half of the turn: high
#[case(300_000, false)] // second half: low
#[case(600_000, true)] // next turn wraps around
fn fine_pin_follows_the_turn_phase(#[case] t_us: u64, #[case] expected: bool) {
    let clock = TestClock::new();
    let table = SimulatedTurntable::with_clock(500_000, Arc::new(clock.clone()));
    let mut fine = table.fine_pin();

    clock.set_us(t_us);
    assert_eq!(fine.read().unwrap(), expected);
}

#[test]
fn coarse_pin_is_quarter_turn_offset() {
    let clock = TestClock::new();
    let table = SimulatedTurntable::with_clock(400_000, Arc::new(clock.clone()));
    let mut fine = table.fine_pin();
    let mut coarse = table.coarse_pin();

    // At t=0 the fine pin is high and the coarse pin, offset by a quarter
    // turn, is also high but flips earlier.
    assert!(fine.read().unwrap());
    assert!(coarse.read().unwrap());

    clock.set_us(150_000); // fine still high, coarse past its half
    assert!(fine.read().unwrap());
    assert!(!coarse.read().unwrap());
}

#[test]
fn fine_pin_produces_one_cycle_per_turn() {
    let clock = TestClock::new();
    let table = SimulatedTurntable::with_clock(500_000, Arc::new(clock.clone()));
    let mut fine = table.fine_pin();

    let mut falling = 0;
    let mut last = fine.read().unwrap();
    for step in 1..=200u64 {
        clock.set_us(step * 10_000); // 2 s of rotation in 10 ms steps
        let level = fine.read().unwrap();
        if last && !level {
            falling += 1;
        }
        last = level;
    }
    assert_eq!(falling, 4, "four turns in two seconds at 500 ms/turn");
}

#[test]
fn period_change_takes_effect() {
    let clock = TestClock::new();
    let table = SimulatedTurntable::with_clock(500_000, Arc::new(clock.clone()));
    let mut fine = table.fine_pin();

    clock.set_us(100_000);
    assert!(fine.read().unwrap(), "phase 100ms of a 500ms turn is high");

    // Same instant, shorter period: the phase re-bins into the second half.
    table.set_period_us(150_000);
    assert_eq!(table.period_us(), 150_000);
    assert!(!fine.read().unwrap(), "phase 100ms of a 150ms turn is low");
}
