use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Lifecycle of the countdown. `Stopped` and `Expired` are terminal:
/// a countdown never restarts within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
    Expired,
}

/// What a tick produced. `Expired` is emitted exactly once, on the tick
/// that brings the remaining time to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick(u32),
    Expired,
}

/// Wall-clock deadline for a timed attempt, decremented once per
/// second. The tick source is external (a 1 Hz thread in the live
/// runner, a plain loop in tests), so expiry is deterministic to test.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    state: TimerState,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            state: TimerState::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Start the countdown. A zero-length countdown expires immediately
    /// rather than waiting for a tick that would never come.
    pub fn start(&mut self) -> Option<TimerSignal> {
        if self.state != TimerState::Idle {
            return None;
        }
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            return Some(TimerSignal::Expired);
        }
        self.state = TimerState::Running;
        None
    }

    /// Advance one second. Returns `Expired` on the tick that reaches
    /// zero; ticks after stop or expiry are ignored.
    pub fn tick(&mut self) -> Option<TimerSignal> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            Some(TimerSignal::Expired)
        } else {
            Some(TimerSignal::Tick(self.remaining))
        }
    }

    /// Cancel the countdown on manual submission. Pending ticks become
    /// no-ops; only a running countdown can be stopped.
    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
        }
    }
}

/// Spawn a 1 Hz pulse thread for a live session. Each pulse is meant to
/// drive one [`Countdown::tick`]. The thread exits when the receiver is
/// dropped.
pub fn spawn_ticker() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        thread::sleep(Duration::from_secs(1));
        if tx.send(()).is_err() {
            break;
        }
    });

    rx
}
