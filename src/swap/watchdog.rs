/// Watchdog budget once a swap enters settlement, at 1 tick/second
pub const DEFAULT_SWAP_TIMEOUT_TICKS: u32 = 180;

/// Tick-driven settlement countdown
///
/// Owned and mutated only by the order state machine's own task. Both the
/// success and timeout paths stop it, so `stop` is a no-op when disarmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchdog {
    remaining: Option<u32>,
}

impl Watchdog {
    pub fn arm(&mut self, ticks: u32) {
        self.remaining = Some(ticks);
    }

    pub fn stop(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Advance one tick; returns true exactly once, on the tick that
    /// exhausts the budget.
    pub fn tick(&mut self) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.remaining = None;
            true
        } else {
            false
        }
    }
}
