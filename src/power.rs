use core::cell::Cell;

use critical_section::Mutex;

/// Energy modes, from fully running (`Em0`) to shutoff (`Em4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum EnergyMode {
    Em0,
    Em1,
    Em2,
    Em3,
    Em4,
}

impl EnergyMode {
    const COUNT: usize = 5;

    const ALL: [EnergyMode; Self::COUNT] = [
        EnergyMode::Em0,
        EnergyMode::Em1,
        EnergyMode::Em2,
        EnergyMode::Em3,
        EnergyMode::Em4,
    ];
}

/// Sleep arbitration used by the master. Both calls are reference counted
/// and must be safe to make from interrupt context.
pub trait PowerManager {
    fn block(&self, mode: EnergyMode);

    fn unblock(&self, mode: EnergyMode);
}

/// Reference-counted energy mode blocker.
///
/// Blocking a mode forbids entering it or any deeper mode.
pub struct SleepBlocker {
    counts: Mutex<Cell<[u8; EnergyMode::COUNT]>>,
}

impl SleepBlocker {
    pub const fn new() -> Self {
        Self {
            counts: Mutex::new(Cell::new([0; EnergyMode::COUNT])),
        }
    }

    pub fn blocked(&self, mode: EnergyMode) -> u8 {
        critical_section::with(|cs| self.counts.borrow(cs).get()[mode as usize])
    }

    /// Deepest mode the system may enter right now.
    pub fn lowest_allowed(&self) -> EnergyMode {
        let counts = critical_section::with(|cs| self.counts.borrow(cs).get());

        match EnergyMode::ALL.into_iter().find(|mode| counts[*mode as usize] > 0) {
            Some(blocked) => EnergyMode::ALL[(blocked as usize).saturating_sub(1)],
            // Em4 loses all state, so it is never entered implicitly.
            None => EnergyMode::Em3,
        }
    }

    fn update(&self, mode: EnergyMode, f: impl FnOnce(u8) -> Option<u8>) -> bool {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut counts = cell.get();
            match f(counts[mode as usize]) {
                Some(count) => {
                    counts[mode as usize] = count;
                    cell.set(counts);
                    true
                }
                None => false,
            }
        })
    }
}

impl Default for SleepBlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerManager for SleepBlocker {
    fn block(&self, mode: EnergyMode) {
        let ok = self.update(mode, |count| count.checked_add(1));
        assert!(ok, "Energy mode block count overflow");
    }

    fn unblock(&self, mode: EnergyMode) {
        let ok = self.update(mode, |count| count.checked_sub(1));
        assert!(ok, "Energy mode unblocked more often than blocked");
    }
}
