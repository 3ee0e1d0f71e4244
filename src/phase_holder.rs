use core::cell::{Ref, RefCell};

use atomic::{Atomic, Ordering};
use critical_section::{CriticalSection, Mutex};
use heapless::Deque;

use crate::{Event, Phase};

pub const HISTORY_SIZE: usize = 8;

/// An event together with the phase it moved the master into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub event: Event,
    pub phase: Phase,
}

pub struct PhaseHolder<const N: usize> {
    steps: Mutex<RefCell<Deque<Step, N>>>,
    phase: Atomic<Phase>,
}

impl<const N: usize> PhaseHolder<N> {
    pub const fn new() -> Self {
        Self {
            steps: Mutex::new(RefCell::new(Deque::new())),
            phase: Atomic::new(Phase::AddressForWrite),
        }
    }

    pub fn get(&self) -> Phase {
        self.phase.load(Ordering::SeqCst)
    }

    pub fn advance(&self, event: Event, phase: Phase) {
        self.record(Step { event, phase });
        self.phase.store(phase, Ordering::SeqCst);
    }

    /// Re-arms the holder for a new transaction, dropping the previous one's steps.
    pub fn rearm(&self) {
        critical_section::with(|cs| self.steps.borrow_ref_mut(cs).clear());
        self.phase.store(Phase::AddressForWrite, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn steps<'cs>(&'cs self, cs: CriticalSection<'cs>) -> Ref<'cs, Deque<Step, N>> {
        self.steps.borrow_ref(cs)
    }

    fn record(&self, step: Step) {
        critical_section::with(|cs| {
            let mut steps = self.steps.borrow_ref_mut(cs);
            if steps.is_full() {
                steps.pop_front();
            }
            steps.push_back(step).unwrap();
        });
    }
}
