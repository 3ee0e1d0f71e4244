use core::cell::RefCell;

use critical_section::Mutex;

use crate::{
    interrupts::InterruptBridge, phase_holder::PhaseHolder, BusId, BusState, CallbackId, Command,
    EnergyMode, Error, Event, HISTORY_SIZE, I2cPort, Phase, PowerManager, Reason, ResultSink,
};

#[cfg(feature = "dump")]
use crate::Step;

/// Mode kept blocked while a transaction is on the bus; the controller's
/// clock stops below it.
pub const SLEEP_BLOCK_MODE: EnergyMode = EnergyMode::Em2;

#[derive(Debug, Clone, Copy)]
#[cfg(feature = "dump")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub steps: [Option<Step>; HISTORY_SIZE],
    pub current_phase: Phase,
}

/// What the caller wants from the slave.
#[derive(Debug, Clone, Copy)]
pub struct Request {
    /// 7-bit slave address.
    pub address: u8,
    /// Byte written before the read phase.
    pub command: u8,
    pub sink: ResultSink,
    pub callback: CallbackId,
}

/// The in-flight transaction.
#[derive(Debug, Clone, Copy)]
pub struct Transaction {
    pub bus: BusId,
    pub address: u8,
    pub command: u8,
    pub sink: ResultSink,
    pub callback: CallbackId,
}

impl Transaction {
    pub const fn write_address(&self) -> u8 {
        self.address << 1
    }

    pub const fn read_address(&self) -> u8 {
        (self.address << 1) | 1
    }
}

/// Transaction slot for one bus instance.
///
/// Place one in a `static` per controller and pass it to both
/// [`Master::begin`] and that controller's [`handle_interrupt`](crate::handle_interrupt).
pub struct Master {
    phase: PhaseHolder<HISTORY_SIZE>,
    slot: Mutex<RefCell<Option<Transaction>>>,
}

impl Master {
    pub const fn new() -> Self {
        Self {
            phase: PhaseHolder::new(),
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn is_busy(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }

    /// Starts a transaction and returns immediately.
    ///
    /// The bus must be idle and no other transaction may be in flight on this
    /// slot; either violation halts. Completion is signalled by posting
    /// `request.callback` to the scheduler.
    pub fn begin<P: I2cPort, M: PowerManager>(&self, port: &P, power: &M, request: Request) {
        assert!(
            request.address <= 0x7F,
            "Slave address is out of range. 10-bit addresses are not supported."
        );

        let state = port.state();
        if state != BusState::Idle {
            self.fail(Reason::BusNotIdle(state));
        }

        let transaction = Transaction {
            bus: port.bus(),
            address: request.address,
            command: request.command,
            sink: request.sink,
            callback: request.callback,
        };

        let installed = critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if slot.is_some() {
                false
            } else {
                *slot = Some(transaction);
                true
            }
        });

        if !installed {
            self.fail(Reason::SlotOccupied);
        }

        self.phase.rearm();
        power.block(SLEEP_BLOCK_MODE);

        debug!(
            "begin on {}: slave {}, command {}",
            transaction.bus, transaction.address, transaction.command
        );

        port.command(Command::START);
        port.write_tx(transaction.write_address());
    }

    #[cfg(feature = "dump")]
    pub fn dump_state(&self) -> StateDump {
        let mut steps = [None; HISTORY_SIZE];

        critical_section::with(|cs| {
            for (dst, step) in steps.iter_mut().zip(self.phase.steps(cs).iter()) {
                *dst = Some(*step);
            }
        });

        StateDump {
            steps,
            current_phase: self.phase(),
        }
    }
}

impl Default for Master {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptBridge for Master {
    fn get_phase(&self) -> Phase {
        self.phase.get()
    }

    fn set_phase(&self, event: Event, phase: Phase) {
        self.phase.advance(event, phase)
    }

    fn transaction(&self) -> Option<Transaction> {
        critical_section::with(|cs| *self.slot.borrow_ref(cs))
    }

    fn take_transaction(&self) -> Option<Transaction> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    fn fail(&self, reason: Reason) -> ! {
        let error = Error {
            #[cfg(feature = "dump")]
            dump: self.dump_state(),
            reason,
        };

        error!("I2C master fault: {}", error);
        panic!("I2C master fault: {:?}", error)
    }
}
