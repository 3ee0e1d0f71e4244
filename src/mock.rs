//! Recording I2C port for host tests.

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use crate::{BusId, BusState, Command, Flags, I2cPort, OpenConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Command(Command),
    Write(u8),
}

/// Records every command and transmit write, and lets tests raise
/// interrupt flags and queue received bytes.
pub struct MockPort {
    bus: BusId,
    state: Cell<BusState>,
    ops: RefCell<Vec<Op>>,
    rx: RefCell<VecDeque<u8>>,
    pending: Cell<Flags>,
    enabled: Cell<Flags>,
    config: Cell<Option<OpenConfig>>,
    auto_stop: Cell<bool>,
}

impl MockPort {
    pub fn new(bus: BusId) -> Self {
        Self {
            bus,
            state: Cell::new(BusState::Idle),
            ops: RefCell::new(Vec::new()),
            rx: RefCell::new(VecDeque::new()),
            pending: Cell::new(Flags::empty()),
            enabled: Cell::new(Flags::empty()),
            config: Cell::new(None),
            auto_stop: Cell::new(true),
        }
    }

    pub fn set_state(&self, state: BusState) {
        self.state.set(state);
    }

    /// Whether START together with STOP raises MSTOP on its own.
    pub fn set_auto_stop(&self, enabled: bool) {
        self.auto_stop.set(enabled);
    }

    pub fn raise(&self, flags: Flags) {
        self.pending.set(self.pending.get() | flags);
    }

    pub fn push_rx(&self, byte: u8) {
        self.rx.borrow_mut().push_back(byte);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn take_ops(&self) -> Vec<Op> {
        self.ops.take()
    }

    pub fn config(&self) -> Option<OpenConfig> {
        self.config.get()
    }
}

impl I2cPort for MockPort {
    fn bus(&self) -> BusId {
        self.bus
    }

    fn command(&self, cmd: Command) {
        self.ops.borrow_mut().push(Op::Command(cmd));
        // START and STOP together force a stop condition on the bus.
        if self.auto_stop.get() && cmd.contains(Command::START | Command::STOP) {
            self.raise(Flags::MSTOP);
        }
    }

    fn write_tx(&self, byte: u8) {
        self.ops.borrow_mut().push(Op::Write(byte));
    }

    fn read_rx(&self) -> u8 {
        self.rx
            .borrow_mut()
            .pop_front()
            .expect("RXDATA read with nothing received")
    }

    fn state(&self) -> BusState {
        self.state.get()
    }

    fn pending(&self) -> Flags {
        self.pending.get()
    }

    fn enabled(&self) -> Flags {
        self.enabled.get()
    }

    fn set_enabled(&self, flags: Flags) {
        self.enabled.set(flags);
    }

    fn clear(&self, flags: Flags) {
        self.pending.set(self.pending.get().difference(flags));
    }

    fn configure(&self, config: &OpenConfig) {
        self.config.set(Some(*config));
    }
}
