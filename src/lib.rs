#![cfg_attr(not(test), no_std)]

//! Interrupt-driven I2C master for the EFM32 Gecko I2C controller.
//!
//! A transaction writes one command byte to a slave and reads back a 16-bit
//! value, most significant byte first. [`Master::begin`] arms the transaction
//! and returns immediately; [`handle_interrupt`] must be called from the bus
//! instance's IRQ handler and walks the transaction to completion, at which
//! point the completion callback is posted to the [`Scheduler`].

#[macro_use]
mod fmt;

mod config;
mod interrupts;
mod machine;
mod master;
#[cfg(test)]
mod mock;
mod phase_holder;
mod port;
mod power;
mod reset;
mod scheduler;
pub mod si7021;
mod sink;

pub use config::{ClockRatio, OpenConfig, FREQ_FASTPLUS_MAX, FREQ_FAST_MAX, FREQ_STANDARD_MAX};
pub use interrupts::{handle_interrupt, on_ack, on_nack, on_rx_data, on_stop, InterruptBridge};
pub use machine::{advance, Action, Transition};
pub use master::{Master, Request, Transaction, SLEEP_BLOCK_MODE};
pub use phase_holder::{Step, HISTORY_SIZE};
pub use port::{BusState, Command, Flags, I2cPort};
pub use power::{EnergyMode, PowerManager, SleepBlocker};
pub use reset::{bus_reset, open};
pub use scheduler::{CallbackId, ChannelScheduler, Scheduler};
pub use sink::ResultSink;

#[cfg(feature = "dump")]
pub use master::StateDump;

/// Position of the in-flight transaction within its handshake sequence.
///
/// Each phase is named after what the master is waiting on; see
/// [`advance`] for the full transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// START and write address issued; waiting for the address ACK.
    AddressForWrite,
    /// Command byte written; waiting for its ACK.
    AddressForRead,
    /// Repeated START and read address issued; waiting for the address ACK.
    /// A NACK here is retried.
    AwaitFirstByte,
    /// Read address acknowledged; waiting for the most significant byte.
    AwaitSecondByte,
    /// Waiting for the least significant byte.
    AwaitStop,
    /// Both bytes received, NACK and STOP issued; waiting for the stop condition.
    Idle,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::AddressForWrite,
        Phase::AddressForRead,
        Phase::AwaitFirstByte,
        Phase::AwaitSecondByte,
        Phase::AwaitStop,
        Phase::Idle,
    ];
}

/// Bus-level condition raised by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Ack,
    Nack,
    RxData,
    Stop,
}

impl Event {
    /// Order in which events raised by a single interrupt are handled.
    pub const PRIORITY: [Event; 4] = [Event::Ack, Event::Nack, Event::RxData, Event::Stop];

    pub const fn flag(self) -> Flags {
        match self {
            Event::Ack => Flags::ACK,
            Event::Nack => Flags::NACK,
            Event::RxData => Flags::RXDATAV,
            Event::Stop => Flags::MSTOP,
        }
    }
}

/// One of the two I2C controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusId {
    I2c0,
    I2c1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    UnexpectedEvent { phase: Phase, event: Event },
    NoTransaction(Event),
    WrongBus { expected: BusId, actual: BusId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reason {
    BusNotIdle(BusState),
    SlotOccupied,
    Protocol(ProtocolError),
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error {
    #[cfg(feature = "dump")]
    pub dump: StateDump,
    pub reason: Reason,
}
