use bitflags::bitflags;

use crate::{BusId, Event, OpenConfig};

bitflags! {
    /// Bits of the controller's command register. Several commands may be
    /// issued by a single write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Command: u8 {
        const START = 1 << 0;
        const STOP = 1 << 1;
        const ACK = 1 << 2;
        const NACK = 1 << 3;
        const ABORT = 1 << 5;
        const CLEARTX = 1 << 6;
    }
}

bitflags! {
    /// Interrupt flag bits, shared by the flag, enable and clear registers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        const RXDATAV = 1 << 5;
        const ACK = 1 << 6;
        const NACK = 1 << 7;
        const MSTOP = 1 << 8;
        const ARBLOST = 1 << 9;
        const BUSERR = 1 << 10;

        /// Every flag the master state machine reacts to.
        const MASTER_EVENTS = Self::ACK.bits()
            | Self::NACK.bits()
            | Self::RXDATAV.bits()
            | Self::MSTOP.bits();
    }
}

impl Flags {
    /// Events asserted in this set, in dispatch priority order.
    pub fn events(self) -> impl Iterator<Item = Event> {
        Event::PRIORITY
            .into_iter()
            .filter(move |event| self.contains(event.flag()))
    }
}

/// Coarse view of the controller's bus state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    Idle,
    Busy,
}

/// Register-level access to one I2C controller.
///
/// All methods take `&self`: they stand for volatile register accesses and
/// are called from both thread and interrupt context.
pub trait I2cPort {
    fn bus(&self) -> BusId;

    /// Write the command register.
    fn command(&self, cmd: Command);

    fn write_tx(&self, byte: u8);

    fn read_rx(&self) -> u8;

    fn state(&self) -> BusState;

    /// Raw interrupt flags, enabled or not.
    fn pending(&self) -> Flags;

    fn enabled(&self) -> Flags;

    /// Replace the interrupt enable mask.
    fn set_enabled(&self, flags: Flags);

    /// Clear the given interrupt flags.
    fn clear(&self, flags: Flags);

    /// Clock, route and frequency setup for the peripheral.
    fn configure(&self, config: &OpenConfig);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_follow_priority_order() {
        let flags = Flags::MSTOP | Flags::RXDATAV | Flags::ACK;
        let events: Vec<_> = flags.events().collect();
        assert_eq!(events, [Event::Ack, Event::RxData, Event::Stop]);
    }

    #[test]
    fn unrelated_flags_yield_no_events() {
        assert_eq!((Flags::ARBLOST | Flags::BUSERR).events().count(), 0);
    }

    #[test]
    fn combined_command_contains_both() {
        let cmd = Command::START | Command::STOP;
        assert!(cmd.contains(Command::START));
        assert!(cmd.contains(Command::STOP));
        assert!(!cmd.contains(Command::ABORT));
        assert_eq!(cmd.bits(), 0b11);
    }
}
