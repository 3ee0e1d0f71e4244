use crate::{Event, Phase, ProtocolError};

/// Bus work to perform for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Write the command byte.
    SendCommand,
    /// Repeated START, then the read address.
    StartRead,
    /// Nothing to issue; the slave clocks out the first byte on its own.
    Wait,
    /// Store RXDATA as the high byte and ACK it.
    ReadHigh,
    /// Merge RXDATA as the low byte, then NACK and STOP.
    ReadLow,
    /// Release the sleep block, post the callback and retire the transaction.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub next: Phase,
    pub action: Action,
}

/// Transition table of the master.
///
/// | phase           | event  | action      | next            |
/// |-----------------|--------|-------------|-----------------|
/// | AddressForWrite | Ack    | SendCommand | AddressForRead  |
/// | AddressForRead  | Ack    | StartRead   | AwaitFirstByte  |
/// | AwaitFirstByte  | Ack    | Wait        | AwaitSecondByte |
/// | AwaitFirstByte  | Nack   | StartRead   | AwaitFirstByte  |
/// | AwaitSecondByte | RxData | ReadHigh    | AwaitStop       |
/// | AwaitStop       | RxData | ReadLow     | Idle            |
/// | Idle            | Stop   | Complete    | AddressForWrite |
///
/// Every other pair is a protocol violation.
pub fn advance(phase: Phase, event: Event) -> Result<Transition, ProtocolError> {
    let (next, action) = match (phase, event) {
        (Phase::AddressForWrite, Event::Ack) => (Phase::AddressForRead, Action::SendCommand),
        (Phase::AddressForRead, Event::Ack) => (Phase::AwaitFirstByte, Action::StartRead),
        (Phase::AwaitFirstByte, Event::Ack) => (Phase::AwaitSecondByte, Action::Wait),
        (Phase::AwaitFirstByte, Event::Nack) => (Phase::AwaitFirstByte, Action::StartRead),
        (Phase::AwaitSecondByte, Event::RxData) => (Phase::AwaitStop, Action::ReadHigh),
        (Phase::AwaitStop, Event::RxData) => (Phase::Idle, Action::ReadLow),
        (Phase::Idle, Event::Stop) => (Phase::AddressForWrite, Action::Complete),
        (phase, event) => return Err(ProtocolError::UnexpectedEvent { phase, event }),
    };

    Ok(Transition { next, action })
}
