use crate::{
    advance, master::SLEEP_BLOCK_MODE, Action, Command, Event, I2cPort, Phase, PowerManager,
    ProtocolError, Reason, Scheduler, Transaction,
};

/// State the interrupt handlers operate on.
pub trait InterruptBridge {
    fn get_phase(&self) -> Phase;

    fn set_phase(&self, event: Event, phase: Phase);

    fn transaction(&self) -> Option<Transaction>;

    /// Empties the slot, handing the transaction back.
    fn take_transaction(&self) -> Option<Transaction>;

    fn fail(&self, reason: Reason) -> !;
}

/// Top half for one bus instance's IRQ.
///
/// Reads the pending and enabled flags, clears them, then runs the handler
/// of each asserted event in the order ACK, NACK, RXDATAV, MSTOP.
pub fn handle_interrupt<B, P, S, M>(bridge: &B, port: &P, scheduler: &S, power: &M)
where
    B: InterruptBridge,
    P: I2cPort,
    S: Scheduler,
    M: PowerManager,
{
    let flags = port.pending() & port.enabled();
    port.clear(flags);

    for event in flags.events() {
        match event {
            Event::Ack => on_ack(bridge, port, scheduler, power),
            Event::Nack => on_nack(bridge, port, scheduler, power),
            Event::RxData => on_rx_data(bridge, port, scheduler, power),
            Event::Stop => on_stop(bridge, port, scheduler, power),
        }
    }
}

pub fn on_ack<B, P, S, M>(bridge: &B, port: &P, scheduler: &S, power: &M)
where
    B: InterruptBridge,
    P: I2cPort,
    S: Scheduler,
    M: PowerManager,
{
    step(bridge, port, scheduler, power, Event::Ack)
}

pub fn on_nack<B, P, S, M>(bridge: &B, port: &P, scheduler: &S, power: &M)
where
    B: InterruptBridge,
    P: I2cPort,
    S: Scheduler,
    M: PowerManager,
{
    step(bridge, port, scheduler, power, Event::Nack)
}

pub fn on_rx_data<B, P, S, M>(bridge: &B, port: &P, scheduler: &S, power: &M)
where
    B: InterruptBridge,
    P: I2cPort,
    S: Scheduler,
    M: PowerManager,
{
    step(bridge, port, scheduler, power, Event::RxData)
}

pub fn on_stop<B, P, S, M>(bridge: &B, port: &P, scheduler: &S, power: &M)
where
    B: InterruptBridge,
    P: I2cPort,
    S: Scheduler,
    M: PowerManager,
{
    step(bridge, port, scheduler, power, Event::Stop)
}

fn step<B, P, S, M>(bridge: &B, port: &P, scheduler: &S, power: &M, event: Event)
where
    B: InterruptBridge,
    P: I2cPort,
    S: Scheduler,
    M: PowerManager,
{
    let Some(transaction) = bridge.transaction() else {
        return bridge.fail(Reason::Protocol(ProtocolError::NoTransaction(event)));
    };

    if transaction.bus != port.bus() {
        abort(
            bridge,
            power,
            ProtocolError::WrongBus {
                expected: transaction.bus,
                actual: port.bus(),
            },
        );
    }

    let phase = bridge.get_phase();
    let transition = match advance(phase, event) {
        Ok(transition) => transition,
        Err(err) => abort(bridge, power, err),
    };

    trace!("{} in {}: {} -> {}", event, phase, transition.action, transition.next);
    bridge.set_phase(event, transition.next);

    match transition.action {
        Action::SendCommand => port.write_tx(transaction.command),
        Action::StartRead => {
            if event == Event::Nack {
                warn!("read address {} not acknowledged, retrying", transaction.address);
            }
            port.command(Command::START);
            port.write_tx(transaction.read_address());
        }
        Action::Wait => {}
        Action::ReadHigh => {
            transaction.sink.store_high(port.read_rx());
            port.command(Command::ACK);
        }
        Action::ReadLow => {
            transaction.sink.merge_low(port.read_rx());
            port.command(Command::NACK);
            port.command(Command::STOP);
        }
        Action::Complete => {
            bridge.take_transaction();
            power.unblock(SLEEP_BLOCK_MODE);
            scheduler.post(transaction.callback);
            debug!("transaction on {} complete", transaction.bus);
        }
    }
}

/// Drops the in-flight transaction and its sleep block, then halts.
fn abort<B: InterruptBridge, M: PowerManager>(bridge: &B, power: &M, err: ProtocolError) -> ! {
    if bridge.take_transaction().is_some() {
        power.unblock(SLEEP_BLOCK_MODE);
    }

    bridge.fail(Reason::Protocol(err))
}
