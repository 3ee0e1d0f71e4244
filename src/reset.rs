use crate::{Command, Flags, I2cPort, OpenConfig};

/// Forces the controller and the bus into a clean idle state.
///
/// Busy-waits for the stop condition, so it must only run during bring-up,
/// before the bus interrupt is unmasked.
pub fn bus_reset<P: I2cPort>(port: &P) {
    port.command(Command::ABORT);

    let saved = port.enabled();
    port.set_enabled(Flags::empty());
    port.clear(saved);

    port.command(Command::CLEARTX);
    port.command(Command::START | Command::STOP);

    while !port.pending().contains(Flags::MSTOP) {
        core::hint::spin_loop();
    }

    port.clear(port.pending());
    port.set_enabled(saved);
    port.command(Command::ABORT);

    trace!("bus {} reset", port.bus());
}

/// One-time bring-up: configure the peripheral, reset the bus and enable
/// the master event interrupts. Unmasking the IRQ line is left to the caller.
pub fn open<P: I2cPort>(port: &P, config: &OpenConfig) {
    assert!(config.master, "Slave mode is not supported");
    assert!(
        config.freq <= config.clock_ratio.max_frequency(),
        "Bus frequency is too high for the selected clock ratio"
    );

    port.configure(config);
    bus_reset(port);

    port.clear(Flags::MASTER_EVENTS);
    port.set_enabled(port.enabled() | Flags::MASTER_EVENTS);

    debug!("bus {} open at {} Hz", port.bus(), config.freq);
}
