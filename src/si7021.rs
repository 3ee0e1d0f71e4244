//! Si7021 relative humidity sensor.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::{CallbackId, I2cPort, Master, OpenConfig, PowerManager, Request, ResultSink};

pub const ADDRESS: u8 = 0x40;

/// Measure relative humidity, no hold master mode.
pub const MEASURE_RH_NO_HOLD: u8 = 0xF5;

pub struct Si7021 {
    raw: AtomicU32,
}

impl Si7021 {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU32::new(0),
        }
    }

    /// Fastest mode the sensor supports (400 kHz max).
    pub const fn open_config(sda_route: u8, scl_route: u8) -> OpenConfig {
        OpenConfig::new(sda_route, scl_route).fast()
    }

    pub fn open<P: I2cPort>(port: &P, sda_route: u8, scl_route: u8) {
        crate::open(port, &Self::open_config(sda_route, scl_route))
    }

    /// Starts a humidity measurement. `callback` is posted once [`Self::humidity`]
    /// holds the new value.
    pub fn read<P: I2cPort, M: PowerManager>(
        &'static self,
        master: &Master,
        port: &P,
        power: &M,
        callback: CallbackId,
    ) {
        master.begin(
            port,
            power,
            Request {
                address: ADDRESS,
                command: MEASURE_RH_NO_HOLD,
                sink: ResultSink::new(&self.raw),
                callback,
            },
        )
    }

    pub fn raw(&self) -> u16 {
        self.raw.load(Ordering::Acquire) as u16
    }

    /// Last measured relative humidity in %RH.
    pub fn humidity(&self) -> f32 {
        relative_humidity(self.raw())
    }
}

impl Default for Si7021 {
    fn default() -> Self {
        Self::new()
    }
}

pub fn relative_humidity(raw: u16) -> f32 {
    125.0 * raw as f32 / 65536.0 - 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPort, Op};
    use crate::{handle_interrupt, BusId, ChannelScheduler, Command, Flags, SleepBlocker};

    #[test]
    fn conversion() {
        assert_eq!(relative_humidity(0), -6.0);
        assert!((relative_humidity(0x309A) - 17.7312).abs() < 1e-3);
        assert!((relative_humidity(0xFFFF) - 118.998).abs() < 1e-3);
    }

    #[test]
    fn read_fills_humidity() {
        let sensor: &'static Si7021 = Box::leak(Box::new(Si7021::new()));
        let master = Master::new();
        let port = MockPort::new(BusId::I2c0);
        let scheduler = ChannelScheduler::<2>::new();
        let power = SleepBlocker::new();

        Si7021::open(&port, 15, 15);
        port.take_ops();

        sensor.read(&master, &port, &power, 0x10);
        assert_eq!(port.take_ops(), [Op::Command(Command::START), Op::Write(ADDRESS << 1)]);

        let fire = |flags| {
            port.raise(flags);
            handle_interrupt(&master, &port, &scheduler, &power);
        };

        fire(Flags::ACK);
        assert_eq!(port.take_ops(), [Op::Write(MEASURE_RH_NO_HOLD)]);
        fire(Flags::ACK);
        fire(Flags::ACK);
        port.push_rx(0x6B);
        fire(Flags::RXDATAV);
        port.push_rx(0x8E);
        fire(Flags::RXDATAV);
        fire(Flags::MSTOP);

        assert_eq!(scheduler.try_next(), Some(0x10));
        assert_eq!(sensor.raw(), 0x6B8E);
        assert!((sensor.humidity() - relative_humidity(0x6B8E)).abs() < f32::EPSILON);
    }
}
