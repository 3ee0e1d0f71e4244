/// Highest standard-mode frequency reachable with [`ClockRatio::Standard`].
pub const FREQ_STANDARD_MAX: u32 = 93_000;
/// Highest fast-mode frequency reachable with [`ClockRatio::Asymmetric`].
pub const FREQ_FAST_MAX: u32 = 392_157;
/// Highest fast-mode-plus frequency reachable with [`ClockRatio::Fast`].
pub const FREQ_FASTPLUS_MAX: u32 = 987_167;

/// SCL low/high period ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRatio {
    /// 4:4
    Standard,
    /// 6:3
    Asymmetric,
    /// 11:6
    Fast,
}

impl ClockRatio {
    pub const fn max_frequency(self) -> u32 {
        match self {
            ClockRatio::Standard => FREQ_STANDARD_MAX,
            ClockRatio::Asymmetric => FREQ_FAST_MAX,
            ClockRatio::Fast => FREQ_FASTPLUS_MAX,
        }
    }
}

/// Peripheral setup handed to [`I2cPort::configure`](crate::I2cPort::configure)
/// by [`open`](crate::open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpenConfig {
    pub enable: bool,
    pub master: bool,
    /// Reference clock in Hz, `None` to use the currently configured one.
    pub ref_freq: Option<u32>,
    pub freq: u32,
    pub clock_ratio: ClockRatio,
    pub sda_route: u8,
    pub scl_route: u8,
    pub sda_enable: bool,
    pub scl_enable: bool,
}

impl OpenConfig {
    pub const fn new(sda_route: u8, scl_route: u8) -> Self {
        Self {
            enable: true,
            master: true,
            ref_freq: None,
            freq: FREQ_STANDARD_MAX,
            clock_ratio: ClockRatio::Standard,
            sda_route,
            scl_route,
            sda_enable: true,
            scl_enable: true,
        }
    }

    pub const fn fast(mut self) -> Self {
        self.freq = FREQ_FAST_MAX;
        self.clock_ratio = ClockRatio::Asymmetric;
        self
    }

    /// Value of the route location register.
    pub const fn route_location(&self) -> u32 {
        ((self.scl_route as u32) << 8) | self.sda_route as u32
    }

    /// Value of the route pin enable register.
    pub const fn route_enable(&self) -> u32 {
        ((self.scl_enable as u32) << 1) | self.sda_enable as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_registers() {
        let config = OpenConfig::new(15, 14);
        assert_eq!(config.route_location(), (14 << 8) | 15);
        assert_eq!(config.route_enable(), 0b11);

        let config = OpenConfig {
            sda_enable: false,
            ..config
        };
        assert_eq!(config.route_enable(), 0b10);
    }

    #[test]
    fn fast_mode_uses_asymmetric_ratio() {
        let config = OpenConfig::new(0, 0).fast();
        assert_eq!(config.clock_ratio, ClockRatio::Asymmetric);
        assert_eq!(config.freq, ClockRatio::Asymmetric.max_frequency());
    }
}
