use core::sync::atomic::{AtomicU32, Ordering};

/// Destination of the two received bytes.
///
/// Only plain loads and stores are used, so this works on cores without
/// atomic read-modify-write instructions. The value must not be read until
/// the completion callback has been posted.
#[derive(Debug, Clone, Copy)]
pub struct ResultSink {
    cell: &'static AtomicU32,
}

impl ResultSink {
    pub const fn new(cell: &'static AtomicU32) -> Self {
        Self { cell }
    }

    /// Overwrites the sink with `byte` in bits 8..16.
    pub fn store_high(&self, byte: u8) {
        self.cell.store((byte as u32) << 8, Ordering::Release);
    }

    /// ORs `byte` into bits 0..8.
    pub fn merge_low(&self, byte: u8) {
        let value = self.cell.load(Ordering::Acquire) | byte as u32;
        self.cell.store(value, Ordering::Release);
    }

    pub fn get(&self) -> u32 {
        self.cell.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leak() -> ResultSink {
        ResultSink::new(Box::leak(Box::new(AtomicU32::new(0))))
    }

    #[test]
    fn high_byte_overwrites_stale_value() {
        let sink = leak();
        sink.store_high(0x12);
        sink.merge_low(0x34);
        sink.store_high(0xFF);
        sink.merge_low(0x00);
        assert_eq!(sink.get(), 0xFF00);
    }

    proptest! {
        #[test]
        fn assembles_msb_first(first in any::<u8>(), second in any::<u8>()) {
            let sink = leak();
            sink.store_high(first);
            sink.merge_low(second);
            prop_assert_eq!(sink.get(), ((first as u32) << 8) | second as u32);
        }
    }
}
