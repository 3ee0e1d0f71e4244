use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel};

/// Identifier posted to the scheduler when a transaction completes.
pub type CallbackId = u32;

/// Cooperative task scheduler. `post` must not block and must be callable
/// from interrupt context.
pub trait Scheduler {
    fn post(&self, callback: CallbackId);
}

pub type CallbackChannel<const N: usize> = channel::Channel<CriticalSectionRawMutex, CallbackId, N>;

/// Scheduler backed by a bounded channel of callback identifiers.
pub struct ChannelScheduler<const N: usize> {
    channel: CallbackChannel<N>,
}

impl<const N: usize> ChannelScheduler<N> {
    pub const fn new() -> Self {
        Self {
            channel: CallbackChannel::new(),
        }
    }

    pub fn try_next(&self) -> Option<CallbackId> {
        self.channel.try_receive().ok()
    }

    pub async fn next(&self) -> CallbackId {
        self.channel.receive().await
    }
}

impl<const N: usize> Default for ChannelScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Scheduler for ChannelScheduler<N> {
    fn post(&self, callback: CallbackId) {
        trace!("posting callback {}", callback);
        self.channel
            .try_send(callback)
            .expect("Scheduler queue is full")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_come_out_in_post_order() {
        let scheduler = ChannelScheduler::<4>::new();
        scheduler.post(7);
        scheduler.post(42);

        assert_eq!(scheduler.try_next(), Some(7));
        assert_eq!(scheduler.try_next(), Some(42));
        assert_eq!(scheduler.try_next(), None);
    }

    #[test]
    #[should_panic(expected = "Scheduler queue is full")]
    fn overflowing_the_queue_is_fatal() {
        let scheduler = ChannelScheduler::<1>::new();
        scheduler.post(1);
        scheduler.post(2);
    }
}
