//! At-most-one in-flight storage check per (wallet, network) pair.
//!
//! Two concurrent repairs racing on the same partition could interleave
//! stale min/max reads with each other's writes, so a second attempt must
//! fail fast instead of queueing.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::wallet::AvailableNetwork;

#[derive(Default)]
pub(crate) struct SingleFlight {
    keys: Mutex<HashSet<(String, AvailableNetwork)>>,
}

impl SingleFlight {
    /// Returns a guard if no check is running for this key, `None` otherwise.
    /// The slot frees itself when the guard drops.
    pub(crate) fn try_acquire(
        &self,
        wallet: &str,
        network: AvailableNetwork,
    ) -> Option<FlightGuard<'_>> {
        let mut keys = match self.keys.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if keys.insert((wallet.to_string(), network)) {
            Some(FlightGuard {
                flight: self,
                key: (wallet.to_string(), network),
            })
        } else {
            None
        }
    }
}

pub(crate) struct FlightGuard<'a> {
    flight: &'a SingleFlight,
    key: (String, AvailableNetwork),
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut keys = match self.flight.keys.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        keys.remove(&self.key);
    }
}
