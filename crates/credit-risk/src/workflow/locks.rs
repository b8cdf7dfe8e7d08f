use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::customers::CustomerId;

type Slots = Arc<Mutex<HashMap<CustomerId, Arc<AsyncMutex<()>>>>>;

/// Per-customer mutual exclusion: one lease per customer id at a time, leases for different
/// customers never wait on each other.
#[derive(Debug, Default, Clone)]
pub struct CustomerLocks {
    slots: Slots,
}

impl CustomerLocks {
    pub async fn acquire(&self, id: &CustomerId) -> CustomerLease {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(id.clone()).or_default())
        };

        let guard = slot.lock_owned().await;
        CustomerLease {
            id: id.clone(),
            slots: Arc::clone(&self.slots),
            _guard: guard,
        }
    }

    /// Number of customers with a held or awaited lease.
    pub fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive right to transition one customer. Released on drop.
#[derive(Debug)]
pub struct CustomerLease {
    id: CustomerId,
    slots: Slots,
    _guard: OwnedMutexGuard<()>,
}

impl CustomerLease {
    pub fn customer_id(&self) -> &CustomerId {
        &self.id
    }
}

impl Drop for CustomerLease {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // The map and this lease's guard are the only owners when nobody is waiting.
        let idle = slots
            .get(&self.id)
            .map(|slot| Arc::strong_count(slot) <= 2)
            .unwrap_or(false);
        if idle {
            slots.remove(&self.id);
        }
    }
}
