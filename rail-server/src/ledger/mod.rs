//! Per-schedule seat availability.
//!
//! The ledger owns every live seat counter. Callers never read a counter and
//! write it back: each mutation is a single check-and-update performed while
//! the ledger's lock is held, so two bookings racing for the last seat cannot
//! both succeed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::domain::{ClassCapacity, ScheduleId, SeatClass};

/// Errors from ledger mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The schedule has no counters in this ledger.
    #[error("no seat counters for schedule {0}")]
    UnknownSchedule(ScheduleId),

    /// Fewer seats remain than were requested.
    #[error(
        "not enough {class} seats on schedule {schedule}: requested {requested}, available {available}"
    )]
    Exhausted {
        schedule: ScheduleId,
        class: SeatClass,
        requested: u32,
        available: u32,
    },
}

/// A request to hold seats in one class on one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRequest {
    pub schedule: ScheduleId,
    pub class: SeatClass,
    pub count: u32,
}

impl SeatRequest {
    pub fn one(schedule: ScheduleId, class: SeatClass) -> Self {
        Self {
            schedule,
            class,
            count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Counters {
    available: ClassCapacity,
    capacity: ClassCapacity,
}

/// Live seat counters for every schedule.
///
/// Every counter stays within `0..=capacity` for its class.
#[derive(Debug, Default)]
pub struct AvailabilityLedger {
    counters: Mutex<HashMap<ScheduleId, Counters>>,
}

impl AvailabilityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a schedule.
    ///
    /// `initial` is clamped to `capacity`; any existing counters for the
    /// schedule are replaced.
    pub fn register(&self, schedule: ScheduleId, capacity: ClassCapacity, initial: ClassCapacity) {
        let counters = Counters {
            available: initial.clamped_to(&capacity),
            capacity,
        };
        self.lock().insert(schedule, counters);
    }

    /// Seats currently available; 0 for an unknown schedule.
    pub fn get_available(&self, schedule: ScheduleId, class: SeatClass) -> u32 {
        self.lock()
            .get(&schedule)
            .map(|c| c.available.get(class))
            .unwrap_or(0)
    }

    /// All counters of one schedule.
    pub fn snapshot(&self, schedule: ScheduleId) -> Option<ClassCapacity> {
        self.lock().get(&schedule).map(|c| c.available)
    }

    /// The class capacity counters are bounded by.
    pub fn capacity(&self, schedule: ScheduleId, class: SeatClass) -> u32 {
        self.lock()
            .get(&schedule)
            .map(|c| c.capacity.get(class))
            .unwrap_or(0)
    }

    /// Take `count` seats, failing without change if fewer remain.
    ///
    /// Returns the seats left afterwards.
    pub fn reserve(
        &self,
        schedule: ScheduleId,
        class: SeatClass,
        count: u32,
    ) -> Result<u32, LedgerError> {
        let mut guard = self.lock();
        take(&mut guard, SeatRequest {
            schedule,
            class,
            count,
        })
    }

    /// Return `count` seats, never exceeding the class capacity.
    ///
    /// Returns the seats available afterwards.
    pub fn release(
        &self,
        schedule: ScheduleId,
        class: SeatClass,
        count: u32,
    ) -> Result<u32, LedgerError> {
        let mut guard = self.lock();
        give_back(&mut guard, SeatRequest {
            schedule,
            class,
            count,
        })
    }

    /// Take seats for every request, or for none of them.
    ///
    /// Requests are applied in order under one lock. If any fails, those
    /// already applied are returned before the error is reported.
    pub fn reserve_all(&self, requests: &[SeatRequest]) -> Result<(), LedgerError> {
        let mut guard = self.lock();

        for (applied, request) in requests.iter().enumerate() {
            if let Err(err) = take(&mut guard, *request) {
                for done in requests[..applied].iter().rev() {
                    // Just taken under this same lock, so the schedule exists.
                    let _ = give_back(&mut guard, *done);
                }
                warn!(error = %err, "seat reservation rolled back");
                return Err(err);
            }
        }

        Ok(())
    }

    /// Return seats for every request.
    ///
    /// Unknown schedules are reported after all known ones have been
    /// released.
    pub fn release_all(&self, requests: &[SeatRequest]) -> Result<(), LedgerError> {
        let mut guard = self.lock();
        let mut first_error = None;

        for request in requests {
            if let Err(err) = give_back(&mut guard, *request) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Number of schedules tracked.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ScheduleId, Counters>> {
        // Every update completes before the guard drops, so a poisoned map
        // still holds consistent counters.
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn take(
    counters: &mut HashMap<ScheduleId, Counters>,
    request: SeatRequest,
) -> Result<u32, LedgerError> {
    let entry = counters
        .get_mut(&request.schedule)
        .ok_or(LedgerError::UnknownSchedule(request.schedule))?;
    let slot = entry.available.get_mut(request.class);

    if request.count > *slot {
        return Err(LedgerError::Exhausted {
            schedule: request.schedule,
            class: request.class,
            requested: request.count,
            available: *slot,
        });
    }

    *slot -= request.count;
    debug!(
        schedule = %request.schedule,
        class = %request.class,
        remaining = *slot,
        "seats reserved"
    );
    Ok(*slot)
}

fn give_back(
    counters: &mut HashMap<ScheduleId, Counters>,
    request: SeatRequest,
) -> Result<u32, LedgerError> {
    let entry = counters
        .get_mut(&request.schedule)
        .ok_or(LedgerError::UnknownSchedule(request.schedule))?;
    let capacity = entry.capacity.get(request.class);
    let slot = entry.available.get_mut(request.class);

    *slot = slot.saturating_add(request.count).min(capacity);
    debug!(
        schedule = %request.schedule,
        class = %request.class,
        available = *slot,
        "seats released"
    );
    Ok(*slot)
}
