//! In-memory booking records.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Booking, Pnr, UserId};

/// Bookings keyed by PNR.
///
/// PNRs are drawn at random and checked against every stored booking,
/// cancelled ones included, so none is ever issued twice.
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: RwLock<HashMap<Pnr, Booking>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the booking built for a fresh PNR and return a copy of it.
    pub fn insert_with<F>(&self, build: F) -> Booking
    where
        F: FnOnce(Pnr) -> Booking,
    {
        let mut bookings = self.write();
        let mut rng = rand::thread_rng();
        let pnr = loop {
            let candidate = Pnr::generate(&mut rng);
            if !bookings.contains_key(&candidate) {
                break candidate;
            }
        };

        let booking = build(pnr.clone());
        bookings.insert(pnr, booking.clone());
        booking
    }

    pub fn get(&self, pnr: &Pnr) -> Option<Booking> {
        self.read().get(pnr).cloned()
    }

    /// Run `f` on a stored booking while holding the write lock.
    pub fn update<R>(&self, pnr: &Pnr, f: impl FnOnce(&mut Booking) -> R) -> Option<R> {
        self.write().get_mut(pnr).map(f)
    }

    /// Bookings owned by `user`, most recent first.
    pub fn owned_by(&self, user: &UserId) -> Vec<Booking> {
        let mut owned: Vec<_> = self
            .read()
            .values()
            .filter(|b| b.user.as_ref() == Some(user))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.booked_at.cmp(&a.booked_at).then_with(|| a.pnr.cmp(&b.pnr)));
        owned
    }

    /// Copies of every booking, in no particular order.
    pub fn snapshot(&self) -> Vec<Booking> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Pnr, Booking>> {
        self.bookings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Pnr, Booking>> {
        self.bookings.write().unwrap_or_else(PoisonError::into_inner)
    }
}
