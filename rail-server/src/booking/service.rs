//! Booking commit and cancellation.
//!
//! A booking is all or nothing. Every leg is validated against the network
//! first, then every leg's seat is taken from the ledger in one step. Only
//! then is the booking stored. Cancelling returns the seats to the same
//! class they were taken from.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::{
    Booking, BookingLeg, BookingStatus, Caller, Money, Passenger, Pnr, Route, Schedule,
    ScheduleId, SeatClass, SeatNumber, UserId,
};
use crate::ledger::SeatRequest;
use crate::network::Network;

use super::notify::{Confirmation, NotificationChannel, Notifier};
use super::store::BookingStore;
use super::summary::{AdminSummary, summarize};
use super::ticket::Ticket;
use super::BookingError;

/// Share of the fare returned when a refundable booking is cancelled.
const REFUND_PERCENT: i64 = 90;

/// Most legs a single booking may cover.
const MAX_LEGS: usize = 2;

/// One train the passenger wants a seat on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSelection {
    pub schedule: ScheduleId,
    pub seat: SeatNumber,
}

/// Everything needed to commit a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    /// Owner, when the passenger is signed in.
    pub user: Option<UserId>,
    pub passenger: Passenger,
    pub seat_class: SeatClass,
    pub journey_date: NaiveDate,
    /// In travel order.
    pub legs: Vec<LegSelection>,
    /// The total the passenger was shown. Committing fails if the network
    /// now prices the journey differently.
    pub expected_total_fare: Option<Money>,
}

struct ResolvedLeg {
    schedule: Arc<Schedule>,
    route: Arc<Route>,
    seat: SeatNumber,
}

/// Commits, cancels and looks up bookings against one network.
pub struct BookingService<N = NotificationChannel> {
    network: Arc<Network>,
    store: BookingStore,
    notifier: N,
}

impl<N: Notifier> BookingService<N> {
    pub fn new(network: Arc<Network>, notifier: N) -> Self {
        Self {
            network,
            store: BookingStore::new(),
            notifier,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Commit a booking and send the passenger a confirmation.
    ///
    /// A failed confirmation is logged; the booking stands.
    pub async fn book(
        &self,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<Booking, BookingError> {
        let booking = self.commit(request, today)?;

        let confirmation = Confirmation::for_booking(&booking);
        if let Err(e) = self.notifier.send_confirmation(&confirmation).await {
            warn!(pnr = %booking.pnr, error = %e, "failed to send booking confirmation");
        }

        Ok(booking)
    }

    /// Validate, reserve seats and store a confirmed booking.
    ///
    /// Nothing changes unless every leg can be booked.
    pub fn commit(&self, request: BookingRequest, today: NaiveDate) -> Result<Booking, BookingError> {
        let legs = self.resolve(&request, today)?;

        let total_fare: Money = legs.iter().map(|leg| leg.route.fare()).sum();
        if let Some(expected) = request.expected_total_fare
            && expected != total_fare
        {
            return Err(BookingError::validation(format!(
                "expected total fare {expected} does not match current fare {total_fare}"
            )));
        }

        let seats: Vec<_> = legs
            .iter()
            .map(|leg| SeatRequest::one(leg.schedule.id, request.seat_class))
            .collect();
        self.network.ledger().reserve_all(&seats).map_err(|e| {
            warn!(error = %e, class = %request.seat_class, "booking refused");
            BookingError::from(e)
        })?;

        let booked_legs: Vec<BookingLeg> = legs
            .into_iter()
            .enumerate()
            .map(|(index, leg)| BookingLeg {
                sequence: (index + 1) as u8,
                schedule: leg.schedule.id,
                route: leg.route.id,
                seat: leg.seat,
                fare: leg.route.fare(),
            })
            .collect();

        let booking = self.store.insert_with(|pnr| Booking {
            pnr,
            user: request.user,
            passenger: request.passenger,
            booked_at: Utc::now(),
            journey_date: request.journey_date,
            status: BookingStatus::Confirmed,
            seat_class: request.seat_class,
            total_fare,
            is_refundable: true,
            cancelled_at: None,
            refund_amount: None,
            legs: booked_legs,
        });

        info!(
            pnr = %booking.pnr,
            legs = booking.legs.len(),
            class = %booking.seat_class,
            journey_date = %booking.journey_date,
            total_fare = %booking.total_fare,
            "booking confirmed"
        );

        Ok(booking)
    }

    /// Cancel a confirmed booking, refund it and release its seats.
    pub fn cancel(&self, pnr: &Pnr, caller: &Caller) -> Result<Booking, BookingError> {
        let ledger = self.network.ledger();

        self.store
            .update(pnr, |booking| {
                if !caller.may_manage(booking) {
                    return Err(BookingError::Unauthorized(booking.pnr.clone()));
                }
                if booking.status != BookingStatus::Confirmed {
                    return Err(BookingError::validation(format!(
                        "booking {} is not confirmed",
                        booking.pnr
                    )));
                }

                // Every seat must go back before the booking changes state.
                if let Some(leg) = booking
                    .legs
                    .iter()
                    .find(|leg| ledger.snapshot(leg.schedule).is_none())
                {
                    return Err(BookingError::NotFound(format!("schedule {}", leg.schedule)));
                }
                let seats: Vec<_> = booking
                    .legs
                    .iter()
                    .map(|leg| SeatRequest::one(leg.schedule, booking.seat_class))
                    .collect();
                ledger.release_all(&seats)?;

                let refund = if booking.is_refundable {
                    booking.total_fare.percent(REFUND_PERCENT)
                } else {
                    Money::ZERO
                };
                booking.status = BookingStatus::Cancelled;
                booking.cancelled_at = Some(Utc::now());
                booking.refund_amount = Some(refund);

                info!(pnr = %booking.pnr, refund = %refund, "booking cancelled");
                Ok(booking.clone())
            })
            .ok_or_else(|| BookingError::NotFound(format!("booking {pnr}")))?
    }

    pub fn get(&self, pnr: &Pnr) -> Result<Booking, BookingError> {
        self.store
            .get(pnr)
            .ok_or_else(|| BookingError::NotFound(format!("booking {pnr}")))
    }

    /// Bookings owned by `user`, most recent first.
    pub fn bookings_for(&self, user: &UserId) -> Vec<Booking> {
        self.store.owned_by(user)
    }

    /// Printable details of a booking.
    pub fn ticket(&self, pnr: &Pnr) -> Result<Ticket, BookingError> {
        let booking = self.get(pnr)?;
        Ticket::assemble(&booking, &self.network)
    }

    pub fn summary(&self) -> AdminSummary {
        summarize(&self.network, &self.store.snapshot())
    }

    fn resolve(
        &self,
        request: &BookingRequest,
        today: NaiveDate,
    ) -> Result<Vec<ResolvedLeg>, BookingError> {
        request
            .passenger
            .validate()
            .map_err(BookingError::validation)?;

        if request.journey_date < today {
            return Err(BookingError::validation("journey date is in the past"));
        }
        if request.legs.is_empty() || request.legs.len() > MAX_LEGS {
            return Err(BookingError::validation(format!(
                "a booking covers 1 to {MAX_LEGS} legs, got {}",
                request.legs.len()
            )));
        }

        let mut resolved: Vec<ResolvedLeg> = Vec::with_capacity(request.legs.len());
        for selection in &request.legs {
            let schedule = self
                .network
                .schedule(selection.schedule)
                .ok_or_else(|| BookingError::NotFound(format!("schedule {}", selection.schedule)))?;
            let route = self
                .network
                .route(schedule.route)
                .ok_or_else(|| BookingError::NotFound(format!("route {}", schedule.route)))?;

            if !schedule.is_active || !route.is_active {
                return Err(BookingError::validation(format!(
                    "schedule {} is not in service",
                    schedule.id
                )));
            }
            if !schedule.runs_on(request.journey_date) {
                return Err(BookingError::validation(format!(
                    "schedule {} does not run on {}",
                    schedule.id, request.journey_date
                )));
            }
            if let Some(previous) = resolved.last()
                && previous.route.destination != route.source
            {
                return Err(BookingError::validation(
                    "each leg must start where the previous one ends",
                ));
            }

            resolved.push(ResolvedLeg {
                schedule: Arc::clone(schedule),
                route: Arc::clone(route),
                seat: selection.seat.clone(),
            });
        }

        Ok(resolved)
    }
}
