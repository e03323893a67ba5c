//! Ticket documents.
//!
//! A [`Ticket`] gathers everything a renderer needs to print a booking.
//! Rendering itself happens elsewhere.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Booking, BookingStatus, Money, Pnr, format_hhmm};
use crate::network::Network;

use super::BookingError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketLeg {
    pub sequence: u8,
    pub train_number: String,
    pub train_name: String,
    pub from: String,
    pub to: String,
    /// `HH:MM`
    pub departure: String,
    /// `HH:MM`
    pub arrival: String,
    pub class_label: String,
    pub seat: String,
    pub fare: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub pnr: Pnr,
    pub status: BookingStatus,
    pub booked_on: NaiveDate,
    pub journey_date: NaiveDate,
    pub passenger_name: String,
    pub passenger_age: u8,
    pub passenger_gender: String,
    pub passenger_email: String,
    pub legs: Vec<TicketLeg>,
    pub total_fare: Money,
}

impl Ticket {
    /// Resolve a booking's legs against the network.
    pub fn assemble(booking: &Booking, network: &Network) -> Result<Self, BookingError> {
        let legs = booking
            .legs
            .iter()
            .map(|leg| {
                let schedule = network
                    .schedule(leg.schedule)
                    .ok_or_else(|| BookingError::NotFound(format!("schedule {}", leg.schedule)))?;
                let route = network
                    .route(leg.route)
                    .ok_or_else(|| BookingError::NotFound(format!("route {}", leg.route)))?;
                let train = network
                    .train(route.train)
                    .ok_or_else(|| BookingError::NotFound(format!("train {}", route.train)))?;
                let station_code = |id| {
                    network
                        .station(id)
                        .map(|s| s.code.to_string())
                        .ok_or_else(|| BookingError::NotFound(format!("station {id}")))
                };

                Ok(TicketLeg {
                    sequence: leg.sequence,
                    train_number: train.number.to_string(),
                    train_name: train.name.clone(),
                    from: station_code(route.source)?,
                    to: station_code(route.destination)?,
                    departure: format_hhmm(schedule.departure),
                    arrival: format_hhmm(schedule.arrival),
                    class_label: booking.seat_class.label().to_string(),
                    seat: leg.seat.to_string(),
                    fare: leg.fare,
                })
            })
            .collect::<Result<Vec<_>, BookingError>>()?;

        Ok(Ticket {
            pnr: booking.pnr.clone(),
            status: booking.status,
            booked_on: booking.booked_at.date_naive(),
            journey_date: booking.journey_date,
            passenger_name: booking.passenger.name.clone(),
            passenger_age: booking.passenger.age,
            passenger_gender: booking.passenger.gender.label().to_string(),
            passenger_email: booking.passenger.email.clone(),
            legs,
            total_fare: booking.total_fare,
        })
    }
}
