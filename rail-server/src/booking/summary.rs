//! Operator dashboard figures.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Booking, BookingStatus, Money, RouteId};
use crate::network::Network;

/// How many routes the dashboard ranks.
const TOP_ROUTES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteUsage {
    pub route: RouteId,
    pub train_number: String,
    pub source: String,
    pub destination: String,
    /// Booking legs on this route, cancelled bookings included.
    pub legs_booked: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSummary {
    pub total_trains: usize,
    pub total_stations: usize,
    pub total_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    /// Sum of confirmed bookings' fares.
    pub total_revenue: Money,
    pub top_routes: Vec<RouteUsage>,
}

pub(crate) fn summarize(network: &Network, bookings: &[Booking]) -> AdminSummary {
    let with_status =
        |status: BookingStatus| bookings.iter().filter(move |b| b.status == status);

    let mut legs_per_route: HashMap<RouteId, usize> = HashMap::new();
    for leg in bookings.iter().flat_map(|b| &b.legs) {
        *legs_per_route.entry(leg.route).or_default() += 1;
    }

    let mut ranked: Vec<_> = legs_per_route.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let top_routes = ranked
        .into_iter()
        .filter_map(|(id, legs_booked)| {
            let route = network.route(id)?;
            let code = |station| network.station(station).map(|s| s.code.to_string());
            Some(RouteUsage {
                route: id,
                train_number: network.train(route.train)?.number.to_string(),
                source: code(route.source)?,
                destination: code(route.destination)?,
                legs_booked,
            })
        })
        .take(TOP_ROUTES)
        .collect();

    AdminSummary {
        total_trains: network.trains().len(),
        total_stations: network.stations().len(),
        total_bookings: bookings.len(),
        confirmed_bookings: with_status(BookingStatus::Confirmed).count(),
        cancelled_bookings: with_status(BookingStatus::Cancelled).count(),
        total_revenue: with_status(BookingStatus::Confirmed)
            .map(|b| b.total_fare)
            .sum(),
        top_routes,
    }
}
