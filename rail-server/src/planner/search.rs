//! Itinerary search entry point.
//!
//! Validates a request, runs direct search, and runs connection search when
//! the caller is allowed it.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{SeatClass, StationId};

use super::Timetable;
use super::config::SearchConfig;
use super::connecting::{ConnectingOption, find_connecting};
use super::direct::{DirectOption, find_direct};

/// Error from itinerary search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// A station in the request does not exist
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Request for itinerary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub source: StationId,
    pub destination: StationId,
    pub journey_date: NaiveDate,
    pub seat_class: SeatClass,

    /// Whether the caller may be offered connecting itineraries.
    pub caller_is_privileged: bool,
}

impl SearchRequest {
    /// Validate the search request against today's date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), SearchError> {
        if self.source == self.destination {
            return Err(SearchError::InvalidRequest(
                "source and destination must differ".to_string(),
            ));
        }

        if self.journey_date < today {
            return Err(SearchError::InvalidRequest(
                "journey date is in the past".to_string(),
            ));
        }

        Ok(())
    }
}

/// Result of itinerary search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Direct runs in timetable order.
    pub direct: Vec<DirectOption>,

    /// Connecting itineraries, earliest arrival first.
    pub connecting: Vec<ConnectingOption>,

    /// Whether connection search ran for this request.
    pub connections_searched: bool,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.connecting.is_empty()
    }
}

/// Itinerary planner over a timetable.
pub struct Planner<'a, T: Timetable + ?Sized> {
    timetable: &'a T,
    config: &'a SearchConfig,
}

impl<'a, T: Timetable + ?Sized> Planner<'a, T> {
    pub fn new(timetable: &'a T, config: &'a SearchConfig) -> Self {
        Self { timetable, config }
    }

    /// Search for itineraries.
    ///
    /// `today` bounds the earliest journey date accepted.
    pub fn search(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
    ) -> Result<SearchResult, SearchError> {
        request.validate(today)?;

        for station in [request.source, request.destination] {
            if self.timetable.station(station).is_none() {
                return Err(SearchError::UnknownStation(station));
            }
        }

        let direct = find_direct(
            self.timetable,
            request.source,
            request.destination,
            request.journey_date,
            request.seat_class,
        );

        let connections_searched = self.config.allows_connections(request.caller_is_privileged);
        let connecting = if connections_searched {
            find_connecting(
                self.timetable,
                request.source,
                request.destination,
                request.journey_date,
                request.seat_class,
                self.config.min_connection(),
            )
        } else {
            Vec::new()
        };

        debug!(
            source = %request.source,
            destination = %request.destination,
            date = %request.journey_date,
            class = %request.seat_class,
            direct = direct.len(),
            connecting = connecting.len(),
            "itinerary search complete"
        );

        Ok(SearchResult {
            direct,
            connecting,
            connections_searched,
        })
    }
}
