//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::booking::{BookingError, BookingRequest, LegSelection};
use crate::domain::{Caller, Pnr, ScheduleId, SeatNumber, StationCode, StationId, UserId};
use crate::planner::{Planner, SearchError, SearchRequest};

use super::dto::*;
use super::state::AppState;

/// Header naming the signed-in user, set by the fronting auth layer.
const USER_HEADER: &str = "x-user-id";

/// Header marking the caller as staff.
const STAFF_HEADER: &str = "x-staff";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations/search", get(search_stations))
        .route("/api/search", post(search_itineraries))
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/:pnr", get(get_booking))
        .route("/api/bookings/:pnr/ticket", get(get_ticket))
        .route("/api/bookings/:pnr/cancel", post(cancel_booking))
        .route("/api/me/bookings", get(my_bookings))
        .route("/api/admin/summary", get(admin_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Identify the caller from the auth layer's headers.
fn caller_from_headers(headers: &HeaderMap) -> Caller {
    let user = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| UserId(v.to_string()));
    let is_staff = headers
        .get(STAFF_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

    Caller { user, is_staff }
}

/// Parse a JSON body, logging it when it cannot be read.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "rejected JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn parse_pnr(raw: &str) -> Result<Pnr, AppError> {
    Pnr::parse(raw).map_err(|e| AppError::BadRequest {
        message: format!("Invalid PNR {raw}: {e}"),
    })
}

fn resolve_station(state: &AppState, station: &StationRef) -> Result<StationId, AppError> {
    match station {
        StationRef::Id(id) => state
            .network
            .station(StationId(*id))
            .map(|s| s.id)
            .ok_or_else(|| AppError::NotFound {
                message: format!("Unknown station: {id}"),
            }),
        StationRef::Code(raw) => {
            let code = StationCode::parse_normalized(raw).map_err(|_| AppError::BadRequest {
                message: format!("Invalid station code: {raw}"),
            })?;
            state
                .network
                .station_by_code(&code)
                .map(|s| s.id)
                .ok_or_else(|| AppError::NotFound {
                    message: format!("Unknown station: {code}"),
                })
        }
    }
}

/// Search stations by name or code.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stations = state
        .network
        .search_stations(&req.q, limit)
        .iter()
        .map(|s| StationSearchResult::from_station(s))
        .collect();

    Json(StationSearchResponse { stations })
}

/// Search direct and, for signed-in callers, connecting itineraries.
async fn search_itineraries(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SearchItinerariesResponse>, AppError> {
    let req: SearchItinerariesRequest = parse_json(&body)?;
    let caller = caller_from_headers(&headers);

    let request = SearchRequest {
        source: resolve_station(&state, &req.source)?,
        destination: resolve_station(&state, &req.destination)?,
        journey_date: req.journey_date,
        seat_class: req.seat_class,
        caller_is_privileged: caller.is_authenticated(),
    };

    let planner = Planner::new(&*state.network, &*state.config);
    let result = planner.search(&request, today())?;

    let network = &state.network;
    Ok(Json(SearchItinerariesResponse {
        direct: result
            .direct
            .iter()
            .map(|o| DirectResult::from_option(network, o))
            .collect(),
        connecting: result
            .connecting
            .iter()
            .map(|o| ConnectingResult::from_option(network, o))
            .collect(),
        connections_searched: result.connections_searched,
    }))
}

/// Commit a booking for one or two legs.
async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CreateBookingRequest = parse_json(&body)?;
    let caller = caller_from_headers(&headers);

    let legs = req
        .legs
        .iter()
        .map(|leg| {
            let seat = SeatNumber::parse(&leg.seat_number).map_err(|e| AppError::BadRequest {
                message: format!("Invalid seat number {}: {e}", leg.seat_number),
            })?;
            Ok(LegSelection {
                schedule: ScheduleId(leg.schedule_id),
                seat,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let request = BookingRequest {
        user: caller.user,
        passenger: req.passenger,
        seat_class: req.seat_class,
        journey_date: req.journey_date,
        legs,
        expected_total_fare: req.expected_total_fare,
    };

    let booking = state.bookings.book(request, today()).await?;
    Ok((StatusCode::CREATED, Json(booking)).into_response())
}

/// Look up a booking by PNR.
async fn get_booking(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Response, AppError> {
    let booking = state.bookings.get(&parse_pnr(&pnr)?)?;
    Ok(Json(booking).into_response())
}

/// Ticket details for the renderer.
async fn get_ticket(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Response, AppError> {
    let ticket = state.bookings.ticket(&parse_pnr(&pnr)?)?;
    Ok(Json(ticket).into_response())
}

async fn cancel_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(pnr): Path<String>,
) -> Result<Response, AppError> {
    let caller = caller_from_headers(&headers);
    let booking = state.bookings.cancel(&parse_pnr(&pnr)?, &caller)?;
    Ok(Json(booking).into_response())
}

/// Bookings owned by the signed-in caller.
async fn my_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(user) = caller_from_headers(&headers).user else {
        return Err(AppError::Forbidden {
            message: "Sign in to see your bookings".to_string(),
        });
    };
    Ok(Json(state.bookings.bookings_for(&user)).into_response())
}

/// Operator dashboard figures; staff only.
async fn admin_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !caller_from_headers(&headers).is_staff {
        return Err(AppError::Forbidden {
            message: "Staff access required".to_string(),
        });
    }
    Ok(Json(state.bookings.summary()).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SearchError::UnknownStation(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        let message = e.to_string();
        match e {
            BookingError::NotFound(_) => AppError::NotFound { message },
            BookingError::Validation(_) => AppError::BadRequest { message },
            BookingError::AvailabilityExhausted { .. } => AppError::Conflict { message },
            BookingError::Unauthorized(_) => AppError::Forbidden { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
