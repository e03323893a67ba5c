//! Booking confirmation notifications.
//!
//! Sending a confirmation is best effort: the booking is already committed
//! when a notifier runs, and a failure is only logged.

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::info;

use crate::domain::{Booking, Money, Pnr};

/// What a passenger is told once a booking is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub email: String,
    pub passenger_name: String,
    pub pnr: Pnr,
    pub journey_date: NaiveDate,
    pub seat_class_label: String,
    pub total_fare: Money,
}

impl Confirmation {
    pub fn for_booking(booking: &Booking) -> Self {
        Self {
            email: booking.passenger.email.clone(),
            passenger_name: booking.passenger.name.clone(),
            pnr: booking.pnr.clone(),
            journey_date: booking.journey_date,
            seat_class_label: booking.seat_class.label().to_string(),
            total_fare: booking.total_fare,
        }
    }

    pub fn subject(&self) -> String {
        format!("Booking Confirmed - PNR: {}", self.pnr)
    }
}

/// Errors from delivering a confirmation.
#[derive(Debug)]
pub enum NotifyError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// The receiving endpoint answered with a non-success status
    Status(u16),

    /// The configured API key cannot be sent as a header
    InvalidApiKey,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Http(e) => write!(f, "HTTP error: {e}"),
            NotifyError::Status(status) => write!(f, "notification endpoint returned {status}"),
            NotifyError::InvalidApiKey => write!(f, "invalid notification API key"),
        }
    }
}

impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifyError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err)
    }
}

/// Delivers booking confirmations to passengers.
pub trait Notifier: Send + Sync {
    fn send_confirmation(
        &self,
        confirmation: &Confirmation,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Writes confirmations to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError> {
        info!(
            to = %confirmation.email,
            pnr = %confirmation.pnr,
            journey_date = %confirmation.journey_date,
            class = %confirmation.seat_class_label,
            total_fare = %confirmation.total_fare,
            subject = %confirmation.subject(),
            "booking confirmation"
        );
        Ok(())
    }
}

/// Configuration for the webhook notifier.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint that receives each confirmation as a JSON POST
    pub url: String,
    /// Sent as `x-apikey` when present
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout_secs: 10,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Posts confirmations to an HTTP endpoint, such as a mail relay.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| NotifyError::InvalidApiKey)?;
            headers.insert("x-apikey", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for WebhookNotifier {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError> {
        let response = self.http.post(&self.url).json(confirmation).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        Ok(())
    }
}

/// The notifier chosen at startup.
#[derive(Debug, Clone)]
pub enum NotificationChannel {
    Log(LogNotifier),
    Webhook(WebhookNotifier),
}

impl Default for NotificationChannel {
    fn default() -> Self {
        NotificationChannel::Log(LogNotifier)
    }
}

impl Notifier for NotificationChannel {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError> {
        match self {
            NotificationChannel::Log(n) => n.send_confirmation(confirmation).await,
            NotificationChannel::Webhook(n) => n.send_confirmation(confirmation).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, Gender, Passenger, SeatClass};
    use chrono::Utc;

    fn booking() -> Booking {
        Booking {
            pnr: Pnr::parse("AB12CD34EF").unwrap(),
            user: None,
            passenger: Passenger {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: String::new(),
                age: 30,
                gender: Gender::Female,
            },
            booked_at: Utc::now(),
            journey_date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            status: BookingStatus::Confirmed,
            seat_class: SeatClass::Ac3Tier,
            total_fare: Money::from_minor(82950),
            is_refundable: true,
            cancelled_at: None,
            refund_amount: None,
            legs: Vec::new(),
        }
    }

    #[test]
    fn confirmation_carries_booking_details() {
        let confirmation = Confirmation::for_booking(&booking());

        assert_eq!(confirmation.email, "asha@example.com");
        assert_eq!(confirmation.seat_class_label, "AC 3-Tier");
        assert_eq!(confirmation.subject(), "Booking Confirmed - PNR: AB12CD34EF");

        let json = serde_json::to_value(&confirmation).unwrap();
        assert_eq!(json["journey_date"], "2024-03-18");
        assert_eq!(json["total_fare"], "829.50");
        assert_eq!(json["pnr"], "AB12CD34EF");
    }

    #[tokio::test]
    async fn log_notifier_succeeds() {
        let confirmation = Confirmation::for_booking(&booking());
        assert!(LogNotifier.send_confirmation(&confirmation).await.is_ok());
        assert!(
            NotificationChannel::default()
                .send_confirmation(&confirmation)
                .await
                .is_ok()
        );
    }

    #[test]
    fn webhook_rejects_unprintable_api_key() {
        let config = WebhookConfig::new("http://127.0.0.1:9/hook").with_api_key("bad\nkey");
        assert!(matches!(
            WebhookNotifier::new(config),
            Err(NotifyError::InvalidApiKey)
        ));
    }

    #[tokio::test]
    async fn webhook_failure_is_reported() {
        // Nothing listens on the discard port.
        let config = WebhookConfig::new("http://127.0.0.1:9/hook").with_timeout(2);
        let notifier = WebhookNotifier::new(config).unwrap();
        assert_eq!(notifier.url(), "http://127.0.0.1:9/hook");

        let result = notifier
            .send_confirmation(&Confirmation::for_booking(&booking()))
            .await;
        assert!(matches!(result, Err(NotifyError::Http(_))));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            NotifyError::Status(503).to_string(),
            "notification endpoint returned 503"
        );
        assert_eq!(
            NotifyError::InvalidApiKey.to_string(),
            "invalid notification API key"
        );
    }
}
