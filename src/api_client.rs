//! The client for the transit backend's JSON API.
//!
//! Every backend endpoint answers with the same envelope,
//! `{"success": bool, "data": ..., "error": "..."}`. [ApiClient::call] never
//! fails: transport and parse errors are folded into a failed envelope so
//! that every caller handles one shape. Use [Envelope::into_data] to get a
//! `Result` for use with `?`.

use axum::http::{Method, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, record::Record};

/// Paths of the transit backend's endpoints.
pub mod paths {
    /// Passengers collection.
    pub const PASSENGERS: &str = "/api/passengers";
    /// Stations collection.
    pub const STATIONS: &str = "/api/stations";
    /// Vehicles collection.
    pub const VEHICLES: &str = "/api/vehicles";
    /// Tickets collection (read only).
    pub const TICKETS: &str = "/api/tickets";
    /// Passes collection (read only).
    pub const PASSES: &str = "/api/passes";
    /// Complaints collection.
    pub const COMPLAINTS: &str = "/api/complaints";
    /// Stored procedure that books a ticket and records its payment.
    pub const BOOK_TICKET: &str = "/api/book-ticket";
    /// Function that reports whether a seat is free.
    pub const CHECK_SEAT: &str = "/api/check-seat";
    /// Function that calculates a passenger's age. Append `/{passenger_id}`.
    pub const PASSENGER_AGE: &str = "/api/passenger-age";
    /// Stored procedure that builds the revenue report.
    pub const REVENUE_REPORT: &str = "/api/revenue-report";
    /// Bookings per day over the last 30 days.
    pub const DAILY_BOOKINGS: &str = "/api/reports/daily-bookings";
    /// The ten most booked routes.
    pub const POPULAR_ROUTES: &str = "/api/reports/popular-routes";
    /// Passengers who spend more than average.
    pub const NESTED_QUERY: &str = "/api/query/nested";
    /// Routes with their stations.
    pub const JOIN_QUERY: &str = "/api/query/join";
    /// Revenue grouped by payment method.
    pub const AGGREGATE_QUERY: &str = "/api/query/aggregate";

    /// The path of a single record in `collection`.
    pub fn record(collection: &str, id: i64) -> String {
        format!("{collection}/{id}")
    }

    /// The path for updating a complaint's status.
    pub fn complaint_status(id: i64) -> String {
        format!("{COMPLAINTS}/{id}/status")
    }

    /// The path for a passenger's age.
    pub fn passenger_age(passenger_id: i64) -> String {
        format!("{PASSENGER_AGE}/{passenger_id}")
    }
}

/// The response wrapper used by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the backend completed the request.
    pub success: bool,
    /// The payload, present on success for endpoints that return data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// A human readable message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// A failed envelope carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convert the envelope into its data.
    ///
    /// # Errors
    /// Returns [Error::Backend] if the backend reported a failure, or
    /// [Error::InvalidResponse] if it reported success without any data.
    pub fn into_data(self) -> Result<T, Error> {
        if !self.success {
            return Err(Error::Backend(
                self.error
                    .unwrap_or_else(|| "Operation failed".to_owned()),
            ));
        }

        self.data
            .ok_or_else(|| Error::InvalidResponse("the response did not include data".to_owned()))
    }

    /// Check that the backend reported success, ignoring any data.
    ///
    /// # Errors
    /// Returns [Error::Backend] if the backend reported a failure.
    pub fn into_success(self) -> Result<(), Error> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Backend(
                self.error
                    .unwrap_or_else(|| "Operation failed".to_owned()),
            ))
        }
    }
}

impl Envelope<Value> {
    /// Re-interpret the data as `T`.
    ///
    /// A failed envelope stays failed. A successful envelope whose data does
    /// not match `T` becomes a failed envelope describing the mismatch.
    pub fn decode<T: DeserializeOwned>(self) -> Envelope<T> {
        let data = match self.data.map(serde_json::from_value::<T>).transpose() {
            Ok(data) => data,
            Err(error) => {
                tracing::error!("Could not decode the transit API response: {error}");
                return Envelope::failure(format!("Unexpected response from the server: {error}"));
            }
        };

        Envelope {
            success: self.success,
            data,
            error: self.error,
        }
    }
}

/// Makes requests to the transit backend.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`, e.g. "http://127.0.0.1:5000".
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// The base URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a single request and normalize the result to an [Envelope].
    ///
    /// `body` is serialized as JSON. The JSON content type is always set.
    /// The body is parsed as an envelope whatever the HTTP status is. Network
    /// and parse failures are returned as a failed envelope; nothing is
    /// retried.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> Envelope {
        match self.send(path, method, body).await {
            Ok(envelope) => envelope,
            Err(error) => Envelope::failure(error.to_string()),
        }
    }

    /// Like [ApiClient::call], but keeps transport and parse failures apart
    /// from the envelope.
    ///
    /// # Errors
    /// Returns [Error::Transport] if the request could not be sent, or
    /// [Error::InvalidResponse] if the body was not an envelope.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<Envelope, Error> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Calling transit API: {method} {url}");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            tracing::error!("Request to {method} {url} failed: {error}");
            Error::Transport(error.to_string())
        })?;

        let status = response.status();

        let envelope = response.json::<Envelope>().await.map_err(|error| {
            tracing::error!("Could not parse response from {method} {url} ({status}): {error}");
            Error::InvalidResponse(error.to_string())
        })?;

        if !envelope.success {
            tracing::warn!(
                "Transit API reported failure for {method} {url} ({status}): {:?}",
                envelope.error
            );
        }

        Ok(envelope)
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Result<Envelope, Error> {
        self.send::<Value>(path, Method::GET, None).await
    }

    /// POST `body` to `path`.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Envelope, Error> {
        self.send(path, Method::POST, Some(body)).await
    }

    /// PUT `body` to `path`.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Envelope, Error> {
        self.send(path, Method::PUT, Some(body)).await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> Result<Envelope, Error> {
        self.send::<Value>(path, Method::DELETE, None).await
    }

    /// Fetch a collection of flat records.
    ///
    /// # Errors
    /// Returns an error if the request failed, the backend reported failure or
    /// the data was not an array of objects.
    pub async fn list(&self, path: &str) -> Result<Vec<Record>, Error> {
        self.get(path).await?.decode::<Vec<Record>>().into_data()
    }

    /// Fetch a single record, the first row of the response.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the backend returned no rows.
    pub async fn fetch_one(&self, path: &str) -> Result<Record, Error> {
        self.list(path).await?.into_iter().next().ok_or(Error::NotFound)
    }
}
