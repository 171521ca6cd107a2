//! Shared types for pingtrail-core.
//!
//! Entities plus one request/response struct per endpoint. Everything the
//! server sends is decoded into these types at the client boundary.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Server-assigned ping identifier
pub type PingId = i64;

// ─────────────────────────────────────────────────────────────────────────────
// Entity Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub code_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// User known only by primary key
    pub fn from_id(id: i64) -> Self {
        Self {
            id,
            code_name: String::new(),
            email: None,
            name: None,
        }
    }

    pub fn display_name(&self) -> String {
        if !self.code_name.is_empty() {
            return self.code_name.clone();
        }
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("user-{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub id: PingId,
    #[serde(default)]
    pub parent_ping: Option<PingId>,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "user_or_id")]
    pub user: User,
}

impl Ping {
    /// Check coordinate ranges on a decoded ping.
    pub fn validate(&self) -> Result<()> {
        check_coordinates(self.latitude, self.longitude)
            .map_err(|e| Error::Validation(format!("ping {}: {}", self.id, e)))
    }

    pub fn is_root(&self) -> bool {
        self.parent_ping.is_none()
    }
}

/// The ping serializer emits `user` either nested or as a bare primary key.
fn user_or_id<'de, D>(deserializer: D) -> std::result::Result<User, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserRepr {
        Full(User),
        Id(i64),
    }

    Ok(match UserRepr::deserialize(deserializer)? {
        UserRepr::Full(user) => user,
        UserRepr::Id(id) => User::from_id(id),
    })
}

/// A position on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinates(latitude, longitude).map_err(Error::Validation)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Simulated position, uniformly distributed and rounded to 6 decimals.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            latitude: round6(rng.gen_range(-90.0..=90.0)),
            longitude: round6(rng.gen_range(-180.0..=180.0)),
        }
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

fn check_coordinates(latitude: f64, longitude: f64) -> std::result::Result<(), String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude {} out of range", latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude {} out of range", longitude));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub code_name: String,
    pub password: String,
}

/// Login and refresh response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub user: User,
    pub access: String,
}

/// Create ping request
#[derive(Debug, Serialize)]
pub struct CreatePingRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<PingId>,
}

/// Respond to ping request
#[derive(Debug, Serialize)]
pub struct RespondRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Single ping response (create, respond)
#[derive(Debug, Deserialize)]
pub struct PingResponse {
    pub ping: Ping,
}

/// Paginated ping list
#[derive(Debug, Deserialize)]
pub struct PingPage {
    pub results: Vec<Ping>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// Latest pings response
#[derive(Debug, Deserialize)]
pub struct LatestPingsResponse {
    pub pings: Vec<Ping>,
}

/// Error envelope: `{ "error": { "code", "message", "details"? } }`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ping_decodes_nested_user() {
        let ping: Ping = serde_json::from_value(json!({
            "id": 2,
            "parent_ping": 1,
            "latitude": 12.5,
            "longitude": -45.25,
            "timestamp": "2025-06-01T10:15:00Z",
            "user": { "id": 7, "code_name": "bond007", "email": "james@mi6.gov.uk" }
        }))
        .unwrap();

        assert_eq!(ping.parent_ping, Some(1));
        assert_eq!(ping.user.code_name, "bond007");
        assert_eq!(ping.user.name, None);
        assert!(!ping.is_root());
    }

    #[test]
    fn test_ping_decodes_bare_user_id() {
        let ping: Ping = serde_json::from_value(json!({
            "id": 1,
            "parent_ping": null,
            "latitude": 0.0,
            "longitude": 0.0,
            "timestamp": "2025-06-01T10:15:00.123456+02:00",
            "user": 3
        }))
        .unwrap();

        assert_eq!(ping.user, User::from_id(3));
        assert_eq!(ping.user.display_name(), "user-3");
        assert!(ping.is_root());
    }

    #[test]
    fn test_ping_rejects_bad_timestamp() {
        let result = serde_json::from_value::<Ping>(json!({
            "id": 1,
            "latitude": 0.0,
            "longitude": 0.0,
            "timestamp": "yesterday",
            "user": 3
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_ping_validate_ranges() {
        let mut ping: Ping = serde_json::from_value(json!({
            "id": 4,
            "latitude": 91.0,
            "longitude": 0.0,
            "timestamp": "2025-06-01T10:15:00Z",
            "user": 1
        }))
        .unwrap();
        assert!(ping.validate().is_err());

        ping.latitude = 90.0;
        ping.longitude = -180.0;
        assert!(ping.validate().is_ok());
    }

    #[test]
    fn test_coordinates_random_in_range() {
        for _ in 0..200 {
            let c = Coordinates::random();
            assert!((-90.0..=90.0).contains(&c.latitude));
            assert!((-180.0..=180.0).contains(&c.longitude));
            assert_eq!(round6(c.latitude), c.latitude);
        }
    }

    #[test]
    fn test_coordinates_new_validates() {
        assert!(Coordinates::new(45.0, 120.0).is_ok());
        assert!(Coordinates::new(-90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_create_request_omits_missing_parent() {
        let body = serde_json::to_value(CreatePingRequest {
            latitude: 1.0,
            longitude: 2.0,
            parent: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "latitude": 1.0, "longitude": 2.0 }));
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let mut user = User::from_id(9);
        user.name = Some("James".into());
        assert_eq!(user.display_name(), "James");
        user.code_name = "007".into();
        assert_eq!(user.display_name(), "007");
    }
}
