//! Data models and structures
//!
//! Defines the marketplace listing kinds, dashboard roles, structured
//! price ranges, sweep reports, and environment configuration.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The three listing tables that carry inline photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Product,
    Service,
    House,
}

impl ListingKind {
    pub const ALL: [ListingKind; 3] = [ListingKind::Product, ListingKind::Service, ListingKind::House];

    /// Backend table name for this listing kind.
    pub fn table(&self) -> &'static str {
        match self {
            ListingKind::Product => "products",
            ListingKind::Service => "services",
            ListingKind::House => "houses",
        }
    }

    /// Dashboard role that owns listings of this kind.
    pub fn owner_role(&self) -> Role {
        match self {
            ListingKind::Product => Role::Seller,
            ListingKind::Service => Role::ServiceProvider,
            ListingKind::House => Role::Landlord,
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Account role, dispatched once instead of scattered boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Seller,
    Landlord,
    ServiceProvider,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role may manage listings of the given kind.
    pub fn can_manage(&self, kind: ListingKind) -> bool {
        self.is_admin() || *self == kind.owner_role()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Guest => "guest",
            Role::Seller => "seller",
            Role::Landlord => "landlord",
            Role::ServiceProvider => "service_provider",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "seller" => Ok(Role::Seller),
            "landlord" => Ok(Role::Landlord),
            "service_provider" => Ok(Role::ServiceProvider),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Generic(format!("Unknown role: {}", other))),
        }
    }
}

/// Structured replacement for the legacy free-text price column.
///
/// `min == max` represents a fixed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::Price(format!("Non-finite bounds: {}..{}", min, max)));
        }
        if min < 0.0 {
            return Err(Error::Price(format!("Negative lower bound: {}", min)));
        }
        if min > max {
            return Err(Error::Price(format!("Inverted range: {}..{}", min, max)));
        }
        Ok(Self { min, max })
    }

    pub fn single(value: f64) -> Result<Self> {
        Self::new(value, value)
    }

    /// Parse a legacy listing price like `"KSh 3500"` or `"5000-7000 per month"`.
    ///
    /// Takes the first one or two numeric substrings in the text. No
    /// numeric content at all is a parse failure.
    pub fn parse_legacy(text: &str) -> Result<Self> {
        static NUMBER: OnceLock<Regex> = OnceLock::new();
        let number = NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

        let mut values = number.find_iter(text).take(2).map(|m| {
            m.as_str()
                .parse::<f64>()
                .map_err(|e| Error::Price(format!("Bad numeric group '{}': {}", m.as_str(), e)))
        });

        match (values.next().transpose()?, values.next().transpose()?) {
            (Some(first), Some(second)) => Self::new(first.min(second), first.max(second)),
            (Some(only), None) => Self::single(only),
            _ => Err(Error::Price(format!("No numeric content in '{}'", text))),
        }
    }
}

/// Outcome of one batch over a listing table, in the shape the admin
/// console renders (processed count plus per-row errors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub table: String,
    pub processed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl SweepReport {
    pub fn new(kind: ListingKind) -> Self {
        Self {
            table: kind.table().to_string(),
            processed: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub service_key: String,
    pub role: Role,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        // The service key implies admin privileges, matching the hosted
        // batch functions; MARKET_ROLE narrows it for local testing.
        let role = match std::env::var("MARKET_ROLE") {
            Ok(value) => value.parse()?,
            Err(_) => Role::Admin,
        };

        Ok(Self {
            api_url: std::env::var("MARKET_API_URL")
                .map_err(|_| crate::Error::Generic("MARKET_API_URL not set".to_string()))?,
            service_key: std::env::var("MARKET_SERVICE_KEY")
                .map_err(|_| crate::Error::Generic("MARKET_SERVICE_KEY not set".to_string()))?,
            role,
            dry_run: std::env::var("DRY_RUN")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listing_kind_serialization() {
        let json = serde_json::to_string(&ListingKind::House).unwrap();
        assert_eq!(json, "\"house\"");

        let deserialized: ListingKind = serde_json::from_str("\"product\"").unwrap();
        assert_eq!(deserialized, ListingKind::Product);
        assert_eq!(deserialized.table(), "products");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Service_Provider ".parse::<Role>().unwrap(), Role::ServiceProvider);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_can_manage() {
        assert!(Role::Seller.can_manage(ListingKind::Product));
        assert!(!Role::Seller.can_manage(ListingKind::House));
        assert!(Role::Landlord.can_manage(ListingKind::House));
        assert!(Role::ServiceProvider.can_manage(ListingKind::Service));
        assert!(!Role::Guest.can_manage(ListingKind::Product));

        for kind in ListingKind::ALL {
            assert!(Role::Admin.can_manage(kind));
        }
    }

    #[test]
    fn test_parse_legacy_single_price() {
        let range = PriceRange::parse_legacy("KSh 3500").unwrap();
        assert_eq!(range, PriceRange { min: 3500.0, max: 3500.0 });

        let range = PriceRange::parse_legacy("KSh 4500.50 negotiable").unwrap();
        assert_eq!(range, PriceRange { min: 4500.5, max: 4500.5 });
    }

    #[test]
    fn test_parse_legacy_range() {
        let range = PriceRange::parse_legacy("5000-7000 per month").unwrap();
        assert_eq!(range, PriceRange { min: 5000.0, max: 7000.0 });

        // Bounds are normalized regardless of the order they appear in.
        let range = PriceRange::parse_legacy("between 7000 and 5000").unwrap();
        assert_eq!(range, PriceRange { min: 5000.0, max: 7000.0 });
    }

    #[test]
    fn test_parse_legacy_rejects_text_without_numbers() {
        let err = PriceRange::parse_legacy("call for price").unwrap_err();
        assert!(matches!(err, Error::Price(_)));
    }

    #[test]
    fn test_price_range_invariants() {
        assert!(PriceRange::new(100.0, 50.0).is_err());
        assert!(PriceRange::new(-1.0, 50.0).is_err());
        assert!(PriceRange::new(f64::NAN, 50.0).is_err());
        assert!(PriceRange::new(50.0, 50.0).is_ok());
    }

    #[test]
    fn test_sweep_report_serialization() {
        let mut report = SweepReport::new(ListingKind::Service);
        report.processed = 3;
        report.errors.push("bad row".to_string());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"table\":\"services\""));
        assert!(json.contains("\"processed\":3"));
    }
}
