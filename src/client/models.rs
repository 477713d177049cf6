//! Airport API models

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Airport record as returned by the upstream API.
///
/// Records are never mutated after fetch; a refetch replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// Upstream record ID
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// IATA code (uniqueness key, case-insensitive)
    #[serde(default, deserialize_with = "lenient_string")]
    pub iata_code: String,

    /// ICAO code
    #[serde(default, deserialize_with = "lenient_string")]
    pub icao_code: String,

    /// Airport name
    #[serde(default, deserialize_with = "lenient_string")]
    pub airport_name: String,

    /// IATA code of the served city
    #[serde(default, deserialize_with = "lenient_string")]
    pub city_iata_code: String,

    /// Country name
    #[serde(default, deserialize_with = "lenient_string")]
    pub country_name: String,

    /// ISO 3166-1 alpha-2 country code
    #[serde(default, deserialize_with = "lenient_string")]
    pub country_iso2: String,

    /// GeoNames ID
    #[serde(default, deserialize_with = "lenient_string")]
    pub geoname_id: String,

    /// Latitude in decimal degrees
    #[serde(default, deserialize_with = "lenient_string")]
    pub latitude: String,

    /// Longitude in decimal degrees
    #[serde(default, deserialize_with = "lenient_string")]
    pub longitude: String,

    /// IANA timezone name
    #[serde(default, deserialize_with = "lenient_string")]
    pub timezone: String,

    /// GMT offset in hours, e.g. `-5` or `5.5`
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub gmt: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub phone_number: Option<String>,
}

impl Airport {
    /// Case-insensitive IATA comparison
    pub fn has_iata(&self, code: &str) -> bool {
        self.iata_code.eq_ignore_ascii_case(code)
    }

    /// Parse the GMT offset into a fixed offset.
    ///
    /// Accepts fractional hours (`5.5`, `-3.5`) and `H:MM` forms (`+5:30`).
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        let raw = self.gmt.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        let (sign, body) = match raw.as_bytes()[0] {
            b'-' => (-1, &raw[1..]),
            b'+' => (1, &raw[1..]),
            _ => (1, raw),
        };

        let seconds = if let Some((h, m)) = body.split_once(':') {
            let hours: i32 = h.parse().ok()?;
            let minutes: i32 = m.parse().ok()?;
            hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?
        } else {
            let hours: f64 = body.parse().ok()?;
            (hours * 3600.0).round() as i32
        };

        // Out-of-range values are rejected by `east_opt`
        FixedOffset::east_opt(seconds.checked_mul(sign)?)
    }

    /// Current local time at the airport, derived from the GMT offset
    pub fn local_time(&self, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        self.utc_offset().map(|offset| now.with_timezone(&offset))
    }

    /// OpenStreetMap link centred on the airport
    pub fn map_url(&self) -> Option<String> {
        let lat: f64 = self.latitude.trim().parse().ok()?;
        let lon: f64 = self.longitude.trim().parse().ok()?;
        Some(format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=14/{lat}/{lon}"
        ))
    }
}

/// Upstream pagination descriptor (not the local UI pagination)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
}

/// Airports payload envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportResponse {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub data: Vec<Airport>,
}

/// Entry of the search history recency list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    pub iata_code: String,
    pub airport_name: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Upstream fields arrive as strings, numbers or null depending on the record.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
