//! Display model implementations for table and JSON output

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::DetailTab;
use crate::client::{Airport, SearchHistoryItem};
use crate::output::format_timestamp_local;

/// Placeholder for fields the upstream left empty
const MISSING: &str = "-";

fn or_missing(value: &str) -> String {
    if value.trim().is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}

/// Truncate string to max characters with ellipsis
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Airport row for list output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AirportDisplay {
    #[tabled(rename = "IATA")]
    pub iata_code: String,

    #[tabled(rename = "ICAO")]
    pub icao_code: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "CITY")]
    pub city: String,

    #[tabled(rename = "COUNTRY")]
    pub country: String,
}

impl From<&Airport> for AirportDisplay {
    fn from(airport: &Airport) -> Self {
        Self {
            iata_code: or_missing(&airport.iata_code),
            icao_code: or_missing(&airport.icao_code),
            name: truncate_string(&or_missing(&airport.airport_name), 48),
            city: or_missing(&airport.city_iata_code),
            country: or_missing(&airport.country_name),
        }
    }
}

/// Search history row.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct HistoryDisplay {
    #[tabled(rename = "IATA")]
    pub iata_code: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "VIEWED")]
    pub viewed: String,
}

impl From<&SearchHistoryItem> for HistoryDisplay {
    fn from(item: &SearchHistoryItem) -> Self {
        Self {
            iata_code: item.iata_code.clone(),
            name: item.airport_name.clone(),
            viewed: format_timestamp_local(item.timestamp),
        }
    }
}

/// One labelled value of the detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    fn new(label: &'static str, value: impl AsRef<str>) -> Self {
        Self {
            label,
            value: or_missing(value.as_ref()),
        }
    }
}

/// Airport detail view, split into the general/location/timezone tabs.
#[derive(Debug, Clone, Serialize)]
pub struct AirportDetail {
    pub iata_code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub general: Vec<DetailField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<DetailField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timezone: Vec<DetailField>,
}

impl AirportDetail {
    /// Build the sections selected by `tab`, with local time as of `now`.
    pub fn new(airport: &Airport, tab: DetailTab, now: DateTime<Utc>) -> Self {
        let general = if tab.shows(DetailTab::General) {
            vec![
                DetailField::new("IATA code", &airport.iata_code),
                DetailField::new("ICAO code", &airport.icao_code),
                DetailField::new("City (IATA)", &airport.city_iata_code),
                DetailField::new("Country", &airport.country_name),
                DetailField::new("Country code", &airport.country_iso2),
                DetailField::new("Phone", airport.phone_number.as_deref().unwrap_or("")),
            ]
        } else {
            Vec::new()
        };

        let location = if tab.shows(DetailTab::Location) {
            vec![
                DetailField::new("Latitude", &airport.latitude),
                DetailField::new("Longitude", &airport.longitude),
                DetailField::new("GeoNames ID", &airport.geoname_id),
                DetailField::new("Map", airport.map_url().unwrap_or_default()),
            ]
        } else {
            Vec::new()
        };

        let timezone = if tab.shows(DetailTab::Timezone) {
            let local_time = airport
                .local_time(now)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            vec![
                DetailField::new("Time zone", &airport.timezone),
                DetailField::new("GMT offset", airport.gmt.as_deref().unwrap_or("")),
                DetailField::new("Local time", local_time),
            ]
        } else {
            Vec::new()
        };

        Self {
            iata_code: airport.iata_code.clone(),
            name: airport.airport_name.clone(),
            general,
            location,
            timezone,
        }
    }

    /// Non-empty sections with their titles
    pub fn sections(&self) -> Vec<(&'static str, &[DetailField])> {
        [
            ("General", self.general.as_slice()),
            ("Location", self.location.as_slice()),
            ("Timezone", self.timezone.as_slice()),
        ]
        .into_iter()
        .filter(|(_, fields)| !fields.is_empty())
        .collect()
    }
}
