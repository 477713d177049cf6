//! Test fixtures and builders for airport model types
//!
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use super::models::{Airport, AirportResponse, Pagination};

/// Builder for creating test Airport instances.
///
/// # Example
/// ```ignore
/// let bog = AirportBuilder::new("BOG")
///     .name("El Dorado International Airport")
///     .gmt("-5")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AirportBuilder {
    airport: Airport,
}

impl AirportBuilder {
    /// Create a new builder with the given IATA code.
    pub fn new(iata: impl Into<String>) -> Self {
        let iata = iata.into();
        Self {
            airport: Airport {
                id: format!("id-{}", iata),
                icao_code: format!("K{}", iata),
                airport_name: format!("{} International Airport", iata),
                city_iata_code: iata.clone(),
                country_name: "Testland".to_string(),
                country_iso2: "TL".to_string(),
                geoname_id: "0".to_string(),
                latitude: "0.0".to_string(),
                longitude: "0.0".to_string(),
                timezone: "UTC".to_string(),
                gmt: Some("0".to_string()),
                phone_number: None,
                iata_code: iata,
            },
        }
    }

    /// Set the airport name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.airport.airport_name = name.into();
        self
    }

    /// Set the GMT offset string.
    pub fn gmt(mut self, gmt: impl Into<String>) -> Self {
        self.airport.gmt = Some(gmt.into());
        self
    }

    /// Set latitude and longitude.
    pub fn coordinates(mut self, lat: impl Into<String>, lon: impl Into<String>) -> Self {
        self.airport.latitude = lat.into();
        self.airport.longitude = lon.into();
        self
    }

    /// Set the phone number.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.airport.phone_number = Some(phone.into());
        self
    }

    /// Build the Airport.
    pub fn build(self) -> Airport {
        self.airport
    }
}

/// El Dorado, Bogotá
pub fn bog() -> Airport {
    AirportBuilder::new("BOG")
        .name("El Dorado International Airport")
        .gmt("-5")
        .coordinates("4.701594", "-74.146947")
        .phone("+57 1 266 2000")
        .build()
}

/// John F. Kennedy, New York
pub fn jfk() -> Airport {
    AirportBuilder::new("JFK")
        .name("John F Kennedy International")
        .gmt("-5")
        .coordinates("40.642334", "-73.78817")
        .build()
}

/// `count` airports with distinct generated codes (`A00`, `A01`, ...).
pub fn numbered_airports(count: usize) -> Vec<Airport> {
    (0..count)
        .map(|i| {
            AirportBuilder::new(format!("A{:02}", i))
                .name(format!("Airport Number {}", i))
                .build()
        })
        .collect()
}

/// Wrap airports in a response envelope the way the upstream reports it.
pub fn response(data: Vec<Airport>) -> AirportResponse {
    let count = data.len() as u64;
    AirportResponse {
        pagination: Pagination {
            limit: 10_000,
            offset: 0,
            count,
            total: count,
        },
        data,
    }
}
