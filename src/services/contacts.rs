//! Emergency contact list

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Someone to notify when an alert is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
}

impl EmergencyContact {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Public emergency services used when no personal contacts are configured
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Polícia Militar", "190"),
            Self::new("Bombeiros", "193"),
            Self::new("SAMU", "192"),
            Self::new("Delegacia da Mulher", "180"),
        ]
    }
}

impl fmt::Display for EmergencyContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.number)
    }
}

/// Parses `NAME=NUMBER`
impl FromStr for EmergencyContact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, number) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=NUMBER, got '{}'", s))?;
        let (name, number) = (name.trim(), number.trim());

        if name.is_empty() {
            return Err("contact name must not be empty".to_string());
        }
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || "+-() ".contains(c)) {
            return Err(format!("invalid phone number for {}: '{}'", name, number));
        }

        Ok(Self::new(name, number))
    }
}

/// Last known position shared with contacts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Map link included in the notification message
    pub fn map_link(&self) -> String {
        format!("https://maps.google.com/?q={},{}", self.latitude, self.longitude)
    }
}

/// Parses `LAT,LNG`
impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("invalid longitude '{}': {}", lng.trim(), e))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("coordinates out of range: {},{}", latitude, longitude));
        }

        Ok(Self { latitude, longitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_contact() {
        let contact: EmergencyContact = "Maria = +55 61 99999-0000".parse().unwrap();
        assert_eq!(contact, EmergencyContact::new("Maria", "+55 61 99999-0000"));
    }

    #[test]
    fn rejects_malformed_contacts() {
        assert!("Maria".parse::<EmergencyContact>().is_err());
        assert!("=190".parse::<EmergencyContact>().is_err());
        assert!("Maria=call me".parse::<EmergencyContact>().is_err());
    }

    #[test]
    fn default_contacts_are_public_services() {
        let numbers: Vec<String> = EmergencyContact::defaults()
            .into_iter()
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, vec!["190", "193", "192", "180"]);
    }

    #[test]
    fn parses_location_and_builds_link() {
        let location: Location = "-15.7942,-47.8822".parse().unwrap();
        assert_eq!(
            location.map_link(),
            "https://maps.google.com/?q=-15.7942,-47.8822"
        );
    }

    #[test]
    fn rejects_out_of_range_location() {
        assert!("91,0".parse::<Location>().is_err());
        assert!("0;0".parse::<Location>().is_err());
    }
}
