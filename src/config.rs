//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    services::{EmergencyContact, Location},
    state::alert::DEFAULT_COUNTDOWN_SECONDS,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "segura-alert")]
#[command(about = "A state-managed HTTP server for the emergency alert lifecycle")]
#[command(version = "2.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Seconds between triggering an alert and sending it
    #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..))]
    pub countdown: u32,

    /// Countdown tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,

    /// Number of finished alerts kept in the session history
    #[arg(long, default_value = "50")]
    pub history_limit: usize,

    /// Emergency contact as NAME=NUMBER (repeatable)
    #[arg(long = "contact", value_name = "NAME=NUMBER")]
    pub contacts: Vec<EmergencyContact>,

    /// Location shared with contacts, as LAT,LNG
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub location: Option<Location>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Settings the application state is built from
    pub fn app_config(&self) -> AppConfig {
        let contacts = if self.contacts.is_empty() {
            EmergencyContact::defaults()
        } else {
            self.contacts.clone()
        };

        AppConfig {
            port: self.port,
            host: self.host.clone(),
            countdown_seconds: self.countdown,
            tick_interval: Duration::from_millis(self.tick_millis),
            history_limit: self.history_limit,
            contacts,
            location: self.location,
        }
    }
}

/// Runtime settings held by the application state
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub host: String,
    pub countdown_seconds: u32,
    pub tick_interval: Duration,
    pub history_limit: usize,
    pub contacts: Vec<EmergencyContact>,
    pub location: Option<Location>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 20553,
            host: "0.0.0.0".to_string(),
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            tick_interval: Duration::from_secs(1),
            history_limit: 50,
            contacts: EmergencyContact::defaults(),
            location: None,
        }
    }
}
