use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar;
use crate::clock::Clock;
use crate::error::{Result, SignageError};

pub const DEFAULT_FEED_URL: &str = "http://cfp.devoxx.be/api/conferences/DV15";

/// Simulated-time settings; present only when running in test mode
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestModeConfig {
    /// Days after the start date
    pub day: u32,
    /// Time of day, `HH:MM` or `HH:MM:SS`
    pub time: String,
}

/// Operator tunables, usually read from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignageConfig {
    pub feed_url: String,
    pub start_date: Option<NaiveDate>,
    pub image_cache: PathBuf,
    pub data_refresh_minutes: u64,
    pub screen_refresh_seconds: u64,
    pub request_timeout_seconds: u64,
    pub log_level: String,
    pub log_file: PathBuf,
    pub test: Option<TestModeConfig>,
}

impl Default for SignageConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            start_date: None,
            image_cache: default_image_cache(),
            data_refresh_minutes: 30,
            screen_refresh_seconds: 60,
            request_timeout_seconds: 30,
            log_level: "info".to_string(),
            log_file: PathBuf::from("signage.log"),
            test: None,
        }
    }
}

fn default_image_cache() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".devoxx-signage")
}

impl SignageConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SignageConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SignageError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the conference start date
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set the feed base URL with validation
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(SignageError::InvalidConfiguration(
                "feed_url must not be empty".to_string(),
            ));
        }
        self.feed_url = url;
        Ok(self)
    }

    /// Set the feed refresh period with validation
    pub fn with_data_refresh_minutes(mut self, minutes: u64) -> Result<Self> {
        if minutes == 0 {
            return Err(SignageError::InvalidConfiguration(
                "data_refresh_minutes must be greater than 0".to_string(),
            ));
        }
        self.data_refresh_minutes = minutes;
        Ok(self)
    }

    /// Set the screen refresh period with validation
    pub fn with_screen_refresh_seconds(mut self, seconds: u64) -> Result<Self> {
        if seconds == 0 {
            return Err(SignageError::InvalidConfiguration(
                "screen_refresh_seconds must be greater than 0".to_string(),
            ));
        }
        self.screen_refresh_seconds = seconds;
        Ok(self)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Err(SignageError::InvalidConfiguration(message.to_string()));

        if self.start_date.is_none() {
            return invalid("start_date is required");
        }
        if self.feed_url.trim().is_empty() {
            return invalid("feed_url must not be empty");
        }
        if self.data_refresh_minutes == 0 {
            return invalid("data_refresh_minutes must be greater than 0");
        }
        if self.screen_refresh_seconds == 0 {
            return invalid("screen_refresh_seconds must be greater than 0");
        }
        if self.request_timeout_seconds == 0 {
            return invalid("request_timeout_seconds must be greater than 0");
        }
        if let Some(test) = &self.test {
            calendar::parse_time_of_day(&test.time)?;
        }
        Ok(())
    }

    pub fn start_date(&self) -> Result<NaiveDate> {
        self.start_date
            .ok_or_else(|| SignageError::InvalidConfiguration("start_date is required".to_string()))
    }

    pub fn data_refresh_period(&self) -> Duration {
        Duration::from_secs(self.data_refresh_minutes * 60)
    }

    pub fn screen_refresh_period(&self) -> Duration {
        Duration::from_secs(self.screen_refresh_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// The real clock, or a simulated one when test mode is configured
    pub fn clock(&self) -> Result<Clock> {
        match &self.test {
            None => Ok(Clock::System),
            Some(test) => {
                let time = calendar::parse_time_of_day(&test.time)?;
                let date = self
                    .start_date()?
                    .checked_add_days(chrono::Days::new(u64::from(test.day)))
                    .ok_or_else(|| {
                        SignageError::InvalidConfiguration(format!("test day {} out of range", test.day))
                    })?;
                Ok(Clock::Simulated(date.and_time(time)))
            }
        }
    }
}
