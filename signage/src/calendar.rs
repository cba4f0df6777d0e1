use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, SignageError};

/// Conference days, each mapped to a fixed offset from the configured start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Look up a day by the lowercase name the feed uses
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            other => Err(SignageError::UnknownDay(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }

    /// Days after the start date
    pub fn offset(&self) -> u64 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
        }
    }

    /// The calendar date of this day for a conference starting on `start_date`
    pub fn date_from(&self, start_date: NaiveDate) -> NaiveDate {
        start_date
            .checked_add_days(Days::new(self.offset()))
            .unwrap_or(start_date)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse `HH:MM` or `HH:MM:SS[.fff]`
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| SignageError::InvalidTime(value.to_string()))
}

/// Absolute timestamp for a named conference day and a feed time of day
pub fn timestamp_for(start_date: NaiveDate, day_name: &str, time: &str) -> Result<NaiveDateTime> {
    let day = Weekday::from_name(day_name)?;
    let time = parse_time_of_day(time)?;
    Ok(day.date_from(start_date).and_time(time))
}
