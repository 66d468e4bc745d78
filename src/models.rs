use std::{fmt, str::FromStr};

use time::OffsetDateTime;

/// Seconds since the unix epoch, stored as an INTEGER so rows order numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Timestamp {
        Timestamp(OffsetDateTime::now_utc().unix_timestamp())
    }

    pub fn to_datetime(self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.0).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    /// `HH:MM` in UTC.
    pub fn clock(self) -> String {
        let dt = self.to_datetime();
        format!("{:02}:{:02}", dt.hour(), dt.minute())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Trip,
    Party,
    Meal,
    Other,
}

impl EventType {
    pub fn label(self) -> &'static str {
        match self {
            EventType::Trip => "Trip",
            EventType::Party => "Party",
            EventType::Meal => "Meal",
            EventType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Energy {
    Low,
    #[default]
    Medium,
    High,
}

impl Energy {
    pub const ALL: [Energy; 3] = [Energy::Low, Energy::Medium, Energy::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Energy::Low => "low",
            Energy::Medium => "medium",
            Energy::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Energy::Low => "Low",
            Energy::Medium => "Medium",
            Energy::High => "High",
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEnergy(pub String);

impl FromStr for Energy {
    type Err = UnknownEnergy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Energy::ALL
            .into_iter()
            .find(|energy| energy.as_str() == s)
            .ok_or_else(|| UnknownEnergy(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub trip_id: String,
    pub event_type: EventType,
    pub start_time: Timestamp,
    pub location_name: String,
    pub location_notes: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Friend {
    pub id: i64,
    pub name: String,
    pub energy: Energy,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Chat {
    pub id: i64,
    pub name: String,
}

/// A chat message joined with the name of whoever sent it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub text: String,
    pub sender_id: i64,
    pub sender_name: String,
    pub created_at: Timestamp,
}

/// A carpool with its driver and riders already loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carpool {
    pub id: i64,
    pub event_id: i64,
    pub seats: i64,
    pub driver: Friend,
    pub riders: Vec<Friend>,
}

impl Carpool {
    pub fn open_seats(&self) -> i64 {
        (self.seats - self.riders.len() as i64).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CarpoolRider {
    pub id: i64,
    pub carpool_id: i64,
    pub friend_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_parses_only_known_levels() {
        assert_eq!("low".parse::<Energy>(), Ok(Energy::Low));
        assert_eq!("high".parse::<Energy>(), Ok(Energy::High));
        assert_eq!("High".parse::<Energy>(), Err(UnknownEnergy("High".to_owned())));
        assert_eq!(Energy::default(), Energy::Medium);
    }

    #[test]
    fn clock_is_utc_hours_and_minutes() {
        // 2024-03-01 09:05:59 UTC
        assert_eq!(Timestamp(1_709_283_959).clock(), "09:05");
    }
}
