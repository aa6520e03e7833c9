use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::{Duration, OffsetDateTime, UtcOffset};

use super::Table;

/// Wall-clock time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    pub fn of(instant: OffsetDateTime) -> Self {
        Self(u16::from(instant.hour()) * 60 + u16::from(instant.minute()))
    }
}

/// A recurring weekly window during which one owner accepts alerts from
/// one device.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Schedule {
    pub id: i64,
    pub device_id: String,
    pub user_id: String,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    /// 0 = Sunday .. 6 = Saturday
    pub weekdays: Json<Vec<u8>>,
    pub enabled: bool,
    pub created_at: OffsetDateTime,
}

impl Schedule {
    pub fn start(&self) -> Option<ClockTime> {
        ClockTime::new(self.start_hour, self.start_minute)
    }

    pub fn end(&self) -> Option<ClockTime> {
        ClockTime::new(self.end_hour, self.end_minute)
    }

    fn applies_on(&self, weekday: u8) -> bool {
        self.weekdays.contains(&weekday)
    }

    /// Whether the window covers `instant`, read on a wall clock at `offset`.
    ///
    /// Both bounds are inclusive. A window whose start is later than its end
    /// crosses midnight and is matched against the weekday it opened on, so
    /// the part after midnight checks the previous day.
    pub fn is_active(&self, instant: OffsetDateTime, offset: UtcOffset) -> bool {
        if !self.enabled {
            return false;
        }

        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return false;
        };

        let local = instant.to_offset(offset);
        let now = ClockTime::of(local);
        let today = local.weekday().number_days_from_sunday();

        if start <= end {
            return self.applies_on(today) && start <= now && now <= end;
        }

        if now >= start {
            return self.applies_on(today);
        }

        if now <= end {
            let opened_on = (local - Duration::days(1)).weekday().number_days_from_sunday();
            return self.applies_on(opened_on);
        }

        false
    }
}

#[derive(Clone)]
pub struct ScheduleTable;

impl Table for ScheduleTable {
    fn name(&self) -> &'static str {
        "schedules"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                start_hour INTEGER NOT NULL CHECK (start_hour BETWEEN 0 AND 23),
                start_minute INTEGER NOT NULL CHECK (start_minute BETWEEN 0 AND 59),
                end_hour INTEGER NOT NULL CHECK (end_hour BETWEEN 0 AND 23),
                end_minute INTEGER NOT NULL CHECK (end_minute BETWEEN 0 AND 59),
                weekdays JSON NOT NULL DEFAULT '[]',
                enabled BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMP NOT NULL,
                FOREIGN KEY (device_id, user_id) REFERENCES devices_owners_link (device_id, user_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_schedules_owner ON schedules (device_id, user_id);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS schedules;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["devices_owners_link"]
    }
}
