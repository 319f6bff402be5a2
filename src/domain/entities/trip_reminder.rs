use crate::domain::entities::Entry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    OneYear,
    OneMonth,
}

impl ReminderKind {
    fn from_days(days: i64) -> Option<Self> {
        match days {
            365 => Some(ReminderKind::OneYear),
            30 => Some(ReminderKind::OneMonth),
            _ => None,
        }
    }
}

/// Anniversary reminder for the most recent trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripReminder {
    pub kind: ReminderKind,
    pub title: String,
    pub days_ago: i64,
}

impl TripReminder {
    pub fn for_entry(entry: &Entry, now: DateTime<Utc>) -> Option<Self> {
        let days = elapsed_days(entry.created_at, now);
        ReminderKind::from_days(days).map(|kind| Self {
            kind,
            title: entry.title.clone(),
            days_ago: days,
        })
    }

    pub fn message(&self) -> String {
        match self.kind {
            ReminderKind::OneYear => format!("A year ago you were travelling: \"{}\"", self.title),
            ReminderKind::OneMonth => {
                format!("A month ago you were travelling: \"{}\"", self.title)
            }
        }
    }
}

/// Whole days between two instants, rounded up.
fn elapsed_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EntryDraft;
    use chrono::Duration;

    fn entry_at(created_at: DateTime<Utc>) -> Entry {
        Entry::from_draft(EntryDraft::new("Kyiv", "", ""), created_at)
    }

    #[test]
    fn one_year_reminder() {
        let now = Utc::now();
        let entry = entry_at(now - Duration::days(365) + Duration::hours(2));
        let reminder = TripReminder::for_entry(&entry, now).unwrap();
        assert_eq!(reminder.kind, ReminderKind::OneYear);
        assert_eq!(reminder.days_ago, 365);
        assert!(reminder.message().contains("Kyiv"));
    }

    #[test]
    fn one_month_reminder() {
        let now = Utc::now();
        let entry = entry_at(now - Duration::days(30));
        let reminder = TripReminder::for_entry(&entry, now).unwrap();
        assert_eq!(reminder.kind, ReminderKind::OneMonth);
    }

    #[test]
    fn no_reminder_on_other_days() {
        let now = Utc::now();
        assert!(TripReminder::for_entry(&entry_at(now - Duration::days(12)), now).is_none());
        assert!(TripReminder::for_entry(&entry_at(now), now).is_none());
    }

    #[test]
    fn partial_days_round_up() {
        let now = Utc::now();
        assert_eq!(elapsed_days(now - Duration::hours(1), now), 1);
        assert_eq!(elapsed_days(now, now), 0);
        assert_eq!(elapsed_days(now + Duration::hours(25), now), 2);
    }
}
