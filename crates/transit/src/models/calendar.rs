//! Day-type calendar for choosing which timetable applies to a date.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::types::DayType;

/// Compact representation of a set of weekdays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeekdayFlags {
    pub(crate) flags: u8,
}

impl WeekdayFlags {
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Saturday and Sunday
    pub fn weekend() -> Self {
        let mut flags = Self::new();
        flags.set(Weekday::Sat);
        flags.set(Weekday::Sun);
        flags
    }

    pub fn set(&mut self, weekday: Weekday) {
        self.flags |= 1 << weekday.number_from_monday();
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        (self.flags & (1 << weekday.number_from_monday())) != 0
    }
}

/// Decides whether a date runs the weekday or the holiday timetable
#[derive(Clone, Debug)]
pub struct DayTypeCalendar {
    /// Weekdays that always run the holiday timetable
    pub holiday_weekdays: WeekdayFlags,

    /// Public holidays that fall on otherwise ordinary weekdays
    pub holidays: Arc<HashSet<NaiveDate>>,
}

impl DayTypeCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holiday_weekdays: WeekdayFlags::weekend(),
            holidays: Arc::new(holidays.into_iter().collect()),
        }
    }

    pub fn day_type_on(&self, date: NaiveDate) -> DayType {
        if self.holidays.contains(&date) || self.holiday_weekdays.contains(date.weekday()) {
            DayType::Holiday
        } else {
            DayType::Weekday
        }
    }
}

impl Default for DayTypeCalendar {
    fn default() -> Self {
        Self::new([])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_flags() {
        let flags = WeekdayFlags::weekend();
        assert!(flags.contains(Weekday::Sat));
        assert!(flags.contains(Weekday::Sun));
        assert!(!flags.contains(Weekday::Mon));
    }

    #[test]
    fn test_day_type_calendar() {
        let calendar = DayTypeCalendar::new([
            date(2026, 11, 3), // Culture Day (Tuesday)
        ]);

        // Regular weekday
        assert_eq!(calendar.day_type_on(date(2026, 11, 2)), DayType::Weekday); // Monday

        // Weekend
        assert_eq!(calendar.day_type_on(date(2026, 11, 7)), DayType::Holiday); // Saturday
        assert_eq!(calendar.day_type_on(date(2026, 11, 8)), DayType::Holiday); // Sunday

        // Listed public holiday
        assert_eq!(calendar.day_type_on(date(2026, 11, 3)), DayType::Holiday);
    }

    #[test]
    fn test_default_calendar_only_knows_weekends() {
        let calendar = DayTypeCalendar::default();
        assert_eq!(calendar.day_type_on(date(2026, 1, 1)), DayType::Weekday); // Thursday
        assert_eq!(calendar.day_type_on(date(2026, 1, 3)), DayType::Holiday); // Saturday
    }
}
