//! Calendar presets for period extraction.

use super::extract::{extract_periods, Periods};
use crate::core::{BuildingRecord, Channel};
use crate::error::Result;
use chrono::{DateTime, Datelike, Timelike, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Calendar period with a fixed number of hourly samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodKind {
    /// 24 samples starting at local midnight.
    Day,
    /// 168 samples starting at local midnight of the given weekday.
    Week(Weekday),
}

impl PeriodKind {
    pub fn length(&self) -> usize {
        match self {
            PeriodKind::Day => 24,
            PeriodKind::Week(_) => 168,
        }
    }

    pub fn is_start(&self, t: &DateTime<Tz>) -> bool {
        match self {
            PeriodKind::Day => t.hour() == 0,
            PeriodKind::Week(day) => t.weekday() == *day && t.hour() == 0,
        }
    }
}

/// Which days take part in the analysis; the rest are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayFilter {
    #[default]
    All,
    /// Keep Monday to Friday.
    Weekdays,
    /// Keep Saturday and Sunday.
    Weekends,
}

impl DayFilter {
    pub fn skips(&self, t: &DateTime<Tz>) -> bool {
        let weekend = matches!(t.weekday(), Weekday::Sat | Weekday::Sun);
        match self {
            DayFilter::All => false,
            DayFilter::Weekdays => weekend,
            DayFilter::Weekends => !weekend,
        }
    }
}

/// Extract calendar periods of `channel` using a preset and a day filter.
pub fn extract_calendar_periods(
    record: &BuildingRecord,
    channel: Channel,
    kind: PeriodKind,
    filter: DayFilter,
    wrap_around: bool,
) -> Result<Periods> {
    extract_periods(
        record,
        channel,
        kind.length(),
        |t| kind.is_start(t),
        |t| filter.skips(t),
        wrap_around,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChannelData, RecordBuilder};
    use chrono::{Duration, TimeZone, Utc};

    fn two_weeks(tz: Tz) -> BuildingRecord {
        // 2011-01-03 00:00 UTC is a Monday.
        let base = Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap();
        let n = 14 * 24;
        RecordBuilder::new()
            .timezone(tz)
            .timestamps((0..n).map(|i| base + Duration::hours(i as i64)).collect())
            .channel(Channel::Usage, ChannelData::all_valid(vec![1.0; n]))
            .build()
            .unwrap()
    }

    #[test]
    fn lengths_match_hourly_calendar() {
        assert_eq!(PeriodKind::Day.length(), 24);
        assert_eq!(PeriodKind::Week(Weekday::Mon).length(), 168);
    }

    #[test]
    fn weekday_filter_excludes_weekends() {
        let record = two_weeks(Tz::UTC);
        let days = extract_calendar_periods(
            &record,
            Channel::Usage,
            PeriodKind::Day,
            DayFilter::Weekdays,
            false,
        )
        .unwrap();

        assert_eq!(days.len(), 14);
        // Days 5 and 6 are Saturday and Sunday.
        assert!(days.period(5).unwrap().iter().all(Option::is_none));
        assert!(days.period(0).unwrap().iter().all(Option::is_some));
        assert_eq!(days.included_count(), 10 * 24);
    }

    #[test]
    fn weekend_filter_keeps_only_weekends() {
        let record = two_weeks(Tz::UTC);
        let days = extract_calendar_periods(
            &record,
            Channel::Usage,
            PeriodKind::Day,
            DayFilter::Weekends,
            false,
        )
        .unwrap();

        assert_eq!(days.included_count(), 4 * 24);
    }

    #[test]
    fn local_midnight_defines_day_start() {
        let record = two_weeks(chrono_tz::US::Central);
        let days = extract_calendar_periods(
            &record,
            Channel::Usage,
            PeriodKind::Day,
            DayFilter::All,
            false,
        )
        .unwrap();

        // Local midnight in CST is 06:00 UTC.
        assert_eq!(days.period_times(0).unwrap()[0].hour(), 6);
        assert_eq!(days.len(), 13);
    }
}
