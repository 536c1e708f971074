//! Expiry classification.
//!
//! Both the expiry date and the reference instant are reduced to calendar
//! days in the reference instant's UTC offset before comparing, so two calls
//! on the same local day always agree.

use serde::Serialize;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

use crate::error::FoodError;
use crate::foods::repo_types::FoodRecord;

/// Items with at most this many days left (and not yet past) are expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    Fresh,
    ExpiringSoon,
    Expired,
}

impl Classification {
    pub fn from_days(days_until_expiry: i64) -> Self {
        if days_until_expiry < 0 {
            Classification::Expired
        } else if days_until_expiry <= EXPIRING_SOON_DAYS {
            Classification::ExpiringSoon
        } else {
            Classification::Fresh
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryStatus {
    pub classification: Classification,
    pub days_until_expiry: i64,
}

impl ExpiryStatus {
    /// Short badge text, e.g. "Today" or "2d left".
    pub fn label(&self) -> String {
        match self.classification {
            Classification::Expired => "Expired".to_string(),
            Classification::ExpiringSoon if self.days_until_expiry == 0 => "Today".to_string(),
            Classification::ExpiringSoon => format!("{}d left", self.days_until_expiry),
            Classification::Fresh => "Fresh".to_string(),
        }
    }
}

/// A date field as the food API stores it: either a bare calendar date or a
/// full timestamp. Used for both `ExpiryDate` and `AddedDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarValue {
    Day(Date),
    At(OffsetDateTime),
}

const SECONDS_PER_DAY: i64 = 86_400;

impl CalendarValue {
    /// Accepts `YYYY-MM-DD` or RFC 3339.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(day) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            return Some(CalendarValue::Day(day));
        }
        OffsetDateTime::parse(raw, &Rfc3339).ok().map(CalendarValue::At)
    }

    /// Julian day number and seconds into that day, as seen from `offset`.
    ///
    /// Works on plain integers so a timestamp at the edge of `Date`'s range
    /// still has a local day even when that day cannot be built as a `Date`.
    fn local_day_and_seconds(&self, offset: UtcOffset) -> (i64, i64) {
        match self {
            CalendarValue::Day(day) => (i64::from(day.to_julian_day()), 0),
            CalendarValue::At(at) => {
                let (h, m, s) = at.to_hms();
                let seconds = i64::from(h) * 3_600 + i64::from(m) * 60 + i64::from(s)
                    + i64::from(offset.whole_seconds())
                    - i64::from(at.offset().whole_seconds());
                (
                    i64::from(at.date().to_julian_day()) + seconds.div_euclid(SECONDS_PER_DAY),
                    seconds.rem_euclid(SECONDS_PER_DAY),
                )
            }
        }
    }

    /// Calendar day of this value as seen from `offset`; `None` when that day
    /// falls outside the supported date range.
    pub fn local_date(&self, offset: UtcOffset) -> Option<Date> {
        let (julian_day, _) = self.local_day_and_seconds(offset);
        let julian_day = i32::try_from(julian_day).ok()?;
        Date::from_julian_day(julian_day).ok()
    }

    /// Ordering key in `offset`: local day first, then time of day. A bare
    /// date sorts at the start of its day.
    pub fn sort_key(&self, offset: UtcOffset) -> (i64, i64, u32) {
        let (julian_day, seconds) = self.local_day_and_seconds(offset);
        let nanos = match self {
            CalendarValue::Day(_) => 0,
            CalendarValue::At(at) => at.nanosecond(),
        };
        (julian_day, seconds, nanos)
    }
}

/// Signed whole days from `now`'s local day to the expiry's local day.
pub fn days_until_expiry(expiry: &CalendarValue, now: OffsetDateTime) -> i64 {
    let (julian_day, _) = expiry.local_day_and_seconds(now.offset());
    julian_day - i64::from(now.date().to_julian_day())
}

pub fn classify(expiry: &CalendarValue, now: OffsetDateTime) -> ExpiryStatus {
    let days = days_until_expiry(expiry, now);
    ExpiryStatus {
        classification: Classification::from_days(days),
        days_until_expiry: days,
    }
}

pub fn classify_record(record: &FoodRecord, now: OffsetDateTime) -> Result<ExpiryStatus, FoodError> {
    let expiry = parse_record_expiry(record)?;
    Ok(classify(&expiry, now))
}

pub(crate) fn parse_record_expiry(record: &FoodRecord) -> Result<CalendarValue, FoodError> {
    CalendarValue::parse(&record.expiry_date).ok_or_else(|| FoodError::InvalidDate {
        id: record.id.clone(),
        value: record.expiry_date.clone(),
    })
}

/// Remaining time split for a ticking display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Countdown {
    fn from_seconds(total: i64) -> Self {
        Self {
            days: total / SECONDS_PER_DAY,
            hours: ((total % SECONDS_PER_DAY) / 3_600) as u8,
            minutes: ((total % 3_600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }
}

/// Time left until the expiry day is over in `now`'s offset; `None` once it
/// has passed. Agrees with [`classify`]: `None` exactly when expired.
pub fn countdown(expiry: &CalendarValue, now: OffsetDateTime) -> Option<Countdown> {
    let days_left = days_until_expiry(expiry, now);
    let (h, m, s) = now.to_hms();
    let elapsed_today = i64::from(h) * 3_600 + i64::from(m) * 60 + i64::from(s);
    let remaining = (days_left + 1) * SECONDS_PER_DAY - elapsed_today;
    if remaining <= 0 {
        return None;
    }
    Some(Countdown::from_seconds(remaining))
}
