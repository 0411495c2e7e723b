//! Five-field cron expressions: parsing, next-run calculation and a builder.
//!
//! Fields are minute, hour, day-of-month, month and day-of-week. Each field
//! accepts `*`, numbers, names (`JAN`..`DEC`, `SUN`..`SAT`), lists, ranges and
//! `/step`. Schedules are evaluated in UTC. When both day fields are
//! restricted a day matches if either one does.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::{ToolError, ToolResult};

pub const DEFAULT_RUN_COUNT: usize = 5;

/// Most runs listed by [`next_runs`].
pub const MAX_RUN_COUNT: usize = 100;

/// Years searched ahead before a schedule is declared unsatisfiable.
const SEARCH_YEARS: i32 = 8;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Well-known schedules and their descriptions.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("* * * * *", "Every minute"),
    ("0 * * * *", "Every hour, on the hour"),
    ("0 0 * * *", "Every day at midnight"),
    ("30 9 * * *", "Every day at 09:30"),
    ("0 10 * * 1", "Every Monday at 10:00"),
    ("0 0 1 * *", "On the 1st of every month at 00:00"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
}

const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    min: 0,
    max: 59,
    names: &[],
};
const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    min: 0,
    max: 23,
    names: &[],
};
const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day-of-month",
    min: 1,
    max: 31,
    names: &[],
};
const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
    names: &MONTH_NAMES,
};
// 7 is accepted as a second Sunday and folded onto 0.
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "day-of-week",
    min: 0,
    max: 7,
    names: &WEEKDAY_NAMES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Field {
    mask: u64,
    restricted: bool,
}

impl Field {
    const fn contains(self, value: u32) -> bool {
        self.mask & (1 << value) != 0
    }
}

/// A parsed cron schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    minutes: Field,
    hours: Field,
    days_of_month: Field,
    months: Field,
    days_of_week: Field,
}

impl Schedule {
    pub fn parse(expression: &str) -> ToolResult<Self> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week] = fields.as_slice() else {
            return Err(ToolError::Cron(format!(
                "expected 5 fields, found {}",
                fields.len()
            )));
        };

        let mut days_of_week = parse_field(day_of_week, DAY_OF_WEEK)?;
        if days_of_week.contains(7) {
            days_of_week.mask = (days_of_week.mask & !(1 << 7)) | 1;
        }

        Ok(Self {
            minutes: parse_field(minute, MINUTE)?,
            hours: parse_field(hour, HOUR)?,
            days_of_month: parse_field(day_of_month, DAY_OF_MONTH)?,
            months: parse_field(month, MONTH)?,
            days_of_week,
        })
    }

    /// First run strictly after `after`, or `None` if the schedule never fires.
    #[must_use]
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = after.naive_utc();
        let mut current = start.date().and_hms_opt(start.hour(), start.minute(), 0)? + Duration::minutes(1);
        let last_year = current.year() + SEARCH_YEARS;

        while current.year() <= last_year {
            if !self.months.contains(current.month()) {
                current = first_of_next_month(current.date())?;
                continue;
            }
            if !self.day_matches(current.date()) {
                current = current.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !self.hours.contains(current.hour()) {
                current = current.date().and_hms_opt(current.hour(), 0, 0)? + Duration::hours(1);
                continue;
            }
            if !self.minutes.contains(current.minute()) {
                current += Duration::minutes(1);
                continue;
            }
            return Some(Utc.from_utc_datetime(&current));
        }
        None
    }

    /// Up to `count` successive runs after `after`.
    #[must_use]
    pub fn upcoming(&self, after: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        let mut runs = Vec::new();
        let mut cursor = after;
        while runs.len() < count {
            let Some(next) = self.next_after(cursor) else {
                break;
            };
            runs.push(next);
            cursor = next;
        }
        runs
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let by_month_day = self.days_of_month.contains(date.day());
        let by_weekday = self
            .days_of_week
            .contains(date.weekday().num_days_from_sunday());
        match (self.days_of_month.restricted, self.days_of_week.restricted) {
            (true, true) => by_month_day || by_weekday,
            (true, false) => by_month_day,
            (false, true) => by_weekday,
            (false, false) => true,
        }
    }
}

/// Next `count` runs of `expression` after `from`.
pub fn next_runs(expression: &str, from: DateTime<Utc>, count: usize) -> ToolResult<Vec<DateTime<Utc>>> {
    if count > MAX_RUN_COUNT {
        return Err(ToolError::InvalidOption(format!(
            "Run count must be at most {MAX_RUN_COUNT}"
        )));
    }
    let schedule = Schedule::parse(expression)?;
    let runs = schedule.upcoming(from, count);
    if runs.is_empty() && count > 0 {
        return Err(ToolError::Cron(format!("'{expression}' never fires")));
    }
    Ok(runs)
}

/// Builder fields, one string per cron field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronFields {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
}

impl Default for CronFields {
    fn default() -> Self {
        Self {
            minute: "*".to_string(),
            hour: "*".to_string(),
            day_of_month: "*".to_string(),
            month: "*".to_string(),
            day_of_week: "*".to_string(),
        }
    }
}

impl CronFields {
    /// Split an expression into builder fields.
    pub fn split(expression: &str) -> ToolResult<Self> {
        Schedule::parse(expression)?;
        let mut parts = expression.split_whitespace().map(str::to_string);
        let mut next = || parts.next().unwrap_or_default();
        Ok(Self {
            minute: next(),
            hour: next(),
            day_of_month: next(),
            month: next(),
            day_of_week: next(),
        })
    }
}

/// Join builder fields into a validated expression.
pub fn compose(fields: &CronFields) -> ToolResult<String> {
    let expression = [
        &fields.minute,
        &fields.hour,
        &fields.day_of_month,
        &fields.month,
        &fields.day_of_week,
    ]
    .map(|field| field.trim())
    .join(" ");
    Schedule::parse(&expression)?;
    Ok(expression)
}

/// Description of a well-known schedule.
#[must_use]
pub fn describe(expression: &str) -> Option<&'static str> {
    let normalized = expression.split_whitespace().collect::<Vec<_>>().join(" ");
    TEMPLATES
        .iter()
        .find(|(template, _)| *template == normalized)
        .map(|(_, description)| *description)
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDateTime> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

fn parse_field(text: &str, spec: FieldSpec) -> ToolResult<Field> {
    let mut mask = 0u64;
    for item in text.split(',') {
        mask |= parse_item(item, spec)?;
    }
    Ok(Field {
        mask,
        restricted: !text.starts_with('*'),
    })
}

fn parse_item(item: &str, spec: FieldSpec) -> ToolResult<u64> {
    let invalid = |reason: &str| ToolError::Cron(format!("{} field '{item}': {reason}", spec.name));
    if item.is_empty() {
        return Err(invalid("empty value"));
    }

    let (range, step) = match item.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step.parse().map_err(|_| invalid("step is not a number"))?;
            if step == 0 {
                return Err(invalid("step must be positive"));
            }
            (range, Some(step))
        }
        None => (item, None),
    };

    let (start, end) = if range == "*" {
        (spec.min, spec.max)
    } else if let Some((low, high)) = range.split_once('-') {
        (
            parse_value(low, spec).ok_or_else(|| invalid("bad range start"))?,
            parse_value(high, spec).ok_or_else(|| invalid("bad range end"))?,
        )
    } else {
        let value = parse_value(range, spec).ok_or_else(|| invalid("out of range"))?;
        // `a/step` runs from `a` to the field maximum.
        (value, if step.is_some() { spec.max } else { value })
    };
    if start > end {
        return Err(invalid("range start is after its end"));
    }

    let step = step.unwrap_or(1) as usize;
    Ok((start..=end)
        .step_by(step)
        .fold(0u64, |mask, value| mask | (1 << value)))
}

fn parse_value(text: &str, spec: FieldSpec) -> Option<u32> {
    let value = text.parse::<u32>().ok().or_else(|| {
        spec.names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(text))
            .and_then(|index| u32::try_from(index).ok())
            .map(|index| index + if spec.min == 1 { 1 } else { 0 })
    })?;
    (spec.min..=spec.max).contains(&value).then_some(value)
}
