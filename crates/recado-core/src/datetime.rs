//! Human-entered date/time resolution for the command grammar.
//!
//! Dates are Brazilian-Portuguese flavored: `hoje` / `amanhã` keywords, or a
//! day-month-year triple split on `/` or `-`. There is deliberately no
//! calendar validation: out-of-range day/month values roll over
//! arithmetically (`31/02/2025` lands on March 3rd), matching the behavior
//! users have relied on since the webhook first shipped.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};

/// Resolve a date token against the current clock.
pub fn resolve_date(token: &str) -> Option<DateTime<Local>> {
    resolve_date_at(token, Local::now())
}

/// Resolve a date and time token pair against the current clock.
pub fn resolve_date_time(date_token: &str, time_token: &str) -> DateTime<Local> {
    resolve_date_time_at(date_token, time_token, Local::now())
}

/// Clock-injected variant of [`resolve_date`].
///
/// Returns the resolved calendar date at local midnight, or `None` for a
/// token that is neither a keyword nor a three-part numeric triple.
pub fn resolve_date_at(token: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let lower = token.trim().to_lowercase();

    if lower == "hoje" {
        return local_midnight(now.date_naive());
    }
    if lower == "amanhã" {
        return local_midnight(now.date_naive() + Duration::days(1));
    }

    let parts: Vec<&str> = token.trim().split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let day = parts[0].trim().parse::<i64>().ok()?;
    let month = parts[1].trim().parse::<i64>().ok()?;
    let year = parts[2].trim().parse::<i64>().ok()?;

    local_midnight(rolled_date(year, month - 1, day)?)
}

/// Clock-injected variant of [`resolve_date_time`].
///
/// An unresolvable date token silently degrades to `now` (the sender still
/// gets an event, just anchored to the current date). A malformed time token
/// leaves the time-of-day of the resolved date untouched.
pub fn resolve_date_time_at(
    date_token: &str,
    time_token: &str,
    now: DateTime<Local>,
) -> DateTime<Local> {
    let base = resolve_date_at(date_token, now).unwrap_or(now);

    let Some((hours, minutes)) = parse_time(time_token) else {
        return base;
    };

    apply_time(base, hours, minutes).unwrap_or(base)
}

/// Set the time-of-day on `base`'s date. `None` when the hour/minute values
/// are too large to represent, which callers treat like a malformed token.
fn apply_time(base: DateTime<Local>, hours: i64, minutes: i64) -> Option<DateTime<Local>> {
    let total_minutes = hours.checked_mul(60)?.checked_add(minutes)?;
    let offset = Duration::try_minutes(total_minutes)?;
    local_midnight(base.date_naive())?.checked_add_signed(offset)
}

/// `HH:MM`, both parts integers. Anything else is malformed.
pub(crate) fn parse_time(token: &str) -> Option<(i64, i64)> {
    let parts: Vec<&str> = token.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hours = parts[0].trim().parse::<i64>().ok()?;
    let minutes = parts[1].trim().parse::<i64>().ok()?;
    Some((hours, minutes))
}

/// Build a date with rollover arithmetic: the month offset is applied to the
/// year first, then `day - 1` days are added to the 1st of that month. This
/// is how a `(year, month0, day)` triple has always been interpreted here, so
/// `month0 = 12` is January of the next year and `day = 0` is the last day of
/// the previous month.
fn rolled_date(year: i64, month0: i64, day: i64) -> Option<NaiveDate> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = month0.rem_euclid(12) as u32 + 1;

    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    first.checked_add_signed(Duration::try_days(day - 1)?)
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
}
