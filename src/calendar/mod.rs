//! Holiday date arithmetic for the board header and countdown.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone};

pub const ARRIVAL_MESSAGE: &str = "It's feast day!";

const THURSDAY: u32 = 4;

/// Fourth Thursday of November in `year`, or `None` outside the years
/// `NaiveDate` can represent.
pub fn thanksgiving_date(year: i32) -> Option<NaiveDate> {
    let day = NaiveDate::from_ymd_opt(year, 11, 1)?
        .weekday()
        .num_days_from_sunday();

    let first_thursday = if day <= THURSDAY {
        THURSDAY - day
    } else {
        THURSDAY + 7 - day
    };

    NaiveDate::from_ymd_opt(year, 11, 1 + first_thursday + 3 * 7)
}

/// Start of the next holiday as seen from `reference`.
///
/// The holiday of the reference year is kept while the reference is at or
/// before its midnight; once it has passed, the following year's is returned.
/// Only the midnight instant itself counts as not passed: a reference later
/// on the holiday already looks ahead to the next year.
///
/// `None` only when the following year is past the end of chrono's calendar.
pub fn next_occurrence<Tz: TimeZone>(reference: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = reference.timezone();
    let year = reference.year();

    let this_year = local_midnight(&tz, thanksgiving_date(year)?);
    if *reference <= this_year {
        return Some(this_year);
    }

    Some(local_midnight(&tz, thanksgiving_date(year + 1)?))
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Renders the time left until `target` as `<N> day(s) · <M> hr(s)`.
pub fn format_countdown<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    let diff = target.clone() - now.clone();
    if diff <= TimeDelta::zero() {
        return ARRIVAL_MESSAGE.to_string();
    }

    let days = diff.num_days();
    let hours = diff.num_hours() % 24;

    format!(
        "{days} day{} · {hours} hr{}",
        plural_suffix(days),
        plural_suffix(hours)
    )
}

const fn plural_suffix(value: i64) -> &'static str {
    if value == 1 { "" } else { "s" }
}

/// Header text such as `Thursday, November 27`.
pub fn format_holiday(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc, Weekday};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn thanksgiving_2024_is_november_28() {
        let date = thanksgiving_date(2024).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 28).unwrap());
        assert_eq!(date.weekday(), Weekday::Thu);
    }

    #[test]
    fn november_first_on_thursday_counts_as_first_week() {
        // 2018-11-01 was a Thursday.
        assert_eq!(
            thanksgiving_date(2018).unwrap(),
            NaiveDate::from_ymd_opt(2018, 11, 22).unwrap()
        );
    }

    #[test]
    fn holiday_is_always_fourth_thursday() {
        for year in 1900..=2200 {
            let date = thanksgiving_date(year).unwrap();
            assert_eq!(date.weekday(), Weekday::Thu, "{year}");
            assert_eq!(date.month(), 11);
            assert!((22..=28).contains(&date.day()), "{year}: {date}");
        }
    }

    #[test]
    fn early_reference_returns_same_year() {
        let next = next_occurrence(&utc(2024, 1, 3, 9, 0)).unwrap();
        assert_eq!(next, utc(2024, 11, 28, 0, 0));
    }

    #[test]
    fn late_reference_rolls_to_next_year() {
        let next = next_occurrence(&utc(2024, 11, 29, 23, 30)).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 27).unwrap());
    }

    #[test]
    fn reference_at_midnight_is_not_passed() {
        let holiday = utc(2024, 11, 28, 0, 0);
        assert_eq!(next_occurrence(&holiday), Some(holiday));
    }

    #[test]
    fn later_on_the_holiday_looks_ahead_a_year() {
        let next = next_occurrence(&utc(2024, 11, 28, 0, 1)).unwrap();
        assert_eq!(next, utc(2025, 11, 27, 0, 0));
    }

    #[test]
    fn years_outside_the_calendar_have_no_holiday() {
        assert!(thanksgiving_date(i32::MAX).is_none());
        assert!(thanksgiving_date(NaiveDate::MIN.year()).is_some());

        let last_day = NaiveDate::MAX.and_time(NaiveTime::MIN).and_utc();
        assert!(next_occurrence(&last_day).is_none());
    }

    #[test]
    fn just_before_and_after_every_year() {
        for year in 1970..=2100 {
            let holiday = next_occurrence(&utc(year, 1, 1, 0, 0)).unwrap();
            let before = holiday - TimeDelta::milliseconds(1);
            let after = holiday + TimeDelta::milliseconds(1);

            assert_eq!(next_occurrence(&before), Some(holiday), "{year}");
            assert_eq!(
                next_occurrence(&after).map(|next| next.date_naive()),
                thanksgiving_date(year + 1),
                "{year}"
            );
        }
    }

    #[test]
    fn midnight_is_local_to_reference_zone() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let reference = eastern.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let next = next_occurrence(&reference).unwrap();
        assert_eq!(next.to_rfc3339(), "2024-11-28T00:00:00-05:00");
    }

    #[test]
    fn countdown_at_target_has_arrived() {
        let target = utc(2024, 11, 28, 0, 0);
        assert_eq!(format_countdown(&target, &target), ARRIVAL_MESSAGE);
        assert_eq!(
            format_countdown(&target, &(target + TimeDelta::hours(3))),
            ARRIVAL_MESSAGE
        );
    }

    #[test]
    fn countdown_floors_partial_units() {
        let target = utc(2024, 11, 28, 0, 0);
        assert_eq!(
            format_countdown(&target, &(target - TimeDelta::milliseconds(1))),
            "0 days · 0 hrs"
        );
        assert_eq!(
            format_countdown(
                &target,
                &(target - TimeDelta::hours(24) + TimeDelta::milliseconds(1))
            ),
            "0 days · 23 hrs"
        );
    }

    #[test]
    fn countdown_uses_singular_for_one() {
        let target = utc(2024, 11, 28, 0, 0);
        assert_eq!(
            format_countdown(&target, &(target - TimeDelta::hours(25))),
            "1 day · 1 hr"
        );
        assert_eq!(
            format_countdown(&target, &(target - TimeDelta::hours(50))),
            "2 days · 2 hrs"
        );
    }

    #[test]
    fn holiday_header_format() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();
        assert_eq!(format_holiday(date), "Thursday, November 27");
    }
}
