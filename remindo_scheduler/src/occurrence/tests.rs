use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use proptest::prelude::*;
use proptest_arbitrary_interop::arb;
use remindo_models::reminder::{ReminderFireTime, ReminderId};
use test_strategy::proptest;

use super::*;

fn at(date: (i32, u32, u32), time: (u32, u32)) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .unwrap()
        .and_hms_opt(time.0, time.1, 0)
        .unwrap()
}

fn reminder(time: (u32, u32), repeat: ReminderRepeat) -> Reminder {
    Reminder {
        id: ReminderId::new_v4(),
        text: "Reminder Text".to_owned(),
        fire_at: ReminderFireTime::from_hm(time.0, time.1).unwrap(),
        repeat,
        weekdays: BTreeSet::new(),
        dates: BTreeSet::new(),
        done: false,
    }
}

fn weekly(time: (u32, u32), weekdays: &[u8]) -> Reminder {
    Reminder {
        weekdays: weekdays.iter().copied().collect(),
        ..reminder(time, ReminderRepeat::Weekly)
    }
}

fn monthly(time: (u32, u32), dates: &[u8]) -> Reminder {
    Reminder {
        dates: dates.iter().copied().collect(),
        ..reminder(time, ReminderRepeat::Monthly)
    }
}

fn flat31() -> OccurrenceCalculator {
    OccurrenceCalculator::new(MonthlyWrap::Flat31)
}

// 2024-03-14 is a Thursday.
const THURSDAY: (i32, u32, u32) = (2024, 3, 14);

#[test]
fn one_off_later_today_fires_today() {
    let now = at(THURSDAY, (9, 0));

    let next = next_occurrence(&reminder((9, 30), ReminderRepeat::None), now);

    assert_eq!(next, Some(at(THURSDAY, (9, 30))));
}

#[test]
fn one_off_that_passed_never_fires() {
    let now = at(THURSDAY, (9, 31));

    let next = next_occurrence(&reminder((9, 30), ReminderRepeat::None), now);

    assert_eq!(next, None);
}

#[test]
fn one_off_at_exactly_now_still_fires() {
    let now = at(THURSDAY, (9, 30));

    let next = next_occurrence(&reminder((9, 30), ReminderRepeat::None), now);

    assert_eq!(next, Some(now));
}

#[test]
fn daily_that_passed_moves_to_tomorrow() {
    let now = at((2024, 12, 31), (22, 0));

    let next = next_occurrence(&reminder((7, 0), ReminderRepeat::Daily), now);

    assert_eq!(next, Some(at((2025, 1, 1), (7, 0))));
}

#[test]
fn weekly_on_today_that_passed_is_a_week_out() {
    let now = at(THURSDAY, (10, 0));

    let next = next_occurrence(&weekly((8, 0), &[4]), now);

    assert_eq!(next, Some(at((2024, 3, 21), (8, 0))));
}

#[test]
fn weekly_on_today_not_yet_passed_is_today() {
    let now = at(THURSDAY, (7, 0));

    let next = next_occurrence(&weekly((8, 0), &[4]), now);

    assert_eq!(next, Some(at(THURSDAY, (8, 0))));
}

#[test]
fn weekly_picks_the_nearest_weekday_across_the_week_boundary() {
    let now = at(THURSDAY, (10, 0));

    // Monday and Wednesday are both behind us this week.
    let next = next_occurrence(&weekly((8, 0), &[1, 3]), now);

    assert_eq!(next, Some(at((2024, 3, 18), (8, 0))));
}

#[test]
fn weekly_prefers_saturday_over_next_thursday() {
    let now = at(THURSDAY, (10, 0));

    let next = next_occurrence(&weekly((8, 0), &[4, 6]), now);

    assert_eq!(next, Some(at((2024, 3, 16), (8, 0))));
}

#[test]
fn weekly_without_weekdays_fires_today_when_time_is_ahead() {
    let now = at(THURSDAY, (7, 59));

    let next = next_occurrence(&weekly((8, 0), &[]), now);

    assert_eq!(next, Some(at(THURSDAY, (8, 0))));
}

#[test]
fn weekly_without_weekdays_that_passed_is_a_week_out() {
    let now = at(THURSDAY, (8, 1));

    let next = next_occurrence(&weekly((8, 0), &[]), now);

    assert_eq!(next, Some(at((2024, 3, 21), (8, 0))));
}

#[test]
fn weekly_with_out_of_range_weekday_never_fires() {
    let now = at(THURSDAY, (7, 0));

    assert_eq!(next_occurrence(&weekly((8, 0), &[4, 7]), now), None);
}

#[test]
fn monthly_on_today_not_yet_passed_is_today() {
    let now = at(THURSDAY, (6, 0));

    let next = next_occurrence(&monthly((8, 0), &[14]), now);

    assert_eq!(next, Some(at(THURSDAY, (8, 0))));
}

#[test]
fn monthly_on_today_that_passed_is_next_month() {
    let now = at(THURSDAY, (9, 0));

    let calendar = next_occurrence(&monthly((8, 0), &[14]), now);
    let flat = flat31().next_occurrence(&monthly((8, 0), &[14]), now);

    assert_eq!(calendar, Some(at((2024, 4, 14), (8, 0))));
    // March has 31 days, so both strategies agree here.
    assert_eq!(flat, calendar);
}

#[test]
fn monthly_picks_the_nearest_date_this_month() {
    let now = at(THURSDAY, (9, 0));

    let next = next_occurrence(&monthly((8, 0), &[1, 20, 28]), now);

    assert_eq!(next, Some(at((2024, 3, 20), (8, 0))));
}

#[test]
fn monthly_calendar_skips_months_without_the_date() {
    let now = at((2024, 4, 30), (10, 0));

    let next = next_occurrence(&monthly((8, 0), &[31]), now);

    assert_eq!(next, Some(at((2024, 5, 31), (8, 0))));
}

#[test]
fn monthly_calendar_skips_february_for_the_thirtieth() {
    let now = at((2024, 1, 30), (10, 0));

    let next = next_occurrence(&monthly((8, 0), &[30]), now);

    assert_eq!(next, Some(at((2024, 3, 30), (8, 0))));
}

#[test]
fn monthly_flat_offset_overshoots_in_short_months() {
    let now = at((2024, 2, 20), (10, 0));
    let reminder = monthly((8, 0), &[5]);

    let calendar = next_occurrence(&reminder, now);
    let flat = flat31().next_occurrence(&reminder, now);

    assert_eq!(calendar, Some(at((2024, 3, 5), (8, 0))));
    assert_eq!(flat, Some(at((2024, 3, 7), (8, 0))));
}

#[test]
fn monthly_without_dates_that_passed_is_next_calendar_month() {
    let now = at(THURSDAY, (9, 0));

    let next = next_occurrence(&monthly((8, 0), &[]), now);

    assert_eq!(next, Some(at((2024, 4, 14), (8, 0))));
}

#[test]
fn monthly_without_dates_clamps_to_short_month_end() {
    let now = at((2024, 1, 31), (9, 0));

    let next = next_occurrence(&monthly((8, 0), &[]), now);

    assert_eq!(next, Some(at((2024, 2, 29), (8, 0))));
}

#[test]
fn monthly_with_out_of_range_date_never_fires() {
    let now = at(THURSDAY, (9, 0));

    assert_eq!(next_occurrence(&monthly((8, 0), &[0, 15]), now), None);
    assert_eq!(flat31().next_occurrence(&monthly((8, 0), &[32]), now), None);
}

#[test]
fn unknown_repeat_never_fires() {
    let now = at(THURSDAY, (7, 0));
    let reminder = reminder((8, 0), ReminderRepeat::Unrecognized("yearly".to_owned()));

    assert_eq!(next_occurrence(&reminder, now), None);
}

#[test]
fn day_selection_is_ignored_for_other_repeat_kinds() {
    let now = at(THURSDAY, (9, 0));
    let daily = Reminder {
        weekdays: [1].into_iter().collect(),
        dates: [2].into_iter().collect(),
        ..reminder((8, 0), ReminderRepeat::Daily)
    };

    assert_eq!(next_occurrence(&daily, now), Some(at((2024, 3, 15), (8, 0))));
}

fn fire_time_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..24, 0u32..60)
}

fn now_strategy() -> impl Strategy<Value = NaiveDateTime> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (0u64..365 * 200, arb::<NaiveTime>()).prop_map(move |(days, time)| {
        let date = epoch.checked_add_days(Days::new(days)).unwrap();
        date.and_time(time.with_nanosecond(0).unwrap())
    })
}

#[proptest]
fn daily_is_never_in_the_past(
    #[strategy(now_strategy())] now: NaiveDateTime,
    #[strategy(fire_time_strategy())] time: (u32, u32),
) {
    let next = next_occurrence(&reminder(time, ReminderRepeat::Daily), now);

    let next = next.expect("daily reminders always fire again");
    prop_assert!(next >= now);
    prop_assert!(next - now <= TimeDelta::days(1));
    prop_assert_eq!(next.hour(), time.0);
    prop_assert_eq!(next.minute(), time.1);
}

#[proptest]
fn one_off_that_passed_is_none(
    #[strategy(now_strategy())] now: NaiveDateTime,
    #[strategy(fire_time_strategy())] time: (u32, u32),
) {
    let reminder = reminder(time, ReminderRepeat::None);
    let today_at = now.date().and_hms_opt(time.0, time.1, 0).unwrap();

    let next = next_occurrence(&reminder, now);

    if today_at < now {
        prop_assert_eq!(next, None);
    } else {
        prop_assert_eq!(next, Some(today_at));
    }
}

#[proptest]
fn weekly_lands_on_a_selected_weekday_within_a_week(
    #[strategy(now_strategy())] now: NaiveDateTime,
    #[strategy(fire_time_strategy())] time: (u32, u32),
    #[strategy(proptest::collection::btree_set(0u8..7, 1..7))] weekdays: BTreeSet<u8>,
) {
    let reminder = Reminder {
        weekdays: weekdays.clone(),
        ..reminder(time, ReminderRepeat::Weekly)
    };

    let next = next_occurrence(&reminder, now).expect("weekly reminders always fire again");

    let weekday = u8::try_from(next.weekday().num_days_from_sunday()).unwrap();
    prop_assert!(weekdays.contains(&weekday));
    prop_assert!(next >= now);
    prop_assert!(next - now <= TimeDelta::days(7));
}

#[proptest]
fn monthly_calendar_lands_on_a_selected_date(
    #[strategy(now_strategy())] now: NaiveDateTime,
    #[strategy(fire_time_strategy())] time: (u32, u32),
    #[strategy(proptest::collection::btree_set(1u8..=31, 1..5))] dates: BTreeSet<u8>,
) {
    let reminder = Reminder {
        dates: dates.clone(),
        ..reminder(time, ReminderRepeat::Monthly)
    };

    let next = next_occurrence(&reminder, now).expect("valid dates always fire again");

    let day = u8::try_from(next.day()).unwrap();
    prop_assert!(dates.contains(&day));
    prop_assert!(next >= now);
    prop_assert!(next - now <= TimeDelta::days(62));
}

#[proptest]
fn next_occurrence_is_idempotent(
    #[strategy(now_strategy())] now: NaiveDateTime,
    #[strategy(fire_time_strategy())] time: (u32, u32),
    #[strategy(0usize..4)] kind: usize,
) {
    let repeat = [
        ReminderRepeat::None,
        ReminderRepeat::Daily,
        ReminderRepeat::Weekly,
        ReminderRepeat::Monthly,
    ][kind]
        .clone();
    let reminder = reminder(time, repeat);

    prop_assert_eq!(next_occurrence(&reminder, now), next_occurrence(&reminder, now));
}
