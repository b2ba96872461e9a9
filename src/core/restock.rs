use crate::domain::model::{Category, CategoryWindow};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const NANOS_PER_MS: i64 = 1_000_000;

/// Start of `now`'s calendar day in `tz`, as a UTC instant.
///
/// Zones that skip local midnight (DST jumping at 00:00) start the day at the
/// first local minute that exists.
pub fn day_start(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let midnight = now.with_timezone(&tz).date_naive().and_time(NaiveTime::MIN);

    (0..=180)
        .find_map(|minutes| {
            tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Most recent and next reset boundary around `now` for a fixed interval,
/// with boundaries aligned to the start of the day in `tz`.
///
/// When `now` sits exactly on a boundary both resets equal `now`.
pub fn reset_window(now: DateTime<Utc>, interval_ms: i64, tz: Tz) -> CategoryWindow {
    debug_assert!(interval_ms > 0, "restock interval must be positive");

    let start = day_start(now, tz);
    let interval_ns = interval_ms * NANOS_PER_MS;
    let elapsed_ns = (now - start).num_nanoseconds().unwrap_or_default();

    let floor_ns = elapsed_ns.div_euclid(interval_ns) * interval_ns;
    let ceil_ns = if elapsed_ns.rem_euclid(interval_ns) == 0 {
        floor_ns
    } else {
        floor_ns + interval_ns
    };

    CategoryWindow {
        interval_ms,
        last_reset: start + Duration::nanoseconds(floor_ns),
        next_reset: start + Duration::nanoseconds(ceil_ns),
    }
}

/// Remaining time until `target` as `HHh MMm SSs`. Not clamped at zero.
pub fn format_countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_duration_ms((target - now).num_milliseconds())
}

pub fn format_duration_ms(diff_ms: i64) -> String {
    let hours = diff_ms / HOUR_MS;
    let minutes = (diff_ms % HOUR_MS) / MINUTE_MS;
    let seconds = (diff_ms % MINUTE_MS) / SECOND_MS;
    format!("{}h {}m {}s", pad(hours), pad(minutes), pad(seconds))
}

fn pad(value: i64) -> String {
    format!("{:0>2}", value)
}

/// Elapsed time in its largest unit only: seconds, minutes or hours.
pub fn time_since(elapsed_ms: i64) -> String {
    let seconds = elapsed_ms / SECOND_MS;
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    format!("{}h ago", minutes / 60)
}

/// Wall-clock time in `tz`, e.g. `3:05 PM`.
pub fn format_clock_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockTimer {
    /// Next reset as epoch milliseconds.
    pub timestamp: i64,
    pub countdown: String,
    #[serde(rename = "LastRestock")]
    pub last_restock: String,
    #[serde(rename = "timeSinceLastRestock")]
    pub time_since_last_restock: String,
}

impl RestockTimer {
    pub fn compute(now: DateTime<Utc>, interval_ms: i64, tz: Tz) -> Self {
        let window = reset_window(now, interval_ms, tz);
        Self {
            timestamp: window.next_reset.timestamp_millis(),
            countdown: format_countdown(window.next_reset, now),
            last_restock: format_clock_time(window.last_reset, tz),
            time_since_last_restock: time_since((now - window.last_reset).num_milliseconds()),
        }
    }
}

/// Board entries in output order, with their JSON keys.
const BOARD_KEYS: [(Category, &str); 5] = [
    (Category::Egg, "egg"),
    (Category::Gear, "gear"),
    (Category::Seed, "seeds"),
    (Category::Cosmetic, "cosmetic"),
    (Category::Night, "SwarmEvent"),
];

/// Every category timer, computed from a single `now`.
///
/// A category gets a timer exactly when it has a restock interval.
#[derive(Debug, Clone, PartialEq)]
pub struct RestockBoard {
    timers: BTreeMap<Category, RestockTimer>,
}

impl RestockBoard {
    pub fn compute(now: DateTime<Utc>, tz: Tz) -> Self {
        let timers = Category::ALL
            .into_iter()
            .filter_map(|category| {
                category
                    .restock_interval_ms()
                    .map(|interval_ms| (category, RestockTimer::compute(now, interval_ms, tz)))
            })
            .collect();
        Self { timers }
    }

    pub fn timer_for(&self, category: Category) -> Option<&RestockTimer> {
        self.timers.get(&category)
    }

    pub fn countdown_for(&self, category: Category) -> Option<&str> {
        self.timer_for(category).map(|t| t.countdown.as_str())
    }
}

impl Serialize for RestockBoard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (category, key) in BOARD_KEYS {
            if let Some(timer) = self.timer_for(category) {
                map.serialize_entry(key, timer)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_day_start_uses_reference_timezone() {
        // 2024-07-15 is EDT (UTC-4), local midnight is 04:00Z.
        assert_eq!(
            day_start(at("2024-07-15T14:30:01Z"), New_York),
            at("2024-07-15T04:00:00Z")
        );
        // 02:00Z on the 16th is still the 15th in New York.
        assert_eq!(
            day_start(at("2024-07-16T02:00:00Z"), New_York),
            at("2024-07-15T04:00:00Z")
        );
        // Winter, EST (UTC-5).
        assert_eq!(
            day_start(at("2024-01-10T12:00:00Z"), New_York),
            at("2024-01-10T05:00:00Z")
        );
    }

    #[test]
    fn test_reset_window_egg_interval() {
        let now = at("2024-07-15T14:30:01Z");
        let window = reset_window(now, 30 * MINUTE_MS, New_York);

        assert_eq!(window.interval_ms, 30 * MINUTE_MS);
        assert_eq!(window.last_reset, at("2024-07-15T14:30:00Z"));
        assert_eq!(window.next_reset, at("2024-07-15T15:00:00Z"));
        assert_eq!(format_countdown(window.next_reset, now), "00h 29m 59s");
    }

    #[test]
    fn test_reset_window_on_boundary_collapses() {
        let now = at("2024-07-15T14:30:00Z");
        let window = reset_window(now, 5 * MINUTE_MS, New_York);

        assert_eq!(window.last_reset, now);
        assert_eq!(window.next_reset, now);
        assert_eq!(format_countdown(window.next_reset, now), "00h 00m 00s");
    }

    #[test]
    fn test_reset_window_invariants_hold_across_the_day() {
        let intervals = [5 * MINUTE_MS, 30 * MINUTE_MS, HOUR_MS, 4 * HOUR_MS];
        let base = at("2024-03-10T03:00:00Z");

        // Walk through a DST change day in uneven steps, including sub-millisecond offsets.
        for step in 0..400 {
            let now = base + Duration::milliseconds(step * 271_003) + Duration::nanoseconds(step * 7);
            for interval_ms in intervals {
                let window = reset_window(now, interval_ms, New_York);
                let span = (window.next_reset - window.last_reset).num_milliseconds();

                assert!(window.last_reset <= now, "last_reset after now at {now}");
                assert!(now <= window.next_reset, "next_reset before now at {now}");
                assert!(span == 0 || span == interval_ms, "span {span} for {interval_ms}");
            }
        }
    }

    #[test]
    fn test_format_duration_pads_fields() {
        assert_eq!(format_duration_ms(3_661_000), "01h 01m 01s");
        assert_eq!(format_duration_ms(0), "00h 00m 00s");
        assert_eq!(format_duration_ms(999), "00h 00m 00s");
        assert_eq!(format_duration_ms(100 * HOUR_MS), "100h 00m 00s");
        assert_eq!(format_duration_ms(12 * HOUR_MS + 34 * MINUTE_MS + 56_000), "12h 34m 56s");
    }

    #[test]
    fn test_format_countdown_negative_is_not_clamped() {
        let now = at("2024-07-15T14:30:05Z");
        let target = at("2024-07-15T14:30:00Z");
        assert_eq!(format_countdown(target, now), "00h 00m -5s");
        assert_eq!(format_duration_ms(-(HOUR_MS + 15 * SECOND_MS)), "-1h 00m -15s");
    }

    #[test]
    fn test_format_countdown_is_stable_for_same_inputs() {
        let now = at("2024-07-15T14:30:01Z");
        let target = at("2024-07-15T18:00:00Z");
        assert_eq!(format_countdown(target, now), format_countdown(target, now));
        assert_eq!(format_countdown(target, now), "03h 29m 59s");
    }

    #[test]
    fn test_time_since_tiers() {
        assert_eq!(time_since(0), "0s ago");
        assert_eq!(time_since(59_999), "59s ago");
        assert_eq!(time_since(60_000), "1m ago");
        assert_eq!(time_since(59 * MINUTE_MS + 59_999), "59m ago");
        assert_eq!(time_since(HOUR_MS), "1h ago");
        assert_eq!(time_since(50 * HOUR_MS), "50h ago");
    }

    #[test]
    fn test_format_clock_time() {
        assert_eq!(format_clock_time(at("2024-07-15T19:05:00Z"), New_York), "3:05 PM");
        assert_eq!(format_clock_time(at("2024-07-15T04:00:00Z"), New_York), "12:00 AM");
    }

    fn timer(board: &RestockBoard, category: Category) -> &RestockTimer {
        board.timer_for(category).unwrap()
    }

    #[test]
    fn test_restock_board() {
        let now = at("2024-07-15T14:30:01Z");
        let board = RestockBoard::compute(now, New_York);

        let egg = timer(&board, Category::Egg);
        assert_eq!(egg.countdown, "00h 29m 59s");
        assert_eq!(egg.last_restock, "10:30 AM");
        assert_eq!(egg.time_since_last_restock, "1s ago");
        assert_eq!(egg.timestamp, at("2024-07-15T15:00:00Z").timestamp_millis());

        assert_eq!(timer(&board, Category::Gear).countdown, "00h 04m 59s");
        assert_eq!(timer(&board, Category::Seed), timer(&board, Category::Gear));
        assert_eq!(timer(&board, Category::Cosmetic).countdown, "01h 29m 59s");
        assert_eq!(timer(&board, Category::Cosmetic).last_restock, "8:00 AM");
        assert_eq!(timer(&board, Category::Night).countdown, "00h 29m 59s");

        assert_eq!(board.countdown_for(Category::Seed), Some("00h 04m 59s"));
        assert_eq!(board.countdown_for(Category::Honey), None);
        assert_eq!(board.countdown_for(Category::Easter), None);
    }

    #[test]
    fn test_board_timers_follow_category_intervals() {
        let now = at("2024-07-15T14:30:01Z");
        let board = RestockBoard::compute(now, New_York);

        for category in Category::ALL {
            let expected = category
                .restock_interval_ms()
                .map(|interval_ms| RestockTimer::compute(now, interval_ms, New_York));
            assert_eq!(board.timer_for(category), expected.as_ref(), "{:?}", category);
        }
    }

    #[test]
    fn test_restock_board_json_shape() {
        let board = RestockBoard::compute(at("2024-07-15T14:30:01Z"), New_York);
        let value = serde_json::to_value(&board).unwrap();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 5);
        for key in ["egg", "gear", "seeds", "cosmetic", "SwarmEvent"] {
            assert!(keys.contains(&key), "missing {}", key);
        }
        assert_eq!(value["seeds"], value["gear"]);
        assert_eq!(value["gear"]["LastRestock"], "10:30 AM");
        assert_eq!(value["gear"]["timeSinceLastRestock"], "1s ago");
    }
}
