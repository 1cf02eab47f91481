use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date window a check-in analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CheckInWindow {
    /// The trailing `days`-day window that ends on (and includes) `end`.
    pub fn ending_on(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: end - Duration::days(span),
            end,
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First day of the second half. The first half holds `days / 2` days.
    pub fn midpoint(&self) -> NaiveDate {
        self.start + Duration::days(self.days() / 2)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.days()).map(move |offset| start + Duration::days(offset))
    }

    /// Intersection with `[start, end]`, or `None` when they do not overlap.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<CheckInWindow> {
        let clipped = CheckInWindow {
            start: start.max(self.start),
            end: end.min(self.end),
        };
        (clipped.start <= clipped.end).then_some(clipped)
    }

    /// Full 7-day buckets ending on the window end, oldest first.
    ///
    /// Leftover days at the start of the window that do not fill a week are skipped.
    pub fn weekly_buckets(&self) -> Vec<CheckInWindow> {
        let weeks = self.days() / 7;
        (0..weeks)
            .rev()
            .map(|back| {
                let end = self.end - Duration::days(back * 7);
                CheckInWindow {
                    start: end - Duration::days(6),
                    end,
                }
            })
            .collect()
    }
}
