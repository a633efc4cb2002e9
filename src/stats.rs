// src/stats.rs
//! Aggregate numbers over fetched applications and interviews

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Application, ApplicationStatus, Interview};
use crate::utils::week_bounds;

const TREND_WEEKS: i64 = 8;
const TREND_MONTHS: i32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_interviews: usize,
    pub total_companies: usize,
    pub offers: usize,
    pub rejected: usize,
    pub in_process: usize,
    /// Percent, one decimal
    pub offer_rate: f64,
    /// Percent of interviews with a written review, one decimal
    pub review_rate: f64,
    pub busiest_day: Option<BusiestDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusiestDay {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPeriod {
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub count: usize,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

impl Statistics {
    /// Days are taken in `tz`
    pub fn compute<Tz: TimeZone>(applications: &[Application], interviews: &[Interview], tz: &Tz) -> Self {
        let count_status = |status: ApplicationStatus| {
            applications
                .iter()
                .filter(|a| a.current_status == status)
                .count()
        };
        let offers = count_status(ApplicationStatus::Offer);
        let reviewed = interviews.iter().filter(|i| i.is_reviewed()).count();

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for interview in interviews {
            let day = interview.start_time.with_timezone(tz).date_naive();
            *per_day.entry(day).or_default() += 1;
        }
        // Earliest date wins a tie: BTreeMap iterates in date order and
        // only a strictly larger count replaces the current best.
        let busiest_day = per_day.into_iter().fold(None, |best: Option<BusiestDay>, (date, count)| {
            match best {
                Some(b) if b.count >= count => Some(b),
                _ => Some(BusiestDay { date, count }),
            }
        });

        Self {
            total_interviews: interviews.len(),
            total_companies: applications.len(),
            offers,
            rejected: count_status(ApplicationStatus::Rejected),
            in_process: count_status(ApplicationStatus::InProcess),
            offer_rate: percent(offers, applications.len()),
            review_rate: percent(reviewed, interviews.len()),
            busiest_day,
        }
    }
}

/// Interviews starting in the week (Sunday first) that contains `now`
pub fn this_week_count<Tz: TimeZone>(interviews: &[Interview], now: DateTime<Tz>) -> Result<usize> {
    let (start, end) = week_bounds(now)?;
    Ok(count_between(interviews, start, end))
}

fn count_between(interviews: &[Interview], start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
    interviews
        .iter()
        .filter(|i| i.start_time >= start && i.start_time < end)
        .count()
}

fn month_start<Tz: TimeZone>(year: i32, month0: i32, tz: &Tz) -> Result<DateTime<Utc>> {
    let total = year * 12 + month0;
    let date = NaiveDate::from_ymd_opt(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32, 1)
        .with_context(|| format!("Invalid month offset {}", total))?;
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Midnight does not exist on {}", date))
}

/// Interview counts per bucket, oldest first: 8 weeks or 6 months up to `now`
pub fn trend<Tz: TimeZone>(
    interviews: &[Interview],
    period: TrendPeriod,
    now: DateTime<Tz>,
) -> Result<Vec<TrendPoint>> {
    let tz = now.timezone();
    let mut points = Vec::new();

    match period {
        TrendPeriod::Week => {
            let (current_start, _) = week_bounds(now)?;
            for i in (0..TREND_WEEKS).rev() {
                let start = current_start - Duration::weeks(i);
                let end = start + Duration::weeks(1);
                let label_date = start.with_timezone(&tz).date_naive();
                points.push(TrendPoint {
                    label: format!("{}/{}", label_date.month(), label_date.day()),
                    count: count_between(interviews, start, end),
                });
            }
        }
        TrendPeriod::Month => {
            let today = now.date_naive();
            let month0 = today.month0() as i32;
            for i in (0..TREND_MONTHS).rev() {
                let start = month_start(today.year(), month0 - i, &tz)?;
                let end = month_start(today.year(), month0 - i + 1, &tz)?;
                let label_date = start.with_timezone(&tz).date_naive();
                points.push(TrendPoint {
                    label: format!("{}-{:02}", label_date.year(), label_date.month()),
                    count: count_between(interviews, start, end),
                });
            }
        }
    }

    Ok(points)
}
