// Alert analytics: window derivation, daily bucketing, KPI computation.
// Pure logic, no I/O; deterministic given (records, period, now).
// All calendar-date arithmetic uses UTC.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::{
    AlertAnalytics, AlertCharts, AlertKpis, AlertRecord, AnalyticsWindow, Period, Severity,
    SeverityCounts, SourceBreakdown, TrendPoint,
};

/// Window for a period token. 24h is a sliding window ending at `now`;
/// 7d/30d start at UTC midnight N days prior. End is always `now`.
pub fn window_for(period: Period, now: DateTime<Utc>) -> AnalyticsWindow {
    let start = match period {
        Period::H24 => now - Duration::hours(24),
        Period::D7 => midnight_days_back(now, 7),
        Period::D30 => midnight_days_back(now, 30),
    };
    AnalyticsWindow { start, end: now }
}

fn midnight_days_back(now: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    let date = now.date_naive() - Days::new(days);
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Aggregates a record list into the dashboard analytics payload for the
/// requested period.
///
/// Records are filtered to `createdAt` within the window (both bounds
/// inclusive), then tallied into four KPI scalars, one trend bucket per
/// calendar day ending at `now`'s UTC date, a severity distribution over the
/// whole filtered set, and per-source severity counts in first-seen order.
pub fn aggregate(records: &[AlertRecord], period: Period, now: DateTime<Utc>) -> AlertAnalytics {
    let window = window_for(period, now);
    let filtered: Vec<&AlertRecord> = records
        .iter()
        .filter(|r| r.created_at >= window.start && r.created_at <= window.end)
        .collect();

    AlertAnalytics {
        kpis: kpis(&filtered),
        charts: AlertCharts {
            alert_trend: alert_trend(&filtered, period, now),
            severity_distribution: severity_distribution(&filtered),
            by_source: by_source(&filtered),
        },
    }
}

fn kpis(filtered: &[&AlertRecord]) -> AlertKpis {
    let active_alerts = filtered.iter().filter(|r| !r.resolved).count() as u64;
    let critical_alerts = filtered
        .iter()
        .filter(|r| !r.resolved && r.severity == Severity::Critical)
        .count() as u64;
    let warning_alerts = filtered
        .iter()
        .filter(|r| !r.resolved && r.severity == Severity::Warning)
        .count() as u64;

    let total = filtered.len();
    let resolved = filtered.iter().filter(|r| r.resolved).count();
    let resolution_rate = if total > 0 {
        // One decimal place.
        (resolved as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    AlertKpis {
        active_alerts,
        critical_alerts,
        warning_alerts,
        resolution_rate,
    }
}

/// One bucket per UTC calendar day, ascending, ending at `now`'s date.
/// Empty days are kept. Bucket membership is date equality, not a sliding
/// 24h window, so two records on the same date share a bucket even when
/// their instants are nearly a day apart.
fn alert_trend(filtered: &[&AlertRecord], period: Period, now: DateTime<Utc>) -> Vec<TrendPoint> {
    let days = period.trend_days();
    let today = now.date_naive();

    let mut trend = Vec::with_capacity(days as usize);
    for offset in (0..days).rev() {
        let date = today - Days::new(offset);
        trend.push(TrendPoint {
            date: date.format("%Y-%m-%d").to_string(),
            created: created_on(filtered, date),
            resolved: resolved_on(filtered, date),
        });
    }
    trend
}

fn created_on(filtered: &[&AlertRecord], date: NaiveDate) -> u64 {
    filtered
        .iter()
        .filter(|r| r.created_at.date_naive() == date)
        .count() as u64
}

fn resolved_on(filtered: &[&AlertRecord], date: NaiveDate) -> u64 {
    filtered
        .iter()
        .filter(|r| r.resolution_instant().is_some_and(|t| t.date_naive() == date))
        .count() as u64
}

/// Tallies severity over the whole filtered set, regardless of resolution
/// state (the KPIs only count unresolved records; the donut counts all).
fn severity_distribution(filtered: &[&AlertRecord]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for r in filtered {
        counts.bump(r.severity);
    }
    counts
}

/// Groups by display label, keeping first-seen order of the filtered set.
fn by_source(filtered: &[&AlertRecord]) -> Vec<SourceBreakdown> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<SourceBreakdown> = Vec::new();

    for r in filtered {
        let label = display_source(&r.source);
        let i = match index.entry(label) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                groups.push(SourceBreakdown {
                    source: e.key().clone(),
                    critical: 0,
                    warning: 0,
                    info: 0,
                });
                *e.insert(groups.len() - 1)
            }
        };
        match r.severity {
            Severity::Critical => groups[i].critical += 1,
            Severity::Warning => groups[i].warning += 1,
            Severity::Info => groups[i].info += 1,
        }
    }
    groups
}

/// Display label for a source: first letter upper, remainder lower, so case
/// variants of the same source collapse into one group ("vm", "VM" -> "Vm").
pub fn display_source(source: &str) -> String {
    let lower = source.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
