use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Click, Link};

/// Click breakdowns for a single link.
///
/// All four groupings cover the same set of click rows, so their counts sum
/// to the same `total`. Day keys are the `YYYY-MM-DD` date part of the click
/// timestamp; a missing referrer is bucketed as "Direct".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickStats {
    pub total: u64,
    pub by_country: BTreeMap<String, u64>,
    pub by_day: BTreeMap<String, u64>,
    pub by_referrer: BTreeMap<String, u64>,
    pub by_device: BTreeMap<String, u64>,
}

/// Projection of a link for the dashboard's "top links" table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLink {
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub total_clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Global dashboard aggregates.
///
/// `total_clicks` sums the advisory `total_clicks` counters, not the
/// materialized click rows; the seeder caps the latter, so the two can
/// legitimately diverge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_links: u64,
    pub total_clicks: u64,
    pub active_links: u64,
    pub clicks_by_day: BTreeMap<String, u64>,
    pub clicks_by_country: BTreeMap<String, u64>,
    pub top_links: Vec<TopLink>,
}

/// Classify a raw user-agent string into the dashboard's three device
/// buckets. Substring matching is the contract here, not full UA parsing.
pub fn device_class(user_agent: &str) -> &'static str {
    if user_agent.contains("iPhone") || user_agent.contains("Android") {
        "Mobile"
    } else if user_agent.contains("iPad") {
        "Tablet"
    } else {
        "Desktop"
    }
}

fn day_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Aggregate one link's click rows into the four breakdowns.
pub(crate) fn click_breakdown<'a>(clicks: impl Iterator<Item = &'a Click>) -> ClickStats {
    let mut total = 0u64;
    let mut by_country: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_day: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_referrer: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_device: BTreeMap<String, u64> = BTreeMap::new();

    for click in clicks {
        total += 1;
        *by_country.entry(click.country.clone()).or_insert(0) += 1;
        *by_day.entry(day_key(&click.timestamp)).or_insert(0) += 1;

        let referrer = click.referrer.as_deref().unwrap_or("Direct");
        *by_referrer.entry(referrer.to_owned()).or_insert(0) += 1;

        *by_device
            .entry(device_class(&click.user_agent).to_owned())
            .or_insert(0) += 1;
    }

    ClickStats {
        total,
        by_country,
        by_day,
        by_referrer,
        by_device,
    }
}

/// Compute the global summary over all links and clicks as of `now`.
///
/// The daily histogram carries exactly 30 keys (today back through 29 days
/// ago), every one pre-seeded to zero before any click is counted in.
pub(crate) fn summary(links: &[Link], clicks: &[Click], now: DateTime<Utc>) -> StatsSummary {
    let total_links = links.len() as u64;
    let total_clicks = links.iter().map(|l| l.total_clicks).sum();
    let active_links = links.iter().filter(|l| l.is_active).count() as u64;

    let mut clicks_by_day: BTreeMap<String, u64> = BTreeMap::new();
    for i in 0..30 {
        clicks_by_day.insert(day_key(&(now - Duration::days(i))), 0);
    }

    let window_start = now - Duration::days(30);
    let mut clicks_by_country: BTreeMap<String, u64> = BTreeMap::new();
    for click in clicks.iter().filter(|c| c.timestamp >= window_start) {
        if let Some(count) = clicks_by_day.get_mut(&day_key(&click.timestamp)) {
            *count += 1;
        }
        *clicks_by_country.entry(click.country.clone()).or_insert(0) += 1;
    }

    let mut ranked: Vec<&Link> = links.iter().collect();
    ranked.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));
    let top_links = ranked
        .into_iter()
        .take(5)
        .map(|l| TopLink {
            id: l.id.clone(),
            short_code: l.short_code.clone(),
            original_url: l.original_url.clone(),
            total_clicks: l.total_clicks,
            created_at: l.created_at,
        })
        .collect();

    StatsSummary {
        total_links,
        total_clicks,
        active_links,
        clicks_by_day,
        clicks_by_country,
        top_links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_class_buckets() {
        assert_eq!(device_class("Mozilla/5.0 (iPhone; CPU iPhone OS 15_0)"), "Mobile");
        assert_eq!(device_class("Mozilla/5.0 (Linux; Android 12)"), "Mobile");
        assert_eq!(device_class("Mozilla/5.0 (iPad; CPU OS 15_0)"), "Tablet");
        assert_eq!(device_class("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"), "Desktop");
        assert_eq!(device_class(""), "Desktop");
    }

    #[test]
    fn summary_histogram_is_preseeded() {
        let now = Utc::now();
        let s = summary(&[], &[], now);
        assert_eq!(s.clicks_by_day.len(), 30);
        assert!(s.clicks_by_day.values().all(|&v| v == 0));
        assert!(s.clicks_by_day.contains_key(&day_key(&now)));
        assert!(s
            .clicks_by_day
            .contains_key(&day_key(&(now - Duration::days(29)))));
    }
}
