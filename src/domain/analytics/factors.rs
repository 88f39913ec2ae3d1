use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use super::features::DailyTotal;
use super::stats::{self, round_to};
use crate::domain::entities::factor::{ExternalFactor, InfluencingFactor};

/// Minimum days of history before weekly patterns are considered.
pub const MIN_PATTERN_DAYS: usize = 14;
/// Weekday average must exceed the overall average by this ratio.
pub const WEEKDAY_PEAK_RATIO: f64 = 1.2;
/// Week-over-week change (percent) reported as a trend.
pub const WEEKLY_TREND_PERCENT: f64 = 15.0;
/// Minimum |r| for weather to count as an influence.
pub const WEATHER_CORRELATION: f64 = 0.3;
/// Minimum paired observations for a weather correlation.
pub const MIN_WEATHER_POINTS: usize = 3;
/// Sales lift (percent) on event or holiday days reported as an influence.
pub const EVENT_LIFT_PERCENT: f64 = 20.0;
/// Lift (percent) of the current season over earlier seasons in the window.
pub const SEASON_LIFT_PERCENT: f64 = 20.0;
/// Days required on each side of a season boundary.
pub const MIN_SEASON_DAYS: usize = 7;

/// Finds the external and calendar signals that moved sales. Returns an
/// empty list when nothing clears its threshold.
#[must_use]
pub fn analyze(totals: &[DailyTotal], factors: &[ExternalFactor]) -> Vec<InfluencingFactor> {
    let mut found: Vec<InfluencingFactor> = Vec::new();
    found.extend(weekday_pattern(totals));
    found.extend(weekly_change(totals).and_then(trend_factor));
    found.extend(weather_correlation(totals, factors).and_then(weather_factor));
    found.extend(calendar_lift(totals, factors, CalendarKind::Event));
    found.extend(calendar_lift(totals, factors, CalendarKind::Holiday));
    found.extend(season_lift(totals).and_then(season_factor));

    found.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| a.factor.cmp(&b.factor))
    });
    found
}

/// Percent change of units sold in the last 7 days against the 7 before.
/// `None` without two full weeks of history or an empty previous week.
#[must_use]
pub fn weekly_change(totals: &[DailyTotal]) -> Option<f64> {
    if totals.len() < MIN_PATTERN_DAYS {
        return None;
    }
    let recent: f64 = totals[totals.len() - 7..].iter().map(|t| t.units).sum();
    let previous: f64 = totals[totals.len() - 14..totals.len() - 7]
        .iter()
        .map(|t| t.units)
        .sum();
    if previous <= 0.0 {
        return None;
    }
    Some((recent / previous - 1.0) * 100.0)
}

/// Pearson correlation of daily units against recorded temperature.
#[must_use]
pub fn weather_correlation(totals: &[DailyTotal], factors: &[ExternalFactor]) -> Option<f64> {
    let units: HashMap<NaiveDate, f64> = totals.iter().map(|t| (t.date, t.units)).collect();
    let mut temperatures: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for factor in factors {
        if let ExternalFactor::Weather {
            date,
            temperature_c: Some(t),
            ..
        } = factor
        {
            temperatures.insert(*date, *t);
        }
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = temperatures
        .iter()
        .filter_map(|(date, t)| units.get(date).map(|u| (*t, *u)))
        .unzip();
    if xs.len() < MIN_WEATHER_POINTS {
        return None;
    }
    Some(stats::pearson(&xs, &ys))
}

/// Meteorological season of a date, as its month span.
fn season_of(date: NaiveDate) -> &'static str {
    match date.month() {
        12 | 1 | 2 => "Dec-Feb",
        3..=5 => "Mar-May",
        6..=8 => "Jun-Aug",
        _ => "Sep-Nov",
    }
}

/// Percent lift of daily units in the season of the latest day against the
/// days of other seasons in the window. `None` unless both sides have
/// enough history.
#[must_use]
pub fn season_lift(totals: &[DailyTotal]) -> Option<(&'static str, f64)> {
    let current = season_of(totals.last()?.date);
    let mut now = Vec::new();
    let mut before = Vec::new();
    for total in totals {
        if season_of(total.date) == current {
            now.push(total.units);
        } else {
            before.push(total.units);
        }
    }
    if now.len() < MIN_SEASON_DAYS || before.len() < MIN_SEASON_DAYS {
        return None;
    }
    let before_avg = stats::mean(&before);
    if before_avg <= 0.0 {
        return None;
    }
    Some((current, (stats::mean(&now) / before_avg - 1.0) * 100.0))
}

fn season_factor((season, lift): (&'static str, f64)) -> Option<InfluencingFactor> {
    if lift.abs() <= SEASON_LIFT_PERCENT {
        return None;
    }
    let direction = if lift > 0.0 { "above" } else { "below" };
    Some(InfluencingFactor {
        factor: "Season".to_string(),
        description: format!(
            "Daily sales since the {season} season began run {:.0}% {direction} the previous season",
            lift.abs()
        ),
        impact: format!("{lift:+.0}%"),
        strength: round_to((lift.abs() / 100.0).min(1.0), 2),
    })
}

fn weekday_pattern(totals: &[DailyTotal]) -> Option<InfluencingFactor> {
    if totals.len() < MIN_PATTERN_DAYS {
        return None;
    }
    let mut by_day: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for total in totals {
        by_day
            .entry(total.date.weekday().num_days_from_monday())
            .or_default()
            .push(total.units);
    }
    let averages: Vec<(u32, f64)> = by_day
        .iter()
        .map(|(day, units)| (*day, stats::mean(units)))
        .collect();
    let overall = stats::mean(&averages.iter().map(|(_, avg)| *avg).collect::<Vec<_>>());
    if overall <= 0.0 {
        return None;
    }

    let (peak_day, peak) = averages
        .iter()
        .copied()
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))?;
    let ratio = peak / overall;
    if ratio <= WEEKDAY_PEAK_RATIO {
        return None;
    }
    let lift = (ratio - 1.0) * 100.0;
    Some(InfluencingFactor {
        factor: "Day of week".to_string(),
        description: format!(
            "{} sales run {lift:.0}% above the weekday average",
            weekday_name(peak_day)
        ),
        impact: format!("+{lift:.0}%"),
        strength: round_to((ratio - 1.0).min(1.0), 2),
    })
}

fn trend_factor(change: f64) -> Option<InfluencingFactor> {
    if change.abs() <= WEEKLY_TREND_PERCENT {
        return None;
    }
    let direction = if change > 0.0 { "up" } else { "down" };
    Some(InfluencingFactor {
        factor: "Weekly trend".to_string(),
        description: format!("Units sold are {direction} {:.0}% on the previous week", change.abs()),
        impact: format!("{change:+.0}%"),
        strength: round_to((change.abs() / 100.0).min(1.0), 2),
    })
}

fn weather_factor(r: f64) -> Option<InfluencingFactor> {
    if r.abs() < WEATHER_CORRELATION {
        return None;
    }
    let direction = if r > 0.0 { "rise" } else { "fall" };
    Some(InfluencingFactor {
        factor: "Weather".to_string(),
        description: format!("Sales {direction} with temperature"),
        impact: format!("r = {r:.2}"),
        strength: round_to(r.abs().min(1.0), 2),
    })
}

#[derive(Clone, Copy)]
enum CalendarKind {
    Event,
    Holiday,
}

fn calendar_lift(
    totals: &[DailyTotal],
    factors: &[ExternalFactor],
    kind: CalendarKind,
) -> Option<InfluencingFactor> {
    let mut names: BTreeMap<NaiveDate, &str> = BTreeMap::new();
    for factor in factors {
        match (kind, factor) {
            (CalendarKind::Event, ExternalFactor::Event { date, name })
            | (CalendarKind::Holiday, ExternalFactor::Holiday { date, name }) => {
                names.entry(*date).or_insert(name.as_str());
            }
            _ => {}
        }
    }
    let marked: HashSet<NaiveDate> = names.keys().copied().collect();
    let (on, off): (Vec<&DailyTotal>, Vec<&DailyTotal>) =
        totals.iter().partition(|t| marked.contains(&t.date));
    if on.is_empty() || off.is_empty() {
        return None;
    }

    let on_avg = stats::mean(&on.iter().map(|t| t.units).collect::<Vec<_>>());
    let off_avg = stats::mean(&off.iter().map(|t| t.units).collect::<Vec<_>>());
    if off_avg <= 0.0 {
        return None;
    }
    let lift = (on_avg / off_avg - 1.0) * 100.0;
    if lift.abs() <= EVENT_LIFT_PERCENT {
        return None;
    }

    let listed: Vec<&str> = on
        .iter()
        .filter_map(|t| names.get(&t.date).copied())
        .take(3)
        .collect();
    let (factor, noun) = match kind {
        CalendarKind::Event => ("Local events", "event"),
        CalendarKind::Holiday => ("Holidays", "holiday"),
    };
    Some(InfluencingFactor {
        factor: factor.to_string(),
        description: format!(
            "Sales on {noun} days ({}) differ {lift:+.0}% from other days",
            listed.join(", ")
        ),
        impact: format!("{lift:+.0}%"),
        strength: round_to((lift.abs() / 100.0).min(1.0), 2),
    })
}

fn weekday_name(days_from_monday: u32) -> &'static str {
    match days_from_monday {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        _ => "Sunday",
    }
}
