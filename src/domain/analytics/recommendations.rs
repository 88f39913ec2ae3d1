use std::cmp::Ordering;
use std::collections::HashMap;

use super::stats::round_to;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::recommendation::{Recommendation, RecommendationKind};
use crate::domain::entities::risk::{expiry_cmp, RiskDriver, RiskProfile};
use crate::domain::value_objects::risk_level::RiskLevel;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Share of excess stock value counted as holding cost avoided by a promotion.
const HOLDING_COST_RATE: f64 = 0.1;
const DISCOUNT_PERCENT: f64 = 20.0;
const DEEP_DISCOUNT_PERCENT: f64 = 30.0;

/// A recommendation before priorities are assigned.
struct Candidate {
    recommendation: Recommendation,
    level: RiskLevel,
    days_to_expiry: Option<i64>,
}

/// Builds one recommendation per critical product plus a bulk action for
/// at-risk products beyond the critical cut-off, ranked so that priority 1
/// is the highest financial impact among High-risk items.
#[must_use]
pub fn rank(
    product_risks: &[RiskProfile],
    products: &[ProductSnapshot],
    thresholds: &ThresholdSet,
) -> Vec<Recommendation> {
    let prices: HashMap<&str, f64> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p.unit_price.max(0.0)))
        .collect();

    let mut at_risk: Vec<&RiskProfile> = product_risks
        .iter()
        .filter(|p| p.risk_level >= RiskLevel::Medium)
        .collect();
    at_risk.sort_by(|a, b| a.rank_cmp(b));

    let limit = thresholds.critical_products;
    let mut candidates: Vec<Candidate> = at_risk
        .iter()
        .take(limit)
        .filter_map(|p| {
            let price = prices.get(p.product_id.as_str()).copied().unwrap_or(0.0);
            for_product(p, price, thresholds)
        })
        .collect();

    let overflow: Vec<&RiskProfile> = at_risk.iter().skip(limit).copied().collect();
    if !overflow.is_empty() {
        candidates.push(bulk(&overflow, &prices, thresholds));
    }

    candidates.sort_by(compare);
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| Recommendation {
            priority: u32::try_from(i + 1).unwrap_or(u32::MAX),
            ..c.recommendation
        })
        .collect()
}

fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    let high = |c: &Candidate| c.level == RiskLevel::High;
    high(b)
        .cmp(&high(a))
        .then_with(|| {
            b.recommendation
                .estimated_impact
                .total_cmp(&a.recommendation.estimated_impact)
        })
        .then_with(|| expiry_cmp(a.days_to_expiry, b.days_to_expiry))
        .then_with(|| a.recommendation.product_id.cmp(&b.recommendation.product_id))
        .then_with(|| a.recommendation.action.cmp(&b.recommendation.action))
}

fn for_product(profile: &RiskProfile, price: f64, thresholds: &ThresholdSet) -> Option<Candidate> {
    let name = &profile.name;
    let excess = profile.excess_units;
    let days = profile.days_to_expiry;

    let (kind, action, impact, estimated) = match (profile.driver(), days) {
        (_, Some(d)) if d < 0 => {
            let value = excess * price;
            (
                RecommendationKind::Donate,
                format!("Donate or write off {excess:.0} expired units of {name}"),
                format!("Clears {value:.2} of unsellable stock"),
                value,
            )
        }
        (RiskDriver::Stockout, _) => {
            let quantity = profile.shortfall_units.ceil();
            let lost = (profile.forecast_demand - profile.current_stock).max(0.0) * price;
            (
                RecommendationKind::Restock,
                format!("Restock {name}: order {quantity:.0} units"),
                format!("Protects about {lost:.2} in sales this week"),
                lost,
            )
        }
        (RiskDriver::Overstock, Some(d)) if d <= 1 && excess > 0.0 => {
            let value = excess * price;
            (
                RecommendationKind::Donate,
                format!("Donate {excess:.0} units of {name} before expiry"),
                format!("Avoids writing off {value:.2} of stock"),
                value,
            )
        }
        (RiskDriver::Overstock, Some(d)) if d <= thresholds.expiry_warning_days => {
            let pct = if d <= thresholds.expiry_critical_days {
                DEEP_DISCOUNT_PERCENT
            } else {
                DISCOUNT_PERCENT
            };
            let value = excess * price * (1.0 - pct / 100.0);
            (
                RecommendationKind::Discount,
                format!("Discount {name} by {pct:.0}%"),
                format!("Recovers about {value:.2} before expiry"),
                value,
            )
        }
        (RiskDriver::Overstock, _) => {
            let value = excess * price * HOLDING_COST_RATE;
            (
                RecommendationKind::Promote,
                format!("Promote {name} to reduce {excess:.0} excess units"),
                format!("Saves about {value:.2} in holding cost"),
                value,
            )
        }
        (RiskDriver::None, _) => return None,
    };

    Some(Candidate {
        recommendation: Recommendation {
            action,
            reason: profile.reason.clone(),
            impact,
            priority: 0,
            kind,
            product_id: Some(profile.product_id.clone()),
            estimated_impact: round_to(estimated, 2),
        },
        level: profile.risk_level,
        days_to_expiry: days,
    })
}

fn bulk(overflow: &[&RiskProfile], prices: &HashMap<&str, f64>, thresholds: &ThresholdSet) -> Candidate {
    let estimated: f64 = overflow
        .iter()
        .filter_map(|p| {
            let price = prices.get(p.product_id.as_str()).copied().unwrap_or(0.0);
            for_product(p, price, thresholds)
        })
        .map(|c| c.recommendation.estimated_impact)
        .sum();
    let names: Vec<&str> = overflow.iter().take(3).map(|p| p.name.as_str()).collect();
    let mut reason = format!("Also at risk: {}", names.join(", "));
    if overflow.len() > names.len() {
        reason.push_str(&format!(" and {} more", overflow.len() - names.len()));
    }
    let earliest = overflow.iter().filter_map(|p| p.days_to_expiry).min();

    Candidate {
        recommendation: Recommendation {
            action: format!("Review {} more at-risk products in one pass", overflow.len()),
            reason,
            impact: format!("Combined impact about {estimated:.2}"),
            priority: 0,
            kind: RecommendationKind::Bulk,
            product_id: None,
            estimated_impact: round_to(estimated, 2),
        },
        level: RiskLevel::Medium,
        days_to_expiry: earliest,
    }
}
