use crate::domain::entities::risk::RiskProfile;
use crate::domain::entities::snapshot::MAX_TOP_PRODUCTS;
use crate::domain::entities::top_product::TopProduct;

/// Best sellers by forecast demand, each with a stocking hint. Products
/// flagged as insufficient data or with no forecast demand are excluded.
#[must_use]
pub fn rank(profiles: &[RiskProfile]) -> Vec<TopProduct> {
    let mut candidates: Vec<&RiskProfile> = profiles
        .iter()
        .filter(|p| !p.insufficient_data && p.forecast_demand > 0.0)
        .collect();
    candidates.sort_by(|a, b| {
        b.forecast_demand
            .total_cmp(&a.forecast_demand)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    candidates
        .into_iter()
        .take(MAX_TOP_PRODUCTS)
        .map(|p| TopProduct {
            product_id: p.product_id.clone(),
            name: p.name.clone(),
            current_stock: p.current_stock,
            forecast_demand: p.forecast_demand,
            avg_daily_sales: p.avg_daily_units,
            risk_level: p.risk_level,
            recommendation: stocking_hint(p.current_stock, p.forecast_demand),
        })
        .collect()
}

fn stocking_hint(stock: f64, demand: f64) -> String {
    let missing = (demand - stock).max(0.0).ceil();
    if stock < demand * 0.5 {
        format!("Urgent: order {missing:.0} units")
    } else if stock < demand {
        format!("Order {missing:.0} units")
    } else if stock > demand * 3.0 {
        "Consider a promotion".to_string()
    } else {
        "Stock level optimal".to_string()
    }
}
