/// Converts a budget from the request currency into INR, the settlement
/// currency of every monetary field downstream, rounding to the nearest
/// whole unit. The rate is static configuration, not a live quote.
pub fn normalize(budget: f64, rate: f64) -> i64 {
    (budget * rate).round() as i64
}
