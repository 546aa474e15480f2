use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Converts an amount in cents to a dollar value with two decimal places.
pub fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Renders a price as whole dollars, e.g. `20000` becomes `$200`.
pub fn format_price(cents: i64) -> String {
    let dollars =
        cents_to_dollars(cents).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("${}", dollars.normalize())
}
