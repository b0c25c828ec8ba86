use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Trend {
    Surge,
    Up,
    Flat,
    Down,
    Plunge,
}

impl Trend {
    pub fn marker(&self) -> &'static str {
        match self {
            Trend::Surge => "🚀",
            Trend::Up => "📈",
            Trend::Flat => "➡️",
            Trend::Down => "📉",
            Trend::Plunge => "⚠️",
        }
    }
}

/// Bucket a percent change.
pub fn classify(percent: Decimal) -> Trend {
    if percent >= dec!(1.0) {
        Trend::Surge
    } else if percent >= dec!(0.3) {
        Trend::Up
    } else if percent > dec!(-0.3) {
        Trend::Flat
    } else if percent > dec!(-1.0) {
        Trend::Down
    } else {
        Trend::Plunge
    }
}
