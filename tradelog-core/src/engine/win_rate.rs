//! Win-rate derivation at record creation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::ValidationError;

/// Decimal places kept on a derived win rate.
pub const WIN_RATE_SCALE: u32 = 2;

/// Win rate for a new record, as a percentage of initial capital gained.
///
/// - `initial_capital <= 0` is rejected.
/// - `profit_loss <= 0` gives `0.00` (losses and breakeven are one bucket).
/// - Otherwise `min(profit_loss / initial_capital * 100, 100)`, rounded to two
///   places with midpoints away from zero.
pub fn derive_win_rate(
    profit_loss: Decimal,
    initial_capital: Decimal,
) -> Result<Decimal, ValidationError> {
    if initial_capital <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveCapital(initial_capital));
    }
    if profit_loss <= Decimal::ZERO {
        return Ok(Decimal::new(0, WIN_RATE_SCALE));
    }
    // Compare before multiplying: a huge profit on a tiny capital would
    // otherwise overflow the 96-bit mantissa.
    if profit_loss >= initial_capital {
        return Ok(Decimal::new(10_000, WIN_RATE_SCALE));
    }
    let pct = profit_loss / initial_capital * Decimal::ONE_HUNDRED;
    let mut rate = pct
        .min(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(WIN_RATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // round_dp never widens the scale; pad 50.0 to 50.00
    rate.rescale(WIN_RATE_SCALE);
    Ok(rate)
}
