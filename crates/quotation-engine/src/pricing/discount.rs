use serde::{Deserialize, Serialize};

/// Flat GST applied after discount, in percent.
pub const TAX_RATE_PERCENT: u64 = 18;

/// `amount * percent / 100`, rounded half away from zero. Saturates at
/// `u64::MAX` instead of overflowing.
pub fn percent_of(amount: u64, percent: u64) -> u64 {
    let scaled = (u128::from(amount) * u128::from(percent) + 50) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Rounds to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_money(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalTotals {
    pub subtotal: u64,
    pub discount: u64,
    pub subtotal_after_discount: u64,
    pub tax: u64,
    pub total: u64,
    pub effective_percent: f64,
}

/// Applies a discount and the flat tax to a subtotal.
///
/// A positive `discount_amount` wins over `discount_percent`. The discount
/// can never push the payable amount below zero.
pub fn finalize(
    subtotal: u64,
    discount_amount: Option<f64>,
    discount_percent: Option<f64>,
) -> FinalTotals {
    let discount = match discount_amount.filter(|amount| *amount > 0.0) {
        Some(amount) => round_money(amount),
        None => {
            let percent = discount_percent.unwrap_or(0.0);
            round_money(subtotal as f64 * percent / 100.0)
        }
    };

    let subtotal_after_discount = subtotal.saturating_sub(discount);
    let tax = percent_of(subtotal_after_discount, TAX_RATE_PERCENT);
    let effective_percent = if subtotal > 0 {
        round2(discount as f64 / subtotal as f64 * 100.0)
    } else {
        0.0
    };

    FinalTotals {
        subtotal,
        discount,
        subtotal_after_discount,
        tax,
        total: subtotal_after_discount.saturating_add(tax),
        effective_percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountKind {
    Amount,
    Percent,
}

/// Interactive discount fields. Whichever field the user last edited drives
/// and the other is derived from it against the current subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountState {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub amount: u64,
    pub percent: f64,
}

impl Default for DiscountState {
    fn default() -> Self {
        Self {
            kind: DiscountKind::Percent,
            amount: 0,
            percent: 0.0,
        }
    }
}

impl DiscountState {
    pub fn from_amount(subtotal: u64, amount: f64) -> Self {
        let mut state = Self::default();
        state.set_amount(subtotal, amount);
        state
    }

    pub fn from_percent(subtotal: u64, percent: f64) -> Self {
        let mut state = Self::default();
        state.set_percent(subtotal, percent);
        state
    }

    /// Amount is clamped to `[0, subtotal]`; percent follows to two decimals.
    pub fn set_amount(&mut self, subtotal: u64, amount: f64) {
        let amount = round_money(amount).min(subtotal);
        self.kind = DiscountKind::Amount;
        self.amount = amount;
        self.percent = if subtotal > 0 {
            round2(amount as f64 / subtotal as f64 * 100.0)
        } else {
            0.0
        };
    }

    /// Percent is clamped to `[0, 100]`; amount follows, rounded.
    pub fn set_percent(&mut self, subtotal: u64, percent: f64) {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        self.kind = DiscountKind::Percent;
        self.percent = percent;
        self.amount = round_money(percent / 100.0 * subtotal as f64);
    }

    /// Re-derives the passive field after the subtotal changed.
    pub fn rebase(&mut self, subtotal: u64) {
        match self.kind {
            DiscountKind::Amount => self.set_amount(subtotal, self.amount as f64),
            DiscountKind::Percent => self.set_percent(subtotal, self.percent),
        }
    }

    pub fn finalize(&self, subtotal: u64) -> FinalTotals {
        match self.kind {
            DiscountKind::Amount => finalize(subtotal, Some(self.amount as f64), None),
            DiscountKind::Percent => finalize(subtotal, None, Some(self.percent)),
        }
    }
}
