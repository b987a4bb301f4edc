//! NAV tracking for a single account (asset or benchmark)

use serde::Serialize;

/// One account's state inside a single period: price, NAV around the cashflow, and
/// the cashflow itself (asset-holding sign: positive adds to the position).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccountLeg {
    pub price: f64,
    pub nav_before: f64,
    pub cashflow: f64,
    pub nav_after: f64,
}

/// NAV accumulator for one account, carried between period boundaries by its own prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavAccount {
    /// NAV at the current period boundary, before that period's cashflow
    pub nav: f64,
}

impl NavAccount {
    /// Account with nothing invested yet
    pub fn empty() -> Self {
        Self { nav: 0.0 }
    }

    /// Apply `cashflow` at `price`, then grow the position to the next boundary.
    ///
    /// Returns the period's leg and the account carried forward by `price_next / price`.
    pub fn step(self, cashflow: f64, price: f64, price_next: f64) -> (AccountLeg, NavAccount) {
        let nav_after = self.nav + cashflow;
        let leg = AccountLeg {
            price,
            nav_before: self.nav,
            cashflow,
            nav_after,
        };
        let next = NavAccount {
            nav: nav_after * price_next / price,
        };
        (leg, next)
    }

    /// Sell the whole position at `price`; NAV after is exactly zero
    pub fn liquidate(self, price: f64) -> AccountLeg {
        AccountLeg {
            price,
            nav_before: self.nav,
            cashflow: -self.nav,
            nav_after: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_grows_by_price_ratio() {
        let (leg, next) = NavAccount::empty().step(10.0, 1.0, 2.0);
        assert_eq!(leg.nav_before, 0.0);
        assert_eq!(leg.nav_after, 10.0);
        assert_relative_eq!(next.nav, 20.0);

        let (leg, next) = next.step(-5.0, 2.0, 1.0);
        assert_eq!(leg.nav_before, 20.0);
        assert_eq!(leg.nav_after, 15.0);
        assert_relative_eq!(next.nav, 7.5);
    }

    #[test]
    fn test_liquidate_zeroes_position() {
        let leg = NavAccount { nav: 7.5 }.liquidate(1.0);
        assert_eq!(leg.cashflow, -7.5);
        assert_eq!(leg.nav_after, 0.0);
    }
}
