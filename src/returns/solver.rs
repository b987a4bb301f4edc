//! Shared root finder for NPV equations
//!
//! Newton-Raphson from the configured guess, kept above -100%. When Newton fails to
//! settle on a root, the configured bounds are bisected; if they do not bracket a root,
//! the bracket is widened upward by factors of ten and narrowed toward -100% until the
//! NPV changes sign.

use log::{debug, trace};

use crate::config::SolverConfig;
use crate::error::SolverError;

/// Closest the bracket search gets to a rate of -100%
const MIN_GAP_ABOVE_MINUS_ONE: f64 = 1e-15;

/// Newton's answer must leave an NPV this small relative to the gross discounted flows
const NEWTON_RESIDUAL: f64 = 1e-9;

/// Cashflows paired with their discounting exponents: period numbers for IRR, year
/// fractions for XIRR
pub(crate) struct Schedule<'a> {
    cashflows: &'a [f64],
    times: &'a [f64],
}

impl<'a> Schedule<'a> {
    pub(crate) fn new(cashflows: &'a [f64], times: &'a [f64]) -> Self {
        Self { cashflows, times }
    }

    fn flows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.cashflows.iter().copied().zip(self.times.iter().copied())
    }

    pub(crate) fn npv(&self, rate: f64) -> f64 {
        self.npv_and_derivative(rate).0
    }

    /// NPV and its derivative with respect to rate
    fn npv_and_derivative(&self, rate: f64) -> (f64, f64) {
        let base = 1.0 + rate;
        let mut npv = 0.0;
        let mut dnpv = 0.0;

        for (cf, t) in self.flows() {
            if t == 0.0 {
                npv += cf;
                continue;
            }
            let discount = base.powf(t);
            npv += cf / discount;
            dnpv -= t * cf / (discount * base);
        }

        (npv, dnpv)
    }

    /// Sum of absolute discounted cashflows, the magnitude an NPV residual is judged against
    fn gross(&self, rate: f64) -> f64 {
        self.flows()
            .map(|(cf, t)| (cf / (1.0 + rate).powf(t)).abs())
            .sum()
    }

    /// Signs the NPV tends to as the rate approaches -100% and as it grows without bound.
    ///
    /// Near -100% the latest nonzero amount dominates, at very large rates the earliest
    /// one does. Amounts falling on the same time are netted first.
    fn limit_signs(&self, zero: f64) -> (f64, f64) {
        let mut flows: Vec<(f64, f64)> = self.flows().collect();
        flows.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut netted: Vec<f64> = Vec::with_capacity(flows.len());
        let mut previous_time = None;
        for (cf, t) in flows {
            if previous_time == Some(t) {
                if let Some(sum) = netted.last_mut() {
                    *sum += cf;
                }
            } else {
                netted.push(cf);
            }
            previous_time = Some(t);
        }

        let sign = |sum: Option<&f64>| sum.map(|s| s.signum()).unwrap_or(0.0);
        let significant = |s: &&f64| s.abs() > zero;
        (
            sign(netted.iter().rev().find(significant)),
            sign(netted.iter().find(significant)),
        )
    }
}

/// Find the rate where the NPV of `cashflows` discounted over `times` is zero.
///
/// Fails with [`SolverError::NoSignChange`] for one-sided cashflows,
/// [`SolverError::NoRealRoot`] when the NPV never crosses zero, and
/// [`SolverError::Overflow`] when a root exists but lies beyond what `f64` can resolve or
/// the NPV stops being finite before a crossing is found.
pub(crate) fn find_rate(
    cashflows: &[f64],
    times: &[f64],
    config: &SolverConfig,
) -> Result<f64, SolverError> {
    let scale = cashflows.iter().fold(0.0_f64, |m, cf| m.max(cf.abs()));
    if !scale.is_finite() {
        return Err(SolverError::Overflow);
    }
    if scale == 0.0 {
        return Ok(0.0);
    }

    // Anything below rounding noise of the largest amount counts as zero
    let zero = scale * f64::EPSILON;
    let has_positive = cashflows.iter().any(|&cf| cf > zero);
    let has_negative = cashflows.iter().any(|&cf| cf < -zero);
    if !has_positive || !has_negative {
        return Err(SolverError::NoSignChange);
    }

    let schedule = Schedule::new(cashflows, times);

    // A single instant: the NPV does not depend on the rate
    if times.windows(2).all(|w| w[0] == w[1]) {
        let npv = schedule.npv(0.0);
        return if npv.abs() <= zero {
            Ok(0.0)
        } else {
            Err(SolverError::NoRealRoot)
        };
    }

    if let Some(rate) = newton(&schedule, config) {
        return Ok(rate);
    }
    search_bracket(&schedule, config, scale)
}

fn newton(schedule: &Schedule, config: &SolverConfig) -> Option<f64> {
    let mut rate = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = schedule.npv_and_derivative(rate);
        if !npv.is_finite() || !dnpv.is_finite() {
            debug!("NPV not finite at rate {}, switching to bracket search", rate);
            return None;
        }

        trace!("newton {}: rate={:.12} npv={:.6e}", iteration, rate, npv);

        if dnpv.abs() < 1e-20 {
            debug!("derivative vanished at rate {}, switching to bracket search", rate);
            return None;
        }

        let mut new_rate = rate - npv / dnpv;
        if new_rate <= -1.0 {
            // Halve the distance to -100% instead of stepping past it
            new_rate = (rate - 1.0) / 2.0;
        }

        if (new_rate - rate).abs() < config.tolerance * rate.abs().max(1.0) {
            let residual = schedule.npv(new_rate);
            if residual.abs() <= NEWTON_RESIDUAL * schedule.gross(new_rate) {
                return Some(new_rate);
            }
            debug!(
                "newton stalled at rate {} with NPV {:e}, switching to bracket search",
                new_rate, residual
            );
            return None;
        }

        rate = new_rate;
    }

    debug!("newton did not converge, switching to bracket search");
    None
}

/// Bisect the configured bounds, widening them until the NPV changes sign
fn search_bracket(
    schedule: &Schedule,
    config: &SolverConfig,
    scale: f64,
) -> Result<f64, SolverError> {
    let (lower, upper) = (config.lower_bound, config.upper_bound);
    let npv_lower = schedule.npv(lower);
    let npv_upper = schedule.npv(upper);
    let mut overflowed = !npv_lower.is_finite() || !npv_upper.is_finite();

    if !overflowed && npv_lower * npv_upper <= 0.0 {
        return bisect(schedule, config, scale, (lower, npv_lower), (upper, npv_upper));
    }

    let mut previous = (upper, npv_upper);
    while previous.1.is_finite() && previous.0 < config.max_rate {
        let rate = previous.0.max(1.0) * 10.0;
        let npv = schedule.npv(rate);
        if !npv.is_finite() {
            overflowed = true;
            break;
        }
        if npv * previous.1 <= 0.0 {
            debug!("bracket widened up to [{}, {}]", previous.0, rate);
            return bisect(schedule, config, scale, previous, (rate, npv));
        }
        previous = (rate, npv);
    }

    let mut previous = (lower, npv_lower);
    let mut gap = 1.0 + lower;
    while previous.1.is_finite() && gap > MIN_GAP_ABOVE_MINUS_ONE {
        gap /= 10.0;
        let rate = -1.0 + gap;
        let npv = schedule.npv(rate);
        if !npv.is_finite() {
            overflowed = true;
            break;
        }
        if npv * previous.1 <= 0.0 {
            debug!("bracket widened down to [{}, {}]", rate, previous.0);
            return bisect(schedule, config, scale, (rate, npv), previous);
        }
        previous = (rate, npv);
    }

    let (near_minus_one, at_infinity) = schedule.limit_signs(scale * f64::EPSILON);
    if overflowed || near_minus_one * at_infinity < 0.0 {
        debug!("root lies beyond representable rates");
        Err(SolverError::Overflow)
    } else {
        Err(SolverError::NoRealRoot)
    }
}

fn bisect(
    schedule: &Schedule,
    config: &SolverConfig,
    scale: f64,
    (mut low, mut npv_low): (f64, f64),
    (mut high, npv_high): (f64, f64),
) -> Result<f64, SolverError> {
    if npv_low == 0.0 {
        return Ok(low);
    }
    if npv_high == 0.0 {
        return Ok(high);
    }

    for iteration in 0..config.max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = schedule.npv(mid);
        if !npv_mid.is_finite() {
            return Err(SolverError::Overflow);
        }

        trace!("bisection {}: rate={:.12} npv={:.6e}", iteration, mid, npv_mid);

        if npv_mid.abs() <= scale * f64::EPSILON
            || (high - low) / 2.0 < config.tolerance * mid.abs().max(1.0)
        {
            return Ok(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(SolverError::NotConverged)
}
