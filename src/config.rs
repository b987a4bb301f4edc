//! Configuration for PME runs

/// Settings shared by the periodic IRR and dated XIRR root finders
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Starting rate for Newton-Raphson (per period, or per year for XIRR)
    pub initial_guess: f64,

    /// Convergence tolerance on the rate step, relative once the rate exceeds 100%
    pub tolerance: f64,

    /// Iteration cap for each of Newton-Raphson and bisection
    pub max_iterations: usize,

    /// Lower end of the first bisection bracket (-99%); the search continues toward -100%
    pub lower_bound: f64,

    /// Upper end of the first bisection bracket (1000%); widened tenfold from there
    pub upper_bound: f64,

    /// Largest rate the widened bracket reaches
    pub max_rate: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.05,
            tolerance: 1e-10,
            max_iterations: 1000,
            lower_bound: -0.99,
            upper_bound: 10.0,
            max_rate: 1e15,
        }
    }
}

/// Configuration for a PME evaluation
#[derive(Debug, Clone)]
pub struct PmeConfig {
    /// Retain the ledger table in the result
    pub verbose: bool,

    /// Root finder settings
    pub solver: SolverConfig,

    /// Days per year used to turn day counts into XIRR exponents
    pub day_count_basis: f64,
}

impl PmeConfig {
    /// Config that skips building the ledger table
    pub fn terse() -> Self {
        Self {
            verbose: false,
            ..Default::default()
        }
    }
}

impl Default for PmeConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            solver: SolverConfig::default(),
            day_count_basis: 365.0,
        }
    }
}
