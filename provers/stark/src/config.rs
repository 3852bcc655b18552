use crate::errors::ConfigError;

/// Tunable protocol parameters, validated once at construction so that every
/// later step can assume them sound (§6 of the specification).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOptions {
    /// Blowup between the trace domain and the FRI coset. Power of two, >= 4.
    pub expansion_factor: usize,
    /// Number of FRI colinearity checks, `c`.
    pub num_colinearity_checks: usize,
    /// Target security level in bits.
    pub security_level: u32,
    /// Extra degree margin folded into the composition polynomial's
    /// zero-knowledge randomizer term, on top of the quotients' own maximum
    /// degree. Always `4 * num_colinearity_checks`, per §3.
    pub num_randomizers: usize,
    /// Bits of proof-of-work grinding applied before query sampling. Zero
    /// disables grinding.
    pub grinding_factor: u32,
}

impl ProofOptions {
    pub fn new(expansion_factor: usize, num_colinearity_checks: usize, security_level: u32) -> Result<Self, ConfigError> {
        Self::with_grinding(expansion_factor, num_colinearity_checks, security_level, 0)
    }

    pub fn with_grinding(
        expansion_factor: usize,
        num_colinearity_checks: usize,
        security_level: u32,
        grinding_factor: u32,
    ) -> Result<Self, ConfigError> {
        if expansion_factor < 4 || !expansion_factor.is_power_of_two() {
            return Err(ConfigError::InvalidExpansionFactor(expansion_factor));
        }
        if num_colinearity_checks < 1 {
            return Err(ConfigError::InvalidColinearityChecks);
        }
        let log2_e = expansion_factor.trailing_zeros();
        let query_bits = num_colinearity_checks as u32 * log2_e + grinding_factor;
        if query_bits < security_level {
            return Err(ConfigError::InsufficientSecurityMargin { actual: query_bits, required: security_level });
        }
        Ok(Self {
            expansion_factor,
            num_colinearity_checks,
            security_level,
            num_randomizers: 4 * num_colinearity_checks,
            grinding_factor,
        })
    }

    /// The default used throughout this crate's tests: expansion factor 8
    /// (`log2(E) = 3`), enough colinearity checks to clear 160 bits with no
    /// grinding, matching the spec's default `security_level`.
    pub fn default_160_bit() -> Result<Self, ConfigError> {
        Self::new(8, 54, 160)
    }
}
