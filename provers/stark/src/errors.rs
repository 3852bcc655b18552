use thiserror::Error;

/// A validation failure in `ProofOptions`, raised at prover/verifier
/// construction, before any cryptographic work happens.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("expansion_factor must be a power of two >= 4, got {0}")]
    InvalidExpansionFactor(usize),
    #[error("num_colinearity_checks * log2(expansion_factor) = {actual} bits, below the required security_level of {required} bits")]
    InsufficientSecurityMargin { actual: u32, required: u32 },
    #[error("num_colinearity_checks must be at least 1")]
    InvalidColinearityChecks,
}

/// Every way a proof can fail to verify. The verifier's public API collapses
/// all of these into a single boolean reject (per the no-leak requirement);
/// this enum exists for internal logging and for prover-side panics, where
/// leaking the reason is fine.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum StarkError {
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    #[error("merkle authentication path failed to reconstruct the committed root")]
    MerkleFailure,
    #[error("FRI colinearity check failed or the folded polynomial exceeded its degree threshold")]
    FriRejection,
    #[error("composition value disagreed with the FRI-returned value, or a cross-table equality broke")]
    AlgebraicMismatch,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<brainfuck_crypto::errors::MerkleError> for StarkError {
    fn from(_: brainfuck_crypto::errors::MerkleError) -> Self {
        StarkError::MerkleFailure
    }
}

impl From<brainfuck_math::errors::FftError> for StarkError {
    fn from(e: brainfuck_math::errors::FftError) -> Self {
        StarkError::MalformedProof(e.to_string())
    }
}

impl From<brainfuck_math::errors::PolynomialError> for StarkError {
    fn from(e: brainfuck_math::errors::PolynomialError) -> Self {
        StarkError::MalformedProof(e.to_string())
    }
}
