//! A multi-table STARK prover and verifier for a brainfuck-like tape
//! machine: five independent AIRs (processor, instruction, memory, input,
//! output) tied together by permutation and evaluation arguments, proved
//! with FRI over a cubic extension of the Goldilocks field.

pub mod challenges;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extensions;
pub mod fri;
pub mod proof;
pub mod prover;
pub mod table;
pub mod table_extension;
pub mod verifier;
pub mod vm;

pub use config::ProofOptions;
pub use errors::{ConfigError, StarkError};
pub use prover::prove;
pub use verifier::verify;
pub use vm::{execute, ExecutionTrace, VmError};
