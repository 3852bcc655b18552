use thiserror::Error;

/// Errors that can occur while doing field arithmetic or converting
/// field elements to and from their byte representation.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FieldError {
    #[error("cannot invert the additive identity")]
    InvZero,
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid amount of bytes to build a field element")]
    InvalidByteLength,
    #[error("value is not a valid representative of the field")]
    InvalidValue,
}

/// Errors raised by the NTT / coset-FFT module.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FftError {
    #[error("domain size {0} is not a power of two")]
    DomainSizeNotPowerOfTwo(usize),
    #[error("domain order exceeds the field's two-adicity")]
    OrderTooLarge,
    #[error("the input length does not match the requested domain size")]
    InputLengthMismatch,
    #[error("divisor has a root on the evaluation coset")]
    DivisionByZeroOnCoset,
}

/// Errors raised while building or evaluating polynomials.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum PolynomialError {
    #[error("evaluation point has {given} coordinates but {needed} variables are used")]
    IndexError { given: usize, needed: usize },
    #[error("division by the zero polynomial")]
    DivisionByZero,
}
