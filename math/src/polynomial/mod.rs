pub mod multivariate;
pub mod univariate;

pub use multivariate::MultiPoly;
pub use univariate::UniPoly;
