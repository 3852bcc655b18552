use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::errors::PolynomialError;
use crate::field::element::FieldElement;
use crate::field::traits::HasFieldOperations;

/// A dense univariate polynomial `c0 + c1*x + c2*x^2 + ...` over `F`.
///
/// Trailing zero coefficients are trimmed by [`UniPoly::new`] so that
/// `degree()` always reflects the true degree.
#[derive(Debug)]
pub struct UniPoly<F: HasFieldOperations> {
    coefficients: Vec<FieldElement<F>>,
}

impl<F: HasFieldOperations> Clone for UniPoly<F> {
    fn clone(&self) -> Self {
        Self { coefficients: self.coefficients.clone() }
    }
}

impl<F: HasFieldOperations> PartialEq for UniPoly<F> {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
    }
}
impl<F: HasFieldOperations> Eq for UniPoly<F> {}

impl<F: HasFieldOperations> UniPoly<F> {
    pub fn new(coefficients: &[FieldElement<F>]) -> Self {
        let mut coefficients = coefficients.to_vec();
        while coefficients.last().is_some_and(|c| c.is_zero()) {
            coefficients.pop();
        }
        Self { coefficients }
    }

    pub fn zero() -> Self {
        Self { coefficients: vec![] }
    }

    pub fn new_monomial(coefficient: FieldElement<F>, degree: usize) -> Self {
        let mut coefficients = vec![FieldElement::zero(); degree];
        coefficients.push(coefficient);
        Self::new(&coefficients)
    }

    pub fn coefficients(&self) -> &[FieldElement<F>] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn leading_coefficient(&self) -> FieldElement<F> {
        self.coefficients.last().cloned().unwrap_or_else(FieldElement::zero)
    }

    /// Evaluates via Horner's method.
    pub fn evaluate(&self, x: &FieldElement<F>) -> FieldElement<F> {
        self.coefficients
            .iter()
            .rev()
            .fold(FieldElement::zero(), |acc, c| acc * x + c.clone())
    }

    pub fn evaluate_slice(&self, xs: &[FieldElement<F>]) -> Vec<FieldElement<F>> {
        xs.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Lagrange-interpolates the unique polynomial of degree `< xs.len()`
    /// through `(xs[i], ys[i])`.
    pub fn interpolate(xs: &[FieldElement<F>], ys: &[FieldElement<F>]) -> Self {
        assert_eq!(xs.len(), ys.len(), "interpolate: xs and ys must have equal length");
        let mut result = UniPoly::zero();
        for i in 0..xs.len() {
            let mut term = UniPoly::new(&[ys[i].clone()]);
            let mut denom = FieldElement::one();
            for j in 0..xs.len() {
                if i == j {
                    continue;
                }
                term = term.mul_with_ref(&UniPoly::new(&[-xs[j].clone(), FieldElement::one()]));
                denom = denom * (xs[i].clone() - xs[j].clone());
            }
            let denom_inv = denom.inv();
            term = term.scalar_mul(&denom_inv);
            result = result + term;
        }
        result
    }

    /// Returns `p(alpha * x)`.
    pub fn scale(&self, alpha: &FieldElement<F>) -> Self {
        let mut power = FieldElement::one();
        let coefficients = self
            .coefficients
            .iter()
            .map(|c| {
                let scaled = c.clone() * power.clone();
                power = power.clone() * alpha.clone();
                scaled
            })
            .collect::<Vec<_>>();
        Self::new(&coefficients)
    }

    pub fn scalar_mul(&self, k: &FieldElement<F>) -> Self {
        Self::new(
            &self
                .coefficients
                .iter()
                .map(|c| c.clone() * k.clone())
                .collect::<Vec<_>>(),
        )
    }

    pub fn mul_with_ref(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut result = vec![FieldElement::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                result[i + j] = result[i + j].clone() + a.clone() * b.clone();
            }
        }
        Self::new(&result)
    }

    /// Euclidean division, returning `(quotient, remainder)`.
    pub fn long_division_with_remainder(&self, divisor: &Self) -> Result<(Self, Self), PolynomialError> {
        if divisor.is_zero() {
            return Err(PolynomialError::DivisionByZero);
        }
        let mut remainder = self.clone();
        let mut quotient_coeffs = vec![FieldElement::zero(); self.degree().saturating_sub(divisor.degree()) + 1];
        let divisor_lead_inv = divisor.leading_coefficient().inv();

        while !remainder.is_zero() && remainder.degree() >= divisor.degree() {
            let shift = remainder.degree() - divisor.degree();
            let coeff = remainder.leading_coefficient() * divisor_lead_inv.clone();
            quotient_coeffs[shift] = coeff.clone();
            let term = Self::new_monomial(coeff, shift).mul_with_ref(divisor);
            remainder = remainder - term;
        }
        Ok((Self::new(&quotient_coeffs), remainder))
    }

    /// Exact division; `PolynomialError::DivisionByZero` acts as the
    /// "does not divide evenly" signal for callers that expect the
    /// remainder to vanish (zerofier and quotient-polynomial divisions).
    pub fn div_exact(&self, divisor: &Self) -> Result<Self, PolynomialError> {
        let (quotient, remainder) = self.long_division_with_remainder(divisor)?;
        if !remainder.is_zero() {
            return Err(PolynomialError::DivisionByZero);
        }
        Ok(quotient)
    }

    /// `prod (x - roots[i])`.
    pub fn zerofier_domain(roots: &[FieldElement<F>]) -> Self {
        roots.iter().fold(UniPoly::new(&[FieldElement::one()]), |acc, root| {
            acc.mul_with_ref(&UniPoly::new(&[-root.clone(), FieldElement::one()]))
        })
    }
}

impl<F: HasFieldOperations> Add for UniPoly<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let n = self.coefficients.len().max(rhs.coefficients.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coefficients.get(i).cloned().unwrap_or_else(FieldElement::zero);
            let b = rhs.coefficients.get(i).cloned().unwrap_or_else(FieldElement::zero);
            out.push(a + b);
        }
        UniPoly::new(&out)
    }
}

impl<F: HasFieldOperations> Sub for UniPoly<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: HasFieldOperations> Neg for UniPoly<F> {
    type Output = Self;
    fn neg(self) -> Self {
        UniPoly::new(&self.coefficients.into_iter().map(|c| -c).collect::<Vec<_>>())
    }
}

impl<F: HasFieldOperations> Mul for UniPoly<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.mul_with_ref(&rhs)
    }
}

impl<F: HasFieldOperations> Div for UniPoly<F> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        self.div_exact(&rhs).expect("polynomial division had a nonzero remainder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::goldilocks::Goldilocks;

    type FE = FieldElement<Goldilocks>;
    type P = UniPoly<Goldilocks>;

    #[test]
    fn evaluate_constant_polynomial() {
        let p = P::new(&[FE::from(5u64)]);
        assert_eq!(p.evaluate(&FE::from(100u64)), FE::from(5u64));
    }

    #[test]
    fn interpolate_then_evaluate_recovers_points() {
        let xs = vec![FE::from(1u64), FE::from(2u64), FE::from(3u64)];
        let ys = vec![FE::from(1u64), FE::from(4u64), FE::from(9u64)];
        let p = P::interpolate(&xs, &ys);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(&p.evaluate(x), y);
        }
    }

    #[test]
    fn zerofier_vanishes_on_its_roots() {
        let roots = vec![FE::from(2u64), FE::from(5u64), FE::from(9u64)];
        let z = P::zerofier_domain(&roots);
        for root in &roots {
            assert_eq!(z.evaluate(root), FE::zero());
        }
    }

    #[test]
    fn division_recovers_the_quotient() {
        // (x - 1)(x - 2) = x^2 - 3x + 2
        let divisor = P::new(&[FE::from(2u64), -FE::from(3u64), FE::from(1u64)]);
        let cofactor = P::new(&[FE::from(7u64), FE::from(1u64)]); // x + 7
        let product = divisor.mul_with_ref(&cofactor);
        let quotient = product.div_exact(&divisor).unwrap();
        assert_eq!(quotient, cofactor);
    }

    #[test]
    fn trailing_zero_coefficients_are_trimmed() {
        let p = P::new(&[FE::from(1u64), FE::from(0u64), FE::from(0u64)]);
        assert_eq!(p.degree(), 0);
    }
}
