use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use crate::errors::PolynomialError;
use crate::field::element::FieldElement;
use crate::field::traits::HasFieldOperations;

use super::univariate::UniPoly;

/// A sparse multivariate polynomial: a map from exponent vectors to
/// coefficients. `exponents[i]` is the power of variable `i` in that
/// monomial; trailing zero exponents are allowed but stripped on insert so
/// two semantically equal exponent vectors of different lengths hash equal.
#[derive(Debug)]
pub struct MultiPoly<F: HasFieldOperations> {
    terms: BTreeMap<Vec<u64>, FieldElement<F>>,
}

impl<F: HasFieldOperations> Clone for MultiPoly<F> {
    fn clone(&self) -> Self {
        Self { terms: self.terms.clone() }
    }
}

impl<F: HasFieldOperations> PartialEq for MultiPoly<F> {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}
impl<F: HasFieldOperations> Eq for MultiPoly<F> {}

fn normalize_exponents(mut exponents: Vec<u64>) -> Vec<u64> {
    while exponents.last() == Some(&0) {
        exponents.pop();
    }
    exponents
}

impl<F: HasFieldOperations> MultiPoly<F> {
    pub fn zero() -> Self {
        Self { terms: BTreeMap::new() }
    }

    pub fn constant(value: FieldElement<F>) -> Self {
        let mut terms = BTreeMap::new();
        if !value.is_zero() {
            terms.insert(vec![], value);
        }
        Self { terms }
    }

    /// The `i`-th variable, `x_i`, in a polynomial ring with `num_vars` total
    /// variables.
    pub fn variable(i: usize, num_vars: usize) -> Self {
        let mut exponents = vec![0u64; num_vars];
        exponents[i] = 1;
        let mut terms = BTreeMap::new();
        terms.insert(normalize_exponents(exponents), FieldElement::one());
        Self { terms }
    }

    pub fn num_variables(&self) -> usize {
        self.terms.keys().map(|e| e.len()).max().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    fn add_term(&mut self, exponents: Vec<u64>, coefficient: FieldElement<F>) {
        if coefficient.is_zero() {
            return;
        }
        let exponents = normalize_exponents(exponents);
        let entry = self.terms.entry(exponents.clone()).or_insert_with(FieldElement::zero);
        let updated = entry.clone() + coefficient;
        if updated.is_zero() {
            self.terms.remove(&exponents);
        } else {
            *entry = updated;
        }
    }

    pub fn add_ref(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (exponents, coefficient) in &other.terms {
            result.add_term(exponents.clone(), coefficient.clone());
        }
        result
    }

    pub fn neg_ref(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(e, c)| (e.clone(), -c.clone())).collect(),
        }
    }

    pub fn sub_ref(&self, other: &Self) -> Self {
        self.add_ref(&other.neg_ref())
    }

    pub fn mul_ref(&self, other: &Self) -> Self {
        let mut result = Self::zero();
        for (e1, c1) in &self.terms {
            for (e2, c2) in &other.terms {
                let len = e1.len().max(e2.len());
                let mut exponents = vec![0u64; len];
                for (i, exp) in e1.iter().enumerate() {
                    exponents[i] += exp;
                }
                for (i, exp) in e2.iter().enumerate() {
                    exponents[i] += exp;
                }
                result.add_term(exponents, c1.clone() * c2.clone());
            }
        }
        result
    }

    pub fn scalar_mul(&self, k: &FieldElement<F>) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|_| !k.is_zero())
                .map(|(e, c)| (e.clone(), c.clone() * k.clone()))
                .collect(),
        }
    }

    /// The maximum total degree of any monomial.
    pub fn degree(&self) -> usize {
        self.terms.keys().map(|e| e.iter().sum::<u64>() as usize).max().unwrap_or(0)
    }

    /// Evaluates at a point `point[i] = x_i`. Fails with `IndexError` if the
    /// polynomial uses more variables than `point` supplies.
    pub fn evaluate(&self, point: &[FieldElement<F>]) -> Result<FieldElement<F>, PolynomialError> {
        let needed = self.num_variables();
        if point.len() < needed {
            return Err(PolynomialError::IndexError { given: point.len(), needed });
        }
        let mut total = FieldElement::zero();
        for (exponents, coefficient) in &self.terms {
            let mut term = coefficient.clone();
            for (i, &exp) in exponents.iter().enumerate() {
                if exp > 0 {
                    term = term * point[i].pow(exp as u128);
                }
            }
            total = total + term;
        }
        Ok(total)
    }

    /// Symbolic degree bound: given a bound on each variable's degree,
    /// returns the maximum total degree any monomial could reach, i.e.
    /// `max_m sum_i exponents[i] * var_degree_bounds[i]`.
    pub fn symbolic_degree_bound(&self, var_degree_bounds: &[usize]) -> usize {
        self.terms
            .keys()
            .map(|exponents| {
                exponents
                    .iter()
                    .enumerate()
                    .map(|(i, &exp)| exp as usize * var_degree_bounds.get(i).copied().unwrap_or(0))
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(0)
    }

    /// Substitutes each variable `x_i` with the univariate polynomial
    /// `substitutions[i]`, yielding a new univariate polynomial. Used to turn
    /// an AIR constraint (a multivariate polynomial in trace-column
    /// variables) into a single polynomial in the trace-domain variable once
    /// each column's interpolant is known.
    pub fn symbolic_evaluate(&self, substitutions: &[UniPoly<F>]) -> Result<UniPoly<F>, PolynomialError>
    where
        F: Clone,
    {
        let needed = self.num_variables();
        if substitutions.len() < needed {
            return Err(PolynomialError::IndexError { given: substitutions.len(), needed });
        }
        let mut total = UniPoly::zero();
        for (exponents, coefficient) in &self.terms {
            let mut term = UniPoly::new(&[coefficient.clone()]);
            for (i, &exp) in exponents.iter().enumerate() {
                for _ in 0..exp {
                    term = term.mul_with_ref(&substitutions[i]);
                }
            }
            total = total + term;
        }
        Ok(total)
    }
}

impl<F: HasFieldOperations> Add for MultiPoly<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.add_ref(&rhs)
    }
}
impl<F: HasFieldOperations> Sub for MultiPoly<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.sub_ref(&rhs)
    }
}
impl<F: HasFieldOperations> Mul for MultiPoly<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.mul_ref(&rhs)
    }
}
impl<F: HasFieldOperations> Neg for MultiPoly<F> {
    type Output = Self;
    fn neg(self) -> Self {
        self.neg_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::goldilocks::Goldilocks;

    type FE = FieldElement<Goldilocks>;
    type MP = MultiPoly<Goldilocks>;

    #[test]
    fn variable_evaluates_to_the_matching_coordinate() {
        let x1 = MP::variable(1, 3);
        let point = [FE::from(10u64), FE::from(20u64), FE::from(30u64)];
        assert_eq!(x1.evaluate(&point).unwrap(), FE::from(20u64));
    }

    #[test]
    fn evaluate_on_short_point_returns_index_error() {
        let x2 = MP::variable(2, 3);
        let point = [FE::from(1u64)];
        assert!(matches!(
            x2.evaluate(&point),
            Err(PolynomialError::IndexError { .. })
        ));
    }

    #[test]
    fn product_of_two_variables_evaluates_correctly() {
        let x0 = MP::variable(0, 2);
        let x1 = MP::variable(1, 2);
        let product = x0.mul_ref(&x1);
        let point = [FE::from(3u64), FE::from(4u64)];
        assert_eq!(product.evaluate(&point).unwrap(), FE::from(12u64));
    }

    #[test]
    fn symbolic_degree_bound_matches_numeric_evaluation_growth() {
        // x0^2 * x1 has total degree 3 under unit bounds, and 2*3+1*5=11 under (3,5)
        let mut terms = BTreeMap::new();
        terms.insert(vec![2, 1], FE::one());
        let p = MP { terms };
        assert_eq!(p.symbolic_degree_bound(&[1, 1]), 3);
        assert_eq!(p.symbolic_degree_bound(&[3, 5]), 11);
    }

    #[test]
    fn symbolic_evaluate_substitutes_univariate_polynomials() {
        use crate::polynomial::univariate::UniPoly;
        // p = x0 + x1, substitute x0 -> t, x1 -> t^2
        let x0 = MP::variable(0, 2);
        let x1 = MP::variable(1, 2);
        let p = x0.add_ref(&x1);
        let subs = vec![
            UniPoly::new(&[FE::zero(), FE::one()]),
            UniPoly::new(&[FE::zero(), FE::zero(), FE::one()]),
        ];
        let result = p.symbolic_evaluate(&subs).unwrap();
        assert_eq!(result.evaluate(&FE::from(2u64)), FE::from(2u64) + FE::from(4u64));
    }
}
