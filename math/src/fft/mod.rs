pub mod bit_reversing;

use crate::errors::FftError;
use crate::field::element::FieldElement;
use crate::field::traits::{HasFieldOperations, IsFFTField};

use bit_reversing::in_place_bit_reverse_permute;

fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// In-place iterative radix-2 Cooley-Tukey NTT. `values.len()` must be a
/// power of two, and `root` a primitive `values.len()`-th root of unity.
fn ntt_in_place<F: HasFieldOperations>(values: &mut [FieldElement<F>], root: &FieldElement<F>) {
    let n = values.len();
    in_place_bit_reverse_permute(values);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = n / len;
        let w_len = root.pow(step as u128);
        let mut start = 0;
        while start < n {
            let mut w = FieldElement::one();
            for i in 0..half {
                let u = values[start + i].clone();
                let v = values[start + i + half].clone() * w.clone();
                values[start + i] = u.clone() + v.clone();
                values[start + i + half] = u - v;
                w = w * w_len.clone();
            }
            start += len;
        }
        len *= 2;
    }
}

/// Evaluates `p` (padded with zeros to length `domain_size`) on the coset
/// `{coset_offset * omega^i : i in 0..domain_size}`.
pub fn evaluate_offset_fft<F: IsFFTField>(
    coefficients: &[FieldElement<F>],
    domain_size: usize,
    coset_offset: &FieldElement<F>,
) -> Result<Vec<FieldElement<F>>, FftError>
where
    F::BaseType: Clone,
{
    if !is_power_of_two(domain_size) {
        return Err(FftError::DomainSizeNotPowerOfTwo(domain_size));
    }
    let log_n = domain_size.trailing_zeros() as u64;
    let root = F::primitive_root_of_unity(log_n).ok_or(FftError::OrderTooLarge)?;
    let root = FieldElement::new(root);

    let mut padded: Vec<FieldElement<F>> = coefficients.to_vec();
    padded.resize(domain_size, FieldElement::zero());

    // Evaluate on the offset coset by pre-scaling coefficient i by offset^i,
    // which turns "evaluate on g*<omega>" into a plain NTT on <omega>.
    let mut power = FieldElement::one();
    for c in padded.iter_mut() {
        *c = c.clone() * power.clone();
        power = power * coset_offset.clone();
    }

    ntt_in_place(&mut padded, &root);
    Ok(padded)
}

pub fn evaluate_fft<F: IsFFTField>(
    coefficients: &[FieldElement<F>],
    domain_size: usize,
) -> Result<Vec<FieldElement<F>>, FftError>
where
    F::BaseType: Clone,
{
    evaluate_offset_fft(coefficients, domain_size, &FieldElement::one())
}

/// Inverse of [`evaluate_offset_fft`]: recovers the coefficients of the
/// unique polynomial of degree `< evaluations.len()` with those evaluations.
pub fn interpolate_offset_fft<F: IsFFTField>(
    evaluations: &[FieldElement<F>],
    coset_offset: &FieldElement<F>,
) -> Result<Vec<FieldElement<F>>, FftError>
where
    F::BaseType: Clone,
{
    let n = evaluations.len();
    if !is_power_of_two(n) {
        return Err(FftError::DomainSizeNotPowerOfTwo(n));
    }
    let log_n = n.trailing_zeros() as u64;
    let root = F::primitive_root_of_unity(log_n).ok_or(FftError::OrderTooLarge)?;
    let root = FieldElement::new(root);
    let root_inv = root.inv();

    let mut values = evaluations.to_vec();
    ntt_in_place(&mut values, &root_inv);

    let n_inv = FieldElement::<F>::from(n as u64).inv();
    let offset_inv = coset_offset.inv();
    let mut power = FieldElement::one();
    for c in values.iter_mut() {
        *c = c.clone() * n_inv.clone() * power.clone();
        power = power.clone() * offset_inv.clone();
    }
    Ok(values)
}

pub fn interpolate_fft<F: IsFFTField>(evaluations: &[FieldElement<F>]) -> Result<Vec<FieldElement<F>>, FftError>
where
    F::BaseType: Clone,
{
    interpolate_offset_fft(evaluations, &FieldElement::one())
}

/// Pointwise division of two codewords evaluated on the same coset. Fails if
/// any entry of `v` is zero, meaning the divisor has a root on that coset.
pub fn divide<F: HasFieldOperations>(
    u: &[FieldElement<F>],
    v: &[FieldElement<F>],
) -> Result<Vec<FieldElement<F>>, FftError> {
    if u.len() != v.len() {
        return Err(FftError::InputLengthMismatch);
    }
    if v.iter().any(|x| x.is_zero()) {
        return Err(FftError::DivisionByZeroOnCoset);
    }
    Ok(batch_inverse(v).into_iter().zip(u).map(|(vi_inv, ui)| vi_inv * ui.clone()).collect())
}

/// Montgomery's trick: inverts `n` field elements with one field inversion
/// and `3n` multiplications instead of `n` inversions. Zero entries are left
/// as zero rather than causing a panic, since callers sometimes batch-invert
/// sparse vectors where a zero means "not used here".
pub fn batch_inverse<F: HasFieldOperations>(values: &[FieldElement<F>]) -> Vec<FieldElement<F>> {
    let n = values.len();
    let mut prefix = Vec::with_capacity(n);
    let mut running = FieldElement::one();
    for v in values {
        prefix.push(running.clone());
        if !v.is_zero() {
            running = running * v.clone();
        }
    }
    let mut inv_running = running.inv();
    let mut result = vec![FieldElement::zero(); n];
    for i in (0..n).rev() {
        if values[i].is_zero() {
            continue;
        }
        result[i] = inv_running.clone() * prefix[i].clone();
        inv_running = inv_running * values[i].clone();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::goldilocks::Goldilocks;
    use crate::polynomial::univariate::UniPoly;

    type FE = FieldElement<Goldilocks>;

    #[test]
    fn evaluate_then_interpolate_roundtrips() {
        let coefficients = vec![FE::from(1u64), FE::from(2u64), FE::from(3u64), FE::from(4u64)];
        let evaluations = evaluate_fft::<Goldilocks>(&coefficients, 4).unwrap();
        let recovered = interpolate_fft::<Goldilocks>(&evaluations).unwrap();
        assert_eq!(recovered, coefficients);
    }

    #[test]
    fn fft_evaluation_matches_direct_evaluation() {
        let coefficients = vec![FE::from(5u64), FE::from(0u64), FE::from(1u64), FE::from(2u64)];
        let poly = UniPoly::new(&coefficients);
        let evaluations = evaluate_fft::<Goldilocks>(&coefficients, 4).unwrap();
        let log_n = 2u64;
        let root = FieldElement::new(Goldilocks::primitive_root_of_unity(log_n).unwrap());
        let mut power = FieldElement::one();
        for eval in evaluations {
            assert_eq!(eval, poly.evaluate(&power));
            power = power * root.clone();
        }
    }

    #[test]
    fn batch_inverse_matches_individual_inversion() {
        let values = vec![FE::from(3u64), FE::from(17u64), FE::from(101u64)];
        let inverses = batch_inverse(&values);
        for (v, v_inv) in values.iter().zip(inverses.iter()) {
            assert_eq!(v.clone() * v_inv.clone(), FE::one());
        }
    }

    #[test]
    fn divide_rejects_a_zero_on_the_coset() {
        let u = vec![FE::from(1u64), FE::from(2u64)];
        let v = vec![FE::from(1u64), FE::zero()];
        assert!(matches!(divide(&u, &v), Err(FftError::DivisionByZeroOnCoset)));
    }
}
