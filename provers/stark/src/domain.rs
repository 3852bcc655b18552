use brainfuck_math::field::element::FieldElement;
use brainfuck_math::field::goldilocks::Goldilocks;
use brainfuck_math::field::traits::{HasFieldOperations, IsFFTField};
use brainfuck_math::field::Fp;

/// Smallest power of two `>= n`.
pub fn next_pow2(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    n.next_power_of_two()
}

/// The two domains every table and quotient polynomial is evaluated on:
/// the trace-interpolation domain `<omicron>` of size `rounded_length`, and
/// the larger FRI coset `g * <omega>` of size `fri_domain_length`.
#[derive(Debug, Clone)]
pub struct Domain {
    pub rounded_length: usize,
    pub randomized_length: usize,
    pub fri_domain_length: usize,
    /// Generator of the trace subgroup, of order `rounded_length`.
    pub omicron: Fp,
    /// Generator of the FRI coset subgroup, of order `fri_domain_length`.
    pub omega: Fp,
    /// Coset offset: a fixed non-subgroup element `g`.
    pub coset_offset: Fp,
}

/// A generator of the full Goldilocks multiplicative group, used as the
/// fixed FRI coset offset so base, extension, and quotient codewords never
/// touch the trace-interpolation subgroup itself.
pub const COSET_GENERATOR: u64 = 7;

impl Domain {
    pub fn new(original_length: usize, num_randomizers: usize, expansion_factor: usize, quotient_degree_bound: usize) -> Self {
        let rounded_length = next_pow2(original_length.max(1));
        let randomized_length = rounded_length + num_randomizers;
        let fri_domain_length = next_pow2(quotient_degree_bound + 1) * expansion_factor;

        let omicron = FieldElement::new(
            Goldilocks::primitive_root_of_unity(rounded_length.trailing_zeros() as u64)
                .expect("rounded_length exceeds the field's two-adicity"),
        );
        let omega = FieldElement::new(
            Goldilocks::primitive_root_of_unity(fri_domain_length.trailing_zeros() as u64)
                .expect("fri_domain_length exceeds the field's two-adicity"),
        );

        Self {
            rounded_length,
            randomized_length,
            fri_domain_length,
            omicron,
            omega,
            coset_offset: Fp::from(COSET_GENERATOR),
        }
    }

    /// The `i`-th point of the trace-interpolation domain, `omicron^i`.
    pub fn trace_point(&self, i: usize) -> Fp {
        self.omicron.pow(i as u128)
    }

    /// The `i`-th point of the FRI coset, `coset_offset * omega^i`.
    pub fn fri_point(&self, i: usize) -> Fp {
        &self.coset_offset * self.omega.pow(i as u128)
    }

    pub fn fri_points(&self) -> Vec<Fp> {
        (0..self.fri_domain_length).map(|i| self.fri_point(i)).collect()
    }

    /// The index stride between a FRI-coset codeword entry and the entry one
    /// trace-step ahead: `fri_point(i + trace_shift()) == omicron * fri_point(i)`.
    /// Holds exactly because `omega` and `omicron` are both derived by
    /// repeatedly squaring the same fixed two-adic root down to their
    /// respective orders.
    pub fn trace_shift(&self) -> usize {
        self.fri_domain_length / self.rounded_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_length_is_the_next_power_of_two() {
        let domain = Domain::new(5, 8, 8, 31);
        assert_eq!(domain.rounded_length, 8);
    }

    #[test]
    fn omicron_has_order_rounded_length() {
        let domain = Domain::new(5, 8, 8, 31);
        assert_eq!(domain.omicron.pow(domain.rounded_length as u128), Fp::one());
        assert_ne!(domain.omicron.pow((domain.rounded_length / 2) as u128), Fp::one());
    }

    #[test]
    fn fri_domain_is_a_multiple_of_the_expansion_factor() {
        let domain = Domain::new(5, 8, 8, 31);
        assert_eq!(domain.fri_domain_length % 8, 0);
    }
}
