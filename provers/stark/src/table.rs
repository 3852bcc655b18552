use brainfuck_math::fft::interpolate_offset_fft;
use brainfuck_math::field::goldilocks::Goldilocks;
use brainfuck_math::field::{Fp, F};
use brainfuck_math::polynomial::univariate::UniPoly;
#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::domain::Domain;

/// A base trace table: a column-major matrix of `F`-elements plus the
/// per-column interpolating polynomials once they've been computed. Column
/// `i` holds one value per original row, before padding.
#[derive(Debug, Clone)]
pub struct Table {
    pub width: usize,
    pub columns: Vec<Vec<Fp>>,
    interpolants: Option<Vec<UniPoly<F>>>,
}

impl Table {
    pub fn new(width: usize, columns: Vec<Vec<Fp>>) -> Self {
        assert_eq!(columns.len(), width, "one column vector is required per declared width");
        let length = columns.first().map(|c| c.len()).unwrap_or(0);
        assert!(columns.iter().all(|c| c.len() == length), "every column must have the same length");
        Self { width, columns, interpolants: None }
    }

    pub fn original_length(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn row(&self, i: usize) -> Vec<Fp> {
        self.columns.iter().map(|c| c[i].clone()).collect()
    }

    /// Pads every column to `domain.rounded_length` by repeating its last
    /// row and interpolates each padded column on the trace subgroup
    /// `<omicron>`. Caches the result. Zero-knowledge blinding is not this
    /// table's concern; it is applied once, to the shared composition
    /// polynomial, via a dedicated randomizer codeword.
    pub fn interpolate_columns(&mut self, domain: &Domain) -> &[UniPoly<F>] {
        if self.interpolants.is_none() {
            let interpolate_one = |column: &Vec<Fp>| {
                let mut padded = column.clone();
                let last = padded.last().cloned().unwrap_or_else(Fp::zero);
                padded.resize(domain.rounded_length, last);
                let coefficients = interpolate_offset_fft::<Goldilocks>(&padded, &Fp::one())
                    .expect("rounded_length is a power of two by construction");
                UniPoly::new(&coefficients)
            };

            #[cfg(feature = "parallel")]
            let polys = self.columns.par_iter().map(interpolate_one).collect();
            #[cfg(not(feature = "parallel"))]
            let polys = self.columns.iter().map(interpolate_one).collect();

            self.interpolants = Some(polys);
        }
        self.interpolants.as_ref().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolated_polynomials_reproduce_the_original_rows() {
        let columns = vec![
            vec![Fp::from(1u64), Fp::from(2u64), Fp::from(3u64)],
            vec![Fp::from(10u64), Fp::from(20u64), Fp::from(30u64)],
        ];
        let mut table = Table::new(2, columns);
        let domain = Domain::new(table.original_length(), 8, 8, 31);
        let polys = table.interpolate_columns(&domain).to_vec();

        for (i, original_value) in [Fp::from(1u64), Fp::from(2u64), Fp::from(3u64)].iter().enumerate() {
            assert_eq!(&polys[0].evaluate(&domain.trace_point(i)), original_value);
        }
    }

    #[test]
    fn padding_repeats_the_last_row() {
        let columns = vec![vec![Fp::from(1u64), Fp::from(2u64), Fp::from(3u64)]];
        let mut table = Table::new(1, columns);
        let domain = Domain::new(table.original_length(), 8, 8, 31);
        let polys = table.interpolate_columns(&domain).to_vec();
        assert_eq!(polys[0].evaluate(&domain.trace_point(3)), Fp::from(3u64));
    }

    #[test]
    fn interpolation_result_is_cached() {
        let columns = vec![vec![Fp::from(1u64)]];
        let mut table = Table::new(1, columns);
        let domain = Domain::new(1, 8, 8, 31);
        let first = table.interpolate_columns(&domain).to_vec();
        let second = table.interpolate_columns(&domain).to_vec();
        assert_eq!(first, second);
    }
}
