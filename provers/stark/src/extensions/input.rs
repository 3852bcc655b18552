use brainfuck_math::field::{Fx, XField};
use brainfuck_math::polynomial::multivariate::MultiPoly;

use crate::challenges::{Challenges, InitialValues};
use crate::table_extension::TableExtensionAir;

/// Column order: value, input_eval. Base width 1, extension width 1, total
/// 2. One row per symbol consumed by `,`, in the order it was consumed.
pub const WIDTH: usize = 2;

const VALUE: usize = 0;
const INPUT_EVAL: usize = 1;

pub struct InputExtension {
    pub initial_values: InitialValues,
}

fn var(i: usize) -> MultiPoly<XField> {
    MultiPoly::variable(i, 2 * WIDTH)
}

fn constant(value: Fx) -> MultiPoly<XField> {
    MultiPoly::constant(value)
}

impl TableExtensionAir for InputExtension {
    fn width(&self) -> usize {
        WIDTH
    }

    fn boundary_constraints_ext(&self) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![x(INPUT_EVAL) - constant(self.initial_values.processor_input_evaluation.clone())]
    }

    fn transition_constraints_ext(&self, challenges: &Challenges) -> Vec<MultiPoly<XField>> {
        let cur = |i| var(i);
        let next = |i| var(WIDTH + i);
        let input_eval_update =
            next(INPUT_EVAL) - (cur(INPUT_EVAL) * constant(challenges.gamma.clone()) + cur(VALUE));
        vec![input_eval_update]
    }

    fn terminal_constraints_ext(&self, _challenges: &Challenges, terminals: &[Fx]) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![x(INPUT_EVAL) - constant(terminals[2].clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_constraint_vanishes_when_evaluation_starts_at_zero() {
        let extension = InputExtension {
            initial_values: InitialValues {
                processor_instruction_permutation: Fx::zero(),
                processor_memory_permutation: Fx::zero(),
                processor_input_evaluation: Fx::zero(),
                processor_output_evaluation: Fx::zero(),
                instruction_evaluation: Fx::zero(),
            },
        };
        let row = vec![Fx::from(65u64), Fx::zero()];
        assert_eq!(extension.boundary_constraints_ext()[0].evaluate(&row).unwrap(), Fx::zero());
    }
}
