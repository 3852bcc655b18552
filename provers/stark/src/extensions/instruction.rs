use brainfuck_math::field::{Fx, XField};
use brainfuck_math::polynomial::multivariate::MultiPoly;

use crate::challenges::{Challenges, InitialValues};
use crate::table_extension::TableExtensionAir;

/// Column order: ip, ci, ni, instr_perm, instr_eval. Base width 3,
/// extension width 2, total 5. Rows are sorted by `ip` (the program's
/// static order), which is what lets `instr_perm` attest to the same
/// program the Processor table executed without re-proving program order
/// on the Processor table itself.
pub const WIDTH: usize = 5;

const IP: usize = 0;
const CI: usize = 1;
const NI: usize = 2;
const INSTR_PERM: usize = 3;
const INSTR_EVAL: usize = 4;

pub struct InstructionExtension {
    pub initial_values: InitialValues,
}

fn var(i: usize) -> MultiPoly<XField> {
    MultiPoly::variable(i, 2 * WIDTH)
}

fn constant(value: Fx) -> MultiPoly<XField> {
    MultiPoly::constant(value)
}

impl TableExtensionAir for InstructionExtension {
    fn width(&self) -> usize {
        WIDTH
    }

    fn boundary_constraints_ext(&self) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![
            x(IP),
            x(INSTR_PERM) - constant(self.initial_values.processor_instruction_permutation.clone()),
            x(INSTR_EVAL) - constant(self.initial_values.instruction_evaluation.clone()),
        ]
    }

    /// `ip` either stays put or increases by exactly one row to row (program
    /// order is non-decreasing and has no gaps larger than one once
    /// duplicate rows, needed so `ip` can repeat across a `[`/`]` pair's
    /// back-edge, are accounted for): `(next.ip - cur.ip) * (next.ip - cur.ip
    /// - 1) = 0`. When `ip` does advance, `instr_eval` folds in the new
    /// row's opcode; when it repeats, `instr_eval` stays fixed, since the
    /// evaluation argument must see each program cell exactly once.
    fn transition_constraints_ext(&self, challenges: &Challenges) -> Vec<MultiPoly<XField>> {
        let cur = |i| var(i);
        let next = |i| var(WIDTH + i);

        let ip_delta = next(IP) - cur(IP);
        let ip_step_is_boolean = ip_delta.clone() * (ip_delta.clone() - constant(Fx::one()));

        let instr_perm_update = next(INSTR_PERM)
            - cur(INSTR_PERM)
                * (constant(challenges.alpha.clone())
                    - constant(challenges.a.clone()) * cur(IP)
                    - constant(challenges.b.clone()) * cur(CI)
                    - constant(challenges.c.clone()) * cur(NI));

        let instr_eval_if_new_row = next(INSTR_EVAL)
            - (cur(INSTR_EVAL) * constant(challenges.eta.clone()) + cur(CI));
        let instr_eval_if_repeated_row = next(INSTR_EVAL) - cur(INSTR_EVAL);
        let instr_eval_update =
            ip_delta.clone() * instr_eval_if_new_row + (constant(Fx::one()) - ip_delta) * instr_eval_if_repeated_row;

        vec![ip_step_is_boolean, instr_perm_update, instr_eval_update]
    }

    fn terminal_constraints_ext(&self, _challenges: &Challenges, terminals: &[Fx]) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![
            x(INSTR_PERM) - constant(terminals[0].clone()),
            x(INSTR_EVAL) - constant(terminals[4].clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainfuck_math::field::lift;

    #[test]
    fn boundary_constraints_vanish_at_the_start_of_the_program() {
        let extension = InstructionExtension {
            initial_values: InitialValues {
                processor_instruction_permutation: lift(&brainfuck_math::field::Fp::one()),
                processor_memory_permutation: lift(&brainfuck_math::field::Fp::one()),
                processor_input_evaluation: Fx::zero(),
                processor_output_evaluation: Fx::zero(),
                instruction_evaluation: Fx::zero(),
            },
        };
        let row = vec![Fx::zero(), Fx::zero(), Fx::zero(), lift(&brainfuck_math::field::Fp::one()), Fx::zero()];
        for constraint in extension.boundary_constraints_ext() {
            assert_eq!(constraint.evaluate(&row).unwrap(), Fx::zero());
        }
    }
}
