use brainfuck_math::field::{Fx, XField};
use brainfuck_math::polynomial::multivariate::MultiPoly;

use crate::challenges::{Challenges, InitialValues};
use crate::table_extension::TableExtensionAir;

/// Column order: cycle, mp, mv, mem_perm. Base width 3, extension width 1,
/// total 4. Rows are sorted by `(mp, cycle)`, the order that lets the base
/// constraints below catch a cell silently changing value between two
/// touches without an intervening write.
pub const WIDTH: usize = 4;

const CYCLE: usize = 0;
const MP: usize = 1;
const MV: usize = 2;
const MEM_PERM: usize = 3;

pub struct MemoryExtension {
    pub initial_values: InitialValues,
}

fn var(i: usize) -> MultiPoly<XField> {
    MultiPoly::variable(i, 2 * WIDTH)
}

fn constant(value: Fx) -> MultiPoly<XField> {
    MultiPoly::constant(value)
}

impl TableExtensionAir for MemoryExtension {
    fn width(&self) -> usize {
        WIDTH
    }

    fn boundary_constraints_ext(&self) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![
            x(CYCLE),
            x(MP),
            x(MV),
            x(MEM_PERM) - constant(self.initial_values.processor_memory_permutation.clone()),
        ]
    }

    fn transition_constraints_ext(&self, challenges: &Challenges) -> Vec<MultiPoly<XField>> {
        let cur = |i| var(i);
        let next = |i| var(WIDTH + i);

        let mp_delta = next(MP) - cur(MP);
        let mp_step_is_boolean = mp_delta.clone() * (mp_delta.clone() - constant(Fx::one()));

        // Two consecutive rows touching the same address (`mp` unchanged)
        // come in two shapes: either they're also cycle-adjacent, meaning
        // the processor table's own opcode-gated transition for whatever
        // ran at `cur.cycle` (the Processor AIR now pins `+`/`-`'s effect on
        // `mv` directly) already governs the value change, so this table
        // has nothing further to add; or there's a cycle gap, meaning the
        // pointer wandered off to other addresses and back, and nothing
        // could have touched this cell in between, so its value must be
        // exactly as it was left.
        let same_address = constant(Fx::one()) - mp_delta;
        let cycle_gap = next(CYCLE) - cur(CYCLE) - constant(Fx::one());
        let value_fixed_unless_pointer_moved = same_address * cycle_gap * (next(MV) - cur(MV));

        let mem_perm_update = next(MEM_PERM)
            - cur(MEM_PERM)
                * (constant(challenges.beta.clone())
                    - constant(challenges.d.clone()) * cur(CYCLE)
                    - constant(challenges.e.clone()) * cur(MP)
                    - constant(challenges.f.clone()) * cur(MV));

        vec![mp_step_is_boolean, value_fixed_unless_pointer_moved, mem_perm_update]
    }

    fn terminal_constraints_ext(&self, _challenges: &Challenges, terminals: &[Fx]) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![x(MEM_PERM) - constant(terminals[1].clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainfuck_math::field::lift;

    #[test]
    fn boundary_constraints_vanish_on_an_empty_first_cell() {
        let extension = MemoryExtension {
            initial_values: InitialValues {
                processor_instruction_permutation: Fx::zero(),
                processor_memory_permutation: lift(&brainfuck_math::field::Fp::one()),
                processor_input_evaluation: Fx::zero(),
                processor_output_evaluation: Fx::zero(),
                instruction_evaluation: Fx::zero(),
            },
        };
        let row = vec![Fx::zero(), Fx::zero(), Fx::zero(), lift(&brainfuck_math::field::Fp::one())];
        for constraint in extension.boundary_constraints_ext() {
            assert_eq!(constraint.evaluate(&row).unwrap(), Fx::zero());
        }
    }

    fn dummy_extension() -> MemoryExtension {
        MemoryExtension {
            initial_values: InitialValues {
                processor_instruction_permutation: Fx::zero(),
                processor_memory_permutation: Fx::one(),
                processor_input_evaluation: Fx::zero(),
                processor_output_evaluation: Fx::zero(),
                instruction_evaluation: Fx::zero(),
            },
        }
    }

    fn dummy_challenges() -> Challenges {
        Challenges {
            a: Fx::zero(), b: Fx::zero(), c: Fx::zero(), d: Fx::zero(), e: Fx::zero(), f: Fx::zero(),
            alpha: Fx::zero(), beta: Fx::zero(), gamma: Fx::zero(), delta: Fx::zero(), eta: Fx::zero(),
        }
    }

    #[test]
    fn revisiting_an_address_after_a_gap_forces_value_fixed() {
        let extension = dummy_extension();
        // cycle jumps from 0 to 5 while mp stays at 2: the pointer wandered
        // off to other addresses and came back, so nothing should have
        // touched this cell in between.
        let row = vec![
            Fx::zero(), Fx::from(2u64), Fx::from(5u64), Fx::one(),
            Fx::from(5u64), Fx::from(2u64), Fx::from(9u64), Fx::one(),
        ];
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_ne!(constraints[1].evaluate(&row).unwrap(), Fx::zero());
    }

    #[test]
    fn an_immediately_adjacent_touch_of_the_same_address_is_left_to_the_processor_table() {
        let extension = dummy_extension();
        // cycle advances by exactly one while mp stays at 2: this is the
        // same transition the processor table's own opcode rule governs
        // (e.g. `+`/`-` changing the cell in place), so this table must not
        // also flag the value change.
        let row = vec![
            Fx::zero(), Fx::from(2u64), Fx::from(5u64), Fx::one(),
            Fx::one(), Fx::from(2u64), Fx::from(9u64), Fx::one(),
        ];
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_eq!(constraints[1].evaluate(&row).unwrap(), Fx::zero());
    }
}
