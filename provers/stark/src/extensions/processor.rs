use brainfuck_math::field::{Fx, XField};
use brainfuck_math::polynomial::multivariate::MultiPoly;

use crate::challenges::{Challenges, InitialValues};
use crate::table_extension::TableExtensionAir;

/// Column order: cycle, ip, ci, ni, mp, mv, inv, instr_perm, mem_perm,
/// input_eval, output_eval. Base width 7, extension width 4, total 11.
pub const WIDTH: usize = 11;

const CYCLE: usize = 0;
const IP: usize = 1;
const CI: usize = 2;
const NI: usize = 3;
const MP: usize = 4;
const MV: usize = 5;
const INV: usize = 6;
const INSTR_PERM: usize = 7;
const MEM_PERM: usize = 8;
const INPUT_EVAL: usize = 9;
const OUTPUT_EVAL: usize = 10;

/// The eight opcodes `ci` ranges over, shared with [`crate::vm`] so the
/// interpreter and the AIR agree on the encoding.
pub const OPCODES: [u8; 8] = *b"+-><.,[]";

pub struct ProcessorExtension {
    pub initial_values: InitialValues,
}

fn var(i: usize) -> MultiPoly<XField> {
    MultiPoly::variable(i, 2 * WIDTH)
}

fn constant(value: Fx) -> MultiPoly<XField> {
    MultiPoly::constant(value)
}

/// The Lagrange basis polynomial through the eight opcode points that is 1
/// at `ci = target` and 0 at every other opcode, used to gate a constraint
/// to a single instruction without an extra selector column.
fn opcode_indicator(ci: MultiPoly<XField>, target: u8) -> MultiPoly<XField> {
    OPCODES.iter().filter(|&&v| v != target).fold(constant(Fx::one()), |acc, &v| {
        let scale = (Fx::from(target as u64) - Fx::from(v as u64)).inv();
        acc * (ci.clone() - constant(Fx::from(v as u64))) * constant(scale)
    })
}

impl TableExtensionAir for ProcessorExtension {
    fn width(&self) -> usize {
        WIDTH
    }

    fn boundary_constraints_ext(&self) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![
            x(CYCLE),
            x(IP),
            x(MP),
            x(MV),
            x(INSTR_PERM) - constant(self.initial_values.processor_instruction_permutation.clone()),
            x(MEM_PERM) - constant(self.initial_values.processor_memory_permutation.clone()),
            x(INPUT_EVAL) - constant(self.initial_values.processor_input_evaluation.clone()),
            x(OUTPUT_EVAL) - constant(self.initial_values.processor_output_evaluation.clone()),
        ]
    }

    /// The VM's micro-step constraints: `cycle` increments by one every row,
    /// `ci` is pinned to one of the eight opcodes, `mv * inv` implements the
    /// zero-test trick from §3, and `next.mv`/`next.mp`/`next.ip` are each
    /// pinned to the value `ci` requires (`opcode_indicator` gates every
    /// opcode's own rule so exactly one fires per row). Plus the four
    /// running-column update rules from §4.8.
    fn transition_constraints_ext(&self, challenges: &Challenges) -> Vec<MultiPoly<XField>> {
        let cur = |i| var(i);
        let next = |i| var(WIDTH + i);

        let cycle_increments = next(CYCLE) - cur(CYCLE) - constant(Fx::one());

        // Every row's `ci` must actually be one of the eight opcodes, or the
        // indicators below stop being a partition of unity and a forged
        // opcode could dodge every per-instruction rule at once. Only
        // evaluated on rows that are the *current* side of a checked
        // transition, so the trailing halt row (whose `ci` is 0, read past
        // the end of the program the same way `ni` already is) never has to
        // satisfy it.
        let ci_is_valid_opcode = OPCODES
            .iter()
            .fold(constant(Fx::one()), |acc, &op| acc * (cur(CI) - constant(Fx::from(op as u64))));

        let inverse_candidate = cur(MV) * cur(INV) - constant(Fx::one());
        let zero_test_mv = cur(MV) * inverse_candidate.clone();
        let zero_test_inv = cur(INV) * inverse_candidate;

        let is_plus = opcode_indicator(cur(CI), b'+');
        let is_minus = opcode_indicator(cur(CI), b'-');
        let is_right = opcode_indicator(cur(CI), b'>');
        let is_left = opcode_indicator(cur(CI), b'<');
        let is_dot = opcode_indicator(cur(CI), b'.');
        let is_comma = opcode_indicator(cur(CI), b',');
        let is_lbracket = opcode_indicator(cur(CI), b'[');
        let is_rbracket = opcode_indicator(cur(CI), b']');

        // `mv` only ever moves under `+`/`-`; `>`/`<` leave it unconstrained
        // here (the Memory table's own sort-order check is what pins the
        // value found at a freshly-visited or revisited cell), and `.`/`,`/
        // `[`/`]` never write the cell they're standing on.
        let mv_unchanged = is_dot.clone() + is_comma.clone() + is_lbracket.clone() + is_rbracket.clone();
        let mv_transition = is_plus.clone() * (next(MV) - cur(MV) - constant(Fx::one()))
            + is_minus.clone() * (next(MV) - cur(MV) + constant(Fx::one()))
            + mv_unchanged * (next(MV) - cur(MV));

        // `mp` only ever moves under `>`/`<`.
        let mp_transition = next(MP) - cur(MP) - is_right.clone() + is_left.clone();

        // `ip` advances by one under every opcode except the two brackets,
        // which jump to `ni` exactly when the zero-test on `mv` says to.
        let is_zero = constant(Fx::one()) - cur(MV) * cur(INV);
        let advances_by_one = is_plus + is_minus + is_right + is_left + is_dot + is_comma;
        let ip_default = advances_by_one * (next(IP) - cur(IP) - constant(Fx::one()));
        let ip_lbracket = is_lbracket
            * (is_zero.clone() * (next(IP) - cur(NI)) + (constant(Fx::one()) - is_zero.clone()) * (next(IP) - cur(IP) - constant(Fx::one())));
        let ip_rbracket = is_rbracket
            * ((constant(Fx::one()) - is_zero.clone()) * (next(IP) - cur(NI)) + is_zero * (next(IP) - cur(IP) - constant(Fx::one())));
        let ip_transition = ip_default + ip_lbracket + ip_rbracket;

        let instr_perm_update = next(INSTR_PERM)
            - cur(INSTR_PERM)
                * (constant(challenges.alpha.clone())
                    - constant(challenges.a.clone()) * cur(IP)
                    - constant(challenges.b.clone()) * cur(CI)
                    - constant(challenges.c.clone()) * cur(NI));

        let mem_perm_update = next(MEM_PERM)
            - cur(MEM_PERM)
                * (constant(challenges.beta.clone())
                    - constant(challenges.d.clone()) * cur(CYCLE)
                    - constant(challenges.e.clone()) * cur(MP)
                    - constant(challenges.f.clone()) * cur(MV));

        // Input/Output only gain a row per io instruction, so their running
        // evaluations must only advance on the matching opcode; every other
        // cycle leaves them fixed.
        let is_comma = opcode_indicator(cur(CI), b',');
        let input_eval_if_read = next(INPUT_EVAL) - (cur(INPUT_EVAL) * constant(challenges.gamma.clone()) + cur(MV));
        let input_eval_if_idle = next(INPUT_EVAL) - cur(INPUT_EVAL);
        let input_eval_update =
            is_comma.clone() * input_eval_if_read + (constant(Fx::one()) - is_comma) * input_eval_if_idle;

        let is_dot = opcode_indicator(cur(CI), b'.');
        let output_eval_if_write = next(OUTPUT_EVAL) - (cur(OUTPUT_EVAL) * constant(challenges.delta.clone()) + cur(MV));
        let output_eval_if_idle = next(OUTPUT_EVAL) - cur(OUTPUT_EVAL);
        let output_eval_update =
            is_dot.clone() * output_eval_if_write + (constant(Fx::one()) - is_dot) * output_eval_if_idle;

        vec![
            cycle_increments,
            ci_is_valid_opcode,
            zero_test_mv,
            zero_test_inv,
            mv_transition,
            mp_transition,
            ip_transition,
            instr_perm_update,
            mem_perm_update,
            input_eval_update,
            output_eval_update,
        ]
    }

    fn terminal_constraints_ext(&self, _challenges: &Challenges, terminals: &[Fx]) -> Vec<MultiPoly<XField>> {
        let x = |i| MultiPoly::<XField>::variable(i, WIDTH);
        vec![
            x(INSTR_PERM) - constant(terminals[0].clone()),
            x(MEM_PERM) - constant(terminals[1].clone()),
            x(INPUT_EVAL) - constant(terminals[2].clone()),
            x(OUTPUT_EVAL) - constant(terminals[3].clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainfuck_math::field::lift;

    fn dummy_initial_values() -> InitialValues {
        InitialValues {
            processor_instruction_permutation: lift(&brainfuck_math::field::Fp::one()),
            processor_memory_permutation: lift(&brainfuck_math::field::Fp::one()),
            processor_input_evaluation: Fx::zero(),
            processor_output_evaluation: Fx::zero(),
            instruction_evaluation: Fx::zero(),
        }
    }

    fn dummy_challenges() -> Challenges {
        Challenges {
            a: Fx::zero(), b: Fx::zero(), c: Fx::zero(), d: Fx::zero(), e: Fx::zero(), f: Fx::zero(),
            alpha: Fx::zero(), beta: Fx::zero(), gamma: Fx::zero(), delta: Fx::zero(), eta: Fx::zero(),
        }
    }

    /// Builds a transition row (current row followed by next row) with every
    /// column defaulted to zero except the ones the caller overrides, so
    /// each micro-step test only has to spell out what it cares about.
    fn row(overrides: &[(usize, Fx)]) -> Vec<Fx> {
        let mut row = vec![Fx::zero(); 2 * WIDTH];
        for (i, v) in overrides {
            row[*i] = v.clone();
        }
        row
    }

    const NEXT_MP: usize = WIDTH + MP;
    const NEXT_MV: usize = WIDTH + MV;
    const NEXT_IP: usize = WIDTH + IP;

    #[test]
    fn plus_pins_the_cells_evolution_and_leaves_the_pointer_alone() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let five = Fx::from(5u64);
        let r = row(&[(CI, Fx::from(b'+' as u64)), (MV, five.clone()), (INV, five.inv()), (NEXT_MV, Fx::from(6u64)), (NEXT_IP, Fx::one())]);
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_eq!(constraints[4].evaluate(&r).unwrap(), Fx::zero()); // mv_transition
        assert_eq!(constraints[5].evaluate(&r).unwrap(), Fx::zero()); // mp_transition
        assert_eq!(constraints[6].evaluate(&r).unwrap(), Fx::zero()); // ip_transition
    }

    #[test]
    fn plus_rejects_a_cell_that_did_not_increment() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let five = Fx::from(5u64);
        let r = row(&[(CI, Fx::from(b'+' as u64)), (MV, five.clone()), (INV, five.inv()), (NEXT_MV, five), (NEXT_IP, Fx::one())]);
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_ne!(constraints[4].evaluate(&r).unwrap(), Fx::zero());
    }

    #[test]
    fn right_moves_the_pointer_and_leaves_the_cells_value_unconstrained() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let r = row(&[(CI, Fx::from(b'>' as u64)), (NEXT_MP, Fx::one()), (NEXT_IP, Fx::one())]);
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_eq!(constraints[5].evaluate(&r).unwrap(), Fx::zero()); // mp_transition
        assert_eq!(constraints[6].evaluate(&r).unwrap(), Fx::zero()); // ip_transition

        // any next.mv at all is accepted; the Memory table is what pins it
        let r_other_value = row(&[(CI, Fx::from(b'>' as u64)), (NEXT_MP, Fx::one()), (NEXT_IP, Fx::one()), (NEXT_MV, Fx::from(42u64))]);
        assert_eq!(constraints[4].evaluate(&r_other_value).unwrap(), Fx::zero());
    }

    #[test]
    fn left_bracket_jumps_to_ni_when_the_cell_is_zero() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let r = row(&[(CI, Fx::from(b'[' as u64)), (NI, Fx::from(9u64)), (NEXT_IP, Fx::from(9u64))]);
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_eq!(constraints[6].evaluate(&r).unwrap(), Fx::zero());

        // falling through to ip + 1 instead of the jump target is rejected
        let wrong = row(&[(CI, Fx::from(b'[' as u64)), (NI, Fx::from(9u64)), (NEXT_IP, Fx::one())]);
        assert_ne!(constraints[6].evaluate(&wrong).unwrap(), Fx::zero());
    }

    #[test]
    fn left_bracket_falls_through_when_the_cell_is_non_zero() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let five = Fx::from(5u64);
        let r = row(&[(CI, Fx::from(b'[' as u64)), (MV, five.clone()), (INV, five.inv()), (NI, Fx::from(9u64)), (NEXT_IP, Fx::one())]);
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_eq!(constraints[6].evaluate(&r).unwrap(), Fx::zero());
    }

    #[test]
    fn ci_outside_the_eight_opcodes_is_rejected() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let r = row(&[(CI, Fx::from(7u64))]);
        let constraints = extension.transition_constraints_ext(&dummy_challenges());
        assert_ne!(constraints[1].evaluate(&r).unwrap(), Fx::zero());
    }

    #[test]
    fn boundary_constraints_vanish_on_a_well_formed_first_row() {
        let extension = ProcessorExtension { initial_values: dummy_initial_values() };
        let row = vec![
            Fx::zero(), // cycle
            Fx::zero(), // ip
            Fx::zero(), // ci
            Fx::zero(), // ni
            Fx::zero(), // mp
            Fx::zero(), // mv
            Fx::zero(), // inv
            lift(&brainfuck_math::field::Fp::one()),
            lift(&brainfuck_math::field::Fp::one()),
            Fx::zero(),
            Fx::zero(),
        ];
        for constraint in extension.boundary_constraints_ext() {
            assert_eq!(constraint.evaluate(&row).unwrap(), Fx::zero());
        }
    }
}
