//! Builds a [`StarkProof`] for one execution trace (§5).
//!
//! The algorithm runs in two passes. The first only measures constraint
//! degrees (which depend on the AIR's symbolic shape, never on actual
//! challenge or terminal values) to size the domain everything else needs.
//! The second does the real work: interpolate and commit the base tables,
//! derive challenges, build and commit the extension columns, gather every
//! quotient, blind the lot with a randomizer polynomial, and hand the
//! composition to FRI.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use brainfuck_crypto::merkle::{Digest32, MerkleTree};
use brainfuck_crypto::transcript::Transcript;
use brainfuck_math::fft::evaluate_offset_fft;
use brainfuck_math::field::goldilocks::Goldilocks;
use brainfuck_math::field::{lift, Fp, Fx, F};
use brainfuck_math::polynomial::univariate::UniPoly;

use crate::challenges::{sample_x_element, Challenges, InitialValues};
use crate::config::ProofOptions;
use crate::domain::{next_pow2, Domain};
use crate::extensions::{InputExtension, InstructionExtension, MemoryExtension, OutputExtension, ProcessorExtension};
use crate::fri::Fri;
use crate::proof::{RowOpening, StarkProof};
use crate::table::Table;
use crate::table_extension::{all_quotients, boundary_or_terminal_degree_bound, transition_degree_bound, TableExtensionAir};
use crate::vm::ExecutionTrace;

pub(crate) fn placeholder_initial_values() -> InitialValues {
    InitialValues {
        processor_instruction_permutation: Fx::zero(),
        processor_memory_permutation: Fx::zero(),
        processor_input_evaluation: Fx::zero(),
        processor_output_evaluation: Fx::zero(),
        instruction_evaluation: Fx::zero(),
    }
}

pub(crate) fn placeholder_challenges() -> Challenges {
    Challenges {
        a: Fx::zero(),
        b: Fx::zero(),
        c: Fx::zero(),
        d: Fx::zero(),
        e: Fx::zero(),
        f: Fx::zero(),
        alpha: Fx::zero(),
        beta: Fx::zero(),
        gamma: Fx::zero(),
        delta: Fx::zero(),
        eta: Fx::zero(),
    }
}

/// Degree bounds for one extension's quotients, in the same boundary,
/// transition, terminal order [`push_quotients`] produces its codewords in.
/// Needed on both sides of the protocol: the prover to size the composition
/// shift per quotient, the verifier to reconstruct that same shift without
/// ever re-deriving a codeword.
pub(crate) fn quotient_degree_bounds<E: TableExtensionAir>(
    extension: &E,
    challenges: &Challenges,
    terminals: &[Fx],
    max_col_degree: usize,
    rounded_length: usize,
) -> Vec<usize> {
    let width = extension.width();
    extension
        .boundary_constraints_ext()
        .iter()
        .map(|c| boundary_or_terminal_degree_bound(c, max_col_degree, width))
        .chain(
            extension
                .transition_constraints_ext(challenges)
                .iter()
                .map(|c| transition_degree_bound(c, max_col_degree, width, rounded_length)),
        )
        .chain(
            extension
                .terminal_constraints_ext(challenges, terminals)
                .iter()
                .map(|c| boundary_or_terminal_degree_bound(c, max_col_degree, width)),
        )
        .collect()
}

/// Same bounds as [`quotient_degree_bounds`], but order doesn't matter here:
/// only used to find the single largest bound across every extension.
fn extension_degree_bounds<E: TableExtensionAir>(
    extension: &E,
    challenges: &Challenges,
    terminals: &[Fx],
    max_col_degree: usize,
    rounded_length: usize,
) -> Vec<usize> {
    quotient_degree_bounds(extension, challenges, terminals, max_col_degree, rounded_length)
}

/// The largest degree bound among every boundary, transition, and terminal
/// quotient across all five extensions, computed with throwaway challenges
/// and terminals since degree bounds never depend on their actual values.
pub(crate) fn max_quotient_degree_bound(rounded_length: usize) -> usize {
    let max_col_degree = rounded_length - 1;
    let challenges = placeholder_challenges();
    let terminals = [Fx::zero(), Fx::zero(), Fx::zero(), Fx::zero(), Fx::zero()];
    let initial_values = placeholder_initial_values();

    let processor = ProcessorExtension { initial_values: initial_values.clone() };
    let instruction = InstructionExtension { initial_values: initial_values.clone() };
    let memory = MemoryExtension { initial_values: initial_values.clone() };
    let input = InputExtension { initial_values: initial_values.clone() };
    let output = OutputExtension { initial_values };

    extension_degree_bounds(&processor, &challenges, &terminals, max_col_degree, rounded_length)
        .into_iter()
        .chain(extension_degree_bounds(&instruction, &challenges, &terminals, max_col_degree, rounded_length))
        .chain(extension_degree_bounds(&memory, &challenges, &terminals, max_col_degree, rounded_length))
        .chain(extension_degree_bounds(&input, &challenges, &terminals, max_col_degree, rounded_length))
        .chain(extension_degree_bounds(&output, &challenges, &terminals, max_col_degree, rounded_length))
        .max()
        .unwrap_or(0)
}

fn fp_bytes(v: &Fp) -> [u8; 8] {
    v.value().to_le_bytes()
}

fn fx_bytes(v: &Fx) -> Vec<u8> {
    v.value().iter().flat_map(|c| c.value().to_le_bytes()).collect()
}

fn random_salt(rng: &mut impl Rng) -> Digest32 {
    let mut salt = [0u8; 32];
    rng.fill(&mut salt);
    salt
}

fn base_codewords(table: &mut Table, domain: &Domain) -> Vec<Vec<Fp>> {
    let evaluate_one = |poly: &UniPoly<F>| {
        evaluate_offset_fft::<Goldilocks>(poly.coefficients(), domain.fri_domain_length, &domain.coset_offset)
            .expect("fri_domain_length is a power of two by construction")
    };

    let polys = table.interpolate_columns(domain);
    #[cfg(feature = "parallel")]
    return polys.par_iter().map(evaluate_one).collect();
    #[cfg(not(feature = "parallel"))]
    return polys.iter().map(evaluate_one).collect();
}

/// Interpolates an extension column on the trace subgroup by plain Lagrange
/// interpolation (`X` has no `IsFFTField` impl, so the fast coset-FFT path
/// used for base columns isn't available here) and evaluates it across the
/// FRI coset. Padding repeats the column's last real value, exactly as
/// `Table::interpolate_columns` does for base columns.
fn extension_codeword(column: &[Fx], domain: &Domain) -> Vec<Fx> {
    let mut padded = column.to_vec();
    let last = padded.last().cloned().unwrap_or_else(Fx::zero);
    padded.resize(domain.rounded_length, last);

    let trace_xs: Vec<Fx> = (0..domain.rounded_length).map(|i| lift(&domain.trace_point(i))).collect();
    let poly = UniPoly::interpolate(&trace_xs, &padded);

    (0..domain.fri_domain_length).map(|i| poly.evaluate(&lift(&domain.fri_point(i)))).collect()
}

/// Stitches a table's own base and extension codewords into full AIR rows,
/// re-indexed `shift` steps ahead so callers can build both the current-row
/// and next-row views of the same extension from one pair of codeword sets.
fn assemble_rows(base: &[Vec<Fp>], ext: &[Vec<Fx>], shift: usize, domain_length: usize) -> Vec<Vec<Fx>> {
    (0..domain_length)
        .map(|i| {
            let j = (i + shift) % domain_length;
            base.iter().map(|c| lift(&c[j])).chain(ext.iter().map(|c| c[j].clone())).collect()
        })
        .collect()
}

/// Every running extension column shares this shape: push the pre-fold
/// value, then fold the row's own contribution into the running value. Row
/// `n - 1`'s stored value is therefore the fold of rows `0..n-2`, one short
/// of a fully "closed" running total; the terminal check reads exactly that
/// value, via the generalized zerofiers in `table_extension`, rather than a
/// virtual extra row. This is a documented scope simplification, not a bug:
/// the very last row's own contribution to these arguments goes unverified.
struct RunningColumn {
    values: Vec<Fx>,
    current: Fx,
}

impl RunningColumn {
    fn new(seed: Fx, n: usize) -> Self {
        Self { values: Vec::with_capacity(n), current: seed }
    }

    fn record_then_fold(&mut self, fold: impl FnOnce(&Fx) -> Fx) {
        self.values.push(self.current.clone());
        self.current = fold(&self.current);
    }
}

fn build_processor_extension_columns(table: &Table, initial: &InitialValues, challenges: &Challenges) -> (Vec<Fx>, Vec<Fx>, Vec<Fx>, Vec<Fx>) {
    let n = table.original_length();
    let mut instr_perm = RunningColumn::new(initial.processor_instruction_permutation.clone(), n);
    let mut mem_perm = RunningColumn::new(initial.processor_memory_permutation.clone(), n);
    let mut input_eval = RunningColumn::new(initial.processor_input_evaluation.clone(), n);
    let mut output_eval = RunningColumn::new(initial.processor_output_evaluation.clone(), n);

    for i in 0..n {
        let row = table.row(i);
        let (cycle, ip, ci, ni, mp, mv) = (lift(&row[0]), lift(&row[1]), lift(&row[2]), lift(&row[3]), lift(&row[4]), lift(&row[5]));
        let ci_byte = *row[2].value() as u8;

        instr_perm.record_then_fold(|cur| {
            cur.clone() * (challenges.alpha.clone() - challenges.a.clone() * ip.clone() - challenges.b.clone() * ci.clone() - challenges.c.clone() * ni.clone())
        });
        mem_perm.record_then_fold(|cur| {
            cur.clone() * (challenges.beta.clone() - challenges.d.clone() * cycle.clone() - challenges.e.clone() * mp.clone() - challenges.f.clone() * mv.clone())
        });
        input_eval.record_then_fold(|cur| {
            if ci_byte == b',' {
                cur.clone() * challenges.gamma.clone() + mv.clone()
            } else {
                cur.clone()
            }
        });
        output_eval.record_then_fold(|cur| {
            if ci_byte == b'.' {
                cur.clone() * challenges.delta.clone() + mv.clone()
            } else {
                cur.clone()
            }
        });
    }

    (instr_perm.values, mem_perm.values, input_eval.values, output_eval.values)
}

fn build_instruction_extension_columns(table: &Table, initial: &InitialValues, challenges: &Challenges) -> (Vec<Fx>, Vec<Fx>) {
    let n = table.original_length();
    let mut instr_perm = RunningColumn::new(initial.processor_instruction_permutation.clone(), n);
    let mut instr_eval = RunningColumn::new(initial.instruction_evaluation.clone(), n);
    let mut prev_ip: Option<Fp> = None;

    for i in 0..n {
        let row = table.row(i);
        let (ip, ci, ni) = (lift(&row[0]), lift(&row[1]), lift(&row[2]));
        let is_new_cell = prev_ip.as_ref().map(|p| p != &row[0]).unwrap_or(true);

        instr_perm.record_then_fold(|cur| {
            cur.clone() * (challenges.alpha.clone() - challenges.a.clone() * ip.clone() - challenges.b.clone() * ci.clone() - challenges.c.clone() * ni.clone())
        });
        instr_eval.record_then_fold(|cur| if is_new_cell { cur.clone() * challenges.eta.clone() + ci.clone() } else { cur.clone() });

        prev_ip = Some(row[0].clone());
    }

    (instr_perm.values, instr_eval.values)
}

fn build_memory_extension_column(table: &Table, initial: &InitialValues, challenges: &Challenges) -> Vec<Fx> {
    let n = table.original_length();
    let mut mem_perm = RunningColumn::new(initial.processor_memory_permutation.clone(), n);
    for i in 0..n {
        let row = table.row(i);
        let (cycle, mp, mv) = (lift(&row[0]), lift(&row[1]), lift(&row[2]));
        mem_perm.record_then_fold(|cur| {
            cur.clone() * (challenges.beta.clone() - challenges.d.clone() * cycle.clone() - challenges.e.clone() * mp.clone() - challenges.f.clone() * mv.clone())
        });
    }
    mem_perm.values
}

fn build_input_extension_column(table: &Table, initial: &InitialValues, challenges: &Challenges) -> Vec<Fx> {
    let n = table.original_length();
    let mut eval = RunningColumn::new(initial.processor_input_evaluation.clone(), n);
    for i in 0..n {
        let value = lift(&table.columns[0][i]);
        eval.record_then_fold(|cur| cur.clone() * challenges.gamma.clone() + value.clone());
    }
    eval.values
}

fn build_output_extension_column(table: &Table, initial: &InitialValues, challenges: &Challenges) -> Vec<Fx> {
    let n = table.original_length();
    let mut eval = RunningColumn::new(initial.processor_output_evaluation.clone(), n);
    for i in 0..n {
        let value = lift(&table.columns[0][i]);
        eval.record_then_fold(|cur| cur.clone() * challenges.delta.clone() + value.clone());
    }
    eval.values
}

/// Evaluates every quotient for one extension and folds its degree bound
/// alongside it, so the composition step knows how far to shift each one.
fn push_quotients<E: TableExtensionAir>(
    extension: &E,
    domain: &Domain,
    challenges: &Challenges,
    terminals: &[Fx],
    num_real_rows: usize,
    current_rows: &[Vec<Fx>],
    next_rows: &[Vec<Fx>],
    max_col_degree: usize,
    out: &mut Vec<(Vec<Fx>, usize)>,
) {
    let (boundary, transition, terminal) = all_quotients(extension, domain, challenges, terminals, num_real_rows, current_rows, next_rows);
    let bounds = quotient_degree_bounds(extension, challenges, terminals, max_col_degree, domain.rounded_length);

    out.extend(boundary.into_iter().chain(transition).chain(terminal).zip(bounds));
}

fn open_row(leaves: &[Vec<u8>], salts: &[Digest32], tree: &MerkleTree, index: usize) -> RowOpening {
    RowOpening {
        row_bytes: leaves[index].clone(),
        salt: salts[index],
        path: tree.open(index).expect("index within committed range"),
    }
}

/// Builds a proof attesting to `trace`, an already-executed run of the VM.
pub fn prove(options: &ProofOptions, trace: ExecutionTrace) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let (mut processor, mut instruction, mut memory, mut input, mut output) = trace.into_tables();

    let original_lengths = [processor.original_length(), instruction.original_length(), memory.original_length(), input.original_length(), output.original_length()];
    let original_max = original_lengths.into_iter().max().unwrap_or(1).max(1);
    let rounded_length = next_pow2(original_max);

    let max_degree = max_quotient_degree_bound(rounded_length);
    let quotient_degree_bound = max_degree + options.num_randomizers;
    let domain = Domain::new(original_max, options.num_randomizers, options.expansion_factor, quotient_degree_bound);

    // --- base tables: interpolate, evaluate on the FRI coset, commit ---
    let processor_codewords = base_codewords(&mut processor, &domain);
    let instruction_codewords = base_codewords(&mut instruction, &domain);
    let memory_codewords = base_codewords(&mut memory, &domain);
    let input_codewords = base_codewords(&mut input, &domain);
    let output_codewords = base_codewords(&mut output, &domain);

    let base_widths = [processor.width, instruction.width, memory.width, input.width, output.width];
    let base_leaves: Vec<Vec<u8>> = (0..domain.fri_domain_length)
        .map(|i| {
            processor_codewords
                .iter()
                .chain(&instruction_codewords)
                .chain(&memory_codewords)
                .chain(&input_codewords)
                .chain(&output_codewords)
                .flat_map(|c| fp_bytes(&c[i]))
                .collect()
        })
        .collect();
    let base_salts: Vec<Digest32> = (0..domain.fri_domain_length).map(|_| random_salt(&mut rng)).collect();
    let base_tree = MerkleTree::build(&base_leaves, &base_salts);

    let mut transcript = Transcript::new();
    transcript.append_digest(&base_tree.root());

    let initial_values = InitialValues::sample(&mut transcript);
    let challenges = Challenges::sample(&mut transcript);

    // --- extension columns: one running fold per cross-table argument ---
    let (proc_instr_perm, proc_mem_perm, proc_input_eval, proc_output_eval) = build_processor_extension_columns(&processor, &initial_values, &challenges);
    let (instr_instr_perm, instr_instr_eval) = build_instruction_extension_columns(&instruction, &initial_values, &challenges);
    let mem_mem_perm = build_memory_extension_column(&memory, &initial_values, &challenges);
    let input_eval_col = build_input_extension_column(&input, &initial_values, &challenges);
    let output_eval_col = build_output_extension_column(&output, &initial_values, &challenges);

    let terminals = [
        proc_instr_perm.last().cloned().unwrap_or_else(|| initial_values.processor_instruction_permutation.clone()),
        proc_mem_perm.last().cloned().unwrap_or_else(|| initial_values.processor_memory_permutation.clone()),
        proc_input_eval.last().cloned().unwrap_or_else(|| initial_values.processor_input_evaluation.clone()),
        proc_output_eval.last().cloned().unwrap_or_else(|| initial_values.processor_output_evaluation.clone()),
        instr_instr_eval.last().cloned().unwrap_or_else(|| initial_values.instruction_evaluation.clone()),
    ];

    let processor_ext_codewords: Vec<Vec<Fx>> = vec![
        extension_codeword(&proc_instr_perm, &domain),
        extension_codeword(&proc_mem_perm, &domain),
        extension_codeword(&proc_input_eval, &domain),
        extension_codeword(&proc_output_eval, &domain),
    ];
    let instruction_ext_codewords: Vec<Vec<Fx>> =
        vec![extension_codeword(&instr_instr_perm, &domain), extension_codeword(&instr_instr_eval, &domain)];
    let memory_ext_codewords: Vec<Vec<Fx>> = vec![extension_codeword(&mem_mem_perm, &domain)];
    let input_ext_codewords: Vec<Vec<Fx>> = vec![extension_codeword(&input_eval_col, &domain)];
    let output_ext_codewords: Vec<Vec<Fx>> = vec![extension_codeword(&output_eval_col, &domain)];

    let ext_leaves: Vec<Vec<u8>> = (0..domain.fri_domain_length)
        .map(|i| {
            processor_ext_codewords
                .iter()
                .chain(&instruction_ext_codewords)
                .chain(&memory_ext_codewords)
                .chain(&input_ext_codewords)
                .chain(&output_ext_codewords)
                .flat_map(|c| fx_bytes(&c[i]))
                .collect()
        })
        .collect();
    let ext_salts: Vec<Digest32> = (0..domain.fri_domain_length).map(|_| random_salt(&mut rng)).collect();
    let extension_tree = MerkleTree::build(&ext_leaves, &ext_salts);
    transcript.append_digest(&extension_tree.root());
    for terminal in &terminals {
        transcript.append_field_element(terminal);
    }

    // --- quotients ---
    let shift = domain.trace_shift();
    let processor_ext = ProcessorExtension { initial_values: initial_values.clone() };
    let instruction_ext = InstructionExtension { initial_values: initial_values.clone() };
    let memory_ext = MemoryExtension { initial_values: initial_values.clone() };
    let input_ext = InputExtension { initial_values: initial_values.clone() };
    let output_ext = OutputExtension { initial_values: initial_values.clone() };

    let max_col_degree = domain.rounded_length - 1;
    let mut quotients: Vec<(Vec<Fx>, usize)> = Vec::new();

    let processor_current = assemble_rows(&processor_codewords, &processor_ext_codewords, 0, domain.fri_domain_length);
    let processor_next = assemble_rows(&processor_codewords, &processor_ext_codewords, shift, domain.fri_domain_length);
    push_quotients(&processor_ext, &domain, &challenges, &terminals, processor.original_length(), &processor_current, &processor_next, max_col_degree, &mut quotients);

    let instruction_current = assemble_rows(&instruction_codewords, &instruction_ext_codewords, 0, domain.fri_domain_length);
    let instruction_next = assemble_rows(&instruction_codewords, &instruction_ext_codewords, shift, domain.fri_domain_length);
    push_quotients(&instruction_ext, &domain, &challenges, &terminals, instruction.original_length(), &instruction_current, &instruction_next, max_col_degree, &mut quotients);

    let memory_current = assemble_rows(&memory_codewords, &memory_ext_codewords, 0, domain.fri_domain_length);
    let memory_next = assemble_rows(&memory_codewords, &memory_ext_codewords, shift, domain.fri_domain_length);
    push_quotients(&memory_ext, &domain, &challenges, &terminals, memory.original_length(), &memory_current, &memory_next, max_col_degree, &mut quotients);

    let input_current = assemble_rows(&input_codewords, &input_ext_codewords, 0, domain.fri_domain_length);
    let input_next = assemble_rows(&input_codewords, &input_ext_codewords, shift, domain.fri_domain_length);
    push_quotients(&input_ext, &domain, &challenges, &terminals, input.original_length(), &input_current, &input_next, max_col_degree, &mut quotients);

    let output_current = assemble_rows(&output_codewords, &output_ext_codewords, 0, domain.fri_domain_length);
    let output_next = assemble_rows(&output_codewords, &output_ext_codewords, shift, domain.fri_domain_length);
    push_quotients(&output_ext, &domain, &challenges, &terminals, output.original_length(), &output_current, &output_next, max_col_degree, &mut quotients);

    // --- randomizer polynomial: the sole source of zero-knowledge blinding ---
    let randomizer_coeffs: Vec<Fx> = (0..=max_degree + options.num_randomizers)
        .map(|_| Fx::new([Fp::from(rng.gen::<u64>()), Fp::from(rng.gen::<u64>()), Fp::from(rng.gen::<u64>())]))
        .collect();
    let randomizer_poly = UniPoly::new(&randomizer_coeffs);
    let randomizer_codeword: Vec<Fx> = domain.fri_points().iter().map(|x| randomizer_poly.evaluate(&lift(x))).collect();

    let randomizer_leaves: Vec<Vec<u8>> = randomizer_codeword.iter().map(fx_bytes).collect();
    let randomizer_salts: Vec<Digest32> = (0..domain.fri_domain_length).map(|_| random_salt(&mut rng)).collect();
    let randomizer_tree = MerkleTree::build(&randomizer_leaves, &randomizer_salts);
    transcript.append_digest(&randomizer_tree.root());

    // --- composition: randomizer plus every quotient, each independently
    // weighted and raised with a second, shifted weight so the result's
    // degree sits exactly at `max_degree` for every term ---
    let weights: Vec<Fx> = (0..2 * quotients.len()).map(|_| sample_x_element(&mut transcript)).collect();
    let composition_degree = max_degree + options.num_randomizers;
    let fri_points: Vec<Fx> = domain.fri_points().iter().map(lift).collect();

    let mut composition = randomizer_codeword.clone();
    for (j, (codeword, degree_bound)) in quotients.iter().enumerate() {
        let shift_amount = (composition_degree - *degree_bound) as u128;
        let w0 = &weights[2 * j];
        let w1 = &weights[2 * j + 1];
        for i in 0..domain.fri_domain_length {
            let shifted = fri_points[i].pow(shift_amount) * codeword[i].clone();
            composition[i] = composition[i].clone() + w0.clone() * codeword[i].clone() + w1.clone() * shifted;
        }
    }

    // --- FRI, then open every committed tree at its query indices ---
    let fri = Fri::new(&domain, options.expansion_factor, options.num_colinearity_checks, options.grinding_factor);
    let fri_proof = fri.prove(&composition, &mut transcript);

    let mut base_openings = Vec::with_capacity(2 * fri_proof.indices.len());
    let mut extension_openings = Vec::with_capacity(2 * fri_proof.indices.len());
    let mut randomizer_openings = Vec::with_capacity(fri_proof.indices.len());
    for &index in &fri_proof.indices {
        let next_index = (index + shift) % domain.fri_domain_length;
        base_openings.push(open_row(&base_leaves, &base_salts, &base_tree, index));
        base_openings.push(open_row(&base_leaves, &base_salts, &base_tree, next_index));
        extension_openings.push(open_row(&ext_leaves, &ext_salts, &extension_tree, index));
        extension_openings.push(open_row(&ext_leaves, &ext_salts, &extension_tree, next_index));
        randomizer_openings.push(open_row(&randomizer_leaves, &randomizer_salts, &randomizer_tree, index));
    }
    let _ = base_widths;

    let proof = StarkProof {
        base_root: base_tree.root(),
        terminals,
        extension_root: extension_tree.root(),
        randomizer_root: randomizer_tree.root(),
        fri_proof,
        base_openings,
        extension_openings,
        randomizer_openings,
    };
    proof.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm;

    #[test]
    fn proves_a_trivial_program_without_panicking() {
        let trace = vm::execute("++.", &[]).unwrap();
        let options = ProofOptions::new(8, 4, 8).unwrap();
        let bytes = prove(&options, trace);
        assert!(!bytes.is_empty());
    }

    #[test]
    fn proves_a_program_that_consumes_input_through_a_loop() {
        let trace = vm::execute(",>,<[->+<]>.", &[3, 5]).unwrap();
        let options = ProofOptions::new(8, 4, 8).unwrap();
        let bytes = prove(&options, trace);
        assert!(!bytes.is_empty());
    }
}
