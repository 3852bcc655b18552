//! Checks a [`StarkProof`] against the public claim it makes about an
//! execution: that some trace of the declared table lengths satisfies every
//! table's AIR and the cross-table permutation/evaluation arguments tying
//! them together.
//!
//! Every step mirrors [`crate::prover::prove`] exactly: the same two-pass
//! degree accounting, the same [`Domain`], the same transcript absorption
//! order, so that Fiat-Shamir rederives the identical challenges, weights,
//! and query indices without the verifier ever seeing the trace itself.
//! Every committed row the verifier needs is pulled from the proof's
//! openings instead, each checked against its Merkle root before use.

use brainfuck_crypto::merkle::MerkleTree;
use brainfuck_crypto::transcript::Transcript;
use brainfuck_math::field::{lift, Fp, Fx, XField};
use brainfuck_math::polynomial::multivariate::MultiPoly;

use crate::challenges::{sample_x_element, Challenges, InitialValues};
use crate::config::ProofOptions;
use crate::domain::{next_pow2, Domain};
use crate::errors::StarkError;
use crate::extensions::{InputExtension, InstructionExtension, MemoryExtension, OutputExtension, ProcessorExtension};
use crate::fri::Fri;
use crate::proof::{RowOpening, StarkProof};
use crate::prover::{max_quotient_degree_bound, quotient_degree_bounds};
use crate::table_extension::{boundary_zerofier_at, terminal_zerofier_at, transition_zerofier_at, TableExtensionAir};

/// Base and extension widths of the five tables, in the fixed order every
/// committed row packs them: processor, instruction, memory, input, output.
const BASE_WIDTHS: [usize; 5] = [7, 3, 3, 1, 1];
const EXT_WIDTHS: [usize; 5] = [4, 2, 1, 1, 1];

fn decode_fp_row(bytes: &[u8], count: usize) -> Result<Vec<Fp>, StarkError> {
    if bytes.len() != count * 8 {
        return Err(StarkError::MalformedProof("base row has the wrong byte length".into()));
    }
    Ok(bytes.chunks_exact(8).map(|c| Fp::from(u64::from_le_bytes(c.try_into().unwrap()))).collect())
}

fn decode_fx_row(bytes: &[u8], count: usize) -> Result<Vec<Fx>, StarkError> {
    if bytes.len() != count * 24 {
        return Err(StarkError::MalformedProof("extension row has the wrong byte length".into()));
    }
    Ok(bytes
        .chunks_exact(24)
        .map(|chunk| {
            let mut components = [Fp::from(0u64), Fp::from(0u64), Fp::from(0u64)];
            for (i, c) in chunk.chunks_exact(8).enumerate() {
                components[i] = Fp::from(u64::from_le_bytes(c.try_into().unwrap()));
            }
            Fx::new(components)
        })
        .collect())
}

fn verify_opening(root: &[u8; 32], index: usize, opening: &RowOpening) -> Result<(), StarkError> {
    let leaf = MerkleTree::leaf_digest(&opening.row_bytes, &opening.salt);
    MerkleTree::verify(root, index, &opening.path, &leaf)?;
    Ok(())
}

/// Every quotient's value at a single point `x`, in the same boundary,
/// transition, terminal order `quotient_degree_bounds` reports bounds in.
fn quotient_values_at(
    extension: &dyn TableExtensionAir,
    domain: &Domain,
    challenges: &Challenges,
    terminals: &[Fx],
    num_real_rows: usize,
    current_row: &[Fx],
    next_row: &[Fx],
    x: &Fx,
) -> Result<Vec<Fx>, StarkError> {
    let transition_row: Vec<Fx> = current_row.iter().cloned().chain(next_row.iter().cloned()).collect();
    let b_zero = boundary_zerofier_at(x);
    let t_zero = transition_zerofier_at(domain, num_real_rows, x);
    let term_zero = terminal_zerofier_at(domain, num_real_rows, x);

    let eval = |c: &MultiPoly<XField>, row: &[Fx]| c.evaluate(row).map_err(|_| StarkError::AlgebraicMismatch);

    let boundary = extension
        .boundary_constraints_ext()
        .iter()
        .map(|c| eval(c, current_row).map(|v| v / b_zero.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    let transition = extension
        .transition_constraints_ext(challenges)
        .iter()
        .map(|c| eval(c, &transition_row).map(|v| v / t_zero.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    let terminal = extension
        .terminal_constraints_ext(challenges, terminals)
        .iter()
        .map(|c| eval(c, current_row).map(|v| v / term_zero.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(boundary.into_iter().chain(transition).chain(terminal).collect())
}

fn slice_offsets(widths: &[usize; 5]) -> [(usize, usize); 5] {
    let mut offsets = [(0usize, 0usize); 5];
    let mut start = 0;
    for (i, &w) in widths.iter().enumerate() {
        offsets[i] = (start, start + w);
        start += w;
    }
    offsets
}

fn assemble_row(base_row: &[Fp], ext_row: &[Fx], base_range: (usize, usize), ext_range: (usize, usize)) -> Vec<Fx> {
    base_row[base_range.0..base_range.1]
        .iter()
        .map(lift)
        .chain(ext_row[ext_range.0..ext_range.1].iter().cloned())
        .collect()
}

fn verify_inner(options: &ProofOptions, original_lengths: [usize; 5], proof_bytes: &[u8]) -> Result<(), StarkError> {
    let original_max = original_lengths.into_iter().max().unwrap_or(1).max(1);
    let rounded_length = next_pow2(original_max);

    let max_degree = max_quotient_degree_bound(rounded_length);
    let quotient_degree_bound = max_degree + options.num_randomizers;
    let domain = Domain::new(original_max, options.num_randomizers, options.expansion_factor, quotient_degree_bound);

    let fri = Fri::new(&domain, options.expansion_factor, options.num_colinearity_checks, options.grinding_factor);
    let proof = StarkProof::from_bytes(proof_bytes, fri.num_rounds(), options.num_colinearity_checks, options.num_colinearity_checks)?;

    let mut transcript = Transcript::new();
    transcript.append_digest(&proof.base_root);
    let initial_values = InitialValues::sample(&mut transcript);
    let challenges = Challenges::sample(&mut transcript);
    transcript.append_digest(&proof.extension_root);
    for terminal in &proof.terminals {
        transcript.append_field_element(terminal);
    }
    transcript.append_digest(&proof.randomizer_root);

    let processor_ext = ProcessorExtension { initial_values: initial_values.clone() };
    let instruction_ext = InstructionExtension { initial_values: initial_values.clone() };
    let memory_ext = MemoryExtension { initial_values: initial_values.clone() };
    let input_ext = InputExtension { initial_values: initial_values.clone() };
    let output_ext = OutputExtension { initial_values };

    let max_col_degree = domain.rounded_length - 1;
    let degree_bounds: Vec<usize> = quotient_degree_bounds(&processor_ext, &challenges, &proof.terminals, max_col_degree, domain.rounded_length)
        .into_iter()
        .chain(quotient_degree_bounds(&instruction_ext, &challenges, &proof.terminals, max_col_degree, domain.rounded_length))
        .chain(quotient_degree_bounds(&memory_ext, &challenges, &proof.terminals, max_col_degree, domain.rounded_length))
        .chain(quotient_degree_bounds(&input_ext, &challenges, &proof.terminals, max_col_degree, domain.rounded_length))
        .chain(quotient_degree_bounds(&output_ext, &challenges, &proof.terminals, max_col_degree, domain.rounded_length))
        .collect();

    let weights: Vec<Fx> = (0..2 * degree_bounds.len()).map(|_| sample_x_element(&mut transcript)).collect();
    let composition_degree = max_degree + options.num_randomizers;

    let folded = fri.verify(&proof.fri_proof, &mut transcript)?;
    if folded.len() != proof.fri_proof.indices.len() {
        return Err(StarkError::FriRejection);
    }

    let shift = domain.trace_shift();
    let base_offsets = slice_offsets(&BASE_WIDTHS);
    let ext_offsets = slice_offsets(&EXT_WIDTHS);

    for (query, &index) in proof.fri_proof.indices.iter().enumerate() {
        let next_index = (index + shift) % domain.fri_domain_length;
        let base_current = &proof.base_openings[2 * query];
        let base_next = &proof.base_openings[2 * query + 1];
        let ext_current = &proof.extension_openings[2 * query];
        let ext_next = &proof.extension_openings[2 * query + 1];
        let randomizer_opening = &proof.randomizer_openings[query];

        verify_opening(&proof.base_root, index, base_current)?;
        verify_opening(&proof.base_root, next_index, base_next)?;
        verify_opening(&proof.extension_root, index, ext_current)?;
        verify_opening(&proof.extension_root, next_index, ext_next)?;
        verify_opening(&proof.randomizer_root, index, randomizer_opening)?;

        let base_cur = decode_fp_row(&base_current.row_bytes, BASE_WIDTHS.iter().sum())?;
        let base_nxt = decode_fp_row(&base_next.row_bytes, BASE_WIDTHS.iter().sum())?;
        let ext_cur = decode_fx_row(&ext_current.row_bytes, EXT_WIDTHS.iter().sum())?;
        let ext_nxt = decode_fx_row(&ext_next.row_bytes, EXT_WIDTHS.iter().sum())?;
        let randomizer_value = decode_fx_row(&randomizer_opening.row_bytes, 1)?.remove(0);

        let x = lift(&domain.fri_point(index));

        let tables: [(&dyn TableExtensionAir, usize); 5] = [
            (&processor_ext, original_lengths[0]),
            (&instruction_ext, original_lengths[1]),
            (&memory_ext, original_lengths[2]),
            (&input_ext, original_lengths[3]),
            (&output_ext, original_lengths[4]),
        ];

        let mut all_values: Vec<Fx> = Vec::with_capacity(degree_bounds.len());
        for (table_idx, (extension, num_real_rows)) in tables.iter().enumerate() {
            let current_row = assemble_row(&base_cur, &ext_cur, base_offsets[table_idx], ext_offsets[table_idx]);
            let next_row = assemble_row(&base_nxt, &ext_nxt, base_offsets[table_idx], ext_offsets[table_idx]);
            all_values.extend(quotient_values_at(
                *extension,
                &domain,
                &challenges,
                &proof.terminals,
                *num_real_rows,
                &current_row,
                &next_row,
                &x,
            )?);
        }

        let mut composition_value = randomizer_value;
        for (j, value) in all_values.into_iter().enumerate() {
            let shift_amount = (composition_degree - degree_bounds[j]) as u128;
            let w0 = &weights[2 * j];
            let w1 = &weights[2 * j + 1];
            let shifted = x.pow(shift_amount) * value.clone();
            composition_value = composition_value + w0.clone() * value + w1.clone() * shifted;
        }

        let (_, expected) = folded[query].clone();
        if composition_value != expected {
            return Err(StarkError::AlgebraicMismatch);
        }
    }

    Ok(())
}

/// Verifies `proof_bytes` against `options` and the public `original_lengths`
/// (processor, instruction, memory, input, output cycle counts), collapsing
/// every possible failure into a single boolean per the no-leak requirement.
/// The specific [`StarkError`] is only ever logged, never returned.
pub fn verify(options: &ProofOptions, original_lengths: [usize; 5], proof_bytes: &[u8]) -> bool {
    match verify_inner(options, original_lengths, proof_bytes) {
        Ok(()) => true,
        Err(err) => {
            log::error!("proof rejected: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::prove;
    use crate::vm;

    fn lengths(trace: &vm::ExecutionTrace) -> [usize; 5] {
        [trace.processor.len(), trace.instruction.len(), trace.memory.len(), trace.input.len(), trace.output.len()]
    }

    #[test]
    fn accepts_a_proof_for_a_trivial_program() {
        let trace = vm::execute("++.", &[]).unwrap();
        let sizes = lengths(&trace);
        let options = ProofOptions::new(8, 4, 8).unwrap();
        let bytes = prove(&options, trace);
        assert!(verify(&options, sizes, &bytes));
    }

    #[test]
    fn accepts_a_proof_for_a_program_that_consumes_input_through_a_loop() {
        let trace = vm::execute(",>,<[->+<]>.", &[3, 5]).unwrap();
        let sizes = lengths(&trace);
        let options = ProofOptions::new(8, 4, 8).unwrap();
        let bytes = prove(&options, trace);
        assert!(verify(&options, sizes, &bytes));
    }

    #[test]
    fn rejects_a_proof_tampered_with_after_the_fact() {
        let trace = vm::execute("++.", &[]).unwrap();
        let sizes = lengths(&trace);
        let options = ProofOptions::new(8, 4, 8).unwrap();
        let mut bytes = prove(&options, trace);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(!verify(&options, sizes, &bytes));
    }

    #[test]
    fn rejects_a_proof_checked_against_the_wrong_trace_lengths() {
        let trace = vm::execute("++.", &[]).unwrap();
        let options = ProofOptions::new(8, 4, 8).unwrap();
        let bytes = prove(&options, trace);
        assert!(!verify(&options, [99, 99, 99, 99, 99], &bytes));
    }
}
