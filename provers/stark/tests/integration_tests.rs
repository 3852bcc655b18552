use brainfuck_math::field::Fp;
use brainfuck_stark::{execute, prove, verify, ExecutionTrace, ProofOptions};

fn lengths(trace: &ExecutionTrace) -> [usize; 5] {
    [trace.processor.len(), trace.instruction.len(), trace.memory.len(), trace.input.len(), trace.output.len()]
}

fn options() -> ProofOptions {
    ProofOptions::new(8, 4, 8).unwrap()
}

#[test]
fn proves_and_verifies_with_grinding_enabled() {
    let trace = execute("+++.", &[]).unwrap();
    let sizes = lengths(&trace);
    let options = ProofOptions::with_grinding(8, 4, 8, 6).unwrap();
    let bytes = prove(&options, trace);
    assert!(verify(&options, sizes, &bytes));
}

#[test]
fn proves_and_verifies_a_sequence_of_increments() {
    let trace = execute("+++.", &[]).unwrap();
    assert_eq!(trace.output, vec![3]);
    let sizes = lengths(&trace);
    let bytes = prove(&options(), trace);
    assert!(verify(&options(), sizes, &bytes));
}

#[test]
fn proves_and_verifies_a_loop_that_zeroes_a_cell() {
    let trace = execute("+++[-]", &[]).unwrap();
    let sizes = lengths(&trace);
    let bytes = prove(&options(), trace);
    assert!(verify(&options(), sizes, &bytes));
}

#[test]
fn proves_and_verifies_reading_and_echoing_input_until_it_runs_out() {
    let trace = execute(",[.,]", b"hello").unwrap();
    assert_eq!(trace.output, b"hello");
    let sizes = lengths(&trace);
    let bytes = prove(&options(), trace);
    assert!(verify(&options(), sizes, &bytes));
}

#[test]
fn proves_and_verifies_the_classic_cell_copy_idiom() {
    let trace = execute(",>,<[->+<]>.", &[3, 5]).unwrap();
    assert_eq!(trace.output, vec![8]);
    let sizes = lengths(&trace);
    let bytes = prove(&options(), trace);
    assert!(verify(&options(), sizes, &bytes));
}

#[test]
fn proves_and_verifies_pointer_movement_across_several_cells() {
    let trace = execute("+>++>+++>++++<<<.>.>.>.", &[]).unwrap();
    assert_eq!(trace.output, vec![1, 2, 3, 4]);
    let sizes = lengths(&trace);
    let bytes = prove(&options(), trace);
    assert!(verify(&options(), sizes, &bytes));
}

#[test]
fn rejects_a_trace_whose_memory_was_tampered_with_after_execution() {
    let mut trace = execute("+>+.", &[]).unwrap();
    let row = trace.memory.get_mut(0).expect("at least one memory row");
    row[2] = row[2].clone() + Fp::from(1u64);
    let sizes = lengths(&trace);
    let bytes = prove(&options(), trace);
    assert!(!verify(&options(), sizes, &bytes));
}

#[test]
fn rejects_a_proof_presented_with_the_wrong_public_lengths() {
    let trace = execute("+++.", &[]).unwrap();
    let bytes = prove(&options(), trace);
    assert!(!verify(&options(), [1, 1, 1, 1, 1], &bytes));
}
