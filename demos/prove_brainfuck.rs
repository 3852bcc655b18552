//! Runs a brainfuck program, proves the execution, then verifies the proof
//! it just produced. Exits non-zero if the program fails to run or the
//! proof is rejected.
//!
//! Usage: `prove-brainfuck <program-file> [input-bytes...]`
//!
//! `input-bytes` are decimal byte values fed to `,`; omit them for programs
//! that never read input.

use std::process::ExitCode;
use std::{env, fs};

use brainfuck_stark::{execute, prove, verify, ProofOptions};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: prove-brainfuck <program-file> [input-bytes...]");
        return ExitCode::FAILURE;
    };
    let input: Vec<u8> = args
        .map(|a| a.parse::<u8>().unwrap_or_else(|_| panic!("input bytes must be 0-255, got {a}")))
        .collect();

    let source = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let trace = match execute(&source, &input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("execution failed: {e:?}");
            return ExitCode::FAILURE;
        }
    };
    let original_lengths =
        [trace.processor.len(), trace.instruction.len(), trace.memory.len(), trace.input.len(), trace.output.len()];
    println!("executed {} cycles, produced {} bytes of output", trace.processor.len(), trace.output.len());

    let options = match ProofOptions::default_160_bit() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("invalid proof options: {e}");
            return ExitCode::FAILURE;
        }
    };

    let proof_bytes = prove(&options, trace);
    println!("proof is {} bytes", proof_bytes.len());

    if verify(&options, original_lengths, &proof_bytes) {
        println!("proof accepted");
        ExitCode::SUCCESS
    } else {
        eprintln!("proof rejected");
        ExitCode::FAILURE
    }
}
