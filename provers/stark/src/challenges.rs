use brainfuck_crypto::transcript::Transcript;
use brainfuck_math::field::{lift, Fp, Fx};

/// The eleven challenges sampled once, right after the base tables are
/// committed, and shared by every extension (§4.8).
#[derive(Debug, Clone)]
pub struct Challenges {
    pub a: Fx,
    pub b: Fx,
    pub c: Fx,
    pub d: Fx,
    pub e: Fx,
    pub f: Fx,
    pub alpha: Fx,
    pub beta: Fx,
    pub gamma: Fx,
    pub delta: Fx,
    pub eta: Fx,
}

/// The five initial running-column values sampled alongside the challenges
/// (permutation products start at a nonzero seed rather than one, and
/// evaluation sums start at zero); kept separate from `Challenges` because
/// they govern column *initialization*, not the AIR itself.
#[derive(Debug, Clone)]
pub struct InitialValues {
    pub processor_instruction_permutation: Fx,
    pub processor_memory_permutation: Fx,
    pub processor_input_evaluation: Fx,
    pub processor_output_evaluation: Fx,
    pub instruction_evaluation: Fx,
}

/// Draws one uniformly-distributed `X`-element from the transcript by
/// sampling three `F`-elements (8 bytes each, reduced mod p — acceptable
/// bias given Goldilocks is within a `2^32` sliver of `2^64`) and packing
/// them as `(a0, a1, a2)` coefficients.
pub(crate) fn sample_x_element(transcript: &mut Transcript) -> Fx {
    let mut component = |t: &mut Transcript| {
        let bytes = t.fiat_shamir(8);
        let raw = u64::from_le_bytes(bytes.try_into().unwrap());
        Fp::from(raw)
    };
    let a0 = component(transcript);
    let a1 = component(transcript);
    let a2 = component(transcript);
    Fx::new([a0, a1, a2])
}

impl Challenges {
    pub fn sample(transcript: &mut Transcript) -> Self {
        Self {
            a: sample_x_element(transcript),
            b: sample_x_element(transcript),
            c: sample_x_element(transcript),
            d: sample_x_element(transcript),
            e: sample_x_element(transcript),
            f: sample_x_element(transcript),
            alpha: sample_x_element(transcript),
            beta: sample_x_element(transcript),
            gamma: sample_x_element(transcript),
            delta: sample_x_element(transcript),
            eta: sample_x_element(transcript),
        }
    }
}

impl InitialValues {
    pub fn sample(transcript: &mut Transcript) -> Self {
        Self {
            processor_instruction_permutation: sample_x_element(transcript),
            processor_memory_permutation: sample_x_element(transcript),
            processor_input_evaluation: lift(&Fp::zero()),
            processor_output_evaluation: lift(&Fp::zero()),
            instruction_evaluation: lift(&Fp::zero()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_is_deterministic_given_the_same_transcript_state() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();
        t1.append_bytes(b"base root");
        t2.append_bytes(b"base root");
        let c1 = Challenges::sample(&mut t1);
        let c2 = Challenges::sample(&mut t2);
        assert_eq!(c1.alpha, c2.alpha);
        assert_eq!(c1.eta, c2.eta);
    }

    #[test]
    fn successive_challenges_in_the_tuple_differ() {
        let mut t = Transcript::new();
        t.append_bytes(b"base root");
        let challenges = Challenges::sample(&mut t);
        assert_ne!(challenges.a, challenges.b);
        assert_ne!(challenges.alpha, challenges.beta);
    }
}
