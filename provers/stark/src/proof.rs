//! The wire format every proof is serialized to and parsed from (§6): a flat
//! byte stream of tag-prefixed, length-prefixed items, in the exact order
//! they were pushed onto the transcript during proving.

use brainfuck_crypto::merkle::{AuthPath, Digest32};
use brainfuck_math::field::{Fp, Fx};

use crate::errors::StarkError;
use crate::fri::{FriProof, QueryOpening};

pub const TAG_ROOT: u8 = 0x01;
pub const TAG_X_ELEMENT: u8 = 0x02;
pub const TAG_F_ELEMENT: u8 = 0x03;
pub const TAG_AUTH_PATH: u8 = 0x04;

/// One table's committed leaf at a queried FRI index: the raw row bytes
/// (serialized base or extension columns) and its authentication path
/// against that table's root.
#[derive(Debug, Clone)]
pub struct RowOpening {
    pub row_bytes: Vec<u8>,
    pub salt: Digest32,
    pub path: AuthPath,
}

/// Everything pulled from the transcript across one proof, in push order.
#[derive(Debug, Clone)]
pub struct StarkProof {
    pub base_root: Digest32,
    pub terminals: [Fx; 5],
    pub extension_root: Digest32,
    pub randomizer_root: Digest32,
    pub fri_proof: FriProof,
    /// `[current_0, next_0, current_1, next_1, ...]`, one current/next pair
    /// per entry of `fri_proof.indices`, where `next` is the row at
    /// `(index + trace_shift()) % fri_domain_length`.
    pub base_openings: Vec<RowOpening>,
    pub extension_openings: Vec<RowOpening>,
    /// One opening per query index; the randomizer only ever needs the
    /// queried row itself.
    pub randomizer_openings: Vec<RowOpening>,
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn push_tagged(&mut self, tag: u8, payload: &[u8]) {
        self.buf.push(tag);
        self.buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(payload);
    }

    fn push_root(&mut self, root: &Digest32) {
        self.push_tagged(TAG_ROOT, root);
    }

    fn push_x(&mut self, x: &Fx) {
        let payload: Vec<u8> = x.value().iter().flat_map(|c| c.value().to_le_bytes()).collect();
        self.push_tagged(TAG_X_ELEMENT, &payload);
    }

    fn push_f(&mut self, f: &Fp) {
        self.push_tagged(TAG_F_ELEMENT, &f.value().to_le_bytes());
    }

    fn push_auth_path(&mut self, path: &AuthPath) {
        let mut payload = (path.0.len() as u32).to_le_bytes().to_vec();
        for digest in &path.0 {
            payload.extend_from_slice(digest);
        }
        self.push_tagged(TAG_AUTH_PATH, &payload);
    }

    fn push_row_opening(&mut self, opening: &RowOpening) {
        self.push_tagged(TAG_F_ELEMENT, &opening.row_bytes);
        self.push_root(&opening.salt);
        self.push_auth_path(&opening.path);
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take_tagged(&mut self, expected_tag: u8) -> Result<&'a [u8], StarkError> {
        let tag = *self.buf.get(self.pos).ok_or_else(|| StarkError::MalformedProof("truncated stream".into()))?;
        if tag != expected_tag {
            return Err(StarkError::MalformedProof(format!("expected tag {expected_tag:#x}, got {tag:#x}")));
        }
        let len_bytes = self
            .buf
            .get(self.pos + 1..self.pos + 5)
            .ok_or_else(|| StarkError::MalformedProof("truncated length prefix".into()))?;
        let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
        let start = self.pos + 5;
        let payload = self
            .buf
            .get(start..start + len)
            .ok_or_else(|| StarkError::MalformedProof("truncated payload".into()))?;
        self.pos = start + len;
        Ok(payload)
    }

    fn take_root(&mut self) -> Result<Digest32, StarkError> {
        let payload = self.take_tagged(TAG_ROOT)?;
        payload.try_into().map_err(|_| StarkError::MalformedProof("root must be 32 bytes".into()))
    }

    fn take_x(&mut self) -> Result<Fx, StarkError> {
        let payload = self.take_tagged(TAG_X_ELEMENT)?;
        if payload.len() != 24 {
            return Err(StarkError::MalformedProof("X-element must be 24 bytes".into()));
        }
        let mut components = [Fp::from(0u64), Fp::from(0u64), Fp::from(0u64)];
        for (i, chunk) in payload.chunks(8).enumerate() {
            components[i] = Fp::from(u64::from_le_bytes(chunk.try_into().unwrap()));
        }
        Ok(Fx::new(components))
    }

    fn take_auth_path(&mut self) -> Result<AuthPath, StarkError> {
        let payload = self.take_tagged(TAG_AUTH_PATH)?;
        let count = u32::from_le_bytes(payload[..4].try_into().unwrap()) as usize;
        let mut digests = Vec::with_capacity(count);
        for chunk in payload[4..].chunks(32) {
            digests.push(chunk.try_into().map_err(|_| StarkError::MalformedProof("short digest".into()))?);
        }
        if digests.len() != count {
            return Err(StarkError::MalformedProof("auth path length mismatch".into()));
        }
        Ok(AuthPath(digests))
    }

    fn take_row_opening(&mut self) -> Result<RowOpening, StarkError> {
        let row_bytes = self.take_tagged(TAG_F_ELEMENT)?.to_vec();
        let salt = self.take_root()?;
        let path = self.take_auth_path()?;
        Ok(RowOpening { row_bytes, salt, path })
    }
}

impl StarkProof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.push_root(&self.base_root);
        for terminal in &self.terminals {
            w.push_x(terminal);
        }
        w.push_root(&self.extension_root);
        w.push_root(&self.randomizer_root);

        for root in &self.fri_proof.round_roots {
            w.push_root(root);
        }
        w.push_tagged(TAG_F_ELEMENT, &(self.fri_proof.last_codeword.len() as u32).to_le_bytes());
        for value in &self.fri_proof.last_codeword {
            w.push_x(value);
        }
        w.push_tagged(TAG_F_ELEMENT, &(self.fri_proof.indices.len() as u32).to_le_bytes());
        for &index in &self.fri_proof.indices {
            w.push_tagged(TAG_F_ELEMENT, &(index as u64).to_le_bytes());
        }
        w.push_tagged(TAG_F_ELEMENT, &self.fri_proof.nonce.to_le_bytes());
        for round in &self.fri_proof.openings {
            for opening in round {
                w.push_x(&opening.a_value);
                w.push_auth_path(&opening.a_path);
                w.push_x(&opening.b_value);
                w.push_auth_path(&opening.b_path);
            }
        }

        for opening in &self.base_openings {
            w.push_row_opening(opening);
        }
        for opening in &self.extension_openings {
            w.push_row_opening(opening);
        }
        for opening in &self.randomizer_openings {
            w.push_row_opening(opening);
        }

        w.buf
    }

    pub fn from_bytes(
        bytes: &[u8],
        num_fri_rounds: usize,
        num_colinearity_checks: usize,
        num_queries: usize,
    ) -> Result<Self, StarkError> {
        let mut r = Reader::new(bytes);
        let base_root = r.take_root()?;
        let terminals = [r.take_x()?, r.take_x()?, r.take_x()?, r.take_x()?, r.take_x()?];
        let extension_root = r.take_root()?;
        let randomizer_root = r.take_root()?;

        let mut round_roots = Vec::with_capacity(num_fri_rounds + 1);
        for _ in 0..=num_fri_rounds {
            round_roots.push(r.take_root()?);
        }
        let last_len = u32::from_le_bytes(r.take_tagged(TAG_F_ELEMENT)?.try_into().unwrap()) as usize;
        let mut last_codeword = Vec::with_capacity(last_len);
        for _ in 0..last_len {
            last_codeword.push(r.take_x()?);
        }
        let index_count = u32::from_le_bytes(r.take_tagged(TAG_F_ELEMENT)?.try_into().unwrap()) as usize;
        let mut indices = Vec::with_capacity(index_count);
        for _ in 0..index_count {
            let raw = u64::from_le_bytes(r.take_tagged(TAG_F_ELEMENT)?.try_into().unwrap());
            indices.push(raw as usize);
        }
        let nonce = u64::from_le_bytes(r.take_tagged(TAG_F_ELEMENT)?.try_into().unwrap());
        let mut openings = Vec::with_capacity(num_fri_rounds);
        for _ in 0..num_fri_rounds {
            let mut round = Vec::with_capacity(num_colinearity_checks);
            for _ in 0..num_colinearity_checks {
                let a_value = r.take_x()?;
                let a_path = r.take_auth_path()?;
                let b_value = r.take_x()?;
                let b_path = r.take_auth_path()?;
                round.push(QueryOpening { a_value, a_path, b_value, b_path });
            }
            openings.push(round);
        }
        let fri_proof = FriProof { round_roots, last_codeword, indices, openings, nonce };

        // Base and extension openings carry both the queried row and the
        // row one trace-step ahead (current, next, current, next, ...), so
        // the AIR's transition constraints can be re-evaluated; the
        // randomizer only ever needs the queried row itself.
        let mut base_openings = Vec::with_capacity(2 * num_queries);
        for _ in 0..2 * num_queries {
            base_openings.push(r.take_row_opening()?);
        }
        let mut extension_openings = Vec::with_capacity(2 * num_queries);
        for _ in 0..2 * num_queries {
            extension_openings.push(r.take_row_opening()?);
        }
        let mut randomizer_openings = Vec::with_capacity(num_queries);
        for _ in 0..num_queries {
            randomizer_openings.push(r.take_row_opening()?);
        }

        Ok(Self {
            base_root,
            terminals,
            extension_root,
            randomizer_root,
            fri_proof,
            base_openings,
            extension_openings,
            randomizer_openings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_scalar_header_fields() {
        let proof = StarkProof {
            base_root: [7u8; 32],
            terminals: [Fx::from(1u64), Fx::from(2u64), Fx::from(3u64), Fx::from(4u64), Fx::from(5u64)],
            extension_root: [9u8; 32],
            randomizer_root: [3u8; 32],
            fri_proof: FriProof { round_roots: vec![[1u8; 32]], last_codeword: vec![Fx::from(11u64)], indices: vec![0], openings: vec![], nonce: 42 },
            base_openings: vec![],
            extension_openings: vec![],
            randomizer_openings: vec![],
        };
        let bytes = proof.to_bytes();
        let decoded = StarkProof::from_bytes(&bytes, 0, 0, 0).unwrap();
        assert_eq!(decoded.base_root, proof.base_root);
        assert_eq!(decoded.terminals, proof.terminals);
        assert_eq!(decoded.fri_proof.last_codeword, proof.fri_proof.last_codeword);
        assert_eq!(decoded.fri_proof.nonce, proof.fri_proof.nonce);
    }

    #[test]
    fn a_wrong_tag_is_rejected_as_malformed() {
        let mut bytes = vec![TAG_AUTH_PATH];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(StarkProof::from_bytes(&bytes, 0, 0, 0), Err(StarkError::MalformedProof(_))));
    }
}
