use sha3::{Digest, Sha3_256};

use crate::errors::MerkleError;

pub type Digest32 = [u8; 32];

fn hash_leaf(bytes: &[u8], salt: &Digest32) -> Digest32 {
    let mut hasher = Sha3_256::new();
    hasher.update(bytes);
    hasher.update(salt);
    hasher.finalize().into()
}

fn hash_two(left: &Digest32, right: &Digest32) -> Digest32 {
    let mut hasher = Sha3_256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

fn is_power_of_two(x: usize) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

/// A sibling digest on the path from a leaf to the root, together with which
/// side of the parent hash it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPath(pub Vec<Digest32>);

/// A salted binary Merkle tree over 32-byte leaf digests.
///
/// Leaves are `H(serialize(v) || salt)`; committing with a fresh random salt
/// per leaf keeps the leaf digests themselves from leaking equality between
/// opened and unopened values.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// Level 0 is the root; the last level is the (padded) leaves.
    levels: Vec<Vec<Digest32>>,
    num_leaves: usize,
}

impl MerkleTree {
    pub fn root(&self) -> Digest32 {
        self.levels[0][0]
    }

    /// Builds a tree over `values`, hashing each with its own random salt via
    /// `salts` (caller-supplied so the prover can persist them for later
    /// openings). Pads the leaf row to a power of two by repeating the last
    /// leaf, matching the convention used for trace-table padding.
    pub fn build(values: &[Vec<u8>], salts: &[Digest32]) -> Self {
        assert_eq!(values.len(), salts.len(), "one salt is required per leaf");
        assert!(!values.is_empty(), "cannot commit to an empty leaf set");

        let mut leaves: Vec<Digest32> = values
            .iter()
            .zip(salts)
            .map(|(v, salt)| hash_leaf(v, salt))
            .collect();

        let num_leaves = leaves.len();
        while !is_power_of_two(leaves.len()) {
            leaves.push(*leaves.last().unwrap());
        }

        let mut levels = vec![leaves];
        while levels[0].len() > 1 {
            let prev = &levels[0];
            let mut next = Vec::with_capacity(prev.len() / 2);
            for pair in prev.chunks(2) {
                next.push(hash_two(&pair[0], &pair[1]));
            }
            levels.insert(0, next);
        }

        Self { levels, num_leaves }
    }

    fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Returns the authentication path for leaf `index`: the sibling digest
    /// at every level from the leaf row up to (but excluding) the root.
    pub fn open(&self, index: usize) -> Result<AuthPath, MerkleError> {
        if index >= self.num_leaves {
            return Err(MerkleError::IndexOutOfRange { index, num_leaves: self.num_leaves });
        }
        let depth = self.depth();
        let mut path = Vec::with_capacity(depth);
        let mut idx = index;
        for level in (1..=depth).rev() {
            let sibling = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
            path.push(self.levels[level][sibling]);
            idx /= 2;
        }
        Ok(AuthPath(path))
    }

    /// Recomputes the root from `leaf` (the hashed, salted leaf digest) and
    /// `path`, and compares it against `root`.
    pub fn verify(root: &Digest32, index: usize, path: &AuthPath, leaf: &Digest32) -> Result<(), MerkleError> {
        let mut current = *leaf;
        let mut idx = index;
        for sibling in &path.0 {
            current = if idx % 2 == 0 {
                hash_two(&current, sibling)
            } else {
                hash_two(sibling, &current)
            };
            idx /= 2;
        }
        if &current == root {
            Ok(())
        } else {
            Err(MerkleError::RootMismatch)
        }
    }

    pub fn leaf_digest(value: &[u8], salt: &Digest32) -> Digest32 {
        hash_leaf(value, salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salts(n: usize) -> Vec<Digest32> {
        (0..n).map(|i| {
            let mut s = [0u8; 32];
            s[0] = i as u8;
            s
        }).collect()
    }

    #[test]
    fn open_then_verify_succeeds_for_every_leaf() {
        let values: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i]).collect();
        let salts = salts(values.len());
        let tree = MerkleTree::build(&values, &salts);
        let root = tree.root();

        for i in 0..values.len() {
            let leaf = MerkleTree::leaf_digest(&values[i], &salts[i]);
            let path = tree.open(i).unwrap();
            assert!(MerkleTree::verify(&root, i, &path, &leaf).is_ok());
        }
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let values: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i]).collect();
        let salts = salts(values.len());
        let tree = MerkleTree::build(&values, &salts);
        let root = tree.root();

        let path = tree.open(1).unwrap();
        let wrong_leaf = MerkleTree::leaf_digest(&[99], &salts[1]);
        assert_eq!(MerkleTree::verify(&root, 1, &path, &wrong_leaf), Err(MerkleError::RootMismatch));
    }

    #[test]
    fn opening_an_out_of_range_index_fails() {
        let values: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i]).collect();
        let salts = salts(values.len());
        let tree = MerkleTree::build(&values, &salts);
        assert!(matches!(tree.open(10), Err(MerkleError::IndexOutOfRange { .. })));
    }

    #[test]
    fn non_power_of_two_leaf_counts_pad_with_repetition() {
        let values: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i]).collect();
        let salts = salts(values.len());
        let tree = MerkleTree::build(&values, &salts);
        // 5 leaves pad to 8; depth is log2(8) = 3.
        assert_eq!(tree.depth(), 3);
    }
}
