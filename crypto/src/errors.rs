use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum MerkleError {
    #[error("leaf index {index} is out of range for a tree with {num_leaves} leaves")]
    IndexOutOfRange { index: usize, num_leaves: usize },
    #[error("authentication path has {given} entries but the tree has depth {expected}")]
    WrongPathLength { given: usize, expected: usize },
    #[error("authentication path does not reconstruct the committed root")]
    RootMismatch,
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TranscriptError {
    #[error("attempted to pull from an empty transcript stream")]
    StreamExhausted,
}
