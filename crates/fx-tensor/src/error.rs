use thiserror::Error;

#[derive(Error, Debug)]
pub enum TensorError {
    #[error("element count {len} does not match shape {shape:?} (numel={numel})")]
    ElementCountMismatch {
        len: usize,
        shape: Vec<usize>,
        numel: usize,
    },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: String, got: String },
}

pub type Result<T> = std::result::Result<T, TensorError>;
