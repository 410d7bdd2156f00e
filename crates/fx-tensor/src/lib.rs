//! `fx-tensor` - Source-framework value model for fx-export.
//!
//! This crate provides:
//! - A `DType` enum covering every dtype the source framework defines
//! - A `Tensor` type (tensor-like values captured from the framework, with a device)
//! - An `Array` type: the plain, device-less numeric array handed to the target format
//! - Typed element storage shared by both
//! - Shape utilities

pub mod array;
pub mod dtype;
pub mod error;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use array::Array;
pub use dtype::DType;
pub use error::{Result, TensorError};
pub use half::{bf16, f16};
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::{Device, Tensor};
