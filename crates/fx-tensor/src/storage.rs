use half::{bf16, f16};

use crate::dtype::DType;
use crate::error::{Result, TensorError};

/// Typed, contiguous, row-major element storage.
///
/// One variant per framework dtype. Complex elements are stored as
/// `[real, imaginary]` pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F16(Vec<f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<[f32; 2]>),
    C128(Vec<[f64; 2]>),
    BF16(Vec<bf16>),
}

impl Storage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            Storage::Bool(v) => v.len(),
            Storage::U8(v) => v.len(),
            Storage::I8(v) => v.len(),
            Storage::I16(v) => v.len(),
            Storage::I32(v) => v.len(),
            Storage::I64(v) => v.len(),
            Storage::F16(v) => v.len(),
            Storage::F32(v) => v.len(),
            Storage::F64(v) => v.len(),
            Storage::C64(v) => v.len(),
            Storage::C128(v) => v.len(),
            Storage::BF16(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            Storage::Bool(_) => DType::Bool,
            Storage::U8(_) => DType::U8,
            Storage::I8(_) => DType::I8,
            Storage::I16(_) => DType::I16,
            Storage::I32(_) => DType::I32,
            Storage::I64(_) => DType::I64,
            Storage::F16(_) => DType::F16,
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
            Storage::C64(_) => DType::C64,
            Storage::C128(_) => DType::C128,
            Storage::BF16(_) => DType::BF16,
        }
    }

    /// Create zero-filled storage for the given dtype and element count.
    pub fn zeros(dtype: DType, n: usize) -> Self {
        match dtype {
            DType::Bool => Storage::Bool(vec![false; n]),
            DType::U8 => Storage::U8(vec![0; n]),
            DType::I8 => Storage::I8(vec![0; n]),
            DType::I16 => Storage::I16(vec![0; n]),
            DType::I32 => Storage::I32(vec![0; n]),
            DType::I64 => Storage::I64(vec![0; n]),
            DType::F16 => Storage::F16(vec![f16::ZERO; n]),
            DType::F32 => Storage::F32(vec![0.0; n]),
            DType::F64 => Storage::F64(vec![0.0; n]),
            DType::C64 => Storage::C64(vec![[0.0; 2]; n]),
            DType::C128 => Storage::C128(vec![[0.0; 2]; n]),
            DType::BF16 => Storage::BF16(vec![bf16::ZERO; n]),
        }
    }

    /// Returns the data as a bool slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not Bool.
    pub fn as_bool_slice(&self) -> Result<&[bool]> {
        match self {
            Storage::Bool(v) => Ok(v.as_slice()),
            other => Err(mismatch(DType::Bool, other.dtype())),
        }
    }

    /// Returns the data as an i64 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not I64.
    pub fn as_i64_slice(&self) -> Result<&[i64]> {
        match self {
            Storage::I64(v) => Ok(v.as_slice()),
            other => Err(mismatch(DType::I64, other.dtype())),
        }
    }

    /// Returns the data as an f32 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not F32.
    pub fn as_f32_slice(&self) -> Result<&[f32]> {
        match self {
            Storage::F32(v) => Ok(v.as_slice()),
            other => Err(mismatch(DType::F32, other.dtype())),
        }
    }

    /// Returns the data as an f64 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not F64.
    pub fn as_f64_slice(&self) -> Result<&[f64]> {
        match self {
            Storage::F64(v) => Ok(v.as_slice()),
            other => Err(mismatch(DType::F64, other.dtype())),
        }
    }
}

fn mismatch(expected: DType, got: DType) -> TensorError {
    TensorError::DTypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    }
}

impl From<Vec<bool>> for Storage {
    fn from(data: Vec<bool>) -> Self {
        Storage::Bool(data)
    }
}

impl From<Vec<i32>> for Storage {
    fn from(data: Vec<i32>) -> Self {
        Storage::I32(data)
    }
}

impl From<Vec<i64>> for Storage {
    fn from(data: Vec<i64>) -> Self {
        Storage::I64(data)
    }
}

impl From<Vec<f16>> for Storage {
    fn from(data: Vec<f16>) -> Self {
        Storage::F16(data)
    }
}

impl From<Vec<f32>> for Storage {
    fn from(data: Vec<f32>) -> Self {
        Storage::F32(data)
    }
}

impl From<Vec<f64>> for Storage {
    fn from(data: Vec<f64>) -> Self {
        Storage::F64(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let s = Storage::from(vec![1.0f32, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.dtype(), DType::F32);
        assert_eq!(s.as_f32_slice().unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zeros_every_dtype() {
        for dtype in DType::ALL {
            let s = Storage::zeros(dtype, 4);
            assert_eq!(s.len(), 4);
            assert_eq!(s.dtype(), dtype);
        }
    }

    #[test]
    fn test_slice_dtype_mismatch() {
        let s = Storage::from(vec![1i64, 2]);
        assert_eq!(s.as_i64_slice().unwrap(), &[1, 2]);
        assert!(s.as_f64_slice().is_err());
        assert!(s.as_bool_slice().is_err());
    }

    #[test]
    fn test_empty() {
        let s = Storage::from(Vec::<i64>::new());
        assert!(s.is_empty());
        assert_eq!(s.dtype(), DType::I64);
    }
}
