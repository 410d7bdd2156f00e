use std::fmt;

use crate::array::Array;
use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::storage::Storage;

/// Device a framework tensor lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Cpu,
    Cuda(usize),
    Mps,
    /// Shape-only placeholder device used during tracing.
    Meta,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(index) => write!(f, "cuda:{}", index),
            Device::Mps => write!(f, "mps"),
            Device::Meta => write!(f, "meta"),
        }
    }
}

/// A tensor-like value captured from the source framework.
///
/// Holds contiguous, row-major data with an associated shape and the device
/// the framework placed it on. The dtype is carried by the storage variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: Storage,
    shape: Shape,
    device: Device,
}

impl Tensor {
    /// Create a CPU tensor from storage and a shape.
    ///
    /// # Errors
    /// Returns an error if the element count does not match the shape.
    pub fn new(storage: impl Into<Storage>, shape: Shape) -> Result<Self> {
        let storage = storage.into();
        if storage.len() != shape.numel() {
            return Err(TensorError::ElementCountMismatch {
                len: storage.len(),
                shape: shape.dims().to_vec(),
                numel: shape.numel(),
            });
        }
        Ok(Tensor {
            storage,
            shape,
            device: Device::Cpu,
        })
    }

    /// Create a zero-filled CPU tensor with the given dtype and shape.
    pub fn zeros(dtype: DType, shape: Shape) -> Self {
        Tensor {
            storage: Storage::zeros(dtype, shape.numel()),
            shape,
            device: Device::Cpu,
        }
    }

    /// Returns the same tensor tagged with another device.
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the underlying storage reference.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Detach the data into a plain host array.
    ///
    /// Element type and shape are preserved; the device is dropped.
    pub fn to_array(&self) -> Array {
        Array::from_parts(self.storage.clone(), self.shape.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tensor() {
        let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::new(vec![2, 3])).unwrap();
        assert_eq!(t.shape().dims(), &[2, 3]);
        assert_eq!(t.dtype(), DType::F32);
        assert_eq!(t.device(), Device::Cpu);
        assert_eq!(t.storage().as_f32_slice().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_new_shape_mismatch() {
        let err = Tensor::new(vec![1i64, 2], Shape::vector(3)).unwrap_err();
        assert!(matches!(err, TensorError::ElementCountMismatch { len: 2, numel: 3, .. }));
    }

    #[test]
    fn test_zeros() {
        let z = Tensor::zeros(DType::I64, Shape::new(vec![2, 2]));
        assert_eq!(z.storage().as_i64_slice().unwrap(), &[0; 4]);
    }

    #[test]
    fn test_to_array_drops_device() {
        let t = Tensor::new(vec![true, false], Shape::vector(2))
            .unwrap()
            .to_device(Device::Cuda(1));
        assert_eq!(t.device().to_string(), "cuda:1");

        let a = t.to_array();
        assert_eq!(a.dtype(), DType::Bool);
        assert_eq!(a.shape(), t.shape());
        assert_eq!(a.data().as_bool_slice().unwrap(), &[true, false]);
    }
}
