use crate::dtype::DType;
use crate::shape::Shape;
use crate::storage::Storage;

/// A plain numeric array, the host-side form literal arguments take when
/// they are embedded into the target format.
///
/// Unlike [`Tensor`](crate::Tensor) it has no device.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: Storage,
    shape: Shape,
}

impl Array {
    /// Build a rank-1 array holding `data`.
    pub fn from_vec(data: impl Into<Storage>) -> Self {
        let data = data.into();
        let shape = Shape::vector(data.len());
        Array { data, shape }
    }

    pub(crate) fn from_parts(data: Storage, shape: Shape) -> Self {
        Array { data, shape }
    }

    /// An empty rank-1 array of the given dtype.
    pub fn empty(dtype: DType) -> Self {
        Array {
            data: Storage::zeros(dtype, 0),
            shape: Shape::vector(0),
        }
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn data(&self) -> &Storage {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
