//! Marshaling of literal operator arguments for the target format.

use fx_tensor::{Array, DType};

use crate::error::{ExportError, Result};
use crate::literal::{KwArgs, Literal, LiteralKind};

/// ONNX `TensorProto.DataType` code for a framework dtype.
pub fn onnx_type_code(dtype: DType) -> i64 {
    match dtype {
        DType::F32 => 1,
        DType::U8 => 2,
        DType::I8 => 3,
        DType::I16 => 5,
        DType::I32 => 6,
        DType::I64 => 7,
        DType::Bool => 9,
        DType::F16 => 10,
        DType::F64 => 11,
        DType::C64 => 14,
        DType::C128 => 15,
        DType::BF16 => 16,
    }
}

/// Convert a literal argument into the form embedded in the target graph.
///
/// Tensors become plain arrays of the same dtype and shape. Homogeneous bool,
/// int and float sequences become bool, i64 and f64 arrays; an empty
/// sequence becomes an empty i64 array. Tensor sequences are converted
/// element-wise. Everything else is returned unchanged.
pub fn convert_value(value: Literal) -> Literal {
    match (value.kind(), value) {
        (LiteralKind::TensorLike, Literal::Tensor(tensor)) => Literal::Array(tensor.to_array()),
        (LiteralKind::EmptySequence, _) => Literal::Array(Array::empty(DType::I64)),
        (LiteralKind::BoolSequence, Literal::Sequence(items)) => {
            let data: Vec<bool> = items
                .into_iter()
                .filter_map(|item| match item {
                    Literal::Bool(b) => Some(b),
                    _ => None,
                })
                .collect();
            Literal::Array(Array::from_vec(data))
        }
        (LiteralKind::IntSequence, Literal::Sequence(items)) => {
            let data: Vec<i64> = items
                .into_iter()
                .filter_map(|item| match item {
                    Literal::Int(i) => Some(i),
                    _ => None,
                })
                .collect();
            Literal::Array(Array::from_vec(data))
        }
        (LiteralKind::FloatSequence, Literal::Sequence(items)) => {
            let data: Vec<f64> = items
                .into_iter()
                .filter_map(|item| match item {
                    Literal::Float(f) => Some(f),
                    _ => None,
                })
                .collect();
            Literal::Array(Array::from_vec(data))
        }
        (LiteralKind::TensorSequence, Literal::Sequence(items)) => {
            Literal::Sequence(items.into_iter().map(convert_value).collect())
        }
        (_, other) => other,
    }
}

/// Convert keyword arguments for the target format.
///
/// `device` is dropped and `dtype` is replaced by its ONNX type code; other
/// entries are kept as-is.
///
/// # Errors
/// Returns `UnmappedDataType` if the `dtype` entry is not a framework dtype.
pub fn convert_kwargs(kwargs: KwArgs) -> Result<KwArgs> {
    let mut converted = KwArgs::with_capacity(kwargs.len());
    for (key, value) in kwargs {
        match key.as_str() {
            "device" => continue,
            "dtype" => {
                let code = match value {
                    Literal::DType(dtype) => onnx_type_code(dtype),
                    other => return Err(ExportError::UnmappedDataType(format!("{:?}", other))),
                };
                converted.insert(key, Literal::Int(code));
            }
            _ => {
                converted.insert(key, value);
            }
        }
    }
    Ok(converted)
}
