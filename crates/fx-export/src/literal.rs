use std::collections::HashMap;

use fx_tensor::{Array, DType, Device, Tensor};

/// Keyword arguments of an operator invocation.
pub type KwArgs = HashMap<String, Literal>;

/// A literal (non-graph) argument of an operator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DType(DType),
    Device(Device),
    Tensor(Tensor),
    Array(Array),
    Sequence(Vec<Literal>),
}

/// How a literal is marshaled for the target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    TensorLike,
    EmptySequence,
    BoolSequence,
    IntSequence,
    FloatSequence,
    TensorSequence,
    /// Anything else, including sequences of mixed element types.
    Opaque,
}

impl Literal {
    /// Classify this literal.
    ///
    /// A sequence is typed by its first element and must be homogeneous;
    /// `Bool` is checked before `Int`.
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Tensor(_) => LiteralKind::TensorLike,
            Literal::Sequence(items) => match items.first() {
                None => LiteralKind::EmptySequence,
                Some(Literal::Bool(_)) if items.iter().all(|i| matches!(i, Literal::Bool(_))) => {
                    LiteralKind::BoolSequence
                }
                Some(Literal::Int(_)) if items.iter().all(|i| matches!(i, Literal::Int(_))) => {
                    LiteralKind::IntSequence
                }
                Some(Literal::Float(_)) if items.iter().all(|i| matches!(i, Literal::Float(_))) => {
                    LiteralKind::FloatSequence
                }
                Some(Literal::Tensor(_))
                    if items.iter().all(|i| matches!(i, Literal::Tensor(_))) =>
                {
                    LiteralKind::TensorSequence
                }
                _ => LiteralKind::Opaque,
            },
            _ => LiteralKind::Opaque,
        }
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Str(v.to_string())
    }
}

impl From<DType> for Literal {
    fn from(v: DType) -> Self {
        Literal::DType(v)
    }
}

impl From<Tensor> for Literal {
    fn from(v: Tensor) -> Self {
        Literal::Tensor(v)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(items: Vec<T>) -> Self {
        Literal::Sequence(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_tensor::Shape;

    #[test]
    fn test_sequence_kinds() {
        assert_eq!(Literal::Sequence(vec![]).kind(), LiteralKind::EmptySequence);
        assert_eq!(Literal::from(vec![true, false]).kind(), LiteralKind::BoolSequence);
        assert_eq!(Literal::from(vec![1i64, 2]).kind(), LiteralKind::IntSequence);
        assert_eq!(Literal::from(vec![1.0, 2.5]).kind(), LiteralKind::FloatSequence);
    }

    #[test]
    fn test_mixed_sequence_is_opaque() {
        let mixed = Literal::Sequence(vec![Literal::Int(1), Literal::Float(2.0)]);
        assert_eq!(mixed.kind(), LiteralKind::Opaque);
        let strings = Literal::from(vec!["a", "b"]);
        assert_eq!(strings.kind(), LiteralKind::Opaque);
    }

    #[test]
    fn test_tensor_kinds() {
        let t = Tensor::zeros(DType::F32, Shape::vector(2));
        assert_eq!(Literal::from(t.clone()).kind(), LiteralKind::TensorLike);
        assert_eq!(Literal::from(vec![t.clone(), t]).kind(), LiteralKind::TensorSequence);
    }

    #[test]
    fn test_scalars_are_opaque() {
        assert_eq!(Literal::Int(3).kind(), LiteralKind::Opaque);
        assert_eq!(Literal::None.kind(), LiteralKind::Opaque);
    }
}
