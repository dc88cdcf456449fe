//! Constant values and constant expressions.
//!
//! Constants are compared structurally: two constants are "the same
//! constant" exactly when they are equal as trees. The module uniques
//! constant nodes, so a constant built twice maps to one graph value, and a
//! constant computed by an analysis can be matched against a graph operand
//! without ever entering the graph.

use crate::ty::{TyIdx, TypePool};

/// An integer constant or a constant expression over integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Constant {
    /// Integer literal. `value` holds the raw bits, zero-extended.
    Int { ty: TyIdx, value: u64 },
    /// Allocation size of a type. Always typed `i64`; folds only when a
    /// target layout is known.
    SizeOf(TyIdx),
    /// Truncation to a narrower integer type.
    Trunc { value: Box<Constant>, ty: TyIdx },
    /// Zero extension to a wider integer type.
    ZExt { value: Box<Constant>, ty: TyIdx },
    /// Product of two constants of the same type.
    Mul(Box<Constant>, Box<Constant>),
}

impl Constant {
    /// Integer literal of type `ty`.
    pub fn int(ty: TyIdx, value: u64) -> Self {
        Constant::Int { ty, value }
    }

    /// `sizeof(ty)` as an `i64` constant expression.
    pub fn size_of(ty: TyIdx) -> Self {
        Constant::SizeOf(ty)
    }

    /// `lhs * rhs` as a constant expression.
    pub fn mul(lhs: Constant, rhs: Constant) -> Self {
        Constant::Mul(Box::new(lhs), Box::new(rhs))
    }

    /// The integer type of this constant.
    pub fn ty(&self) -> TyIdx {
        match self {
            Constant::Int { ty, .. } | Constant::Trunc { ty, .. } | Constant::ZExt { ty, .. } => {
                *ty
            }
            Constant::SizeOf(_) => TyIdx::I64,
            Constant::Mul(lhs, _) => lhs.ty(),
        }
    }

    /// The literal value, if this is an integer literal.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Constant::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// True only for the integer literal `1`.
    pub fn is_one(&self) -> bool {
        self.as_int() == Some(1)
    }

    /// True for constant expressions (anything but a literal).
    pub fn is_expr(&self) -> bool {
        !matches!(self, Constant::Int { .. })
    }

    /// Coerce an integer constant to `ty`: unchanged when the widths match,
    /// truncated when `ty` is narrower, zero-extended when it is wider.
    ///
    /// Constants whose width or target width is unknown are returned
    /// unchanged.
    #[must_use]
    pub fn coerce_int(self, ty: TyIdx, pool: &TypePool) -> Self {
        let (Some(from), Some(to)) = (pool.int_bits(self.ty()), pool.int_bits(ty)) else {
            return self;
        };
        match from.cmp(&to) {
            std::cmp::Ordering::Equal => self,
            std::cmp::Ordering::Greater => Constant::Trunc {
                value: Box::new(self),
                ty,
            },
            std::cmp::Ordering::Less => Constant::ZExt {
                value: Box::new(self),
                ty,
            },
        }
    }
}

#[cfg(test)]
mod tests;
