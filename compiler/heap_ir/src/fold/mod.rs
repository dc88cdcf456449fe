//! Constant folding.
//!
//! [`ConstFold`] is the query interface analyses consume: "evaluate this
//! constant to a literal, or tell me you can't". [`Folder`] is the
//! layout-aware implementation used by default.

use crate::constant::Constant;
use crate::layout::DataLayout;
use crate::ty::TypePool;

/// Constant-folding oracle.
pub trait ConstFold {
    /// Fold `constant` to an integer literal of the same type.
    ///
    /// Returns `None` when some input is not statically known (for example
    /// `sizeof` without a target layout).
    fn fold(
        &self,
        constant: &Constant,
        pool: &TypePool,
        layout: Option<&DataLayout>,
    ) -> Option<Constant>;
}

/// Default folder: evaluates integer constant expressions with wrapping
/// arithmetic at the width of the result type.
#[derive(Clone, Copy, Debug, Default)]
pub struct Folder;

impl ConstFold for Folder {
    fn fold(
        &self,
        constant: &Constant,
        pool: &TypePool,
        layout: Option<&DataLayout>,
    ) -> Option<Constant> {
        let value = evaluate(constant, pool, layout)?;
        Some(Constant::int(constant.ty(), value))
    }
}

fn evaluate(constant: &Constant, pool: &TypePool, layout: Option<&DataLayout>) -> Option<u64> {
    match constant {
        Constant::Int { ty, value } => Some(truncate(*value, pool.int_bits(*ty)?)),
        Constant::SizeOf(ty) => layout?.size_of(pool, *ty),
        Constant::Trunc { value, ty } => {
            Some(truncate(evaluate(value, pool, layout)?, pool.int_bits(*ty)?))
        }
        // Inputs are already masked to their (narrower) width.
        Constant::ZExt { value, .. } => evaluate(value, pool, layout),
        Constant::Mul(lhs, rhs) => {
            let bits = pool.int_bits(lhs.ty())?;
            let product = evaluate(lhs, pool, layout)?.wrapping_mul(evaluate(rhs, pool, layout)?);
            Some(truncate(product, bits))
        }
    }
}

/// Keep the low `bits` bits of `value`.
#[inline]
fn truncate(value: u64, bits: u32) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

#[cfg(test)]
mod tests;
