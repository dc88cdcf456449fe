//! Array element count extraction.
//!
//! Undoes the size computation the array pattern matched:
//!
//! - not an array → constant `1` at the size argument's width;
//! - element size folds to `1` → the size argument is the count;
//! - constant size → the count embedded in the constant;
//! - `count * element_size` → `count`.

use heap_ir::{Constant, Module, TyIdx, ValueId};

use crate::array::{ElementSize, SizeShape};
use crate::{AllocAnalysis, ContractViolation};

/// An element count: either an existing value of the graph, or a constant
/// computed by the analysis. Always typed like the call's size argument.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ArraySize {
    /// A value already present in the module.
    Value(ValueId),
    /// A constant that need not exist in the module.
    Constant(Constant),
}

impl ArraySize {
    /// The integer type of the count.
    pub fn ty(&self, module: &Module) -> Option<TyIdx> {
        match self {
            ArraySize::Value(v) => module.ty(*v),
            ArraySize::Constant(c) => Some(c.ty()),
        }
    }

    pub fn as_value(&self) -> Option<ValueId> {
        match self {
            ArraySize::Value(v) => Some(*v),
            ArraySize::Constant(_) => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            ArraySize::Value(_) => None,
            ArraySize::Constant(c) => Some(c),
        }
    }

    /// True for the "one object" answer given to non-array allocations.
    pub fn is_one(&self) -> bool {
        self.as_constant().is_some_and(Constant::is_one)
    }
}

impl AllocAnalysis<'_> {
    /// Number of elements an allocation call allocates.
    ///
    /// Non-array allocations answer constant `1`, whatever their size
    /// argument. Requires an allocation call; an array-classified constant
    /// size that carries no count is reported as malformed.
    pub fn array_element_count(&self, call: ValueId) -> Result<ArraySize, ContractViolation> {
        self.expect_alloc_call(call)?;
        let size = self.size_argument(call)?;

        let Some(matched) = self.match_array(call) else {
            let size_ty = self.module.ty(size).unwrap_or(TyIdx::NONE);
            return Ok(ArraySize::Constant(Constant::int(size_ty, 1)));
        };

        // Byte-sized elements: the byte count is the element count.
        if matched.elem_size.is_one() {
            return Ok(ArraySize::Value(matched.size));
        }

        match matched.shape {
            SizeShape::Mul { count } => Ok(ArraySize::Value(count)),
            SizeShape::Constant(c) => self.constant_count(call, c, &matched.elem_size),
        }
    }

    /// Count embedded in a constant size: the left operand of a constant
    /// `count * element_size`, or a literal divided by the folded element
    /// size when it divides evenly.
    fn constant_count(
        &self,
        call: ValueId,
        size: &Constant,
        elem_size: &ElementSize,
    ) -> Result<ArraySize, ContractViolation> {
        if let Constant::Mul(count, scale) = size {
            if self.same_constant(scale, elem_size) {
                return Ok(ArraySize::Constant((**count).clone()));
            }
        }

        let total = self.fold(size).as_ref().and_then(Constant::as_int);
        match (total, elem_size.folded_value()) {
            (Some(total), Some(unit)) if unit != 0 && total % unit == 0 => {
                Ok(ArraySize::Constant(Constant::int(size.ty(), total / unit)))
            }
            _ => Err(ContractViolation::MalformedSizeArgument { call }),
        }
    }
}
