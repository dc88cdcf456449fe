//! Contract violations.
//!
//! Extractors require the caller to have recognized the value as an
//! allocation call first. Breaking that contract, or handing in IR whose
//! size argument departs from the canonical encoding after recognition
//! accepted it, is reported here. Indeterminate answers are not errors.

use heap_ir::{TyIdx, ValueId};

/// A caller broke an extractor's precondition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    /// The value is not a call to the allocation symbol.
    #[error("{value} is not a call to the allocation function")]
    NotAllocationCall { value: ValueId },
    /// The allocation call passes no size argument.
    #[error("allocation call {call} has no size argument")]
    MissingSizeArgument { call: ValueId },
    /// The type recovered for the call is not a pointer type.
    #[error("allocation call {call} produces non-pointer type {ty:?}")]
    NonPointerType { call: ValueId, ty: TyIdx },
    /// An array-classified call whose constant size carries no extractable
    /// element count.
    #[error("size argument of array allocation {call} does not encode an element count")]
    MalformedSizeArgument { call: ValueId },
}
