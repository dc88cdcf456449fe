//! Allocation call recognition and cast unwrapping.
//!
//! A value is an allocation call when it is a call whose callee is the
//! resolved allocation symbol. A bitcast of such a call is the one wrapper
//! that is looked through; nothing else is.

use heap_ir::{CastOp, ValueId, ValueKind};

use crate::{AllocAnalysis, ContractViolation};

impl AllocAnalysis<'_> {
    /// True iff `v` is a call to the allocation symbol.
    ///
    /// False for any other callee, for values this module does not own, and
    /// for every value when the module has no allocation symbol.
    pub fn is_alloc_call(&self, v: ValueId) -> bool {
        let Some(alloc_fn) = self.alloc_fn else {
            return false;
        };
        matches!(
            self.module.kind(v),
            Some(ValueKind::Call { callee, .. }) if *callee == alloc_fn
        )
    }

    /// True iff `v` is an allocation call or a bitcast of one.
    pub fn is_alloc(&self, v: ValueId) -> bool {
        self.is_alloc_call(v) || self.extract_alloc_call_from_cast(v).is_some()
    }

    /// `v` itself if it is an allocation call. Does not look through casts.
    pub fn extract_alloc_call(&self, v: ValueId) -> Option<ValueId> {
        self.is_alloc_call(v).then_some(v)
    }

    /// The allocation call under `v`, if `v` is a bitcast whose operand is
    /// an allocation call.
    pub fn extract_alloc_call_from_cast(&self, v: ValueId) -> Option<ValueId> {
        match self.module.kind(v)? {
            ValueKind::Cast {
                op: CastOp::BitCast,
                operand,
            } if self.is_alloc_call(*operand) => Some(*operand),
            _ => None,
        }
    }

    /// True if `v` is a bitcast (of anything).
    pub(crate) fn is_bitcast(&self, v: ValueId) -> bool {
        matches!(
            self.module.kind(v),
            Some(ValueKind::Cast {
                op: CastOp::BitCast,
                ..
            })
        )
    }

    /// Precondition check shared by the extractors.
    pub(crate) fn expect_alloc_call(&self, v: ValueId) -> Result<(), ContractViolation> {
        if self.is_alloc_call(v) {
            Ok(())
        } else {
            Err(ContractViolation::NotAllocationCall { value: v })
        }
    }

    /// The size argument of an allocation call.
    pub(crate) fn size_argument(&self, call: ValueId) -> Result<ValueId, ContractViolation> {
        match self.module.kind(call) {
            Some(ValueKind::Call { args, .. }) => args
                .first()
                .copied()
                .ok_or(ContractViolation::MissingSizeArgument { call }),
            _ => Err(ContractViolation::NotAllocationCall { value: call }),
        }
    }
}
