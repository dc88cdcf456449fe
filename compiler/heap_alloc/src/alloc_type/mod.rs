//! Allocated type recovery.
//!
//! The allocation call itself returns `i8*`. The type the program actually
//! allocated lives in the destination type of the bitcast that consumes the
//! call, so recovery is only trustworthy when that bitcast is the call's
//! sole use:
//!
//! | Use list | Pointer type |
//! |---|---|
//! | exactly one use, a bitcast | the bitcast's destination type |
//! | no bitcast among the uses (including no uses) | the call's own `i8*` |
//! | a bitcast plus any other use | indeterminate |

use heap_ir::{TyIdx, ValueId};

use crate::{AllocAnalysis, ContractViolation};

impl AllocAnalysis<'_> {
    /// The pointer type an allocation call produces once its cast is taken
    /// into account. `Ok(None)` when the type is indeterminate.
    pub fn allocated_pointer_type(&self, call: ValueId) -> Result<Option<TyIdx>, ContractViolation> {
        self.expect_alloc_call(call)?;

        let module = self.module;
        let Some(cast) = self.first_bitcast_use(call) else {
            return Ok(module.ty(call));
        };

        if module.has_one_use(call) {
            Ok(module.ty(cast))
        } else {
            Ok(None)
        }
    }

    /// The element type an allocation call allocates: the pointee of
    /// [`allocated_pointer_type`](Self::allocated_pointer_type).
    pub fn allocated_element_type(&self, call: ValueId) -> Result<Option<TyIdx>, ContractViolation> {
        let Some(ptr_ty) = self.allocated_pointer_type(call)? else {
            return Ok(None);
        };
        match self.module.types().pointee(ptr_ty) {
            Some(elem) => Ok(Some(elem)),
            None => Err(ContractViolation::NonPointerType { call, ty: ptr_ty }),
        }
    }

    /// The bitcast that determines the call's type, when there is exactly
    /// one use and it is a bitcast.
    pub(crate) fn unique_cast(&self, call: ValueId) -> Option<ValueId> {
        let cast = self.first_bitcast_use(call)?;
        self.module.has_one_use(call).then_some(cast)
    }

    fn first_bitcast_use(&self, call: ValueId) -> Option<ValueId> {
        self.module
            .uses(call)
            .iter()
            .map(|u| u.user)
            .find(|&user| self.is_bitcast(user))
    }
}

#[cfg(test)]
mod tests;
