//! Whole-module allocation survey.
//!
//! Walks the use list of the allocation symbol and runs the full query
//! chain on every call, producing one [`AllocSite`] per call. Consumers
//! that want every allocation in a module (escape analysis, heap-to-stack
//! promotion) use this instead of scanning every value themselves.

use heap_ir::{TyIdx, ValueId};
use tracing::{debug, trace};

use crate::{AllocAnalysis, ArraySize};

/// Everything the analysis knows about one allocation call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocSite {
    /// The call to the allocation symbol.
    pub call: ValueId,
    /// The call's unique bitcast use, when it has one.
    pub cast: Option<ValueId>,
    /// Allocated pointer type; `None` when indeterminate.
    pub pointer_ty: Option<TyIdx>,
    /// Allocated element type; `None` when indeterminate or not a pointer.
    pub element_ty: Option<TyIdx>,
    pub is_array: bool,
    /// Element count; `None` when the size argument is malformed.
    pub count: Option<ArraySize>,
}

impl AllocSite {
    /// True when the element type could be recovered.
    pub fn is_typed(&self) -> bool {
        self.element_ty.is_some()
    }
}

impl AllocAnalysis<'_> {
    /// Every allocation call in the module, in use-list order.
    ///
    /// Only uses of the symbol as a callee count; passing `malloc` itself
    /// as an argument is not an allocation.
    pub fn sites(&self) -> Vec<AllocSite> {
        let Some(alloc_fn) = self.alloc_fn else {
            debug!(module = self.module.name(), "no allocation symbol");
            return Vec::new();
        };

        let sites: Vec<AllocSite> = self
            .module
            .uses(alloc_fn)
            .iter()
            .filter(|u| u.operand == 0)
            .filter_map(|u| self.site(u.user))
            .collect();

        debug!(
            module = self.module.name(),
            sites = sites.len(),
            arrays = sites.iter().filter(|s| s.is_array).count(),
            "surveyed allocation sites"
        );
        sites
    }

    /// Describe the allocation `v`, which may be the call or its bitcast.
    /// `None` if `v` is not an allocation.
    pub fn site(&self, v: ValueId) -> Option<AllocSite> {
        let call = self
            .extract_alloc_call(v)
            .or_else(|| self.extract_alloc_call_from_cast(v))?;

        let pointer_ty = self.allocated_pointer_type(call).ok().flatten();
        let element_ty = match self.allocated_element_type(call) {
            Ok(ty) => ty,
            Err(err) => {
                debug!(%call, %err, "element type unavailable");
                None
            }
        };
        let is_array = self.is_array_alloc(call);
        let count = match self.array_element_count(call) {
            Ok(count) => Some(count),
            Err(err) => {
                debug!(%call, %err, "element count unavailable");
                None
            }
        };

        trace!(%call, ?pointer_ty, ?element_ty, is_array, ?count, "allocation site");
        Some(AllocSite {
            call,
            cast: self.unique_cast(call),
            pointer_ty,
            element_ty,
            is_array,
            count,
        })
    }
}
