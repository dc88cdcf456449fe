//! Heap allocation site analysis.
//!
//! Lowering reduces `new T` / `new T[n]` to an untyped byte allocation:
//! a call to `malloc(size)` whose `i8*` result is bitcast to `T*`. This
//! crate recovers what that lowering erased, answering for any value of a
//! [`Module`]:
//!
//! - **Is it an allocation?** ([`AllocAnalysis::is_alloc`]): a call to the
//!   allocation symbol, or a bitcast of one.
//! - **What type does it allocate?**
//!   ([`AllocAnalysis::allocated_element_type`]): from the call's unique
//!   bitcast use, or the raw `i8` when it is never cast.
//! - **Is it an array?** ([`AllocAnalysis::is_array_alloc`]): from the
//!   shape of the size argument relative to `sizeof(T)`.
//! - **How many elements?** ([`AllocAnalysis::array_element_count`]).
//!
//! [`AllocAnalysis::sites`] runs all four questions over every allocation
//! call in a module and returns one [`AllocSite`] each.
//!
//! # Design
//!
//! Every query is a pure function of a borrowed `&Module`: nothing is
//! cached and nothing is written back to the graph. The allocation symbol
//! is resolved once, when the analysis is created, instead of by name on
//! every query. Answers that cannot be established are `None` / `false`;
//! calling an extractor on something that is not an allocation call is a
//! [`ContractViolation`].
//!
//! Query chain: classify → unwrap cast → recover type → match array
//! pattern → extract count. Each query costs one scan of one value's use
//! list at most.

mod alloc_type;
mod array;
mod array_size;
mod classify;
mod error;
mod survey;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

use heap_ir::{ConstFold, DataLayout, Folder, Module, ValueId};

pub use array_size::ArraySize;
pub use error::ContractViolation;
pub use survey::AllocSite;

/// Name of the allocation function recognized by [`AllocAnalysis::new`].
pub const ALLOC_SYMBOL: &str = heap_ir::MALLOC;

/// Allocation site queries over one module.
///
/// Holds only borrowed state: the module, the resolved allocation symbol,
/// the layout used to fold `sizeof`, and the folding oracle.
#[derive(Clone, Copy)]
pub struct AllocAnalysis<'m> {
    module: &'m Module,
    alloc_fn: Option<ValueId>,
    layout: Option<&'m DataLayout>,
    folder: &'m (dyn ConstFold + Sync),
}

impl<'m> AllocAnalysis<'m> {
    /// Create an analysis for `module`, resolving [`ALLOC_SYMBOL`] in its
    /// symbol table and folding with the module's own layout.
    ///
    /// If the module never declares the allocation function, no value is
    /// recognized as an allocation.
    pub fn new(module: &'m Module) -> Self {
        Self::with_symbol(module, module.function(ALLOC_SYMBOL))
    }

    /// Create an analysis with an already-resolved allocation symbol.
    pub fn with_symbol(module: &'m Module, alloc_fn: Option<ValueId>) -> Self {
        Self {
            module,
            alloc_fn,
            layout: module.layout(),
            folder: &Folder,
        }
    }

    /// Fold `sizeof` with `layout` instead of the module's layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Option<&'m DataLayout>) -> Self {
        self.layout = layout;
        self
    }

    /// Use `folder` as the constant-folding oracle.
    #[must_use]
    pub fn with_folder(mut self, folder: &'m (dyn ConstFold + Sync)) -> Self {
        self.folder = folder;
        self
    }

    pub fn module(&self) -> &'m Module {
        self.module
    }

    /// The allocation symbol this analysis recognizes calls to.
    pub fn alloc_symbol(&self) -> Option<ValueId> {
        self.alloc_fn
    }

    fn fold(&self, constant: &heap_ir::Constant) -> Option<heap_ir::Constant> {
        self.folder.fold(constant, self.module.types(), self.layout)
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a `RUST_LOG`-filtered subscriber for the survey's events.
///
/// Does nothing when `RUST_LOG` is unset or unparsable, or when the host
/// already installed a global subscriber. Repeated calls are no-ops.
/// Site summaries log at `RUST_LOG=heap_alloc=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        // A host subscriber takes precedence.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).without_time())
            .with(filter)
            .try_init();
    });
}
