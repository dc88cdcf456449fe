//! Canonical heap allocation emission.
//!
//! Lowering turns `new T` and `new T[n]` into a call to the byte allocator
//! followed by a bitcast of its `i8*` result to `T*`. The element type and
//! element count survive only in the shape of the size argument:
//!
//! | Source | Size argument |
//! |---|---|
//! | `new T` (or count constant `1`) | `sizeof(T)` |
//! | `new T[n]`, `n` constant | constant `n * sizeof(T)` |
//! | `new T[n]`, `n` runtime | `mul n, sizeof(T)` instruction |
//!
//! `sizeof(T)` and the count are coerced to the allocator's size type in
//! every case; a runtime count of another width gets a `trunc` or `zext`.

use crate::constant::Constant;
use crate::ty::TyIdx;
use crate::value::{CastOp, ValueId};

use super::Module;

/// Name of the byte allocation function.
pub const MALLOC: &str = "malloc";

/// Values produced by [`Module::build_alloc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltAlloc {
    /// The allocation call.
    pub call: ValueId,
    /// The size argument passed to the call.
    pub size: ValueId,
    /// The bitcast to `elem*`; absent when `elem` is `i8`.
    pub cast: Option<ValueId>,
}

impl Module {
    /// Emit an allocation of `count` elements of type `elem` (one element
    /// when `count` is `None`), declaring `malloc` with size type `size_ty`
    /// if the module does not already declare it.
    pub fn build_alloc(&mut self, elem: TyIdx, size_ty: TyIdx, count: Option<ValueId>) -> BuiltAlloc {
        let elem_size = Constant::size_of(elem).coerce_int(size_ty, self.types());

        let size = match count {
            None => self.constant(elem_size),
            Some(count) => match self.as_constant(count).cloned() {
                Some(c) if c.is_one() => self.constant(elem_size),
                Some(c) => {
                    let c = c.coerce_int(size_ty, self.types());
                    self.constant(Constant::mul(c, elem_size))
                }
                None => {
                    let count = self.coerce_count(count, size_ty);
                    let elem_size = self.constant(elem_size);
                    self.mul(count, elem_size)
                }
            },
        };

        let malloc_ty = self.types_mut().function(&[size_ty], TyIdx::I8_PTR);
        let malloc = self.declare_function(MALLOC, malloc_ty);
        let call = self.call(malloc, &[size]);

        let elem_ptr = self.types_mut().pointer(elem);
        let cast = (elem_ptr != TyIdx::I8_PTR).then(|| self.bitcast(call, elem_ptr));

        BuiltAlloc { call, size, cast }
    }

    /// `trunc` or `zext` a runtime count to `size_ty`; unchanged when the
    /// widths already agree or either width is unknown.
    fn coerce_count(&mut self, count: ValueId, size_ty: TyIdx) -> ValueId {
        let from = self.ty(count).and_then(|ty| self.types().int_bits(ty));
        let to = self.types().int_bits(size_ty);
        match (from, to) {
            (Some(from), Some(to)) if from > to => self.cast(CastOp::Trunc, count, size_ty),
            (Some(from), Some(to)) if from < to => self.cast(CastOp::ZExt, count, size_ty),
            _ => count,
        }
    }
}
