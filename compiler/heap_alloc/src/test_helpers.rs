//! Shared test utilities for allocation analysis.
//!
//! Builds small modules by hand so each test controls the exact shape of
//! the size argument and the use list. Only compiled in test builds.

use heap_ir::{DataLayout, Module, TyIdx, ValueId, MALLOC};

/// Module with the default 64-bit layout and `i8* malloc(i64)` declared.
pub(crate) fn malloc_module() -> (Module, ValueId) {
    crate::init_tracing();
    let mut module = Module::new("test").with_layout(DataLayout::default());
    let malloc = declare_malloc(&mut module, TyIdx::I64);
    (module, malloc)
}

/// Same as [`malloc_module`] but without a target layout, so `sizeof`
/// never folds.
pub(crate) fn malloc_module_without_layout() -> (Module, ValueId) {
    let mut module = Module::new("test");
    let malloc = declare_malloc(&mut module, TyIdx::I64);
    (module, malloc)
}

/// Declare `i8* malloc(size_ty)`.
pub(crate) fn declare_malloc(module: &mut Module, size_ty: TyIdx) -> ValueId {
    let ty = module.types_mut().function(&[size_ty], TyIdx::I8_PTR);
    module.declare_function(MALLOC, ty)
}

/// `call malloc(size)`.
pub(crate) fn call_alloc(module: &mut Module, malloc: ValueId, size: ValueId) -> ValueId {
    module.call(malloc, &[size])
}

/// `bitcast value to elem*`.
pub(crate) fn cast_to(module: &mut Module, value: ValueId, elem: TyIdx) -> ValueId {
    let ptr = module.types_mut().pointer(elem);
    module.bitcast(value, ptr)
}

/// `call malloc(size)` followed by a single bitcast to `elem*`.
pub(crate) fn alloc_as(
    module: &mut Module,
    malloc: ValueId,
    size: ValueId,
    elem: TyIdx,
) -> (ValueId, ValueId) {
    let call = call_alloc(module, malloc, size);
    let cast = cast_to(module, call, elem);
    (call, cast)
}

/// `sizeof(elem)` as a constant node of type `i64`.
pub(crate) fn size_of(module: &mut Module, elem: TyIdx) -> ValueId {
    module.constant(heap_ir::Constant::size_of(elem))
}
