use pretty_assertions::assert_eq;

use heap_ir::{CastOp, TyIdx};

use crate::test_helpers::{alloc_as, call_alloc, cast_to, malloc_module, size_of};

use super::*;

// ── Use-list shapes ─────────────────────────────────────────────

#[test]
fn single_bitcast_use_gives_cast_type() {
    let (mut module, malloc) = malloc_module();
    let size = size_of(&mut module, TyIdx::I32);
    let (call, cast) = alloc_as(&mut module, malloc, size, TyIdx::I32);
    let i32_ptr = module.types_mut().pointer(TyIdx::I32);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(Some(i32_ptr)));
    assert_eq!(analysis.allocated_element_type(call), Ok(Some(TyIdx::I32)));
    assert_eq!(analysis.unique_cast(call), Some(cast));
}

#[test]
fn no_uses_gives_raw_byte_pointer() {
    let (mut module, malloc) = malloc_module();
    let size = module.const_int(TyIdx::I64, 16);
    let call = call_alloc(&mut module, malloc, size);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(Some(TyIdx::I8_PTR)));
    assert_eq!(analysis.allocated_element_type(call), Ok(Some(TyIdx::I8)));
    assert_eq!(analysis.unique_cast(call), None);
}

#[test]
fn uses_without_bitcast_give_raw_byte_pointer() {
    let (mut module, malloc) = malloc_module();
    let size = module.const_int(TyIdx::I64, 16);
    let call = call_alloc(&mut module, malloc, size);
    let slot = module.argument(0, TyIdx::I8_PTR);
    module.store(call, slot);
    module.cast(CastOp::PtrToInt, call, TyIdx::I64);
    module.ret(Some(call));
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(Some(TyIdx::I8_PTR)));
    assert_eq!(analysis.allocated_element_type(call), Ok(Some(TyIdx::I8)));
}

#[test]
fn bitcast_plus_other_use_is_indeterminate() {
    let (mut module, malloc) = malloc_module();
    let size = size_of(&mut module, TyIdx::I32);
    let (call, _) = alloc_as(&mut module, malloc, size, TyIdx::I32);
    module.ret(Some(call));
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(None));
    assert_eq!(analysis.allocated_element_type(call), Ok(None));
    assert_eq!(analysis.unique_cast(call), None);
}

#[test]
fn other_use_before_bitcast_is_indeterminate() {
    let (mut module, malloc) = malloc_module();
    let size = size_of(&mut module, TyIdx::I32);
    let call = call_alloc(&mut module, malloc, size);
    module.ret(Some(call));
    cast_to(&mut module, call, TyIdx::I32);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(None));
}

#[test]
fn two_bitcasts_are_indeterminate() {
    let (mut module, malloc) = malloc_module();
    let size = size_of(&mut module, TyIdx::I32);
    let call = call_alloc(&mut module, malloc, size);
    cast_to(&mut module, call, TyIdx::I32);
    cast_to(&mut module, call, TyIdx::F32);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(None));
}

#[test]
fn struct_element_type_is_recovered() {
    let (mut module, malloc) = malloc_module();
    let pair = module.types_mut().structure(&[TyIdx::I8, TyIdx::I64]);
    let size = size_of(&mut module, pair);
    let (call, _) = alloc_as(&mut module, malloc, size, pair);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_element_type(call), Ok(Some(pair)));
}

// ── Contract ────────────────────────────────────────────────────

#[test]
fn cast_is_not_accepted_in_place_of_the_call() {
    let (mut module, malloc) = malloc_module();
    let size = size_of(&mut module, TyIdx::I32);
    let (_, cast) = alloc_as(&mut module, malloc, size, TyIdx::I32);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(
        analysis.allocated_pointer_type(cast),
        Err(ContractViolation::NotAllocationCall { value: cast })
    );
    assert_eq!(
        analysis.allocated_element_type(cast),
        Err(ContractViolation::NotAllocationCall { value: cast })
    );
}

#[test]
fn bitcast_to_non_pointer_is_a_contract_violation() {
    let (mut module, malloc) = malloc_module();
    let size = module.const_int(TyIdx::I64, 8);
    let call = call_alloc(&mut module, malloc, size);
    module.bitcast(call, TyIdx::I64);
    let analysis = AllocAnalysis::new(&module);

    assert_eq!(analysis.allocated_pointer_type(call), Ok(Some(TyIdx::I64)));
    assert_eq!(
        analysis.allocated_element_type(call),
        Err(ContractViolation::NonPointerType {
            call,
            ty: TyIdx::I64,
        })
    );
}
