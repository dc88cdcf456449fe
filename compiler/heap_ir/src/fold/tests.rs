use pretty_assertions::assert_eq;

use crate::ty::TyIdx;

use super::*;

fn fold(c: &Constant, pool: &TypePool, layout: Option<&DataLayout>) -> Option<Constant> {
    Folder.fold(c, pool, layout)
}

#[test]
fn literal_folds_to_itself() {
    let pool = TypePool::new();
    let c = Constant::int(TyIdx::I32, 4);

    assert_eq!(fold(&c, &pool, None), Some(c));
}

#[test]
fn literal_is_masked_to_its_width() {
    let pool = TypePool::new();

    assert_eq!(
        fold(&Constant::int(TyIdx::I8, 0x1ff), &pool, None),
        Some(Constant::int(TyIdx::I8, 0xff))
    );
}

#[test]
fn size_of_needs_a_layout() {
    let pool = TypePool::new();
    let layout = DataLayout::default();
    let c = Constant::size_of(TyIdx::I32);

    assert_eq!(fold(&c, &pool, None), None);
    assert_eq!(
        fold(&c, &pool, Some(&layout)),
        Some(Constant::int(TyIdx::I64, 4))
    );
}

#[test]
fn size_of_unsized_type_does_not_fold() {
    let pool = TypePool::new();
    let layout = DataLayout::default();

    assert_eq!(
        fold(&Constant::size_of(TyIdx::VOID), &pool, Some(&layout)),
        None
    );
}

#[test]
fn trunc_and_zext_change_the_type() {
    let mut pool = TypePool::new();
    let layout = DataLayout::default();
    let i128 = pool.int(128);

    let narrowed = Constant::size_of(TyIdx::F64).coerce_int(TyIdx::I32, &pool);
    assert_eq!(
        fold(&narrowed, &pool, Some(&layout)),
        Some(Constant::int(TyIdx::I32, 8))
    );

    let widened = Constant::int(TyIdx::I32, 7).coerce_int(i128, &pool);
    assert_eq!(fold(&widened, &pool, None), Some(Constant::int(i128, 7)));
}

#[test]
fn trunc_drops_high_bits() {
    let pool = TypePool::new();
    let c = Constant::Trunc {
        value: Box::new(Constant::int(TyIdx::I64, 0x1_0000_0004)),
        ty: TyIdx::I32,
    };

    assert_eq!(fold(&c, &pool, None), Some(Constant::int(TyIdx::I32, 4)));
}

#[test]
fn mul_folds_with_wrapping() {
    let pool = TypePool::new();
    let layout = DataLayout::default();

    let count_times_size = Constant::mul(
        Constant::int(TyIdx::I64, 10),
        Constant::size_of(TyIdx::I32),
    );
    assert_eq!(
        fold(&count_times_size, &pool, Some(&layout)),
        Some(Constant::int(TyIdx::I64, 40))
    );

    let overflow = Constant::mul(Constant::int(TyIdx::I8, 16), Constant::int(TyIdx::I8, 17));
    assert_eq!(
        fold(&overflow, &pool, None),
        Some(Constant::int(TyIdx::I8, (16 * 17) & 0xff))
    );
}

#[test]
fn mul_with_unknown_operand_does_not_fold() {
    let pool = TypePool::new();
    let c = Constant::mul(Constant::int(TyIdx::I64, 10), Constant::size_of(TyIdx::I32));

    assert_eq!(fold(&c, &pool, None), None);
}
