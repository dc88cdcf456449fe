use pretty_assertions::assert_eq;

use super::*;

#[test]
fn size_of_is_i64() {
    assert_eq!(Constant::size_of(TyIdx::I32).ty(), TyIdx::I64);
}

#[test]
fn mul_takes_lhs_type() {
    let c = Constant::mul(Constant::int(TyIdx::I32, 10), Constant::int(TyIdx::I32, 4));
    assert_eq!(c.ty(), TyIdx::I32);
    assert!(c.is_expr());
    assert_eq!(c.as_int(), None);
}

#[test]
fn is_one_only_for_literal_one() {
    assert!(Constant::int(TyIdx::I64, 1).is_one());
    assert!(!Constant::int(TyIdx::I64, 2).is_one());
    assert!(!Constant::size_of(TyIdx::I8).is_one());
}

#[test]
fn coerce_same_width_is_identity() {
    let pool = TypePool::new();
    let c = Constant::size_of(TyIdx::I32);

    assert_eq!(c.clone().coerce_int(TyIdx::I64, &pool), c);
}

#[test]
fn coerce_narrower_truncates() {
    let pool = TypePool::new();
    let c = Constant::size_of(TyIdx::I32).coerce_int(TyIdx::I32, &pool);

    assert_eq!(
        c,
        Constant::Trunc {
            value: Box::new(Constant::size_of(TyIdx::I32)),
            ty: TyIdx::I32,
        }
    );
    assert_eq!(c.ty(), TyIdx::I32);
}

#[test]
fn coerce_wider_zero_extends() {
    let mut pool = TypePool::new();
    let i128 = pool.int(128);
    let c = Constant::size_of(TyIdx::I8).coerce_int(i128, &pool);

    assert_eq!(
        c,
        Constant::ZExt {
            value: Box::new(Constant::size_of(TyIdx::I8)),
            ty: i128,
        }
    );
}

#[test]
fn coerce_to_non_integer_is_unchanged() {
    let pool = TypePool::new();
    let c = Constant::size_of(TyIdx::I8);

    assert_eq!(c.clone().coerce_int(TyIdx::I8_PTR, &pool), c);
}
