//! Array allocation pattern matching.
//!
//! A single object is allocated with a size argument of exactly
//! `sizeof(T)`; an array of `n` objects with `n * sizeof(T)`. Given the
//! element type `T` recovered from the cast, the size argument is matched
//! against the element size constant (`sizeof(T)` coerced to the size
//! argument's width, and its folded literal when a layout is known):
//!
//! - a constant size is an array iff it is not the element size; a literal
//!   is never an array while the element size cannot be folded;
//! - a `mul` is an array iff its right operand is the element size;
//! - anything else (including shifts) is not an array.
//!
//! Without a recoverable element type nothing is an array.

use heap_ir::{BinOp, Constant, TyIdx, ValueId, ValueKind};

use crate::AllocAnalysis;

/// `sizeof(elem)` at the size argument's width, unfolded and folded.
pub(crate) struct ElementSize {
    expr: Constant,
    folded: Option<Constant>,
}

impl ElementSize {
    /// Folded literal value, when the layout allowed folding.
    pub(crate) fn folded_value(&self) -> Option<u64> {
        self.folded.as_ref().and_then(Constant::as_int)
    }

    /// True when the element size folds to `1` (byte-sized elements).
    pub(crate) fn is_one(&self) -> bool {
        self.folded.as_ref().is_some_and(Constant::is_one)
    }
}

/// How an array-classified size argument encodes its count.
pub(crate) enum SizeShape<'m> {
    /// The size argument is a constant.
    Constant(&'m Constant),
    /// The size argument is `count * element_size`.
    Mul { count: ValueId },
}

/// A size argument that matched the array pattern.
pub(crate) struct ArrayMatch<'m> {
    pub(crate) size: ValueId,
    pub(crate) elem_size: ElementSize,
    pub(crate) shape: SizeShape<'m>,
}

impl<'m> AllocAnalysis<'m> {
    /// True iff `v` is an allocation call whose size argument encodes an
    /// array of its recovered element type.
    pub fn is_array_alloc(&self, v: ValueId) -> bool {
        self.match_array(v).is_some()
    }

    /// `Some(v)` when [`is_array_alloc`](Self::is_array_alloc) holds.
    pub fn array_alloc(&self, v: ValueId) -> Option<ValueId> {
        self.is_array_alloc(v).then_some(v)
    }

    /// Match the array pattern. `None` means "not an array": either the
    /// size argument is exactly one element, has an unrecognized shape, or
    /// the element type is indeterminate.
    pub(crate) fn match_array(&self, v: ValueId) -> Option<ArrayMatch<'m>> {
        let module = self.module;
        let call = self.extract_alloc_call(v)?;

        // Only a known element type gives a size to compare against.
        let elem = self.allocated_element_type(call).ok()??;
        let size = self.size_argument(call).ok()?;
        let elem_size = self.element_size(elem, module.ty(size)?);

        let shape = match module.kind(size)? {
            ValueKind::Constant(c) => {
                if self.same_constant(c, &elem_size) || self.incomparable_literal(c, &elem_size) {
                    return None;
                }
                SizeShape::Constant(c)
            }
            ValueKind::Binary {
                op: BinOp::Mul,
                lhs,
                rhs,
            } => {
                let scale = module.as_constant(*rhs)?;
                if !self.same_constant(scale, &elem_size) {
                    return None;
                }
                SizeShape::Mul { count: *lhs }
            }
            // Shifted sizes (`count << k`) are not recognized.
            _ => return None,
        };

        Some(ArrayMatch {
            size,
            elem_size,
            shape,
        })
    }

    /// `sizeof(elem)` coerced to `size_ty`, folded when possible.
    pub(crate) fn element_size(&self, elem: TyIdx, size_ty: TyIdx) -> ElementSize {
        let expr = Constant::size_of(elem).coerce_int(size_ty, self.module.types());
        let folded = self.fold(&expr);
        ElementSize { expr, folded }
    }

    /// True if `c` is the element size: structurally identical to its
    /// expression, or equal to its folded literal before or after folding
    /// `c` itself.
    pub(crate) fn same_constant(&self, c: &Constant, elem_size: &ElementSize) -> bool {
        if *c == elem_size.expr {
            return true;
        }
        let Some(folded) = &elem_size.folded else {
            return false;
        };
        c == folded || self.fold(c).as_ref() == Some(folded)
    }

    /// True if `c` is a literal (or folds to one) while the element size
    /// stayed symbolic. Such a size cannot be compared to `sizeof(T)`.
    fn incomparable_literal(&self, c: &Constant, elem_size: &ElementSize) -> bool {
        elem_size.folded.is_none() && (!c.is_expr() || self.fold(c).is_some())
    }
}
