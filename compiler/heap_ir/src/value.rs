//! Values of the IR graph.
//!
//! Every node of a [`Module`](crate::Module) is a value: functions,
//! constants, arguments, and instructions alike. A value is identified by
//! a [`ValueId`] and described by a [`ValueKind`] tag plus its type.

use std::fmt;

use smallvec::SmallVec;

use crate::constant::Constant;
use crate::ty::TyIdx;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Value ID within a module.
///
/// IDs are allocated sequentially starting from 0 and are only meaningful
/// for the module that allocated them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    /// Create a new value ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// Conversion opcodes.
///
/// Only [`BitCast`](CastOp::BitCast) reinterprets a value without changing
/// its bits; the others convert. `Trunc` and `ZExt` fit an allocation count
/// to the allocator's size type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CastOp {
    BitCast,
    Trunc,
    ZExt,
    PtrToInt,
}

/// Binary integer opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    Add,
    Mul,
    Shl,
}

// ── Values ──────────────────────────────────────────────────────────

/// What a value is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// Formal argument of the enclosing function.
    Argument { index: u32 },
    /// A declared or defined function, addressable by name.
    Function { name: String },
    /// A uniqued constant.
    Constant(Constant),
    /// Direct or indirect call: `callee(args...)`.
    Call {
        callee: ValueId,
        args: SmallVec<[ValueId; 2]>,
    },
    /// Single-operand conversion to the value's type.
    Cast { op: CastOp, operand: ValueId },
    /// Binary integer operation; the result has the type of `lhs`.
    Binary {
        op: BinOp,
        lhs: ValueId,
        rhs: ValueId,
    },
    /// Memory write; a typical use that escapes a pointer.
    Store { value: ValueId, ptr: ValueId },
    Return { value: Option<ValueId> },
}

impl ValueKind {
    /// Operands in positional order.
    ///
    /// A call's callee is operand 0 and its arguments follow, so the size
    /// argument of an allocation call is operand 1.
    pub fn operands(&self) -> SmallVec<[ValueId; 4]> {
        match self {
            ValueKind::Argument { .. } | ValueKind::Function { .. } | ValueKind::Constant(_) => {
                SmallVec::new()
            }
            ValueKind::Call { callee, args } => {
                let mut ops = SmallVec::with_capacity(1 + args.len());
                ops.push(*callee);
                ops.extend_from_slice(args);
                ops
            }
            ValueKind::Cast { operand, .. } => smallvec::smallvec![*operand],
            ValueKind::Binary { lhs, rhs, .. } => smallvec::smallvec![*lhs, *rhs],
            ValueKind::Store { value, ptr } => smallvec::smallvec![*value, *ptr],
            ValueKind::Return { value } => value.iter().copied().collect(),
        }
    }
}

/// A value stored in a module: its kind and its static type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueData {
    pub kind: ValueKind,
    pub ty: TyIdx,
}

/// One use of a value: `user`'s operand number `operand` refers to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Use {
    pub user: ValueId,
    pub operand: u32,
}
