//! Interned IR types.
//!
//! Every type is stored once in a [`TypePool`] and referenced by a 32-bit
//! [`TyIdx`]. Type equality is index equality.
//!
//! The primitive types used by allocation analysis (`void`, the integer
//! widths, the float types, and the generic byte pointer `i8*`) are
//! pre-interned at fixed indices so they can be named without a pool.

use std::fmt;

use rustc_hash::FxHashMap;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TyIdx(u32);

impl TyIdx {
    // === Pre-interned types (indices 0-8) ===

    /// `void`.
    pub const VOID: Self = Self(0);
    /// `i1`.
    pub const I1: Self = Self(1);
    /// `i8`.
    pub const I8: Self = Self(2);
    /// `i16`.
    pub const I16: Self = Self(3);
    /// `i32`.
    pub const I32: Self = Self(4);
    /// `i64`.
    pub const I64: Self = Self(5);
    /// `float`.
    pub const F32: Self = Self(6);
    /// `double`.
    pub const F64: Self = Self(7);
    /// `i8*`, the raw result type of the allocation function.
    pub const I8_PTR: Self = Self(8);

    /// Number of pre-interned types.
    pub const PREINTERNED_COUNT: u32 = 9;

    /// Sentinel for "no type".
    pub const NONE: Self = Self(u32::MAX);

    /// Create an index from a raw value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for TyIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::VOID => write!(f, "TyIdx::VOID"),
            Self::I1 => write!(f, "TyIdx::I1"),
            Self::I8 => write!(f, "TyIdx::I8"),
            Self::I16 => write!(f, "TyIdx::I16"),
            Self::I32 => write!(f, "TyIdx::I32"),
            Self::I64 => write!(f, "TyIdx::I64"),
            Self::F32 => write!(f, "TyIdx::F32"),
            Self::F64 => write!(f, "TyIdx::F64"),
            Self::I8_PTR => write!(f, "TyIdx::I8_PTR"),
            Self::NONE => write!(f, "TyIdx::NONE"),
            _ => write!(f, "TyIdx({})", self.0),
        }
    }
}

/// Structural description of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TyKind {
    Void,
    /// Integer of arbitrary bit width.
    Int { bits: u32 },
    Float,
    Double,
    /// Typed pointer. The pointee is what an allocation's cast recovers.
    Pointer { pointee: TyIdx },
    Array { elem: TyIdx, len: u64 },
    Struct { fields: Vec<TyIdx> },
    Function { params: Vec<TyIdx>, ret: TyIdx },
}

/// Interning pool for IR types.
pub struct TypePool {
    kinds: Vec<TyKind>,
    interned: FxHashMap<TyKind, TyIdx>,
}

impl TypePool {
    /// Create a pool with the pre-interned types at their fixed indices.
    pub fn new() -> Self {
        let mut pool = Self {
            kinds: Vec::with_capacity(64),
            interned: FxHashMap::default(),
        };

        let preinterned = [
            TyKind::Void,
            TyKind::Int { bits: 1 },
            TyKind::Int { bits: 8 },
            TyKind::Int { bits: 16 },
            TyKind::Int { bits: 32 },
            TyKind::Int { bits: 64 },
            TyKind::Float,
            TyKind::Double,
            TyKind::Pointer {
                pointee: TyIdx::I8,
            },
        ];
        for kind in preinterned {
            pool.intern(kind);
        }
        debug_assert_eq!(pool.len(), TyIdx::PREINTERNED_COUNT as usize);

        pool
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// The pool always holds the pre-interned types, so it is never empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Intern a type description, returning the existing index if present.
    #[allow(clippy::cast_possible_truncation)] // pools never approach u32::MAX entries
    pub fn intern(&mut self, kind: TyKind) -> TyIdx {
        if let Some(&idx) = self.interned.get(&kind) {
            return idx;
        }
        let idx = TyIdx::from_raw(self.kinds.len() as u32);
        self.kinds.push(kind.clone());
        self.interned.insert(kind, idx);
        idx
    }

    /// Look up the description of `idx`.
    ///
    /// Returns `None` for `TyIdx::NONE` or an index from another pool.
    pub fn get(&self, idx: TyIdx) -> Option<&TyKind> {
        self.kinds.get(idx.index())
    }

    // === Constructors ===

    /// `iN`.
    pub fn int(&mut self, bits: u32) -> TyIdx {
        self.intern(TyKind::Int { bits })
    }

    /// `pointee*`.
    pub fn pointer(&mut self, pointee: TyIdx) -> TyIdx {
        self.intern(TyKind::Pointer { pointee })
    }

    /// `[len x elem]`.
    pub fn array(&mut self, elem: TyIdx, len: u64) -> TyIdx {
        self.intern(TyKind::Array { elem, len })
    }

    /// `{ fields... }`.
    pub fn structure(&mut self, fields: &[TyIdx]) -> TyIdx {
        self.intern(TyKind::Struct {
            fields: fields.to_vec(),
        })
    }

    /// `ret (params...)`.
    pub fn function(&mut self, params: &[TyIdx], ret: TyIdx) -> TyIdx {
        self.intern(TyKind::Function {
            params: params.to_vec(),
            ret,
        })
    }

    // === Introspection ===

    /// The pointee of a pointer type, `None` for every other type.
    pub fn pointee(&self, idx: TyIdx) -> Option<TyIdx> {
        match self.get(idx)? {
            TyKind::Pointer { pointee } => Some(*pointee),
            _ => None,
        }
    }

    /// Bit width of an integer type, `None` for every other type.
    pub fn int_bits(&self, idx: TyIdx) -> Option<u32> {
        match self.get(idx)? {
            TyKind::Int { bits } => Some(*bits),
            _ => None,
        }
    }

    pub fn is_pointer(&self, idx: TyIdx) -> bool {
        self.pointee(idx).is_some()
    }

    pub fn is_int(&self, idx: TyIdx) -> bool {
        self.int_bits(idx).is_some()
    }

    /// Render a type in LLVM-like textual syntax (`i32*`, `{ i8, i64 }`).
    pub fn display(&self, idx: TyIdx) -> TyDisplay<'_> {
        TyDisplay { pool: self, idx }
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Display adapter returned by [`TypePool::display`].
pub struct TyDisplay<'pool> {
    pool: &'pool TypePool,
    idx: TyIdx,
}

impl fmt::Display for TyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(kind) = self.pool.get(self.idx) else {
            return write!(f, "<none>");
        };
        let nested = |idx| self.pool.display(idx);
        match kind {
            TyKind::Void => write!(f, "void"),
            TyKind::Int { bits } => write!(f, "i{bits}"),
            TyKind::Float => write!(f, "float"),
            TyKind::Double => write!(f, "double"),
            TyKind::Pointer { pointee } => write!(f, "{}*", nested(*pointee)),
            TyKind::Array { elem, len } => write!(f, "[{len} x {}]", nested(*elem)),
            TyKind::Struct { fields } => {
                write!(f, "{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", nested(*field))?;
                }
                write!(f, " }}")
            }
            TyKind::Function { params, ret } => {
                write!(f, "{} (", nested(*ret))?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", nested(*param))?;
                }
                write!(f, ")")
            }
        }
    }
}
