//! Target data layout.
//!
//! A [`DataLayout`] answers "how many bytes does one value of this type
//! occupy" for the target, which is what folding a `sizeof` constant needs.
//! Layouts are configured from LLVM-style layout strings:
//!
//! ```text
//! e-p:64:64-i64:64-f80:128-n8:16:32:64-S128
//! ```
//!
//! Components are separated by `-`. Sizes and alignments are given in
//! bits. Recognized components:
//!
//! - `e` / `E`: little / big endian
//! - `p[n]:size:abi[:pref[:idx]]`: pointer size and alignment
//!   (only address space 0 is recorded)
//! - `iN:abi[:pref]`: integer alignment
//! - `fN:abi[:pref]`: floating point alignment
//! - `a:abi[:pref]`: aggregate alignment
//! - `v…`, `n…`, `S…`, `m:…`, `A…`, `P…`, `G…`: accepted, not used

use rustc_hash::FxHashMap;

use crate::ty::{TyIdx, TyKind, TypePool};

/// Error type for layout string parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A component with an unknown leading letter.
    #[error("unknown layout component '{0}'")]
    UnknownComponent(String),
    /// A component is missing a required field.
    #[error("layout component '{component}' is missing its {field}")]
    MissingField {
        component: String,
        field: &'static str,
    },
    /// A numeric field failed to parse.
    #[error("invalid number '{value}' in layout component '{component}'")]
    InvalidNumber { component: String, value: String },
    /// A size or alignment that is zero or not a whole number of bytes.
    #[error("invalid bit size {bits} in layout component '{component}'")]
    InvalidBits { component: String, bits: u64 },
}

/// Byte order of the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

/// Target layout: sizes and ABI alignments, all in bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    endian: Endian,
    pointer_size: u64,
    pointer_align: u64,
    /// Integer ABI alignment keyed by bit width.
    int_align: FxHashMap<u32, u64>,
    /// Float ABI alignment keyed by bit width.
    float_align: FxHashMap<u32, u64>,
    aggregate_align: u64,
}

impl Default for DataLayout {
    /// The conventional 64-bit little-endian layout
    /// (`e-p:64:64-i1:8-i8:8-i16:16-i32:32-i64:64-f32:32-f64:64`).
    fn default() -> Self {
        let int_align = [(1, 1), (8, 1), (16, 2), (32, 4), (64, 8)]
            .into_iter()
            .collect();
        let float_align = [(32, 4), (64, 8)].into_iter().collect();
        Self {
            endian: Endian::Little,
            pointer_size: 8,
            pointer_align: 8,
            int_align,
            float_align,
            aggregate_align: 1,
        }
    }
}

impl DataLayout {
    /// Parse a layout string, starting from the default layout and
    /// overriding every component the string specifies.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut layout = Self::default();
        for component in text.split('-').filter(|c| !c.is_empty()) {
            layout.apply(component)?;
        }
        Ok(layout)
    }

    fn apply(&mut self, component: &str) -> Result<(), LayoutError> {
        let mut fields = component.split(':');
        let head = fields.next().unwrap_or_default();
        let rest: Vec<&str> = fields.collect();

        let Some(letter) = head.chars().next() else {
            return Err(LayoutError::UnknownComponent(component.to_string()));
        };
        let suffix = &head[letter.len_utf8()..];

        match letter {
            'e' if suffix.is_empty() => self.endian = Endian::Little,
            'E' if suffix.is_empty() => self.endian = Endian::Big,
            'p' => {
                let addr_space = if suffix.is_empty() {
                    0
                } else {
                    parse_number(component, suffix)?
                };
                let size = bytes(component, required(component, &rest, 0, "size")?)?;
                let abi = bytes(component, required(component, &rest, 1, "ABI alignment")?)?;
                if addr_space == 0 {
                    self.pointer_size = size;
                    self.pointer_align = abi;
                }
            }
            'i' | 'f' => {
                let width = u32::try_from(parse_number(component, suffix)?).map_err(|_| {
                    LayoutError::InvalidNumber {
                        component: component.to_string(),
                        value: suffix.to_string(),
                    }
                })?;
                let abi = bytes(component, required(component, &rest, 0, "ABI alignment")?)?;
                if letter == 'i' {
                    self.int_align.insert(width, abi);
                } else {
                    self.float_align.insert(width, abi);
                }
            }
            'a' => {
                let abi_bits =
                    parse_number(component, required(component, &rest, 0, "ABI alignment")?)?;
                // `a:0` is legal and means "no extra aggregate alignment".
                self.aggregate_align = if abi_bits == 0 {
                    1
                } else {
                    bits_to_bytes(component, abi_bits)?
                };
            }
            'v' | 'n' | 'S' | 'm' | 'A' | 'P' | 'G' => {}
            _ => return Err(LayoutError::UnknownComponent(component.to_string())),
        }
        Ok(())
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Pointer size in bytes (address space 0).
    pub fn pointer_size(&self) -> u64 {
        self.pointer_size
    }

    /// Pointer ABI alignment in bytes (address space 0).
    pub fn pointer_align(&self) -> u64 {
        self.pointer_align
    }

    /// ABI alignment of an integer of `bits` width.
    ///
    /// Widths without an explicit entry use the alignment of the next wider
    /// listed integer, or of the widest one when `bits` exceeds them all.
    pub fn int_align(&self, bits: u32) -> u64 {
        if let Some(&align) = self.int_align.get(&bits) {
            return align;
        }
        let wider = self
            .int_align
            .iter()
            .filter(|(&w, _)| w > bits)
            .min_by_key(|(&w, _)| w);
        let widest = self.int_align.iter().max_by_key(|(&w, _)| w);
        wider.or(widest).map_or(1, |(_, &align)| align)
    }

    /// ABI alignment of a floating point type of `bits` width.
    pub fn float_align(&self, bits: u32) -> u64 {
        self.float_align
            .get(&bits)
            .copied()
            .unwrap_or_else(|| u64::from(bits.div_ceil(8)))
    }

    /// Allocation size of `ty` in bytes: the store size rounded up to the
    /// ABI alignment. This is the stride between array elements and the
    /// value a folded `sizeof` produces.
    ///
    /// Returns `None` for unsized types (`void`, functions) and for indices
    /// not in `pool`.
    pub fn size_of(&self, pool: &TypePool, ty: TyIdx) -> Option<u64> {
        let store = self.store_size(pool, ty)?;
        Some(align_to(store, self.align_of(pool, ty)?))
    }

    /// ABI alignment of `ty` in bytes.
    pub fn align_of(&self, pool: &TypePool, ty: TyIdx) -> Option<u64> {
        match pool.get(ty)? {
            TyKind::Void | TyKind::Function { .. } => None,
            TyKind::Int { bits } => Some(self.int_align(*bits)),
            TyKind::Float => Some(self.float_align(32)),
            TyKind::Double => Some(self.float_align(64)),
            TyKind::Pointer { .. } => Some(self.pointer_align),
            TyKind::Array { elem, .. } => self.align_of(pool, *elem),
            TyKind::Struct { fields } => {
                let mut align = self.aggregate_align;
                for &field in fields {
                    align = align.max(self.align_of(pool, field)?);
                }
                Some(align)
            }
        }
    }

    fn store_size(&self, pool: &TypePool, ty: TyIdx) -> Option<u64> {
        match pool.get(ty)? {
            TyKind::Void | TyKind::Function { .. } => None,
            TyKind::Int { bits } => Some(u64::from(bits.div_ceil(8))),
            TyKind::Float => Some(4),
            TyKind::Double => Some(8),
            TyKind::Pointer { .. } => Some(self.pointer_size),
            TyKind::Array { elem, len } => self.size_of(pool, *elem)?.checked_mul(*len),
            TyKind::Struct { fields } => {
                let mut offset = 0u64;
                for &field in fields {
                    offset = align_to(offset, self.align_of(pool, field)?);
                    offset = offset.checked_add(self.size_of(pool, field)?)?;
                }
                Some(offset)
            }
        }
    }
}

/// Round `value` up to a multiple of `align` (`align` >= 1).
#[inline]
fn align_to(value: u64, align: u64) -> u64 {
    value.div_ceil(align.max(1)) * align.max(1)
}

fn required<'s>(
    component: &str,
    fields: &[&'s str],
    index: usize,
    field: &'static str,
) -> Result<&'s str, LayoutError> {
    fields
        .get(index)
        .copied()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| LayoutError::MissingField {
            component: component.to_string(),
            field,
        })
}

fn parse_number(component: &str, value: &str) -> Result<u64, LayoutError> {
    value.parse().map_err(|_| LayoutError::InvalidNumber {
        component: component.to_string(),
        value: value.to_string(),
    })
}

/// Parse a bit count that must be a non-zero whole number of bytes.
fn bytes(component: &str, value: &str) -> Result<u64, LayoutError> {
    bits_to_bytes(component, parse_number(component, value)?)
}

fn bits_to_bytes(component: &str, bits: u64) -> Result<u64, LayoutError> {
    if bits == 0 || bits % 8 != 0 {
        return Err(LayoutError::InvalidBits {
            component: component.to_string(),
            bits,
        });
    }
    Ok(bits / 8)
}
