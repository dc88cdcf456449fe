//! The module: owner of every value, type, and symbol.
//!
//! Values are stored in an arena indexed by [`ValueId`]. Each value's use
//! list is maintained as values are appended, so "who uses `v`" is a slice
//! lookup rather than a graph walk. Functions are registered in a
//! per-module symbol table, and constants are uniqued so that equal
//! constants share one value.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::constant::Constant;
use crate::layout::DataLayout;
use crate::ty::{TyIdx, TyKind, TypePool};
use crate::value::{BinOp, CastOp, Use, ValueData, ValueId, ValueKind};

mod build;

pub use build::{BuiltAlloc, MALLOC};

/// A compilation unit.
pub struct Module {
    name: String,
    types: TypePool,
    layout: Option<DataLayout>,
    values: Vec<ValueData>,
    /// Use list per value, indexed by `ValueId`.
    uses: Vec<SmallVec<[Use; 2]>>,
    symbols: FxHashMap<String, ValueId>,
    constants: FxHashMap<Constant, ValueId>,
}

impl Module {
    /// Create an empty module without a target layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: TypePool::new(),
            layout: None,
            values: Vec::new(),
            uses: Vec::new(),
            symbols: FxHashMap::default(),
            constants: FxHashMap::default(),
        }
    }

    /// Attach a target layout.
    #[must_use]
    pub fn with_layout(mut self, layout: DataLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &TypePool {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypePool {
        &mut self.types
    }

    /// The module's target layout, if one was configured.
    pub fn layout(&self) -> Option<&DataLayout> {
        self.layout.as_ref()
    }

    pub fn set_layout(&mut self, layout: Option<DataLayout>) {
        self.layout = layout;
    }

    /// Number of values in the module.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // ── Construction ────────────────────────────────────────────────

    /// Append a value and record it as a user of each of its operands.
    #[allow(clippy::cast_possible_truncation)] // modules never approach u32::MAX values
    fn push(&mut self, kind: ValueKind, ty: TyIdx) -> ValueId {
        let id = ValueId::new(self.values.len() as u32);
        for (operand, used) in kind.operands().into_iter().enumerate() {
            debug_assert!(used.index() < self.values.len(), "operand {used} defined after {id}");
            if let Some(list) = self.uses.get_mut(used.index()) {
                list.push(Use {
                    user: id,
                    operand: operand as u32,
                });
            }
        }
        self.values.push(ValueData { kind, ty });
        self.uses.push(SmallVec::new());
        id
    }

    /// Declare a function named `name` of function type `ty`.
    ///
    /// Returns the existing symbol if `name` is already declared.
    pub fn declare_function(&mut self, name: &str, ty: TyIdx) -> ValueId {
        if let Some(&existing) = self.symbols.get(name) {
            return existing;
        }
        let id = self.push(
            ValueKind::Function {
                name: name.to_string(),
            },
            ty,
        );
        self.symbols.insert(name.to_string(), id);
        id
    }

    /// Intern a constant, returning the existing value if an equal constant
    /// was already created.
    pub fn constant(&mut self, constant: Constant) -> ValueId {
        if let Some(&existing) = self.constants.get(&constant) {
            return existing;
        }
        let ty = constant.ty();
        let id = self.push(ValueKind::Constant(constant.clone()), ty);
        self.constants.insert(constant, id);
        id
    }

    /// Intern an integer literal.
    pub fn const_int(&mut self, ty: TyIdx, value: u64) -> ValueId {
        self.constant(Constant::int(ty, value))
    }

    pub fn argument(&mut self, index: u32, ty: TyIdx) -> ValueId {
        self.push(ValueKind::Argument { index }, ty)
    }

    /// Call `callee` with `args`. The result type is the callee's declared
    /// return type, or `void` when the callee is not a function.
    pub fn call(&mut self, callee: ValueId, args: &[ValueId]) -> ValueId {
        let ty = match self.ty(callee).and_then(|ty| self.types.get(ty)) {
            Some(TyKind::Function { ret, .. }) => *ret,
            _ => TyIdx::VOID,
        };
        self.push(
            ValueKind::Call {
                callee,
                args: args.iter().copied().collect(),
            },
            ty,
        )
    }

    pub fn cast(&mut self, op: CastOp, operand: ValueId, ty: TyIdx) -> ValueId {
        self.push(ValueKind::Cast { op, operand }, ty)
    }

    /// Reinterpret `operand` as `ty`.
    pub fn bitcast(&mut self, operand: ValueId, ty: TyIdx) -> ValueId {
        self.cast(CastOp::BitCast, operand, ty)
    }

    pub fn binary(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.ty(lhs).unwrap_or(TyIdx::NONE);
        self.push(ValueKind::Binary { op, lhs, rhs }, ty)
    }

    pub fn mul(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
        self.binary(BinOp::Mul, lhs, rhs)
    }

    pub fn store(&mut self, value: ValueId, ptr: ValueId) -> ValueId {
        self.push(ValueKind::Store { value, ptr }, TyIdx::VOID)
    }

    pub fn ret(&mut self, value: Option<ValueId>) -> ValueId {
        self.push(ValueKind::Return { value }, TyIdx::VOID)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// True if `v` was allocated by this module.
    pub fn contains(&self, v: ValueId) -> bool {
        v.index() < self.values.len()
    }

    pub fn get(&self, v: ValueId) -> Option<&ValueData> {
        self.values.get(v.index())
    }

    pub fn kind(&self, v: ValueId) -> Option<&ValueKind> {
        self.get(v).map(|data| &data.kind)
    }

    pub fn ty(&self, v: ValueId) -> Option<TyIdx> {
        self.get(v).map(|data| data.ty)
    }

    /// The constant `v` holds, if `v` is a constant.
    pub fn as_constant(&self, v: ValueId) -> Option<&Constant> {
        match self.kind(v)? {
            ValueKind::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Operand `index` of `v`, in [`ValueKind::operands`] order.
    pub fn operand(&self, v: ValueId, index: usize) -> Option<ValueId> {
        self.kind(v)?.operands().get(index).copied()
    }

    /// The use list of `v`, in creation order. Empty for unknown values.
    pub fn uses(&self, v: ValueId) -> &[Use] {
        self.uses.get(v.index()).map_or(&[][..], |list| list.as_slice())
    }

    pub fn use_count(&self, v: ValueId) -> usize {
        self.uses(v).len()
    }

    pub fn has_one_use(&self, v: ValueId) -> bool {
        self.use_count(v) == 1
    }

    /// Look up a function symbol by name.
    pub fn function(&self, name: &str) -> Option<ValueId> {
        self.symbols.get(name).copied()
    }
}
