//! Scope tree and register bookkeeping.
//!
//! `MemoryRepository` owns a tree of [`ScopeNode`]s: the root (program
//! scope) plus one child per declared function, created once during setup.
//! Each node owns its own register counter and its own name table, so two
//! functions may hand out the same register numbers.
//!
//! Blocks never open a scope. A whole function body, including the bodies
//! of nested `if`s, shares the function's node: a name bound inside a
//! conditional stays visible after it, and rebinding a name overwrites the
//! earlier entry instead of shadowing it.
//!
//! The root additionally carries the [`SymbolTable`] of declared types.

use std::fmt;

use quill_ir::Type;
use rustc_hash::FxHashMap;
use tracing::trace;

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

/// A virtual register, printed as `%v<N>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u32);

impl Register {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Register(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%v{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ScopeId / ScopeKey
// ---------------------------------------------------------------------------

/// Index of a scope node inside its repository.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The program scope.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Key of a scope table entry.
///
/// Literal keys hold the literal's source text and are tagged by kind, so
/// neither a variable nor a literal of the other kind can collide with them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    Variable(String),
    NumberLiteral(String),
    StringLiteral(String),
}

impl ScopeKey {
    pub fn variable(name: impl Into<String>) -> Self {
        ScopeKey::Variable(name.into())
    }
}

// ---------------------------------------------------------------------------
// ScopeTable
// ---------------------------------------------------------------------------

/// Flat `key -> register` mapping local to one scope node.
#[derive(Clone, Debug, Default)]
pub struct ScopeTable {
    entries: FxHashMap<ScopeKey, Register>,
}

impl ScopeTable {
    /// Insert or overwrite a binding.
    pub fn insert(&mut self, key: ScopeKey, register: Register) {
        self.entries.insert(key, register);
    }

    pub fn get(&self, key: &ScopeKey) -> Option<Register> {
        self.entries.get(key).copied()
    }

    /// Drop every literal entry, keeping variable bindings.
    pub fn clear_literals(&mut self) {
        self.entries
            .retain(|key, _| matches!(key, ScopeKey::Variable(_)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScopeNode
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ScopeNode {
    /// Function name, empty for the root.
    name: String,
    table: ScopeTable,
    /// Next register to hand out. Starts at 1.
    next_register: u32,
    children: FxHashMap<String, ScopeId>,
}

impl ScopeNode {
    fn new(name: String) -> Self {
        ScopeNode {
            name,
            table: ScopeTable::default(),
            next_register: 1,
            children: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &ScopeTable {
        &self.table
    }
}

// ---------------------------------------------------------------------------
// SymbolTable
// ---------------------------------------------------------------------------

/// Declared types by name: functions (their return type), function-local
/// names (`f::x`), and positional parameter slots (`f#0`).
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    types: FxHashMap<String, Type>,
}

impl SymbolTable {
    pub fn declare(&mut self, name: impl Into<String>, ty: Type) {
        self.types.insert(name.into(), ty);
    }

    pub fn resolve(&self, name: &str) -> Option<Type> {
        self.types.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

/// Symbol name of a function's `index`-th parameter slot.
pub fn param_slot(function: &str, index: usize) -> String {
    format!("{function}#{index}")
}

// ---------------------------------------------------------------------------
// MemoryRepository
// ---------------------------------------------------------------------------

/// The scope tree for one compilation unit.
#[derive(Clone, Debug)]
pub struct MemoryRepository {
    scopes: Vec<ScopeNode>,
    symbols: SymbolTable,
}

impl MemoryRepository {
    /// A repository holding only the root scope.
    pub fn new() -> Self {
        MemoryRepository {
            scopes: vec![ScopeNode::new(String::new())],
            symbols: SymbolTable::default(),
        }
    }

    #[inline]
    fn node(&self, scope: ScopeId) -> &ScopeNode {
        &self.scopes[scope.index()]
    }

    #[inline]
    fn node_mut(&mut self, scope: ScopeId) -> &mut ScopeNode {
        &mut self.scopes[scope.index()]
    }

    pub fn scope(&self, scope: ScopeId) -> &ScopeNode {
        self.node(scope)
    }

    /// Create the scope node for `function` under the root.
    ///
    /// Idempotent: declaring the same function twice returns the node made
    /// the first time.
    pub fn add_function_scope(&mut self, function: &str) -> ScopeId {
        if let Some(existing) = self.child_scope(function) {
            return existing;
        }
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(ScopeNode::new(function.to_string()));
        self.node_mut(ScopeId::ROOT)
            .children
            .insert(function.to_string(), id);
        trace!(function, ?id, "created function scope");
        id
    }

    /// The pre-created scope node of `function`.
    pub fn child_scope(&self, function: &str) -> Option<ScopeId> {
        self.node(ScopeId::ROOT).children.get(function).copied()
    }

    /// Hand out the next register of `scope`.
    ///
    /// Strictly increasing from 1, never reused.
    pub fn allocate_register(&mut self, scope: ScopeId) -> Register {
        let node = self.node_mut(scope);
        let register = Register(node.next_register);
        node.next_register += 1;
        trace!(scope = %node.name, %register, "allocated register");
        register
    }

    /// Bind `key` to `register` in `scope`, overwriting any earlier binding.
    pub fn bind(&mut self, scope: ScopeId, key: ScopeKey, register: Register) {
        self.node_mut(scope).table.insert(key, register);
    }

    pub fn lookup(&self, scope: ScopeId, key: &ScopeKey) -> Option<Register> {
        self.node(scope).table.get(key)
    }

    /// Forget the memoized literals of `scope`. A literal register only
    /// dominates the rest of the block that materialized it.
    pub fn forget_literals(&mut self, scope: ScopeId) {
        self.node_mut(scope).table.clear_literals();
        trace!(?scope, "forgot memoized literals");
    }

    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Option<Register> {
        self.lookup(scope, &ScopeKey::variable(name))
    }

    pub fn declare_symbol(&mut self, name: impl Into<String>, ty: Type) {
        self.symbols.declare(name, ty);
    }

    pub fn resolve_symbol_type(&self, name: &str) -> Option<Type> {
        self.symbols.resolve(name)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Symbol name of `name` as seen from `scope`: `f::name` inside function
    /// `f`, plain `name` at the root.
    pub fn qualified_name(&self, scope: ScopeId, name: &str) -> String {
        let owner = &self.node(scope).name;
        if owner.is_empty() {
            name.to_string()
        } else {
            format!("{owner}::{name}")
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}
