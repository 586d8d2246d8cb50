//! Symbol arena and lexical scopes.
//!
//! Scope maps and the symbol arena use lowercased keys throughout; the
//! display name keeps the original case.

use bsl_position::Place;
use rustc_hash::FxHashMap;

use crate::AutoDecl;

/// Index of an [`Item`] in a module's [`Symbols`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u32);

impl ItemId {
    /// Position of the item in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A symbol-table entry linking a name to its declaration.
///
/// `decl` is `None` while the item is a forward reference (a method called
/// before its declaration) or an unknown global.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Name with original case preserved
    pub name: String,
    /// The declaration this item resolves to
    pub decl: Option<ItemDecl>,
}

/// What an [`Item`] was declared as.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDecl {
    /// Module-level variable
    VarMod {
        /// Exported from the module
        export: bool,
        /// Declaration site
        place: Place,
    },
    /// `Var`-declared local variable
    VarLoc {
        /// Declaration site
        place: Place,
    },
    /// Variable introduced implicitly by its first assignment
    Auto {
        /// Site of the introducing assignment target
        place: Place,
    },
    /// Method parameter
    Param {
        /// Declared with `Val`
        by_val: bool,
        /// Declaration site
        place: Place,
    },
    /// Procedure or function declaration
    Method {
        /// True for a function
        func: bool,
        /// Exported from the module
        export: bool,
        /// Signature site
        place: Place,
    },
    /// Built-in object installed from the global context
    GlobalObject,
    /// Built-in method installed from the global context
    GlobalMethod {
        /// True if the method returns a value
        retval: bool,
    },
}

/// Arena of all symbols referenced by one module.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Symbols {
    items: Vec<Item>,
}

impl Symbols {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an item with no declaration yet.
    pub fn alloc(&mut self, name: impl Into<String>) -> ItemId {
        self.alloc_with(name, None)
    }

    /// Allocates an item with a known declaration.
    pub fn alloc_with(&mut self, name: impl Into<String>, decl: Option<ItemDecl>) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(Item { name: name.into(), decl });
        id
    }

    /// Borrows an item.
    pub fn get(&self, id: ItemId) -> &Item {
        &self.items[id.index()]
    }

    /// Fills in the declaration of a forward-referenced item.
    ///
    /// # Panics
    ///
    /// Panics in debug mode when the item already has a declaration; decls
    /// are patched at most once.
    pub fn set_decl(&mut self, id: ItemId, decl: ItemDecl) {
        let item = &mut self.items[id.index()];
        debug_assert!(item.decl.is_none(), "item {:?} declared twice", item.name);
        item.decl = Some(decl);
    }

    /// Number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the arena holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A lexical frame holding variable and method symbol tables.
///
/// Scopes form a singly linked chain toward the module root; name lookup
/// walks outward. `vars` and `methods` are separate namespaces. `auto`
/// collects the implicit variables introduced by first assignment, in
/// textual order.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    /// Enclosing scope, None at the root
    pub outer: Option<usize>,
    /// Variables and attributes, keyed by lowercased name
    pub vars: FxHashMap<String, ItemId>,
    /// Methods, keyed by lowercased name
    pub methods: FxHashMap<String, ItemId>,
    /// Auto variables in order of introduction
    pub auto: Vec<AutoDecl>,
}

impl Scope {
    /// Creates a scope chained to `outer`.
    pub fn new(outer: Option<usize>) -> Self {
        Scope { outer, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_patch_once() {
        let mut symbols = Symbols::new();
        let id = symbols.alloc("Тест");
        assert_eq!(symbols.get(id).name, "Тест");
        assert!(symbols.get(id).decl.is_none());

        symbols.set_decl(id, ItemDecl::Method { func: true, export: false, place: Place::default() });
        assert!(matches!(symbols.get(id).decl, Some(ItemDecl::Method { func: true, .. })));
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    #[cfg(debug_assertions)]
    fn double_patch_panics() {
        let mut symbols = Symbols::new();
        let id = symbols.alloc_with("X", Some(ItemDecl::GlobalObject));
        symbols.set_decl(id, ItemDecl::GlobalObject);
    }
}
