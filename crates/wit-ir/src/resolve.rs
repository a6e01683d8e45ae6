use crate::arena::{Arena, Id};
use crate::docs::Docs;
use crate::function::Function;
use crate::ident::PackageIdent;
use crate::ordered_map::OrderedMap;
use crate::stability::Stability;
use crate::types::{Direction, Type, TypeDef, TypeDefKind, TypeId, TypeOwner};

pub type WorldId = Id<World>;
pub type InterfaceId = Id<Interface>;
pub type PackageId = Id<Package>;

#[derive(Debug, Clone)]
pub struct Package {
    pub ident: PackageIdent,
    pub interfaces: OrderedMap<String, InterfaceId>,
    pub worlds: OrderedMap<String, WorldId>,
    pub docs: Docs,
}

#[derive(Debug, Clone)]
pub struct Interface {
    pub name: Option<String>,
    pub typedefs: OrderedMap<String, TypeId>,
    pub functions: OrderedMap<String, Function>,
    pub package: PackageId,
    pub stability: Stability,
    pub docs: Docs,
}

/// A single import or export slot of a [`World`].
#[derive(Debug, Clone)]
pub enum WorldItem {
    Interface(InterfaceId),
    Type(TypeId),
    Function(Function),
}

#[derive(Debug, Clone)]
pub struct World {
    pub name: String,
    pub imports: OrderedMap<String, WorldItem>,
    pub exports: OrderedMap<String, WorldItem>,
    pub package: PackageId,
    pub stability: Stability,
    pub docs: Docs,
}

/// The root of the resolved IR graph: every world, interface, type and
/// package reachable from a decoded WIT document, addressed by stable
/// arena indices.
///
/// Built once by [`crate::decode`], optionally transformed once by
/// [`crate::differentiate`] (in the `wit-abi` crate), then read-only for
/// the rest of its life.
#[derive(Debug, Clone, Default)]
pub struct Resolve {
    pub worlds: Arena<World>,
    pub interfaces: Arena<Interface>,
    pub typedefs: Arena<TypeDef>,
    pub packages: Arena<Package>,
}

impl Resolve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows a chain of `TypeDefKind::Type(id)` aliases to the first
    /// typedef whose kind is not itself an alias.
    pub fn type_root(&self, mut id: TypeId) -> TypeId {
        loop {
            match &self.typedefs[id].kind {
                TypeDefKind::Type(next) => id = *next,
                _ => return id,
            }
        }
    }

    /// Resolves a [`Type`] to its underlying [`TypeDefKind`], chasing
    /// aliases and synthesizing the kind for bare primitives.
    pub fn kind_of(&self, ty: Type) -> TypeDefKindRef<'_> {
        match ty {
            Type::Id(id) => TypeDefKindRef::Def(&self.typedefs[self.type_root(id)].kind),
            other => TypeDefKindRef::Primitive(other),
        }
    }

    /// True if `ty`'s root kind is `resource`.
    pub fn is_resource(&self, ty: Type) -> bool {
        matches!(self.kind_of(ty), TypeDefKindRef::Def(TypeDefKind::Resource))
    }

    pub fn interface_name(&self, id: InterfaceId) -> String {
        let iface = &self.interfaces[id];
        let pkg = &self.packages[iface.package];
        match &iface.name {
            Some(name) => format!("{}/{name}", pkg.ident),
            None => pkg.ident.to_string(),
        }
    }
}

/// Either a reference to a declared `TypeDef`, or a bare primitive that has
/// no `TypeDef` of its own (see [`Resolve::kind_of`]).
#[derive(Debug, Clone, Copy)]
pub enum TypeDefKindRef<'a> {
    Def(&'a TypeDefKind),
    Primitive(Type),
}
