//! The resolved, index-addressed representation of a set of WIT packages,
//! worlds, interfaces and types, plus the decoder that builds it from the
//! canonical WIT JSON form.
//!
//! This crate owns the *data*: [`Resolve`] and everything reachable from
//! it. The Canonical ABI algorithms that operate on that data (size,
//! alignment, flattening, differentiation) live in `wit-abi`; per-target
//! code emission lives in `wit-bindgen-core`.

mod arena;
mod decode;
mod docs;
mod function;
mod ident;
mod ordered_map;
mod resolve;
mod stability;
mod types;

pub use arena::{Arena, Id};
pub use decode::{decode, decode_str, DecodeError, Path as DecodePath};
pub use docs::Docs;
pub use function::{Function, FunctionKind, Param};
pub use ident::{IdentParseError, PackageIdent};
pub use ordered_map::{insert_unique, OrderedMap};
pub use resolve::{Interface, InterfaceId, Package, PackageId, Resolve, TypeDefKindRef, World, WorldId, WorldItem};
pub use stability::Stability;
pub use types::{
    Case, Direction, Enum, EnumCase, Field, Flag, Flags, Record, Result_, Stream, Tuple, Type, TypeDef, TypeDefKind,
    TypeId, TypeOwner, Variant,
};
