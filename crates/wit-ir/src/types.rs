use crate::arena::Id;
use crate::docs::Docs;
use crate::stability::Stability;
use crate::{InterfaceId, WorldId};

pub type TypeId = Id<TypeDef>;

/// A value usable anywhere a WIT type is expected: either one of the
/// thirteen primitives, or a reference to a named [`TypeDef`] (a record,
/// variant, alias, resource handle, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    S8,
    U8,
    S16,
    U16,
    S32,
    U32,
    S64,
    U64,
    F32,
    F64,
    Char,
    String,
    Id(TypeId),
}

impl Type {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Type::Id(_))
    }
}

/// Which world or interface a [`TypeDef`] is declared in, if any. Anonymous
/// types synthesized by the ABI engine (e.g. the compound record built for
/// an over-16-flat-value parameter list) have no owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOwner {
    World(WorldId),
    Interface(InterfaceId),
    None,
}

/// Which side(s) of a world boundary a node is reachable from.
///
/// Every node starts out `Both` (or, for items reached only once, is
/// assigned directly); [`crate::Resolve`] construction never produces a
/// fully differentiated graph — that is [`super differentiate`]'s job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Both,
    Imported,
    Exported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub docs: Docs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub types: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub docs: Docs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    pub flags: Vec<Flag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCase {
    pub name: String,
    pub docs: Docs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub cases: Vec<EnumCase>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub name: String,
    pub ty: Option<Type>,
    pub docs: Docs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Result_ {
    pub ok: Option<Type>,
    pub err: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    pub element: Option<Type>,
    pub end: Option<Type>,
}

/// The full WIT type algebra. Primitive variants let a *named* typedef
/// alias a primitive directly (`type my-int = u32`) without forcing the
/// primitive through an anonymous intermediate; bare primitives used
/// inline in a signature are represented as [`Type`] values and never
/// allocate a `TypeDef` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    Bool,
    S8,
    U8,
    S16,
    U16,
    S32,
    U32,
    S64,
    U64,
    F32,
    F64,
    Char,
    String,

    Record(Record),
    Tuple(Tuple),
    Flags(Flags),
    Enum(Enum),
    Variant(Variant),
    Option(Type),
    Result(Result_),
    List(Type),

    /// An opaque resource, referenced elsewhere only through `own`/`borrow`
    /// handles.
    Resource,
    Own(TypeId),
    Borrow(TypeId),

    /// Layout not finalized upstream; treated as opaque by the ABI engine
    /// (size 0, align 1, empty flat). See `DESIGN.md`.
    Future(Option<Type>),
    Stream(Stream),

    /// A type alias: `kind` is itself a reference to another `TypeDef`.
    /// Chase with [`crate::Resolve::type_root`].
    Type(TypeId),

    /// Synthesized by the ABI engine during function shaping; never
    /// produced by the decoder.
    Pointer(Type),
}

impl TypeDefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeDefKind::Bool => "bool",
            TypeDefKind::S8 => "s8",
            TypeDefKind::U8 => "u8",
            TypeDefKind::S16 => "s16",
            TypeDefKind::U16 => "u16",
            TypeDefKind::S32 => "s32",
            TypeDefKind::U32 => "u32",
            TypeDefKind::S64 => "s64",
            TypeDefKind::U64 => "u64",
            TypeDefKind::F32 => "f32",
            TypeDefKind::F64 => "f64",
            TypeDefKind::Char => "char",
            TypeDefKind::String => "string",
            TypeDefKind::Record(_) => "record",
            TypeDefKind::Tuple(_) => "tuple",
            TypeDefKind::Flags(_) => "flags",
            TypeDefKind::Enum(_) => "enum",
            TypeDefKind::Variant(_) => "variant",
            TypeDefKind::Option(_) => "option",
            TypeDefKind::Result(_) => "result",
            TypeDefKind::List(_) => "list",
            TypeDefKind::Resource => "resource",
            TypeDefKind::Own(_) => "own",
            TypeDefKind::Borrow(_) => "borrow",
            TypeDefKind::Future(_) => "future",
            TypeDefKind::Stream(_) => "stream",
            TypeDefKind::Type(_) => "type",
            TypeDefKind::Pointer(_) => "pointer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: Option<String>,
    pub kind: TypeDefKind,
    pub owner: TypeOwner,
    pub stability: Stability,
    pub docs: Docs,
    pub direction: Direction,
}
