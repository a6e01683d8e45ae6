//! Whole-type predicates used by function shaping to decide whether a
//! parameter or result needs to travel through linear memory.

use wit_ir::{Resolve, Type, TypeDefKind, TypeDefKindRef};

/// True if any part of `ty` is lowered to a pointer: `string`, `list<T>`, or
/// a type synthesized by function shaping into a compound pointer param.
///
/// `resolve.kind_of` already chases `type` aliases to their root kind, so
/// `TypeDefKind::Type` never appears here.
pub fn has_pointer(resolve: &Resolve, ty: Type) -> bool {
    match resolve.kind_of(ty) {
        TypeDefKindRef::Primitive(Type::String) => true,
        TypeDefKindRef::Primitive(_) => false,
        TypeDefKindRef::Def(kind) => kind_has_pointer(resolve, kind),
    }
}

fn kind_has_pointer(resolve: &Resolve, kind: &TypeDefKind) -> bool {
    match kind {
        TypeDefKind::String | TypeDefKind::List(_) | TypeDefKind::Pointer(_) => true,
        TypeDefKind::Record(r) => r.fields.iter().any(|f| has_pointer(resolve, f.ty)),
        TypeDefKind::Tuple(t) => t.types.iter().any(|ty| has_pointer(resolve, *ty)),
        TypeDefKind::Variant(v) => v.cases.iter().filter_map(|c| c.ty).any(|ty| has_pointer(resolve, ty)),
        TypeDefKind::Option(inner) => has_pointer(resolve, *inner),
        TypeDefKind::Result(r) => {
            r.ok.is_some_and(|ty| has_pointer(resolve, ty)) || r.err.is_some_and(|ty| has_pointer(resolve, ty))
        }
        TypeDefKind::Enum(_)
        | TypeDefKind::Flags(_)
        | TypeDefKind::Bool
        | TypeDefKind::S8
        | TypeDefKind::U8
        | TypeDefKind::S16
        | TypeDefKind::U16
        | TypeDefKind::S32
        | TypeDefKind::U32
        | TypeDefKind::S64
        | TypeDefKind::U64
        | TypeDefKind::F32
        | TypeDefKind::F64
        | TypeDefKind::Char
        | TypeDefKind::Resource
        | TypeDefKind::Own(_)
        | TypeDefKind::Borrow(_)
        | TypeDefKind::Future(_)
        | TypeDefKind::Stream(_) => false,
        TypeDefKind::Type(_) => unreachable!("alias kind should have been chased by Resolve::kind_of"),
    }
}

/// True if any part of `ty` carries a `borrow<T>` resource handle. Borrowed
/// resources are only valid for the duration of the call, which constrains
/// where the shaped signature may place them (never in a stored result).
pub fn has_borrow(resolve: &Resolve, ty: Type) -> bool {
    match resolve.kind_of(ty) {
        TypeDefKindRef::Primitive(_) => false,
        TypeDefKindRef::Def(kind) => kind_has_resource(resolve, kind, true),
    }
}

/// True if any part of `ty` carries an `own<T>` or `borrow<T>` resource
/// handle.
pub fn has_resource(resolve: &Resolve, ty: Type) -> bool {
    match resolve.kind_of(ty) {
        TypeDefKindRef::Primitive(_) => false,
        TypeDefKindRef::Def(kind) => kind_has_resource(resolve, kind, false),
    }
}

/// Shared walk for `has_borrow`/`has_resource`: `borrow_only` restricts the
/// handle match to `Borrow`, otherwise both `Own` and `Borrow` count.
fn kind_has_resource(resolve: &Resolve, kind: &TypeDefKind, borrow_only: bool) -> bool {
    let walk = |resolve: &Resolve, ty: Type| match resolve.kind_of(ty) {
        TypeDefKindRef::Primitive(_) => false,
        TypeDefKindRef::Def(k) => kind_has_resource(resolve, k, borrow_only),
    };
    match kind {
        TypeDefKind::Borrow(_) => true,
        TypeDefKind::Own(_) => !borrow_only,
        TypeDefKind::Resource => !borrow_only,
        TypeDefKind::Record(r) => r.fields.iter().any(|f| walk(resolve, f.ty)),
        TypeDefKind::Tuple(t) => t.types.iter().any(|ty| walk(resolve, *ty)),
        TypeDefKind::Variant(v) => v.cases.iter().filter_map(|c| c.ty).any(|ty| walk(resolve, ty)),
        TypeDefKind::Option(inner) => walk(resolve, *inner),
        TypeDefKind::Result(r) => r.ok.is_some_and(|ty| walk(resolve, ty)) || r.err.is_some_and(|ty| walk(resolve, ty)),
        TypeDefKind::List(elem) => walk(resolve, *elem),
        TypeDefKind::Type(_) => unreachable!("alias kind should have been chased by Resolve::kind_of"),
        _ => false,
    }
}
