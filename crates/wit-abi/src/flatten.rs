//! Flattening: expanding a WIT type into the sequence of core Wasm values
//! used to pass it across the Canonical ABI boundary.

use wit_ir::{Resolve, Type, TypeDefKind, TypeDefKindRef};

use crate::layout::{despecialize, flags_layout, Despecialized};

/// A single flattened core value. `Pointer` and `U32` share the same
/// physical representation (`i32`) but are kept distinct so a generator can
/// render pointers as raw addresses/handles rather than plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatType {
    U32,
    U64,
    F32,
    F64,
    Pointer,
}

impl FlatType {
    fn byte_size(self) -> u32 {
        match self {
            FlatType::U32 | FlatType::F32 | FlatType::Pointer => 4,
            FlatType::U64 | FlatType::F64 => 8,
        }
    }
}

/// Flattens `ty` into its sequence of core values.
pub fn flat(resolve: &Resolve, ty: Type) -> Vec<FlatType> {
    tracing::trace!(?ty, "flattening type");
    match resolve.kind_of(ty) {
        TypeDefKindRef::Primitive(p) => primitive_flat(p),
        TypeDefKindRef::Def(kind) => match despecialize(kind) {
            Despecialized::Record(fields) => fields.iter().flat_map(|f| flat(resolve, f.ty)).collect(),
            Despecialized::Variant(cases) => {
                let payloads = cases.iter().map(|c| c.ty.map(|t| flat(resolve, t)).unwrap_or_default());
                variant_flat(payloads)
            }
            Despecialized::Unchanged => unchanged_flat(resolve, kind),
        },
    }
}

fn primitive_flat(ty: Type) -> Vec<FlatType> {
    match ty {
        Type::Bool
        | Type::S8
        | Type::U8
        | Type::S16
        | Type::U16
        | Type::S32
        | Type::U32
        | Type::Char => vec![FlatType::U32],
        Type::S64 | Type::U64 => vec![FlatType::U64],
        Type::F32 => vec![FlatType::F32],
        Type::F64 => vec![FlatType::F64],
        Type::String => vec![FlatType::Pointer, FlatType::U32],
        Type::Id(_) => unreachable!("primitive_flat called with a TypeDef reference"),
    }
}

fn unchanged_flat(resolve: &Resolve, kind: &TypeDefKind) -> Vec<FlatType> {
    match kind {
        TypeDefKind::Bool
        | TypeDefKind::S8
        | TypeDefKind::U8
        | TypeDefKind::S16
        | TypeDefKind::U16
        | TypeDefKind::S32
        | TypeDefKind::U32
        | TypeDefKind::Char => vec![FlatType::U32],
        TypeDefKind::S64 | TypeDefKind::U64 => vec![FlatType::U64],
        TypeDefKind::F32 => vec![FlatType::F32],
        TypeDefKind::F64 => vec![FlatType::F64],
        TypeDefKind::String | TypeDefKind::List(_) => vec![FlatType::Pointer, FlatType::U32],
        TypeDefKind::Record(r) => r.fields.iter().flat_map(|f| flat(resolve, f.ty)).collect(),
        TypeDefKind::Variant(v) => {
            let payloads = v.cases.iter().map(|c| c.ty.map(|t| flat(resolve, t)).unwrap_or_default());
            variant_flat(payloads)
        }
        TypeDefKind::Flags(f) => {
            let words = flags_layout(f.flags.len()).size / 4;
            vec![FlatType::U32; words.max(1) as usize]
        }
        TypeDefKind::Resource | TypeDefKind::Own(_) | TypeDefKind::Borrow(_) => vec![FlatType::U32],
        TypeDefKind::Future(_) | TypeDefKind::Stream(_) => Vec::new(),
        TypeDefKind::Pointer(_) => vec![FlatType::Pointer],
        TypeDefKind::Enum(_) | TypeDefKind::Tuple(_) | TypeDefKind::Option(_) | TypeDefKind::Result(_) => {
            unreachable!("specialized kind should have been despecialized")
        }
        TypeDefKind::Type(_) => unreachable!("alias kind should have been chased by Resolve::kind_of"),
    }
}

/// `flat(variant) = flat(disc) ++ join-over-cases`: the discriminant is
/// always a single `u32` core value, followed by the elementwise join of
/// every case's own flattened payload.
fn variant_flat(payloads: impl Iterator<Item = Vec<FlatType>>) -> Vec<FlatType> {
    let mut joined = Vec::new();
    for payload in payloads {
        joined = join_seq(&joined, &payload);
    }
    let mut result = Vec::with_capacity(joined.len() + 1);
    result.push(FlatType::U32);
    result.extend(joined);
    result
}

/// Pairs `a` and `b` elementwise, widening mismatched core types; the
/// shorter sequence is extended verbatim from the tail of the longer one.
fn join_seq(a: &[FlatType], b: &[FlatType]) -> Vec<FlatType> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(&x), Some(&y)) => join(x, y),
            (Some(&x), None) => x,
            (None, Some(&y)) => y,
            (None, None) => unreachable!(),
        })
        .collect()
}

fn join(a: FlatType, b: FlatType) -> FlatType {
    if a == b {
        return a;
    }
    if a.byte_size() == 8 || b.byte_size() == 8 {
        FlatType::U64
    } else {
        FlatType::U32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wit_ir::{decode_str, Id};

    fn first_type_flat(json: &str) -> Vec<FlatType> {
        let resolve = decode_str(json).unwrap();
        let id = resolve.typedefs.iter().next().unwrap().0;
        flat(&resolve, Type::Id(id))
    }

    #[test]
    fn option_f32_flattens_to_u32_f32() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],
            "types":[{"kind":"option","type":"f32"}]}"#;
        assert_eq!(first_type_flat(json), vec![FlatType::U32, FlatType::F32]);
    }

    #[test]
    fn wasi_clocks_datetime_flattens_to_u64_u32() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],
            "types":[{"kind":"record","fields":[
                {"name":"seconds","type":"u64"},
                {"name":"nanoseconds","type":"u32"}
            ]}]}"#;
        assert_eq!(first_type_flat(json), vec![FlatType::U64, FlatType::U32]);
    }

    #[test]
    fn result_string_u32_flattens_to_disc_ptr_or_u32_len() {
        // result<string, u32>: ok arm flattens to [ptr,u32], err arm to [u32].
        // join([ptr,u32],[u32]) = [join(ptr,u32), u32] = [u32, u32] (neither
        // 8-byte, so the pointer/err slot widens to a plain u32); preceded
        // by the discriminant.
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],
            "types":[{"kind":"result","ok":"string","err":"u32"}]}"#;
        assert_eq!(first_type_flat(json), vec![FlatType::U32, FlatType::U32, FlatType::U32]);
    }

    #[test]
    fn despecialize_preserves_flat() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],
            "types":[
                {"kind":"option","type":"f32"},
                {"kind":"variant","cases":[{"name":"none"},{"name":"some","type":"f32"}]}
            ]}"#;
        let resolve = decode_str(json).unwrap();
        let opt = flat(&resolve, Type::Id(Id::from_index(0)));
        let variant = flat(&resolve, Type::Id(Id::from_index(1)));
        assert_eq!(opt, variant);
    }

    mod despecialize_properties {
        use super::*;
        use proptest::prelude::*;

        fn primitive() -> impl Strategy<Value = &'static str> {
            prop_oneof![
                Just("bool"),
                Just("s8"),
                Just("u8"),
                Just("s16"),
                Just("u16"),
                Just("s32"),
                Just("u32"),
                Just("s64"),
                Just("u64"),
                Just("f32"),
                Just("f64"),
                Just("char"),
                Just("string"),
            ]
        }

        proptest! {
            /// `option<T>` must flatten identically to its hand-built
            /// `variant { none, some(T) }`, for every primitive `T`.
            #[test]
            fn option_flat_matches_its_hand_built_variant(prim in primitive()) {
                let json = format!(
                    r#"{{"packages":[],"interfaces":[],"worlds":[],
                        "types":[
                            {{"kind":"option","type":"{prim}"}},
                            {{"kind":"variant","cases":[{{"name":"none"}},{{"name":"some","type":"{prim}"}}]}}
                        ]}}"#
                );
                let resolve = decode_str(&json).unwrap();
                let opt = flat(&resolve, Type::Id(Id::from_index(0)));
                let variant = flat(&resolve, Type::Id(Id::from_index(1)));
                prop_assert_eq!(opt, variant);
            }
        }
    }

    #[test]
    fn join_widens_mismatched_four_byte_types_to_u32() {
        assert_eq!(join(FlatType::Pointer, FlatType::F32), FlatType::U32);
    }

    #[test]
    fn join_widens_any_eight_byte_component_to_u64() {
        assert_eq!(join(FlatType::F64, FlatType::U32), FlatType::U64);
        assert_eq!(join(FlatType::U64, FlatType::F32), FlatType::U64);
    }
}
