//! Size and alignment for every WIT type, per the Canonical ABI.

use wit_ir::{Case, Field, Resolve, Result_, Type, TypeDefKind, TypeDefKindRef};

/// Byte size and alignment (a power of two) of a type in linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub size: u32,
    pub align: u32,
}

impl Layout {
    const fn leaf(size: u32) -> Layout {
        Layout { size, align: size }
    }
}

/// Rounds `offset` up to the next multiple of `align` (`align` must be >= 1).
pub fn align_to(offset: u32, align: u32) -> u32 {
    debug_assert!(align >= 1);
    (offset + align - 1) / align * align
}

/// The canonical general kind a specialized `option`/`result`/`enum`/`tuple`
/// lowers to for layout and flattening purposes. Plain kinds (already
/// canonical, or leaves) report `Unchanged`.
pub enum Despecialized {
    Record(Vec<Field>),
    Variant(Vec<Case>),
    Unchanged,
}

/// `despecialize(kind) -> kind`: rewrites a specialized kind into its
/// canonical `record`/`variant` form. Returns the input unchanged for every
/// kind that is not one of the four specialized ones.
pub fn despecialize(kind: &TypeDefKind) -> Despecialized {
    match kind {
        TypeDefKind::Tuple(t) => Despecialized::Record(
            t.types
                .iter()
                .enumerate()
                .map(|(i, ty)| Field { name: i.to_string(), ty: *ty, docs: Default::default() })
                .collect(),
        ),
        TypeDefKind::Enum(e) => Despecialized::Variant(
            e.cases
                .iter()
                .map(|c| Case { name: c.name.clone(), ty: None, docs: c.docs.clone() })
                .collect(),
        ),
        TypeDefKind::Option(inner) => Despecialized::Variant(vec![
            Case { name: "none".to_string(), ty: None, docs: Default::default() },
            Case { name: "some".to_string(), ty: Some(*inner), docs: Default::default() },
        ]),
        TypeDefKind::Result(Result_ { ok, err }) => Despecialized::Variant(vec![
            Case { name: "ok".to_string(), ty: *ok, docs: Default::default() },
            Case { name: "err".to_string(), ty: *err, docs: Default::default() },
        ]),
        _ => Despecialized::Unchanged,
    }
}

/// The discriminant width for a variant/enum with `case_count` cases: the
/// smallest unsigned integer type that can represent every case.
pub fn discriminant_size(case_count: usize) -> u32 {
    if case_count <= 256 {
        1
    } else if case_count <= 65536 {
        2
    } else {
        4
    }
}

pub fn layout(resolve: &Resolve, ty: Type) -> Layout {
    tracing::trace!(?ty, "computing layout");
    match resolve.kind_of(ty) {
        TypeDefKindRef::Primitive(p) => primitive_layout(p),
        TypeDefKindRef::Def(kind) => match despecialize(kind) {
            Despecialized::Record(fields) => record_layout(resolve, &fields),
            Despecialized::Variant(cases) => variant_layout(resolve, &cases),
            Despecialized::Unchanged => unchanged_layout(resolve, kind),
        },
    }
}

fn primitive_layout(ty: Type) -> Layout {
    match ty {
        Type::Bool | Type::S8 | Type::U8 => Layout::leaf(1),
        Type::S16 | Type::U16 => Layout::leaf(2),
        Type::S32 | Type::U32 | Type::F32 | Type::Char => Layout::leaf(4),
        Type::S64 | Type::U64 | Type::F64 => Layout::leaf(8),
        Type::String => Layout { size: 8, align: 4 },
        Type::Id(_) => unreachable!("primitive_layout called with a TypeDef reference"),
    }
}

fn unchanged_layout(resolve: &Resolve, kind: &TypeDefKind) -> Layout {
    match kind {
        TypeDefKind::Bool | TypeDefKind::S8 | TypeDefKind::U8 => Layout::leaf(1),
        TypeDefKind::S16 | TypeDefKind::U16 => Layout::leaf(2),
        TypeDefKind::S32 | TypeDefKind::U32 | TypeDefKind::F32 | TypeDefKind::Char => Layout::leaf(4),
        TypeDefKind::S64 | TypeDefKind::U64 | TypeDefKind::F64 => Layout::leaf(8),
        TypeDefKind::String | TypeDefKind::List(_) => Layout { size: 8, align: 4 },
        TypeDefKind::Record(r) => record_layout(resolve, &r.fields),
        TypeDefKind::Variant(v) => variant_layout(resolve, &v.cases),
        TypeDefKind::Flags(f) => flags_layout(f.flags.len()),
        TypeDefKind::Resource | TypeDefKind::Own(_) | TypeDefKind::Borrow(_) => Layout::leaf(4),
        // Upstream has not finalized future/stream layout; treated as
        // opaque. align is clamped to 1 (not 0) so `align_to` stays sound.
        TypeDefKind::Future(_) | TypeDefKind::Stream(_) => Layout { size: 0, align: 1 },
        TypeDefKind::Pointer(_) => Layout::leaf(4),
        TypeDefKind::Enum(_) | TypeDefKind::Tuple(_) | TypeDefKind::Option(_) | TypeDefKind::Result(_) => {
            unreachable!("specialized kind should have been despecialized")
        }
        TypeDefKind::Type(_) => unreachable!("alias kind should have been chased by Resolve::kind_of"),
    }
}

pub fn record_layout(resolve: &Resolve, fields: &[Field]) -> Layout {
    let mut size = 0u32;
    let mut align = 1u32;
    for field in fields {
        let l = layout(resolve, field.ty);
        size = align_to(size, l.align) + l.size;
        align = align.max(l.align);
    }
    Layout { size: align_to(size, align), align }
}

pub fn variant_layout(resolve: &Resolve, cases: &[Case]) -> Layout {
    let disc_size = discriminant_size(cases.len());
    let mut max_align = disc_size;
    let mut max_payload = 0u32;
    for case in cases {
        if let Some(ty) = case.ty {
            let l = layout(resolve, ty);
            max_align = max_align.max(l.align);
            max_payload = max_payload.max(l.size);
        }
    }
    let payload_offset = align_to(disc_size, max_align);
    let size = align_to(payload_offset + max_payload, max_align);
    Layout { size, align: max_align }
}

pub fn flags_layout(n: usize) -> Layout {
    if n <= 8 {
        Layout::leaf(1)
    } else if n <= 16 {
        Layout::leaf(2)
    } else {
        let words = n.div_ceil(32) as u32;
        Layout { size: 4 * words, align: 4 }
    }
}
