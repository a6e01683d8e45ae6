//! A canonical WIT-text pretty printer, used only as a debugging aid:
//! there is no WIT-text parser in this crate, so printing is one-way.
//! Determinism is the only testable property -- printing the same
//! [`Resolve`] twice always yields the same bytes.

use wit_ir::{Function, FunctionKind, InterfaceId, PackageId, Resolve, Type, TypeDefKind, TypeId, WorldId, WorldItem};

/// Renders every package (and its interfaces and worlds) in arena order.
pub fn print_resolve(resolve: &Resolve) -> String {
    let mut out = String::new();
    for (id, _) in resolve.packages.iter() {
        out.push_str(&print_package(resolve, id));
    }
    out
}

pub fn print_package(resolve: &Resolve, id: PackageId) -> String {
    let pkg = &resolve.packages[id];
    let mut out = format!("package {};\n\n", pkg.ident);
    for (_, &iface_id) in pkg.interfaces.iter() {
        out.push_str(&print_interface(resolve, iface_id));
        out.push('\n');
    }
    for (_, &world_id) in pkg.worlds.iter() {
        out.push_str(&print_world(resolve, world_id));
        out.push('\n');
    }
    out
}

pub fn print_interface(resolve: &Resolve, id: InterfaceId) -> String {
    let iface = &resolve.interfaces[id];
    let name = iface.name.as_deref().unwrap_or("<anonymous>");
    let mut out = format!("interface {name} {{\n");
    for (_, &tid) in iface.typedefs.iter() {
        out.push_str(&indent(&print_typedef_decl(resolve, tid)));
    }
    for (_, func) in iface.functions.iter() {
        out.push_str(&indent(&print_function_decl(resolve, func)));
    }
    out.push_str("}\n");
    out
}

pub fn print_world(resolve: &Resolve, id: WorldId) -> String {
    let world = &resolve.worlds[id];
    let mut out = format!("world {} {{\n", world.name);
    for (name, item) in world.imports.iter() {
        out.push_str(&indent(&format!("import {}: {};\n", name, print_world_item(resolve, item))));
    }
    for (name, item) in world.exports.iter() {
        out.push_str(&indent(&format!("export {}: {};\n", name, print_world_item(resolve, item))));
    }
    out.push_str("}\n");
    out
}

fn print_world_item(resolve: &Resolve, item: &WorldItem) -> String {
    match item {
        WorldItem::Interface(id) => resolve.interface_name(*id),
        WorldItem::Type(id) => type_name_or_inline(resolve, *id),
        WorldItem::Function(f) => print_function_decl(resolve, f).trim_end_matches(['\n', ';']).to_string(),
    }
}

fn print_typedef_decl(resolve: &Resolve, id: TypeId) -> String {
    let def = &resolve.typedefs[id];
    let name = def.name.as_deref().unwrap_or("<anonymous>");
    match &def.kind {
        TypeDefKind::Record(r) => {
            let mut out = format!("record {name} {{\n");
            for field in &r.fields {
                out.push_str(&format!("    {}: {},\n", field.name, print_type(resolve, field.ty)));
            }
            out.push_str("}\n");
            out
        }
        TypeDefKind::Flags(f) => {
            let mut out = format!("flags {name} {{\n");
            for flag in &f.flags {
                out.push_str(&format!("    {},\n", flag.name));
            }
            out.push_str("}\n");
            out
        }
        TypeDefKind::Enum(e) => {
            let mut out = format!("enum {name} {{\n");
            for case in &e.cases {
                out.push_str(&format!("    {},\n", case.name));
            }
            out.push_str("}\n");
            out
        }
        TypeDefKind::Variant(v) => {
            let mut out = format!("variant {name} {{\n");
            for case in &v.cases {
                match case.ty {
                    Some(ty) => out.push_str(&format!("    {}({}),\n", case.name, print_type(resolve, ty))),
                    None => out.push_str(&format!("    {},\n", case.name)),
                }
            }
            out.push_str("}\n");
            out
        }
        TypeDefKind::Resource => format!("resource {name};\n"),
        _ => format!("type {name} = {};\n", print_typedef_kind(resolve, &def.kind)),
    }
}

fn type_name_or_inline(resolve: &Resolve, id: TypeId) -> String {
    match &resolve.typedefs[id].name {
        Some(name) => name.clone(),
        None => print_typedef_kind(resolve, &resolve.typedefs[id].kind),
    }
}

pub fn print_type(resolve: &Resolve, ty: Type) -> String {
    match ty {
        Type::Bool => "bool".to_string(),
        Type::S8 => "s8".to_string(),
        Type::U8 => "u8".to_string(),
        Type::S16 => "s16".to_string(),
        Type::U16 => "u16".to_string(),
        Type::S32 => "s32".to_string(),
        Type::U32 => "u32".to_string(),
        Type::S64 => "s64".to_string(),
        Type::U64 => "u64".to_string(),
        Type::F32 => "f32".to_string(),
        Type::F64 => "f64".to_string(),
        Type::Char => "char".to_string(),
        Type::String => "string".to_string(),
        Type::Id(id) => type_name_or_inline(resolve, id),
    }
}

fn print_typedef_kind(resolve: &Resolve, kind: &TypeDefKind) -> String {
    match kind {
        TypeDefKind::Bool
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
        | TypeDefKind::String => kind.as_str().to_string(),
        TypeDefKind::Tuple(t) => format!("tuple<{}>", join(resolve, &t.types)),
        TypeDefKind::List(t) => format!("list<{}>", print_type(resolve, *t)),
        TypeDefKind::Option(t) => format!("option<{}>", print_type(resolve, *t)),
        TypeDefKind::Result(r) => match (r.ok, r.err) {
            (Some(ok), Some(err)) => format!("result<{}, {}>", print_type(resolve, ok), print_type(resolve, err)),
            (Some(ok), None) => format!("result<{}>", print_type(resolve, ok)),
            (None, Some(err)) => format!("result<_, {}>", print_type(resolve, err)),
            (None, None) => "result".to_string(),
        },
        TypeDefKind::Own(id) => format!("own<{}>", type_name_or_inline(resolve, *id)),
        TypeDefKind::Borrow(id) => format!("borrow<{}>", type_name_or_inline(resolve, *id)),
        TypeDefKind::Future(Some(t)) => format!("future<{}>", print_type(resolve, *t)),
        TypeDefKind::Future(None) => "future".to_string(),
        TypeDefKind::Stream(s) => match (s.element, s.end) {
            (Some(e), Some(end)) => format!("stream<{}, {}>", print_type(resolve, e), print_type(resolve, end)),
            (Some(e), None) => format!("stream<{}>", print_type(resolve, e)),
            _ => "stream".to_string(),
        },
        TypeDefKind::Type(id) => type_name_or_inline(resolve, *id),
        TypeDefKind::Pointer(t) => format!("pointer<{}>", print_type(resolve, *t)),
        TypeDefKind::Record(_) | TypeDefKind::Flags(_) | TypeDefKind::Enum(_) | TypeDefKind::Variant(_) => {
            format!("<inline {}>", kind.as_str())
        }
        TypeDefKind::Resource => "resource".to_string(),
    }
}

fn join(resolve: &Resolve, types: &[Type]) -> String {
    types.iter().map(|t| print_type(resolve, *t)).collect::<Vec<_>>().join(", ")
}

fn print_function_decl(resolve: &Resolve, func: &Function) -> String {
    let prefix = match func.kind {
        FunctionKind::Freestanding => String::new(),
        FunctionKind::Method(_) => "[method] ".to_string(),
        FunctionKind::Static(_) => "[static] ".to_string(),
        FunctionKind::Constructor(_) => "[constructor] ".to_string(),
    };
    let params = func.params.iter().map(|p| format!("{}: {}", p.name, print_type(resolve, p.ty))).collect::<Vec<_>>().join(", ");
    let mut out = format!("{prefix}{}: func({params})", func.name);
    match func.results.as_slice() {
        [] => {}
        [single] if single.name.is_empty() => {
            out.push_str(&format!(" -> {}", print_type(resolve, single.ty)));
        }
        results => {
            let named = results.iter().map(|r| format!("{}: {}", r.name, print_type(resolve, r.ty))).collect::<Vec<_>>().join(", ");
            out.push_str(&format!(" -> ({named})"));
        }
    }
    out.push_str(";\n");
    out
}

fn indent(block: &str) -> String {
    block.lines().map(|line| format!("    {line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wit_ir::decode_str;

    fn clocks_json() -> &'static str {
        r#"{"packages":[{"ident":"wasi:clocks@0.2.0","interfaces":[["wall-clock",0]],"worlds":[]}],
            "interfaces":[{
                "name":"wall-clock","package":0,
                "typedefs":[["datetime",0]],
                "functions":[{"name":"now","params":[],"results":[{"name":"","type":0}]}]
            }],
            "types":[{"kind":"record","fields":[
                {"name":"seconds","type":"u64"},
                {"name":"nanoseconds","type":"u32"}
            ]}],
            "worlds":[]
        }"#
    }

    #[test]
    fn printing_is_deterministic() {
        let resolve = decode_str(clocks_json()).unwrap();
        let first = print_resolve(&resolve);
        let second = print_resolve(&resolve);
        assert_eq!(first, second);
    }

    #[test]
    fn record_and_function_render_in_declaration_order() {
        let resolve = decode_str(clocks_json()).unwrap();
        let text = print_resolve(&resolve);
        assert!(text.contains("package wasi:clocks@0.2.0;"));
        assert!(text.contains("record datetime {"));
        assert!(text.contains("seconds: u64,"));
        assert!(text.contains("nanoseconds: u32,"));
        assert!(text.contains("now: func() -> datetime;"));
    }
}
