//! Function shaping: turning a function's logical params/results into the
//! physical param/result list a core Wasm export or import actually uses.

use wit_ir::{Direction, Docs, Field, Function, FunctionKind, Param, Record, Resolve, Stability, Type, TypeDef, TypeDefKind, TypeOwner};

use crate::flatten::flat;
use crate::predicates::has_pointer;

/// Past this many flattened core values, params collapse into one pointer.
pub const MAX_FLAT_PARAMS: usize = 16;
/// Past this many flattened core values, results collapse into one pointer.
pub const MAX_FLAT_RESULTS: usize = 1;

/// Which side of the call this shaping is for: an export lifts core values
/// up to WIT values, an import lowers WIT values down to core ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    Lifted,
    Lowered,
}

/// The physical signature of a function, plus its post-return companion if
/// one is required.
#[derive(Debug, Clone)]
pub struct Shaped {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub post_return: Option<Function>,
}

/// Allocates an anonymous `TypeDef` with no owner -- these are synthesized
/// purely for ABI bookkeeping and never appear in a package's declared
/// typedefs.
fn alloc_anonymous(resolve: &mut Resolve, kind: TypeDefKind) -> Type {
    let id = resolve.typedefs.alloc(TypeDef {
        name: None,
        kind,
        owner: TypeOwner::None,
        stability: Stability::Unknown,
        docs: Docs::none(),
        direction: Direction::default(),
    });
    Type::Id(id)
}

/// Collapses `params` into a single pointer type, wrapping either the sole
/// param's type directly or an anonymous record of every param.
fn compound_pointer(resolve: &mut Resolve, params: &[Param]) -> Type {
    let pointee = match params {
        [single] => single.ty,
        _ => alloc_anonymous(
            resolve,
            TypeDefKind::Record(Record {
                fields: params.iter().map(|p| Field { name: p.name.clone(), ty: p.ty, docs: Docs::none() }).collect(),
            }),
        ),
    };
    alloc_anonymous(resolve, TypeDefKind::Pointer(pointee))
}

fn shape_params(resolve: &mut Resolve, params: &[Param]) -> Vec<Param> {
    let flat_count: usize = params.iter().map(|p| flat(resolve, p.ty).len()).sum();
    if flat_count <= MAX_FLAT_PARAMS {
        return params.to_vec();
    }
    tracing::trace!(flat_count, params = params.len(), "collapsing params into a compound pointer");
    vec![Param { name: "arg".to_string(), ty: compound_pointer(resolve, params) }]
}

/// Shapes `func`'s logical params/results into a physical signature,
/// allocating any anonymous compound/pointer typedefs the shaping needs.
#[tracing::instrument(level = "trace", skip(resolve, func), fields(name = %func.name))]
pub fn shape(resolve: &mut Resolve, func: &Function, direction: CallDirection) -> Shaped {
    let params = shape_params(resolve, &func.params);

    let flat_result_count: usize = func.results.iter().map(|r| flat(resolve, r.ty).len()).sum();
    let (params, results) = if flat_result_count <= MAX_FLAT_RESULTS {
        (params, func.results.clone())
    } else {
        let ptr = compound_pointer(resolve, &func.results);
        match direction {
            CallDirection::Lifted => (params, vec![Param { name: "result".to_string(), ty: ptr }]),
            CallDirection::Lowered => {
                let mut params = params;
                params.push(Param { name: "result".to_string(), ty: ptr });
                (params, Vec::new())
            }
        }
    };

    let needs_post_return = direction == CallDirection::Lifted && results.iter().any(|r| has_pointer(resolve, r.ty));
    let post_return = needs_post_return.then(|| Function {
        name: format!("cabi_post_{}", func.name),
        kind: FunctionKind::Freestanding,
        params: results.clone(),
        results: Vec::new(),
        stability: Stability::Unknown,
        docs: Docs::none(),
        direction: func.direction,
    });

    Shaped { params, results, post_return }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wit_ir::decode_str;

    fn function_named(resolve: &Resolve, name: &str) -> Function {
        resolve
            .interfaces
            .values()
            .flat_map(|i| i.functions.values())
            .find(|f| f.name == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn foo_string_and_list_params_stay_physical_and_result_goes_out_pointer() {
        // foo(a: string, b: list<u8>) -> result<string, u32>; the result type
        // is given its own top-level slot since the decoder only accepts
        // top-level type indices, never inline anonymous objects.
        let json = r#"{"packages":[{"ident":"ns:pkg","interfaces":[["i",0]],"worlds":[]}],
            "worlds":[],
            "types":[
                {"kind":"list","type":"u8"},
                {"kind":"result","ok":"string","err":"u32"}
            ],
            "interfaces":[{
                "name":"i","package":0,"typedefs":[],
                "functions":[{
                    "name":"foo",
                    "params":[{"name":"a","type":"string"},{"name":"b","type":0}],
                    "results":[{"name":"r","type":1}]
                }]
            }]
        }"#;
        let mut resolve = decode_str(json).unwrap();
        let func = function_named(&resolve, "foo");

        let flat_params: usize = func.params.iter().map(|p| flat(&resolve, p.ty).len()).sum();
        assert_eq!(flat_params, 4);
        let flat_results: usize = func.results.iter().map(|r| flat(&resolve, r.ty).len()).sum();
        assert_eq!(flat_results, 3);

        let lowered = shape(&mut resolve, &func, CallDirection::Lowered);
        assert_eq!(lowered.params.len(), 3);
        assert!(lowered.results.is_empty());

        let lifted = shape(&mut resolve, &func, CallDirection::Lifted);
        assert_eq!(lifted.params.len(), 2);
        assert_eq!(lifted.results.len(), 1);
        assert!(lifted.post_return.is_some());
        let post = lifted.post_return.unwrap();
        assert_eq!(post.name, "cabi_post_foo");
        assert_eq!(post.params, lifted.results);
    }

    #[test]
    fn small_signature_is_untouched() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],"types":[]}"#;
        let mut resolve = decode_str(json).unwrap();
        let func = Function {
            name: "add".to_string(),
            kind: FunctionKind::Freestanding,
            params: vec![Param { name: "a".to_string(), ty: Type::U32 }, Param { name: "b".to_string(), ty: Type::U32 }],
            results: vec![Param { name: "".to_string(), ty: Type::U32 }],
            stability: Stability::Unknown,
            docs: Docs::none(),
            direction: Direction::default(),
        };
        let shaped = shape(&mut resolve, &func, CallDirection::Lifted);
        assert_eq!(shaped.params, func.params);
        assert_eq!(shaped.results, func.results);
        assert!(shaped.post_return.is_none());
    }

    #[test]
    fn seventeen_u64_params_collapse_to_one_pointer() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],"types":[]}"#;
        let mut resolve = decode_str(json).unwrap();
        let params: Vec<Param> = (0..17).map(|i| Param { name: format!("p{i}"), ty: Type::U64 }).collect();
        let func = Function {
            name: "many".to_string(),
            kind: FunctionKind::Freestanding,
            params,
            results: Vec::new(),
            stability: Stability::Unknown,
            docs: Docs::none(),
            direction: Direction::default(),
        };
        let shaped = shape(&mut resolve, &func, CallDirection::Lowered);
        assert_eq!(shaped.params.len(), 1);
        match resolve.kind_of(shaped.params[0].ty) {
            wit_ir::TypeDefKindRef::Def(TypeDefKind::Pointer(inner)) => match resolve.kind_of(*inner) {
                wit_ir::TypeDefKindRef::Def(TypeDefKind::Record(r)) => assert_eq!(r.fields.len(), 17),
                other => panic!("expected pointer to an anonymous record, got {other:?}"),
            },
            other => panic!("expected a pointer param, got {other:?}"),
        }
    }
}
