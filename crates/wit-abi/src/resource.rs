//! Resource helper functions: the four symbolic operations the Canonical
//! ABI defines for every resource type, regardless of what methods the WIT
//! author declared on it.

use wit_ir::{Direction, Docs, Function, FunctionKind, Param, Resolve, Stability, Type, TypeDefKind, TypeId};

/// The four ABI-level helper functions every resource type gets, keyed by
/// the resource's own `TypeId`. `rep` and `handle` are both `u32` at the
/// boundary -- `rep` is the host-side representation, `handle` the
/// component-level index that refers to it.
#[derive(Debug, Clone)]
pub struct ResourceHelpers {
    pub new: Function,
    pub rep: Function,
    pub drop: Function,
    pub dtor: Function,
}

fn helper(name: String, resource: TypeId, params: Vec<Param>, results: Vec<Param>) -> Function {
    Function {
        name,
        kind: FunctionKind::Static(resource),
        params,
        results,
        stability: Stability::Unknown,
        docs: Docs::none(),
        direction: Direction::default(),
    }
}

/// Builds the four helper descriptors for `resource`. Panics if `resource`'s
/// root kind is not `TypeDefKind::Resource` -- the caller is expected to
/// have checked `Resolve::is_resource` first, since this indicates a
/// programming error rather than malformed input.
pub fn resource_helpers(resolve: &Resolve, resource: TypeId) -> ResourceHelpers {
    let root = resolve.type_root(resource);
    assert!(matches!(&resolve.typedefs[root].kind, TypeDefKind::Resource), "not a resource typedef");
    let name = resolve.typedefs[resource].name.clone().unwrap_or_default();

    let new = helper(
        format!("[resource-new]{name}"),
        resource,
        vec![Param { name: "rep".to_string(), ty: Type::U32 }],
        vec![Param { name: "handle".to_string(), ty: Type::U32 }],
    );
    let rep = helper(
        format!("[resource-rep]{name}"),
        resource,
        vec![Param { name: "handle".to_string(), ty: Type::U32 }],
        vec![Param { name: "rep".to_string(), ty: Type::U32 }],
    );
    let drop = helper(format!("[resource-drop]{name}"), resource, vec![Param { name: "handle".to_string(), ty: Type::U32 }], Vec::new());
    let dtor = helper(format!("[dtor]{name}"), resource, vec![Param { name: "rep".to_string(), ty: Type::U32 }], Vec::new());

    ResourceHelpers { new, rep, drop, dtor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wit_ir::decode_str;

    #[test]
    fn helper_names_and_shapes_match_the_canonical_abi() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],
            "types":[{"name":"stream","kind":"resource"}]}"#;
        let resolve = decode_str(json).unwrap();
        let id = resolve.typedefs.iter().next().unwrap().0;
        let helpers = resource_helpers(&resolve, id);

        assert_eq!(helpers.new.name, "[resource-new]stream");
        assert_eq!(helpers.new.params[0].ty, Type::U32);
        assert_eq!(helpers.new.results[0].ty, Type::U32);

        assert_eq!(helpers.rep.name, "[resource-rep]stream");
        assert_eq!(helpers.drop.name, "[resource-drop]stream");
        assert!(helpers.drop.results.is_empty());
        assert_eq!(helpers.dtor.name, "[dtor]stream");
        assert!(helpers.dtor.results.is_empty());
    }

    #[test]
    #[should_panic(expected = "not a resource typedef")]
    fn panics_on_a_non_resource_typedef() {
        let json = r#"{"packages":[],"interfaces":[],"worlds":[],
            "types":[{"kind":"u32"}]}"#;
        let resolve = decode_str(json).unwrap();
        let id = resolve.typedefs.iter().next().unwrap().0;
        resource_helpers(&resolve, id);
    }
}
