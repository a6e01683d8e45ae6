//! Import/export differentiation: splitting interfaces, types and
//! functions that are reachable from both sides of a world so each
//! resulting node has a single direction.

use std::collections::HashSet;

use wit_ir::{Direction, InterfaceId, Resolve, TypeId, TypeOwner, WorldId, WorldItem};

#[derive(Debug, thiserror::Error)]
pub enum DifferentiateError {
    #[error("world `{world}` exports `{name}` as a bare type; types may only be imported")]
    ExportedBareType { world: String, name: String },
}

/// Splits every interface/type/function used as both an import and an
/// export somewhere in `resolve` into distinct, single-direction nodes.
///
/// Runs as two global passes over every world (not two passes per world):
/// first every world's imports are marked `Imported`, then every world's
/// exports are processed, cloning anything already marked `Imported` and
/// marking everything else `Exported` in place. This makes two interfaces
/// sharing an identity across different worlds (one importing it, another
/// exporting it) differentiate correctly, not just a single world that does
/// both itself.
///
/// Idempotent: running this twice produces the same result as running it
/// once, since a second pass only ever re-observes directions it already
/// assigned.
#[tracing::instrument(level = "debug", skip(resolve))]
pub fn differentiate(resolve: &mut Resolve) -> Result<(), DifferentiateError> {
    let world_ids: Vec<WorldId> = resolve.worlds.iter().map(|(id, _)| id).collect();
    let mut imported_interfaces: HashSet<InterfaceId> = HashSet::new();
    tracing::trace!(worlds = world_ids.len(), "pass 1: marking imports");

    for &wid in &world_ids {
        let items: Vec<WorldItem> = resolve.worlds[wid].imports.values().cloned().collect();
        for item in &items {
            mark_imported(resolve, item, &mut imported_interfaces);
        }
        for item in resolve.worlds[wid].imports.values_mut() {
            if let WorldItem::Function(f) = item {
                if f.direction == Direction::Both {
                    f.direction = Direction::Imported;
                }
            }
        }
    }

    tracing::trace!("pass 2: processing exports");
    for &wid in &world_ids {
        let names: Vec<String> = resolve.worlds[wid].exports.keys().cloned().collect();
        for name in names {
            let item = resolve.worlds[wid].exports.get(&name).expect("key just read from this map").clone();
            match item {
                WorldItem::Type(_) => {
                    let world = resolve.worlds[wid].name.clone();
                    return Err(DifferentiateError::ExportedBareType { world, name });
                }
                WorldItem::Function(_) => {
                    if let Some(WorldItem::Function(f)) = resolve.worlds[wid].exports.get_mut(&name) {
                        if f.direction == Direction::Both {
                            f.direction = Direction::Exported;
                        }
                    }
                }
                WorldItem::Interface(id) => {
                    if imported_interfaces.contains(&id) {
                        let clone_id = clone_interface_as_exported(resolve, id);
                        tracing::debug!(?id, ?clone_id, "cloned dual-used interface for export side");
                        resolve.worlds[wid].exports.insert(name, WorldItem::Interface(clone_id));
                    } else {
                        mark_interface_exported(resolve, id);
                    }
                }
            }
        }
    }

    Ok(())
}

fn mark_imported(resolve: &mut Resolve, item: &WorldItem, imported_interfaces: &mut HashSet<InterfaceId>) {
    match item {
        WorldItem::Interface(id) => {
            imported_interfaces.insert(*id);
            for f in resolve.interfaces[*id].functions.values_mut() {
                if f.direction == Direction::Both {
                    f.direction = Direction::Imported;
                }
            }
            for tid in owned_type_ids(resolve, *id) {
                if resolve.typedefs[tid].direction == Direction::Both {
                    resolve.typedefs[tid].direction = Direction::Imported;
                }
            }
        }
        WorldItem::Type(id) => {
            if resolve.typedefs[*id].direction == Direction::Both {
                resolve.typedefs[*id].direction = Direction::Imported;
            }
        }
        WorldItem::Function(_) => {}
    }
}

fn mark_interface_exported(resolve: &mut Resolve, id: InterfaceId) {
    for f in resolve.interfaces[id].functions.values_mut() {
        if f.direction == Direction::Both {
            f.direction = Direction::Exported;
        }
    }
    for tid in owned_type_ids(resolve, id) {
        if resolve.typedefs[tid].direction == Direction::Both {
            resolve.typedefs[tid].direction = Direction::Exported;
        }
    }
}

fn owned_type_ids(resolve: &Resolve, id: InterfaceId) -> Vec<TypeId> {
    resolve.interfaces[id].typedefs.values().copied().collect()
}

/// Clones `id`'s `Interface` node, marks every function on the clone
/// `Exported`, and allocates it as a new arena entry (scenario: a world
/// both imports and exports the same interface). The original's owned
/// typedefs are still marked `Imported` from pass 1 and still belong to
/// the original interface; a type reachable only through the export side
/// needs its own `Exported` arena entry too, or it would carry just the
/// `Imported` direction while being reachable from the export side. So
/// every owned typedef is cloned the same way the interface itself is,
/// and the clone's `typedefs` map is rewritten to point at the new ids.
fn clone_interface_as_exported(resolve: &mut Resolve, id: InterfaceId) -> InterfaceId {
    let mut clone = resolve.interfaces[id].clone();
    for f in clone.functions.values_mut() {
        f.direction = Direction::Exported;
    }
    let owned: Vec<(String, TypeId)> = clone.typedefs.iter().map(|(name, &tid)| (name.clone(), tid)).collect();

    let clone_id = resolve.interfaces.alloc(clone);

    let mut new_typedefs: wit_ir::OrderedMap<String, TypeId> = wit_ir::OrderedMap::new();
    for (name, tid) in owned {
        let mut typedef = resolve.typedefs[tid].clone();
        typedef.direction = Direction::Exported;
        if typedef.owner == TypeOwner::Interface(id) {
            typedef.owner = TypeOwner::Interface(clone_id);
        }
        let new_tid = resolve.typedefs.alloc(typedef);
        new_typedefs.insert(name, new_tid);
    }
    resolve.interfaces[clone_id].typedefs = new_typedefs;

    clone_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use wit_ir::{decode_str, Id};

    fn world_both_imports_and_exports_interface_x() -> &'static str {
        r#"{"packages":[{"ident":"ns:pkg","interfaces":[["x",0]],"worlds":[["w",0]]}],
            "interfaces":[{
                "name":"x","package":0,"typedefs":[],
                "functions":[{"name":"f","params":[],"results":[]}]
            }],
            "types":[],
            "worlds":[{
                "name":"w","package":0,
                "imports":[["x",{"tag":"interface","interface":0}]],
                "exports":[["x",{"tag":"interface","interface":0}]]
            }]
        }"#
    }

    #[test_log::test]
    fn dual_used_interface_is_cloned_for_the_export_side() {
        let mut resolve = decode_str(world_both_imports_and_exports_interface_x()).unwrap();
        differentiate(&mut resolve).unwrap();

        assert_eq!(resolve.interfaces.len(), 2);
        let import_id = Id::from_index(0);
        let world = resolve.worlds.values().next().unwrap();
        let WorldItem::Interface(export_id) = world.exports.get("x").unwrap() else { panic!("expected interface") };
        assert_ne!(*export_id, import_id);

        let imported = &resolve.interfaces[import_id];
        assert!(imported.functions.values().all(|f| f.direction == Direction::Imported));
        let exported = &resolve.interfaces[*export_id];
        assert!(exported.functions.values().all(|f| f.direction == Direction::Exported));

        assert_eq!(resolve.interfaces[import_id].package, resolve.interfaces[*export_id].package);
    }

    #[test]
    fn dual_used_interfaces_owned_typedefs_are_cloned_and_exported_too() {
        let json = r#"{"packages":[{"ident":"ns:pkg","interfaces":[["x",0]],"worlds":[["w",0]]}],
            "interfaces":[{
                "name":"x","package":0,
                "typedefs":[["point",0]],
                "functions":[{"name":"f","params":[{"name":"p","type":1}],"results":[]}]
            }],
            "types":[
                {"name":"point","owner":{"interface":0},"kind":"record","fields":[
                    {"name":"x","type":"u32"},
                    {"name":"y","type":"u32"}
                ]}
            ],
            "worlds":[{
                "name":"w","package":0,
                "imports":[["x",{"tag":"interface","interface":0}]],
                "exports":[["x",{"tag":"interface","interface":0}]]
            }]
        }"#;
        let mut resolve = decode_str(json).unwrap();
        differentiate(&mut resolve).unwrap();

        let import_id = Id::from_index(0);
        let world = resolve.worlds.values().next().unwrap();
        let WorldItem::Interface(export_id) = world.exports.get("x").unwrap() else { panic!("expected interface") };

        let imported_tid = *resolve.interfaces[import_id].typedefs.get("point").unwrap();
        let exported_tid = *resolve.interfaces[*export_id].typedefs.get("point").unwrap();
        assert_ne!(imported_tid, exported_tid, "owned typedef must get its own arena entry on the export side");

        assert_eq!(resolve.typedefs[imported_tid].direction, Direction::Imported);
        assert_eq!(resolve.typedefs[exported_tid].direction, Direction::Exported);

        match &resolve.typedefs[exported_tid].kind {
            wit_ir::TypeDefKind::Record(r) => assert_eq!(r.fields.len(), 2),
            other => panic!("expected record, got {other:?}"),
        }
        assert_eq!(resolve.typedefs[exported_tid].owner, TypeOwner::Interface(*export_id));
    }

    #[test]
    fn differentiate_is_idempotent() {
        let mut resolve = decode_str(world_both_imports_and_exports_interface_x()).unwrap();
        differentiate(&mut resolve).unwrap();
        let snapshot_len = resolve.interfaces.len();
        differentiate(&mut resolve).unwrap();
        assert_eq!(resolve.interfaces.len(), snapshot_len);
    }

    #[test]
    fn exported_bare_type_is_rejected() {
        let json = r#"{"packages":[{"ident":"ns:pkg","interfaces":[],"worlds":[["w",0]]}],
            "interfaces":[],
            "types":[{"kind":"u32"}],
            "worlds":[{
                "name":"w","package":0,
                "imports":[],
                "exports":[["t",{"tag":"type","type":0}]]
            }]
        }"#;
        let mut resolve = decode_str(json).unwrap();
        let err = differentiate(&mut resolve).unwrap_err();
        match err {
            DifferentiateError::ExportedBareType { world, name } => {
                assert_eq!(world, "w");
                assert_eq!(name, "t");
            }
        }
    }

    #[test]
    fn export_only_interface_is_marked_exported_without_cloning() {
        let json = r#"{"packages":[{"ident":"ns:pkg","interfaces":[["x",0]],"worlds":[["w",0]]}],
            "interfaces":[{
                "name":"x","package":0,"typedefs":[],
                "functions":[{"name":"f","params":[],"results":[]}]
            }],
            "types":[],
            "worlds":[{
                "name":"w","package":0,
                "imports":[],
                "exports":[["x",{"tag":"interface","interface":0}]]
            }]
        }"#;
        let mut resolve = decode_str(json).unwrap();
        differentiate(&mut resolve).unwrap();
        assert_eq!(resolve.interfaces.len(), 1);
        let iface = &resolve.interfaces[Id::from_index(0)];
        assert!(iface.functions.values().all(|f| f.direction == Direction::Exported));
    }
}
