use wit_ir::{decode_str, DecodeError, TypeDefKind};

#[test]
fn empty_document_decodes_to_empty_resolve() {
    let resolve = decode_str(r#"{"worlds":[], "interfaces":[], "types":[], "packages":[]}"#).unwrap();
    assert_eq!(resolve.worlds.len(), 0);
    assert_eq!(resolve.interfaces.len(), 0);
    assert_eq!(resolve.typedefs.len(), 0);
    assert_eq!(resolve.packages.len(), 0);
}

#[test_log::test]
fn decodes_wasi_clocks_wall_clock_datetime() {
    let json = r#"{
        "packages": [
            {"ident": "wasi:clocks@0.2.0", "interfaces": [["wall-clock", 0]], "worlds": []}
        ],
        "interfaces": [
            {
                "name": "wall-clock",
                "package": 0,
                "typedefs": [["datetime", 0]],
                "functions": []
            }
        ],
        "types": [
            {
                "name": "datetime",
                "owner": {"interface": 0},
                "kind": "record",
                "fields": [
                    {"name": "seconds", "type": "u64"},
                    {"name": "nanoseconds", "type": "u32"}
                ]
            }
        ],
        "worlds": []
    }"#;

    let resolve = decode_str(json).unwrap();
    assert_eq!(resolve.packages.len(), 1);
    assert_eq!(resolve.interfaces.len(), 1);
    assert_eq!(resolve.typedefs.len(), 1);

    let pkg = resolve.packages.values().next().unwrap();
    assert_eq!(pkg.ident.to_string(), "wasi:clocks@0.2.0");

    let iface = resolve.interfaces.values().next().unwrap();
    assert_eq!(iface.name.as_deref(), Some("wall-clock"));
    assert_eq!(iface.typedefs.get("datetime").copied(), Some(wit_ir::Id::from_index(0)));

    let datetime = resolve.typedefs.values().next().unwrap();
    assert_eq!(datetime.name.as_deref(), Some("datetime"));
    match &datetime.kind {
        TypeDefKind::Record(r) => {
            assert_eq!(r.fields.len(), 2);
            assert_eq!(r.fields[0].name, "seconds");
            assert_eq!(r.fields[1].name, "nanoseconds");
        }
        other => panic!("expected record, got {other:?}"),
    }
}

#[test]
fn decoding_does_not_itself_reject_a_bare_exported_type() {
    // Rejecting this is the differentiator's job (`ExportedBareType`), not
    // the decoder's: see wit-abi's differentiate tests.
    let json = r#"{
        "packages": [{"ident": "ns:pkg", "interfaces": [], "worlds": [["w", 0]]}],
        "interfaces": [],
        "types": [{"kind": "u32"}],
        "worlds": [{
            "name": "w",
            "package": 0,
            "imports": [],
            "exports": [["t", {"tag": "type", "type": 0}]]
        }]
    }"#;
    let resolve = decode_str(json).unwrap();
    assert_eq!(resolve.worlds.len(), 1);
}

#[test]
fn bad_index_is_reported_with_a_path() {
    let json = r#"{
        "packages": [],
        "interfaces": [{"package": 5, "typedefs": [], "functions": []}],
        "types": [],
        "worlds": []
    }"#;
    let err = decode_str(json).unwrap_err();
    match err {
        DecodeError::BadIndex { array, index, .. } => {
            assert_eq!(array, "packages");
            assert_eq!(index, 5);
        }
        other => panic!("expected BadIndex, got {other:?}"),
    }
}

#[test]
fn unknown_primitive_name_is_rejected() {
    let json = r#"{
        "packages": [],
        "interfaces": [],
        "types": [{"kind": "record", "fields": [{"name": "x", "type": "not-a-real-type"}]}],
        "worlds": []
    }"#;
    let err = decode_str(json).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownPrimitive { .. }), "got {err:?}");
}

#[test]
fn forward_reference_to_a_later_type_is_resolved() {
    // type 0 is an alias for type 1, which is defined afterwards.
    let json = r#"{
        "packages": [],
        "interfaces": [],
        "types": [
            {"kind": "type", "type": 1},
            {"kind": "u32"}
        ],
        "worlds": []
    }"#;
    let resolve = decode_str(json).unwrap();
    let alias = resolve.typedefs.get(wit_ir::Id::from_index(0)).unwrap();
    match &alias.kind {
        TypeDefKind::Type(target) => assert_eq!(*target, wit_ir::Id::from_index(1)),
        other => panic!("expected alias, got {other:?}"),
    }
}
