use semver::Version;
use serde_json::Value;

use super::json::{as_array, as_index, as_object, as_str, field, opt_field, unexpected, Path};
use super::DecodeError;
use crate::arena::Id;
use crate::docs::Docs;
use crate::function::{Function, FunctionKind, Param};
use crate::ident::PackageIdent;
use crate::ordered_map::{insert_unique, OrderedMap};
use crate::resolve::{Interface, InterfaceId, Package, PackageId, Resolve, World, WorldId, WorldItem};
use crate::stability::Stability;
use crate::types::{
    Case, Direction, Enum, EnumCase, Field, Flag, Flags, Record, Result_, Stream, Tuple, Type, TypeDef, TypeDefKind,
    TypeId, TypeOwner, Variant,
};

/// Depth-first walker that materializes a [`Resolve`] from a parsed JSON
/// value tree. One `Builder` is used per [`super::decode`] call.
pub struct Builder {
    resolve: Resolve,
}

fn placeholder_typedef() -> TypeDef {
    TypeDef {
        name: None,
        kind: TypeDefKind::Bool,
        owner: TypeOwner::None,
        stability: Stability::Unknown,
        docs: Docs::none(),
        direction: Direction::default(),
    }
}

fn placeholder_interface() -> Interface {
    Interface {
        name: None,
        typedefs: OrderedMap::new(),
        functions: OrderedMap::new(),
        package: Id::from_index(0),
        stability: Stability::Unknown,
        docs: Docs::none(),
    }
}

fn placeholder_world() -> World {
    World {
        name: String::new(),
        imports: OrderedMap::new(),
        exports: OrderedMap::new(),
        package: Id::from_index(0),
        stability: Stability::Unknown,
        docs: Docs::none(),
    }
}

fn placeholder_package() -> Package {
    Package {
        ident: PackageIdent {
            namespace: String::new(),
            name: String::new(),
            extension: None,
            version: None,
        },
        interfaces: OrderedMap::new(),
        worlds: OrderedMap::new(),
        docs: Docs::none(),
    }
}

impl Builder {
    pub fn new() -> Self {
        Builder { resolve: Resolve::new() }
    }

    pub fn build(mut self, root: &Value) -> Result<Resolve, DecodeError> {
        let path = Path::root();
        let obj = as_object(root, &path)?;

        let package_items = items_of(obj, &path, "packages")?;
        let interface_items = items_of(obj, &path, "interfaces")?;
        let type_items = items_of(obj, &path, "types")?;
        let world_items = items_of(obj, &path, "worlds")?;

        // Pre-size every arena before decoding any content: every index
        // reference appearing anywhere in the document is valid the moment
        // the corresponding top-level array is known, regardless of which
        // order the four arrays are themselves processed in.
        self.resolve.typedefs.ensure_len(type_items.len(), placeholder_typedef);
        self.resolve.interfaces.ensure_len(interface_items.len(), placeholder_interface);
        self.resolve.worlds.ensure_len(world_items.len(), placeholder_world);
        self.resolve.packages.ensure_len(package_items.len(), placeholder_package);

        for (i, item) in type_items.iter().enumerate() {
            let p = path.field("types").index(i);
            let def = self.decode_typedef(item, &p)?;
            self.resolve.typedefs[Id::from_index(i as u32)] = def;
        }
        for (i, item) in interface_items.iter().enumerate() {
            let p = path.field("interfaces").index(i);
            let iface = self.decode_interface(item, &p)?;
            self.resolve.interfaces[Id::from_index(i as u32)] = iface;
        }
        for (i, item) in world_items.iter().enumerate() {
            let p = path.field("worlds").index(i);
            let world = self.decode_world(item, &p)?;
            self.resolve.worlds[Id::from_index(i as u32)] = world;
        }
        for (i, item) in package_items.iter().enumerate() {
            let p = path.field("packages").index(i);
            let pkg = self.decode_package(item, &p)?;
            self.resolve.packages[Id::from_index(i as u32)] = pkg;
        }

        Ok(self.resolve)
    }

    // ---- index resolution -------------------------------------------------

    fn type_id(&self, idx: usize, path: &Path) -> Result<TypeId, DecodeError> {
        let len = self.resolve.typedefs.len();
        if idx >= len {
            return Err(DecodeError::BadIndex { path: path.clone(), array: "types", index: idx, len });
        }
        Ok(Id::from_index(idx as u32))
    }

    fn interface_id(&self, idx: usize, path: &Path) -> Result<InterfaceId, DecodeError> {
        let len = self.resolve.interfaces.len();
        if idx >= len {
            return Err(DecodeError::BadIndex { path: path.clone(), array: "interfaces", index: idx, len });
        }
        Ok(Id::from_index(idx as u32))
    }

    fn world_id(&self, idx: usize, path: &Path) -> Result<WorldId, DecodeError> {
        let len = self.resolve.worlds.len();
        if idx >= len {
            return Err(DecodeError::BadIndex { path: path.clone(), array: "worlds", index: idx, len });
        }
        Ok(Id::from_index(idx as u32))
    }

    fn package_id(&self, idx: usize, path: &Path) -> Result<PackageId, DecodeError> {
        let len = self.resolve.packages.len();
        if idx >= len {
            return Err(DecodeError::BadIndex { path: path.clone(), array: "packages", index: idx, len });
        }
        Ok(Id::from_index(idx as u32))
    }

    // ---- leaf decoders ------------------------------------------------------

    fn decode_type_ref(&self, v: &Value, path: &Path) -> Result<Type, DecodeError> {
        match v {
            Value::String(s) => primitive_from_name(s)
                .ok_or_else(|| DecodeError::UnknownPrimitive { path: path.clone(), name: s.clone() }),
            Value::Number(_) => {
                let idx = as_index(v, path)?;
                Ok(Type::Id(self.type_id(idx, path)?))
            }
            _ => Err(unexpected(path, "expected a primitive name or a type index")),
        }
    }

    fn decode_docs(&self, v: Option<&Value>) -> Docs {
        match v.and_then(|v| v.as_object()) {
            Some(obj) => Docs {
                contents: obj.get("contents").and_then(|v| v.as_str()).map(String::from),
            },
            None => Docs::none(),
        }
    }

    fn decode_version(&self, s: &str, path: &Path) -> Result<Version, DecodeError> {
        Version::parse(s).map_err(|_| DecodeError::BadVersion { path: path.clone(), version: s.to_string() })
    }

    fn decode_stability(&self, v: Option<&Value>, path: &Path) -> Result<Stability, DecodeError> {
        let v = match v {
            None => return Ok(Stability::Unknown),
            Some(v) => v,
        };
        let obj = as_object(v, path)?;
        let tag = as_str(field(obj, path, "tag")?, &path.field("tag"))?;
        match tag {
            "unknown" => Ok(Stability::Unknown),
            "stable" => {
                let since = self.decode_version(as_str(field(obj, path, "since")?, &path.field("since"))?, path)?;
                let deprecated = opt_field(obj, "deprecated")
                    .map(|v| self.decode_version(as_str(v, &path.field("deprecated"))?, path))
                    .transpose()?;
                Ok(Stability::Stable { since, deprecated })
            }
            "unstable" => {
                let feature = as_str(field(obj, path, "feature")?, &path.field("feature"))?.to_string();
                let deprecated = opt_field(obj, "deprecated")
                    .map(|v| self.decode_version(as_str(v, &path.field("deprecated"))?, path))
                    .transpose()?;
                Ok(Stability::Unstable { feature, deprecated })
            }
            other => Err(unexpected(path, format!("unknown stability tag `{other}`"))),
        }
    }

    fn decode_owner(&self, v: Option<&Value>, path: &Path) -> Result<TypeOwner, DecodeError> {
        let v = match v {
            None => return Ok(TypeOwner::None),
            Some(v) => v,
        };
        let obj = as_object(v, path)?;
        if let Some(w) = opt_field(obj, "world") {
            let idx = as_index(w, &path.field("world"))?;
            return Ok(TypeOwner::World(self.world_id(idx, path)?));
        }
        if let Some(i) = opt_field(obj, "interface") {
            let idx = as_index(i, &path.field("interface"))?;
            return Ok(TypeOwner::Interface(self.interface_id(idx, path)?));
        }
        Err(unexpected(path, "owner object must have a `world` or `interface` field"))
    }

    // ---- typedefs -----------------------------------------------------------

    fn decode_typedef(&mut self, v: &Value, path: &Path) -> Result<TypeDef, DecodeError> {
        let obj = as_object(v, path)?;
        let name = opt_field(obj, "name").map(|v| as_str(v, &path.field("name"))).transpose()?.map(String::from);
        let owner = self.decode_owner(opt_field(obj, "owner"), &path.field("owner"))?;
        let stability = self.decode_stability(opt_field(obj, "stability"), &path.field("stability"))?;
        let docs = self.decode_docs(opt_field(obj, "docs"));
        let kind = self.decode_typedef_kind(obj, path)?;
        Ok(TypeDef { name, kind, owner, stability, docs, direction: Direction::default() })
    }

    fn decode_typedef_kind(
        &mut self,
        obj: &serde_json::Map<String, Value>,
        path: &Path,
    ) -> Result<TypeDefKind, DecodeError> {
        let tag = as_str(field(obj, path, "kind")?, &path.field("kind"))?;
        Ok(match tag {
            "bool" => TypeDefKind::Bool,
            "s8" => TypeDefKind::S8,
            "u8" => TypeDefKind::U8,
            "s16" => TypeDefKind::S16,
            "u16" => TypeDefKind::U16,
            "s32" => TypeDefKind::S32,
            "u32" => TypeDefKind::U32,
            "s64" => TypeDefKind::S64,
            "u64" => TypeDefKind::U64,
            "f32" => TypeDefKind::F32,
            "f64" => TypeDefKind::F64,
            "char" => TypeDefKind::Char,
            "string" => TypeDefKind::String,
            "record" => TypeDefKind::Record(Record { fields: self.decode_fields(obj, path)? }),
            "tuple" => TypeDefKind::Tuple(Tuple { types: self.decode_type_list(obj, path, "types")? }),
            "flags" => TypeDefKind::Flags(Flags { flags: self.decode_flags(obj, path)? }),
            "enum" => TypeDefKind::Enum(Enum { cases: self.decode_enum_cases(obj, path)? }),
            "variant" => TypeDefKind::Variant(Variant { cases: self.decode_variant_cases(obj, path)? }),
            "option" => TypeDefKind::Option(self.decode_type_ref(field(obj, path, "type")?, &path.field("type"))?),
            "result" => {
                let ok = opt_field(obj, "ok").map(|v| self.decode_type_ref(v, &path.field("ok"))).transpose()?;
                let err = opt_field(obj, "err").map(|v| self.decode_type_ref(v, &path.field("err"))).transpose()?;
                TypeDefKind::Result(Result_ { ok, err })
            }
            "list" => TypeDefKind::List(self.decode_type_ref(field(obj, path, "type")?, &path.field("type"))?),
            "resource" => TypeDefKind::Resource,
            "handle:own" => {
                let idx = as_index(field(obj, path, "resource")?, &path.field("resource"))?;
                TypeDefKind::Own(self.type_id(idx, path)?)
            }
            "handle:borrow" => {
                let idx = as_index(field(obj, path, "resource")?, &path.field("resource"))?;
                TypeDefKind::Borrow(self.type_id(idx, path)?)
            }
            "future" => {
                let element =
                    opt_field(obj, "type").map(|v| self.decode_type_ref(v, &path.field("type"))).transpose()?;
                TypeDefKind::Future(element)
            }
            "stream" => {
                let element =
                    opt_field(obj, "element").map(|v| self.decode_type_ref(v, &path.field("element"))).transpose()?;
                let end = opt_field(obj, "end").map(|v| self.decode_type_ref(v, &path.field("end"))).transpose()?;
                TypeDefKind::Stream(Stream { element, end })
            }
            "type" => {
                let idx = as_index(field(obj, path, "type")?, &path.field("type"))?;
                TypeDefKind::Type(self.type_id(idx, path)?)
            }
            other => return Err(unexpected(path, format!("unknown typedef kind `{other}`"))),
        })
    }

    fn decode_type_list(
        &self,
        obj: &serde_json::Map<String, Value>,
        path: &Path,
        key: &str,
    ) -> Result<Vec<Type>, DecodeError> {
        let p = path.field(key);
        as_array(field(obj, path, key)?, &p)?
            .iter()
            .enumerate()
            .map(|(i, v)| self.decode_type_ref(v, &p.index(i)))
            .collect()
    }

    fn decode_fields(&self, obj: &serde_json::Map<String, Value>, path: &Path) -> Result<Vec<Field>, DecodeError> {
        let p = path.field("fields");
        as_array(field(obj, path, "fields")?, &p)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let ip = p.index(i);
                let fobj = as_object(item, &ip)?;
                let name = as_str(field(fobj, &ip, "name")?, &ip.field("name"))?.to_string();
                let ty = self.decode_type_ref(field(fobj, &ip, "type")?, &ip.field("type"))?;
                let docs = self.decode_docs(opt_field(fobj, "docs"));
                Ok(Field { name, ty, docs })
            })
            .collect()
    }

    fn decode_flags(&self, obj: &serde_json::Map<String, Value>, path: &Path) -> Result<Vec<Flag>, DecodeError> {
        let p = path.field("flags");
        as_array(field(obj, path, "flags")?, &p)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let ip = p.index(i);
                let fobj = as_object(item, &ip)?;
                let name = as_str(field(fobj, &ip, "name")?, &ip.field("name"))?.to_string();
                let docs = self.decode_docs(opt_field(fobj, "docs"));
                Ok(Flag { name, docs })
            })
            .collect()
    }

    fn decode_enum_cases(&self, obj: &serde_json::Map<String, Value>, path: &Path) -> Result<Vec<EnumCase>, DecodeError> {
        let p = path.field("cases");
        as_array(field(obj, path, "cases")?, &p)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let ip = p.index(i);
                let cobj = as_object(item, &ip)?;
                let name = as_str(field(cobj, &ip, "name")?, &ip.field("name"))?.to_string();
                let docs = self.decode_docs(opt_field(cobj, "docs"));
                Ok(EnumCase { name, docs })
            })
            .collect()
    }

    fn decode_variant_cases(&self, obj: &serde_json::Map<String, Value>, path: &Path) -> Result<Vec<Case>, DecodeError> {
        let p = path.field("cases");
        as_array(field(obj, path, "cases")?, &p)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let ip = p.index(i);
                let cobj = as_object(item, &ip)?;
                let name = as_str(field(cobj, &ip, "name")?, &ip.field("name"))?.to_string();
                let ty = opt_field(cobj, "type").map(|v| self.decode_type_ref(v, &ip.field("type"))).transpose()?;
                let docs = self.decode_docs(opt_field(cobj, "docs"));
                Ok(Case { name, ty, docs })
            })
            .collect()
    }

    // ---- functions ------------------------------------------------------------

    fn decode_function_kind(&self, v: Option<&Value>, path: &Path) -> Result<FunctionKind, DecodeError> {
        let v = match v {
            None => return Ok(FunctionKind::Freestanding),
            Some(v) => v,
        };
        let obj = as_object(v, path)?;
        let tag = as_str(field(obj, path, "tag")?, &path.field("tag"))?;
        let owner_type = |this: &Self, obj: &serde_json::Map<String, Value>| -> Result<TypeId, DecodeError> {
            let idx = as_index(field(obj, path, "type")?, &path.field("type"))?;
            this.type_id(idx, path)
        };
        match tag {
            "freestanding" => Ok(FunctionKind::Freestanding),
            "method" => Ok(FunctionKind::Method(owner_type(self, obj)?)),
            "static" => Ok(FunctionKind::Static(owner_type(self, obj)?)),
            "constructor" => Ok(FunctionKind::Constructor(owner_type(self, obj)?)),
            other => Err(unexpected(path, format!("unknown function kind `{other}`"))),
        }
    }

    fn decode_params(&self, v: &Value, path: &Path) -> Result<Vec<Param>, DecodeError> {
        as_array(v, path)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let p = path.index(i);
                let obj = as_object(item, &p)?;
                let name = as_str(field(obj, &p, "name")?, &p.field("name"))?.to_string();
                let ty = self.decode_type_ref(field(obj, &p, "type")?, &p.field("type"))?;
                Ok(Param { name, ty })
            })
            .collect()
    }

    fn decode_function(&mut self, v: &Value, path: &Path) -> Result<Function, DecodeError> {
        let obj = as_object(v, path)?;
        let name = as_str(field(obj, path, "name")?, &path.field("name"))?.to_string();
        let kind = self.decode_function_kind(opt_field(obj, "kind"), &path.field("kind"))?;
        let params = self.decode_params(field(obj, path, "params")?, &path.field("params"))?;
        let results = match opt_field(obj, "results") {
            Some(v) => self.decode_params(v, &path.field("results"))?,
            None => Vec::new(),
        };
        let stability = self.decode_stability(opt_field(obj, "stability"), &path.field("stability"))?;
        let docs = self.decode_docs(opt_field(obj, "docs"));
        Ok(Function { name, kind, params, results, stability, docs, direction: Direction::default() })
    }

    // ---- interfaces / worlds / packages ---------------------------------------

    fn decode_interface(&mut self, v: &Value, path: &Path) -> Result<Interface, DecodeError> {
        let obj = as_object(v, path)?;
        let name = opt_field(obj, "name").map(|v| as_str(v, &path.field("name"))).transpose()?.map(String::from);
        let package_idx = as_index(field(obj, path, "package")?, &path.field("package"))?;
        let package = self.package_id(package_idx, path)?;
        let stability = self.decode_stability(opt_field(obj, "stability"), &path.field("stability"))?;
        let docs = self.decode_docs(opt_field(obj, "docs"));

        let mut typedefs = OrderedMap::new();
        let tp = path.field("typedefs");
        for (i, pair) in as_array(field(obj, path, "typedefs")?, &tp)?.iter().enumerate() {
            let pp = tp.index(i);
            let pair = as_array(pair, &pp)?;
            if pair.len() != 2 {
                return Err(unexpected(&pp, "expected a [name, type-index] pair"));
            }
            let key = as_str(&pair[0], &pp.index(0))?.to_string();
            let idx = as_index(&pair[1], &pp.index(1))?;
            let id = self.type_id(idx, &pp.index(1))?;
            insert_unique(&mut typedefs, key, id, |k| unexpected(&pp, format!("duplicate typedef name `{k}`")))?;
        }

        let mut functions = OrderedMap::new();
        let fp = path.field("functions");
        for (i, item) in as_array(field(obj, path, "functions")?, &fp)?.iter().enumerate() {
            let ip = fp.index(i);
            let func = self.decode_function(item, &ip)?;
            if func.name.is_empty() {
                return Err(unexpected(&ip, "function name must not be empty"));
            }
            let key = func.name.clone();
            insert_unique(&mut functions, key, func, |k| unexpected(&ip, format!("duplicate function name `{k}`")))?;
        }

        Ok(Interface { name, typedefs, functions, package, stability, docs })
    }

    fn decode_world_item(&mut self, v: &Value, path: &Path) -> Result<WorldItem, DecodeError> {
        let obj = as_object(v, path)?;
        let tag = as_str(field(obj, path, "tag")?, &path.field("tag"))?;
        match tag {
            "interface" => {
                let idx = as_index(field(obj, path, "interface")?, &path.field("interface"))?;
                Ok(WorldItem::Interface(self.interface_id(idx, path)?))
            }
            "type" => {
                let idx = as_index(field(obj, path, "type")?, &path.field("type"))?;
                Ok(WorldItem::Type(self.type_id(idx, path)?))
            }
            "function" => {
                let func = self.decode_function(field(obj, path, "function")?, &path.field("function"))?;
                Ok(WorldItem::Function(func))
            }
            other => Err(unexpected(path, format!("unknown world item tag `{other}`"))),
        }
    }

    fn decode_world_item_map(&mut self, v: &Value, path: &Path) -> Result<OrderedMap<String, WorldItem>, DecodeError> {
        let mut map = OrderedMap::new();
        for (i, pair) in as_array(v, path)?.iter().enumerate() {
            let pp = path.index(i);
            let pair = as_array(pair, &pp)?;
            if pair.len() != 2 {
                return Err(unexpected(&pp, "expected a [name, item] pair"));
            }
            let key = as_str(&pair[0], &pp.index(0))?.to_string();
            let item = self.decode_world_item(&pair[1], &pp.index(1))?;
            insert_unique(&mut map, key, item, |k| unexpected(&pp, format!("duplicate world item name `{k}`")))?;
        }
        Ok(map)
    }

    fn decode_world(&mut self, v: &Value, path: &Path) -> Result<World, DecodeError> {
        let obj = as_object(v, path)?;
        let name = as_str(field(obj, path, "name")?, &path.field("name"))?.to_string();
        let package_idx = as_index(field(obj, path, "package")?, &path.field("package"))?;
        let package = self.package_id(package_idx, path)?;
        let stability = self.decode_stability(opt_field(obj, "stability"), &path.field("stability"))?;
        let docs = self.decode_docs(opt_field(obj, "docs"));
        let imports = self.decode_world_item_map(field(obj, path, "imports")?, &path.field("imports"))?;
        let exports = self.decode_world_item_map(field(obj, path, "exports")?, &path.field("exports"))?;

        // A world exporting a bare `TypeDef` violates the data-model
        // invariant (§3), but rejecting it is the differentiator's job
        // (`ExportedBareType`, §4.3/§7), not the decoder's: the decoder only
        // materializes what the document says.
        Ok(World { name, imports, exports, package, stability, docs })
    }

    fn decode_package(&mut self, v: &Value, path: &Path) -> Result<Package, DecodeError> {
        let obj = as_object(v, path)?;
        let ident_str = as_str(field(obj, path, "ident")?, &path.field("ident"))?;
        let ident = PackageIdent::parse(ident_str).map_err(|e| match e {
            crate::ident::IdentParseError::Malformed(s) => {
                DecodeError::BadIdent { path: path.field("ident"), ident: s, source: anyhow::anyhow!("malformed package identifier") }
            }
            crate::ident::IdentParseError::BadVersion(v) => {
                DecodeError::BadVersion { path: path.field("ident"), version: v }
            }
        })?;
        let docs = self.decode_docs(opt_field(obj, "docs"));

        let mut interfaces = OrderedMap::new();
        let ip = path.field("interfaces");
        for (i, pair) in as_array(field(obj, path, "interfaces")?, &ip)?.iter().enumerate() {
            let pp = ip.index(i);
            let pair = as_array(pair, &pp)?;
            if pair.len() != 2 {
                return Err(unexpected(&pp, "expected a [name, interface-index] pair"));
            }
            let key = as_str(&pair[0], &pp.index(0))?.to_string();
            let idx = as_index(&pair[1], &pp.index(1))?;
            let id = self.interface_id(idx, &pp.index(1))?;
            insert_unique(&mut interfaces, key, id, |k| unexpected(&pp, format!("duplicate interface name `{k}`")))?;
        }

        let mut worlds = OrderedMap::new();
        let wp = path.field("worlds");
        for (i, pair) in as_array(field(obj, path, "worlds")?, &wp)?.iter().enumerate() {
            let pp = wp.index(i);
            let pair = as_array(pair, &pp)?;
            if pair.len() != 2 {
                return Err(unexpected(&pp, "expected a [name, world-index] pair"));
            }
            let key = as_str(&pair[0], &pp.index(0))?.to_string();
            let idx = as_index(&pair[1], &pp.index(1))?;
            let id = self.world_id(idx, &pp.index(1))?;
            insert_unique(&mut worlds, key, id, |k| unexpected(&pp, format!("duplicate world name `{k}`")))?;
        }

        Ok(Package { ident, interfaces, worlds, docs })
    }
}

fn primitive_from_name(s: &str) -> Option<Type> {
    Some(match s {
        "bool" => Type::Bool,
        "s8" => Type::S8,
        "u8" => Type::U8,
        "s16" => Type::S16,
        "u16" => Type::U16,
        "s32" => Type::S32,
        "u32" => Type::U32,
        "s64" => Type::S64,
        "u64" => Type::U64,
        "f32" => Type::F32,
        "f64" => Type::F64,
        "char" => Type::Char,
        "string" => Type::String,
        _ => return None,
    })
}

fn items_of<'a>(
    obj: &'a serde_json::Map<String, Value>,
    path: &Path,
    key: &'static str,
) -> Result<&'a Vec<Value>, DecodeError> {
    let p = path.field(key);
    as_array(field(obj, path, key)?, &p)
}
