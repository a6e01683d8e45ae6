//! The emitter scaffolding a target generator assembles output with: a set
//! of logical packages, each holding a set of files with ordered content and
//! a symbolic import set resolved to per-target import statements at
//! serialization time.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::scope::Scope;

/// Raised by [`File::bytes`] if the file's contents cannot be serialized.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to format file contents: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// A single logical import: the path it was requested under, the alias this
/// file picked for it, and whether anything in the body has actually used
/// it yet.
#[derive(Debug, Clone)]
struct ImportEntry {
    alias: String,
    used: bool,
    side_effect: bool,
}

/// One output file belonging to a [`Package`].
///
/// `header`/`trailer` bracket auto-generated content (license banners,
/// closing braces); `body` is the ordered declarations the generator
/// appends to as it walks the IR. Imports are recorded symbolically by
/// logical path and resolved to per-file aliases at [`File::bytes`] time.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    package: String,
    imports: IndexMap<String, ImportEntry>,
    pub header: String,
    pub trailer: String,
    pub body: String,
}

impl File {
    fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        File {
            name: name.into(),
            package: package.into(),
            imports: IndexMap::new(),
            header: String::new(),
            trailer: String::new(),
            body: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Declares (if needed) an alias for `path` without marking it used --
    /// for speculative imports added ahead of deciding whether the body
    /// will actually reference them. Colliding short names (the path's
    /// last `/`-delimited segment) get a numeric suffix, distinct from
    /// `Scope`'s underscore-based disambiguation.
    pub fn declare_import(&mut self, path: &str) -> &str {
        if !self.imports.contains_key(path) {
            let alias = self.alloc_alias(path);
            self.imports.insert(path.to_string(), ImportEntry { alias, used: false, side_effect: false });
        }
        &self.imports.get(path).expect("just inserted or already present").alias
    }

    /// Registers (if needed) and returns the alias this file uses for
    /// `path`, marking the import as used -- call this at the point a
    /// reference to the import is actually written into the body.
    pub fn import(&mut self, path: &str) -> &str {
        self.declare_import(path);
        let entry = self.imports.get_mut(path).expect("just declared");
        entry.used = true;
        &entry.alias
    }

    /// Registers a side-effect-only import (`_`-style): always preserved in
    /// the emitted output regardless of whether anything references it.
    pub fn import_side_effect(&mut self, path: &str) {
        let alias = self.imports.get(path).map(|e| e.alias.clone()).unwrap_or_else(|| self.alloc_alias(path));
        self.imports.insert(path.to_string(), ImportEntry { alias, used: true, side_effect: true });
    }

    fn alloc_alias(&mut self, path: &str) -> String {
        let short = path.rsplit('/').next().unwrap_or(path);
        let mut candidate = short.to_string();
        let mut suffix = 2;
        while self.imports.values().any(|e| e.alias == candidate) {
            candidate = format!("{short}{suffix}");
            suffix += 1;
        }
        if candidate != short {
            tracing::trace!(path, alias = %candidate, "numeric-suffixed a colliding import alias");
        }
        candidate
    }

    /// True only if this file contributes actual declarations beyond its
    /// auto-generated header.
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Renders this file's final bytes: header, surviving imports (used, or
    /// side-effect), body, trailer.
    pub fn bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = String::new();
        write!(out, "{}", self.header)?;
        for (path, entry) in &self.imports {
            if entry.used || entry.side_effect {
                writeln!(out, "import {path} as {};", entry.alias)?;
            }
        }
        write!(out, "{}", self.body)?;
        write!(out, "{}", self.trailer)?;
        Ok(out.into_bytes())
    }
}

/// A logical output package: a named, path-addressed group of [`File`]s
/// sharing one declared-name [`Scope`].
#[derive(Debug, Clone)]
pub struct Package {
    pub path: String,
    pub name: String,
    files: IndexMap<String, File>,
    declared_names: Scope,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<String>, reserved: impl IntoIterator<Item = String>) -> Self {
        Package { path: path.into(), name: name.into(), files: IndexMap::new(), declared_names: Scope::new(reserved) }
    }

    /// Creates (or returns the existing) file named `name` in this package.
    pub fn file(&mut self, name: &str) -> &mut File {
        if !self.files.contains_key(name) {
            let file = File::new(name, self.name.clone());
            self.files.insert(name.to_string(), file);
        }
        self.files.get_mut(name).expect("just inserted or already present")
    }

    pub fn get_file(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// The package-level scope used to declare top-level identifiers
    /// (types, functions) before descending into per-file/function scopes.
    pub fn declared_names(&mut self) -> &mut Scope {
        &mut self.declared_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_import_is_omitted_but_side_effect_import_is_kept() {
        let mut file = File::new("bindings.rs", "demo");
        file.import("used/mod");
        file.import_side_effect("runtime/init");
        file.body.push_str("struct Used;\n");

        let bytes = file.bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("used/mod"));
        assert!(text.contains("runtime/init"));
    }

    #[test]
    fn an_import_declared_but_never_used_is_omitted() {
        let mut file = File::new("bindings.rs", "demo");
        file.declare_import("maybe/mod");
        file.body.push_str("struct Foo;\n");
        let text = String::from_utf8(file.bytes().unwrap()).unwrap();
        assert!(!text.contains("maybe/mod"));
    }

    #[test_log::test]
    fn colliding_short_names_get_numeric_suffixes() {
        let mut file = File::new("bindings.rs", "demo");
        let a = file.import("a/mod").to_string();
        let b = file.import("b/mod").to_string();
        assert_eq!(a, "mod");
        assert_eq!(b, "mod2");
    }

    #[test]
    fn has_content_is_false_until_the_body_gains_declarations() {
        let mut file = File::new("bindings.rs", "demo");
        file.header.push_str("// autogenerated\n");
        assert!(!file.has_content());
        file.body.push_str("struct Foo;\n");
        assert!(file.has_content());
    }

    #[test]
    fn package_creates_and_reuses_the_same_named_file() {
        let mut package = Package::new("demo", "demo", []);
        package.file("a.rs").body.push_str("struct A;\n");
        package.file("a.rs").body.push_str("struct B;\n");
        let file = package.get_file("a.rs").unwrap();
        assert!(file.body.contains("struct A;"));
        assert!(file.body.contains("struct B;"));
        assert_eq!(package.files().count(), 1);
    }
}
