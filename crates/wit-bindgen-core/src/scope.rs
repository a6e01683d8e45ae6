//! Name scoping for generated code: a stack of name sets (package scope ->
//! file scope -> function scope) with two distinct disambiguation policies:
//! `declare_name` silently disambiguates with a trailing underscore,
//! `declare_exact` rejects a collision outright.

use std::collections::HashSet;

/// Raised by [`Scope::declare_exact`] when the requested name is already
/// visible in this scope or an ancestor.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("name `{name}` is already declared in this scope")]
pub struct DuplicateDeclaration {
    pub name: String,
}

/// A stack of name sets. The bottom frame is seeded with the target
/// language's reserved words and predeclared identifiers and is never
/// popped; `declare_name`/`declare_exact` only ever insert into the
/// innermost (top) frame, so a child scope can never mutate an ancestor's
/// name set.
#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<HashSet<String>>,
}

impl Scope {
    /// Builds a scope whose root frame is pre-populated with `reserved`
    /// (keywords, predeclared identifiers) -- `declare_name` will never
    /// return one of these verbatim.
    pub fn new(reserved: impl IntoIterator<Item = String>) -> Self {
        Scope { frames: vec![reserved.into_iter().collect()] }
    }

    /// Pushes a new, empty child frame (e.g. entering a function body).
    pub fn push(&mut self) {
        self.frames.push(HashSet::new());
    }

    /// Pops the innermost frame. Panics if called on the root frame.
    pub fn pop(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop a scope's root frame");
        self.frames.pop();
    }

    /// True if `name` is visible in this scope or any ancestor.
    pub fn has_name(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains(name))
    }

    /// Declares `hint` in the innermost frame, appending trailing
    /// underscores until the name no longer collides with anything visible.
    /// Always succeeds.
    pub fn declare_name(&mut self, hint: &str) -> String {
        let mut candidate = hint.to_string();
        while self.has_name(&candidate) {
            candidate.push('_');
        }
        if candidate != hint {
            tracing::trace!(hint, candidate = %candidate, "disambiguated colliding name");
        }
        self.frames.last_mut().expect("scope always has a root frame").insert(candidate.clone());
        candidate
    }

    /// Declares `name` verbatim in the innermost frame, or reports the
    /// conflict instead of disambiguating it.
    pub fn declare_exact(&mut self, name: &str) -> Result<(), DuplicateDeclaration> {
        if self.has_name(name) {
            return Err(DuplicateDeclaration { name: name.to_string() });
        }
        self.frames.last_mut().expect("scope always has a root frame").insert(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn reserved_words_are_never_returned_and_collisions_suffix_with_underscores() {
        let mut scope = Scope::new(["for".to_string(), "match".to_string(), "type".to_string()]);
        assert_eq!(scope.declare_name("type"), "type_");
        assert_eq!(scope.declare_name("type"), "type__");
        assert_eq!(scope.declare_name("for"), "for_");
    }

    #[test]
    fn a_nested_scope_sees_ancestor_names_but_does_not_mutate_them() {
        let mut scope = Scope::new([]);
        scope.declare_name("x");
        scope.push();
        assert!(scope.has_name("x"));
        scope.declare_name("y");
        scope.pop();
        assert!(!scope.has_name("y"));
    }

    #[test]
    fn declare_exact_reports_the_conflict_instead_of_disambiguating() {
        let mut scope = Scope::new(["type".to_string()]);
        assert!(scope.declare_exact("value").is_ok());
        let err = scope.declare_exact("value").unwrap_err();
        assert_eq!(err.name, "value");
        let err = scope.declare_exact("type").unwrap_err();
        assert_eq!(err.name, "type");
    }
}
