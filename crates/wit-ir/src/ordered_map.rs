//! Insertion-ordered map used for every named collection in the IR
//! (`Interface::typedefs`, `World::imports`, `Package::interfaces`, ...).
//!
//! Declaration order drives deterministic code generation and the WIT
//! round-trip law (§8), so a plain hash map is never acceptable here.
//! [`indexmap::IndexMap`] gives us O(1) lookup by key while preserving the
//! order keys were first inserted in.

use indexmap::IndexMap;
use std::hash::Hash;

pub type OrderedMap<K, V> = IndexMap<K, V>;

/// Inserts `value` under `key`, returning an error built from `key` if the
/// key is already present. Several decoder call sites need "insert or
/// reject duplicate" rather than "insert or overwrite".
pub fn insert_unique<K, V, E>(
    map: &mut OrderedMap<K, V>,
    key: K,
    value: V,
    on_dup: impl FnOnce(&K) -> E,
) -> Result<(), E>
where
    K: Hash + Eq,
{
    if map.contains_key(&key) {
        return Err(on_dup(&key));
    }
    map.insert(key, value);
    Ok(())
}
