//! The emitter framework skeleton shared by target generators built on top
//! of `wit-ir`: identifier casing, name scoping, a package/file output
//! model, and a canonical WIT pretty-printer used as a debugging aid. A
//! concrete target generator built on this skeleton additionally depends
//! on `wit-abi` directly to shape function signatures and flatten types;
//! this crate has no such dependency since its printer only walks `wit-ir`.

mod emit;
mod ident;
mod printer;
mod scope;

pub use emit::{File, FormatError, Package};
pub use ident::{to_camel_case, to_pascal_case, to_shouty_snake_case, to_snake_case};
pub use printer::{print_interface, print_package, print_resolve, print_type, print_world};
pub use scope::{DuplicateDeclaration, Scope};
