//! The Canonical ABI engine: size, alignment, flattening, despecialization,
//! function shaping and import/export differentiation over a [`wit_ir::Resolve`].
//!
//! Every query here is a pure function of the type graph (`layout`, `flat`,
//! the `has_*` predicates); the only thing that mutates a [`wit_ir::Resolve`]
//! is [`differentiate`], and function [`shape`]ing, which allocates the
//! anonymous compound/pointer typedefs a shaped signature needs.

mod differentiate;
mod flatten;
mod layout;
mod predicates;
mod resource;
mod shape;

pub use differentiate::{differentiate, DifferentiateError};
pub use flatten::{flat, FlatType};
pub use layout::{align_to, despecialize, discriminant_size, layout, Despecialized, Layout};
pub use predicates::{has_borrow, has_pointer, has_resource};
pub use resource::{resource_helpers, ResourceHelpers};
pub use shape::{shape, CallDirection, Shaped, MAX_FLAT_PARAMS, MAX_FLAT_RESULTS};
