//! Variant generators and their factory.

pub mod factory;
pub mod identity;
pub mod naming;
pub(crate) mod scratch;
pub mod traits;

pub use factory::create_generator;
pub use identity::IdentityGenerator;
pub use naming::render_variant_name;
pub use traits::{GeneratedVariants, GeneratorError, VariantCleanup, VariantGenerator};
