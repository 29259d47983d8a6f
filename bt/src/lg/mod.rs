//! Language generation (LG)
//!
//! Maps a template name plus a data binding to human-facing text or a
//! structured payload, with deterministic locale fallback:
//!
//! - [`Resolver`] resolves one import reference to file content,
//!   preferring a locale-qualified variant (`sub.lg` -> `sub.fr-fr.lg`)
//! - [`TemplateStore`] eagerly builds one immutable
//!   [`CompiledTemplateSet`] per configured locale by recursively
//!   resolving imports
//! - [`Generator`] selects a set for a requested locale (exact match,
//!   else root) and renders into a [`GeneratedActivity`](crate::activity::GeneratedActivity)

mod error;
mod generator;
mod resolver;
mod resource;
mod store;

pub use error::LgError;
pub use generator::Generator;
pub use resolver::Resolver;
pub use resource::{ParsedResource, TemplateResource, parse_resource};
pub use store::{CompiledTemplateSet, TemplateStore};
