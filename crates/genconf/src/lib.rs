// crates/genconf/src/lib.rs

//! Generates Tomcat configuration entries from a declarative resource
//! descriptor.
//!
//! A deployment descriptor ([`Metadata`]) lists the resources an application
//! needs — databases, mail sessions, session stores — plus named
//! runtime-property sections. [`ConfigurationBuilder`] translates each
//! resource into an XML element in `conf/context.xml`, and installs the
//! private-app security valve into `conf/server.xml` when its section is
//! configured. It runs once per deployment, before the server starts.
//!
//! Operator overrides pass through a fixed per-kind [`whitelist`]; unknown
//! keys are logged and dropped, never forwarded.

// --- Crate Modules ---

mod builder;
mod error;
mod metadata;
pub mod whitelist;

// --- Public API Re-exports ---

pub use builder::ConfigurationBuilder;
pub use error::{BuildError, MetadataError};
pub use metadata::{Database, Email, Metadata, Resource, SessionStore};
