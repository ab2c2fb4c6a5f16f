// crates/genconf/src/metadata.rs

//! Typed model of the deployment descriptor (`metadata.json`).
//!
//! The descriptor declares the resources an application needs wired into
//! its server configuration, plus named runtime-property sections. Resource
//! declaration order is kept; it determines element order in the generated
//! documents.

use crate::error::MetadataError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A bound relational database, rendered as a `javax.sql.DataSource`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Database {
    /// Resource name; the descriptor map key. Exposed to the application
    /// under `jdbc/<name>`.
    #[serde(skip)]
    pub name: String,
    /// Connection URL without the `jdbc:` scheme prefix.
    pub url: String,
    pub username: String,
    pub password: String,
    /// JDBC driver class name.
    pub driver: String,
    #[serde(rename = "validationQuery")]
    pub validation_query: String,
    /// Operator overrides; filtered against the datasource whitelist.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A bound SMTP account, rendered as a `javax.mail.Session`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Email {
    /// Resource name; the descriptor map key.
    #[serde(skip)]
    pub name: String,
    pub username: String,
    pub password: String,
    pub host: String,
}

/// A memcached-backed session store, rendered as a session `Manager`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionStore {
    /// Comma-separated memcached node list.
    pub nodes: String,
    pub username: String,
    pub password: String,
}

/// A declared external dependency of the deployed application.
///
/// The variant set is closed: adding a kind without handling it everywhere
/// it is matched is a compile error. Descriptor entries with an
/// unrecognized `type` tag never reach this enum (see [`Metadata`] loading).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Database(Database),
    Email(Email),
    SessionStore(SessionStore),
}

/// Raw top-level shape of the descriptor. `resources` stays untyped here so
/// unknown resource kinds can be skipped instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    resources: serde_json::Map<String, Value>,
    #[serde(default)]
    runtime: BTreeMap<String, BTreeMap<String, String>>,
}

/// Read-only view of a deployment descriptor: ordered resources plus named
/// runtime-property sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    resources: Vec<Resource>,
    runtime: BTreeMap<String, BTreeMap<String, String>>,
}

impl Metadata {
    /// Builds a descriptor programmatically, mainly for tests and embedding.
    pub fn new(resources: Vec<Resource>) -> Self {
        Metadata {
            resources,
            runtime: BTreeMap::new(),
        }
    }

    /// Adds or replaces a runtime-property section.
    pub fn set_runtime_property(&mut self, section: &str, entries: BTreeMap<String, String>) {
        self.runtime.insert(section.to_string(), entries);
    }

    /// Parses a descriptor from its JSON text.
    ///
    /// Entries under `resources` carry a `type` tag (`database`, `email`,
    /// `session-store`). Entries with an unrecognized tag are skipped with a
    /// warning; entries missing required fields for their tag are an error.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        let raw: RawMetadata = serde_json::from_str(json)?;

        let mut resources = Vec::with_capacity(raw.resources.len());
        for (name, value) in raw.resources {
            let kind = value
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| MetadataError::MissingResourceType {
                    resource: name.clone(),
                })?;

            match kind.as_str() {
                "database" => {
                    let mut database: Database = parse_resource(&name, "database", value)?;
                    database.name = name;
                    resources.push(Resource::Database(database));
                }
                "email" => {
                    let mut email: Email = parse_resource(&name, "email", value)?;
                    email.name = name;
                    resources.push(Resource::Email(email));
                }
                "session-store" => {
                    let store: SessionStore = parse_resource(&name, "session-store", value)?;
                    resources.push(Resource::SessionStore(store));
                }
                other => {
                    log::warn!("Skip resource '{}' with unrecognized type '{}'", name, other);
                }
            }
        }

        Ok(Metadata {
            resources,
            runtime: raw.runtime,
        })
    }

    /// Reads and parses the descriptor at `path`.
    pub fn from_file(path: &Path) -> Result<Self, MetadataError> {
        let json = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Resources in declaration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// The named runtime-property section, or `None` if not configured.
    pub fn runtime_property(&self, section: &str) -> Option<&BTreeMap<String, String>> {
        self.runtime.get(section)
    }
}

fn parse_resource<T: for<'de> Deserialize<'de>>(
    name: &str,
    kind: &'static str,
    value: Value,
) -> Result<T, MetadataError> {
    serde_json::from_value(value).map_err(|source| MetadataError::InvalidResource {
        resource: name.to_string(),
        kind,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"{
        "resources": {
            "mydb": {
                "type": "database",
                "url": "mysql://host/db",
                "username": "u",
                "password": "p",
                "driver": "com.mysql.Driver",
                "validationQuery": "SELECT 1",
                "properties": { "maxActive": "5" }
            },
            "mail/default": {
                "type": "email",
                "username": "a@b.com",
                "password": "x",
                "host": "smtp.example.com"
            },
            "sessions": {
                "type": "session-store",
                "nodes": "mc1:11211,mc2:11211",
                "username": "memuser",
                "password": "mempass"
            }
        },
        "runtime": {
            "privateApp": { "secretKey": "s3cr3t" }
        }
    }"#;

    #[test]
    fn parses_all_resource_kinds_in_order() {
        let metadata = Metadata::from_json_str(DESCRIPTOR).unwrap();
        let resources = metadata.resources();
        assert_eq!(resources.len(), 3);

        match &resources[0] {
            Resource::Database(db) => {
                assert_eq!(db.name, "mydb");
                assert_eq!(db.url, "mysql://host/db");
                assert_eq!(db.driver, "com.mysql.Driver");
                assert_eq!(db.validation_query, "SELECT 1");
                assert_eq!(db.properties.get("maxActive").map(String::as_str), Some("5"));
            }
            other => panic!("expected a database, got {other:?}"),
        }
        match &resources[1] {
            Resource::Email(email) => {
                assert_eq!(email.name, "mail/default");
                assert_eq!(email.host, "smtp.example.com");
            }
            other => panic!("expected an email, got {other:?}"),
        }
        match &resources[2] {
            Resource::SessionStore(store) => {
                assert_eq!(store.nodes, "mc1:11211,mc2:11211");
            }
            other => panic!("expected a session store, got {other:?}"),
        }
    }

    #[test]
    fn exposes_runtime_sections() {
        let metadata = Metadata::from_json_str(DESCRIPTOR).unwrap();
        let section = metadata.runtime_property("privateApp").unwrap();
        assert_eq!(section.get("secretKey").map(String::as_str), Some("s3cr3t"));
        assert!(metadata.runtime_property("other").is_none());
    }

    #[test]
    fn skips_unrecognized_resource_kinds() {
        let metadata = Metadata::from_json_str(
            r#"{ "resources": { "queue": { "type": "message-broker", "url": "amqp://x" } } }"#,
        )
        .unwrap();
        assert!(metadata.resources().is_empty());
    }

    #[test]
    fn missing_type_tag_is_an_error() {
        let error = Metadata::from_json_str(r#"{ "resources": { "mydb": { "url": "x" } } }"#)
            .unwrap_err();
        assert!(matches!(
            error,
            MetadataError::MissingResourceType { resource } if resource == "mydb"
        ));
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let error = Metadata::from_json_str(
            r#"{ "resources": { "mydb": { "type": "database", "url": "mysql://h/d" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            error,
            MetadataError::InvalidResource { resource, kind: "database", .. } if resource == "mydb"
        ));
    }

    #[test]
    fn empty_descriptor_is_valid() {
        let metadata = Metadata::from_json_str("{}").unwrap();
        assert!(metadata.resources().is_empty());
    }
}
