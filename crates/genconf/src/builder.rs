// crates/genconf/src/builder.rs

//! Translates declared resources into Tomcat configuration elements.
//!
//! One builder instance works on one pair of documents: resource elements go
//! into `context.xml`, the optional private-app valve goes into `server.xml`
//! next to its anchor. The builder holds nothing but the metadata reference;
//! documents are mutated in place and persisted by the caller-facing
//! [`ConfigurationBuilder::build_configuration_files`].

use crate::error::BuildError;
use crate::metadata::{Database, Email, Metadata, Resource, SessionStore};
use crate::whitelist;
use chrono::Local;
use genconf_xml::{Document, Element, ElementSelector, Node};
use std::path::Path;

const CONTEXT_ROOT_ELEMENT: &str = "Context";
const PRIVATE_APP_SECTION: &str = "privateApp";
const PRIVATE_APP_VALVE_CLASS: &str = "com.cloudbees.tomcat.valves.PrivateAppValve";
const REMOTE_IP_VALVE_CLASS: &str = "org.apache.catalina.valves.RemoteIpValve";

pub struct ConfigurationBuilder {
    metadata: Metadata,
}

impl ConfigurationBuilder {
    pub fn new(metadata: Metadata) -> Self {
        ConfigurationBuilder { metadata }
    }

    /// Locates `conf/context.xml` and `conf/server.xml` under `base_dir`,
    /// rewrites both according to the metadata, and persists them.
    ///
    /// Fails fast on a missing or non-directory base dir, a missing config
    /// file, a context file whose root element is not `<Context>`, or any
    /// failure inside [`build`](Self::build). Nothing is written unless the
    /// whole in-memory build succeeded.
    pub fn build_configuration_files(&self, base_dir: &Path) -> Result<(), BuildError> {
        if !base_dir.exists() {
            return Err(BuildError::MissingBaseDir(base_dir.to_path_buf()));
        }
        if !base_dir.is_dir() {
            return Err(BuildError::NotADirectory(base_dir.to_path_buf()));
        }

        let context_xml_path = base_dir.join("conf").join("context.xml");
        if !context_xml_path.exists() {
            return Err(BuildError::MissingConfigFile(context_xml_path));
        }
        let mut context_document = genconf_xml::load_document_from_file(&context_xml_path)?;
        if context_document.root().name() != CONTEXT_ROOT_ELEMENT {
            return Err(BuildError::UnexpectedRootElement {
                expected: CONTEXT_ROOT_ELEMENT,
                found: context_document.root().name().to_string(),
            });
        }

        let server_xml_path = base_dir.join("conf").join("server.xml");
        if !server_xml_path.exists() {
            return Err(BuildError::MissingConfigFile(server_xml_path));
        }
        let mut server_document = genconf_xml::load_document_from_file(&server_xml_path)?;

        self.build(&mut server_document, &mut context_document)?;

        genconf_xml::save_document_to_file(&context_document, &context_xml_path)?;
        genconf_xml::save_document_to_file(&server_document, &server_xml_path)?;
        Ok(())
    }

    /// Mutates the two documents in place: stamps the generation comment,
    /// emits one element per resource in metadata order, then installs the
    /// private-app valve if its runtime section is configured.
    pub fn build(
        &self,
        server_document: &mut Document,
        context_document: &mut Document,
    ) -> Result<(), BuildError> {
        let stamp = format!(
            "File generated by tomcat-genconf at {}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%z")
        );
        server_document.append_trailing_comment(&stamp);
        context_document.append_trailing_comment(&stamp);

        for resource in self.metadata.resources() {
            match resource {
                Resource::Database(database) => self.add_database(database, context_document),
                Resource::Email(email) => self.add_email(email, context_document),
                Resource::SessionStore(store) => self.add_session_store(store, context_document),
            }
        }
        self.add_private_app_valve(server_document)?;
        Ok(())
    }

    /// Emits a pooled DataSource element for `database`.
    ///
    /// Defaults are set first; whitelisted `properties` entries then
    /// overwrite them, so an operator override always wins. Values pass
    /// through as opaque strings; the pool validates them at startup.
    fn add_database(&self, database: &Database, context_document: &mut Document) {
        log::info!(
            "Insert DataSource name={}, url={}",
            database.name,
            database.url
        );
        let mut element = Element::new("Resource");
        element.set_attribute("name", &format!("jdbc/{}", database.name));
        element.set_attribute("auth", "Container");
        element.set_attribute("type", "javax.sql.DataSource");
        element.set_attribute("url", &format!("jdbc:{}", database.url));
        element.set_attribute("driverClassName", &database.driver);
        element.set_attribute("username", &database.username);
        element.set_attribute("password", &database.password);

        // By default, use the tomcat-jdbc pool.
        element.set_attribute("factory", "org.apache.tomcat.jdbc.pool.DataSourceFactory");

        // Max out at 20 connections, the limit of the managed MySQL databases.
        element.set_attribute("maxActive", "20");
        element.set_attribute("maxIdle", "10");
        element.set_attribute("minIdle", "1");

        // Test on borrow and while idle to release broken connections.
        element.set_attribute("testOnBorrow", "true");
        element.set_attribute("testWhileIdle", "true");
        element.set_attribute("validationQuery", &database.validation_query);
        element.set_attribute("validationInterval", "5000"); // 5 secs

        for (key, value) in &database.properties {
            if whitelist::is_datasource_property(key) {
                element.set_attribute(key, value);
            } else {
                log::debug!("Ignore unknown datasource property '{}={}'", key, value);
            }
        }

        context_document.root_mut().append_child(Node::Element(element));
    }

    /// Emits a mail session element for `email`. All attributes are fixed;
    /// there is no override mechanism for mail sessions.
    fn add_email(&self, email: &Email, context_document: &mut Document) {
        log::info!("Add MailSession user={}", email.username);
        let mut element = Element::new("Resource");
        element.set_attribute("name", &email.name);
        element.set_attribute("auth", "Container");
        element.set_attribute("type", "javax.mail.Session");
        element.set_attribute("mail.smtp.user", &email.username);
        element.set_attribute("mail.smtp.password", &email.password);
        element.set_attribute("mail.smtp.host", &email.host);
        element.set_attribute("mail.smtp.auth", "true");

        context_document.root_mut().append_child(Node::Element(element));
    }

    /// Emits a memcached-backed session `Manager` element for `store`.
    fn add_session_store(&self, store: &SessionStore, context_document: &mut Document) {
        log::info!("Add Memcache SessionStore");
        let mut element = Element::new("Manager");
        element.set_attribute(
            "className",
            "de.javakaffee.web.msm.MemcachedBackupSessionManager",
        );
        element.set_attribute(
            "transcoderFactoryClass",
            "de.javakaffee.web.msm.serializer.kryo.KryoTranscoderFactory",
        );
        element.set_attribute("memcachedProtocol", "binary");
        element.set_attribute("requestUriIgnorePattern", ".*\\.(ico|png|gif|jpg|css|js)$");
        element.set_attribute("sessionBackupAsync", "false");
        element.set_attribute("sticky", "false");
        element.set_attribute("memcachedNodes", &store.nodes);
        element.set_attribute("username", &store.username);
        element.set_attribute("password", &store.password);

        context_document.root_mut().append_child(Node::Element(element));
    }

    /// Installs the private-app valve when the `privateApp` runtime section
    /// is configured; a missing section means the feature is disabled and
    /// this is a no-op.
    ///
    /// The valve is spliced immediately after the RemoteIpValve the base
    /// server template is expected to carry. Zero or multiple anchor
    /// candidates abort the build; guessing an insertion point would change
    /// the request-processing chain.
    fn add_private_app_valve(&self, server_document: &mut Document) -> Result<(), BuildError> {
        let Some(section) = self.metadata.runtime_property(PRIVATE_APP_SECTION) else {
            return Ok(());
        };
        log::info!("Insert PrivateAppValve");

        let mut valve = Element::new("Valve");
        valve.set_attribute("className", PRIVATE_APP_VALVE_CLASS);

        for (key, value) in section {
            if whitelist::is_private_app_property(key) {
                valve.set_attribute(key, value);
            } else {
                log::debug!("privateApp: ignore unknown property '{}'", key);
            }
        }

        if valve.attribute("secretKey").unwrap_or_default().is_empty() {
            return Err(BuildError::MissingRuntimeProperty {
                section: PRIVATE_APP_SECTION,
                key: "secretKey",
            });
        }

        let anchor = server_document.find_unique(
            &ElementSelector::named("Valve").with_attribute("className", REMOTE_IP_VALVE_CLASS),
        )?;
        server_document.insert_after(&anchor, Node::Element(valve))?;
        Ok(())
    }
}
