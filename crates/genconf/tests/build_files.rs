// crates/genconf/tests/build_files.rs

//! Integration tests for the file-level entry point: precondition checks,
//! in-place rewriting of both config files, and failure modes that must
//! abort before anything is persisted.

use genconf::{BuildError, ConfigurationBuilder, Metadata};
use genconf_xml::load_document_from_file;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONTEXT_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
    <Context>\n\
      <WatchedResource>WEB-INF/web.xml</WatchedResource>\n\
    </Context>\n";

const SERVER_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
    <Server port=\"8005\" shutdown=\"SHUTDOWN\">\n\
      <Service name=\"Catalina\">\n\
        <Engine defaultHost=\"localhost\" name=\"Catalina\">\n\
          <Host appBase=\"webapps\" name=\"localhost\">\n\
            <Valve className=\"org.apache.catalina.valves.RemoteIpValve\"/>\n\
          </Host>\n\
        </Engine>\n\
      </Service>\n\
    </Server>\n";

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
        }
    },
    "runtime": {
        "privateApp": { "secretKey": "s3cr3t" }
    }
}"#;

/// Creates a Tomcat-shaped base directory with both config files.
fn tomcat_base() -> TempDir {
    let _ = env_logger::builder().is_test(true).try_init();
    let base = TempDir::new().expect("create temp dir");
    let conf = base.path().join("conf");
    fs::create_dir(&conf).expect("create conf dir");
    fs::write(conf.join("context.xml"), CONTEXT_XML).expect("write context.xml");
    fs::write(conf.join("server.xml"), SERVER_XML).expect("write server.xml");
    base
}

fn build(base: &Path, descriptor: &str) -> Result<(), BuildError> {
    let metadata = Metadata::from_json_str(descriptor).expect("parse descriptor");
    ConfigurationBuilder::new(metadata).build_configuration_files(base)
}

#[test]
fn rewrites_both_configuration_files() {
    let base = tomcat_base();
    build(base.path(), DESCRIPTOR).expect("build should succeed");

    let context =
        load_document_from_file(&base.path().join("conf").join("context.xml")).unwrap();
    let datasource = context
        .root()
        .child_elements()
        .find(|e| e.name() == "Resource")
        .expect("DataSource element missing");
    assert_eq!(datasource.attribute("name"), Some("jdbc/mydb"));
    assert_eq!(datasource.attribute("maxActive"), Some("5"));
    assert_eq!(datasource.attribute("maxIdle"), Some("10"));

    let server = load_document_from_file(&base.path().join("conf").join("server.xml")).unwrap();
    let raw_server = fs::read_to_string(base.path().join("conf").join("server.xml")).unwrap();
    assert!(raw_server.contains("com.cloudbees.tomcat.valves.PrivateAppValve"));
    assert!(raw_server.contains("File generated by tomcat-genconf at "));

    // The pre-existing template content survives the rewrite.
    assert_eq!(server.root().attribute("shutdown"), Some("SHUTDOWN"));
}

#[test]
fn written_files_parse_again() {
    let base = tomcat_base();
    build(base.path(), DESCRIPTOR).expect("first build");

    // A second load of both outputs must succeed; the stamp comment and the
    // inserted elements must not break re-parsing.
    for file in ["context.xml", "server.xml"] {
        load_document_from_file(&base.path().join("conf").join(file))
            .unwrap_or_else(|e| panic!("{file} no longer parses: {e}"));
    }
}

#[test]
fn missing_base_directory_fails() {
    let error = build(Path::new("/nonexistent/tomcat"), "{}").unwrap_err();
    assert!(matches!(error, BuildError::MissingBaseDir(_)));
}

#[test]
fn base_path_that_is_a_file_fails() {
    let base = TempDir::new().unwrap();
    let file_path = base.path().join("not-a-dir");
    fs::write(&file_path, "x").unwrap();

    let error = build(&file_path, "{}").unwrap_err();
    assert!(matches!(error, BuildError::NotADirectory(_)));
}

#[test]
fn missing_context_file_fails() {
    let base = TempDir::new().unwrap();
    fs::create_dir(base.path().join("conf")).unwrap();
    fs::write(base.path().join("conf").join("server.xml"), SERVER_XML).unwrap();

    let error = build(base.path(), "{}").unwrap_err();
    assert!(matches!(error, BuildError::MissingConfigFile(path) if path.ends_with("context.xml")));
}

#[test]
fn missing_server_file_fails() {
    let base = TempDir::new().unwrap();
    fs::create_dir(base.path().join("conf")).unwrap();
    fs::write(base.path().join("conf").join("context.xml"), CONTEXT_XML).unwrap();

    let error = build(base.path(), "{}").unwrap_err();
    assert!(matches!(error, BuildError::MissingConfigFile(path) if path.ends_with("server.xml")));
}

#[test]
fn wrong_context_root_element_fails() {
    let base = tomcat_base();
    fs::write(
        base.path().join("conf").join("context.xml"),
        "<NotContext/>",
    )
    .unwrap();

    let error = build(base.path(), "{}").unwrap_err();
    assert!(matches!(
        error,
        BuildError::UnexpectedRootElement { expected: "Context", found } if found == "NotContext"
    ));
}

#[test]
fn failed_valve_validation_leaves_files_untouched() {
    let base = tomcat_base();
    let descriptor = r#"{ "runtime": { "privateApp": { "secretKey": "" } } }"#;

    let error = build(base.path(), descriptor).unwrap_err();
    assert!(matches!(error, BuildError::MissingRuntimeProperty { .. }));

    // Nothing was persisted: both files still hold the template content.
    let context = fs::read_to_string(base.path().join("conf").join("context.xml")).unwrap();
    let server = fs::read_to_string(base.path().join("conf").join("server.xml")).unwrap();
    assert_eq!(context, CONTEXT_XML);
    assert_eq!(server, SERVER_XML);
}
