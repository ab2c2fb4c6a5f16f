// crates/genconf/src/whitelist.rs

//! Override whitelists: the fixed sets of attribute keys an operator may
//! set through a resource's `properties` map or a runtime-property section.
//! Anything outside these tables is dropped, never passed through, so the
//! safe configuration surface of the underlying pool and valve stays closed.

/// Pool-tuning keys honoured on a generated DataSource element: the
/// commons-dbcp attribute set plus the Tomcat JDBC pool enhanced attributes.
pub const DATASOURCE_PROPERTIES: &[&str] = &[
    "minIdle",
    "maxIdle",
    "maxActive",
    "maxWait",
    "initialSize",
    "validationQuery",
    "validationQueryTimeout",
    "testOnBorrow",
    "testOnReturn",
    "timeBetweenEvictionRunsMillis",
    "numTestsPerEvictionRun",
    "minEvictableIdleTimeMillis",
    "testWhileIdle",
    "removeAbandoned",
    "removeAbandonedTimeout",
    "logAbandoned",
    "defaultAutoCommit",
    "defaultReadOnly",
    "defaultTransactionIsolation",
    "poolPreparedStatements",
    "maxOpenPreparedStatements",
    "defaultCatalog",
    "connectionInitSqls",
    "connectionProperties",
    "accessToUnderlyingConnectionAllowed",
    // Tomcat JDBC enhanced attributes
    "factory",
    "type",
    "validatorClassName",
    "initSQL",
    "jdbcInterceptors",
    "validationInterval",
    "jmxEnabled",
    "fairQueue",
    "abandonWhenPercentageFull",
    "maxAge",
    "useEquals",
    "suspectTimeout",
    "rollbackOnReturn",
    "commitOnReturn",
    "alternateUsernameAllowed",
    "useDisposableConnectionFacade",
    "logValidationErrors",
    "propagateInterruptState",
];

/// Keys honoured from the `privateApp` runtime-property section.
pub const PRIVATE_APP_PROPERTIES: &[&str] = &[
    "className",
    "secretKey",
    "authenticationEntryPointName",
    "authenticationParameterName",
    "authenticationHeaderName",
    "authenticationUri",
    "authenticationCookieName",
    "enabled",
    "realmName",
    "ignoredUriRegexp",
];

/// True if `key` may override a DataSource attribute.
pub fn is_datasource_property(key: &str) -> bool {
    DATASOURCE_PROPERTIES.contains(&key)
}

/// True if `key` may configure the private-app valve.
pub fn is_private_app_property(key: &str) -> bool {
    PRIVATE_APP_PROPERTIES.contains(&key)
}
