//! Stable identifiers for schemas and built-in adapters.

// Schemas
pub const SCHEMA_CONFIG_V1: &str = "lintbridge.config.v1";

// Adapters
pub const ADAPTER_SECURITY_CHECKER: &str = "security-checker";

// Tool-level
pub const TOOL_NAME: &str = "lintbridge";
