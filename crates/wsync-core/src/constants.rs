//! Constants used across the wsync workspace.

/// The filename for an optional workspace spec override.
pub const CONFIG_FILE: &str = "wsync.toml";

/// The per-package manifest file.
pub const MANIFEST_FILE: &str = "package.json";

/// The per-package barrel (aggregating export) file.
pub const BARREL_FILE: &str = "index.ts";
