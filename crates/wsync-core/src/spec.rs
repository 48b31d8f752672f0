use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::manifest::{string_map, ManifestSpec};

/// Canonical description of the workspace: the single source of truth that
/// every on-disk artifact is derived from. Artifacts are disposable; a run
/// can always rebuild them from this structure.
#[derive(Debug, Deserialize)]
pub struct WorkspaceSpec {
    /// Directory containing one subdirectory per package.
    #[serde(default = "default_packages_dir")]
    pub packages_dir: String,
    pub packages: Vec<PackageSpec>,
    /// Generated-stub settings for the import rewriter.
    pub stubs: Option<StubConfig>,
    /// Foreign project descriptor patched in place.
    pub descriptor: Option<DescriptorSpec>,
}

/// One workspace package, identified by its folder name.
#[derive(Debug, Deserialize)]
pub struct PackageSpec {
    pub dir: String,
    pub manifest: ManifestSpec,
    /// Lines guaranteed to be present in an existing aggregation file.
    pub append: Option<AppendSpec>,
}

/// Exact lines appended to a text file when not already present.
#[derive(Debug, Deserialize)]
pub struct AppendSpec {
    /// Target file, relative to the package directory.
    pub file: String,
    pub lines: Vec<String>,
}

/// The package whose generated sources get type-only model imports.
#[derive(Debug, Deserialize)]
pub struct StubConfig {
    pub package: String,
    #[serde(default = "default_source_ext")]
    pub extension: String,
}

/// A cross-ecosystem project manifest patched field-by-field rather than
/// generated. Values are pinned literals from the canonical spec.
#[derive(Debug, Deserialize)]
pub struct DescriptorSpec {
    /// Workspace-relative path of the descriptor file.
    pub path: String,
    pub name: String,
    pub description: String,
    pub version: String,
    /// SDK version range, written as a quoted string after the `sdk:` key.
    pub sdk: String,
}

fn default_packages_dir() -> String {
    "packages".to_string()
}

fn default_source_ext() -> String {
    ".ts".to_string()
}

impl WorkspaceSpec {
    /// The default workspace layout: a generated stub package, a Next.js
    /// client, and a Dart client.
    pub fn builtin() -> Self {
        Self {
            packages_dir: default_packages_dir(),
            packages: vec![
                PackageSpec {
                    dir: "api-stubs".to_string(),
                    manifest: ManifestSpec {
                        name: "@workspace/api-stubs".to_string(),
                        private: None,
                        version: "1.0.0".to_string(),
                        main: Some("dist/index.js".to_string()),
                        types: Some("dist/index.d.ts".to_string()),
                        scripts: string_map(&[("build", "tsc")]),
                        dependencies: BTreeMap::new(),
                        peer_dependencies: string_map(&[
                            ("@nestjs/common", "^10"),
                            ("rxjs", "^7"),
                        ]),
                        dev_dependencies: string_map(&[
                            ("@nestjs/common", "^11.1.14"),
                            ("rxjs", "^7.8.2"),
                            ("typescript", "^5"),
                        ]),
                    },
                    append: Some(AppendSpec {
                        file: "index.ts".to_string(),
                        lines: vec![
                            "export * from './api'".to_string(),
                            "export * from './controllers'".to_string(),
                            "export * from './models'".to_string(),
                        ],
                    }),
                },
                PackageSpec {
                    dir: "next-client".to_string(),
                    manifest: ManifestSpec {
                        name: "@workspace/next-client".to_string(),
                        private: Some(true),
                        version: "1.0.0".to_string(),
                        main: None,
                        types: None,
                        scripts: string_map(&[
                            ("dev", "next dev"),
                            ("build", "next build"),
                            ("start", "next start"),
                        ]),
                        dependencies: BTreeMap::new(),
                        peer_dependencies: BTreeMap::new(),
                        dev_dependencies: BTreeMap::new(),
                    },
                    append: None,
                },
                PackageSpec {
                    dir: "dart-client".to_string(),
                    manifest: ManifestSpec {
                        name: "@workspace/dart-client".to_string(),
                        private: Some(true),
                        version: "1.0.0".to_string(),
                        main: None,
                        types: None,
                        scripts: string_map(&[
                            ("dev", "dart run"),
                            ("build", "dart compile exe bin/main.dart"),
                        ]),
                        dependencies: BTreeMap::new(),
                        peer_dependencies: BTreeMap::new(),
                        dev_dependencies: BTreeMap::new(),
                    },
                    append: None,
                },
            ],
            stubs: Some(StubConfig {
                package: "api-stubs".to_string(),
                extension: default_source_ext(),
            }),
            descriptor: Some(DescriptorSpec {
                path: "packages/dart-client/pubspec.yaml".to_string(),
                name: "dart_client".to_string(),
                description: "API client".to_string(),
                version: "1.0.0".to_string(),
                sdk: ">=3.0.0 <4.0.0".to_string(),
            }),
        }
    }

    /// Loads a spec override from a TOML file.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SyncError::fs(path, e))?;
        toml::from_str(&text)
            .map_err(|e| SyncError::usage(format!("invalid workspace spec '{path}': {e}")))
    }
}
