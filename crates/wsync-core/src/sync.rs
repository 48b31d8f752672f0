use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use wsync_patch as patch;

use crate::constants::{BARREL_FILE, MANIFEST_FILE};
use crate::error::{Result, SyncError};
use crate::spec::{PackageSpec, WorkspaceSpec};
use crate::store::{EntryKind, FileStore};
use crate::walk::walk_files;

/// Derives every on-disk artifact of one workspace from its canonical
/// specification.
///
/// Each method is a sequential, synchronous pass: read current state,
/// compute new state, write it back. Runs are idempotent, so the engine is
/// safe to re-run from scratch at any time. Concurrent runs against the
/// same workspace are not synchronized and must be serialized by the
/// caller.
pub struct Synchronizer<'a> {
    store: &'a dyn FileStore,
    spec: &'a WorkspaceSpec,
}

impl<'a> Synchronizer<'a> {
    pub fn new(store: &'a dyn FileStore, spec: &'a WorkspaceSpec) -> Self {
        Self { store, spec }
    }

    fn package_dir(&self, name: &str) -> PathBuf {
        Path::new(&self.spec.packages_dir).join(name)
    }

    /// Writes every package manifest, ensures append-target lines, and
    /// patches the foreign descriptor.
    #[instrument(skip_all)]
    pub fn setup(&self) -> Result<()> {
        for package in &self.spec.packages {
            self.write_manifest(package)?;
            self.ensure_appends(package)?;
        }
        self.patch_descriptor()
    }

    /// Regenerates `<package>/index.ts`: one export line per immediate
    /// subdirectory, lexicographic order, previous content fully replaced.
    #[instrument(skip_all)]
    pub fn generate_barrel(&self, package: Option<&str>) -> Result<()> {
        let package = package
            .ok_or_else(|| SyncError::usage("missing package name: wsync barrels <package>"))?;
        let dir = self.package_dir(package);
        if !self.store.exists(&dir) {
            return Err(SyncError::usage(format!(
                "package directory not found: {}",
                dir.display()
            )));
        }

        let mut barrel = String::new();
        for entry in self.store.list(&dir)? {
            if entry.kind == EntryKind::Dir {
                barrel.push_str(&format!("export * from './{}'\n", entry.name));
            }
        }

        self.store.write(&dir.join(BARREL_FILE), &barrel)?;
        info!("generated barrel for {package}");
        Ok(())
    }

    /// Rewrites model imports in the stub package to their type-only form,
    /// writing back only the files that actually changed.
    #[instrument(skip_all)]
    pub fn fix_imports(&self) -> Result<()> {
        let Some(stubs) = &self.spec.stubs else {
            debug!("no stub package configured, nothing to rewrite");
            return Ok(());
        };

        let root = self.package_dir(&stubs.package);
        walk_files(
            self.store,
            &root,
            &|name| name.ends_with(stubs.extension.as_str()),
            &mut |path, content| {
                let patched = patch::rewrite_model_imports(content);
                if patched != content {
                    self.store.write(path, &patched)?;
                    info!("rewrote imports in {}", path.display());
                }
                Ok(())
            },
        )
    }

    fn write_manifest(&self, package: &PackageSpec) -> Result<()> {
        let path = self.package_dir(&package.dir).join(MANIFEST_FILE);
        self.store.write(&path, &package.manifest.render())?;
        info!("wrote {}", path.display());
        Ok(())
    }

    fn ensure_appends(&self, package: &PackageSpec) -> Result<()> {
        let Some(append) = &package.append else {
            return Ok(());
        };

        let path = self.package_dir(&package.dir).join(&append.file);
        if !self.store.exists(&path) {
            // Later steps never depend on the aggregation file existing.
            warn!("append target missing, skipped: {}", path.display());
            return Ok(());
        }

        let content = self.store.read(&path)?;
        let (patched, dirty) = patch::append_missing_lines(&content, &append.lines);
        if dirty {
            self.store.write(&path, &patched)?;
            info!("updated {}", path.display());
        } else {
            debug!("already up to date: {}", path.display());
        }
        Ok(())
    }

    fn patch_descriptor(&self) -> Result<()> {
        let Some(descriptor) = &self.spec.descriptor else {
            return Ok(());
        };

        let path = Path::new(&descriptor.path);
        if !self.store.exists(path) {
            warn!("descriptor missing, skipped: {}", descriptor.path);
            return Ok(());
        }

        let content = self.store.read(path)?;
        let fields = [
            ("name", descriptor.name.as_str()),
            ("description", descriptor.description.as_str()),
            ("version", descriptor.version.as_str()),
        ];
        let patched = patch::patch_scalar_fields(&content, &fields);
        let patched = patch::patch_sdk_constraint(&patched, &descriptor.sdk);

        if patched != content {
            self.store.write(path, &patched)?;
            info!("patched {}", descriptor.path);
        } else {
            debug!("descriptor already up to date: {}", descriptor.path);
        }
        Ok(())
    }
}
