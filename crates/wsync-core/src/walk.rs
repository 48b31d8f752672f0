use std::path::Path;

use crate::error::Result;
use crate::store::{EntryKind, FileStore};

/// Depth-first recursive file visitor.
///
/// Visits every regular file under `root`, descending into subdirectories
/// as they are encountered; directories are traversed even when they hold
/// no matches. `matches` filters on the file name (suffix checks at the
/// call sites); `visit` receives the workspace-relative path and the
/// file's current contents.
///
/// Symlink cycles are not guarded against: workspace trees are local and
/// acyclic by convention. The first read error aborts the whole walk, no
/// best-effort continuation.
pub fn walk_files<F>(
    store: &dyn FileStore,
    root: &Path,
    matches: &dyn Fn(&str) -> bool,
    visit: &mut F,
) -> Result<()>
where
    F: FnMut(&Path, &str) -> Result<()>,
{
    for entry in store.list(root)? {
        let path = root.join(&entry.name);
        match entry.kind {
            EntryKind::Dir => walk_files(store, &path, matches, visit)?,
            EntryKind::File if matches(&entry.name) => {
                let content = store.read(&path)?;
                visit(&path, &content)?;
            }
            EntryKind::File => {}
        }
    }
    Ok(())
}
