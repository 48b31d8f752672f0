//! Idempotent text transformations for derived workspace artifacts.
//!
//! Each operation is pure with respect to its input string: no filesystem
//! access, no hidden state. Callers decide whether a result is worth
//! writing back (see the dirty flag on [`append_missing_lines`]).

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::debug;

/// A non-type-only named import whose module path points into a `models`
/// directory. The type-only form (`import type {`) does not match, which
/// makes [`rewrite_model_imports`] idempotent by construction.
static MODEL_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import \{([^}]+)\} from (["'])(\.\./models[^"']*)(["'])"#).unwrap()
});

/// The quoted SDK range following an `sdk:` key. Not line-anchored: the
/// key sits at an irregular indentation level in real descriptors.
static SDK_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"sdk:\s*["'][^"']*["']"#).unwrap());

/// Rewrites named imports of model files to their type-only form.
///
/// `import { A, B } from '../models/x'` becomes
/// `import type { A, B } from '../models/x'`. The name list, the path, and
/// the quote character are preserved verbatim. Every match in `content` is
/// rewritten in a single pass; imports that do not reference a models path
/// pass through untouched.
pub fn rewrite_model_imports(content: &str) -> String {
    let rewritten = MODEL_IMPORT
        .replace_all(content, "import type {${1}} from ${2}${3}${4}")
        .into_owned();
    if rewritten != content {
        debug!("rewrote model imports to type-only form");
    }
    rewritten
}

/// Appends each required line that is not already present.
///
/// Lines are appended in the order given, each prefixed by a newline.
/// Lines already present are skipped in place, never reordered. Returns
/// the new content and a dirty flag so the caller can skip the write when
/// nothing changed.
///
/// The presence probe is a substring match, not line-anchored: required
/// text appearing inside unrelated content counts as present. Kept for
/// compatibility with aggregation files written by earlier revisions of
/// this tooling.
pub fn append_missing_lines<S: AsRef<str>>(content: &str, required: &[S]) -> (String, bool) {
    let mut out = content.to_string();
    let mut dirty = false;

    for line in required {
        let line = line.as_ref();
        if !out.contains(line) {
            out.push('\n');
            out.push_str(line);
            dirty = true;
        }
    }

    (out, dirty)
}

/// Replaces top-level scalar fields in a line-oriented `key: value` file.
///
/// For each `(name, value)` pair, the first line beginning with `name:` is
/// replaced by `name: value`; every other line is preserved byte-for-byte,
/// including line terminators. Indented or commented occurrences never
/// match. A field with no matching line is silently left absent — this
/// primitive replaces, it does not insert.
pub fn patch_scalar_fields(content: &str, fields: &[(&str, &str)]) -> String {
    let mut pending: Vec<(&str, &str)> = fields.to_vec();
    let mut out = String::with_capacity(content.len());

    for segment in content.split_inclusive('\n') {
        let (line, terminator) = match segment.strip_suffix('\n') {
            Some(rest) => (rest, "\n"),
            None => (segment, ""),
        };

        let hit = pending
            .iter()
            .position(|(name, _)| line.strip_prefix(name).is_some_and(|r| r.starts_with(':')));

        match hit {
            Some(idx) => {
                let (name, value) = pending.remove(idx);
                out.push_str(name);
                out.push_str(": ");
                out.push_str(value);
                out.push_str(terminator);
            }
            None => out.push_str(segment),
        }
    }

    out
}

/// Replaces the first quoted SDK constraint after an `sdk:` key with
/// `"range"`. Companion to [`patch_scalar_fields`] for the one descriptor
/// field whose key line has irregular formatting.
pub fn patch_sdk_constraint(content: &str, range: &str) -> String {
    let replacement = format!("sdk: \"{range}\"");
    SDK_RANGE
        .replace(content, NoExpand(&replacement))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_named_model_import() {
        let input = "import { A, B } from '../models/x'\n";
        let out = rewrite_model_imports(input);
        assert_eq!(out, "import type { A, B } from '../models/x'\n");
    }

    #[test]
    fn preserves_quote_style() {
        let input = "import {Product} from \"../models/product\"\n";
        let out = rewrite_model_imports(input);
        assert_eq!(out, "import type {Product} from \"../models/product\"\n");
    }

    #[test]
    fn leaves_type_only_import_unchanged() {
        let input = "import type { A } from '../models/x'\n";
        assert_eq!(rewrite_model_imports(input), input);
    }

    #[test]
    fn leaves_non_model_import_unchanged() {
        let input = "import { HttpClient } from '../runtime'\n";
        assert_eq!(rewrite_model_imports(input), input);
    }

    #[test]
    fn rewrites_every_match_in_one_pass() {
        let input = "import { A } from '../models/a'\nconst x = 1\nimport { B } from '../models/b'\n";
        let out = rewrite_model_imports(input);
        assert_eq!(
            out,
            "import type { A } from '../models/a'\nconst x = 1\nimport type { B } from '../models/b'\n"
        );
    }

    #[test]
    fn rewrite_is_idempotent() {
        let input = "import { A, B } from '../models/x'\n";
        let once = rewrite_model_imports(input);
        assert_eq!(rewrite_model_imports(&once), once);
    }

    #[test]
    fn appends_only_missing_lines() {
        let content = "export * from './api'";
        let required = ["export * from './api'", "export * from './models'"];
        let (out, dirty) = append_missing_lines(content, &required);
        assert!(dirty);
        assert_eq!(out, "export * from './api'\nexport * from './models'");
    }

    #[test]
    fn reports_clean_when_all_lines_present() {
        let content = "export * from './api'\nexport * from './models'";
        let required = ["export * from './api'", "export * from './models'"];
        let (out, dirty) = append_missing_lines(content, &required);
        assert!(!dirty);
        assert_eq!(out, content);
    }

    #[test]
    fn existing_lines_keep_their_position() {
        let content = "// header\nexport * from './models'";
        let required = ["export * from './api'", "export * from './models'"];
        let (out, _) = append_missing_lines(content, &required);
        // './models' was already present mid-file; only './api' is appended.
        assert_eq!(out, "// header\nexport * from './models'\nexport * from './api'");
    }

    #[test]
    fn substring_probe_counts_embedded_text_as_present() {
        // The probe is deliberately loose: required text inside a comment
        // suppresses the append.
        let content = "// re-add export * from './api' later";
        let (out, dirty) = append_missing_lines(content, &["export * from './api'"]);
        assert!(!dirty);
        assert_eq!(out, content);
    }

    #[test]
    fn patches_matching_scalar_field() {
        let content = "name: old_name\nversion: 0.0.1\nhomepage: https://example.com\n";
        let out = patch_scalar_fields(content, &[("version", "1.0.0")]);
        assert_eq!(out, "name: old_name\nversion: 1.0.0\nhomepage: https://example.com\n");
    }

    #[test]
    fn replaces_only_the_first_occurrence() {
        let content = "version: 0.0.1\nversion: 0.0.2\n";
        let out = patch_scalar_fields(content, &[("version", "1.0.0")]);
        assert_eq!(out, "version: 1.0.0\nversion: 0.0.2\n");
    }

    #[test]
    fn ignores_indented_and_commented_occurrences() {
        let content = "# version: 9.9.9\n  version: 8.8.8\nversion: 0.0.1\n";
        let out = patch_scalar_fields(content, &[("version", "1.0.0")]);
        assert_eq!(out, "# version: 9.9.9\n  version: 8.8.8\nversion: 1.0.0\n");
    }

    #[test]
    fn field_prefix_does_not_match_longer_keys() {
        let content = "name_suffix: keep\nname: old\n";
        let out = patch_scalar_fields(content, &[("name", "new")]);
        assert_eq!(out, "name_suffix: keep\nname: new\n");
    }

    #[test]
    fn missing_field_passes_content_through() {
        let content = "name: pkg\n";
        assert_eq!(patch_scalar_fields(content, &[("version", "1.0.0")]), content);
    }

    #[test]
    fn preserves_absent_trailing_newline() {
        let content = "version: 0.0.1";
        assert_eq!(patch_scalar_fields(content, &[("version", "2.0.0")]), "version: 2.0.0");
    }

    #[test]
    fn patches_indented_sdk_constraint() {
        let content = "environment:\n  sdk: '>=2.12.0 <3.0.0'\n";
        let out = patch_sdk_constraint(content, ">=3.0.0 <4.0.0");
        assert_eq!(out, "environment:\n  sdk: \">=3.0.0 <4.0.0\"\n");
    }

    #[test]
    fn sdk_patch_is_idempotent() {
        let content = "environment:\n  sdk: \">=2.12.0 <3.0.0\"\n";
        let once = patch_sdk_constraint(content, ">=3.0.0 <4.0.0");
        assert_eq!(patch_sdk_constraint(&once, ">=3.0.0 <4.0.0"), once);
    }
}
