use std::path::{Component, Path, PathBuf};

/// Drop any `?query` or `#fragment` suffix from a URL-style reference.
pub fn strip_query_and_fragment(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    &reference[..end]
}

/// Final path segment of a URL-style reference, ignoring query and fragment.
pub fn file_name_of(reference: &str) -> &str {
    let path = strip_query_and_fragment(reference);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Resolve a relative URL-style reference to a path under `base_dir`.
///
/// Leading `./` and `/` are dropped and `..` segments may not climb above `base_dir`;
/// such references resolve to `None` and are treated as unreadable.
pub fn resolve_local_reference(base_dir: &Path, reference: &str) -> Option<PathBuf> {
    let cleaned = strip_query_and_fragment(reference.trim()).replace('\\', "/");
    let relative = Path::new(cleaned.trim_start_matches('/'));

    let mut resolved = PathBuf::new();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                resolved.push(segment);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (depth > 0).then(|| base_dir.join(resolved))
}
