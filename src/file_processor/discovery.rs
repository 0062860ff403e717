//! File discovery, path utilities, and pattern expansion

use crate::config::GlobalConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid file type definition: {0}")]
    Types(#[from] ignore::Error),
}

/// Expands an exclude pattern so it matches the path itself, everything
/// beneath it, and, for patterns without a `/`, the same name at any depth.
fn expand_exclude_pattern(pattern: &str) -> Vec<String> {
    let base = pattern.trim_start_matches("./").trim_end_matches('/');
    let mut patterns = vec![base.to_string(), format!("{base}/**")];
    if !base.contains('/') {
        patterns.push(format!("**/{base}"));
        patterns.push(format!("**/{base}/**"));
    }
    patterns
}

/// Compile exclude patterns. Invalid patterns are reported and skipped.
pub fn build_exclude_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        for expanded in expand_exclude_pattern(pattern) {
            match Glob::new(&expanded) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    log::warn!("Invalid exclude pattern '{pattern}': {e}");
                    break;
                }
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("Failed to compile exclude patterns: {e}");
        GlobSet::empty()
    })
}

/// Path of `path` relative to `base`, for pattern matching.
fn relative_for_matching(path: &Path, base: &Path) -> PathBuf {
    if let Ok(relative) = path.strip_prefix(base) {
        return relative.to_path_buf();
    }
    if let (Ok(canonical_path), Ok(canonical_base)) = (path.canonicalize(), base.canonicalize())
        && let Ok(relative) = canonical_path.strip_prefix(&canonical_base)
    {
        return relative.to_path_buf();
    }
    path.strip_prefix("./").unwrap_or(path).to_path_buf()
}

/// Convert an absolute file path to a relative path for display purposes.
///
/// Tries to make the path relative to project_root first, then falls back to CWD.
/// If neither works, returns the original path unchanged.
pub fn to_display_path(file_path: &str, project_root: Option<&Path>) -> String {
    let path = Path::new(file_path);

    let canonical_file = path.canonicalize().ok();
    let effective_path = canonical_file.as_deref().unwrap_or(path);

    if let Some(root) = project_root
        && let Some(relative) = strip_base_prefix(effective_path, root)
    {
        return relative;
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(relative) = strip_base_prefix(effective_path, &cwd)
    {
        return relative;
    }

    file_path.to_string()
}

/// Absolute form of `file_path`, or the path unchanged if it cannot be resolved.
pub fn to_full_path(file_path: &str) -> String {
    Path::new(file_path)
        .canonicalize()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| file_path.to_string())
}

/// Try to strip a base path prefix from a file path.
/// Handles canonicalization of the base path to resolve symlinks.
fn strip_base_prefix(file_path: &Path, base: &Path) -> Option<String> {
    // Canonicalize base to resolve symlinks (e.g., /tmp -> /private/tmp on macOS)
    let canonical_base = base.canonicalize().ok()?;

    if let Ok(relative) = file_path.strip_prefix(&canonical_base) {
        return Some(relative.to_string_lossy().to_string());
    }

    if let Ok(relative) = file_path.strip_prefix(base) {
        return Some(relative.to_string_lossy().to_string());
    }

    None
}

fn has_component_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext)))
}

/// Find the component files to lint.
///
/// Explicitly named files are always returned, including ones that do not
/// exist, so the scan reports them as read errors. Directories are walked
/// recursively without following symlinks, keeping files whose extension is
/// in `config.extensions` and that no exclude pattern matches. No paths means
/// the current directory.
pub fn find_component_files(
    paths: &[String],
    config: &GlobalConfig,
    project_root: Option<&Path>,
) -> Result<Vec<String>, DiscoveryError> {
    let default_paths = [".".to_string()];
    let paths = if paths.is_empty() { &default_paths[..] } else { paths };

    let mut file_paths = Vec::new();
    let mut directories = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_dir() {
            directories.push(path_str.clone());
        } else {
            // Explicit files are kept even when missing; reading them reports the error
            file_paths.push(clean_path(path_str));
        }
    }

    if let Some((first, rest)) = directories.split_first() {
        let match_base = project_root
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let excludes = build_exclude_set(&config.exclude);
        log::debug!("Exclude patterns: {:?}", config.exclude);

        let mut walk_builder = WalkBuilder::new(first);
        for dir in rest {
            walk_builder.add(dir);
        }

        let mut types_builder = ignore::types::TypesBuilder::new();
        for ext in &config.extensions {
            types_builder.add("component", &format!("*.{}", ext.trim_start_matches('.')))?;
        }
        types_builder.select("component");
        walk_builder.types(types_builder.build()?);

        let use_gitignore = config.respect_gitignore;
        walk_builder.ignore(use_gitignore);
        walk_builder.git_ignore(use_gitignore);
        walk_builder.git_global(use_gitignore);
        walk_builder.git_exclude(use_gitignore);
        walk_builder.parents(use_gitignore);
        walk_builder.hidden(false);
        walk_builder.require_git(false);
        walk_builder.follow_links(false);

        walk_builder.filter_entry(move |entry| {
            if entry.file_name() == ".git" {
                return false;
            }
            !excludes.is_match(relative_for_matching(entry.path(), &match_base))
        });

        for result in walk_builder.build() {
            match result {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && has_component_extension(entry.path(), &config.extensions) {
                        file_paths.push(clean_path(&entry.path().to_string_lossy()));
                    }
                }
                Err(err) => log::warn!("Error walking directory: {err}"),
            }
        }
    }

    file_paths.sort();
    file_paths.dedup();
    Ok(file_paths)
}

fn clean_path(path: &str) -> String {
    path.strip_prefix("./").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<style lang=\"scss\">a{}</style>").unwrap();
    }

    fn names(files: &[String], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                Path::new(f)
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_expand_exclude_pattern() {
        assert_eq!(
            expand_exclude_pattern("dist/"),
            vec!["dist", "dist/**", "**/dist", "**/dist/**"]
        );
        assert_eq!(expand_exclude_pattern("src/legacy"), vec!["src/legacy", "src/legacy/**"]);
    }

    #[test]
    fn test_finds_only_component_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "App.vue");
        write(root, "components/Button.vue");
        write(root, "styles/main.scss");
        write(root, "README.md");

        let root_str = root.to_string_lossy().to_string();
        let files = find_component_files(&[root_str], &GlobalConfig::default(), Some(root)).unwrap();
        assert_eq!(names(&files, root), vec!["App.vue", "components/Button.vue"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "src/App.vue");
        write(root, "src/legacy/Old.vue");
        write(root, "packages/ui/node_modules/lib/Thing.vue");

        let config = GlobalConfig {
            exclude: vec!["src/legacy".to_string(), "node_modules".to_string()],
            ..Default::default()
        };
        let root_str = root.to_string_lossy().to_string();
        let files = find_component_files(&[root_str], &config, Some(root)).unwrap();
        assert_eq!(names(&files, root), vec!["src/App.vue"]);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "A.vue");
        write(root, "B.svelte");

        let config = GlobalConfig {
            extensions: vec!["svelte".to_string()],
            ..Default::default()
        };
        let root_str = root.to_string_lossy().to_string();
        let files = find_component_files(&[root_str], &config, Some(root)).unwrap();
        assert_eq!(names(&files, root), vec!["B.svelte"]);
    }

    #[test]
    fn test_gitignore_is_respected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "App.vue");
        write(root, "generated/Gen.vue");
        fs::write(root.join(".gitignore"), "generated/\n").unwrap();

        let root_str = root.to_string_lossy().to_string();
        let files = find_component_files(&[root_str.clone()], &GlobalConfig::default(), Some(root)).unwrap();
        assert_eq!(names(&files, root), vec!["App.vue"]);

        let config = GlobalConfig {
            respect_gitignore: false,
            ..Default::default()
        };
        let files = find_component_files(&[root_str], &config, Some(root)).unwrap();
        assert_eq!(names(&files, root), vec!["App.vue", "generated/Gen.vue"]);
    }

    #[test]
    fn test_explicit_file_is_always_included() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "notes.html");
        let file = root.join("notes.html").to_string_lossy().to_string();

        let config = GlobalConfig {
            exclude: vec!["*.html".to_string()],
            ..Default::default()
        };
        let files = find_component_files(std::slice::from_ref(&file), &config, Some(root)).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_path_is_kept_alongside_others() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "App.vue");
        let present = root.join("App.vue").to_string_lossy().to_string();
        let missing = root.join("Gone.vue").to_string_lossy().to_string();

        let files = find_component_files(&[present.clone(), missing.clone()], &GlobalConfig::default(), Some(root))
            .unwrap();
        assert_eq!(files, vec![present, missing]);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinks_are_not_followed() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("project");
        let outside = dir.path().join("outside");
        write(&outside, "Outside.vue");
        write(&root, "App.vue");
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();

        let root_str = root.to_string_lossy().to_string();
        let files = find_component_files(&[root_str], &GlobalConfig::default(), Some(&root)).unwrap();
        assert_eq!(names(&files, &root), vec!["App.vue"]);
    }

    #[test]
    fn test_display_path_is_relative_to_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "src/App.vue");
        let file = root.join("src/App.vue").to_string_lossy().to_string();
        assert_eq!(
            to_display_path(&file, Some(root)).replace('\\', "/"),
            "src/App.vue"
        );
    }
}
