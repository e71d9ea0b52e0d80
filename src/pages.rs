use crate::errors::{FileOperation, IoError};
use colored::Colorize;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Diagnostic)]
pub enum PagesError {
    #[error("I/O error within pages domain")]
    #[diagnostic(code(pagefeed::pages::io))]
    Io(#[from] IoError),

    #[error("root directory not found: '{path}'")]
    #[diagnostic(
        code(pagefeed::pages::root_not_found),
        help("Point --root at the directory that holds the page template")
    )]
    RootNotFound { path: PathBuf },

    #[error("{} of {attempted} template copies failed", .failures.len())]
    #[diagnostic(
        code(pagefeed::pages::copy_failed),
        help("Make sure the template exists and every target directory is writable")
    )]
    CopyFailed {
        attempted: usize,
        #[related]
        failures: Vec<IoError>,
    },
}

/// An immediate entry of the root directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// A directory that will receive the template, and where the copy lands.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTarget {
    pub entry: PageEntry,
    pub destination: PathBuf,
}

/// Every copy that a distribution would perform, computed before touching anything.
#[derive(Debug, Clone)]
pub struct DistributionPlan {
    pub root: PathBuf,
    pub source: PathBuf,
    pub template: String,
    pub targets: Vec<PageTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionReport {
    pub copied: usize,
}

/// Lists the immediate entries of `root`, sorted by file name.
pub fn list_entries(root: &Path) -> Result<Vec<PageEntry>, PagesError> {
    if !root.is_dir() {
        return Err(PagesError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or(root).to_path_buf();

                Err(IoError::new(FileOperation::ListDir, path, error.into()))?
            }
        };

        // `Path::is_dir` follows symlinks, so a linked page directory still qualifies
        entries.push(PageEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            is_dir: entry.path().is_dir(),
        });
    }

    Ok(entries)
}

/// Builds the [`DistributionPlan`] for copying `root/template` into every subdirectory of
/// `root` except `excluded`.
pub fn plan(root: &Path, template: &str, excluded: &str) -> Result<DistributionPlan, PagesError> {
    let targets = list_entries(root)?
        .into_iter()
        .filter(|entry| entry.is_dir && entry.name != excluded)
        .map(|entry| PageTarget {
            destination: entry.path.join(template),
            entry,
        })
        .collect();

    Ok(DistributionPlan {
        root: root.to_path_buf(),
        source: root.join(template),
        template: template.to_string(),
        targets,
    })
}

/// Copies the template of `plan` into every target.
///
/// Copies are attempted for every target even after one fails. Each failure is logged as it
/// happens, and if any occurred the whole set is returned as [`PagesError::CopyFailed`].
pub fn apply(plan: &DistributionPlan) -> Result<DistributionReport, PagesError> {
    let mut copied = 0;
    let mut failures = Vec::new();

    for target in &plan.targets {
        match copy_file(&plan.source, &target.destination) {
            Ok(()) => copied += 1,
            Err(error) => {
                log::error!(
                    "failed to copy {} into '{}': {}",
                    plan.source.display(),
                    target.entry.name,
                    error.source
                );
                failures.push(error);
            }
        }
    }

    if failures.is_empty() {
        Ok(DistributionReport { copied })
    } else {
        Err(PagesError::CopyFailed {
            attempted: plan.targets.len(),
            failures,
        })
    }
}

/// Copies `root/template` into every subdirectory of `root` except `excluded`, overwriting
/// existing copies.
///
/// # Errors
///
/// Returns a [`PagesError`] if:
///
/// - `root` does not exist or is not a directory.
/// - `root` cannot be listed.
/// - One or more copies failed, e.g. because the template is missing.
pub fn distribute(
    root: &Path,
    template: &str,
    excluded: &str,
) -> Result<DistributionReport, PagesError> {
    let plan = plan(root, template, excluded)?;

    log::debug!(
        "distributing {} into {} directories",
        plan.source.display(),
        plan.targets.len()
    );

    apply(&plan)
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), IoError> {
    std::fs::copy(source, destination)
        .map_err(|error| IoError::new(FileOperation::Copy, destination.into(), error))?;

    let msg = format!(
        "{} {} -> {}",
        "copy".green(),
        source.display(),
        destination.display()
    );

    println!("{}", &msg);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_with(dirs: &[&str], template: Option<&str>) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        for dir in dirs {
            fs::create_dir(root.path().join(dir)).unwrap();
        }
        if let Some(content) = template {
            fs::write(root.path().join("page.jsx"), content).unwrap();
        }
        root
    }

    #[test]
    fn test_distribute_copies_into_every_dir_but_excluded() {
        let root = site_with(&["p1", "p2", "fonts"], Some("X"));

        let report = distribute(root.path(), "page.jsx", "fonts").unwrap();

        assert_eq!(report, DistributionReport { copied: 2 });
        assert_eq!(fs::read(root.path().join("p1/page.jsx")).unwrap(), b"X");
        assert_eq!(fs::read(root.path().join("p2/page.jsx")).unwrap(), b"X");
        assert!(!root.path().join("fonts/page.jsx").exists());
    }

    #[test]
    fn test_distribute_overwrites_existing_copy() {
        let root = site_with(&["tech"], Some("export default function Page() {}"));
        fs::write(root.path().join("tech/page.jsx"), "stale").unwrap();
        fs::write(root.path().join("tech/page.tsx"), "keep me").unwrap();

        distribute(root.path(), "page.jsx", "fonts").unwrap();

        assert_eq!(
            fs::read_to_string(root.path().join("tech/page.jsx")).unwrap(),
            "export default function Page() {}"
        );
        // nothing is ever deleted
        assert!(root.path().join("tech/page.tsx").exists());
    }

    #[test]
    fn test_distribute_skips_files() {
        let root = site_with(&["blog"], Some("X"));
        fs::write(root.path().join("layout.tsx"), "layout").unwrap();

        let plan = plan(root.path(), "page.jsx", "fonts").unwrap();

        let names: Vec<&str> = plan.targets.iter().map(|t| t.entry.name.as_str()).collect();
        assert_eq!(names, vec!["blog"]);
    }

    #[test]
    fn test_distribute_without_subdirs_is_noop() {
        let root = site_with(&["fonts"], None);

        let report = distribute(root.path(), "page.jsx", "fonts").unwrap();

        assert_eq!(report.copied, 0);
    }

    #[test]
    fn test_plan_is_sorted_by_name() {
        let root = site_with(&["rss", "blog", "funny", "tech"], Some("X"));

        let plan = plan(root.path(), "page.jsx", "fonts").unwrap();

        let names: Vec<&str> = plan.targets.iter().map(|t| t.entry.name.as_str()).collect();
        assert_eq!(names, vec!["blog", "funny", "rss", "tech"]);
        assert_eq!(plan.source, root.path().join("page.jsx"));
        assert_eq!(
            plan.targets[0].destination,
            root.path().join("blog").join("page.jsx")
        );
    }

    #[test]
    fn test_missing_root_is_err() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("src/app");

        let result = distribute(&missing, "page.jsx", "fonts");

        assert!(matches!(result, Err(PagesError::RootNotFound { path }) if path == missing));
    }

    #[test]
    fn test_root_that_is_a_file_is_err() {
        let root = site_with(&[], Some("X"));

        let result = distribute(&root.path().join("page.jsx"), "page.jsx", "fonts");

        assert!(matches!(result, Err(PagesError::RootNotFound { .. })));
    }

    #[test]
    fn test_missing_template_reports_every_failed_copy() {
        let root = site_with(&["a", "b", "fonts"], None);

        match distribute(root.path(), "page.jsx", "fonts") {
            Err(PagesError::CopyFailed {
                attempted,
                failures,
            }) => {
                assert_eq!(attempted, 2);
                let paths: Vec<PathBuf> = failures.into_iter().map(|f| f.path).collect();
                assert_eq!(
                    paths,
                    vec![
                        root.path().join("a").join("page.jsx"),
                        root.path().join("b").join("page.jsx"),
                    ]
                );
            }
            other => panic!("expected copy failures, got {:?}", other),
        }
    }
}
