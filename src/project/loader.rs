//! Loading solutions from disk and writing generated documents back.
//!
//! Every `*.csproj` under the root defines a project named after its file
//! stem. The project's documents are the `.cs` files below its directory,
//! excluding build output (`bin/`, `obj/`) and directories that belong to a
//! nested project.

use std::fs;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::solution::{Solution, SolutionChanges};

const PROJECT_EXTENSION: &str = "csproj";
const SOURCE_EXTENSION: &str = "cs";
const IGNORED_DIRECTORIES: &[&str] = &["bin", "obj", ".git", ".vs"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("project `{0}` has no directory on disk")]
    NoProjectDirectory(SmolStr),
    #[error("document `{0}` belongs to a project that is not in the solution")]
    UnknownProject(SmolStr),
}

/// Load every project below `root` into a fresh solution.
pub fn load_solution(root: &Path) -> Result<Solution, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::NotADirectory(root.to_path_buf()));
    }

    let project_files = collect_files(root, PROJECT_EXTENSION, &[])?;
    let project_dirs: Vec<PathBuf> = project_files
        .iter()
        .filter_map(|p| p.parent().map(Path::to_path_buf))
        .collect();

    let mut solution = Solution::new();
    for project_file in &project_files {
        let Some(directory) = project_file.parent() else {
            continue;
        };
        let Some(name) = project_file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let nested: Vec<&Path> = project_dirs
            .iter()
            .map(PathBuf::as_path)
            .filter(|d| *d != directory && d.starts_with(directory))
            .collect();

        let mut documents = Vec::new();
        for path in collect_files(directory, SOURCE_EXTENSION, &nested)? {
            let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            documents.push((SmolStr::new(file_name), folders_between(directory, &path), text));
        }

        debug!(project = name, documents = documents.len(), "loaded project");
        let (next, _) = solution.with_loaded_project(name, Some(directory.to_path_buf()), documents);
        solution = next;
    }

    Ok(solution)
}

/// Write the documents in `changes` below their project directories.
///
/// Returns the paths written, in change order.
pub fn write_changes(solution: &Solution, changes: &SolutionChanges) -> Result<Vec<PathBuf>, LoadError> {
    let mut written = Vec::with_capacity(changes.added.len());
    for added in &changes.added {
        let project = solution
            .project(added.project)
            .ok_or_else(|| LoadError::UnknownProject(added.document.name().into()))?;
        let directory = project
            .directory()
            .ok_or_else(|| LoadError::NoProjectDirectory(project.name().into()))?;

        let path = directory.join(added.document.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LoadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, added.document.text()).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote document");
        written.push(path);
    }
    Ok(written)
}

/// Files with `extension` under `root`, sorted, skipping ignored and
/// `excluded` directories.
fn collect_files(root: &Path, extension: &str, excluded: &[&Path]) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry, excluded));

    for entry in walker {
        let entry = entry.map_err(|source| LoadError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(extension)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry, excluded: &[&Path]) -> bool {
    if !entry.file_type().is_dir() || entry.depth() == 0 {
        return false;
    }
    let ignored = entry
        .file_name()
        .to_str()
        .is_some_and(|name| IGNORED_DIRECTORIES.contains(&name));
    ignored || excluded.contains(&entry.path())
}

/// Folder segments between a project directory and one of its files.
fn folders_between(directory: &Path, file: &Path) -> Vec<SmolStr> {
    file.parent()
        .and_then(|parent| parent.strip_prefix(directory).ok())
        .map(|relative| {
            relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .map(SmolStr::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::AffinityToken;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/Domain/Aurora.Billing.Domain.csproj", "<Project />");
        write(root, "src/Domain/Invoice.cs", "class Invoice { }");
        write(root, "src/Domain/Commands/PayCommand.cs", "class PayCommand { }");
        write(root, "src/Domain/bin/Debug/Generated.cs", "class Generated { }");
        write(root, "src/Domain/obj/AssemblyInfo.cs", "class AssemblyInfo { }");
        write(root, "src/Domain/Tests/Aurora.Billing.Domain.Tests.csproj", "<Project />");
        write(root, "src/Domain/Tests/InvoiceTests.cs", "class InvoiceTests { }");
        write(root, "README.md", "not a project");
        dir
    }

    #[test]
    fn test_load_solution_finds_projects_and_documents() {
        let dir = fixture();
        let solution = load_solution(dir.path()).unwrap();

        let domain = solution.project_named("Aurora.Billing.Domain").unwrap();
        let mut paths: Vec<_> = domain.documents().map(|d| d.relative_path()).collect();
        paths.sort();
        assert_eq!(
            paths,
            [PathBuf::from("Commands").join("PayCommand.cs"), PathBuf::from("Invoice.cs")]
        );

        let tests = solution.project_named("Aurora.Billing.Domain.Tests").unwrap();
        assert_eq!(tests.documents().count(), 1);
        assert_eq!(solution.projects().count(), 2);
    }

    #[test]
    fn test_load_solution_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(load_solution(&missing), Err(LoadError::NotADirectory(_))));
    }

    #[test]
    fn test_write_changes_round_trip() {
        let dir = fixture();
        let solution = load_solution(dir.path()).unwrap();
        let project = solution.project_named("Aurora.Billing.Domain").unwrap().id();

        let token = AffinityToken::assume_affinity();
        let (forked, _) = solution
            .with_document(
                project,
                "CreateInvoiceCommand.cs",
                vec!["Commands".into()],
                "public class CreateInvoiceCommand : ICommand { }",
                &token,
            )
            .unwrap();
        let written = write_changes(&forked, &forked.changes_since(&solution)).unwrap();
        assert_eq!(written.len(), 1);

        let reloaded = load_solution(dir.path()).unwrap();
        let domain = reloaded.project_named("Aurora.Billing.Domain").unwrap();
        let document = domain.document_named("CreateInvoiceCommand.cs").unwrap();
        assert_eq!(document.folders(), ["Commands"]);
        assert!(document.text().contains("ICommand"));
    }

    #[test]
    fn test_write_changes_requires_project_directory() {
        let (solution, project) = Solution::new().with_project("InMemory", None);
        let token = AffinityToken::assume_affinity();
        let (forked, _) = solution
            .with_document(project, "A.cs", vec![], "", &token)
            .unwrap();
        let err = write_changes(&forked, &forked.changes_since(&solution)).unwrap_err();
        assert!(matches!(err, LoadError::NoProjectDirectory(_)));
    }
}
