use crate::DebuggerError;
use std::path::{Component, Path, PathBuf};

// Resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            c => normalized.push(c),
        }
    }
    normalized
}

// Drops root and prefix components, so that the path can be joined below another one.
pub(crate) fn relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Joins `path` below `base` and checks that the result does not leave `base`.
pub(crate) fn within(base: &Path, path: &Path) -> Result<PathBuf, DebuggerError> {
    let base = normalize(base);
    let joined = normalize(&base.join(relative(path)));
    if joined.starts_with(&base) && !joined.starts_with("..") {
        Ok(joined)
    } else {
        Err(DebuggerError::UnsafePath { path: joined, base })
    }
}

#[cfg(test)]
mod test {
    use super::within;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_paths_stay_inside_base() {
        let base = Path::new("/srv/app");
        assert_eq!(
            within(base, Path::new("logs/app.log")).unwrap(),
            PathBuf::from("/srv/app/logs/app.log")
        );
        assert_eq!(
            within(base, Path::new("/logs/./x/../app.log")).unwrap(),
            PathBuf::from("/srv/app/logs/app.log")
        );
        assert!(within(base, Path::new("../etc/passwd")).is_err());
        assert!(within(base, Path::new("logs/../../../etc/passwd")).is_err());
    }

    #[test]
    fn test_relative_base() {
        assert_eq!(
            within(Path::new("."), Path::new("log_files/a.log")).unwrap(),
            PathBuf::from("log_files/a.log")
        );
        assert!(within(Path::new("."), Path::new("../a.log")).is_err());
    }
}
