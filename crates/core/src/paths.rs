use std::io;
use std::path::{Path, PathBuf};

/// Resolves `path` against the current working directory when it is relative.
///
/// The driver must pin the manifest path down before the output base is
/// touched, so a relative `INPUT` argument keeps meaning the same file no
/// matter what the reconciler does afterwards.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::absolutize;
    use std::path::Path;

    #[test]
    fn absolute_paths_pass_through() {
        let path = Path::new("/etc/hosts");
        assert_eq!(absolutize(path).expect("absolutize"), path);
    }

    #[test]
    fn relative_paths_gain_the_working_directory() {
        let resolved = absolutize(Path::new("some/manifest")).expect("absolutize");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/manifest"));
    }
}
