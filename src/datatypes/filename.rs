//! Filesystem paths found in log fields.
//!
//! Derived properties are computed on every access; nothing is cached, so
//! metadata always reflects the filesystem at the time of the call.

use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::INVALID_FILENAME_CHARS;
use crate::error_handling::ValueError;

/// A path string free of characters that are invalid in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filename(String);

/// Collapses redundant separators, `.` segments and resolvable `..` segments.
///
/// Purely lexical: symlinks are not consulted. An empty result becomes `.`.
pub(crate) fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    // POSIX keeps exactly two leading slashes, collapses three or more to one.
    let leading = if path.starts_with("//") && !path.starts_with("///") {
        2
    } else if path.starts_with('/') {
        1
    } else {
        0
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." if leading == 0 && (parts.is_empty() || parts.last() == Some(&"..")) => {
                parts.push(part)
            }
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    let joined = format!("{}{}", "/".repeat(leading), parts.join("/"));
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn to_utc(time: io::Result<std::time::SystemTime>) -> io::Result<DateTime<Utc>> {
    time.map(DateTime::<Utc>::from)
}

impl Filename {
    /// # Errors
    ///
    /// Returns [`ValueError::Filename`] naming the first invalid character.
    pub fn new(path: impl Into<String>) -> Result<Self, ValueError> {
        let path = path.into();
        if let Some(ch) = path.chars().find(|c| INVALID_FILENAME_CHARS.contains(c)) {
            return Err(ValueError::Filename { path, ch });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Everything after the final separator (empty for a trailing separator).
    pub fn basename(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// Everything before the final separator, without trailing separators
    /// unless the directory is the root.
    pub fn dirname(&self) -> &str {
        let head = match self.0.rfind('/') {
            Some(i) => &self.0[..=i],
            None => "",
        };
        if head.is_empty() || head.bytes().all(|b| b == b'/') {
            head
        } else {
            head.trim_end_matches('/')
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.as_path().is_absolute()
    }

    /// Normalized absolute form, resolved against the current directory.
    pub fn abspath(&self) -> io::Result<PathBuf> {
        if self.is_absolute() {
            return Ok(PathBuf::from(normalize(&self.0)));
        }
        let cwd = std::env::current_dir()?;
        let joined = cwd.join(&self.0);
        Ok(PathBuf::from(normalize(&joined.to_string_lossy())))
    }

    /// Canonical path with every symlink resolved.
    pub fn realpath(&self) -> io::Result<PathBuf> {
        fs::canonicalize(&self.0)
    }

    /// Case-folded on Windows, unchanged elsewhere.
    pub fn normcase(&self) -> String {
        if cfg!(windows) {
            self.0.to_lowercase().replace('/', "\\")
        } else {
            self.0.clone()
        }
    }

    pub fn normpath(&self) -> String {
        normalize(&self.0)
    }

    /// True when the path exists, following symlinks.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.0).is_ok()
    }

    /// True when the path exists, including dangling symlinks.
    pub fn lexists(&self) -> bool {
        fs::symlink_metadata(&self.0).is_ok()
    }

    pub fn is_file(&self) -> bool {
        self.as_path().is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.as_path().is_dir()
    }

    pub fn is_link(&self) -> bool {
        fs::symlink_metadata(&self.0)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// True when the path is a mount point.
    #[cfg(unix)]
    pub fn is_mount(&self) -> bool {
        use std::os::unix::fs::MetadataExt;

        let Ok(own) = fs::symlink_metadata(&self.0) else {
            return false;
        };
        if own.file_type().is_symlink() {
            return false;
        }
        let Ok(parent) = fs::metadata(self.as_path().join("..")) else {
            return false;
        };
        own.dev() != parent.dev() || own.ino() == parent.ino()
    }

    /// True when the path is a mount point.
    #[cfg(not(unix))]
    pub fn is_mount(&self) -> bool {
        self.realpath()
            .map(|p| p.parent().is_none())
            .unwrap_or(false)
    }

    fn metadata(&self) -> io::Result<Metadata> {
        fs::metadata(&self.0)
    }

    pub fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    /// Last access time.
    pub fn atime(&self) -> io::Result<DateTime<Utc>> {
        to_utc(self.metadata()?.accessed())
    }

    /// Last modification time.
    pub fn mtime(&self) -> io::Result<DateTime<Utc>> {
        to_utc(self.metadata()?.modified())
    }

    /// Inode change time on Unix, creation time elsewhere.
    #[cfg(unix)]
    pub fn ctime(&self) -> io::Result<DateTime<Utc>> {
        use std::os::unix::fs::MetadataExt;

        let meta = self.metadata()?;
        DateTime::from_timestamp(meta.ctime(), meta.ctime_nsec() as u32)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "ctime out of range"))
    }

    /// Inode change time on Unix, creation time elsewhere.
    #[cfg(not(unix))]
    pub fn ctime(&self) -> io::Result<DateTime<Utc>> {
        to_utc(self.metadata()?.created())
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for Filename {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl PartialEq<str> for Filename {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Filename {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(raw: &str) -> Filename {
        Filename::new(raw).expect("valid filename")
    }

    #[test]
    fn test_construction() {
        assert_eq!(name("/"), "/");
        assert_eq!(name("/bin"), "/bin");
        assert_eq!(name("bin"), "bin");
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            Filename::new("<foo>"),
            Err(ValueError::Filename {
                path: "<foo>".into(),
                ch: '<'
            })
        );
        assert!(Filename::new("foo*").is_err());
        assert!(Filename::new("foo?").is_err());
        assert!(Filename::new("a\0b").is_err());
    }

    #[test]
    fn test_basename_dirname() {
        assert_eq!(name("/foo/bar").basename(), "bar");
        assert_eq!(name("/foo/bar").dirname(), "/foo");
        assert_eq!(name("/foo/bar/").basename(), "");
        assert_eq!(name("/foo").dirname(), "/");
        assert_eq!(name("foo").dirname(), "");
        assert_eq!(name("foo//bar").dirname(), "foo");
    }

    #[test]
    fn test_absolute() {
        assert!(name("/foo/bar").is_absolute());
        assert!(!name("foo/bar").is_absolute());
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(name("bin").abspath().unwrap(), cwd.join("bin"));
        assert_eq!(
            name("foo/bar").abspath().unwrap().strip_prefix(&cwd).unwrap(),
            Path::new("foo/bar")
        );
    }

    #[test]
    fn test_normpath() {
        assert_eq!(name("/FOO//.//BAR").normpath(), "/FOO/BAR");
        assert_eq!(name("a/b/../c").normpath(), "a/c");
        assert_eq!(name("../a").normpath(), "../a");
        assert_eq!(name("/../a").normpath(), "/a");
        assert_eq!(name("").normpath(), ".");
        assert_eq!(name("//a").normpath(), "//a");
        assert_eq!(name("///a").normpath(), "/a");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_normcase_unchanged() {
        assert_eq!(name("/FOO/BAR").normcase(), "/FOO/BAR");
    }

    #[test]
    fn test_directory_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().into_owned();
        let filename = name(&path);
        let meta = fs::metadata(dir.path()).unwrap();

        assert!(filename.exists());
        assert!(filename.is_dir());
        assert!(!filename.is_file());
        assert!(!filename.is_link());
        assert!(!filename.is_mount());
        assert_eq!(filename.size().unwrap(), meta.len());
        assert_eq!(
            filename.mtime().unwrap(),
            DateTime::<Utc>::from(meta.modified().unwrap())
        );
        assert_eq!(
            filename.realpath().unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_regular_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("access.log");
        fs::write(&file, b"#Version: 1.0\n").unwrap();
        let filename = name(&file.to_string_lossy());
        assert!(filename.is_file());
        assert_eq!(filename.size().unwrap(), 14);
        assert_eq!(filename.basename(), "access.log");
        assert!(filename.ctime().is_ok());
        assert!(filename.atime().is_ok());
    }

    #[test]
    fn test_missing_path() {
        let filename = name("/definitely/not/here");
        assert!(!filename.exists());
        assert!(!filename.lexists());
        assert!(filename.size().is_err());
        assert!(filename.realpath().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        let foo = dir.path().join("foo");
        let bar = dir.path().join("bar");
        std::os::unix::fs::symlink(dir.path(), &foo).unwrap();
        std::os::unix::fs::symlink(&foo, &bar).unwrap();
        fs::remove_file(&foo).unwrap();

        let filename = name(&bar.to_string_lossy());
        assert!(!filename.exists());
        assert!(filename.lexists());
        assert!(filename.is_link());
    }

    #[cfg(unix)]
    #[test]
    fn test_root_is_mount() {
        assert!(name("/").is_mount());
    }
}
