//! Where the header text comes from: a local file, stdin, or an LLVM
//! release branch on GitHub.

use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const RAW_BASE_URL: &str = "https://raw.githubusercontent.com/llvm/llvm-project";
const FORMAT_H_PATH: &str = "clang/include/clang/Format/Format.h";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Release branches known to carry `Format.h`.
pub const KNOWN_VERSIONS: std::ops::RangeInclusive<u32> = 10..=20;

/// Anything that can hand over the complete header text.
pub trait HeaderSource {
    /// Identifier recorded in the output metadata.
    fn id(&self) -> String;
    fn read(&self) -> Result<String>;
}

pub struct FileSource {
    pub path: PathBuf,
}

impl HeaderSource for FileSource {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String> {
        let text = fs::read_to_string(&self.path).map_err(|source| Error::InputUnavailable {
            origin: self.id(),
            source,
        })?;
        info!(file = %self.path.display(), bytes = text.len(), "read header");
        Ok(text)
    }
}

pub struct StdinSource;

impl HeaderSource for StdinSource {
    fn id(&self) -> String {
        "<stdin>".to_string()
    }

    fn read(&self) -> Result<String> {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| Error::InputUnavailable {
                origin: self.id(),
                source,
            })?;
        Ok(text)
    }
}

/// `Format.h` of an LLVM `release/<N>.x` branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlvmRelease {
    pub version: u32,
}

impl LlvmRelease {
    /// Accepts a bare major version like `"19"`.
    pub fn parse(version: &str) -> Result<Self> {
        let version: u32 = version
            .trim()
            .parse()
            .map_err(|_| Error::InvalidVersion(version.to_string()))?;
        if !KNOWN_VERSIONS.contains(&version) {
            warn!(version, "version may not exist; release branches are typically 10-20");
        }
        Ok(Self { version })
    }

    pub fn branch(&self) -> String {
        format!("release/{}.x", self.version)
    }

    pub fn url(&self) -> String {
        format!("{}/{}/{}", RAW_BASE_URL, self.branch(), FORMAT_H_PATH)
    }
}

impl HeaderSource for LlvmRelease {
    fn id(&self) -> String {
        format!("llvm-{}:Format.h", self.version)
    }

    fn read(&self) -> Result<String> {
        let url = self.url();
        info!(%url, "downloading Format.h");

        let response = match ureq::get(&url).timeout(FETCH_TIMEOUT).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => {
                return Err(Error::Fetch {
                    url,
                    reason: format!("not found; the branch {} may not exist", self.branch()),
                })
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(Error::Fetch {
                    url,
                    reason: format!("HTTP {}", code),
                })
            }
            Err(err) => {
                return Err(Error::Fetch {
                    url,
                    reason: err.to_string(),
                })
            }
        };

        let text = response
            .into_string()
            .map_err(|source| Error::InputUnavailable {
                origin: url.clone(),
                source,
            })?;
        info!(chars = text.len(), "download complete");
        Ok(text)
    }
}

/// One line per known release branch, for `fetch --list-versions`.
pub fn version_listing() -> String {
    let mut out = String::from("LLVM Format.h versions typically available:\n");
    for version in KNOWN_VERSIONS {
        let release = LlvmRelease { version };
        out.push_str(&format!("  LLVM {}.x: {} branch\n", version, release.branch()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn release_url() {
        let release = LlvmRelease::parse("19").unwrap();
        assert_eq!(
            release.url(),
            "https://raw.githubusercontent.com/llvm/llvm-project/release/19.x/clang/include/clang/Format/Format.h"
        );
    }

    #[test]
    fn out_of_range_version_is_still_accepted() {
        assert_eq!(LlvmRelease::parse("42").unwrap().version, 42);
    }

    #[test]
    fn non_numeric_version_is_rejected() {
        assert!(matches!(
            LlvmRelease::parse("nineteen"),
            Err(Error::InvalidVersion(_))
        ));
    }

    #[test]
    fn file_source_reads_text() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"struct FormatStyle {\n};\n").unwrap();
        let source = FileSource {
            path: file.path().to_path_buf(),
        };
        assert!(source.read().unwrap().starts_with("struct FormatStyle"));
    }

    #[test]
    fn missing_file_is_input_unavailable() {
        let source = FileSource {
            path: PathBuf::from("/nonexistent/Format.h"),
        };
        assert!(matches!(
            source.read(),
            Err(Error::InputUnavailable { .. })
        ));
    }

    #[test]
    fn listing_covers_known_versions() {
        let listing = version_listing();
        assert!(listing.contains("LLVM 10.x: release/10.x branch"));
        assert!(listing.contains("LLVM 20.x: release/20.x branch"));
    }
}
