use std::io::{BufRead, Write};

use tracing::{debug, trace};

use crate::entry::FileInfo;
use crate::error::ManifestError;
use crate::state::{DesiredState, InsertConflict};

/// Parsing switches for [`parse_manifest`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ManifestOptions {
    allow_relative: bool,
    use_metadata: bool,
}

impl ManifestOptions {
    /// Creates the default configuration: absolute targets required, every
    /// line semantic.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_relative: false,
            use_metadata: false,
        }
    }

    /// Permits relative link targets.
    #[must_use]
    pub const fn allow_relative(mut self, allow: bool) -> Self {
        self.allow_relative = allow;
        self
    }

    /// Treats every even-numbered line (1-indexed) as opaque metadata.
    ///
    /// Metadata lines are still copied into the archive stream but are never
    /// interpreted and never create entries.
    #[must_use]
    pub const fn use_metadata(mut self, use_metadata: bool) -> Self {
        self.use_metadata = use_metadata;
        self
    }

    /// Reports whether relative targets are permitted.
    #[must_use]
    pub const fn allows_relative(&self) -> bool {
        self.allow_relative
    }

    /// Reports whether even-numbered lines are skipped as metadata.
    #[must_use]
    pub const fn uses_metadata(&self) -> bool {
        self.use_metadata
    }
}

/// Parses a runfiles manifest, copying every raw line into `archive`.
///
/// Lines are processed as bytes so the archive copy stays byte-identical to
/// the input; only semantic lines are required to be valid UTF-8. Returns the
/// populated [`DesiredState`] including synthesized parent directories.
///
/// # Errors
///
/// Returns [`ManifestError`] for I/O failures on either stream and for any
/// malformed semantic line; malformed-line variants carry the 1-indexed line
/// number and the offending text.
pub fn parse_manifest<R, W>(
    input: &mut R,
    archive: &mut W,
    options: ManifestOptions,
) -> Result<DesiredState, ManifestError>
where
    R: BufRead,
    W: Write,
{
    let mut state = DesiredState::new();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .map_err(|source| ManifestError::Read { source })?;
        if read == 0 {
            break;
        }
        archive
            .write_all(&buf)
            .map_err(|source| ManifestError::Archive { source })?;

        line_number += 1;
        if options.uses_metadata() && line_number % 2 == 0 {
            trace!(line = line_number, "skipping metadata line");
            continue;
        }
        parse_line(&buf, line_number, &options, &mut state)?;
    }

    debug!(
        lines = line_number,
        entries = state.len(),
        "parsed manifest"
    );
    Ok(state)
}

fn parse_line(
    raw: &[u8],
    line: usize,
    options: &ManifestOptions,
    state: &mut DesiredState,
) -> Result<(), ManifestError> {
    let content = match raw.split_last() {
        Some((&b'\n', content)) if !content.is_empty() => content,
        _ => {
            return Err(ManifestError::MissingTerminator {
                line,
                text: String::from_utf8_lossy(raw).trim_end().to_string(),
            });
        }
    };
    let content = std::str::from_utf8(content)
        .map_err(|_| ManifestError::InvalidUtf8 { line })?;

    if content.starts_with('/') {
        return Err(ManifestError::AbsolutePath {
            line,
            text: content.to_string(),
        });
    }
    let Some(delimiter) = content.find(' ') else {
        return Err(ManifestError::MissingDelimiter {
            line,
            text: content.to_string(),
        });
    };
    let (link, rest) = content.split_at(delimiter);
    let target = &rest[1..];
    if target.contains(' ') {
        return Err(ManifestError::SpaceInFilename {
            line,
            text: content.to_string(),
        });
    }
    if link.is_empty() {
        return Err(ManifestError::EmptyLink {
            line,
            text: content.to_string(),
        });
    }
    if !options.allows_relative() && !target.is_empty() && !is_absolute_target(target) {
        return Err(ManifestError::ExpectedAbsolute {
            line,
            text: content.to_string(),
        });
    }

    let info = if target.is_empty() {
        FileInfo::regular()
    } else {
        FileInfo::symlink(target)
    };
    trace!(line, path = link, kind = %info.kind(), "manifest entry");
    state.insert(link, info).map_err(|conflict| match conflict {
        InsertConflict::ReplacesDirectory { path } => ManifestError::DirectoryConflict {
            line,
            path,
            text: content.to_string(),
        },
        InsertConflict::NonDirectoryAncestor { path } => ManifestError::NonDirectoryAncestor {
            line,
            path,
            text: content.to_string(),
        },
    })
}

/// A target counts as absolute when it starts with `/` or carries a Windows
/// drive prefix (`X:\…` or `X:/…`); the drive test matches any second-byte
/// colon, as upstream does.
fn is_absolute_target(target: &str) -> bool {
    target.starts_with('/') || target.as_bytes().get(1) == Some(&b':')
}
