use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::ArgMatches;
use runfiles_core::absolutize;
use runfiles_engine::{reconcile, EngineError, ReconcileOptions};
use runfiles_fsops::{Filesystem, LocalFilesystem};
use runfiles_manifest::{parse_manifest, ManifestError, ManifestOptions};
use thiserror::Error;
use tracing::debug;

/// Name of the committed manifest archive inside the output base.
pub const ARCHIVE_NAME: &str = "MANIFEST";

/// Name the archive is written under while a run is in progress.
pub const ARCHIVE_TMP_NAME: &str = "MANIFEST.tmp";

#[derive(Clone, Debug)]
pub(crate) struct ParsedArgs {
    pub(crate) allow_relative: bool,
    pub(crate) use_metadata: bool,
    pub(crate) windows_compatible: bool,
    pub(crate) input: PathBuf,
    pub(crate) runfiles: PathBuf,
}

impl ParsedArgs {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            allow_relative: matches.get_flag("allow_relative"),
            use_metadata: matches.get_flag("use_metadata"),
            windows_compatible: matches.get_flag("windows_compatible"),
            input: matches
                .get_one::<PathBuf>("input")
                .cloned()
                .unwrap_or_default(),
            runfiles: matches
                .get_one::<PathBuf>("runfiles")
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Failure raised by the driver sequence, phrased like the upstream tool's
/// diagnostics.
#[derive(Debug, Error)]
pub(crate) enum DriverError {
    #[error("getcwd failed")]
    Getcwd { source: io::Error },

    #[error("creating directory '{path}'")]
    CreateBase { path: PathBuf, source: io::Error },

    #[error("chmod '{path}'")]
    BasePerms { path: PathBuf, source: io::Error },

    #[error("opening '{path}' for reading")]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("opening '{path}' for writing")]
    OpenArchive { path: PathBuf, source: io::Error },

    #[error("writing to '{path}'")]
    WriteArchive { path: PathBuf, source: io::Error },

    #[error("removing previous file at '{path}'")]
    RemovePrevious { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Parse(#[from] ManifestError),

    #[error(transparent)]
    Reconcile(#[from] EngineError),

    #[error("renaming '{from}' to '{to}'")]
    CommitArchive {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Runs the full parse → prune → create → commit sequence.
///
/// The order matters: the input path is pinned to an absolute path first,
/// the output base is prepared before the archive stream is opened inside
/// it, the in-progress archive is registered as a kept entry before the
/// prune pass, and the rename is last so observers of `MANIFEST` only ever
/// see a fully written copy.
pub(crate) fn execute(args: &ParsedArgs) -> Result<(), DriverError> {
    let filesystem = LocalFilesystem::new();
    let input = absolutize(&args.input).map_err(|source| DriverError::Getcwd { source })?;
    let base = &args.runfiles;

    filesystem
        .ensure_dir(base)
        .map_err(|source| DriverError::CreateBase {
            path: base.clone(),
            source,
        })?;
    filesystem
        .ensure_tree_perms(base)
        .map_err(|source| DriverError::BasePerms {
            path: base.clone(),
            source,
        })?;

    let infile = File::open(&input).map_err(|source| DriverError::OpenInput {
        path: input.clone(),
        source,
    })?;
    let tmp_path = base.join(ARCHIVE_TMP_NAME);
    let tmp = File::create(&tmp_path).map_err(|source| DriverError::OpenArchive {
        path: tmp_path.clone(),
        source,
    })?;

    let options = ManifestOptions::new()
        .allow_relative(args.allow_relative)
        .use_metadata(args.use_metadata);
    let mut reader = BufReader::new(infile);
    let mut writer = BufWriter::new(tmp);
    let mut state = match parse_manifest(&mut reader, &mut writer, options) {
        Ok(state) => state,
        Err(ManifestError::Archive { source }) => {
            return Err(DriverError::WriteArchive {
                path: tmp_path,
                source,
            });
        }
        Err(error) => return Err(error.into()),
    };
    writer.flush().map_err(|source| DriverError::WriteArchive {
        path: tmp_path.clone(),
        source,
    })?;
    drop(writer);

    state.force_regular(ARCHIVE_TMP_NAME);

    let archive = base.join(ARCHIVE_NAME);
    match filesystem.unlink(&archive) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(DriverError::RemovePrevious {
                path: archive,
                source,
            });
        }
    }

    let reconcile_options = ReconcileOptions::new().windows_compatible(args.windows_compatible);
    let summary = reconcile(base, &mut state, &filesystem, reconcile_options)?;
    debug!(
        kept = summary.entries_kept(),
        deleted = summary.entries_deleted(),
        created = summary.entries_created(),
        "runfiles tree is in sync"
    );

    filesystem
        .rename(&tmp_path, &archive)
        .map_err(|source| DriverError::CommitArchive {
            from: tmp_path,
            to: archive,
            source,
        })
}
