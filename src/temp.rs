// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{
	fs, io,
	path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// Creates the private temporary files stream-only libraries are copied into.
#[derive(Debug, Clone, Default)]
pub struct TempFileManager {
	dir: Option<PathBuf>,
}

impl TempFileManager {
	/// Files go to `dir`, or the host's temporary directory if `None`.
	pub fn new(dir: Option<PathBuf>) -> Self {
		Self { dir }
	}

	#[inline]
	pub fn dir(&self) -> Option<&Path> {
		self.dir.as_deref()
	}

	/// Creates an empty, uniquely named `{lib_name}XXXXXX.{lib_ext}` file.
	///
	/// The file (and the configured directory, if it has to be created) is
	/// owner-only `rwx` from the moment it exists. The returned handle deletes
	/// the file when dropped unless it is kept.
	pub fn create_temp_file(&self, lib_name: &str, lib_ext: &str) -> io::Result<NamedTempFile> {
		let suffix = format!(".{lib_ext}");
		let mut builder = tempfile::Builder::new();
		builder.prefix(lib_name).suffix(&suffix);
		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			builder.permissions(fs::Permissions::from_mode(0o700));
		}
		match &self.dir {
			Some(dir) => {
				create_private_dir(dir)?;
				builder.tempfile_in(dir)
			}
			None => builder.tempfile(),
		}
	}
}

// an existing directory is fine, another thread may have just made it.
fn create_private_dir(dir: &Path) -> io::Result<()> {
	let mut builder = fs::DirBuilder::new();
	builder.recursive(true);
	#[cfg(unix)]
	{
		use std::os::unix::fs::DirBuilderExt;
		builder.mode(0o700);
	}
	builder.create(dir)
}
