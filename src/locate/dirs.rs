// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{
	env,
	ffi::OsStr,
	fs, io,
	path::{Path, PathBuf},
};

use super::{PathLocator, Resource};

/// Variable holding the host's dynamic library search path.
#[cfg(target_os = "macos")]
pub(crate) const SEARCH_PATH_VAR: &str = "DYLD_LIBRARY_PATH";
#[cfg(windows)]
pub(crate) const SEARCH_PATH_VAR: &str = "PATH";
#[cfg(not(any(target_os = "macos", windows)))]
pub(crate) const SEARCH_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Looks for libraries in an ordered list of base directories.
///
/// Each probe checks `base/[component/]path` for every base directory in
/// turn and returns the first regular file found. A directory that cannot be
/// checked does not hide the ones after it; its error is only returned if no
/// directory has the file.
#[derive(Debug, Clone, Default)]
pub struct DirLocator {
	dirs: Vec<PathBuf>,
}

impl DirLocator {
	pub fn new<I, P>(dirs: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self {
			dirs: dirs.into_iter().map(Into::into).collect(),
		}
	}

	/// Splits a search-path string (`:` separated on unix, `;` on windows).
	/// Empty entries are dropped.
	pub fn from_search_path(search_path: impl AsRef<OsStr>) -> Self {
		Self {
			dirs: env::split_paths(search_path.as_ref())
				.filter(|dir| !dir.as_os_str().is_empty())
				.collect(),
		}
	}

	/// The directory holding the running executable, followed by the host's
	/// library search path.
	pub fn host_default() -> Self {
		let exe_dir = env::current_exe()
			.ok()
			.and_then(|exe| exe.parent().map(Path::to_path_buf));
		let search_path = env::var_os(SEARCH_PATH_VAR).unwrap_or_default();
		let mut locator = Self::from_search_path(search_path);
		if let Some(dir) = exe_dir {
			locator.dirs.insert(0, dir);
		}
		locator
	}

	#[inline]
	pub fn dirs(&self) -> &[PathBuf] {
		&self.dirs
	}
}

impl PathLocator for DirLocator {
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		let mut failure = None;
		for base in &self.dirs {
			let mut candidate = base.clone();
			if let Some(component) = component {
				candidate.push(component);
			}
			candidate.push(path);
			match fs::metadata(&candidate) {
				Ok(meta) if meta.is_file() => return Ok(Some(Resource::File(candidate))),
				Ok(_) => {}
				Err(e) if e.kind() == io::ErrorKind::NotFound => {}
				Err(e) => {
					tracing::trace!(path = %candidate.display(), error = %e, "unreadable candidate");
					failure.get_or_insert(e);
				}
			}
		}
		match failure {
			Some(e) => Err(e),
			None => Ok(None),
		}
	}
}
