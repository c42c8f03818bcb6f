// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{fmt, io, path::Path};

use crate::os;

/// The primitive that maps a library file into the running process.
///
/// [`System`] is the real thing; a custom `Loader` can stand in for it, for
/// example to record what would have been loaded.
///
/// # Safety
/// Implementations must only report success once the library at `path` is
/// actually usable by the process.
pub unsafe trait Loader: Send + Sync + fmt::Debug {
	/// Loads the library at `path`.
	///
	/// # Safety
	/// Loading runs arbitrary initialization code from the library.
	unsafe fn open(&self, path: &Path) -> io::Result<()>;
}

/// Loads libraries with `dlopen` (unix) or `LoadLibraryExW` (windows).
///
/// The handle is kept open for the life of the process; a loaded library is
/// never unloaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

unsafe impl Loader for System {
	unsafe fn open(&self, path: &Path) -> io::Result<()> {
		let _handle = os::dylib_open(path.as_os_str())?;
		Ok(())
	}
}
