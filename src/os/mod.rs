// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Thin wrappers over the host's dynamic loader.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as imp;
#[cfg(windows)]
use windows as imp;

use std::{ffi, io};

pub(crate) type Handle = *mut ffi::c_void;

/// Loads the library at `path` into the process.
///
/// # Safety
/// Loading runs the library's initializers.
#[inline]
pub(crate) unsafe fn dylib_open(path: &ffi::OsStr) -> io::Result<Handle> {
	imp::dylib_open(path)
}

/// Registers `hook` to run when the process exits normally.
#[inline]
pub(crate) fn at_exit(hook: extern "C" fn()) -> io::Result<()> {
	imp::at_exit(hook)
}
