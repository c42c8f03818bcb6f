// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use super::Handle;
use std::os::unix::ffi::OsStrExt;
use std::{ffi, io};

#[cfg(not(any(target_os = "linux", target_os = "macos", target_env = "gnu")))]
use std::sync;

// `dlerror` is only thread-local on some libcs.
#[cfg(not(any(target_os = "linux", target_os = "macos", target_env = "gnu")))]
#[inline]
fn dylib_guard<'a>() -> sync::LockResult<sync::MutexGuard<'a, ()>> {
	static LOCK: sync::Mutex<()> = sync::Mutex::new(());
	LOCK.lock()
}

#[cfg(any(target_os = "linux", target_os = "macos", target_env = "gnu"))]
#[inline(always)]
fn dylib_guard() {}

unsafe fn dylib_error() -> io::Error {
	let msg = libc::dlerror();
	if msg.is_null() {
		return io::Error::new(io::ErrorKind::Other, "dlopen failed without an error message");
	}
	let e = ffi::CStr::from_ptr(msg).to_string_lossy().into_owned();
	io::Error::new(io::ErrorKind::Other, e)
}

pub(crate) unsafe fn dylib_open(path: &ffi::OsStr) -> io::Result<Handle> {
	let c_str = ffi::CString::new(path.as_bytes())?;
	let _lock = dylib_guard();
	let _ = libc::dlerror(); // clear existing errors
	let handle = libc::dlopen(c_str.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL);
	if handle.is_null() {
		Err(dylib_error())
	} else {
		Ok(handle)
	}
}

pub(crate) fn at_exit(hook: extern "C" fn()) -> io::Result<()> {
	if unsafe { libc::atexit(hook) } != 0 {
		Err(io::Error::new(io::ErrorKind::Other, "atexit registration failed"))
	} else {
		Ok(())
	}
}
