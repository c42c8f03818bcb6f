// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
#![allow(non_snake_case)]

use std::os::windows::ffi::OsStrExt;
use std::os::windows::raw::HANDLE;
use std::{ffi, io, ptr};

use super::Handle;

type HMODULE = HANDLE;
type PCWSTR = *const u16;

#[link(name = "kernel32")]
extern "system" {
	fn LoadLibraryExW(lplibfilename: PCWSTR, hfile: HANDLE, dwflags: u32) -> HMODULE;
}

// provided by the C runtime
extern "C" {
	fn atexit(hook: extern "C" fn()) -> ffi::c_int;
}

fn to_wide(path: &ffi::OsStr) -> Vec<u16> {
	path.encode_wide().chain(std::iter::once(0u16)).collect()
}

#[inline]
pub(crate) unsafe fn dylib_open(path: &ffi::OsStr) -> io::Result<Handle> {
	let wide_str: Vec<u16> = to_wide(path);
	let handle = LoadLibraryExW(wide_str.as_ptr(), ptr::null_mut(), 0);
	if handle.is_null() {
		Err(io::Error::last_os_error())
	} else {
		Ok(handle.cast())
	}
}

pub(crate) fn at_exit(hook: extern "C" fn()) -> io::Result<()> {
	if unsafe { atexit(hook) } != 0 {
		Err(io::Error::new(io::ErrorKind::Other, "atexit registration failed"))
	} else {
		Ok(())
	}
}
