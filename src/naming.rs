// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! File and directory naming conventions for native libraries.

use crate::platform::{Arch, Os, PlatformSpec};

/// `lib` everywhere but windows.
pub fn lib_prefix(platform: &PlatformSpec) -> &'static str {
	if platform.is_windows() {
		""
	} else {
		"lib"
	}
}

/// `so`, `dylib` or `dll`, without the leading dot.
pub fn lib_extension(platform: &PlatformSpec) -> &'static str {
	if platform.is_mac() {
		"dylib"
	} else if platform.is_windows() {
		"dll"
	} else {
		"so"
	}
}

/// Maps a bare library name to its file name, e.g. `foo` -> `libfoo.so`.
pub fn lib_file_name(platform: &PlatformSpec, lib_name: &str) -> String {
	format!(
		"{}{lib_name}.{}",
		lib_prefix(platform),
		lib_extension(platform)
	)
}

pub fn os_segment(platform: &PlatformSpec) -> Option<&'static str> {
	platform.os().map(|os| match os {
		Os::Linux => "linux",
		Os::MacOs => "macos",
		Os::Windows => "win",
	})
}

pub fn arch_segment(platform: &PlatformSpec) -> Option<&'static str> {
	platform.arch().map(|arch| match arch {
		Arch::X86_64 => "x86_64",
		Arch::Aarch64 => "aarch64",
		Arch::X86_32 => "x86_32",
		Arch::Arm32 => "arm32",
	})
}

/// `musl` or `libc` on linux, absent elsewhere.
pub fn libc_segment(platform: &PlatformSpec) -> Option<&'static str> {
	if !platform.is_linux() {
		None
	} else if platform.is_musl() {
		Some("musl")
	} else {
		Some("libc")
	}
}
