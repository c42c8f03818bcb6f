// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Classification of the platform a library is built for.

use std::fmt;

/// Operating systems with a known library naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
	Linux,
	MacOs,
	Windows,
}

/// Architectures with a known directory segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
	X86_64,
	Aarch64,
	X86_32,
	Arm32,
}

impl Os {
	/// Matches a `target_os` style name.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"linux" => Some(Os::Linux),
			"macos" | "darwin" => Some(Os::MacOs),
			"windows" => Some(Os::Windows),
			_ => None,
		}
	}
}

impl Arch {
	/// Matches a `target_arch` style name.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"x86_64" | "amd64" => Some(Arch::X86_64),
			"aarch64" | "arm64" => Some(Arch::Aarch64),
			"x86" | "i386" | "i686" => Some(Arch::X86_32),
			"arm" => Some(Arch::Arm32),
			_ => None,
		}
	}
}

/// An immutable {OS, architecture, libc flavor} triple.
///
/// An OS or architecture that none of the known names matched is reported as
/// unknown by [`is_unknown_os`](PlatformSpec::is_unknown_os) and
/// [`is_unknown_arch`](PlatformSpec::is_unknown_arch). There is no way to
/// name "unknown" directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformSpec {
	os: Option<Os>,
	arch: Option<Arch>,
	musl: bool,
}

impl PlatformSpec {
	/// Builds a descriptor for a known platform. `musl` is ignored for
	/// anything but linux.
	pub const fn new(os: Os, arch: Arch, musl: bool) -> Self {
		Self::classify(Some(os), Some(arch), musl)
	}

	/// Builds a descriptor from `target_os`/`target_arch` style names. Names
	/// that match nothing leave the OS or architecture unknown.
	pub fn from_names(os: &str, arch: &str, musl: bool) -> Self {
		Self::classify(Os::from_name(os), Arch::from_name(arch), musl)
	}

	const fn classify(os: Option<Os>, arch: Option<Arch>, musl: bool) -> Self {
		let musl = musl && matches!(os, Some(Os::Linux));
		Self { os, arch, musl }
	}

	/// The platform this process is running on.
	pub fn current() -> Self {
		Self::from_names(
			std::env::consts::OS,
			std::env::consts::ARCH,
			cfg!(target_env = "musl"),
		)
	}

	#[inline]
	pub const fn os(&self) -> Option<Os> {
		self.os
	}

	#[inline]
	pub const fn arch(&self) -> Option<Arch> {
		self.arch
	}

	#[inline]
	pub const fn is_linux(&self) -> bool {
		matches!(self.os, Some(Os::Linux))
	}

	#[inline]
	pub const fn is_mac(&self) -> bool {
		matches!(self.os, Some(Os::MacOs))
	}

	#[inline]
	pub const fn is_windows(&self) -> bool {
		matches!(self.os, Some(Os::Windows))
	}

	#[inline]
	pub const fn is_unknown_os(&self) -> bool {
		!(self.is_linux() || self.is_mac() || self.is_windows())
	}

	#[inline]
	pub const fn is_unknown_arch(&self) -> bool {
		self.arch.is_none()
	}

	/// Only meaningful on linux.
	#[inline]
	pub const fn is_musl(&self) -> bool {
		self.musl
	}
}

impl Default for PlatformSpec {
	fn default() -> Self {
		Self::current()
	}
}

impl fmt::Display for PlatformSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let os = match self.os {
			Some(Os::Linux) => "linux",
			Some(Os::MacOs) => "macos",
			Some(Os::Windows) => "windows",
			None => "unknown",
		};
		let arch = match self.arch {
			Some(Arch::X86_64) => "x86_64",
			Some(Arch::Aarch64) => "aarch64",
			Some(Arch::X86_32) => "x86_32",
			Some(Arch::Arm32) => "arm32",
			None => "unknown",
		};
		write!(f, "{os}-{arch}")?;
		if self.musl {
			f.write_str("-musl")?;
		}
		Ok(())
	}
}
