// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Strategies mapping a library name onto candidate paths.

use std::{fmt, marker::PhantomData, ops::ControlFlow};

use crate::locate::{PathLocator, Probes, Resource};
use crate::naming;
use crate::platform::PlatformSpec;
use crate::Result;

mod preloaded;

pub use preloaded::WithPreloaded;

/// Picks which file a library name refers to.
pub trait LibraryResolver: Send + Sync + fmt::Debug {
	/// Whether `lib_name` is already available to the process and needs no file.
	fn is_preloaded(&self, platform: &PlatformSpec, lib_name: &str) -> bool {
		let _ = (platform, lib_name);
		false
	}

	/// Returns the first candidate `locator` can find.
	///
	/// # Errors
	/// Fails with [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if
	/// nothing resolved, carrying the first probe failure (if any) as its source.
	fn resolve(
		&self,
		locator: &dyn PathLocator,
		component: Option<&str>,
		platform: &PlatformSpec,
		lib_name: &str,
	) -> Result<Resource>;
}

impl<R: LibraryResolver + ?Sized> LibraryResolver for Box<R> {
	#[inline]
	fn is_preloaded(&self, platform: &PlatformSpec, lib_name: &str) -> bool {
		(**self).is_preloaded(platform, lib_name)
	}

	#[inline]
	fn resolve(
		&self,
		locator: &dyn PathLocator,
		component: Option<&str>,
		platform: &PlatformSpec,
		lib_name: &str,
	) -> Result<Resource> {
		(**self).resolve(locator, component, platform, lib_name)
	}
}

/// Joins platform segments into a directory name.
pub trait PathJoiner: Send + Sync + 'static {
	fn join(segments: &[&str]) -> String;
}

/// `linux-x86_64-musl/libfoo.so`
#[derive(Debug, Clone, Copy, Default)]
pub struct Flat;

/// `linux/x86_64/musl/libfoo.so`
#[derive(Debug, Clone, Copy, Default)]
pub struct Nested;

impl PathJoiner for Flat {
	#[inline]
	fn join(segments: &[&str]) -> String {
		segments.join("-")
	}
}

impl PathJoiner for Nested {
	#[inline]
	fn join(segments: &[&str]) -> String {
		segments.join("/")
	}
}

/// The most-specific-first candidate paths for `lib_name`, e.g. for a musl
/// linux on x86_64 with a flat layout:
///
/// 1. `linux-x86_64-musl/libfoo.so`
/// 2. `linux-x86_64/libfoo.so`
/// 3. `linux/libfoo.so`
/// 4. `libfoo.so`
pub fn candidate_paths<J: PathJoiner>(platform: &PlatformSpec, lib_name: &str) -> Vec<String> {
	let file_name = naming::lib_file_name(platform, lib_name);
	let mut candidates = Vec::with_capacity(4);
	if let Some(os) = naming::os_segment(platform) {
		if let Some(arch) = naming::arch_segment(platform) {
			if let Some(libc) = naming::libc_segment(platform) {
				candidates.push(format!("{}/{file_name}", J::join(&[os, arch, libc])));
			}
			candidates.push(format!("{}/{file_name}", J::join(&[os, arch])));
		}
		candidates.push(format!("{os}/{file_name}"));
	}
	candidates.push(file_name);
	candidates
}

/// The fallback search shared by every directory layout.
///
/// Candidates are probed under `component` first and then, if that found
/// nothing, without it. A failing probe never ends the search; the first
/// failure is reported only if nothing at all was found.
pub fn resolve_layout<J: PathJoiner>(
	locator: &dyn PathLocator,
	component: Option<&str>,
	platform: &PlatformSpec,
	lib_name: &str,
) -> Result<Resource> {
	let candidates = candidate_paths::<J>(platform, lib_name);
	let mut probes = Probes::default();
	if component.is_some() {
		probes = match probes.search(locator, component, &candidates) {
			ControlFlow::Break(found) => return Ok(found),
			ControlFlow::Continue(probes) => probes,
		};
	}
	match probes.search(locator, None, &candidates) {
		ControlFlow::Break(found) => Ok(found),
		ControlFlow::Continue(probes) => probes.finish(None, lib_name),
	}
}

/// A resolver for one directory layout.
pub struct LayoutResolver<J: PathJoiner>(PhantomData<J>);

/// Libraries stored as `{os}-{arch}-{libc}/{file}`.
pub type FlatDirs = LayoutResolver<Flat>;
/// Libraries stored as `{os}/{arch}/{libc}/{file}`.
pub type NestedDirs = LayoutResolver<Nested>;

impl<J: PathJoiner> LayoutResolver<J> {
	#[inline]
	pub const fn new() -> Self {
		Self(PhantomData)
	}
}

impl<J: PathJoiner> Default for LayoutResolver<J> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<J: PathJoiner> Clone for LayoutResolver<J> {
	#[inline]
	fn clone(&self) -> Self {
		Self::new()
	}
}

impl<J: PathJoiner> Copy for LayoutResolver<J> {}

impl<J: PathJoiner> fmt::Debug for LayoutResolver<J> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "LayoutResolver({})", J::join(&["os", "arch"]))
	}
}

impl<J: PathJoiner> LibraryResolver for LayoutResolver<J> {
	fn resolve(
		&self,
		locator: &dyn PathLocator,
		component: Option<&str>,
		platform: &PlatformSpec,
		lib_name: &str,
	) -> Result<Resource> {
		resolve_layout::<J>(locator, component, platform, lib_name)
	}
}
