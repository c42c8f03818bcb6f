// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Answers "does this relative path exist" for a library layout.
//!
//! A [`PathLocator`] knows nothing about platforms or naming conventions; it is
//! handed candidate paths such as `linux-x86_64/libfoo.so` by a
//! [`LibraryResolver`](crate::resolve::LibraryResolver) and reports what it
//! found, if anything.

use std::{
	fmt, io,
	ops::ControlFlow,
	path::{Path, PathBuf},
	sync::Arc,
};

use crate::error::LoadError;
use crate::Result;

mod dirs;
mod resources;

pub use dirs::DirLocator;
pub use resources::{Embedded, ResourceLocator, ResourceNamespace, Unpacked};

/// A located library artifact.
pub enum Resource {
	/// The artifact already has a real filesystem path and can be loaded in place.
	File(PathBuf),
	/// The artifact can only be read; it must be copied to a file before loading.
	Stream {
		location: String,
		reader: Box<dyn io::Read + Send>,
	},
}

impl Resource {
	#[inline]
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Resource::File(path.into())
	}

	#[inline]
	pub fn stream(location: impl Into<String>, reader: impl io::Read + Send + 'static) -> Self {
		Resource::Stream {
			location: location.into(),
			reader: Box::new(reader),
		}
	}

	/// The filesystem path for [`Resource::File`].
	#[inline]
	pub fn as_path(&self) -> Option<&Path> {
		match self {
			Resource::File(path) => Some(path),
			Resource::Stream { .. } => None,
		}
	}

	#[inline]
	pub fn is_file(&self) -> bool {
		matches!(self, Resource::File(_))
	}
}

impl fmt::Display for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Resource::File(path) => write!(f, "file:{}", path.display()),
			Resource::Stream { location, .. } => f.write_str(location),
		}
	}
}

impl fmt::Debug for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Resource::File(path) => f.debug_tuple("File").field(path).finish(),
			Resource::Stream { location, .. } => {
				f.debug_struct("Stream").field("location", location).finish_non_exhaustive()
			}
		}
	}
}

/// Resolves a relative path, optionally scoped under a component, to a [`Resource`].
///
/// `Ok(None)` means the path simply does not exist. `Err` is reserved for
/// probes that could not be answered at all.
pub trait PathLocator: Send + Sync + fmt::Debug {
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>>;
}

impl<L: PathLocator + ?Sized> PathLocator for Arc<L> {
	#[inline]
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		(**self).locate(component, path)
	}
}

impl<L: PathLocator + ?Sized> PathLocator for Box<L> {
	#[inline]
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		(**self).locate(component, path)
	}
}

impl<L: PathLocator + ?Sized> PathLocator for &L {
	#[inline]
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		(**self).locate(component, path)
	}
}

/// Accumulates the outcome of a sequence of locator probes.
///
/// A failed probe is remembered (only the first one) instead of ending the
/// search, so later candidates still get their turn.
#[derive(Debug, Default)]
pub struct Probes {
	first_failure: Option<io::Error>,
}

impl Probes {
	/// Runs a single probe.
	pub fn probe(
		self,
		locator: &dyn PathLocator,
		component: Option<&str>,
		path: &str,
	) -> (Self, Option<Resource>) {
		match locator.locate(component, path) {
			Ok(Some(found)) => {
				tracing::debug!(?component, path, %found, "probe hit");
				(self, Some(found))
			}
			Ok(None) => {
				tracing::trace!(?component, path, "probe miss");
				(self, None)
			}
			Err(e) => {
				tracing::debug!(?component, path, error = %e, "probe failed");
				(self.record(e), None)
			}
		}
	}

	/// Probes `paths` in order, stopping at the first hit.
	pub fn search<S: AsRef<str>>(
		self,
		locator: &dyn PathLocator,
		component: Option<&str>,
		paths: &[S],
	) -> ControlFlow<Resource, Self> {
		paths.iter().try_fold(self, |probes, path| {
			match probes.probe(locator, component, path.as_ref()) {
				(_, Some(found)) => ControlFlow::Break(found),
				(probes, None) => ControlFlow::Continue(probes),
			}
		})
	}

	fn record(self, failure: io::Error) -> Self {
		match self.first_failure {
			Some(_) => self,
			None => Self {
				first_failure: Some(failure),
			},
		}
	}

	#[inline]
	pub fn first_failure(&self) -> Option<&io::Error> {
		self.first_failure.as_ref()
	}

	/// The error to raise once every candidate came up empty: not-found,
	/// caused by the first recorded failure if there was one.
	pub fn into_not_found(self, lib_name: &str) -> LoadError {
		let err = LoadError::not_found(lib_name);
		match self.first_failure {
			Some(cause) => err.with_source(cause),
			None => err,
		}
	}

	/// Returns `found`, or the not-found error when the search came up empty.
	pub fn finish(self, found: Option<Resource>, lib_name: &str) -> Result<Resource> {
		found.ok_or_else(|| self.into_not_found(lib_name))
	}
}
