// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{fmt, io};

use thiserror::Error;

/// The category of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The platform has an unknown OS or architecture, so nothing was probed.
	UnsupportedPlatform,
	/// Every candidate path was probed and none resolved.
	NotFound,
	/// The dynamic loader rejected the file.
	LoadFailure,
	/// A temporary file could not be created or filled.
	Materialization,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ErrorKind::UnsupportedPlatform => "unsupported platform",
			ErrorKind::NotFound => "not found",
			ErrorKind::LoadFailure => "failed to load",
			ErrorKind::Materialization => "failed to extract",
		})
	}
}

/// Error raised while resolving, extracting or loading a native library.
#[derive(Debug, Error)]
#[error("Native Loader Error: library `{lib_name}` {kind}")]
pub struct LoadError {
	lib_name: String,
	kind: ErrorKind,
	#[source]
	source: Option<io::Error>,
}

impl LoadError {
	#[inline]
	pub fn new(lib_name: impl Into<String>, kind: ErrorKind) -> Self {
		Self {
			lib_name: lib_name.into(),
			kind,
			source: None,
		}
	}

	#[inline]
	pub fn unsupported_platform(lib_name: impl Into<String>) -> Self {
		Self::new(lib_name, ErrorKind::UnsupportedPlatform)
	}

	#[inline]
	pub fn not_found(lib_name: impl Into<String>) -> Self {
		Self::new(lib_name, ErrorKind::NotFound)
	}

	/// Attaches the underlying cause.
	#[inline]
	pub fn with_source(mut self, source: io::Error) -> Self {
		self.source = Some(source);
		self
	}

	#[inline]
	pub const fn kind(&self) -> ErrorKind {
		self.kind
	}

	#[inline]
	pub fn lib_name(&self) -> &str {
		&self.lib_name
	}

	/// The underlying I/O or loader error, if one was recorded.
	#[inline]
	pub fn cause(&self) -> Option<&io::Error> {
		self.source.as_ref()
	}
}
