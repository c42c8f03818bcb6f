// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Observation hooks fired while libraries are resolved, extracted and loaded.

use std::{
	any::Any,
	fmt, io,
	panic::{self, AssertUnwindSafe},
	path::Path,
	sync::Arc,
};

use crate::error::LoadError;
use crate::locate::Resource;
use crate::platform::PlatformSpec;

/// The library an event is about.
#[derive(Debug, Clone, Copy)]
pub struct LibInfo<'a> {
	pub platform: &'a PlatformSpec,
	pub component: Option<&'a str>,
	pub lib_name: &'a str,
}

/// Receives loading events. Every method defaults to doing nothing.
///
/// Listeners are best effort: a panicking callback is caught and logged, and
/// never changes the outcome of the operation that fired it.
#[allow(unused_variables)]
pub trait LibraryLoadingListener: Send + Sync {
	/// A library was resolved. `resource` is `None` for preloaded libraries.
	fn on_resolve_dynamic(&self, lib: LibInfo<'_>, is_preloaded: bool, resource: Option<&Resource>) {}

	fn on_resolve_dynamic_failure(&self, lib: LibInfo<'_>, error: &LoadError) {}

	/// A library was loaded. `path` is `None` for preloaded libraries.
	fn on_load(&self, lib: LibInfo<'_>, is_preloaded: bool, path: Option<&Path>) {}

	fn on_load_failure(&self, lib: LibInfo<'_>, error: &LoadError) {}

	fn on_temp_file_created(&self, lib: LibInfo<'_>, temp_file: &Path) {}

	/// `temp_file` is set if the file was created but could not be filled.
	fn on_temp_file_creation_failure(
		&self,
		lib: LibInfo<'_>,
		temp_dir: Option<&Path>,
		lib_ext: &str,
		temp_file: Option<&Path>,
		error: &io::Error,
	) {
	}

	fn on_temp_file_cleanup(&self, lib: LibInfo<'_>, temp_file: &Path) {}
}

/// An ordered, immutable chain of listeners.
///
/// [`Listeners::Nop`] stands in for "no listener", so callers never check.
/// [`join`](Listeners::join) builds a new chain and leaves `self` alone.
#[derive(Clone, Default)]
pub enum Listeners {
	#[default]
	Nop,
	Composite(Arc<[Arc<dyn LibraryLoadingListener>]>),
}

impl Listeners {
	pub fn new(listeners: Vec<Arc<dyn LibraryLoadingListener>>) -> Self {
		if listeners.is_empty() {
			Listeners::Nop
		} else {
			Listeners::Composite(listeners.into())
		}
	}

	/// Returns a chain with `listener` appended.
	pub fn join(&self, listener: Arc<dyn LibraryLoadingListener>) -> Self {
		let mut all: Vec<_> = self.as_slice().to_vec();
		all.push(listener);
		Listeners::Composite(all.into())
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.as_slice().is_empty()
	}

	fn as_slice(&self) -> &[Arc<dyn LibraryLoadingListener>] {
		match self {
			Listeners::Nop => &[],
			Listeners::Composite(listeners) => &listeners[..],
		}
	}

	fn each<F>(&self, event: &'static str, f: F)
	where
		F: Fn(&dyn LibraryLoadingListener),
	{
		for listener in self.as_slice() {
			if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| f(&**listener))) {
				tracing::warn!(event, reason = panic_message(&*panic), "listener panicked");
			}
		}
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
	if let Some(s) = panic.downcast_ref::<&'static str>() {
		s
	} else if let Some(s) = panic.downcast_ref::<String>() {
		s
	} else {
		"unknown"
	}
}

impl fmt::Debug for Listeners {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Listeners::Nop => f.write_str("Nop"),
			Listeners::Composite(listeners) => write!(f, "Composite({})", listeners.len()),
		}
	}
}

impl LibraryLoadingListener for Listeners {
	fn on_resolve_dynamic(&self, lib: LibInfo<'_>, is_preloaded: bool, resource: Option<&Resource>) {
		self.each("on_resolve_dynamic", |l| {
			l.on_resolve_dynamic(lib, is_preloaded, resource)
		});
	}

	fn on_resolve_dynamic_failure(&self, lib: LibInfo<'_>, error: &LoadError) {
		self.each("on_resolve_dynamic_failure", |l| {
			l.on_resolve_dynamic_failure(lib, error)
		});
	}

	fn on_load(&self, lib: LibInfo<'_>, is_preloaded: bool, path: Option<&Path>) {
		self.each("on_load", |l| l.on_load(lib, is_preloaded, path));
	}

	fn on_load_failure(&self, lib: LibInfo<'_>, error: &LoadError) {
		self.each("on_load_failure", |l| l.on_load_failure(lib, error));
	}

	fn on_temp_file_created(&self, lib: LibInfo<'_>, temp_file: &Path) {
		self.each("on_temp_file_created", |l| l.on_temp_file_created(lib, temp_file));
	}

	fn on_temp_file_creation_failure(
		&self,
		lib: LibInfo<'_>,
		temp_dir: Option<&Path>,
		lib_ext: &str,
		temp_file: Option<&Path>,
		error: &io::Error,
	) {
		self.each("on_temp_file_creation_failure", |l| {
			l.on_temp_file_creation_failure(lib, temp_dir, lib_ext, temp_file, error)
		});
	}

	fn on_temp_file_cleanup(&self, lib: LibInfo<'_>, temp_file: &Path) {
		self.each("on_temp_file_cleanup", |l| l.on_temp_file_cleanup(lib, temp_file));
	}
}
