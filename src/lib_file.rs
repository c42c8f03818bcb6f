// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{
	fs, io, mem,
	path::{Path, PathBuf},
	sync::{Arc, Mutex, Once},
};

use crate::error::{ErrorKind, LoadError};
use crate::listener::{LibInfo, LibraryLoadingListener, Listeners};
use crate::load::Loader;
use crate::os;
use crate::platform::PlatformSpec;
use crate::Result;

#[derive(Debug)]
enum Backing {
	Preloaded,
	Regular(PathBuf),
	Temp(PathBuf),
}

/// A resolved library, ready to be loaded.
///
/// A `LibFile` is backed by nothing (the library is preloaded), by a regular
/// file that is left alone, or by a temporary file the `LibFile` owns.
/// Temporary files are deleted by [`close`](LibFile::close), which also runs on
/// drop.
#[derive(Debug)]
pub struct LibFile {
	platform: PlatformSpec,
	component: Option<String>,
	lib_name: String,
	backing: Backing,
	listeners: Listeners,
	loader: Arc<dyn Loader>,
	closed: bool,
}

impl LibFile {
	fn new(
		platform: PlatformSpec,
		component: Option<&str>,
		lib_name: &str,
		backing: Backing,
		listeners: Listeners,
		loader: Arc<dyn Loader>,
	) -> Self {
		Self {
			platform,
			component: component.map(str::to_owned),
			lib_name: lib_name.to_owned(),
			backing,
			listeners,
			loader,
			closed: false,
		}
	}

	pub(crate) fn preloaded(
		platform: PlatformSpec,
		component: Option<&str>,
		lib_name: &str,
		listeners: Listeners,
		loader: Arc<dyn Loader>,
	) -> Self {
		Self::new(platform, component, lib_name, Backing::Preloaded, listeners, loader)
	}

	pub(crate) fn from_file(
		platform: PlatformSpec,
		component: Option<&str>,
		lib_name: &str,
		path: PathBuf,
		listeners: Listeners,
		loader: Arc<dyn Loader>,
	) -> Self {
		Self::new(platform, component, lib_name, Backing::Regular(path), listeners, loader)
	}

	pub(crate) fn from_temp_file(
		platform: PlatformSpec,
		component: Option<&str>,
		lib_name: &str,
		path: PathBuf,
		listeners: Listeners,
		loader: Arc<dyn Loader>,
	) -> Self {
		Self::new(platform, component, lib_name, Backing::Temp(path), listeners, loader)
	}

	#[inline]
	pub fn platform(&self) -> &PlatformSpec {
		&self.platform
	}

	#[inline]
	pub fn component(&self) -> Option<&str> {
		self.component.as_deref()
	}

	#[inline]
	pub fn lib_name(&self) -> &str {
		&self.lib_name
	}

	/// The file backing this library, `None` if it is preloaded.
	#[inline]
	pub fn path(&self) -> Option<&Path> {
		match &self.backing {
			Backing::Preloaded => None,
			Backing::Regular(path) | Backing::Temp(path) => Some(path),
		}
	}

	#[inline]
	pub fn is_preloaded(&self) -> bool {
		matches!(self.backing, Backing::Preloaded)
	}

	/// Whether [`close`](LibFile::close) deletes the backing file.
	#[inline]
	pub fn needs_cleanup(&self) -> bool {
		matches!(self.backing, Backing::Temp(_))
	}

	#[inline]
	pub fn is_closed(&self) -> bool {
		self.closed
	}

	fn info(&self) -> LibInfo<'_> {
		LibInfo {
			platform: &self.platform,
			component: self.component.as_deref(),
			lib_name: &self.lib_name,
		}
	}

	/// Loads the library into the process. A preloaded library only fires the
	/// load event.
	///
	/// # Errors
	/// [`ErrorKind::LoadFailure`] if the dynamic loader rejects the file, or if
	/// this `LibFile` was already closed.
	pub fn load(&self) -> Result<()> {
		let Some(path) = self.path() else {
			self.listeners.on_load(self.info(), true, None);
			return Ok(());
		};
		let outcome = if self.closed {
			Err(io::Error::new(io::ErrorKind::NotFound, "library file was already closed"))
		} else {
			unsafe { self.loader.open(path) }
		};
		match outcome {
			Ok(()) => {
				tracing::debug!(lib_name = %self.lib_name, path = %path.display(), "loaded");
				self.listeners.on_load(self.info(), false, Some(path));
				Ok(())
			}
			Err(e) => {
				let err = LoadError::new(&self.lib_name, ErrorKind::LoadFailure).with_source(e);
				self.listeners.on_load_failure(self.info(), &err);
				Err(err)
			}
		}
	}

	/// Deletes the backing file if it is temporary. Calling this more than once
	/// is harmless.
	///
	/// A file that cannot be deleted right away (some platforms refuse while
	/// the library is mapped) is deleted when the process exits instead.
	pub fn close(&mut self) {
		if mem::replace(&mut self.closed, true) {
			return;
		}
		let Backing::Temp(path) = &self.backing else {
			return;
		};
		match fs::remove_file(path) {
			Ok(()) => tracing::debug!(path = %path.display(), "temp file deleted"),
			Err(e) if e.kind() == io::ErrorKind::NotFound => {}
			Err(e) => {
				tracing::warn!(
					path = %path.display(),
					error = %e,
					"could not delete temp file, deleting at exit"
				);
				delete_on_exit(path.clone());
			}
		}
		self.listeners.on_temp_file_cleanup(self.info(), path);
	}
}

impl Drop for LibFile {
	fn drop(&mut self) {
		self.close();
	}
}

static PENDING: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
static EXIT_HOOK: Once = Once::new();

fn delete_on_exit(path: PathBuf) {
	EXIT_HOOK.call_once(|| {
		if let Err(e) = os::at_exit(delete_pending) {
			tracing::warn!(error = %e, "temp files will outlive the process");
		}
	});
	PENDING
		.lock()
		.unwrap_or_else(|poisoned| poisoned.into_inner())
		.push(path);
}

extern "C" fn delete_pending() {
	let pending = mem::take(&mut *PENDING.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
	for path in pending {
		let _ = fs::remove_file(path);
	}
}
