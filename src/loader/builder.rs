// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{
	ffi::OsStr,
	fmt,
	path::PathBuf,
	sync::Arc,
};

use super::NativeLoader;
use crate::listener::{LibraryLoadingListener, Listeners};
use crate::load::{Loader, System};
use crate::locate::{DirLocator, PathLocator, ResourceLocator, ResourceNamespace};
use crate::platform::PlatformSpec;
use crate::resolve::{FlatDirs, LibraryResolver, NestedDirs, WithPreloaded};
use crate::temp::TempFileManager;

/// Configures a [`NativeLoader`].
///
/// Anything left unset falls back to: the current platform, a flat layout,
/// the executable's directory plus the host library search path, the host
/// temporary directory, no listeners, and the [`System`] loader.
#[derive(Default)]
pub struct Builder {
	platform: Option<PlatformSpec>,
	resolver: Option<Box<dyn LibraryResolver>>,
	preloaded: Option<Vec<String>>,
	locator: Option<Box<dyn PathLocator>>,
	temp_dir: Option<PathBuf>,
	listeners: Vec<Arc<dyn LibraryLoadingListener>>,
	loader: Option<Arc<dyn Loader>>,
}

impl Builder {
	/// Sets the platform used when a call does not name one.
	pub fn platform(mut self, platform: PlatformSpec) -> Self {
		self.platform = Some(platform);
		self
	}

	/// Uses the `{os}-{arch}-{libc}/` layout.
	pub fn flat_layout(self) -> Self {
		self.resolver(FlatDirs::new())
	}

	/// Uses the `{os}/{arch}/{libc}/` layout.
	pub fn nested_layout(self) -> Self {
		self.resolver(NestedDirs::new())
	}

	/// Uses a custom layout.
	pub fn resolver(mut self, resolver: impl LibraryResolver + 'static) -> Self {
		self.resolver = Some(Box::new(resolver));
		self
	}

	/// Declares libraries that are already available and need no file. These
	/// add to whatever the resolver itself reports as preloaded.
	pub fn preloaded<I, S>(mut self, lib_names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.preloaded
			.get_or_insert_with(Vec::new)
			.extend(lib_names.into_iter().map(Into::into));
		self
	}

	/// Searches a packaged resource namespace.
	pub fn from_resources(self, namespace: impl ResourceNamespace + 'static) -> Self {
		self.path_locator(ResourceLocator::new(namespace))
	}

	/// Searches a packaged resource namespace below `base`.
	pub fn from_resources_with_base(
		self,
		namespace: impl ResourceNamespace + 'static,
		base: impl Into<String>,
	) -> Self {
		self.path_locator(ResourceLocator::with_base(namespace, base))
	}

	pub fn from_dir(self, dir: impl Into<PathBuf>) -> Self {
		self.path_locator(DirLocator::new([dir]))
	}

	/// Searches `dirs` in order.
	pub fn from_dirs<I, P>(self, dirs: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		self.path_locator(DirLocator::new(dirs))
	}

	/// Searches the directories of a `PATH`-style string.
	pub fn from_search_path(self, search_path: impl AsRef<OsStr>) -> Self {
		self.path_locator(DirLocator::from_search_path(search_path))
	}

	pub fn path_locator(mut self, locator: impl PathLocator + 'static) -> Self {
		self.locator = Some(Box::new(locator));
		self
	}

	/// Where stream-only libraries are extracted to. Created on first use.
	pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.temp_dir = Some(dir.into());
		self
	}

	pub fn add_listener(mut self, listener: impl LibraryLoadingListener + 'static) -> Self {
		self.listeners.push(Arc::new(listener));
		self
	}

	pub fn add_listeners<I>(mut self, listeners: I) -> Self
	where
		I: IntoIterator<Item = Arc<dyn LibraryLoadingListener>>,
	{
		self.listeners.extend(listeners);
		self
	}

	/// Replaces the primitive that loads a file into the process.
	pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
		self.loader = Some(Arc::new(loader));
		self
	}

	pub fn build(self) -> NativeLoader {
		let resolver = self
			.resolver
			.unwrap_or_else(|| Box::new(FlatDirs::new()));
		let resolver: Box<dyn LibraryResolver> = match self.preloaded {
			Some(names) => Box::new(WithPreloaded::new(resolver, names)),
			None => resolver,
		};
		NativeLoader {
			platform: self.platform.unwrap_or_else(PlatformSpec::current),
			resolver,
			locator: self
				.locator
				.unwrap_or_else(|| Box::new(DirLocator::host_default())),
			temp_files: TempFileManager::new(self.temp_dir),
			listeners: Listeners::new(self.listeners),
			loader: self.loader.unwrap_or_else(|| Arc::new(System)),
		}
	}
}

impl fmt::Debug for Builder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Builder")
			.field("platform", &self.platform)
			.field("resolver", &self.resolver)
			.field("preloaded", &self.preloaded)
			.field("locator", &self.locator)
			.field("temp_dir", &self.temp_dir)
			.field("listeners", &self.listeners.len())
			.finish_non_exhaustive()
	}
}
