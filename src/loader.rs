// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{io, path::Path, sync::Arc};

use crate::error::{ErrorKind, LoadError};
use crate::lib_file::LibFile;
use crate::listener::{LibInfo, LibraryLoadingListener, Listeners};
use crate::load::Loader;
use crate::locate::{PathLocator, Resource};
use crate::naming;
use crate::platform::PlatformSpec;
use crate::resolve::LibraryResolver;
use crate::temp::TempFileManager;
use crate::Result;

mod builder;

pub use builder::Builder;

/// Finds native libraries for a platform and loads them into the process.
///
/// Resolution asks the [`LibraryResolver`] for candidate paths, which the
/// [`PathLocator`] probes. A hit that is only readable as a stream is copied
/// into a private temporary file first. The result is a [`LibFile`], which
/// removes that temporary file again when it is closed.
///
/// # Examples
///
/// ```no_run
/// use native_loader::NativeLoader;
///
/// let loader = NativeLoader::builder()
/// 	.nested_layout()
/// 	.from_dir("/opt/app/native")
/// 	.preloaded(["c"])
/// 	.build();
/// loader.load("crypto").unwrap();
/// ```
#[derive(Debug)]
pub struct NativeLoader {
	platform: PlatformSpec,
	resolver: Box<dyn LibraryResolver>,
	locator: Box<dyn PathLocator>,
	temp_files: TempFileManager,
	listeners: Listeners,
	loader: Arc<dyn Loader>,
}

impl NativeLoader {
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// The platform used when none is given.
	#[inline]
	pub fn platform(&self) -> &PlatformSpec {
		&self.platform
	}

	#[inline]
	pub fn is_preloaded(&self, lib_name: &str) -> bool {
		self.is_preloaded_for(&self.platform, lib_name)
	}

	#[inline]
	pub fn is_preloaded_for(&self, platform: &PlatformSpec, lib_name: &str) -> bool {
		self.resolver.is_preloaded(platform, lib_name)
	}

	/// Resolves `lib_name` for the default platform.
	pub fn resolve(&self, lib_name: &str) -> Result<LibFile> {
		self.resolve_impl(&self.platform, None, lib_name, self.listeners.clone())
	}

	/// Resolves `lib_name`, preferring the copy scoped under `component`.
	pub fn resolve_component(&self, component: &str, lib_name: &str) -> Result<LibFile> {
		self.resolve_impl(&self.platform, Some(component), lib_name, self.listeners.clone())
	}

	/// Resolves `lib_name` for a platform other than the default one.
	pub fn resolve_for(
		&self,
		platform: &PlatformSpec,
		component: Option<&str>,
		lib_name: &str,
	) -> Result<LibFile> {
		self.resolve_impl(platform, component, lib_name, self.listeners.clone())
	}

	/// Resolves `lib_name` with one extra listener for this call only.
	pub fn resolve_with_listener(
		&self,
		component: Option<&str>,
		lib_name: &str,
		listener: Arc<dyn LibraryLoadingListener>,
	) -> Result<LibFile> {
		self.resolve_impl(&self.platform, component, lib_name, self.listeners.join(listener))
	}

	/// Resolves and loads `lib_name`. Any temporary file is removed afterwards.
	pub fn load(&self, lib_name: &str) -> Result<()> {
		self.load_impl(None, lib_name, self.listeners.clone())
	}

	pub fn load_component(&self, component: &str, lib_name: &str) -> Result<()> {
		self.load_impl(Some(component), lib_name, self.listeners.clone())
	}

	pub fn load_with_listener(
		&self,
		component: Option<&str>,
		lib_name: &str,
		listener: Arc<dyn LibraryLoadingListener>,
	) -> Result<()> {
		self.load_impl(component, lib_name, self.listeners.join(listener))
	}

	fn load_impl(&self, component: Option<&str>, lib_name: &str, listeners: Listeners) -> Result<()> {
		// dropping `lib_file` on an early exit closes it too
		let mut lib_file = self.resolve_impl(&self.platform, component, lib_name, listeners)?;
		let loaded = lib_file.load();
		lib_file.close();
		loaded
	}

	fn resolve_impl(
		&self,
		platform: &PlatformSpec,
		component: Option<&str>,
		lib_name: &str,
		listeners: Listeners,
	) -> Result<LibFile> {
		let info = LibInfo {
			platform,
			component,
			lib_name,
		};

		if platform.is_unknown_os() || platform.is_unknown_arch() {
			let err = LoadError::unsupported_platform(lib_name);
			listeners.on_resolve_dynamic_failure(info, &err);
			return Err(err);
		}

		if self.is_preloaded_for(platform, lib_name) {
			tracing::debug!(lib_name, %platform, "preloaded");
			listeners.on_resolve_dynamic(info, true, None);
			return Ok(LibFile::preloaded(
				*platform,
				component,
				lib_name,
				listeners,
				self.loader.clone(),
			));
		}

		let resource = match self.resolver.resolve(&*self.locator, component, platform, lib_name) {
			Ok(resource) => resource,
			Err(err) => {
				let err = if err.kind() == ErrorKind::NotFound {
					err
				} else {
					LoadError::not_found(lib_name).with_source(io::Error::new(io::ErrorKind::Other, err))
				};
				tracing::debug!(lib_name, %platform, ?component, error = %err, "not resolved");
				listeners.on_resolve_dynamic_failure(info, &err);
				return Err(err);
			}
		};

		tracing::debug!(lib_name, %platform, ?component, %resource, "resolved");
		listeners.on_resolve_dynamic(info, false, Some(&resource));
		self.to_lib_file(info, resource, listeners)
	}

	fn to_lib_file(&self, info: LibInfo<'_>, resource: Resource, listeners: Listeners) -> Result<LibFile> {
		let (mut reader, location) = match resource {
			Resource::File(path) => {
				return Ok(LibFile::from_file(
					*info.platform,
					info.component,
					info.lib_name,
					path,
					listeners,
					self.loader.clone(),
				))
			}
			Resource::Stream { location, reader } => (reader, location),
		};

		let lib_ext = naming::lib_extension(info.platform);
		let mut temp_file = match self.temp_files.create_temp_file(info.lib_name, lib_ext) {
			Ok(temp_file) => temp_file,
			Err(e) => return Err(self.materialization_failed(info, lib_ext, None, e, &listeners)),
		};
		let copied = io::copy(&mut reader, temp_file.as_file_mut())
			.and_then(|_| temp_file.as_file_mut().sync_all());
		if let Err(e) = copied {
			// `temp_file` deletes itself on drop
			return Err(self.materialization_failed(
				info,
				lib_ext,
				Some(temp_file.path()),
				e,
				&listeners,
			));
		}
		let path = match temp_file.keep() {
			Ok((_, path)) => path,
			Err(e) => {
				return Err(self.materialization_failed(
					info,
					lib_ext,
					Some(e.file.path()),
					e.error,
					&listeners,
				))
			}
		};

		tracing::debug!(lib_name = info.lib_name, %location, path = %path.display(), "extracted");
		listeners.on_temp_file_created(info, &path);
		Ok(LibFile::from_temp_file(
			*info.platform,
			info.component,
			info.lib_name,
			path,
			listeners,
			self.loader.clone(),
		))
	}

	fn materialization_failed(
		&self,
		info: LibInfo<'_>,
		lib_ext: &str,
		temp_file: Option<&Path>,
		error: io::Error,
		listeners: &Listeners,
	) -> LoadError {
		tracing::warn!(lib_name = info.lib_name, error = %error, "could not extract library");
		listeners.on_temp_file_creation_failure(info, self.temp_files.dir(), lib_ext, temp_file, &error);
		LoadError::new(info.lib_name, ErrorKind::Materialization).with_source(error)
	}
}
