#![allow(dead_code)]

use std::{
	fs, io,
	path::{Path, PathBuf},
	sync::{Arc, Mutex},
};

use native_loader::load::Loader;
use native_loader::locate::{DirLocator, PathLocator, Resource};
use native_loader::*;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

pub fn linux_x64(musl: bool) -> PlatformSpec {
	PlatformSpec::new(Os::Linux, Arch::X86_64, musl)
}

/// Creates `root/rel` (and its parents) with some content.
pub fn touch(root: &Path, rel: &str) -> PathBuf {
	let path = root.join(rel);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(&path, b"not really a library").unwrap();
	path
}

/// Records every path it is asked to load instead of loading it.
#[derive(Debug, Clone, Default)]
pub struct RecordingLoader {
	opened: Arc<Mutex<Vec<PathBuf>>>,
	fail: bool,
}

impl RecordingLoader {
	pub fn failing() -> Self {
		Self {
			fail: true,
			..Self::default()
		}
	}

	pub fn opened(&self) -> Vec<PathBuf> {
		self.opened.lock().unwrap().clone()
	}
}

unsafe impl Loader for RecordingLoader {
	unsafe fn open(&self, path: &Path) -> io::Result<()> {
		self.opened.lock().unwrap().push(path.to_owned());
		if self.fail {
			Err(io::Error::new(io::ErrorKind::InvalidData, "invalid ELF header"))
		} else if path.is_file() {
			Ok(())
		} else {
			Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
		}
	}
}

/// A locator that must never be consulted.
#[derive(Debug)]
pub struct Unreachable;

impl PathLocator for Unreachable {
	fn locate(&self, _: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		panic!("locator consulted for {path}");
	}
}

/// Wraps a `DirLocator`, logging every probe and failing those whose path is
/// listed in `fail_on`.
#[derive(Debug)]
pub struct Scripted {
	pub inner: DirLocator,
	pub fail_on: Vec<String>,
	pub probes: Mutex<Vec<String>>,
}

impl Scripted {
	pub fn new(inner: DirLocator) -> Self {
		Self {
			inner,
			fail_on: Vec::new(),
			probes: Mutex::new(Vec::new()),
		}
	}

	pub fn failing_on(mut self, path: &str) -> Self {
		self.fail_on.push(path.to_owned());
		self
	}

	pub fn probes(&self) -> Vec<String> {
		self.probes.lock().unwrap().clone()
	}
}

impl PathLocator for Scripted {
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		let probe = match component {
			Some(component) => format!("{component}:{path}"),
			None => path.to_owned(),
		};
		self.probes.lock().unwrap().push(probe);
		if self.fail_on.iter().any(|p| p == path) {
			return Err(io::Error::new(io::ErrorKind::PermissionDenied, path.to_owned()));
		}
		self.inner.locate(component, path)
	}
}

/// Logs events as short strings.
#[derive(Debug, Clone, Default)]
pub struct Events(Arc<Mutex<Vec<String>>>);

impl Events {
	pub fn take(&self) -> Vec<String> {
		std::mem::take(&mut *self.0.lock().unwrap())
	}

	fn push(&self, event: String) {
		self.0.lock().unwrap().push(event);
	}
}

fn name(lib: &LibInfo<'_>) -> String {
	match lib.component {
		Some(component) => format!("{component}/{}", lib.lib_name),
		None => lib.lib_name.to_owned(),
	}
}

impl LibraryLoadingListener for Events {
	fn on_resolve_dynamic(&self, lib: LibInfo<'_>, is_preloaded: bool, _: Option<&Resource>) {
		self.push(format!("resolve {} preloaded={is_preloaded}", name(&lib)));
	}

	fn on_resolve_dynamic_failure(&self, lib: LibInfo<'_>, error: &LoadError) {
		self.push(format!("resolve_failure {} {:?}", name(&lib), error.kind()));
	}

	fn on_load(&self, lib: LibInfo<'_>, is_preloaded: bool, _: Option<&Path>) {
		self.push(format!("load {} preloaded={is_preloaded}", name(&lib)));
	}

	fn on_load_failure(&self, lib: LibInfo<'_>, _: &LoadError) {
		self.push(format!("load_failure {}", name(&lib)));
	}

	fn on_temp_file_created(&self, lib: LibInfo<'_>, _: &Path) {
		self.push(format!("temp_created {}", name(&lib)));
	}

	fn on_temp_file_creation_failure(
		&self,
		lib: LibInfo<'_>,
		_: Option<&Path>,
		lib_ext: &str,
		_: Option<&Path>,
		_: &io::Error,
	) {
		self.push(format!("temp_failure {} {lib_ext}", name(&lib)));
	}

	fn on_temp_file_cleanup(&self, lib: LibInfo<'_>, _: &Path) {
		self.push(format!("cleanup {}", name(&lib)));
	}
}

/// Panics in every callback.
pub struct Panicky;

impl LibraryLoadingListener for Panicky {
	fn on_resolve_dynamic(&self, _: LibInfo<'_>, _: bool, _: Option<&Resource>) {
		panic!("on_resolve_dynamic");
	}

	fn on_resolve_dynamic_failure(&self, _: LibInfo<'_>, _: &LoadError) {
		panic!("on_resolve_dynamic_failure");
	}

	fn on_load(&self, _: LibInfo<'_>, _: bool, _: Option<&Path>) {
		panic!("on_load");
	}

	fn on_load_failure(&self, _: LibInfo<'_>, _: &LoadError) {
		panic!("on_load_failure");
	}

	fn on_temp_file_created(&self, _: LibInfo<'_>, _: &Path) {
		panic!("on_temp_file_created");
	}

	fn on_temp_file_creation_failure(
		&self,
		_: LibInfo<'_>,
		_: Option<&Path>,
		_: &str,
		_: Option<&Path>,
		_: &io::Error,
	) {
		panic!("on_temp_file_creation_failure");
	}

	fn on_temp_file_cleanup(&self, _: LibInfo<'_>, _: &Path) {
		panic!("on_temp_file_cleanup");
	}
}

pub fn dir_is_empty(dir: &Path) -> bool {
	match fs::read_dir(dir) {
		Ok(mut entries) => entries.next().is_none(),
		Err(e) if e.kind() == io::ErrorKind::NotFound => true,
		Err(e) => panic!("{e}"),
	}
}
