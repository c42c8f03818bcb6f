// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{
	collections::BTreeMap,
	fmt, fs, io,
	path::PathBuf,
	sync::Arc,
};

use super::{PathLocator, Resource};

/// Backend of a [`ResourceLocator`]: a namespace of packaged resources
/// addressed by `/` separated paths.
///
/// Implementations decide whether a resource is handed back as a
/// [`Resource::File`] or as a [`Resource::Stream`].
pub trait ResourceNamespace: Send + Sync + fmt::Debug {
	fn open(&self, path: &str) -> io::Result<Option<Resource>>;
}

/// Resources compiled into the binary, typically with `include_bytes!`.
///
/// Every hit is stream-only, so loading one always goes through a
/// temporary file.
///
/// ```rust
/// # use native_loader::locate::Embedded;
/// let resources = Embedded::new().with("native/linux-x86_64/libfoo.so", b"\x7fELF");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Embedded {
	entries: BTreeMap<String, &'static [u8]>,
}

impl Embedded {
	#[inline]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, path: impl Into<String>, bytes: &'static [u8]) -> Self {
		self.insert(path, bytes);
		self
	}

	pub fn insert(&mut self, path: impl Into<String>, bytes: &'static [u8]) {
		self.entries.insert(path.into(), bytes);
	}
}

impl ResourceNamespace for Embedded {
	fn open(&self, path: &str) -> io::Result<Option<Resource>> {
		Ok(self
			.entries
			.get(path)
			.map(|bytes| Resource::stream(format!("embedded:{path}"), io::Cursor::new(*bytes))))
	}
}

/// Resources unpacked into a directory on disk, such as an application's
/// install tree.
///
/// Hits are direct files and are loaded in place, without a temporary copy.
#[derive(Debug, Clone)]
pub struct Unpacked {
	root: PathBuf,
}

impl Unpacked {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	#[inline]
	pub fn root(&self) -> &std::path::Path {
		&self.root
	}
}

impl ResourceNamespace for Unpacked {
	fn open(&self, path: &str) -> io::Result<Option<Resource>> {
		let mut file = self.root.clone();
		// resource paths never climb out of the root
		for segment in path.split('/') {
			match segment {
				"" | "." => {}
				".." => return Ok(None),
				segment => file.push(segment),
			}
		}
		match fs::metadata(&file) {
			Ok(meta) if meta.is_file() => Ok(Some(Resource::File(file))),
			Ok(_) => Ok(None),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e),
		}
	}
}

/// Looks for libraries inside a [`ResourceNamespace`], rooted under an
/// optional base path.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
	namespace: Arc<dyn ResourceNamespace>,
	base: Option<String>,
}

impl ResourceLocator {
	pub fn new(namespace: impl ResourceNamespace + 'static) -> Self {
		Self {
			namespace: Arc::new(namespace),
			base: None,
		}
	}

	pub fn with_base(namespace: impl ResourceNamespace + 'static, base: impl Into<String>) -> Self {
		let base = base.into();
		let base = base.trim_matches('/');
		Self {
			namespace: Arc::new(namespace),
			base: (!base.is_empty()).then(|| base.to_owned()),
		}
	}

	fn resource_path(&self, component: Option<&str>, path: &str) -> String {
		self.base
			.as_deref()
			.into_iter()
			.chain(component)
			.chain(Some(path))
			.collect::<Vec<_>>()
			.join("/")
	}
}

impl PathLocator for ResourceLocator {
	fn locate(&self, component: Option<&str>, path: &str) -> io::Result<Option<Resource>> {
		self.namespace.open(&self.resource_path(component, path))
	}
}
