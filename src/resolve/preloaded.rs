// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::collections::HashSet;

use super::LibraryResolver;
use crate::locate::{PathLocator, Resource};
use crate::platform::PlatformSpec;
use crate::Result;

/// Marks a fixed set of library names as preloaded on top of another resolver.
///
/// A name counts as preloaded if it is in the set *or* the wrapped resolver
/// says so. Everything else is delegated untouched.
#[derive(Debug, Clone)]
pub struct WithPreloaded<R> {
	inner: R,
	names: HashSet<String>,
}

impl<R: LibraryResolver> WithPreloaded<R> {
	pub fn new<I, S>(inner: R, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			inner,
			names: names.into_iter().map(Into::into).collect(),
		}
	}

	#[inline]
	pub fn inner(&self) -> &R {
		&self.inner
	}
}

impl<R: LibraryResolver> LibraryResolver for WithPreloaded<R> {
	fn is_preloaded(&self, platform: &PlatformSpec, lib_name: &str) -> bool {
		self.names.contains(lib_name) || self.inner.is_preloaded(platform, lib_name)
	}

	fn resolve(
		&self,
		locator: &dyn PathLocator,
		component: Option<&str>,
		platform: &PlatformSpec,
		lib_name: &str,
	) -> Result<Resource> {
		self.inner.resolve(locator, component, platform, lib_name)
	}
}
