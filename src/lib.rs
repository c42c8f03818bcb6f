// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Platform-aware resolution and loading of native libraries.
//!
//! A [`NativeLoader`] turns a bare library name such as `"crypto"` into the
//! right binary for a [`PlatformSpec`] (`libcrypto.so` under
//! `linux-x86_64-musl/`, say), copies it out to a private temporary file if
//! it is only available as a packaged resource, and loads it into the
//! process.
//!
//! ```no_run
//! use native_loader::{locate::Embedded, NativeLoader};
//!
//! static LIBFOO: &[u8] = b"...";
//!
//! let loader = NativeLoader::builder()
//! 	.from_resources_with_base(Embedded::new().with("native/linux-x86_64/libfoo.so", LIBFOO), "native")
//! 	.temp_dir("/var/tmp/my-app")
//! 	.build();
//! loader.load("foo").unwrap();
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod listener;
pub mod load;
pub mod locate;
pub mod naming;
pub mod platform;
pub mod resolve;
pub mod temp;

mod lib_file;
mod loader;
mod os;

pub use error::{ErrorKind, LoadError};
pub use lib_file::LibFile;
pub use listener::{LibInfo, LibraryLoadingListener, Listeners};
pub use loader::{Builder, NativeLoader};
pub use platform::{Arch, Os, PlatformSpec};

/// The result of a native loader operation.
pub type Result<T> = std::result::Result<T, error::LoadError>;
