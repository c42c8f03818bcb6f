mod common;

use std::sync::Arc;

use common::*;
use native_loader::locate::{DirLocator, PathLocator};
use native_loader::resolve::{FlatDirs, LibraryResolver, NestedDirs, WithPreloaded};
use native_loader::*;

const FLAT_TIERS: [&str; 4] = [
	"linux-x86_64-musl/libcrypto.so",
	"linux-x86_64/libcrypto.so",
	"linux/libcrypto.so",
	"libcrypto.so",
];

#[test]
fn test_flat_fallback_order() {
	init_tracing();
	let platform = linux_x64(true);
	for (tier, rel) in FLAT_TIERS.iter().enumerate() {
		let root = tempfile::tempdir().unwrap();
		let expected = touch(root.path(), rel);
		let locator = Scripted::new(DirLocator::new([root.path()]));

		let found = FlatDirs::new()
			.resolve(&locator, None, &platform, "crypto")
			.unwrap();

		assert_eq!(found.as_path(), Some(expected.as_path()));
		// every more specific tier was tried first, and nothing after the hit
		assert_eq!(locator.probes(), FLAT_TIERS[..=tier]);
	}
}

#[test]
fn test_nested_fallback_order() {
	let platform = linux_x64(false);
	let tiers = [
		"linux/x86_64/libc/libcrypto.so",
		"linux/x86_64/libcrypto.so",
		"linux/libcrypto.so",
		"libcrypto.so",
	];
	for (tier, rel) in tiers.iter().enumerate() {
		let root = tempfile::tempdir().unwrap();
		let expected = touch(root.path(), rel);
		let locator = Scripted::new(DirLocator::new([root.path()]));

		let found = NestedDirs::new()
			.resolve(&locator, None, &platform, "crypto")
			.unwrap();

		assert_eq!(found.as_path(), Some(expected.as_path()));
		assert_eq!(locator.probes(), tiers[..=tier]);
	}
}

#[test]
fn test_musl_in_second_dir() {
	let d1 = tempfile::tempdir().unwrap();
	let d2 = tempfile::tempdir().unwrap();
	let expected = touch(d2.path(), "linux-x86_64-musl/libcrypto.so");
	let locator = DirLocator::new([d1.path(), d2.path()]);

	let found = FlatDirs::new()
		.resolve(&locator, None, &linux_x64(true), "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(expected.as_path()));
}

#[test]
fn test_unreadable_first_dir_does_not_hide_second() {
	let d1 = tempfile::tempdir().unwrap();
	let d2 = tempfile::tempdir().unwrap();
	// a plain file where the musl directory would be
	std::fs::write(d1.path().join("linux-x86_64-musl"), b"").unwrap();
	let expected = touch(d2.path(), "linux-x86_64-musl/libcrypto.so");
	let locator = DirLocator::new([d1.path(), d2.path()]);

	let found = FlatDirs::new()
		.resolve(&locator, None, &linux_x64(true), "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(expected.as_path()));
}

#[test]
fn test_glibc_ignores_musl_build() {
	let d1 = tempfile::tempdir().unwrap();
	let d2 = tempfile::tempdir().unwrap();
	touch(d2.path(), "linux-x86_64-musl/libcrypto.so");
	let locator = DirLocator::new([d1.path(), d2.path()]);
	let glibc = linux_x64(false);

	let err = FlatDirs::new()
		.resolve(&locator, None, &glibc, "crypto")
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert_eq!(err.lib_name(), "crypto");
	assert!(err.cause().is_none());

	let expected = touch(d2.path(), "linux-x86_64-libc/libcrypto.so");
	let found = FlatDirs::new()
		.resolve(&locator, None, &glibc, "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(expected.as_path()));
}

#[test]
fn test_component_falls_back_to_global() {
	let root = tempfile::tempdir().unwrap();
	let expected = touch(root.path(), "linux/libcrypto.so");
	let locator = Scripted::new(DirLocator::new([root.path()]));

	let found = FlatDirs::new()
		.resolve(&locator, Some("profiler"), &linux_x64(true), "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(expected.as_path()));

	let mut expected_probes: Vec<String> = FLAT_TIERS
		.iter()
		.map(|p| format!("profiler:{p}"))
		.collect();
	expected_probes.extend(FLAT_TIERS[..3].iter().map(|p| p.to_string()));
	assert_eq!(locator.probes(), expected_probes);
}

#[test]
fn test_component_wins_over_global() {
	let root = tempfile::tempdir().unwrap();
	// the global copy is more specific, the component copy still wins
	touch(root.path(), "linux-x86_64-musl/libcrypto.so");
	let scoped = touch(root.path(), "profiler/libcrypto.so");
	let locator = DirLocator::new([root.path()]);

	let found = FlatDirs::new()
		.resolve(&locator, Some("profiler"), &linux_x64(true), "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(scoped.as_path()));
}

#[test]
fn test_failed_probe_does_not_stop_search() {
	let root = tempfile::tempdir().unwrap();
	let expected = touch(root.path(), "linux/libcrypto.so");
	let locator = Scripted::new(DirLocator::new([root.path()]))
		.failing_on(FLAT_TIERS[0])
		.failing_on(FLAT_TIERS[1]);

	let found = FlatDirs::new()
		.resolve(&locator, None, &linux_x64(true), "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(expected.as_path()));
}

#[test]
fn test_not_found_reports_first_failure() {
	let root = tempfile::tempdir().unwrap();
	let locator = Scripted::new(DirLocator::new([root.path()]))
		.failing_on(FLAT_TIERS[1])
		.failing_on(FLAT_TIERS[3]);

	let err = FlatDirs::new()
		.resolve(&locator, Some("profiler"), &linux_x64(true), "crypto")
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
	let cause = err.cause().unwrap();
	assert_eq!(cause.kind(), std::io::ErrorKind::PermissionDenied);
	assert_eq!(cause.to_string(), FLAT_TIERS[1]);
	// both passes ran to the end despite the failures
	assert_eq!(locator.probes().len(), 8);
}

#[test]
fn test_windows_and_mac_names() {
	let root = tempfile::tempdir().unwrap();
	let dll = touch(root.path(), "win-x86_64/crypto.dll");
	let dylib = touch(root.path(), "macos/aarch64/libcrypto.dylib");
	let locator: Arc<dyn PathLocator> = Arc::new(DirLocator::new([root.path()]));

	let windows = PlatformSpec::new(Os::Windows, Arch::X86_64, false);
	let found = FlatDirs::new()
		.resolve(&locator, None, &windows, "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(dll.as_path()));

	let mac = PlatformSpec::new(Os::MacOs, Arch::Aarch64, false);
	let found = NestedDirs::new()
		.resolve(&locator, None, &mac, "crypto")
		.unwrap();
	assert_eq!(found.as_path(), Some(dylib.as_path()));
}

#[test]
fn test_with_preloaded() {
	#[derive(Debug)]
	struct LibcIsPreloaded;
	impl LibraryResolver for LibcIsPreloaded {
		fn is_preloaded(&self, platform: &PlatformSpec, lib_name: &str) -> bool {
			platform.is_linux() && lib_name == "c"
		}
		fn resolve(
			&self,
			locator: &dyn PathLocator,
			component: Option<&str>,
			platform: &PlatformSpec,
			lib_name: &str,
		) -> native_loader::Result<locate::Resource> {
			FlatDirs::new().resolve(locator, component, platform, lib_name)
		}
	}

	let platform = linux_x64(false);
	let resolver = WithPreloaded::new(LibcIsPreloaded, ["m"]);
	assert!(resolver.is_preloaded(&platform, "c"));
	assert!(resolver.is_preloaded(&platform, "m"));
	assert!(!resolver.is_preloaded(&platform, "crypto"));
	assert!(!FlatDirs::new().is_preloaded(&platform, "m"));
}
