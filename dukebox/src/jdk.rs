use std::fs::File;
use std::path::{Path, PathBuf};
use anyhow::Result;
use log::{debug, warn};
use crate::JarProvider;

/// The places of the runtime jar inside a Java installation, for a JDK and a JRE.
const RUNTIME_JARS: [&str; 2] = ["jre/lib/rt.jar", "lib/rt.jar"];

fn find_runtime_jar(java_home: &Path) -> Option<PathBuf> {
	RUNTIME_JARS.iter()
		.map(|jar| java_home.join(jar))
		.find(|path| path.is_file())
}

/// Provides the classes of the Java platform, read from the `rt.jar` of the installation at `JAVA_HOME`.
///
/// Returns `None` if `JAVA_HOME` isn't set, or if the installation has no `rt.jar` (as is the case since Java 9,
/// which stores its classes in modules instead).
pub fn jdk_provider() -> Result<Option<JarProvider<File>>> {
	let Some(java_home) = std::env::var_os("JAVA_HOME") else {
		debug!("JAVA_HOME is not set, not providing platform classes");
		return Ok(None);
	};
	let java_home = PathBuf::from(java_home);

	let Some(jar) = find_runtime_jar(&java_home) else {
		warn!("no rt.jar found in JAVA_HOME {java_home:?}, not providing platform classes (only Java 8 and earlier ship one)");
		return Ok(None);
	};

	debug!("using platform classes from {jar:?}");
	JarProvider::open(jar).map(Some)
}
