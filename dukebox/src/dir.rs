use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use anyhow::{anyhow, Context, Result};
use log::trace;
use walkdir::WalkDir;
use duke::tree::class::ClassName;
use quill::inheritance::{ClassFactProvider, ClassFacts};

/// Provides the facts of the classes in a directory of class files, laid out by package like in a jar.
#[derive(Debug, Clone)]
pub struct DirProvider {
	root: PathBuf,
}

impl DirProvider {
	pub fn new(root: impl Into<PathBuf>) -> DirProvider {
		DirProvider { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// The names of all classes in the directory.
	pub fn class_names(&self) -> Result<Vec<ClassName>> {
		let mut names = Vec::new();
		for entry in WalkDir::new(&self.root).sort_by_file_name() {
			let entry = entry.with_context(|| anyhow!("failed to walk class directory {:?}", self.root))?;
			if !entry.file_type().is_file() {
				continue;
			}

			let relative = entry.path().strip_prefix(&self.root)?;
			let Some(name) = relative.to_str().and_then(|name| name.strip_suffix(".class")) else {
				continue;
			};
			let name = name.replace(std::path::MAIN_SEPARATOR, "/");
			names.push(ClassName::try_from(name.as_str())?);
		}
		Ok(names)
	}
}

impl ClassFactProvider for DirProvider {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		let path = self.root.join(crate::class_file_name(class));

		let file = match File::open(&path) {
			Ok(file) => file,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e).with_context(|| anyhow!("failed to open class file {path:?}")),
		};
		trace!("reading class {class:?} from {path:?}");

		crate::read_facts(class, &mut BufReader::new(file))
			.with_context(|| anyhow!("failed to read class file {path:?}"))
			.map(Some)
	}
}
