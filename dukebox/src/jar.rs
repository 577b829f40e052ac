use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Rc;
use anyhow::{anyhow, Context, Result};
use log::trace;
use zip::result::ZipError;
use zip::ZipArchive;
use duke::tree::class::ClassName;
use quill::inheritance::{ClassFactProvider, ClassFacts};

/// Provides the facts of the classes in a jar.
///
/// The jar stays open for the lifetime of the provider. Reading an entry needs mutable access to the archive.
pub struct JarProvider<R> {
	name: String,
	archive: RefCell<ZipArchive<R>>,
}

impl JarProvider<File> {
	/// Opens the jar at the given path.
	pub fn open(path: impl AsRef<Path>) -> Result<JarProvider<File>> {
		let file = File::open(&path)
			.with_context(|| anyhow!("could not open jar {:?}", path.as_ref()))?;
		JarProvider::new(path.as_ref().display().to_string(), file)
	}
}

impl<R: Read + Seek> JarProvider<R> {
	/// Reads the jar from a reader. The name is only used in messages.
	pub fn new(name: String, reader: R) -> Result<JarProvider<R>> {
		let archive = ZipArchive::new(reader)
			.with_context(|| anyhow!("failed to read zip archive from {name:?}"))?;
		Ok(JarProvider { name, archive: RefCell::new(archive) })
	}

	/// The names of all classes in the jar.
	pub fn class_names(&self) -> Result<Vec<ClassName>> {
		self.archive.borrow().file_names()
			.filter_map(|name| name.strip_suffix(".class"))
			.map(ClassName::try_from)
			.collect()
	}
}

impl<R> Debug for JarProvider<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JarProvider")
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

impl<R: Read + Seek> ClassFactProvider for JarProvider<R> {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		let mut archive = self.archive.borrow_mut();

		let mut file = match archive.by_name(&crate::class_file_name(class)) {
			Ok(file) => file,
			Err(ZipError::FileNotFound) => return Ok(None),
			Err(e) => return Err(e).with_context(|| anyhow!("failed to open class {class:?} in jar {:?}", self.name)),
		};
		trace!("reading class {class:?} from jar {:?}", self.name);

		crate::read_facts(class, &mut file)
			.with_context(|| anyhow!("failed to read class {class:?} from jar {:?}", self.name))
			.map(Some)
	}
}

#[cfg(test)]
mod testing {
	use std::io::{Cursor, Write};
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use zip::write::SimpleFileOptions;
	use zip::ZipWriter;
	use duke::class_constants::access;
	use duke::tree::class::{ClassHeader, ClassName};
	use duke::tree::method::{MethodDescriptor, MethodHeader, MethodName};
	use quill::inheritance::{ClassFactProvider, ClassFacts};
	use crate::JarProvider;

	fn jar(entries: &[(&str, &ClassHeader)]) -> Result<Vec<u8>> {
		let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
		zip.add_directory("META-INF/", SimpleFileOptions::default())?;
		zip.start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())?;
		zip.write_all(b"Manifest-Version: 1.0\r\n")?;
		for (name, header) in entries {
			zip.start_file(*name, SimpleFileOptions::default())?;
			duke::write_class_header(&mut zip, header)?;
		}
		Ok(zip.finish()?.into_inner())
	}

	#[test]
	fn read_class_from_jar() -> Result<()> {
		let mut header = ClassHeader::new(
			access::PUBLIC | access::SUPER,
			ClassName::try_from("a/B")?,
			Some(ClassName::java_lang_object()),
			vec![ClassName::try_from("a/I")?],
		);
		header.methods.push(MethodHeader {
			access: access::PUBLIC,
			name: MethodName::try_from("run")?,
			descriptor: MethodDescriptor::try_from("()V")?,
		});
		let provider = JarProvider::new("test.jar".to_owned(), Cursor::new(jar(&[("a/B.class", &header)])?))?;

		assert_eq!(provider.class_names()?, vec![ClassName::try_from("a/B")?]);

		let facts = provider.get_class_facts(&ClassName::try_from("a/B")?)?;
		let expected: ClassFacts = header.into();
		assert_eq!(facts.as_deref(), Some(&expected));

		assert_eq!(provider.get_class_facts(&ClassName::try_from("a/C")?)?, None);
		Ok(())
	}

	#[test]
	fn misplaced_class_file() -> Result<()> {
		let header = ClassHeader::new(access::PUBLIC, ClassName::try_from("a/B")?, Some(ClassName::java_lang_object()), vec![]);
		let provider = JarProvider::new("test.jar".to_owned(), Cursor::new(jar(&[("a/C.class", &header)])?))?;

		assert!(provider.get_class_facts(&ClassName::try_from("a/C")?).is_err());
		Ok(())
	}
}
