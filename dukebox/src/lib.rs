//! Class fact providers reading class files from jars and directories.
//!
//! All providers here only read the header of a class file (see [`duke::read_class_header`]), and only when the class
//! is asked for. Wrap them in a [`CachedProvider`][quill::inheritance::CachedProvider] to not read a class twice.

mod jar;
mod dir;
mod jdk;

pub use jar::JarProvider;
pub use dir::DirProvider;
pub use jdk::jdk_provider;

use std::io::Read;
use std::rc::Rc;
use anyhow::{bail, Result};
use duke::tree::class::ClassName;
use quill::inheritance::ClassFacts;

/// The path of the class file of a class, relative to the root of a jar or class directory.
fn class_file_name(class: &ClassName) -> String {
	format!("{class}.class")
}

fn read_facts(class: &ClassName, reader: &mut impl Read) -> Result<Rc<ClassFacts>> {
	let header = duke::read_class_header(reader)?;
	if &header.name != class {
		bail!("class file for {class:?} declares the class {:?}", header.name);
	}
	Ok(Rc::new(header.into()))
}
