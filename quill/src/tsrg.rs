//! Functions to read and write mappings in the TSRG format.
//!
//! A TSRG file lists classes with their obfuscated and deobfuscated names, followed by their members on lines
//! indented by one tab:
//! ```text
//! a net/minecraft/Foo
//! 	b field_1_b
//! 	c (La;)V func_2_c
//! a$d net/minecraft/Foo$Bar
//! ```
//!
//! Fields have no descriptor in this format, so they are stored with [name-only keys][crate::set::FieldKey].
//! Nested classes are written as their own lines, with their full names.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use duke::tree::class::ClassName;
use duke::tree::field::FieldName;
use duke::tree::method::{MethodDescriptor, MethodName};
use crate::lines::srg_line::SpaceLine;
use crate::lines::WithMoreIdentIter;
use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, Rename};

/// Reads a `.tsrg` file, by opening the file given by the path.
///
/// The namespaces given are the names of the two columns of the file.
pub fn read_file(path: impl AsRef<Path>, namespaces: [&str; 2]) -> Result<MappingSet> {
	let file = File::open(&path)
		.with_context(|| anyhow!("failed to open mappings file {:?}", path.as_ref()))?;
	read(file, namespaces)
		.with_context(|| anyhow!("failed to read mappings file {:?} as tsrg file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the TSRG format, from the given reader.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use duke::tree::class::ClassName;
/// use duke::tree::field::FieldName;
///
/// let input = "\
/// a Foo
/// 	b bar
/// 	c (I)La; baz
/// ";
/// let set = quill::tsrg::read(input.as_bytes(), ["obf", "srg"]).unwrap();
///
/// let class = set.get_class(&ClassName::try_from("a").unwrap()).unwrap();
/// assert_eq!(class.deobf_name().as_str(), "Foo");
/// let field = class.get_field(&FieldName::try_from("b").unwrap(), None).unwrap();
/// assert_eq!(field.deobf_name().as_str(), "bar");
/// assert_eq!(field.desc(), None);
/// ```
pub fn read(reader: impl Read, namespaces: [&str; 2]) -> Result<MappingSet> {
	let mut set = MappingSet::new(namespaces.try_into()?);

	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> Result<SpaceLine> {
			Ok(SpaceLine::new(line_number + 1, &line?))
		})
		.filter(|line| !matches!(line, Ok(line) if line.fields.is_empty()))
		.peekable();

	WithMoreIdentIter::new(&mut lines).on_every_line(|iter, line| {
		let [obf, deobf] = line.list()?;
		let obf = ClassName::try_from(obf)?;
		let class = set.add_class(&obf, Rename::Renamed(ClassName::try_from(deobf)?))?;

		iter.next_level().on_every_line(|_, line| {
			match line.fields.len() {
				2 => {
					let [obf, deobf] = line.list()?;
					let key = FieldKey { name: FieldName::try_from(obf)?, desc: None };
					class.add_field(FieldMapping::new(key, Rename::Renamed(FieldName::try_from(deobf)?)))?;
				},
				3 => {
					let [obf, desc, deobf] = line.list()?;
					let key = MethodKey { name: MethodName::try_from(obf)?, desc: MethodDescriptor::try_from(desc)? };
					class.add_method(MethodMapping::new(key, Rename::Renamed(MethodName::try_from(deobf)?)))?;
				},
				n => bail!("expected a field line with 2 or a method line with 3 fields, got {n}: {line:?}"),
			}
			Ok(())
		}).with_context(|| anyhow!("reading members of class {obf:?}"))
	}).context("reading lines")?;

	if let Some(line) = lines.next() {
		bail!("expected end of input, got: {line:?}");
	}

	Ok(set)
}

/// Writes a mapping set into a `String`, see [`write`][fn@write].
pub fn write_string(set: &MappingSet) -> Result<String> {
	let mut vec = Vec::new();
	write(set, &mut vec)?;
	String::from_utf8(vec).context("failed to convert written mappings to utf8")
}

/// Writes a mapping set in the TSRG format.
///
/// Classes are written in the order of [`MappingSet::classes`], nested classes with their full names. The descriptors
/// of fields are not written.
pub fn write(set: &MappingSet, w: &mut impl Write) -> Result<()> {
	let mut w = BufWriter::new(w);
	let w = &mut w;

	for class in set.classes()? {
		writeln!(w, "{} {}", class.obf(), class.deobf)?;

		for field in class.mapping.fields() {
			writeln!(w, "\t{} {}", field.obf_name(), field.deobf_name())?;
		}

		for method in class.mapping.methods() {
			writeln!(w, "\t{} {} {}", method.obf_name(), method.desc(), method.deobf_name())?;
		}
	}

	w.flush()?;
	Ok(())
}
