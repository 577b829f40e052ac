//! Functions to read and write mappings in the "Tiny v2" format.
//!
//! # Reading
//! You can read a `.tiny` file using the [`read_file`] method, by passing a path.
//! If you already have a [`Read`]er, you can use the [`read`] method.
//!
//! It's recommended to check that the namespaces are indeed the ones expected.
//! See [`Namespaces::check_that`] for more info.
//!
//! # Writing
//! For writing namespace trees, there are the [`write`][fn@write] as well as the [`write_vec`] and [`write_string`]
//! methods. These sort the classes and their members.
//!
//! A [`MappingSet`] is written with [`write_set`] and [`write_set_string`], which keep the order of the set.

use std::fs::File;
use anyhow::{anyhow, bail, Context, Result};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use log::warn;
use duke::tree::field::FieldDescriptor;
use duke::tree::method::MethodDescriptor;
use crate::lines::tiny_line::TinyLine;
use crate::lines::{Line, WithMoreIdentIter};
use crate::set::MappingSet;
use crate::tree::mappings::{ClassMapping, FieldMapping, JavadocMapping, MappingInfo, MethodMapping, ParameterMapping, ClassNowodeMapping, FieldNowodeMapping, Mappings, MethodNowodeMapping, ParameterNowodeMapping};
use crate::tree::names::{Names, Namespaces};

/// Reads a `.tiny` file (tiny v2), by opening the file given by the path.
///
/// It's recommended to check that the namespaces are indeed the ones expected.
/// See [`Namespaces::check_that`] for more info.
pub fn read_file<const N: usize>(path: impl AsRef<Path>) -> Result<Mappings<N>> {
	let file = File::open(&path)
		.with_context(|| anyhow!("failed to open mappings file {:?}", path.as_ref()))?;
	read(file)
		.with_context(|| anyhow!("failed to read mappings file {:?} as tiny v2 file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v2 format, from the given reader.
///
/// It's recommended to check that the namespaces are indeed the ones expected.
/// See [`Namespaces::check_that`] for more info.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use quill::tree::mappings::Mappings;
/// let string = "\
/// tiny	2	0	namespaceA	namespaceB	namespaceC
/// c	A	B	C
/// 	f	LA;	a	b	c
/// 	m	(LA;)V	a	b	c
/// 		p	1	x	y	z
/// ";
///
/// let reader = &mut string.as_bytes();
/// let mappings: Mappings<3> = quill::tiny_v2::read(reader).unwrap();
///
/// mappings.info.namespaces.check_that(["namespaceA", "namespaceB", "namespaceC"]).unwrap();
/// assert_eq!(mappings.classes.len(), 1);
/// ```
pub fn read<const N: usize>(reader: impl Read) -> Result<Mappings<N>> {
	if N < 2 {
		bail!("must read at least two namespaces, {N} is less than that");
	}

	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> Result<TinyLine> {
			TinyLine::new(line_number + 1, &line?)
		})
		.peekable();

	let mut header = lines.next().context("no header line")??;
	let header_line_number = header.get_line_number();

	if header.first_field != "tiny" || header.next()? != "2" || header.next()? != "0" {
		bail!("header version isn't tiny v2.0, in line {header:?}");
	}

	let namespaces: Namespaces<N> = header.list::<N>()?.try_into()
		.with_context(|| anyhow!("on line {header_line_number}"))?;

	let mut mappings = Mappings::new(MappingInfo { namespaces });

	WithMoreIdentIter::new(&mut lines).on_every_line(|iter, line| {
		if line.first_field == "c" {
			let names = line.list::<N>()?.try_into()?;
			let mapping = ClassMapping { names };
			let class: ClassNowodeMapping<N> = ClassNowodeMapping::new(mapping);
			let class = mappings.add_class(class)?;

			iter.next_level().on_every_line(|iter, mut line| {
				if line.first_field == "f" {
					let desc = FieldDescriptor::try_from(line.next()?)?;
					let names = line.list::<N>()?.try_into()?;
					let mapping = FieldMapping { desc, names };
					let field: FieldNowodeMapping<N> = FieldNowodeMapping::new(mapping);
					let field = class.add_field(field)?;

					iter.next_level().on_every_line(|_, line| {
						if line.first_field == "c" {
							add_comment(&mut field.javadoc, line)
						} else {
							Ok(())
						}
					}).context("reading field sub-sections")
				} else if line.first_field == "m" {
					let desc = MethodDescriptor::try_from(line.next()?)?;
					let names = line.list::<N>()?.try_into()?;
					let mapping = MethodMapping { desc, names };
					let method: MethodNowodeMapping<N> = MethodNowodeMapping::new(mapping);
					let method = class.add_method(method)?;

					iter.next_level().on_every_line(|iter, mut line| {
						if line.first_field == "p" {
							let index = line.next()?.parse()?;
							let names = line.list::<N>()?.try_into()?;
							let mapping = ParameterMapping { index, names };
							let parameter: ParameterNowodeMapping<N> = ParameterNowodeMapping::new(mapping);
							let parameter = method.add_parameter(parameter)?;

							iter.next_level().on_every_line(|_, line| {
								if line.first_field == "c" {
									add_comment(&mut parameter.javadoc, line)
								} else {
									Ok(())
								}
							}).context("reading parameter sub-sections")
						} else if line.first_field == "c" {
							add_comment(&mut method.javadoc, line)
						} else {
							Ok(())
						}
					}).context("reading method sub-sections")
				} else if line.first_field == "c" {
					add_comment(&mut class.javadoc, line)
				} else {
					Ok(())
				}
			}).context("reading class sub-sections")
		} else {
			Ok(())
		}
	}).context("reading lines")?;

	if let Some(line) = lines.next() {
		bail!("expected end of input, got: {line:?}");
	}

	Ok(mappings)
}

fn add_comment(javadoc: &mut Option<JavadocMapping>, line: TinyLine) -> Result<()> {
	let comment = JavadocMapping(line.end()?);
	if let Some(javadoc) = javadoc {
		bail!("only one comment is allowed, got {javadoc:?} and {comment:?}")
	} else {
		*javadoc = Some(comment);
		Ok(())
	}
}

/// Writes the given mappings into a `String`, in the tiny v2 format.
///
/// This is equivalent to first calling [`write_vec`] and then [`String::from_utf8`].
///
/// This method is of most use in test cases, where you also use the `pretty_assertions` crate for viewing string diffs.
pub fn write_string<const N: usize>(mappings: &Mappings<N>) -> Result<String> {
	let vec = write_vec(mappings)?;
	String::from_utf8(vec).context("failed to convert written mappings to utf8")
}

/// Writes the given mappings into a `Vec<u8>`, in the tiny v2 format.
///
/// This is equivalent to letting [`write`][fn@write] write into a `Vec<u8>`.
pub fn write_vec<const N: usize>(mappings: &Mappings<N>) -> Result<Vec<u8>> {
	let mut vec = Vec::new();
	write(mappings, &mut vec)?;
	Ok(vec)
}

fn write_names<const N: usize>(w: &mut impl Write, names: &Names<N, impl AsRef<str>>) -> Result<()> {
	for name in names.names() {
		let name = name.as_ref().map(|x| x.as_ref());
		write!(w, "\t{}", name.unwrap_or(""))?;
	}
	writeln!(w)?;
	Ok(())
}

#[allow(clippy::tabs_in_doc_comments)]
/// Writes the given mappings to the given writer, in the tiny v2 format.
///
/// This sorts the classes, fields, methods and parameters.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use quill::tree::mappings::Mappings;
/// let input = "\
/// tiny	2	0	namespaceA	namespaceB
/// c	D	E
/// c	A	B
/// 	m	(JI)V	methodB	methodBSecondName
/// 		p	3	y	ySecondName
/// 		p	1	x	xSecondName
/// 	f	I	bIsAfterA	e
/// 		c	a comment
/// 	f	I	aIsBeforeB	c
/// ";
///
/// let reader = &mut input.as_bytes();
/// let mappings: Mappings<2> = quill::tiny_v2::read(reader).unwrap();
///
/// let written = quill::tiny_v2::write_string(&mappings).unwrap();
///
/// let output = "\
/// tiny	2	0	namespaceA	namespaceB
/// c	A	B
/// 	f	I	aIsBeforeB	c
/// 	f	I	bIsAfterA	e
/// 		c	a comment
/// 	m	(JI)V	methodB	methodBSecondName
/// 		p	1	x	xSecondName
/// 		p	3	y	ySecondName
/// c	D	E
/// ";
///
/// assert_eq!(written, output);
/// ```
pub fn write<const N: usize>(mappings: &Mappings<N>, w: &mut impl Write) -> Result<()> {
	// the buffering makes it much faster
	let mut w = BufWriter::new(w);
	let w = &mut w;

	write!(w, "tiny\t2\t0")?;
	for namespace in mappings.info.namespaces.names() {
		write!(w, "\t{namespace}")?;
	}
	writeln!(w)?;

	let mut classes: Vec<_> = mappings.classes.values().collect();
	classes.sort_by_key(|x| &x.info);
	for class in classes {
		write!(w, "c")?;
		write_names(w, &class.info.names)?;

		if let Some(ref comment) = class.javadoc {
			writeln!(w, "\tc\t{}", comment.0)?;
		}

		let mut fields: Vec<_> = class.fields.values().collect();
		fields.sort_by_key(|x| &x.info);
		for field in fields {
			write!(w, "\tf\t{}", field.info.desc)?;
			write_names(w, &field.info.names)?;

			if let Some(ref comment) = field.javadoc {
				writeln!(w, "\t\tc\t{}", comment.0)?;
			}
		}

		let mut methods: Vec<_> = class.methods.values().collect();
		methods.sort_by_key(|x| &x.info);
		for method in methods {
			write!(w, "\tm\t{}", method.info.desc)?;
			write_names(w, &method.info.names)?;

			if let Some(ref comment) = method.javadoc {
				writeln!(w, "\t\tc\t{}", comment.0)?;
			}

			let mut parameters: Vec<_> = method.parameters.values().collect();
			parameters.sort_by_key(|x| &x.info);
			for parameter in parameters {
				write!(w, "\t\tp\t{}", parameter.info.index)?;
				write_names(w, &parameter.info.names)?;

				if let Some(ref comment) = parameter.javadoc {
					writeln!(w, "\t\t\tc\t{}", comment.0)?;
				}
			}
		}
	}

	w.flush()?;
	Ok(())
}

/// Writes a mapping set into a `String`, see [`write_set`].
pub fn write_set_string(set: &MappingSet) -> Result<String> {
	let mut vec = Vec::new();
	write_set(set, &mut vec)?;
	String::from_utf8(vec).context("failed to convert written mappings to utf8")
}

#[allow(clippy::tabs_in_doc_comments)]
/// Writes a mapping set in the tiny v2 format, with the obfuscated and deobfuscated namespaces as the two columns.
///
/// Classes are written in the order of [`MappingSet::classes`], with their full names. The fields and methods follow
/// their class in the order they were added. Fields without a descriptor can't be represented, they are skipped with a
/// warning.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use duke::tree::class::ClassName;
/// use duke::tree::field::{FieldDescriptor, FieldName};
/// use quill::set::{FieldKey, FieldMapping, MappingSet, Rename};
///
/// let mut set = MappingSet::with_namespaces("official", "named").unwrap();
/// let class = set.add_class(&ClassName::try_from("a").unwrap(), Rename::Renamed(ClassName::try_from("Foo").unwrap())).unwrap();
/// class.add_field(FieldMapping::new(
/// 	FieldKey { name: FieldName::try_from("b").unwrap(), desc: Some(FieldDescriptor::try_from("I").unwrap()) },
/// 	Rename::Renamed(FieldName::try_from("count").unwrap()),
/// )).unwrap();
/// set.add_class(&ClassName::try_from("a$c").unwrap(), Rename::Unchanged).unwrap();
///
/// let expected = "\
/// tiny	2	0	official	named
/// c	a	Foo
/// 	f	I	b	count
/// c	a$c	Foo$c
/// ";
/// assert_eq!(quill::tiny_v2::write_set_string(&set).unwrap(), expected);
/// ```
pub fn write_set(set: &MappingSet, w: &mut impl Write) -> Result<()> {
	let mut w = BufWriter::new(w);
	let w = &mut w;

	writeln!(w, "tiny\t2\t0\t{}\t{}", set.namespaces.from_name(), set.namespaces.to_name())?;

	for class in set.classes()? {
		writeln!(w, "c\t{}\t{}", class.obf(), class.deobf)?;

		for field in class.mapping.fields() {
			let Some(desc) = field.desc() else {
				warn!("skipping field {:?} of class {:?}, as it has no descriptor", field.obf_name(), class.obf());
				continue;
			};
			writeln!(w, "\tf\t{desc}\t{}\t{}", field.obf_name(), field.deobf_name())?;
		}

		for method in class.mapping.methods() {
			writeln!(w, "\tm\t{}\t{}\t{}", method.desc(), method.obf_name(), method.deobf_name())?;
		}
	}

	w.flush()?;
	Ok(())
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassName;
	use crate::tree::mappings::Mappings;

	#[test]
	fn wrong_header() {
		let input = "tiny\t1\t0\ta\tb\n";
		assert!(crate::tiny_v2::read::<2>(input.as_bytes()).is_err());
	}

	#[test]
	fn wrong_namespace_count() {
		let input = "tiny\t2\t0\ta\tb\tc\n";
		assert!(crate::tiny_v2::read::<2>(input.as_bytes()).is_err());
	}

	#[test]
	fn duplicate_class() {
		let input = "tiny\t2\t0\ta\tb\nc\tA\tB\nc\tA\tC\n";
		assert!(crate::tiny_v2::read::<2>(input.as_bytes()).is_err());
	}

	#[test]
	fn error_names_the_line() {
		let input = "tiny\t2\t0\ta\tb\nc\tA\tB\n\tf\tI\tx\n";
		let error = crate::tiny_v2::read::<2>(input.as_bytes()).unwrap_err();
		assert!(format!("{error:#}").contains("in line 3"), "{error:#}");
	}

	#[test]
	fn empty_names_are_missing() -> Result<()> {
		let input = "tiny\t2\t0\ta\tb\tc\nc\tA\t\tC\n";
		let mappings: Mappings<3> = crate::tiny_v2::read(input.as_bytes())?;

		let class = &mappings.classes[0];
		assert_eq!(class.info.names.names(), &[Some(ClassName::try_from("A")?), None, Some(ClassName::try_from("C")?)]);
		Ok(())
	}
}
