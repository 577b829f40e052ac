use std::io::Write;
use anyhow::{anyhow, bail, Context, Result};
use crate::class_constants::{self, pool};
use crate::jstring;
use crate::tree::class::{ClassHeader, ClassName};

#[derive(Debug, PartialEq)]
enum PoolEntry {
	Utf8(String),
	Class(u16),
}

#[derive(Debug, Default)]
struct PoolWrite {
	entries: Vec<PoolEntry>,
}

impl PoolWrite {
	fn put(&mut self, entry: PoolEntry) -> Result<u16> {
		let position = match self.entries.iter().position(|x| *x == entry) {
			Some(position) => position,
			None => {
				self.entries.push(entry);
				self.entries.len() - 1
			},
		};
		// the constant pool starts at index 1
		u16::try_from(position + 1)
			.map_err(|_| anyhow!("too many constant pool entries"))
	}

	fn put_utf8(&mut self, string: &str) -> Result<u16> {
		self.put(PoolEntry::Utf8(string.to_owned()))
	}

	fn put_class(&mut self, class: &ClassName) -> Result<u16> {
		let name_index = self.put_utf8(class.as_str())?;
		self.put(PoolEntry::Class(name_index))
	}

	fn write(&self, w: &mut impl Write) -> Result<()> {
		let count = u16::try_from(self.entries.len() + 1)
			.map_err(|_| anyhow!("too many constant pool entries"))?;
		w.write_all(&count.to_be_bytes())?;

		for entry in &self.entries {
			match entry {
				PoolEntry::Utf8(string) => {
					let vec = jstring::from_string_to_vec(string);
					let length = u16::try_from(vec.len())
						.with_context(|| anyhow!("string {string:?} is too long for the constant pool"))?;
					w.write_all(&[pool::UTF8])?;
					w.write_all(&length.to_be_bytes())?;
					w.write_all(&vec)?;
				},
				PoolEntry::Class(name_index) => {
					w.write_all(&[pool::CLASS])?;
					w.write_all(&name_index.to_be_bytes())?;
				},
			}
		}
		Ok(())
	}
}

fn write_u16(w: &mut Vec<u8>, value: u16) {
	w.extend_from_slice(&value.to_be_bytes());
}

fn write_len(w: &mut Vec<u8>, len: usize) -> Result<()> {
	match u16::try_from(len) {
		Ok(len) => {
			write_u16(w, len);
			Ok(())
		},
		Err(_) => bail!("cannot write {len} elements, at most {} are allowed", u16::MAX),
	}
}

/// Writes a class file only containing the header, with no attributes and no code.
///
/// The result is version 52 (Java 8), and is only useful as a stub for reading the class hierarchy again.
pub(crate) fn write(w: &mut impl Write, header: &ClassHeader) -> Result<()> {
	let mut pool = PoolWrite::default();
	let mut body = Vec::new();

	write_u16(&mut body, header.access);
	write_u16(&mut body, pool.put_class(&header.name)?);
	match &header.super_class {
		Some(super_class) => write_u16(&mut body, pool.put_class(super_class)?),
		None => write_u16(&mut body, 0),
	}
	write_len(&mut body, header.interfaces.len())?;
	for interface in &header.interfaces {
		write_u16(&mut body, pool.put_class(interface)?);
	}

	write_len(&mut body, header.fields.len())?;
	for field in &header.fields {
		write_u16(&mut body, field.access);
		write_u16(&mut body, pool.put_utf8(field.name.as_str())?);
		write_u16(&mut body, pool.put_utf8(field.descriptor.as_str())?);
		write_u16(&mut body, 0); // attributes
	}

	write_len(&mut body, header.methods.len())?;
	for method in &header.methods {
		write_u16(&mut body, method.access);
		write_u16(&mut body, pool.put_utf8(method.name.as_str())?);
		write_u16(&mut body, pool.put_utf8(method.descriptor.as_str())?);
		write_u16(&mut body, 0); // attributes
	}

	write_u16(&mut body, 0); // class attributes

	w.write_all(&class_constants::MAGIC.to_be_bytes())?;
	w.write_all(&0u16.to_be_bytes())?; // minor
	w.write_all(&52u16.to_be_bytes())?; // major
	pool.write(w)?;
	w.write_all(&body)?;

	Ok(())
}
