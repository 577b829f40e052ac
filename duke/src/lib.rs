//! Crate for the names and descriptors of the Java Virtual Machine, and for reading and writing the header of
//! [Java Class Files](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html).
//!
//! The header is the part of a class file that describes the class hierarchy: the name of the class, its super class,
//! its interfaces and the names, descriptors and access flags of its fields and methods. Attributes (and with them
//! any code) are skipped.

pub mod tree;
pub mod class_constants;
mod class_reader;
mod class_writer;
mod jstring;

mod macros;

use std::io::{Read, Write};
use anyhow::{bail, Context, Result};
use crate::tree::class::ClassHeader;

/// Reads the header of a single java class file from the reader.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use duke::tree::class::{ClassHeader, ClassName};
///
/// let header = ClassHeader::new(0x0021, ClassName::try_from("a/B").unwrap(), Some(ClassName::java_lang_object()), vec![]);
///
/// let mut vec = Vec::new();
/// duke::write_class_header(&mut vec, &header).unwrap();
///
/// let read = duke::read_class_header(&mut vec.as_slice()).unwrap();
/// assert_eq!(read, header);
/// ```
pub fn read_class_header(reader: &mut impl Read) -> Result<ClassHeader> {
	class_reader::read(reader)
		.context("failed to read class file header")
}

/// Writes a class file that only consists of the given header.
pub fn write_class_header(writer: &mut impl Write, header: &ClassHeader) -> Result<()> {
	class_writer::write(writer, header)
		.with_context(|| anyhow::anyhow!("failed to write class file for {:?}", header.name))
}

trait ClassRead {
	fn skip(&mut self, n: u64) -> Result<()>;

	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]>;
	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n().context("couldn't read u8, perhaps the data's end is reached?")?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n().context("couldn't read u16, perhaps the data's end is reached?")?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n().context("couldn't read u32, perhaps the data's end is reached?")?))
	}

	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>>;
	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
		where
			S: FnOnce(&mut Self) -> Result<usize>,
			E: FnMut(&mut Self) -> Result<T>
	{
		let size = get_size(self)?;
		let mut vec = Vec::with_capacity(size);
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}

impl<T: Read> ClassRead for T {
	fn skip(&mut self, n: u64) -> Result<()> {
		let skipped = std::io::copy(&mut self.by_ref().take(n), &mut std::io::sink())?;
		if skipped != n {
			bail!("couldn't skip {n} bytes, only {skipped} were left");
		}
		Ok(())
	}

	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>> {
		let mut vec = vec![0u8; size];
		self.read_exact(&mut vec)?;
		Ok(vec)
	}
}
