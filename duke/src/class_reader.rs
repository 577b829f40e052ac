use anyhow::{anyhow, bail, Context, Result};
use crate::class_constants::{self, pool};
use crate::{ClassRead, jstring};
use crate::tree::class::{ClassHeader, ClassName};
use crate::tree::field::FieldHeader;
use crate::tree::method::MethodHeader;

#[derive(Debug)]
enum PoolEntry {
	Utf8(String),
	Class(u16),
	/// Any entry we don't need the contents of.
	Other,
}

/// The constant pool, with only the entries needed for reading the header kept.
#[derive(Debug)]
struct PoolRead {
	/// The constant pool is indexed starting at `1`, and `long` and `double` entries take up two indices, so this
	/// contains `None` at index `0` and after each such entry.
	entries: Vec<Option<PoolEntry>>,
}

impl PoolRead {
	fn read(reader: &mut impl ClassRead) -> Result<PoolRead> {
		let count = reader.read_u16_as_usize()?;

		let mut entries = Vec::with_capacity(count);
		entries.push(None);

		while entries.len() < count {
			let index = entries.len();
			let tag = reader.read_u8()?;
			let entry = match tag {
				pool::UTF8 => {
					let length = reader.read_u16_as_usize()?;
					let vec = reader.read_u8_vec(length)?;
					let string = jstring::from_vec_to_string(vec)
						.with_context(|| anyhow!("in constant pool entry {index}"))?;
					PoolEntry::Utf8(string)
				},
				pool::CLASS => PoolEntry::Class(reader.read_u16()?),
				pool::INTEGER | pool::FLOAT | pool::FIELD_REF | pool::METHOD_REF | pool::INTERFACE_METHOD_REF |
				pool::NAME_AND_TYPE | pool::DYNAMIC | pool::INVOKE_DYNAMIC => {
					reader.skip(4)?;
					PoolEntry::Other
				},
				pool::LONG | pool::DOUBLE => {
					reader.skip(8)?;
					entries.push(Some(PoolEntry::Other));
					entries.push(None);
					continue;
				},
				pool::METHOD_HANDLE => {
					reader.skip(3)?;
					PoolEntry::Other
				},
				pool::STRING | pool::METHOD_TYPE | pool::MODULE | pool::PACKAGE => {
					reader.skip(2)?;
					PoolEntry::Other
				},
				tag => bail!("unknown constant pool tag {tag} for entry {index}"),
			};
			entries.push(Some(entry));
		}

		Ok(PoolRead { entries })
	}

	fn get(&self, index: u16) -> Result<&PoolEntry> {
		self.entries.get(index as usize)
			.and_then(Option::as_ref)
			.with_context(|| anyhow!("constant pool index {index} is out of bounds or points to an unusable entry"))
	}

	fn get_utf8(&self, index: u16) -> Result<&str> {
		match self.get(index)? {
			PoolEntry::Utf8(string) => Ok(string),
			entry => bail!("expected utf8 entry at constant pool index {index}, got {entry:?}"),
		}
	}

	fn get_class(&self, index: u16) -> Result<ClassName> {
		match self.get(index)? {
			&PoolEntry::Class(name_index) => ClassName::try_from(self.get_utf8(name_index)?)
				.with_context(|| anyhow!("for class entry at constant pool index {index}")),
			entry => bail!("expected class entry at constant pool index {index}, got {entry:?}"),
		}
	}

	fn get_optional_class(&self, index: u16) -> Result<Option<ClassName>> {
		if index == 0 {
			Ok(None)
		} else {
			self.get_class(index).map(Some)
		}
	}
}

/// Skips the `attributes_count` and `attributes` items of the structs.
fn skip_attributes(reader: &mut impl ClassRead) -> Result<()> {
	let attributes_count = reader.read_u16()?;

	for _ in 0..attributes_count {
		let _attribute_name_index = reader.read_u16()?;
		let attribute_length = reader.read_u32()?;

		reader.skip(attribute_length as u64)?;
	}

	Ok(())
}

/// Reads the header of a class file. Everything after the methods is ignored.
pub(crate) fn read(reader: &mut impl ClassRead) -> Result<ClassHeader> {
	let magic = reader.read_u32()?;
	if magic != class_constants::MAGIC {
		bail!("wrong magic: got {magic:#x}, expected 0xCAFEBABE");
	}

	let _minor = reader.read_u16()?;
	let _major = reader.read_u16()?;

	let pool = PoolRead::read(reader).context("failed to read constant pool")?;

	let access = reader.read_u16()?;
	let name = pool.get_class(reader.read_u16()?)?;
	let super_class = pool.get_optional_class(reader.read_u16()?)?;
	let interfaces = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| pool.get_class(r.read_u16()?),
	)?;

	let mut header = ClassHeader::new(access, name, super_class, interfaces);

	header.fields = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| {
			let access = r.read_u16()?;
			let name = pool.get_utf8(r.read_u16()?)?.try_into()?;
			let descriptor = pool.get_utf8(r.read_u16()?)?.try_into()?;
			skip_attributes(r)?;
			Ok(FieldHeader { access, name, descriptor })
		},
	).with_context(|| anyhow!("failed to read fields of class {:?}", header.name))?;

	header.methods = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| {
			let access = r.read_u16()?;
			let name = pool.get_utf8(r.read_u16()?)?.try_into()?;
			let descriptor = pool.get_utf8(r.read_u16()?)?.try_into()?;
			skip_attributes(r)?;
			Ok(MethodHeader { access, name, descriptor })
		},
	).with_context(|| anyhow!("failed to read methods of class {:?}", header.name))?;

	Ok(header)
}
