//! Reading mappings in the SRG format.
//!
//! Each line of an SRG file describes one entity, identified by a prefix:
//! ```text
//! PK: ./ net/minecraft
//! CL: a net/minecraft/Foo
//! FD: a/b net/minecraft/Foo/field_1_b
//! MD: a/c (La;)V net/minecraft/Foo/func_2_c (Lnet/minecraft/Foo;)V
//! ```
//! Package lines are ignored. The deobfuscated owners and descriptors of members are not stored, as they follow from
//! the class lines.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use duke::tree::class::ClassName;
use duke::tree::field::FieldName;
use duke::tree::method::{MethodDescriptor, MethodName};
use crate::lines::srg_line::SpaceLine;
use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, Rename};

/// Reads a `.srg` file, by opening the file given by the path.
pub fn read_file(path: impl AsRef<Path>, namespaces: [&str; 2]) -> Result<MappingSet> {
	let file = File::open(&path)
		.with_context(|| anyhow!("failed to open mappings file {:?}", path.as_ref()))?;
	read(file, namespaces)
		.with_context(|| anyhow!("failed to read mappings file {:?} as srg file", path.as_ref()))
}

/// Splits `owner/name` at the last `/`.
fn split_member(member: &str) -> Result<(ClassName, String)> {
	let (owner, name) = member.rsplit_once('/')
		.with_context(|| anyhow!("member {member:?} has no owner"))?;
	Ok((ClassName::try_from(owner)?, name.to_owned()))
}

/// Reads the SRG format, from the given reader.
///
/// Classes that only appear as the owner of a member are created without a new name.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use duke::tree::class::ClassName;
/// use duke::tree::method::{MethodDescriptor, MethodName};
///
/// let input = "\
/// PK: ./ net/minecraft
/// MD: a/c (La;)V net/minecraft/Foo/func_2_c (Lnet/minecraft/Foo;)V
/// CL: a net/minecraft/Foo
/// ";
/// let set = quill::srg::read(input.as_bytes(), ["obf", "srg"]).unwrap();
///
/// let class = set.get_class(&ClassName::try_from("a").unwrap()).unwrap();
/// assert_eq!(class.deobf_name().as_str(), "net/minecraft/Foo");
/// let method = class.get_method(&MethodName::try_from("c").unwrap(), &MethodDescriptor::try_from("(La;)V").unwrap()).unwrap();
/// assert_eq!(method.deobf_name().as_str(), "func_2_c");
/// ```
pub fn read(reader: impl Read, namespaces: [&str; 2]) -> Result<MappingSet> {
	let mut set = MappingSet::new(namespaces.try_into()?);

	for (line_number, line) in BufReader::new(reader).lines().enumerate() {
		let line = SpaceLine::new(line_number + 1, &line?);
		let Some(kind) = line.fields.first().cloned() else {
			continue;
		};

		match kind.as_str() {
			"PK:" => {},
			"CL:" => {
				let [_, obf, deobf] = line.list()?;
				set.add_class(&ClassName::try_from(obf)?, Rename::Renamed(ClassName::try_from(deobf)?))
					.with_context(|| anyhow!("in line {}", line_number + 1))?;
			},
			"FD:" => {
				let [_, obf, deobf] = line.list()?;
				let (owner, obf) = split_member(&obf)?;
				let (_, deobf) = split_member(&deobf)?;

				let key = FieldKey { name: FieldName::try_from(obf)?, desc: None };
				set.get_or_create_class(&owner)?
					.add_field(FieldMapping::new(key, Rename::Renamed(FieldName::try_from(deobf)?)))
					.with_context(|| anyhow!("in line {}", line_number + 1))?;
			},
			"MD:" => {
				let [_, obf, desc, deobf, _] = line.list()?;
				let (owner, obf) = split_member(&obf)?;
				let (_, deobf) = split_member(&deobf)?;

				let key = MethodKey { name: MethodName::try_from(obf)?, desc: MethodDescriptor::try_from(desc)? };
				set.get_or_create_class(&owner)?
					.add_method(MethodMapping::new(key, Rename::Renamed(MethodName::try_from(deobf)?)))
					.with_context(|| anyhow!("in line {}", line_number + 1))?;
			},
			_ => bail!("unknown line kind {kind:?} in line {}", line_number + 1),
		}
	}

	Ok(set)
}
