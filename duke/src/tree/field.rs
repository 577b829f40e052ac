use anyhow::{bail, Result};
use crate::class_constants::access;
use crate::macros::make_name_like;
use crate::tree::names::is_valid_unqualified_name;

make_name_like! {
	/// The name of a field.
	pub FieldName;
}

impl FieldName {
	fn check_valid(inner: &str) -> Result<()> {
		if !is_valid_unqualified_name(inner) {
			bail!("invalid field name: must be non-empty and not contain any of `.`, `;`, `[` and `/`");
		}
		Ok(())
	}
}

make_name_like! {
	/// The descriptor of a field, for example `I` or `[Ljava/lang/String;`.
	pub FieldDescriptor;
}

impl FieldDescriptor {
	fn check_valid(inner: &str) -> Result<()> {
		crate::tree::descriptor::parse_field_descriptor(inner)?;
		Ok(())
	}
}

/// A field as declared in a class file.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHeader {
	pub access: u16,
	pub name: FieldName,
	pub descriptor: FieldDescriptor,
}

impl FieldHeader {
	pub fn is_static(&self) -> bool {
		self.access & access::STATIC != 0
	}
}
