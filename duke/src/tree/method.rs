use anyhow::{bail, Result};
use crate::class_constants::access;
use crate::macros::make_name_like;
use crate::tree::names::{is_valid_method_name, is_valid_unqualified_name};

make_name_like! {
	/// The name of a method, including the special `<init>` and `<clinit>` names.
	pub MethodName;
}

impl MethodName {
	pub const INIT: &'static str = "<init>";
	pub const CLINIT: &'static str = "<clinit>";

	fn check_valid(inner: &str) -> Result<()> {
		if !is_valid_method_name(inner) {
			bail!("invalid method name: must be `<init>`, `<clinit>` or non-empty and not contain any of `.`, `;`, `[`, `/`, `<` and `>`");
		}
		Ok(())
	}

	/// Returns whether this is the name of a constructor or a static initializer.
	///
	/// These names never change between namespaces.
	pub fn is_special(&self) -> bool {
		self.0 == Self::INIT || self.0 == Self::CLINIT
	}
}

make_name_like! {
	/// The descriptor of a method, for example `(IJLjava/lang/String;)V`.
	pub MethodDescriptor;
}

impl MethodDescriptor {
	fn check_valid(inner: &str) -> Result<()> {
		crate::tree::descriptor::parse_method_descriptor(inner)?;
		Ok(())
	}
}

make_name_like! {
	/// The name of a method parameter.
	pub ParameterName;
}

impl ParameterName {
	fn check_valid(inner: &str) -> Result<()> {
		if !is_valid_unqualified_name(inner) {
			bail!("invalid parameter name: must be non-empty and not contain any of `.`, `;`, `[` and `/`");
		}
		Ok(())
	}
}

/// A method as declared in a class file.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodHeader {
	pub access: u16,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,
}

impl MethodHeader {
	pub fn is_static(&self) -> bool {
		self.access & access::STATIC != 0
	}

	pub fn is_private(&self) -> bool {
		self.access & access::PRIVATE != 0
	}

	/// Returns whether calls to this method are dispatched on the runtime type, so that subclasses can override it.
	pub fn is_virtual(&self) -> bool {
		!self.is_static() && !self.is_private() && !self.name.is_special()
	}
}
