use anyhow::{bail, Result};
use crate::macros::make_name_like;
use crate::tree::field::FieldHeader;
use crate::tree::method::MethodHeader;
use crate::tree::names::is_valid_class_name;

make_name_like! {
	/// A class name in the internal form, like `java/lang/Object`.
	///
	/// Nested classes use `$` to separate the outer from the inner name: `a/b/Outer$Inner`.
	pub ClassName;
}

impl ClassName {
	pub const JAVA_LANG_OBJECT: &'static str = "java/lang/Object";

	fn check_valid(inner: &str) -> Result<()> {
		if !is_valid_class_name(inner) {
			bail!("invalid class name: must be a list of unqualified names separated by `/`, or a field descriptor of an array");
		}
		Ok(())
	}

	pub fn java_lang_object() -> ClassName {
		ClassName(Self::JAVA_LANG_OBJECT.to_owned())
	}

	/// Returns the part after the last `/`.
	///
	/// ```
	/// use duke::tree::class::ClassName;
	/// let name = ClassName::try_from("a/b/Outer$Inner").unwrap();
	/// assert_eq!(name.simple_name(), "Outer$Inner");
	/// ```
	pub fn simple_name(&self) -> &str {
		self.0.rsplit_once('/').map_or(self.as_str(), |(_, simple)| simple)
	}

	/// Splits the name into the names along the nesting path.
	///
	/// The first element is the name of the outermost class, including the package. The following elements are
	/// the simple names of the inner classes. If splitting would create an empty part, the class is treated as not
	/// nested at all.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// let name = ClassName::try_from("a/b/Outer$Inner$1").unwrap();
	/// assert_eq!(name.nesting_path(), vec!["a/b/Outer", "Inner", "1"]);
	///
	/// let name = ClassName::try_from("a/b/Weird$").unwrap();
	/// assert_eq!(name.nesting_path(), vec!["a/b/Weird$"]);
	/// ```
	pub fn nesting_path(&self) -> Vec<&str> {
		if self.0.starts_with('[') {
			return vec![self.as_str()];
		}

		let package_len = self.0.len() - self.simple_name().len();
		let mut parts: Vec<&str> = self.simple_name().split('$').collect();
		if parts.iter().any(|part| part.is_empty()) {
			return vec![self.as_str()];
		}

		parts[0] = &self.0[..package_len + parts[0].len()];
		parts
	}

	/// Appends an inner class name with a `$`.
	pub fn join_inner(&self, inner: &str) -> Result<ClassName> {
		ClassName::try_from(format!("{}${inner}", self.0))
	}
}

/// The parts of a class file needed for resolving the class hierarchy: the name, the super class and interfaces, and
/// the signatures of all declared fields and methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
	pub access: u16,
	pub name: ClassName,
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,
	pub fields: Vec<FieldHeader>,
	pub methods: Vec<MethodHeader>,
}

impl ClassHeader {
	pub fn new(access: u16, name: ClassName, super_class: Option<ClassName>, interfaces: Vec<ClassName>) -> ClassHeader {
		ClassHeader {
			access,
			name,
			super_class,
			interfaces,
			fields: Vec::new(),
			methods: Vec::new(),
		}
	}
}
