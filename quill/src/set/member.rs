use anyhow::Result;
use indexmap::IndexMap;
use duke::tree::field::{FieldDescriptor, FieldName};
use duke::tree::method::{MethodDescriptor, MethodName, ParameterName};
use crate::set::class::add_child;
use crate::set::Rename;

/// The key of a field: the obfuscated name and the descriptor.
///
/// Some formats (like TSRG) don't store the descriptors of fields. Their fields use `None` as the descriptor, and are
/// only identified by their name. When looking up fields with [`ClassMapping::get_field`][crate::set::ClassMapping::get_field],
/// a field without descriptor matches a query with any descriptor, and a query without descriptor matches the only
/// field with that name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
	pub name: FieldName,
	pub desc: Option<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
	key: FieldKey,
	pub deobf: Rename<FieldName>,
	pub comment: Option<String>,
}

impl FieldMapping {
	pub fn new(key: FieldKey, deobf: Rename<FieldName>) -> FieldMapping {
		FieldMapping { key, deobf, comment: None }
	}

	pub fn key(&self) -> &FieldKey {
		&self.key
	}

	pub fn obf_name(&self) -> &FieldName {
		&self.key.name
	}

	/// The descriptor in the obfuscated namespace.
	pub fn desc(&self) -> Option<&FieldDescriptor> {
		self.key.desc.as_ref()
	}

	pub fn deobf_name(&self) -> &FieldName {
		self.deobf.resolve(&self.key.name)
	}
}

/// The key of a method: the obfuscated name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodMapping {
	key: MethodKey,
	pub deobf: Rename<MethodName>,
	pub comment: Option<String>,
	/// Keyed by the ordinal.
	pub(crate) parameters: IndexMap<usize, ParameterMapping>,
}

impl MethodMapping {
	pub fn new(key: MethodKey, deobf: Rename<MethodName>) -> MethodMapping {
		MethodMapping {
			key,
			deobf,
			comment: None,
			parameters: IndexMap::new(),
		}
	}

	pub fn key(&self) -> &MethodKey {
		&self.key
	}

	pub fn obf_name(&self) -> &MethodName {
		&self.key.name
	}

	/// The descriptor in the obfuscated namespace.
	pub fn desc(&self) -> &MethodDescriptor {
		&self.key.desc
	}

	pub fn deobf_name(&self) -> &MethodName {
		self.deobf.resolve(&self.key.name)
	}

	pub fn parameters(&self) -> impl Iterator<Item=&ParameterMapping> {
		self.parameters.values()
	}

	pub fn get_parameter(&self, ordinal: usize) -> Option<&ParameterMapping> {
		self.parameters.get(&ordinal)
	}

	pub fn add_parameter(&mut self, parameter: ParameterMapping) -> Result<&mut ParameterMapping> {
		add_child(&mut self.parameters, parameter.ordinal, parameter)
	}
}

/// The mapping of a method parameter, identified by its position in the parameter list.
///
/// Parameter names are not part of class files, so a parameter may have no name in either namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMapping {
	ordinal: usize,
	pub obf: Option<ParameterName>,
	pub deobf: Rename<ParameterName>,
	pub comment: Option<String>,
}

impl ParameterMapping {
	pub fn new(ordinal: usize, obf: Option<ParameterName>, deobf: Rename<ParameterName>) -> ParameterMapping {
		ParameterMapping { ordinal, obf, deobf, comment: None }
	}

	/// The position in the parameter list, starting at `0` with the first parameter. A `long` or `double` parameter
	/// only counts once.
	pub fn ordinal(&self) -> usize {
		self.ordinal
	}

	pub fn deobf_name(&self) -> Option<&ParameterName> {
		self.deobf.renamed().or(self.obf.as_ref())
	}
}
