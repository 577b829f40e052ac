use std::fmt::Debug;
use std::hash::Hash;
use anyhow::{bail, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use duke::tree::class::ClassName;
use duke::tree::field::{FieldDescriptor, FieldName};
use duke::tree::method::{MethodDescriptor, MethodName, ParameterName};
use crate::tree::names::{Names, Namespaces};

fn add_child<'a, K, V>(map: &'a mut IndexMap<K, V>, key: K, child: V) -> Result<&'a mut V>
where
	K: Hash + Eq + Debug,
	V: Debug,
{
	match map.entry(key) {
		Entry::Occupied(e) => {
			bail!("cannot add child {child:?} for key {:?}, as there's already one: {:?}", e.key(), e.get());
		},
		Entry::Vacant(e) => Ok(e.insert(child)),
	}
}

#[derive(Debug, Clone)]
pub struct Mappings<const N: usize> {
	pub info: MappingInfo<N>,
	pub classes: IndexMap<ClassName, ClassNowodeMapping<N>>,
}

impl<const N: usize> Mappings<N> {
	pub fn new(info: MappingInfo<N>) -> Mappings<N> {
		Mappings {
			info,
			classes: IndexMap::new(),
		}
	}

	pub(crate) fn add_class(&mut self, child: ClassNowodeMapping<N>) -> Result<&mut ClassNowodeMapping<N>> {
		let key = child.info.names.first_name()?.clone();
		add_child(&mut self.classes, key, child)
	}
}

#[derive(Debug, Clone)]
pub struct ClassNowodeMapping<const N: usize> {
	pub info: ClassMapping<N>,
	pub fields: IndexMap<FieldKey, FieldNowodeMapping<N>>,
	pub methods: IndexMap<MethodKey, MethodNowodeMapping<N>>,
	pub javadoc: Option<JavadocMapping>,
}

impl<const N: usize> ClassNowodeMapping<N> {
	pub fn new(info: ClassMapping<N>) -> ClassNowodeMapping<N> {
		ClassNowodeMapping {
			info,
			fields: IndexMap::new(),
			methods: IndexMap::new(),
			javadoc: None,
		}
	}

	pub(crate) fn add_field(&mut self, child: FieldNowodeMapping<N>) -> Result<&mut FieldNowodeMapping<N>> {
		let key = FieldKey {
			desc: child.info.desc.clone(),
			name: child.info.names.first_name()?.clone(),
		};
		add_child(&mut self.fields, key, child)
	}

	pub(crate) fn add_method(&mut self, child: MethodNowodeMapping<N>) -> Result<&mut MethodNowodeMapping<N>> {
		let key = MethodKey {
			desc: child.info.desc.clone(),
			name: child.info.names.first_name()?.clone(),
		};
		add_child(&mut self.methods, key, child)
	}
}

#[derive(Debug, Clone)]
pub struct FieldNowodeMapping<const N: usize> {
	pub info: FieldMapping<N>,
	pub javadoc: Option<JavadocMapping>,
}

impl<const N: usize> FieldNowodeMapping<N> {
	pub fn new(info: FieldMapping<N>) -> FieldNowodeMapping<N> {
		FieldNowodeMapping {
			info,
			javadoc: None,
		}
	}
}

#[derive(Debug, Clone)]
pub struct MethodNowodeMapping<const N: usize> {
	pub info: MethodMapping<N>,
	/// Keyed by the local variable index.
	pub parameters: IndexMap<usize, ParameterNowodeMapping<N>>,
	pub javadoc: Option<JavadocMapping>,
}

impl<const N: usize> MethodNowodeMapping<N> {
	pub fn new(info: MethodMapping<N>) -> MethodNowodeMapping<N> {
		MethodNowodeMapping {
			info,
			parameters: IndexMap::new(),
			javadoc: None,
		}
	}

	pub(crate) fn add_parameter(&mut self, child: ParameterNowodeMapping<N>) -> Result<&mut ParameterNowodeMapping<N>> {
		add_child(&mut self.parameters, child.info.index, child)
	}
}

#[derive(Debug, Clone)]
pub struct ParameterNowodeMapping<const N: usize> {
	pub info: ParameterMapping<N>,
	pub javadoc: Option<JavadocMapping>,
}

impl<const N: usize> ParameterNowodeMapping<N> {
	pub fn new(info: ParameterMapping<N>) -> ParameterNowodeMapping<N> {
		ParameterNowodeMapping {
			info,
			javadoc: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingInfo<const N: usize> {
	pub namespaces: Namespaces<N>,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct ClassMapping<const N: usize> {
	pub names: Names<N, ClassName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
	pub desc: FieldDescriptor,
	pub name: FieldName,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct FieldMapping<const N: usize> {
	pub desc: FieldDescriptor,
	pub names: Names<N, FieldName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
	pub desc: MethodDescriptor,
	pub name: MethodName,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct MethodMapping<const N: usize> {
	pub desc: MethodDescriptor,
	pub names: Names<N, MethodName>,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct ParameterMapping<const N: usize> {
	/// The local variable index, which counts `long` and `double` parameters twice.
	pub index: usize,
	pub names: Names<N, ParameterName>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JavadocMapping(pub String);

impl From<String> for JavadocMapping {
	fn from(value: String) -> Self {
		JavadocMapping(value)
	}
}
