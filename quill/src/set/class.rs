use std::fmt::Debug;
use std::hash::Hash;
use anyhow::{bail, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use duke::tree::class::ClassName;
use duke::tree::field::{FieldDescriptor, FieldName};
use duke::tree::method::{MethodDescriptor, MethodName};
use crate::set::member::{FieldKey, FieldMapping, MethodKey, MethodMapping};
use crate::set::Rename;

pub(super) fn add_child<'a, K, V>(map: &'a mut IndexMap<K, V>, key: K, child: V) -> Result<&'a mut V>
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

/// The mapping of a class.
///
/// Both names are full names, also for nested classes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMapping {
	obf: ClassName,
	pub deobf: Rename<ClassName>,
	pub comment: Option<String>,
	pub(crate) fields: IndexMap<FieldKey, FieldMapping>,
	pub(crate) methods: IndexMap<MethodKey, MethodMapping>,
	/// Keyed by the simple name, the part after the last `$`.
	pub(crate) inner_classes: IndexMap<ClassName, ClassMapping>,
}

impl ClassMapping {
	pub(crate) fn new(obf: ClassName) -> ClassMapping {
		ClassMapping {
			obf,
			deobf: Rename::Unchanged,
			comment: None,
			fields: IndexMap::new(),
			methods: IndexMap::new(),
			inner_classes: IndexMap::new(),
		}
	}

	/// The full obfuscated name.
	pub fn obf_name(&self) -> &ClassName {
		&self.obf
	}

	/// The full deobfuscated name, if the class is renamed, otherwise the full obfuscated name.
	///
	/// For nested classes that aren't renamed, the deobfuscated name of the outer class is not taken into account.
	/// Use [`MappingSet::classes`][crate::set::MappingSet::classes] or
	/// [`MappingSet::get_class_deobf_name`][crate::set::MappingSet::get_class_deobf_name] for that.
	pub fn deobf_name(&self) -> &ClassName {
		self.deobf.resolve(&self.obf)
	}

	/// The last part of the nesting path of the obfuscated name.
	pub fn simple_obf_name(&self) -> &str {
		self.obf.nesting_path().last().copied().unwrap_or(self.obf.as_str())
	}

	pub(crate) fn full_deobf_name(&self, outer_deobf: &ClassName) -> Result<ClassName> {
		match &self.deobf {
			Rename::Renamed(name) => Ok(name.clone()),
			Rename::Unchanged => outer_deobf.join_inner(self.simple_obf_name()),
		}
	}

	pub(crate) fn collect_entries<'a>(&'a self, outer_deobf: Option<&ClassName>, entries: &mut Vec<(&'a ClassMapping, ClassName)>) -> Result<()> {
		let deobf = match outer_deobf {
			Some(outer_deobf) => self.full_deobf_name(outer_deobf)?,
			None => self.deobf_name().clone(),
		};
		entries.push((self, deobf.clone()));

		for inner in self.inner_classes.values() {
			inner.collect_entries(Some(&deobf), entries)?;
		}
		Ok(())
	}

	pub fn fields(&self) -> impl Iterator<Item=&FieldMapping> {
		self.fields.values()
	}

	pub fn methods(&self) -> impl Iterator<Item=&MethodMapping> {
		self.methods.values()
	}

	pub fn inner_classes(&self) -> impl Iterator<Item=&ClassMapping> {
		self.inner_classes.values()
	}

	pub fn get_inner_class(&self, simple_name: &str) -> Option<&ClassMapping> {
		self.inner_classes.get(simple_name)
	}

	/// Finds the key of a field.
	///
	/// Tries the exact key first. If that doesn't exist, a field without descriptor is looked up by the name. If
	/// `desc` is `None`, the only field with the given name is taken, no matter what descriptor it has.
	fn find_field_key(&self, name: &FieldName, desc: Option<&FieldDescriptor>) -> Option<&FieldKey> {
		let exact = FieldKey { name: name.clone(), desc: desc.cloned() };
		if let Some((key, _)) = self.fields.get_key_value(&exact) {
			return Some(key);
		}

		match desc {
			Some(_) => {
				let name_only = FieldKey { name: name.clone(), desc: None };
				self.fields.get_key_value(&name_only).map(|(key, _)| key)
			},
			None => {
				let mut with_name = self.fields.keys().filter(|key| key.name == *name);
				match (with_name.next(), with_name.next()) {
					(Some(key), None) => Some(key),
					_ => None,
				}
			},
		}
	}

	/// Looks up a field, see [`FieldKey`] for how fields without descriptor are matched.
	pub fn get_field(&self, name: &FieldName, desc: Option<&FieldDescriptor>) -> Option<&FieldMapping> {
		let key = self.find_field_key(name, desc)?;
		self.fields.get(key)
	}

	pub fn get_field_mut(&mut self, name: &FieldName, desc: Option<&FieldDescriptor>) -> Option<&mut FieldMapping> {
		let key = self.find_field_key(name, desc)?.clone();
		self.fields.get_mut(&key)
	}

	pub fn get_method(&self, name: &MethodName, desc: &MethodDescriptor) -> Option<&MethodMapping> {
		self.methods.get(&MethodKey { name: name.clone(), desc: desc.clone() })
	}

	pub fn get_method_mut(&mut self, name: &MethodName, desc: &MethodDescriptor) -> Option<&mut MethodMapping> {
		self.methods.get_mut(&MethodKey { name: name.clone(), desc: desc.clone() })
	}

	pub fn add_field(&mut self, field: FieldMapping) -> Result<&mut FieldMapping> {
		add_child(&mut self.fields, field.key().clone(), field)
	}

	pub fn add_method(&mut self, method: MethodMapping) -> Result<&mut MethodMapping> {
		add_child(&mut self.methods, method.key().clone(), method)
	}

	/// Looks up a method, creating a method that isn't renamed if it doesn't exist yet.
	pub fn get_or_create_method(&mut self, key: MethodKey) -> &mut MethodMapping {
		self.methods.entry(key.clone())
			.or_insert_with(|| MethodMapping::new(key, Rename::Unchanged))
	}
}
