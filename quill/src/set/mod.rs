//! Mappings between exactly two namespaces, used for composing mappings.
//!
//! A [`MappingSet`] maps the names of one namespace (the "obfuscated" side) to names of another one (the
//! "deobfuscated" side). Each entity stores its obfuscated identity, and a [`Rename`] that is either
//! [`Rename::Unchanged`] (the name is the same in both namespaces) or [`Rename::Renamed`].
//!
//! Classes form a tree: nested classes are stored inside of their outer class, and can be looked up by their full
//! name through the nesting path.
//!
//! The transformations on a mapping set ([`MappingSet::reverse`], [`MappingSet::merge`],
//! [`MappingSet::apply_name_table`], [`MappingSet::complete`] and others) never modify the input, they return new
//! mapping sets.

mod class;
mod member;
mod tree;

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use duke::tree::class::ClassName;
use crate::tree::names::Namespaces;

pub use class::ClassMapping;
pub use member::{FieldKey, FieldMapping, MethodKey, MethodMapping, ParameterMapping};

/// The name of an entity in the deobfuscated namespace.
///
/// Mapping sets distinguish between an entity that was never given a name ([`Rename::Unchanged`]) and one that
/// was explicitly given one, even if that name is the same as the obfuscated name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Rename<T> {
	#[default]
	Unchanged,
	Renamed(T),
}

impl<T> Rename<T> {
	pub fn renamed(&self) -> Option<&T> {
		match self {
			Rename::Unchanged => None,
			Rename::Renamed(name) => Some(name),
		}
	}

	pub fn is_renamed(&self) -> bool {
		matches!(self, Rename::Renamed(_))
	}

	/// Returns the deobfuscated name, falling back to the obfuscated name.
	///
	/// ```
	/// use quill::set::Rename;
	///
	/// assert_eq!(Rename::Renamed("b").resolve(&"a"), &"b");
	/// assert_eq!(Rename::Unchanged.resolve(&"a"), &"a");
	/// ```
	pub fn resolve<'a>(&'a self, obf: &'a T) -> &'a T {
		self.renamed().unwrap_or(obf)
	}
}

impl<T> From<Option<T>> for Rename<T> {
	fn from(value: Option<T>) -> Self {
		match value {
			None => Rename::Unchanged,
			Some(name) => Rename::Renamed(name),
		}
	}
}

/// A class of a mapping set, together with both of its full names.
#[derive(Debug, Clone)]
pub struct ClassEntry<'a> {
	pub mapping: &'a ClassMapping,
	/// The full name in the deobfuscated namespace.
	///
	/// For nested classes that aren't renamed, this is built from the deobfuscated name of the outer class.
	pub deobf: ClassName,
}

impl ClassEntry<'_> {
	pub fn obf(&self) -> &ClassName {
		self.mapping.obf_name()
	}
}

/// Mappings between two namespaces.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSet {
	pub namespaces: Namespaces<2>,
	classes: IndexMap<ClassName, ClassMapping>,
}

impl MappingSet {
	pub fn new(namespaces: Namespaces<2>) -> MappingSet {
		MappingSet {
			namespaces,
			classes: IndexMap::new(),
		}
	}

	/// Creates an empty set with the namespaces given by name.
	pub fn with_namespaces(from: &str, to: &str) -> Result<MappingSet> {
		Ok(MappingSet::new([from, to].try_into()?))
	}

	/// The outermost classes.
	pub fn top_level_classes(&self) -> impl Iterator<Item=&ClassMapping> {
		self.classes.values()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// Looks up a class by its full obfuscated name, following the nesting path for nested classes.
	pub fn get_class(&self, name: &ClassName) -> Option<&ClassMapping> {
		let path = name.nesting_path();
		let (first, rest) = path.split_first()?;
		let mut class = self.classes.get(*first)?;
		for inner in rest {
			class = class.get_inner_class(inner)?;
		}
		Some(class)
	}

	pub fn get_class_mut(&mut self, name: &ClassName) -> Option<&mut ClassMapping> {
		let path = name.nesting_path();
		let (first, rest) = path.split_first()?;
		let mut class = self.classes.get_mut(*first)?;
		for inner in rest {
			class = class.inner_classes.get_mut(*inner)?;
		}
		Some(class)
	}

	/// Looks up a class by its full obfuscated name, creating it and all the classes it's nested in if necessary.
	///
	/// Newly created classes are not renamed.
	pub fn get_or_create_class(&mut self, name: &ClassName) -> Result<&mut ClassMapping> {
		let path = name.nesting_path();
		let (first, rest) = path.split_first()
			.with_context(|| anyhow!("class name {name:?} has an empty nesting path"))?;

		let first = ClassName::try_from(*first)?;
		let mut class = self.classes.entry(first.clone())
			.or_insert_with(|| ClassMapping::new(first));

		for inner in rest {
			let full = class.obf_name().join_inner(inner)?;
			class = class.inner_classes.entry(ClassName::try_from(*inner)?)
				.or_insert_with(|| ClassMapping::new(full));
		}
		Ok(class)
	}

	/// Adds a class with the given deobfuscated name, as the loaders do.
	///
	/// Fails if the class was already given a name before.
	pub fn add_class(&mut self, obf: &ClassName, deobf: Rename<ClassName>) -> Result<&mut ClassMapping> {
		let class = self.get_or_create_class(obf)?;
		if let Rename::Renamed(old) = &class.deobf {
			bail!("cannot add class {obf:?} with name {deobf:?}, as it already has the name {old:?}");
		}
		class.deobf = deobf;
		Ok(class)
	}

	/// Returns all classes, with the nested classes directly after their outer class.
	///
	/// The order is the order in which the outermost classes were added.
	pub fn classes(&self) -> Result<Vec<ClassEntry<'_>>> {
		let mut entries = Vec::new();
		for class in self.classes.values() {
			class.collect_entries(None, &mut entries)?;
		}
		Ok(entries.into_iter()
			.map(|(mapping, deobf)| ClassEntry { mapping, deobf })
			.collect())
	}

	/// Returns the full deobfuscated name of the class with the given full obfuscated name, if the class exists.
	pub fn get_class_deobf_name(&self, name: &ClassName) -> Result<Option<ClassName>> {
		let path = name.nesting_path();
		let Some((first, rest)) = path.split_first() else {
			return Ok(None);
		};
		let Some(mut class) = self.classes.get(*first) else {
			return Ok(None);
		};
		let mut deobf = class.deobf_name().clone();
		for inner in rest {
			let Some(inner_class) = class.get_inner_class(inner) else {
				return Ok(None);
			};
			class = inner_class;
			deobf = class.full_deobf_name(&deobf)?;
		}
		Ok(Some(deobf))
	}

	/// Calls the function on every class, outer classes before their nested classes.
	pub(crate) fn for_each_class_mut(&mut self, f: &mut impl FnMut(&mut ClassMapping) -> Result<()>) -> Result<()> {
		fn visit(class: &mut ClassMapping, f: &mut impl FnMut(&mut ClassMapping) -> Result<()>) -> Result<()> {
			f(class)?;
			for inner in class.inner_classes.values_mut() {
				visit(inner, f)?;
			}
			Ok(())
		}

		for class in self.classes.values_mut() {
			visit(class, f)?;
		}
		Ok(())
	}

	/// Counts the classes, including nested ones.
	pub fn class_count(&self) -> usize {
		fn count(class: &ClassMapping) -> usize {
			1 + class.inner_classes().map(count).sum::<usize>()
		}
		self.classes.values().map(count).sum()
	}
}
