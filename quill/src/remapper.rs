//! Remappers for remapping class names and descriptors.
//!
//! Implementors of [`ARemapper`] can be created by [`MappingSet::remapper`] and [`Mappings::remapper_a`].
//!
//! In case you want to implement a remapper yourself, you only need to define [`ARemapper::map_class_fail`].
//!
//! # What is a "remapper"?
//! A remapper answers the question for you "what is the name of X in namespace Y?"

use anyhow::{bail, Result};
use indexmap::IndexMap;
use duke::tree::class::ClassName;
use duke::tree::field::FieldDescriptor;
use duke::tree::method::MethodDescriptor;
use crate::set::MappingSet;
use crate::tree::mappings::Mappings;
use crate::tree::names::Namespace;

/// A remapper supporting remapping of class names and descriptors.
pub trait ARemapper {
	/// Maps a class name to a new one, if the mapping exists.
	///
	/// If the mapping doesn't exist, returns `Ok(None)`.
	fn map_class_fail(&self, class: &ClassName) -> Result<Option<ClassName>>;

	/// Maps a class name to a new one, if the mapping doesn't exist, return the old one.
	///
	/// Do not implement this yourself.
	fn map_class(&self, class: &ClassName) -> Result<ClassName> {
		Ok(self.map_class_fail(class)?.unwrap_or_else(|| class.clone()))
	}

	/// Maps a field descriptor to a new one.
	///
	/// Note that this relies on the fact that for non-existing class mappings class names are just copied over.
	///
	/// Do not implement this yourself.
	fn map_field_desc(&self, desc: &FieldDescriptor) -> Result<FieldDescriptor> {
		FieldDescriptor::try_from(map_desc(self, desc.as_str())?)
	}

	/// Maps a method descriptor to a new one.
	///
	/// Note that this relies on the fact that for non-existing class mappings class names are just copied over.
	///
	/// Do not implement this yourself.
	fn map_method_desc(&self, desc: &MethodDescriptor) -> Result<MethodDescriptor> {
		MethodDescriptor::try_from(map_desc(self, desc.as_str())?)
	}
}

/// Maps the class names in a field or method descriptor.
fn map_desc(remapper: &(impl ARemapper + ?Sized), desc: &str) -> Result<String> {
	let mut s = String::with_capacity(desc.len());

	let mut iter = desc.chars();

	while let Some(ch) = iter.next() {
		s.push(ch);

		if ch == 'L' {
			let mut class_name = String::new();
			for ch in iter.by_ref() {
				class_name.push(ch);
				if ch == ';' {
					break;
				}
			}
			if class_name.pop() != Some(';') {
				bail!("descriptor {desc:?} has a missing semicolon somewhere");
			}

			let old_class_name = ClassName::try_from(class_name)?;
			let new_class_name = remapper.map_class(&old_class_name)?;

			s.push_str(new_class_name.as_str());
			s.push(';');
		}
	}

	Ok(s)
}

/// A table of class names, only containing the classes that are renamed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassTable {
	classes: IndexMap<ClassName, ClassName>,
}

impl ClassTable {
	pub fn new() -> ClassTable {
		ClassTable::default()
	}

	/// Adds an entry to the table. Entries mapping a name to itself are not stored.
	pub fn insert(&mut self, from: ClassName, to: ClassName) {
		if from != to {
			self.classes.insert(from, to);
		}
	}

	pub fn get(&self, class: &ClassName) -> Option<&ClassName> {
		self.classes.get(class)
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// Swaps the names of each entry.
	pub fn reversed(&self) -> ClassTable {
		ClassTable {
			classes: self.classes.iter()
				.map(|(from, to)| (to.clone(), from.clone()))
				.collect(),
		}
	}
}

impl ARemapper for ClassTable {
	fn map_class_fail(&self, class: &ClassName) -> Result<Option<ClassName>> {
		Ok(self.classes.get(class).cloned())
	}
}

impl MappingSet {
	/// Creates a remapper from the obfuscated into the deobfuscated namespace.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use duke::tree::method::MethodDescriptor;
	/// use quill::remapper::ARemapper;
	/// use quill::set::{MappingSet, Rename};
	///
	/// let mut set = MappingSet::with_namespaces("official", "named").unwrap();
	/// set.add_class(&ClassName::try_from("a").unwrap(), Rename::Renamed(ClassName::try_from("pkg/Foo").unwrap())).unwrap();
	/// set.add_class(&ClassName::try_from("a$b").unwrap(), Rename::Unchanged).unwrap();
	///
	/// let remapper = set.remapper().unwrap();
	/// let desc = MethodDescriptor::try_from("(La;[La$b;Lc;)La;").unwrap();
	/// assert_eq!(remapper.map_method_desc(&desc).unwrap().as_str(), "(Lpkg/Foo;[Lpkg/Foo$b;Lc;)Lpkg/Foo;");
	/// ```
	pub fn remapper(&self) -> Result<ClassTable> {
		let mut table = ClassTable::new();
		for class in self.classes()? {
			table.insert(class.obf().clone(), class.deobf);
		}
		Ok(table)
	}
}

impl<const N: usize> Mappings<N> {
	/// Creates a remapper between two namespaces of the tree.
	pub fn remapper_a(&self, from: Namespace<N>, to: Namespace<N>) -> Result<ClassTable> {
		let mut table = ClassTable::new();
		for class in self.classes.values() {
			if let (Some(from), Some(to)) = (&class.info.names[from], &class.info.names[to]) {
				table.insert(from.clone(), to.clone());
			}
		}
		Ok(table)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassName;
	use duke::tree::field::FieldDescriptor;
	use crate::remapper::{ARemapper, ClassTable};

	#[test]
	fn unknown_classes_pass_through() -> Result<()> {
		let mut table = ClassTable::new();
		table.insert(ClassName::try_from("a")?, ClassName::try_from("Lemon")?);

		let desc = FieldDescriptor::try_from("[[La;")?;
		assert_eq!(table.map_field_desc(&desc)?.as_str(), "[[LLemon;");

		// class names containing an `L` must not be split up
		let desc = FieldDescriptor::try_from("LLemon;")?;
		assert_eq!(table.map_field_desc(&desc)?.as_str(), "LLemon;");
		assert_eq!(table.reversed().map_field_desc(&desc)?.as_str(), "La;");

		let desc = FieldDescriptor::try_from("J")?;
		assert_eq!(table.map_field_desc(&desc)?, desc);

		Ok(())
	}

	#[test]
	fn identity_entries_are_not_stored() -> Result<()> {
		let mut table = ClassTable::new();
		table.insert(ClassName::try_from("a")?, ClassName::try_from("a")?);

		assert!(table.is_empty());

		Ok(())
	}
}
