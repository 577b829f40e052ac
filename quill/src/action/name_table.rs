use anyhow::{anyhow, Context, Result};
use duke::tree::field::FieldName;
use duke::tree::method::MethodName;
use crate::names_csv::NameTable;
use crate::set::{ClassMapping, MappingSet, Rename};

impl MappingSet {
	/// Replaces the deobfuscated names of fields and methods with their entry in the name table.
	///
	/// Names without an entry in the table are kept. Classes and parameters are not touched.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use duke::tree::method::{MethodDescriptor, MethodName};
	/// use quill::names_csv::NameTable;
	/// use quill::set::{MappingSet, MethodKey, MethodMapping, Rename};
	///
	/// let mut set = MappingSet::with_namespaces("official", "srg").unwrap();
	/// let class = set.add_class(&ClassName::try_from("a").unwrap(), Rename::Unchanged).unwrap();
	/// let key = MethodKey { name: MethodName::try_from("b").unwrap(), desc: MethodDescriptor::try_from("()V").unwrap() };
	/// class.add_method(MethodMapping::new(key.clone(), Rename::Renamed(MethodName::try_from("func_1_b").unwrap()))).unwrap();
	///
	/// let table = NameTable::read("searge,name\nfunc_1_b,tick\n".as_bytes()).unwrap();
	/// let named = set.apply_name_table(&table).unwrap();
	///
	/// let method = named.get_class(&ClassName::try_from("a").unwrap()).unwrap().get_method(&key.name, &key.desc).unwrap();
	/// assert_eq!(method.deobf_name().as_str(), "tick");
	/// ```
	pub fn apply_name_table(&self, table: &NameTable) -> Result<MappingSet> {
		let mut set = self.clone();

		set.for_each_class_mut(&mut |class: &mut ClassMapping| {
			for field in class.fields.values_mut() {
				if let Some(name) = table.lookup(field.deobf_name().as_str()) {
					field.deobf = Rename::Renamed(FieldName::try_from(name)
						.with_context(|| anyhow!("invalid field name in name table for {:?}", field.deobf_name()))?);
				}
			}
			for method in class.methods.values_mut() {
				if let Some(name) = table.lookup(method.deobf_name().as_str()) {
					method.deobf = Rename::Renamed(MethodName::try_from(name)
						.with_context(|| anyhow!("invalid method name in name table for {:?}", method.deobf_name()))?);
				}
			}
			Ok(())
		})?;

		Ok(set)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassName;
	use duke::tree::field::FieldName;
	use crate::names_csv::NameTable;
	use crate::set::{FieldKey, FieldMapping, MappingSet, Rename};

	#[test]
	fn unchanged_names_are_looked_up_too() -> Result<()> {
		let mut set = MappingSet::with_namespaces("official", "srg")?;
		let class = set.add_class(&ClassName::try_from("a$b")?, Rename::Unchanged)?;
		class.add_field(FieldMapping::new(FieldKey { name: FieldName::try_from("field_1_c")?, desc: None }, Rename::Unchanged))?;
		class.add_field(FieldMapping::new(FieldKey { name: FieldName::try_from("d")?, desc: None }, Rename::Unchanged))?;

		let table = NameTable::read("searge,name\nfield_1_c,world\n".as_bytes())?;
		let named = set.apply_name_table(&table)?;

		let class = named.get_class(&ClassName::try_from("a$b")?);
		let names: Vec<_> = class.into_iter()
			.flat_map(|class| class.fields())
			.map(|field| field.deobf.clone())
			.collect();
		assert_eq!(names, vec![Rename::Renamed(FieldName::try_from("world")?), Rename::Unchanged]);

		// the input is left as it is
		assert_eq!(set.get_class(&ClassName::try_from("a$b")?).and_then(|class| class.fields().next()).map(|field| field.deobf.clone()), Some(Rename::Unchanged));
		Ok(())
	}

	#[test]
	fn invalid_names() -> Result<()> {
		let mut set = MappingSet::with_namespaces("official", "srg")?;
		let class = set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		class.add_field(FieldMapping::new(FieldKey { name: FieldName::try_from("field_1_c")?, desc: None }, Rename::Unchanged))?;

		let table = NameTable::read("searge,name\nfield_1_c,a.b\n".as_bytes())?;
		assert!(set.apply_name_table(&table).is_err());
		Ok(())
	}
}
