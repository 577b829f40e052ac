use anyhow::{bail, Result};
use indexmap::IndexMap;
use crate::set::{ClassMapping, FieldKey, FieldMapping, MappingSet};

impl MappingSet {
	/// Adds descriptors to the fields that don't have one, taking them from another set over the same obfuscated
	/// namespace.
	///
	/// A field gets the descriptor of the field with the same name in the same class of `source`, if that is the only
	/// field with that name. Other fields are kept without descriptor.
	///
	/// This allows merging the fields of formats like TSRG by their full key.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use duke::tree::field::FieldDescriptor;
	///
	/// let set = quill::tsrg::read("a Foo\n\tb bar\n".as_bytes(), ["official", "srg"]).unwrap();
	/// let source = quill::tiny_v2::read::<2>("tiny\t2\t0\tofficial\tnamed\nc\ta\tFoo\n\tf\tJ\tb\tbar\n".as_bytes()).unwrap();
	/// let source = quill::set::MappingSet::from_tree(&source, "official", "named").unwrap();
	///
	/// let filled = set.fill_field_descriptors(&source).unwrap();
	/// let field = filled.get_class(&ClassName::try_from("a").unwrap()).unwrap().fields().next().unwrap();
	/// assert_eq!(field.desc(), Some(&FieldDescriptor::try_from("J").unwrap()));
	/// ```
	pub fn fill_field_descriptors(&self, source: &MappingSet) -> Result<MappingSet> {
		let mut set = self.clone();

		set.for_each_class_mut(&mut |class: &mut ClassMapping| {
			let Some(source_class) = source.get_class(class.obf_name()) else {
				return Ok(());
			};

			let mut fields = IndexMap::with_capacity(class.fields.len());
			for (key, field) in std::mem::take(&mut class.fields) {
				let field = match key.desc {
					Some(_) => field,
					None => {
						let desc = source_class.get_field(&key.name, None)
							.and_then(|source_field| source_field.desc())
							.cloned();
						let mut filled = FieldMapping::new(FieldKey { name: key.name.clone(), desc }, field.deobf.clone());
						filled.comment = field.comment.clone();
						filled
					},
				};
				let key = field.key().clone();
				if fields.insert(key.clone(), field).is_some() {
					bail!("cannot fill in descriptor for field {key:?} of class {:?}, as there's already one", class.obf_name());
				}
			}
			class.fields = fields;

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
	use duke::tree::field::{FieldDescriptor, FieldName};
	use crate::set::{FieldKey, FieldMapping, MappingSet, Rename};

	#[test]
	fn ambiguous_names_stay_without_descriptor() -> Result<()> {
		let mut set = MappingSet::with_namespaces("official", "srg")?;
		let class = set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		class.add_field(FieldMapping::new(FieldKey { name: FieldName::try_from("b")?, desc: None }, Rename::Unchanged))?;
		class.add_field(FieldMapping::new(FieldKey { name: FieldName::try_from("c")?, desc: None }, Rename::Unchanged))?;

		let mut source = MappingSet::with_namespaces("official", "named")?;
		let class = source.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		for desc in ["I", "J"] {
			class.add_field(FieldMapping::new(
				FieldKey { name: FieldName::try_from("b")?, desc: Some(FieldDescriptor::try_from(desc)?) },
				Rename::Unchanged,
			))?;
		}
		class.add_field(FieldMapping::new(
			FieldKey { name: FieldName::try_from("c")?, desc: Some(FieldDescriptor::try_from("Z")?) },
			Rename::Unchanged,
		))?;

		let filled = set.fill_field_descriptors(&source)?;
		let descs: Vec<_> = filled.get_class(&ClassName::try_from("a")?).into_iter()
			.flat_map(|class| class.fields())
			.map(|field| field.desc().map(|desc| desc.as_str().to_owned()))
			.collect();
		assert_eq!(descs, vec![None, Some("Z".to_owned())]);
		Ok(())
	}
}
