use anyhow::{anyhow, Context, Result};
use duke::tree::method::ParameterName;
use crate::remapper::ARemapper;
use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, ParameterMapping, Rename};

/// Returns the new deobfuscated name: the old obfuscated name, if the entity was renamed at all.
fn swap<T: Clone>(obf: &T, deobf: &Rename<T>) -> Rename<T> {
	match deobf {
		Rename::Unchanged => Rename::Unchanged,
		Rename::Renamed(_) => Rename::Renamed(obf.clone()),
	}
}

fn reverse_parameter(parameter: &ParameterMapping) -> ParameterMapping {
	let obf: Option<ParameterName> = parameter.deobf.renamed().cloned();
	let deobf = Rename::from(parameter.obf.clone());

	let mut reversed = ParameterMapping::new(parameter.ordinal(), obf, deobf);
	reversed.comment = parameter.comment.clone();
	reversed
}

impl MappingSet {
	/// Swaps the obfuscated and deobfuscated names of every entity.
	///
	/// The descriptors are remapped with the class names of this set. Entities that weren't renamed stay that way, so
	/// reversing twice gives the original set back.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use quill::set::{MappingSet, Rename};
	///
	/// let mut set = MappingSet::with_namespaces("official", "named").unwrap();
	/// set.add_class(&ClassName::try_from("a").unwrap(), Rename::Renamed(ClassName::try_from("Foo").unwrap())).unwrap();
	///
	/// let reversed = set.reverse().unwrap();
	/// assert_eq!(reversed.namespaces.from_name(), "named");
	/// let class = reversed.get_class(&ClassName::try_from("Foo").unwrap()).unwrap();
	/// assert_eq!(class.deobf_name().as_str(), "a");
	///
	/// assert_eq!(reversed.reverse().unwrap(), set);
	/// ```
	pub fn reverse(&self) -> Result<MappingSet> {
		let remapper = self.remapper()?;

		let mut reversed = MappingSet::with_namespaces(self.namespaces.to_name(), self.namespaces.from_name())?;

		for entry in self.classes()? {
			let class = entry.mapping;
			let new_class = reversed.add_class(&entry.deobf, swap(class.obf_name(), &class.deobf))
				.with_context(|| anyhow!("failed to reverse class {:?}", class.obf_name()))?;
			new_class.comment = class.comment.clone();

			for field in class.fields() {
				let key = FieldKey {
					name: field.deobf_name().clone(),
					desc: field.desc().map(|desc| remapper.map_field_desc(desc)).transpose()?,
				};
				let mut new_field = FieldMapping::new(key, swap(field.obf_name(), &field.deobf));
				new_field.comment = field.comment.clone();
				new_class.add_field(new_field)
					.with_context(|| anyhow!("failed to reverse field {:?} of class {:?}", field.obf_name(), class.obf_name()))?;
			}

			for method in class.methods() {
				let key = MethodKey {
					name: method.deobf_name().clone(),
					desc: remapper.map_method_desc(method.desc())?,
				};
				let mut new_method = MethodMapping::new(key, swap(method.obf_name(), &method.deobf));
				new_method.comment = method.comment.clone();
				for parameter in method.parameters() {
					new_method.add_parameter(reverse_parameter(parameter))?;
				}
				new_class.add_method(new_method)
					.with_context(|| anyhow!("failed to reverse method {:?} {:?} of class {:?}", method.obf_name(), method.desc(), class.obf_name()))?;
			}
		}

		Ok(reversed)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassName;
	use duke::tree::field::{FieldDescriptor, FieldName};
	use duke::tree::method::{MethodDescriptor, MethodName, ParameterName};
	use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, ParameterMapping, Rename};

	#[test]
	fn descriptors_are_remapped() -> Result<()> {
		let mut set = MappingSet::with_namespaces("official", "named")?;
		let class = set.add_class(&ClassName::try_from("a")?, Rename::Renamed(ClassName::try_from("Foo")?))?;
		class.add_field(FieldMapping::new(
			FieldKey { name: FieldName::try_from("b")?, desc: Some(FieldDescriptor::try_from("[La;")?) },
			Rename::Unchanged,
		))?;
		class.add_method(MethodMapping::new(
			MethodKey { name: MethodName::try_from("c")?, desc: MethodDescriptor::try_from("(La;Lx;)V")? },
			Rename::Renamed(MethodName::try_from("run")?),
		))?;

		let reversed = set.reverse()?;
		let class = reversed.get_class(&ClassName::try_from("Foo")?);

		let field = class.and_then(|class| class.fields().next());
		assert_eq!(field.and_then(|field| field.desc()).map(|desc| desc.as_str()), Some("[LFoo;"));
		assert_eq!(field.map(|field| field.deobf.clone()), Some(Rename::Unchanged));

		let method = class.and_then(|class| class.methods().next());
		assert_eq!(method.map(|method| method.key().clone()), Some(MethodKey {
			name: MethodName::try_from("run")?,
			desc: MethodDescriptor::try_from("(LFoo;Lx;)V")?,
		}));
		assert_eq!(method.map(|method| method.deobf_name().as_str()), Some("c"));
		Ok(())
	}

	#[test]
	fn parameters_reverse_twice() -> Result<()> {
		let mut set = MappingSet::with_namespaces("official", "named")?;
		let class = set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		let method = class.add_method(MethodMapping::new(
			MethodKey { name: MethodName::try_from("c")?, desc: MethodDescriptor::try_from("(IIII)V")? },
			Rename::Unchanged,
		))?;
		method.add_parameter(ParameterMapping::new(0, None, Rename::Renamed(ParameterName::try_from("x")?)))?;
		method.add_parameter(ParameterMapping::new(1, Some(ParameterName::try_from("y")?), Rename::Unchanged))?;
		method.add_parameter(ParameterMapping::new(2, Some(ParameterName::try_from("y")?), Rename::Renamed(ParameterName::try_from("z")?)))?;
		method.add_parameter(ParameterMapping::new(3, None, Rename::Unchanged))?;

		let reversed = set.reverse()?;
		let parameter = reversed.get_class(&ClassName::try_from("a")?)
			.and_then(|class| class.methods().next())
			.and_then(|method| method.get_parameter(0));
		assert_eq!(parameter.and_then(|parameter| parameter.obf.clone()), Some(ParameterName::try_from("x")?));

		assert_eq!(reversed.reverse()?, set);
		Ok(())
	}

	#[test]
	fn nested_classes_keep_their_outer_name() -> Result<()> {
		let mut set = MappingSet::with_namespaces("official", "named")?;
		set.add_class(&ClassName::try_from("a")?, Rename::Renamed(ClassName::try_from("Foo")?))?;
		set.add_class(&ClassName::try_from("a$b")?, Rename::Unchanged)?;
		set.add_class(&ClassName::try_from("a$c")?, Rename::Renamed(ClassName::try_from("Foo$Bar")?))?;

		let reversed = set.reverse()?;
		let names: Vec<_> = reversed.classes()?.into_iter()
			.map(|entry| (entry.obf().as_str().to_owned(), entry.deobf.as_str().to_owned()))
			.collect();
		assert_eq!(names, vec![
			("Foo".to_owned(), "a".to_owned()),
			("Foo$b".to_owned(), "a$b".to_owned()),
			("Foo$Bar".to_owned(), "a$c".to_owned()),
		]);

		assert_eq!(reversed.reverse()?, set);
		Ok(())
	}
}
