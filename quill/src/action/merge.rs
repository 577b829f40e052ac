use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use crate::remapper::ARemapper;
use crate::set::{ClassMapping, FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, ParameterMapping, Rename};

/// Joins the names of an entity of both sets: if any of them renames it, the result is renamed to the name of the
/// second set.
fn join<T: Clone>(a: &Rename<T>, b: &Rename<T>, b_deobf: &T) -> Rename<T> {
	if a.is_renamed() || b.is_renamed() {
		Rename::Renamed(b_deobf.clone())
	} else {
		Rename::Unchanged
	}
}

/// Joins the parameters of a method of both sets. The names of the second set win.
fn merge_parameters(a: &MethodMapping, b: Option<&MethodMapping>, target: &mut MethodMapping) -> Result<()> {
	let mut ordinals: Vec<usize> = a.parameters().map(|parameter| parameter.ordinal()).collect();
	for parameter in b.into_iter().flat_map(|b| b.parameters()) {
		if !ordinals.contains(&parameter.ordinal()) {
			ordinals.push(parameter.ordinal());
		}
	}

	for ordinal in ordinals {
		let a_parameter = a.get_parameter(ordinal);
		let b_parameter = b.and_then(|b| b.get_parameter(ordinal));

		let name = b_parameter.and_then(|p| p.deobf_name())
			.or_else(|| a_parameter.and_then(|p| p.deobf_name()));
		let obf = a_parameter.and_then(|p| p.obf.clone());

		let mut parameter = ParameterMapping::new(ordinal, obf, Rename::from(name.cloned()));
		parameter.comment = b_parameter.and_then(|p| p.comment.clone())
			.or_else(|| a_parameter.and_then(|p| p.comment.clone()));
		target.add_parameter(parameter)?;
	}
	Ok(())
}

impl MappingSet {
	/// Merges two sets through their shared namespace.
	///
	/// If `self` maps from `X` to `Y`, and `other` maps from `Y` to `Z`, the result maps from `X` to `Z`.
	///
	/// Only entities present in both sets end up in the result. Classes missing in `other` are dropped, members missing
	/// in `other` are dropped with a warning. Constructors and static initializers keep their name without needing an
	/// entry in `other`. For parameters, the names of `other` win.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use quill::set::{MappingSet, Rename};
	///
	/// let mut a = MappingSet::with_namespaces("official", "intermediary").unwrap();
	/// a.add_class(&ClassName::try_from("a").unwrap(), Rename::Renamed(ClassName::try_from("C_1").unwrap())).unwrap();
	/// a.add_class(&ClassName::try_from("b").unwrap(), Rename::Renamed(ClassName::try_from("C_2").unwrap())).unwrap();
	///
	/// let mut b = MappingSet::with_namespaces("intermediary", "named").unwrap();
	/// b.add_class(&ClassName::try_from("C_1").unwrap(), Rename::Renamed(ClassName::try_from("Foo").unwrap())).unwrap();
	///
	/// let merged = a.merge(&b).unwrap();
	/// assert_eq!(merged.class_count(), 1);
	/// let class = merged.get_class(&ClassName::try_from("a").unwrap()).unwrap();
	/// assert_eq!(class.deobf_name().as_str(), "Foo");
	/// ```
	pub fn merge(&self, other: &MappingSet) -> Result<MappingSet> {
		if self.namespaces.to_name() != other.namespaces.from_name() {
			bail!(
				"cannot merge mappings {:?} with mappings {:?}: namespace {:?} doesn't match {:?}",
				self.namespaces, other.namespaces, self.namespaces.to_name(), other.namespaces.from_name()
			);
		}

		let remapper = self.remapper()?;
		let reverse_remapper = remapper.reversed();

		let mut merged = MappingSet::with_namespaces(self.namespaces.from_name(), other.namespaces.to_name())?;

		for entry in self.classes()? {
			let a_class = entry.mapping;
			let Some(b_class) = other.get_class(&entry.deobf) else {
				debug!("dropping class {:?} ({:?}), as it's missing in {:?}", a_class.obf_name(), entry.deobf, other.namespaces);
				continue;
			};
			let b_deobf = other.get_class_deobf_name(&entry.deobf)?
				.with_context(|| anyhow!("class {:?} vanished during lookup", entry.deobf))?;

			let class = merged.add_class(a_class.obf_name(), join(&a_class.deobf, &b_class.deobf, &b_deobf))?;
			class.comment = b_class.comment.clone().or_else(|| a_class.comment.clone());

			merge_fields(a_class, b_class, class, &remapper, &reverse_remapper)
				.with_context(|| anyhow!("failed to merge fields of class {:?}", a_class.obf_name()))?;
			merge_methods(a_class, b_class, class, &remapper)
				.with_context(|| anyhow!("failed to merge methods of class {:?}", a_class.obf_name()))?;
		}

		Ok(merged)
	}
}

fn merge_fields(
	a_class: &ClassMapping,
	b_class: &ClassMapping,
	target: &mut ClassMapping,
	remapper: &impl ARemapper,
	reverse_remapper: &impl ARemapper,
) -> Result<()> {
	for a_field in a_class.fields() {
		let desc = a_field.desc().map(|desc| remapper.map_field_desc(desc)).transpose()?;
		let Some(b_field) = b_class.get_field(a_field.deobf_name(), desc.as_ref()) else {
			warn!("no bridge found for field {:?} {:?} ({:?}) of class {:?}",
				a_field.obf_name(), a_field.desc(), a_field.deobf_name(), a_class.obf_name());
			continue;
		};

		// a field without a descriptor gets the one from the other side
		let desc = match a_field.desc() {
			Some(desc) => Some(desc.clone()),
			None => b_field.desc().map(|desc| reverse_remapper.map_field_desc(desc)).transpose()?,
		};
		let key = FieldKey { name: a_field.obf_name().clone(), desc };

		let mut field = FieldMapping::new(key, join(&a_field.deobf, &b_field.deobf, b_field.deobf_name()));
		field.comment = b_field.comment.clone().or_else(|| a_field.comment.clone());
		target.add_field(field)?;
	}
	Ok(())
}

fn merge_methods(a_class: &ClassMapping, b_class: &ClassMapping, target: &mut ClassMapping, remapper: &impl ARemapper) -> Result<()> {
	for a_method in a_class.methods() {
		let desc = remapper.map_method_desc(a_method.desc())?;
		let b_method = b_class.get_method(a_method.deobf_name(), &desc);

		let key = MethodKey { name: a_method.obf_name().clone(), desc: a_method.desc().clone() };
		let mut method = if a_method.obf_name().is_special() {
			MethodMapping::new(key, Rename::Unchanged)
		} else if let Some(b_method) = b_method {
			MethodMapping::new(key, join(&a_method.deobf, &b_method.deobf, b_method.deobf_name()))
		} else {
			warn!("no bridge found for method {:?} {:?} ({:?}) of class {:?}",
				a_method.obf_name(), a_method.desc(), a_method.deobf_name(), a_class.obf_name());
			continue;
		};

		method.comment = b_method.and_then(|b| b.comment.clone()).or_else(|| a_method.comment.clone());
		merge_parameters(a_method, b_method, &mut method)?;
		target.add_method(method)?;
	}
	Ok(())
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassName;
	use duke::tree::field::{FieldDescriptor, FieldName};
	use duke::tree::method::{MethodDescriptor, MethodName, ParameterName};
	use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, ParameterMapping, Rename};

	fn method_key(name: &str, desc: &str) -> Result<MethodKey> {
		Ok(MethodKey { name: MethodName::try_from(name)?, desc: MethodDescriptor::try_from(desc)? })
	}

	#[test]
	fn namespaces_must_line_up() -> Result<()> {
		let a = MappingSet::with_namespaces("official", "intermediary")?;
		let b = MappingSet::with_namespaces("named", "official")?;
		assert!(a.merge(&b).is_err());
		Ok(())
	}

	#[test]
	fn missing_members_are_dropped() -> Result<()> {
		let mut a = MappingSet::with_namespaces("official", "srg")?;
		let class = a.add_class(&ClassName::try_from("a")?, Rename::Renamed(ClassName::try_from("C_1")?))?;
		class.add_method(MethodMapping::new(method_key("b", "(La;)V")?, Rename::Renamed(MethodName::try_from("func_1")?)))?;
		class.add_method(MethodMapping::new(method_key("c", "()V")?, Rename::Renamed(MethodName::try_from("func_2")?)))?;
		class.add_method(MethodMapping::new(method_key("<init>", "(La;)V")?, Rename::Unchanged))?;

		let mut b = MappingSet::with_namespaces("srg", "named")?;
		let class = b.add_class(&ClassName::try_from("C_1")?, Rename::Renamed(ClassName::try_from("Foo")?))?;
		class.add_method(MethodMapping::new(method_key("func_1", "(LC_1;)V")?, Rename::Renamed(MethodName::try_from("tick")?)))?;

		let merged = a.merge(&b)?;
		let class = merged.get_class(&ClassName::try_from("a")?);

		let names: Vec<_> = class.into_iter()
			.flat_map(|class| class.methods())
			.map(|method| (method.obf_name().as_str().to_owned(), method.deobf_name().as_str().to_owned()))
			.collect();
		assert_eq!(names, vec![
			("b".to_owned(), "tick".to_owned()),
			("<init>".to_owned(), "<init>".to_owned()),
		]);
		Ok(())
	}

	#[test]
	fn name_only_fields_get_descriptors() -> Result<()> {
		let mut a = MappingSet::with_namespaces("official", "srg")?;
		let class = a.add_class(&ClassName::try_from("a")?, Rename::Renamed(ClassName::try_from("C_1")?))?;
		class.add_field(FieldMapping::new(
			FieldKey { name: FieldName::try_from("b")?, desc: None },
			Rename::Renamed(FieldName::try_from("field_1")?),
		))?;

		let mut b = MappingSet::with_namespaces("srg", "named")?;
		let class = b.add_class(&ClassName::try_from("C_1")?, Rename::Unchanged)?;
		class.add_field(FieldMapping::new(
			FieldKey { name: FieldName::try_from("field_1")?, desc: Some(FieldDescriptor::try_from("LC_1;")?) },
			Rename::Renamed(FieldName::try_from("parent")?),
		))?;

		let merged = a.merge(&b)?;
		let field = merged.get_class(&ClassName::try_from("a")?)
			.and_then(|class| class.fields().next());
		assert_eq!(field.map(|field| field.key().clone()), Some(FieldKey {
			name: FieldName::try_from("b")?,
			desc: Some(FieldDescriptor::try_from("La;")?),
		}));
		assert_eq!(field.map(|field| field.deobf_name().as_str()), Some("parent"));
		Ok(())
	}

	#[test]
	fn parameter_names_of_the_second_set_win() -> Result<()> {
		let mut a = MappingSet::with_namespaces("official", "srg")?;
		let class = a.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		let method = class.add_method(MethodMapping::new(method_key("b", "(II)V")?, Rename::Unchanged))?;
		method.add_parameter(ParameterMapping::new(0, None, Rename::Renamed(ParameterName::try_from("p_0")?)))?;
		method.add_parameter(ParameterMapping::new(1, None, Rename::Renamed(ParameterName::try_from("p_1")?)))?;

		let mut b = MappingSet::with_namespaces("srg", "named")?;
		let class = b.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		let method = class.add_method(MethodMapping::new(method_key("b", "(II)V")?, Rename::Unchanged))?;
		method.add_parameter(ParameterMapping::new(1, None, Rename::Renamed(ParameterName::try_from("height")?)))?;

		let merged = a.merge(&b)?;
		let method = merged.get_class(&ClassName::try_from("a")?)
			.and_then(|class| class.methods().next());
		let names: Vec<_> = method.into_iter()
			.flat_map(|method| method.parameters())
			.map(|parameter| parameter.deobf_name().map(|name| name.as_str().to_owned()))
			.collect();
		assert_eq!(names, vec![Some("p_0".to_owned()), Some("height".to_owned())]);
		Ok(())
	}
}
