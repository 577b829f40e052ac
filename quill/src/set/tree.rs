use anyhow::{anyhow, Context, Result};
use log::warn;
use crate::remapper::ARemapper;
use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, ParameterMapping, Rename};
use crate::tree::mappings::{JavadocMapping, Mappings};
use crate::tree::names::Namespace;

fn comment(javadoc: &Option<JavadocMapping>) -> Option<String> {
	javadoc.as_ref().map(|javadoc| javadoc.0.clone())
}

impl MappingSet {
	/// Creates a mapping set from two namespaces of a namespace tree.
	///
	/// Entries without a name in the `from` namespace are skipped. Entries without a name in the `to` namespace are
	/// [not renamed][Rename::Unchanged].
	///
	/// The local variable indices of the parameters are converted into ordinals. Parameters with an index pointing
	/// into the middle of a `long` or `double` parameter are skipped with a warning.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use quill::set::MappingSet;
	/// use quill::tree::mappings::Mappings;
	///
	/// let tiny = "tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\tC_1\tFoo\nc\tb\tC_2\t\n";
	/// let tree: Mappings<3> = quill::tiny_v2::read(tiny.as_bytes()).unwrap();
	///
	/// let set = MappingSet::from_tree(&tree, "intermediary", "named").unwrap();
	///
	/// let c_1 = set.get_class(&ClassName::try_from("C_1").unwrap()).unwrap();
	/// assert_eq!(c_1.deobf_name().as_str(), "Foo");
	/// let c_2 = set.get_class(&ClassName::try_from("C_2").unwrap()).unwrap();
	/// assert_eq!(c_2.deobf_name().as_str(), "C_2");
	/// ```
	pub fn from_tree<const N: usize>(tree: &Mappings<N>, from: &str, to: &str) -> Result<MappingSet> {
		let namespaces = &tree.info.namespaces;
		let from_ns = namespaces.get_namespace(from)?;
		let to_ns = namespaces.get_namespace(to)?;

		// descriptors are given in the first namespace of the tree
		let remapper = tree.remapper_a(Namespace::new(0)?, from_ns)?;

		let mut set = MappingSet::with_namespaces(from, to)?;

		for class in tree.classes.values() {
			let Some(obf) = &class.info.names[from_ns] else {
				continue;
			};
			let deobf = Rename::from(class.info.names[to_ns].clone());

			let class_mapping = set.add_class(obf, deobf)?;
			class_mapping.comment = comment(&class.javadoc);

			for field in class.fields.values() {
				let Some(name) = &field.info.names[from_ns] else {
					continue;
				};
				let key = FieldKey {
					name: name.clone(),
					desc: Some(remapper.map_field_desc(&field.info.desc)?),
				};

				let mut field_mapping = FieldMapping::new(key, field.info.names[to_ns].clone().into());
				field_mapping.comment = comment(&field.javadoc);
				class_mapping.add_field(field_mapping)?;
			}

			for method in class.methods.values() {
				let Some(name) = &method.info.names[from_ns] else {
					continue;
				};
				let key = MethodKey {
					name: name.clone(),
					desc: remapper.map_method_desc(&method.info.desc)?,
				};

				let mut method_mapping = MethodMapping::new(key, method.info.names[to_ns].clone().into());
				method_mapping.comment = comment(&method.javadoc);

				let parsed = method.info.desc.parse()
					.with_context(|| anyhow!("for method {name:?} in class {obf:?}"))?;

				for parameter in method.parameters.values() {
					let ordinal = match parsed.slot_to_ordinal(parameter.info.index) {
						Ok(ordinal) => ordinal,
						Err(e) => {
							warn!("skipping parameter of method {name:?} {:?} in class {obf:?}: {e:#}", method.info.desc);
							continue;
						},
					};

					let mut parameter_mapping = ParameterMapping::new(
						ordinal,
						parameter.info.names[from_ns].clone(),
						parameter.info.names[to_ns].clone().into(),
					);
					parameter_mapping.comment = comment(&parameter.javadoc);
					method_mapping.add_parameter(parameter_mapping)?;
				}

				class_mapping.add_method(method_mapping)?;
			}
		}

		Ok(set)
	}
}
