use std::rc::Rc;
use anyhow::{anyhow, Context, Result};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use petgraph::unionfind::UnionFind;
use duke::tree::class::ClassName;
use duke::tree::method::MethodName;
use crate::inheritance::{ClassFactProvider, ClassFacts};
use crate::set::{MappingSet, MethodKey, Rename};

/// The classes reachable from the classes of a mapping set by following supertypes, with their facts.
struct Hierarchy {
	classes: IndexMap<ClassName, Rc<ClassFacts>>,
}

impl Hierarchy {
	/// Collects the classes, asking the provider for each class at most once. Unknown classes are left out.
	fn collect(roots: impl IntoIterator<Item=ClassName>, provider: &impl ClassFactProvider) -> Result<Hierarchy> {
		let mut queue: IndexSet<ClassName> = roots.into_iter().collect();
		let mut classes = IndexMap::new();

		let mut index = 0;
		while let Some(class) = queue.get_index(index).cloned() {
			index += 1;

			let Some(facts) = provider.get_class_facts(&class)
				.with_context(|| anyhow!("failed to get the class facts of {class:?}"))? else {
				debug!("class {class:?} is unknown, not looking further up the hierarchy");
				continue;
			};

			queue.extend(facts.supertypes().cloned());
			classes.insert(class, facts);
		}

		Ok(Hierarchy { classes })
	}

	/// Returns all known supertypes of the class, not including the class itself.
	fn ancestors(&self, class: &ClassName) -> IndexSet<&ClassName> {
		let mut ancestors = IndexSet::new();
		let mut queue: Vec<&ClassName> = vec![class];
		while let Some(class) = queue.pop() {
			let Some(facts) = self.classes.get(class) else {
				continue;
			};
			for supertype in facts.supertypes() {
				if self.classes.contains_key(supertype) && ancestors.insert(supertype) {
					queue.push(supertype);
				}
			}
		}
		ancestors
	}
}

impl MappingSet {
	/// Completes the method names along the class hierarchy.
	///
	/// A method overriding another one has to have the same name. This finds all virtual methods that override each
	/// other, and gives the methods of each such group the same name. The name is taken from a renamed method of the
	/// group, preferring the one declared closest to the root of the hierarchy. Methods of the group that are not
	/// renamed in this set get that name, also if they weren't in this set before.
	///
	/// Only classes of this set get new method entries. The hierarchy is resolved through the provider, which must
	/// answer in the obfuscated namespace. The walk up the hierarchy stops at unknown classes.
	pub fn complete(&self, provider: &impl ClassFactProvider) -> Result<MappingSet> {
		let roots: Vec<ClassName> = self.classes()?.into_iter()
			.map(|entry| entry.obf().clone())
			.collect();
		let hierarchy = Hierarchy::collect(roots, provider)?;

		// every virtual method declaration is a node
		let mut nodes: IndexSet<(&ClassName, MethodKey)> = IndexSet::new();
		for (class, facts) in &hierarchy.classes {
			for method in facts.virtual_methods() {
				nodes.insert((class, MethodKey { name: method.name.clone(), desc: method.descriptor.clone() }));
			}
		}

		let depths: Vec<usize> = nodes.iter()
			.map(|(class, _)| hierarchy.ancestors(class).len())
			.collect();

		// all declarations with the same signature seen from one class share a dispatch slot there, this also
		// joins an inherited method with the interface method it implements
		let mut groups = UnionFind::new(nodes.len());
		for class in hierarchy.classes.keys() {
			let mut first_seen: IndexMap<&MethodKey, usize> = IndexMap::new();
			for seen in std::iter::once(class).chain(hierarchy.ancestors(class)) {
				let Some(facts) = hierarchy.classes.get(seen) else {
					continue;
				};
				for method in facts.virtual_methods() {
					let key = MethodKey { name: method.name.clone(), desc: method.descriptor.clone() };
					let Some(index) = nodes.get_index_of(&(seen, key)) else {
						continue;
					};
					let (_, key) = &nodes[index];
					match first_seen.get(key) {
						Some(&first) => {
							groups.union(first, index);
						},
						None => {
							first_seen.insert(key, index);
						},
					}
				}
			}
		}

		// the chosen name of each group, together with the depth of the method it's from
		let mut names: IndexMap<usize, (usize, &MethodName)> = IndexMap::new();
		for (index, (class, key)) in nodes.iter().enumerate() {
			let Some(method) = self.get_class(class).and_then(|c| c.get_method(&key.name, &key.desc)) else {
				continue;
			};
			let Rename::Renamed(name) = &method.deobf else {
				continue;
			};

			let depth = depths[index];
			let group = groups.find(index);
			match names.get(&group).copied() {
				Some((existing_depth, existing)) => {
					if existing != name {
						warn!("conflicting names for method {:?} {:?} in the hierarchy of {class:?}: {existing:?} and {name:?}", key.name, key.desc);
					}
					if depth < existing_depth {
						names.insert(group, (depth, name));
					}
				},
				None => {
					names.insert(group, (depth, name));
				},
			}
		}

		let mut completed = self.clone();
		for (index, (class, key)) in nodes.iter().enumerate() {
			let Some((_, name)) = names.get(&groups.find(index)) else {
				continue;
			};
			let Some(target) = completed.get_class_mut(class) else {
				continue;
			};

			let method = target.get_or_create_method(key.clone());
			if !method.deobf.is_renamed() {
				method.deobf = Rename::Renamed((*name).clone());
			}
		}

		Ok(completed)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::class_constants::access;
	use duke::tree::class::ClassName;
	use duke::tree::method::{MethodDescriptor, MethodHeader, MethodName};
	use crate::inheritance::{ClassFacts, StaticProvider};
	use crate::set::{MappingSet, MethodKey, MethodMapping, Rename};

	fn facts(super_class: &str, interfaces: &[&str], methods: &[(u16, &str)]) -> Result<ClassFacts> {
		Ok(ClassFacts {
			super_class: Some(ClassName::try_from(super_class)?),
			interfaces: interfaces.iter().map(|&i| ClassName::try_from(i)).collect::<Result<_>>()?,
			fields: Vec::new(),
			methods: methods.iter().map(|&(access, name)| -> Result<MethodHeader> {
				Ok(MethodHeader {
					access,
					name: MethodName::try_from(name)?,
					descriptor: MethodDescriptor::try_from("()V")?,
				})
			}).collect::<Result<_>>()?,
		})
	}

	fn deobf(set: &MappingSet, class: &str, method: &str) -> Result<Option<String>> {
		Ok(set.get_class(&ClassName::try_from(class)?)
			.and_then(|class| class.get_method(&MethodName::try_from(method).ok()?, &MethodDescriptor::try_from("()V").ok()?))
			.map(|method| method.deobf_name().as_str().to_owned()))
	}

	fn key(name: &str) -> Result<MethodKey> {
		Ok(MethodKey { name: MethodName::try_from(name)?, desc: MethodDescriptor::try_from("()V")? })
	}

	#[test]
	fn private_and_static_methods_are_not_joined() -> Result<()> {
		let mut provider = StaticProvider::new();
		provider.add(ClassName::try_from("a")?, facts("java/lang/Object", &[], &[(access::PRIVATE, "m"), (access::STATIC, "s")])?);
		provider.add(ClassName::try_from("b")?, facts("a", &[], &[(access::PUBLIC, "m"), (access::PUBLIC, "s")])?);

		let mut set = MappingSet::with_namespaces("official", "named")?;
		let a = set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		a.add_method(MethodMapping::new(key("m")?, Rename::Renamed(MethodName::try_from("secret")?)))?;
		a.add_method(MethodMapping::new(key("s")?, Rename::Renamed(MethodName::try_from("create")?)))?;
		set.add_class(&ClassName::try_from("b")?, Rename::Unchanged)?;

		let completed = set.complete(&provider)?;
		assert_eq!(deobf(&completed, "b", "m")?, None);
		assert_eq!(deobf(&completed, "b", "s")?, None);
		Ok(())
	}

	#[test]
	fn interfaces_join_unrelated_classes() -> Result<()> {
		// c extends a implements i, and only i's method is named
		let mut provider = StaticProvider::new();
		provider.add(ClassName::try_from("a")?, facts("java/lang/Object", &[], &[(access::PUBLIC, "m")])?);
		provider.add(ClassName::try_from("i")?, facts("java/lang/Object", &[], &[(access::PUBLIC | access::ABSTRACT, "m")])?);
		provider.add(ClassName::try_from("c")?, facts("a", &["i"], &[(access::PUBLIC, "m")])?);

		let mut set = MappingSet::with_namespaces("official", "named")?;
		set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		let i = set.add_class(&ClassName::try_from("i")?, Rename::Renamed(ClassName::try_from("Runnable")?))?;
		i.add_method(MethodMapping::new(key("m")?, Rename::Renamed(MethodName::try_from("run")?)))?;
		set.add_class(&ClassName::try_from("c")?, Rename::Unchanged)?;

		let completed = set.complete(&provider)?;
		assert_eq!(deobf(&completed, "a", "m")?, Some("run".to_owned()));
		assert_eq!(deobf(&completed, "c", "m")?, Some("run".to_owned()));
		Ok(())
	}

	#[test]
	fn inherited_method_implements_interface() -> Result<()> {
		// c extends a implements i, and c doesn't declare m itself, so a.m implements i.m in c
		let mut provider = StaticProvider::new();
		provider.add(ClassName::try_from("a")?, facts("java/lang/Object", &[], &[(access::PUBLIC, "m")])?);
		provider.add(ClassName::try_from("i")?, facts("java/lang/Object", &[], &[(access::PUBLIC | access::ABSTRACT, "m")])?);
		provider.add(ClassName::try_from("c")?, facts("a", &["i"], &[])?);

		let mut set = MappingSet::with_namespaces("official", "named")?;
		set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		let i = set.add_class(&ClassName::try_from("i")?, Rename::Renamed(ClassName::try_from("Runnable")?))?;
		i.add_method(MethodMapping::new(key("m")?, Rename::Renamed(MethodName::try_from("run")?)))?;
		set.add_class(&ClassName::try_from("c")?, Rename::Unchanged)?;

		let completed = set.complete(&provider)?;
		assert_eq!(deobf(&completed, "a", "m")?, Some("run".to_owned()));
		assert_eq!(deobf(&completed, "c", "m")?, None);
		Ok(())
	}

	#[test]
	fn explicit_names_are_kept() -> Result<()> {
		let mut provider = StaticProvider::new();
		provider.add(ClassName::try_from("a")?, facts("java/lang/Object", &[], &[(access::PUBLIC, "m")])?);
		provider.add(ClassName::try_from("b")?, facts("a", &[], &[(access::PUBLIC, "m")])?);

		let mut set = MappingSet::with_namespaces("official", "named")?;
		let a = set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
		a.add_method(MethodMapping::new(key("m")?, Rename::Renamed(MethodName::try_from("foo")?)))?;
		let b = set.add_class(&ClassName::try_from("b")?, Rename::Unchanged)?;
		b.add_method(MethodMapping::new(key("m")?, Rename::Renamed(MethodName::try_from("bar")?)))?;

		let completed = set.complete(&provider)?;
		assert_eq!(deobf(&completed, "a", "m")?, Some("foo".to_owned()));
		assert_eq!(deobf(&completed, "b", "m")?, Some("bar".to_owned()));
		Ok(())
	}
}
