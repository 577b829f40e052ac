//! Matches between two versions of the same program, as written by a class matcher.
//!
//! A match file lists which class, field and method of the old version corresponds to which one of the new version:
//! ```text
//! c	La;	Lb;
//! 	m	c(La;)V	d(Lb;)V
//! 	f	e;;I	f;;I
//! ```
//! Class names can be given as `Lname;` or `"name"`. Methods are split at their first `(`, fields at `;;`.
//!
//! The reader is lenient: lines it can't understand are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use duke::tree::class::ClassName;
use duke::tree::field::{FieldDescriptor, FieldName};
use duke::tree::method::{MethodDescriptor, MethodName};
use crate::remapper::ARemapper;
use crate::set::{FieldKey, FieldMapping, MappingSet, MethodKey, MethodMapping, Rename};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
	pub old_name: FieldName,
	pub old_desc: FieldDescriptor,
	pub new_name: FieldName,
	pub new_desc: FieldDescriptor,
}

impl FieldMatch {
	fn reverse(&self) -> FieldMatch {
		FieldMatch {
			old_name: self.new_name.clone(),
			old_desc: self.new_desc.clone(),
			new_name: self.old_name.clone(),
			new_desc: self.old_desc.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMatch {
	pub old_name: MethodName,
	pub old_desc: MethodDescriptor,
	pub new_name: MethodName,
	pub new_desc: MethodDescriptor,
}

impl MethodMatch {
	fn reverse(&self) -> MethodMatch {
		MethodMatch {
			old_name: self.new_name.clone(),
			old_desc: self.new_desc.clone(),
			new_name: self.old_name.clone(),
			new_desc: self.old_desc.clone(),
		}
	}
}

/// The match of a class, together with the matches of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch {
	pub old: ClassName,
	pub new: ClassName,
	pub fields: Vec<FieldMatch>,
	pub methods: Vec<MethodMatch>,
}

impl ClassMatch {
	pub fn new(old: ClassName, new: ClassName) -> ClassMatch {
		ClassMatch { old, new, fields: Vec::new(), methods: Vec::new() }
	}
}

/// The matches from an old to a new version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Match {
	pub classes: Vec<ClassMatch>,
}

/// Removes the `L` and `;`, or the quotes around a class name.
fn unwrap_class_name(name: &str) -> Result<ClassName> {
	let inner = name.strip_prefix('L').and_then(|x| x.strip_suffix(';'))
		.or_else(|| name.strip_prefix('"').and_then(|x| x.strip_suffix('"')))
		.unwrap_or(name);
	ClassName::try_from(inner)
}

fn split_method(method: &str) -> Result<(MethodName, MethodDescriptor)> {
	let index = method.find('(')
		.with_context(|| anyhow!("method {method:?} has no descriptor"))?;
	let (name, desc) = method.split_at(index);
	Ok((MethodName::try_from(name)?, MethodDescriptor::try_from(desc)?))
}

fn split_field(field: &str) -> Result<(FieldName, FieldDescriptor)> {
	let (name, desc) = field.split_once(";;")
		.with_context(|| anyhow!("field {field:?} has no descriptor"))?;
	Ok((FieldName::try_from(name)?, FieldDescriptor::try_from(desc)?))
}

fn get<'a>(parts: &[&'a str], index: usize) -> Result<&'a str> {
	parts.get(index).copied()
		.with_context(|| anyhow!("expected at least {} fields, got {}", index + 1, parts.len()))
}

fn parse_class_line(parts: &[&str]) -> Result<ClassMatch> {
	Ok(ClassMatch::new(unwrap_class_name(get(parts, 1)?)?, unwrap_class_name(get(parts, 2)?)?))
}

fn parse_method_line(parts: &[&str]) -> Result<MethodMatch> {
	let (old_name, old_desc) = split_method(get(parts, 2)?)?;
	let (new_name, new_desc) = split_method(get(parts, 3)?)?;
	Ok(MethodMatch { old_name, old_desc, new_name, new_desc })
}

fn parse_field_line(parts: &[&str]) -> Result<FieldMatch> {
	let (old_name, old_desc) = split_field(get(parts, 2)?)?;
	let (new_name, new_desc) = split_field(get(parts, 3)?)?;
	Ok(FieldMatch { old_name, old_desc, new_name, new_desc })
}

impl Match {
	/// Reads a match file, by opening the file given by the path.
	pub fn read_file(path: impl AsRef<Path>) -> Result<Match> {
		let file = File::open(&path)
			.with_context(|| anyhow!("failed to open match file {:?}", path.as_ref()))?;
		Match::read(file)
			.with_context(|| anyhow!("failed to read match file {:?}", path.as_ref()))
	}

	#[allow(clippy::tabs_in_doc_comments)]
	/// Reads a match file.
	///
	/// Lines without a tab, members without a class line before them, lines that fail to parse, and lines indented
	/// deeper than members are skipped.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use quill::matches::Match;
	///
	/// let input = "\
	/// Matches saved by some tool
	/// c	La;	Lb;
	/// 	m	c(La;)V	d(Lb;)V
	/// 		ma	0	0
	/// 	f	e;;I	f;;I
	/// c	\"g\"	\"h\"
	/// ";
	/// let matches = Match::read(input.as_bytes()).unwrap();
	///
	/// assert_eq!(matches.classes.len(), 2);
	/// assert_eq!(matches.classes[0].new.as_str(), "b");
	/// assert_eq!(matches.classes[0].methods[0].new_desc.as_str(), "(Lb;)V");
	/// assert_eq!(matches.classes[0].fields[0].old_name.as_str(), "e");
	/// assert_eq!(matches.classes[1].old.as_str(), "g");
	/// ```
	pub fn read(reader: impl Read) -> Result<Match> {
		let mut classes = Vec::new();
		let mut current: Option<ClassMatch> = None;

		for (line_number, line) in BufReader::new(reader).lines().enumerate() {
			let line = line?;
			let line_number = line_number + 1;

			if !line.contains('\t') {
				continue;
			}
			let parts: Vec<&str> = line.split('\t').collect();

			let result = if line.starts_with("c\t") {
				classes.extend(current.take());
				parse_class_line(&parts).map(|class| current = Some(class))
			} else if line.starts_with("\tm\t") {
				match current.as_mut() {
					Some(class) => parse_method_line(&parts).map(|method| class.methods.push(method)),
					None => {
						debug!("skipping method line {line_number} without class: {line:?}");
						Ok(())
					},
				}
			} else if line.starts_with("\tf\t") {
				match current.as_mut() {
					Some(class) => parse_field_line(&parts).map(|field| class.fields.push(field)),
					None => {
						debug!("skipping field line {line_number} without class: {line:?}");
						Ok(())
					},
				}
			} else {
				Ok(())
			};

			if let Err(e) = result {
				debug!("skipping malformed line {line_number} {line:?}: {e:#}");
			}
		}
		classes.extend(current);

		Ok(Match { classes })
	}

	/// Creates matches from the obfuscated to the deobfuscated names of a mapping set.
	///
	/// Fields without a descriptor are left out.
	pub fn from_set(set: &MappingSet) -> Result<Match> {
		let remapper = set.remapper()?;

		let mut classes = Vec::new();
		for entry in set.classes()? {
			let mut class = ClassMatch::new(entry.obf().clone(), entry.deobf.clone());

			for field in entry.mapping.fields() {
				let Some(desc) = field.desc() else {
					continue;
				};
				class.fields.push(FieldMatch {
					old_name: field.obf_name().clone(),
					old_desc: desc.clone(),
					new_name: field.deobf_name().clone(),
					new_desc: remapper.map_field_desc(desc)?,
				});
			}

			for method in entry.mapping.methods() {
				class.methods.push(MethodMatch {
					old_name: method.obf_name().clone(),
					old_desc: method.desc().clone(),
					new_name: method.deobf_name().clone(),
					new_desc: remapper.map_method_desc(method.desc())?,
				});
			}

			classes.push(class);
		}

		Ok(Match { classes })
	}

	/// Chains two matches together.
	///
	/// If `self` matches from `A` to `B`, and `other` matches from `B` to `C`, the result matches from `A` to `C`.
	/// Classes, fields and methods are only kept if they're matched in both.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use quill::matches::{ClassMatch, Match};
	///
	/// let name = |s: &str| ClassName::try_from(s).unwrap();
	/// let a = Match { classes: vec![ClassMatch::new(name("A"), name("B"))] };
	/// let b = Match { classes: vec![ClassMatch::new(name("B"), name("C")), ClassMatch::new(name("X"), name("Y"))] };
	///
	/// assert_eq!(a.chain(&b), Match { classes: vec![ClassMatch::new(name("A"), name("C"))] });
	/// ```
	pub fn chain(&self, other: &Match) -> Match {
		let mut by_old: IndexMap<&ClassName, &ClassMatch> = IndexMap::new();
		for class in &other.classes {
			by_old.entry(&class.old).or_insert(class);
		}

		let mut classes = Vec::new();
		for a in &self.classes {
			let Some(b) = by_old.get(&a.new) else {
				continue;
			};

			let mut class = ClassMatch::new(a.old.clone(), b.new.clone());

			for a_field in &a.fields {
				let b_field = b.fields.iter()
					.find(|b_field| b_field.old_name == a_field.new_name && b_field.old_desc == a_field.new_desc);
				if let Some(b_field) = b_field {
					class.fields.push(FieldMatch {
						old_name: a_field.old_name.clone(),
						old_desc: a_field.old_desc.clone(),
						new_name: b_field.new_name.clone(),
						new_desc: b_field.new_desc.clone(),
					});
				}
			}

			for a_method in &a.methods {
				let b_method = b.methods.iter()
					.find(|b_method| b_method.old_name == a_method.new_name && b_method.old_desc == a_method.new_desc);
				if let Some(b_method) = b_method {
					class.methods.push(MethodMatch {
						old_name: a_method.old_name.clone(),
						old_desc: a_method.old_desc.clone(),
						new_name: b_method.new_name.clone(),
						new_desc: b_method.new_desc.clone(),
					});
				}
			}

			classes.push(class);
		}

		Match { classes }
	}

	/// Swaps the old and new side of every match.
	pub fn reverse(&self) -> Match {
		Match {
			classes: self.classes.iter()
				.map(|class| ClassMatch {
					old: class.new.clone(),
					new: class.old.clone(),
					fields: class.fields.iter().map(FieldMatch::reverse).collect(),
					methods: class.methods.iter().map(MethodMatch::reverse).collect(),
				})
				.collect(),
		}
	}

	/// Moves mappings of the old version onto the new version.
	///
	/// The mapping set must have the names of the old version as its obfuscated names. The result has the names of
	/// the new version as its obfuscated names, and keeps the deobfuscated names, comments and parameters. Entities
	/// without a match are dropped.
	pub fn update_mappings(&self, set: &MappingSet) -> Result<MappingSet> {
		let mut updated = MappingSet::new(set.namespaces.clone());

		for class_match in &self.classes {
			let Some(old_class) = set.get_class(&class_match.old) else {
				continue;
			};
			let deobf = set.get_class_deobf_name(&class_match.old)?
				.with_context(|| anyhow!("class {:?} vanished during lookup", class_match.old))?;

			let class = updated.get_or_create_class(&class_match.new)?;
			class.deobf = Rename::Renamed(deobf);
			if old_class.comment.is_some() {
				class.comment = old_class.comment.clone();
			}

			for field_match in &class_match.fields {
				let Some(old_field) = old_class.get_field(&field_match.old_name, Some(&field_match.old_desc)) else {
					continue;
				};

				let key = FieldKey { name: field_match.new_name.clone(), desc: Some(field_match.new_desc.clone()) };
				let mut field = FieldMapping::new(key, Rename::Renamed(old_field.deobf_name().clone()));
				field.comment = old_field.comment.clone();
				if let Err(e) = class.add_field(field) {
					warn!("skipping field match {field_match:?} in class {:?}: {e:#}", class_match.new);
				}
			}

			for method_match in &class_match.methods {
				let Some(old_method) = old_class.get_method(&method_match.old_name, &method_match.old_desc) else {
					continue;
				};

				let key = MethodKey { name: method_match.new_name.clone(), desc: method_match.new_desc.clone() };
				let deobf = if old_method.obf_name().is_special() {
					Rename::Unchanged
				} else {
					Rename::Renamed(old_method.deobf_name().clone())
				};
				let mut method = MethodMapping::new(key, deobf);
				method.comment = old_method.comment.clone();
				for parameter in old_method.parameters() {
					method.add_parameter(parameter.clone())?;
				}
				if let Err(e) = class.add_method(method) {
					warn!("skipping method match {method_match:?} in class {:?}: {e:#}", class_match.new);
				}
			}
		}

		Ok(updated)
	}
}

/// Chains a list of matches, from the first old version to the last new version.
pub fn chain_all(matches: impl IntoIterator<Item=Match>) -> Result<Match> {
	let mut matches = matches.into_iter();
	let Some(first) = matches.next() else {
		bail!("cannot chain an empty list of matches");
	};
	Ok(matches.fold(first, |chained, next| chained.chain(&next)))
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::matches::Match;

	#[test]
	fn members_without_class_are_skipped() -> Result<()> {
		let input = "\tm\ta()V\tb()V\nc\tLa;\tLb;\n\tf\tc;;I\td;;I\n";
		let matches = Match::read(input.as_bytes())?;

		assert_eq!(matches.classes.len(), 1);
		assert_eq!(matches.classes[0].methods.len(), 0);
		assert_eq!(matches.classes[0].fields.len(), 1);
		Ok(())
	}

	#[test]
	fn malformed_lines_are_skipped() -> Result<()> {
		let input = "c\tLa;\tLb;\n\tm\tnoDescriptor\tb()V\n\tf\tc\td;;I\n\tm\ta(I)V\n\tm\ta(I)V\tb(I)V\n";
		let matches = Match::read(input.as_bytes())?;

		assert_eq!(matches.classes[0].fields.len(), 0);
		assert_eq!(matches.classes[0].methods.len(), 1);
		assert_eq!(matches.classes[0].methods[0].new_name.as_str(), "b");
		Ok(())
	}

	#[test]
	fn members_of_malformed_class_are_skipped() -> Result<()> {
		let input = "c\tLa;\tLb;\n\tf\tc;;I\td;;I\nc\tLe;\n\tm\tf()V\tg()V\nc\tLh;\tLi;\n\tm\tj()V\tk()V\n";
		let matches = Match::read(input.as_bytes())?;

		let classes: Vec<_> = matches.classes.iter()
			.map(|class| (class.old.as_str(), class.fields.len(), class.methods.len()))
			.collect();
		assert_eq!(classes, vec![("a", 1, 0), ("h", 0, 1)]);
		Ok(())
	}

	#[test]
	fn reverse_swaps_descriptors() -> Result<()> {
		let input = "c\tLa;\tLb;\n\tm\tc(La;)V\td(Lb;)V\n";
		let matches = Match::read(input.as_bytes())?;

		let reversed = matches.reverse();
		let method = &reversed.classes[0].methods[0];
		assert_eq!(method.old_desc.as_str(), "(Lb;)V");
		assert_eq!(method.new_desc.as_str(), "(La;)V");
		assert_eq!(reversed.reverse(), matches);
		Ok(())
	}

	#[test]
	fn chain_empty_list() {
		assert!(super::chain_all(Vec::new()).is_err());
	}
}
