use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use duke::tree::method::{MethodDescriptor, MethodName};
use quill::set::{MappingSet, MethodKey, MethodMapping, Rename};
use quill::tree::mappings::Mappings;

fn read(input: &str, from: &str, to: &str) -> Result<MappingSet> {
	let tree: Mappings<2> = quill::tiny_v2::read(input.as_bytes())?;
	MappingSet::from_tree(&tree, from, to)
}

#[test]
fn merge_chain() -> Result<()> {
	let a = read(include_str!("chain_official.tiny"), "official", "intermediary")?;
	let b = read(include_str!("chain_intermediary.tiny"), "intermediary", "srg")?;
	let c = read(include_str!("chain_srg.tiny"), "srg", "named")?;
	let expected = include_str!("chain_output.tiny");

	let left = a.merge(&b)?.merge(&c)?;
	let right = a.merge(&b.merge(&c)?)?;

	assert_eq!(quill::tiny_v2::write_set_string(&left)?, expected, "left: actual, right: expected");
	assert_eq!(quill::tiny_v2::write_set_string(&right)?, expected, "left: actual, right: expected");
	Ok(())
}

#[test]
fn merge_with_reversed() -> Result<()> {
	let a = read(include_str!("chain_official.tiny"), "official", "intermediary")?;

	// merging with the own reverse maps every kept name to itself
	let identity = a.merge(&a.reverse()?)?;
	for class in identity.classes()? {
		assert_eq!(&class.deobf, class.obf());
		for method in class.mapping.methods() {
			assert_eq!(method.deobf_name(), method.obf_name());
		}
	}
	Ok(())
}

#[test]
fn identity_default() -> Result<()> {
	let mut set = MappingSet::with_namespaces("official", "named")?;
	let class = set.add_class(&ClassName::try_from("a")?, Rename::Unchanged)?;
	let key = MethodKey { name: MethodName::try_from("b")?, desc: MethodDescriptor::try_from("()V")? };
	class.add_method(MethodMapping::new(key, Rename::Unchanged))?;
	set.add_class(&ClassName::try_from("a$c")?, Rename::Unchanged)?;

	let actual = quill::tiny_v2::write_set_string(&set)?;
	let expected = "\
tiny	2	0	official	named
c	a	a
	m	()V	b	b
c	a$c	a$c
";
	assert_eq!(actual, expected, "left: actual, right: expected");

	// and the same when the name column is empty
	let input = "tiny\t2\t0\tofficial\tnamed\nc\ta\t\n\tm\t()V\tb\t\nc\ta$c\t\n";
	assert_eq!(read(input, "official", "named")?, set);
	Ok(())
}
