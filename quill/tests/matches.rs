use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use quill::matches::{ClassMatch, Match};
use quill::set::MappingSet;
use quill::tree::mappings::Mappings;

#[test]
fn chain_drops_unmatched() -> Result<()> {
	let name = |name: &str| ClassName::try_from(name);

	let first = Match { classes: vec![ClassMatch::new(name("A")?, name("B")?)] };
	let second = Match { classes: vec![
		ClassMatch::new(name("B")?, name("C")?),
		ClassMatch::new(name("X")?, name("Y")?),
	] };

	assert_eq!(first.chain(&second), Match { classes: vec![ClassMatch::new(name("A")?, name("C")?)] });
	assert_eq!(second.chain(&first), Match::default());
	Ok(())
}

#[test]
fn chain_and_update() -> Result<()> {
	let v1_v2 = Match::read(include_str!("v1_v2.match").as_bytes())?;
	let v2_v3 = Match::read(include_str!("v2_v3.match").as_bytes())?;

	let v1_v3 = quill::matches::chain_all([v1_v2, v2_v3])?;
	assert_eq!(v1_v3.classes.len(), 2);

	let tree: Mappings<2> = quill::tiny_v2::read(include_str!("v1_names.tiny").as_bytes())?;
	let names = MappingSet::from_tree(&tree, "official", "named")?;

	let updated = v1_v3.update_mappings(&names)?;

	let actual = quill::tiny_v2::write_set_string(&updated)?;
	let expected = include_str!("v3_names.tiny");
	assert_eq!(actual, expected, "left: actual, right: expected");

	// going back only finds what survived
	let back = v1_v3.reverse().update_mappings(&updated)?;
	assert_eq!(back.class_count(), 2);
	Ok(())
}

#[test]
fn matches_from_a_set() -> Result<()> {
	let tree: Mappings<2> = quill::tiny_v2::read(include_str!("v1_names.tiny").as_bytes())?;
	let names = MappingSet::from_tree(&tree, "official", "named")?;

	let matches = Match::from_set(&names)?;
	let foo = &matches.classes[0];
	assert_eq!(foo.new.as_str(), "net/Foo");
	assert_eq!(foo.methods[0].new_desc.as_str(), "(Lnet/Foo;)V");

	// updating a set with its own matches moves every name onto itself
	let updated = matches.update_mappings(&names)?;
	for class in updated.classes()? {
		assert_eq!(&class.deobf, class.obf());
	}
	Ok(())
}
