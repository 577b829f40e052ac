use anyhow::Result;
use pretty_assertions::assert_eq;
use quill::names_csv::NameTable;

#[test]
fn apply_names() -> Result<()> {
	let set = quill::tsrg::read(include_str!("names.tsrg").as_bytes(), ["official", "srg"])?;

	let mut table = NameTable::read(include_str!("fields.csv").as_bytes())?;
	table.extend(NameTable::read(include_str!("methods.csv").as_bytes())?);
	assert_eq!(table.len(), 4);

	let named = set.apply_name_table(&table)?;

	let actual = quill::tsrg::write_string(&named)?;
	let expected = "\
a net/minecraft/World
	a height
	b (La;)V tick
	c ()La$b; func_4_c
a$b net/minecraft/World$Chunk
	b blocks
	a ()I getSize
";
	assert_eq!(actual, expected, "left: actual, right: expected");
	Ok(())
}

#[test]
fn tsrg_errors() {
	let missing_class = "\ta b\nc D\n";
	let error = quill::tsrg::read(missing_class.as_bytes(), ["official", "srg"]).unwrap_err();
	assert!(format!("{error:#}").contains("line 1"), "{error:#}");

	let too_many = "a B\n\tb c d e\n";
	assert!(quill::tsrg::read(too_many.as_bytes(), ["official", "srg"]).is_err());

	let class_too_short = "a\n";
	assert!(quill::tsrg::read(class_too_short.as_bytes(), ["official", "srg"]).is_err());
}
