use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::class_constants::access;
use duke::tree::class::{ClassHeader, ClassName};
use duke::tree::field::{FieldDescriptor, FieldHeader, FieldName};
use duke::tree::method::{MethodDescriptor, MethodHeader, MethodName};

fn utf8(out: &mut Vec<u8>, s: &str) {
	out.push(1);
	out.extend_from_slice(&(s.len() as u16).to_be_bytes());
	out.extend_from_slice(s.as_bytes());
}

fn u16(out: &mut Vec<u8>, value: u16) {
	out.extend_from_slice(&value.to_be_bytes());
}

/// A class file as written by a compiler: with a `long` constant, a string constant and attributes on methods.
fn class_file_bytes() -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&0xCAFEBABE_u32.to_be_bytes());
	u16(&mut out, 0); // minor
	u16(&mut out, 61); // major

	u16(&mut out, 16); // constant pool count, one more than the last index
	utf8(&mut out, "a/Foo"); // #1
	out.push(7); u16(&mut out, 1); // #2 Class a/Foo
	utf8(&mut out, "a/Bar"); // #3
	out.push(7); u16(&mut out, 3); // #4 Class a/Bar
	out.push(5); out.extend_from_slice(&42u64.to_be_bytes()); // #5 Long, also takes #6
	utf8(&mut out, "value"); // #7
	utf8(&mut out, "J"); // #8
	utf8(&mut out, "run"); // #9
	utf8(&mut out, "(I)V"); // #10
	utf8(&mut out, "Code"); // #11
	out.push(8); u16(&mut out, 7); // #12 String
	utf8(&mut out, "java/lang/Runnable"); // #13
	out.push(7); u16(&mut out, 13); // #14 Class java/lang/Runnable
	out.push(12); u16(&mut out, 9); u16(&mut out, 10); // #15 NameAndType

	u16(&mut out, 0x0021); // public super
	u16(&mut out, 2); // this
	u16(&mut out, 4); // super
	u16(&mut out, 1); // interfaces
	u16(&mut out, 14);

	u16(&mut out, 1); // fields
	u16(&mut out, 0x0019); // public static final
	u16(&mut out, 7);
	u16(&mut out, 8);
	u16(&mut out, 0);

	u16(&mut out, 1); // methods
	u16(&mut out, 0x0001);
	u16(&mut out, 9);
	u16(&mut out, 10);
	u16(&mut out, 1); // one attribute
	u16(&mut out, 11);
	out.extend_from_slice(&5u32.to_be_bytes());
	out.extend_from_slice(&[0, 1, 2, 3, 4]);

	u16(&mut out, 0); // class attributes
	out
}

#[test]
fn read_header_of_compiled_class() -> Result<()> {
	let bytes = class_file_bytes();
	let header = duke::read_class_header(&mut bytes.as_slice())?;

	let expected = ClassHeader {
		access: 0x0021,
		name: ClassName::try_from("a/Foo")?,
		super_class: Some(ClassName::try_from("a/Bar")?),
		interfaces: vec![ClassName::try_from("java/lang/Runnable")?],
		fields: vec![
			FieldHeader {
				access: access::PUBLIC | access::STATIC | access::FINAL,
				name: FieldName::try_from("value")?,
				descriptor: FieldDescriptor::try_from("J")?,
			},
		],
		methods: vec![
			MethodHeader {
				access: access::PUBLIC,
				name: MethodName::try_from("run")?,
				descriptor: MethodDescriptor::try_from("(I)V")?,
			},
		],
	};

	assert_eq!(header, expected);
	assert!(header.fields[0].is_static());
	assert!(header.methods[0].is_virtual());

	Ok(())
}

#[test]
fn wrong_magic() {
	let mut bytes = class_file_bytes();
	bytes[0] = 0;

	assert!(duke::read_class_header(&mut bytes.as_slice()).is_err());
}

#[test]
fn truncated_class_file() {
	let bytes = class_file_bytes();
	let truncated = &bytes[..bytes.len() - 10];

	assert!(duke::read_class_header(&mut &truncated[..]).is_err());
}

#[test]
fn write_then_read_header() -> Result<()> {
	let mut header = ClassHeader::new(
		access::PUBLIC | access::INTERFACE | access::ABSTRACT,
		ClassName::try_from("a/b/C$D")?,
		Some(ClassName::java_lang_object()),
		vec![ClassName::try_from("a/E")?, ClassName::try_from("a/F")?],
	);
	header.methods.push(MethodHeader {
		access: access::PUBLIC | access::ABSTRACT,
		name: MethodName::try_from("m")?,
		descriptor: MethodDescriptor::try_from("(La/E;)La/b/C$D;")?,
	});
	header.fields.push(FieldHeader {
		access: access::PUBLIC | access::STATIC,
		name: FieldName::try_from("m")?,
		descriptor: FieldDescriptor::try_from("[D")?,
	});

	let mut vec = Vec::new();
	duke::write_class_header(&mut vec, &header)?;

	assert_eq!(duke::read_class_header(&mut vec.as_slice())?, header);

	Ok(())
}
