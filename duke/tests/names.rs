use anyhow::Result;
use duke::tree::class::ClassName;
use duke::tree::field::FieldName;
use duke::tree::method::{MethodName, ParameterName};

#[test]
fn valid_class_names() -> Result<()> {
	let valid_class_names = [
		"foo",
		"foo$bar",
		"java/lang/Object",
		"org/example/MyClassName",
		"[[[D",
		"[[Ljava/lang/Integer;",
	];

	for i in valid_class_names {
		assert!(ClassName::is_valid(i), "{:?} is a valid class name", i);
	}

	Ok(())
}

#[test]
fn invalid_class_names() -> Result<()> {
	let invalid_class_names = [
		"",
		".",
		"/",
		";",
		"[",
		"a/",
		"/a",
		"[V",
		"L;",
		"//a",
		"a//",
		"a.b",
		"a;b",
		"a[b",
		"L;DV",
		"a//a",
	];

	for i in invalid_class_names {
		assert!(!ClassName::is_valid(i), "{:?} is an invalid class name", i);
	}

	Ok(())
}

#[test]
fn field_and_parameter_names() -> Result<()> {
	for i in ["foo", "field_1234_a", "f_a$b", "<init>"] {
		assert!(FieldName::is_valid(i), "{:?} is a valid field name", i);
		assert!(ParameterName::is_valid(i), "{:?} is a valid parameter name", i);
	}
	for i in ["", "a.b", "a;b", "a[b", "a/b"] {
		assert!(!FieldName::is_valid(i), "{:?} is an invalid field name", i);
		assert!(!ParameterName::is_valid(i), "{:?} is an invalid parameter name", i);
	}

	Ok(())
}

#[test]
fn method_names() -> Result<()> {
	for i in ["foo", "func_1234_a", "<init>", "<clinit>"] {
		assert!(MethodName::is_valid(i), "{:?} is a valid method name", i);
	}
	for i in ["", "a.b", "a;b", "a[b", "a/b", "<a>", "a<b", "b>"] {
		assert!(!MethodName::is_valid(i), "{:?} is an invalid method name", i);
	}

	assert!(MethodName::try_from("<init>")?.is_special());
	assert!(!MethodName::try_from("init")?.is_special());

	Ok(())
}

#[test]
fn names_can_be_looked_up_by_str() -> Result<()> {
	let mut map = std::collections::HashMap::new();
	map.insert(ClassName::try_from("a/b")?, 1);

	assert_eq!(map.get("a/b"), Some(&1));
	assert_eq!(map.get("a/c"), None);

	Ok(())
}
