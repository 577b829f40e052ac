//! Information about the class hierarchy, as needed for [completing][crate::set::MappingSet::complete] mappings.
//!
//! The hierarchy is queried class by class through a [`ClassFactProvider`]. Providers can be combined: a `Vec` of
//! providers asks each one in turn, and a [`CachedProvider`] remembers the answers of another provider.

use std::cell::RefCell;
use std::rc::Rc;
use anyhow::Result;
use indexmap::IndexMap;
use log::{trace, warn};
use duke::class_constants::access;
use duke::tree::class::{ClassHeader, ClassName};
use duke::tree::field::FieldHeader;
use duke::tree::method::{MethodDescriptor, MethodHeader, MethodName};

/// The facts about a class: its direct supertypes and its declared members.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassFacts {
	/// `None` only for `java/lang/Object`.
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,
	pub fields: Vec<FieldHeader>,
	pub methods: Vec<MethodHeader>,
}

impl ClassFacts {
	/// Returns the super class followed by the interfaces.
	pub fn supertypes(&self) -> impl Iterator<Item=&ClassName> {
		self.super_class.iter().chain(self.interfaces.iter())
	}

	/// Returns the methods that can be overridden by subclasses.
	pub fn virtual_methods(&self) -> impl Iterator<Item=&MethodHeader> {
		self.methods.iter().filter(|method| method.is_virtual())
	}
}

impl From<ClassHeader> for ClassFacts {
	fn from(value: ClassHeader) -> Self {
		ClassFacts {
			super_class: value.super_class,
			interfaces: value.interfaces,
			fields: value.fields,
			methods: value.methods,
		}
	}
}

/// Something that knows the facts about classes.
pub trait ClassFactProvider {
	/// Returns the facts about the given class, or `None` if the class is unknown to this provider.
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>>;
}

impl<P: ClassFactProvider + ?Sized> ClassFactProvider for &P {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		(**self).get_class_facts(class)
	}
}

impl<P: ClassFactProvider + ?Sized> ClassFactProvider for Box<P> {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		(**self).get_class_facts(class)
	}
}

/// Asks the providers in order, the first one that knows the class wins.
///
/// A provider failing for a class is logged, and counts as not knowing the class.
impl<P: ClassFactProvider> ClassFactProvider for Vec<P> {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		for (index, provider) in self.iter().enumerate() {
			match provider.get_class_facts(class) {
				Ok(Some(facts)) => return Ok(Some(facts)),
				Ok(None) => {},
				Err(e) => warn!("provider {index} failed to get the class facts of {class:?}, asking the next one: {e:#}"),
			}
		}
		Ok(None)
	}
}

/// A provider answering from a table built in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
	classes: IndexMap<ClassName, Rc<ClassFacts>>,
}

impl StaticProvider {
	pub fn new() -> StaticProvider {
		StaticProvider::default()
	}

	pub fn add(&mut self, class: ClassName, facts: ClassFacts) {
		self.classes.insert(class, Rc::new(facts));
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}
}

impl ClassFactProvider for StaticProvider {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		Ok(self.classes.get(class).cloned())
	}
}

/// Knows `java/lang/Object`, the root of every class hierarchy.
#[derive(Debug, Clone)]
pub struct BuiltinProvider {
	object: Rc<ClassFacts>,
}

impl BuiltinProvider {
	pub fn new() -> Result<BuiltinProvider> {
		let method = |access, name: &str, desc: &str| -> Result<MethodHeader> {
			Ok(MethodHeader {
				access,
				name: MethodName::try_from(name)?,
				descriptor: MethodDescriptor::try_from(desc)?,
			})
		};

		let methods = vec![
			method(access::PUBLIC, MethodName::INIT, "()V")?,
			method(access::PUBLIC, "equals", "(Ljava/lang/Object;)Z")?,
			method(access::PUBLIC, "hashCode", "()I")?,
			method(access::PUBLIC, "toString", "()Ljava/lang/String;")?,
			method(access::PUBLIC | access::FINAL, "getClass", "()Ljava/lang/Class;")?,
			method(access::PROTECTED, "clone", "()Ljava/lang/Object;")?,
			method(access::PROTECTED, "finalize", "()V")?,
			method(access::PUBLIC | access::FINAL, "notify", "()V")?,
			method(access::PUBLIC | access::FINAL, "notifyAll", "()V")?,
			method(access::PUBLIC | access::FINAL, "wait", "()V")?,
			method(access::PUBLIC | access::FINAL, "wait", "(J)V")?,
			method(access::PUBLIC | access::FINAL, "wait", "(JI)V")?,
		];

		Ok(BuiltinProvider {
			object: Rc::new(ClassFacts {
				super_class: None,
				interfaces: Vec::new(),
				fields: Vec::new(),
				methods,
			}),
		})
	}
}

impl ClassFactProvider for BuiltinProvider {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		Ok((class == ClassName::JAVA_LANG_OBJECT).then(|| self.object.clone()))
	}
}

/// Remembers the answers of another provider, so that each class is only asked for once.
///
/// If the other provider fails, the error is logged and the class is remembered as unknown.
#[derive(Debug)]
pub struct CachedProvider<P> {
	inner: P,
	cache: RefCell<IndexMap<ClassName, Option<Rc<ClassFacts>>>>,
}

impl<P> CachedProvider<P> {
	pub fn new(inner: P) -> CachedProvider<P> {
		CachedProvider {
			inner,
			cache: RefCell::new(IndexMap::new()),
		}
	}

	/// The number of classes asked for so far, including the unknown ones.
	pub fn cached_count(&self) -> usize {
		self.cache.borrow().len()
	}
}

impl<P: ClassFactProvider> ClassFactProvider for CachedProvider<P> {
	fn get_class_facts(&self, class: &ClassName) -> Result<Option<Rc<ClassFacts>>> {
		if let Some(facts) = self.cache.borrow().get(class) {
			return Ok(facts.clone());
		}

		trace!("looking up class facts of {class:?}");
		let facts = match self.inner.get_class_facts(class) {
			Ok(facts) => facts,
			Err(e) => {
				warn!("failed to get the class facts of {class:?}, treating it as unknown: {e:#}");
				None
			},
		};

		self.cache.borrow_mut().insert(class.clone(), facts.clone());
		Ok(facts)
	}
}
