//! A module that keeps element attributes in sync with each node's [`Attributes`] extension.

use crate::{error::HookResult, hooks::Module, host::HostApi, vnode::VNode};
use std::{collections::BTreeMap, iter::FromIterator, rc::Rc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
	Str(String),
	/// `true` sets the attribute to the empty string, `false` removes it.
	Bool(bool),
}

impl From<&str> for AttributeValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}

impl From<String> for AttributeValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<bool> for AttributeValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

macro_rules! display_attribute_value {
	($($t:ty),*$(,)?) => {$(
		impl From<$t> for AttributeValue {
			fn from(value: $t) -> Self {
				Self::Str(value.to_string())
			}
		}
	)*};
}
display_attribute_value!(i32, i64, u32, u64, usize, f64);

/// Attributes of one element, by name.
///
/// Store it with [`Builder::extension`](`crate::Builder::extension`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Option<AttributeValue> {
		self.0.insert(name.into(), value.into())
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&AttributeValue> {
		self.0.get(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Attributes {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect())
	}
}

/// Creates the attributes module for `host`.
///
/// Attributes set through the selector (`id` and `class`) and attributes not listed in any snapshot are left alone.
pub fn module<H: 'static + HostApi>(host: Rc<H>) -> Module<H::Node> {
	let update_host = Rc::clone(&host);
	Module::new()
		.on_create(move |empty, vnode, element| update_attributes(&*host, empty, vnode, element))
		.on_update(move |old, vnode, element| update_attributes(&*update_host, old, vnode, element))
}

fn update_attributes<H: HostApi>(host: &H, old: &VNode<H::Node>, vnode: &VNode<H::Node>, element: &H::Node) -> HookResult {
	let old_data = old.data();
	let data = vnode.data();
	let (old_attributes, attributes) = match (old_data.extensions.get::<Attributes>(), data.extensions.get::<Attributes>()) {
		(None, None) => return Ok(()),
		(Some(old_attributes), Some(attributes)) if old_attributes == attributes => return Ok(()),
		(old_attributes, attributes) => (old_attributes.map(|a| &a.0), attributes.map(|a| &a.0)),
	};
	let empty = BTreeMap::new();
	let old_attributes = old_attributes.unwrap_or(&empty);
	let attributes = attributes.unwrap_or(&empty);

	for (name, value) in attributes {
		if old_attributes.get(name) == Some(value) {
			continue;
		}
		match value {
			AttributeValue::Str(value) => host.set_attribute(element, name, value)?,
			AttributeValue::Bool(true) => host.set_attribute(element, name, "")?,
			AttributeValue::Bool(false) => host.remove_attribute(element, name)?,
		}
	}
	for name in old_attributes.keys() {
		if !attributes.contains_key(name) {
			host.remove_attribute(element, name)?;
		}
	}
	Ok(())
}
