//! The snapshot data model.

use crate::{hooks::Hooks, selector};
use core::{
	any::{Any, TypeId},
	cell::{Ref, RefCell, RefMut},
	fmt::{self, Debug, Formatter},
	sync::atomic::{AtomicU64, Ordering},
};
use hashbrown::HashMap;
use std::rc::Rc;

/// A child list. `None` slots are skipped by the patcher.
pub type Children<N> = Rc<[Option<Rc<VNode<N>>>]>;

/// Process-unique identity of a [`VNode`], used to track which host node it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
	fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(0);
		Self(NEXT.fetch_add(1, Ordering::Relaxed))
	}
}

/// Sibling identity used for reordering.
///
/// Keys only have to be unique among the children of one parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Str(Rc<str>),
	Int(i64),
}

impl From<&str> for Key {
	fn from(key: &str) -> Self {
		Self::Str(key.into())
	}
}

impl From<String> for Key {
	fn from(key: String) -> Self {
		Self::Str(key.into())
	}
}

impl From<Rc<str>> for Key {
	fn from(key: Rc<str>) -> Self {
		Self::Str(key)
	}
}

impl From<i64> for Key {
	fn from(key: i64) -> Self {
		Self::Int(key)
	}
}

impl From<i32> for Key {
	fn from(key: i32) -> Self {
		Self::Int(key.into())
	}
}

impl From<u32> for Key {
	fn from(key: u32) -> Self {
		Self::Int(key.into())
	}
}

/// Module-private payloads, one per type.
#[derive(Default, Clone)]
pub struct Extensions(HashMap<TypeId, Rc<dyn Any>>);

impl Extensions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value`, replacing any previous value of the same type.
	pub fn insert<T: Any>(&mut self, value: T) {
		self.0.insert(TypeId::of::<T>(), Rc::new(value));
	}

	#[must_use]
	pub fn get<T: Any>(&self) -> Option<&T> {
		self.0.get(&TypeId::of::<T>()).and_then(|value| value.downcast_ref())
	}

	pub fn remove<T: Any>(&mut self) -> bool {
		self.0.remove(&TypeId::of::<T>()).is_some()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Debug for Extensions {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extensions").field("len", &self.0.len()).finish()
	}
}

/// Node metadata.
pub struct VNodeData<N> {
	/// Element namespace, for example [`SVG_NAMESPACE`](`crate::host::SVG_NAMESPACE`).
	pub ns: Option<String>,
	/// Customized built-in element name, forwarded as the `is` creation option.
	pub is: Option<String>,
	pub hook: Hooks<N>,
	pub extensions: Extensions,
}

impl<N> Default for VNodeData<N> {
	fn default() -> Self {
		Self {
			ns: None,
			is: None,
			hook: Hooks::default(),
			extensions: Extensions::default(),
		}
	}
}

impl<N> Debug for VNodeData<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNodeData")
			.field("ns", &self.ns)
			.field("is", &self.is)
			.field("hook", &self.hook)
			.field("extensions", &self.extensions)
			.finish()
	}
}

/// A snapshot of a subtree at one point in time.
///
/// Which host node a `VNode` currently owns is tracked by the [`Patcher`](`crate::Patcher`), not by the node itself.
pub struct VNode<N> {
	id: NodeId,
	sel: Option<String>,
	key: Option<Key>,
	data: RefCell<VNodeData<N>>,
	children: Option<Children<N>>,
	text: Option<String>,
}

impl<N> VNode<N> {
	#[must_use]
	pub fn new(sel: Option<String>, key: Option<Key>, data: VNodeData<N>, children: Option<Children<N>>, text: Option<String>) -> Rc<Self> {
		Rc::new(Self {
			id: NodeId::next(),
			sel,
			key,
			data: RefCell::new(data),
			children,
			text,
		})
	}

	/// A text leaf.
	#[must_use]
	pub fn text(text: impl Into<String>) -> Rc<Self> {
		Self::new(None, None, VNodeData::default(), None, Some(text.into()))
	}

	/// A comment node.
	#[must_use]
	pub fn comment(text: impl Into<String>) -> Rc<Self> {
		Self::new(Some(selector::COMMENT.to_owned()), None, VNodeData::default(), None, Some(text.into()))
	}

	/// The placeholder without selector, text or children.
	///
	/// Create hooks receive it as their "old" node.
	#[must_use]
	pub fn empty() -> Rc<Self> {
		Self::new(None, None, VNodeData::default(), Some(Rc::new([])), None)
	}

	#[must_use]
	pub fn id(&self) -> NodeId {
		self.id
	}

	#[must_use]
	pub fn sel(&self) -> Option<&str> {
		self.sel.as_deref()
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	#[must_use]
	pub fn children(&self) -> Option<&Children<N>> {
		self.children.as_ref()
	}

	#[must_use]
	pub fn text_content(&self) -> Option<&str> {
		self.text.as_deref()
	}

	/// # Panics
	///
	/// Iff the data is currently mutably borrowed, i.e. from within an `init` hook that holds on to [`VNode::data_mut`].
	#[must_use]
	pub fn data(&self) -> Ref<'_, VNodeData<N>> {
		self.data.borrow()
	}

	/// Intended for `init` hooks, which may rewrite a node's metadata before it is materialized.
	///
	/// # Panics
	///
	/// Iff the data is currently borrowed.
	#[must_use]
	pub fn data_mut(&self) -> RefMut<'_, VNodeData<N>> {
		self.data.borrow_mut()
	}

	#[must_use]
	pub fn is_comment(&self) -> bool {
		self.sel() == Some(selector::COMMENT)
	}

	/// Whether the patcher may update `self` into `other` in place.
	///
	/// Only keys and selectors are compared.
	#[must_use]
	pub fn is_same(&self, other: &Self) -> bool {
		self.key == other.key && self.sel == other.sel
	}
}

impl<N> Debug for VNode<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNode")
			.field("id", &self.id)
			.field("sel", &self.sel)
			.field("key", &self.key)
			.field("children", &self.children.as_ref().map(|children| children.len()))
			.field("text", &self.text.as_ref().map(String::len))
			.finish()
	}
}
