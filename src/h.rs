//! A convenience builder for [`VNode`] trees.

use crate::{
	hooks::Hooks,
	host::SVG_NAMESPACE,
	vnode::{Key, VNode, VNodeData},
};
use core::any::Any;
use std::rc::Rc;

/// Starts building an element (or, with `"!"`, a comment) node.
///
/// ```
/// use graft_dom::{h, VNode};
///
/// let list: std::rc::Rc<VNode<()>> = h("ul#list.todo")
/// 	.children((1..=3).map(|i| h("li").key(i).text(format!("Item {}", i)).build()))
/// 	.build();
/// assert_eq!(list.children().unwrap().len(), 3);
/// ```
#[must_use]
pub fn h<N>(sel: impl Into<String>) -> Builder<N> {
	Builder {
		sel: sel.into(),
		key: None,
		data: VNodeData::default(),
		children: None,
		text: None,
	}
}

/// A child slot. Primitive values become text leaves.
pub struct Child<N>(Option<Rc<VNode<N>>>);

impl<N> From<Rc<VNode<N>>> for Child<N> {
	fn from(vnode: Rc<VNode<N>>) -> Self {
		Self(Some(vnode))
	}
}

impl<N> From<Option<Rc<VNode<N>>>> for Child<N> {
	fn from(vnode: Option<Rc<VNode<N>>>) -> Self {
		Self(vnode)
	}
}

impl<N> From<&str> for Child<N> {
	fn from(text: &str) -> Self {
		Self(Some(VNode::text(text)))
	}
}

impl<N> From<String> for Child<N> {
	fn from(text: String) -> Self {
		Self(Some(VNode::text(text)))
	}
}

macro_rules! display_child {
	($($t:ty),*$(,)?) => {$(
		impl<N> From<$t> for Child<N> {
			fn from(value: $t) -> Self {
				Self(Some(VNode::text(value.to_string())))
			}
		}
	)*};
}
display_child!(i32, i64, u32, u64, usize, f64);

#[must_use]
pub struct Builder<N> {
	sel: String,
	key: Option<Key>,
	data: VNodeData<N>,
	children: Option<Vec<Option<Rc<VNode<N>>>>>,
	text: Option<String>,
}

impl<N> Builder<N> {
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	pub fn ns(mut self, ns: impl Into<String>) -> Self {
		self.data.ns = Some(ns.into());
		self
	}

	pub fn is(mut self, is: impl Into<String>) -> Self {
		self.data.is = Some(is.into());
		self
	}

	pub fn hooks(mut self, hooks: Hooks<N>) -> Self {
		self.data.hook = hooks;
		self
	}

	/// Attaches a module payload, like [`Attributes`](`crate::attributes::Attributes`).
	pub fn extension<T: Any>(mut self, value: T) -> Self {
		self.data.extensions.insert(value);
		self
	}

	/// Appends a child. Discards text set earlier.
	pub fn child(mut self, child: impl Into<Child<N>>) -> Self {
		self.text = None;
		self.children.get_or_insert_with(Vec::new).push(child.into().0);
		self
	}

	/// Appends children. Discards text set earlier.
	pub fn children<C: Into<Child<N>>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
		self.text = None;
		self.children.get_or_insert_with(Vec::new).extend(children.into_iter().map(|child| child.into().0));
		self
	}

	/// Sets the text content. Discards children added earlier.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.children = None;
		self.text = Some(text.into());
		self
	}

	/// Finishes the node. `svg` elements and their descendants (except inside `foreignObject`) are put into the SVG namespace.
	#[must_use]
	pub fn build(self) -> Rc<VNode<N>> {
		let Self { sel, key, mut data, children, text } = self;
		if is_svg(&sel) {
			add_ns(&mut data, children.as_deref(), &sel);
		}
		VNode::new(Some(sel), key, data, children.map(Into::into), text)
	}
}

fn is_svg(sel: &str) -> bool {
	sel.strip_prefix("svg").map_or(false, |rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('#'))
}

fn add_ns<N>(data: &mut VNodeData<N>, children: Option<&[Option<Rc<VNode<N>>>]>, sel: &str) {
	data.ns = Some(SVG_NAMESPACE.to_owned());
	if sel == "foreignObject" {
		return;
	}
	for child in children.into_iter().flatten().flatten() {
		if let Some(child_sel) = child.sel() {
			add_ns(&mut child.data_mut(), child.children().map(|children| &children[..]), child_sel);
		}
	}
}
