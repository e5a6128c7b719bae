//! Reading snapshots back from live host elements.

use crate::{
	host::HostApi,
	selector,
	vnode::{VNode, VNodeData},
};
use std::rc::Rc;

/// A childless placeholder [`VNode`] standing in for a live element that has no tracked snapshot.
///
/// Its selector is synthesized from the element's tag name, `id` and `class` attribute, so a new snapshot with a matching selector patches the element in place.
/// The element's existing child nodes are not represented and stay untouched.
pub fn load_placeholder<H: HostApi>(host: &H, element: &H::Node) -> Rc<VNode<H::Node>> {
	let id = host.get_attribute(element, "id");
	let class = host.get_attribute(element, "class");
	let sel = selector::synthesize(&host.tag_name(element), id.as_deref(), class.as_deref());
	VNode::new(Some(sel), None, VNodeData::default(), Some(Rc::new([])), None)
}
