//! The browser DOM as host tree.

use crate::{error::HostError, host::HostApi};
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

/// [`HostApi`] over the global `window.document`.
///
/// Pass [`WEB_DOM`] to [`Patcher::new`](`crate::Patcher::new`) to use it; it is never picked implicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDom;

/// The default host adapter.
pub const WEB_DOM: WebDom = WebDom;

impl WebDom {
	fn document() -> Result<Document, HostError> {
		web_sys::window()
			.and_then(|window| window.document())
			.ok_or_else(|| HostError::new("document", "No global `window.document` found."))
	}

	fn element<'a>(operation: &'static str, node: &'a Node) -> Result<&'a Element, HostError> {
		node.dyn_ref::<Element>().ok_or_else(|| HostError::new(operation, format!("Expected an element but found {:?}", node)))
	}
}

fn js_error(operation: &'static str) -> impl FnOnce(JsValue) -> HostError {
	move |error| HostError::new(operation, format!("{:?}", error))
}

impl HostApi for WebDom {
	type Node = Node;

	fn create_element(&self, tag: &str, is: Option<&str>) -> Result<Node, HostError> {
		let document = Self::document()?;
		match is {
			// This isn't entirely modern, but is well-supported.
			Some(is) => document.create_element_with_str(tag, is),
			None => document.create_element(tag),
		}
		.map(Into::into)
		.map_err(js_error("createElement"))
	}

	fn create_element_ns(&self, namespace: &str, tag: &str, is: Option<&str>) -> Result<Node, HostError> {
		let document = Self::document()?;
		match is {
			Some(is) => document.create_element_ns_with_str(Some(namespace), tag, is),
			None => document.create_element_ns(Some(namespace), tag),
		}
		.map(Into::into)
		.map_err(js_error("createElementNS"))
	}

	fn create_text_node(&self, text: &str) -> Result<Node, HostError> {
		Ok(Self::document()?.create_text_node(text).into())
	}

	fn create_comment(&self, text: &str) -> Result<Node, HostError> {
		Ok(Self::document()?.create_comment(text).into())
	}

	fn append_child(&self, parent: &Node, child: &Node) -> Result<(), HostError> {
		trace!("appendChild");
		parent.append_child(child).map(drop).map_err(js_error("appendChild"))
	}

	fn insert_before(&self, parent: &Node, new_child: &Node, reference: Option<&Node>) -> Result<(), HostError> {
		trace!(append = reference.is_none(), "insertBefore");
		parent.insert_before(new_child, reference).map(drop).map_err(js_error("insertBefore"))
	}

	fn remove_child(&self, parent: &Node, child: &Node) -> Result<(), HostError> {
		trace!("removeChild");
		parent.remove_child(child).map(drop).map_err(js_error("removeChild"))
	}

	fn parent_node(&self, node: &Node) -> Option<Node> {
		node.parent_node()
	}

	fn next_sibling(&self, node: &Node) -> Option<Node> {
		node.next_sibling()
	}

	fn tag_name(&self, element: &Node) -> String {
		element.dyn_ref::<Element>().map(Element::tag_name).unwrap_or_default()
	}

	fn set_text_content(&self, node: &Node, text: &str) -> Result<(), HostError> {
		node.set_text_content(Some(text));
		Ok(())
	}

	fn get_attribute(&self, element: &Node, name: &str) -> Option<String> {
		element.dyn_ref::<Element>().and_then(|element| element.get_attribute(name))
	}

	fn set_attribute(&self, element: &Node, name: &str, value: &str) -> Result<(), HostError> {
		Self::element("setAttribute", element)?.set_attribute(name, value).map_err(js_error("setAttribute"))
	}

	fn remove_attribute(&self, element: &Node, name: &str) -> Result<(), HostError> {
		Self::element("removeAttribute", element)?.remove_attribute(name).map_err(js_error("removeAttribute"))
	}
}
