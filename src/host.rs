//! The host tree the patcher edits.

use crate::error::HostError;
use core::fmt::Debug;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Primitive operations on a live, mutable node tree.
///
/// Implementations are handles (like [`web_sys::Document`](https://docs.rs/web-sys/0.3/web_sys/struct.Document.html)),
/// so all operations take `&self`.
pub trait HostApi {
	/// A cheap handle to a host node. Equality is node identity.
	type Node: Clone + PartialEq + Debug;

	/// # Errors
	///
	/// Iff the host refuses to create the element.
	fn create_element(&self, tag: &str, is: Option<&str>) -> Result<Self::Node, HostError>;

	/// # Errors
	///
	/// Iff the host refuses to create the element.
	fn create_element_ns(&self, namespace: &str, tag: &str, is: Option<&str>) -> Result<Self::Node, HostError>;

	/// # Errors
	///
	/// Iff the host refuses to create the node.
	fn create_text_node(&self, text: &str) -> Result<Self::Node, HostError>;

	/// # Errors
	///
	/// Iff the host refuses to create the node.
	fn create_comment(&self, text: &str) -> Result<Self::Node, HostError>;

	/// # Errors
	///
	/// Iff the host rejects the insertion.
	fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

	/// Inserts or moves `new_child` before `reference`, or to the end of `parent` if `reference` is [`None`].
	///
	/// # Errors
	///
	/// Iff the host rejects the insertion, for example because `reference` isn't a child of `parent`.
	fn insert_before(&self, parent: &Self::Node, new_child: &Self::Node, reference: Option<&Self::Node>) -> Result<(), HostError>;

	/// # Errors
	///
	/// Iff `child` isn't a child of `parent`.
	fn remove_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

	fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;

	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

	/// The element's tag name as reported by the host (HTML elements report it uppercase).
	fn tag_name(&self, element: &Self::Node) -> String;

	/// Replaces all children of an element with `text` (none if empty), or the data of a text or comment node.
	///
	/// # Errors
	///
	/// Iff the host rejects the change.
	fn set_text_content(&self, node: &Self::Node, text: &str) -> Result<(), HostError>;

	fn get_attribute(&self, element: &Self::Node, name: &str) -> Option<String>;

	/// # Errors
	///
	/// Iff `name` is invalid or `element` is not an element.
	fn set_attribute(&self, element: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;

	/// # Errors
	///
	/// Iff `element` is not an element.
	fn remove_attribute(&self, element: &Self::Node, name: &str) -> Result<(), HostError>;
}
