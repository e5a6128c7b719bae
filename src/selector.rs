//! `tag#id.class1.class2` selector handling.

/// The selector of comment nodes.
pub const COMMENT: &str = "!";

/// A parsed element selector, borrowing from the selector string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
	pub tag: &'a str,
	pub id: Option<&'a str>,
	/// Dot-separated class names, without the leading dot.
	pub classes: Option<&'a str>,
}

impl<'a> Selector<'a> {
	/// Splits `sel` into tag, id and classes.
	///
	/// The id runs from the first `#` to the next `.`, classes are everything after that dot.
	/// A `#` or `.` at the very start of the selector is part of the tag name.
	#[must_use]
	pub fn parse(sel: &'a str) -> Self {
		let hash_index = sel.find('#');
		let dot_index = sel[hash_index.unwrap_or(0)..].find('.').map(|dot| dot + hash_index.unwrap_or(0));

		let hash = hash_index.filter(|&i| i > 0).unwrap_or(sel.len());
		let dot = dot_index.filter(|&i| i > 0).unwrap_or(sel.len());

		let tag = if hash_index.is_some() || dot_index.is_some() { &sel[..hash.min(dot)] } else { sel };
		let id = if hash < dot { Some(&sel[hash + 1..dot]) } else { None };
		let classes = if dot < sel.len() { Some(&sel[dot + 1..]) } else { None };

		Self { tag, id, classes }
	}

	/// The `class` attribute value, with classes separated by spaces.
	#[must_use]
	pub fn class_attribute(&self) -> Option<String> {
		self.classes.map(|classes| classes.replace('.', " "))
	}
}

/// Assembles a selector from a live element's tag name, `id` and `class` attribute.
///
/// The tag name is lowercased, and the class list is split on any whitespace.
#[must_use]
pub fn synthesize(tag_name: &str, id: Option<&str>, class: Option<&str>) -> String {
	let mut sel = tag_name.to_lowercase();
	if let Some(id) = id.filter(|id| !id.is_empty()) {
		sel.push('#');
		sel.push_str(id);
	}
	for class in class.into_iter().flat_map(str::split_whitespace) {
		sel.push('.');
		sel.push_str(class);
	}
	sel
}
