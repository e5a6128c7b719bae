use graft_dom::{h, Patcher, Target, VNode};
use pretty_assertions::assert_eq;
use std::rc::Rc;

use mock_host_::{init_tracing, MockHost, MockNode, Op};

struct List {
	host: Rc<MockHost>,
	patcher: Patcher<MockHost>,
	root: Rc<VNode<MockNode>>,
	ul: MockNode,
}

fn item(key: i64) -> Rc<VNode<MockNode>> {
	h("li").key(key).text(key.to_string()).build()
}

fn list(keys: &[i64]) -> Rc<VNode<MockNode>> {
	h("ul").children(keys.iter().map(|&key| item(key))).build()
}

fn markup(keys: &[i64]) -> String {
	let items: String = keys.iter().map(|key| format!("<li>{}</li>", key)).collect();
	format!("<ul>{}</ul>", items)
}

impl List {
	fn render(keys: &[i64]) -> Self {
		init_tracing();
		let host = MockHost::new();
		let ul = host.mount("ul", &[]);
		let mut patcher = Patcher::new(Rc::clone(&host), vec![]);
		let root = patcher.patch(Target::Element(ul), list(keys)).unwrap();
		assert_eq!(host.render(ul), markup(keys));
		host.take_ops();
		Self { host, patcher, root, ul }
	}

	fn update(&mut self, next: Rc<VNode<MockNode>>) {
		self.root = self.patcher.patch(Rc::clone(&self.root), next).unwrap();
		assert_eq!(*self.patcher.host_node(&self.root).unwrap(), self.ul);
	}

	fn to(&mut self, keys: &[i64]) {
		self.update(list(keys));
		assert_eq!(self.host.render(self.ul), markup(keys));
	}

	fn items(&self) -> Vec<MockNode> {
		self.host.children(self.ul)
	}
}

#[test]
fn rotation_is_a_single_move() {
	let mut list = List::render(&[1, 2, 3]);
	let items = list.items();
	let (a, b, c) = (items[0], items[1], items[2]);

	list.to(&[3, 1, 2]);
	assert_eq!(list.host.ops(), [Op::Move(c)]);
	assert_eq!(list.items(), [c, a, b]);
}

#[test]
fn append_and_prepend_do_not_move() {
	let mut list = List::render(&[1, 2, 3]);
	let before = list.items();

	list.to(&[1, 2, 3, 4]);
	assert_eq!(list.host.moves(), 0);
	assert_eq!(list.host.removals(), 0);
	assert_eq!(list.items()[..3].to_vec(), before);

	list.to(&[0, 1, 2, 3, 4]);
	assert_eq!(list.host.moves(), 0);
	assert_eq!(list.host.removals(), 0);
	assert_eq!(list.items()[1..4].to_vec(), before);
}

#[test]
fn reversal() {
	let mut list = List::render(&[1, 2, 3, 4]);
	let mut before = list.items();
	before.reverse();

	list.to(&[4, 3, 2, 1]);
	assert_eq!(list.host.moves(), 3);
	assert_eq!(list.host.creations(), 0);
	assert_eq!(list.items(), before);
}

#[test]
fn shuffle_reuses_every_node() {
	let mut list = List::render(&[1, 2, 3, 4, 5]);
	let before = list.items();

	list.to(&[3, 5, 1, 4, 2]);
	assert_eq!(list.host.creations(), 0);
	assert_eq!(list.host.removals(), 0);
	assert!(list.host.moves() <= 5);
	assert_eq!(list.items(), [before[2], before[4], before[0], before[3], before[1]]);
}

#[test]
fn insert_and_remove_in_the_middle() {
	let mut list = List::render(&[1, 3]);

	list.to(&[1, 2, 3]);
	assert_eq!(list.host.moves(), 0);
	assert_eq!(list.host.count(|op| matches!(op, Op::CreateElement(_))), 1);
	list.host.take_ops();

	let removed = list.items()[1];
	list.to(&[1, 3]);
	assert_eq!(list.host.ops(), [Op::Remove(removed)]);
}

#[test]
fn keyed_move_with_insertions() {
	let mut list = List::render(&[1, 2, 3, 4]);
	let before = list.items();

	// 4 is found through the key map, 9 and 8 are new.
	list.to(&[9, 4, 1, 8, 2, 3]);
	assert_eq!(list.host.removals(), 0);
	assert_eq!(list.host.count(|op| matches!(op, Op::CreateElement(_))), 2);
	let items = list.items();
	assert_eq!([items[1], items[2], items[4], items[5]], [before[3], before[0], before[1], before[2]]);
}

#[test]
fn replaced_keys() {
	let mut list = List::render(&[1, 2]);
	let kept = list.items()[0];
	let dropped = list.items()[1];

	list.to(&[1, 9]);
	assert_eq!(list.items()[0], kept);
	assert_eq!(list.host.removals(), 1);
	assert!(list.host.ops().contains(&Op::Remove(dropped)));
}

#[test]
fn same_key_with_other_selector_is_recreated() {
	let mut list = List::render(&[1, 2]);
	let old = list.items();

	list.update(
		h("ul")
			.child(h("span").key(2).text("2").build())
			.child(item(3))
			.build(),
	);
	assert_eq!(list.host.render(list.ul), "<ul><span>2</span><li>3</li></ul>");
	assert_eq!(list.host.removals(), 2);
	assert!(list.items().iter().all(|item| !old.contains(item)));
}

#[test]
fn duplicate_keys_do_not_break_patching() {
	let mut list = List::render(&[1, 1, 2]);

	list.to(&[2, 1]);
	assert_eq!(list.host.removals(), 1);

	list.to(&[3, 1, 1, 2, 2]);
	list.to(&[2, 3, 2, 1]);
	list.to(&[]);
	assert!(list.items().is_empty());
}

#[test]
fn empty_slots_are_ignored() {
	let mut list = List::render(&[1, 2]);
	let before = list.items();

	list.update(h("ul").child(item(1)).child(None).child(item(2)).child(None).build());
	assert_eq!(list.host.render(list.ul), markup(&[1, 2]));
	assert_eq!(list.items(), before);
	assert!(list.host.ops().is_empty());

	list.to(&[2, 1]);
	assert_eq!(list.items(), [before[1], before[0]]);
}

#[test]
fn unkeyed_children_are_patched_by_position() {
	init_tracing();
	let host = MockHost::new();
	let ul = host.mount("ul", &[]);
	let mut patcher = Patcher::new(Rc::clone(&host), vec![]);
	let root = patcher
		.patch(Target::Element(ul), h("ul").child(h("li").text("a").build()).child(h("li").text("b").build()).build())
		.unwrap();
	let first = host.children(ul)[0];
	let second = host.children(ul)[1];
	host.take_ops();

	patcher.patch(root, h("ul").child(h("li").text("b").build()).build()).unwrap();
	assert_eq!(host.ops(), [Op::SetText(first, "b".to_owned()), Op::Remove(second)]);
	assert_eq!(host.render(ul), "<ul><li>b</li></ul>");
}

#[test]
fn text_leaves_among_elements() {
	init_tracing();
	let host = MockHost::new();
	let p = host.mount("p", &[]);
	let mut patcher = Patcher::new(Rc::clone(&host), vec![]);
	let root = patcher.patch(Target::Element(p), h("p").child("Hello, ").child(h("b").text("you").build()).build()).unwrap();
	let text = host.children(p)[0];
	host.take_ops();

	let root = patcher.patch(root, h("p").child("Bye, ").child(h("b").text("you").build()).build()).unwrap();
	assert_eq!(host.ops(), [Op::SetText(text, "Bye, ".to_owned())]);
	assert_eq!(host.render(p), "<p>Bye, <b>you</b></p>");
	host.take_ops();

	patcher.patch(root, h("p").child(h("b").text("you").build()).build()).unwrap();
	assert_eq!(host.ops(), [Op::Remove(text)]);
}

#[test]
fn insertion_before_an_end_match_behind_an_empty_slot() {
	let mut list = List::render(&[1, 3]);
	let before = list.items();

	list.update(h("ul").child(item(4)).child(item(1)).child(item(2)).child(None).child(item(3)).build());
	assert_eq!(list.host.render(list.ul), markup(&[4, 1, 2, 3]));
	assert_eq!(list.host.moves(), 0);
	let items = list.items();
	assert_eq!([items[1], items[3]], [before[0], before[1]]);
}
