use graft_dom::{h, Error, Hooks, Module, Patcher, Remover, Target, VNode};
use pretty_assertions::assert_eq;
use std::{cell::RefCell, rc::Rc};

use mock_host_::{init_tracing, MockHost, MockNode, Op};

type Log = Rc<RefCell<Vec<String>>>;

fn recording_module(host: &Rc<MockHost>, log: &Log) -> Module<MockNode> {
	let host = Rc::clone(host);
	let log = Rc::clone(log);
	Module::new().on_destroy(move |vnode, element| {
		let attached = if host.parent(*element).is_some() { "attached" } else { "detached" };
		log.borrow_mut().push(format!("destroy {} ({})", vnode.sel().unwrap_or_default(), attached));
		Ok(())
	})
}

fn item(i: usize) -> Rc<VNode<MockNode>> {
	h(format!("li#item{}", i)).child(h(format!("span#label{}", i)).text(i.to_string()).build()).build()
}

#[test]
fn clearing_unkeyed_children() {
	init_tracing();
	let host = MockHost::new();
	let ul = host.mount("ul", &[]);
	let log: Log = Rc::default();
	let mut patcher = Patcher::new(Rc::clone(&host), vec![recording_module(&host, &log)]);

	let root = patcher.patch(Target::Element(ul), h("ul").children((0..3).map(item)).build()).unwrap();
	let removed = host.children(ul);
	log.borrow_mut().clear();
	host.take_ops();

	let root = patcher.patch(root, h("ul").build()).unwrap();
	assert_eq!(
		*log.borrow(),
		[
			"destroy li#item0 (attached)",
			"destroy span#label0 (attached)",
			"destroy li#item1 (attached)",
			"destroy span#label1 (attached)",
			"destroy li#item2 (attached)",
			"destroy span#label2 (attached)",
		]
	);
	assert_eq!(host.ops(), removed.iter().copied().map(Op::Remove).collect::<Vec<_>>());
	assert_eq!(host.render(ul), "<ul></ul>");
	assert_eq!(patcher.host_node(&root), Some(&ul));
}

#[test]
fn own_destroy_hook_runs_before_module_hooks() {
	init_tracing();
	let host = MockHost::new();
	let div = host.mount("div", &[]);
	let log: Log = Rc::default();
	let mut patcher = Patcher::new(Rc::clone(&host), vec![recording_module(&host, &log)]);

	let own = {
		let log = Rc::clone(&log);
		Hooks::new().on_destroy(move |_, _| {
			log.borrow_mut().push("own destroy".to_owned());
			Ok(())
		})
	};
	let root = patcher
		.patch(Target::Element(div), h("div").child(h("section").hooks(own).child(h("p").build()).child("text").build()).build())
		.unwrap();
	log.borrow_mut().clear();

	patcher.patch(root, h("div").build()).unwrap();
	assert_eq!(*log.borrow(), ["own destroy", "destroy section (attached)", "destroy p (attached)"]);
}

#[test]
fn removal_waits_for_every_listener() {
	init_tracing();
	let host = MockHost::new();
	let div = host.mount("div", &[]);
	let held: Rc<RefCell<Vec<Remover>>> = Rc::default();

	let holding = |held: &Rc<RefCell<Vec<Remover>>>| {
		let held = Rc::clone(held);
		move |_: &VNode<MockNode>, _: &MockNode, remover: Remover| {
			held.borrow_mut().push(remover);
			Ok(())
		}
	};
	let acknowledging = Module::new().on_remove(|_, _, remover: Remover| Ok(remover.acknowledge()?));
	let transition = Module::new().on_remove(holding(&held));
	let mut patcher = Patcher::new(Rc::clone(&host), vec![acknowledging, transition]);

	let fading = h("p").hooks(Hooks::new().on_remove(holding(&held))).text("bye").build();
	let root = patcher.patch(Target::Element(div), h("div").child(fading).build()).unwrap();
	let p = host.children(div)[0];
	host.take_ops();

	let root = patcher.patch(root, h("div").build()).unwrap();
	assert_eq!(host.parent(p), Some(div));
	assert_eq!(host.removals(), 0);

	let removers = held.borrow_mut().drain(..).collect::<Vec<_>>();
	assert_eq!(removers.len(), 2);
	assert_eq!(removers[0].pending(), 2);

	removers[0].acknowledge().unwrap();
	assert_eq!(host.parent(p), Some(div));
	removers[1].acknowledge().unwrap();
	assert!(removers[0].is_detached());
	assert_eq!(host.ops(), [Op::Remove(p)]);
	assert_eq!(host.render(div), "<div></div>");

	assert!(matches!(removers[1].acknowledge(), Err(Error::ExcessAcknowledgement)));
	assert_eq!(host.removals(), 1);

	// The patched tree does not depend on the removal having finished.
	patcher.patch(root, h("div").child("next").build()).unwrap();
}

#[test]
fn late_acknowledgement_of_an_already_detached_node() {
	init_tracing();
	let host = MockHost::new();
	let div = host.mount("div", &[]);
	let held: Rc<RefCell<Option<Remover>>> = Rc::default();
	let mut patcher = Patcher::new(Rc::clone(&host), vec![]);

	let hooks = {
		let held = Rc::clone(&held);
		Hooks::new().on_remove(move |_, _, remover| {
			*held.borrow_mut() = Some(remover);
			Ok(())
		})
	};
	let root = patcher
		.patch(Target::Element(div), h("div").child(h("p").hooks(hooks).text("old").build()).build())
		.unwrap();

	// Text content replaces all children, including the one still waiting for its removal.
	patcher.patch(root, h("div").text("new").build()).unwrap();
	assert_eq!(host.render(div), "<div>new</div>");

	let remover = held.borrow_mut().take().unwrap();
	assert_eq!(remover.pending(), 1);
	remover.acknowledge().unwrap();
	assert!(remover.is_detached());
}

#[test]
fn text_leaves_are_removed_immediately() {
	init_tracing();
	let host = MockHost::new();
	let div = host.mount("div", &[]);
	let log: Log = Rc::default();
	let mut patcher = Patcher::new(Rc::clone(&host), vec![recording_module(&host, &log)]);

	let root = patcher
		.patch(Target::Element(div), h("div").child("loose text").child(h("em").build()).child(VNode::comment("marker")).build())
		.unwrap();
	let removed = host.children(div);
	log.borrow_mut().clear();
	host.take_ops();

	patcher.patch(root, h("div").build()).unwrap();
	assert_eq!(*log.borrow(), ["destroy em (attached)", "destroy ! (attached)"]);
	assert_eq!(host.ops(), removed.into_iter().map(Op::Remove).collect::<Vec<_>>());
}

#[test]
fn removed_nodes_are_released() {
	init_tracing();
	let host = MockHost::new();
	let div = host.mount("div", &[]);
	let mut patcher = Patcher::new(Rc::clone(&host), vec![]);

	let item = h("p").child(h("b").build()).build();
	let inner = Rc::clone(item.children().unwrap()[0].as_ref().unwrap());
	let root = patcher.patch(Target::Element(div), h("div").child(Rc::clone(&item)).build()).unwrap();
	assert!(patcher.host_node(&item).is_some());
	assert!(patcher.host_node(&inner).is_some());

	patcher.patch(root, h("div").build()).unwrap();
	assert_eq!(patcher.host_node(&item), None);
	assert_eq!(patcher.host_node(&inner), None);
}
