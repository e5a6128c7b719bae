use crate::{
	error::{Error, Result},
	hooks::{Module, ModuleHooks},
	host::HostApi,
	host_refs::HostRefs,
	load::load_placeholder,
	remove::Remover,
	selector::{self, Selector},
	vnode::{Children, Key, VNode},
};
use core::{
	fmt::{self, Debug, Formatter},
	ops::Range,
};
use hashbrown::{hash_map::Entry, HashMap};
use std::rc::Rc;
use tracing::{instrument, trace, trace_span, warn};

type Slots<N> = [Option<Rc<VNode<N>>>];
type InsertedQueue<N> = Vec<Rc<VNode<N>>>;

/// What [`Patcher::patch`] updates.
pub enum Target<N> {
	/// A live element without snapshot, for example the mount point of the first render.
	Element(N),
	/// The root returned by the previous [`Patcher::patch`].
	VNode(Rc<VNode<N>>),
}

impl<N> From<Rc<VNode<N>>> for Target<N> {
	fn from(vnode: Rc<VNode<N>>) -> Self {
		Self::VNode(vnode)
	}
}

impl<N: Debug> Debug for Target<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
			Self::VNode(vnode) => f.debug_tuple("VNode").field(vnode).finish(),
		}
	}
}

/// Patches a host tree from one [`VNode`] snapshot to the next.
///
/// # Correct Use
///
/// Pass each returned root back in as [`Target::VNode`] on the next call.
/// Snapshots may share subtrees between calls (an [`Rc::ptr_eq`] node is skipped as up to date),
/// but a node must not appear twice within the same tree.
/// A shared node that moves under a new parent is created anew there, and its old host node is torn down with the old parent.
///
/// Hook errors abort the cycle and leave the host tree partially updated.
pub struct Patcher<H: HostApi> {
	host: Rc<H>,
	cbs: ModuleHooks<H::Node>,
	refs: HostRefs<H::Node>,
	empty: Rc<VNode<H::Node>>,
}

impl<H: HostApi> Debug for Patcher<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Patcher").field("cbs", &self.cbs).field("bound", &self.refs.len()).finish_non_exhaustive()
	}
}

impl<H> Patcher<H>
where
	H: 'static + HostApi,
	H::Node: 'static,
{
	/// Collects the modules' hooks once, in order.
	#[must_use]
	pub fn new(host: Rc<H>, modules: impl IntoIterator<Item = Module<H::Node>>) -> Self {
		let cbs = ModuleHooks::collect(modules);
		trace!(?cbs, "Created patcher.");
		Self {
			host,
			cbs,
			refs: HostRefs::new(),
			empty: VNode::empty(),
		}
	}

	#[must_use]
	pub fn host(&self) -> &Rc<H> {
		&self.host
	}

	/// The host node `vnode` currently owns, if any.
	#[must_use]
	pub fn host_node(&self, vnode: &VNode<H::Node>) -> Option<&H::Node> {
		self.refs.get(vnode)
	}

	/// Updates `target` to match `vnode` and returns `vnode` as the next target.
	///
	/// # Errors
	///
	/// Hook errors are returned unchanged as [`Error::Hook`], everything else means the host tree or the snapshots were misused.
	/// In either case, the host tree is left partially patched.
	#[instrument(skip_all, fields(sel = ?vnode.sel()))]
	pub fn patch(&mut self, target: impl Into<Target<H::Node>>, vnode: Rc<VNode<H::Node>>) -> Result<Rc<VNode<H::Node>>> {
		self.refs.begin_cycle();
		for pre in &self.cbs.pre {
			pre().map_err(Error::Hook)?;
		}

		let old = match target.into() {
			Target::VNode(old) => old,
			Target::Element(element) => {
				let placeholder = load_placeholder(&*self.host, &element);
				trace!(sel = ?placeholder.sel(), "Loaded placeholder for element.");
				self.refs.bind(&placeholder, element);
				placeholder
			}
		};

		let mut inserted = InsertedQueue::new();
		if old.is_same(&vnode) {
			self.patch_vnode(&old, &vnode, &mut inserted)?;
		} else {
			let span = trace_span!("Replacing root", old = ?old.sel());
			let _enter = span.enter();
			let element = self.refs.previous(&old)?;
			let parent = self.host.parent_node(&element);
			let created = self.create_element(&vnode, &mut inserted)?;
			match parent {
				Some(parent) => {
					let next_sibling = self.host.next_sibling(&element);
					self.host.insert_before(&parent, &created, next_sibling.as_ref())?;
					self.remove_vnodes(&parent, &[Some(old)], 0..1)?;
				}
				None => {
					trace!("Old root is detached. Releasing it without hooks.");
					self.refs.release_subtree(&old);
				}
			}
		}

		for inserted in inserted {
			let insert = inserted.data().hook.insert.clone().ok_or_else(|| Error::MissingInsertHook(inserted.id()))?;
			let element = self.refs.bound(&inserted)?;
			insert(&inserted, &element).map_err(Error::Hook)?;
		}

		for post in &self.cbs.post {
			post().map_err(Error::Hook)?;
		}
		Ok(vnode)
	}

	/// Materializes `vnode` and its descendants, without attaching the result.
	#[instrument(level = "trace", skip_all, fields(sel = ?vnode.sel()))]
	fn create_element(&mut self, vnode: &Rc<VNode<H::Node>>, inserted: &mut InsertedQueue<H::Node>) -> Result<H::Node> {
		let init = vnode.data().hook.init.clone();
		if let Some(init) = init {
			init(vnode).map_err(Error::Hook)?;
		}

		let element = match vnode.sel() {
			Some(selector::COMMENT) => {
				let text = vnode.text_content().unwrap_or_default();
				trace!(text = ?redacted(text), "Creating comment.");
				let comment = self.host.create_comment(text)?;
				self.refs.bind(vnode, comment.clone());
				comment
			}

			Some(sel) => {
				let selector = Selector::parse(sel);
				let element = {
					let data = vnode.data();
					match data.ns.as_deref() {
						Some(ns) => self.host.create_element_ns(ns, selector.tag, data.is.as_deref())?,
						None => self.host.create_element(selector.tag, data.is.as_deref())?,
					}
				};
				if let Some(id) = selector.id {
					self.host.set_attribute(&element, "id", id)?;
				}
				if let Some(class) = selector.class_attribute() {
					self.host.set_attribute(&element, "class", &class)?;
				}
				self.refs.bind(vnode, element.clone());

				for create in &self.cbs.create {
					create(&self.empty, vnode, &element).map_err(Error::Hook)?;
				}

				if let Some(children) = vnode.children() {
					for child in children.iter().flatten() {
						let child_element = self.create_element(child, inserted)?;
						self.host.append_child(&element, &child_element)?;
					}
				} else if let Some(text) = vnode.text_content() {
					let text_node = self.host.create_text_node(text)?;
					self.host.append_child(&element, &text_node)?;
				}

				let create = vnode.data().hook.create.clone();
				if let Some(create) = create {
					create(&self.empty, vnode, &element).map_err(Error::Hook)?;
				}
				if vnode.data().hook.insert.is_some() {
					inserted.push(Rc::clone(vnode));
				}
				element
			}

			None => {
				let text = vnode.text_content().unwrap_or_default();
				trace!(text = ?redacted(text), "Creating text node.");
				let text_node = self.host.create_text_node(text)?;
				self.refs.bind(vnode, text_node.clone());
				text_node
			}
		};
		Ok(element)
	}

	fn add_vnodes(&mut self, parent: &H::Node, before: Option<&H::Node>, vnodes: &Slots<H::Node>, inserted: &mut InsertedQueue<H::Node>) -> Result<()> {
		for vnode in vnodes.iter().flatten() {
			let element = self.create_element(vnode, inserted)?;
			self.host.insert_before(parent, &element, before)?;
		}
		Ok(())
	}

	/// Fires `destroy` hooks for `vnode` and then its descendants. Text leaves have none.
	fn invoke_destroy_hook(&self, vnode: &VNode<H::Node>) -> Result<()> {
		if vnode.sel().is_none() {
			return Ok(());
		}

		let element = self.refs.previous(vnode)?;
		let destroy = vnode.data().hook.destroy.clone();
		if let Some(destroy) = destroy {
			destroy(vnode, &element).map_err(Error::Hook)?;
		}
		for destroy in &self.cbs.destroy {
			destroy(vnode, &element).map_err(Error::Hook)?;
		}

		for child in vnode.children().into_iter().flat_map(|children| children.iter()).flatten() {
			self.invoke_destroy_hook(child)?;
		}
		Ok(())
	}

	/// Removes `vnodes[range]` from `parent`.
	///
	/// Elements and comments are detached once their [`Remover`] is acknowledged by every module `remove` hook and by their own `remove` hook (or immediately, if they don't have one).
	#[instrument(level = "trace", skip(self, parent, vnodes))]
	fn remove_vnodes(&mut self, parent: &H::Node, vnodes: &Slots<H::Node>, range: Range<usize>) -> Result<()> {
		for vnode in vnodes[range].iter().flatten() {
			let element = self.refs.previous(vnode)?;
			if vnode.sel().is_some() {
				let span = trace_span!("Removing node", sel = ?vnode.sel());
				let _enter = span.enter();

				self.invoke_destroy_hook(vnode)?;

				let remover = Remover::new(self.cbs.remove.len() + 1, {
					let host = Rc::clone(&self.host);
					let element = element.clone();
					move || match host.parent_node(&element) {
						Some(parent) => host.remove_child(&parent, &element).map_err(Into::into),
						None => {
							warn!("Removed node was already detached.");
							Ok(())
						}
					}
				});
				for remove in &self.cbs.remove {
					remove(vnode, &element, remover.clone()).map_err(Error::Hook)?;
				}

				let remove = vnode.data().hook.remove.clone();
				match remove {
					Some(remove) => remove(vnode, &element, remover).map_err(Error::Hook)?,
					None => remover.acknowledge()?,
				}
			} else {
				trace!(text = ?vnode.text_content().map(redacted), "Removing text node.");
				self.host.remove_child(parent, &element)?;
			}
			self.refs.release_subtree(vnode);
		}
		Ok(())
	}

	/// Reconciles the child lists of two same nodes, reusing host nodes where keys and selectors match.
	#[allow(clippy::too_many_lines)]
	#[instrument(level = "trace", skip_all, fields(old_len = old_children.len(), new_len = new_ch.len()))]
	fn update_children(&mut self, parent: &H::Node, old_children: &Children<H::Node>, new_ch: &Children<H::Node>, inserted: &mut InsertedQueue<H::Node>) -> Result<()> {
		// Matched by key: tombstoned here, never in the old snapshot.
		let mut old_ch = old_children.to_vec();
		let mut old_start = 0;
		let mut old_end = old_ch.len();
		let mut new_start = 0;
		let mut new_end = new_ch.len();
		let mut old_key_to_index: Option<HashMap<Key, usize>> = None;

		while old_start < old_end && new_start < new_end {
			let old_start_vnode = match &old_ch[old_start] {
				Some(vnode) => Rc::clone(vnode),
				None => {
					old_start += 1;
					continue;
				}
			};
			let old_end_vnode = match &old_ch[old_end - 1] {
				Some(vnode) => Rc::clone(vnode),
				None => {
					old_end -= 1;
					continue;
				}
			};
			let new_start_vnode = match &new_ch[new_start] {
				Some(vnode) => vnode,
				None => {
					new_start += 1;
					continue;
				}
			};
			let new_end_vnode = match &new_ch[new_end - 1] {
				Some(vnode) => vnode,
				None => {
					new_end -= 1;
					continue;
				}
			};

			if old_start_vnode.is_same(new_start_vnode) {
				self.patch_vnode(&old_start_vnode, new_start_vnode, inserted)?;
				old_start += 1;
				new_start += 1;
			} else if old_end_vnode.is_same(new_end_vnode) {
				self.patch_vnode(&old_end_vnode, new_end_vnode, inserted)?;
				old_end -= 1;
				new_end -= 1;
			} else if old_end_vnode.is_same(new_start_vnode) {
				self.patch_vnode(&old_end_vnode, new_start_vnode, inserted)?;
				let span = trace_span!("Moving old end before old start");
				let _enter = span.enter();
				let moved = self.refs.bound(new_start_vnode)?;
				let before = self.refs.previous(&old_start_vnode)?;
				self.host.insert_before(parent, &moved, Some(&before))?;
				old_end -= 1;
				new_start += 1;
			} else if old_start_vnode.is_same(new_end_vnode) {
				self.patch_vnode(&old_start_vnode, new_end_vnode, inserted)?;
				let span = trace_span!("Moving old start after old end");
				let _enter = span.enter();
				let moved = self.refs.bound(new_end_vnode)?;
				let old_end_element = self.refs.previous(&old_end_vnode)?;
				let before = self.host.next_sibling(&old_end_element);
				self.host.insert_before(parent, &moved, before.as_ref())?;
				old_start += 1;
				new_end -= 1;
			} else {
				let old_key_to_index = old_key_to_index.get_or_insert_with(|| key_to_index(&old_ch[old_start..old_end], old_start));

				// Stale indices (matched from either end since the map was built, or tombstoned) count as misses.
				let reusable = new_start_vnode
					.key()
					.and_then(|key| old_key_to_index.get(key).copied())
					.filter(|index| (old_start..old_end).contains(index))
					.and_then(|index| old_ch[index].clone().map(|vnode| (index, vnode)))
					.filter(|(_, vnode)| vnode.is_same(new_start_vnode));

				let before = self.refs.previous(&old_start_vnode)?;
				match reusable {
					None => {
						let span = trace_span!("Creating unmatched node", key = ?new_start_vnode.key());
						let _enter = span.enter();
						let created = self.create_element(new_start_vnode, inserted)?;
						self.host.insert_before(parent, &created, Some(&before))?;
					}
					Some((index, moved)) => {
						let span = trace_span!("Moving keyed node", key = ?new_start_vnode.key(), index);
						let _enter = span.enter();
						self.patch_vnode(&moved, new_start_vnode, inserted)?;
						old_ch[index] = None;
						let element = self.refs.bound(new_start_vnode)?;
						self.host.insert_before(parent, &element, Some(&before))?;
					}
				}
				new_start += 1;
			}
		}

		if old_start >= old_end {
			// Everything after `new_end` is already in place. Skipped empty slots don't count.
			let before = match new_ch[new_end..].iter().flatten().next() {
				Some(vnode) => Some(self.refs.bound(vnode)?),
				None => None,
			};
			self.add_vnodes(parent, before.as_ref(), &new_ch[new_start..new_end], inserted)
		} else {
			self.remove_vnodes(parent, &old_ch, old_start..old_end)
		}
	}

	/// Updates `old`'s host node to match `vnode`. The two must be [same](`VNode::is_same`).
	#[instrument(level = "trace", skip_all, fields(sel = ?vnode.sel(), key = ?vnode.key()))]
	fn patch_vnode(&mut self, old: &Rc<VNode<H::Node>>, vnode: &Rc<VNode<H::Node>>, inserted: &mut InsertedQueue<H::Node>) -> Result<()> {
		let (prepatch, postpatch) = {
			let data = vnode.data();
			(data.hook.prepatch.clone(), data.hook.postpatch.clone())
		};
		if let Some(prepatch) = prepatch {
			let old_element = self.refs.previous(old)?;
			prepatch(old, vnode, &old_element).map_err(Error::Hook)?;
		}

		let element = self.refs.transfer(old, vnode)?;
		if Rc::ptr_eq(old, vnode) {
			trace!("Identical node. Skipping.");
			return Ok(());
		}

		if vnode.sel().is_some() {
			for update in &self.cbs.update {
				update(old, vnode, &element).map_err(Error::Hook)?;
			}
			let update = vnode.data().hook.update.clone();
			if let Some(update) = update {
				update(old, vnode, &element).map_err(Error::Hook)?;
			}
		}

		match vnode.text_content() {
			None => match (old.children(), vnode.children()) {
				(Some(old_ch), Some(ch)) => {
					if !Rc::ptr_eq(old_ch, ch) {
						self.update_children(&element, old_ch, ch, inserted)?;
					}
				}
				(None, Some(ch)) => {
					if old.text_content().is_some() {
						self.host.set_text_content(&element, "")?;
					}
					self.add_vnodes(&element, None, ch, inserted)?;
				}
				(Some(old_ch), None) => self.remove_vnodes(&element, old_ch, 0..old_ch.len())?,
				(None, None) => {
					if old.text_content().is_some() {
						self.host.set_text_content(&element, "")?;
					}
				}
			},
			Some(text) => {
				if old.text_content() != Some(text) {
					if let Some(old_ch) = old.children() {
						self.remove_vnodes(&element, old_ch, 0..old_ch.len())?;
					}
					trace!(text = ?redacted(text), "Setting text content.");
					self.host.set_text_content(&element, text)?;
				}
			}
		}

		if let Some(postpatch) = postpatch {
			postpatch(old, vnode, &element).map_err(Error::Hook)?;
		}
		Ok(())
	}
}

/// Maps keys to their index in the full child list. For duplicate keys, the last one wins.
fn key_to_index<N>(children: &Slots<N>, offset: usize) -> HashMap<Key, usize> {
	let mut map = HashMap::new();
	for (i, child) in children.iter().enumerate() {
		if let Some(key) = child.as_ref().and_then(|child| child.key()) {
			match map.entry(key.clone()) {
				Entry::Occupied(mut occupied) => {
					warn!(?key, "Duplicate sibling key. Only the last node with this key can be reused.");
					occupied.insert(offset + i);
				}
				Entry::Vacant(vacant) => {
					vacant.insert(offset + i);
				}
			}
		}
	}
	map
}

/// Page content as recorded in traces.
struct Redacted<'a>(&'a str);

fn redacted(text: &str) -> Redacted<'_> {
	Redacted(text)
}

impl Debug for Redacted<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			Debug::fmt(self.0, f)
		} else {
			write!(f, "<{} bytes>", self.0.len())
		}
	}
}
