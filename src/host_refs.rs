use crate::{
	error::{Error, Result},
	vnode::{NodeId, VNode},
};
use hashbrown::HashMap;
use tracing::trace;

/// Which host node each live [`VNode`] owns.
///
/// Bound by creation, moved from old to new snapshot when a node is reused, released on removal.
///
/// A node shared between snapshots can be bound again while its old position is still to be removed.
/// The binding it had before is then kept aside until the end of the cycle,
/// so that the old tree is torn down with its own host nodes.
#[derive(Debug)]
pub(crate) struct HostRefs<N> {
	bound: HashMap<NodeId, N>,
	superseded: HashMap<NodeId, N>,
}

impl<N: Clone> HostRefs<N> {
	pub fn new() -> Self {
		Self {
			bound: HashMap::new(),
			superseded: HashMap::new(),
		}
	}

	/// Forgets bindings superseded during the previous (possibly aborted) cycle.
	pub fn begin_cycle(&mut self) {
		self.superseded.clear();
	}

	pub fn bind(&mut self, vnode: &VNode<N>, host_node: N) {
		if let Some(previous) = self.bound.insert(vnode.id(), host_node) {
			trace!(id = ?vnode.id(), "Rebound a node that already owned a host node.");
			self.superseded.entry(vnode.id()).or_insert(previous);
		}
	}

	pub fn get(&self, vnode: &VNode<N>) -> Option<&N> {
		self.bound.get(&vnode.id())
	}

	/// The host node `vnode` owns as part of the new snapshot.
	///
	/// # Errors
	///
	/// [`Error::Unbound`] iff `vnode` owns no host node.
	pub fn bound(&self, vnode: &VNode<N>) -> Result<N> {
		self.get(vnode).cloned().ok_or_else(|| Error::Unbound(vnode.id()))
	}

	/// The host node `vnode` owns as part of the old snapshot, which differs from [`Self::bound`] only if it was bound again during this cycle.
	///
	/// # Errors
	///
	/// [`Error::Unbound`] iff `vnode` owns no host node.
	pub fn previous(&self, vnode: &VNode<N>) -> Result<N> {
		self.superseded
			.get(&vnode.id())
			.or_else(|| self.bound.get(&vnode.id()))
			.cloned()
			.ok_or_else(|| Error::Unbound(vnode.id()))
	}

	/// Hands `old`'s host node over to `new`.
	///
	/// # Errors
	///
	/// [`Error::Unbound`] iff `old` owns no host node.
	pub fn transfer(&mut self, old: &VNode<N>, new: &VNode<N>) -> Result<N> {
		if old.id() == new.id() {
			return self.bound(new);
		}
		let host_node = self
			.superseded
			.remove(&old.id())
			.or_else(|| self.bound.remove(&old.id()))
			.ok_or_else(|| Error::Unbound(old.id()))?;
		self.bind(new, host_node.clone());
		Ok(host_node)
	}

	/// Forgets the old host nodes of `vnode` and all of its descendants.
	///
	/// Descendants that were bound again during this cycle keep their new binding.
	pub fn release_subtree(&mut self, vnode: &VNode<N>) {
		if self.superseded.remove(&vnode.id()).is_none() {
			self.bound.remove(&vnode.id());
		}
		for child in vnode.children().into_iter().flat_map(|children| children.iter()).flatten() {
			self.release_subtree(child);
		}
	}

	pub fn len(&self) -> usize {
		self.bound.len()
	}
}
