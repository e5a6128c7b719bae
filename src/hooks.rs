//! Lifecycle callbacks, per module and per node.

use crate::{error::HookResult, remove::Remover, vnode::VNode};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

pub type PreHook = Rc<dyn Fn() -> HookResult>;
pub type PostHook = Rc<dyn Fn() -> HookResult>;
pub type InitHook<N> = Rc<dyn Fn(&VNode<N>) -> HookResult>;
/// `(empty, vnode, element)`. The first argument is always the [`VNode::empty`] placeholder.
pub type CreateHook<N> = Rc<dyn Fn(&VNode<N>, &VNode<N>, &N) -> HookResult>;
pub type InsertHook<N> = Rc<dyn Fn(&VNode<N>, &N) -> HookResult>;
pub type PrePatchHook<N> = Rc<dyn Fn(&VNode<N>, &VNode<N>, &N) -> HookResult>;
pub type UpdateHook<N> = Rc<dyn Fn(&VNode<N>, &VNode<N>, &N) -> HookResult>;
pub type PostPatchHook<N> = Rc<dyn Fn(&VNode<N>, &VNode<N>, &N) -> HookResult>;
pub type DestroyHook<N> = Rc<dyn Fn(&VNode<N>, &N) -> HookResult>;
/// The host node is detached once the [`Remover`] was acknowledged by every listener.
pub type RemoveHook<N> = Rc<dyn Fn(&VNode<N>, &N, Remover) -> HookResult>;

/// Callbacks scoped to a single node.
pub struct Hooks<N> {
	/// Runs before the node is materialized, and may rewrite its metadata via [`VNode::data_mut`].
	pub init: Option<InitHook<N>>,
	pub create: Option<CreateHook<N>>,
	/// Runs once the whole patch cycle attached the node.
	pub insert: Option<InsertHook<N>>,
	pub prepatch: Option<PrePatchHook<N>>,
	pub update: Option<UpdateHook<N>>,
	pub postpatch: Option<PostPatchHook<N>>,
	pub destroy: Option<DestroyHook<N>>,
	/// Replaces the immediate acknowledgement of the removal.
	pub remove: Option<RemoveHook<N>>,
}

impl<N> Default for Hooks<N> {
	fn default() -> Self {
		Self {
			init: None,
			create: None,
			insert: None,
			prepatch: None,
			update: None,
			postpatch: None,
			destroy: None,
			remove: None,
		}
	}
}

impl<N> Clone for Hooks<N> {
	fn clone(&self) -> Self {
		Self {
			init: self.init.clone(),
			create: self.create.clone(),
			insert: self.insert.clone(),
			prepatch: self.prepatch.clone(),
			update: self.update.clone(),
			postpatch: self.postpatch.clone(),
			destroy: self.destroy.clone(),
			remove: self.remove.clone(),
		}
	}
}

impl<N> Debug for Hooks<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hooks")
			.field("init", &self.init.is_some())
			.field("create", &self.create.is_some())
			.field("insert", &self.insert.is_some())
			.field("prepatch", &self.prepatch.is_some())
			.field("update", &self.update.is_some())
			.field("postpatch", &self.postpatch.is_some())
			.field("destroy", &self.destroy.is_some())
			.field("remove", &self.remove.is_some())
			.finish()
	}
}

impl<N> Hooks<N> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn on_init(mut self, hook: impl 'static + Fn(&VNode<N>) -> HookResult) -> Self {
		self.init = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_create(mut self, hook: impl 'static + Fn(&VNode<N>, &VNode<N>, &N) -> HookResult) -> Self {
		self.create = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_insert(mut self, hook: impl 'static + Fn(&VNode<N>, &N) -> HookResult) -> Self {
		self.insert = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_prepatch(mut self, hook: impl 'static + Fn(&VNode<N>, &VNode<N>, &N) -> HookResult) -> Self {
		self.prepatch = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_update(mut self, hook: impl 'static + Fn(&VNode<N>, &VNode<N>, &N) -> HookResult) -> Self {
		self.update = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_postpatch(mut self, hook: impl 'static + Fn(&VNode<N>, &VNode<N>, &N) -> HookResult) -> Self {
		self.postpatch = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_destroy(mut self, hook: impl 'static + Fn(&VNode<N>, &N) -> HookResult) -> Self {
		self.destroy = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_remove(mut self, hook: impl 'static + Fn(&VNode<N>, &N, Remover) -> HookResult) -> Self {
		self.remove = Some(Rc::new(hook));
		self
	}
}

/// A bag of optional phase callbacks, shared by all nodes a [`Patcher`](`crate::Patcher`) handles.
///
/// Modules may carry state by capturing it in their closures.
pub struct Module<N> {
	pub pre: Option<PreHook>,
	pub create: Option<CreateHook<N>>,
	pub update: Option<UpdateHook<N>>,
	pub destroy: Option<DestroyHook<N>>,
	pub remove: Option<RemoveHook<N>>,
	pub post: Option<PostHook>,
}

impl<N> Default for Module<N> {
	fn default() -> Self {
		Self {
			pre: None,
			create: None,
			update: None,
			destroy: None,
			remove: None,
			post: None,
		}
	}
}

impl<N> Debug for Module<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Module")
			.field("pre", &self.pre.is_some())
			.field("create", &self.create.is_some())
			.field("update", &self.update.is_some())
			.field("destroy", &self.destroy.is_some())
			.field("remove", &self.remove.is_some())
			.field("post", &self.post.is_some())
			.finish()
	}
}

impl<N> Module<N> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn on_pre(mut self, hook: impl 'static + Fn() -> HookResult) -> Self {
		self.pre = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_create(mut self, hook: impl 'static + Fn(&VNode<N>, &VNode<N>, &N) -> HookResult) -> Self {
		self.create = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_update(mut self, hook: impl 'static + Fn(&VNode<N>, &VNode<N>, &N) -> HookResult) -> Self {
		self.update = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_destroy(mut self, hook: impl 'static + Fn(&VNode<N>, &N) -> HookResult) -> Self {
		self.destroy = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_remove(mut self, hook: impl 'static + Fn(&VNode<N>, &N, Remover) -> HookResult) -> Self {
		self.remove = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_post(mut self, hook: impl 'static + Fn() -> HookResult) -> Self {
		self.post = Some(Rc::new(hook));
		self
	}
}

/// Module callbacks collected per phase, in module order.
pub(crate) struct ModuleHooks<N> {
	pub pre: Vec<PreHook>,
	pub create: Vec<CreateHook<N>>,
	pub update: Vec<UpdateHook<N>>,
	pub destroy: Vec<DestroyHook<N>>,
	pub remove: Vec<RemoveHook<N>>,
	pub post: Vec<PostHook>,
}

impl<N> ModuleHooks<N> {
	pub fn collect(modules: impl IntoIterator<Item = Module<N>>) -> Self {
		let mut hooks = Self {
			pre: Vec::new(),
			create: Vec::new(),
			update: Vec::new(),
			destroy: Vec::new(),
			remove: Vec::new(),
			post: Vec::new(),
		};
		for module in modules {
			hooks.pre.extend(module.pre);
			hooks.create.extend(module.create);
			hooks.update.extend(module.update);
			hooks.destroy.extend(module.destroy);
			hooks.remove.extend(module.remove);
			hooks.post.extend(module.post);
		}
		hooks
	}
}

impl<N> Debug for ModuleHooks<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModuleHooks")
			.field("pre", &self.pre.len())
			.field("create", &self.create.len())
			.field("update", &self.update.len())
			.field("destroy", &self.destroy.len())
			.field("remove", &self.remove.len())
			.field("post", &self.post.len())
			.finish()
	}
}
