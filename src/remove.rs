use crate::error::{Error, Result};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
};
use std::rc::Rc;
use tracing::{trace, trace_span};

type Detach = Box<dyn FnOnce() -> Result<()>>;

/// Counted acknowledgement of a pending removal.
///
/// Every module `remove` hook receives a clone, as does the node's own `remove` hook (if there is none, the patcher acknowledges in its place).
/// The host node is detached exactly once, when the last listener acknowledged.
/// Clones may be kept and acknowledged after the patch cycle returned, for example at the end of an exit transition.
#[derive(Clone)]
pub struct Remover(Rc<Pending>);

struct Pending {
	listeners: Cell<usize>,
	detach: RefCell<Option<Detach>>,
}

impl Remover {
	pub(crate) fn new(listeners: usize, detach: impl 'static + FnOnce() -> Result<()>) -> Self {
		Self(Rc::new(Pending {
			listeners: Cell::new(listeners),
			detach: RefCell::new(Some(Box::new(detach))),
		}))
	}

	/// Consents to the removal. Detaches the host node if this was the last outstanding acknowledgement.
	///
	/// # Errors
	///
	/// [`Error::ExcessAcknowledgement`] if all listeners have already acknowledged,
	/// or whatever the host reports when detaching.
	pub fn acknowledge(&self) -> Result<()> {
		let remaining = self.0.listeners.get().checked_sub(1).ok_or(Error::ExcessAcknowledgement)?;
		self.0.listeners.set(remaining);
		trace!(remaining, "Removal acknowledged.");

		if remaining == 0 {
			let detach = self.0.detach.borrow_mut().take();
			if let Some(detach) = detach {
				let span = trace_span!("Detaching removed node");
				let _enter = span.enter();
				detach()?;
			}
		}
		Ok(())
	}

	/// How many acknowledgements are still outstanding.
	#[must_use]
	pub fn pending(&self) -> usize {
		self.0.listeners.get()
	}

	#[must_use]
	pub fn is_detached(&self) -> bool {
		self.0.listeners.get() == 0
	}
}

impl Debug for Remover {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Remover").field("pending", &self.pending()).finish()
	}
}
