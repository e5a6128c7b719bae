use crate::vnode::NodeId;

/// Errors returned by hook callbacks.
///
/// Anything implementing [`std::error::Error`] converts into this via `?`.
pub type HookError = Box<dyn std::error::Error>;

/// The result type of hook callbacks.
pub type HookResult = core::result::Result<(), HookError>;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Reasons a patch cycle (or a deferred removal) was aborted.
///
/// None of these are recovered from. The host tree is left exactly as far as the cycle got.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A module or per-node hook returned an error.
	#[error("hook failed: {0}")]
	Hook(HookError),

	#[error(transparent)]
	Host(#[from] HostError),

	/// A node was expected to own a host node, but was never created or was already released.
	#[error("no host node is bound to {0:?}")]
	Unbound(NodeId),

	/// A node was queued for its `insert` hook, but the hook was removed before the queue was drained.
	#[error("{0:?} was queued for insertion but has no `insert` hook anymore")]
	MissingInsertHook(NodeId),

	/// A [`Remover`](`crate::Remover`) was acknowledged more often than it has listeners.
	#[error("removal was acknowledged more often than there are listeners")]
	ExcessAcknowledgement,
}

/// A failed host tree operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("host operation `{operation}` failed: {message}")]
pub struct HostError {
	pub operation: &'static str,
	pub message: String,
}

impl HostError {
	#[must_use]
	pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
		Self {
			operation,
			message: message.into(),
		}
	}
}
