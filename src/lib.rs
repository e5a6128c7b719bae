//! A keyed virtual DOM patcher.
//!
//! A [`Patcher`] takes the previous [`VNode`] snapshot and the next one and edits a live host tree (see [`HostApi`]) to match,
//! reusing host nodes wherever key and selector allow it, and calling [module](`Module`) and per-node [hooks](`Hooks`) along the way.
#![doc(html_root_url = "https://docs.rs/graft-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(all(doctest, feature = "web"))]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attributes;
mod diff;
mod error;
mod h;
pub mod hooks;
pub mod host;
mod host_refs;
pub mod load;
mod remove;
pub mod selector;
mod vnode;
#[cfg(feature = "web")]
pub mod web;

pub use diff::{Patcher, Target};
pub use error::{Error, HookError, HookResult, HostError, Result};
pub use h::{h, Builder, Child};
pub use hooks::{Hooks, Module};
pub use host::HostApi;
pub use remove::Remover;
pub use vnode::{Children, Extensions, Key, NodeId, VNode, VNodeData};
#[cfg(feature = "web")]
pub use web::{WebDom, WEB_DOM};
