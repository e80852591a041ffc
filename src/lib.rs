//! Single-active-child component caching for retained-mode render trees.
//!
//! A [`KeepAlive`] container sits between a host renderer and one slot of
//! its render tree. Each pass it evaluates the first component-bearing
//! child, caches eligible subtrees under a stable key, and hands back a
//! node that reuses the cached live instance instead of recreating it.
//! Name filters decide eligibility, and a recency-ordered bound keeps the
//! cache from growing without limit.
//!
//! The rendering engine, the reactivity system, and component
//! instantiation stay with the host; the crate consumes them through the
//! contracts in [`node`] and [`keeper`].

pub mod cache;
pub mod config;
pub mod keeper;
pub mod node;
pub mod pattern;

pub use cache::ComponentCache;
pub use config::{CacheOptions, MaxEntries};
pub use keeper::{FilterObserver, KeepAlive, Lifecycle};
pub use node::{
    ComponentInstance, ComponentLink, InstanceRef, RenderNode, component_name,
    first_component_child, resolve_cache_key,
};
pub use pattern::NamePattern;
