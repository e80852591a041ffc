//! The caching container: per-render orchestration and lifecycle.
//!
//! One container owns one [`ComponentCache`]. The host renderer calls
//! [`KeepAlive::render`] once per pass with the rendered children, and the
//! host reactivity layer delivers filter changes through the
//! [`FilterObserver`] callbacks. Everything is synchronous; the host
//! guarantees one render or notification completes before the next begins.

use crate::cache::ComponentCache;
use crate::config::{CacheOptions, MaxEntries};
use crate::node::{RenderNode, component_name, first_component_child, resolve_cache_key};
use crate::pattern::NamePattern;
use log::{debug, trace, warn};

/// Lifecycle of a caching container. There is no state after `Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built, not yet receiving filter notifications
    Created,
    /// Mounted; filter changes reconcile the cache
    Active,
    /// Torn down; renders pass through untouched
    Destroyed,
}

/// Observer contract the host reactivity layer drives when a filter
/// configuration value changes. Invoked synchronously with the new value;
/// `None` means the filter was removed.
pub trait FilterObserver {
    fn include_changed(&mut self, value: Option<NamePattern>);
    fn exclude_changed(&mut self, value: Option<NamePattern>);
}

/// A caching container around a single active child.
///
/// Each render pass evaluates one candidate: the first component-bearing
/// child. Eligible candidates are cached under their resolved key so that
/// toggling between branches reuses live instances instead of recreating
/// them.
#[derive(Debug)]
pub struct KeepAlive {
    options: CacheOptions,
    cache: ComponentCache,
    state: Lifecycle,
    /// Physical tag of the node most recently handed to the renderer
    active_tag: Option<String>,
}

impl KeepAlive {
    /// Create a new container with an empty cache
    pub fn new(options: CacheOptions) -> Self {
        Self {
            options,
            cache: ComponentCache::new(),
            state: Lifecycle::Created,
            active_tag: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// The options this container was configured with
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Read access to the underlying cache, for stats and introspection
    pub fn cache(&self) -> &ComponentCache {
        &self.cache
    }

    /// Move the container into its active state. Filter change
    /// notifications reconcile the cache from here on.
    pub fn mount(&mut self) {
        if self.state == Lifecycle::Created {
            self.state = Lifecycle::Active;
            debug!("cache container mounted");
        }
    }

    /// Per-pass entry point: evaluate the rendered children and produce
    /// the node the renderer should materialize.
    ///
    /// The first component-bearing child is the candidate. Candidates that
    /// pass the include/exclude filters come back `cache_backed`, carrying
    /// the cached live instance on a hit. Anything else passes through
    /// untouched.
    pub fn render(&mut self, children: Vec<RenderNode>) -> Option<RenderNode> {
        if self.state == Lifecycle::Destroyed {
            warn!("render on a destroyed cache container, passing children through");
            return children.into_iter().next();
        }

        let rendered = self.render_candidate(children);
        self.active_tag = rendered.as_ref().and_then(|node| node.tag.clone());
        rendered
    }

    fn render_candidate(&mut self, mut children: Vec<RenderNode>) -> Option<RenderNode> {
        let Some(idx) = first_component_child(&children) else {
            // Nothing cacheable: pass the raw children through
            return children.into_iter().next();
        };
        let node = children.swap_remove(idx);
        let Some(link) = node.component.clone() else {
            return Some(node);
        };

        let name = component_name(&link);
        let not_included = self
            .options
            .include
            .as_ref()
            .is_some_and(|pattern| !name.is_some_and(|n| pattern.matches(n)));
        let excluded = self
            .options
            .exclude
            .as_ref()
            .is_some_and(|pattern| name.is_some_and(|n| pattern.matches(n)));
        if not_included || excluded {
            trace!("component {:?} bypasses the cache", name);
            return Some(node);
        }

        let key = resolve_cache_key(&node, &link);
        let max = self.options.max.as_ref().and_then(MaxEntries::bound);
        Some(self.cache.lookup_or_insert(key, node, max, self.active_tag.as_deref()))
    }

    /// Record the live instance the renderer created for a node this
    /// container handed back. Nodes the cache never stored are ignored.
    pub fn instance_created(&mut self, node: &RenderNode) {
        let Some(link) = &node.component else { return };
        let Some(instance) = &node.instance else { return };
        let key = resolve_cache_key(node, link);
        self.cache.attach_instance(&key, instance.clone());
    }

    /// Tear the container down, destroying every cached instance.
    ///
    /// Unlike filter-driven eviction there is no active-descriptor
    /// context here: the whole subtree is going away, so teardown is
    /// never suppressed.
    pub fn destroy(&mut self) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        self.cache.log_stats();
        self.cache.clear();
        self.active_tag = None;
        self.state = Lifecycle::Destroyed;
        debug!("cache container destroyed");
    }
}

impl FilterObserver for KeepAlive {
    /// New `include` value: entries whose name no longer matches are
    /// evicted. A removed filter evicts nothing.
    fn include_changed(&mut self, value: Option<NamePattern>) {
        if self.state != Lifecycle::Active {
            debug!("include change ignored while {:?}", self.state);
            return;
        }
        self.options.include = value;
        let include = self.options.include.clone();
        self.cache.reconcile(
            move |name| include.as_ref().is_none_or(|pattern| pattern.matches(name)),
            self.active_tag.as_deref(),
        );
    }

    /// New `exclude` value: entries whose name now matches are evicted.
    fn exclude_changed(&mut self, value: Option<NamePattern>) {
        if self.state != Lifecycle::Active {
            debug!("exclude change ignored while {:?}", self.state);
            return;
        }
        self.options.exclude = value;
        let exclude = self.options.exclude.clone();
        self.cache.reconcile(
            move |name| !exclude.as_ref().is_some_and(|pattern| pattern.matches(name)),
            self.active_tag.as_deref(),
        );
    }
}
