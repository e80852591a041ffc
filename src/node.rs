//! Render-descriptor model shared with the host renderer.
//!
//! A [`RenderNode`] describes what to render; it is distinct from the live
//! component instance it may carry. The cache core only ever reads nodes,
//! attaches shared instance handles to them, and asks evicted instances to
//! tear themselves down.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Live component instance owned by the host renderer.
///
/// The cache never creates instances; it only destroys the ones it evicts.
pub trait ComponentInstance {
    /// Tear the instance down, releasing whatever it holds.
    fn destroy(&mut self);
}

/// Shared single-threaded handle to a live instance.
pub type InstanceRef = Rc<RefCell<dyn ComponentInstance>>;

/// Identity and registration info for the component a node renders.
#[derive(Debug, Clone)]
pub struct ComponentLink {
    /// Constructor identity, shared by every node created from the same
    /// component registration
    pub ctor_id: u64,
    /// Name the component was declared with, if any
    pub declared_name: Option<String>,
    /// Local registration tag, if any
    pub tag: Option<String>,
}

/// A node in the render tree.
#[derive(Clone)]
pub struct RenderNode {
    /// Explicit identity key supplied by the host template
    pub key: Option<String>,
    /// Physical tag of the node as it appears in the on-screen tree
    pub tag: Option<String>,
    /// Present when the node renders a component rather than a plain element
    pub component: Option<ComponentLink>,
    /// Live instance, once one has been materialized for this node
    pub instance: Option<InstanceRef>,
    /// Tells the renderer to reuse the attached instance instead of
    /// creating a fresh one
    pub cache_backed: bool,
}

impl RenderNode {
    /// A plain (non-component) element node.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            key: None,
            tag: Some(tag.into()),
            component: None,
            instance: None,
            cache_backed: false,
        }
    }

    /// A component-bearing node, tagged the way host renderers label
    /// component nodes.
    pub fn component(link: ComponentLink) -> Self {
        let tag = match &link.tag {
            Some(tag) => format!("component-{}-{}", link.ctor_id, tag),
            None => format!("component-{}", link.ctor_id),
        };
        Self {
            key: None,
            tag: Some(tag),
            component: Some(link),
            instance: None,
            cache_backed: false,
        }
    }

    /// Attach an explicit identity key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl fmt::Debug for RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderNode")
            .field("key", &self.key)
            .field("tag", &self.tag)
            .field("component", &self.component)
            .field("instance", &self.instance.as_ref().map(|_| "<live>"))
            .field("cache_backed", &self.cache_backed)
            .finish()
    }
}

/// Resolved display name of the component a link points at: the declared
/// name, falling back to the registration tag.
pub fn component_name(link: &ComponentLink) -> Option<&str> {
    link.declared_name.as_deref().or(link.tag.as_deref())
}

/// Position of the first component-bearing child. This is the single
/// candidate a caching container evaluates per render pass.
pub fn first_component_child(children: &[RenderNode]) -> Option<usize> {
    children.iter().position(|child| child.component.is_some())
}

/// Cache identity for a candidate node.
///
/// An explicit key wins. Otherwise the constructor identity is combined
/// with the registration tag; two local registrations can share one
/// constructor, so the tag keeps their keys distinct. The tag segment is
/// omitted when absent so equivalent candidates resolve to the same key.
pub fn resolve_cache_key(node: &RenderNode, link: &ComponentLink) -> String {
    match &node.key {
        Some(key) => key.clone(),
        None => match &link.tag {
            Some(tag) => format!("{}::{}", link.ctor_id, tag),
            None => link.ctor_id.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(ctor_id: u64, declared_name: Option<&str>, tag: Option<&str>) -> ComponentLink {
        ComponentLink {
            ctor_id,
            declared_name: declared_name.map(str::to_string),
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn test_component_name_prefers_declared_name() {
        assert_eq!(
            component_name(&link(1, Some("Queue"), Some("queue-view"))),
            Some("Queue")
        );
        assert_eq!(component_name(&link(1, None, Some("queue-view"))), Some("queue-view"));
        assert_eq!(component_name(&link(1, None, None)), None);
    }

    #[test]
    fn test_first_component_child_skips_plain_elements() {
        let children = vec![
            RenderNode::element("div"),
            RenderNode::component(link(1, Some("Queue"), None)),
            RenderNode::component(link(2, Some("Library"), None)),
        ];
        assert_eq!(first_component_child(&children), Some(1));

        let plain = vec![RenderNode::element("div"), RenderNode::element("span")];
        assert_eq!(first_component_child(&plain), None);
        assert_eq!(first_component_child(&[]), None);
    }

    #[test]
    fn test_resolve_cache_key_explicit_key_wins() {
        let l = link(7, Some("Queue"), Some("queue-view"));
        let node = RenderNode::component(l.clone()).with_key("pinned");
        assert_eq!(resolve_cache_key(&node, &l), "pinned");
    }

    #[test]
    fn test_resolve_cache_key_composite() {
        let tagged = link(7, None, Some("queue-view"));
        let node = RenderNode::component(tagged.clone());
        assert_eq!(resolve_cache_key(&node, &tagged), "7::queue-view");

        let untagged = link(7, None, None);
        let node = RenderNode::component(untagged.clone());
        assert_eq!(resolve_cache_key(&node, &untagged), "7");
    }

    #[test]
    fn test_component_node_tags_are_distinct_per_registration() {
        let a = RenderNode::component(link(1, None, Some("queue-view")));
        let b = RenderNode::component(link(1, None, Some("library-view")));
        let c = RenderNode::component(link(2, None, None));

        assert_eq!(a.tag.as_deref(), Some("component-1-queue-view"));
        assert_ne!(a.tag, b.tag);
        assert_eq!(c.tag.as_deref(), Some("component-2"));
    }
}
