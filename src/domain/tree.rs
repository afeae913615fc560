// SPDX-License-Identifier: MIT OR Apache-2.0

//! The schema tree and its path resolver.
//!
//! The tree owns every leaf in an arena; containers hold ordered [`LeafId`]s.
//! [`SchemaTree::resolve`] never fails: unknown containers and leaves are appended
//! on the way down, after everything already declared. [`SchemaTree::find`] is the
//! strict counterpart and never changes the tree.
//!
//! Within one container, leaf names and child titles share a single key space in
//! the persisted document. A path whose new node would reuse a sibling's key (for
//! example `a.b.c` once `a.b` is a leaf) resolves to a detached leaf: it holds
//! values in memory like any other leaf but is never rendered.

use crate::domain::config_path::ConfigPath;
use crate::domain::form::{Form, FormElement, LeafId};
use crate::domain::serializer::format_key;

/// A container inside a loaded tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormNode {
    title: String,
    forms: Vec<FormNode>,
    elements: Vec<LeafId>,
}

impl FormNode {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// The container title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Child containers, in declaration order.
    pub fn forms(&self) -> &[FormNode] {
        &self.forms
    }

    /// Leaf handles, in declaration order.
    pub fn elements(&self) -> &[LeafId] {
        &self.elements
    }

    /// Returns `true` if the container has neither leaves nor children.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty() && self.elements.is_empty()
    }

    fn has_key(&self, key: &str, leaves: &[FormElement]) -> bool {
        self.forms.iter().any(|n| format_key(&n.title) == key)
            || self
                .elements
                .iter()
                .any(|id| leaves.get(id.0).is_some_and(|el| format_key(&el.name) == key))
    }
}

/// Ordered hierarchy of containers and leaf settings.
///
/// # Examples
///
/// ```
/// use formcfg::domain::form::{Form, FormElement};
/// use formcfg::domain::tree::SchemaTree;
/// use formcfg::domain::config_path::ConfigPath;
///
/// let mut tree = SchemaTree::new(vec![
///     Form::new("general").element(FormElement::new("port", "number").with_default(8334)),
/// ]);
///
/// let port = tree.resolve(&ConfigPath::from("general.port"));
/// assert_eq!(tree.leaf(port).unwrap().effective().as_int(), 8334);
///
/// // Unknown paths are created on demand
/// let id = tree.resolve(&ConfigPath::from("newsection.newkey"));
/// assert_eq!(tree.leaf(id).unwrap().kind, "text");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaTree {
    roots: Vec<FormNode>,
    leaves: Vec<FormElement>,
    detached: Vec<(String, LeafId)>,
}

impl SchemaTree {
    /// Loads a tree from declarative forms.
    pub fn new(forms: Vec<Form>) -> Self {
        let mut tree = Self::default();
        for form in forms {
            tree.push_form(form);
        }
        tree
    }

    /// Appends a top-level container after everything already present.
    pub fn push_form(&mut self, form: Form) {
        let node = self.load(form);
        self.roots.push(node);
    }

    fn load(&mut self, form: Form) -> FormNode {
        let mut node = FormNode::new(&form.title);
        for element in form.elements {
            let id = self.alloc(element, node.elements.len());
            node.elements.push(id);
        }
        for child in form.forms {
            let child = self.load(child);
            node.forms.push(child);
        }
        node
    }

    fn alloc(&mut self, mut element: FormElement, order: usize) -> LeafId {
        element.order = order;
        self.leaves.push(element);
        LeafId(self.leaves.len() - 1)
    }

    /// Top-level containers, in declaration order.
    pub fn roots(&self) -> &[FormNode] {
        &self.roots
    }

    /// Returns the leaf behind `id`.
    pub fn leaf(&self, id: LeafId) -> Option<&FormElement> {
        self.leaves.get(id.0)
    }

    /// Returns the leaf behind `id` for mutation.
    pub fn leaf_mut(&mut self, id: LeafId) -> Option<&mut FormElement> {
        self.leaves.get_mut(id.0)
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Resolves `path` to a leaf, creating missing containers and the leaf itself.
    ///
    /// Matching is by exact title/name, first match in declaration order. Created
    /// containers are empty and created leaves are bare `text` elements. A path that
    /// would reuse a sibling's document key gets a detached leaf instead.
    pub fn resolve(&mut self, path: &ConfigPath) -> LeafId {
        if let Some(id) = self.find(path) {
            return id;
        }

        let segments = path.segments();
        let (name, titles) = match segments.split_last() {
            Some((name, titles)) => (*name, titles),
            None => ("", &[][..]),
        };

        if self.collides(titles, name) {
            tracing::warn!(
                "Setting '{}' clashes with an existing key and will not be persisted",
                path
            );
            let id = self.alloc(FormElement::bare(name), 0);
            self.detached.push((Self::detached_key(path), id));
            return id;
        }

        tracing::debug!("Creating setting '{}' on first lookup", path);
        let node = Self::descend(&mut self.roots, titles);
        let order = node.elements.len();
        self.leaves.push(FormElement {
            order,
            ..FormElement::bare(name)
        });
        let id = LeafId(self.leaves.len() - 1);
        node.elements.push(id);
        id
    }

    /// Looks `path` up without creating anything.
    pub fn find(&self, path: &ConfigPath) -> Option<LeafId> {
        self.find_attached(path).or_else(|| {
            let key = Self::detached_key(path);
            self.detached
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, id)| *id)
        })
    }

    /// Returns `true` if `id` is a detached leaf, held in memory only.
    pub fn is_detached(&self, id: LeafId) -> bool {
        self.detached.iter().any(|(_, d)| *d == id)
    }

    fn find_attached(&self, path: &ConfigPath) -> Option<LeafId> {
        let segments = path.segments();
        let (name, titles) = segments.split_last()?;
        let (first, rest) = titles.split_first()?;

        let mut node = self.roots.iter().find(|n| n.title == *first)?;
        for title in rest {
            node = node.forms.iter().find(|n| n.title == *title)?;
        }
        node.elements
            .iter()
            .copied()
            .find(|id| self.leaf(*id).is_some_and(|el| el.name == *name))
    }

    // Walks the existing part of the path and reports whether the first node that
    // would be created shares a document key with one of its siblings.
    fn collides(&self, titles: &[&str], name: &str) -> bool {
        let (first, rest) = match titles.split_first() {
            Some((first, rest)) => (*first, rest),
            None => ("", &[][..]),
        };
        let mut node = match self.roots.iter().find(|n| n.title == first) {
            Some(node) => node,
            None => {
                let key = format_key(first);
                return self.roots.iter().any(|n| format_key(&n.title) == key);
            }
        };
        for title in rest {
            match node.forms.iter().find(|n| n.title == *title) {
                Some(child) => node = child,
                None => return node.has_key(&format_key(title), &self.leaves),
            }
        }
        node.has_key(&format_key(name), &self.leaves)
    }

    fn detached_key(path: &ConfigPath) -> String {
        ConfigPath::join(&path.segments()).into_string()
    }

    /// Lists every leaf with its path, depth first in declaration order.
    pub fn entries(&self) -> Vec<(ConfigPath, LeafId)> {
        let mut out = Vec::with_capacity(self.leaves.len());
        for root in &self.roots {
            self.collect(root, &mut vec![root.title.as_str()], &mut out);
        }
        out
    }

    fn collect<'a>(
        &'a self,
        node: &'a FormNode,
        prefix: &mut Vec<&'a str>,
        out: &mut Vec<(ConfigPath, LeafId)>,
    ) {
        for id in &node.elements {
            if let Some(el) = self.leaf(*id) {
                prefix.push(&el.name);
                out.push((ConfigPath::join(prefix), *id));
                prefix.pop();
            }
        }
        for child in &node.forms {
            prefix.push(&child.title);
            self.collect(child, prefix, out);
            prefix.pop();
        }
    }

    fn descend<'a>(roots: &'a mut Vec<FormNode>, titles: &[&str]) -> &'a mut FormNode {
        let (first, rest) = match titles.split_first() {
            Some((first, rest)) => (*first, rest),
            None => ("", &[][..]),
        };
        let mut node = Self::child(roots, first);
        for title in rest {
            node = Self::child(&mut node.forms, title);
        }
        node
    }

    fn child<'a>(level: &'a mut Vec<FormNode>, title: &str) -> &'a mut FormNode {
        let index = match level.iter().position(|n| n.title == title) {
            Some(index) => index,
            None => {
                level.push(FormNode::new(title));
                level.len() - 1
            }
        };
        &mut level[index]
    }
}
