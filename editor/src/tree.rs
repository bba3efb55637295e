//! Tree widget model
//!
//! Entries are addressed by string id and linked by id only, so the tree
//! never holds references into the scene it projects.

use std::collections::HashMap;
use tracing::debug;

/// Icon shown next to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Scene,
    Mesh,
    Light,
    Camera,
}

impl Icon {
    /// Style class used by the widget theme
    pub fn css_class(self) -> &'static str {
        match self {
            Icon::Scene => "icon-scene",
            Icon::Mesh => "icon-mesh",
            Icon::Light => "icon-light",
            Icon::Camera => "icon-camera",
        }
    }
}

/// Errors returned by tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Tree entry '{0}' not found")]
    NotFound(String),

    #[error("Tree entry '{0}' already exists")]
    DuplicateId(String),

    #[error("Cannot move '{id}' under '{parent}': it is the entry itself or one of its descendants")]
    Cycle { id: String, parent: String },
}

/// One entry of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry<T> {
    pub id: String,
    pub text: String,
    pub icon: Option<Icon>,
    pub payload: T,
    parent: Option<String>,
    children: Vec<String>,
    expanded: bool,
    selected: bool,
}

impl<T> TreeEntry<T> {
    /// Create a collapsed, unselected entry
    pub fn new(id: impl Into<String>, text: impl Into<String>, payload: T) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            icon: None,
            payload,
            parent: None,
            children: Vec::new(),
            expanded: false,
            selected: false,
        }
    }

    pub fn with_icon(mut self, icon: Option<Icon>) -> Self {
        self.icon = icon;
        self
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Arena-style tree keyed by entry id
#[derive(Debug, Clone)]
pub struct TreeView<T> {
    name: String,
    entries: HashMap<String, TreeEntry<T>>,
    roots: Vec<String>,
    selected: Option<String>,
    scroll_target: Option<String>,
    revision: u64,
}

impl<T> TreeView<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            roots: Vec::new(),
            selected: None,
            scroll_target: None,
            revision: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert `entry` as the last child of `parent`, or as a root
    pub fn add(&mut self, parent: Option<&str>, mut entry: TreeEntry<T>) -> Result<(), TreeError> {
        if self.entries.contains_key(&entry.id) {
            return Err(TreeError::DuplicateId(entry.id));
        }

        let id = entry.id.clone();
        match parent {
            Some(parent_id) => {
                let parent = self
                    .entries
                    .get_mut(parent_id)
                    .ok_or_else(|| TreeError::NotFound(parent_id.to_string()))?;
                parent.children.push(id.clone());
                entry.parent = Some(parent_id.to_string());
            }
            None => {
                self.roots.push(id.clone());
                entry.parent = None;
            }
        }

        entry.children.clear();
        entry.expanded = false;
        entry.selected = false;
        self.entries.insert(id, entry);
        self.revision += 1;
        Ok(())
    }

    /// Remove an entry and its whole subtree, returning the removed entries
    pub fn remove(&mut self, id: &str) -> Result<Vec<TreeEntry<T>>, TreeError> {
        if !self.entries.contains_key(id) {
            return Err(TreeError::NotFound(id.to_string()));
        }

        self.detach(id);
        let subtree = self.subtree_ids(id);
        let mut removed = Vec::with_capacity(subtree.len());
        for entry_id in subtree {
            if self.selected.as_deref() == Some(entry_id.as_str()) {
                self.selected = None;
            }
            if self.scroll_target.as_deref() == Some(entry_id.as_str()) {
                self.scroll_target = None;
            }
            if let Some(entry) = self.entries.remove(&entry_id) {
                removed.push(entry);
            }
        }

        self.revision += 1;
        debug!(tree = %self.name, id = id, count = removed.len(), "Removed tree entries");
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&TreeEntry<T>> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TreeEntry<T>> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Ancestors of `id`, closest first
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut result = Vec::new();
        let mut current = self.entries.get(id).and_then(|e| e.parent.clone());
        while let Some(parent) = current {
            current = self.entries.get(&parent).and_then(|e| e.parent.clone());
            result.push(parent);
        }
        result
    }

    /// True when every ancestor of `id` is expanded
    pub fn is_visible(&self, id: &str) -> bool {
        self.contains(id)
            && self
                .ancestors(id)
                .iter()
                .all(|ancestor| self.entries.get(ancestor).is_some_and(|e| e.expanded))
    }

    pub fn expand(&mut self, id: &str) -> Result<(), TreeError> {
        self.entry_mut(id)?.expanded = true;
        self.revision += 1;
        Ok(())
    }

    pub fn collapse(&mut self, id: &str) -> Result<(), TreeError> {
        self.entry_mut(id)?.expanded = false;
        self.revision += 1;
        Ok(())
    }

    /// Expand every ancestor of `id`
    pub fn expand_parents(&mut self, id: &str) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound(id.to_string()));
        }
        for ancestor in self.ancestors(id) {
            if let Some(entry) = self.entries.get_mut(&ancestor) {
                entry.expanded = true;
            }
        }
        self.revision += 1;
        Ok(())
    }

    /// Select `id`, unselecting the previous selection
    pub fn select(&mut self, id: &str) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound(id.to_string()));
        }
        if let Some(previous) = self.selected.take() {
            if let Some(entry) = self.entries.get_mut(&previous) {
                entry.selected = false;
            }
        }
        self.entry_mut(id)?.selected = true;
        self.selected = Some(id.to_string());
        self.revision += 1;
        Ok(())
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn scroll_into_view(&mut self, id: &str) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound(id.to_string()));
        }
        self.scroll_target = Some(id.to_string());
        Ok(())
    }

    pub fn scroll_target(&self) -> Option<&str> {
        self.scroll_target.as_deref()
    }

    /// Check that `id` can move under `parent` without changing anything
    pub fn check_reparent(&self, id: &str, parent: &str) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound(id.to_string()));
        }
        if !self.contains(parent) {
            return Err(TreeError::NotFound(parent.to_string()));
        }
        if id == parent || self.ancestors(parent).iter().any(|a| a == id) {
            return Err(TreeError::Cycle {
                id: id.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    /// Move `id` to the end of `parent`'s children
    pub fn reparent(&mut self, id: &str, parent: &str) -> Result<(), TreeError> {
        self.check_reparent(id, parent)?;

        self.detach(id);
        if let Some(entry) = self.entries.get_mut(parent) {
            entry.children.push(id.to_string());
        }
        self.entry_mut(id)?.parent = Some(parent.to_string());
        self.revision += 1;
        Ok(())
    }

    /// Change the key of an entry, keeping its position and links
    pub fn rename(&mut self, id: &str, new_id: &str) -> Result<(), TreeError> {
        if id == new_id {
            return if self.contains(id) {
                Ok(())
            } else {
                Err(TreeError::NotFound(id.to_string()))
            };
        }
        if self.contains(new_id) {
            return Err(TreeError::DuplicateId(new_id.to_string()));
        }
        let mut entry = self
            .entries
            .remove(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))?;
        entry.id = new_id.to_string();

        let siblings = match entry.parent.as_deref() {
            Some(parent) => self.entries.get_mut(parent).map(|p| &mut p.children),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings {
            for sibling in siblings.iter_mut().filter(|s| s.as_str() == id) {
                *sibling = new_id.to_string();
            }
        }
        for child in &entry.children {
            if let Some(child) = self.entries.get_mut(child) {
                child.parent = Some(new_id.to_string());
            }
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = Some(new_id.to_string());
        }
        if self.scroll_target.as_deref() == Some(id) {
            self.scroll_target = Some(new_id.to_string());
        }

        self.entries.insert(new_id.to_string(), entry);
        self.revision += 1;
        Ok(())
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), TreeError> {
        self.entry_mut(id)?.text = text.into();
        Ok(())
    }

    /// Ask observers to redraw
    pub fn refresh(&mut self) {
        self.revision += 1;
    }

    /// Counter bumped on every change, polled by whatever draws the tree
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Entries in depth-first order, siblings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry<T>> + '_ {
        let mut order = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<&String> = self.roots.iter().rev().collect();
        while let Some(id) = stack.pop() {
            if let Some(entry) = self.entries.get(id) {
                order.push(entry);
                stack.extend(entry.children.iter().rev());
            }
        }
        order.into_iter()
    }

    /// Depth of an entry, roots at zero
    pub fn depth(&self, id: &str) -> usize {
        self.ancestors(id).len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.roots.clear();
        self.selected = None;
        self.scroll_target = None;
        self.revision += 1;
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut TreeEntry<T>, TreeError> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    fn detach(&mut self, id: &str) {
        let parent = self.entries.get(id).and_then(|e| e.parent.clone());
        match parent {
            Some(parent) => {
                if let Some(parent) = self.entries.get_mut(&parent) {
                    parent.children.retain(|c| c != id);
                }
            }
            None => self.roots.retain(|r| r != id),
        }
    }

    fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut result = vec![id.to_string()];
        let mut index = 0;
        while index < result.len() {
            if let Some(entry) = self.entries.get(&result[index]) {
                result.extend(entry.children.iter().cloned());
            }
            index += 1;
        }
        result
    }
}
