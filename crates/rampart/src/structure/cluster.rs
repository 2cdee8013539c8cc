//! Cluster tree: nested, named regions.
//!
//! Regions are opened and closed with strict LIFO discipline. While a region
//! is open, every node and region declared becomes its child; when no region
//! is open, declarations land in the implicit root. Children keep their
//! declaration order, which is also the order they are drawn in.
//!
//! Region handles are dense indices assigned in opening order. Because regions
//! nest lexically, that order is also the depth-first pre-order of the tree,
//! which is what makes [`ClusterTree::flatten`] and [`ClusterTree::renest`]
//! exact inverses.

use std::collections::HashSet;

use log::debug;

use rampart_core::identifier::Id;

use crate::error::BuildError;

/// Handle to a region, valid for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionHandle(usize);

impl RegionHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A child of a region or of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Node(Id),
    Region(RegionHandle),
}

/// A named region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    label: String,
    path: Id,
    parent: Option<RegionHandle>,
    children: Vec<Member>,
    closed: bool,
}

impl Region {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Path from the root, e.g. `VPC::Public Subnet`.
    pub fn path(&self) -> Id {
        self.path
    }

    pub fn parent(&self) -> Option<RegionHandle> {
        self.parent
    }

    pub fn children(&self) -> &[Member] {
        &self.children
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// One entry of a flattened tree: a member and the region it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatEntry {
    Node {
        key: Id,
        parent: Option<RegionHandle>,
    },
    Region {
        handle: RegionHandle,
        label: String,
        parent: Option<RegionHandle>,
    },
}

impl FlatEntry {
    pub fn parent(&self) -> Option<RegionHandle> {
        match self {
            FlatEntry::Node { parent, .. } | FlatEntry::Region { parent, .. } => *parent,
        }
    }
}

/// The region tree of one diagram, plus the stack of currently open regions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClusterTree {
    regions: Vec<Region>,
    root: Vec<Member>,
    open: Vec<RegionHandle>,
    siblings: HashSet<(Option<RegionHandle>, Id)>,
}

impl ClusterTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a region below the innermost open region (or the root).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateRegion`] if a sibling region with the
    /// same label exists, since its path from the root would not be unique.
    pub fn open_region(&mut self, label: &str) -> Result<RegionHandle, BuildError> {
        let parent = self.current();
        let path = self.claim(parent, label)?;

        let handle = RegionHandle(self.regions.len());
        self.regions.push(Region {
            label: label.to_string(),
            path,
            parent,
            children: Vec::new(),
            closed: false,
        });
        self.attach(Member::Region(handle));
        self.open.push(handle);

        debug!(path:%, depth = self.open.len(); "Region opened");
        Ok(handle)
    }

    /// Closes `handle`, which must be the innermost open region.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ScopeViolation`] if the handle is unknown, was
    /// already closed, or is not the innermost open region.
    pub fn close_region(&mut self, handle: RegionHandle) -> Result<(), BuildError> {
        let Some(region) = self.regions.get(handle.0) else {
            return Err(BuildError::ScopeViolation {
                region: format!("#{}", handle.0),
                reason: "handle does not belong to this diagram".to_string(),
            });
        };

        let path = region.path;
        if region.closed {
            return Err(BuildError::ScopeViolation {
                region: path.to_string(),
                reason: "region is already closed".to_string(),
            });
        }

        match self.open.last().copied() {
            Some(innermost) if innermost == handle => {
                self.open.pop();
                self.regions[handle.0].closed = true;
                debug!(path:%; "Region closed");
                Ok(())
            }
            Some(innermost) => Err(BuildError::ScopeViolation {
                region: path.to_string(),
                reason: format!(
                    "`{}` is still open inside it and must be closed first",
                    self.regions[innermost.0].path
                ),
            }),
            // A region that is neither closed nor on the stack cannot exist.
            None => Err(BuildError::ScopeViolation {
                region: path.to_string(),
                reason: "no region is open".to_string(),
            }),
        }
    }

    /// Records `key` as a child of the innermost open region and returns that
    /// region.
    pub fn attach_node(&mut self, key: Id) -> Option<RegionHandle> {
        self.attach(Member::Node(key));
        self.current()
    }

    /// Innermost open region, `None` when declarations go to the root.
    pub fn current(&self) -> Option<RegionHandle> {
        self.open.last().copied()
    }

    /// Outermost region that was opened and not yet closed.
    pub fn first_unclosed(&self) -> Option<&Region> {
        self.open.first().map(|handle| &self.regions[handle.0])
    }

    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    pub fn region(&self, handle: RegionHandle) -> Option<&Region> {
        self.regions.get(handle.0)
    }

    /// Looks a region up by its path from the root.
    pub fn find(&self, path: &str) -> Option<(RegionHandle, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .find(|(_, region)| region.path == path)
            .map(|(index, region)| (RegionHandle(index), region))
    }

    /// Regions in opening order.
    pub fn regions(&self) -> impl Iterator<Item = (RegionHandle, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(index, region)| (RegionHandle(index), region))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Top-level members in declaration order.
    pub fn root(&self) -> &[Member] {
        &self.root
    }

    /// Flattens the tree into depth-first, declaration-ordered entries that
    /// record each member's parent.
    pub fn flatten(&self) -> Vec<FlatEntry> {
        let mut entries = Vec::new();
        self.flatten_into(&self.root, None, &mut entries);
        entries
    }

    fn flatten_into(
        &self,
        members: &[Member],
        parent: Option<RegionHandle>,
        entries: &mut Vec<FlatEntry>,
    ) {
        for member in members {
            match *member {
                Member::Node(key) => entries.push(FlatEntry::Node { key, parent }),
                Member::Region(handle) => {
                    let region = &self.regions[handle.0];
                    entries.push(FlatEntry::Region {
                        handle,
                        label: region.label.clone(),
                        parent,
                    });
                    self.flatten_into(&region.children, Some(handle), entries);
                }
            }
        }
    }

    /// Rebuilds a closed tree from entries produced by [`ClusterTree::flatten`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ScopeViolation`] when an entry names a parent
    /// that has not appeared yet or a region handle out of sequence, and
    /// [`BuildError::DuplicateRegion`] for repeated sibling labels.
    pub fn renest(entries: &[FlatEntry]) -> Result<Self, BuildError> {
        let mut tree = ClusterTree::new();

        for entry in entries {
            let parent = entry.parent();
            if let Some(parent) = parent {
                if parent.0 >= tree.regions.len() {
                    return Err(BuildError::ScopeViolation {
                        region: format!("#{}", parent.0),
                        reason: "parent appears after its child".to_string(),
                    });
                }
            }

            match entry {
                FlatEntry::Node { key, .. } => tree.attach_to(parent, Member::Node(*key)),
                FlatEntry::Region { handle, label, .. } => {
                    if handle.0 != tree.regions.len() {
                        return Err(BuildError::ScopeViolation {
                            region: label.clone(),
                            reason: "region entries are out of order".to_string(),
                        });
                    }

                    let path = tree.claim(parent, label)?;

                    tree.regions.push(Region {
                        label: label.clone(),
                        path,
                        parent,
                        children: Vec::new(),
                        closed: true,
                    });
                    tree.attach_to(parent, Member::Region(*handle));
                }
            }
        }

        Ok(tree)
    }

    /// Reserves `label` among the children of `parent` and returns the
    /// region's display path.
    ///
    /// Uniqueness is keyed on the parent handle and the bare label, so a label
    /// containing `::` never collides with a nested path that prints the same.
    fn claim(&mut self, parent: Option<RegionHandle>, label: &str) -> Result<Id, BuildError> {
        let label_id = Id::new(label);
        let path = match parent {
            Some(parent) => self.regions[parent.0].path.create_nested(label_id),
            None => label_id,
        };

        if !self.siblings.insert((parent, label_id)) {
            return Err(BuildError::DuplicateRegion {
                path: path.to_string(),
            });
        }
        Ok(path)
    }

    fn attach(&mut self, member: Member) {
        let parent = match member {
            // A freshly opened region hangs off the region that was innermost
            // before it was pushed.
            Member::Region(handle) => self.regions[handle.0].parent,
            Member::Node(_) => self.current(),
        };
        self.attach_to(parent, member);
    }

    fn attach_to(&mut self, parent: Option<RegionHandle>, member: Member) {
        match parent {
            Some(parent) => self.regions[parent.0].children.push(member),
            None => self.root.push(member),
        }
    }
}
