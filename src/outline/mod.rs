use crate::heading::Heading;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a heading that is deeper than the top level but has no
/// shallower heading above it to hang from (an `h3` before any `h2`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Append it as a root entry.
    #[default]
    Root,
    /// Leave it out of the outline.
    Drop,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub heading: Heading,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn leaf(heading: Heading) -> Self {
        Self {
            heading,
            children: Vec::new(),
        }
    }
}

/// Nested outline of a page's headings, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutlineTree {
    roots: Vec<OutlineNode>,
}

impl OutlineTree {
    /// Build the outline in one pass over `headings`.
    ///
    /// `slots[d]` holds the index path of the most recent node at level
    /// `top_level + d`. A heading hangs from the nearest filled slot above
    /// its own depth; every slot below its depth is cleared once it lands.
    pub fn build(
        headings: impl IntoIterator<Item = Heading>,
        top_level: u8,
        orphans: OrphanPolicy,
    ) -> Self {
        let mut roots: Vec<OutlineNode> = Vec::new();
        let mut slots: Vec<Option<Vec<usize>>> = Vec::new();

        for heading in headings {
            let depth = heading.level.saturating_sub(top_level) as usize;
            if slots.len() <= depth {
                slots.resize(depth + 1, None);
            }

            let parent = slots[..depth].iter().rev().find_map(|s| s.clone());

            let path = match parent {
                Some(mut path) => {
                    let Some(parent) = node_at_mut(&mut roots, &path) else {
                        continue;
                    };
                    parent.children.push(OutlineNode::leaf(heading));
                    path.push(parent.children.len() - 1);
                    path
                }
                None if depth == 0 || orphans == OrphanPolicy::Root => {
                    roots.push(OutlineNode::leaf(heading));
                    vec![roots.len() - 1]
                }
                None => continue,
            };

            slots[depth] = Some(path);
            for slot in slots[depth + 1..].iter_mut() {
                *slot = None;
            }
        }

        Self { roots }
    }

    pub fn roots(&self) -> &[OutlineNode] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<OutlineNode> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of entries at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Pre-order walk yielding `(depth, node)`, roots at depth 0.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            stack: self.roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Ids from the root entry down to `id`, inclusive.
    pub fn trail(&self, id: &str) -> Option<Vec<String>> {
        fn walk(nodes: &[OutlineNode], id: &str, acc: &mut Vec<String>) -> bool {
            for n in nodes {
                acc.push(n.heading.id.clone());
                if n.heading.id == id || walk(&n.children, id, acc) {
                    return true;
                }
                acc.pop();
            }
            false
        }

        let mut acc = Vec::new();
        walk(&self.roots, id, &mut acc).then_some(acc)
    }

    /// [`Self::trail`] for every entry at once.
    pub fn trails(&self) -> HashMap<String, Vec<String>> {
        fn walk(nodes: &[OutlineNode], prefix: &mut Vec<String>, out: &mut HashMap<String, Vec<String>>) {
            for n in nodes {
                prefix.push(n.heading.id.clone());
                out.insert(n.heading.id.clone(), prefix.clone());
                walk(&n.children, prefix, out);
                prefix.pop();
            }
        }

        let mut out = HashMap::new();
        walk(&self.roots, &mut Vec::new(), &mut out);
        out
    }
}

fn node_at_mut<'a>(roots: &'a mut [OutlineNode], path: &[usize]) -> Option<&'a mut OutlineNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for i in rest {
        node = node.children.get_mut(*i)?;
    }
    Some(node)
}

pub struct Preorder<'a> {
    stack: Vec<(usize, &'a OutlineNode)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a OutlineNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
