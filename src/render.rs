use std::{collections::VecDeque, fmt::Display};

use crate::view::AvlNode;

/// A node queued for output, with its precomputed layout.
struct Entry<N> {
    node: N,
    depth: usize,

    /// The column the node value starts at.
    col: usize,

    /// The column and glyph of the edge joining this node to its parent.
    edge: Option<(usize, char)>,
}

/// Render the tree rooted at `root` as a text diagram.
///
/// Each level of the tree occupies one row of values (root first), with the
/// edges between two levels drawn in a row of `/` and `\` characters between
/// them. Each value is printed at the column it would occupy in an in-order
/// listing of the tree, so that a node sits between its two subtrees:
///
/// ```text
///    4
///   / \
///  2  5
/// / \  \
/// 1 3  6
/// ```
///
/// A tree of a single node renders as the value alone.
pub fn render<N>(root: &N) -> String
where
    N: AvlNode,
    N::Value: Display,
{
    let mut rows = Vec::new();
    let mut values = String::new();
    let mut edges = String::new();
    let mut depth = 0;

    let mut queue = VecDeque::from([Entry {
        col: width(root.left().as_ref()),
        node: root.clone(),
        depth: 0,
        edge: None,
    }]);

    // Visit the nodes breadth-first, emitting each level left to right.
    while let Some(e) = queue.pop_front() {
        if e.depth != depth {
            if !edges.is_empty() {
                rows.push(std::mem::take(&mut edges));
            }
            rows.push(std::mem::take(&mut values));
            depth = e.depth;
        }

        if let Some((col, glyph)) = e.edge {
            pad(&mut edges, col);
            edges.push(glyph);
        }

        let text = e.node.value().to_string();
        let len = text.chars().count();
        pad(&mut values, e.col);
        values.push_str(&text);

        if let Some(left) = e.node.left() {
            // The left child ends where its right subtree begins, which is
            // immediately before this node.
            let col = e
                .col
                .saturating_sub(text_width(left.value()) + width(left.right().as_ref()));
            queue.push_back(Entry {
                edge: Some((e.col.saturating_sub(1), '/')),
                col,
                node: left,
                depth: e.depth + 1,
            });
        }

        if let Some(right) = e.node.right() {
            let col = e.col + len + width(right.left().as_ref());
            queue.push_back(Entry {
                edge: Some((e.col + len, '\\')),
                col,
                node: right,
                depth: e.depth + 1,
            });
        }
    }

    if !edges.is_empty() {
        rows.push(edges);
    }
    rows.push(values);

    rows.join("\n")
}

/// Append spaces to `buf` until it is `col` characters wide.
fn pad(buf: &mut String, col: usize) {
    let n = col.saturating_sub(buf.chars().count());
    buf.push_str(&" ".repeat(n));
}

fn text_width<V: Display>(v: &V) -> usize {
    v.to_string().chars().count()
}

/// The printed width of the subtree rooted at `n`: the sum of the text
/// lengths of every value in it.
fn width<N>(n: Option<&N>) -> usize
where
    N: AvlNode,
    N::Value: Display,
{
    n.map(|n| {
        text_width(n.value()) + width(n.left().as_ref()) + width(n.right().as_ref())
    })
    .unwrap_or_default()
}
