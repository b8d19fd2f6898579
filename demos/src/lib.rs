// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared scaffolding for the Canopy demos: a synthetic "source tree"
//! standing in for the CSV/XML loaders that would populate a real one.

use canopy_tree::{Column, NodeId, NumericColumnId, StrColumnId, Tree, sum_weights};

/// Handles into the demo tree's attribute columns.
#[derive(Copy, Clone, Debug)]
pub struct DemoColumns {
    /// File size in bytes; the layout weight.
    pub size: NumericColumnId,
    /// File extension ("rs", "md", "toml").
    pub ext: StrColumnId,
    /// Display name.
    pub name: StrColumnId,
}

/// Build a small fake source tree:
///
/// ```text
/// repo/
///   src/        lib.rs(4000) tree.rs(9000) layout.rs(12000)
///   docs/       README.md(2500) DESIGN.md(1500)
///   Cargo.toml  (600)
/// ```
///
/// Returns the tree, its column handles, and the aggregated weight column.
pub fn demo_tree() -> (Tree, DemoColumns, Column<f64>) {
    let mut tree = Tree::new();
    let size = tree.add_numeric_column("size");
    let ext = tree.add_str_column("ext");
    let name = tree.add_str_column("name");
    let columns = DemoColumns { size, ext, name };

    let file = |tree: &mut Tree, parent: NodeId, file_name: &str, file_ext: &str, bytes: f64| {
        let id = tree.add_node(parent).expect("demo parents exist");
        tree.numeric_mut(size).expect("registered").set(id, bytes);
        tree.strs_mut(ext).expect("registered").set(id, file_ext.to_owned());
        tree.strs_mut(name).expect("registered").set(id, file_name.to_owned());
        id
    };

    let src = file(&mut tree, NodeId::ROOT, "src", "", 0.0);
    file(&mut tree, src, "lib.rs", "rs", 4000.0);
    file(&mut tree, src, "tree.rs", "rs", 9000.0);
    file(&mut tree, src, "layout.rs", "rs", 12000.0);

    let docs = file(&mut tree, NodeId::ROOT, "docs", "", 0.0);
    file(&mut tree, docs, "README.md", "md", 2500.0);
    file(&mut tree, docs, "DESIGN.md", "md", 1500.0);

    file(&mut tree, NodeId::ROOT, "Cargo.toml", "toml", 600.0);

    // Directories carry the sum of their files.
    let mut weights = tree
        .numeric(size)
        .expect("registered")
        .clone();
    let _ = sum_weights(&tree, &mut weights);

    (tree, columns, weights)
}

/// The display name of a node, for printing.
pub fn name_of(tree: &Tree, columns: DemoColumns, node: NodeId) -> String {
    tree.strs(columns.name)
        .and_then(|col| col.get(node))
        .cloned()
        .unwrap_or_else(|| "repo".to_owned())
}
