//! Paths and trait implementations a source file mentions.

use std::collections::BTreeSet;

use syn::visit::{self, Visit};

/// Everything a file refers to, outside test-only modules.
#[derive(Debug, Default)]
pub(crate) struct References {
    /// Every path, split into segments; `use` trees are flattened.
    pub(crate) paths: BTreeSet<Vec<String>>,
    /// Last segment of every implemented trait.
    pub(crate) implemented_traits: BTreeSet<String>,
}

impl References {
    pub(crate) fn collect(file: &syn::File) -> Self {
        let mut references = Self::default();
        references.visit_file(file);
        references
    }

    fn flatten_use(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.flatten_use(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                let mut segments = prefix.clone();
                segments.push(ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Glob(_) => {
                if !prefix.is_empty() {
                    self.paths.insert(prefix.clone());
                }
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.flatten_use(item, prefix);
                }
            }
        }
    }
}

fn is_cfg_test(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

impl<'ast> Visit<'ast> for References {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_cfg_test(&node.attrs) {
            visit::visit_item_mod(self, node);
        }
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.flatten_use(&node.tree, &mut Vec::new());
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        if is_cfg_test(&node.attrs) {
            return;
        }
        if let Some(name) = node
            .trait_
            .as_ref()
            .and_then(|(_, path, _)| path.segments.last())
        {
            self.implemented_traits.insert(name.ident.to_string());
        }
        visit::visit_item_impl(self, node);
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        visit::visit_path(self, node);
    }
}
