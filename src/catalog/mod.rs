//! The registry of node types a graph may reference.
//!
//! A [`Catalog`] is built once, then shared read-only (usually behind an
//! `Arc`) by every execution. Several catalogs can coexist; nothing in the
//! crate keeps process-wide state.

use crate::error::CatalogError;
use ahash::AHashMap;
use std::sync::Arc;

mod node_type;
mod palette;
mod standard;

pub use node_type::{Args, DEFAULT_OUTPUT, NodeFault, NodeFn, NodeType, NodeTypeBuilder, Parameter};
pub use palette::{Palette, PaletteInput, PaletteNodeType, PaletteOutput};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: AHashMap<String, Arc<NodeType>>,
    // Registration order, kept for the palette.
    order: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// The built-in node library: arithmetic, comparison, logic, text and list
    /// operations.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        // An empty catalog has no name to collide with.
        if let Err(e) = standard::register_standard_types(&mut catalog) {
            log::error!("failed to register standard node types: {}", e);
        }
        catalog
    }

    pub fn register(&mut self, node_type: NodeType) -> Result<(), CatalogError> {
        let name = node_type.name().to_string();
        if self.types.contains_key(&name) {
            return Err(CatalogError::DuplicateType(name));
        }
        log::debug!("registered node type '{}'", name);
        self.types.insert(name.clone(), Arc::new(node_type));
        self.order.push(name);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&NodeType, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownType(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&NodeType> {
        self.types.get(name).map(Arc::as_ref)
    }

    pub(crate) fn get_shared(&self, name: &str) -> Option<Arc<NodeType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Node types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeType> {
        self.order.iter().filter_map(|name| self.get(name))
    }

    /// The serializable description the editor uses to populate its palette.
    pub fn palette(&self) -> Palette {
        Palette::from_catalog(self)
    }
}

/// Chains registrations, failing on the first duplicate or invalid type.
pub struct CatalogBuilder {
    catalog: Catalog,
    error: Option<CatalogError>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            error: None,
        }
    }

    /// Adds the standard library. A standard name that is already registered
    /// fails the build with `DuplicateType`.
    pub fn with_standard_types(mut self) -> Self {
        if self.error.is_none() {
            if let Err(e) = standard::register_standard_types(&mut self.catalog) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.catalog.register(node_type) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Registers the result of a [`NodeTypeBuilder`], recording its build error if any.
    pub fn with(mut self, builder: NodeTypeBuilder) -> Self {
        match builder.build() {
            Ok(node_type) => self.with_type(node_type),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.catalog),
        }
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
