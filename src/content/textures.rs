//! Texture handles and the loader contract.
//!
//! Tasks ask for textures by logical asset name and keep only the returned
//! [`TextureId`]. Decoding image files is the loader's business.

use std::collections::HashMap;

use crate::core::error::{OculoError, Result};
use crate::core::types::TextureId;

/// Logical asset names understood by the standard registry.
pub mod assets {
    pub const START_MARKER: &str = "start_marker0";
    pub const E_MARKER: &str = "general_e0";
    pub const WHITE_BOX: &str = "white0";
    pub const PLUS: &str = "general_plus0";
    pub const RECT: &str = "general_rect0";
    pub const H_BAR: &str = "general_h_bar0";
    pub const V_BAR: &str = "general_v_bar0";
    pub const T0: &str = "general_t0";
    pub const T1: &str = "general_t1";
    pub const L0: &str = "general_l0";
    pub const L1: &str = "general_l1";
    pub const R0: &str = "general_r0";
    pub const R1: &str = "general_r1";
    pub const S0: &str = "general_s0";
    pub const Z0: &str = "general_z0";
    pub const BALL: &str = "general_round0";
    pub const DOT: &str = "dot0";
    pub const ARROW_STRAIGHT: &str = "arrow0";
    pub const ARROW_DIAGONAL: &str = "arrow1";

    pub const ALL: [&str; 19] = [
        START_MARKER,
        E_MARKER,
        WHITE_BOX,
        PLUS,
        RECT,
        H_BAR,
        V_BAR,
        T0,
        T1,
        L0,
        L1,
        R0,
        R1,
        S0,
        Z0,
        BALL,
        DOT,
        ARROW_STRAIGHT,
        ARROW_DIAGONAL,
    ];
}

/// Resolves logical asset names to texture handles.
pub trait TextureLoader {
    fn load(&mut self, name: &str) -> Result<TextureId>;

    fn load_all(&mut self, names: &[&str]) -> Result<Vec<TextureId>> {
        names.iter().map(|name| self.load(name)).collect()
    }
}

/// In-memory loader handing out one stable id per known asset name.
#[derive(Debug, Clone)]
pub struct TextureRegistry {
    ids: HashMap<String, TextureId>,
    names: Vec<String>,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureRegistry {
    /// Registry pre-populated with the standard task assets.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for name in assets::ALL {
            registry.register(name);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Register an asset name, returning its (possibly existing) id.
    pub fn register(&mut self, name: &str) -> TextureId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = TextureId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    pub fn name_of(&self, id: TextureId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TextureLoader for TextureRegistry {
    fn load(&mut self, name: &str) -> Result<TextureId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| OculoError::UnknownTexture(name.to_string()))
    }
}
