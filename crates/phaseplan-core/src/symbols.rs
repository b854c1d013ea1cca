//! Symbol dictionary seam.
//!
//! Symbol metadata belongs to the rendering collaborator. The session only
//! needs to know how a symbol's line geometry must be laid out, so the
//! dictionary is injected as a trait object rather than looked up globally.

use crate::{config::MissionConfig, models::DrawShape};

/// Symbol metadata needed by the phase-transition engine.
pub trait SymbolDictionary: Send + Sync {
    /// How control points for `symbol_code` must be laid out.
    fn draw_shape(&self, symbol_code: &str) -> DrawShape;
}

/// Classifies symbols as arrows by matching fragments of their code.
#[derive(Debug, Clone)]
pub struct PatternSymbolDictionary {
    arrow_patterns: Vec<String>,
}

impl PatternSymbolDictionary {
    /// Creates a dictionary that treats codes containing any of `patterns`
    /// as arrows.
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            arrow_patterns: patterns,
        }
    }

    /// Builds the dictionary from the configured arrow patterns.
    pub fn from_config(config: &MissionConfig) -> Self {
        Self::new(config.arrow_symbol_patterns.clone())
    }
}

impl Default for PatternSymbolDictionary {
    fn default() -> Self {
        Self::from_config(&MissionConfig::default())
    }
}

impl SymbolDictionary for PatternSymbolDictionary {
    fn draw_shape(&self, symbol_code: &str) -> DrawShape {
        if self
            .arrow_patterns
            .iter()
            .any(|pattern| symbol_code.contains(pattern.as_str()))
        {
            DrawShape::Arrow
        } else {
            DrawShape::Polyline
        }
    }
}
