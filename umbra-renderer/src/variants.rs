//! Shadow technique registry: discovers the interchangeable shadow-term
//! implementations exposed by the lit shader and tracks the active one.

use crate::error::RenderError;

/// A shadow technique implemented by the lit shader. The discriminant is the
/// activation token uploaded as the technique uniform; it must match the
/// dispatch switch in `shaders/lit.wgsl`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ShadowTechnique {
    Naive = 0,
    AdaptiveBias = 1,
    Pcf = 2,
}

impl ShadowTechnique {
    /// Shader function name that implements this technique.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Naive => "shadow_naive",
            Self::AdaptiveBias => "shadow_adaptive_bias",
            Self::Pcf => "shadow_pcf",
        }
    }

    fn from_marker(name: &str) -> Option<Self> {
        match name {
            "shadow_naive" => Some(Self::Naive),
            "shadow_adaptive_bias" => Some(Self::AdaptiveBias),
            "shadow_pcf" => Some(Self::Pcf),
            _ => None,
        }
    }
}

/// Ordered set of techniques found in the lit shader, plus the current
/// selection. Order follows source order and is opaque to callers; it is
/// logged at startup so the user knows which number key maps to which name.
pub struct TechniqueRegistry {
    techniques: Vec<ShadowTechnique>,
    current: usize,
}

impl TechniqueRegistry {
    /// Scan the lit shader source for `fn shadow_*` implementations of the
    /// dispatch point. An empty result is fatal: the lit pass cannot run
    /// without at least one technique.
    pub fn discover(lit_shader_source: &str) -> Result<Self, RenderError> {
        let mut techniques = Vec::new();
        for piece in lit_shader_source.split("fn ").skip(1) {
            let name = piece
                .split(|c: char| c == '(' || c.is_whitespace())
                .next()
                .unwrap_or("");
            if !name.starts_with("shadow_") {
                continue;
            }
            match ShadowTechnique::from_marker(name) {
                Some(t) if !techniques.contains(&t) => {
                    log::info!("shadow technique {}: {}", techniques.len(), name);
                    techniques.push(t);
                }
                Some(_) => {}
                None => log::warn!("unrecognized shadow technique marker: {}", name),
            }
        }
        if techniques.is_empty() {
            return Err(RenderError::NoTechniques);
        }
        Ok(Self {
            techniques,
            current: 0,
        })
    }

    /// Select by registry position. Out-of-range requests are silently
    /// ignored; the current selection stays valid by construction.
    pub fn select(&mut self, index: usize) {
        if index < self.techniques.len() && index != self.current {
            self.current = index;
            log::info!("current shadow technique: {}", self.active().marker());
        }
    }

    pub fn active(&self) -> ShadowTechnique {
        self.techniques[self.current]
    }

    /// Activation value for the technique uniform of the lit shader.
    pub fn token(&self) -> u32 {
        self.active() as u32
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Names in registry order, for diagnostics.
    pub fn names(&self) -> Vec<String> {
        self.techniques.iter().map(|t| t.marker().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIT_SHADER: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/lit.wgsl"));

    #[test]
    fn discovers_three_techniques_in_source_order() {
        let reg = TechniqueRegistry::discover(LIT_SHADER).unwrap();
        assert_eq!(
            reg.names(),
            vec!["shadow_naive", "shadow_adaptive_bias", "shadow_pcf"]
        );
    }

    #[test]
    fn select_then_token_round_trips_to_position() {
        let mut reg = TechniqueRegistry::discover(LIT_SHADER).unwrap();
        for i in 0..reg.len() {
            reg.select(i);
            let token = reg.token();
            let name = reg.names()[i].clone();
            assert_eq!(ShadowTechnique::from_marker(&name).unwrap() as u32, token);
        }
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut reg = TechniqueRegistry::discover(LIT_SHADER).unwrap();
        reg.select(1);
        let before = reg.token();
        reg.select(reg.len());
        assert_eq!(reg.token(), before);
        reg.select(usize::MAX);
        assert_eq!(reg.token(), before);
    }

    #[test]
    fn empty_source_is_fatal() {
        assert!(matches!(
            TechniqueRegistry::discover("fn fs() {}"),
            Err(RenderError::NoTechniques)
        ));
    }

    #[test]
    fn helper_functions_are_not_techniques() {
        let src = "fn slope_scaled_bias() {} fn shadow_naive() {} fn shadowy() {}";
        let reg = TechniqueRegistry::discover(src).unwrap();
        assert_eq!(reg.names(), vec!["shadow_naive"]);
    }
}
