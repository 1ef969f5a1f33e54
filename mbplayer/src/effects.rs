use rand::seq::IndexedRandom;
use serde::Serialize;

/// Effet visuel affiché pendant un fondu.
///
/// Un effet est tiré au hasard au début de chaque fondu et reste affiché
/// quelques secondes après la fin de la rampe, puis la page revient à son
/// état normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualEffect {
    Lines,
    Circles,
    Galaxy,
    Particles,
    Waves,
}

impl VisualEffect {
    /// L'ensemble des effets disponibles.
    pub const ALL: [VisualEffect; 5] = [
        VisualEffect::Lines,
        VisualEffect::Circles,
        VisualEffect::Galaxy,
        VisualEffect::Particles,
        VisualEffect::Waves,
    ];

    /// Tire un effet uniformément au hasard.
    pub fn random() -> Self {
        Self::ALL
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(VisualEffect::Lines)
    }

    /// Nom de l'effet tel qu'exposé sur le fil d'événements.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualEffect::Lines => "lines",
            VisualEffect::Circles => "circles",
            VisualEffect::Galaxy => "galaxy",
            VisualEffect::Particles => "particles",
            VisualEffect::Waves => "waves",
        }
    }
}

impl std::fmt::Display for VisualEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_effect_is_known() {
        for _ in 0..100 {
            let effect = VisualEffect::random();
            assert!(VisualEffect::ALL.contains(&effect));
        }
    }

    #[test]
    fn test_effect_labels() {
        assert_eq!(VisualEffect::Galaxy.as_str(), "galaxy");
        assert_eq!(VisualEffect::Waves.to_string(), "waves");
    }

    #[test]
    fn test_effect_serializes_lowercase() {
        let json = serde_json::to_string(&VisualEffect::Particles).unwrap();
        assert_eq!(json, "\"particles\"");
    }
}
