use serde::{Deserialize, Serialize};

/// Drag model enum
///
/// `None` disables drag entirely and is mainly useful to check the solver
/// against the drag-free parabola.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DragModel {
    None,
    #[default]
    G1,
    G7,
}

impl DragModel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(DragModel::None),
            "G1" => Some(DragModel::G1),
            "G7" => Some(DragModel::G7),
            _ => None,
        }
    }
}

impl std::fmt::Display for DragModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_model_from_str() {
        assert_eq!(DragModel::from_str("None"), Some(DragModel::None));
        assert_eq!(DragModel::from_str("G1"), Some(DragModel::G1));
        assert_eq!(DragModel::from_str("G7"), Some(DragModel::G7));
    }

    #[test]
    fn test_drag_model_from_str_case_insensitive() {
        assert_eq!(DragModel::from_str("g1"), Some(DragModel::G1));
        assert_eq!(DragModel::from_str("g7"), Some(DragModel::G7));
        assert_eq!(DragModel::from_str("none"), Some(DragModel::None));
    }

    #[test]
    fn test_drag_model_from_str_invalid() {
        // No built-in tables for these families
        assert_eq!(DragModel::from_str("G2"), None);
        assert_eq!(DragModel::from_str("G8"), None);
        assert_eq!(DragModel::from_str(""), None);
        assert_eq!(DragModel::from_str("invalid"), None);
    }

    #[test]
    fn test_drag_model_display() {
        assert_eq!(format!("{}", DragModel::None), "None");
        assert_eq!(format!("{}", DragModel::G1), "G1");
        assert_eq!(format!("{}", DragModel::G7), "G7");
    }

    #[test]
    fn test_default_is_g1() {
        assert_eq!(DragModel::default(), DragModel::G1);
    }

    #[test]
    fn test_serde_round_names() {
        let json = serde_json::to_string(&DragModel::G7).unwrap();
        assert_eq!(json, "\"G7\"");
        let parsed: DragModel = serde_json::from_str("\"None\"").unwrap();
        assert_eq!(parsed, DragModel::None);
    }
}
