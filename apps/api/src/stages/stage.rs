use serde::{Deserialize, Serialize};

/// Label a project carries once dialogue has been approved.
pub const FINAL_STAGE: &str = "final";

/// The creative stages, in the order a project moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Outline,
    Onepager,
    Screenplay,
    Script,
    Dialogue,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Outline,
        Stage::Onepager,
        Stage::Screenplay,
        Stage::Script,
        Stage::Dialogue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Outline => "outline",
            Stage::Onepager => "onepager",
            Stage::Screenplay => "screenplay",
            Stage::Script => "script",
            Stage::Dialogue => "dialogue",
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Outline => Some(Stage::Onepager),
            Stage::Onepager => Some(Stage::Screenplay),
            Stage::Screenplay => Some(Stage::Script),
            Stage::Script => Some(Stage::Dialogue),
            Stage::Dialogue => None,
        }
    }

    /// The stage whose approved text feeds this one.
    pub fn previous(self) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.next() == Some(self))
    }

    /// The project stage label after approving this stage.
    pub fn next_label(self) -> &'static str {
        self.next().map_or(FINAL_STAGE, Stage::as_str)
    }

    pub fn heading(self) -> &'static str {
        match self {
            Stage::Outline => "Outline",
            Stage::Onepager => "One-Pager",
            Stage::Screenplay => "Screenplay Beats",
            Stage::Script => "Script Pages",
            Stage::Dialogue => "Dialogue Pass",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_table() {
        assert_eq!(Stage::Outline.next_label(), "onepager");
        assert_eq!(Stage::Onepager.next_label(), "screenplay");
        assert_eq!(Stage::Screenplay.next_label(), "script");
        assert_eq!(Stage::Script.next_label(), "dialogue");
        assert_eq!(Stage::Dialogue.next_label(), FINAL_STAGE);
    }

    #[test]
    fn test_previous_inverts_next() {
        assert_eq!(Stage::Outline.previous(), None);
        for stage in Stage::ALL {
            if let Some(next) = stage.next() {
                assert_eq!(next.previous(), Some(stage));
            }
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let stage: Stage = serde_json::from_str(r#""onepager""#).unwrap();
        assert_eq!(stage, Stage::Onepager);
        assert_eq!(serde_json::to_string(&Stage::Script).unwrap(), r#""script""#);
        assert!(serde_json::from_str::<Stage>(r#""final""#).is_err());
    }
}
