use serde::{Deserialize, Serialize};

use crate::domain::entities::package::BoardBrief;

/// Everything a front end needs to show about one build environment.
///
/// `board` and `frameworks` serialize as `null` when absent. An environment
/// with frameworks that all failed to resolve reports `null`, never `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    pub platform: PlatformInfo,
    pub board: Option<BoardBrief>,
    pub frameworks: Option<Vec<FrameworkInfo>>,
}

impl EnvironmentDescriptor {
    pub fn new(
        platform: PlatformInfo,
        board: Option<BoardBrief>,
        frameworks: Vec<FrameworkInfo>,
    ) -> Self {
        Self {
            platform,
            board,
            frameworks: (!frameworks.is_empty()).then_some(frameworks),
        }
    }
}

/// Identity of the platform an environment builds with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub ownername: Option<String>,
    pub name: String,
    pub title: String,
    pub version: String,
}

/// A framework that resolved to an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkInfo {
    pub name: String,
    pub title: Option<String>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> PlatformInfo {
        PlatformInfo {
            ownername: Some("platformio".into()),
            name: "atmelavr".into(),
            title: "Atmel AVR".into(),
            version: "4.2.0".into(),
        }
    }

    #[test]
    fn empty_framework_list_collapses_to_null() {
        let d = EnvironmentDescriptor::new(platform(), None, vec![]);
        assert_eq!(d.frameworks, None);

        let json = serde_json::to_value(&d).unwrap();
        assert!(json["frameworks"].is_null());
        assert!(json["board"].is_null());
    }

    #[test]
    fn resolved_frameworks_are_kept() {
        let d = EnvironmentDescriptor::new(
            platform(),
            None,
            vec![FrameworkInfo {
                name: "arduino".into(),
                title: Some("Arduino".into()),
                version: "5.2.0".into(),
            }],
        );
        assert_eq!(d.frameworks.as_ref().map(Vec::len), Some(1));
    }
}
