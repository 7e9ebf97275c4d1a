//! The `ProjectRequest` aggregate and its typestate builder.
//!
//! A `ProjectRequest` describes a project a caller wants created: where, on
//! which platform, and optionally for which board, framework and bundled
//! example. It arrives as JSON from a front end or is assembled in Rust with
//! [`ProjectRequest::builder`].
//!
//! # Typestate builder
//!
//! The builder uses two phantom marker types (`NoPlatform` / `HasPlatform`) to
//! enforce at *compile time* that a platform is set before the request can be
//! built. Runtime validation (`validate`) still runs at `build()` for rules
//! the type system cannot express.
//!
//! # Domain purity
//!
//! This module must not import `tracing`.

use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::RelativePath,
    error::DomainError,
    value_objects::VersionPin,
};

// ── Aggregate root ────────────────────────────────────────────────────────────

/// Parameters of a project to scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub location: PathBuf,
    pub name: String,
    pub platform: PlatformRef,
    #[serde(default)]
    pub board: Option<BoardSelection>,
    #[serde(default)]
    pub framework: Option<FrameworkSelection>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example: Option<ExampleRequest>,
}

/// Platform the new project builds with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRef {
    pub name: String,
    pub version: String,
    /// Set by front ends that know the selected release is a pre-release.
    #[serde(default)]
    pub prerelease: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSelection {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSelection {
    pub name: String,
}

/// A bundled example to materialize instead of the default sample code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRequest {
    pub name: String,
    pub files: Vec<ExampleFile>,
}

/// One file of a bundled example: where it goes and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleFile {
    pub path: String,
    pub url: String,
}

impl ExampleFile {
    pub fn relative_path(&self) -> Result<RelativePath, DomainError> {
        RelativePath::try_new(&self.path)
    }
}

impl ProjectRequest {
    /// Start building a new `ProjectRequest`.
    pub fn builder() -> ProjectRequestBuilder<NoPlatform> {
        ProjectRequestBuilder::new()
    }

    /// Directory the project is created in: `location/name`.
    pub fn project_dir(&self) -> PathBuf {
        self.location.join(&self.name)
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board
            .as_ref()
            .map(|b| b.id.trim())
            .filter(|id| !id.is_empty())
    }

    pub fn framework_name(&self) -> Option<&str> {
        self.framework
            .as_ref()
            .map(|f| f.name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Name of the single environment a fresh project gets.
    ///
    /// The board id when one was chosen, otherwise the platform name.
    pub fn env_name(&self) -> &str {
        self.board_id().unwrap_or(&self.platform.name)
    }

    /// The `platform` option value, pinned per [`VersionPin::for_version`].
    pub fn platform_pin(&self) -> String {
        VersionPin::for_version(&self.platform.version, self.platform.prerelease)
            .render(&self.platform.name, &self.platform.version)
    }

    /// Options written into the new environment, in emission order.
    pub fn project_options(&self) -> Vec<(&'static str, String)> {
        let mut options = Vec::new();
        if let Some(description) = self.description() {
            options.push(("description", description.to_string()));
        }
        options.push(("platform", self.platform_pin()));
        if let Some(board) = self.board_id() {
            options.push(("board", board.to_string()));
        }
        if let Some(framework) = self.framework_name() {
            options.push(("framework", framework.to_string()));
        }
        options
    }

    /// Validate this request's internal consistency.
    ///
    /// Called automatically by the builder. Requests deserialized from JSON
    /// must be validated explicitly.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.location.as_os_str().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "location" });
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        if name == "." {
            return Err(DomainError::InvalidRequest(format!(
                "project name '{}' must name a directory below the location",
                self.name
            )));
        }
        // `group/blink` nests below the location; it must not leave it
        RelativePath::try_new(name)?;

        if self.platform.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "platform.name",
            });
        }

        if let Some(example) = &self.example {
            for file in &example.files {
                file.relative_path()?;
            }
        }

        Ok(())
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: platform has not yet been set.
pub struct NoPlatform;
/// Marker: platform has been set; the request can be built.
pub struct HasPlatform;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`ProjectRequest`].
pub struct ProjectRequestBuilder<P> {
    location: PathBuf,
    name: String,
    platform: Option<PlatformRef>,
    board: Option<String>,
    framework: Option<String>,
    description: Option<String>,
    example: Option<ExampleRequest>,
    _marker: PhantomData<P>,
}

impl ProjectRequestBuilder<NoPlatform> {
    pub fn new() -> Self {
        Self {
            location: PathBuf::new(),
            name: String::new(),
            platform: None,
            board: None,
            framework: None,
            description: None,
            example: None,
            _marker: PhantomData,
        }
    }

    /// Set the platform. Unlocks [`ProjectRequestBuilder::build`].
    pub fn platform(
        self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> ProjectRequestBuilder<HasPlatform> {
        ProjectRequestBuilder {
            location: self.location,
            name: self.name,
            platform: Some(PlatformRef {
                name: name.into(),
                version: version.into(),
                prerelease: false,
            }),
            board: self.board,
            framework: self.framework,
            description: self.description,
            example: self.example,
            _marker: PhantomData,
        }
    }
}

impl Default for ProjectRequestBuilder<NoPlatform> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ProjectRequestBuilder<P> {
    pub fn location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = location.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn board(mut self, id: impl Into<String>) -> Self {
        self.board = Some(id.into());
        self
    }

    pub fn framework(mut self, name: impl Into<String>) -> Self {
        self.framework = Some(name.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn example(mut self, example: ExampleRequest) -> Self {
        self.example = Some(example);
        self
    }
}

impl ProjectRequestBuilder<HasPlatform> {
    /// Mark the selected platform release as a pre-release.
    pub fn prerelease(mut self, prerelease: bool) -> Self {
        if let Some(platform) = self.platform.as_mut() {
            platform.prerelease = prerelease;
        }
        self
    }

    pub fn build(self) -> Result<ProjectRequest, DomainError> {
        let platform = self
            .platform
            .ok_or(DomainError::MissingRequiredField { field: "platform" })?;
        let request = ProjectRequest {
            location: self.location,
            name: self.name,
            platform,
            board: self.board.map(|id| BoardSelection { id }),
            framework: self.framework.map(|name| FrameworkSelection { name }),
            description: self.description,
            example: self.example,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ProjectRequestBuilder<HasPlatform> {
        ProjectRequest::builder()
            .location("/tmp/projects")
            .name("blink")
            .platform("espressif32", "6.1.0")
    }

    #[test]
    fn env_name_prefers_board() {
        let req = base().board("esp32dev").build().unwrap();
        assert_eq!(req.env_name(), "esp32dev");

        let req = base().build().unwrap();
        assert_eq!(req.env_name(), "espressif32");
    }

    #[test]
    fn options_follow_emission_order() {
        let req = base()
            .board("esp32dev")
            .framework("arduino")
            .description("Blinks")
            .build()
            .unwrap();
        let keys: Vec<_> = req.project_options().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["description", "platform", "board", "framework"]);
        assert_eq!(req.project_options()[1].1, "espressif32 @ ^6.1.0");
    }

    #[test]
    fn absent_fields_emit_platform_only() {
        let req = base().description("").build().unwrap();
        assert_eq!(
            req.project_options(),
            vec![("platform", "espressif32 @ ^6.1.0".to_string())]
        );
    }

    #[test]
    fn deserializes_front_end_shape() {
        let json = serde_json::json!({
            "location": "/tmp/p",
            "name": "demo",
            "platform": {"name": "atmelavr", "version": "4.2.0-beta.1"},
            "board": {"id": "uno"},
            "framework": {"name": "arduino"}
        });
        let req: ProjectRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.project_dir(), PathBuf::from("/tmp/p/demo"));
        assert_eq!(req.platform_pin(), "atmelavr @ 4.2.0-beta.1");
        assert!(req.example.is_none());
    }

    #[test]
    fn nested_name_creates_project_below_location() {
        let req = base().location("/work").name("boards/blink").build().unwrap();
        assert_eq!(req.project_dir(), PathBuf::from("/work/boards/blink"));
    }

    #[test]
    fn rejects_escaping_name_and_example_path() {
        assert!(matches!(
            base().name("../blink").build(),
            Err(DomainError::PathEscapesRoot { .. })
        ));
        assert!(matches!(
            base().name("/etc/blink").build(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(base().name(".").build().is_err());
        assert!(base().name("").build().is_err());

        let example = ExampleRequest {
            name: "bad".into(),
            files: vec![ExampleFile {
                path: "../outside.c".into(),
                url: "https://example.invalid/x".into(),
            }],
        };
        assert!(matches!(
            base().example(example).build(),
            Err(DomainError::PathEscapesRoot { .. })
        ));
    }
}
