//! IDE integration registry.
//!
//! The build tool can generate project files for a fixed set of IDEs. When the
//! caller identifies itself as one of them, scaffolding calls pass `--ide` so
//! the new project opens cleanly in that editor.
//!
//! # Adding a new IDE
//!
//! Add its identifier to [`SUPPORTED_IDES`]. Nothing else changes.

/// IDE identifiers accepted by the build tool's `--ide` option.
pub const SUPPORTED_IDES: &[&str] = &[
    "atom",
    "clion",
    "codeblocks",
    "eclipse",
    "emacs",
    "netbeans",
    "qtcreator",
    "sublimetext",
    "vim",
    "visualstudio",
    "vscode",
];

/// Whether `caller_id` names an IDE the build tool can integrate with.
pub fn is_supported_ide(caller_id: &str) -> bool {
    SUPPORTED_IDES.contains(&caller_id)
}

/// `--ide <caller>` arguments for `caller_id`, or nothing.
pub fn ide_args(caller_id: Option<&str>) -> Vec<String> {
    match caller_id {
        Some(ide) if is_supported_ide(ide) => vec!["--ide".into(), ide.into()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ide_adds_flag() {
        assert_eq!(ide_args(Some("vscode")), vec!["--ide", "vscode"]);
    }

    #[test]
    fn unknown_or_missing_caller_adds_nothing() {
        assert!(ide_args(Some("browser")).is_empty());
        assert!(ide_args(Some("VSCode")).is_empty());
        assert!(ide_args(None).is_empty());
    }
}
