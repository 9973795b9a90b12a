use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripts and front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DirectoryParse,
    UnknownGroup,
    UnknownMember,
    StateReadFailed,
    StateWriteFailed,
    ExportFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DirectoryParse => "E1002",
            Self::UnknownGroup => "E2001",
            Self::UnknownMember => "E2002",
            Self::StateReadFailed => "E3001",
            Self::StateWriteFailed => "E3002",
            Self::ExportFailed => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DirectoryParse => "Roster file parse error",
            Self::UnknownGroup => "Group not found",
            Self::UnknownMember => "Member not found in the selected group",
            Self::StateReadFailed => "Saved form state could not be read",
            Self::StateWriteFailed => "Form state could not be saved",
            Self::ExportFailed => "Export action failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in ~/.config/cameko/config.toml and retry."),
            Self::DirectoryParse => Some("Check the [[groups]] tables in the roster file."),
            Self::UnknownGroup => Some("Run `cameko groups` to list known groups."),
            Self::UnknownMember => Some("Run `cameko members` to list the selected group's members."),
            Self::StateReadFailed => Some("Run `cameko reset` to start from a clean form."),
            Self::StateWriteFailed => Some("Check disk space and write permissions."),
            Self::ExportFailed => Some("Copy the text from `cameko show` manually."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum CamekoError {
    #[error("unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("{member} is not a member of {group}")]
    UnknownMember { group: String, member: String },

    #[error("failed to parse roster {}: {source}", path.display())]
    DirectoryParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read saved state: {0}")]
    StateRead(#[source] std::io::Error),

    #[error("failed to write saved state: {0}")]
    StateWrite(#[source] std::io::Error),

    #[error("saved state is malformed: {0}")]
    StateDecode(#[from] serde_json::Error),

    #[error("export failed: {0}")]
    Export(String),
}

impl CamekoError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownGroup { .. } => ErrorCode::UnknownGroup,
            Self::UnknownMember { .. } => ErrorCode::UnknownMember,
            Self::DirectoryParse { .. } => ErrorCode::DirectoryParse,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::StateRead(_) | Self::StateDecode(_) => ErrorCode::StateReadFailed,
            Self::StateWrite(_) => ErrorCode::StateWriteFailed,
            Self::Export(_) => ErrorCode::ExportFailed,
            Self::Io { .. } => ErrorCode::InternalUnexpected,
        }
    }

    /// Remediation hint for the user, falling back to the generic message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CamekoError, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::DirectoryParse,
            ErrorCode::UnknownGroup,
            ErrorCode::UnknownMember,
            ErrorCode::StateReadFailed,
            ErrorCode::StateWriteFailed,
            ErrorCode::ExportFailed,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::UnknownMember.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unknown_group_maps_to_code_and_hint() {
        let err = CamekoError::UnknownGroup {
            name: "nope".into(),
        };
        assert_eq!(err.error_code(), ErrorCode::UnknownGroup);
        assert!(err.to_string().contains("nope"));
        assert!(err.suggestion().contains("cameko groups"));
    }
}
