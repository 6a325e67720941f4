use colored::*;
use gamedge_core::ErrorKind;
use std::error::Error as StdError;
use std::fmt;

/// CLI-specific error type with semantic exit codes
#[derive(Debug)]
pub struct CliError {
    /// The main error message
    message: String,

    /// Error category for exit code determination
    category: ErrorCategory,

    /// Additional context information
    context: Vec<(String, String)>,

    /// Suggestions for recovery
    pub suggestions: Vec<String>,

    /// Source error if any
    source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Error categories that map to exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCategory {
    General,
    Misuse,
    Network,
    NotFound,
}

/// Semantic exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Misuse = 2,
    NetworkError = 3,
    NotFound = 4,
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Extension trait for adding context to errors
pub trait ErrorContext {
    fn with_context(self, key: &str, value: &str) -> Self;
    fn with_suggestion(self, suggestion: &str) -> Self;
}

impl CliError {
    fn with_category(message: &str, category: ErrorCategory) -> Self {
        Self {
            message: message.to_string(),
            category,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Create a general error
    pub fn general(message: &str) -> Self {
        Self::with_category(message, ErrorCategory::General)
    }

    /// Create a command misuse error
    pub fn misuse(message: &str) -> Self {
        let mut error = Self::with_category(message, ErrorCategory::Misuse);
        error
            .suggestions
            .push("Run 'gamedge --help' for usage information".to_string());
        error
    }

    /// Misuse error for an unrecognised value, suggesting the closest known one
    pub fn unknown_value(what: &str, value: &str, known: &[&str]) -> Self {
        let mut error = Self::misuse(&format!("Unknown {what}: {value}"));
        if let Some(closest) = known
            .iter()
            .filter(|candidate| levenshtein_distance(value, candidate) <= 2)
            .min_by_key(|candidate| levenshtein_distance(value, candidate))
        {
            error
                .suggestions
                .insert(0, format!("Did you mean '{closest}'?"));
        }
        error
            .context
            .push(("expected".to_string(), known.join(", ")));
        error
    }

    /// Create a network error
    pub fn network(message: &str) -> Self {
        let mut error = Self::with_category(message, ErrorCategory::Network);
        error.suggestions = vec![
            "Check that remote.catalog_path points to a readable catalog".to_string(),
            "Check that remote.network_enabled is true".to_string(),
        ];
        error
    }

    /// Create a not found error
    pub fn not_found(message: &str) -> Self {
        let mut error = Self::with_category(message, ErrorCategory::NotFound);
        error
            .suggestions
            .push("Run a discovery or search to populate the local catalog".to_string());
        error
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.category {
            ErrorCategory::General => ExitCode::GeneralError,
            ErrorCategory::Misuse => ExitCode::Misuse,
            ErrorCategory::Network => ExitCode::NetworkError,
            ErrorCategory::NotFound => ExitCode::NotFound,
        }
    }

    fn label(&self) -> &'static str {
        match self.category {
            ErrorCategory::General => "Error",
            ErrorCategory::Misuse => "Usage Error",
            ErrorCategory::Network => "Network Error",
            ErrorCategory::NotFound => "Not Found",
        }
    }

    /// Format the error for user display
    pub fn format_for_user(&self, debug: bool) -> String {
        let mut output = String::new();

        let prefix = match self.category {
            ErrorCategory::Misuse | ErrorCategory::NotFound => self.label().yellow(),
            ErrorCategory::General | ErrorCategory::Network => self.label().red(),
        };
        output.push_str(&format!("{}: {}\n", prefix, self.message));

        if !self.context.is_empty() {
            output.push_str("\nContext:\n");
            for (key, value) in &self.context {
                output.push_str(&format!("  {}: {}\n", key.bold(), value));
            }
        }

        if debug && let Some(source) = &self.source {
            output.push_str("\nCaused by:\n");
            let mut current: Option<&dyn StdError> = Some(source.as_ref());
            let mut level = 1;

            while let Some(err) = current {
                output.push_str(&format!("  {level}: {err}\n"));
                current = err.source();
                level += 1;
            }
        }

        if !self.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                output.push_str(&format!("  - {suggestion}\n"));
            }
        }

        output
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.message)?;

        for (key, value) in &self.context {
            write!(f, " ({key}: {value})")?;
        }

        Ok(())
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl ErrorContext for CliError {
    fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestions.push(suggestion.to_string());
        self
    }
}

/// Classify core errors by kind
impl From<gamedge_core::Error> for CliError {
    fn from(error: gamedge_core::Error) -> Self {
        let message = error.to_string();
        let mut cli_error = match (&error, error.kind()) {
            (gamedge_core::Error::Validation(_), _) => Self::misuse(&message),
            (_, ErrorKind::NetworkUnavailable | ErrorKind::RemoteServiceError) => {
                Self::network(&message)
            }
            (_, ErrorKind::NotFound) => Self::not_found(&message),
            (_, ErrorKind::Unknown) => Self::general(&message),
        };
        cli_error.source = Some(Box::new(error));
        cli_error
    }
}

/// Convert anyhow errors to CLI errors
impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<gamedge_core::Error>() {
            Ok(core) => Self::from(core),
            Err(error) => Self::general(&format!("{error:#}")),
        }
    }
}

/// Simple Levenshtein distance for value suggestions
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();
    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate().take(len1 + 1) {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate().take(len2 + 1) {
        *cell = j;
    }

    for (i, c1) in s1_chars.iter().enumerate() {
        let i1 = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let j1 = j + 1;
            let cost = if c1 == c2 { 0 } else { 1 };
            matrix[i1][j1] = std::cmp::min(
                std::cmp::min(matrix[i][j1] + 1, matrix[i1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }

    matrix[len1][len2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamedge_core::error::{RemoteError, ValidationError};

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let cases = [
            (
                gamedge_core::Error::Remote(RemoteError::network_unavailable("offline")),
                ExitCode::NetworkError,
            ),
            (
                gamedge_core::Error::Remote(RemoteError::service_error(500, "boom")),
                ExitCode::NetworkError,
            ),
            (gamedge_core::Error::not_found("Game", 42), ExitCode::NotFound),
            (
                gamedge_core::Error::Validation(ValidationError::invalid_pagination("limit")),
                ExitCode::Misuse,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(CliError::from(error).exit_code(), expected);
        }
    }

    #[test]
    fn test_anyhow_wrapping_core_error_keeps_category() {
        let error = anyhow::Error::new(gamedge_core::Error::not_found("Game", 1));
        assert_eq!(CliError::from(error).exit_code(), ExitCode::NotFound);

        let error = anyhow::anyhow!("disk full");
        assert_eq!(CliError::from(error).exit_code(), ExitCode::GeneralError);
    }

    #[test]
    fn test_unknown_value_suggests_closest() {
        let error = CliError::unknown_value(
            "category",
            "populr",
            &["popular", "coming_soon", "all"],
        );
        assert_eq!(error.exit_code(), ExitCode::Misuse);
        assert_eq!(error.suggestions[0], "Did you mean 'popular'?");
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("news", "news"), 0);
    }
}
