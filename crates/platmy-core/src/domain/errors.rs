pub type PlatmyResult<T> = Result<T, PlatmyError>;
pub type ParserResult<T> = PlatmyResult<T>;
pub type BridgeResult<T> = PlatmyResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatmyErrorCategory {
    FormatError,
    ConfigurationError,
    IoError,
    ExecutionError,
    InternalError,
}

impl PlatmyErrorCategory {
    pub const fn exit_mapping(self) -> ExitMapping {
        match self {
            Self::FormatError => ExitMapping {
                exit_code: 2,
                category_name: "FormatError",
            },
            Self::ConfigurationError => ExitMapping {
                exit_code: 2,
                category_name: "ConfigurationError",
            },
            Self::IoError => ExitMapping {
                exit_code: 3,
                category_name: "IoError",
            },
            Self::ExecutionError => ExitMapping {
                exit_code: 4,
                category_name: "ExecutionError",
            },
            Self::InternalError => ExitMapping {
                exit_code: 5,
                category_name: "InternalError",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_mapping().exit_code
    }

    pub const fn category_name(self) -> &'static str {
        self.exit_mapping().category_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitMapping {
    pub exit_code: i32,
    pub category_name: &'static str,
}

/// Error shared by every stage of a model run.
///
/// `code` is a stable dotted identifier (`FORMAT.ABUND_HEADER`) that tests and
/// log filters can match on without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} [{code}] {message}", .category.category_name())]
pub struct PlatmyError {
    category: PlatmyErrorCategory,
    code: &'static str,
    message: String,
}

impl PlatmyError {
    pub fn new(
        category: PlatmyErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn format(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatmyErrorCategory::FormatError, code, message)
    }

    pub fn configuration(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatmyErrorCategory::ConfigurationError, code, message)
    }

    pub fn io(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatmyErrorCategory::IoError, code, message)
    }

    pub fn execution(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatmyErrorCategory::ExecutionError, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatmyErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> PlatmyErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{PlatmyError, PlatmyErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (PlatmyErrorCategory::FormatError, 2, "FormatError"),
            (PlatmyErrorCategory::ConfigurationError, 2, "ConfigurationError"),
            (PlatmyErrorCategory::IoError, 3, "IoError"),
            (PlatmyErrorCategory::ExecutionError, 4, "ExecutionError"),
            (PlatmyErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, name) in cases {
            let mapping = category.exit_mapping();
            assert_eq!(mapping.exit_code, exit_code);
            assert_eq!(mapping.category_name, name);
        }
    }

    #[test]
    fn error_renders_category_code_and_message() {
        let error = PlatmyError::format("FORMAT.ABUND_HEADER", "bad column index 'x1' in slot 0");

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.to_string(),
            "FormatError [FORMAT.ABUND_HEADER] bad column index 'x1' in slot 0"
        );
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [FORMAT.ABUND_HEADER] bad column index 'x1' in slot 0"
        );
    }
}
