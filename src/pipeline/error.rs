use std::fmt;
use thiserror::Error;

/// Stable numeric codes for every distinct validation or evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // $zip
    ZipNotDocument,
    ZipUnknownField,
    ZipMissingInput,
    ZipMissingAs,
    ZipMissingIn,
    ZipInputNotArray,
    ZipAsNotArray,
    ZipAsLengthMismatch,
    ZipInputLengthMismatch,
    ZipFirstInputNotArray,
    ZipLaterInputNotArray,

    // $range
    RangeNotArray,
    RangeStartNotNumber,
    RangeEndNotNumber,
    RangeEndNotInteger,
    RangeStepNotNumber,
    RangeStepZero,
    RangeTooLong,

    // Arithmetic
    AddNotNumeric,
    MultiplyNotNumeric,
    SubtractNotNumeric,
    WrongArgumentCount,

    // Expression structure
    OperatorObjectTooManyFields,
    UnrecognizedOperator,
    ExpressionTooDeep,
    FieldPathEmpty,
    FieldPathEmptyComponent,

    // Pipeline stages
    PipelineNotArray,
    StageNotSingleField,
    UnrecognizedStage,
    ProjectNotDocument,
    ProjectEmpty,
    ProjectMixedExclusion,

    // Variables
    VariableNameEmpty,
    VariableNameBadStart,
    VariableNameBadChar,
    UndefinedVariable,
}

impl ErrorCode {
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::ZipNotDocument => 28900,
            ErrorCode::ZipUnknownField => 28901,
            ErrorCode::ZipMissingInput => 28902,
            ErrorCode::ZipMissingAs => 28903,
            ErrorCode::ZipMissingIn => 28904,
            ErrorCode::ZipInputNotArray => 28905,
            ErrorCode::ZipAsNotArray => 28906,
            ErrorCode::ZipAsLengthMismatch => 28907,
            ErrorCode::ZipInputLengthMismatch => 28908,
            ErrorCode::ZipFirstInputNotArray => 28909,
            ErrorCode::ZipLaterInputNotArray => 28910,
            ErrorCode::RangeNotArray => 28667,
            ErrorCode::RangeStartNotNumber => 29050,
            ErrorCode::RangeEndNotNumber => 29051,
            ErrorCode::RangeEndNotInteger => 29052,
            ErrorCode::RangeStepNotNumber => 29053,
            ErrorCode::RangeStepZero => 29054,
            ErrorCode::RangeTooLong => 29055,
            ErrorCode::ExpressionTooDeep => 29056,
            ErrorCode::AddNotNumeric => 16554,
            ErrorCode::MultiplyNotNumeric => 16555,
            ErrorCode::SubtractNotNumeric => 16556,
            ErrorCode::WrongArgumentCount => 16020,
            ErrorCode::OperatorObjectTooManyFields => 15983,
            ErrorCode::UnrecognizedOperator => 15999,
            ErrorCode::FieldPathEmpty => 16872,
            ErrorCode::FieldPathEmptyComponent => 15998,
            ErrorCode::PipelineNotArray => 14,
            ErrorCode::StageNotSingleField => 40323,
            ErrorCode::UnrecognizedStage => 40324,
            ErrorCode::ProjectNotDocument => 15969,
            ErrorCode::ProjectEmpty => 51272,
            ErrorCode::ProjectMixedExclusion => 31254,
            ErrorCode::VariableNameEmpty => 16866,
            ErrorCode::VariableNameBadStart => 16867,
            ErrorCode::VariableNameBadChar => 16868,
            ErrorCode::UndefinedVariable => 17276,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while compiling or evaluating an expression
///
/// `InvalidExpression` is raised once, while the expression is compiled,
/// and never depends on document data. The remaining variants are raised
/// while evaluating one document and leave the compiled expression intact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// Malformed operator specification
    #[error("Invalid expression '{operator}': {message} (code {code})")]
    InvalidExpression {
        code: ErrorCode,
        operator: String,
        message: String,
    },

    /// An evaluated argument had the wrong type
    #[error("{}", type_error_message(.code, .operator, .message, .expected, .actual))]
    TypeError {
        code: ErrorCode,
        operator: String,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    },

    /// A configured resource limit was exceeded
    #[error("Limit exceeded in '{operator}': {message} (code {code})")]
    LimitExceeded {
        code: ErrorCode,
        operator: String,
        message: String,
    },
}

fn type_error_message(
    code: &ErrorCode,
    operator: &str,
    message: &str,
    expected: &Option<String>,
    actual: &Option<String>,
) -> String {
    match (expected, actual) {
        (Some(exp), Some(act)) => format!(
            "Type error in '{}': {} (expected {}, got {}) (code {})",
            operator, message, exp, act, code
        ),
        _ => format!("Type error in '{}': {} (code {})", operator, message, code),
    }
}

impl ExecutionError {
    /// Create an InvalidExpression error
    pub fn invalid_expression(
        code: ErrorCode,
        operator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidExpression {
            code,
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Create a TypeError error
    pub fn type_error(
        code: ErrorCode,
        operator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::TypeError {
            code,
            operator: operator.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Create a TypeError error with expected and actual types
    pub fn type_error_with_types(
        code: ErrorCode,
        operator: impl Into<String>,
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeError {
            code,
            operator: operator.into(),
            message: message.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Create a LimitExceeded error
    pub fn limit_exceeded(
        code: ErrorCode,
        operator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::LimitExceeded {
            code,
            operator: operator.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ExecutionError::InvalidExpression { code, .. }
            | ExecutionError::TypeError { code, .. }
            | ExecutionError::LimitExceeded { code, .. } => *code,
        }
    }

    /// Whether this error was raised while compiling rather than evaluating
    pub fn is_build_time(&self) -> bool {
        matches!(self, ExecutionError::InvalidExpression { .. })
    }
}
