use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a toast to the user.
    Notify(Notice),
    /// Publish a failed operation on the error channel.
    ReportFailure(OperationFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// The store operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchDocuments,
    UploadDocument,
    SelectDocument,
    QueryDocument,
    GenerateSummary,
    DeleteDocument,
    RefreshDocumentStatus,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::FetchDocuments => "fetch documents",
            Operation::UploadDocument => "upload document",
            Operation::SelectDocument => "select document",
            Operation::QueryDocument => "query document",
            Operation::GenerateSummary => "generate summary",
            Operation::DeleteDocument => "delete document",
            Operation::RefreshDocumentStatus => "refresh document status",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub operation: Operation,
    pub message: String,
}

impl OperationFailure {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}
