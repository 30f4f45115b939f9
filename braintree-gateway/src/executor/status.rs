//! Operation table and status classification.
//!
//! Every gateway call names an [`Operation`]. The operation decides which
//! status counts as success and whether the call is allowed outside the
//! sandbox; [`classify`] turns a status into a [`StatusClass`] the executor
//! acts on. Resource gateways never look at status codes themselves.

use std::fmt;

/// What a gateway call does, independent of the resource it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a resource.
    Create,
    /// Fetch a resource by id.
    Find,
    /// Modify a resource.
    Update,
    /// Remove a resource.
    Delete,
    /// Queue an authorized transaction for capture.
    SubmitForSettlement,
    /// Cancel an unsettled transaction.
    Void,
    /// Force settlement of a transaction (sandbox only).
    Settle,
    /// Refund a settled transaction.
    Refund,
    /// Run an advanced search.
    Search,
}

/// Per-operation row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRule {
    /// The only status treated as success.
    pub expected_status: u16,
    /// Rejected locally when the environment is production.
    pub sandbox_only: bool,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Create,
        Self::Find,
        Self::Update,
        Self::Delete,
        Self::SubmitForSettlement,
        Self::Void,
        Self::Settle,
        Self::Refund,
        Self::Search,
    ];

    /// Looks up this operation's row.
    #[must_use]
    pub const fn rule(self) -> OperationRule {
        let (expected_status, sandbox_only) = match self {
            Self::Create | Self::Refund => (201, false),
            Self::Find
            | Self::Update
            | Self::Delete
            | Self::SubmitForSettlement
            | Self::Void
            | Self::Search => (200, false),
            Self::Settle => (200, true),
        };
        OperationRule { expected_status, sandbox_only }
    }

    /// Status treated as success.
    #[must_use]
    pub const fn expected_status(self) -> u16 {
        self.rule().expected_status
    }

    /// Returns true if the operation must never reach production.
    #[must_use]
    pub const fn sandbox_only(self) -> bool {
        self.rule().sandbox_only
    }

    /// Snake-case name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Find => "find",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::SubmitForSettlement => "submit_for_settlement",
            Self::Void => "void",
            Self::Settle => "settle",
            Self::Refund => "refund",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome class of a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The operation's expected status.
    Success,
    /// 401.
    AuthenticationFailure,
    /// 403.
    AuthorizationFailure,
    /// 404.
    NotFound,
    /// 422, with a structured error payload.
    ValidationFailure,
    /// 5xx.
    ServerError,
    /// Anything else, including a 2xx the operation does not document.
    UnexpectedStatus,
}

/// Classifies `status` for `operation`.
#[must_use]
pub const fn classify(operation: Operation, status: u16) -> StatusClass {
    if status == operation.expected_status() {
        return StatusClass::Success;
    }
    match status {
        401 => StatusClass::AuthenticationFailure,
        403 => StatusClass::AuthorizationFailure,
        404 => StatusClass::NotFound,
        422 => StatusClass::ValidationFailure,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::UnexpectedStatus,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_operation_table() {
        let table: Vec<(Operation, u16, bool)> = Operation::ALL
            .iter()
            .map(|op| (*op, op.expected_status(), op.sandbox_only()))
            .collect();
        assert_eq!(
            table,
            [
                (Operation::Create, 201, false),
                (Operation::Find, 200, false),
                (Operation::Update, 200, false),
                (Operation::Delete, 200, false),
                (Operation::SubmitForSettlement, 200, false),
                (Operation::Void, 200, false),
                (Operation::Settle, 200, true),
                (Operation::Refund, 201, false),
                (Operation::Search, 200, false),
            ]
        );
    }

    #[test]
    fn test_classify_failures() {
        assert_eq!(classify(Operation::Find, 401), StatusClass::AuthenticationFailure);
        assert_eq!(classify(Operation::Find, 403), StatusClass::AuthorizationFailure);
        assert_eq!(classify(Operation::Find, 404), StatusClass::NotFound);
        assert_eq!(classify(Operation::Create, 422), StatusClass::ValidationFailure);
        assert_eq!(classify(Operation::Void, 500), StatusClass::ServerError);
        assert_eq!(classify(Operation::Void, 503), StatusClass::ServerError);
    }

    #[test]
    fn test_undocumented_success_is_unexpected() {
        assert_eq!(classify(Operation::Create, 201), StatusClass::Success);
        assert_eq!(classify(Operation::Create, 200), StatusClass::UnexpectedStatus);
        assert_eq!(classify(Operation::Find, 201), StatusClass::UnexpectedStatus);
        assert_eq!(classify(Operation::Find, 302), StatusClass::UnexpectedStatus);
        assert_eq!(classify(Operation::Find, 409), StatusClass::UnexpectedStatus);
    }

    proptest! {
        #[test]
        fn prop_only_expected_status_succeeds(
            index in 0..Operation::ALL.len(),
            status in 100u16..600,
        ) {
            let operation = Operation::ALL[index];
            let class = classify(operation, status);
            prop_assert_eq!(class == StatusClass::Success, status == operation.expected_status());
        }
    }
}
