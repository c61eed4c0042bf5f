// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Errors raised by set operations

use thiserror::Error;

/// Failure of a set-level operation
#[derive(Debug, Error)]
pub enum SetOpError {
    /// Subtracting two intersecting 3D surfaces that do not share a plane
    #[error("difference of non-coplanar surfaces is not supported: {first} minus {second}")]
    NonCoplanarSurfaces { first: String, second: String },

    /// The left operand is the whole space and the right one is not empty
    #[error("the complement of a non-empty set is unbounded")]
    UnboundedDifference,
}

pub type Result<T> = std::result::Result<T, SetOpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_both_operands() {
        let err = SetOpError::NonCoplanarSurfaces {
            first: "TRIANGLE((0 0 0,1 0 0,0 1 0,0 0 0))".into(),
            second: "TRIANGLE((0 0 0,1 0 1,0 1 1,0 0 0))".into(),
        };
        let message = err.to_string();
        assert!(message.contains("non-coplanar"));
        assert!(message.contains("1 0 1"));
    }
}
