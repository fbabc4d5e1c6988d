//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// Errors caused by the client's own arguments never go away by reconnecting.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::InvalidArgument(_) | ClientError::InvalidUrl(_) | ClientError::Encode(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of reconnection attempts already made
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}
