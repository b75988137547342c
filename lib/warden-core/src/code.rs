//! Application result codes carried in the envelope `code` field.
//!
//! Only [`SUCCESS`] means the call succeeded. Every other value is an
//! application error, whatever the HTTP status of the response.

/// The call succeeded.
pub const SUCCESS: i64 = 20_000;

/// The token was rejected by the server.
pub const ILLEGAL_TOKEN: i64 = 50_008;

/// The same account logged in from another client.
pub const OTHER_CLIENT_LOGGED_IN: i64 = 50_012;

/// The token expired.
pub const TOKEN_EXPIRED: i64 = 50_014;

/// Codes meaning the current session can no longer be used.
pub const SESSION_INVALID: [i64; 3] = [ILLEGAL_TOKEN, OTHER_CLIENT_LOGGED_IN, TOKEN_EXPIRED];

/// Returns `true` if `code` is the success sentinel.
#[must_use]
pub const fn is_success(code: i64) -> bool {
    code == SUCCESS
}

/// Returns `true` if `code` asks the user to log in again.
#[must_use]
pub fn is_session_invalid(code: i64) -> bool {
    SESSION_INVALID.contains(&code)
}
