//! Shapes the engine's results for the UI boundary.
//!
//! The login and sign-up flows validate their input in a fixed order and
//! return a single user-facing message. Validation and duplicate problems
//! are recovered here into messages; storage failures are not swallowed
//! and propagate to the caller so the UI can present a retry state.

use crate::{
    Error,
    account::{AccountDirectory, MIN_PASSWORD_LENGTH},
    models::User,
    stores::UserStore,
};

/// The outcome of a login attempt.
///
/// On success `user` holds the authenticated account. The caller owns this
/// value and with it the session; logging out is dropping it. The engine
/// keeps no current-user state of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    /// Whether the login succeeded.
    pub success: bool,
    /// A user-facing message describing the outcome.
    pub message: String,
    /// The authenticated account, present only on success.
    pub user: Option<User>,
}

impl LoginResult {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            user: None,
        }
    }
}

/// The outcome of a sign-up attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupResult {
    /// Whether the account was created.
    pub success: bool,
    /// A user-facing message describing the outcome.
    pub message: String,
}

impl SignupResult {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// Attempt to log in with a `username` and `password`.
///
/// Empty fields short-circuit with a field-specific message before storage
/// is touched. A failed match reports "Invalid username or password"
/// without revealing which half was wrong.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error; bad input and bad
/// credentials are reported through the result, not as errors.
pub fn log_in<U: UserStore>(
    directory: &AccountDirectory<U>,
    username: &str,
    password: &str,
) -> Result<LoginResult, Error> {
    if username.trim().is_empty() {
        return Ok(LoginResult::failure("Username is required"));
    }
    if password.is_empty() {
        return Ok(LoginResult::failure("Password is required"));
    }

    match directory.authenticate(username, password)? {
        Some(user) => Ok(LoginResult {
            success: true,
            message: format!("Login successful! Welcome, {}", user.username()),
            user: Some(user),
        }),
        None => Ok(LoginResult::failure("Invalid username or password")),
    }
}

/// Attempt to create a new account.
///
/// Validation runs in a fixed order and the first failing rule wins:
/// username presence, username length bounds, username character set,
/// password presence, password length, password confirmation match, email
/// presence, email shape, username uniqueness, email uniqueness. Exactly
/// one message is returned per call.
///
/// The uniqueness pre-checks exist to produce field-specific messages; the
/// store's constraint check on insert remains authoritative, so a race
/// that slips past the pre-check still comes back as the same message.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn sign_up<U: UserStore>(
    directory: &mut AccountDirectory<U>,
    username: &str,
    password: &str,
    confirm_password: &str,
    email: &str,
) -> Result<SignupResult, Error> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() {
        return Ok(SignupResult::failure("Username is required"));
    }
    if username.len() < 3 {
        return Ok(SignupResult::failure(
            "Username must be at least 3 characters",
        ));
    }
    if username.len() > 20 {
        return Ok(SignupResult::failure(
            "Username must be less than 20 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Ok(SignupResult::failure(
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    if password.is_empty() {
        return Ok(SignupResult::failure("Password is required"));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Ok(SignupResult::failure(
            "Password must be at least 6 characters",
        ));
    }
    if password != confirm_password {
        return Ok(SignupResult::failure("Passwords do not match"));
    }

    if email.is_empty() {
        return Ok(SignupResult::failure("Email is required"));
    }
    if !has_email_shape(email) {
        return Ok(SignupResult::failure("Please enter a valid email address"));
    }

    if directory.username_exists(username)? {
        return Ok(SignupResult::failure("Username already taken"));
    }
    if directory.email_exists(email)? {
        return Ok(SignupResult::failure("Email already registered"));
    }

    match directory.register(username, password, email) {
        Ok(_) => Ok(SignupResult {
            success: true,
            message: "Account created successfully! Please log in.".to_string(),
        }),
        // A registration racing past the pre-checks loses to the storage
        // constraint and reports the same message.
        Err(Error::DuplicateUsername) => Ok(SignupResult::failure("Username already taken")),
        Err(Error::DuplicateEmail) => Ok(SignupResult::failure("Email already registered")),
        Err(
            Error::InvalidUsername(message)
            | Error::InvalidPassword(message)
            | Error::InvalidEmail(message),
        ) => Ok(SignupResult::failure(&message)),
        Err(error) => Err(error),
    }
}

/// Minimal `local@domain` shape check used by the sign-up flow.
///
/// Registration itself parses the address properly; this check only
/// decides which message the user sees first.
fn has_email_shape(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod session_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        account::AccountDirectory, db::CreateTable, stores::sqlite::SQLiteUserStore,
    };

    use super::{log_in, sign_up};

    fn get_directory() -> AccountDirectory<SQLiteUserStore> {
        let conn = Connection::open_in_memory().unwrap();
        SQLiteUserStore::create_table(&conn).unwrap();
        let store = SQLiteUserStore::new(Arc::new(Mutex::new(conn)));

        AccountDirectory::with_hash_cost(store, 4)
    }

    #[test]
    fn sign_up_then_log_in_round_trips() {
        let mut directory = get_directory();

        let signup = sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "hunter2hunter2",
            "frank@example.com",
        )
        .unwrap();

        assert!(signup.success, "sign up failed: {}", signup.message);
        assert_eq!(signup.message, "Account created successfully! Please log in.");

        let login = log_in(&directory, "frank", "hunter2hunter2").unwrap();

        assert!(login.success, "log in failed: {}", login.message);
        assert_eq!(login.message, "Login successful! Welcome, frank");
        assert_eq!(
            login.user.expect("no user returned").username().as_str(),
            "frank"
        );
    }

    #[test]
    fn log_in_requires_username_before_touching_storage() {
        let directory = get_directory();

        let result = log_in(&directory, "   ", "hunter2").unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Username is required");
    }

    #[test]
    fn log_in_requires_password() {
        let directory = get_directory();

        let result = log_in(&directory, "frank", "").unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Password is required");
    }

    #[test]
    fn log_in_does_not_reveal_which_credential_was_wrong() {
        let mut directory = get_directory();
        sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "hunter2hunter2",
            "frank@example.com",
        )
        .unwrap();

        let unknown_user = log_in(&directory, "nobody", "hunter2hunter2").unwrap();
        let wrong_password = log_in(&directory, "frank", "wrongwrong").unwrap();

        assert_eq!(unknown_user.message, "Invalid username or password");
        assert_eq!(wrong_password.message, "Invalid username or password");
    }

    #[test]
    fn sign_up_validation_order_first_failure_wins() {
        let mut directory = get_directory();

        // Several fields are invalid at once; the username message wins.
        let result = sign_up(&mut directory, "", "x", "y", "not-an-email").unwrap();
        assert_eq!(result.message, "Username is required");

        let result = sign_up(&mut directory, "ab", "x", "y", "not-an-email").unwrap();
        assert_eq!(result.message, "Username must be at least 3 characters");

        let result = sign_up(
            &mut directory,
            "this_name_is_far_too_long",
            "x",
            "y",
            "not-an-email",
        )
        .unwrap();
        assert_eq!(result.message, "Username must be less than 20 characters");

        let result = sign_up(&mut directory, "bad name", "x", "y", "not-an-email").unwrap();
        assert_eq!(
            result.message,
            "Username can only contain letters, numbers, and underscores"
        );

        let result = sign_up(&mut directory, "frank", "", "", "not-an-email").unwrap();
        assert_eq!(result.message, "Password is required");

        let result = sign_up(&mut directory, "frank", "12345", "12345", "not-an-email").unwrap();
        assert_eq!(result.message, "Password must be at least 6 characters");

        let result = sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "different",
            "not-an-email",
        )
        .unwrap();
        assert_eq!(result.message, "Passwords do not match");

        let result = sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "hunter2hunter2",
            "",
        )
        .unwrap();
        assert_eq!(result.message, "Email is required");

        let result = sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "hunter2hunter2",
            "not-an-email",
        )
        .unwrap();
        assert_eq!(result.message, "Please enter a valid email address");
    }

    #[test]
    fn sign_up_rejects_taken_username() {
        let mut directory = get_directory();
        sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "hunter2hunter2",
            "frank@example.com",
        )
        .unwrap();

        let result = sign_up(
            &mut directory,
            "frank",
            "hunter3hunter3",
            "hunter3hunter3",
            "other@example.com",
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Username already taken");
    }

    #[test]
    fn sign_up_rejects_registered_email() {
        let mut directory = get_directory();
        sign_up(
            &mut directory,
            "frank",
            "hunter2hunter2",
            "hunter2hunter2",
            "frank@example.com",
        )
        .unwrap();

        let result = sign_up(
            &mut directory,
            "not_frank",
            "hunter3hunter3",
            "hunter3hunter3",
            "frank@example.com",
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Email already registered");
    }

    #[test]
    fn sign_up_trims_username_and_email() {
        let mut directory = get_directory();

        let result = sign_up(
            &mut directory,
            "  frank  ",
            "hunter2hunter2",
            "hunter2hunter2",
            "  frank@example.com  ",
        )
        .unwrap();

        assert!(result.success, "sign up failed: {}", result.message);

        let login = log_in(&directory, "frank", "hunter2hunter2").unwrap();
        assert!(login.success);
    }
}
