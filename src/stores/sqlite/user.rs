//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID, Username},
    stores::UserStore,
};

const SELECT_COLUMNS: &str = "id, username, password, email, created_at";

/// Handles the creation and retrieval of registered accounts in a SQLite
/// database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// The UNIQUE constraints on the username and email columns are the
    /// authoritative duplicate check; violating either surfaces as
    /// [Error::DuplicateUsername] or [Error::DuplicateEmail].
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread
    /// or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateUsername] if the username is already taken,
    /// - [Error::DuplicateEmail] if the email is already registered,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(
        &mut self,
        username: Username,
        password_hash: PasswordHash,
        email: EmailAddress,
    ) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO users (username, password, email) VALUES (?1, ?2, ?3)
                 RETURNING id, username, password, email, created_at",
            )?
            .query_row(
                (
                    username.as_str(),
                    password_hash.to_string(),
                    email.to_string(),
                ),
                Self::map_row,
            )?;

        Ok(user)
    }

    /// Get the user from the database that has the specified `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if there is no user with the specified
    /// `id`, or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM users WHERE id = :id"))?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `username`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if there is no user with the specified
    /// `username`, or [Error::SqlError] if there are SQL related errors.
    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM users WHERE username = :username"
            ))?
            .query_row(&[(":username", username)], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Whether a user with `username` exists.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn username_exists(&self, username: &str) -> Result<bool, Error> {
        let count: i64 = self
            .connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM users WHERE username = :username",
                &[(":username", username)],
                |row| row.get(0),
            )?;

        Ok(count > 0)
    }

    /// Whether a user with `email` exists.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn email_exists(&self, email: &str) -> Result<bool, Error> {
        let count: i64 = self
            .connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM users WHERE email = :email",
                &[(":email", email)],
                |row| row.get(0),
            )?;

        Ok(count > 0)
    }

    /// The total number of registered users.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM users;", [], |row| {
                row.get::<_, i64>(0).map(|count| count as usize)
            })
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_username: String = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;
        let raw_email: String = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;

        Ok(User::new_unchecked(
            UserID::new(raw_id),
            Username::new_unchecked(&raw_username),
            PasswordHash::new_unchecked(&raw_password_hash),
            EmailAddress::new_unchecked(raw_email),
            created_at,
        ))
    }
}

#[cfg(test)]
mod sqlite_user_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::CreateTable,
        models::{PasswordHash, UserID, Username},
        stores::UserStore,
    };

    use super::SQLiteUserStore;

    fn get_store() -> SQLiteUserStore {
        let conn = Connection::open_in_memory().unwrap();
        SQLiteUserStore::create_table(&conn).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn insert_user_succeeds() {
        let mut store = get_store();

        let username = Username::new("frank").unwrap();
        let email = EmailAddress::from_str("hello@world.com").unwrap();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = store
            .create(username.clone(), password_hash.clone(), email.clone())
            .unwrap();

        assert!(inserted_user.id().as_i64() > 0);
        assert_eq!(inserted_user.username(), &username);
        assert_eq!(inserted_user.email(), &email);
        assert_eq!(inserted_user.password_hash(), &password_hash);
        assert!(!inserted_user.created_at().is_empty());
    }

    #[test]
    fn insert_user_fails_on_duplicate_username() {
        let mut store = get_store();
        let username = Username::new("frank").unwrap();

        store
            .create(
                username.clone(),
                PasswordHash::new_unchecked("hunter2"),
                EmailAddress::from_str("hello@world.com").unwrap(),
            )
            .unwrap();

        let result = store.create(
            username,
            PasswordHash::new_unchecked("hunter3"),
            EmailAddress::from_str("different@world.com").unwrap(),
        );

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let mut store = get_store();
        let email = EmailAddress::from_str("hello@world.com").unwrap();

        store
            .create(
                Username::new("frank").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
                email.clone(),
            )
            .unwrap();

        let result = store.create(
            Username::new("not_frank").unwrap(),
            PasswordHash::new_unchecked("hunter3"),
            email,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let store = get_store();

        assert_eq!(store.get(UserID::new(42)), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let mut store = get_store();
        let test_user = store
            .create(
                Username::new("frank").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
                EmailAddress::from_str("foo@bar.baz").unwrap(),
            )
            .unwrap();

        let retrieved_user = store.get(test_user.id()).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_by_username_round_trips() {
        let mut store = get_store();
        let test_user = store
            .create(
                Username::new("frank").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
                EmailAddress::from_str("foo@bar.baz").unwrap(),
            )
            .unwrap();

        let retrieved_user = store.get_by_username("frank").unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_by_username_fails_for_unknown_name() {
        let store = get_store();

        assert_eq!(store.get_by_username("nobody"), Err(Error::NotFound));
    }

    #[test]
    fn existence_checks() {
        let mut store = get_store();

        assert!(!store.username_exists("frank").unwrap());
        assert!(!store.email_exists("foo@bar.baz").unwrap());

        store
            .create(
                Username::new("frank").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
                EmailAddress::from_str("foo@bar.baz").unwrap(),
            )
            .unwrap();

        assert!(store.username_exists("frank").unwrap());
        assert!(store.email_exists("foo@bar.baz").unwrap());
    }

    #[test]
    fn returns_correct_count() {
        let mut store = get_store();

        let count = store.count().expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before insertion, got {count}");

        store
            .create(
                Username::new("frank").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
                EmailAddress::from_str("foo@bar.baz").unwrap(),
            )
            .unwrap();

        let count = store.count().expect("Could not get user count");
        assert_eq!(1, count, "Want one user after insertion, got {count}");
    }
}
