use rusqlite::Connection;

use crate::{
    db::initialize,
    password::PasswordHash,
    user::{Name, User, Username, create_user},
};

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with a fixed password hash so tests do not pay for bcrypt.
pub(crate) fn insert_test_user(username: &str, connection: &Connection) -> User {
    create_user(
        Username::new_unchecked(username),
        Name::new_unchecked("페니웨이"),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}
