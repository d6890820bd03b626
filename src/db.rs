//! Sets up the application database and guards access to the shared connection.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, device::create_device_table, question::create_question_table,
    spending::create_spending_tables, target_amount::create_target_amount_table,
    user::create_user_table,
};

/// Create the tables for every domain model.
///
/// Foreign key enforcement is switched on for `connection` first, since
/// spendings and custom categories rely on it to reference their owners.
///
/// # Errors
/// Returns an error if any table could not be created, in which case no
/// tables are created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_device_table(&transaction)?;
    create_spending_tables(&transaction)?;
    create_target_amount_table(&transaction)?;
    create_question_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the database lock.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if another thread panicked while
/// holding the lock.
pub fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
