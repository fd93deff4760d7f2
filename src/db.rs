//! Sets up the application's database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, category::create_category_table, user::create_user_table};

/// Create all the tables used by the application.
///
/// Existing tables are left as is, so this is safe to call on every start up.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction could not be committed.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
