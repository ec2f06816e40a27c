/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Row, Transaction as SqlTransaction};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{
        Account, Budget, Category, DatabaseID, NewAccount, NewBudget, NewTransaction, NewUser,
        Transaction, TransactionType, User, UserID,
    },
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type that rows are mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// A trait for inserting a record into the application database.
pub trait Insert {
    /// The type returned after a successful insertion.
    type ResultType;

    /// Insert the object into the application database.
    ///
    /// # Errors
    ///
    /// This function will return an error if the insertion failed.
    fn insert(self, connection: &Connection) -> Result<Self::ResultType, Error>;
}

/// A trait for retrieving records from the application database by a field of type `T`.
pub trait SelectBy<T> {
    /// The type returned by the select.
    type ResultType;

    /// Select records from the application database that match `field`.
    fn select(field: T, connection: &Connection) -> Result<Self::ResultType, Error>;
}

impl CreateTable for User {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for User {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let id = UserID::new(row.get(offset)?);
        let name = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let email = email_address::EmailAddress::new_unchecked(raw_email);
        let raw_password_hash: String = row.get(offset + 3)?;
        let password_hash = crate::models::PasswordHash::new_unchecked(&raw_password_hash);

        Ok(Self::new(id, name, email, password_hash))
    }
}

impl Insert for NewUser {
    type ResultType = User;

    /// Create a new user in the database.
    ///
    /// # Errors
    /// This function will return an [Error::EmailTaken] if the email already
    /// belongs to a user, or an [Error::SqlError] if there is some other SQL error.
    fn insert(self, connection: &Connection) -> Result<Self::ResultType, Error> {
        connection.execute(
            "INSERT INTO user (name, email, password_hash) VALUES (?1, ?2, ?3)",
            (
                &self.name,
                self.email.to_string(),
                self.password_hash.to_string(),
            ),
        )?;

        let user_id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(user_id, self.name, self.email, self.password_hash))
    }
}

impl SelectBy<&email_address::EmailAddress> for User {
    type ResultType = Self;

    /// Retrieve the user with the given `email`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the email, or [Error::SqlError]
    /// if there is some other SQL error.
    fn select(
        email: &email_address::EmailAddress,
        connection: &Connection,
    ) -> Result<Self::ResultType, Error> {
        let user = connection
            .prepare("SELECT id, name, email, password_hash FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.to_string())], User::map_row)?;

        Ok(user)
    }
}

impl SelectBy<UserID> for User {
    type ResultType = Self;

    /// Retrieve the user with the given ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the ID, or [Error::SqlError]
    /// if there is some other SQL error.
    fn select(user_id: UserID, connection: &Connection) -> Result<Self::ResultType, Error> {
        let user = connection
            .prepare("SELECT id, name, email, password_hash FROM user WHERE id = :id")?
            .query_row(&[(":id", &user_id.as_i64())], User::map_row)?;

        Ok(user)
    }
}

impl CreateTable for Category {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    icon TEXT NOT NULL,
                    color TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Category {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self::new(
            row.get(offset)?,
            row.get(offset + 1)?,
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
        ))
    }
}

impl SelectBy<DatabaseID> for Category {
    type ResultType = Self;

    /// Retrieve a category in the database by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a valid category,
    /// or [Error::SqlError] if there is some other SQL error.
    fn select(id: DatabaseID, connection: &Connection) -> Result<Self::ResultType, Error> {
        let category = connection
            .prepare("SELECT id, name, kind, icon, color FROM category WHERE id = :id")?
            .query_row(&[(":id", &id)], Category::map_row)?;

        Ok(category)
    }
}

impl Category {
    /// Retrieve all categories.
    ///
    /// Categories are reference data shared by all users, so there is no
    /// per-user filter.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    pub fn select_all(connection: &Connection) -> Result<Vec<Self>, Error> {
        connection
            .prepare("SELECT id, name, kind, icon, color FROM category")?
            .query_map([], Category::map_row)?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for Account {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    balance REAL NOT NULL,
                    currency TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Account {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self::new(
            row.get(offset)?,
            UserID::new(row.get(offset + 1)?),
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
            row.get(offset + 5)?,
        ))
    }
}

impl Insert for NewAccount {
    type ResultType = Account;

    /// Create a new account in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn insert(self, connection: &Connection) -> Result<Self::ResultType, Error> {
        connection.execute(
            "INSERT INTO account (user_id, name, balance, currency, kind) VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                self.user_id.as_i64(),
                &self.name,
                self.balance,
                &self.currency,
                self.kind,
            ),
        )?;

        let account_id = connection.last_insert_rowid();

        Ok(Account::new(
            account_id,
            self.user_id,
            self.name,
            self.balance,
            self.currency,
            self.kind,
        ))
    }
}

impl SelectBy<UserID> for Account {
    type ResultType = Vec<Self>;

    /// Retrieve the accounts owned by `user_id`.
    ///
    /// An empty vector is returned if the specified user has no accounts.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn select(user_id: UserID, connection: &Connection) -> Result<Self::ResultType, Error> {
        connection
            .prepare(
                "SELECT id, user_id, name, balance, currency, kind FROM account WHERE user_id = :user_id",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Account::map_row)?
            .map(|maybe_account| maybe_account.map_err(Error::SqlError))
            .collect()
    }
}

impl SelectBy<(DatabaseID, UserID)> for Account {
    type ResultType = Self;

    /// Retrieve an account by its ID, scoped to its owner.
    ///
    /// Requests for an account owned by another user return
    /// [Error::NotFound] so that clients cannot probe for the existence of
    /// other users' resources.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the account does not exist or is owned by
    /// another user, or [Error::SqlError] if there is some other SQL error.
    fn select(
        (id, user_id): (DatabaseID, UserID),
        connection: &Connection,
    ) -> Result<Self::ResultType, Error> {
        let account = connection
            .prepare(
                "SELECT id, user_id, name, balance, currency, kind FROM account WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, user_id.as_i64()), Account::map_row)?;

        Ok(account)
    }
}

impl Account {
    /// Overwrite the account `id` with `data`, scoped to the owner in `data`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the account does not exist or is owned by
    /// another user, or [Error::SqlError] if there is some other SQL error.
    pub fn update(
        id: DatabaseID,
        data: NewAccount,
        connection: &Connection,
    ) -> Result<Self, Error> {
        let rows_changed = connection.execute(
            "UPDATE account SET name = ?1, balance = ?2, currency = ?3, kind = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                &data.name,
                data.balance,
                &data.currency,
                data.kind,
                id,
                data.user_id.as_i64(),
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(Account::new(
            id,
            data.user_id,
            data.name,
            data.balance,
            data.currency,
            data.kind,
        ))
    }

    /// Delete the account `id` owned by `user_id`, along with its transactions.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the account does not exist or is owned by
    /// another user, or [Error::SqlError] if there is some other SQL error.
    pub fn delete(
        id: DatabaseID,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<(), Error> {
        let rows_changed = connection.execute(
            "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    account_id INTEGER NOT NULL,
                    category_id INTEGER NOT NULL,
                    user_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    note TEXT,
                    kind TEXT NOT NULL,
                    FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transaction {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self::new_unchecked(
            row.get(offset)?,
            row.get(offset + 1)?,
            row.get(offset + 2)?,
            UserID::new(row.get(offset + 3)?),
            row.get(offset + 4)?,
            row.get(offset + 5)?,
            row.get(offset + 6)?,
            row.get(offset + 7)?,
        ))
    }
}

impl Insert for NewTransaction {
    type ResultType = Transaction;

    /// Create a new transaction in the database and apply it to the balance of
    /// the referenced account.
    ///
    /// The row insert and the balance update happen in a single SQL
    /// transaction, so a crash between the two cannot leave the ledger and the
    /// balance disagreeing.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidAccount] if `account_id` does not refer to one of the user's accounts,
    /// - [Error::InvalidCategory] if `category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(self, connection: &Connection) -> Result<Self::ResultType, Error> {
        check_references(&self, connection)?;

        let tx = connection.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO \"transaction\" (account_id, category_id, user_id, amount, date, note, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                self.account_id,
                self.category_id,
                self.user_id.as_i64(),
                self.amount,
                self.date,
                &self.note,
                self.kind,
            ),
        )?;

        let transaction_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
            (self.signed_amount(), self.account_id),
        )?;

        tx.commit()?;

        Ok(Transaction::new_unchecked(
            transaction_id,
            self.account_id,
            self.category_id,
            self.user_id,
            self.amount,
            self.date,
            self.note,
            self.kind,
        ))
    }
}

impl SelectBy<UserID> for Transaction {
    type ResultType = Vec<Self>;

    /// Retrieve the transactions in the database that have `user_id`.
    ///
    /// An empty vector is returned if the specified user has no transactions.
    /// No ordering is imposed here; callers sort and group as needed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn select(user_id: UserID, connection: &Connection) -> Result<Self::ResultType, Error> {
        connection
            .prepare(
                "SELECT id, account_id, category_id, user_id, amount, date, note, kind
                 FROM \"transaction\" WHERE user_id = :user_id",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Transaction::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }
}

impl SelectBy<(DatabaseID, UserID)> for Transaction {
    type ResultType = Self;

    /// Retrieve a transaction by its ID, scoped to its owner.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the transaction does not exist or is owned
    /// by another user, or [Error::SqlError] if there is some other SQL error.
    fn select(
        (id, user_id): (DatabaseID, UserID),
        connection: &Connection,
    ) -> Result<Self::ResultType, Error> {
        let transaction = connection
            .prepare(
                "SELECT id, account_id, category_id, user_id, amount, date, note, kind
                 FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, user_id.as_i64()), Transaction::map_row)?;

        Ok(transaction)
    }
}

impl Transaction {
    /// Overwrite the transaction `id` with `data`, scoped to the owner in `data`.
    ///
    /// Account balances are not re-adjusted on update: only the original
    /// creation of a transaction moves the balance.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidAccount] if the new account does not refer to one of the user's accounts,
    /// - [Error::InvalidCategory] if the new category does not exist,
    /// - [Error::NotFound] if the transaction does not exist or is owned by another user,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn update(
        id: DatabaseID,
        data: NewTransaction,
        connection: &Connection,
    ) -> Result<Self, Error> {
        check_references(&data, connection)?;

        let rows_changed = connection.execute(
            "UPDATE \"transaction\" SET account_id = ?1, category_id = ?2, amount = ?3, date = ?4, note = ?5, kind = ?6
             WHERE id = ?7 AND user_id = ?8",
            (
                data.account_id,
                data.category_id,
                data.amount,
                data.date,
                &data.note,
                data.kind,
                id,
                data.user_id.as_i64(),
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(Transaction::new_unchecked(
            id,
            data.account_id,
            data.category_id,
            data.user_id,
            data.amount,
            data.date,
            data.note,
            data.kind,
        ))
    }

    /// Delete the transaction `id` owned by `user_id`.
    ///
    /// The owning account's balance is not re-adjusted.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the transaction does not exist or is owned
    /// by another user, or [Error::SqlError] if there is some other SQL error.
    pub fn delete(
        id: DatabaseID,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<(), Error> {
        let rows_changed = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

/// Check that the account and category referenced by a transaction exist, and
/// that the account belongs to the transaction's user.
fn check_references(data: &NewTransaction, connection: &Connection) -> Result<(), Error> {
    // A 'not found' error does not make sense for a write, so we instead
    // indicate that the referenced ID is invalid. Accounts owned by other
    // users get the same error as nonexistent ones.
    Account::select((data.account_id, data.user_id), connection).map_err(|e| match e {
        Error::NotFound => Error::InvalidAccount,
        e => e,
    })?;

    Category::select(data.category_id, connection).map_err(|e| match e {
        Error::NotFound => Error::InvalidCategory,
        e => e,
    })?;

    Ok(())
}

impl CreateTable for Budget {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS budget (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    category_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    period TEXT NOT NULL,
                    start_date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Budget {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self::new(
            row.get(offset)?,
            UserID::new(row.get(offset + 1)?),
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
            row.get(offset + 5)?,
        ))
    }
}

impl Insert for NewBudget {
    type ResultType = Budget;

    /// Create a new budget in the database.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if `category_id` does not refer to a
    /// valid category, or [Error::SqlError] if there is some other SQL error.
    fn insert(self, connection: &Connection) -> Result<Self::ResultType, Error> {
        Category::select(self.category_id, connection).map_err(|e| match e {
            Error::NotFound => Error::InvalidCategory,
            e => e,
        })?;

        connection.execute(
            "INSERT INTO budget (user_id, category_id, amount, period, start_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                self.user_id.as_i64(),
                self.category_id,
                self.amount,
                self.period,
                self.start_date,
            ),
        )?;

        let budget_id = connection.last_insert_rowid();

        Ok(Budget::new(
            budget_id,
            self.user_id,
            self.category_id,
            self.amount,
            self.period,
            self.start_date,
        ))
    }
}

impl SelectBy<UserID> for Budget {
    type ResultType = Vec<Self>;

    /// Retrieve the budgets owned by `user_id`.
    ///
    /// An empty vector is returned if the specified user has no budgets.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn select(user_id: UserID, connection: &Connection) -> Result<Self::ResultType, Error> {
        connection
            .prepare(
                "SELECT id, user_id, category_id, amount, period, start_date FROM budget WHERE user_id = :user_id",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Budget::map_row)?
            .map(|maybe_budget| maybe_budget.map_err(Error::SqlError))
            .collect()
    }
}

impl Budget {
    /// Overwrite the budget `id` with `data`, scoped to the owner in `data`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if the new category does not exist,
    /// [Error::NotFound] if the budget does not exist or is owned by another
    /// user, or [Error::SqlError] if there is some other SQL error.
    pub fn update(
        id: DatabaseID,
        data: NewBudget,
        connection: &Connection,
    ) -> Result<Self, Error> {
        Category::select(data.category_id, connection).map_err(|e| match e {
            Error::NotFound => Error::InvalidCategory,
            e => e,
        })?;

        let rows_changed = connection.execute(
            "UPDATE budget SET category_id = ?1, amount = ?2, period = ?3, start_date = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                data.category_id,
                data.amount,
                data.period,
                data.start_date,
                id,
                data.user_id.as_i64(),
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(Budget::new(
            id,
            data.user_id,
            data.category_id,
            data.amount,
            data.period,
            data.start_date,
        ))
    }

    /// Delete the budget `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the budget does not exist or is owned by
    /// another user, or [Error::SqlError] if there is some other SQL error.
    pub fn delete(
        id: DatabaseID,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<(), Error> {
        let rows_changed = connection.execute(
            "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

/// The categories seeded into a fresh database.
const DEFAULT_CATEGORIES: [(&str, TransactionType, &str, &str); 11] = [
    ("Food", TransactionType::Expense, "restaurant", "#FF6B6B"),
    (
        "Transport",
        TransactionType::Expense,
        "directions_car",
        "#4ECDC4",
    ),
    ("Entertainment", TransactionType::Expense, "movie", "#95E1D3"),
    (
        "Health",
        TransactionType::Expense,
        "medical_services",
        "#F38181",
    ),
    ("Utilities", TransactionType::Expense, "home", "#AA96DA"),
    ("Clothing", TransactionType::Expense, "checkroom", "#FCBAD3"),
    ("Other", TransactionType::Expense, "more_horiz", "#A8E6CF"),
    ("Salary", TransactionType::Income, "payments", "#4CAF50"),
    ("Side Income", TransactionType::Income, "work", "#8BC34A"),
    ("Gifts", TransactionType::Income, "card_giftcard", "#CDDC39"),
    ("Other", TransactionType::Income, "more_horiz", "#9CCC65"),
];

/// Create the application tables and seed the default categories.
///
/// Safe to call on an existing database: tables are only created when missing
/// and categories are only seeded when the category table is empty.
///
/// # Errors
/// Returns an error if a table could not be created or the seed data could not
/// be inserted.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    User::create_table(&transaction)?;
    Category::create_table(&transaction)?;
    Account::create_table(&transaction)?;
    Transaction::create_table(&transaction)?;
    Budget::create_table(&transaction)?;

    let category_count: i64 =
        transaction.query_row("SELECT COUNT(id) FROM category", [], |row| row.get(0))?;

    if category_count == 0 {
        for (name, kind, icon, color) in DEFAULT_CATEGORIES {
            transaction.execute(
                "INSERT INTO category (name, kind, icon, color) VALUES (?1, ?2, ?3, ?4)",
                (name, kind, icon, color),
            )?;
        }
    }

    transaction.commit()?;

    Ok(())
}

/// Pick a date for a transaction or budget: the explicit date if one was
/// given, otherwise the current instant.
pub fn date_or_now(date: Option<OffsetDateTime>) -> OffsetDateTime {
    date.unwrap_or_else(OffsetDateTime::now_utc)
}


#[cfg(test)]
mod category_tests {
    use rusqlite::Connection;

    use crate::models::{Category, TransactionType};

    use super::initialize;

    fn init_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn initialize_seeds_default_categories() {
        let conn = init_db();

        let categories = Category::select_all(&conn).unwrap();

        assert!(!categories.is_empty());
        assert!(
            categories
                .iter()
                .any(|c| c.name() == "Food" && c.kind() == TransactionType::Expense)
        );
        assert!(
            categories
                .iter()
                .any(|c| c.name() == "Salary" && c.kind() == TransactionType::Income)
        );
    }

    #[test]
    fn initialize_twice_does_not_duplicate_categories() {
        let conn = init_db();
        let first_count = Category::select_all(&conn).unwrap().len();

        initialize(&conn).unwrap();

        assert_eq!(Category::select_all(&conn).unwrap().len(), first_count);
    }
}
