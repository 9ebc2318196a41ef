use crate::Database;
use crate::store::{AccountStore, MessageStore};
use anyhow::Result;
use chirp_types::{Account, Message};
use rusqlite::{Connection, OptionalExtension, Row, params};

const MESSAGE_COLUMNS: &str = "message_id, posted_by, message_text, time_posted_epoch";

impl AccountStore for Database {
    fn create_account(&self, username: &str, password: &str) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            // The UNIQUE constraint decides; a conflict returns no row.
            let account_id: Option<i64> = conn
                .query_row(
                    "INSERT INTO accounts (username, password) VALUES (?1, ?2)
                     ON CONFLICT(username) DO NOTHING
                     RETURNING account_id",
                    params![username, password],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(account_id.map(|account_id| Account {
                account_id,
                username: username.to_string(),
                password: password.to_string(),
            }))
        })
    }

    fn get_account_by_id(&self, account_id: i64) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            query_account(
                conn,
                "SELECT account_id, username, password FROM accounts WHERE account_id = ?1",
                params![account_id],
            )
        })
    }

    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            query_account(
                conn,
                "SELECT account_id, username, password FROM accounts WHERE username = ?1",
                params![username],
            )
        })
    }

    fn get_account_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            query_account(
                conn,
                "SELECT account_id, username, password FROM accounts
                 WHERE username = ?1 AND password = ?2",
                params![username, password],
            )
        })
    }
}

impl MessageStore for Database {
    fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Message> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (posted_by, message_text, time_posted_epoch)
                 VALUES (?1, ?2, ?3)",
                params![posted_by, message_text, time_posted_epoch],
            )?;

            Ok(Message {
                message_id: conn.last_insert_rowid(),
                posted_by,
                message_text: message_text.to_string(),
                time_posted_epoch,
            })
        })
    }

    fn get_messages(&self) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY message_id"),
                params![],
            )
        })
    }

    fn get_message_by_id(&self, message_id: i64) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?1"),
                    params![message_id],
                    message_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    fn get_messages_by_account(&self, account_id: i64) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages
                     WHERE posted_by = ?1 ORDER BY message_id"
                ),
                params![account_id],
            )
        })
    }

    fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET message_text = ?1 WHERE message_id = ?2",
                params![message_text, message_id],
            )?;
            Ok(changed)
        })
    }

    fn delete_message(&self, message_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let removed =
                conn.execute("DELETE FROM messages WHERE message_id = ?1", params![message_id])?;
            Ok(removed)
        })
    }
}

fn query_account(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Option<Account>> {
    let mut stmt = conn.prepare(sql)?;

    let row = stmt
        .query_row(params, |row| {
            Ok(Account {
                account_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_messages(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map(params, message_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        message_id: row.get(0)?,
        posted_by: row.get(1)?,
        message_text: row.get(2)?,
        time_posted_epoch: row.get(3)?,
    })
}
