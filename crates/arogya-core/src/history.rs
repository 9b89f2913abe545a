//! Chat history: sessions per user and the messages exchanged in each.
//!
//! Two sled trees in one DB:
//! - `sessions`: key = big-endian session id, value = JSON [`ChatSession`]
//! - `messages`: key = big-endian session id ++ big-endian message id, value = JSON [`ChatMessage`]
//!
//! Big-endian ids keep each session's messages contiguous and in insertion order, so a
//! prefix scan returns them oldest first.

use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional};
use std::convert::Infallible;
use std::path::Path;

use crate::error::StoreError;
use crate::shared::now_ms;

const DEFAULT_PATH: &str = "./data/arogya_history";
const SESSION_TREE: &str = "sessions";
const MESSAGE_TREE: &str = "messages";

/// Titles longer than this are cut to `TITLE_KEEP` characters plus `...`.
const TITLE_MAX: usize = 50;
const TITLE_KEEP: usize = 47;
const EMPTY_PREVIEW: &str = "No messages yet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: u64,
    pub user_email: String,
    pub title: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub session_id: u64,
    pub message: String,
    pub is_bot: bool,
    pub created_at_ms: i64,
}

/// Session listing entry with the latest message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: u64,
    pub title: String,
    pub created_at_ms: i64,
    pub last_message_at_ms: i64,
    pub last_message: String,
}

/// Session title derived from the first user message.
pub fn session_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    if trimmed.chars().count() > TITLE_MAX {
        let head: String = trimmed.chars().take(TITLE_KEEP).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// Sled-backed chat history.
pub struct ChatStore {
    db: Db,
}

impl ChatStore {
    /// Opens or creates the history DB at `./data/arogya_history`.
    pub fn new() -> Result<Self, StoreError> {
        Self::open_path(DEFAULT_PATH)
    }

    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Creates a session for `user_email` titled from `first_message`.
    pub fn create_session(
        &self,
        user_email: &str,
        first_message: &str,
    ) -> Result<ChatSession, StoreError> {
        let session = self.new_session(user_email, first_message)?;
        self.db
            .open_tree(SESSION_TREE)?
            .insert(session.id.to_be_bytes(), serde_json::to_vec(&session)?)?;
        tracing::debug!(
            target: "arogya::chat",
            session_id = session.id,
            user = %user_email,
            "Chat session created"
        );
        Ok(session)
    }

    pub fn session(&self, session_id: u64) -> Result<Option<ChatSession>, StoreError> {
        match self.db.open_tree(SESSION_TREE)?.get(session_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Appends a message to an existing session.
    pub fn append_message(
        &self,
        session_id: u64,
        message: &str,
        is_bot: bool,
    ) -> Result<ChatMessage, StoreError> {
        let (key, record) = self.new_message(session_id, message, is_bot)?;
        self.db
            .open_tree(MESSAGE_TREE)?
            .insert(key, serde_json::to_vec(&record)?)?;
        Ok(record)
    }

    /// Stores one user message and the reply produced by `respond` as a single unit.
    ///
    /// Without `session_id` a new session titled from `message` is opened. Returns
    /// `Ok(None)` when `session_id` is unknown or belongs to another user. If `respond`
    /// fails nothing is written, and the session plus both messages are committed in one
    /// sled transaction.
    pub fn record_exchange<F>(
        &self,
        user_email: &str,
        session_id: Option<u64>,
        message: &str,
        respond: F,
    ) -> Result<Option<(u64, String)>, StoreError>
    where
        F: FnOnce(&str) -> Result<String, StoreError>,
    {
        let (session_id, new_session) = match session_id {
            Some(id) => match self.session(id)? {
                Some(session) if session.user_email == user_email => (session.id, None),
                _ => return Ok(None),
            },
            None => {
                let session = self.new_session(user_email, message)?;
                (session.id, Some(session))
            }
        };

        let response = respond(message)?;

        let session_value = new_session.as_ref().map(serde_json::to_vec).transpose()?;
        let (user_key, user_record) = self.new_message(session_id, message, false)?;
        let (bot_key, bot_record) = self.new_message(session_id, &response, true)?;
        let user_value = serde_json::to_vec(&user_record)?;
        let bot_value = serde_json::to_vec(&bot_record)?;
        let session_key = session_id.to_be_bytes();

        let sessions = self.db.open_tree(SESSION_TREE)?;
        let messages = self.db.open_tree(MESSAGE_TREE)?;
        (&sessions, &messages)
            .transaction(|(tx_sessions, tx_messages)| {
                if let Some(value) = &session_value {
                    tx_sessions.insert(&session_key[..], value.as_slice())?;
                }
                tx_messages.insert(user_key.as_slice(), user_value.as_slice())?;
                tx_messages.insert(bot_key.as_slice(), bot_value.as_slice())?;
                Ok::<_, ConflictableTransactionError<Infallible>>(())
            })
            .map_err(|e| match e {
                TransactionError::Storage(e) => StoreError::Sled(e),
                TransactionError::Abort(never) => match never {},
            })?;

        tracing::debug!(
            target: "arogya::chat",
            session_id,
            new_session = session_value.is_some(),
            "Chat exchange stored"
        );
        Ok(Some((session_id, response)))
    }

    fn new_session(&self, user_email: &str, first_message: &str) -> Result<ChatSession, StoreError> {
        Ok(ChatSession {
            id: self.db.generate_id()?,
            user_email: user_email.to_string(),
            title: session_title(first_message),
            created_at_ms: now_ms(),
        })
    }

    /// Message record and its key; the key is not written.
    fn new_message(
        &self,
        session_id: u64,
        message: &str,
        is_bot: bool,
    ) -> Result<(Vec<u8>, ChatMessage), StoreError> {
        let record = ChatMessage {
            session_id,
            message: message.to_string(),
            is_bot,
            created_at_ms: now_ms(),
        };
        let message_id = self.db.generate_id()?;
        let mut key = Vec::with_capacity(16);
        key.extend_from_slice(&session_id.to_be_bytes());
        key.extend_from_slice(&message_id.to_be_bytes());
        Ok((key, record))
    }

    /// Messages of one session, oldest first.
    pub fn session_messages(&self, session_id: u64) -> Result<Vec<ChatMessage>, StoreError> {
        let tree = self.db.open_tree(MESSAGE_TREE)?;
        let mut out = Vec::new();
        for item in tree.scan_prefix(session_id.to_be_bytes()) {
            let (_, v) = item?;
            out.push(serde_json::from_slice(&v)?);
        }
        Ok(out)
    }

    /// Sessions of `user_email`, most recent activity first.
    pub fn list_sessions(&self, user_email: &str) -> Result<Vec<SessionSummary>, StoreError> {
        let sessions = self.db.open_tree(SESSION_TREE)?;
        let mut out = Vec::new();
        for item in sessions.iter() {
            let (_, v) = item?;
            let session: ChatSession = serde_json::from_slice(&v)?;
            if session.user_email != user_email {
                continue;
            }
            let last = self.last_message(session.id)?;
            out.push(SessionSummary {
                id: session.id,
                title: session.title,
                created_at_ms: session.created_at_ms,
                last_message_at_ms: last
                    .as_ref()
                    .map(|m| m.created_at_ms)
                    .unwrap_or(session.created_at_ms),
                last_message: last
                    .map(|m| m.message)
                    .unwrap_or_else(|| EMPTY_PREVIEW.to_string()),
            });
        }
        // Ids are monotonic, so they break timestamp ties in creation order.
        out.sort_by(|a, b| {
            b.last_message_at_ms
                .cmp(&a.last_message_at_ms)
                .then(b.id.cmp(&a.id))
        });
        Ok(out)
    }

    fn last_message(&self, session_id: u64) -> Result<Option<ChatMessage>, StoreError> {
        let tree = self.db.open_tree(MESSAGE_TREE)?;
        match tree.scan_prefix(session_id.to_be_bytes()).next_back() {
            Some(item) => {
                let (_, v) = item?;
                Ok(Some(serde_json::from_slice(&v)?))
            }
            None => Ok(None),
        }
    }
}
