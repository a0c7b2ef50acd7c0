use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tavern_types::api::{
    CreateJobRequest, UpdateCharacterRequest, UpdateJobRequest, UpdateMessageRequest,
    UpdatePromptRequest,
};
use tavern_types::models::{Character, Chat, Job, Message, Prompt};
use tavern_types::slug::{job_slug, to_slug};
use uuid::Uuid;

use crate::Database;
use crate::error::{Result, StoreError};

/// Component used in a legacy job slug when the job names no character or
/// no prompt.
const LEGACY_PLACEHOLDER: &str = "default";

impl Database {
    // -- Characters --

    /// Insertion order, which is also the order name resolution matches in.
    pub fn list_characters(&self) -> Result<Vec<Character>> {
        self.with_conn(|conn| query_bodies(conn, "SELECT body FROM characters ORDER BY rowid"))
    }

    pub fn get_character(&self, key: &str) -> Result<Character> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            query_character(conn, &slug)?
                .ok_or_else(|| StoreError::NotFound(format!("Character '{key}' not found")))
        })
    }

    pub fn create_character(&self, character: Character) -> Result<Character> {
        let slug = key_for("Character name", &character.name)?;
        self.with_conn(|conn| {
            if query_character(conn, &slug)?.is_some() {
                return Err(StoreError::Conflict(format!(
                    "Character '{}' already exists",
                    character.name
                )));
            }
            conn.execute(
                "INSERT INTO characters (slug, name, body) VALUES (?1, ?2, ?3)",
                (&slug, &character.name, serde_json::to_string(&character)?),
            )?;
            Ok(character)
        })
    }

    /// The name is the record's identity and never changes here.
    pub fn update_character(&self, key: &str, changes: UpdateCharacterRequest) -> Result<Character> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            let mut character = query_character(conn, &slug)?
                .ok_or_else(|| StoreError::NotFound(format!("Character '{key}' not found")))?;
            changes.apply(&mut character);
            conn.execute(
                "UPDATE characters SET body = ?1 WHERE slug = ?2",
                (serde_json::to_string(&character)?, &slug),
            )?;
            Ok(character)
        })
    }

    pub fn delete_character(&self, key: &str) -> Result<()> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM characters WHERE slug = ?1", [&slug])?;
            if removed == 0 {
                return Err(StoreError::NotFound(format!("Character '{key}' not found")));
            }
            Ok(())
        })
    }

    // -- Prompts --

    pub fn list_prompts(&self) -> Result<Vec<Prompt>> {
        self.with_conn(|conn| query_bodies(conn, "SELECT body FROM prompts ORDER BY rowid"))
    }

    pub fn get_prompt(&self, key: &str) -> Result<Prompt> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            query_prompt(conn, &slug)?
                .ok_or_else(|| StoreError::NotFound(format!("Prompt '{key}' not found")))
        })
    }

    pub fn create_prompt(&self, prompt: Prompt) -> Result<Prompt> {
        let slug = key_for("Prompt title", &prompt.title)?;
        self.with_conn(|conn| {
            if query_prompt(conn, &slug)?.is_some() {
                return Err(StoreError::Conflict(format!(
                    "Prompt '{}' already exists",
                    prompt.title
                )));
            }
            conn.execute(
                "INSERT INTO prompts (slug, title, body) VALUES (?1, ?2, ?3)",
                (&slug, &prompt.title, serde_json::to_string(&prompt)?),
            )?;
            Ok(prompt)
        })
    }

    pub fn update_prompt(&self, key: &str, changes: UpdatePromptRequest) -> Result<Prompt> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            let mut prompt = query_prompt(conn, &slug)?
                .ok_or_else(|| StoreError::NotFound(format!("Prompt '{key}' not found")))?;
            changes.apply(&mut prompt);
            conn.execute(
                "UPDATE prompts SET body = ?1 WHERE slug = ?2",
                (serde_json::to_string(&prompt)?, &slug),
            )?;
            Ok(prompt)
        })
    }

    pub fn delete_prompt(&self, key: &str) -> Result<()> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM prompts WHERE slug = ?1", [&slug])?;
            if removed == 0 {
                return Err(StoreError::NotFound(format!("Prompt '{key}' not found")));
            }
            Ok(())
        })
    }

    // -- Jobs --

    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        self.with_conn(|conn| query_bodies(conn, "SELECT body FROM jobs ORDER BY seq"))
    }

    /// `key` is either a job ID or a legacy `character-prompt` slug. A legacy
    /// slug shared by several jobs resolves to the oldest one.
    pub fn get_job(&self, key: &str) -> Result<Job> {
        self.with_conn(|conn| {
            query_job(conn, key)?
                .map(|(_, job)| job)
                .ok_or_else(|| job_not_found(key))
        })
    }

    /// Issues a fresh ID.
    pub fn create_job(&self, req: CreateJobRequest) -> Result<Job> {
        self.insert_job(Job {
            id: Some(Uuid::new_v4()),
            characters: req.characters,
            prompts: req.prompts,
            cadence: req.cadence,
            prompt_override: req.prompt_override,
        })
    }

    /// Store a job exactly as given. Jobs without an ID stay reachable only
    /// through their legacy slug.
    pub fn insert_job(&self, job: Job) -> Result<Job> {
        let legacy = legacy_slug(&job);
        self.with_conn(|conn| {
            if let Some(id) = job.id {
                let taken: Option<i64> = conn
                    .query_row("SELECT seq FROM jobs WHERE id = ?1", [id.to_string()], |row| row.get(0))
                    .optional()?;
                if taken.is_some() {
                    return Err(StoreError::Conflict(format!("Job with ID '{id}' already exists")));
                }
            }
            conn.execute(
                "INSERT INTO jobs (id, legacy_slug, body) VALUES (?1, ?2, ?3)",
                (
                    job.id.map(|id| id.to_string()),
                    &legacy,
                    serde_json::to_string(&job)?,
                ),
            )?;
            Ok(job)
        })
    }

    /// Replace the job's definition. The stored ID, or its absence, is kept
    /// whatever the request carries.
    pub fn update_job(&self, key: &str, req: UpdateJobRequest) -> Result<Job> {
        self.with_conn(|conn| {
            let (seq, existing) = query_job(conn, key)?.ok_or_else(|| job_not_found(key))?;
            let job = Job {
                id: existing.id,
                characters: req.characters,
                prompts: req.prompts,
                cadence: req.cadence,
                prompt_override: req.prompt_override,
            };
            conn.execute(
                "UPDATE jobs SET legacy_slug = ?1, body = ?2 WHERE seq = ?3",
                (legacy_slug(&job), serde_json::to_string(&job)?, seq),
            )?;
            Ok(job)
        })
    }

    pub fn delete_job(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            let (seq, _) = query_job(conn, key)?.ok_or_else(|| job_not_found(key))?;
            conn.execute("DELETE FROM jobs WHERE seq = ?1", [seq])?;
            Ok(())
        })
    }

    // -- Chats --

    /// Display names of every archive, sorted.
    pub fn list_chat_names(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT character FROM chats ORDER BY character")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    pub fn get_chat(&self, key: &str) -> Result<Chat> {
        let slug = to_slug(key);
        self.with_conn(|conn| query_chat(conn, &slug)?.ok_or_else(|| chat_not_found(key)))
    }

    pub fn create_chat(&self, character: &str) -> Result<Chat> {
        let slug = key_for("Character name", character)?;
        self.with_conn(|conn| {
            if query_chat(conn, &slug)?.is_some() {
                return Err(StoreError::Conflict(format!(
                    "Chat for character '{character}' already exists"
                )));
            }
            let chat = Chat::new(character);
            write_chat(conn, &slug, &chat, true)?;
            Ok(chat)
        })
    }

    /// Move an archive under a new character name. Renaming onto a name that
    /// already has its own archive is a conflict.
    pub fn rename_chat(&self, key: &str, new_character: &str) -> Result<Chat> {
        let slug = to_slug(key);
        let new_slug = key_for("Character name", new_character)?;
        self.with_conn(|conn| {
            let mut chat = query_chat(conn, &slug)?.ok_or_else(|| chat_not_found(key))?;
            if new_slug != slug && query_chat(conn, &new_slug)?.is_some() {
                return Err(StoreError::Conflict(format!(
                    "Chat for character '{new_character}' already exists"
                )));
            }
            chat.character = new_character.to_string();
            conn.execute(
                "UPDATE chats SET slug = ?1, character = ?2, updated_at = datetime('now') WHERE slug = ?3",
                (&new_slug, &chat.character, &slug),
            )?;
            Ok(chat)
        })
    }

    pub fn delete_chat(&self, key: &str) -> Result<()> {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM chats WHERE slug = ?1", [&slug])?;
            if removed == 0 {
                return Err(chat_not_found(key));
            }
            Ok(())
        })
    }

    /// Append to the archive for `character`, creating the archive on first
    /// use. A new archive takes its display name from the matching character
    /// record when there is one. Messages without a timestamp are stamped now.
    pub fn append_message(&self, character: &str, mut message: Message) -> Result<Chat> {
        let slug = key_for("Character name", character)?;
        message.timestamp.get_or_insert_with(Utc::now);
        self.with_conn(|conn| {
            let (mut chat, is_new) = match query_chat(conn, &slug)? {
                Some(chat) => (chat, false),
                None => {
                    let name = query_character(conn, &slug)?
                        .map(|c| c.name)
                        .unwrap_or_else(|| character.to_string());
                    (Chat::new(name), true)
                }
            };
            chat.messages.push(message);
            write_chat(conn, &slug, &chat, is_new)?;
            Ok(chat)
        })
    }

    pub fn update_message(
        &self,
        key: &str,
        index: usize,
        patch: UpdateMessageRequest,
    ) -> Result<Chat> {
        self.modify_message(key, index, |message| patch.apply(message))
    }

    pub fn set_message_read(&self, key: &str, index: usize, read: bool) -> Result<Chat> {
        self.modify_message(key, index, |message| message.read = Some(read))
    }

    pub fn mark_all_read(&self, key: &str) -> Result<Chat> {
        self.modify_chat(key, |chat| {
            for message in &mut chat.messages {
                message.read = Some(true);
            }
            Ok(())
        })
    }

    /// Later messages shift down by one.
    pub fn delete_message(&self, key: &str, index: usize) -> Result<Chat> {
        self.modify_chat(key, |chat| {
            if index >= chat.messages.len() {
                return Err(message_not_found(key, index));
            }
            chat.messages.remove(index);
            Ok(())
        })
    }

    fn modify_message<F>(&self, key: &str, index: usize, f: F) -> Result<Chat>
    where
        F: FnOnce(&mut Message),
    {
        self.modify_chat(key, |chat| {
            let message = chat
                .messages
                .get_mut(index)
                .ok_or_else(|| message_not_found(key, index))?;
            f(message);
            Ok(())
        })
    }

    /// Load, mutate and write back under one lock acquisition.
    fn modify_chat<F>(&self, key: &str, f: F) -> Result<Chat>
    where
        F: FnOnce(&mut Chat) -> Result<()>,
    {
        let slug = to_slug(key);
        self.with_conn(|conn| {
            let mut chat = query_chat(conn, &slug)?.ok_or_else(|| chat_not_found(key))?;
            f(&mut chat)?;
            write_chat(conn, &slug, &chat, false)?;
            Ok(chat)
        })
    }
}

fn key_for(what: &str, name: &str) -> Result<String> {
    let slug = to_slug(name);
    if slug.is_empty() {
        return Err(StoreError::Invalid(format!(
            "{what} '{name}' has no usable characters"
        )));
    }
    Ok(slug)
}

fn legacy_slug(job: &Job) -> String {
    let character = job.characters.first().map_or(LEGACY_PLACEHOLDER, String::as_str);
    let prompt = job.prompts.first().map_or(LEGACY_PLACEHOLDER, String::as_str);
    job_slug(character, prompt)
}

fn job_not_found(key: &str) -> StoreError {
    StoreError::NotFound(format!("Job '{key}' not found"))
}

fn chat_not_found(key: &str) -> StoreError {
    StoreError::NotFound(format!("Chat for character '{key}' not found"))
}

fn message_not_found(key: &str, index: usize) -> StoreError {
    StoreError::NotFound(format!(
        "Message index {index} out of bounds in chat for character '{key}'"
    ))
}

fn query_bodies<T: serde::de::DeserializeOwned>(conn: &Connection, sql: &str) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let bodies = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    bodies
        .iter()
        .map(|body| serde_json::from_str(body).map_err(StoreError::from))
        .collect()
}

fn query_character(conn: &Connection, slug: &str) -> Result<Option<Character>> {
    let body: Option<String> = conn
        .query_row("SELECT body FROM characters WHERE slug = ?1", [slug], |row| row.get(0))
        .optional()?;
    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
}

fn query_prompt(conn: &Connection, slug: &str) -> Result<Option<Prompt>> {
    let body: Option<String> = conn
        .query_row("SELECT body FROM prompts WHERE slug = ?1", [slug], |row| row.get(0))
        .optional()?;
    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
}

/// An ID-shaped key is only ever matched against IDs.
fn query_job(conn: &Connection, key: &str) -> Result<Option<(i64, Job)>> {
    let row: Option<(i64, String)> = match Uuid::parse_str(key) {
        Ok(id) => conn
            .query_row(
                "SELECT seq, body FROM jobs WHERE id = ?1",
                [id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        Err(_) => conn
            .query_row(
                "SELECT seq, body FROM jobs WHERE legacy_slug = ?1 ORDER BY seq LIMIT 1",
                [to_slug(key)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
    };

    match row {
        Some((seq, body)) => Ok(Some((seq, serde_json::from_str(&body)?))),
        None => Ok(None),
    }
}

fn query_chat(conn: &Connection, slug: &str) -> Result<Option<Chat>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT character, messages FROM chats WHERE slug = ?1",
            [slug],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match row {
        Some((character, messages)) => Ok(Some(Chat {
            character,
            messages: serde_json::from_str(&messages)?,
        })),
        None => Ok(None),
    }
}

fn write_chat(conn: &Connection, slug: &str, chat: &Chat, insert: bool) -> Result<()> {
    let messages = serde_json::to_string(&chat.messages)?;
    if insert {
        conn.execute(
            "INSERT INTO chats (slug, character, messages) VALUES (?1, ?2, ?3)",
            (slug, &chat.character, &messages),
        )?;
    } else {
        conn.execute(
            "UPDATE chats SET messages = ?1, updated_at = datetime('now') WHERE slug = ?2",
            (&messages, slug),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavern_types::api::AddMessageRequest;
    use tavern_types::models::Cadence;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn character(name: &str) -> Character {
        Character {
            name: name.to_string(),
            description: "A test character".into(),
            personality: "Cheerful".into(),
            background: "Village".into(),
            voice: None,
        }
    }

    fn text(parts: &[&str]) -> Message {
        Message {
            text: parts.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn job_request(character: &str, prompt: &str) -> CreateJobRequest {
        CreateJobRequest {
            characters: vec![character.into()],
            prompts: vec![prompt.into()],
            cadence: Cadence::new("0 9 * * 1-5"),
            prompt_override: None,
        }
    }

    #[test]
    fn test_character_crud_by_slug() {
        let db = db();
        db.create_character(character("Jane Doe")).unwrap();

        assert_eq!(db.get_character("jane-doe").unwrap().name, "Jane Doe");
        assert_eq!(db.get_character("Jane Doe").unwrap().name, "Jane Doe");

        let updated = db
            .update_character(
                "jane-doe",
                UpdateCharacterRequest {
                    personality: Some("Grumpy".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.personality, "Grumpy");
        assert_eq!(updated.description, "A test character");

        db.delete_character("jane-doe").unwrap();
        assert!(matches!(db.get_character("jane-doe"), Err(StoreError::NotFound(_))));
        assert!(matches!(db.delete_character("jane-doe"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_slug_conflicts() {
        let db = db();
        db.create_character(character("Jane Doe")).unwrap();
        assert!(matches!(
            db.create_character(character("jane  doe!")),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn test_unaddressable_name_rejected() {
        let db = db();
        assert!(matches!(db.create_character(character("???")), Err(StoreError::Invalid(_))));
        assert!(matches!(db.create_chat("   "), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn test_characters_list_in_insertion_order() {
        let db = db();
        db.create_character(character("Zed")).unwrap();
        db.create_character(character("Alice")).unwrap();
        let names: Vec<_> = db.list_characters().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Zed", "Alice"]);
    }

    #[test]
    fn test_prompt_crud() {
        let db = db();
        db.create_prompt(Prompt {
            title: "Morning Greeting".into(),
            description: "Say hello".into(),
            context: "It is morning".into(),
            setup: vec!["Greet the user".into()],
            create_audio: false,
            create_images: false,
        })
        .unwrap();

        let updated = db
            .update_prompt(
                "morning-greeting",
                UpdatePromptRequest {
                    setup: Some(vec!["One".into(), "Two".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.setup.len(), 2);
        assert_eq!(db.list_prompts().unwrap().len(), 1);
        db.delete_prompt("Morning Greeting").unwrap();
        assert!(db.list_prompts().unwrap().is_empty());
    }

    #[test]
    fn test_job_reachable_by_id_and_legacy_slug() {
        let db = db();
        let job = db.create_job(job_request("Jane Doe", "Morning Greeting")).unwrap();
        let id = job.id.unwrap();

        assert_eq!(db.get_job(&id.to_string()).unwrap(), job);
        assert_eq!(db.get_job("jane-doe-morning-greeting").unwrap(), job);
    }

    #[test]
    fn test_legacy_slug_picks_oldest_job() {
        let db = db();
        let first = db.create_job(job_request("Jane Doe", "Hi")).unwrap();
        db.create_job(job_request("Jane Doe", "Hi")).unwrap();
        assert_eq!(db.get_job("jane-doe-hi").unwrap().id, first.id);
    }

    #[test]
    fn test_legacy_job_without_id() {
        let db = db();
        db.insert_job(Job {
            id: None,
            characters: vec!["Jane Doe".into()],
            prompts: vec!["Hi".into()],
            cadence: Cadence::new("once"),
            prompt_override: None,
        })
        .unwrap();

        let updated = db
            .update_job(
                "jane-doe-hi",
                UpdateJobRequest {
                    id: Some(Uuid::new_v4()),
                    characters: vec!["Jane Doe".into()],
                    prompts: vec!["Bye".into()],
                    cadence: Cadence::new("once"),
                    prompt_override: None,
                },
            )
            .unwrap();
        assert_eq!(updated.id, None);
        assert!(matches!(db.get_job("jane-doe-hi"), Err(StoreError::NotFound(_))));
        db.delete_job("jane-doe-bye").unwrap();
        assert!(db.list_jobs().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let db = db();
        db.create_job(job_request("Jane Doe", "Hi")).unwrap();
        let missing = Uuid::new_v4().to_string();
        assert!(matches!(db.get_job(&missing), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_empty_job_uses_placeholder_slug() {
        let db = db();
        db.create_job(CreateJobRequest {
            characters: vec![],
            prompts: vec![],
            cadence: Cadence::new("once"),
            prompt_override: None,
        })
        .unwrap();
        assert!(db.get_job("default-default").is_ok());
    }

    #[test]
    fn test_chat_create_conflicts() {
        let db = db();
        db.create_chat("Jane Doe").unwrap();
        assert!(matches!(db.create_chat("jane doe"), Err(StoreError::Conflict(_))));
    }

    #[test]
    fn test_append_creates_archive_and_stamps() {
        let db = db();
        db.create_character(character("O'Brien")).unwrap();

        let chat = db.append_message("obrien", text(&["hello"])).unwrap();
        assert_eq!(chat.character, "O'Brien");
        assert_eq!(chat.messages.len(), 1);
        assert!(chat.messages[0].timestamp.is_some());
        assert_eq!(db.list_chat_names().unwrap(), ["O'Brien"]);
    }

    #[test]
    fn test_delete_message_shifts_indices() {
        let db = db();
        for t in ["zero", "one", "two"] {
            db.append_message("Jane Doe", text(&[t])).unwrap();
        }
        let chat = db.delete_message("jane-doe", 1).unwrap();
        let texts: Vec<_> = chat.messages.iter().map(|m| m.joined_text()).collect();
        assert_eq!(texts, ["zero", "two"]);
        assert!(matches!(db.delete_message("jane-doe", 2), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_read_flags() {
        let db = db();
        db.append_message("Jane Doe", text(&["a"])).unwrap();
        db.append_message("Jane Doe", text(&["b"])).unwrap();

        let chat = db.set_message_read("jane-doe", 0, true).unwrap();
        assert_eq!(chat.unread_count(), 1);
        assert!(matches!(
            db.set_message_read("jane-doe", 5, true),
            Err(StoreError::NotFound(_))
        ));

        let chat = db.mark_all_read("jane-doe").unwrap();
        assert_eq!(chat.unread_count(), 0);
        let again = db.mark_all_read("jane-doe").unwrap();
        assert_eq!(again, chat);
    }

    #[test]
    fn test_update_message_patch() {
        let db = db();
        db.append_message("Jane Doe", text(&["draft"])).unwrap();
        let chat = db
            .update_message(
                "jane-doe",
                0,
                UpdateMessageRequest {
                    text: Some(vec!["final".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(chat.messages[0].text, ["final"]);
    }

    #[test]
    fn test_rename_chat() {
        let db = db();
        db.append_message("Jane Doe", text(&["hi"])).unwrap();
        db.create_chat("John Smith").unwrap();

        assert!(matches!(
            db.rename_chat("jane-doe", "John Smith"),
            Err(StoreError::Conflict(_))
        ));

        let renamed = db.rename_chat("jane-doe", "Jane Smith").unwrap();
        assert_eq!(renamed.character, "Jane Smith");
        assert_eq!(db.get_chat("jane-smith").unwrap().messages.len(), 1);
        assert!(matches!(db.get_chat("jane-doe"), Err(StoreError::NotFound(_))));

        // same slug, new display casing
        let recased = db.rename_chat("jane-smith", "JANE SMITH").unwrap();
        assert_eq!(recased.character, "JANE SMITH");
    }

    #[test]
    fn test_delete_chat() {
        let db = db();
        db.create_chat("Jane Doe").unwrap();
        db.delete_chat("jane-doe").unwrap();
        assert!(matches!(db.delete_chat("jane-doe"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_add_message_request_defaults_survive_store() {
        let db = db();
        let req = AddMessageRequest {
            text: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let message = Message {
            text: req.text,
            audio: req.audio,
            images: req.images,
            read: req.read,
            timestamp: req.timestamp,
        };
        let chat = db.append_message("Jane Doe", message).unwrap();
        let stored = &chat.messages[0];
        assert!(stored.audio.is_empty());
        assert_eq!(stored.read, None);
        assert_eq!(stored.joined_text(), "a b");
    }
}
