//! Command dispatcher: identity gate, grammar, record construction, storage.

use std::sync::Arc;

use crate::{
    datetime,
    domain::{
        CommandOutcome, ContactRecord, EventRecord, Priority, Record, RecordType, TaskRecord,
        TaskStatus, UserId,
    },
    grammar::{self, Verb},
    ports::Store,
    Error,
};

/// Turns one raw chat message into at most one storage write.
///
/// All failures are folded into the returned [`CommandOutcome`]; nothing here
/// escapes as an error, so one bad message can never abort its siblings in a
/// webhook batch.
pub struct Interpreter {
    store: Arc<dyn Store>,
}

impl Interpreter {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn interpret(&self, phone: &str, text: &str) -> CommandOutcome {
        // Identity is the first gate, before any field parsing. No user, no
        // record, regardless of the verb.
        let user_id = match self.store.find_user_by_phone(phone).await {
            Ok(Some(id)) => id,
            Ok(None) => return CommandOutcome::failed(RecordType::None, Error::UserNotFound),
            Err(e) => return CommandOutcome::failed(RecordType::None, e),
        };

        let cmd = grammar::classify(text);
        match cmd.verb {
            Verb::Task => self.create_task(user_id, &cmd.fields).await,
            Verb::Event => self.create_event(user_id, &cmd.fields).await,
            Verb::Contact => self.create_contact(user_id, &cmd.fields).await,
            Verb::Unrecognized => {
                CommandOutcome::failed(RecordType::None, Error::UnrecognizedCommand)
            }
        }
    }

    /// `TAREFA: título | descrição | prioridade | data`
    async fn create_task(&self, user_id: UserId, fields: &[String]) -> CommandOutcome {
        let title = field(fields, 0);
        if title.is_empty() {
            return CommandOutcome::failed(
                RecordType::Task,
                Error::MissingRequiredField("O título da tarefa é obrigatório".to_string()),
            );
        }

        let due_token = field(fields, 3);
        let task = TaskRecord {
            user_id,
            title: title.to_string(),
            description: field(fields, 1).to_string(),
            priority: Priority::parse_or_default(field(fields, 2)),
            status: TaskStatus::Pending,
            due_date: if due_token.is_empty() {
                None
            } else {
                datetime::resolve_date(due_token)
            },
        };

        match self.store.insert_task(task).await {
            Ok(stored) => CommandOutcome::stored(RecordType::Task, Record::Task(stored)),
            Err(e) => CommandOutcome::failed(RecordType::Task, e),
        }
    }

    /// `EVENTO: título | data | hora início | hora fim | local`
    async fn create_event(&self, user_id: UserId, fields: &[String]) -> CommandOutcome {
        let date_token = field(fields, 1);
        let start_token = field(fields, 2);
        if date_token.is_empty() || start_token.is_empty() {
            return CommandOutcome::failed(
                RecordType::Event,
                Error::MissingRequiredField("Data e hora de início são obrigatórias".to_string()),
            );
        }

        let start_time = datetime::resolve_date_time(date_token, start_token);

        // An absent or unparsable end time defaults to one hour after start.
        let end_token = field(fields, 3);
        let end_time = if datetime::parse_time(end_token).is_some() {
            datetime::resolve_date_time(date_token, end_token)
        } else {
            start_time + chrono::Duration::hours(1)
        };

        let event = EventRecord {
            user_id,
            title: field(fields, 0).to_string(),
            start_time,
            end_time,
            location: field(fields, 4).to_string(),
            // Chat-created events never carry a description.
            description: String::new(),
        };

        match self.store.insert_event(event).await {
            Ok(stored) => CommandOutcome::stored(RecordType::Event, Record::Event(stored)),
            Err(e) => CommandOutcome::failed(RecordType::Event, e),
        }
    }

    /// `CONTATO: nome | email | telefone | empresa`
    async fn create_contact(&self, user_id: UserId, fields: &[String]) -> CommandOutcome {
        let name = field(fields, 0);
        if name.is_empty() {
            return CommandOutcome::failed(
                RecordType::Contact,
                Error::MissingRequiredField("O nome do contato é obrigatório".to_string()),
            );
        }

        let contact = ContactRecord {
            user_id,
            name: name.to_string(),
            email: field(fields, 1).to_string(),
            phone: field(fields, 2).to_string(),
            company: field(fields, 3).to_string(),
            // Chat-created contacts never carry a position.
            position: String::new(),
        };

        match self.store.insert_contact(contact).await {
            Ok(stored) => CommandOutcome::stored(RecordType::Contact, Record::Contact(stored)),
            Err(e) => CommandOutcome::failed(RecordType::Contact, e),
        }
    }
}

/// Positional field access; trailing omissions read as empty.
fn field(fields: &[String], idx: usize) -> &str {
    fields.get(idx).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Store;
    use async_trait::async_trait;
    use chrono::{Local, TimeZone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemStore {
        users: Vec<(String, String)>,
        fail_inserts: bool,
        tasks: Mutex<Vec<TaskRecord>>,
        events: Mutex<Vec<EventRecord>>,
        contacts: Mutex<Vec<ContactRecord>>,
    }

    impl MemStore {
        fn with_user(phone: &str, user_id: &str) -> Self {
            Self {
                users: vec![(phone.to_string(), user_id.to_string())],
                ..Default::default()
            }
        }

        fn write_count(&self) -> usize {
            self.tasks.lock().unwrap().len()
                + self.events.lock().unwrap().len()
                + self.contacts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Store for MemStore {
        async fn find_user_by_phone(&self, phone: &str) -> crate::Result<Option<UserId>> {
            Ok(self
                .users
                .iter()
                .find(|(p, _)| p == phone)
                .map(|(_, id)| UserId(id.clone())))
        }

        async fn insert_task(&self, task: TaskRecord) -> crate::Result<TaskRecord> {
            if self.fail_inserts {
                return Err(Error::Storage("insert rejected".to_string()));
            }
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn insert_event(&self, event: EventRecord) -> crate::Result<EventRecord> {
            if self.fail_inserts {
                return Err(Error::Storage("insert rejected".to_string()));
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(event)
        }

        async fn insert_contact(&self, contact: ContactRecord) -> crate::Result<ContactRecord> {
            if self.fail_inserts {
                return Err(Error::Storage("insert rejected".to_string()));
            }
            self.contacts.lock().unwrap().push(contact.clone());
            Ok(contact)
        }
    }

    fn interpreter(store: Arc<MemStore>) -> Interpreter {
        Interpreter::new(store)
    }

    const PHONE: &str = "5511999990000";

    #[tokio::test]
    async fn unknown_sender_fails_before_any_parsing() {
        let store = Arc::new(MemStore::default());
        let out = interpreter(store.clone())
            .interpret(PHONE, "TAREFA: Revisar contrato")
            .await;

        assert!(!out.success);
        assert!(out.error.unwrap().contains("User not found"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn task_command_creates_pending_task() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone())
            .interpret(
                PHONE,
                "TAREFA: Revisar contrato | Checar cláusulas | alta | 28/06/2025",
            )
            .await;

        assert!(out.success);
        assert_eq!(out.record_type, RecordType::Task);

        let tasks = store.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Revisar contrato");
        assert_eq!(tasks[0].description, "Checar cláusulas");
        // "alta" is not one of low/medium/high, so it normalizes to medium.
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(
            tasks[0].due_date,
            Some(Local.with_ymd_and_hms(2025, 6, 28, 0, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn recognized_priority_is_kept() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        interpreter(store.clone())
            .interpret(PHONE, "tarefa: Pagar boleto | | HIGH")
            .await;

        assert_eq!(store.tasks.lock().unwrap()[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn task_without_title_is_rejected() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone())
            .interpret(PHONE, "TAREFA:  | descrição sem título")
            .await;

        assert!(!out.success);
        assert!(out.error.unwrap().contains("título"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn task_with_unparsable_due_date_stores_none() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        interpreter(store.clone())
            .interpret(PHONE, "TAREFA: Ligar para Ana | | | sexta")
            .await;

        assert_eq!(store.tasks.lock().unwrap()[0].due_date, None);
    }

    #[tokio::test]
    async fn event_end_time_defaults_to_start_plus_one_hour() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone())
            .interpret(PHONE, "EVENTO: Reunião | 27/06/2025 | 14:00")
            .await;

        assert!(out.success);
        let events = store.events.lock().unwrap();
        assert_eq!(
            events[0].start_time,
            Local.with_ymd_and_hms(2025, 6, 27, 14, 0, 0).unwrap()
        );
        assert_eq!(
            events[0].end_time,
            Local.with_ymd_and_hms(2025, 6, 27, 15, 0, 0).unwrap()
        );
        assert_eq!(events[0].description, "");
    }

    #[tokio::test]
    async fn unparsable_end_time_also_defaults() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        interpreter(store.clone())
            .interpret(PHONE, "EVENTO: Reunião | 27/06/2025 | 14:00 | depois | Sala 2")
            .await;

        let events = store.events.lock().unwrap();
        assert_eq!(
            events[0].end_time,
            Local.with_ymd_and_hms(2025, 6, 27, 15, 0, 0).unwrap()
        );
        assert_eq!(events[0].location, "Sala 2");
    }

    #[tokio::test]
    async fn event_without_date_is_rejected_without_writes() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone())
            .interpret(PHONE, "EVENTO: Reunião")
            .await;

        assert!(!out.success);
        assert!(out.error.unwrap().contains("obrigatórias"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn contact_defaults_trailing_fields_to_empty() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone())
            .interpret(PHONE, "CONTATO: Ana Souza | ana@exemplo.com")
            .await;

        assert!(out.success);
        let contacts = store.contacts.lock().unwrap();
        assert_eq!(contacts[0].name, "Ana Souza");
        assert_eq!(contacts[0].email, "ana@exemplo.com");
        assert_eq!(contacts[0].phone, "");
        assert_eq!(contacts[0].company, "");
        assert_eq!(contacts[0].position, "");
    }

    #[tokio::test]
    async fn contact_without_name_is_rejected() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone()).interpret(PHONE, "contato:").await;

        assert!(!out.success);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn unrecognized_command_lists_the_verbs() {
        let store = Arc::new(MemStore::with_user(PHONE, "u-1"));
        let out = interpreter(store.clone()).interpret(PHONE, "bom dia").await;

        assert!(!out.success);
        assert_eq!(out.record_type, RecordType::None);
        assert!(out.error.unwrap().contains("TAREFA:"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn storage_failure_surfaces_in_the_outcome() {
        let store = Arc::new(MemStore {
            fail_inserts: true,
            ..MemStore::with_user(PHONE, "u-1")
        });
        let out = interpreter(store)
            .interpret(PHONE, "TAREFA: Revisar contrato")
            .await;

        assert!(!out.success);
        assert!(out.error.unwrap().contains("insert rejected"));
    }
}
