// Unit tests for crude-manager
// These exercise the public API: controller scenarios and config files.

#[cfg(test)]
mod controller_tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use crude_manager::{
        ControllerError, Draft, NewUser, RemoteCallFailure, RemoteUserService, UserField, UserId,
        UserListController, UserRecord, VISIBLE_LIMIT,
    };

    /// Scripted service: returns `list` for every list call and `created`
    /// for create; `fail` makes the next calls fail with that message.
    struct ScriptedService {
        list: Vec<UserRecord>,
        created: UserRecord,
        fail: Mutex<Option<String>>,
    }

    impl ScriptedService {
        fn new(list: Vec<UserRecord>) -> Self {
            Self {
                list,
                created: create_test_user(99, "New"),
                fail: Mutex::new(None),
            }
        }

        fn fail_with(&self, msg: &str) {
            *self.fail.lock().unwrap() = Some(msg.to_string());
        }

        fn outcome(&self) -> Result<(), RemoteCallFailure> {
            match self.fail.lock().unwrap().clone() {
                Some(msg) => Err(RemoteCallFailure::new(msg)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl RemoteUserService for ScriptedService {
        async fn list(&self, _query: Option<&str>) -> Result<Vec<UserRecord>, RemoteCallFailure> {
            self.outcome()?;
            Ok(self.list.clone())
        }
        async fn create(&self, _user: &NewUser) -> Result<UserRecord, RemoteCallFailure> {
            self.outcome()?;
            Ok(self.created.clone())
        }
        async fn update(&self, _id: UserId, _user: &UserRecord) -> Result<(), RemoteCallFailure> {
            self.outcome()
        }
        async fn delete(&self, _id: UserId) -> Result<(), RemoteCallFailure> {
            self.outcome()
        }
    }

    fn create_test_user(id: u64, name: &str) -> UserRecord {
        UserRecord {
            id: UserId(id),
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            phone: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn scenario_remove_second_of_two() {
        let svc = ScriptedService::new(vec![create_test_user(1, "Ann"), create_test_user(2, "Bo")]);
        let mut c = UserListController::new();
        c.load(&svc, None).await.unwrap();
        c.remove(&svc, UserId(2)).await.unwrap();
        assert_eq!(c.users(), &[create_test_user(1, "Ann")]);
        assert_eq!(c.visible(), c.users());
    }

    #[tokio::test]
    async fn scenario_seven_users_show_first_five_in_order() {
        let seven: Vec<_> = (1..=7).map(|i| create_test_user(i, &format!("u{i}"))).collect();
        let svc = ScriptedService::new(seven.clone());
        let mut c = UserListController::new();
        c.load(&svc, None).await.unwrap();
        assert_eq!(c.visible().len(), VISIBLE_LIMIT);
        assert_eq!(c.visible(), &seven[..5]);
    }

    #[tokio::test]
    async fn scenario_failed_edit_keeps_draft_and_original() {
        let svc = ScriptedService::new(vec![create_test_user(3, "X")]);
        let mut c = UserListController::new();
        c.load(&svc, None).await.unwrap();
        let target = c.users()[0].clone();
        c.begin_edit(&target).unwrap();
        c.update_draft_field("name".parse::<UserField>().unwrap(), "Y").unwrap();
        svc.fail_with("network error");
        let err = c.commit_edit(&svc).await.unwrap_err();
        assert_eq!(err.to_string(), "network error");
        assert_eq!(c.users()[0].name, "X");
        assert_eq!(c.edit_draft().unwrap().name, "Y");
        assert_eq!(c.last_error(), Some("network error"));
    }

    #[tokio::test]
    async fn scenario_create_appends_server_record() {
        let svc = ScriptedService::new(vec![create_test_user(1, "Ann")]);
        let mut c = UserListController::new();
        c.load(&svc, None).await.unwrap();
        c.begin_create().unwrap();
        c.update_create_field(UserField::Name, "New").unwrap();
        c.commit_create(&svc).await.unwrap();
        let last = c.users().last().unwrap();
        assert_eq!((last.id, last.name.as_str()), (UserId(99), "New"));
        assert_eq!(c.draft(), &Draft::Idle);
    }

    #[tokio::test]
    async fn busy_rejection_is_not_an_error_slot_event() {
        let svc = ScriptedService::new(vec![create_test_user(1, "Ann")]);
        let mut c = UserListController::new();
        c.search(&svc, "An").await.unwrap();
        let _call = c.begin_load(None).unwrap();
        assert_eq!(c.search(&svc, "x").await, Err(ControllerError::Busy));
        assert_eq!(c.search_query(), "An");
        assert!(c.last_error().is_none());
        assert!(c.is_busy());
    }
}

#[cfg(test)]
mod config_tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use crude_manager::app::config::AppConfig;
    use crude_manager::app::keymap::{KeyAction, Keymap};
    use crude_manager::app::theme::Theme;

    fn temp_path(tag: &str) -> PathBuf {
        let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!("crude_{tag}_{}_{nonce}.conf", std::process::id()))
    }

    #[test]
    fn theme_roundtrip() {
        let path = temp_path("theme");
        let p = path.to_string_lossy().to_string();
        let t = Theme::mocha();
        t.write_file(&p).expect("write theme");
        assert_eq!(Theme::from_file(&p), Some(t));
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn keymap_written_file_reloads_same_bindings() {
        let path = temp_path("keys");
        let p = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&p);
        let km = Keymap::load_or_init(&p);
        assert!(path.exists());
        let reloaded = Keymap::from_file(&p).expect("read keymap");
        for code in [KeyCode::Char('q'), KeyCode::Char('/'), KeyCode::Delete, KeyCode::Enter] {
            let ev = KeyEvent::new(code, KeyModifiers::NONE);
            assert_eq!(km.resolve(&ev), reloaded.resolve(&ev));
        }
        assert_eq!(reloaded.keys_for(KeyAction::Reload), vec!["r".to_string()]);
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn config_load_or_init_writes_defaults() {
        let path = temp_path("cfg");
        let p = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&p);
        let cfg = AppConfig::load_or_init(&p);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(AppConfig::from_file(&p), Some(AppConfig::default()));
        let _ = std::fs::remove_file(&p);
    }
}
