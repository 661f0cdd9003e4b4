use jiff::civil::Date;
use parking_lot::Mutex;

use crate::{
    error::{CoreError, CoreResult, EntityKind},
    merge::{merge_film, merge_user},
    models::{Film, FilmCandidate, Patch, User, UserCandidate},
    store::{EntityStore, Record},
    validation::{Mode, validate_film, validate_user},
};

/// In-memory films and users.
///
/// Each store has its own lock, held from validation through insertion so
/// concurrent creates never share an id and readers never see a partial write.
pub struct Catalog {
    films: Mutex<EntityStore<Film>>,
    users: Mutex<EntityStore<User>>,
    today: fn() -> Date,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_clock(local_today)
    }

    /// Uses `today` to bound birthdays instead of the local calendar date.
    pub fn with_clock(today: fn() -> Date) -> Self {
        Self { films: Mutex::new(EntityStore::new()), users: Mutex::new(EntityStore::new()), today }
    }

    pub fn list_films(&self) -> Vec<Film> {
        self.films.lock().snapshot()
    }

    pub fn film_count(&self) -> usize {
        self.films.lock().len()
    }

    pub fn get_film(&self, id: i64) -> CoreResult<Film> {
        self.films
            .lock()
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: EntityKind::Film, id })
    }

    pub fn create_film(&self, candidate: FilmCandidate) -> CoreResult<Film> {
        let mut films = self.films.lock();
        validate_film(&candidate, Mode::Create)?;

        let film = candidate.into_film(films.next_id())?;
        films.insert(film.clone());
        Ok(film)
    }

    pub fn update_film(&self, candidate: FilmCandidate) -> CoreResult<Film> {
        let mut films = self.films.lock();
        let stored = existing(&films, &candidate.id, EntityKind::Film)?;
        validate_film(&candidate, Mode::Update)?;

        let merged = merge_film(candidate, stored);
        validate_film(&merged, Mode::Create)?;

        let film = merged.into_film(stored.id)?;
        films.insert(film.clone());
        Ok(film)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.lock().snapshot()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().len()
    }

    pub fn get_user(&self, id: i64) -> CoreResult<User> {
        self.users
            .lock()
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: EntityKind::User, id })
    }

    pub fn create_user(&self, candidate: UserCandidate) -> CoreResult<User> {
        let today = (self.today)();
        let mut users = self.users.lock();
        validate_user(&candidate, Mode::Create, today)?;

        let user = candidate.into_user(users.next_id())?;
        users.insert(user.clone());
        Ok(user)
    }

    pub fn update_user(&self, candidate: UserCandidate) -> CoreResult<User> {
        let today = (self.today)();
        let mut users = self.users.lock();
        let stored = existing(&users, &candidate.id, EntityKind::User)?;
        validate_user(&candidate, Mode::Update, today)?;

        let merged = merge_user(candidate, stored);
        validate_user(&merged, Mode::Create, today)?;

        let user = merged.into_user(stored.id)?;
        users.insert(user.clone());
        Ok(user)
    }
}

/// Looks up the record an update targets. A missing id is reported before an
/// unknown one.
fn existing<'a, T: Record>(
    store: &'a EntityStore<T>,
    id: &Patch<i64>,
    entity: EntityKind,
) -> CoreResult<&'a T> {
    let &Patch::Value(id) = id else {
        return Err(CoreError::MissingId { entity });
    };
    store.get(id).ok_or(CoreError::NotFound { entity, id })
}

fn local_today() -> Date {
    jiff::Zoned::now().into()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::validation::{FieldError, Rule};

    fn fixed_today() -> Date {
        date(2024, 6, 15)
    }

    fn catalog() -> Catalog {
        Catalog::with_clock(fixed_today)
    }

    fn film(name: &str) -> FilmCandidate {
        FilmCandidate {
            id: Patch::Unset,
            name: Patch::Value(name.to_string()),
            description: Patch::Value("Valid description".to_string()),
            release_date: Patch::Value(date(2000, 1, 1)),
            duration: Patch::Value(120),
        }
    }

    fn user(login: &str) -> UserCandidate {
        UserCandidate {
            id: Patch::Unset,
            email: Patch::Value(format!("{login}@example.com")),
            login: Patch::Value(login.to_string()),
            name: Patch::Unset,
            birthday: Patch::Value(date(1990, 1, 1)),
        }
    }

    fn invalid(rule: Rule) -> CoreError {
        CoreError::Validation(FieldError::new(rule))
    }

    #[test]
    fn create_film_assigns_increasing_ids() {
        let catalog = catalog();
        let mut last = 0;
        for name in ["a", "b", "c"] {
            let created = catalog.create_film(film(name)).unwrap();
            assert!(created.id > last);
            last = created.id;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn create_ignores_caller_supplied_id() {
        let catalog = catalog();
        let created = catalog.create_film(FilmCandidate { id: Patch::Value(42), ..film("a") }).unwrap();
        assert_eq!(created.id, 1);
    }

    #[test]
    fn rejected_create_does_not_consume_an_id() {
        let catalog = catalog();
        let err = catalog.create_film(FilmCandidate { duration: Patch::Value(0), ..film("a") });
        assert_eq!(err.unwrap_err(), invalid(Rule::FilmDurationNotPositive));
        assert_eq!(catalog.film_count(), 0);

        assert_eq!(catalog.create_film(film("b")).unwrap().id, 1);
    }

    #[test]
    fn list_returns_every_created_record() {
        let catalog = catalog();
        catalog.create_film(film("Heat")).unwrap();
        catalog.create_film(film("Ronin")).unwrap();

        let films = catalog.list_films();
        assert_eq!(films.len(), 2);
        assert_eq!(films[0].name, "Heat");
        assert_eq!(films[1].name, "Ronin");
        assert_eq!(films[1].duration, 120);
    }

    #[test]
    fn update_precondition_precedence() {
        let catalog = catalog();
        let invalid_fields = FilmCandidate { name: Patch::Value(String::new()), ..film("a") };

        let err = catalog.update_film(invalid_fields.clone()).unwrap_err();
        assert_eq!(err, CoreError::MissingId { entity: EntityKind::Film });

        let err = catalog.update_film(FilmCandidate { id: Patch::Null, ..film("a") }).unwrap_err();
        assert_eq!(err, CoreError::MissingId { entity: EntityKind::Film });

        let err = catalog
            .update_film(FilmCandidate { id: Patch::Value(999), ..invalid_fields })
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound { entity: EntityKind::Film, id: 999 });
    }

    #[test]
    fn partial_film_update_inherits_and_overrides() {
        let catalog = catalog();
        let created = catalog.create_film(film("Solaris")).unwrap();

        let updated = catalog
            .update_film(FilmCandidate {
                id: Patch::Value(created.id),
                duration: Patch::Value(167),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated, Film { duration: 167, ..created });
        assert_eq!(catalog.get_film(updated.id).unwrap(), updated);
    }

    #[test]
    fn invalid_update_leaves_store_unchanged() {
        let catalog = catalog();
        let created = catalog.create_film(film("Solaris")).unwrap();

        let err = catalog
            .update_film(FilmCandidate {
                id: Patch::Value(created.id),
                release_date: Patch::Value(date(1895, 12, 27)),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(err, invalid(Rule::FilmReleaseDateTooEarly));
        assert_eq!(catalog.list_films(), vec![created]);
    }

    #[test]
    fn create_user_defaults_blank_name_to_login() {
        let catalog = catalog();
        for name in [Patch::Unset, Patch::Null, Patch::Value("   ".to_string())] {
            let created = catalog.create_user(UserCandidate { name, ..user("testlogin") }).unwrap();
            assert_eq!(created.name, "testlogin");
        }

        let named = UserCandidate { name: Patch::Value("Test User".to_string()), ..user("x") };
        assert_eq!(catalog.create_user(named).unwrap().name, "Test User");
    }

    #[test]
    fn birthday_uses_injected_clock() {
        let catalog = catalog();
        let today = UserCandidate { birthday: Patch::Value(fixed_today()), ..user("a") };
        assert!(catalog.create_user(today).is_ok());

        let tomorrow = UserCandidate { birthday: Patch::Value(date(2024, 6, 16)), ..user("b") };
        assert_eq!(catalog.create_user(tomorrow).unwrap_err(), invalid(Rule::UserBirthdayInFuture));
    }

    #[test]
    fn login_only_user_update_keeps_other_fields() {
        let catalog = catalog();
        let created = catalog.create_user(user("before")).unwrap();

        let updated = catalog
            .update_user(UserCandidate {
                id: Patch::Value(created.id),
                login: Patch::Value("after".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.email, created.email);
        assert_eq!(updated.birthday, created.birthday);
        assert_eq!(updated.login, "after");
        assert_eq!(catalog.list_users(), vec![updated]);
    }

    #[test]
    fn user_update_unknown_id() {
        let catalog = catalog();
        let err = catalog
            .update_user(UserCandidate { id: Patch::Value(999), ..user("login") })
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound { entity: EntityKind::User, id: 999 });
        assert_eq!(catalog.get_user(999).unwrap_err(), err);
    }

    #[test]
    fn user_update_precondition_precedence() {
        let catalog = catalog();
        let invalid_fields = UserCandidate { email: Patch::Value("nope".to_string()), ..user("a") };

        let err = catalog.update_user(invalid_fields.clone()).unwrap_err();
        assert_eq!(err, CoreError::MissingId { entity: EntityKind::User });

        let err = catalog
            .update_user(UserCandidate { id: Patch::Null, ..invalid_fields.clone() })
            .unwrap_err();
        assert_eq!(err, CoreError::MissingId { entity: EntityKind::User });

        let err = catalog
            .update_user(UserCandidate { id: Patch::Value(999), ..invalid_fields })
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound { entity: EntityKind::User, id: 999 });
        assert_eq!(catalog.user_count(), 0);
    }

    #[test]
    fn null_required_user_fields_keep_stored_values() {
        let catalog = catalog();
        let created = catalog.create_user(user("a")).unwrap();

        let candidate: UserCandidate =
            serde_json::from_str(r#"{"id": 1, "email": null, "login": "b", "birthday": null}"#)
                .unwrap();
        let updated = catalog.update_user(candidate).unwrap();

        assert_eq!(updated.email, created.email);
        assert_eq!(updated.birthday, created.birthday);
        assert_eq!(updated.login, "b");
        assert_eq!(catalog.get_user(1).unwrap(), updated);
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let catalog = std::sync::Arc::new(catalog());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = catalog.clone();
                std::thread::spawn(move || catalog.create_user(user(&format!("u{i}"))).unwrap().id)
            })
            .collect();

        let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }
}
