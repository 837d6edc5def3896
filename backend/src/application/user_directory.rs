//! Registry operations over the user store.

use std::fmt;
use std::sync::Arc;

use crate::application::ports::{IdentityGenerator, UserStore};
use crate::domain::{DisplayName, Email, NewUser, RfidTag, User, UserChanges, UserFilter, UserId};
use crate::error::DirectoryError;

/// How `create` turns a request into a row.
#[derive(Clone)]
pub enum CreationStrategy {
    /// Caller supplies name and email; an existing email short-circuits
    /// with [`CreateOutcome::AlreadyExists`].
    UniqueEmail,
    /// Caller supplies only the tag; the generator invents the identity
    /// and nothing is checked before insert.
    Synthetic(Arc<dyn IdentityGenerator>),
}

impl fmt::Debug for CreationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationStrategy::UniqueEmail => f.write_str("UniqueEmail"),
            CreationStrategy::Synthetic(_) => f.write_str("Synthetic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub rfid: RfidTag,
    pub name: Option<DisplayName>,
    pub email: Option<Email>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: DisplayName,
    pub email: Email,
    pub rfid: RfidTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(User),
    AlreadyExists,
}

impl CreateOutcome {
    pub const ALREADY_EXISTS_MESSAGE: &'static str = "User already exists";
}

pub struct UserDirectory {
    store: Arc<dyn UserStore>,
    creation: CreationStrategy,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn UserStore>, creation: CreationStrategy) -> Self {
        Self { store, creation }
    }

    /// Whether `create` reads the caller's name and email. Synthetic
    /// creation only reads the tag.
    pub fn reads_submitted_identity(&self) -> bool {
        matches!(self.creation, CreationStrategy::UniqueEmail)
    }

    pub async fn create(&self, input: CreateUser) -> Result<CreateOutcome, DirectoryError> {
        let subject = input
            .email
            .as_ref()
            .map_or_else(|| input.rfid.to_string(), Email::to_string);
        let result = match &self.creation {
            CreationStrategy::UniqueEmail => self.create_unique(input).await,
            CreationStrategy::Synthetic(generator) => {
                self.create_synthetic(generator.as_ref(), input.rfid).await
            }
        };
        log_store_failure("create", &subject, &result);
        if let Ok(CreateOutcome::Created(user)) = &result {
            tracing::info!(user_id = %user.id(), rfid = %user.rfid(), "user created");
        }
        result
    }

    async fn create_unique(&self, input: CreateUser) -> Result<CreateOutcome, DirectoryError> {
        let (Some(name), Some(email)) = (input.name, input.email) else {
            return Err(DirectoryError::invalid("name and email are required"));
        };

        if self.store.find_by_email(&email).await?.is_some() {
            tracing::debug!(%email, "user already exists");
            return Ok(CreateOutcome::AlreadyExists);
        }

        let user = self.store.create(NewUser::new(name, email, input.rfid)).await?;
        Ok(CreateOutcome::Created(user))
    }

    async fn create_synthetic(
        &self,
        generator: &dyn IdentityGenerator,
        rfid: RfidTag,
    ) -> Result<CreateOutcome, DirectoryError> {
        let identity = generator.generate().map_err(DirectoryError::Identity)?;
        let new_user = NewUser {
            entered_department: Some(identity.entered_department),
            ..NewUser::new(identity.name, identity.email, rfid)
        };
        let user = self.store.create(new_user).await?;
        Ok(CreateOutcome::Created(user))
    }

    /// Every available user, in store order.
    pub async fn find_all(&self) -> Result<Vec<User>, DirectoryError> {
        Ok(self.store.find_many(UserFilter::available_only()).await?)
    }

    /// Looks a user up by id whether or not it has been removed.
    pub async fn find_one(&self, id: &UserId) -> Result<User, DirectoryError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::NotFound)
    }

    /// Overwrites name, email and tag unless the tag is unchanged, in which
    /// case the stored row is returned without a write.
    pub async fn update(&self, id: &UserId, input: UpdateUser) -> Result<User, DirectoryError> {
        let result = self.update_row(id, input).await;
        log_store_failure("update", id, &result);
        result
    }

    async fn update_row(&self, id: &UserId, input: UpdateUser) -> Result<User, DirectoryError> {
        let user = self.find_one(id).await?;
        if user.rfid() == &input.rfid {
            return Ok(user);
        }

        let changes = UserChanges {
            name: Some(input.name),
            email: Some(input.email),
            rfid: Some(input.rfid),
            available: None,
        };
        Ok(self.store.update(id, changes).await?)
    }

    /// Marks the user unavailable. Removing an unavailable user is a no-op.
    pub async fn remove(&self, id: &UserId) -> Result<User, DirectoryError> {
        let result = self.deactivate(id).await;
        log_store_failure("remove", id, &result);
        result
    }

    async fn deactivate(&self, id: &UserId) -> Result<User, DirectoryError> {
        let user = self.find_one(id).await?;
        if !user.is_available() {
            return Ok(user);
        }

        let changes = UserChanges {
            available: Some(false),
            ..Default::default()
        };
        let user = self.store.update(id, changes).await?;
        tracing::info!(user_id = %id, "user marked unavailable");
        Ok(user)
    }
}

fn log_store_failure<T>(operation: &str, subject: &dyn fmt::Display, result: &Result<T, DirectoryError>) {
    match result {
        Err(DirectoryError::Store(error)) => {
            tracing::error!(operation, subject = %subject, %error, "user store failure");
        }
        Err(error @ DirectoryError::Identity(_)) => {
            tracing::error!(operation, subject = %subject, %error, "identity generation failed");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockUserStore, SyntheticIdentity};
    use crate::error::StoreError;
    use crate::infrastructure::driven::persistence::InMemoryUserStore;

    impl CreateUser {
        fn registered(name: DisplayName, email: Email, rfid: RfidTag) -> Self {
            Self {
                rfid,
                name: Some(name),
                email: Some(email),
            }
        }

        fn tag_only(rfid: RfidTag) -> Self {
            Self {
                rfid,
                name: None,
                email: None,
            }
        }
    }

    struct FixedIdentity;

    impl IdentityGenerator for FixedIdentity {
        fn generate(&self) -> Result<SyntheticIdentity, String> {
            Ok(SyntheticIdentity {
                name: name("Grace Hopper"),
                email: email("grace.hopper@example.com"),
                entered_department: true,
            })
        }
    }

    struct RejectedIdentity;

    impl IdentityGenerator for RejectedIdentity {
        fn generate(&self) -> Result<SyntheticIdentity, String> {
            Err("Invalid email format".to_string())
        }
    }

    fn name(raw: &str) -> DisplayName {
        DisplayName::new(raw.to_string()).unwrap()
    }

    fn email(raw: &str) -> Email {
        Email::new(raw.to_string()).unwrap()
    }

    fn tag(raw: &str) -> RfidTag {
        RfidTag::new(raw.to_string()).unwrap()
    }

    fn ana() -> CreateUser {
        CreateUser::registered(name("Ana Li"), email("ana@x.com"), tag("R1"))
    }

    fn directory(store: Arc<InMemoryUserStore>) -> UserDirectory {
        UserDirectory::new(store, CreationStrategy::UniqueEmail)
    }

    fn created(outcome: CreateOutcome) -> User {
        match outcome {
            CreateOutcome::Created(user) => user,
            CreateOutcome::AlreadyExists => panic!("expected a new user"),
        }
    }

    #[tokio::test]
    async fn test_create_returns_available_user_with_submitted_fields() {
        let store = Arc::new(InMemoryUserStore::new());
        let user = created(directory(store.clone()).create(ana()).await.unwrap());

        assert!(user.is_available());
        assert_eq!(user.name().as_str(), "Ana Li");
        assert_eq!(user.email().as_str(), "ana@x.com");
        assert_eq!(user.rfid().as_str(), "R1");
        assert_eq!(user.entered_department(), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_taken_email_reports_already_exists() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        directory.create(ana()).await.unwrap();

        let second = CreateUser::registered(name("Someone Else"), email("ana@x.com"), tag("R9"));
        let outcome = directory.create(second).await.unwrap();

        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert_eq!(store.len(), 1);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        let first = CreateUser::registered(name("Ana Li"), email("Ana@X.com"), tag("R1"));
        let first = created(directory.create(first).await.unwrap());

        let second = created(directory.create(ana()).await.unwrap());

        assert_eq!(first.email().as_str(), "Ana@X.com");
        assert_eq!(second.email().as_str(), "ana@x.com");
        assert_ne!(first.id(), second.id());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_unique_email_strategy_requires_name_and_email() {
        let store = Arc::new(InMemoryUserStore::new());
        let err = directory(store.clone())
            .create(CreateUser::tag_only(tag("R1")))
            .await
            .unwrap_err();

        assert!(matches!(err, DirectoryError::InvalidInput(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_synthetic_strategy_skips_existence_check() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = UserDirectory::new(
            store.clone(),
            CreationStrategy::Synthetic(Arc::new(FixedIdentity)),
        );

        let first = created(directory.create(CreateUser::tag_only(tag("R1"))).await.unwrap());
        let second = created(directory.create(CreateUser::tag_only(tag("R2"))).await.unwrap());

        assert_eq!(first.name().as_str(), "Grace Hopper");
        assert_eq!(first.entered_department(), Some(true));
        assert_eq!(first.email(), second.email());
        assert_ne!(first.id(), second.id());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_synthetic_strategy_ignores_supplied_identity() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = UserDirectory::new(store, CreationStrategy::Synthetic(Arc::new(FixedIdentity)));

        let user = created(directory.create(ana()).await.unwrap());

        assert_eq!(user.email().as_str(), "grace.hopper@example.com");
        assert_eq!(user.rfid().as_str(), "R1");
    }

    #[tokio::test]
    async fn test_rejected_identity_writes_nothing() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = UserDirectory::new(
            store.clone(),
            CreationStrategy::Synthetic(Arc::new(RejectedIdentity)),
        );

        let err = directory.create(CreateUser::tag_only(tag("R1"))).await.unwrap_err();

        assert!(matches!(err, DirectoryError::Identity(ref message) if message == "Invalid email format"));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_everywhere() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        let id = UserId::new();
        let input = UpdateUser {
            name: name("Ana Li"),
            email: email("ana@x.com"),
            rfid: tag("R2"),
        };

        assert!(matches!(directory.find_one(&id).await, Err(DirectoryError::NotFound)));
        assert!(matches!(directory.update(&id, input).await, Err(DirectoryError::NotFound)));
        assert!(matches!(directory.remove(&id).await, Err(DirectoryError::NotFound)));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_with_same_rfid_is_a_no_op() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        let user = created(directory.create(ana()).await.unwrap());

        let input = UpdateUser {
            name: name("Renamed"),
            email: email("renamed@x.com"),
            rfid: tag("R1"),
        };
        let returned = directory.update(user.id(), input).await.unwrap();

        assert_eq!(returned, user);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_update_with_new_rfid_overwrites_identity_fields() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        let user = created(directory.create(ana()).await.unwrap());
        directory.remove(user.id()).await.unwrap();

        let input = UpdateUser {
            name: name("Ana Lima"),
            email: email("ana.lima@x.com"),
            rfid: tag("R2"),
        };
        let updated = directory.update(user.id(), input).await.unwrap();

        assert_eq!(updated.id(), user.id());
        assert_eq!(updated.name().as_str(), "Ana Lima");
        assert_eq!(updated.email().as_str(), "ana.lima@x.com");
        assert_eq!(updated.rfid().as_str(), "R2");
        assert!(!updated.is_available());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        let user = created(directory.create(ana()).await.unwrap());

        let first = directory.remove(user.id()).await.unwrap();
        let writes = store.writes();
        let second = directory.remove(user.id()).await.unwrap();

        assert!(!first.is_available());
        assert_eq!(first, second);
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_find_all_excludes_unavailable_users() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());
        let gone = created(directory.create(ana()).await.unwrap());
        let kept = created(
            directory
                .create(CreateUser::registered(name("Bo Chen"), email("bo@x.com"), tag("R3")))
                .await
                .unwrap(),
        );
        directory.remove(gone.id()).await.unwrap();

        let listed = directory.find_all().await.unwrap();

        assert_eq!(listed, vec![kept]);
        assert!(!directory.find_one(gone.id()).await.unwrap().is_available());
    }

    #[tokio::test]
    async fn test_registration_lifecycle() {
        let store = Arc::new(InMemoryUserStore::new());
        let directory = directory(store.clone());

        let user = created(directory.create(ana()).await.unwrap());
        assert!(user.is_available());

        assert_eq!(directory.create(ana()).await.unwrap(), CreateOutcome::AlreadyExists);
        assert_eq!(store.len(), 1);

        let removed = directory.remove(user.id()).await.unwrap();
        assert!(!removed.is_available());
        assert_eq!(directory.remove(user.id()).await.unwrap(), removed);

        assert!(directory.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_surfaces_store_failure() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_create()
            .times(1)
            .returning(|_| Err(StoreError::Corrupt("insert rejected".to_string())));
        let directory = UserDirectory::new(Arc::new(store), CreationStrategy::UniqueEmail);

        let err = directory.create(ana()).await.unwrap_err();

        assert!(matches!(err, DirectoryError::Store(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_update_surfaces_store_failure() {
        let existing = {
            let store = InMemoryUserStore::new();
            store.create(NewUser::new(name("Ana Li"), email("ana@x.com"), tag("R1"))).await.unwrap()
        };
        let id = *existing.id();

        let mut store = MockUserStore::new();
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        store
            .expect_update()
            .times(1)
            .returning(|id, _| Err(StoreError::RowMissing(*id)));
        let directory = UserDirectory::new(Arc::new(store), CreationStrategy::UniqueEmail);

        let input = UpdateUser {
            name: name("Ana Li"),
            email: email("ana@x.com"),
            rfid: tag("R2"),
        };
        let err = directory.update(&id, input).await.unwrap_err();

        assert!(matches!(err, DirectoryError::Store(StoreError::RowMissing(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_remove_of_unavailable_user_never_writes() {
        let existing = {
            let store = InMemoryUserStore::new();
            let user = store.create(NewUser::new(name("Ana Li"), email("ana@x.com"), tag("R1"))).await.unwrap();
            let changes = UserChanges {
                available: Some(false),
                ..Default::default()
            };
            store.update(user.id(), changes).await.unwrap()
        };
        let id = *existing.id();

        let mut store = MockUserStore::new();
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        store.expect_update().never();
        let directory = UserDirectory::new(Arc::new(store), CreationStrategy::UniqueEmail);

        assert!(!directory.remove(&id).await.unwrap().is_available());
    }

    #[tokio::test]
    async fn test_find_all_propagates_store_failure() {
        let mut store = MockUserStore::new();
        store
            .expect_find_many()
            .withf(|filter| *filter == UserFilter::available_only())
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        let directory = UserDirectory::new(Arc::new(store), CreationStrategy::UniqueEmail);

        assert!(matches!(
            directory.find_all().await,
            Err(DirectoryError::Store(StoreError::Database(_)))
        ));
    }
}
