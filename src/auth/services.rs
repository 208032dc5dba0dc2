use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::HashedPassword,
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::{required, AppError},
};

/// Creates an account and signs its first session token.
pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<(User, String), AppError> {
    let full_name = required(req.full_name, "Full name is required!")?;
    let email = required(req.email, "Email is required!")?;
    let password = required(req.password, "Password is required!")?;

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = HashedPassword::hash(&password)?;
    let user = users
        .create(NewUser {
            full_name,
            email: email.clone(),
            password_hash,
        })
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "email registered concurrently");
            AppError::DuplicateEmail
        })?;

    let token = keys.issue(&user)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

/// Checks credentials and returns the authenticated user with a fresh token.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<(User, String), AppError> {
    let email = required(req.email, "Email is required!")?;
    let password = required(req.password, "Password is required!")?;

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::UserNotFound);
    };

    if !user.password_matches(&password)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.issue(&user)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((user, token))
}

/// Loads the caller's account. A token whose user no longer exists is
/// treated as unauthorized.
pub async fn profile(users: &dyn UserStore, user_id: Uuid) -> Result<User, AppError> {
    users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token for unknown user");
        AppError::Unauthorized("User not found".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, memory::MemoryStore};

    fn keys() -> JwtKeys {
        JwtKeys::new(&AppConfig::for_tests().jwt)
    }

    fn register_req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn register_issues_token_for_new_user() {
        let store = MemoryStore::default();
        let keys = keys();
        let (user, token) = register(&store, &keys, register_req("Ann", "ann@x.io", "pw1"))
            .await
            .unwrap();
        assert_eq!(user.full_name, "Ann");
        assert_ne!(user.password_hash, "pw1");
        assert_eq!(keys.verify(&token).unwrap().sub, user.id);
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let store = MemoryStore::default();
        let mut req = register_req("Ann", "ann@x.io", "pw");
        req.full_name = None;
        let err = register(&store, &keys(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Full name is required!"));

        let mut req = register_req("Ann", "ann@x.io", "pw");
        req.email = Some(String::new());
        let err = register(&store, &keys(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Email is required!"));

        let mut req = register_req("Ann", "ann@x.io", "pw");
        req.password = None;
        let err = register(&store, &keys(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Password is required!"));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_user_kept() {
        let store = MemoryStore::default();
        let keys = keys();
        let (first, _) = register(&store, &keys, register_req("Ann", "ann@x.io", "pw1"))
            .await
            .unwrap();
        let err = register(&store, &keys, register_req("Impostor", "ann@x.io", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let stored = store.find_by_email("ann@x.io").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.full_name, "Ann");
        assert!(stored.password_matches("pw1").unwrap());
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, &keys, register_req("Ann", "ann@x.io", "pw1"))
            .await
            .unwrap();

        let ok = login(
            &store,
            &keys,
            LoginRequest {
                email: Some("ann@x.io".into()),
                password: Some("pw1".into()),
            },
        )
        .await;
        let (user, token) = ok.unwrap();
        assert_eq!(keys.verify(&token).unwrap().sub, user.id);

        let wrong = login(
            &store,
            &keys,
            LoginRequest {
                email: Some("ann@x.io".into()),
                password: Some("nope".into()),
            },
        )
        .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        let unknown = login(
            &store,
            &keys,
            LoginRequest {
                email: Some("bob@x.io".into()),
                password: Some("pw1".into()),
            },
        )
        .await;
        assert!(matches!(unknown, Err(AppError::UserNotFound)));

        let missing = login(&store, &keys, LoginRequest::default()).await;
        assert!(matches!(missing, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, &keys, register_req("Ann", "ann@x.io", "pw1"))
            .await
            .unwrap();
        let res = login(
            &store,
            &keys,
            LoginRequest {
                email: Some("ANN@x.io".into()),
                password: Some("pw1".into()),
            },
        )
        .await;
        assert!(matches!(res, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn profile_of_missing_user_is_unauthorized() {
        let store = MemoryStore::default();
        let err = profile(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
