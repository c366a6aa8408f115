#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::SessionIdentity;
use chrono::Utc;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use serde_json::json;
use serde_json::Value;
use shop_service::domain::product::errors::ProductError;
use shop_service::domain::product::models::NewProduct;
use shop_service::domain::product::models::Product;
use shop_service::domain::product::models::ProductId;
use shop_service::domain::product::ports::ProductRepository;
use shop_service::domain::product::service::ProductService;
use shop_service::domain::user::errors::UserError;
use shop_service::domain::user::models::CreateUserCommand;
use shop_service::domain::user::models::EmailAddress;
use shop_service::domain::user::models::NewUser;
use shop_service::domain::user::models::Password;
use shop_service::domain::user::models::Role;
use shop_service::domain::user::models::User;
use shop_service::domain::user::models::UserId;
use shop_service::domain::user::models::Username;
use shop_service::domain::user::ports::UserRepository;
use shop_service::domain::user::ports::UserServicePort;
use shop_service::domain::user::service::UserService;
use shop_service::inbound::http::router::create_router;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "rootpass123";

/// Test application that spawns a real server backed by in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::clone(&authenticator),
        ));
        let product_service = Arc::new(ProductService::new(Arc::new(
            InMemoryProductRepository::default(),
        )));

        let router = create_router(
            user_service.clone(),
            product_service,
            Arc::clone(&authenticator),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            user_service,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Attach a session token the way a browser would send it back
    pub fn with_session(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.header(COOKIE, format!("_token={}", token))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        Self::with_session(self.get(path), token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        Self::with_session(self.post(path), token)
    }

    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        Self::with_session(self.patch(path), token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        Self::with_session(self.delete(path), token)
    }

    /// Register an ordinary user and return the response body
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/user/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
                "role": "user"
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in by username and return the session token from the cookie
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/user/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        session_cookie(&response).expect("Login did not set the session cookie")
    }

    /// Register and log in, returning (user id, token)
    pub async fn register_and_login(&self, username: &str) -> (i64, String) {
        let email = format!("{}@example.com", username);
        let body = self.register(username, &email, "password123").await;
        let id = body["data"]["id"].as_i64().expect("id missing");
        let token = self.login(username, "password123").await;
        (id, token)
    }

    /// Seed the admin account directly through the service and log in over HTTP
    pub async fn admin_token(&self) -> String {
        self.user_service
            .ensure_admin(CreateUserCommand {
                username: Username::new(ADMIN_USERNAME.to_string()).unwrap(),
                email: EmailAddress::new("root@example.com".to_string()).unwrap(),
                password: Password::new(ADMIN_PASSWORD.to_string()).unwrap(),
                first_name: None,
                last_name: None,
                role: Role::Admin,
            })
            .await
            .expect("Failed to seed admin");
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Mint a token directly, bypassing login
    pub fn mint_token(&self, id: i64, username: &str, is_admin: bool) -> String {
        self.authenticator
            .issue_session(&SessionIdentity {
                id,
                username: username.to_string(),
                is_admin,
            })
            .expect("Failed to issue session")
            .token
    }
}

/// Value of the `_token` cookie set by a response
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    set_cookie_header(response)?
        .split(';')
        .next()
        .and_then(|pair| pair.trim().strip_prefix("_token="))
        .map(str::to_string)
}

/// Raw `Set-Cookie` header for the session cookie
pub fn set_cookie_header(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("_token="))
        .map(str::to_string)
}

pub async fn body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}

#[derive(Default)]
struct UserTable {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

/// In-memory credential store enforcing the same uniqueness rules as the database
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    fn check_unique(
        table: &UserTable,
        user_id: Option<i64>,
        username: &str,
        email: &str,
    ) -> Result<(), UserError> {
        for existing in table.rows.values() {
            if Some(existing.id.0) == user_id {
                continue;
            }
            if existing.username.as_str() == username {
                return Err(UserError::UsernameAlreadyExists(username.to_string()));
            }
            if existing.email.as_str() == email {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut table = self.table.lock().unwrap();
        Self::check_unique(&table, None, user.username.as_str(), user.email.as_str())?;

        table.next_id += 1;
        let now = Utc::now();
        let stored = User {
            id: UserId(table.next_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.lock().unwrap().rows.get(&id.0).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .values()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.table.lock().unwrap().rows.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut table = self.table.lock().unwrap();
        if !table.rows.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(
            &table,
            Some(user.id.0),
            user.username.as_str(),
            user.email.as_str(),
        )?;
        table.rows.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.table
            .lock()
            .unwrap()
            .rows
            .remove(&id.0)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
struct ProductTable {
    next_id: i64,
    rows: BTreeMap<i64, Product>,
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    table: Mutex<ProductTable>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, ProductError> {
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let now = Utc::now();
        let stored = Product {
            id: ProductId(table.next_id),
            name: product.name,
            quantity: product.quantity,
            price: product.price,
            owner_id: product.owner_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        Ok(self.table.lock().unwrap().rows.get(&id.0).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.table.lock().unwrap().rows.values().cloned().collect())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Product>, ProductError> {
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|p| p.owner_id == *owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, product: Product) -> Result<Product, ProductError> {
        let mut table = self.table.lock().unwrap();
        match table.rows.get_mut(&product.id.0) {
            Some(existing) => {
                let owner_id = existing.owner_id;
                *existing = Product {
                    owner_id,
                    ..product
                };
                Ok(existing.clone())
            }
            None => Err(ProductError::NotFound(product.id)),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        self.table
            .lock()
            .unwrap()
            .rows
            .remove(&id.0)
            .map(|_| ())
            .ok_or(ProductError::NotFound(*id))
    }
}
