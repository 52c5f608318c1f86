//! Application state shared across handlers

use media::ImagePipeline;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::jwt::JwtService;
use crate::models::{Role, User, UserProfile};
use crate::password::{hash_password, verify_password};
use crate::repositories::{
    BranchRepository, CategoryRepository, OfferRepository, ProductRepository, SlideRepository,
    UserRecord, UserRepository,
};

/// Token subject of the configured bootstrap admin
pub const BOOTSTRAP_ADMIN_ID: Uuid = Uuid::from_u128(1);

/// Admin credentials from the configuration, usable while the database is down
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    password_hash: String,
}

impl BootstrapAdmin {
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    pub fn verify(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: BOOTSTRAP_ADMIN_ID,
            email: self.email.clone(),
            name: "Administrator".to_string(),
            role: Role::Admin,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub category_repository: CategoryRepository,
    pub product_repository: ProductRepository,
    pub branch_repository: BranchRepository,
    pub offer_repository: OfferRepository,
    pub slide_repository: SlideRepository,
    pub jwt_service: JwtService,
    pub image_pipeline: ImagePipeline,
    pub bootstrap_admin: Option<Arc<BootstrapAdmin>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let jwt_service = JwtService::new(&config.auth)?;
        let image_pipeline = ImagePipeline::new(config.uploads.clone());

        let bootstrap_admin = match config.auth.bootstrap_credentials() {
            Some((email, password)) => Some(Arc::new(BootstrapAdmin {
                email: email.to_string(),
                password_hash: hash_password(password)
                    .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap password: {}", e))?,
            })),
            None => None,
        };

        Ok(Self {
            user_repository: UserRepository::new(pool.clone()),
            category_repository: CategoryRepository::new(pool.clone()),
            product_repository: ProductRepository::new(pool.clone()),
            branch_repository: BranchRepository::new(pool.clone()),
            offer_repository: OfferRepository::new(pool.clone()),
            slide_repository: SlideRepository::new(pool.clone()),
            db_pool: pool,
            jwt_service,
            image_pipeline,
            bootstrap_admin,
            config: Arc::new(config),
        })
    }

    /// Insert the bootstrap admin when the database holds no admin yet
    pub async fn seed_bootstrap_admin(&self) -> anyhow::Result<Option<User>> {
        let Some(admin) = &self.bootstrap_admin else {
            return Ok(None);
        };

        if self.user_repository.count_by_role(Role::Admin).await? > 0 {
            return Ok(None);
        }

        if self.user_repository.find_by_email(&admin.email).await?.is_some() {
            warn!(
                "Bootstrap admin email {} belongs to a non-admin user, not seeding",
                admin.email
            );
            return Ok(None);
        }

        let user = self
            .user_repository
            .create(
                &UserRecord {
                    email: admin.email.clone(),
                    name: "Administrator".to_string(),
                    password_hash: admin.password_hash.clone(),
                    role: Role::Admin,
                    is_active: true,
                },
                None,
            )
            .await?;

        info!("Seeded bootstrap admin {}", user.email);
        Ok(Some(user))
    }
}
