//! Startup seeding.
//!
//! Safe to run on every start: roles and the admin account are inserted only
//! when missing, and the sample catalog only into empty tables.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, Set};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    db::run_migrations,
    entity::{
        categories::ActiveModel as CategoryActive,
        products::ActiveModel as ProductActive,
        roles::{ActiveModel as RoleActive, Column as RoleCol},
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    models::Role,
    repository::UnitOfWork,
    services::auth_service::hash_password,
};

const DEFAULT_CATEGORIES: [(&str, i32); 3] = [("Action", 1), ("SciFi", 2), ("History", 3)];

struct SeedProduct {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    category: &'static str,
    /// list, 1-50, 51-100, 100+ in whole dollars
    prices: [i64; 4],
}

const DEFAULT_PRODUCTS: [SeedProduct; 6] = [
    SeedProduct {
        title: "Fortune of Time",
        author: "Billy Spark",
        isbn: "SWD9999001",
        category: "Action",
        prices: [99, 90, 85, 80],
    },
    SeedProduct {
        title: "Dark Skies",
        author: "Nancy Hoover",
        isbn: "CAW777777701",
        category: "Action",
        prices: [40, 30, 25, 20],
    },
    SeedProduct {
        title: "Vanish in the Sunset",
        author: "Julian Button",
        isbn: "RITO5555501",
        category: "Action",
        prices: [55, 50, 40, 35],
    },
    SeedProduct {
        title: "Cotton Candy",
        author: "Abby Muscles",
        isbn: "WS3333333301",
        category: "SciFi",
        prices: [70, 65, 60, 55],
    },
    SeedProduct {
        title: "Rock in the Ocean",
        author: "Ron Parker",
        isbn: "SOTJ1111111101",
        category: "SciFi",
        prices: [30, 27, 25, 20],
    },
    SeedProduct {
        title: "Leaves and Wonders",
        author: "Laura Phantom",
        isbn: "FOT000000001",
        category: "History",
        prices: [25, 23, 22, 20],
    },
];

/// What one [`DbInitializer::initialize`] run inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub admin_created: bool,
    pub categories_created: usize,
    pub products_created: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == SeedReport::default()
    }
}

pub struct DbInitializer<'a> {
    orm: &'a DatabaseConnection,
    admin_email: &'a str,
    admin_password: &'a str,
}

impl<'a> DbInitializer<'a> {
    pub fn new(orm: &'a DatabaseConnection, config: &'a AppConfig) -> Self {
        Self {
            orm,
            admin_email: &config.admin_email,
            admin_password: &config.admin_password,
        }
    }

    /// Applies the schema, then seeds whatever is missing in one transaction.
    pub async fn initialize(&self) -> anyhow::Result<SeedReport> {
        let report = match self.try_initialize().await {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(error = %err, "database initialisation failed");
                return Err(err);
            }
        };
        if report.is_empty() {
            tracing::debug!("database already seeded");
        } else {
            tracing::info!(?report, "database seeded");
        }
        Ok(report)
    }

    async fn try_initialize(&self) -> anyhow::Result<SeedReport> {
        run_migrations(self.orm).await?;

        let uow = UnitOfWork::begin(self.orm).await?;
        let roles_created = seed_roles(&uow).await?;
        let admin_created = self.seed_admin(&uow).await?;
        let categories = seed_categories(&uow).await?;
        let products_created = seed_products(&uow, &categories).await?;
        uow.commit().await?;
        Ok(SeedReport {
            roles_created,
            admin_created,
            categories_created: categories.len(),
            products_created,
        })
    }

    async fn seed_admin(&self, uow: &UnitOfWork) -> anyhow::Result<bool> {
        let users = uow.users();
        let email = self.admin_email.trim().to_lowercase();
        if users
            .get(Condition::all().add(UserCol::Email.eq(email.as_str())))
            .await?
            .is_some()
        {
            return Ok(false);
        }
        let password_hash = hash_password(self.admin_password)
            .map_err(|e| anyhow::anyhow!("hashing admin password: {e}"))?;
        users
            .add(UserActive {
                id: Set(Uuid::new_v4()),
                email: Set(email),
                password_hash: Set(password_hash),
                name: Set("Administrator".to_string()),
                phone_number: Set(None),
                street_address: Set(None),
                city: Set(None),
                state: Set(None),
                postal_code: Set(None),
                role: Set(Role::Admin.to_string()),
                created_at: Set(Utc::now().into()),
            })
            .await?;
        Ok(true)
    }
}

async fn seed_roles(uow: &UnitOfWork) -> anyhow::Result<usize> {
    let roles = uow.roles();
    let mut created = 0;
    for role in Role::ALL {
        if roles
            .get(Condition::all().add(RoleCol::Name.eq(role.as_str())))
            .await?
            .is_some()
        {
            continue;
        }
        roles
            .add(RoleActive {
                id: Set(Uuid::new_v4()),
                name: Set(role.to_string()),
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

/// Returns the ids of the default categories, keyed by name, when they were
/// just created. An already populated table is left alone.
async fn seed_categories(uow: &UnitOfWork) -> anyhow::Result<HashMap<&'static str, Uuid>> {
    let categories = uow.categories();
    let mut ids = HashMap::new();
    if categories.base().count(Condition::all()).await? > 0 {
        return Ok(ids);
    }
    for (name, display_order) in DEFAULT_CATEGORIES {
        let created = categories
            .base()
            .add(CategoryActive {
                id: Set(Uuid::new_v4()),
                name: Set(name.to_string()),
                display_order: Set(display_order),
            })
            .await?;
        ids.insert(name, created.id);
    }
    Ok(ids)
}

async fn seed_products(
    uow: &UnitOfWork,
    categories: &HashMap<&'static str, Uuid>,
) -> anyhow::Result<usize> {
    let products = uow.products();
    if categories.is_empty() || products.base().count(Condition::all()).await? > 0 {
        return Ok(0);
    }
    let mut created = 0;
    for seed in &DEFAULT_PRODUCTS {
        let Some(category_id) = categories.get(seed.category) else {
            continue;
        };
        let [list_price, price, price50, price100] = seed.prices.map(|dollars| dollars * 100);
        products
            .base()
            .add(ProductActive {
                id: Set(Uuid::new_v4()),
                title: Set(seed.title.to_string()),
                isbn: Set(seed.isbn.to_string()),
                author: Set(seed.author.to_string()),
                description: Set(Some(format!("{} by {}.", seed.title, seed.author))),
                list_price: Set(list_price),
                price: Set(price),
                price50: Set(price50),
                price100: Set(price100),
                category_id: Set(*category_id),
                created_at: Set(Utc::now().into()),
            })
            .await?;
        created += 1;
    }
    Ok(created)
}
