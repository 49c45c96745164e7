use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use seafood_store_api::{config::AppConfig, db::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    ensure_admin(&pool, "admin", "admin123").await?;
    seed_catalog(&pool).await?;
    seed_districts(&pool).await?;
    seed_promo_codes(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, username: &str, password: &str) -> anyhow::Result<()> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    sqlx::query(
        r#"
        INSERT INTO admin_users (username, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .execute(pool)
    .await?;

    println!("Ensured admin {username}");
    Ok(())
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = vec![
        ("salmon", "Лосось", "🐟", 1),
        ("shellfish", "Молюски", "🦪", 2),
        ("caviar", "Ікра", "🫙", 3),
    ];
    for (id, name, icon, sort_order) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, icon, sort_order)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(icon)
        .bind(sort_order)
        .execute(pool)
        .await?;
    }

    let products = vec![
        ("salmon_fresh_001", "salmon", "Лосось свіжий", 650.0, true),
        ("salmon_smoked_001", "salmon", "Лосось холодного копчення", 850.0, true),
        ("mussels_001", "shellfish", "Мідії у мушлях", 320.0, false),
    ];
    for (id, category_id, name, price_per_kg, is_featured) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, category_id, name, price_per_kg, is_featured)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(price_per_kg)
        .bind(is_featured)
        .execute(pool)
        .await?;
    }

    let packages = vec![
        ("salmon_fresh_001", "500g", 0.5, "кг", 325.0, 1),
        ("salmon_fresh_001", "1kg", 1.0, "кг", 650.0, 2),
        ("salmon_smoked_001", "300g", 0.3, "кг", 255.0, 1),
        ("mussels_001", "1kg", 1.0, "кг", 320.0, 1),
    ];
    for (product_id, package_code, weight, unit, price, sort_order) in packages {
        sqlx::query(
            r#"
            INSERT INTO product_packages (product_id, package_code, weight, unit, price, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (product_id, package_code) DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(package_code)
        .bind(weight)
        .bind(unit)
        .bind(price)
        .bind(sort_order)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}

async fn seed_districts(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for (name, delivery_cost) in [("Центр", 0.0), ("Поділ", 0.0), ("Оболонь", 50.0)] {
        sqlx::query(
            r#"
            INSERT INTO districts (name, delivery_cost)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(delivery_cost)
        .execute(pool)
        .await?;
    }

    println!("Seeded districts");
    Ok(())
}

async fn seed_promo_codes(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO promo_codes (code, discount_percent, is_gold_code)
        VALUES ('GOLD10', 10, TRUE)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .execute(pool)
    .await?;

    println!("Seeded promo codes");
    Ok(())
}
