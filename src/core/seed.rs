//! Demo data for a fresh database.
//!
//! Runs once at startup when `SEED_DEMO_DATA=true` and the `users` table is empty.
//! Everything is inserted in one transaction, so a failure leaves the database
//! untouched and the next start tries again.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::core::config::SeedConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::services::hash_password;
use crate::features::immigration::models::ApplicationStatus;
use crate::features::tickets::models::TicketType;
use crate::features::users::models::UserRole;
use crate::shared::status::BookingStatus;

struct SeedUser<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
    role: UserRole,
    phone_number: &'a str,
    address: &'a str,
}

struct SeededUsers {
    customer: i32,
    second_customer: i32,
}

/// Seed demo users and bookings. Returns whether anything was inserted.
pub async fn seed_demo_data(pool: &PgPool, config: &SeedConfig) -> Result<bool> {
    if !config.enabled {
        return Ok(false);
    }

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!("Failed to start seed transaction: {:?}", e);
        AppError::Database(e)
    })?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
    if existing > 0 {
        tracing::info!("Skipping demo data: {} users already present", existing);
        return Ok(false);
    }

    let users = seed_users(&mut tx, config).await?;
    seed_tickets(&mut tx, &users).await?;
    seed_vehicle_bookings(&mut tx, &users).await?;
    seed_immigration_applications(&mut tx, &users).await?;

    tx.commit().await.map_err(|e| {
        tracing::error!("Failed to commit demo data: {:?}", e);
        AppError::Database(e)
    })?;

    tracing::info!("Demo data seeded (admin: {})", config.admin_email);
    Ok(true)
}

async fn insert_user(tx: &mut Transaction<'_, Postgres>, user: SeedUser<'_>) -> Result<i32> {
    let password_hash = hash_password(user.password.to_string()).await?;

    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO users (full_name, email, password_hash, role, phone_number, address)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(user.full_name)
    .bind(user.email)
    .bind(password_hash)
    .bind(user.role)
    .bind(user.phone_number)
    .bind(user.address)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to seed user {}: {:?}", user.email, e);
        AppError::Database(e)
    })
}

async fn seed_users(tx: &mut Transaction<'_, Postgres>, config: &SeedConfig) -> Result<SeededUsers> {
    let customer = insert_user(
        tx,
        SeedUser {
            full_name: "John Doe",
            email: "customer@alfatravels.com",
            password: &config.customer_password,
            role: UserRole::Customer,
            phone_number: "9841234567",
            address: "Kathmandu, Nepal",
        },
    )
    .await?;

    insert_user(
        tx,
        SeedUser {
            full_name: "Admin User",
            email: &config.admin_email,
            password: &config.admin_password,
            role: UserRole::Admin,
            phone_number: "9840000000",
            address: "Kathmandu, Nepal",
        },
    )
    .await?;

    let second_customer = insert_user(
        tx,
        SeedUser {
            full_name: "Jane Smith",
            email: "jane@alfatravels.com",
            password: "Jane@123",
            role: UserRole::Customer,
            phone_number: "9849876543",
            address: "Pokhara, Nepal",
        },
    )
    .await?;

    Ok(SeededUsers {
        customer,
        second_customer,
    })
}

async fn seed_tickets(tx: &mut Transaction<'_, Postgres>, users: &SeededUsers) -> Result<()> {
    let now = Utc::now();
    let tickets = [
        (
            users.customer,
            "Kathmandu (KTM)",
            "Delhi (DEL)",
            now + Duration::days(30),
            TicketType::Flight,
            BookingStatus::Pending,
            2,
            None,
            "Prefer morning flight",
        ),
        (
            users.second_customer,
            "Kathmandu",
            "Pokhara",
            now + Duration::days(15),
            TicketType::Bus,
            BookingStatus::Confirmed,
            1,
            Some(Decimal::from(600)),
            "Direct express bus preferred",
        ),
        (
            users.customer,
            "Delhi (DEL)",
            "Mumbai (BOM)",
            now + Duration::days(45),
            TicketType::Flight,
            BookingStatus::Pending,
            3,
            None,
            "Traveling with family",
        ),
    ];

    for (user_id, from, to, travel_date, ticket_type, status, passengers, price, notes) in tickets {
        sqlx::query(
            r#"
            INSERT INTO ticket_requests (
                user_id, from_location, to_location, travel_date, ticket_type, status,
                number_of_passengers, estimated_price, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(travel_date)
        .bind(ticket_type)
        .bind(status)
        .bind(passengers)
        .bind(price)
        .bind(notes)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed ticket: {:?}", e);
            AppError::Database(e)
        })?;
    }

    Ok(())
}

async fn seed_vehicle_bookings(
    tx: &mut Transaction<'_, Postgres>,
    users: &SeededUsers,
) -> Result<()> {
    let now = Utc::now();

    // SUV confirmed with a driver; the other two await assignment
    sqlx::query(
        r#"
        INSERT INTO vehicle_bookings (
            user_id, vehicle_type, pickup_date, drop_date, status, pickup_location,
            drop_location, number_of_passengers, total_cost, driver_name,
            driver_contact_number, notes
        ) VALUES
            ($1, 'SUV', $3, $4, $7, 'Kathmandu Airport', 'Pokhara', 4, 8000,
             'Ram Kumar', '9841111111', 'Need child seat'),
            ($2, 'Car', $5, $6, $8, 'Pokhara City', 'Lakeside Area', 2, NULL,
             NULL, NULL, 'Self-drive preferred'),
            ($1, 'Van', $9, $10, $8, 'Delhi Airport', 'Jaipur', 8, NULL,
             NULL, NULL, 'Group tour vehicle')
        "#,
    )
    .bind(users.customer)
    .bind(users.second_customer)
    .bind(now + Duration::days(20))
    .bind(now + Duration::days(25))
    .bind(now + Duration::days(10))
    .bind(now + Duration::days(12))
    .bind(BookingStatus::Confirmed)
    .bind(BookingStatus::Pending)
    .bind(now + Duration::days(50))
    .bind(now + Duration::days(55))
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to seed vehicle bookings: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(())
}

async fn seed_immigration_applications(
    tx: &mut Transaction<'_, Postgres>,
    users: &SeededUsers,
) -> Result<()> {
    let now = Utc::now();
    let applications = [
        (
            users.customer,
            "John Doe",
            "NA0001234",
            "Canada",
            now + Duration::days(5 * 365),
            ApplicationStatus::Pending,
            "Work",
            "Skilled worker application",
            now,
            None,
            None,
        ),
        (
            users.second_customer,
            "Jane Smith",
            "NA0005678",
            "Australia",
            now + Duration::days(4 * 365),
            ApplicationStatus::UnderReview,
            "Study",
            "Currently under document verification",
            now - Duration::days(10),
            Some(now),
            None,
        ),
        (
            users.customer,
            "John Doe",
            "NA0009876",
            "Germany",
            now + Duration::days(6 * 365),
            ApplicationStatus::Approved,
            "Work",
            "Approved for long-term residence",
            now - Duration::days(30),
            None,
            Some(now - Duration::days(5)),
        ),
    ];

    for (
        user_id,
        full_name,
        passport,
        country,
        expiry,
        status,
        visa_type,
        notes,
        created_at,
        updated_at,
        completed_at,
    ) in applications
    {
        sqlx::query(
            r#"
            INSERT INTO immigration_applications (
                user_id, full_name, passport_number, target_country, passport_expiry_date,
                status, visa_type, admin_notes, created_at, updated_at, completed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(passport)
        .bind(country)
        .bind(expiry)
        .bind(status)
        .bind(visa_type)
        .bind(notes)
        .bind(created_at)
        .bind(updated_at)
        .bind(completed_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed immigration application {}: {:?}", passport, e);
            AppError::Database(e)
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::lazy_pool;

    #[tokio::test]
    async fn test_disabled_seeding_does_not_touch_database() {
        let config = SeedConfig {
            enabled: false,
            admin_email: "admin@alfatravels.com".to_string(),
            admin_password: "Admin@123".to_string(),
            customer_password: "Customer@123".to_string(),
        };

        // The lazy pool cannot connect, so reaching the database would be an error
        assert!(!seed_demo_data(&lazy_pool(), &config).await.unwrap());
    }
}
