//! Schema bootstrap, run once at startup.
//!
//! Delete policy is explicit here rather than left dangling: removing a
//! country detaches its people (SET NULL), removing a car is refused
//! while sales still reference it (RESTRICT).

use sqlx::PgPool;

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS countries (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS people (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        age INTEGER NOT NULL,
        country_id BIGINT REFERENCES countries(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS cars (
        id BIGSERIAL PRIMARY KEY,
        brand VARCHAR(100) NOT NULL,
        model VARCHAR(100) NOT NULL,
        year INTEGER NOT NULL,
        chassis_number VARCHAR(50) NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS sales (
        id BIGSERIAL PRIMARY KEY,
        buyer_name VARCHAR(200) NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        car_id BIGINT NOT NULL REFERENCES cars(id) ON DELETE RESTRICT,
        sale_date TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
