//! Static table descriptors for the generic repository.
//!
//! One `EntityDef` per table replaces four copy-pasted managers: the
//! repository builds its SQL from the descriptor and binds JSON values
//! according to the declared column types. `id` is implicit on every
//! table (BIGSERIAL primary key) and never listed here.

/// Postgres column types the repository knows how to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    BigInt,
    Text,
    Float8,
    Timestamptz,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
}

#[derive(Debug)]
pub struct EntityDef {
    pub table: &'static str,
    /// Insertable/updatable columns, in declaration order.
    pub columns: &'static [ColumnDef],
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

const fn col(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef { name, ty }
}

pub static COUNTRIES: EntityDef = EntityDef {
    table: "countries",
    columns: &[col("name", ColumnType::Text)],
};

pub static PEOPLE: EntityDef = EntityDef {
    table: "people",
    columns: &[
        col("first_name", ColumnType::Text),
        col("last_name", ColumnType::Text),
        col("age", ColumnType::Int),
        col("country_id", ColumnType::BigInt),
    ],
};

pub static CARS: EntityDef = EntityDef {
    table: "cars",
    columns: &[
        col("brand", ColumnType::Text),
        col("model", ColumnType::Text),
        col("year", ColumnType::Int),
        col("chassis_number", ColumnType::Text),
    ],
};

pub static SALES: EntityDef = EntityDef {
    table: "sales",
    columns: &[
        col("buyer_name", ColumnType::Text),
        col("price", ColumnType::Float8),
        col("car_id", ColumnType::BigInt),
        col("sale_date", ColumnType::Timestamptz),
    ],
};
