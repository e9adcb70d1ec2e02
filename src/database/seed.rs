// Development seeding: schema bootstrap, default admin user, geo tree.
// Idempotent; runs only when seeding is enabled in config.
use sqlx::PgPool;
use tracing::info;

use crate::auth::hash_password;
use crate::database::manager::DatabaseError;

const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS \"users\" (\
        \"id\" SERIAL PRIMARY KEY, \
        \"full_name\" VARCHAR(255), \
        \"email\" VARCHAR(254) NOT NULL UNIQUE, \
        \"password\" VARCHAR(255) NOT NULL, \
        \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
        \"updated_at\" TIMESTAMPTZ)",
    "CREATE TABLE IF NOT EXISTS \"provinces\" (\
        \"id\" SERIAL PRIMARY KEY, \
        \"code\" VARCHAR(16) NOT NULL UNIQUE, \
        \"name\" VARCHAR(255) NOT NULL UNIQUE, \
        \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
        \"updated_at\" TIMESTAMPTZ)",
    "CREATE TABLE IF NOT EXISTS \"cities\" (\
        \"id\" SERIAL PRIMARY KEY, \
        \"province_id\" INTEGER NOT NULL REFERENCES \"provinces\"(\"id\") ON DELETE CASCADE, \
        \"code\" VARCHAR(16) NOT NULL, \
        \"name\" VARCHAR(255) NOT NULL, \
        \"classification\" VARCHAR(16) NOT NULL DEFAULT 'city', \
        \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
        \"updated_at\" TIMESTAMPTZ, \
        UNIQUE (\"province_id\", \"code\"), \
        UNIQUE (\"province_id\", \"name\"))",
];

const DEFAULT_USER_EMAIL: &str = "admin@admin.com";
const DEFAULT_USER_NAME: &str = "Administrator";
const DEFAULT_USER_PASSWORD: &str = "admin1234";

struct CitySeed {
    code: &'static str,
    name: &'static str,
    classification: &'static str,
}

struct ProvinceSeed {
    code: &'static str,
    name: &'static str,
    cities: &'static [CitySeed],
}

const GEO_TREE: &[ProvinceSeed] = &[
    ProvinceSeed {
        code: "ID-JK",
        name: "DKI Jakarta",
        cities: &[
            CitySeed { code: "ID-JK-JP", name: "Jakarta Pusat", classification: "city" },
            CitySeed { code: "ID-JK-JU", name: "Jakarta Utara", classification: "city" },
            CitySeed { code: "ID-JK-JB", name: "Jakarta Barat", classification: "city" },
            CitySeed { code: "ID-JK-JS", name: "Jakarta Selatan", classification: "city" },
            CitySeed { code: "ID-JK-JT", name: "Jakarta Timur", classification: "city" },
        ],
    },
    ProvinceSeed {
        code: "ID-JB",
        name: "Jawa Barat",
        cities: &[
            CitySeed { code: "ID-JB-BDG", name: "Kota Bandung", classification: "city" },
            CitySeed { code: "ID-JB-BKS", name: "Kota Bekasi", classification: "city" },
            CitySeed { code: "ID-JB-BGR", name: "Kabupaten Bogor", classification: "regency" },
            CitySeed { code: "ID-JB-CJR", name: "Kabupaten Cianjur", classification: "regency" },
        ],
    },
    ProvinceSeed {
        code: "ID-JT",
        name: "Jawa Tengah",
        cities: &[
            CitySeed { code: "ID-JT-SMG", name: "Kota Semarang", classification: "city" },
            CitySeed { code: "ID-JT-SLO", name: "Kota Surakarta", classification: "city" },
            CitySeed { code: "ID-JT-MGL", name: "Kabupaten Magelang", classification: "regency" },
        ],
    },
    ProvinceSeed {
        code: "ID-BT",
        name: "Banten",
        cities: &[
            CitySeed { code: "ID-BT-TNG", name: "Kota Tangerang", classification: "city" },
            CitySeed { code: "ID-BT-TGS", name: "Kota Tangerang Selatan", classification: "city" },
            CitySeed { code: "ID-BT-SRG", name: "Kota Serang", classification: "city" },
        ],
    },
];

pub async fn run(pool: &PgPool) -> Result<(), DatabaseError> {
    ensure_schema(pool).await?;
    seed_default_user(pool).await?;
    seed_geo_tree(pool).await?;
    info!("Database seeding complete");
    Ok(())
}

async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

async fn seed_default_user(pool: &PgPool) -> Result<(), DatabaseError> {
    let inserted = sqlx::query(
        "INSERT INTO \"users\" (\"full_name\", \"email\", \"password\") \
         VALUES ($1, $2, $3) ON CONFLICT (\"email\") DO NOTHING",
    )
    .bind(DEFAULT_USER_NAME)
    .bind(DEFAULT_USER_EMAIL)
    .bind(hash_password(DEFAULT_USER_PASSWORD))
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        info!(email = DEFAULT_USER_EMAIL, "Seeded default user");
    }
    Ok(())
}

async fn seed_geo_tree(pool: &PgPool) -> Result<(), DatabaseError> {
    for province in GEO_TREE {
        let province_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO \"provinces\" (\"code\", \"name\") VALUES ($1, $2) \
             ON CONFLICT (\"code\") DO UPDATE SET \"name\" = EXCLUDED.\"name\" \
             RETURNING \"id\"",
        )
        .bind(province.code)
        .bind(province.name)
        .fetch_one(pool)
        .await?;

        for city in province.cities {
            sqlx::query(
                "INSERT INTO \"cities\" (\"province_id\", \"code\", \"name\", \"classification\") \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (\"province_id\", \"code\") DO UPDATE \
                 SET \"name\" = EXCLUDED.\"name\", \
                     \"classification\" = EXCLUDED.\"classification\"",
            )
            .bind(province_id)
            .bind(city.code)
            .bind(city.name)
            .bind(city.classification)
            .execute(pool)
            .await?;
        }
    }
    info!(provinces = GEO_TREE.len(), "Seeded geography tree");
    Ok(())
}
