use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::auth::{AuthError, AuthService, RegisterAccountRequest, RegisterTrainerRequest, RegisterUserRequest};

/// (name, meal type id, kcal, protein, fat) per 100 g
const DEMO_FOODS: &[(&str, i32, i32, i32, i32)] = &[
    ("Pão francês", 1, 300, 8, 3),
    ("Ovo cozido", 1, 155, 13, 11),
    ("Banana", 1, 89, 1, 0),
    ("Arroz branco", 2, 130, 3, 0),
    ("Feijão carioca", 2, 76, 5, 1),
    ("Peito de frango grelhado", 2, 165, 31, 4),
    ("Iogurte natural", 3, 61, 4, 3),
    ("Castanha-do-pará", 3, 656, 14, 66),
    ("Salmão assado", 4, 208, 20, 13),
    ("Batata-doce cozida", 4, 86, 2, 0),
];

/// (name, description, training type id, target muscle, video url)
const DEMO_EXERCISES: &[(&str, &str, i32, &str, &str)] = &[
    ("Corrida na esteira", "Corrida em ritmo moderado", 1, "Pernas", "https://videos.example.com/corrida-esteira"),
    ("Supino reto", "Supino com barra no banco reto", 2, "Peitoral", "https://videos.example.com/supino-reto"),
    ("Remada curvada", "Remada com barra, tronco inclinado", 3, "Dorsais", "https://videos.example.com/remada-curvada"),
    ("Agachamento livre", "Agachamento com barra nas costas", 4, "Quadríceps", "https://videos.example.com/agachamento"),
    ("Desenvolvimento com halteres", "Elevação acima da cabeça", 5, "Deltoides", "https://videos.example.com/desenvolvimento"),
    ("Rosca direta", "Flexão de cotovelos com barra", 6, "Bíceps", "https://videos.example.com/rosca-direta"),
    ("Tríceps testa", "Extensão de cotovelos deitado", 7, "Tríceps", "https://videos.example.com/triceps-testa"),
    ("Prancha", "Isometria em prancha frontal", 8, "Abdômen", "https://videos.example.com/prancha"),
];

pub struct DatabaseSeeder {
    pool: PgPool,
    auth_service: AuthService,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool, auth_service: AuthService) -> Self {
        Self { pool, auth_service }
    }

    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        self.seed_foods().await?;
        self.seed_exercises().await?;
        self.seed_accounts().await?;

        tracing::info!("Database seeding completed!");
        Ok(())
    }

    async fn seed_foods(&self) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alimentos")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(());
        }

        for (name, meal_type_id, calories, proteins, fats) in DEMO_FOODS {
            sqlx::query(
                "INSERT INTO alimentos (nome_alimento, tipo_id, calorias, proteinas, gorduras)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(name)
            .bind(meal_type_id)
            .bind(calories)
            .bind(proteins)
            .bind(fats)
            .execute(&self.pool)
            .await?;
        }

        tracing::info!(count = DEMO_FOODS.len(), "Seeded demo foods");
        Ok(())
    }

    async fn seed_exercises(&self) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercicios")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for (name, description, training_type_id, muscle, video_url) in DEMO_EXERCISES {
            let exercise_id: i32 = sqlx::query_scalar(
                "INSERT INTO exercicios (nome, descricao, tipodetreinoid, musculoalvo)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
            )
            .bind(name)
            .bind(description)
            .bind(training_type_id)
            .bind(muscle)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO videos (nome, url, exercicioid) VALUES ($1, $2, $3)")
                .bind(name)
                .bind(video_url)
                .bind(exercise_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(count = DEMO_EXERCISES.len(), "Seeded demo exercises");
        Ok(())
    }

    async fn seed_accounts(&self) -> Result<()> {
        let user = RegisterUserRequest {
            account: demo_account("Carlos Souza", "carlos.souza@example.com", 1995, 70.0, 1.68)?,
            goal: Some("Ganhar massa muscular".to_string()),
        };
        match self.auth_service.register_user(user).await {
            Ok(_) => tracing::info!("Created demo user account"),
            Err(AuthError::EmailAlreadyExists) => {}
            Err(err) => return Err(err.into()),
        }

        let trainer = RegisterTrainerRequest {
            account: demo_account("Ana Lima", "ana.personal@example.com", 1988, 62.0, 1.65)?,
            specialty: Some("Hipertrofia".to_string()),
            certificate: Some("CREF 012345-G/SP".to_string()),
        };
        match self.auth_service.register_trainer(trainer).await {
            Ok(_) => tracing::info!("Created demo personal trainer account"),
            Err(AuthError::EmailAlreadyExists) => {}
            Err(err) => return Err(err.into()),
        }

        Ok(())
    }
}

fn demo_account(name: &str, email: &str, birth_year: i32, weight: f64, height: f64) -> Result<RegisterAccountRequest> {
    let birth_date = NaiveDate::from_ymd_opt(birth_year, 1, 15)
        .ok_or_else(|| anyhow::anyhow!("invalid demo birth date"))?;

    Ok(RegisterAccountRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: "senha123".to_string(),
        birth_date,
        weight,
        height,
    })
}
