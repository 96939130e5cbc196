// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AnnouncementRepository, ChurchRepository, ChurchStore, EventRepository, FinanceRepository,
        MemberRepository, MinistryRepository, ScheduleStore, UserRepository, UserStore,
        WorshipRepository,
    },
    services::{AuthService, MemberService, RegistrationService, ScheduleService},
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    pub bcrypt_cost: u32,
    pub jwt_ttl_days: i64,
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{} deve ser definida", name))
}

fn optional<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} inválida: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: optional("BIND_ADDR", "0.0.0.0:3000".to_string())?,
            database_max_connections: optional("DATABASE_MAX_CONNECTIONS", 5)?,
            bcrypt_cost: optional("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            jwt_ttl_days: optional("JWT_TTL_DAYS", 7)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub i18n_store: Arc<I18nStore>,

    // Serviços
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub member_service: MemberService,
    pub schedule_service: ScheduleService,

    // Repositórios
    pub church_store: Arc<dyn ChurchStore>,
    pub church_repo: ChurchRepository,
    pub member_repo: MemberRepository,
    pub ministry_repo: MinistryRepository,
    pub event_repo: EventRepository,
    pub announcement_repo: AnnouncementRepository,
    pub finance_repo: FinanceRepository,
    pub worship_repo: WorshipRepository,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let i18n_store = Arc::new(I18nStore::load()?);
        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db_pool.clone()));
        let churches: Arc<dyn ChurchStore> = Arc::new(ChurchRepository::new(db_pool.clone()));
        let schedules: Arc<dyn ScheduleStore> = Arc::new(EventRepository::new(db_pool.clone()));

        Ok(Self::from_parts(db_pool, config, i18n_store, users, churches, schedules))
    }

    /// Monta o grafo de dependências. Os stores vêm de fora para os testes trocarem o banco.
    pub fn from_parts(
        db_pool: PgPool,
        config: Config,
        i18n_store: Arc<I18nStore>,
        users: Arc<dyn UserStore>,
        churches: Arc<dyn ChurchStore>,
        schedules: Arc<dyn ScheduleStore>,
    ) -> Self {
        let auth_service = AuthService::new(
            users,
            config.jwt_secret.clone(),
            config.bcrypt_cost,
            config.jwt_ttl_days,
        );
        let registration_service = RegistrationService::new(auth_service.clone(), churches.clone());
        let member_service = MemberService::new(auth_service.clone(), churches.clone());
        let schedule_service = ScheduleService::new(schedules, churches.clone());

        Self {
            church_repo: ChurchRepository::new(db_pool.clone()),
            member_repo: MemberRepository::new(db_pool.clone()),
            ministry_repo: MinistryRepository::new(db_pool.clone()),
            event_repo: EventRepository::new(db_pool.clone()),
            announcement_repo: AnnouncementRepository::new(db_pool.clone()),
            finance_repo: FinanceRepository::new(db_pool.clone()),
            worship_repo: WorshipRepository::new(db_pool.clone()),
            db_pool,
            config: Arc::new(config),
            i18n_store,
            auth_service,
            registration_service,
            member_service,
            schedule_service,
            church_store: churches,
        }
    }
}
