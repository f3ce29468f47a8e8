use std::time::Duration;

use mongodb::{bson::doc, options::ClientOptions, Client, Collection};

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::{Assessment, Student, Submission, User},
};

pub const USERS: &str = "users";
pub const STUDENTS: &str = "students";
pub const ASSESSMENTS: &str = "assessments";
pub const SUBMISSIONS: &str = "submissions";

const APP_NAME: &str = "assessment-server";
const MAX_POOL_SIZE: u32 = 10;
const MIN_POOL_SIZE: u32 = 2;
const TIMEOUT: Duration = Duration::from_secs(5);

/// Handle on the application database with one typed accessor per collection.
#[derive(Clone)]
pub struct Database {
    inner: mongodb::Database,
}

impl Database {
    /// Connects and pings, so a bad connection string fails at startup.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::with_options(client_options(config).await?)?;
        let database = Self::from_client(&client, &config.mongo_db_name);

        database.health_check().await?;
        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(database)
    }

    pub fn from_client(client: &Client, db_name: &str) -> Self {
        Self {
            inner: client.database(db_name),
        }
    }

    pub fn users(&self) -> Collection<User> {
        self.inner.collection(USERS)
    }

    pub fn students(&self) -> Collection<Student> {
        self.inner.collection(STUDENTS)
    }

    pub fn assessments(&self) -> Collection<Assessment> {
        self.inner.collection(ASSESSMENTS)
    }

    pub fn submissions(&self) -> Collection<Submission> {
        self.inner.collection(SUBMISSIONS)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.inner.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

async fn client_options(config: &Config) -> AppResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.max_pool_size = Some(MAX_POOL_SIZE);
    options.min_pool_size = Some(MIN_POOL_SIZE);
    options.connect_timeout = Some(TIMEOUT);
    options.server_selection_timeout = Some(TIMEOUT);
    Ok(options)
}
