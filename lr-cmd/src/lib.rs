//! Command implementations for the limb-rescue CLI.
//!
//! Every command runs against a [`ReadingSource`]: the HTTP backend by
//! default, or an offline JSON file when `--fixture` is given.

use anyhow::Context;
use clap::{Args, Subcommand};
use log::info;
use lr_core::{
    api::{ClientConfig, LimbRescueClient, Session},
    memory::MemorySource,
    Laterality, ReadingSource,
};
use std::{path::PathBuf, sync::Arc};

pub mod browse;
pub mod export;
pub mod graph;
pub mod report;

/// Where readings come from.
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Root URL of the readings backend
    #[arg(long, env = "LIMB_RESCUE_URL", default_value = lr_core::api::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Origin announced in the CORS allowance header
    #[arg(long, env = "LIMB_RESCUE_ORIGIN", default_value = lr_core::api::DEFAULT_ALLOW_ORIGIN)]
    pub allow_origin: String,

    /// Session cookie, e.g. JSESSIONID=...; enables authenticated requests
    #[arg(long, env = "LIMB_RESCUE_SESSION")]
    pub session: Option<String>,

    /// User the session belongs to
    #[arg(long, default_value = "limb-rescue")]
    pub user: String,

    /// Attempts per request before giving up
    #[arg(long, default_value_t = 3)]
    pub max_tries: u32,

    /// Read from a JSON data file instead of the backend
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,
}

impl Connection {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            allow_origin: self.allow_origin.clone(),
            max_tries: self.max_tries,
            ..ClientConfig::default()
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session.as_ref().map(|cookie| Session {
            username: self.user.clone(),
            cookie: Some(cookie.clone()),
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List patients that have readings
    Patients,

    /// List a patient's readings, newest first
    Readings {
        #[arg(short, long)]
        patient: String,
    },

    /// Walk the selection pickers by index, then graph the result
    Select {
        /// Index into the patient list
        #[arg(long)]
        patient: usize,

        /// Fetch-order index of the reading (the value shown by `readings`)
        #[arg(long)]
        reading: usize,

        /// Index into the laterality options of the reading
        #[arg(long, default_value_t = 0)]
        laterality: usize,

        /// 0 All Data, 1 Raw Data, 2 1st Derivative, 3 2nd Derivative
        #[arg(long, default_value_t = 0)]
        view: usize,

        /// Also write the CSV export of the selection into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Open the graph of one reading directly, as a deep link does
    Graph {
        #[arg(short, long)]
        reading_id: i64,

        /// LEFT_ARM, RIGHT_ARM or BILATERAL
        #[arg(short, long)]
        laterality: Laterality,

        /// 0 All Data, 1 Raw Data, 2 1st Derivative, 3 2nd Derivative
        #[arg(long, default_value_t = 0)]
        view: usize,

        /// Write the series as JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the raw rows of a reading as CSV
    Export {
        #[arg(short, long)]
        reading_id: i64,

        /// Patient the reading belongs to; looked up when omitted
        #[arg(short, long)]
        patient: Option<String>,

        /// LEFT_ARM, RIGHT_ARM or BILATERAL
        #[arg(short, long)]
        laterality: Laterality,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

pub async fn run(connection: Connection, command: Command) -> anyhow::Result<()> {
    match &connection.fixture {
        Some(path) => {
            let source = MemorySource::from_path(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            info!("Using fixture {}", path.display());
            execute(Arc::new(source), command).await
        }
        None => {
            let client = LimbRescueClient::new(connection.client_config(), connection.session())
                .context("Failed to build HTTP client")?;
            info!("Using backend {}", connection.base_url);
            execute(Arc::new(client), command).await
        }
    }
}

async fn execute<S: ReadingSource>(source: Arc<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Patients => {
            let patients = browse::patients(&*source).await?;
            report::print_json(&patients)
        }
        Command::Readings { patient } => {
            let rows = browse::readings(&*source, &patient).await?;
            report::print_json(&rows)
        }
        Command::Select {
            patient,
            reading,
            laterality,
            view,
            out_dir,
        } => {
            let picks = browse::Picks {
                patient,
                reading,
                laterality,
                view,
            };
            let chart = browse::select(source, picks, out_dir.as_deref()).await?;
            report::print_json(&chart)
        }
        Command::Graph {
            reading_id,
            laterality,
            view,
            output,
        } => {
            let chart = graph::render(source, reading_id, laterality, view).await?;
            match output {
                Some(path) => report::write_json(&chart, &path),
                None => report::print_json(&chart),
            }
        }
        Command::Export {
            reading_id,
            patient,
            laterality,
            out_dir,
        } => {
            let path = export::write_export(
                &*source,
                reading_id,
                patient.as_deref(),
                laterality,
                &out_dir,
            )
            .await?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
