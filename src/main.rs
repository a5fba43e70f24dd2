use log::{debug, error};
use std::{
    env::VarError,
    io::Read,
    path::{Path, PathBuf},
    process::exit,
};
use structopt::StructOpt;

mod api;
mod dispatcher;
mod error;
mod state;

use api::Client;
use state::PageState;

#[derive(StructOpt)]
#[structopt(about = "Delete every connection on a Zazzle account")]
struct Opt {
    /// Page-state JSON captured from the authenticated Contacts page
    /// ("-" reads standard input)
    #[structopt(name = "state-file", parse(from_os_str))]
    state_file: PathBuf,

    /// CSRF token of the session (falls back to $ZAZZLE_CSRF_TOKEN)
    #[structopt(long)]
    csrf_token: Option<String>,

    /// Cookie header of the session (falls back to $ZAZZLE_COOKIE)
    #[structopt(long)]
    cookie: Option<String>,
}

fn credential(flag: Option<String>, var: &str) -> String {
    match flag {
        Some(value) => value,
        None => match std::env::var(var) {
            Ok(value) => value,
            Err(VarError::NotPresent) => {
                error!("No value given on the command line and {} is not set.", var);
                exit(1);
            }
            Err(VarError::NotUnicode(value)) => panic!("`{:?}` is not unicode.", value),
        },
    }
}

fn read_state(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Per-connection outcome lines go through the logger, so they must be
    // visible without RUST_LOG being set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();

    let csrf_token = credential(opt.csrf_token, "ZAZZLE_CSRF_TOKEN");
    let cookie = credential(opt.cookie, "ZAZZLE_COOKIE");

    let raw = match read_state(&opt.state_file) {
        Ok(raw) => raw,
        Err(err) => {
            error!("Could not read {}: {}", opt.state_file.display(), err);
            exit(1);
        }
    };

    let page: PageState = match serde_json::from_str(&raw) {
        Ok(page) => page,
        Err(err) => {
            error!("Could not parse the page state: {}", err);
            exit(1);
        }
    };
    debug!("{:?}", page);

    let client = match Client::new(&csrf_token, &cookie) {
        Ok(client) => client,
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    };

    match dispatcher::purge(&client, &page).await {
        Ok(report) => println!(
            "Deleted {} of {} connections ({} failed).",
            report.deleted, report.attempted, report.failed
        ),
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    }
}
