use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rocket::routes;
use tokio::sync::mpsc::unbounded_channel;

mod bot;
use bot::Herald;

mod config;
use config::HeraldConfig;

mod github;
mod slack;

mod webhooks;
use webhooks::{github::GitHubSecret, github_webhook, EventSender};

#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Configuration file for pr-herald
    #[arg(short, long)]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: HeraldConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let github_token = env::var("GITHUB_TOKEN").context("GITHUB_TOKEN isn't set")?;
    let slack_token =
        env::var("SLACK_OAUTH_ACCESS_TOKEN").context("SLACK_OAUTH_ACCESS_TOKEN isn't set")?;

    let (sender, receiver) = unbounded_channel();
    let github_secret = config.github_secret.clone();

    let herald = Herald::new(config, github_token, slack_token);
    tokio::spawn(async move { herald.run(receiver).await });

    let rocket = rocket::build()
        .mount("/", routes![github_webhook])
        .manage(EventSender(sender))
        .manage(GitHubSecret(github_secret));
    rocket.launch().await.map_err(|err| anyhow::anyhow!(err))?;

    Ok(())
}
