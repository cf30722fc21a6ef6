mod appsettings;
mod cli;
mod notifier;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use notifier::{LogNotifier, TelegramNotifier};
use remindo_models::settings::Settings;
use remindo_scheduler::{
    DueScanner, DueScannerOptions, OccurrenceCalculator,
    clock::{Clock, SystemClock},
    delivery::ReminderNotifier,
};
use remindo_storage::{ReminderStorage, json::JsonFileReminderStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let settings = appsettings::load()?;

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| settings.storage.path.clone().into());
    let storage: Arc<dyn ReminderStorage> = Arc::new(JsonFileReminderStorage::new(store_path));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&settings, storage).await,
        Command::Add(args) => {
            let created = storage.insert(args.into_new_reminder()).await?;
            println!("Added {}", created.id);
            Ok(())
        }
        Command::List => {
            let calculator = OccurrenceCalculator::new(settings.scanner.monthly_wrap);
            let now = SystemClock.now();
            for reminder in storage.load_all().await? {
                println!("{}", cli::describe(&reminder, &calculator, now));
            }
            Ok(())
        }
        Command::Done { id } => match storage.mark_done(id).await? {
            Some(reminder) => {
                println!("Done: {}", reminder.text);
                Ok(())
            }
            None => anyhow::bail!("No reminder with id {id}"),
        },
    }
}

async fn run(settings: &Settings, storage: Arc<dyn ReminderStorage>) -> anyhow::Result<()> {
    let notifier: Arc<dyn ReminderNotifier> = match &settings.telegram {
        Some(telegram) => {
            log::info!("Delivering reminders to Telegram chat {}", telegram.chat_id);
            Arc::new(TelegramNotifier::create(telegram))
        }
        None => {
            log::info!("No Telegram settings, delivering reminders to the log");
            Arc::new(LogNotifier)
        }
    };

    let scanner = DueScanner::new(
        storage,
        notifier,
        Arc::new(SystemClock),
        DueScannerOptions::from(&settings.scanner),
    );
    let handle = scanner.start();

    tokio::signal::ctrl_c().await?;
    log::info!("Received Ctrl-C, stopping");
    handle.stop().await;

    Ok(())
}
