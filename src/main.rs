use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use score_portal::adapters::terminal::{self, Command, Flow, Screen, HELP};
use score_portal::adapters::{FileSessionStore, InMemorySessionStore, ReqwestAccountClient};
use score_portal::application::{Location, NavigationController};
use score_portal::config::AppConfig;
use score_portal::logging::init_logging;
use score_portal::ports::SessionStore;

fn print_screen(controller: &NavigationController) {
    let region = controller.region();
    let screen = Screen {
        route: controller.current().map(|mounted| mounted.route),
        region: &region,
    };
    println!("{screen}");
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = config.validate() {
        eprintln!("Invalid configuration: {error}");
        return ExitCode::FAILURE;
    }
    if let Err(error) = init_logging(&config.logging) {
        eprintln!("Failed to initialise logging: {error}");
    }

    let account = match ReqwestAccountClient::new(config.api.http_config()) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            tracing::error!(%error, "Cannot create account client");
            return ExitCode::FAILURE;
        }
    };
    let sessions: Arc<dyn SessionStore> = if config.session.persist {
        Arc::new(FileSessionStore::new(&config.session.store_path))
    } else {
        Arc::new(InMemorySessionStore::new())
    };

    let initial = std::env::args().nth(1);
    let controller =
        NavigationController::new(account, sessions, Location::new(initial.as_deref()));

    controller.start().await;
    print_screen(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::error!(%error, "Failed to read input");
                return ExitCode::FAILURE;
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(terminal::CommandError::Empty) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };
        if command == Command::Help {
            println!("{HELP}");
            continue;
        }

        if terminal::execute(&controller, command).await == Flow::Quit {
            break;
        }
        print_screen(&controller);
    }

    ExitCode::SUCCESS
}
