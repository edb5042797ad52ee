//! Dashboard runner: wires the connection, the router and the stores, then
//! serves the operator prompt until quit or permanent failure.

use std::sync::Arc;

use super::{
    error::DashboardError,
    render,
    repl::{HELP, Input, parse_input, spawn_prompt},
};
use crate::{
    config::DashboardConfig,
    domain::{
        CommandGateway, Delivery, GridLabels, Owner, SonarConfigDomain, SonarDomain, TravelDomain,
    },
    infrastructure::ConnectionManager,
    usecase::{CommandError, DomainStore, MessageRouter, SessionEnd, SyncSession},
};

/// Whether the prompt loop keeps going
enum Flow {
    Continue,
    Quit,
}

/// The three mounted regions of the dashboard.
struct Dashboard {
    owner: Owner,
    travel: DomainStore<TravelDomain>,
    sonar: DomainStore<SonarDomain>,
    sonar_config: DomainStore<SonarConfigDomain>,
}

impl Dashboard {
    fn mount(owner: Owner, router: &MessageRouter, gateway: Arc<dyn CommandGateway>) -> Self {
        Self {
            owner,
            travel: DomainStore::mount(router, Arc::clone(&gateway)),
            sonar: DomainStore::mount(router, Arc::clone(&gateway)),
            sonar_config: DomainStore::mount(router, gateway),
        }
    }

    fn grid_labels(&self) -> Option<GridLabels> {
        let sonar = self.sonar.current_snapshot()?;
        let map = sonar.map.as_ref()?;
        Some(GridLabels::new(map.width, map.height))
    }

    fn show(&self) {
        println!("{}", render::render_travel(&self.travel.view()));
        println!("{}", render::render_sonar(&self.sonar.view(), self.owner));
        println!("{}", render::render_config(&self.sonar_config.view()));
    }

    fn report(delivery: Result<Delivery, CommandError>) {
        match delivery {
            Ok(Delivery::Written { .. }) => {}
            Ok(Delivery::Dropped) => println!("not connected, command dropped"),
            Err(e) => {
                tracing::error!("{}", e);
                println!("{e}");
            }
        }
    }

    fn handle_line(&self, line: &str, connection: &ConnectionManager) -> Flow {
        let labels = self.grid_labels();
        let input = match parse_input(line, self.owner, labels.as_ref()) {
            Ok(input) => input,
            Err(e) => {
                println!("{e}");
                return Flow::Continue;
            }
        };

        match input {
            Input::Sonar(command) => Self::report(self.sonar.send_command(command)),
            Input::Travel(command) => Self::report(self.travel.send_command(command)),
            Input::Show => self.show(),
            Input::Status => println!("{}", render::render_status(&connection.status())),
            Input::Help => println!("{HELP}"),
            Input::Quit => return Flow::Quit,
            Input::Blank => {}
        }
        Flow::Continue
    }
}

/// Run the dashboard until the operator quits or the connection fails for
/// good.
///
/// # Errors
///
/// * `DashboardError::OutOfService` - the reconnect budget was exhausted
/// * `DashboardError::Prompt` - the terminal prompt could not start
pub async fn run(config: DashboardConfig) -> Result<(), DashboardError> {
    tracing::info!("Starting dashboard for {} against {}", config.owner, config.url);

    let (connection, events) = ConnectionManager::connect(config.url.clone(), config.policy);
    let router = Arc::new(MessageRouter::new());
    let mut session = tokio::spawn(SyncSession::new(Arc::clone(&router)).run(events));

    let dashboard = Dashboard::mount(config.owner, &router, connection.gateway());
    let mut travel_changes = dashboard.travel.subscribe();
    let mut sonar_changes = dashboard.sonar.subscribe();
    let mut config_changes = dashboard.sonar_config.subscribe();

    let mut lines = match spawn_prompt().await {
        Ok(lines) => lines,
        Err(e) => {
            connection.shutdown().await;
            return Err(e);
        }
    };
    println!("{HELP}");

    let result = loop {
        tokio::select! {
            end = &mut session => {
                match end {
                    Ok(SessionEnd::Failed) => {
                        println!("{}", render::out_of_service_notice());
                        break Err(DashboardError::OutOfService);
                    }
                    Ok(SessionEnd::Closed) => break Ok(()),
                    Err(e) => {
                        tracing::error!("Sync session stopped unexpectedly: {}", e);
                        break Ok(());
                    }
                }
            }

            line = lines.recv() => {
                let Some(line) = line else {
                    break Ok(());
                };
                if let Flow::Quit = dashboard.handle_line(&line, &connection) {
                    break Ok(());
                }
            }

            changed = travel_changes.changed() => {
                if changed {
                    println!("{}", render::render_travel(&dashboard.travel.view()));
                }
            }

            changed = sonar_changes.changed() => {
                if changed {
                    println!("{}", render::render_sonar(&dashboard.sonar.view(), dashboard.owner));
                }
            }

            changed = config_changes.changed() => {
                if changed {
                    println!("{}", render::render_config(&dashboard.sonar_config.view()));
                }
            }
        }
    };

    connection.shutdown().await;
    tracing::info!("Dashboard stopped");
    result
}
