//! Text rendering of the dashboard panels.
//!
//! Every function here is a pure projection of a store view; nothing is
//! mutated and nothing is sent.

use std::fmt::Write as _;

use crate::{
    domain::{
        CellView, GridLabels, HealthTier, Owner, ShipSummary, ShipTravelStatus, SonarConfig,
        SonarMap, SonarState, StepId, TravelState, WeaponKind, visible_grid, visible_mines,
    },
    infrastructure::ConnectionStatus,
    usecase::StoreView,
};

const NOT_READY: &str = "waiting for the game master...";
const FAILED: &str = "out of service";

fn cell_glyph(view: CellView) -> char {
    match view {
        CellView::Terrain => '#',
        CellView::Ship(Some(Owner::Players)) => 'P',
        CellView::Ship(Some(Owner::Npcs)) => 'N',
        CellView::Ship(None) => 'S',
        CellView::Trail(Some(Owner::Players)) => 'p',
        CellView::Trail(Some(Owner::Npcs)) => 'n',
        CellView::Trail(None) => '*',
        CellView::Empty => '.',
    }
}

fn health_label(tier: HealthTier) -> &'static str {
    match tier {
        HealthTier::Healthy => "ok",
        HealthTier::Damaged => "damaged",
        HealthTier::Critical => "CRITICAL",
    }
}

fn not_ready<S>(title: &str, view: &StoreView<S>) -> Option<String> {
    match view {
        StoreView::NotReady => Some(format!("[{title}] {NOT_READY}")),
        StoreView::Failed => Some(format!("[{title}] {FAILED}")),
        StoreView::Ready(_) => None,
    }
}

pub fn render_travel(view: &StoreView<TravelState>) -> String {
    if let Some(placeholder) = not_ready("travel", view) {
        return placeholder;
    }
    let StoreView::Ready(travel) = view else {
        return String::new();
    };

    let name_of = |id: &str| {
        travel
            .graph
            .node(id)
            .map_or_else(|| id.to_string(), |node| node.label().to_string())
    };

    let mut out = String::from("[travel] ");
    match &travel.current_step_id {
        StepId::Planet(id) => {
            let _ = write!(out, "at {}", name_of(id));
        }
        StepId::Transit(from, to) => {
            let _ = write!(out, "{} -> {}", name_of(from), name_of(to));
            if let Some(completion) = travel.step_completion {
                let _ = write!(out, " ({:.0}%)", completion * 100.0);
            }
        }
    }
    let status = match travel.ship_state {
        ShipTravelStatus::Paused => "paused",
        ShipTravelStatus::Landed => "landed",
        ShipTravelStatus::Travelling => "travelling",
    };
    let _ = write!(out, ", ship {status}");

    if let Some(planet) = travel.current_planet() {
        let destinations: Vec<&str> = travel.graph.destinations_from(planet).collect();
        if !destinations.is_empty() {
            let _ = write!(out, "\n  destinations: {}", destinations.join(", "));
        }
    }
    out
}

fn ship_line(label: &str, ship: &ShipSummary) -> String {
    format!(
        "  {label:<8} {} {}/{} hp ({})",
        ship.name,
        ship.hp,
        ship.total_hp,
        health_label(ship.health_tier())
    )
}

/// The grid as `viewer` is allowed to see it, with column letters on top and
/// row numbers on the left.
pub fn render_grid(map: &SonarMap, viewer: Owner) -> String {
    let labels = GridLabels::new(map.width, map.height);
    let row_width = labels.row_labels().map(|label| label.len()).max().unwrap_or(1);
    let column_labels: Vec<String> = labels.column_labels().collect();
    let column_width = column_labels.iter().map(String::len).max().unwrap_or(1);

    let mut out = format!("{:row_width$} ", "");
    for label in &column_labels {
        let _ = write!(out, " {label:>column_width$}");
    }
    for (row_label, row) in labels.row_labels().zip(visible_grid(map, viewer)) {
        let _ = write!(out, "\n{row_label:>row_width$} ");
        for view in row {
            let _ = write!(out, " {:>column_width$}", cell_glyph(view));
        }
    }
    out
}

pub fn render_sonar(view: &StoreView<SonarState>, viewer: Owner) -> String {
    if let Some(placeholder) = not_ready("sonar", view) {
        return placeholder;
    }
    let StoreView::Ready(sonar) = view else {
        return String::new();
    };

    let Some(map) = sonar.map.as_ref().filter(|_| sonar.in_battle) else {
        return "[sonar] no battle in progress".to_string();
    };

    let mut out = format!("[sonar] battle in progress, viewing as {viewer}\n");
    out.push_str(&render_grid(map, viewer));
    let _ = write!(out, "\n{}", ship_line("you", map.ship(viewer)));
    let _ = write!(out, "\n{}", ship_line("enemy", map.ship(viewer.opponent())));

    let mines = visible_mines(map, viewer);
    if !mines.is_empty() {
        let labels = GridLabels::new(map.width, map.height);
        let mines: Vec<String> = mines
            .into_iter()
            .map(|(uid, position)| match labels.cell_label(position) {
                Ok(cell) => format!("{uid}@{cell}"),
                Err(_) => uid.to_string(),
            })
            .collect();
        let _ = write!(out, "\n  mines    {}", mines.join(", "));
    }
    out
}

pub fn render_config(view: &StoreView<SonarConfig>) -> String {
    if let Some(placeholder) = not_ready("weapons", view) {
        return placeholder;
    }
    let StoreView::Ready(config) = view else {
        return String::new();
    };

    let mut out = String::from("[weapons]");
    for (name, kind) in [("torpedo", WeaponKind::Torpedo), ("mine", WeaponKind::Mine)] {
        let weapon = config.weapon(kind);
        let _ = write!(
            out,
            "\n  {name:<8} reach {} radius {} damage {}",
            weapon.reach, weapon.radius, weapon.damage
        );
    }
    if let Some(hp) = config.player_default_hp {
        let _ = write!(out, "\n  default hp {hp}");
    }
    if config.use_control_panel {
        out.push_str("\n  control panel enabled");
    }
    out
}

pub fn render_status(status: &ConnectionStatus) -> String {
    format!("[connection] {status}")
}

/// Printed once when the connection gives up.
pub fn out_of_service_notice() -> &'static str {
    "The dashboard is out of service: the connection to the game master could not be \
     restored.\nPlease contact a game master."
}
