use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use survcraft_idle::data::catalog::{
    available_actions, biome_def, can_craft_at, BIOMES, CRAFT_ITEMS,
};
use survcraft_idle::store::{SaveDb, SaveRepository, SaveScheduler};
use survcraft_idle::systems::actions::StartDecline;
use survcraft_idle::systems::crafting::CraftDecline;
use survcraft_idle::{ActionIntent, Game, Notice, Snapshot};

fn main() {
    println!("SurvCraft Idle (console build)");
    let db_path = parse_db_path(env::args().collect());

    let mut repo: Option<Box<dyn SaveRepository>> = match SaveDb::open(&db_path) {
        Ok(db) => Some(Box::new(db)),
        Err(err) => {
            eprintln!(
                "Save store unavailable at {} ({}); progress will not persist.",
                db_path.display(),
                err
            );
            None
        }
    };

    let start_ms = wall_clock_ms();
    let mut game = Game::new(start_ms);

    if let Some(db) = repo.as_mut() {
        match db.load_save() {
            Ok(raw) => game.restore(raw.as_deref()),
            Err(err) => eprintln!("Failed to read save: {}", err),
        }
    }

    let mut scheduler = SaveScheduler::new(start_ms);
    let mut last_tick = Instant::now();

    print_status(&game.snapshot());
    println!("Type 'help' for commands.");

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(word) => word,
            None => continue,
        };
        let argument = words.next();

        let mut intents = Vec::new();
        let mut extra_ms = 0.0;
        match command {
            "start" => match argument {
                Some(id) => intents.push(ActionIntent::StartAction {
                    action_id: id.to_string(),
                }),
                None => println!("Usage: start <action-id>"),
            },
            "craft" => match argument {
                Some(id) => intents.push(ActionIntent::CraftItem {
                    item_id: id.to_string(),
                }),
                None => println!("Usage: craft <item-id>"),
            },
            "go" => match argument {
                Some(id) => intents.push(ActionIntent::SwitchBiome {
                    biome_id: id.to_string(),
                }),
                None => println!("Usage: go <biome-id>"),
            },
            "wait" => {
                let seconds: f64 = argument.and_then(|raw| raw.parse().ok()).unwrap_or(1.0);
                extra_ms = seconds.max(0.0) * 1000.0;
                intents.push(ActionIntent::Wait);
            }
            _ => {}
        }

        let elapsed_ms = last_tick.elapsed().as_secs_f64() * 1000.0;
        last_tick = Instant::now();
        let snapshot = game.tick(intents, elapsed_ms + extra_ms);

        for notice in snapshot.notices.iter() {
            println!("{}", describe_notice(notice));
        }

        match command {
            "help" => print_help(),
            "status" => print_status(&snapshot),
            "actions" => print_actions(&snapshot),
            "crafts" => print_crafts(&snapshot),
            "biomes" => print_biomes(&snapshot),
            "journal" => print_journal(&snapshot),
            "start" | "craft" | "go" | "wait" => print_status(&snapshot),
            "save" => {
                persist(repo.as_mut(), &game, &mut scheduler);
                println!("Game saved.");
            }
            "reset" => {
                if confirm_reset() {
                    game.reset();
                    persist(repo.as_mut(), &game, &mut scheduler);
                    println!("Camp reset to a fresh start.");
                } else {
                    println!("Reset cancelled.");
                }
            }
            "quit" | "exit" => {
                persist(repo.as_mut(), &game, &mut scheduler);
                break;
            }
            _ => println!("Unknown command '{}'. Type 'help' for commands.", command),
        }

        if snapshot.save_dirty {
            scheduler.mark_dirty(game.now_ms());
        }
        if scheduler.should_save(game.now_ms()) {
            persist(repo.as_mut(), &game, &mut scheduler);
        }
    }
}

fn parse_db_path(args: Vec<String>) -> PathBuf {
    let mut db_path = PathBuf::from("./survcraft-save.db");
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            if let Some(path) = iter.next() {
                db_path = PathBuf::from(path);
            }
        }
    }
    db_path
}

fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as f64)
        .unwrap_or(0.0)
}

fn persist(repo: Option<&mut Box<dyn SaveRepository>>, game: &Game, scheduler: &mut SaveScheduler) {
    let Some(repo) = repo else {
        return;
    };
    match game.encode() {
        Ok(payload) => match repo.write_save(&payload, game.now_ms()) {
            Ok(()) => scheduler.mark_saved(game.now_ms()),
            // Leave the scheduler dirty; the next poll retries naturally.
            Err(err) => eprintln!("Save failed: {}", err),
        },
        Err(err) => eprintln!("Failed to encode save: {}", err),
    }
}

fn confirm_reset() -> bool {
    print!("Reset the save? This cannot be undone. (y/N) ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn describe_notice(notice: &Notice) -> String {
    match notice {
        Notice::StartDeclined { action_id, reason } => {
            let why = match reason {
                StartDecline::InsufficientEnergy => "not enough energy",
                StartDecline::WrongBiome => "unavailable in this biome",
                StartDecline::AlreadyRunning => "already in progress",
                StartDecline::UnknownAction => "unknown action",
            };
            format!("Cannot start {}: {}.", action_id, why)
        }
        Notice::CraftDeclined { item_id, reason } => {
            let why = match reason {
                CraftDecline::MissingResources => "not enough resources",
                CraftDecline::WrongBiome => "crafting works only at Base Camp",
                CraftDecline::UnknownItem => "unknown item",
            };
            format!("Cannot craft {}: {}.", item_id, why)
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  status            Show camp status");
    println!("  actions           List gathering actions here");
    println!("  start <id>        Begin a gathering action");
    println!("  crafts            List craftable items");
    println!("  craft <id>        Craft an item (Base Camp only)");
    println!("  biomes            List known biomes");
    println!("  go <id>           Travel to a biome");
    println!("  journal           Show the journal");
    println!("  wait [seconds]    Let time pass (default 1s)");
    println!("  save              Save immediately");
    println!("  reset             Reset to a fresh start");
    println!("  quit              Save and exit");
}

fn print_status(snapshot: &Snapshot) {
    let biome_name = biome_def(&snapshot.current_biome)
        .map(|biome| biome.name)
        .unwrap_or(snapshot.current_biome.as_str());
    println!("-- {} --", biome_name);
    println!(
        "Health: {} / {}",
        snapshot.health.0.round() as i64,
        snapshot.health.1.round() as i64
    );
    for pool in snapshot.energy.iter() {
        println!(
            "{}: {} / {}",
            pool.label,
            pool.current.round() as i64,
            pool.max.round() as i64
        );
    }
    println!("Total energy: {}", snapshot.energy_total.round() as i64);
    let resources: Vec<String> = snapshot
        .resources
        .iter()
        .map(|(id, amount)| format!("{} {}", id, amount.floor() as i64))
        .collect();
    println!("Resources: {}", resources.join(", "));
    for status in snapshot.actions.iter().filter(|status| status.running) {
        println!(
            "Running: {} ({}%)",
            status.id,
            (status.progress * 100.0).round() as i64
        );
    }
}

fn print_actions(snapshot: &Snapshot) {
    let mut any = false;
    for action in available_actions(&snapshot.current_biome) {
        any = true;
        let state = snapshot
            .actions
            .iter()
            .find(|status| status.id == action.id)
            .filter(|status| status.running)
            .map(|status| format!("running, {}%", (status.progress * 100.0).round() as i64))
            .unwrap_or_else(|| "ready".to_string());
        println!(
            "{:<14} +{} {:<6} {:>4.1}s  {} energy  [{}]",
            action.id,
            action.amount as i64,
            action.resource,
            action.duration_ms / 1000.0,
            action.energy_cost as i64,
            state
        );
    }
    if !any {
        println!("Nothing to gather here.");
    }
}

fn print_crafts(snapshot: &Snapshot) {
    if !can_craft_at(&snapshot.current_biome) {
        println!("Crafting works only at Base Camp.");
        return;
    }
    for item in CRAFT_ITEMS.iter() {
        let costs: Vec<String> = item
            .requires
            .iter()
            .map(|(resource, cost)| format!("{} {}", resource, *cost as i64))
            .collect();
        let owned = snapshot
            .crafted
            .iter()
            .find(|(id, _)| id == item.id)
            .map(|(_, count)| *count)
            .unwrap_or(0);
        println!("{:<16} needs {}  (owned: {})", item.id, costs.join(", "), owned);
    }
}

fn print_biomes(snapshot: &Snapshot) {
    for biome in BIOMES.iter() {
        let marker = if biome.id == snapshot.current_biome {
            "current"
        } else if snapshot
            .discovered_biomes
            .iter()
            .any(|known| known == biome.id)
        {
            "known"
        } else {
            "unvisited"
        };
        println!("{:<8} {:<14} [{}] {}", biome.id, biome.name, marker, biome.description);
    }
}

fn print_journal(snapshot: &Snapshot) {
    if snapshot.journal.is_empty() {
        println!("The journal is empty.");
        return;
    }
    for entry in snapshot.journal.iter() {
        println!("[{}] {}", entry.kind.as_str(), entry.message);
    }
}
