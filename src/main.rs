use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::IVec3;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trundle::creature::CreatureKind;
use trundle::map::GameMap;
use trundle::sandbox::{prefabs, Critter, Furniture, MessageLog, Roster, Terrain, TileMap};
use trundle::traps::TrapRegistry;
use trundle::vehicle::{PartFlag, Vehicle, VehicleId};
use trundle::{init_logging, Fleet, Surroundings, Tuning};

/// Canned situations to drive through.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    /// Cruise down an empty road.
    Commute,
    /// Drive head-on into a concrete wall.
    Crash,
    /// Smash through a fence and a bench.
    Fence,
    /// Follow a railway line.
    Rails,
    /// Drive over a field of caltrops.
    Caltrops,
}

/// Runs vehicles through a sandbox map and prints what happens
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Situation to simulate
    #[arg(short, long, value_enum, default_value_t = Scenario::Crash)]
    scenario: Scenario,
    /// Seed for every random roll
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of turns to run
    #[arg(short, long, default_value_t = 12)]
    turns: u32,
    /// JSON file overriding handling constants
    #[arg(long)]
    tuning: Option<PathBuf>,
}

struct Stage {
    map: TileMap,
    vehicle: Vehicle,
    velocity: i32,
    cruise: bool,
}

fn stage(scenario: Scenario) -> Result<Stage> {
    let mut map = TileMap::new(40, 20);
    let start = IVec3::new(4, 8, 0);
    let (vehicle, velocity, cruise) = match scenario {
        Scenario::Commute => (prefabs::car(VehicleId(1), start)?, 3000, true),
        Scenario::Crash => {
            map.fill(IVec3::new(16, 0, 0), IVec3::new(17, 19, 0), Terrain::Wall);
            (prefabs::car(VehicleId(1), start)?, 4000, false)
        }
        Scenario::Fence => {
            map.fill(IVec3::new(14, 0, 0), IVec3::new(14, 19, 0), Terrain::Fence);
            map.set_furniture(IVec3::new(22, 8, 0), Furniture::new("park bench", 10, 60));
            (prefabs::car(VehicleId(1), start)?, 2000, false)
        }
        Scenario::Rails => {
            map.fill(IVec3::new(0, 8, 0), IVec3::new(39, 9, 0), Terrain::Rail);
            (prefabs::rail_cart(VehicleId(1), start)?, 1500, true)
        }
        Scenario::Caltrops => {
            let traps = TrapRegistry::builtin();
            let caltrops = traps
                .find("tr_caltrops")
                .context("built-in traps lack caltrops")?;
            for x in 10..14 {
                for y in 8..10 {
                    map.set_trap(IVec3::new(x, y, 0), caltrops);
                }
            }
            (prefabs::car(VehicleId(1), start)?, 1500, true)
        }
    };
    Ok(Stage {
        map,
        vehicle,
        velocity,
        cruise,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let Stage {
        mut map,
        mut vehicle,
        velocity,
        cruise,
    } = stage(args.scenario).context("failed to build scenario")?;

    let mut roster = Roster::new();
    let mut log = MessageLog::new();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let driver = roster.spawn(Critter::human("you", CreatureKind::Player, vehicle.pos));
    let seat = vehicle
        .parts_with(PartFlag::Seat)
        .find(|&seat| vehicle.part_with_feature(seat, PartFlag::Controls, true).is_some())
        .context("vehicle has no driver's seat")?;
    vehicle.board(seat, driver, &mut roster);
    vehicle.engine_on = true;
    vehicle.velocity = velocity;
    vehicle.cruise_on = cruise;
    vehicle.cruise_velocity = if cruise { velocity } else { 0 };
    let id = vehicle.id;
    info!("running {:?} for {} turns", args.scenario, args.turns);

    let mut fleet = Fleet::new();
    {
        let mut env = Surroundings {
            map: &mut map,
            creatures: &mut roster,
            messages: &mut log,
            rng: &mut rng,
            tuning: &tuning,
            traps: TrapRegistry::builtin(),
        };
        fleet.spawn(vehicle, &mut env);
        for turn in 1..=args.turns {
            let removed = fleet.turn(&mut env);
            for (gone, reason) in removed {
                println!("turn {turn}: vehicle {} removed ({reason:?})", gone.into_inner());
            }
            let Some(veh) = fleet.get(id) else {
                break;
            };
            println!(
                "turn {turn}: {} at {} heading {:.0} speed {} skidding {}",
                veh.name,
                veh.pos,
                veh.face.dir(),
                veh.velocity,
                veh.skidding
            );
        }
    }

    println!("{}", map.render(0));
    for (kind, text) in log.messages() {
        println!("[{kind:?}] {text}");
    }
    Ok(())
}
