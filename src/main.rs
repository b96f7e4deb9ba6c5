use anyhow::{Context, Result};
use clap::Parser;
use skirmish::ai::{Brain, ChaserPolicy, Strategy};
use skirmish::ecs::{Equipment, Faction, UnitBuilder};
use skirmish::event_bus::{GameEvent, LogColor, TracingHandler};
use skirmish::map::GridMap;
use skirmish::personality::apply_traits;
use skirmish::vfx::VfxEngine;
use skirmish::{ConfigFile, Encounter};
use items::{Attributes, EquipSlot, Item, ItemTag, StatKind};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Run a headless demo encounter and summarise what happened.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version)]
struct Args {
    /// TOML file with `[engine]` constants and `[traits.<id>]` tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Commit a player turn every N ticks.
    #[arg(long, default_value_t = 30)]
    turn_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skirmish=info")),
        )
        .init();

    let args = Args::parse();
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigFile::default(),
    };

    tracing::info!(ticks = args.ticks, seed = args.seed, "starting demo encounter");
    let mut encounter = build_demo(file, args.seed)?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut failed_ticks = 0;
    for tick in 1..=args.ticks {
        if args.turn_every > 0 && tick % args.turn_every == 0 {
            encounter.take_turn();
        }
        if !encounter.tick().is_clean() {
            failed_ticks += 1;
        }
        for event in encounter.drain_events() {
            *counts.entry(event.event_type()).or_default() += 1;
        }
    }

    println!(
        "{} ticks, {} enemy turns, {} ticks with failures",
        args.ticks, encounter.resources.turn.turn_number, failed_ticks
    );
    for (event_type, count) in &counts {
        println!("  {event_type:<16} {count}");
    }
    Ok(())
}

fn build_demo(file: ConfigFile, seed: u64) -> Result<Encounter> {
    let tile = file.engine.tile_size;
    let mut encounter = Encounter::standard(file.engine.clone(), seed);
    encounter.services.map = Some(Box::new(GridMap::walled_room(20, 12, tile)));
    encounter.services.vfx = Some(Box::new(VfxEngine::new()));
    encounter.services.events.subscribe_all(Box::new(TracingHandler));

    let world = &mut encounter.world;
    let rosters = &mut encounter.resources.rosters;

    let mut kit = Equipment::new();
    kit.equip(
        EquipSlot::MainHand,
        Item::new("Arming Sword").with_tag(ItemTag::Weapon).with_tag(ItemTag::Melee),
    );
    kit.equip(EquipSlot::OffHand, Item::new("Buckler").with_tag(ItemTag::Shield));
    UnitBuilder::new("Hero", Faction::Player)
        .at(tile * 3.0, tile * 5.0)
        .stats(Attributes::new().with(StatKind::Strength, 10).with(StatKind::MaxHp, 30))
        .equipment(kit)
        .spawn(world, rosters);

    for (i, name) in ["Goblin", "Slime"].into_iter().enumerate() {
        UnitBuilder::new(name, Faction::Monster)
            .at(tile * 15.0, tile * (3.0 + 4.0 * i as f32))
            .body(tile * 0.75, tile * 0.75, 1.5)
            .brain(Brain::new(ChaserPolicy::default()))
            .spawn(world, rosters);
    }

    let mut bow = Equipment::new();
    bow.equip(
        EquipSlot::MainHand,
        Item::new("Short Bow")
            .with_tag(ItemTag::Weapon)
            .with_tag(ItemTag::Ranged)
            .with_tag(ItemTag::Bow),
    );
    let turncoat = UnitBuilder::new("Turncoat", Faction::Mercenary)
        .at(tile * 10.0, tile * 9.0)
        .equipment(bow)
        .attack_speed(1.5)
        .hostile(true)
        .brain(Brain::new(ChaserPolicy {
            reach_tiles: 4.0,
            ..ChaserPolicy::default()
        }))
        .spawn(world, rosters);

    let squads = &mut encounter.resources.squads;
    squads.create_group("raiders", Strategy::Skirmish);
    squads.add_member("raiders", turncoat);

    if !file.traits.is_empty() {
        let unknown = apply_traits(&mut encounter.world, turncoat, &["ISTJ"], &file.traits)
            .context("failed to apply demo traits")?;
        if !unknown.is_empty() {
            tracing::info!(?unknown, "demo traits missing from config");
        }
    }

    encounter
        .services
        .events
        .publish(GameEvent::log("The skirmish begins.", LogColor::Yellow));
    Ok(encounter)
}
