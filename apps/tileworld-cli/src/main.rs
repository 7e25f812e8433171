use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tileworld_common::{GridPos, LayerKind, Mode};
use tileworld_generate::{ContentProxy, GeminiGenerator, GenerateRequest, NoUpstream, ProxyConfig};
use tileworld_input::{TileEvent, dispatch_click};
use tileworld_loader::{FileWorldLoader, world_to_json};
use tileworld_render::{LayerMode, LayerSet, Renderer, TextRenderer, ViewMode};
use tileworld_sprite::{AnimationDescriptor, SpriteConfig, SpritePlayer};
use tileworld_store::{LoadOutcome, WorldStore};
use tileworld_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tileworld-cli", about = "CLI tool for tile worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding `<name>.json` worlds and images
    #[arg(long, default_value = "./public")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Render a world as text
    Show {
        /// World name, without `.json`
        #[arg(default_value = "world0")]
        name: String,
        /// Draw each layer as its own grid
        #[arg(long)]
        separated: bool,
        /// Layers to hide (set, props, characters)
        #[arg(long)]
        hide: Vec<LayerKind>,
    },
    /// Click a tile and print what it became
    Click {
        name: String,
        #[arg(long)]
        layer: LayerKind,
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
        /// Number of clicks
        #[arg(short, long, default_value = "1")]
        times: usize,
        /// Click in edit mode instead of display mode
        #[arg(long)]
        edit: bool,
    },
    /// Print the world in canonical JSON form
    Normalize { name: String },
    /// Run the demo sprite through press, hold and release
    Sprite {
        /// Number of frame ticks to simulate
        #[arg(short, long, default_value = "24")]
        ticks: usize,
    },
    /// Validate and forward an image and prompt to the generative service
    Generate {
        /// Image path relative to the data dir
        image_path: Option<String>,
        #[arg(short, long)]
        prompt: Option<String>,
        /// Print proxy status instead of sending a request
        #[arg(long)]
        status: bool,
    },
}

fn load(data_dir: &Path, name: &str) -> anyhow::Result<WorldStore> {
    let loader = FileWorldLoader::new(data_dir);
    let mut store = WorldStore::new();
    match pollster::block_on(store.load_world(&loader, name)) {
        LoadOutcome::Installed => Ok(store),
        _ => bail!(
            "{}",
            store.error().unwrap_or("world load did not complete")
        ),
    }
}

/// Press on the first tick, release halfway through.
fn sprite_demo(ticks: usize) -> Vec<String> {
    let mut player = SpritePlayer::new(
        SpriteConfig::new("idle", [2])
            .fps(12.0)
            .on_mouse_down(AnimationDescriptor::new("pickup", [0, 1, 1, 2, 3]))
            .on_mouse_up(AnimationDescriptor::new("putdown", [0, 1, 1, 2, 3])),
    );
    let interval = player.animator().frame_interval();
    let release_at = ticks / 2;
    let mut lines = Vec::with_capacity(ticks);

    for i in 0..ticks {
        if i == 0 {
            player.pointer_down();
        } else if i == release_at {
            player.pointer_up();
        } else {
            player.advance(interval);
        }
        let frame = player
            .current_frame()
            .map(|f| f.asset_key())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("{i:>3} {:<9} {frame}", format!("{:?}", player.state())));
    }
    lines
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(data_dir = %cli.data_dir.display(), "starting");

    match cli.command {
        Commands::Info => {
            println!("tileworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("layers: {}", LayerKind::ALL.map(|k| k.as_str()).join(", "));
            println!("data dir: {}", cli.data_dir.display());
            for krate in [
                "common", "kernel", "loader", "store", "input", "render", "sprite", "generate",
                "tools",
            ] {
                println!("  tileworld-{krate}");
            }
        }
        Commands::Show {
            name,
            separated,
            hide,
        } => {
            let store = load(&cli.data_dir, &name)?;
            let world = store.world().context("no world loaded")?;

            let mut layers = LayerSet::default();
            for kind in hide {
                layers.set_mode(kind, LayerMode::Off);
            }
            let view = if separated {
                ViewMode::Separated
            } else {
                ViewMode::Layered
            };
            print!("{}", TextRenderer::new(view).render(world, &layers));
            println!("{}", WorldInspector::summary(world));
            for pos in WorldInspector::interactive_tiles(world) {
                println!("interactive: switch at {pos}");
            }
        }
        Commands::Click {
            name,
            layer,
            x,
            y,
            times,
            edit,
        } => {
            let mut store = load(&cli.data_dir, &name)?;
            if edit {
                store.set_mode(Mode::Edit);
            }
            let pos = GridPos::new(x, y);
            for i in 1..=times {
                let Some(tile) = store.tile_at(layer, pos).cloned() else {
                    println!("no {layer} tile at {pos}");
                    break;
                };
                let changed = dispatch_click(&mut store, &TileEvent::new(pos, tile, layer));
                let now = store
                    .tile_at(layer, pos)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                println!(
                    "click {i}: {now}{}",
                    if changed { "" } else { " (unchanged)" }
                );
            }
        }
        Commands::Normalize { name } => {
            let store = load(&cli.data_dir, &name)?;
            let world = store.world().context("no world loaded")?;
            println!("{}", world_to_json(world)?);
        }
        Commands::Sprite { ticks } => {
            for line in sprite_demo(ticks) {
                println!("{line}");
            }
        }
        Commands::Generate {
            image_path,
            prompt,
            status,
        } => {
            let config = ProxyConfig::from_env(&cli.data_dir);
            if status {
                let proxy = ContentProxy::new(config, NoUpstream);
                println!("{}", serde_json::to_string_pretty(&proxy.status())?);
                return Ok(());
            }
            let request = GenerateRequest { image_path, prompt };
            let response = if config.has_api_key() {
                let proxy = ContentProxy::new(config.clone(), GeminiGenerator::from_config(&config)?);
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?
                    .block_on(proxy.handle(request))
            } else {
                // Reports the missing key without touching the network.
                pollster::block_on(ContentProxy::new(config, NoUpstream).handle(request))
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            if let Some(error) = response.error {
                bail!(error);
            }
        }
    }

    Ok(())
}
