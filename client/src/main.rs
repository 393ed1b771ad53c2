use clap::Parser;
use client::auth::AuthClient;
use client::input::InputSampler;
use client::mapping::CoordinateMapper;
use client::network::ConnectionChannel;
use client::rendering::Renderer;
use client::state::StateStore;
use client::upgrades;
use log::{error, info};
use macroquad::prelude::*;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game server base URL (auth endpoints and WebSocket)
    #[arg(short = 's', long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Account email
    #[arg(short = 'e', long)]
    email: String,

    /// Account password
    #[arg(short = 'p', long)]
    password: String,

    /// Create a new account before connecting
    #[arg(long)]
    register: bool,

    /// Username for registration
    #[arg(short = 'u', long, default_value = "player")]
    username: String,

    /// Window width
    #[arg(short = 'w', long, default_value = "1280")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "720")]
    height: i32,
}

fn window_conf() -> Conf {
    // macroquad builds the window before main runs, so the args are
    // parsed here as well.
    let args = Args::parse();
    Conf {
        window_title: "Top-down shooter".to_owned(),
        window_width: args.width,
        window_height: args.height,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{}", e);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Network I/O lives on its own runtime; the frame loop below is
    // driven by macroquad and owns all game-state mutation.
    let runtime = tokio::runtime::Runtime::new()?;

    let auth = AuthClient::new(args.server.clone());
    let token = if args.register {
        info!("registering as {}", args.username);
        runtime.block_on(auth.register(&args.username, &args.email, &args.password))?
    } else {
        runtime.block_on(auth.login(&args.email, &args.password))?
    };
    info!("authenticated, opening game socket");

    // A failed connect is not fatal: the loop runs with an offline
    // channel and the connecting/disconnected overlay stays up.
    let mut channel = match ConnectionChannel::connect(runtime.handle(), &args.server, &token) {
        Ok(channel) => channel,
        Err(e) => {
            error!("failed to open game socket: {}", e);
            ConnectionChannel::offline()
        }
    };
    let mut store = StateStore::new();
    let mapper = CoordinateMapper::new();
    let mut input = InputSampler::new();
    let renderer = Renderer::new();

    info!("Controls: WASD/arrows to move, mouse to aim, click or Space to shoot");
    info!("Keys 1-4 spend skill points, Escape quits");

    loop {
        channel.pump(&mut store);
        input.sample(&mut store, &mapper, &channel);
        upgrades::handle_keys(&mut store, &channel);
        renderer.draw(&store, &mapper);

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        next_frame().await;
    }

    channel.close();
    drop(channel);
    // Let the writer task flush the close frame before the runtime
    // goes away.
    runtime.shutdown_timeout(Duration::from_millis(250));
    Ok(())
}
