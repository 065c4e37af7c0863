use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use huddle::prompt::{self, PortChoice};
use huddle::{
    create_screen, net, ChatServer, ChatState, Config, ConnectionRegistry, Credential,
    HuddleError, TerminalClient,
};

/// Huddle - broadcast chat for the local network
#[derive(Parser)]
#[command(name = "huddle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Join an existing hub as a terminal client only
    #[arg(long)]
    terminal: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "huddle.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load_with_env(&cli.config) {
        Ok(config) => config,
        Err(HuddleError::Io(_)) => {
            let mut config = Config::default();
            if let Err(e) = config.apply_env_overrides() {
                eprintln!("{e}");
            }
            config
        }
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = huddle::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        huddle::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        eprintln!("{e}");
        std::process::exit(2);
    }

    if config.client.clear_screen {
        print!("{}", create_screen(config.client.color).clear_screen());
    }

    let result = if cli.terminal {
        run_terminal(&config).await
    } else {
        run_host(&config).await
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Ask for a credential or address and join as a terminal client.
async fn run_terminal(config: &Config) -> huddle::Result<()> {
    let target = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        prompt::read_target(&mut input, &mut output, config.server.port)?
    };
    join(config, &target.host, target.port).await
}

/// Host a hub, then join it from this terminal.
async fn run_host(config: &Config) -> huddle::Result<()> {
    let registry = Arc::new(ConnectionRegistry::with_outbound_buffer(
        config.server.outbound_buffer,
    ));

    let server = loop {
        let choice = {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            prompt::choose_port(&mut input, &mut output, config.server.port, net::port_in_use)
                .await?
        };

        let port = match choice {
            PortChoice::Join(port) => {
                println!("Joining existing chat on localhost:{port} ...");
                return join(config, "localhost", port).await;
            }
            PortChoice::Host(port) => port,
        };

        let mut server_config = config.server.clone();
        server_config.port = port;
        let state = ChatState::new(Arc::clone(&registry), config.chat.codec);
        match ChatServer::bind(&server_config, state).await {
            Ok(server) => break server,
            Err(HuddleError::PortInUse(port)) => {
                println!("Port {port} is already in use.");
                let stdin = io::stdin();
                if prompt::confirm_join(&mut stdin.lock(), &mut io::stdout())? {
                    return join(config, "localhost", port).await;
                }
                println!("Try another port.");
            }
            Err(e) => return Err(e),
        }
    };

    let port = server.local_addr()?.port();
    let ip = net::local_ipv4();
    let credential = Credential::new(ip, port);

    println!();
    println!("Server starting on {ip}:{port} ...");
    println!("Share this connection password with others to join:\n  {credential}");
    println!("Clients can connect via ws://{ip}:{port}/ws or open http://{ip}:{port}/ in browser");
    println!("Run 'huddle --terminal' on another machine to join from a terminal.\n");
    io::stdout().flush()?;

    server.spawn()?;
    info!(%ip, port, codec = %config.chat.codec, "hub started");

    join(config, &ip.to_string(), port).await?;

    println!("Local client detached; the hub keeps serving. Press Ctrl+C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
    }
    let released = registry.shutdown().await;
    info!(released, "hub stopped");
    Ok(())
}

/// Run the interactive terminal client against a hub.
async fn join(config: &Config, host: &str, port: u16) -> huddle::Result<()> {
    let screen = create_screen(config.client.color);
    let client = TerminalClient::new(host, port, config.chat.codec, screen);
    client
        .run(io::BufReader::new(io::stdin()), io::stdout())
        .await?;
    Ok(())
}
