use anyhow::Context;
use colored::Colorize;

use grapevine_protocol::{ChainView, GameView, MessageNodeView, NewGameRequest};
use grapevine_server::{GrapevineServer, ServerConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::NewGame(args) => cmd_new_game(&cli.server, args).await,
        Command::Games => cmd_games(&cli.server).await,
        Command::Inspect(args) => cmd_inspect(&cli.server, args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(media_root) = args.media_root {
        config.media_root = media_root;
    }

    println!(
        "{} Grapevine server on {} (media: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.media_root.display()
    );
    GrapevineServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_new_game(server: &str, args: NewGameArgs) -> anyhow::Result<()> {
    let request = NewGameRequest {
        name: args.name,
        num_chains: args.chains,
        chain_order: args.order.into(),
    };
    let game: GameView = reqwest::Client::new()
        .post(format!("{server}/api/games"))
        .json(&request)
        .send()
        .await
        .context("is the server running?")?
        .error_for_status()?
        .json()
        .await?;

    println!(
        "{} Created game {} ({}) with {} chain(s)",
        "✓".green().bold(),
        game.pk.to_string().yellow(),
        game.name.bold(),
        args.chains
    );
    println!("  Play:    {}", game.play_url.cyan());
    println!("  Inspect: {}", game.inspect_url.cyan());
    Ok(())
}

async fn cmd_games(server: &str) -> anyhow::Result<()> {
    let games: Vec<GameView> = reqwest::Client::new()
        .get(format!("{server}/api/games"))
        .send()
        .await
        .context("is the server running?")?
        .error_for_status()?
        .json()
        .await?;

    if games.is_empty() {
        println!("No active games.");
        return Ok(());
    }
    for game in games {
        println!(
            "{}  {}  ({})",
            format!("game-{}", game.pk).yellow().bold(),
            game.name,
            game.chain_order
        );
    }
    Ok(())
}

async fn cmd_inspect(server: &str, args: InspectArgs) -> anyhow::Result<()> {
    let chains: Vec<ChainView> = reqwest::Client::new()
        .get(format!("{server}/api/games/{}/inspect", args.game))
        .send()
        .await
        .context("is the server running?")?
        .error_for_status()?
        .json()
        .await?;

    for chain in chains {
        println!(
            "{} ({} generations, {} branches)",
            format!("chain-{}", chain.pk).yellow().bold(),
            chain.generations,
            chain.branches
        );
        print_tree(&chain.messages);
    }
    Ok(())
}

/// Print a message tree with box-drawing guides. Iterative so chain depth
/// is never a concern.
fn print_tree(root: &MessageNodeView) {
    let mut stack: Vec<(&MessageNodeView, String, bool)> = vec![(root, String::new(), true)];
    while let Some((node, prefix, is_last)) = stack.pop() {
        let connector = if prefix.is_empty() {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };
        let slot = match &node.audio {
            Some(url) => url.green().to_string(),
            None => "empty".dimmed().to_string(),
        };
        println!(
            "{prefix}{connector}{} gen {} [{slot}]",
            format!("message-{}", node.pk).bold(),
            node.generation
        );

        let child_prefix = if prefix.is_empty() {
            "  ".to_string()
        } else if is_last {
            format!("{prefix}   ")
        } else {
            format!("{prefix}│  ")
        };
        // Reverse push keeps creation order on pop.
        let last_index = node.children.len().saturating_sub(1);
        for (index, child) in node.children.iter().enumerate().rev() {
            stack.push((child, child_prefix.clone(), index == last_index));
        }
    }
}
