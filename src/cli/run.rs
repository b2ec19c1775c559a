use crate::cli::{Cli, SelectPrompt, ui};
use crate::config::ConfigStore;
use crate::content::{Content, prepare};
use crate::net::Resolver;
use crate::qr::{self, Polarity};
use crate::server::TransferSession;
use std::io::IsTerminal;

/// Run one transfer: resolve, prepare, serve once, clean up.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let store = config_store(&cli);

    if cli.force {
        if let Err(e) = store.delete() {
            ui::display_warning(&format!("Unable to delete configuration: {}", e));
        }
    }
    let mut config = store.load();

    let address = {
        let mut resolver = Resolver::system();
        if std::io::stdin().is_terminal() {
            resolver = resolver.with_prompt(SelectPrompt);
        }
        resolver.resolve(&mut config)?
    };

    let paths = cli.paths.clone();
    let zip = cli.zip;
    let content = tokio::task::spawn_blocking(move || prepare(&paths, zip)).await??;

    let mut session = TransferSession::new(address);
    if let Err(e) = session.bind().await {
        discard(&content);
        return Err(e.into());
    }

    let polarity = Polarity::from_reverse_flag(cli.reverse);
    let served = tokio::select! {
        result = session.serve(&content, |url| {
            ui::display_instructions(url);
            qr::render(url, polarity);
        }) => result,
        _ = tokio::signal::ctrl_c() => {
            discard(&content);
            anyhow::bail!("Interrupted before the download completed");
        }
    };

    if let Err(e) = served {
        discard(&content);
        return Err(e.into());
    }

    session.finish(&content, &config, &store)?;
    ui::display_success(&format!("{} was downloaded", content.name));
    Ok(())
}

fn config_store(cli: &Cli) -> ConfigStore {
    if let Some(path) = &cli.config {
        return ConfigStore::at(path);
    }
    ConfigStore::new().unwrap_or_else(|e| {
        tracing::warn!("{}, keeping configuration in the temp directory", e);
        ConfigStore::at(
            std::env::temp_dir()
                .join("qr-filetransfer")
                .join("config.json"),
        )
    })
}

/// Remove temporary content on an early exit.
fn discard(content: &Content) {
    if content.should_be_deleted {
        if let Err(e) = content.delete() {
            tracing::warn!("Unable to delete {}: {}", content.path.display(), e);
        }
    }
}
