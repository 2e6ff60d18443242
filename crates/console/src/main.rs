mod catalog_app;
mod console;
mod logging;
mod registry_app;

use anyhow::Result;
use tracing::{error, info, warn};
use vethub_core::{
    config::{self, AppConfig},
    CatalogStore,
};

use crate::{
    catalog_app::CatalogApp,
    console::{is_input_closed, Console, Terminal},
    logging::{init_logging, logged},
    registry_app::RegistryApp,
};

fn main() -> Result<()> {
    init_logging()?;

    match config::ensure_default_config() {
        Ok(path) => info!(path = %path.display(), "configuration file ready"),
        Err(err) => warn!("could not write default configuration: {err:#}"),
    }
    let config = AppConfig::load().unwrap_or_else(|err| {
        warn!("falling back to default configuration: {err:#}");
        AppConfig::default()
    });

    let mut terminal = Terminal::new(config.clear_screen);
    match launcher(&mut terminal, &config) {
        Err(err) if is_input_closed(&err) => info!("input closed, exiting"),
        other => other?,
    }
    Ok(())
}

fn launcher<C: Console>(console: &mut C, config: &AppConfig) -> Result<()> {
    loop {
        console.clear()?;
        console.print_line("=== VetHub ===")?;
        console.print_line("1. Навігатор ресурсів")?;
        console.print_line("2. Реєстр ветеранів")?;
        console.print_line("0. Вихід")?;

        match console.prompt_number::<u32>("Ваш вибір: ")? {
            1 => {
                let store = CatalogStore::new(config.catalog_dir());
                let result = logged("resource_catalog", || {
                    CatalogApp::load(&mut *console, store)?.run()
                });
                report(result)?;
            }
            2 => {
                let path = config.registry_path();
                let result = logged("veteran_registry", || {
                    RegistryApp::load(&mut *console, path)?.run()
                });
                report(result)?;
            }
            0 => return Ok(()),
            _ => console.print_line("Невірний вибір. Спробуйте ще раз.")?,
        }
    }
}

/// Unsaved data is logged and the launcher keeps running; closed input ends it.
fn report(result: Result<()>) -> Result<()> {
    match result {
        Err(err) if is_input_closed(&err) => Err(err),
        Err(err) => {
            error!("{err:#}");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::console::testing::ScriptedConsole;

    #[test]
    fn launcher_runs_each_application_against_configured_paths() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig {
            data_dir: dir.path().join("data"),
            registry_file: "people.json".into(),
            clear_screen: false,
        };
        let mut console = ScriptedConsole::new([
            "2", "1", "Іван", "40", "УБД", "Київ", "0", // registry
            "1", "0", // catalog
            "7", "0",
        ]);

        launcher(&mut console, &config)?;

        assert!(fs::read_to_string(dir.path().join("data/people.json"))?.contains("Іван"));
        assert_eq!(fs::read_to_string(dir.path().join("data/jobs.json"))?, "[]");
        assert!(console.transcript().contains("Невірний вибір. Спробуйте ще раз."));
        assert_eq!(console.remaining(), 0);
        Ok(())
    }
}
