use std::error::Error;
use std::io;

use dialogwm::config::{self, Config};
use dialogwm::dialogwm::Viewport;
use dialogwm::stdio::{self, StdioHost};
use dialogwm::WindowManager;
use log::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    let (config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    // stdout carries the protocol, logs go to a file
    let _log2 = log2::open(config.log_file.as_str())
        .level(config.log_level.as_str())
        .start();
    if let Some(e) = config_error {
        warn!("{}, using default configuration", e);
    }

    let viewport = Viewport::new(config.viewport.width, config.viewport.height);
    let host = StdioHost::new(io::stdout(), viewport);
    let mut wm = WindowManager::new(host, config);
    info!("dialogwm ready");
    stdio::run(io::stdin().lock(), &mut wm)?;
    Ok(())
}
