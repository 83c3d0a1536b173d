// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::NotifyCommand;
use crate::config::{find_work_dir, Config};
use crate::error::Result;

pub fn run(command: NotifyCommand) -> Result<()> {
    let work_dir = find_work_dir()?;
    let mut config = Config::load(&work_dir)?;
    config.notify.granted = command == NotifyCommand::Enable;
    config.save(&work_dir)?;

    if config.notify.granted {
        println!("Notifications enabled");
        if config.notify.hooks.is_empty() {
            println!("hint: add [[notify.hooks]] entries to .tracesync/config.toml");
        }
    } else {
        println!("Notifications disabled");
    }
    Ok(())
}
