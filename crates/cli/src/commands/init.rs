// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::init_work_dir;
use crate::error::Result;

pub fn run(remote: Option<String>) -> Result<()> {
    let target = std::env::current_dir()?;
    let work_dir = init_work_dir(&target, remote.as_deref())?;

    println!("Initialized tracesync in {}", work_dir.display());
    match remote {
        Some(url) => println!("Remote: {}", url),
        None => println!("No remote configured: operations stay queued locally"),
    }
    Ok(())
}
