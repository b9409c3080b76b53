//! Toggl Holidays - 平日のみの休暇エントリをTogglに登録するツール

mod cli;
mod config;
mod error;
mod holiday;
mod logging;
mod toggl;

use anyhow::Result;

fn main() -> Result<()> {
    logging::init();
    cli::run()
}
