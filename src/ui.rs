//! Stderr progress reporting shared by the CLI tools. Pretty output (spinner
//! and bars) only when stderr is a terminal; plain stage lines otherwise so
//! logs stay readable when piped.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::{Duration, Instant};

pub struct Progress {
    pretty: bool,
}

impl Progress {
    pub fn auto() -> Self {
        Self {
            pretty: std::io::stderr().is_terminal(),
        }
    }

    /// Announce a named stage; completion and elapsed time are reported
    /// when the returned guard drops.
    pub fn stage(&self, name: &str) -> Stage {
        if self.pretty {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner.set_message(name.to_string());
            Stage {
                name: name.to_string(),
                start: Instant::now(),
                spinner: Some(spinner),
            }
        } else {
            eprintln!("==> {}", name);
            Stage {
                name: name.to_string(),
                start: Instant::now(),
                spinner: None,
            }
        }
    }

    /// A bar over a known number of records. Hidden when not a terminal.
    pub fn counter(&self, len: u64, name: &str) -> ProgressBar {
        if !self.pretty {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_draw_target(ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(name.to_string());
        bar
    }
}

pub struct Stage {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl Drop for Stage {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let message = format!("{} done ({:.1}s)", self.name, elapsed.as_secs_f32());
        match &self.spinner {
            Some(spinner) => spinner.finish_with_message(message),
            None => eprintln!("==> {}", message),
        }
    }
}
