use anyhow::{Context, Result};
use open::that as open_link;

/// Hands a URL to the desktop environment ("open in a new window").
pub trait Opener {
    fn open(&self, target: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler, usually the browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&self, target: &str) -> Result<()> {
        open_link(target).with_context(|| format!("failed to open {target}"))
    }
}
