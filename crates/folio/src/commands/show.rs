//! `folio show` - render one document to HTML.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use folio_site::Site;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `show` command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Document id from the manifest.
    pub(crate) id: String,

    /// Write the HTML to this file instead of stdout.
    #[arg(long, short)]
    pub(crate) out: Option<PathBuf>,
}

impl ShowArgs {
    pub(crate) fn execute(self, site: &Site, output: &Output) -> Result<(), CliError> {
        let view = site
            .render(&self.id)
            .ok_or_else(|| CliError::Validation(format!("unknown document id '{}'", self.id)))?;

        for warning in &view.warnings {
            output.warning(warning);
        }

        let mut html = String::new();
        for unit in &view.units {
            html.push_str(&unit.html);
            html.push('\n');
        }

        match self.out {
            Some(path) => {
                std::fs::write(&path, html)?;
                output.info(&format!(
                    "Rendered '{}' to {}",
                    view.title,
                    path.display()
                ));
            }
            None => {
                // Rendered HTML goes to stdout; messages stay on stderr.
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
            }
        }
        Ok(())
    }
}
