//! `folio tags` - print all tags across the corpus.

use folio_site::Site;

use crate::error::CliError;
use crate::output::Output;

pub(crate) fn execute(site: &Site, output: &Output) -> Result<(), CliError> {
    let tags = site.all_tags();
    if tags.is_empty() {
        output.warning("No tags in the corpus.");
        return Ok(());
    }
    for tag in tags {
        output.info(&tag);
    }
    Ok(())
}
