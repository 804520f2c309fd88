//! `folio list` - list documents with search, tag filter, and pagination.

use clap::Args;

use folio_site::Site;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `list` command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Filter by a case-insensitive substring of title, summary, or tags.
    #[arg(long, short)]
    pub(crate) query: Option<String>,

    /// Show only documents carrying this exact tag (overrides --query).
    #[arg(long, short)]
    pub(crate) tag: Option<String>,

    /// Page number to show.
    #[arg(long, short, default_value_t = 1)]
    pub(crate) page: usize,
}

impl ListArgs {
    pub(crate) fn execute(self, mut site: Site, output: &Output) -> Result<(), CliError> {
        if let Some(query) = self.query {
            site.set_query(query);
        }
        if let Some(tag) = self.tag {
            site.set_tag(Some(tag));
        }
        site.set_page(self.page);

        let view = site.visible();
        if view.items.is_empty() {
            output.warning("No documents match the current filters.");
            return Ok(());
        }

        output.highlight(&format!(
            "Page {} of {} ({} shown)",
            view.current_page,
            view.page_count,
            view.items.len()
        ));
        for record in view.items {
            let featured = if record.featured { " *" } else { "" };
            output.info(&format!(
                "{}  {}{}  [{}]",
                record.published_at,
                record.title,
                featured,
                record.tags.join(", ")
            ));
            output.muted(&format!("    {}  ({} min read)", record.id, record.read_time_minutes));
        }
        Ok(())
    }
}
