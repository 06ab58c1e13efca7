use twilight_model::channel::message::embed::{Embed, EmbedField};
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x34_98_DB;

/// Footer text for one page of a paginated embed. Empty for single pages.
pub fn page_footer(page: usize, total_pages: usize) -> String {
    let page = page.max(1);
    let total_pages = total_pages.max(1);

    if total_pages > 1 {
        format!("Page {page}/{total_pages}")
    } else {
        String::new()
    }
}

/// Build a standard page embed with consistent styling.
///
/// `page` is one-based.
pub fn build_page_embed(
    title: &str,
    description: impl Into<String>,
    fields: Vec<EmbedField>,
    page: usize,
    total_pages: usize,
) -> anyhow::Result<Embed> {
    let footer_text = page_footer(page, total_pages);

    let mut builder = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    for field in fields {
        builder = builder.field(field);
    }

    let embed = if footer_text.is_empty() {
        builder.validate()?.build()
    } else {
        let footer = EmbedFooterBuilder::new(footer_text).build();
        builder.footer(footer).validate()?.build()
    };

    Ok(embed)
}

#[cfg(test)]
mod tests {
    use twilight_util::builder::embed::EmbedFieldBuilder;

    use super::*;

    #[test]
    fn footer_only_for_multiple_pages() {
        assert_eq!(page_footer(1, 1), "");
        assert_eq!(page_footer(2, 3), "Page 2/3");
        assert_eq!(page_footer(0, 0), "");
    }

    #[test]
    fn page_embed_carries_fields_and_footer() {
        let fields = vec![
            EmbedFieldBuilder::new("first", "one").build(),
            EmbedFieldBuilder::new("second", "two").build(),
        ];

        let embed = build_page_embed("Title", "Body", fields, 1, 2).expect("valid embed");

        assert_eq!(embed.title.as_deref(), Some("Title"));
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(
            embed.footer.map(|footer| footer.text).as_deref(),
            Some("Page 1/2")
        );
    }
}
