//! Article card rendering.

use edha_core::{ArticleView, escape_html};

use crate::messages;
use crate::page::slug_link;

/// Renders one article card linking to `article.html?slug=...`.
pub fn render_article_card(article: &ArticleView) -> String {
    let cover = article
        .cover_image
        .as_deref()
        .map(|src| format!(r#"<img src="{}" alt="">"#, escape_html(src)))
        .unwrap_or_default();
    let date = article.published_on.as_deref().unwrap_or_default();

    format!(
        concat!(
            r#"<article class="article-card card">{cover}"#,
            r#"<h3>{title}</h3>"#,
            r#"<p class="muted">{excerpt}</p>"#,
            r#"<p class="muted">{date}</p>"#,
            r#"<a class="program-link" href="{href}">{link}</a>"#,
            r#"</article>"#,
        ),
        cover = cover,
        title = escape_html(&article.title),
        excerpt = escape_html(&article.excerpt),
        date = escape_html(date),
        href = escape_html(&slug_link("article.html", &article.slug)),
        link = messages::ARTICLE_LINK,
    )
}

/// Renders article cards; `None` when there are none to show.
pub fn render_articles(articles: &[ArticleView]) -> Option<String> {
    if articles.is_empty() {
        return None;
    }
    Some(articles.iter().map(render_article_card).collect())
}
